//! Creation of a channel signed by every organization and by the orderer admin.
use std::path::PathBuf;

use thiserror::Error;

use crate::client::{ClientError, NetworkClient};
use crate::commons::models::channel::{ChannelConfigUpdate, SIGNATURES_PER_SIGNER};
use crate::commons::models::transaction::{BroadcastResponse, TransactionContext};
use crate::database::{DatabaseCollection, DatabaseManager};
use crate::error::diagnostic;
use crate::identity::IdentityError;
use crate::session::Session;

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("No channel configuration transaction configured for the orderer")]
    MissingConfigtx,
    #[error("Channel configuration {path} could not be read")]
    ConfigtxRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("Network client error")]
    Client(#[from] ClientError),
    #[error("Configuration update signed by {found} of {expected} signers")]
    Incomplete { expected: usize, found: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelOutcome {
    Created,
    /// The ordering service refused the request
    Rejected { status: String, info: String },
    Failed(String),
}

/// Creates the channel `name` from the configuration transaction of the orderer.
///
/// On success the call returns after the grace period of the session, leaving the
/// ordering service time to cut the genesis block. There is no retry.
pub async fn create_channel<C, M, D>(session: &Session<C, M, D>, name: &str) -> ChannelOutcome
where
    C: NetworkClient,
    M: DatabaseManager<D>,
    D: DatabaseCollection,
{
    match submit(session, name).await {
        Ok(response) if response.is_success() => {
            log::info!("Successfully created the channel {}", name);
            tokio::time::sleep(session.grace_period()).await;
            ChannelOutcome::Created
        }
        Ok(response) => {
            log::error!(
                "Failed to create the channel {}: {} {}",
                name,
                response.status,
                response.info
            );
            ChannelOutcome::Rejected {
                status: response.status,
                info: response.info,
            }
        }
        Err(error) => {
            let reason = diagnostic(&error);
            log::error!("Failed to initialize the channel {}: {}", name, reason);
            ChannelOutcome::Failed(reason)
        }
    }
}

async fn submit<C, M, D>(
    session: &Session<C, M, D>,
    name: &str,
) -> Result<BroadcastResponse, ChannelError>
where
    C: NetworkClient,
    M: DatabaseManager<D>,
    D: DatabaseCollection,
{
    let path = session
        .topology()
        .orderer
        .configtx
        .as_ref()
        .ok_or(ChannelError::MissingConfigtx)?;
    let envelope = std::fs::read(path).map_err(|source| ChannelError::ConfigtxRead {
        path: path.clone(),
        source,
    })?;
    let client = session.client();
    let mut update = ChannelConfigUpdate::new(client.decode_envelope(&envelope)?);
    // Signing order is part of the protocol: organizations first, orderer admin last
    for org in session.topology().organizations.iter() {
        let admin = session.resolve_admin(org).await?;
        let signature = client.sign_channel_config(update.config(), &admin).await?;
        log::debug!("Channel configuration signed by {}", admin.msp_id);
        update.append_signer(signature);
    }
    let orderer_admin = session.resolve_orderer_admin().await?;
    let signature = client
        .sign_channel_config(update.config(), &orderer_admin)
        .await?;
    update.append_signer(signature);
    let expected = session.topology().organizations.len() + 1;
    let found = update.signatures().len() / SIGNATURES_PER_SIGNER;
    let signed = update
        .seal(expected)
        .ok_or(ChannelError::Incomplete { expected, found })?;
    log::debug!(
        "Submitting channel {} with {} signatures",
        name,
        signed.signatures().len()
    );
    let request = signed.into_request(
        name.to_owned(),
        session.orderer().clone(),
        TransactionContext::new(&orderer_admin),
    );
    Ok(client.create_channel(&request).await?)
}
