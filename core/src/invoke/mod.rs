//! Invocation of a chaincode function confirmed by the commit event of its transaction.
use regex::Regex;
use thiserror::Error;

use crate::client::{ClientError, NetworkClient};
use crate::commons::models::event::ChaincodeEvent;
use crate::commons::models::transaction::ProposalKind;
use crate::database::{DatabaseCollection, DatabaseManager};
use crate::listener::{await_chaincode_event, await_transaction, ConfirmationError};
use crate::proposal::{endorse, ProposalError};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeRequest {
    pub chaincode_id: String,
    pub fcn: String,
    pub args: Vec<String>,
    pub channel: String,
    /// Name pattern of a chaincode event to wait for along with the commit
    pub event_pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeOutcome {
    pub tx_id: String,
    pub event: Option<ChaincodeEvent>,
}

#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("Unknown organization {0}")]
    UnknownOrganization(String),
    #[error(transparent)]
    Proposal(#[from] ProposalError),
    #[error("Invoke proposal was bad: statuses {0:?}")]
    BadProposal(Vec<u32>),
    #[error("Event hub unavailable")]
    Client(#[from] ClientError),
    #[error("Transaction rejected by the ordering service: {status} {info}")]
    Rejected { status: String, info: String },
    #[error("Transaction not confirmed")]
    Confirmation(#[from] ConfirmationError),
}

/// Sends an invoke proposal to the peers of `org_key`, submits the endorsed transaction
/// and waits for it to be committed.
///
/// The commit listener is registered before the transaction is broadcast, so a commit
/// announced while the broadcast is still in flight is not missed.
pub async fn invoke_chaincode<C, M, D>(
    session: &Session<C, M, D>,
    org_key: &str,
    request: &InvokeRequest,
) -> Result<InvokeOutcome, InvokeError>
where
    C: NetworkClient,
    M: DatabaseManager<D>,
    D: DatabaseCollection,
{
    let org = session
        .topology()
        .organization(org_key)
        .ok_or_else(|| InvokeError::UnknownOrganization(org_key.to_owned()))?;
    if let Some(pattern) = request.event_pattern.as_ref() {
        Regex::new(pattern).map_err(|e| ConfirmationError::Pattern(e.to_string()))?;
    }
    let kind = ProposalKind::Invoke {
        chain_id: request.channel.clone(),
        fcn: request.fcn.clone(),
        args: request.args.clone(),
    };
    let endorsement = endorse(session, org, &request.chaincode_id, kind).await?;
    if !endorsement.is_good() {
        let statuses = endorsement.statuses();
        log::error!("Invoke proposal was bad for {}: statuses {:?}", org_key, statuses);
        return Err(InvokeError::BadProposal(statuses));
    }
    log::info!(
        "Successfully sent invoke proposal and received proposal responses for {}",
        org_key
    );
    let hub = session.event_hub(org, &endorsement.proposal.signer).await?;
    let tx_id = endorsement.proposal.context.tx_id.clone();
    let transaction = endorsement.into_transaction(session.orderer().clone());
    let timeout = session.event_timeout();

    let commit = async {
        await_transaction(hub.as_ref(), &tx_id, timeout)
            .await
            .map_err(InvokeError::from)
    };
    let event = async {
        match request.event_pattern.as_deref() {
            Some(pattern) => {
                await_chaincode_event(hub.as_ref(), &request.chaincode_id, pattern, timeout)
                    .await
                    .map(Some)
                    .map_err(InvokeError::from)
            }
            None => Ok(None),
        }
    };
    let broadcast = async {
        let response = session.client().send_transaction(&transaction).await?;
        if !response.is_success() {
            return Err(InvokeError::Rejected {
                status: response.status,
                info: response.info,
            });
        }
        log::debug!("Transaction {} accepted by the ordering service", tx_id);
        Ok::<(), InvokeError>(())
    };
    let ((), event, ()) = futures::try_join!(commit, event, broadcast)?;
    log::info!("Invoke transaction {} committed for {}", tx_id, org_key);
    Ok(InvokeOutcome { tx_id, event })
}
