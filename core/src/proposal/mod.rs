//! Endorsement of proposals by the peers of an organization.
mod install;

use thiserror::Error;

use crate::client::{ClientError, NetworkClient};
use crate::commons::models::transaction::{
    EndorsementResult, ProposalKind, ProposalRequest, TransactionContext,
};
use crate::database::{DatabaseCollection, DatabaseManager};
use crate::identity::IdentityError;
use crate::session::Session;
use crate::topology::Organization;

pub use install::{install_chaincode, ChaincodeSpec, InstallOutcome, InstallReport};

#[derive(Error, Debug)]
pub enum ProposalError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("Proposal could not be sent")]
    Client(#[from] ClientError),
}

/// Signs a proposal with the admin of `org` and sends it to every peer of the organization.
pub(crate) async fn endorse<C, M, D>(
    session: &Session<C, M, D>,
    org: &Organization,
    chaincode_id: &str,
    kind: ProposalKind,
) -> Result<EndorsementResult, ProposalError>
where
    C: NetworkClient,
    M: DatabaseManager<D>,
    D: DatabaseCollection,
{
    let signer = session.resolve_admin(org).await?;
    let context = TransactionContext::new(&signer);
    log::debug!("Sending proposal {} for {}", context.tx_id, org.key);
    let proposal = ProposalRequest {
        targets: session.peers(&org.key).to_vec(),
        signer,
        chaincode_id: chaincode_id.to_owned(),
        kind,
        context,
    };
    let responses = session.client().send_proposal(&proposal).await?;
    Ok(EndorsementResult {
        proposal,
        responses,
    })
}
