use std::collections::BTreeMap;

use futures::future::join_all;

use super::endorse;
use crate::client::NetworkClient;
use crate::commons::models::transaction::ProposalKind;
use crate::database::{DatabaseCollection, DatabaseManager};
use crate::error::diagnostic;
use crate::session::Session;

/// Chaincode package to install on every peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChaincodeSpec {
    pub path: String,
    pub id: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Endorsed,
    /// Statuses returned by the peers of the organization
    Rejected(Vec<u32>),
    Failed(String),
}

/// Outcome of the install flow of every organization, by organization key.
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    outcomes: BTreeMap<String, InstallOutcome>,
}

impl InstallReport {
    pub fn outcome(&self, org_key: &str) -> Option<&InstallOutcome> {
        self.outcomes.get(org_key)
    }

    pub fn outcomes(&self) -> &BTreeMap<String, InstallOutcome> {
        &self.outcomes
    }

    pub fn all_endorsed(&self) -> bool {
        self.outcomes
            .values()
            .all(|outcome| *outcome == InstallOutcome::Endorsed)
    }
}

/// Installs the chaincode on the peers of every organization.
///
/// Each organization runs its own flow concurrently with the others. A failure in one
/// flow is logged and recorded in the report without affecting its siblings.
pub async fn install_chaincode<C, M, D>(
    session: &Session<C, M, D>,
    spec: &ChaincodeSpec,
) -> InstallReport
where
    C: NetworkClient,
    M: DatabaseManager<D>,
    D: DatabaseCollection,
{
    let flows = session.topology().organizations.iter().map(|org| async move {
        let kind = ProposalKind::Install {
            path: spec.path.clone(),
            version: spec.version.clone(),
        };
        let outcome = match endorse(session, org, &spec.id, kind).await {
            Ok(result) if result.is_good() => {
                log::info!(
                    "Successfully sent install proposal of {} and received proposal responses for {}",
                    spec.id,
                    org.key
                );
                InstallOutcome::Endorsed
            }
            Ok(result) => {
                let statuses = result.statuses();
                log::error!(
                    "Install proposal was bad for {}: statuses {:?}",
                    org.key,
                    statuses
                );
                InstallOutcome::Rejected(statuses)
            }
            Err(error) => {
                let reason = diagnostic(&error);
                log::error!("Failed to send install proposal for {}: {}", org.key, reason);
                InstallOutcome::Failed(reason)
            }
        };
        (org.key.clone(), outcome)
    });
    let outcomes = join_all(flows).await.into_iter().collect();
    InstallReport { outcomes }
}
