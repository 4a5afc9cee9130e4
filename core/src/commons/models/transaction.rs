//! Proposals, endorsements and transactions exchanged with the network
use rand::RngCore;
use sha2::{Digest, Sha256};

use super::identity::Identity;
use crate::client::Connection;

const NONCE_LENGTH: usize = 24;
/// Status reported by a peer that endorses a proposal
pub const ENDORSEMENT_SUCCESS: u32 = 200;
/// Status reported by the ordering service when it accepts a submission
pub const BROADCAST_SUCCESS: &str = "SUCCESS";

/// Nonce and transaction id of a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionContext {
    pub nonce: Vec<u8>,
    pub tx_id: String,
}

impl TransactionContext {
    /// Generates a fresh nonce and derives the transaction id for `identity`.
    pub fn new(identity: &Identity) -> Self {
        let mut nonce = vec![0u8; NONCE_LENGTH];
        rand::thread_rng().fill_bytes(&mut nonce);
        Self::from_nonce(nonce, identity)
    }

    /// The transaction id is the hex encoded SHA-256 of the nonce followed by the creator bytes.
    pub fn from_nonce(nonce: Vec<u8>, identity: &Identity) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(&nonce);
        hasher.update(identity.creator_bytes());
        let tx_id = hex::encode(hasher.finalize());
        Self { nonce, tx_id }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposalKind {
    Install { path: String, version: String },
    Invoke {
        chain_id: String,
        fcn: String,
        args: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub struct ProposalRequest {
    pub targets: Vec<Connection>,
    pub signer: Identity,
    pub chaincode_id: String,
    pub kind: ProposalKind,
    pub context: TransactionContext,
}

/// Answer of a single peer to a proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalResponse {
    pub peer: String,
    pub status: u32,
    pub message: String,
    pub payload: Vec<u8>,
}

/// Every response received for a proposal, in target order.
#[derive(Debug, Clone)]
pub struct EndorsementResult {
    pub proposal: ProposalRequest,
    pub responses: Vec<ProposalResponse>,
}

impl EndorsementResult {
    /// A proposal is good when there is at least one response and every peer endorsed it.
    pub fn is_good(&self) -> bool {
        !self.responses.is_empty()
            && self
                .responses
                .iter()
                .all(|response| response.status == ENDORSEMENT_SUCCESS)
    }

    pub fn statuses(&self) -> Vec<u32> {
        self.responses.iter().map(|response| response.status).collect()
    }

    /// Turns a good endorsement into the transaction submitted to the orderer.
    pub fn into_transaction(self, orderer: Connection) -> EndorsedTransaction {
        EndorsedTransaction {
            orderer,
            proposal: self.proposal,
            responses: self.responses,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EndorsedTransaction {
    pub orderer: Connection,
    pub proposal: ProposalRequest,
    pub responses: Vec<ProposalResponse>,
}

/// Answer of the ordering service to a broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastResponse {
    pub status: String,
    pub info: String,
}

impl BroadcastResponse {
    pub fn is_success(&self) -> bool {
        self.status == BROADCAST_SUCCESS
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::commons::models::identity::CryptoContent;

    fn identity(cert: &str) -> Identity {
        Identity::new(
            "peerorg1Admin".into(),
            "Org1MSP".into(),
            CryptoContent {
                private_key_pem: "key".into(),
                signed_cert_pem: cert.into(),
            },
        )
    }

    fn response(status: u32) -> ProposalResponse {
        ProposalResponse {
            peer: "peer0".into(),
            status,
            message: String::new(),
            payload: vec![],
        }
    }

    fn endorsement(responses: Vec<ProposalResponse>) -> EndorsementResult {
        let signer = identity("cert");
        EndorsementResult {
            proposal: ProposalRequest {
                targets: vec![],
                context: TransactionContext::new(&signer),
                signer,
                chaincode_id: "mycc".into(),
                kind: ProposalKind::Install {
                    path: "github.com/example_cc".into(),
                    version: "v0".into(),
                },
            },
            responses,
        }
    }

    #[test]
    fn tx_id_is_deterministic_per_nonce_and_identity() {
        let first = TransactionContext::from_nonce(vec![1; 24], &identity("cert"));
        let second = TransactionContext::from_nonce(vec![1; 24], &identity("cert"));
        let other = TransactionContext::from_nonce(vec![1; 24], &identity("other cert"));
        assert_eq!(first, second);
        assert_ne!(first.tx_id, other.tx_id);
        assert_eq!(first.tx_id.len(), 64);
    }

    #[test]
    fn fresh_contexts_are_unique() {
        let signer = identity("cert");
        let first = TransactionContext::new(&signer);
        let second = TransactionContext::new(&signer);
        assert_eq!(first.nonce.len(), NONCE_LENGTH);
        assert_ne!(first.tx_id, second.tx_id);
    }

    #[test]
    fn every_response_must_endorse() {
        assert!(endorsement(vec![response(200), response(200)]).is_good());
        assert!(!endorsement(vec![response(200), response(500)]).is_good());
        assert!(!endorsement(vec![response(500), response(200)]).is_good());
        assert!(!endorsement(vec![]).is_good());
    }
}
