//! Capabilities the orchestrators need from the ledger network.
//!
//! Transport, signing primitives and envelope encoding live behind these traits.
//! [`DevNetwork`] implements all of them in-process.
mod dev;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use url::Url;

use crate::commons::models::channel::{ConfigSignature, CreateChannelRequest};
use crate::commons::models::event::{ChaincodeEvent, RegistrationId, TxValidationCode};
use crate::commons::models::identity::{CryptoContent, Identity};
use crate::commons::models::transaction::{
    BroadcastResponse, EndorsedTransaction, ProposalRequest, ProposalResponse,
};
use crate::topology::{CertificateAuthority, ConnectionTarget};

pub use dev::{DevEventHub, DevNetwork};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("Connection to {0} failed")]
    ConnectionFailed(String),
    #[error("Event hub {0} is not connected")]
    HubDisconnected(String),
    #[error("A listener for transaction {0} is already registered")]
    DuplicateListener(String),
    #[error("Signer {0} is not enrolled")]
    NotEnrolled(String),
    #[error("Sign error: {0}")]
    SignError(String),
    #[error("Envelope could not be decoded: {0}")]
    InvalidEnvelope(String),
    #[error("Enrollment failed: {0}")]
    EnrollmentFailed(String),
}

/// Handle of an open connection to a peer or to the orderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub name: String,
    pub url: Url,
}

/// Key material returned by an issuing authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub private_key_pem: String,
    pub certificate_pem: String,
}

impl From<Enrollment> for CryptoContent {
    fn from(enrollment: Enrollment) -> Self {
        CryptoContent {
            private_key_pem: enrollment.private_key_pem,
            signed_cert_pem: enrollment.certificate_pem,
        }
    }
}

#[async_trait]
pub trait NetworkClient: Send + Sync {
    type Hub: EventHub + 'static;

    async fn new_connection(&self, target: &ConnectionTarget) -> Result<Connection, ClientError>;

    /// Sends a proposal to every target and returns the responses in target order.
    async fn send_proposal(
        &self,
        request: &ProposalRequest,
    ) -> Result<Vec<ProposalResponse>, ClientError>;

    /// Signs a channel configuration with the key of `signer`.
    async fn sign_channel_config(
        &self,
        config: &[u8],
        signer: &Identity,
    ) -> Result<ConfigSignature, ClientError>;

    async fn send_transaction(
        &self,
        transaction: &EndorsedTransaction,
    ) -> Result<BroadcastResponse, ClientError>;

    async fn create_channel(
        &self,
        request: &CreateChannelRequest,
    ) -> Result<BroadcastResponse, ClientError>;

    /// Extracts the configuration update carried by an encoded channel creation envelope.
    fn decode_envelope(&self, envelope: &[u8]) -> Result<Vec<u8>, ClientError>;

    async fn new_event_hub(
        &self,
        target: &ConnectionTarget,
        signer: &Identity,
    ) -> Result<Self::Hub, ClientError>;
}

/// Event stream of a peer. Listeners are channels: a transaction listener receives
/// exactly one validation code, a chaincode listener receives every matching event.
pub trait EventHub: Send + Sync {
    fn register_tx_event(
        &self,
        tx_id: &str,
    ) -> Result<oneshot::Receiver<TxValidationCode>, ClientError>;
    fn unregister_tx_event(&self, tx_id: &str);
    fn register_chaincode_event(
        &self,
        chaincode_id: &str,
        pattern: &Regex,
    ) -> Result<(RegistrationId, mpsc::UnboundedReceiver<ChaincodeEvent>), ClientError>;
    fn unregister_chaincode_event(&self, registration: RegistrationId);
    fn is_connected(&self) -> bool;
    fn disconnect(&self);
}

#[async_trait]
pub trait IssuingAuthority: Send + Sync {
    async fn enroll(
        &self,
        ca: &CertificateAuthority,
        enrollment_id: &str,
        enrollment_secret: &str,
    ) -> Result<Enrollment, ClientError>;
}
