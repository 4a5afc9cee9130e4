//! Administration of a multi-organization permissioned ledger network.
//!
//! The crate drives the administrative operations of a consortium network on behalf of
//! every member organization: installing chaincode on the peers of each organization,
//! creating channels signed by every organization and by the ordering service, and
//! invoking chaincode functions whose commit is confirmed through an event hub.
//!
//! The network topology is read from static settings. Admin identities are resolved
//! from the crypto material of each organization, or enrolled against its issuing
//! authority, and kept in a per-organization key/value store.
//!
//! Every operation runs inside a [`Session`], which owns the connections to the network
//! and is released with [`Session::close`].
//!
//! # Basic usage
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use ledger_admin::{
//!     create_channel, AdminSettings, ChannelOutcome, DevNetwork, IssuingAuthority,
//!     MemoryCollection, MemoryManager, Session,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ledger_admin::Error> {
//!     let settings = AdminSettings::load(Path::new("ledger-admin.toml"))?;
//!     let network = Arc::new(DevNetwork::new());
//!     let authority: Arc<dyn IssuingAuthority> = network.clone();
//!     let session: Session<DevNetwork, MemoryManager, MemoryCollection> = Session::open(
//!         settings,
//!         network,
//!         Arc::new(MemoryManager::new()),
//!         Some(authority),
//!     )
//!     .await?;
//!
//!     let outcome = create_channel(&session, "mychannel").await;
//!     assert_eq!(outcome, ChannelOutcome::Created);
//!
//!     session.close().await;
//!     Ok(())
//! }
//! ```
//!
pub mod channel;
pub mod client;
pub(crate) mod commons;
pub mod database;
pub mod error;
pub mod identity;
pub mod invoke;
pub mod listener;
pub mod proposal;
pub(crate) mod session;
pub mod topology;

pub use channel::{create_channel, ChannelOutcome};
pub use client::{
    ClientError, Connection, DevEventHub, DevNetwork, Enrollment, EventHub, IssuingAuthority,
    NetworkClient,
};
pub use commons::config::{
    AdminSettings, CaSettings, IdentitySettings, NetworkSettings, OrdererSettings,
    OrganizationSettings, PeerSettings, SessionSettings,
};
pub use commons::models::channel::{
    ChannelConfigUpdate, ConfigSignature, CreateChannelRequest, SignedConfigUpdate,
};
pub use commons::models::event::{ChaincodeEvent, RegistrationId, TxValidationCode};
pub use commons::models::identity::{CryptoContent, Identity};
pub use commons::models::transaction::{
    BroadcastResponse, EndorsedTransaction, EndorsementResult, ProposalKind, ProposalRequest,
    ProposalResponse, TransactionContext,
};
pub use database::{
    DatabaseCollection, DatabaseManager, Error as DbError, LevelDbCollection, LevelDbManager,
    MemoryCollection, MemoryManager,
};
pub use error::Error;
pub use invoke::{invoke_chaincode, InvokeError, InvokeOutcome, InvokeRequest};
pub use listener::{await_chaincode_event, await_transaction, ConfirmationError};
pub use proposal::{install_chaincode, ChaincodeSpec, InstallOutcome, InstallReport};
pub use session::Session;
pub use topology::{Topology, TopologyError};
