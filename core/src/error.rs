//! Possible errors of a ledger administration session
use config::ConfigError;
use thiserror::Error;

use crate::topology::TopologyError;

/// Errors that abort a session before any orchestration starts.
/// Errors produced inside an orchestration are reported by the orchestration itself.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Settings Load Error")]
    SettingsError {
        #[from]
        source: ConfigError,
    },
    #[error("Topology error: {0}")]
    TopologyError(#[from] TopologyError),
    #[error("Connection to {target} could not be established: {reason}")]
    ConnectionError { target: String, reason: String },
    #[error("No network transport configured. Run with --dev to use the in-process network")]
    NoTransport,
}

/// Renders an error together with every source in its chain.
/// This is the deepest diagnostic the orchestrators log on failure.
pub fn diagnostic(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut current = error.source();
    while let Some(source) = current {
        message.push_str(": ");
        message.push_str(&source.to_string());
        current = source.source();
    }
    message
}
