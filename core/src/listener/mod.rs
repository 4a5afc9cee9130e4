//! Commit confirmation with a bounded wait.
//!
//! A subscription is registered on the event hub and raced against a timer. The first
//! one to complete decides the outcome and the other is dropped. The subscription is
//! removed from the hub exactly once on every path, including when the waiting future
//! itself is dropped.
use std::time::Duration;

use regex::Regex;
use thiserror::Error;

use crate::client::{ClientError, EventHub};
use crate::commons::models::event::{ChaincodeEvent, RegistrationId, TxValidationCode};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfirmationError {
    #[error("Transaction rejected by the network with code {0}")]
    Invalid(TxValidationCode),
    #[error("No event received before the deadline")]
    Timeout,
    #[error("Event hub closed the subscription")]
    Disconnected,
    #[error("Invalid chaincode event pattern: {0}")]
    Pattern(String),
    #[error("Subscription failed")]
    Hub(#[source] ClientError),
}

struct TxSubscription<'a, H: EventHub + ?Sized> {
    hub: &'a H,
    tx_id: &'a str,
}

impl<'a, H: EventHub + ?Sized> Drop for TxSubscription<'a, H> {
    fn drop(&mut self) {
        self.hub.unregister_tx_event(self.tx_id);
    }
}

struct ChaincodeSubscription<'a, H: EventHub + ?Sized> {
    hub: &'a H,
    registration: RegistrationId,
}

impl<'a, H: EventHub + ?Sized> Drop for ChaincodeSubscription<'a, H> {
    fn drop(&mut self) {
        self.hub.unregister_chaincode_event(self.registration);
    }
}

/// Waits until `tx_id` is committed. Only a `VALID` commit confirms the transaction.
pub async fn await_transaction<H: EventHub + ?Sized>(
    hub: &H,
    tx_id: &str,
    timeout: Duration,
) -> Result<(), ConfirmationError> {
    let receiver = hub.register_tx_event(tx_id).map_err(ConfirmationError::Hub)?;
    let _subscription = TxSubscription { hub, tx_id };
    let outcome = tokio::select! {
        code = receiver => match code {
            Ok(TxValidationCode::Valid) => Ok(()),
            Ok(code) => Err(ConfirmationError::Invalid(code)),
            Err(_) => Err(ConfirmationError::Disconnected),
        },
        _ = tokio::time::sleep(timeout) => Err(ConfirmationError::Timeout),
    };
    match &outcome {
        Ok(()) => log::info!("Transaction {} committed", tx_id),
        Err(error) => log::error!("Transaction {} not confirmed: {}", tx_id, error),
    }
    outcome
}

/// Waits for the first event of `chaincode_id` whose name matches `pattern`.
pub async fn await_chaincode_event<H: EventHub + ?Sized>(
    hub: &H,
    chaincode_id: &str,
    pattern: &str,
    timeout: Duration,
) -> Result<ChaincodeEvent, ConfirmationError> {
    let pattern = Regex::new(pattern).map_err(|e| ConfirmationError::Pattern(e.to_string()))?;
    let (registration, mut events) = hub
        .register_chaincode_event(chaincode_id, &pattern)
        .map_err(ConfirmationError::Hub)?;
    let _subscription = ChaincodeSubscription { hub, registration };
    let outcome = tokio::select! {
        event = events.recv() => event.ok_or(ConfirmationError::Disconnected),
        _ = tokio::time::sleep(timeout) => Err(ConfirmationError::Timeout),
    };
    if let Ok(event) = &outcome {
        log::info!(
            "Chaincode event {} of {} received in transaction {}",
            event.event_name,
            chaincode_id,
            event.tx_id
        );
    }
    outcome
}
