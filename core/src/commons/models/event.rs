//! Events delivered by the event hub of a peer
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Validation code attached to a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxValidationCode {
    Valid,
    BadPayload,
    BadSignature,
    EndorsementPolicyFailure,
    MvccReadConflict,
    PhantomReadConflict,
    DuplicateTxid,
    Other(String),
}

impl TxValidationCode {
    pub fn is_valid(&self) -> bool {
        matches!(self, TxValidationCode::Valid)
    }
}

impl FromStr for TxValidationCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "VALID" => Self::Valid,
            "BAD_PAYLOAD" => Self::BadPayload,
            "BAD_CREATOR_SIGNATURE" => Self::BadSignature,
            "ENDORSEMENT_POLICY_FAILURE" => Self::EndorsementPolicyFailure,
            "MVCC_READ_CONFLICT" => Self::MvccReadConflict,
            "PHANTOM_READ_CONFLICT" => Self::PhantomReadConflict,
            "DUPLICATE_TXID" => Self::DuplicateTxid,
            other => Self::Other(other.to_owned()),
        })
    }
}

impl Display for TxValidationCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Self::Valid => "VALID",
            Self::BadPayload => "BAD_PAYLOAD",
            Self::BadSignature => "BAD_CREATOR_SIGNATURE",
            Self::EndorsementPolicyFailure => "ENDORSEMENT_POLICY_FAILURE",
            Self::MvccReadConflict => "MVCC_READ_CONFLICT",
            Self::PhantomReadConflict => "PHANTOM_READ_CONFLICT",
            Self::DuplicateTxid => "DUPLICATE_TXID",
            Self::Other(code) => code.as_str(),
        };
        write!(f, "{}", code)
    }
}

/// Event emitted by a chaincode during a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChaincodeEvent {
    pub chaincode_id: String,
    pub tx_id: String,
    pub event_name: String,
    pub payload: Vec<u8>,
}

/// Handle of a chaincode event registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(pub u64);
