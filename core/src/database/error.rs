//! Possible errors of a key/value state store
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Entry Not Found")]
    EntryNotFound,
    #[error("Error while serializing")]
    SerializeError,
    #[error("Error while deserializing")]
    DeserializeError,
    #[error("Invalid key {0}")]
    InvalidKey(String),
    #[error("An error withing the database custom implementation: {0}")]
    CustomError(String),
}
