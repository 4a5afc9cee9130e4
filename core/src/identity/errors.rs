use std::path::PathBuf;

use thiserror::Error;

use crate::client::ClientError;
use crate::database::Error as DbError;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Failed to get user context for {owner}")]
    UserContext {
        owner: String,
        #[source]
        source: Box<IdentityError>,
    },
    #[error("Unknown organization {0}")]
    UnknownOrganization(String),
    #[error("Credential material {path} could not be read")]
    MissingMaterial {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Enrollment against the issuing authority failed")]
    Enrollment(#[source] ClientError),
    #[error("State store error")]
    Store(#[from] DbError),
}
