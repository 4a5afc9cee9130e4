mod error;
mod layers;
mod leveldb;
mod memory;

pub use self::leveldb::{LevelDbCollection, LevelDbManager};
pub use error::Error;
pub(crate) use layers::user::UserDb;
pub use memory::{MemoryCollection, MemoryManager};

/// Factory of key/value collections. Each organization gets its own collection,
/// identified by the `<base>_<org>` path convention.
pub trait DatabaseManager<C>: Sync + Send
where
    C: DatabaseCollection,
{
    fn create_collection(&self, identifier: &str) -> C;
}

/// Byte oriented key/value collection. No deletion semantics are needed by the resolver.
pub trait DatabaseCollection: Sync + Send {
    fn get(&self, key: &str) -> Result<Vec<u8>, Error>;
    fn put(&self, key: &str, data: Vec<u8>) -> Result<(), Error>;
}

/// Path of the key/value store of an organization.
pub fn store_path(base: &str, org: &str) -> String {
    format!("{}_{}", base, org)
}
