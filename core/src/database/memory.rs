use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, RwLock},
};

use super::{DatabaseCollection, DatabaseManager, Error};

pub struct DataStore {
    data: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl DataStore {
    fn new() -> Self {
        Self {
            data: RwLock::new(BTreeMap::new()),
        }
    }
}

/// In-memory stores. Collections created twice with the same identifier share their data,
/// which lets a store outlive the session that filled it.
pub struct MemoryManager {
    data: RwLock<HashMap<String, Arc<DataStore>>>,
}

impl MemoryManager {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseManager<MemoryCollection> for MemoryManager {
    fn create_collection(&self, identifier: &str) -> MemoryCollection {
        let db = match self.data.write() {
            Ok(mut lock) => lock
                .entry(identifier.to_owned())
                .or_insert_with(|| Arc::new(DataStore::new()))
                .clone(),
            Err(_) => {
                log::error!("Memory store lock poisoned, using a detached store");
                Arc::new(DataStore::new())
            }
        };
        MemoryCollection { data: db }
    }
}

pub struct MemoryCollection {
    data: Arc<DataStore>,
}

impl DatabaseCollection for MemoryCollection {
    fn get(&self, key: &str) -> Result<Vec<u8>, Error> {
        let lock = self
            .data
            .data
            .read()
            .map_err(|e| Error::CustomError(e.to_string()))?;
        let Some(data) = lock.get(key) else {
            return Err(Error::EntryNotFound);
        };
        Ok(data.clone())
    }

    fn put(&self, key: &str, data: Vec<u8>) -> Result<(), Error> {
        let mut lock = self
            .data
            .data
            .write()
            .map_err(|e| Error::CustomError(e.to_string()))?;
        lock.insert(key.to_string(), data);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::MemoryManager;
    use crate::database::{DatabaseCollection, DatabaseManager, Error};

    #[test]
    fn basic_operations_test() {
        let db = MemoryManager::new();
        let first_collection = db.create_collection("/tmp/kvs_peerOrg1");
        let result = first_collection.put("a", b"A".to_vec());
        assert!(result.is_ok());
        assert_eq!(first_collection.get("a").unwrap(), b"A".to_vec());
        assert_eq!(first_collection.get("b"), Err(Error::EntryNotFound));
        // Same identifier, same data
        let again = db.create_collection("/tmp/kvs_peerOrg1");
        assert_eq!(again.get("a").unwrap(), b"A".to_vec());
        // Different identifier, isolated data
        let other = db.create_collection("/tmp/kvs_peerOrg2");
        assert_eq!(other.get("a"), Err(Error::EntryNotFound));
    }
}
