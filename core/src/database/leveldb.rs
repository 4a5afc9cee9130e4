use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use leveldb::database::Database;
use leveldb::kv::KV;
use leveldb::options::{Options, ReadOptions, WriteOptions};

use super::{DatabaseCollection, DatabaseManager, Error};

#[derive(Debug, PartialEq, Eq)]
pub struct StringKey(pub String);

impl db_key::Key for StringKey {
    fn from_u8(key: &[u8]) -> Self {
        Self(String::from_utf8_lossy(key).into_owned())
    }

    fn as_slice<T, F: Fn(&[u8]) -> T>(&self, f: F) -> T {
        f(self.0.as_bytes())
    }
}

fn open_db(path: &Path) -> Result<Arc<Database<StringKey>>, Error> {
    std::fs::create_dir_all(path)
        .map_err(|e| Error::CustomError(format!("{}: {}", path.display(), e)))?;
    let mut options = Options::new();
    options.create_if_missing = true;
    Database::<StringKey>::open(path, options)
        .map(Arc::new)
        .map_err(|e| Error::CustomError(format!("{}: {}", path.display(), e)))
}

/// LevelDB stores. Every identifier is the directory of its own database, opened once
/// per manager and shared by every collection created for it.
#[derive(Default)]
pub struct LevelDbManager {
    open: Mutex<HashMap<String, Arc<Database<StringKey>>>>,
}

impl LevelDbManager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DatabaseManager<LevelDbCollection> for LevelDbManager {
    fn create_collection(&self, identifier: &str) -> LevelDbCollection {
        let mut open = self
            .open
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(db) = open.get(identifier) {
            return LevelDbCollection { db: Ok(db.clone()) };
        }
        let db = open_db(Path::new(identifier));
        match &db {
            Ok(db) => {
                log::debug!("State store {} opened", identifier);
                open.insert(identifier.to_owned(), db.clone());
            }
            Err(error) => {
                log::error!("State store {} could not be opened: {}", identifier, error)
            }
        }
        LevelDbCollection { db }
    }
}

/// Collection over one LevelDB database. A store that failed to open reports the
/// failure on every access.
pub struct LevelDbCollection {
    db: Result<Arc<Database<StringKey>>, Error>,
}

impl LevelDbCollection {
    fn db(&self) -> Result<&Database<StringKey>, Error> {
        self.db.as_deref().map_err(Clone::clone)
    }
}

impl DatabaseCollection for LevelDbCollection {
    fn get(&self, key: &str) -> Result<Vec<u8>, Error> {
        let db = self.db()?;
        match db.get(ReadOptions::new(), StringKey(key.to_owned())) {
            Ok(Some(data)) => Ok(data),
            Ok(None) => Err(Error::EntryNotFound),
            Err(e) => Err(Error::CustomError(e.to_string())),
        }
    }

    fn put(&self, key: &str, data: Vec<u8>) -> Result<(), Error> {
        if key.is_empty() {
            return Err(Error::InvalidKey(key.to_owned()));
        }
        let db = self.db()?;
        let mut options = WriteOptions::new();
        options.sync = true;
        db.put(options, StringKey(key.to_owned()), &data)
            .map_err(|e| Error::CustomError(e.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::LevelDbManager;
    use crate::database::{store_path, DatabaseCollection, DatabaseManager, Error};
    use tempfile::tempdir;

    #[test]
    fn entries_survive_the_manager() {
        let temp_dir = tempdir().unwrap();
        let base = temp_dir.path().join("kvs");
        let path = store_path(base.to_str().unwrap(), "peerOrg1");
        {
            let collection = LevelDbManager::new().create_collection(&path);
            collection.put("peerorg1Admin", b"{}".to_vec()).unwrap();
        }
        let collection = LevelDbManager::new().create_collection(&path);
        assert_eq!(collection.get("peerorg1Admin").unwrap(), b"{}".to_vec());
        assert_eq!(collection.get("missing"), Err(Error::EntryNotFound));
        assert!(temp_dir.path().join("kvs_peerOrg1").is_dir());
    }

    #[test]
    fn collections_of_one_store_share_the_database() {
        let temp_dir = tempdir().unwrap();
        let base = temp_dir.path().join("kvs");
        let manager = LevelDbManager::new();
        let first = manager.create_collection(&store_path(base.to_str().unwrap(), "peerOrg1"));
        let again = manager.create_collection(&store_path(base.to_str().unwrap(), "peerOrg1"));
        let other = manager.create_collection(&store_path(base.to_str().unwrap(), "peerOrg2"));
        first.put("a", b"A".to_vec()).unwrap();
        assert_eq!(again.get("a").unwrap(), b"A".to_vec());
        assert_eq!(other.get("a"), Err(Error::EntryNotFound));
    }

    #[test]
    fn unusable_store_reports_on_access() {
        let temp_dir = tempdir().unwrap();
        let blocker = temp_dir.path().join("blocked");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let collection = LevelDbManager::new().create_collection(blocker.to_str().unwrap());
        assert!(matches!(collection.get("a"), Err(Error::CustomError(_))));
        assert!(matches!(
            collection.put("a", vec![]),
            Err(Error::CustomError(_))
        ));
    }
}
