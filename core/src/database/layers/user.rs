use crate::commons::models::identity::Identity;
use crate::database::{DatabaseCollection, Error};

/// Users of an organization's state store, keyed by username.
pub(crate) struct UserDb<C: DatabaseCollection> {
    collection: C,
}

impl<C: DatabaseCollection> UserDb<C> {
    pub fn new(collection: C) -> Self {
        Self { collection }
    }

    /// Returns `None` when no user with that name has been stored yet.
    pub fn get_user_context(&self, username: &str) -> Result<Option<Identity>, Error> {
        let data = match self.collection.get(username) {
            Ok(data) => data,
            Err(Error::EntryNotFound) => return Ok(None),
            Err(error) => return Err(error),
        };
        let user = serde_json::from_slice::<Identity>(&data).map_err(|_| Error::DeserializeError)?;
        Ok(Some(user))
    }

    pub fn set_user_context(&self, user: &Identity) -> Result<(), Error> {
        let Ok(data) = serde_json::to_vec(user) else {
            return Err(Error::SerializeError);
        };
        self.collection.put(&user.username, data)
    }
}

#[cfg(test)]
mod test {
    use super::UserDb;
    use crate::commons::models::identity::{CryptoContent, Identity};
    use crate::database::{DatabaseCollection, DatabaseManager, Error, MemoryManager};

    #[test]
    fn stores_users_by_name() {
        let manager = MemoryManager::new();
        let db = UserDb::new(manager.create_collection("kvs_peerOrg1"));
        assert_eq!(db.get_user_context("peerorg1Admin"), Ok(None));
        let user = Identity::new(
            "peerorg1Admin".into(),
            "Org1MSP".into(),
            CryptoContent {
                private_key_pem: "key".into(),
                signed_cert_pem: "cert".into(),
            },
        );
        db.set_user_context(&user).unwrap();
        assert_eq!(db.get_user_context("peerorg1Admin"), Ok(Some(user)));
    }

    #[test]
    fn corrupted_entries_are_reported() {
        let manager = MemoryManager::new();
        let collection = manager.create_collection("kvs_peerOrg1");
        collection.put("peerorg1Admin", b"not json".to_vec()).unwrap();
        let db = UserDb::new(collection);
        assert_eq!(
            db.get_user_context("peerorg1Admin"),
            Err(Error::DeserializeError)
        );
    }
}
