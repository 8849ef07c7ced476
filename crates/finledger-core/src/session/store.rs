//! Session persistence over durable storage.
//!
//! Two keys are used: `token` holds the raw bearer token, `user` holds the
//! JSON-encoded [`User`]. Both are written and removed in a single commit.

use std::sync::Arc;

use super::storage::{Change, DurableStorage, StorageError};
use super::{Session, User};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn DurableStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        Self { storage }
    }

    /// Reads the persisted session.
    ///
    /// Returns `None` when either key is missing, the token is blank, the
    /// user JSON is malformed, or storage cannot be read.
    pub fn load(&self) -> Option<Session> {
        let token = self.read(TOKEN_KEY)?;
        let raw_user = self.read(USER_KEY)?;

        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        match serde_json::from_str::<User>(&raw_user) {
            Ok(user) => Some(Session {
                token: token.to_string(),
                user,
            }),
            Err(err) => {
                tracing::warn!(error = %err, "stored user is malformed; ignoring session");
                None
            }
        }
    }

    /// Persists token and user together.
    ///
    /// # Errors
    /// Returns an error if storage rejects the commit; nothing is written then.
    pub fn save(&self, session: &Session) -> Result<(), StorageError> {
        let user = serde_json::to_string(&session.user).map_err(|err| StorageError::Write {
            path: USER_KEY.into(),
            source: std::io::Error::other(err),
        })?;

        self.storage.commit(&[
            Change::Set(TOKEN_KEY, session.token.clone()),
            Change::Set(USER_KEY, user),
        ])
    }

    /// Removes both keys.
    ///
    /// # Errors
    /// Returns an error if storage rejects the commit.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage
            .commit(&[Change::Remove(TOKEN_KEY), Change::Remove(USER_KEY)])
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to read session storage");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::storage::MemoryStorage;

    fn store_with(storage: MemoryStorage) -> (SessionStore, Arc<MemoryStorage>) {
        let storage = Arc::new(storage);
        (SessionStore::new(Arc::clone(&storage) as Arc<dyn DurableStorage>), storage)
    }

    fn alice() -> Session {
        Session {
            token: "abc".to_string(),
            user: User {
                user_id: None,
                username: "alice".to_string(),
                email: "a@x.com".to_string(),
            },
        }
    }

    #[test]
    fn test_load_empty_storage_is_absent() {
        let (store, _) = store_with(MemoryStorage::new());
        assert!(store.load().is_none());
    }

    #[test]
    fn test_load_reads_token_and_user() {
        let (store, _) = store_with(
            MemoryStorage::new()
                .with_entry(TOKEN_KEY, "abc")
                .with_entry(USER_KEY, r#"{"username":"alice","email":"a@x.com"}"#),
        );
        assert_eq!(store.load(), Some(alice()));
    }

    #[test]
    fn test_load_accepts_user_with_id() {
        let (store, _) = store_with(
            MemoryStorage::new()
                .with_entry(TOKEN_KEY, "abc")
                .with_entry(USER_KEY, r#"{"userId":3,"username":"alice","email":"a@x.com"}"#),
        );
        let session = store.load().unwrap();
        assert_eq!(session.user.user_id, Some(3));
    }

    #[test]
    fn test_load_malformed_user_is_absent() {
        let (store, _) = store_with(
            MemoryStorage::new()
                .with_entry(TOKEN_KEY, "abc")
                .with_entry(USER_KEY, "{not json"),
        );
        assert!(store.load().is_none());
    }

    #[test]
    fn test_load_token_without_user_is_absent() {
        let (store, _) = store_with(MemoryStorage::new().with_entry(TOKEN_KEY, "abc"));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_then_clear_removes_both_keys() {
        let (store, storage) = store_with(MemoryStorage::new());
        store.save(&alice()).unwrap();
        assert_eq!(store.load(), Some(alice()));

        store.clear().unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
    }
}
