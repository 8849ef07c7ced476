//! Client-held session: the bearer token plus the identity it belongs to.
//!
//! A [`SessionHandle`] is the single owner of session state for a process. It
//! is created explicitly and passed to the API client and auth context, never
//! looked up globally. Every change bumps a generation counter and is
//! published on a watch channel as an [`AuthState`].

pub mod storage;
pub mod store;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use self::storage::{DurableStorage, FileStorage, StorageError};
use self::store::SessionStore;

/// Identity returned by the backend on login/register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub username: String,
    pub email: String,
}

/// Token and user are always held together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Durable storage has not been read yet.
    Loading,
    Unauthenticated,
    Authenticated(User),
}

impl AuthState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Token captured when a request is sent, tagged with the generation it
/// belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: Option<String>,
    pub generation: u64,
}

#[derive(Debug, Default)]
struct Slot {
    session: Option<Session>,
    generation: u64,
    hydrated: bool,
}

struct Inner {
    store: SessionStore,
    slot: Mutex<Slot>,
    state_tx: watch::Sender<AuthState>,
}

/// Shared, cloneable handle to the process session.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Inner>,
}

impl SessionHandle {
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        let (state_tx, _) = watch::channel(AuthState::Loading);
        Self {
            inner: Arc::new(Inner {
                store: SessionStore::new(storage),
                slot: Mutex::new(Slot::default()),
                state_tx,
            }),
        }
    }

    /// Session backed by `<base>/session.json`.
    pub fn file_backed() -> Self {
        let storage = FileStorage::new(crate::config::paths::session_path());
        Self::new(Arc::new(storage))
    }

    /// Reads durable storage and leaves the `Loading` state.
    ///
    /// Only the first call reads storage; later calls return the current state.
    pub fn hydrate(&self) -> AuthState {
        let mut slot = self.lock();
        if !slot.hydrated {
            slot.hydrated = true;
            slot.session = self.inner.store.load();
            slot.generation += 1;
            tracing::debug!(
                authenticated = slot.session.is_some(),
                "session hydrated from storage"
            );
            self.publish(&slot);
        }
        Self::state_of(&slot)
    }

    pub fn state(&self) -> AuthState {
        self.inner.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state_tx.subscribe()
    }

    pub fn current(&self) -> Option<Session> {
        self.lock().session.clone()
    }

    pub fn credentials(&self) -> Credentials {
        let slot = self.lock();
        Credentials {
            token: slot.session.as_ref().map(|s| s.token.clone()),
            generation: slot.generation,
        }
    }

    /// Persists and activates a new session.
    ///
    /// # Errors
    /// Returns an error if the session could not be persisted; the previous
    /// session then stays in place.
    pub fn establish(&self, session: Session) -> Result<(), StorageError> {
        let mut slot = self.lock();
        self.inner.store.save(&session)?;
        slot.session = Some(session);
        slot.generation += 1;
        slot.hydrated = true;
        self.publish(&slot);
        Ok(())
    }

    /// Drops the session from memory and durable storage.
    ///
    /// Memory is always cleared, so the state is `Unauthenticated` afterwards
    /// even when the storage error is returned.
    ///
    /// # Errors
    /// Returns an error if durable storage could not be cleared.
    pub fn clear(&self) -> Result<(), StorageError> {
        let mut slot = self.lock();
        let result = self.inner.store.clear();
        slot.session = None;
        slot.generation += 1;
        slot.hydrated = true;
        self.publish(&slot);
        result
    }

    /// Clears the session only if it is still the one from `generation`.
    ///
    /// Returns `true` if the session was cleared. A rejection that arrives
    /// for a request sent before a newer login does not undo that login.
    pub fn invalidate(&self, generation: u64) -> bool {
        let mut slot = self.lock();
        if slot.generation != generation {
            tracing::debug!(
                stale = generation,
                current = slot.generation,
                "ignoring unauthorized response from an older session"
            );
            return false;
        }

        if let Err(err) = self.inner.store.clear() {
            tracing::warn!(error = %err, "failed to clear stored session");
        }
        slot.session = None;
        slot.generation += 1;
        slot.hydrated = true;
        self.publish(&slot);
        true
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.inner.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_of(slot: &Slot) -> AuthState {
        if !slot.hydrated {
            return AuthState::Loading;
        }
        match &slot.session {
            Some(session) => AuthState::Authenticated(session.user.clone()),
            None => AuthState::Unauthenticated,
        }
    }

    fn publish(&self, slot: &Slot) {
        self.inner.state_tx.send_replace(Self::state_of(slot));
    }
}
