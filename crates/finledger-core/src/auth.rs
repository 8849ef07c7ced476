//! Authentication state machine.
//!
//! `Loading` until [`AuthContext::hydrate`] reads durable storage, then
//! `Unauthenticated` or `Authenticated`. Login and register only change the
//! session when the backend accepts the credentials.

use thiserror::Error;
use tokio::sync::watch;

use crate::api::auth::{LoginRequest, RegisterRequest};
use crate::api::{ApiClient, ApiError};
use crate::session::storage::StorageError;
use crate::session::{AuthState, User};

const LOGIN_FAILED: &str = "Login failed.";
const REGISTRATION_FAILED: &str = "Registration failed.";

#[derive(Debug, Error)]
pub enum AuthError {
    /// A required field was empty; nothing was sent.
    #[error("{0}")]
    InvalidInput(&'static str),

    /// The backend refused the request or could not be reached. `message`
    /// is what the user sees; `cause` keeps the transport detail.
    #[error("{message}")]
    Rejected { message: String, cause: ApiError },

    /// The backend accepted but the session could not be stored.
    #[error("Signed in, but the session could not be saved: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    fn rejected(cause: ApiError, fallback: &str) -> Self {
        let message = match &cause {
            ApiError::Timeout | ApiError::Network(_) => cause.to_string(),
            _ => cause
                .backend_message()
                .map_or_else(|| fallback.to_string(), str::to_string),
        };
        AuthError::Rejected { message, cause }
    }
}

#[derive(Clone)]
pub struct AuthContext {
    api: ApiClient,
}

impl AuthContext {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Restores the persisted session without touching the network.
    pub fn hydrate(&self) -> AuthState {
        self.api.session().hydrate()
    }

    pub fn state(&self) -> AuthState {
        self.api.session().state()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.api.session().subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    pub fn user(&self) -> Option<User> {
        self.state().user().cloned()
    }

    /// Signs in with a username or email.
    ///
    /// # Errors
    /// Returns an error if a field is empty, the backend rejects the
    /// credentials, or the session cannot be stored. The session is left
    /// unchanged unless the call succeeds.
    pub async fn login(&self, username_or_email: &str, password: &str) -> Result<User, AuthError> {
        let username_or_email = username_or_email.trim();
        if username_or_email.is_empty() {
            return Err(AuthError::InvalidInput("Username or email is required."));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidInput("Password is required."));
        }

        let response = self
            .api
            .login(&LoginRequest {
                username_or_email,
                password,
            })
            .await
            .map_err(|err| AuthError::rejected(err, LOGIN_FAILED))?;

        let session = response.into_session();
        let user = session.user.clone();
        self.api.session().establish(session)?;
        tracing::info!(username = %user.username, "logged in");
        Ok(user)
    }

    /// Creates an account and signs in with it.
    ///
    /// # Errors
    /// Same as [`AuthContext::login`].
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() {
            return Err(AuthError::InvalidInput("Username is required."));
        }
        if email.is_empty() {
            return Err(AuthError::InvalidInput("Email is required."));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidInput("Password is required."));
        }

        let response = self
            .api
            .register(&RegisterRequest {
                username,
                email,
                password,
            })
            .await
            .map_err(|err| AuthError::rejected(err, REGISTRATION_FAILED))?;

        let session = response.into_session();
        let user = session.user.clone();
        self.api.session().establish(session)?;
        tracing::info!(username = %user.username, "registered");
        Ok(user)
    }

    /// Drops the session. The state is `Unauthenticated` afterwards even if
    /// durable storage could not be cleared.
    ///
    /// # Errors
    /// Returns an error if the stored session could not be removed.
    pub fn logout(&self) -> Result<(), StorageError> {
        let result = self.api.session().clear();
        tracing::info!("logged out");
        result
    }
}
