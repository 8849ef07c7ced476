//! HTTP client for the ledger backend.
//!
//! Every request goes through [`ApiClient::send`], which attaches the bearer
//! token of the injected session and turns any 401 into a session
//! invalidation plus a [`SessionEvent::Unauthorized`] broadcast. The client
//! never navigates; whoever owns the views subscribes to the events.

pub mod accounts;
pub mod auth;
pub mod categories;
mod error;
pub mod transactions;

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;

pub use self::error::ApiError;
use self::error::extract_message;
use crate::config::Config;
use crate::session::SessionHandle;

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("finledger/", env!("CARGO_PKG_VERSION"));

const EVENT_CAPACITY: usize = 16;

/// Session-level events emitted by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The backend rejected the current token on `path`.
    Unauthorized { path: String },
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionHandle,
    events: broadcast::Sender<SessionEvent>,
}

impl ApiClient {
    /// Creates a client against `base_url` using the given session.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        base_url: &str,
        session: SessionHandle,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| ApiError::Request(format!("Failed to build HTTP client: {err}")))?;

        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            http,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            session,
            events,
        })
    }

    /// Creates a client from config (base URL + timeout).
    ///
    /// # Errors
    /// Returns an error if the configured base URL is invalid.
    pub fn from_config(config: &Config, session: SessionHandle) -> anyhow::Result<Self> {
        let base_url = config.effective_base_url()?;
        Ok(Self::new(&base_url, session, config.request_timeout())?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Subscribes to session events (e.g. unauthorized responses).
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        decode(response).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        decode(response).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::PUT, path, Some(body)).await?;
        decode(response).await
    }

    /// Sends a bodiless PUT (used for query-parameter updates).
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send::<()>(Method::PUT, path, None).await?;
        decode(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send::<()>(Method::DELETE, path, None).await?;
        Ok(())
    }

    /// Sends a request and maps non-success statuses to errors.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.build_url(path);
        let credentials = self.session.credentials();

        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = credentials.token.as_deref() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, %url, authenticated = credentials.token.is_some(), "sending request");

        let response = request
            .send()
            .await
            .map_err(|err| ApiError::from_transport(&err))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_message(&body);

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized(path, credentials.generation);
            return Err(ApiError::Unauthorized { message });
        }

        tracing::debug!(%method, %url, status = status.as_u16(), "request failed");
        Err(ApiError::Http {
            status: status.as_u16(),
            message,
        })
    }

    fn handle_unauthorized(&self, path: &str, generation: u64) {
        // A rejection of an older session must not undo a newer login.
        if !self.session.invalidate(generation) {
            return;
        }
        tracing::warn!(path, "backend rejected the session; logged out");
        // No subscribers is fine.
        let _ = self.events.send(SessionEvent::Unauthorized {
            path: path.to_string(),
        });
    }

    fn build_url(&self, path: &str) -> String {
        let path = path.trim();
        if self.base_url.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}
