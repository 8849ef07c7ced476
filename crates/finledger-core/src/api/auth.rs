use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};
use crate::session::{Session, User};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub username_or_email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Body returned by both `/auth/login` and `/auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[serde(default, rename = "type")]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub username: String,
    pub email: String,
}

impl AuthResponse {
    pub fn into_session(self) -> Session {
        Session {
            token: self.token,
            user: User {
                user_id: self.user_id,
                username: self.username,
                email: self.email,
            },
        }
    }
}

impl ApiClient {
    /// `POST /auth/login`. Does not touch the session.
    ///
    /// # Errors
    /// Returns the backend rejection or a transport error.
    pub async fn login(&self, request: &LoginRequest<'_>) -> Result<AuthResponse, ApiError> {
        self.post("/auth/login", request).await
    }

    /// `POST /auth/register`. Does not touch the session.
    ///
    /// # Errors
    /// Returns the backend rejection or a transport error.
    pub async fn register(
        &self,
        request: &RegisterRequest<'_>,
    ) -> Result<AuthResponse, ApiError> {
        self.post("/auth/register", request).await
    }
}
