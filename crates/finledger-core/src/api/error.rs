use thiserror::Error;

/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered 401. The session has already been invalidated.
    #[error("{}", .message.as_deref().unwrap_or("Session expired or invalid. Please log in again."))]
    Unauthorized { message: Option<String> },

    #[error("{}", describe_http(.status, .message.as_deref()))]
    Http { status: u16, message: Option<String> },

    #[error("Request timed out. Please try again.")]
    Timeout,

    #[error("Unable to reach the server: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    Request(String),
}

impl ApiError {
    /// Message supplied by the backend, if it sent one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message } => message.as_deref(),
            ApiError::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_builder() {
            ApiError::Request(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn describe_http(status: &u16, message: Option<&str>) -> String {
    match message {
        Some(message) => message.to_string(),
        None => format!("Request failed with status {status}."),
    }
}

/// Extracts a user-facing message from an error body.
///
/// Prefers the `message` field of a JSON body; otherwise returns the trimmed
/// and truncated text. Returns `None` for an empty body.
pub(crate) fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(message) = value.get("message").and_then(serde_json::Value::as_str) {
            let message = message.trim();
            if !message.is_empty() {
                return Some(message.chars().take(MAX_ERROR_CHARS).collect());
            }
        }
    }

    Some(trimmed.chars().take(MAX_ERROR_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_prefers_json_field() {
        assert_eq!(
            extract_message(r#"{"message":"Invalid credentials","status":401}"#).as_deref(),
            Some("Invalid credentials")
        );
    }

    #[test]
    fn test_extract_message_falls_back_to_text() {
        assert_eq!(
            extract_message("  Bad Gateway \n").as_deref(),
            Some("Bad Gateway")
        );
        assert_eq!(extract_message("   "), None);
    }

    #[test]
    fn test_extract_message_truncates() {
        let long = "x".repeat(500);
        assert_eq!(extract_message(&long).unwrap().len(), MAX_ERROR_CHARS);
    }

    #[test]
    fn test_unauthorized_display_uses_backend_message() {
        let err = ApiError::Unauthorized {
            message: Some("Invalid credentials".to_string()),
        };
        assert_eq!(err.to_string(), "Invalid credentials");

        let err = ApiError::Unauthorized { message: None };
        assert!(err.to_string().contains("log in again"));
    }

    #[test]
    fn test_http_display_falls_back_to_status() {
        let err = ApiError::Http {
            status: 503,
            message: None,
        };
        assert_eq!(err.to_string(), "Request failed with status 503.");
        assert_eq!(err.backend_message(), None);
    }
}
