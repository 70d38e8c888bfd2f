//! Error taxonomy for calls into the remote data source.

use thiserror::Error;

/// Message used when nothing more specific is available.
pub const GENERIC_ERROR: &str = "An error occurred";

/// Failure of a remote data source call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Connectivity, DNS, TLS or timeout failure; no response was received.
    #[error("Network error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("Request failed with status code {status}")]
    Status { status: u16, message: Option<String> },

    /// The server rejected the bearer token (HTTP 401).
    #[error("Request failed with status code 401")]
    Unauthorized { message: Option<String> },

    /// The response body was not the JSON we expected.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build a status error, keeping the server's `message` if it sent one.
    pub fn status(status: u16, message: Option<String>) -> Self {
        if status == 401 {
            Self::Unauthorized { message }
        } else {
            Self::Status { status, message }
        }
    }

    /// The `message` field of the server's error body, when present and non-empty.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } | Self::Unauthorized { message } => {
                message.as_deref().filter(|m| !m.is_empty())
            }
            _ => None,
        }
    }

    /// Most specific human-readable message: server message, then the error
    /// itself, then [`GENERIC_ERROR`] when the underlying cause carried no text.
    pub fn user_message(&self) -> String {
        if let Some(message) = self.server_message() {
            return message.to_string();
        }
        match self {
            Self::Transport(cause) | Self::Decode(cause) if cause.trim().is_empty() => {
                GENERIC_ERROR.to_string()
            }
            _ => self.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            Self::status(status.as_u16(), None)
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_wins() {
        let err = ApiError::status(400, Some("Email already registered".to_string()));
        assert_eq!(err.server_message(), Some("Email already registered"));
        assert_eq!(err.user_message(), "Email already registered");
    }

    #[test]
    fn test_falls_back_to_display() {
        let err = ApiError::status(500, None);
        assert_eq!(err.server_message(), None);
        assert_eq!(err.user_message(), "Request failed with status code 500");

        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.user_message(), "Network error: connection refused");
    }

    #[test]
    fn test_blank_cause_uses_generic_message() {
        assert_eq!(ApiError::Transport(String::new()).user_message(), GENERIC_ERROR);
        assert_eq!(ApiError::Decode("  ".to_string()).user_message(), "An error occurred");
    }

    #[test]
    fn test_empty_server_message_is_ignored() {
        let err = ApiError::status(422, Some(String::new()));
        assert_eq!(err.server_message(), None);
        assert_eq!(err.user_message(), "Request failed with status code 422");
    }

    #[test]
    fn test_401_maps_to_unauthorized() {
        let err = ApiError::status(401, Some("Invalid credentials".to_string()));
        assert!(err.is_unauthorized());
        assert_eq!(err.server_message(), Some("Invalid credentials"));
    }
}
