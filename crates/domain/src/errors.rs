//! Error types used throughout the workspace

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Fraplin
///
/// Variants carry a human readable message only, which keeps the type
/// `Clone` so a single failed fetch can be handed to every waiter that
/// shared it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum FraplinError {
    /// The HTTP call did not complete or returned a non-success status.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response was missing a required field or had the wrong shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The authority server rejected the token exchange.
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FraplinError {
    /// Stable label suitable for structured log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Decode(_) => "decode",
            Self::Auth(_) => "auth",
            Self::Config(_) => "config",
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for Fraplin operations
pub type Result<T> = std::result::Result<T, FraplinError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category_prefix() {
        let err = FraplinError::Transport("GET /api/resource/DocType returned 502".into());
        assert_eq!(err.to_string(), "Transport error: GET /api/resource/DocType returned 502");

        let err = FraplinError::Auth("site login rejected".into());
        assert_eq!(err.to_string(), "Authentication error: site login rejected");
    }

    #[test]
    fn serializes_with_type_tag() {
        let err = FraplinError::Decode("missing field `name`".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Decode");
        assert_eq!(json["message"], "missing field `name`");
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(FraplinError::Transport(String::new()).label(), "transport");
        assert_eq!(FraplinError::Decode(String::new()).label(), "decode");
        assert_eq!(FraplinError::Auth(String::new()).label(), "auth");
        assert_eq!(FraplinError::InvalidInput(String::new()).label(), "invalid_input");
    }
}
