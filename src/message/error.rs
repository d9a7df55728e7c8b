//! Error types for message adaptation.
//!
//! Uses `thiserror` for ergonomic error handling with typed variants
//! that can be inspected by callers. Pass-through cases (unknown message
//! types, unregistered version pairs) are never errors.

use thiserror::Error;

/// Result type for adaptation operations.
pub type AdaptResult<T> = Result<T, AdaptError>;

/// Errors that can occur while rewriting a message between protocol versions.
///
/// A caller receiving any of these should treat the message as
/// undeliverable to the target version; a half-rewritten message is never
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdaptError {
    /// A transform needed a content field that is absent.
    #[error("{msg_type} content is missing required field '{field}'")]
    MissingField {
        /// The message type being adapted.
        msg_type: String,
        /// The absent field.
        field: String,
    },

    /// A content field is present but has the wrong JSON type.
    #[error("{msg_type} content field '{field}' is invalid: expected {expected}")]
    InvalidField {
        /// The message type being adapted.
        msg_type: String,
        /// The offending field.
        field: String,
        /// Description of the expected shape.
        expected: &'static str,
    },

    /// The message carries data this direction cannot translate.
    #[error("adapting {msg_type} is not supported: {reason}")]
    NotSupported {
        /// The message type being adapted.
        msg_type: String,
        /// Why the message cannot be adapted.
        reason: String,
    },

    /// The header declares a version whose major segment is not an integer.
    #[error("invalid protocol version in header: '{0}'")]
    InvalidVersion(String),

    /// The message does not have the basic wire shape.
    #[error("malformed message: {0}")]
    MalformedMessage(String),
}

impl AdaptError {
    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(msg_type: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            msg_type: msg_type.into(),
            field: field.into(),
        }
    }

    /// Creates an invalid field error.
    #[must_use]
    pub fn invalid_field(
        msg_type: impl Into<String>,
        field: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::InvalidField {
            msg_type: msg_type.into(),
            field: field.into(),
            expected,
        }
    }

    /// Creates a not supported error.
    #[must_use]
    pub fn not_supported(msg_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotSupported {
            msg_type: msg_type.into(),
            reason: reason.into(),
        }
    }

    /// Creates a malformed message error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedMessage(message.into())
    }
}
