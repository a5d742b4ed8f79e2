//! Error types for link encoding
//!
//! Every failure is terminal for the call that produced it:
//! - **MissingType**: the record has no string `type` key.
//! - **UnsupportedType**: `type` names a protocol this crate does not encode.
//! - **Decode**: a required key is missing, or a value cannot be coerced to the field's type.
//! - **Serialization**: the VMess JSON payload could not be written.

use std::fmt;

/// Result type for link encoding operations
pub type Result<T> = std::result::Result<T, LinkError>;

/// Errors that can occur while turning a record into a link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// The record carries no `type` key, or it is not a string
    MissingType,
    /// The `type` value is not one of `ss`, `ssr`, `vmess`, `trojan`
    UnsupportedType(String),
    /// A field could not be decoded from the record
    Decode {
        /// Record key of the offending field
        field: String,
        /// What went wrong
        reason: String,
    },
    /// Structured payload encoding failed (VMess JSON)
    Serialization(String),
}

impl LinkError {
    pub(crate) fn decode(field: &str, reason: impl Into<String>) -> Self {
        LinkError::Decode {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Record key of a [`LinkError::Decode`] error
    pub fn field(&self) -> Option<&str> {
        match self {
            LinkError::Decode { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::MissingType => write!(f, "Missing proxy type"),
            LinkError::UnsupportedType(t) => write!(f, "Unsupported proxy type: {}", t),
            LinkError::Decode { field, reason } => {
                write!(f, "Decode error in '{}': {}", field, reason)
            }
            LinkError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for LinkError {}

impl From<serde_json::Error> for LinkError {
    fn from(err: serde_json::Error) -> Self {
        LinkError::Serialization(err.to_string())
    }
}
