// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by every callctl crate.

use thiserror::Error;

/// Boxed source error carried by the struct variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type returned by collaborator traits and event handlers.
#[derive(Debug, Error)]
pub enum CallctlError {
    /// A message envelope or payload could not be decoded.
    #[error("decode error: {message}")]
    Decode {
        message: String,
        source: Option<BoxError>,
    },

    /// A referenced channel, bridge, or recording does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A downstream workflow or persistence call failed.
    #[error("collaborator error: {message}")]
    Collaborator {
        message: String,
        source: Option<BoxError>,
    },

    /// A SIP endpoint resource did not have the `extension@domain` shape.
    #[error("invalid endpoint resource: {0}")]
    InvalidResource(String),

    /// A channel entered the application without a resolvable context.
    #[error("no route for channel {channel_id}: {detail}")]
    NoRoute { channel_id: String, detail: String },

    /// A write would overwrite state that may only be set once.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Message queue failures (declare, bind, receive).
    #[error("queue error: {message}")]
    Queue {
        message: String,
        source: Option<BoxError>,
    },

    /// Configuration errors surfaced at runtime.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CallctlError {
    /// Shorthand for a [`CallctlError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Shorthand for a [`CallctlError::Collaborator`] without a source.
    pub fn collaborator(message: impl Into<String>) -> Self {
        Self::Collaborator {
            message: message.into(),
            source: None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for CallctlError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode {
            message: e.to_string(),
            source: Some(Box::new(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_formats_entity_and_id() {
        let err = CallctlError::not_found("channel", "abc");
        assert_eq!(err.to_string(), "channel not found: abc");
        assert!(err.is_not_found());
    }

    #[test]
    fn json_errors_become_decode_errors() {
        let err: CallctlError = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
        assert!(matches!(err, CallctlError::Decode { source: Some(_), .. }));
        assert!(!err.is_not_found());
    }
}
