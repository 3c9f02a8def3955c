// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use callctl_core::CallctlError;
use thiserror::Error;

use crate::event::EventType;

/// Failure to turn a raw message into an event.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The top-level envelope is not a valid event object.
    #[error("malformed event envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    /// The envelope names a known type but the payload does not match it.
    #[error("malformed {event_type} payload: {source}")]
    Payload {
        event_type: EventType,
        #[source]
        source: serde_json::Error,
    },
}

impl From<ParseError> for CallctlError {
    fn from(e: ParseError) -> Self {
        CallctlError::Decode {
            message: e.to_string(),
            source: Some(Box::new(e)),
        }
    }
}
