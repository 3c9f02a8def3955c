// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON-lines replay of captured bus traffic into a [`MemoryQueue`].
//!
//! Each non-empty line is one message:
//!
//! ```text
//! {"publisher":"asterisk-proxy","type":"ari_event","data_type":"application/json","data":{...}}
//! ```
//!
//! `data` is an embedded JSON value. A JSON string is taken as the
//! already-serialized payload. Lines starting with `#` are comments.

use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use callctl_core::{CallctlError, Message};

use crate::queue::MemoryQueue;

#[derive(Debug, Deserialize)]
struct WireMessage {
    publisher: String,
    #[serde(rename = "type")]
    message_type: String,
    #[serde(default)]
    data_type: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl WireMessage {
    fn into_message(self) -> Result<Message, serde_json::Error> {
        let data = match self.data {
            serde_json::Value::String(s) => s.into_bytes(),
            serde_json::Value::Null => Vec::new(),
            other => serde_json::to_vec(&other)?,
        };
        Ok(Message {
            publisher: self.publisher,
            message_type: self.message_type,
            data_type: self.data_type,
            data,
        })
    }
}

/// Decodes one feeder line.
pub fn parse_line(line: &str) -> Result<Message, CallctlError> {
    let wire: WireMessage = serde_json::from_str(line)?;
    Ok(wire.into_message()?)
}

/// Outcome of a feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    /// Messages accepted by at least one queue.
    pub published: usize,
    /// Messages from unbound publishers.
    pub discarded: usize,
    /// Lines that did not decode.
    pub malformed: usize,
}

/// Publishes every line of `reader` into `queue`.
///
/// Malformed lines are logged and skipped. Read and publish failures end
/// the feed.
pub async fn feed_lines<R>(reader: R, queue: &MemoryQueue) -> Result<FeedStats, CallctlError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut stats = FeedStats::default();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await.map_err(|e| CallctlError::Queue {
        message: "failed to read feeder input".to_string(),
        source: Some(Box::new(e)),
    })? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let message = match parse_line(line) {
            Ok(message) => message,
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping malformed feeder line");
                stats.malformed += 1;
                continue;
            }
        };

        if queue.publish(message).await? == 0 {
            stats.discarded += 1;
        } else {
            stats.published += 1;
        }
    }

    debug!(
        published = stats.published,
        discarded = stats.discarded,
        malformed = stats.malformed,
        "feeder input exhausted"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use callctl_core::MessageQueue;

    use super::*;

    #[test]
    fn embedded_object_is_serialized() {
        let msg = parse_line(
            r#"{"publisher":"fleet-manager","type":"pod_deleted","data_type":"application/json","data":{"name":"asterisk-call-0"}}"#,
        )
        .unwrap();
        assert_eq!(msg.publisher, "fleet-manager");
        assert_eq!(msg.message_type, "pod_deleted");
        let data: serde_json::Value = serde_json::from_slice(&msg.data).unwrap();
        assert_eq!(data["name"], "asterisk-call-0");
    }

    #[test]
    fn string_data_is_taken_verbatim() {
        let msg =
            parse_line(r#"{"publisher":"p","type":"t","data":"{\"type\":\"StasisEnd\"}"}"#).unwrap();
        assert_eq!(msg.data, br#"{"type":"StasisEnd"}"#);
        assert_eq!(msg.data_type, "");
    }

    #[test]
    fn missing_publisher_is_rejected() {
        let err = parse_line(r#"{"type":"ari_event","data":{}}"#).unwrap_err();
        assert!(matches!(err, CallctlError::Decode { .. }));
    }

    #[tokio::test]
    async fn feed_counts_outcomes() {
        let queue = MemoryQueue::new();
        queue.declare_queue("q").await.unwrap();
        queue.subscribe("q", "fleet-manager").await.unwrap();

        let input = concat!(
            "# captured 2020-05-09\n",
            "{\"publisher\":\"fleet-manager\",\"type\":\"pod_deleted\",\"data\":{\"name\":\"a\"}}\n",
            "\n",
            "{\"publisher\":\"billing-manager\",\"type\":\"x\",\"data\":{}}\n",
            "not json\n",
        );
        let stats = feed_lines(input.as_bytes(), &queue).await.unwrap();
        assert_eq!(
            stats,
            FeedStats {
                published: 1,
                discarded: 1,
                malformed: 1
            }
        );
    }
}
