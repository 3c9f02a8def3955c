// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric descriptions and recording helpers.
//!
//! These write to whichever recorder is current. [`crate::EventMetrics`]
//! scopes them to its own recorder.

use std::time::Duration;

use metrics::{Unit, describe_counter, describe_histogram};

pub const ARI_EVENTS_TOTAL: &str = "callctl_ari_events_total";
pub const ARI_EVENT_PROCESS_SECONDS: &str = "callctl_ari_event_process_seconds";
pub const MESSAGES_TOTAL: &str = "callctl_messages_total";
pub const MESSAGE_ERRORS_TOTAL: &str = "callctl_message_errors_total";

/// Register all callctl metric descriptions.
pub fn register_metrics() {
    describe_counter!(ARI_EVENTS_TOTAL, "Engine events handled");
    describe_histogram!(
        ARI_EVENT_PROCESS_SECONDS,
        Unit::Seconds,
        "Time spent parsing and handling one engine event"
    );
    describe_counter!(MESSAGES_TOTAL, "Bus messages consumed");
    describe_counter!(MESSAGE_ERRORS_TOTAL, "Bus messages whose processing failed");
}

/// Record one handled engine event and its processing time.
pub fn record_event(asterisk_id: &str, event_type: &str, elapsed: Duration) {
    metrics::counter!(
        ARI_EVENTS_TOTAL,
        "asterisk_id" => asterisk_id.to_string(),
        "type" => event_type.to_string()
    )
    .increment(1);
    metrics::histogram!(
        ARI_EVENT_PROCESS_SECONDS,
        "asterisk_id" => asterisk_id.to_string(),
        "type" => event_type.to_string()
    )
    .record(elapsed.as_secs_f64());
}

/// Record a consumed bus message.
pub fn record_message(publisher: &str, message_type: &str) {
    metrics::counter!(
        MESSAGES_TOTAL,
        "publisher" => publisher.to_string(),
        "type" => message_type.to_string()
    )
    .increment(1);
}

/// Record a bus message whose processing returned an error.
pub fn record_message_error(publisher: &str, message_type: &str) {
    metrics::counter!(
        MESSAGE_ERRORS_TOTAL,
        "publisher" => publisher.to_string(),
        "type" => message_type.to_string()
    )
    .increment(1);
}
