// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus metrics registry for the callctl event pipeline.
//!
//! Uses the metrics-rs facade with the Prometheus exporter. The recorder is
//! owned by an [`EventMetrics`] value and never installed globally, so
//! independent registries can coexist in one process.

pub mod recording;

use std::time::Duration;

use metrics_exporter_prometheus::{
    BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};

pub use recording::{
    ARI_EVENT_PROCESS_SECONDS, ARI_EVENTS_TOTAL, MESSAGE_ERRORS_TOTAL, MESSAGES_TOTAL,
};

/// Histogram buckets for event handling latency, in seconds.
pub const EVENT_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
];

/// Metrics registry passed to the dispatch pipeline.
pub struct EventMetrics {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl EventMetrics {
    pub fn new() -> Result<Self, BuildError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(ARI_EVENT_PROCESS_SECONDS.to_string()),
                EVENT_LATENCY_BUCKETS,
            )?
            .build_recorder();
        let handle = recorder.handle();
        let metrics = Self { recorder, handle };
        metrics.scoped(recording::register_metrics);

        tracing::debug!("prometheus metrics registry created");
        Ok(metrics)
    }

    /// Runs `f` with this registry as the current recorder.
    fn scoped<T>(&self, f: impl FnOnce() -> T) -> T {
        metrics::with_local_recorder(&self.recorder, f)
    }

    /// Counts one engine event and records how long it took.
    pub fn record_event(&self, asterisk_id: &str, event_type: &str, elapsed: Duration) {
        self.scoped(|| recording::record_event(asterisk_id, event_type, elapsed));
    }

    pub fn record_message(&self, publisher: &str, message_type: &str) {
        self.scoped(|| recording::record_message(publisher, message_type));
    }

    pub fn record_message_error(&self, publisher: &str, message_type: &str) {
        self.scoped(|| recording::record_message_error(publisher, message_type));
    }

    pub fn handle(&self) -> &PrometheusHandle {
        &self.handle
    }

    /// Render all collected metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}
