// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-message processing: classify, decode, hand off, and count.

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use callctl_ari::parse;
use callctl_core::{
    Activeflow, CallHandler, CallctlError, ConfbridgeHandler, Customer, Message, Pod,
};
use callctl_handler::AriEventHandler;
use callctl_prometheus::EventMetrics;

use crate::route::{Classifier, Route};

/// Processes one bus message at a time. Cheap to share across tasks.
pub struct Processor {
    classifier: Classifier,
    handler: Arc<dyn AriEventHandler>,
    calls: Arc<dyn CallHandler>,
    confbridges: Arc<dyn ConfbridgeHandler>,
    metrics: Option<Arc<EventMetrics>>,
}

impl Processor {
    pub fn new(
        classifier: Classifier,
        handler: Arc<dyn AriEventHandler>,
        calls: Arc<dyn CallHandler>,
        confbridges: Arc<dyn ConfbridgeHandler>,
    ) -> Self {
        Self {
            classifier,
            handler,
            calls,
            confbridges,
            metrics: None,
        }
    }

    /// Records pipeline metrics into `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<EventMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Processes `message`, logging and counting any failure.
    ///
    /// The message counts as consumed either way; nothing is retried.
    pub async fn consume(&self, message: &Message) {
        if let Some(m) = &self.metrics {
            m.record_message(&message.publisher, &message.message_type);
        }

        if let Err(e) = self.process(message).await {
            warn!(
                publisher = %message.publisher,
                message_type = %message.message_type,
                error = %e,
                "message processing failed"
            );
            if let Some(m) = &self.metrics {
                m.record_message_error(&message.publisher, &message.message_type);
            }
        }
    }

    /// Routes `message` and returns the outcome of its handler.
    pub async fn process(&self, message: &Message) -> Result<(), CallctlError> {
        match self
            .classifier
            .classify(&message.publisher, &message.message_type)
        {
            Route::AriEvent => self.ari_event(&message.data).await,
            Route::CustomerDeleted => {
                let customer: Customer = decode(message)?;
                let calls = self.calls.customer_deleted(&customer).await;
                let confbridges = self.confbridges.customer_deleted(&customer).await;
                calls.and(confbridges)
            }
            Route::ActiveflowUpdated => {
                let activeflow: Activeflow = decode(message)?;
                self.calls.activeflow_updated(&activeflow).await
            }
            Route::PodDeleted => {
                let pod: Pod = decode(message)?;
                self.calls.pod_deleted(&pod).await
            }
            Route::Drop => {
                debug!(
                    publisher = %message.publisher,
                    message_type = %message.message_type,
                    "unhandled message dropped"
                );
                Ok(())
            }
        }
    }

    async fn ari_event(&self, raw: &[u8]) -> Result<(), CallctlError> {
        let start = Instant::now();
        let (envelope, event) = parse(raw)?;

        let Some(event) = event else {
            debug!(event_type = %envelope.event_type, "unsupported event type");
            return Ok(());
        };

        let result = self.handler.handle(&event).await;

        if let Some(m) = &self.metrics {
            m.record_event(
                &envelope.asterisk_id,
                event.event_type().as_ref(),
                start.elapsed(),
            );
        }
        result
    }
}

fn decode<T: DeserializeOwned>(message: &Message) -> Result<T, CallctlError> {
    serde_json::from_slice(&message.data).map_err(|e| CallctlError::Decode {
        message: format!("{} payload: {e}", message.message_type),
        source: Some(Box::new(e)),
    })
}
