// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue consumer loop with bounded concurrency.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use callctl_config::QueueConfig;
use callctl_core::{CallctlError, MessageQueue};

use crate::processor::Processor;

/// Consumes one queue, processing up to `max_in_flight` messages at once.
pub struct Pipeline {
    queue: Arc<dyn MessageQueue>,
    config: QueueConfig,
    processor: Arc<Processor>,
}

impl Pipeline {
    pub fn new(queue: Arc<dyn MessageQueue>, config: QueueConfig, processor: Processor) -> Self {
        Self {
            queue,
            config,
            processor: Arc::new(processor),
        }
    }

    /// Declares the queue and binds it to every configured publisher.
    pub async fn start(&self) -> Result<(), CallctlError> {
        self.queue.declare_queue(&self.config.name).await?;
        for publisher in self.config.publishers.all() {
            self.queue.subscribe(&self.config.name, publisher).await?;
        }
        info!(
            queue = %self.config.name,
            max_in_flight = self.config.max_in_flight,
            "queue declared and subscribed"
        );
        Ok(())
    }

    /// Runs until `cancel` fires or the queue closes, then waits for
    /// in-flight messages to finish.
    ///
    /// Processing errors never stop the loop. Receive errors do.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), CallctlError> {
        self.start().await?;

        let permits = Arc::new(Semaphore::new(self.config.max_in_flight.max(1)));
        let mut tasks = JoinSet::new();
        let mut outcome = Ok(());

        loop {
            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping pipeline");
                    break;
                }
                permit = permits.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(e) => {
                        outcome = Err(CallctlError::Internal(format!("semaphore closed: {e}")));
                        break;
                    }
                },
            };

            let received = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping pipeline");
                    break;
                }
                received = self.queue.receive(&self.config.name) => received,
            };

            let message = match received {
                Ok(Some(message)) => message,
                Ok(None) => {
                    info!(queue = %self.config.name, "queue closed, stopping pipeline");
                    break;
                }
                Err(e) => {
                    error!(queue = %self.config.name, error = %e, "queue receive failed");
                    outcome = Err(e);
                    break;
                }
            };

            let processor = self.processor.clone();
            tasks.spawn(async move {
                processor.consume(&message).await;
                drop(permit);
            });

            while let Some(joined) = tasks.try_join_next() {
                log_join(joined);
            }
        }

        debug!(in_flight = tasks.len(), "draining in-flight messages");
        while let Some(joined) = tasks.join_next().await {
            log_join(joined);
        }

        info!("pipeline stopped");
        outcome
    }
}

fn log_join(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        error!(error = %e, "message task panicked");
    }
}
