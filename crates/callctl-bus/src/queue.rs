// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process message queue.
//!
//! Queues are bound to publishers; [`MemoryQueue::publish`] delivers a
//! message to every queue bound to its publisher and discards it when none
//! is. Closing the queue lets consumers drain what is buffered, after which
//! `receive` returns `Ok(None)`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

use callctl_core::{CallctlError, Message, MessageQueue};

/// Buffered messages per queue before `publish` waits.
pub const DEFAULT_CAPACITY: usize = 1024;

struct Slot {
    publishers: HashSet<String>,
    tx: Option<mpsc::Sender<Message>>,
    rx: Arc<Mutex<mpsc::Receiver<Message>>>,
}

/// Tokio channel backed implementation of [`MessageQueue`].
pub struct MemoryQueue {
    capacity: usize,
    slots: Mutex<HashMap<String, Slot>>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Delivers `message` to every queue bound to its publisher.
    ///
    /// Returns the number of queues that accepted it. Zero means the
    /// publisher is unbound and the message was discarded.
    pub async fn publish(&self, message: Message) -> Result<usize, CallctlError> {
        let senders: Vec<_> = {
            let slots = self.slots.lock().await;
            slots
                .values()
                .filter(|slot| slot.publishers.contains(&message.publisher))
                .filter_map(|slot| slot.tx.clone())
                .collect()
        };

        if senders.is_empty() {
            debug!(
                publisher = %message.publisher,
                message_type = %message.message_type,
                "no queue bound to publisher, message discarded"
            );
            return Ok(0);
        }

        let mut delivered = 0;
        for tx in senders {
            tx.send(message.clone()).await.map_err(|e| CallctlError::Queue {
                message: "queue closed while publishing".to_string(),
                source: Some(Box::new(e)),
            })?;
            delivered += 1;
        }
        Ok(delivered)
    }

    /// Stops accepting messages. Buffered messages stay receivable.
    pub async fn close(&self) {
        let mut slots = self.slots.lock().await;
        for slot in slots.values_mut() {
            slot.tx = None;
        }
        debug!(queues = slots.len(), "memory queue closed");
    }
}

impl Default for MemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

fn unknown_queue(queue: &str) -> CallctlError {
    CallctlError::Queue {
        message: format!("queue `{queue}` is not declared"),
        source: None,
    }
}

#[async_trait]
impl MessageQueue for MemoryQueue {
    async fn declare_queue(&self, queue: &str) -> Result<(), CallctlError> {
        let mut slots = self.slots.lock().await;
        slots.entry(queue.to_string()).or_insert_with(|| {
            let (tx, rx) = mpsc::channel(self.capacity);
            Slot {
                publishers: HashSet::new(),
                tx: Some(tx),
                rx: Arc::new(Mutex::new(rx)),
            }
        });
        Ok(())
    }

    async fn subscribe(&self, queue: &str, publisher: &str) -> Result<(), CallctlError> {
        let mut slots = self.slots.lock().await;
        let slot = slots.get_mut(queue).ok_or_else(|| unknown_queue(queue))?;
        slot.publishers.insert(publisher.to_string());
        debug!(queue, publisher, "queue subscribed");
        Ok(())
    }

    async fn receive(&self, queue: &str) -> Result<Option<Message>, CallctlError> {
        // Release the map before waiting so publishers are never blocked.
        let rx = {
            let slots = self.slots.lock().await;
            slots
                .get(queue)
                .map(|slot| slot.rx.clone())
                .ok_or_else(|| unknown_queue(queue))?
        };
        let mut rx = rx.lock().await;
        Ok(rx.recv().await)
    }
}
