// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message bus contract used by the dispatch pipeline.

use async_trait::async_trait;

use crate::error::CallctlError;
use crate::types::Message;

#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Declares the named queue, creating it if needed.
    async fn declare_queue(&self, queue: &str) -> Result<(), CallctlError>;

    /// Binds the queue to everything `publisher` emits.
    async fn subscribe(&self, queue: &str, publisher: &str) -> Result<(), CallctlError>;

    /// Waits for the next message. `Ok(None)` means the queue was closed.
    async fn receive(&self, queue: &str) -> Result<Option<Message>, CallctlError>;
}
