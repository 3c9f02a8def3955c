// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bridge persistence contract.

use async_trait::async_trait;

use crate::error::CallctlError;
use crate::types::{Bridge, NewBridge};

/// Owner of bridge rows and their member lists.
#[async_trait]
pub trait BridgeHandler: Send + Sync {
    async fn create(&self, bridge: NewBridge) -> Result<Bridge, CallctlError>;

    async fn get(&self, id: &str) -> Result<Bridge, CallctlError>;

    /// Removes the bridge; later lookups return [`CallctlError::NotFound`].
    async fn delete(&self, id: &str) -> Result<(), CallctlError>;

    /// Appends a member channel and returns the updated bridge.
    async fn add_channel_id(&self, id: &str, channel_id: &str) -> Result<Bridge, CallctlError>;

    /// Removes a member channel and returns the updated bridge.
    async fn remove_channel_id(&self, id: &str, channel_id: &str)
    -> Result<Bridge, CallctlError>;
}
