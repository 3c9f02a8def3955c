// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conference workflow contract.

use async_trait::async_trait;

use crate::error::CallctlError;
use crate::types::{Bridge, Channel, Customer};

/// Callbacks into the conference workflow engine.
#[async_trait]
pub trait ConfbridgeHandler: Send + Sync {
    async fn ari_bridge_destroyed(&self, bridge: &Bridge) -> Result<(), CallctlError>;

    async fn ari_channel_entered_bridge(
        &self,
        channel: &Channel,
        bridge: &Bridge,
    ) -> Result<(), CallctlError>;

    async fn ari_channel_left_bridge(
        &self,
        channel: &Channel,
        bridge: &Bridge,
    ) -> Result<(), CallctlError>;

    async fn ari_stasis_start(&self, channel: &Channel) -> Result<(), CallctlError>;

    async fn customer_deleted(&self, customer: &Customer) -> Result<(), CallctlError>;
}
