// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call workflow contract.

use async_trait::async_trait;

use crate::error::CallctlError;
use crate::types::{Activeflow, Bridge, Channel, Customer, Pod};

/// Callbacks into the call workflow engine.
#[async_trait]
pub trait CallHandler: Send + Sync {
    async fn ari_channel_destroyed(&self, channel: &Channel) -> Result<(), CallctlError>;

    async fn ari_channel_dtmf_received(
        &self,
        channel: &Channel,
        digit: &str,
        duration_ms: i64,
    ) -> Result<(), CallctlError>;

    async fn ari_channel_left_bridge(
        &self,
        channel: &Channel,
        bridge: &Bridge,
    ) -> Result<(), CallctlError>;

    async fn ari_channel_state_change(&self, channel: &Channel) -> Result<(), CallctlError>;

    async fn ari_stasis_start(&self, channel: &Channel) -> Result<(), CallctlError>;

    async fn ari_playback_finished(
        &self,
        channel: &Channel,
        playback_id: &str,
    ) -> Result<(), CallctlError>;

    async fn customer_deleted(&self, customer: &Customer) -> Result<(), CallctlError>;

    async fn activeflow_updated(&self, activeflow: &Activeflow) -> Result<(), CallctlError>;

    async fn pod_deleted(&self, pod: &Pod) -> Result<(), CallctlError>;
}
