// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel persistence contract.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::CallctlError;
use crate::types::{Channel, ChannelState, ChannelType, Direction, HangupCause, NewChannel};

/// Owner of channel rows.
///
/// Implementations provide per-row atomicity; the event handler never locks
/// rows itself.
#[async_trait]
pub trait ChannelHandler: Send + Sync {
    /// Creates a channel row.
    async fn create(&self, channel: NewChannel) -> Result<Channel, CallctlError>;

    /// Returns the channel, ended or not.
    async fn get(&self, id: &str) -> Result<Channel, CallctlError>;

    /// Logically ends the channel, recording its hangup cause.
    async fn delete(&self, id: &str, cause: HangupCause) -> Result<Channel, CallctlError>;

    /// Sets or clears the bridge back-reference.
    async fn update_bridge_id(
        &self,
        id: &str,
        bridge_id: Option<&str>,
    ) -> Result<Channel, CallctlError>;

    /// Sets or clears the active playback id.
    async fn update_playback_id(
        &self,
        id: &str,
        playback_id: Option<&str>,
    ) -> Result<Channel, CallctlError>;

    async fn set_data_item(&self, id: &str, key: &str, value: &str) -> Result<(), CallctlError>;

    /// Sets or clears the stasis application name.
    async fn update_stasis_name(
        &self,
        id: &str,
        name: Option<&str>,
    ) -> Result<Channel, CallctlError>;

    /// Records application entry: the application name and its arguments,
    /// merged into the channel's stasis data.
    async fn update_stasis_info(
        &self,
        id: &str,
        name: &str,
        args: &HashMap<String, String>,
    ) -> Result<Channel, CallctlError>;

    /// Resolves the channel type. A second, different resolution is a
    /// [`CallctlError::Conflict`].
    async fn set_type(&self, id: &str, channel_type: ChannelType) -> Result<(), CallctlError>;

    async fn set_direction(&self, id: &str, direction: Direction) -> Result<(), CallctlError>;

    /// Applies an engine state change and returns the updated row.
    async fn update_state(&self, id: &str, state: ChannelState) -> Result<Channel, CallctlError>;

    /// Requests a hangup of a channel whose engine is looked up from its row.
    async fn hangup(&self, id: &str, cause: HangupCause) -> Result<(), CallctlError>;

    /// Requests a hangup on a known engine instance without touching the row.
    async fn hangup_with_engine_id(
        &self,
        asterisk_id: &str,
        id: &str,
        cause: HangupCause,
    ) -> Result<(), CallctlError>;
}
