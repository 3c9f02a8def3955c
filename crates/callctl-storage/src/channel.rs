// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel rows keyed by channel id.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use callctl_core::{
    CallctlError, Channel, ChannelHandler, ChannelState, ChannelType, Direction, HangupCause,
    NewChannel, RequestHandler,
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, warn};

/// Channel store. Ended channels stay readable until a purge removes them.
pub struct ChannelStore {
    rows: DashMap<String, Channel>,
    requests: Arc<dyn RequestHandler>,
}

impl ChannelStore {
    /// Creates an empty store that sends hangups through `requests`.
    pub fn new(requests: Arc<dyn RequestHandler>) -> Self {
        Self {
            rows: DashMap::new(),
            requests,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drops rows that ended at or before `cutoff`. Returns how many went.
    pub fn purge_ended_before(&self, cutoff: DateTime<Utc>) -> usize {
        let before = self.rows.len();
        self.rows.retain(|_, row| !row.ended_before(cutoff));
        let purged = before.saturating_sub(self.rows.len());
        if purged > 0 {
            debug!(purged, cutoff = %cutoff, "purged ended channels");
        }
        purged
    }

    /// Drops rows that ended more than `retention` ago.
    pub fn purge_expired(&self, retention: Duration) -> usize {
        let cutoff = chrono::Duration::from_std(retention)
            .ok()
            .and_then(|retention| Utc::now().checked_sub_signed(retention));
        match cutoff {
            Some(cutoff) => self.purge_ended_before(cutoff),
            None => 0,
        }
    }

    /// Applies `f` to the row while holding its shard lock and returns the
    /// updated row.
    fn update<F>(&self, id: &str, f: F) -> Result<Channel, CallctlError>
    where
        F: FnOnce(&mut Channel) -> Result<(), CallctlError>,
    {
        let mut row = self
            .rows
            .get_mut(id)
            .ok_or_else(|| CallctlError::not_found("channel", id))?;
        f(&mut row)?;
        Ok(row.clone())
    }
}

#[async_trait]
impl ChannelHandler for ChannelStore {
    async fn create(&self, channel: NewChannel) -> Result<Channel, CallctlError> {
        match self.rows.entry(channel.id.clone()) {
            Entry::Occupied(_) => Err(CallctlError::Conflict(format!(
                "channel {} already exists",
                channel.id
            ))),
            Entry::Vacant(slot) => {
                let row = Channel::new(channel, Utc::now());
                debug!(channel_id = %row.id, tech = %row.tech, "channel created");
                Ok(slot.insert(row).clone())
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Channel, CallctlError> {
        self.rows
            .get(id)
            .map(|row| row.clone())
            .ok_or_else(|| CallctlError::not_found("channel", id))
    }

    async fn delete(&self, id: &str, cause: HangupCause) -> Result<Channel, CallctlError> {
        self.update(id, |row| {
            if row.tm_end.is_none() {
                row.tm_end = Some(Utc::now());
                row.hangup_cause = cause;
            }
            Ok(())
        })
    }

    async fn update_bridge_id(
        &self,
        id: &str,
        bridge_id: Option<&str>,
    ) -> Result<Channel, CallctlError> {
        self.update(id, |row| {
            row.bridge_id = bridge_id.map(str::to_string);
            Ok(())
        })
    }

    async fn update_playback_id(
        &self,
        id: &str,
        playback_id: Option<&str>,
    ) -> Result<Channel, CallctlError> {
        self.update(id, |row| {
            row.playback_id = playback_id.map(str::to_string);
            Ok(())
        })
    }

    async fn set_data_item(&self, id: &str, key: &str, value: &str) -> Result<(), CallctlError> {
        self.update(id, |row| {
            row.data.insert(key.to_string(), value.to_string());
            Ok(())
        })
        .map(|_| ())
    }

    async fn update_stasis_name(
        &self,
        id: &str,
        name: Option<&str>,
    ) -> Result<Channel, CallctlError> {
        self.update(id, |row| {
            row.stasis_name = name.map(str::to_string);
            Ok(())
        })
    }

    async fn update_stasis_info(
        &self,
        id: &str,
        name: &str,
        args: &HashMap<String, String>,
    ) -> Result<Channel, CallctlError> {
        self.update(id, |row| {
            row.stasis_name = Some(name.to_string());
            row.stasis_data
                .extend(args.iter().map(|(k, v)| (k.clone(), v.clone())));
            Ok(())
        })
    }

    async fn set_type(&self, id: &str, channel_type: ChannelType) -> Result<(), CallctlError> {
        self.update(id, |row| {
            if row.channel_type == channel_type {
                return Ok(());
            }
            if row.channel_type != ChannelType::None {
                return Err(CallctlError::Conflict(format!(
                    "channel {id} type already resolved as {}",
                    row.channel_type
                )));
            }
            row.channel_type = channel_type;
            Ok(())
        })
        .map(|_| ())
    }

    async fn set_direction(&self, id: &str, direction: Direction) -> Result<(), CallctlError> {
        self.update(id, |row| {
            row.direction = direction;
            Ok(())
        })
        .map(|_| ())
    }

    async fn update_state(&self, id: &str, state: ChannelState) -> Result<Channel, CallctlError> {
        let now = Utc::now();
        self.update(id, |row| {
            row.state = state;
            match state {
                ChannelState::Up => {
                    row.tm_answer.get_or_insert(now);
                }
                ChannelState::Ring | ChannelState::Ringing => {
                    row.tm_ringing.get_or_insert(now);
                }
                _ => {}
            }
            Ok(())
        })
    }

    async fn hangup(&self, id: &str, cause: HangupCause) -> Result<(), CallctlError> {
        let asterisk_id = self.get(id).await?.asterisk_id;
        self.hangup_with_engine_id(&asterisk_id, id, cause).await
    }

    async fn hangup_with_engine_id(
        &self,
        asterisk_id: &str,
        id: &str,
        cause: HangupCause,
    ) -> Result<(), CallctlError> {
        debug!(asterisk_id, channel_id = id, cause = %cause, "requesting channel hangup");
        self.requests
            .channel_hangup(asterisk_id, id, cause, Duration::ZERO)
            .await
            .inspect_err(|e| {
                warn!(channel_id = id, error = %e, "hangup request failed");
            })
    }
}
