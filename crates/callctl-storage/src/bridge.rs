// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bridge rows keyed by bridge id.

use async_trait::async_trait;
use callctl_core::{Bridge, BridgeHandler, CallctlError, NewBridge};
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

/// Bridge store. Destroyed bridges are removed outright.
#[derive(Default)]
pub struct BridgeStore {
    rows: DashMap<String, Bridge>,
}

impl BridgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn update<F>(&self, id: &str, f: F) -> Result<Bridge, CallctlError>
    where
        F: FnOnce(&mut Bridge),
    {
        let mut row = self
            .rows
            .get_mut(id)
            .ok_or_else(|| CallctlError::not_found("bridge", id))?;
        f(&mut row);
        Ok(row.clone())
    }
}

#[async_trait]
impl BridgeHandler for BridgeStore {
    async fn create(&self, bridge: NewBridge) -> Result<Bridge, CallctlError> {
        match self.rows.entry(bridge.id.clone()) {
            Entry::Occupied(_) => Err(CallctlError::Conflict(format!(
                "bridge {} already exists",
                bridge.id
            ))),
            Entry::Vacant(slot) => {
                let row = Bridge::new(bridge, Utc::now());
                debug!(
                    bridge_id = %row.id,
                    reference_type = %row.reference_type,
                    "bridge created"
                );
                Ok(slot.insert(row).clone())
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Bridge, CallctlError> {
        self.rows
            .get(id)
            .map(|row| row.clone())
            .ok_or_else(|| CallctlError::not_found("bridge", id))
    }

    async fn delete(&self, id: &str) -> Result<(), CallctlError> {
        self.rows
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CallctlError::not_found("bridge", id))
    }

    async fn add_channel_id(&self, id: &str, channel_id: &str) -> Result<Bridge, CallctlError> {
        self.update(id, |row| {
            if !row.channel_ids.iter().any(|c| c == channel_id) {
                row.channel_ids.push(channel_id.to_string());
            }
        })
    }

    async fn remove_channel_id(
        &self,
        id: &str,
        channel_id: &str,
    ) -> Result<Bridge, CallctlError> {
        self.update(id, |row| row.channel_ids.retain(|c| c != channel_id))
    }
}
