// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use callctl_ari::event::{BridgeCreated, BridgeDestroyed};
use callctl_ari::bridge_reference;
use callctl_core::{CallctlError, NewBridge};
use tracing::debug;

use crate::EventHandler;

impl EventHandler {
    pub(crate) async fn bridge_created(&self, e: &BridgeCreated) -> Result<(), CallctlError> {
        let reference = bridge_reference(&e.bridge.name);

        let bridge = self
            .bridges
            .create(NewBridge {
                id: e.bridge.id.clone(),
                asterisk_id: e.event.asterisk_id.clone(),
                name: e.bridge.name.clone(),
                bridge_type: e.bridge.bridge_type.clone(),
                technology: e.bridge.technology.clone(),
                bridge_class: e.bridge.bridge_class.clone(),
                creator: e.bridge.creator.clone(),
                video_mode: e.bridge.video_mode.clone(),
                channel_ids: e.bridge.channels.clone(),
                reference_type: reference.reference_type,
                reference_id: reference.reference_id,
            })
            .await?;

        debug!(
            bridge_id = %bridge.id,
            reference_type = %bridge.reference_type,
            "bridge registered"
        );
        Ok(())
    }

    pub(crate) async fn bridge_destroyed(&self, e: &BridgeDestroyed) -> Result<(), CallctlError> {
        let bridge = self.bridges.get(&e.bridge.id).await?;
        self.bridges.delete(&bridge.id).await?;

        self.confbridges.ari_bridge_destroyed(&bridge).await
    }
}
