// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use callctl_ari::channel_tech;
use callctl_ari::event::{
    ChannelCreated, ChannelDestroyed, ChannelDtmfReceived, ChannelEnteredBridge,
    ChannelLeftBridge, ChannelStateChange, ChannelVarset,
};
use callctl_core::{
    BridgeReferenceType, CallctlError, ChannelType, Dialplan, Direction, HangupCause, NewChannel,
};
use tracing::{debug, info};

use crate::EventHandler;

/// Channel variable that resolves the channel type.
pub const VAR_TYPE: &str = "VB-TYPE";

/// Channel variable that carries the call direction.
pub const VAR_DIRECTION: &str = "VB-DIRECTION";

impl EventHandler {
    pub(crate) async fn channel_created(&self, e: &ChannelCreated) -> Result<(), CallctlError> {
        let ch = &e.channel;
        let channel = self
            .channels
            .create(NewChannel {
                id: ch.id.clone(),
                asterisk_id: e.event.asterisk_id.clone(),
                name: ch.name.clone(),
                tech: channel_tech(&ch.name),
                channel_type: ChannelType::None,
                state: ch.state,
                source_name: ch.caller.name.clone(),
                source_number: ch.caller.number.clone(),
                destination_name: ch.connected.name.clone(),
                destination_number: ch.dialplan.exten.clone(),
                dialplan: Dialplan {
                    context: ch.dialplan.context.clone(),
                    exten: ch.dialplan.exten.clone(),
                    priority: ch.dialplan.priority,
                    app_name: ch.dialplan.app_name.clone(),
                    app_data: ch.dialplan.app_data.clone(),
                },
            })
            .await?;

        debug!(channel_id = %channel.id, tech = %channel.tech, "channel registered");
        Ok(())
    }

    pub(crate) async fn channel_destroyed(&self, e: &ChannelDestroyed) -> Result<(), CallctlError> {
        let channel = self.channels.delete(&e.channel.id, e.cause).await?;

        match channel.channel_type {
            ChannelType::Call => self.calls.ari_channel_destroyed(&channel).await,
            ChannelType::Confbridge
            | ChannelType::Join
            | ChannelType::External
            | ChannelType::Recording
            | ChannelType::Application => Ok(()),
            ChannelType::None => {
                info!(
                    channel_id = %channel.id,
                    cause = %e.cause,
                    "destroyed channel never resolved a type"
                );
                Ok(())
            }
        }
    }

    pub(crate) async fn channel_dtmf_received(
        &self,
        e: &ChannelDtmfReceived,
    ) -> Result<(), CallctlError> {
        let channel = self.channels.get(&e.channel.id).await?;
        self.calls
            .ari_channel_dtmf_received(&channel, &e.digit, e.duration_ms)
            .await
    }

    pub(crate) async fn channel_entered_bridge(
        &self,
        e: &ChannelEnteredBridge,
    ) -> Result<(), CallctlError> {
        let asterisk_id = &e.event.asterisk_id;
        let channel_id = &e.channel.id;

        let updated = self
            .channels
            .update_bridge_id(channel_id, Some(&e.bridge.id))
            .await;
        let channel = self
            .hangup_on_err(asterisk_id, channel_id, HangupCause::INTERWORKING, updated)
            .await?;

        let added = self.bridges.add_channel_id(&e.bridge.id, channel_id).await;
        let bridge = self
            .hangup_on_err(asterisk_id, channel_id, HangupCause::INTERWORKING, added)
            .await?;

        if channel.channel_type != ChannelType::Confbridge {
            return Ok(());
        }
        self.confbridges
            .ari_channel_entered_bridge(&channel, &bridge)
            .await
    }

    pub(crate) async fn channel_left_bridge(
        &self,
        e: &ChannelLeftBridge,
    ) -> Result<(), CallctlError> {
        let asterisk_id = &e.event.asterisk_id;
        let channel_id = &e.channel.id;

        let updated = self.channels.update_bridge_id(channel_id, None).await;
        let channel = self
            .hangup_on_err(asterisk_id, channel_id, HangupCause::INTERWORKING, updated)
            .await?;

        let removed = self.bridges.remove_channel_id(&e.bridge.id, channel_id).await;
        let bridge = self
            .hangup_on_err(asterisk_id, channel_id, HangupCause::INTERWORKING, removed)
            .await?;

        match bridge.reference_type {
            BridgeReferenceType::Call | BridgeReferenceType::CallSnoop => {
                self.calls.ari_channel_left_bridge(&channel, &bridge).await
            }
            BridgeReferenceType::Confbridge | BridgeReferenceType::ConfbridgeSnoop => {
                self.confbridges
                    .ari_channel_left_bridge(&channel, &bridge)
                    .await
            }
            BridgeReferenceType::Unknown => {
                info!(
                    channel_id = %channel.id,
                    bridge_id = %bridge.id,
                    "channel left a bridge with no owning workflow"
                );
                Ok(())
            }
        }
    }

    pub(crate) async fn channel_state_change(
        &self,
        e: &ChannelStateChange,
    ) -> Result<(), CallctlError> {
        let channel = self
            .channels
            .update_state(&e.channel.id, e.channel.state)
            .await?;
        self.calls.ari_channel_state_change(&channel).await
    }

    /// Stores the variable as a data item. [`VAR_TYPE`] and [`VAR_DIRECTION`]
    /// additionally update the typed channel fields.
    pub(crate) async fn channel_varset(&self, e: &ChannelVarset) -> Result<(), CallctlError> {
        let Some(ch) = &e.channel else {
            debug!(variable = %e.variable, "global variable set");
            return Ok(());
        };

        self.channels
            .set_data_item(&ch.id, &e.variable, &e.value)
            .await?;

        match e.variable.as_str() {
            VAR_TYPE => {
                let Ok(channel_type) = e.value.parse::<ChannelType>() else {
                    debug!(channel_id = %ch.id, value = %e.value, "unrecognized channel type");
                    return Ok(());
                };
                let channel = self.channels.get(&ch.id).await?;
                if channel.channel_type != ChannelType::None || channel_type == ChannelType::None {
                    return Ok(());
                }
                self.channels.set_type(&ch.id, channel_type).await
            }
            VAR_DIRECTION => match e.value.parse::<Direction>() {
                Ok(direction) if direction != Direction::None => {
                    self.channels.set_direction(&ch.id, direction).await
                }
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }
}
