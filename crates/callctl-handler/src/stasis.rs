// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application entry and exit.

use callctl_ari::event::{StasisEnd, StasisStart};
use callctl_core::{CallctlError, Channel, ChannelTech, ChannelType, ContextType, HangupCause};
use tracing::{debug, warn};

use crate::EventHandler;

/// Stasis argument naming the workflow family (`call` or `conference`).
pub const STASIS_KEY_CONTEXT_TYPE: &str = "context_type";

/// Stasis argument naming the entry context within the family.
pub const STASIS_KEY_CONTEXT: &str = "context";

// Entry contexts as written by the dialplan and the call workflow.
pub const CONTEXT_JOIN_CALL: &str = "call-join";
pub const CONTEXT_EXTERNAL_MEDIA: &str = "call-externalmedia";
pub const CONTEXT_EXTERNAL_SNOOP: &str = "call-externalsnoop";
pub const CONTEXT_CALL_RECORD: &str = "call-record";
pub const CONTEXT_APPLICATION: &str = "call-application";

/// Reads the workflow family from accumulated stasis data.
fn context_type(channel: &Channel) -> Option<ContextType> {
    channel
        .stasis_data
        .get(STASIS_KEY_CONTEXT_TYPE)
        .and_then(|v| v.parse().ok())
}

/// Resolves the type of a channel entering the application for the first
/// time.
fn resolve_channel_type(context_type: ContextType, channel: &Channel) -> ChannelType {
    if context_type == ContextType::Conference {
        return ChannelType::Confbridge;
    }

    match channel.stasis_data.get(STASIS_KEY_CONTEXT).map(String::as_str) {
        Some(CONTEXT_JOIN_CALL) => ChannelType::Join,
        Some(CONTEXT_EXTERNAL_MEDIA | CONTEXT_EXTERNAL_SNOOP) => ChannelType::External,
        Some(CONTEXT_CALL_RECORD) => ChannelType::Recording,
        Some(CONTEXT_APPLICATION) => ChannelType::Application,
        _ if matches!(channel.tech, ChannelTech::UnicastRtp | ChannelTech::AudioSocket) => {
            ChannelType::External
        }
        _ => ChannelType::Call,
    }
}

impl EventHandler {
    pub(crate) async fn stasis_start(&self, e: &StasisStart) -> Result<(), CallctlError> {
        let asterisk_id = &e.event.asterisk_id;
        let channel_id = &e.channel.id;

        if let Err(err) = self.channels.get(channel_id).await {
            warn!(channel_id = %channel_id, error = %err, "stasis start for unregistered channel");
            self.hangup_best_effort(asterisk_id, channel_id, HangupCause::INTERWORKING)
                .await;
            return Err(err);
        }

        let channel = self
            .channels
            .update_stasis_info(channel_id, &e.event.application, &e.args)
            .await?;

        let Some(context_type) = context_type(&channel) else {
            self.hangup_best_effort(asterisk_id, channel_id, HangupCause::NO_ROUTE_DESTINATION)
                .await;
            return Err(CallctlError::NoRoute {
                channel_id: channel_id.clone(),
                detail: format!(
                    "unresolvable {STASIS_KEY_CONTEXT_TYPE}: {:?}",
                    channel.stasis_data.get(STASIS_KEY_CONTEXT_TYPE)
                ),
            });
        };

        let channel = if channel.channel_type == ChannelType::None {
            let channel_type = resolve_channel_type(context_type, &channel);
            self.channels.set_type(channel_id, channel_type).await?;
            debug!(channel_id = %channel_id, channel_type = %channel_type, "channel type resolved");
            Channel {
                channel_type,
                ..channel
            }
        } else {
            channel
        };

        match context_type {
            ContextType::Call => self.calls.ari_stasis_start(&channel).await,
            ContextType::Conference => self.confbridges.ari_stasis_start(&channel).await,
        }
    }

    /// Clears the application name. Failures are logged only.
    pub(crate) async fn stasis_end(&self, e: &StasisEnd) -> Result<(), CallctlError> {
        if let Err(err) = self.channels.update_stasis_name(&e.channel.id, None).await {
            warn!(channel_id = %e.channel.id, error = %err, "could not clear stasis name");
        }
        Ok(())
    }
}
