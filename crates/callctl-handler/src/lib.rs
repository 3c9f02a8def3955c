// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event handler for engine signaling.
//!
//! [`EventHandler`] is the protocol state machine: one operation per
//! [`AriEvent`] variant, each mutating channel and bridge rows through the
//! persistence collaborators and forwarding outcomes to the call, conference,
//! and recording workflows.
//!
//! Compensation is limited to best-effort hangups. A failed hangup is logged
//! and never replaces the error that triggered it.

mod bridge;
mod channel;
mod contact;
mod media;
mod stasis;

use std::sync::Arc;

use async_trait::async_trait;
use callctl_ari::AriEvent;
use callctl_core::{
    BridgeHandler, CallHandler, CallctlError, ChannelHandler, ConfbridgeHandler, HangupCause,
    RecordingHandler, RequestHandler,
};
use tracing::{Instrument, debug, debug_span, warn};

pub use stasis::{
    CONTEXT_APPLICATION, CONTEXT_CALL_RECORD, CONTEXT_EXTERNAL_MEDIA, CONTEXT_EXTERNAL_SNOOP,
    CONTEXT_JOIN_CALL, STASIS_KEY_CONTEXT, STASIS_KEY_CONTEXT_TYPE,
};
pub use channel::{VAR_DIRECTION, VAR_TYPE};
pub use media::RECORDING_SUFFIX_IN;

/// Handles one parsed engine event.
#[async_trait]
pub trait AriEventHandler: Send + Sync {
    async fn handle(&self, event: &AriEvent) -> Result<(), CallctlError>;
}

/// Collaborators the event handler calls into.
#[derive(Clone)]
pub struct Collaborators {
    pub channels: Arc<dyn ChannelHandler>,
    pub bridges: Arc<dyn BridgeHandler>,
    pub calls: Arc<dyn CallHandler>,
    pub confbridges: Arc<dyn ConfbridgeHandler>,
    pub recordings: Arc<dyn RecordingHandler>,
    pub requests: Arc<dyn RequestHandler>,
}

/// Protocol state machine over channel and bridge rows.
pub struct EventHandler {
    channels: Arc<dyn ChannelHandler>,
    bridges: Arc<dyn BridgeHandler>,
    calls: Arc<dyn CallHandler>,
    confbridges: Arc<dyn ConfbridgeHandler>,
    recordings: Arc<dyn RecordingHandler>,
    requests: Arc<dyn RequestHandler>,
}

impl EventHandler {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            channels: collaborators.channels,
            bridges: collaborators.bridges,
            calls: collaborators.calls,
            confbridges: collaborators.confbridges,
            recordings: collaborators.recordings,
            requests: collaborators.requests,
        }
    }

    async fn dispatch(&self, event: &AriEvent) -> Result<(), CallctlError> {
        match event {
            AriEvent::BridgeCreated(e) => self.bridge_created(e).await,
            AriEvent::BridgeDestroyed(e) => self.bridge_destroyed(e).await,
            AriEvent::ChannelCreated(e) => self.channel_created(e).await,
            AriEvent::ChannelDestroyed(e) => self.channel_destroyed(e).await,
            AriEvent::ChannelDtmfReceived(e) => self.channel_dtmf_received(e).await,
            AriEvent::ChannelEnteredBridge(e) => self.channel_entered_bridge(e).await,
            AriEvent::ChannelLeftBridge(e) => self.channel_left_bridge(e).await,
            AriEvent::ChannelStateChange(e) => self.channel_state_change(e).await,
            AriEvent::ChannelVarset(e) => self.channel_varset(e).await,
            AriEvent::ContactStatusChange(e) => self.contact_status_change(e).await,
            AriEvent::PlaybackStarted(e) => self.playback_started(e).await,
            AriEvent::PlaybackFinished(e) => self.playback_finished(e).await,
            AriEvent::RecordingStarted(e) => self.recording_started(e).await,
            AriEvent::RecordingFinished(e) => self.recording_finished(e).await,
            AriEvent::StasisStart(e) => self.stasis_start(e).await,
            AriEvent::StasisEnd(e) => self.stasis_end(e).await,

            // Parsed for completeness; nothing in the platform reacts to these.
            AriEvent::ChannelCallerId(_)
            | AriEvent::ChannelDialplan(_)
            | AriEvent::ChannelHangupRequest(_)
            | AriEvent::EndpointStateChange(_)
            | AriEvent::PeerStatusChange(_)
            | AriEvent::RecordingFailed(_) => {
                debug!(event_type = %event.event_type(), "event ignored");
                Ok(())
            }
        }
    }

    /// Requests a hangup and logs, rather than returns, any failure.
    async fn hangup_best_effort(&self, asterisk_id: &str, channel_id: &str, cause: HangupCause) {
        if let Err(e) = self
            .channels
            .hangup_with_engine_id(asterisk_id, channel_id, cause)
            .await
        {
            warn!(
                asterisk_id,
                channel_id,
                cause = %cause,
                error = %e,
                "best-effort hangup failed"
            );
        }
    }

    /// Passes `result` through, hanging the channel up first when it is an
    /// error.
    async fn hangup_on_err<T>(
        &self,
        asterisk_id: &str,
        channel_id: &str,
        cause: HangupCause,
        result: Result<T, CallctlError>,
    ) -> Result<T, CallctlError> {
        if let Err(e) = &result {
            warn!(channel_id, error = %e, "channel mutation failed, hanging up");
            self.hangup_best_effort(asterisk_id, channel_id, cause).await;
        }
        result
    }
}

#[async_trait]
impl AriEventHandler for EventHandler {
    async fn handle(&self, event: &AriEvent) -> Result<(), CallctlError> {
        let envelope = event.event();
        let span = debug_span!(
            "ari_event",
            event_type = %event.event_type(),
            asterisk_id = %envelope.asterisk_id,
            id = event.subject_id().unwrap_or_default(),
        );
        self.dispatch(event).instrument(span).await
    }
}
