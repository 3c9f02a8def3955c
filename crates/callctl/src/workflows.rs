// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log-only workflow collaborators.
//!
//! The call, conference, and recording engines run as separate services.
//! When callctl runs standalone these stand-ins record each callback in
//! the log so replayed traffic can be inspected.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use callctl_core::{
    Activeflow, Bridge, CallHandler, CallctlError, Channel, ConfbridgeHandler, Customer,
    HangupCause, Pod, Recording, RecordingHandler, RequestHandler,
};

pub struct LoggingCallHandler;

#[async_trait]
impl CallHandler for LoggingCallHandler {
    async fn ari_channel_destroyed(&self, channel: &Channel) -> Result<(), CallctlError> {
        info!(
            channel_id = %channel.id,
            cause = %channel.hangup_cause,
            "call: channel destroyed"
        );
        Ok(())
    }

    async fn ari_channel_dtmf_received(
        &self,
        channel: &Channel,
        digit: &str,
        duration_ms: i64,
    ) -> Result<(), CallctlError> {
        info!(channel_id = %channel.id, digit, duration_ms, "call: dtmf received");
        Ok(())
    }

    async fn ari_channel_left_bridge(
        &self,
        channel: &Channel,
        bridge: &Bridge,
    ) -> Result<(), CallctlError> {
        info!(channel_id = %channel.id, bridge_id = %bridge.id, "call: channel left bridge");
        Ok(())
    }

    async fn ari_channel_state_change(&self, channel: &Channel) -> Result<(), CallctlError> {
        info!(channel_id = %channel.id, state = %channel.state, "call: channel state changed");
        Ok(())
    }

    async fn ari_stasis_start(&self, channel: &Channel) -> Result<(), CallctlError> {
        info!(
            channel_id = %channel.id,
            channel_type = %channel.channel_type,
            "call: stasis start"
        );
        Ok(())
    }

    async fn ari_playback_finished(
        &self,
        channel: &Channel,
        playback_id: &str,
    ) -> Result<(), CallctlError> {
        info!(channel_id = %channel.id, playback_id, "call: playback finished");
        Ok(())
    }

    async fn customer_deleted(&self, customer: &Customer) -> Result<(), CallctlError> {
        info!(customer_id = %customer.id, "call: customer deleted");
        Ok(())
    }

    async fn activeflow_updated(&self, activeflow: &Activeflow) -> Result<(), CallctlError> {
        info!(
            activeflow_id = %activeflow.id,
            status = %activeflow.status,
            "call: activeflow updated"
        );
        Ok(())
    }

    async fn pod_deleted(&self, pod: &Pod) -> Result<(), CallctlError> {
        info!(pod = %pod.name, asterisk_id = %pod.asterisk_id, "call: pod deleted");
        Ok(())
    }
}

pub struct LoggingConfbridgeHandler;

#[async_trait]
impl ConfbridgeHandler for LoggingConfbridgeHandler {
    async fn ari_bridge_destroyed(&self, bridge: &Bridge) -> Result<(), CallctlError> {
        info!(bridge_id = %bridge.id, "confbridge: bridge destroyed");
        Ok(())
    }

    async fn ari_channel_entered_bridge(
        &self,
        channel: &Channel,
        bridge: &Bridge,
    ) -> Result<(), CallctlError> {
        info!(
            channel_id = %channel.id,
            bridge_id = %bridge.id,
            "confbridge: channel entered bridge"
        );
        Ok(())
    }

    async fn ari_channel_left_bridge(
        &self,
        channel: &Channel,
        bridge: &Bridge,
    ) -> Result<(), CallctlError> {
        info!(
            channel_id = %channel.id,
            bridge_id = %bridge.id,
            "confbridge: channel left bridge"
        );
        Ok(())
    }

    async fn ari_stasis_start(&self, channel: &Channel) -> Result<(), CallctlError> {
        info!(channel_id = %channel.id, "confbridge: stasis start");
        Ok(())
    }

    async fn customer_deleted(&self, customer: &Customer) -> Result<(), CallctlError> {
        info!(customer_id = %customer.id, "confbridge: customer deleted");
        Ok(())
    }
}

/// Has no recordings of its own; every lookup is not-found.
pub struct LoggingRecordingHandler;

#[async_trait]
impl RecordingHandler for LoggingRecordingHandler {
    async fn get_by_recording_name(&self, name: &str) -> Result<Recording, CallctlError> {
        info!(recording_name = name, "recording: lookup");
        Err(CallctlError::not_found("recording", name))
    }

    async fn started(&self, id: Uuid) -> Result<Recording, CallctlError> {
        Err(CallctlError::not_found("recording", id.to_string()))
    }

    async fn stopped(&self, id: Uuid) -> Result<Recording, CallctlError> {
        Err(CallctlError::not_found("recording", id.to_string()))
    }
}

pub struct LoggingRequestHandler;

#[async_trait]
impl RequestHandler for LoggingRequestHandler {
    async fn registrar_contact_refresh(
        &self,
        customer_id: &str,
        extension: &str,
    ) -> Result<(), CallctlError> {
        info!(customer_id, extension, "request: registrar contact refresh");
        Ok(())
    }

    async fn channel_hangup(
        &self,
        asterisk_id: &str,
        channel_id: &str,
        cause: HangupCause,
        delay: Duration,
    ) -> Result<(), CallctlError> {
        info!(
            asterisk_id,
            channel_id,
            cause = %cause,
            delay_ms = delay.as_millis() as u64,
            "request: channel hangup"
        );
        Ok(())
    }
}
