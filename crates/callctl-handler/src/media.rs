// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Playback and recording bookkeeping.

use callctl_ari::event::{PlaybackFinished, PlaybackStarted, RecordingFinished, RecordingStarted};
use callctl_core::CallctlError;
use chrono::Utc;
use tracing::{debug, warn};

use crate::EventHandler;

/// Suffix of the inbound leg of a recording. The paired outbound leg is
/// ignored so each logical recording is processed once.
pub const RECORDING_SUFFIX_IN: &str = "_in";

impl EventHandler {
    pub(crate) async fn playback_started(&self, e: &PlaybackStarted) -> Result<(), CallctlError> {
        let Some(channel_id) = e.playback.channel_id() else {
            debug!(target_uri = %e.playback.target_uri, "playback target is not a channel");
            return Ok(());
        };

        if let Err(err) = self
            .channels
            .update_playback_id(channel_id, Some(&e.playback.id))
            .await
        {
            warn!(channel_id, playback_id = %e.playback.id, error = %err, "could not set playback id");
        }
        Ok(())
    }

    pub(crate) async fn playback_finished(
        &self,
        e: &PlaybackFinished,
    ) -> Result<(), CallctlError> {
        let Some(channel_id) = e.playback.channel_id() else {
            debug!(target_uri = %e.playback.target_uri, "playback target is not a channel");
            return Ok(());
        };

        let channel = match self.channels.update_playback_id(channel_id, None).await {
            Ok(channel) => channel,
            Err(err) => {
                warn!(channel_id, playback_id = %e.playback.id, error = %err, "could not clear playback id");
                return Ok(());
            }
        };

        if channel.ended_before(Utc::now()) {
            debug!(channel_id, "playback finished after hangup");
            return Ok(());
        }

        self.calls
            .ari_playback_finished(&channel, &e.playback.id)
            .await
    }

    pub(crate) async fn recording_started(
        &self,
        e: &RecordingStarted,
    ) -> Result<(), CallctlError> {
        let Some(name) = e.recording.name.strip_suffix(RECORDING_SUFFIX_IN) else {
            return Ok(());
        };

        let recording = self.recordings.get_by_recording_name(name).await?;
        self.recordings.started(recording.id).await?;
        Ok(())
    }

    pub(crate) async fn recording_finished(
        &self,
        e: &RecordingFinished,
    ) -> Result<(), CallctlError> {
        let Some(name) = e.recording.name.strip_suffix(RECORDING_SUFFIX_IN) else {
            return Ok(());
        };

        let recording = self.recordings.get_by_recording_name(name).await?;
        self.recordings.stopped(recording.id).await?;
        Ok(())
    }
}
