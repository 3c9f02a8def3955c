// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording mock collaborators.
//!
//! Every mock appends an [`Invocation`] to a shared [`Journal`] before
//! answering, so tests can assert on exactly which callbacks fired and in
//! what order. Each mock can be switched into a failing mode.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use callctl_core::{
    Activeflow, Bridge, CallHandler, CallctlError, Channel, ConfbridgeHandler, Customer,
    HangupCause, Pod, Recording, RecordingHandler, RecordingStatus, RequestHandler,
};

/// One collaborator call observed by a mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    CallChannelDestroyed {
        channel_id: String,
    },
    CallDtmfReceived {
        channel_id: String,
        digit: String,
        duration_ms: i64,
    },
    CallChannelLeftBridge {
        channel_id: String,
        bridge_id: String,
    },
    CallStateChange {
        channel_id: String,
    },
    CallStasisStart {
        channel_id: String,
    },
    CallPlaybackFinished {
        channel_id: String,
        playback_id: String,
    },
    CallCustomerDeleted(Uuid),
    CallActiveflowUpdated(Uuid),
    CallPodDeleted(String),

    ConfbridgeBridgeDestroyed {
        bridge_id: String,
    },
    ConfbridgeChannelEnteredBridge {
        channel_id: String,
        bridge_id: String,
    },
    ConfbridgeChannelLeftBridge {
        channel_id: String,
        bridge_id: String,
    },
    ConfbridgeStasisStart {
        channel_id: String,
    },
    ConfbridgeCustomerDeleted(Uuid),

    RecordingLookup(String),
    RecordingStarted(Uuid),
    RecordingStopped(Uuid),

    RegistrarRefresh {
        customer_id: String,
        extension: String,
    },
    ChannelHangup {
        asterisk_id: String,
        channel_id: String,
        cause: HangupCause,
    },
}

impl Invocation {
    pub fn is_call(&self) -> bool {
        matches!(
            self,
            Self::CallChannelDestroyed { .. }
                | Self::CallDtmfReceived { .. }
                | Self::CallChannelLeftBridge { .. }
                | Self::CallStateChange { .. }
                | Self::CallStasisStart { .. }
                | Self::CallPlaybackFinished { .. }
                | Self::CallCustomerDeleted(_)
                | Self::CallActiveflowUpdated(_)
                | Self::CallPodDeleted(_)
        )
    }

    pub fn is_confbridge(&self) -> bool {
        matches!(
            self,
            Self::ConfbridgeBridgeDestroyed { .. }
                | Self::ConfbridgeChannelEnteredBridge { .. }
                | Self::ConfbridgeChannelLeftBridge { .. }
                | Self::ConfbridgeStasisStart { .. }
                | Self::ConfbridgeCustomerDeleted(_)
        )
    }

    pub fn is_recording(&self) -> bool {
        matches!(
            self,
            Self::RecordingLookup(_) | Self::RecordingStarted(_) | Self::RecordingStopped(_)
        )
    }
}

/// Shared, ordered log of collaborator calls.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<Invocation>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, invocation: Invocation) {
        self.entries.lock().await.push(invocation);
    }

    /// All invocations so far, oldest first.
    pub async fn entries(&self) -> Vec<Invocation> {
        self.entries.lock().await.clone()
    }

    pub async fn count(&self, predicate: impl Fn(&Invocation) -> bool) -> usize {
        self.entries.lock().await.iter().filter(|i| predicate(i)).count()
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}

/// Failure switch shared by the mocks.
#[derive(Debug, Default)]
struct FailSwitch(AtomicBool);

impl FailSwitch {
    fn set(&self, failing: bool) {
        self.0.store(failing, Ordering::SeqCst);
    }

    fn check(&self, what: &str) -> Result<(), CallctlError> {
        if self.0.load(Ordering::SeqCst) {
            return Err(CallctlError::collaborator(format!("mock {what} failure")));
        }
        Ok(())
    }
}

/// Call workflow mock.
pub struct MockCallHandler {
    journal: Journal,
    fail: FailSwitch,
}

impl MockCallHandler {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            fail: FailSwitch::default(),
        }
    }

    /// Makes every later call return a collaborator error.
    pub fn set_failing(&self, failing: bool) {
        self.fail.set(failing);
    }

    async fn observe(&self, invocation: Invocation) -> Result<(), CallctlError> {
        self.journal.record(invocation).await;
        self.fail.check("call handler")
    }
}

#[async_trait]
impl CallHandler for MockCallHandler {
    async fn ari_channel_destroyed(&self, channel: &Channel) -> Result<(), CallctlError> {
        self.observe(Invocation::CallChannelDestroyed {
            channel_id: channel.id.clone(),
        })
        .await
    }

    async fn ari_channel_dtmf_received(
        &self,
        channel: &Channel,
        digit: &str,
        duration_ms: i64,
    ) -> Result<(), CallctlError> {
        self.observe(Invocation::CallDtmfReceived {
            channel_id: channel.id.clone(),
            digit: digit.to_string(),
            duration_ms,
        })
        .await
    }

    async fn ari_channel_left_bridge(
        &self,
        channel: &Channel,
        bridge: &Bridge,
    ) -> Result<(), CallctlError> {
        self.observe(Invocation::CallChannelLeftBridge {
            channel_id: channel.id.clone(),
            bridge_id: bridge.id.clone(),
        })
        .await
    }

    async fn ari_channel_state_change(&self, channel: &Channel) -> Result<(), CallctlError> {
        self.observe(Invocation::CallStateChange {
            channel_id: channel.id.clone(),
        })
        .await
    }

    async fn ari_stasis_start(&self, channel: &Channel) -> Result<(), CallctlError> {
        self.observe(Invocation::CallStasisStart {
            channel_id: channel.id.clone(),
        })
        .await
    }

    async fn ari_playback_finished(
        &self,
        channel: &Channel,
        playback_id: &str,
    ) -> Result<(), CallctlError> {
        self.observe(Invocation::CallPlaybackFinished {
            channel_id: channel.id.clone(),
            playback_id: playback_id.to_string(),
        })
        .await
    }

    async fn customer_deleted(&self, customer: &Customer) -> Result<(), CallctlError> {
        self.observe(Invocation::CallCustomerDeleted(customer.id))
            .await
    }

    async fn activeflow_updated(&self, activeflow: &Activeflow) -> Result<(), CallctlError> {
        self.observe(Invocation::CallActiveflowUpdated(activeflow.id))
            .await
    }

    async fn pod_deleted(&self, pod: &Pod) -> Result<(), CallctlError> {
        self.observe(Invocation::CallPodDeleted(pod.name.clone()))
            .await
    }
}

/// Conference workflow mock.
pub struct MockConfbridgeHandler {
    journal: Journal,
    fail: FailSwitch,
}

impl MockConfbridgeHandler {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            fail: FailSwitch::default(),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.set(failing);
    }

    async fn observe(&self, invocation: Invocation) -> Result<(), CallctlError> {
        self.journal.record(invocation).await;
        self.fail.check("confbridge handler")
    }
}

#[async_trait]
impl ConfbridgeHandler for MockConfbridgeHandler {
    async fn ari_bridge_destroyed(&self, bridge: &Bridge) -> Result<(), CallctlError> {
        self.observe(Invocation::ConfbridgeBridgeDestroyed {
            bridge_id: bridge.id.clone(),
        })
        .await
    }

    async fn ari_channel_entered_bridge(
        &self,
        channel: &Channel,
        bridge: &Bridge,
    ) -> Result<(), CallctlError> {
        self.observe(Invocation::ConfbridgeChannelEnteredBridge {
            channel_id: channel.id.clone(),
            bridge_id: bridge.id.clone(),
        })
        .await
    }

    async fn ari_channel_left_bridge(
        &self,
        channel: &Channel,
        bridge: &Bridge,
    ) -> Result<(), CallctlError> {
        self.observe(Invocation::ConfbridgeChannelLeftBridge {
            channel_id: channel.id.clone(),
            bridge_id: bridge.id.clone(),
        })
        .await
    }

    async fn ari_stasis_start(&self, channel: &Channel) -> Result<(), CallctlError> {
        self.observe(Invocation::ConfbridgeStasisStart {
            channel_id: channel.id.clone(),
        })
        .await
    }

    async fn customer_deleted(&self, customer: &Customer) -> Result<(), CallctlError> {
        self.observe(Invocation::ConfbridgeCustomerDeleted(customer.id))
            .await
    }
}

/// Recording workflow mock backed by a name-keyed map.
pub struct MockRecordingHandler {
    journal: Journal,
    recordings: Mutex<HashMap<String, Recording>>,
}

impl MockRecordingHandler {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            recordings: Mutex::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, recording: Recording) {
        self.recordings
            .lock()
            .await
            .insert(recording.recording_name.clone(), recording);
    }

    pub async fn get(&self, name: &str) -> Option<Recording> {
        self.recordings.lock().await.get(name).cloned()
    }

    async fn set_status(&self, id: Uuid, status: RecordingStatus) -> Result<Recording, CallctlError> {
        let mut recordings = self.recordings.lock().await;
        let recording = recordings
            .values_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| CallctlError::not_found("recording", id.to_string()))?;
        recording.status = status;
        Ok(recording.clone())
    }
}

#[async_trait]
impl RecordingHandler for MockRecordingHandler {
    async fn get_by_recording_name(&self, name: &str) -> Result<Recording, CallctlError> {
        self.journal
            .record(Invocation::RecordingLookup(name.to_string()))
            .await;
        self.get(name)
            .await
            .ok_or_else(|| CallctlError::not_found("recording", name))
    }

    async fn started(&self, id: Uuid) -> Result<Recording, CallctlError> {
        self.journal.record(Invocation::RecordingStarted(id)).await;
        self.set_status(id, RecordingStatus::Recording).await
    }

    async fn stopped(&self, id: Uuid) -> Result<Recording, CallctlError> {
        self.journal.record(Invocation::RecordingStopped(id)).await;
        self.set_status(id, RecordingStatus::Ended).await
    }
}

/// Outbound request mock.
pub struct MockRequestHandler {
    journal: Journal,
    fail: FailSwitch,
}

impl MockRequestHandler {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            fail: FailSwitch::default(),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.set(failing);
    }
}

#[async_trait]
impl RequestHandler for MockRequestHandler {
    async fn registrar_contact_refresh(
        &self,
        customer_id: &str,
        extension: &str,
    ) -> Result<(), CallctlError> {
        self.journal
            .record(Invocation::RegistrarRefresh {
                customer_id: customer_id.to_string(),
                extension: extension.to_string(),
            })
            .await;
        self.fail.check("registrar refresh")
    }

    async fn channel_hangup(
        &self,
        asterisk_id: &str,
        channel_id: &str,
        cause: HangupCause,
        _delay: Duration,
    ) -> Result<(), CallctlError> {
        self.journal
            .record(Invocation::ChannelHangup {
                asterisk_id: asterisk_id.to_string(),
                channel_id: channel_id.to_string(),
                cause,
            })
            .await;
        self.fail.check("channel hangup")
    }
}
