// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness wiring the real stores and event handler to mock workflows.

use std::sync::Arc;

use callctl_ari::parse;
use callctl_core::{CallctlError, Recording};
use callctl_handler::{AriEventHandler, Collaborators, EventHandler};
use callctl_storage::{BridgeStore, ChannelStore};

use crate::mocks::{
    Journal, MockCallHandler, MockConfbridgeHandler, MockRecordingHandler, MockRequestHandler,
};

/// Builder for [`TestHarness`].
#[derive(Default)]
pub struct TestHarnessBuilder {
    recordings: Vec<Recording>,
    failing_calls: bool,
    failing_requests: bool,
}

impl TestHarnessBuilder {
    /// Seeds the recording mock with an aggregate.
    pub fn with_recording(mut self, recording: Recording) -> Self {
        self.recordings.push(recording);
        self
    }

    /// Makes the call workflow mock fail every call.
    pub fn with_failing_calls(mut self) -> Self {
        self.failing_calls = true;
        self
    }

    /// Makes hangup and registrar requests fail.
    pub fn with_failing_requests(mut self) -> Self {
        self.failing_requests = true;
        self
    }

    pub async fn build(self) -> TestHarness {
        let journal = Journal::new();

        let requests = Arc::new(MockRequestHandler::new(journal.clone()));
        requests.set_failing(self.failing_requests);
        let calls = Arc::new(MockCallHandler::new(journal.clone()));
        calls.set_failing(self.failing_calls);
        let confbridges = Arc::new(MockConfbridgeHandler::new(journal.clone()));
        let recordings = Arc::new(MockRecordingHandler::new(journal.clone()));
        for recording in self.recordings {
            recordings.insert(recording).await;
        }

        let channels = Arc::new(ChannelStore::new(requests.clone()));
        let bridges = Arc::new(BridgeStore::new());

        let collaborators = Collaborators {
            channels: channels.clone(),
            bridges: bridges.clone(),
            calls: calls.clone(),
            confbridges: confbridges.clone(),
            recordings: recordings.clone(),
            requests: requests.clone(),
        };
        let handler = Arc::new(EventHandler::new(collaborators.clone()));

        TestHarness {
            journal,
            channels,
            bridges,
            calls,
            confbridges,
            recordings,
            requests,
            collaborators,
            handler,
        }
    }
}

/// Real stores and event handler backed by recording mocks.
pub struct TestHarness {
    pub journal: Journal,
    pub channels: Arc<ChannelStore>,
    pub bridges: Arc<BridgeStore>,
    pub calls: Arc<MockCallHandler>,
    pub confbridges: Arc<MockConfbridgeHandler>,
    pub recordings: Arc<MockRecordingHandler>,
    pub requests: Arc<MockRequestHandler>,
    pub collaborators: Collaborators,
    pub handler: Arc<EventHandler>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::default()
    }

    /// A harness with default settings.
    pub async fn new() -> TestHarness {
        Self::builder().build().await
    }

    /// Parses `raw` and runs it through the event handler. Unknown event
    /// types are accepted without side effects.
    pub async fn ingest(&self, raw: &str) -> Result<(), CallctlError> {
        let (_, payload) = parse(raw.as_bytes())?;
        match payload {
            Some(event) => self.handler.handle(&event).await,
            None => Ok(()),
        }
    }

    /// Like [`TestHarness::ingest`] but panics on error.
    pub async fn ingest_ok(&self, raw: &str) {
        if let Err(e) = self.ingest(raw).await {
            panic!("ingest failed: {e}");
        }
    }
}
