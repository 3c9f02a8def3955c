// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording workflow contract.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CallctlError;
use crate::types::Recording;

#[async_trait]
pub trait RecordingHandler: Send + Sync {
    /// Looks a recording aggregate up by its logical name (no direction suffix).
    async fn get_by_recording_name(&self, name: &str) -> Result<Recording, CallctlError>;

    async fn started(&self, id: Uuid) -> Result<Recording, CallctlError>;

    async fn stopped(&self, id: Uuid) -> Result<Recording, CallctlError>;
}
