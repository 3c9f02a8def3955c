// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound requests to sibling services and the engine proxy.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CallctlError;
use crate::types::HangupCause;

#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Asks the registrar to refresh the contacts of `extension` for the
    /// customer whose registrar domain label is `customer_id`.
    async fn registrar_contact_refresh(
        &self,
        customer_id: &str,
        extension: &str,
    ) -> Result<(), CallctlError>;

    /// Asks the engine instance to hang a channel up after `delay`.
    async fn channel_hangup(
        &self,
        asterisk_id: &str,
        channel_id: &str,
        cause: HangupCause,
        delay: Duration,
    ) -> Result<(), CallctlError>;
}
