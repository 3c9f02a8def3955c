// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine-side snapshots embedded in event payloads.
//!
//! These mirror the wire objects as the engine sends them. They are
//! translated into domain rows by the event handler and never persisted
//! directly.

use std::collections::HashMap;

use callctl_core::ChannelState;
use serde::{Deserialize, Serialize};

use crate::decode;

/// Prefix of a playback or recording target that points at a channel.
pub const TARGET_CHANNEL_PREFIX: &str = "channel:";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerId {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number: String,
}

/// Dialplan context, extension, and priority plus the running application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialplanCep {
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub exten: String,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub app_data: String,
}

/// Channel snapshot as carried by channel and stasis events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AriChannel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: ChannelState,
    #[serde(default)]
    pub caller: CallerId,
    #[serde(default)]
    pub connected: CallerId,
    #[serde(default)]
    pub accountcode: String,
    #[serde(default)]
    pub dialplan: DialplanCep,
    #[serde(default, deserialize_with = "decode::timestamp")]
    pub creationtime: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub channelvars: HashMap<String, String>,
}

/// Bridge snapshot. `creationtime` is kept exactly as sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AriBridge {
    pub id: String,
    #[serde(default)]
    pub technology: String,
    #[serde(default)]
    pub bridge_type: String,
    #[serde(default)]
    pub bridge_class: String,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub creationtime: String,
    #[serde(default)]
    pub video_mode: String,
}

/// Media playback on a channel or bridge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playback {
    pub id: String,
    #[serde(default)]
    pub media_uri: String,
    #[serde(default)]
    pub next_media_uri: Option<String>,
    #[serde(default)]
    pub target_uri: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub state: String,
}

impl Playback {
    /// The target channel id, when the playback targets a channel.
    pub fn channel_id(&self) -> Option<&str> {
        self.target_uri.strip_prefix(TARGET_CHANNEL_PREFIX)
    }
}

/// A recording in progress on a channel or bridge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveRecording {
    pub name: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub target_uri: String,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub cause: Option<String>,
}

/// SIP endpoint presence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub technology: String,
    pub resource: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub channel_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    pub peer_status: String,
    #[serde(default)]
    pub cause: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub port: String,
    #[serde(default)]
    pub time: String,
}

/// Registrar contact status. The engine sends `roundtrip_usec` as a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub roundtrip_usec: String,
    #[serde(default)]
    pub aor: String,
    pub contact_status: String,
}
