// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entity reference resolution from engine naming conventions.
//!
//! Channel names carry their technology as a `Tech/...` prefix. Bridge names
//! carry the owning workflow as a comma separated `key=value` list written by
//! the component that created the bridge; [`bridge_reference`] is the only
//! place that reads that encoding.

use callctl_core::{BridgeReferenceType, ChannelTech};
use uuid::Uuid;

use crate::decode::parse_key_values;

pub const BRIDGE_KEY_REFERENCE_TYPE: &str = "reference_type";
pub const BRIDGE_KEY_REFERENCE_ID: &str = "reference_id";

/// Derives the channel technology from the name prefix before the first `/`.
pub fn channel_tech(name: &str) -> ChannelTech {
    let Some((prefix, _)) = name.split_once('/') else {
        return ChannelTech::None;
    };

    prefix.to_ascii_lowercase().parse().unwrap_or_default()
}

/// Owning workflow of a bridge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeReference {
    pub reference_type: BridgeReferenceType,
    pub reference_id: Option<Uuid>,
}

/// Reads the owning workflow from a bridge name.
///
/// Absent or unparseable values fall back to `Unknown` and no id.
pub fn bridge_reference(name: &str) -> BridgeReference {
    let values = parse_key_values(name.split(','));

    BridgeReference {
        reference_type: values
            .get(BRIDGE_KEY_REFERENCE_TYPE)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default(),
        reference_id: values
            .get(BRIDGE_KEY_REFERENCE_ID)
            .and_then(|v| Uuid::parse_str(v).ok()),
    }
}

/// Writes a bridge name that [`bridge_reference`] resolves back to the same
/// reference.
pub fn bridge_name(reference_type: BridgeReferenceType, reference_id: Uuid) -> String {
    format!(
        "{BRIDGE_KEY_REFERENCE_TYPE}={reference_type},{BRIDGE_KEY_REFERENCE_ID}={reference_id}"
    )
}
