// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain entities mutated by the signaling core and shared with its
//! collaborators.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Technology driver of a channel, derived from the channel name prefix.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChannelTech {
    #[default]
    #[strum(serialize = "")]
    #[serde(rename = "")]
    None,
    Pjsip,
    Sip,
    Snoop,
    #[strum(serialize = "unicastrtp")]
    #[serde(rename = "unicastrtp")]
    UnicastRtp,
    #[strum(serialize = "audiosocket")]
    #[serde(rename = "audiosocket")]
    AudioSocket,
    Local,
}

/// Role a channel plays in the platform.
///
/// Starts as [`ChannelType::None`] and is resolved at most once per channel
/// lifecycle.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChannelType {
    #[default]
    #[strum(serialize = "")]
    #[serde(rename = "")]
    None,
    Call,
    Confbridge,
    Join,
    External,
    Recording,
    Application,
}

/// Engine-reported channel state.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
pub enum ChannelState {
    Down,
    Rsrvd,
    OffHook,
    Dialing,
    Ring,
    Ringing,
    Up,
    Busy,
    #[strum(serialize = "Dialing Offhook")]
    #[serde(rename = "Dialing Offhook")]
    DialingOffhook,
    #[strum(serialize = "Pre-ring")]
    #[serde(rename = "Pre-ring")]
    PreRing,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Call direction as seen from the platform.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    #[default]
    #[strum(serialize = "")]
    #[serde(rename = "")]
    None,
    Incoming,
    Outgoing,
}

/// Numeric Q.850 hangup cause, carried opaquely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HangupCause(pub u16);

impl HangupCause {
    pub const UNKNOWN: Self = Self(0);
    pub const NO_ROUTE_DESTINATION: Self = Self(3);
    pub const NORMAL_CLEARING: Self = Self(16);
    pub const USER_BUSY: Self = Self(17);
    pub const NO_USER_RESPONSE: Self = Self(18);
    pub const NO_ANSWER: Self = Self(19);
    pub const SWITCHING_EQUIPMENT_CONGESTION: Self = Self(42);
    pub const INTERWORKING: Self = Self(127);
}

impl fmt::Display for HangupCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dialplan coordinates of a channel (context, extension, priority) plus the
/// application it is executing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialplan {
    pub context: String,
    pub exten: String,
    pub priority: i64,
    pub app_name: String,
    pub app_data: String,
}

/// Fields required to create a channel row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewChannel {
    pub id: String,
    pub asterisk_id: String,
    pub name: String,
    pub tech: ChannelTech,
    pub channel_type: ChannelType,
    pub state: ChannelState,
    pub source_name: String,
    pub source_number: String,
    pub destination_name: String,
    pub destination_number: String,
    pub dialplan: Dialplan,
}

/// One telephony leg on one engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub asterisk_id: String,
    pub name: String,
    pub tech: ChannelTech,
    pub channel_type: ChannelType,
    pub state: ChannelState,
    pub direction: Direction,

    pub source_name: String,
    pub source_number: String,
    pub destination_name: String,
    pub destination_number: String,
    pub dialplan: Dialplan,

    pub stasis_name: Option<String>,
    pub stasis_data: HashMap<String, String>,
    pub data: HashMap<String, String>,

    /// Back-reference to the bridge this channel currently sits in.
    pub bridge_id: Option<String>,
    pub playback_id: Option<String>,

    pub hangup_cause: HangupCause,

    pub tm_create: DateTime<Utc>,
    pub tm_ringing: Option<DateTime<Utc>>,
    pub tm_answer: Option<DateTime<Utc>>,
    pub tm_end: Option<DateTime<Utc>>,
}

impl Channel {
    /// Builds a fresh channel row created at `now`.
    pub fn new(new: NewChannel, now: DateTime<Utc>) -> Self {
        Self {
            id: new.id,
            asterisk_id: new.asterisk_id,
            name: new.name,
            tech: new.tech,
            channel_type: new.channel_type,
            state: new.state,
            direction: Direction::None,
            source_name: new.source_name,
            source_number: new.source_number,
            destination_name: new.destination_name,
            destination_number: new.destination_number,
            dialplan: new.dialplan,
            stasis_name: None,
            stasis_data: HashMap::new(),
            data: HashMap::new(),
            bridge_id: None,
            playback_id: None,
            hangup_cause: HangupCause::UNKNOWN,
            tm_create: now,
            tm_ringing: None,
            tm_answer: None,
            tm_end: None,
        }
    }

    /// Whether the channel had already ended at `now`.
    pub fn ended_before(&self, now: DateTime<Utc>) -> bool {
        matches!(self.tm_end, Some(end) if end <= now)
    }
}

/// Workflow that owns a bridge, encoded in the bridge name at creation.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BridgeReferenceType {
    #[default]
    #[strum(serialize = "")]
    #[serde(rename = "")]
    Unknown,
    Call,
    CallSnoop,
    Confbridge,
    ConfbridgeSnoop,
}

/// Fields required to create a bridge row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBridge {
    pub id: String,
    pub asterisk_id: String,
    pub name: String,
    pub bridge_type: String,
    pub technology: String,
    pub bridge_class: String,
    pub creator: String,
    pub video_mode: String,
    pub channel_ids: Vec<String>,
    pub reference_type: BridgeReferenceType,
    pub reference_id: Option<Uuid>,
}

/// A mixing unit joining one or more channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bridge {
    pub id: String,
    pub asterisk_id: String,
    pub name: String,
    pub bridge_type: String,
    pub technology: String,
    pub bridge_class: String,
    pub creator: String,
    pub video_mode: String,

    /// Member channel ids in join order.
    pub channel_ids: Vec<String>,

    pub reference_type: BridgeReferenceType,
    pub reference_id: Option<Uuid>,

    pub tm_create: DateTime<Utc>,
}

impl Bridge {
    pub fn new(new: NewBridge, now: DateTime<Utc>) -> Self {
        Self {
            id: new.id,
            asterisk_id: new.asterisk_id,
            name: new.name,
            bridge_type: new.bridge_type,
            technology: new.technology,
            bridge_class: new.bridge_class,
            creator: new.creator,
            video_mode: new.video_mode,
            channel_ids: new.channel_ids,
            reference_type: new.reference_type,
            reference_id: new.reference_id,
            tm_create: now,
        }
    }
}

/// Workflow family a channel is handed to on application entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ContextType {
    Call,
    Conference,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecordingStatus {
    #[default]
    Initiating,
    Recording,
    Stopping,
    Ended,
}

/// Recording aggregate owned by the recording workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub recording_name: String,
    pub status: RecordingStatus,
}

/// A customer removed by the customer service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
}

/// A flow execution updated by the flow service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activeflow {
    pub id: Uuid,
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub flow_id: Option<Uuid>,
    #[serde(default)]
    pub reference_type: String,
    #[serde(default)]
    pub reference_id: Option<Uuid>,
    #[serde(default)]
    pub status: String,
}

/// An engine pod removed by the fleet service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pod {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub asterisk_id: String,
}

/// Internal bus envelope used for both signaling and lifecycle traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub publisher: String,
    pub message_type: String,
    pub data_type: String,
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn channel_state_accepts_engine_spellings() {
        assert_eq!(
            ChannelState::from_str("Dialing Offhook").unwrap(),
            ChannelState::DialingOffhook
        );
        let state: ChannelState = serde_json::from_str("\"Pre-ring\"").unwrap();
        assert_eq!(state, ChannelState::PreRing);
        let state: ChannelState = serde_json::from_str("\"Mystery\"").unwrap();
        assert_eq!(state, ChannelState::Unknown);
    }

    #[test]
    fn bridge_reference_type_strings() {
        assert_eq!(BridgeReferenceType::CallSnoop.to_string(), "call-snoop");
        assert_eq!(
            BridgeReferenceType::from_str("confbridge-snoop").unwrap(),
            BridgeReferenceType::ConfbridgeSnoop
        );
        assert!(BridgeReferenceType::from_str("nope").is_err());
    }

    #[test]
    fn channel_type_defaults_to_none() {
        let ch = Channel::new(NewChannel::default(), Utc::now());
        assert_eq!(ch.channel_type, ChannelType::None);
        assert_eq!(ch.channel_type.to_string(), "");
        assert_eq!(ChannelType::from_str("confbridge").unwrap(), ChannelType::Confbridge);
    }

    #[test]
    fn ended_before_compares_end_time() {
        let now = Utc::now();
        let mut ch = Channel::new(NewChannel::default(), now);
        assert!(!ch.ended_before(now));
        ch.tm_end = Some(now - chrono::Duration::seconds(1));
        assert!(ch.ended_before(now));
        ch.tm_end = Some(now + chrono::Duration::seconds(60));
        assert!(!ch.ended_before(now));
    }

    #[test]
    fn lifecycle_payloads_ignore_unknown_fields() {
        let id = Uuid::new_v4();
        let raw = format!(r#"{{"id":"{id}","username":"x","tm_delete":"2024-01-01"}}"#);
        let customer: Customer = serde_json::from_str(&raw).unwrap();
        assert_eq!(customer.id, id);
        assert!(customer.name.is_empty());
    }

    #[test]
    fn hangup_cause_displays_numeric_code() {
        assert_eq!(HangupCause::INTERWORKING.to_string(), "127");
        let cause: HangupCause = serde_json::from_str("42").unwrap();
        assert_eq!(cause, HangupCause::SWITCHING_EQUIPMENT_CONGESTION);
    }
}
