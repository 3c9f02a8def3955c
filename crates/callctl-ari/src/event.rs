// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event envelope, typed payloads, and the parse entry point.

use std::collections::HashMap;

use callctl_core::HangupCause;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::decode;
use crate::error::ParseError;
use crate::model::{
    AriBridge, AriChannel, ContactInfo, Endpoint, LiveRecording, Peer, Playback,
};

/// Fields common to every engine event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Raw type tag. Unknown tags are kept so callers can log them.
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub application: String,
    #[serde(default, deserialize_with = "decode::timestamp")]
    pub timestamp: String,
    /// Engine instance that emitted the event.
    #[serde(default)]
    pub asterisk_id: String,
}

impl Event {
    /// The known event type, if the tag is one this crate models.
    pub fn kind(&self) -> Option<EventType> {
        self.event_type.parse().ok()
    }
}

/// Every event type with a typed payload.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter,
)]
pub enum EventType {
    BridgeCreated,
    BridgeDestroyed,
    ChannelCallerId,
    ChannelCreated,
    ChannelDestroyed,
    ChannelDialplan,
    ChannelDtmfReceived,
    ChannelEnteredBridge,
    ChannelHangupRequest,
    ChannelLeftBridge,
    ChannelStateChange,
    ChannelVarset,
    ContactStatusChange,
    EndpointStateChange,
    PeerStatusChange,
    PlaybackFinished,
    PlaybackStarted,
    RecordingFailed,
    RecordingFinished,
    RecordingStarted,
    StasisEnd,
    StasisStart,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BridgeCreated {
    #[serde(flatten)]
    pub event: Event,
    pub bridge: AriBridge,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BridgeDestroyed {
    #[serde(flatten)]
    pub event: Event,
    pub bridge: AriBridge,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelCallerId {
    #[serde(flatten)]
    pub event: Event,
    #[serde(default)]
    pub caller_presentation: i64,
    #[serde(default)]
    pub caller_presentation_txt: String,
    pub channel: AriChannel,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelCreated {
    #[serde(flatten)]
    pub event: Event,
    pub channel: AriChannel,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelDestroyed {
    #[serde(flatten)]
    pub event: Event,
    pub cause: HangupCause,
    #[serde(default)]
    pub cause_txt: String,
    pub channel: AriChannel,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelDialplan {
    #[serde(flatten)]
    pub event: Event,
    #[serde(default)]
    pub dialplan_app: String,
    #[serde(default)]
    pub dialplan_app_data: String,
    pub channel: AriChannel,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelDtmfReceived {
    #[serde(flatten)]
    pub event: Event,
    pub digit: String,
    #[serde(default)]
    pub duration_ms: i64,
    pub channel: AriChannel,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelEnteredBridge {
    #[serde(flatten)]
    pub event: Event,
    pub channel: AriChannel,
    pub bridge: AriBridge,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelHangupRequest {
    #[serde(flatten)]
    pub event: Event,
    #[serde(default)]
    pub cause: HangupCause,
    #[serde(default)]
    pub soft: bool,
    pub channel: AriChannel,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelLeftBridge {
    #[serde(flatten)]
    pub event: Event,
    pub channel: AriChannel,
    pub bridge: AriBridge,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelStateChange {
    #[serde(flatten)]
    pub event: Event,
    pub channel: AriChannel,
}

/// A dialplan variable was set. Global variables carry no channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelVarset {
    #[serde(flatten)]
    pub event: Event,
    pub variable: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub channel: Option<AriChannel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactStatusChange {
    #[serde(flatten)]
    pub event: Event,
    pub endpoint: Endpoint,
    pub contact_info: ContactInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EndpointStateChange {
    #[serde(flatten)]
    pub event: Event,
    pub endpoint: Endpoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PeerStatusChange {
    #[serde(flatten)]
    pub event: Event,
    pub endpoint: Endpoint,
    pub peer: Peer,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaybackFinished {
    #[serde(flatten)]
    pub event: Event,
    pub playback: Playback,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaybackStarted {
    #[serde(flatten)]
    pub event: Event,
    pub playback: Playback,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecordingFailed {
    #[serde(flatten)]
    pub event: Event,
    pub recording: LiveRecording,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecordingFinished {
    #[serde(flatten)]
    pub event: Event,
    pub recording: LiveRecording,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecordingStarted {
    #[serde(flatten)]
    pub event: Event,
    pub recording: LiveRecording,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StasisEnd {
    #[serde(flatten)]
    pub event: Event,
    pub channel: AriChannel,
}

/// A channel entered the application. `args` are the application
/// arguments decoded from their `key=value` list form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StasisStart {
    #[serde(flatten)]
    pub event: Event,
    #[serde(default, deserialize_with = "decode::key_value_list")]
    pub args: HashMap<String, String>,
    pub channel: AriChannel,
    #[serde(default)]
    pub replace_channel: Option<AriChannel>,
}

/// A parsed event with its typed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AriEvent {
    BridgeCreated(BridgeCreated),
    BridgeDestroyed(BridgeDestroyed),
    ChannelCallerId(ChannelCallerId),
    ChannelCreated(ChannelCreated),
    ChannelDestroyed(ChannelDestroyed),
    ChannelDialplan(ChannelDialplan),
    ChannelDtmfReceived(ChannelDtmfReceived),
    ChannelEnteredBridge(ChannelEnteredBridge),
    ChannelHangupRequest(ChannelHangupRequest),
    ChannelLeftBridge(ChannelLeftBridge),
    ChannelStateChange(ChannelStateChange),
    ChannelVarset(ChannelVarset),
    ContactStatusChange(ContactStatusChange),
    EndpointStateChange(EndpointStateChange),
    PeerStatusChange(PeerStatusChange),
    PlaybackFinished(PlaybackFinished),
    PlaybackStarted(PlaybackStarted),
    RecordingFailed(RecordingFailed),
    RecordingFinished(RecordingFinished),
    RecordingStarted(RecordingStarted),
    StasisEnd(StasisEnd),
    StasisStart(StasisStart),
}

impl AriEvent {
    /// Decodes `raw` as the payload of `event_type`.
    pub fn decode(event_type: EventType, raw: &[u8]) -> Result<Self, ParseError> {
        let decoded = match event_type {
            EventType::BridgeCreated => serde_json::from_slice(raw).map(Self::BridgeCreated),
            EventType::BridgeDestroyed => serde_json::from_slice(raw).map(Self::BridgeDestroyed),
            EventType::ChannelCallerId => serde_json::from_slice(raw).map(Self::ChannelCallerId),
            EventType::ChannelCreated => serde_json::from_slice(raw).map(Self::ChannelCreated),
            EventType::ChannelDestroyed => {
                serde_json::from_slice(raw).map(Self::ChannelDestroyed)
            }
            EventType::ChannelDialplan => serde_json::from_slice(raw).map(Self::ChannelDialplan),
            EventType::ChannelDtmfReceived => {
                serde_json::from_slice(raw).map(Self::ChannelDtmfReceived)
            }
            EventType::ChannelEnteredBridge => {
                serde_json::from_slice(raw).map(Self::ChannelEnteredBridge)
            }
            EventType::ChannelHangupRequest => {
                serde_json::from_slice(raw).map(Self::ChannelHangupRequest)
            }
            EventType::ChannelLeftBridge => {
                serde_json::from_slice(raw).map(Self::ChannelLeftBridge)
            }
            EventType::ChannelStateChange => {
                serde_json::from_slice(raw).map(Self::ChannelStateChange)
            }
            EventType::ChannelVarset => serde_json::from_slice(raw).map(Self::ChannelVarset),
            EventType::ContactStatusChange => {
                serde_json::from_slice(raw).map(Self::ContactStatusChange)
            }
            EventType::EndpointStateChange => {
                serde_json::from_slice(raw).map(Self::EndpointStateChange)
            }
            EventType::PeerStatusChange => {
                serde_json::from_slice(raw).map(Self::PeerStatusChange)
            }
            EventType::PlaybackFinished => {
                serde_json::from_slice(raw).map(Self::PlaybackFinished)
            }
            EventType::PlaybackStarted => serde_json::from_slice(raw).map(Self::PlaybackStarted),
            EventType::RecordingFailed => serde_json::from_slice(raw).map(Self::RecordingFailed),
            EventType::RecordingFinished => {
                serde_json::from_slice(raw).map(Self::RecordingFinished)
            }
            EventType::RecordingStarted => {
                serde_json::from_slice(raw).map(Self::RecordingStarted)
            }
            EventType::StasisEnd => serde_json::from_slice(raw).map(Self::StasisEnd),
            EventType::StasisStart => serde_json::from_slice(raw).map(Self::StasisStart),
        };

        decoded.map_err(|source| ParseError::Payload { event_type, source })
    }

    pub fn event_type(&self) -> EventType {
        match self {
            Self::BridgeCreated(_) => EventType::BridgeCreated,
            Self::BridgeDestroyed(_) => EventType::BridgeDestroyed,
            Self::ChannelCallerId(_) => EventType::ChannelCallerId,
            Self::ChannelCreated(_) => EventType::ChannelCreated,
            Self::ChannelDestroyed(_) => EventType::ChannelDestroyed,
            Self::ChannelDialplan(_) => EventType::ChannelDialplan,
            Self::ChannelDtmfReceived(_) => EventType::ChannelDtmfReceived,
            Self::ChannelEnteredBridge(_) => EventType::ChannelEnteredBridge,
            Self::ChannelHangupRequest(_) => EventType::ChannelHangupRequest,
            Self::ChannelLeftBridge(_) => EventType::ChannelLeftBridge,
            Self::ChannelStateChange(_) => EventType::ChannelStateChange,
            Self::ChannelVarset(_) => EventType::ChannelVarset,
            Self::ContactStatusChange(_) => EventType::ContactStatusChange,
            Self::EndpointStateChange(_) => EventType::EndpointStateChange,
            Self::PeerStatusChange(_) => EventType::PeerStatusChange,
            Self::PlaybackFinished(_) => EventType::PlaybackFinished,
            Self::PlaybackStarted(_) => EventType::PlaybackStarted,
            Self::RecordingFailed(_) => EventType::RecordingFailed,
            Self::RecordingFinished(_) => EventType::RecordingFinished,
            Self::RecordingStarted(_) => EventType::RecordingStarted,
            Self::StasisEnd(_) => EventType::StasisEnd,
            Self::StasisStart(_) => EventType::StasisStart,
        }
    }

    /// The envelope embedded in the payload.
    pub fn event(&self) -> &Event {
        match self {
            Self::BridgeCreated(e) => &e.event,
            Self::BridgeDestroyed(e) => &e.event,
            Self::ChannelCallerId(e) => &e.event,
            Self::ChannelCreated(e) => &e.event,
            Self::ChannelDestroyed(e) => &e.event,
            Self::ChannelDialplan(e) => &e.event,
            Self::ChannelDtmfReceived(e) => &e.event,
            Self::ChannelEnteredBridge(e) => &e.event,
            Self::ChannelHangupRequest(e) => &e.event,
            Self::ChannelLeftBridge(e) => &e.event,
            Self::ChannelStateChange(e) => &e.event,
            Self::ChannelVarset(e) => &e.event,
            Self::ContactStatusChange(e) => &e.event,
            Self::EndpointStateChange(e) => &e.event,
            Self::PeerStatusChange(e) => &e.event,
            Self::PlaybackFinished(e) => &e.event,
            Self::PlaybackStarted(e) => &e.event,
            Self::RecordingFailed(e) => &e.event,
            Self::RecordingFinished(e) => &e.event,
            Self::RecordingStarted(e) => &e.event,
            Self::StasisEnd(e) => &e.event,
            Self::StasisStart(e) => &e.event,
        }
    }

    /// Id of the entity the event is about: the channel for channel and
    /// bridge-membership events, else the bridge, endpoint resource,
    /// playback, or recording name.
    pub fn subject_id(&self) -> Option<&str> {
        let id = match self {
            Self::BridgeCreated(e) => &e.bridge.id,
            Self::BridgeDestroyed(e) => &e.bridge.id,
            Self::ChannelCallerId(e) => &e.channel.id,
            Self::ChannelCreated(e) => &e.channel.id,
            Self::ChannelDestroyed(e) => &e.channel.id,
            Self::ChannelDialplan(e) => &e.channel.id,
            Self::ChannelDtmfReceived(e) => &e.channel.id,
            Self::ChannelEnteredBridge(e) => &e.channel.id,
            Self::ChannelHangupRequest(e) => &e.channel.id,
            Self::ChannelLeftBridge(e) => &e.channel.id,
            Self::ChannelStateChange(e) => &e.channel.id,
            Self::ChannelVarset(e) => return e.channel.as_ref().map(|c| c.id.as_str()),
            Self::ContactStatusChange(e) => &e.endpoint.resource,
            Self::EndpointStateChange(e) => &e.endpoint.resource,
            Self::PeerStatusChange(e) => &e.endpoint.resource,
            Self::PlaybackFinished(e) => &e.playback.id,
            Self::PlaybackStarted(e) => &e.playback.id,
            Self::RecordingFailed(e) => &e.recording.name,
            Self::RecordingFinished(e) => &e.recording.name,
            Self::RecordingStarted(e) => &e.recording.name,
            Self::StasisEnd(e) => &e.channel.id,
            Self::StasisStart(e) => &e.channel.id,
        };
        Some(id.as_str())
    }
}

/// Parses a raw engine message.
///
/// The envelope is decoded first. An unknown `type` yields the envelope with
/// no payload and no error, so new engine events are forward compatible.
pub fn parse(raw: &[u8]) -> Result<(Event, Option<AriEvent>), ParseError> {
    let event: Event = serde_json::from_slice(raw).map_err(ParseError::Envelope)?;

    let Some(event_type) = event.kind() else {
        return Ok((event, None));
    };

    let payload = AriEvent::decode(event_type, raw)?;
    Ok((event, Some(payload)))
}
