// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine event fixtures shaped like captured production traffic.

use serde_json::{Value, json};

pub const ASTERISK_ID: &str = "42:01:0a:a4:00:05";
pub const APPLICATION: &str = "voipbin";
pub const TIMESTAMP: &str = "2020-04-19T14:38:00.363+0000";

/// Caller number carried by [`channel`] snapshots.
pub const CALLER_NUMBER: &str = "68025";

/// Dialplan extension carried by [`channel`] snapshots.
pub const DIALED_EXTEN: &str = "011441332323027";

/// A channel snapshot.
pub fn channel(id: &str, name: &str, state: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "state": state,
        "caller": {"name": "", "number": CALLER_NUMBER},
        "connected": {"name": "", "number": ""},
        "accountcode": "",
        "dialplan": {
            "context": "in-voipbin",
            "exten": DIALED_EXTEN,
            "priority": 1,
            "app_name": "",
            "app_data": ""
        },
        "creationtime": TIMESTAMP,
        "language": "en"
    })
}

/// A bridge snapshot.
pub fn bridge(id: &str, name: &str, channels: &[&str]) -> Value {
    json!({
        "id": id,
        "technology": "simple_bridge",
        "bridge_type": "mixing",
        "bridge_class": "stasis",
        "creator": "Stasis",
        "name": name,
        "channels": channels,
        "creationtime": TIMESTAMP,
        "video_mode": "talker"
    })
}

/// Wraps `body` in the event envelope.
pub fn event(event_type: &str, mut body: Value) -> String {
    if let Value::Object(fields) = &mut body {
        fields.insert("type".into(), event_type.into());
        fields.insert("timestamp".into(), TIMESTAMP.into());
        fields.insert("asterisk_id".into(), ASTERISK_ID.into());
        fields.insert("application".into(), APPLICATION.into());
    }
    body.to_string()
}

pub fn channel_created(id: &str, name: &str) -> String {
    event("ChannelCreated", json!({ "channel": channel(id, name, "Ring") }))
}

pub fn channel_destroyed(id: &str, cause: u16) -> String {
    event(
        "ChannelDestroyed",
        json!({
            "cause": cause,
            "cause_txt": "Normal Clearing",
            "channel": channel(id, "PJSIP/in-voipbin-00000030", "Up"),
        }),
    )
}

pub fn channel_dtmf_received(id: &str, digit: &str, duration_ms: i64) -> String {
    event(
        "ChannelDtmfReceived",
        json!({
            "digit": digit,
            "duration_ms": duration_ms,
            "channel": channel(id, "PJSIP/call-in-00000633", "Up"),
        }),
    )
}

pub fn channel_state_change(id: &str, state: &str) -> String {
    event(
        "ChannelStateChange",
        json!({ "channel": channel(id, "PJSIP/in-voipbin-00000fc8", state) }),
    )
}

pub fn channel_varset(id: &str, variable: &str, value: &str) -> String {
    event(
        "ChannelVarset",
        json!({
            "variable": variable,
            "value": value,
            "channel": channel(id, "PJSIP/call-in-00004fb4", "Ring"),
        }),
    )
}

pub fn channel_hangup_request(id: &str) -> String {
    event(
        "ChannelHangupRequest",
        json!({ "cause": 16, "channel": channel(id, "PJSIP/in-voipbin-00000c0f", "Up") }),
    )
}

pub fn channel_entered_bridge(channel_id: &str, bridge_id: &str) -> String {
    event(
        "ChannelEnteredBridge",
        json!({
            "bridge": bridge(bridge_id, "test", &[channel_id]),
            "channel": channel(channel_id, "PJSIP/in-voipbin-00000050", "Ring"),
        }),
    )
}

pub fn channel_left_bridge(channel_id: &str, bridge_id: &str) -> String {
    event(
        "ChannelLeftBridge",
        json!({
            "bridge": bridge(bridge_id, "test", &[]),
            "channel": channel(channel_id, "PJSIP/in-voipbin-00000050", "Up"),
        }),
    )
}

pub fn bridge_created(id: &str, name: &str) -> String {
    event("BridgeCreated", json!({ "bridge": bridge(id, name, &[]) }))
}

pub fn bridge_destroyed(id: &str) -> String {
    event("BridgeDestroyed", json!({ "bridge": bridge(id, "test", &[]) }))
}

pub fn stasis_start(id: &str, args: &[&str]) -> String {
    event(
        "StasisStart",
        json!({
            "args": args,
            "channel": channel(id, "PJSIP/in-voipbin-00000948", "Ring"),
        }),
    )
}

pub fn stasis_end(id: &str) -> String {
    event(
        "StasisEnd",
        json!({ "channel": channel(id, "PJSIP/in-voipbin-00000bcb", "Up") }),
    )
}

fn playback(id: &str, target_uri: &str) -> Value {
    json!({
        "id": id,
        "language": "en",
        "media_uri": "sound:/mnt/media/tts/00ad7c95",
        "state": "done",
        "target_uri": target_uri,
    })
}

pub fn playback_started(id: &str, target_uri: &str) -> String {
    event("PlaybackStarted", json!({ "playback": playback(id, target_uri) }))
}

pub fn playback_finished(id: &str, target_uri: &str) -> String {
    event("PlaybackFinished", json!({ "playback": playback(id, target_uri) }))
}

fn recording(name: &str, state: &str) -> Value {
    json!({
        "name": name,
        "format": "wav",
        "state": state,
        "target_uri": "channel:test_call",
    })
}

pub fn recording_started(name: &str) -> String {
    event("RecordingStarted", json!({ "recording": recording(name, "recording") }))
}

pub fn recording_finished(name: &str) -> String {
    event("RecordingFinished", json!({ "recording": recording(name, "done") }))
}

pub fn contact_status_change(resource: &str) -> String {
    event(
        "ContactStatusChange",
        json!({
            "contact_info": {
                "uri": "sip:jgo101ml@r5e5vuutihlr.invalid;transport=ws",
                "roundtrip_usec": "0",
                "aor": resource,
                "contact_status": "NonQualified",
            },
            "endpoint": {
                "channel_ids": [],
                "resource": resource,
                "state": "online",
                "technology": "PJSIP",
            },
        }),
    )
}
