// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event handler behavior against the real stores and recording mocks.

use callctl_ari::bridge_name;
use callctl_core::{
    BridgeHandler, BridgeReferenceType, CallctlError, ChannelHandler, ChannelState, ChannelTech,
    ChannelType, Direction, HangupCause, Recording, RecordingStatus,
};
use callctl_test_utils::fixtures::{self, ASTERISK_ID, CALLER_NUMBER, DIALED_EXTEN};
use callctl_test_utils::{Invocation, TestHarness};
use tracing_test::traced_test;
use uuid::Uuid;

const CHANNEL: &str = "1587307080.30";
const BRIDGE: &str = "d2f8bbb1-1ab5-4a72-bf0c-1c3e7fb1f9b1";
const PJSIP_NAME: &str = "PJSIP/in-voipbin-00000030";

async fn with_channel() -> TestHarness {
    let h = TestHarness::new().await;
    h.ingest_ok(&fixtures::channel_created(CHANNEL, PJSIP_NAME))
        .await;
    h
}

async fn with_typed_channel(channel_type: ChannelType) -> TestHarness {
    let h = with_channel().await;
    h.channels.set_type(CHANNEL, channel_type).await.unwrap();
    h
}

fn hangup(cause: HangupCause) -> Invocation {
    Invocation::ChannelHangup {
        asterisk_id: ASTERISK_ID.to_string(),
        channel_id: CHANNEL.to_string(),
        cause,
    }
}

// --- channel lifecycle ---

#[tokio::test]
async fn channel_created_registers_untyped_row() {
    let h = with_channel().await;

    let ch = h.channels.get(CHANNEL).await.unwrap();
    assert_eq!(ch.tech, ChannelTech::Pjsip);
    assert_eq!(ch.channel_type, ChannelType::None);
    assert_eq!(ch.asterisk_id, ASTERISK_ID);
    assert_eq!(ch.name, PJSIP_NAME);
    assert_eq!(ch.source_number, CALLER_NUMBER);
    assert_eq!(ch.destination_number, DIALED_EXTEN);
    assert_eq!(ch.dialplan.exten, DIALED_EXTEN);
    assert_eq!(ch.state, ChannelState::Ring);
    assert!(ch.tm_end.is_none());
    assert!(h.journal.entries().await.is_empty());
}

#[tokio::test]
async fn duplicate_channel_created_is_rejected() {
    let h = with_channel().await;
    let err = h
        .ingest(&fixtures::channel_created(CHANNEL, PJSIP_NAME))
        .await
        .unwrap_err();
    assert!(matches!(err, CallctlError::Conflict(_)));
}

#[tokio::test]
async fn call_channel_destroyed_is_forwarded() {
    let h = with_typed_channel(ChannelType::Call).await;
    h.ingest_ok(&fixtures::channel_destroyed(CHANNEL, 42)).await;

    let ch = h.channels.get(CHANNEL).await.unwrap();
    assert!(ch.tm_end.is_some());
    assert_eq!(ch.hangup_cause, HangupCause::SWITCHING_EQUIPMENT_CONGESTION);
    assert_eq!(
        h.journal.entries().await,
        vec![Invocation::CallChannelDestroyed {
            channel_id: CHANNEL.to_string()
        }]
    );
}

#[tokio::test]
async fn non_call_channel_destroyed_has_no_callbacks() {
    for channel_type in [
        ChannelType::Confbridge,
        ChannelType::Join,
        ChannelType::External,
        ChannelType::Recording,
        ChannelType::Application,
    ] {
        let h = with_typed_channel(channel_type).await;
        h.ingest_ok(&fixtures::channel_destroyed(CHANNEL, 16)).await;
        assert!(h.journal.entries().await.is_empty(), "{channel_type}");
        assert!(h.channels.get(CHANNEL).await.unwrap().tm_end.is_some());
    }
}

#[tokio::test]
#[traced_test]
async fn untyped_channel_destroyed_is_logged() {
    let h = with_channel().await;
    h.ingest_ok(&fixtures::channel_destroyed(CHANNEL, 16)).await;
    assert!(h.journal.entries().await.is_empty());
    assert!(logs_contain("destroyed channel never resolved a type"));
}

#[tokio::test]
async fn destroyed_unknown_channel_fails() {
    let h = TestHarness::new().await;
    let err = h
        .ingest(&fixtures::channel_destroyed(CHANNEL, 16))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn dtmf_is_forwarded_with_digit_and_duration() {
    let h = with_typed_channel(ChannelType::Call).await;
    h.ingest_ok(&fixtures::channel_dtmf_received(CHANNEL, "5", 100))
        .await;
    assert_eq!(
        h.journal.entries().await,
        vec![Invocation::CallDtmfReceived {
            channel_id: CHANNEL.to_string(),
            digit: "5".to_string(),
            duration_ms: 100,
        }]
    );
}

#[tokio::test]
async fn call_workflow_failure_propagates() {
    let h = TestHarness::builder().with_failing_calls().build().await;
    h.ingest_ok(&fixtures::channel_created(CHANNEL, PJSIP_NAME))
        .await;
    let err = h
        .ingest(&fixtures::channel_dtmf_received(CHANNEL, "1", 80))
        .await
        .unwrap_err();
    assert!(matches!(err, CallctlError::Collaborator { .. }));
}

#[tokio::test]
async fn state_change_updates_row_then_forwards() {
    let h = with_typed_channel(ChannelType::Call).await;
    h.ingest_ok(&fixtures::channel_state_change(CHANNEL, "Up"))
        .await;

    let ch = h.channels.get(CHANNEL).await.unwrap();
    assert_eq!(ch.state, ChannelState::Up);
    assert!(ch.tm_answer.is_some());
    assert_eq!(
        h.journal.entries().await,
        vec![Invocation::CallStateChange {
            channel_id: CHANNEL.to_string()
        }]
    );
}

// --- variables ---

#[tokio::test]
async fn varset_type_resolves_untyped_channel() {
    let h = with_channel().await;
    h.ingest_ok(&fixtures::channel_varset(CHANNEL, "VB-TYPE", "call"))
        .await;

    let ch = h.channels.get(CHANNEL).await.unwrap();
    assert_eq!(ch.channel_type, ChannelType::Call);
    assert_eq!(ch.data.get("VB-TYPE").map(String::as_str), Some("call"));
}

#[tokio::test]
async fn varset_type_does_not_override_resolved_type() {
    let h = with_typed_channel(ChannelType::Confbridge).await;
    h.ingest_ok(&fixtures::channel_varset(CHANNEL, "VB-TYPE", "call"))
        .await;
    assert_eq!(
        h.channels.get(CHANNEL).await.unwrap().channel_type,
        ChannelType::Confbridge
    );
}

#[tokio::test]
async fn varset_unrecognized_type_is_stored_only() {
    let h = with_channel().await;
    h.ingest_ok(&fixtures::channel_varset(CHANNEL, "VB-TYPE", "fax"))
        .await;
    let ch = h.channels.get(CHANNEL).await.unwrap();
    assert_eq!(ch.channel_type, ChannelType::None);
    assert_eq!(ch.data.get("VB-TYPE").map(String::as_str), Some("fax"));
}

#[tokio::test]
async fn varset_direction_and_plain_variables() {
    let h = with_channel().await;
    h.ingest_ok(&fixtures::channel_varset(CHANNEL, "VB-DIRECTION", "incoming"))
        .await;
    h.ingest_ok(&fixtures::channel_varset(
        CHANNEL,
        "STASISSTATUS",
        "SUCCESS",
    ))
    .await;

    let ch = h.channels.get(CHANNEL).await.unwrap();
    assert_eq!(ch.direction, Direction::Incoming);
    assert_eq!(
        ch.data.get("STASISSTATUS").map(String::as_str),
        Some("SUCCESS")
    );
    assert!(h.journal.entries().await.is_empty());
}

#[tokio::test]
async fn varset_for_unknown_channel_fails() {
    let h = TestHarness::new().await;
    let err = h
        .ingest(&fixtures::channel_varset(CHANNEL, "VB-TYPE", "call"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// --- bridges ---

#[tokio::test]
async fn bridge_created_then_destroyed() {
    let h = TestHarness::new().await;
    let reference_id = Uuid::new_v4();
    let name = bridge_name(BridgeReferenceType::Confbridge, reference_id);

    h.ingest_ok(&fixtures::bridge_created(BRIDGE, &name)).await;
    let bridge = h.bridges.get(BRIDGE).await.unwrap();
    assert_eq!(bridge.reference_type, BridgeReferenceType::Confbridge);
    assert_eq!(bridge.reference_id, Some(reference_id));
    assert_eq!(bridge.asterisk_id, ASTERISK_ID);

    h.ingest_ok(&fixtures::bridge_destroyed(BRIDGE)).await;
    assert!(h.bridges.get(BRIDGE).await.unwrap_err().is_not_found());
    assert_eq!(
        h.journal.entries().await,
        vec![Invocation::ConfbridgeBridgeDestroyed {
            bridge_id: BRIDGE.to_string()
        }]
    );
}

#[tokio::test]
async fn bridge_with_foreign_name_has_unknown_reference() {
    let h = TestHarness::new().await;
    h.ingest_ok(&fixtures::bridge_created(BRIDGE, "test")).await;
    let bridge = h.bridges.get(BRIDGE).await.unwrap();
    assert_eq!(bridge.reference_type, BridgeReferenceType::Unknown);
    assert!(bridge.reference_id.is_none());
}

#[tokio::test]
async fn destroyed_unknown_bridge_fails_without_callback() {
    let h = TestHarness::new().await;
    let err = h
        .ingest(&fixtures::bridge_destroyed(BRIDGE))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(h.journal.entries().await.is_empty());
}

#[tokio::test]
async fn entered_bridge_notifies_conference_only_for_confbridge_channels() {
    let cases = [
        (ChannelType::Confbridge, 1),
        (ChannelType::Call, 0),
        (ChannelType::Join, 0),
    ];
    for (channel_type, expected) in cases {
        let h = with_typed_channel(channel_type).await;
        let name = bridge_name(BridgeReferenceType::Confbridge, Uuid::new_v4());
        h.ingest_ok(&fixtures::bridge_created(BRIDGE, &name)).await;
        h.ingest_ok(&fixtures::channel_entered_bridge(CHANNEL, BRIDGE))
            .await;

        let ch = h.channels.get(CHANNEL).await.unwrap();
        assert_eq!(ch.bridge_id.as_deref(), Some(BRIDGE));
        let bridge = h.bridges.get(BRIDGE).await.unwrap();
        assert_eq!(bridge.channel_ids, vec![CHANNEL.to_string()]);
        assert_eq!(
            h.journal.count(Invocation::is_confbridge).await,
            expected,
            "{channel_type}"
        );
        assert_eq!(h.journal.count(Invocation::is_call).await, 0);
    }
}

#[tokio::test]
async fn entered_unknown_bridge_hangs_up_channel() {
    let h = with_typed_channel(ChannelType::Call).await;
    let err = h
        .ingest(&fixtures::channel_entered_bridge(CHANNEL, BRIDGE))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        h.journal.entries().await,
        vec![hangup(HangupCause::INTERWORKING)]
    );
}

#[tokio::test]
async fn entered_bridge_for_unknown_channel_hangs_up() {
    let h = TestHarness::new().await;
    h.ingest_ok(&fixtures::bridge_created(BRIDGE, "test")).await;
    let err = h
        .ingest(&fixtures::channel_entered_bridge(CHANNEL, BRIDGE))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        h.journal.entries().await,
        vec![hangup(HangupCause::INTERWORKING)]
    );
    assert!(h.bridges.get(BRIDGE).await.unwrap().channel_ids.is_empty());
}

#[tokio::test]
async fn left_bridge_routes_by_reference_type() {
    let cases = [
        (Some(BridgeReferenceType::Call), 1, 0),
        (Some(BridgeReferenceType::CallSnoop), 1, 0),
        (Some(BridgeReferenceType::Confbridge), 0, 1),
        (Some(BridgeReferenceType::ConfbridgeSnoop), 0, 1),
        (None, 0, 0),
    ];
    for (reference_type, calls, confbridges) in cases {
        let h = with_typed_channel(ChannelType::Call).await;
        let name = reference_type
            .map(|t| bridge_name(t, Uuid::new_v4()))
            .unwrap_or_else(|| "test".to_string());
        h.ingest_ok(&fixtures::bridge_created(BRIDGE, &name)).await;
        h.ingest_ok(&fixtures::channel_entered_bridge(CHANNEL, BRIDGE))
            .await;
        h.journal.clear().await;

        h.ingest_ok(&fixtures::channel_left_bridge(CHANNEL, BRIDGE))
            .await;

        assert!(h.channels.get(CHANNEL).await.unwrap().bridge_id.is_none());
        assert!(h.bridges.get(BRIDGE).await.unwrap().channel_ids.is_empty());
        assert_eq!(
            h.journal.count(Invocation::is_call).await,
            calls,
            "{reference_type:?}"
        );
        assert_eq!(
            h.journal.count(Invocation::is_confbridge).await,
            confbridges,
            "{reference_type:?}"
        );
    }
}

#[tokio::test]
async fn left_bridge_for_unknown_channel_hangs_up() {
    let h = TestHarness::new().await;
    let name = bridge_name(BridgeReferenceType::Call, Uuid::new_v4());
    h.ingest_ok(&fixtures::bridge_created(BRIDGE, &name)).await;
    let err = h
        .ingest(&fixtures::channel_left_bridge(CHANNEL, BRIDGE))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        h.journal.entries().await,
        vec![hangup(HangupCause::INTERWORKING)]
    );
}

#[tokio::test]
async fn left_unknown_bridge_hangs_up_channel() {
    let h = with_typed_channel(ChannelType::Call).await;
    let err = h
        .ingest(&fixtures::channel_left_bridge(CHANNEL, BRIDGE))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        h.journal.entries().await,
        vec![hangup(HangupCause::INTERWORKING)]
    );
    assert_eq!(h.journal.count(Invocation::is_call).await, 0);
    assert_eq!(h.journal.count(Invocation::is_confbridge).await, 0);
}

// --- application entry and exit ---

#[tokio::test]
async fn stasis_start_resolves_call_channel() {
    let h = with_channel().await;
    h.ingest_ok(&fixtures::stasis_start(
        CHANNEL,
        &["context_type=call", "context=call-in", "domain=pstn.voipbin.net"],
    ))
    .await;

    let ch = h.channels.get(CHANNEL).await.unwrap();
    assert_eq!(ch.channel_type, ChannelType::Call);
    assert_eq!(ch.stasis_name.as_deref(), Some(fixtures::APPLICATION));
    assert_eq!(
        ch.stasis_data.get("domain").map(String::as_str),
        Some("pstn.voipbin.net")
    );
    assert_eq!(
        h.journal.entries().await,
        vec![Invocation::CallStasisStart {
            channel_id: CHANNEL.to_string()
        }]
    );
}

#[tokio::test]
async fn stasis_start_resolves_conference_channel() {
    let h = with_channel().await;
    h.ingest_ok(&fixtures::stasis_start(
        CHANNEL,
        &["context_type=conference", "context=conf-in"],
    ))
    .await;

    assert_eq!(
        h.channels.get(CHANNEL).await.unwrap().channel_type,
        ChannelType::Confbridge
    );
    assert_eq!(
        h.journal.entries().await,
        vec![Invocation::ConfbridgeStasisStart {
            channel_id: CHANNEL.to_string()
        }]
    );
}

#[tokio::test]
async fn stasis_reentry_keeps_resolved_type() {
    let h = with_typed_channel(ChannelType::Call).await;
    h.ingest_ok(&fixtures::stasis_start(
        CHANNEL,
        &["context_type=call", "context=call-join"],
    ))
    .await;
    assert_eq!(
        h.channels.get(CHANNEL).await.unwrap().channel_type,
        ChannelType::Call
    );
    assert_eq!(h.journal.count(Invocation::is_call).await, 1);
}

#[tokio::test]
async fn workflow_contexts_resolve_non_call_types() {
    let cases = [
        ("call-join", ChannelType::Join),
        ("call-externalsnoop", ChannelType::External),
        ("call-externalmedia", ChannelType::External),
        ("call-record", ChannelType::Recording),
        ("call-application", ChannelType::Application),
    ];
    for (context, expected) in cases {
        let h = with_channel().await;
        let context_arg = format!("context={context}");
        h.ingest_ok(&fixtures::stasis_start(
            CHANNEL,
            &["context_type=call", &context_arg],
        ))
        .await;
        assert_eq!(
            h.channels.get(CHANNEL).await.unwrap().channel_type,
            expected,
            "{context}"
        );
        h.journal.clear().await;

        h.ingest_ok(&fixtures::channel_destroyed(CHANNEL, 16)).await;
        assert_eq!(h.journal.count(Invocation::is_call).await, 0, "{context}");
    }
}

#[tokio::test]
async fn stasis_start_for_unknown_channel_hangs_up() {
    let h = TestHarness::new().await;
    let err = h
        .ingest(&fixtures::stasis_start(CHANNEL, &["context_type=call"]))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(
        h.journal.entries().await,
        vec![hangup(HangupCause::INTERWORKING)]
    );
}

#[tokio::test]
async fn stasis_start_without_context_type_has_no_route() {
    let h = with_channel().await;
    let err = h
        .ingest(&fixtures::stasis_start(CHANNEL, &["context=call-in"]))
        .await
        .unwrap_err();

    assert!(matches!(err, CallctlError::NoRoute { .. }));
    assert_eq!(
        h.journal.entries().await,
        vec![hangup(HangupCause::NO_ROUTE_DESTINATION)]
    );
    assert_eq!(
        h.channels.get(CHANNEL).await.unwrap().channel_type,
        ChannelType::None
    );
}

#[tokio::test]
async fn failed_hangup_does_not_mask_original_error() {
    let h = TestHarness::builder().with_failing_requests().build().await;
    let err = h
        .ingest(&fixtures::stasis_start(CHANNEL, &["context_type=call"]))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(h.journal.entries().await.len(), 1);
}

#[tokio::test]
async fn stasis_end_clears_application() {
    let h = with_channel().await;
    h.ingest_ok(&fixtures::stasis_start(CHANNEL, &["context_type=call"]))
        .await;
    h.ingest_ok(&fixtures::stasis_end(CHANNEL)).await;
    assert!(h.channels.get(CHANNEL).await.unwrap().stasis_name.is_none());
}

#[tokio::test]
#[traced_test]
async fn stasis_end_for_unknown_channel_is_swallowed() {
    let h = TestHarness::new().await;
    h.ingest_ok(&fixtures::stasis_end(CHANNEL)).await;
    assert!(logs_contain("could not clear stasis name"));
}

// --- playback and recording ---

#[tokio::test]
async fn playback_finished_on_live_channel_is_forwarded() {
    let h = with_typed_channel(ChannelType::Call).await;
    let target = format!("channel:{CHANNEL}");
    h.ingest_ok(&fixtures::playback_started("p1", &target)).await;
    assert_eq!(
        h.channels.get(CHANNEL).await.unwrap().playback_id.as_deref(),
        Some("p1")
    );

    h.ingest_ok(&fixtures::playback_finished("p1", &target)).await;
    assert!(h.channels.get(CHANNEL).await.unwrap().playback_id.is_none());
    assert_eq!(
        h.journal.entries().await,
        vec![Invocation::CallPlaybackFinished {
            channel_id: CHANNEL.to_string(),
            playback_id: "p1".to_string(),
        }]
    );
}

#[tokio::test]
async fn playback_finished_after_hangup_is_not_forwarded() {
    let h = with_channel().await;
    let target = format!("channel:{CHANNEL}");
    h.ingest_ok(&fixtures::playback_started("p1", &target)).await;
    h.ingest_ok(&fixtures::channel_destroyed(CHANNEL, 16)).await;

    h.ingest_ok(&fixtures::playback_finished("p1", &target)).await;
    assert!(h.channels.get(CHANNEL).await.unwrap().playback_id.is_none());
    assert_eq!(h.journal.count(Invocation::is_call).await, 0);
}

#[tokio::test]
async fn playback_on_bridge_or_unknown_channel_is_ignored() {
    let h = TestHarness::new().await;
    h.ingest_ok(&fixtures::playback_started("p1", "bridge:b1")).await;
    h.ingest_ok(&fixtures::playback_finished("p1", "bridge:b1")).await;
    h.ingest_ok(&fixtures::playback_started("p2", "channel:ghost"))
        .await;
    h.ingest_ok(&fixtures::playback_finished("p2", "channel:ghost"))
        .await;
    assert!(h.journal.entries().await.is_empty());
}

fn recording(name: &str) -> Recording {
    Recording {
        id: Uuid::new_v4(),
        customer_id: Uuid::new_v4(),
        recording_name: name.to_string(),
        status: RecordingStatus::Initiating,
    }
}

#[tokio::test]
async fn outbound_recording_leg_is_ignored() {
    let h = TestHarness::builder()
        .with_recording(recording("call_abc"))
        .build()
        .await;
    h.ingest_ok(&fixtures::recording_started("call_abc_out"))
        .await;
    h.ingest_ok(&fixtures::recording_finished("call_abc_out"))
        .await;
    assert!(h.journal.entries().await.is_empty());
}

#[tokio::test]
async fn inbound_recording_leg_drives_status() {
    let rec = recording("call_abc");
    let id = rec.id;
    let h = TestHarness::builder().with_recording(rec).build().await;

    h.ingest_ok(&fixtures::recording_started("call_abc_in")).await;
    assert_eq!(
        h.journal.entries().await,
        vec![
            Invocation::RecordingLookup("call_abc".to_string()),
            Invocation::RecordingStarted(id),
        ]
    );
    assert_eq!(
        h.recordings.get("call_abc").await.unwrap().status,
        RecordingStatus::Recording
    );

    h.ingest_ok(&fixtures::recording_finished("call_abc_in"))
        .await;
    assert_eq!(h.journal.count(Invocation::is_recording).await, 4);
    assert_eq!(
        h.recordings.get("call_abc").await.unwrap().status,
        RecordingStatus::Ended
    );
}

#[tokio::test]
async fn unknown_recording_fails() {
    let h = TestHarness::new().await;
    let err = h
        .ingest(&fixtures::recording_started("missing_in"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// --- registrar and ignored events ---

#[tokio::test]
async fn contact_status_refreshes_registrar() {
    let h = TestHarness::new().await;
    h.ingest_ok(&fixtures::contact_status_change(
        "test11@test.trunk.voipbin.net",
    ))
    .await;
    assert_eq!(
        h.journal.entries().await,
        vec![Invocation::RegistrarRefresh {
            customer_id: "test".to_string(),
            extension: "test11".to_string(),
        }]
    );
}

#[tokio::test]
async fn contact_without_domain_is_invalid() {
    let h = TestHarness::new().await;
    let err = h
        .ingest(&fixtures::contact_status_change("test11"))
        .await
        .unwrap_err();
    assert!(matches!(err, CallctlError::InvalidResource(_)));
    assert!(h.journal.entries().await.is_empty());
}

#[tokio::test]
async fn ignored_and_unknown_events_have_no_effect() {
    let h = with_channel().await;
    h.ingest_ok(&fixtures::channel_hangup_request(CHANNEL)).await;
    h.ingest_ok(r#"{"type":"ApplicationReplaced","application":"voipbin"}"#)
        .await;

    assert!(h.journal.entries().await.is_empty());
    let ch = h.channels.get(CHANNEL).await.unwrap();
    assert!(ch.tm_end.is_none());
}

#[tokio::test]
async fn malformed_event_is_a_decode_error() {
    let h = TestHarness::new().await;
    let err = h.ingest("{not json").await.unwrap_err();
    assert!(matches!(err, CallctlError::Decode { .. }));
}
