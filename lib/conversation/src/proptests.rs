//! Property-based tests for the conversation store.
//!
//! Arbitrary action sequences must keep the transcript invariants.

use crate::message::ContentType;
use crate::store::ConversationStore;
use crate::testing::{RecordingDriver, RecordingNotifier};
use proptest::prelude::*;
use roomchat_actions::action::{
    DataChannelsAvailable, ReceivedTextChatMessage, RemotePeerConnected, RemotePeerDisconnected,
    SendTextChatMessage, SetOwnDisplayName, UpdateRoomContext, UpdateRoomInfo,
};
use roomchat_actions::{Action, RoomContextUrl};
use std::sync::Arc;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_store() -> ConversationStore {
    ConversationStore::builder()
        .data_driver(Arc::new(RecordingDriver::default()))
        .notifier(Arc::new(RecordingNotifier::default()))
        .build()
        .expect("store should build")
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_content_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("chat-text".to_string()),
        Just("context-tile".to_string()),
        Just("chat-notification".to_string()),
        Just("chat-context".to_string()),
        Just("room-name".to_string()),
        "[a-z]{3,8}",
    ]
}

fn arb_host() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("https://docs.example.com/".to_string()),
        Just("https://news.example.org/page".to_string()),
        Just("nonsense".to_string()),
    ]
}

fn arb_received() -> impl Strategy<Value = Action> {
    (
        arb_content_type(),
        "[a-zA-Z ]{0,20}",
        proptest::option::of(prop_oneof![Just("Ada".to_string()), Just("Bob".to_string())]),
    )
        .prop_map(|(content_type, message, display_name)| {
            ReceivedTextChatMessage {
                content_type,
                message,
                received_timestamp: 1_000.0,
                display_name,
                sent_timestamp: None,
                extra_data: None,
            }
            .into()
        })
}

fn arb_sent() -> impl Strategy<Value = Action> {
    (arb_content_type(), "[a-zA-Z ]{0,20}").prop_map(|(content_type, message)| {
        SendTextChatMessage {
            content_type,
            message,
            sent_timestamp: 2_000.0,
            extra_data: None,
        }
        .into()
    })
}

fn arb_room_info() -> impl Strategy<Value = Action> {
    (
        proptest::option::of("[a-zA-Z]{0,10}"),
        proptest::collection::vec(("[a-zA-Z ]{0,10}", arb_host()), 0..3),
    )
        .prop_map(|(room_name, urls)| {
            UpdateRoomInfo {
                room_url: "https://rooms.example.com/r".to_string(),
                participants: None,
                room_context_urls: Some(
                    urls.into_iter()
                        .map(|(description, location)| RoomContextUrl {
                            description: Some(description),
                            location: Some(location),
                            thumbnail: None,
                        })
                        .collect(),
                ),
                room_info_failure: None,
                room_name,
                room_state: None,
            }
            .into()
        })
}

fn arb_room_context() -> impl Strategy<Value = Action> {
    arb_host().prop_map(|url| {
        UpdateRoomContext {
            room_token: "tok".to_string(),
            new_room_name: None,
            new_room_description: None,
            new_room_thumbnail: None,
            new_room_url: Some(url),
            sent_timestamp: None,
        }
        .into()
    })
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        any::<bool>().prop_map(|available| Action::from(DataChannelsAvailable { available })),
        any::<bool>().prop_map(|peer_hungup| Action::from(RemotePeerDisconnected { peer_hungup })),
        Just(Action::from(RemotePeerConnected {})),
        prop_oneof![Just("Ada"), Just("Bob")].prop_map(|name| {
            Action::from(SetOwnDisplayName {
                display_name: name.to_string(),
            })
        }),
        arb_received(),
        arb_sent(),
        arb_room_info(),
        arb_room_context(),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_at_most_one_context(actions in proptest::collection::vec(arb_action(), 0..40)) {
        let mut store = test_store();
        for action in &actions {
            store.dispatch(action);
            let state = store.state();
            prop_assert!(state.messages_of(&ContentType::Context).count() <= 1);
        }
    }

    #[test]
    fn prop_snapshots_never_change(actions in proptest::collection::vec(arb_action(), 1..40)) {
        let mut store = test_store();
        let mut snapshots = Vec::new();
        for action in &actions {
            let before = store.state();
            let copy = (*before).clone();
            snapshots.push((before, copy));
            store.dispatch(action);
        }
        for (snapshot, copy) in &snapshots {
            prop_assert_eq!(snapshot.as_ref(), copy);
        }
    }

    #[test]
    fn prop_transcript_only_grows_at_the_end(actions in proptest::collection::vec(arb_action(), 1..40)) {
        let mut store = test_store();
        for action in &actions {
            let before = store.state();
            store.dispatch(action);
            let after = store.state();
            prop_assert!(after.messages.len() >= before.messages.len());
            prop_assert!(after.messages.len() <= before.messages.len() + 1);
            for (old, new) in before.messages.iter().zip(after.messages.iter()) {
                if old.content_type != ContentType::Context {
                    prop_assert_eq!(old, new);
                }
            }
        }
    }
}
