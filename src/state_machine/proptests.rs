//! Property-based tests for the dialogue state machine
//!
//! These tests verify the context invariants hold across arbitrary
//! conversations.

use super::state::*;
use super::transition::*;
use super::*;
use crate::navigation::Facility;
use chrono::Utc;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_waypoint_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("cafeteria"),
        Just("reception"),
        Just("parking lot"),
        Just("security office"),
        Just("compost"),
        Just("recycling zone"),
        Just("nowhere"),
    ]
    .prop_map(String::from)
}

fn arb_utterance() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => (arb_waypoint_name(), arb_waypoint_name())
            .prop_map(|(a, b)| format!("path from {a} to {b}")),
        3 => prop_oneof![Just("yes"), Just("continue"), Just("more"), Just("next please")]
            .prop_map(String::from),
        3 => arb_waypoint_name(),
        1 => Just("directions".to_string()),
        1 => "[a-z ]{1,20}",
    ]
}

/// Either a user utterance or a collaborator reply for it
fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        4 => arb_utterance().prop_map(Event::user_message),
        1 => (arb_utterance(), proptest::option::of("[a-zA-Z ]{0,20}")).prop_map(|(text, reply)| {
            Event::CollaboratorReply {
                text,
                reply,
                received_at: Utc::now(),
            }
        }),
    ]
}

fn run(context: &ConversationContext, facility: &Facility, event: Event) -> Option<TransitionResult> {
    match transition(context, facility, event) {
        Ok(result) => Some(result),
        Err(TransitionError::EmptyUtterance) => None,
        Err(e) => panic!("unexpected internal fault: {e}"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Invariant 1: context stays consistent after every transition
    #[test]
    fn prop_context_invariants_hold(events in proptest::collection::vec(arb_event(), 1..25)) {
        let facility = Facility::sample().unwrap();
        let mut ctx = ConversationContext::default();

        for event in events {
            if let Some(result) = run(&ctx, &facility, event) {
                ctx = result.new_context;
                prop_assert!(ctx.is_consistent(), "inconsistent context: {:?}", ctx);
                prop_assert_eq!(
                    ctx.awaiting_next_destination(),
                    ctx.current_start_location().is_some()
                );
            }
        }
    }

    // Invariant 2: history only grows, by at most one turn per transition
    #[test]
    fn prop_history_is_append_only(events in proptest::collection::vec(arb_event(), 1..25)) {
        let facility = Facility::sample().unwrap();
        let mut ctx = ConversationContext::default();

        for event in events {
            if let Some(result) = run(&ctx, &facility, event) {
                let before = ctx.history.clone();
                let after = &result.new_context.history;
                prop_assert!(after.len() == before.len() || after.len() == before.len() + 1);
                prop_assert_eq!(&after[..before.len()], &before[..]);
                // A reply is emitted exactly when a turn is recorded
                prop_assert_eq!(result.reply().is_some(), after.len() > before.len());
                ctx = result.new_context;
            }
        }
    }

    // Invariant 3: fallback never touches pathfinding fields
    #[test]
    fn prop_fallback_preserves_route_state(
        prefix in proptest::collection::vec(arb_event(), 0..10),
        chatter in "[a-z]{1,10} [a-z]{1,10}",
    ) {
        let facility = Facility::sample().unwrap();
        let mut ctx = ConversationContext::default();
        for event in prefix {
            if let Some(result) = run(&ctx, &facility, event) {
                ctx = result.new_context;
            }
        }

        if let Some(result) = run(&ctx, &facility, Event::user_message(chatter)) {
            if matches!(result.effects.as_slice(), [Effect::ConsultCollaborators { .. }]) {
                prop_assert_eq!(&result.new_context, &ctx);
            }
        }
    }

    // Invariant 4: a continuation word with a prior route always awaits its destination
    #[test]
    fn prop_continuation_awaits_last_destination(
        a in arb_waypoint_name(),
        b in arb_waypoint_name(),
        word in prop_oneof![Just("yes"), Just("continue"), Just("more"), Just("next")],
    ) {
        let facility = Facility::sample().unwrap();
        let ctx = ConversationContext::default();
        let first = run(&ctx, &facility, Event::user_message(format!("path from {a} to {b}"))).unwrap();

        if let Some(destination) = first.new_context.continuation_point().map(String::from) {
            let second = run(&first.new_context, &facility, Event::user_message(word)).unwrap();
            prop_assert_eq!(
                second.new_context.current_start_location(),
                Some(destination.as_str())
            );
        } else {
            prop_assert_eq!(first.new_context.last_topic, Topic::None);
        }
    }
}
