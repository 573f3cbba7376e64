//! Property-based tests for the call controller
//!
//! Random sequences of start/reset/submit must keep the lifecycle and
//! transcript invariants intact after every step.

use super::*;
use crate::dialogue::testing::EchoCollaborator;
use crate::profile::BusinessProfile;
use futures::executor::block_on;
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Op {
    Start,
    Reset,
    Submit(String),
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ \t\n]{1,5}",
        "[a-z ]{1,20}",
        Just("bye".to_string()),
        Just("  ok bye  ".to_string()),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Start),
        1 => Just(Op::Reset),
        4 => arb_text().prop_map(Op::Submit),
    ]
}

fn new_controller() -> CallController<EchoCollaborator> {
    CallController::new(
        Arc::new(EchoCollaborator),
        Arc::new(SequentialIds::new()),
        Arc::new(BusinessProfile::sample()),
    )
}

fn apply(controller: &mut CallController<EchoCollaborator>, op: &Op) -> Option<SubmitOutcome> {
    match op {
        Op::Start => {
            controller.start();
            None
        }
        Op::Reset => {
            controller.reset();
            None
        }
        Op::Submit(text) => Some(block_on(controller.submit(text))),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_not_started_iff_empty(ops in proptest::collection::vec(arb_op(), 0..30)) {
        let mut controller = new_controller();
        for op in &ops {
            apply(&mut controller, op);
            prop_assert_eq!(
                controller.phase() == CallPhase::NotStarted,
                controller.transcript().is_empty()
            );
        }
    }

    #[test]
    fn prop_ids_strictly_increase_across_calls(ops in proptest::collection::vec(arb_op(), 0..30)) {
        let mut controller = new_controller();
        let mut max_seen: Option<EntryId> = None;
        let mut prev_call = None;
        let mut prev_len = 0;
        for op in &ops {
            apply(&mut controller, op);
            let snapshot = controller.snapshot();
            for pair in snapshot.transcript.windows(2) {
                prop_assert!(pair[0].id < pair[1].id);
            }
            // Entries this step appended, or the whole transcript of a fresh call
            let created = if snapshot.call_id.is_some() && snapshot.call_id == prev_call {
                &snapshot.transcript[prev_len..]
            } else {
                &snapshot.transcript[..]
            };
            for entry in created {
                if let Some(max) = max_seen {
                    prop_assert!(entry.id > max, "{:?} not above {:?}", entry.id, max);
                }
                max_seen = Some(entry.id);
            }
            prev_call = snapshot.call_id;
            prev_len = snapshot.transcript.len();
        }
    }

    #[test]
    fn prop_blank_or_inactive_submit_changes_nothing(
        ops in proptest::collection::vec(arb_op(), 0..20),
        text in arb_text(),
    ) {
        let mut controller = new_controller();
        for op in &ops {
            apply(&mut controller, op);
        }
        let before = controller.snapshot();
        let outcome = block_on(controller.submit(&text));

        if before.phase != CallPhase::Active || text.trim().is_empty() {
            prop_assert!(matches!(outcome, SubmitOutcome::Ignored(_)));
            prop_assert_eq!(controller.snapshot(), before);
        } else {
            prop_assert!(outcome.is_accepted());
        }
    }

    #[test]
    fn prop_accepted_turn_is_caller_then_agents(
        ops in proptest::collection::vec(arb_op(), 0..20),
        text in "[a-z]{1,10}",
    ) {
        let mut controller = new_controller();
        for op in &ops {
            apply(&mut controller, op);
        }
        if controller.phase() != CallPhase::Active {
            controller.start();
        }
        let before = controller.transcript().len();

        let outcome = block_on(controller.submit(&text));
        prop_assert!(outcome.is_accepted());

        let added = &controller.transcript()[before..];
        prop_assert_eq!(added[0].author, Author::Caller);
        prop_assert_eq!(&added[0].text, &text);
        prop_assert!(added[1..].iter().all(|e| e.author == Author::Agent));
    }

    #[test]
    fn prop_callers_never_adjacent_with_replying_agent(
        ops in proptest::collection::vec(arb_op(), 0..40),
    ) {
        let mut controller = new_controller();
        for op in &ops {
            apply(&mut controller, op);
            let transcript = controller.session().map(CallSession::transcript);
            prop_assert!(transcript.is_none_or(Transcript::turns_alternate));
        }
    }

    #[test]
    fn prop_start_yields_single_agent_entry(ops in proptest::collection::vec(arb_op(), 0..20)) {
        let mut controller = new_controller();
        for op in &ops {
            apply(&mut controller, op);
        }
        controller.start();
        prop_assert_eq!(controller.phase(), CallPhase::Active);
        prop_assert_eq!(controller.transcript().len(), 1);
        prop_assert_eq!(controller.transcript()[0].author, Author::Agent);
    }

    #[test]
    fn prop_reset_always_clears(ops in proptest::collection::vec(arb_op(), 0..20)) {
        let mut controller = new_controller();
        for op in &ops {
            apply(&mut controller, op);
        }
        controller.reset();
        prop_assert_eq!(controller.phase(), CallPhase::NotStarted);
        prop_assert!(controller.transcript().is_empty());
    }

    #[test]
    fn prop_ended_only_after_agent_signal(ops in proptest::collection::vec(arb_op(), 0..30)) {
        let mut controller = new_controller();
        for op in &ops {
            let before = controller.phase();
            let outcome = apply(&mut controller, op);
            if controller.phase() == CallPhase::Ended && before != CallPhase::Ended {
                prop_assert_eq!(before, CallPhase::Active);
                let ended_by_agent = matches!(outcome, Some(SubmitOutcome::Accepted { ended: true, .. }));
                prop_assert!(ended_by_agent);
            }
        }
    }
}
