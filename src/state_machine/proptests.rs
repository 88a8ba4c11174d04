//! Property-based tests for the booking state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::*;
use crate::branch::Branch;
use crate::i18n::Language;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> DialogContext {
    DialogContext::new("U-prop")
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_step() -> impl Strategy<Value = BookingStep> {
    prop_oneof![
        Just(BookingStep::PickLanguage),
        Just(BookingStep::PickBranch),
        Just(BookingStep::PickDate),
        Just(BookingStep::PickTime),
        Just(BookingStep::PickService),
        Just(BookingStep::AskName),
        Just(BookingStep::AskPhone),
        Just(BookingStep::AskDiscount),
        Just(BookingStep::Confirm),
        Just(BookingStep::Completed),
    ]
}

fn arb_language() -> impl Strategy<Value = Language> {
    prop_oneof![Just(Language::En), Just(Language::Th), Just(Language::Ja)]
}

/// A session whose collected fields are consistent with its step
fn arb_session() -> impl Strategy<Value = Session> {
    (arb_step(), arb_language(), "[A-Za-z ]{1,12}").prop_map(|(step, language, name)| {
        let mut fields = BookingFields::default();
        if step > BookingStep::PickBranch {
            fields.branch = Some(Branch::ThongLo);
        }
        if step > BookingStep::PickDate {
            fields.date = BookingDate::parse_text("2025-03-05");
        }
        if step > BookingStep::PickTime {
            fields.time = BookingTime::parse_text("13:00");
        }
        if step > BookingStep::PickService {
            fields.service = Some("Color".to_string());
        }
        if step > BookingStep::AskName {
            fields.name = Some(name);
        }
        if step > BookingStep::AskPhone {
            fields.phone = PhoneNumber::parse("0812345678");
        }
        if step > BookingStep::AskDiscount {
            fields.discount = Some(Discount::NoDiscount);
        }
        Session {
            language: (step > BookingStep::PickLanguage).then_some(language),
            step: Some(step),
            fields,
        }
    })
}

fn arb_completed_session() -> impl Strategy<Value = Session> {
    arb_session().prop_map(|mut session| {
        session.step = Some(BookingStep::Completed);
        session
    })
}

fn arb_text_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-zA-Z0-9 +:-]{0,20}".prop_map(Event::Text),
        Just(Event::Text("2025-03-05".to_string())),
        Just(Event::Text("09:00".to_string())),
        Just(Event::Text("+66812345678".to_string())),
        Just(Event::Text("thong lo".to_string())),
        Just(Event::Text("no".to_string())),
    ]
}

fn arb_action_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-z]{2}".prop_map(|code| Event::Action(BookingAction::Language(code))),
        Just(Event::Action(BookingAction::Language("ja".to_string()))),
        Just(Event::Action(BookingAction::Branch("PHROMPHONG".to_string()))),
        Just(Event::Action(BookingAction::DatePicked("2025-03-05".to_string()))),
        Just(Event::Action(BookingAction::TimePicked("17:00".to_string()))),
        Just(Event::Action(BookingAction::Confirm)),
        Just(Event::Action(BookingAction::Restart)),
        "[a-z=]{0,10}".prop_map(|data| Event::Action(BookingAction::Other(data))),
    ]
}

/// Any event except the start trigger
fn arb_non_start_event() -> impl Strategy<Value = Event> {
    prop_oneof![arb_text_event(), arb_action_event()]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        8 => arb_non_start_event(),
        1 => Just(Event::Start),
    ]
}

// ============================================================================
// Validity Checkers
// ============================================================================

/// Every step past a field's step has that field collected
fn is_valid_session(session: &Session) -> bool {
    let Some(step) = session.step else {
        return session == &Session::default();
    };
    let f = &session.fields;
    (step <= BookingStep::PickLanguage || session.language.is_some())
        && (step <= BookingStep::PickBranch || f.branch.is_some())
        && (step <= BookingStep::PickDate || f.date.is_some())
        && (step <= BookingStep::PickTime || f.time.is_some())
        && (step <= BookingStep::PickService || f.service.is_some())
        && (step <= BookingStep::AskName || f.name.is_some())
        && (step <= BookingStep::AskPhone || f.phone.is_some())
        && (step <= BookingStep::AskDiscount || f.discount.is_some())
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: Valid session after any event sequence
    #[test]
    fn prop_transitions_preserve_validity(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut session = Session::default();
        let ctx = test_context();

        for event in events {
            if let Ok(result) = transition(&session, &ctx, event) {
                session = result.new_session;
                prop_assert!(is_valid_session(&session), "Invalid session: {:?}", session);
            }
        }
    }

    // Invariant 2: Completion is silent for everything but a start trigger
    #[test]
    fn prop_completed_ignores_input(session in arb_completed_session(), event in arb_non_start_event()) {
        let result = transition(&session, &test_context(), event);
        prop_assert_eq!(result.unwrap_err(), TransitionError::AlreadyCompleted);
    }

    // Invariant 3: A start trigger resets from any state
    #[test]
    fn prop_start_always_resets(session in arb_session()) {
        let result = transition(&session, &test_context(), Event::Start).unwrap();
        prop_assert_eq!(&result.new_session, &Session::begin());
        prop_assert_eq!(&result.effects[0], &Effect::ResetSession);
        prop_assert!(result.replies().count() > 0);
    }

    // Invariant 4: No backward movement except restart
    #[test]
    fn prop_steps_never_go_backwards(session in arb_session(), event in arb_non_start_event()) {
        prop_assume!(!session.completed());
        let is_restart = event == Event::Action(BookingAction::Restart)
            && session.step == Some(BookingStep::Confirm);
        let result = transition(&session, &test_context(), event).unwrap();
        if !is_restart {
            prop_assert!(result.new_session.step >= session.step);
        }
    }

    // Invariant 5: Staying on a step never changes the session and never persists
    #[test]
    fn prop_reprompt_is_side_effect_free(session in arb_session(), event in arb_non_start_event()) {
        prop_assume!(!session.completed());
        let result = transition(&session, &test_context(), event).unwrap();
        if result.new_session.step == session.step {
            prop_assert_eq!(&result.new_session, &session);
            prop_assert!(!result.effects.contains(&Effect::PersistSession));
            prop_assert!(result.replies().count() > 0, "Re-prompt must say something");
        }
    }

    // Invariant 6: Every accepted step advances exactly one position
    #[test]
    fn prop_advance_is_single_step(session in arb_session(), event in arb_non_start_event()) {
        prop_assume!(!session.completed());
        let old = session.step;
        let result = transition(&session, &test_context(), event).unwrap();
        let new = result.new_session.step;
        if new > old {
            prop_assert_eq!(new, old.and_then(BookingStep::next));
            prop_assert!(result.effects.contains(&Effect::PersistSession));
        }
    }

    // Invariant 7: Short phone numbers are always rejected
    #[test]
    fn prop_short_phone_rejected(digits in "[0-9]{0,6}", noise in "[ ()-]{0,4}") {
        let session = Session {
            language: Some(Language::En),
            step: Some(BookingStep::AskPhone),
            ..Session::default()
        };
        let result = transition(&session, &test_context(), Event::Text(format!("{noise}{digits}"))).unwrap();
        prop_assert_eq!(result.new_session.step, Some(BookingStep::AskPhone));
    }

    // Invariant 8: Any non-negation discount text is stored verbatim (trimmed)
    #[test]
    fn prop_discount_stored_verbatim(code in "[A-Z0-9]{3,10}") {
        prop_assume!(!crate::i18n::is_negation(&code));
        let session = Session {
            language: Some(Language::En),
            step: Some(BookingStep::AskDiscount),
            ..Session::default()
        };
        let result = transition(&session, &test_context(), Event::Text(code.clone())).unwrap();
        prop_assert_eq!(result.new_session.fields.discount, Some(Discount::Code(code)));
    }
}

proptest! {
    // Duplicate delivery of a confirmation never double-completes
    #[test]
    fn prop_duplicate_confirm_is_benign(language in arb_language()) {
        let session = Session {
            language: Some(language),
            step: Some(BookingStep::Confirm),
            ..Session::default()
        };
        let ctx = test_context();
        let first = transition(&session, &ctx, Event::Action(BookingAction::Confirm)).unwrap();
        let handoffs = first.effects.iter().filter(|e| matches!(e, Effect::HandOff(_))).count();
        prop_assert_eq!(handoffs, 1);

        let second = transition(&first.new_session, &ctx, Event::Action(BookingAction::Confirm));
        prop_assert_eq!(second.unwrap_err(), TransitionError::AlreadyCompleted);
    }
}
