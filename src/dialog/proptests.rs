//! Property-based tests for the dialog state machine
//!
//! These tests verify key invariants hold across all steps and inputs.

use super::normalize::normalize;
use super::state::{CollectedData, ConversationState, Slot, SlotPatch, Step};
use super::*;
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn classifier() -> KeywordClassifier {
    KeywordClassifier::new()
}

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_step() -> impl Strategy<Value = Step> {
    proptest::sample::select(Step::ALL.to_vec())
}

fn arb_yes_no_step() -> impl Strategy<Value = Step> {
    proptest::sample::select(
        Step::ALL
            .into_iter()
            .filter(|s| s.is_yes_no())
            .collect::<Vec<_>>(),
    )
}

fn arb_slot() -> impl Strategy<Value = Slot> {
    prop_oneof![
        Just(Slot::Feeling),
        Just(Slot::Budget),
        Just(Slot::Who),
        Just(Slot::Reason),
        Just(Slot::Taste),
    ]
}

fn arb_collected_data() -> impl Strategy<Value = CollectedData> {
    proptest::collection::vec((arb_slot(), "[a-zA-Z ]{1,20}"), 0..5).prop_map(|pairs| {
        let mut data = CollectedData::default();
        for (slot, value) in pairs {
            data.set(slot, value);
        }
        data
    })
}

fn arb_state() -> impl Strategy<Value = ConversationState> {
    (arb_step(), arb_collected_data()).prop_map(|(step, collected_data)| ConversationState {
        step,
        collected_data,
        updated_at: fixed_now(),
    })
}

/// Free text from a vocabulary that trips none of the keyword sets
fn arb_unmatched_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            Just("quizas"),
            Just("tal vez"),
            Just("mmm"),
            Just("depende"),
            Just("luego"),
            Just("ehh"),
        ],
        1..4,
    )
    .prop_map(|words| words.join(" "))
}

fn arb_reset_text() -> impl Strategy<Value = String> {
    (
        "[a-z ]{0,10}",
        prop_oneof![Just("reiniciar"), Just("RESET"), Just("Reiniciar")],
        "[a-z ]{0,10}",
    )
        .prop_map(|(pre, kw, post)| format!("{pre}{kw}{post}"))
}

fn arb_any_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-ZáéíóúñÁÉÍÓÚ ,.!?]{0,30}",
        arb_unmatched_text(),
        Just("sí".to_string()),
        Just("no".to_string()),
        Just("hola".to_string()),
        Just("es para mí".to_string()),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // Invariant 1: normalization is idempotent
    #[test]
    fn prop_normalize_idempotent(raw in "\\PC{0,40}") {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once);
    }

    // Invariant 2: normalized text carries no upper case or surrounding space
    #[test]
    fn prop_normalize_canonical(raw in "[a-zA-ZáéíóúÁÉÍÓÚñÑ ]{0,30}") {
        let out = normalize(&raw);
        prop_assert_eq!(out.trim(), out.as_str());
        prop_assert!(out.chars().all(|c| !c.is_uppercase()));
        prop_assert!(out.is_ascii(), "diacritics survived: {:?}", out);
    }

    // Invariant 3: classification is a function of the normalized text
    #[test]
    fn prop_classification_deterministic(raw in arb_any_text()) {
        let c = classifier();
        let normalized = normalize(&raw);
        prop_assert_eq!(c.classify(&normalized), c.classify(&normalized));
        prop_assert_eq!(c.classify(&normalized), c.classify(&normalize(&normalized)));
    }

    // Invariant 4: reset is absorbing from every step
    #[test]
    fn prop_reset_always_returns_to_start(state in arb_state(), raw in arb_reset_text()) {
        let result = transition(&state, &Input::text(&raw, &classifier()));
        prop_assert_eq!(result.new_step, Step::Start);
        prop_assert_eq!(&result.patch, &SlotPatch::Clear);
        prop_assert_eq!(result.replies().count(), 1);

        let mut next = state.clone();
        next.apply(&result, fixed_now());
        prop_assert!(next.collected_data.is_empty());
    }

    // Invariant 5: unmatched input in a yes/no step re-prompts exactly once
    #[test]
    fn prop_yes_no_reprompt(step in arb_yes_no_step(), data in arb_collected_data(), raw in arb_unmatched_text()) {
        let state = ConversationState { step, collected_data: data, updated_at: fixed_now() };
        let result = transition(&state, &Input::text(&raw, &classifier()));
        prop_assert_eq!(result.new_step, step);
        prop_assert_eq!(result.replies().count(), 1);
        prop_assert!(!result.persists());
    }

    // Invariant 6: PersistState is emitted exactly when something changed
    #[test]
    fn prop_persist_iff_changed(state in arb_state(), raw in arb_any_text()) {
        let result = transition(&state, &Input::text(&raw, &classifier()));
        let changed = result.new_step != state.step || result.patch != SlotPatch::Keep;
        prop_assert_eq!(result.persists(), changed);
    }

    // Invariant 7: every message gets at least one reply
    #[test]
    fn prop_always_replies(state in arb_state(), raw in arb_any_text()) {
        let result = transition(&state, &Input::text(&raw, &classifier()));
        prop_assert!(result.replies().count() >= 1);
        prop_assert!(result.replies().all(|r| !r.is_empty()));
    }

    // Invariant 8: entering START always clears collected data
    #[test]
    fn prop_start_entry_clears_slots(state in arb_state(), raw in arb_any_text()) {
        let result = transition(&state, &Input::text(&raw, &classifier()));
        if result.new_step == Step::Start && result.persists() {
            prop_assert_eq!(&result.patch, &SlotPatch::Clear);
        }
    }

    // Invariant 9: non-text input never changes state
    #[test]
    fn prop_non_text_is_inert(state in arb_state(), kind in "(image|audio|sticker|video|location)") {
        let result = transition(&state, &Input::unsupported(kind));
        prop_assert_eq!(result.new_step, state.step);
        prop_assert!(!result.persists());
        prop_assert_eq!(result.replies().count(), 1);
    }

    // Invariant 10: transitions are pure
    #[test]
    fn prop_transition_deterministic(state in arb_state(), raw in arb_any_text()) {
        let input = Input::text(&raw, &classifier());
        prop_assert_eq!(transition(&state, &input), transition(&state, &input));
    }

    // Invariant 11: free-text steps store the message verbatim (trimmed)
    #[test]
    fn prop_free_text_stored_verbatim(raw in "[a-z]{3,8}( [a-z]{3,8}){0,2}") {
        let c = classifier();
        let input = Input::text(&raw, &c);
        let intents = input.intents();
        prop_assume!(!intents.reset && !intents.greeting && !intents.self_reference);

        let state = ConversationState::new(fixed_now());
        let mut state = ConversationState { step: Step::AskReason, ..state };
        let result = transition(&state, &input);
        state.apply(&result, fixed_now());
        prop_assert_eq!(state.step, Step::AskBudgetOther);
        prop_assert_eq!(state.collected_data.get(Slot::Reason), Some(raw.trim()));
    }
}
