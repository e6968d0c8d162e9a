//! Pure dialog transition function
//!
//! Given the same state and input this always produces the same result and
//! performs no I/O. Global overrides run before the transition table:
//! non-text messages, then reset, then mid-flow greetings.

use super::event::Input;
use super::replies::Reply;
use super::state::{CollectedData, ConversationState, SlotPatch, Step};
use super::table::{self, PatchRule};
use super::Effect;

/// Result of a dialog transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_step: Step,
    pub patch: SlotPatch,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(step: Step) -> Self {
        Self {
            new_step: step,
            patch: SlotPatch::Keep,
            effects: vec![],
        }
    }

    pub fn with_patch(mut self, patch: SlotPatch) -> Self {
        self.patch = patch;
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    /// Reply bodies in send order
    pub fn replies(&self) -> impl Iterator<Item = &str> {
        self.effects.iter().filter_map(|e| match e {
            Effect::SendText { body } => Some(body.as_str()),
            Effect::PersistState => None,
        })
    }

    pub fn persists(&self) -> bool {
        self.effects.contains(&Effect::PersistState)
    }
}

/// Compute the next step, slot patch and replies for one message
pub fn transition(state: &ConversationState, input: &Input) -> TransitionResult {
    let (raw, intents) = match input {
        Input::Unsupported { .. } => {
            return TransitionResult::new(state.step)
                .with_effect(reply(Reply::TextOnly, &state.collected_data));
        }
        Input::Text { raw, intents, .. } => (raw.as_str(), *intents),
    };

    if intents.reset {
        return restart(Reply::ResetConfirmation);
    }

    if intents.greeting && state.step != Step::Start {
        return TransitionResult::new(state.step)
            .with_effect(reply(Reply::GreetingMidFlow, &state.collected_data));
    }

    let Some(rule) = table::lookup(state.step, &intents, !raw.is_empty()) else {
        return restart(Reply::Apology);
    };

    let patch = match rule.patch {
        PatchRule::Keep => SlotPatch::Keep,
        PatchRule::Store(slot) => SlotPatch::Set {
            slot,
            value: raw.to_string(),
        },
        PatchRule::Clear => SlotPatch::Clear,
    };

    // Replies see the slot values as they stand after this message
    let mut data = state.collected_data.clone();
    patch.clone().apply(&mut data);
    let replies = rule.replies.iter().map(|r| reply(*r, &data));

    // Re-entering START ends the flow; slots never carry into the next one
    let patch = if rule.to == Step::Start {
        SlotPatch::Clear
    } else {
        patch
    };

    let changed = rule.to != state.step || patch != SlotPatch::Keep;
    let result = TransitionResult::new(rule.to)
        .with_patch(patch)
        .with_effects(replies);
    if changed {
        result.with_effect(Effect::PersistState)
    } else {
        result
    }
}

fn restart(message: Reply) -> TransitionResult {
    TransitionResult::new(Step::Start)
        .with_patch(SlotPatch::Clear)
        .with_effect(reply(message, &CollectedData::default()))
        .with_effect(Effect::PersistState)
}

fn reply(message: Reply, data: &CollectedData) -> Effect {
    Effect::send_text(message.render(data))
}

impl ConversationState {
    /// Apply a transition result, stamping `updated_at` when anything changed
    pub fn apply(&mut self, result: &TransitionResult, now: chrono::DateTime<chrono::Utc>) {
        if !result.persists() {
            return;
        }
        self.step = result.new_step;
        result.patch.clone().apply(&mut self.collected_data);
        self.updated_at = now;
    }
}
