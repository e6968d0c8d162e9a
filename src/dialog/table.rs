//! The dialog graph as data
//!
//! Rules for a step are tried in order; the first whose trigger matches wins.
//! Order therefore encodes per-step intent priority (affirm before deny,
//! self-reference before free text).

use super::intent::IntentFlags;
use super::replies::Reply;
use super::state::{Slot, Step};

/// Input condition a rule reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Any message, including an empty one
    Any,
    Affirm,
    Deny,
    SelfReference,
    /// Any non-empty text
    Text,
    /// Neither affirm nor deny: the yes/no re-prompt case
    Unmatched,
}

impl Trigger {
    pub fn matches(self, intents: &IntentFlags, has_text: bool) -> bool {
        match self {
            Trigger::Any => true,
            Trigger::Affirm => intents.affirm,
            Trigger::Deny => intents.deny,
            Trigger::SelfReference => intents.self_reference,
            Trigger::Text => has_text,
            Trigger::Unmatched => !intents.affirm && !intents.deny,
        }
    }
}

/// How a rule changes collected data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchRule {
    Keep,
    /// Store the trimmed raw message text
    Store(Slot),
    Clear,
}

/// One edge (or self-loop) of the dialog graph
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub from: Step,
    pub on: Trigger,
    pub to: Step,
    pub patch: PatchRule,
    pub replies: &'static [Reply],
}

const fn rule(
    from: Step,
    on: Trigger,
    to: Step,
    patch: PatchRule,
    replies: &'static [Reply],
) -> Rule {
    Rule {
        from,
        on,
        to,
        patch,
        replies,
    }
}

#[allow(clippy::enum_glob_use)]
use self::{PatchRule::*, Step::*, Trigger::*};

pub static TABLE: &[Rule] = &[
    rule(Start, Any, WaitingSelfDecision, Clear, &[Reply::Welcome, Reply::AskSelfGift]),
    // Self or someone else
    rule(WaitingSelfDecision, Affirm, AskFeeling, Keep, &[Reply::AskFeeling]),
    rule(WaitingSelfDecision, Deny, WaitingOtherDecision, Keep, &[Reply::AskOtherGift]),
    rule(WaitingSelfDecision, Unmatched, WaitingSelfDecision, Keep, &[Reply::YesNoReprompt]),
    rule(WaitingOtherDecision, Affirm, AskForWho, Keep, &[Reply::AskForWho]),
    rule(WaitingOtherDecision, Deny, Start, Keep, &[Reply::Goodbye]),
    rule(WaitingOtherDecision, Unmatched, WaitingOtherDecision, Keep, &[Reply::YesNoReprompt]),
    // Self flow
    rule(AskFeeling, Text, AskBudgetSelf, Store(Slot::Feeling), &[Reply::BudgetMenu]),
    rule(
        AskBudgetSelf,
        Text,
        PostRecoSelf,
        Store(Slot::Budget),
        &[Reply::SelfRecommendation, Reply::RefineSelf],
    ),
    rule(PostRecoSelf, Affirm, AskTasteSelf, Keep, &[Reply::AskTasteSelf]),
    rule(PostRecoSelf, Deny, WaitingOtherDecision, Keep, &[Reply::OfferOtherFlow]),
    rule(PostRecoSelf, Unmatched, PostRecoSelf, Keep, &[Reply::YesNoReprompt]),
    rule(
        AskTasteSelf,
        Text,
        Start,
        Store(Slot::Taste),
        &[Reply::RefinedSelfRecommendation],
    ),
    // Someone else
    rule(AskForWho, SelfReference, AskFeeling, Keep, &[Reply::AskFeeling]),
    rule(AskForWho, Text, AskReason, Store(Slot::Who), &[Reply::AskReason]),
    rule(AskReason, Text, AskBudgetOther, Store(Slot::Reason), &[Reply::BudgetMenu]),
    rule(
        AskBudgetOther,
        Text,
        PostRecoOther,
        Store(Slot::Budget),
        &[Reply::OtherRecommendation, Reply::RefineOther],
    ),
    rule(PostRecoOther, Affirm, AskTasteOther, Keep, &[Reply::AskTasteOther]),
    rule(PostRecoOther, Deny, Start, Keep, &[Reply::Goodbye]),
    rule(PostRecoOther, Unmatched, PostRecoOther, Keep, &[Reply::YesNoReprompt]),
    rule(
        AskTasteOther,
        Text,
        Start,
        Store(Slot::Taste),
        &[Reply::RefinedOtherRecommendation],
    ),
];

/// Rules leaving `step`, in priority order
pub fn rules_for(step: Step) -> impl Iterator<Item = &'static Rule> {
    TABLE.iter().filter(move |r| r.from == step)
}

/// First rule of `step` matching the input
pub fn lookup(step: Step, intents: &IntentFlags, has_text: bool) -> Option<&'static Rule> {
    rules_for(step).find(|r| r.on.matches(intents, has_text))
}
