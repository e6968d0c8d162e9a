//! Conversation state types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Node of the dialog graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum Step {
    /// Fresh conversation, re-entered after every completed flow
    #[default]
    Start,
    WaitingSelfDecision,
    WaitingOtherDecision,
    AskFeeling,
    AskBudgetSelf,
    PostRecoSelf,
    AskTasteSelf,
    AskForWho,
    AskReason,
    AskBudgetOther,
    PostRecoOther,
    AskTasteOther,
}

impl Step {
    pub const ALL: [Step; 12] = [
        Step::Start,
        Step::WaitingSelfDecision,
        Step::WaitingOtherDecision,
        Step::AskFeeling,
        Step::AskBudgetSelf,
        Step::PostRecoSelf,
        Step::AskTasteSelf,
        Step::AskForWho,
        Step::AskReason,
        Step::AskBudgetOther,
        Step::PostRecoOther,
        Step::AskTasteOther,
    ];

    /// Steps that expect a yes/no answer and re-prompt on anything else
    #[allow(dead_code)] // Used in tests
    pub fn is_yes_no(self) -> bool {
        matches!(
            self,
            Step::WaitingSelfDecision
                | Step::WaitingOtherDecision
                | Step::PostRecoSelf
                | Step::PostRecoOther
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Step::Start => "START",
            Step::WaitingSelfDecision => "WAITING_SELF_DECISION",
            Step::WaitingOtherDecision => "WAITING_OTHER_DECISION",
            Step::AskFeeling => "ASK_FEELING",
            Step::AskBudgetSelf => "ASK_BUDGET_SELF",
            Step::PostRecoSelf => "POST_RECO_SELF",
            Step::AskTasteSelf => "ASK_TASTE_SELF",
            Step::AskForWho => "ASK_FOR_WHO",
            Step::AskReason => "ASK_REASON",
            Step::AskBudgetOther => "ASK_BUDGET_OTHER",
            Step::PostRecoOther => "POST_RECO_OTHER",
            Step::AskTasteOther => "ASK_TASTE_OTHER",
        }
    }
}

/// Unknown names fall back to `Start`
impl From<String> for Step {
    fn from(name: String) -> Self {
        Step::ALL
            .into_iter()
            .find(|step| step.as_str() == name)
            .unwrap_or_default()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named piece of information collected during a flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Feeling,
    Budget,
    Who,
    Reason,
    Taste,
}

/// Slot values gathered so far; absent until written
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectedData(BTreeMap<Slot, String>);

impl CollectedData {
    pub fn get(&self, slot: Slot) -> Option<&str> {
        self.0.get(&slot).map(String::as_str)
    }

    pub fn set(&mut self, slot: Slot, value: impl Into<String>) {
        self.0.insert(slot, value.into());
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[allow(dead_code)] // Used in tests
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Change to collected data produced by a transition
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SlotPatch {
    #[default]
    Keep,
    Set { slot: Slot, value: String },
    Clear,
}

impl SlotPatch {
    pub fn apply(self, data: &mut CollectedData) {
        match self {
            SlotPatch::Keep => {}
            SlotPatch::Set { slot, value } => data.set(slot, value),
            SlotPatch::Clear => data.clear(),
        }
    }
}

/// Per-user conversation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    #[serde(default)]
    pub step: Step,
    #[serde(default)]
    pub collected_data: CollectedData,
    /// Last handled message, including ones that left the state unchanged
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            step: Step::Start,
            collected_data: CollectedData::default(),
            updated_at: now,
        }
    }

    /// Whether the conversation has been idle for longer than `ttl`
    pub fn is_idle(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now.signed_duration_since(self.updated_at) > ttl
    }
}
