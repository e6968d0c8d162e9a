//! Effects produced by dialog transitions

/// Effects to be executed after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver a text reply to the user who sent the message
    SendText { body: String },

    /// Persist the new conversation state
    PersistState,
}

impl Effect {
    pub fn send_text(body: impl Into<String>) -> Self {
        Effect::SendText { body: body.into() }
    }
}
