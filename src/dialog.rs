//! Gift-recommendation dialog
//!
//! Pure state machine: text is normalized, classified into independent
//! intent predicates and run through an explicit transition table. All I/O
//! lives in the runtime.

mod effect;
pub mod event;
pub mod intent;
pub mod normalize;
mod replies;
pub mod state;
pub(crate) mod table;
mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Input;
#[allow(unused_imports)] // Public API re-exports
pub use intent::{Intent, IntentClassifier, IntentFlags, KeywordClassifier};
#[allow(unused_imports)]
pub use state::{ConversationState, Step};
pub use transition::{transition, TransitionResult};
