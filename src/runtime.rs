//! Runtime hosting the dialog engine
//!
//! Owns the per-user locks, loads and persists conversation state through a
//! [`ConversationStore`] and delivers replies through a [`MessageGateway`].

mod executor;
mod locks;
pub mod traits;

#[cfg(test)]
pub mod testing;

#[allow(unused_imports)] // Public API re-exports
pub use executor::{DialogRuntime, Handled, InboundMessage, RuntimeError};
pub use traits::*;

use crate::store::MemoryStore;
use std::sync::Arc;

/// Runtime wired with the in-memory store and a boxed gateway
pub type SharedRuntime = DialogRuntime<Arc<MemoryStore>, Arc<dyn MessageGateway>>;
