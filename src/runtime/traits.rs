//! Trait abstractions for runtime I/O
//!
//! These traits let the runtime run against memory, a database or a cache,
//! and let tests swap in mock implementations.

use crate::dialog::ConversationState;
use crate::gateway::GatewayError;
use crate::store::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Storage for per-user conversation state
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Load the state for a user, `None` on first contact
    async fn get(&self, user_id: &str) -> Result<Option<ConversationState>, StoreError>;

    /// Replace the state for a user
    async fn put(&self, user_id: &str, state: &ConversationState) -> Result<(), StoreError>;

    /// Record activity without a state change. Unknown users are ignored.
    async fn touch(&self, user_id: &str, now: DateTime<Utc>) -> Result<(), StoreError>;

    /// Drop conversations idle for longer than `ttl` at `now`, returning how
    /// many went. Backends with their own expiry keep the default.
    async fn evict_idle(&self, _now: DateTime<Utc>, _ttl: Duration) -> Result<usize, StoreError> {
        Ok(0)
    }
}

/// Outbound text delivery
#[async_trait]
pub trait MessageGateway: Send + Sync {
    /// Send one text message to a recipient
    async fn send_text(&self, to: &str, body: &str) -> Result<(), GatewayError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: ConversationStore + ?Sized> ConversationStore for Arc<T> {
    async fn get(&self, user_id: &str) -> Result<Option<ConversationState>, StoreError> {
        (**self).get(user_id).await
    }

    async fn put(&self, user_id: &str, state: &ConversationState) -> Result<(), StoreError> {
        (**self).put(user_id, state).await
    }

    async fn touch(&self, user_id: &str, now: DateTime<Utc>) -> Result<(), StoreError> {
        (**self).touch(user_id, now).await
    }

    async fn evict_idle(&self, now: DateTime<Utc>, ttl: Duration) -> Result<usize, StoreError> {
        (**self).evict_idle(now, ttl).await
    }
}

#[async_trait]
impl<T: MessageGateway + ?Sized> MessageGateway for Arc<T> {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), GatewayError> {
        (**self).send_text(to, body).await
    }
}
