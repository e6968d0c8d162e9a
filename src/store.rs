//! In-process conversation store
//!
//! State lives for the lifetime of the process only. Idle conversations are
//! evicted by the runtime sweeper.

use crate::dialog::ConversationState;
use crate::runtime::ConversationStore;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug)]
pub enum StoreError {
    #[allow(dead_code)] // Raised by external backends and test doubles
    #[error("Conversation store unavailable: {0}")]
    Unavailable(String),
}

/// Conversation state keyed by user identity
#[derive(Debug, Default)]
pub struct MemoryStore {
    conversations: RwLock<HashMap<String, ConversationState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)] // Used in tests
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn get(&self, user_id: &str) -> Result<Option<ConversationState>, StoreError> {
        Ok(self.conversations.read().await.get(user_id).cloned())
    }

    async fn put(&self, user_id: &str, state: &ConversationState) -> Result<(), StoreError> {
        self.conversations
            .write()
            .await
            .insert(user_id.to_string(), state.clone());
        Ok(())
    }

    async fn touch(&self, user_id: &str, now: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(state) = self.conversations.write().await.get_mut(user_id) {
            state.updated_at = now;
        }
        Ok(())
    }

    async fn evict_idle(&self, now: DateTime<Utc>, ttl: Duration) -> Result<usize, StoreError> {
        let mut conversations = self.conversations.write().await;
        let before = conversations.len();
        conversations.retain(|_, state| !state.is_idle(now, ttl));
        Ok(before - conversations.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::Step;

    #[tokio::test]
    async fn test_unknown_user_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("5215550001111").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = MemoryStore::new();
        let mut state = ConversationState::new(Utc::now());
        state.step = Step::AskFeeling;
        store.put("u1", &state).await.unwrap();
        assert_eq!(store.get("u1").await.unwrap(), Some(state));
        assert!(store.get("u2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_evict_idle_keeps_recent() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store
            .put("old", &ConversationState::new(now - chrono::Duration::hours(48)))
            .await
            .unwrap();
        store.put("fresh", &ConversationState::new(now)).await.unwrap();

        let evicted = store
            .evict_idle(now, chrono::Duration::hours(24))
            .await
            .unwrap();
        assert_eq!(evicted, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.get("fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_touch_refreshes_activity_only() {
        let store = MemoryStore::new();
        let earlier = Utc::now() - chrono::Duration::hours(48);
        let mut state = ConversationState::new(earlier);
        state.step = Step::PostRecoSelf;
        store.put("u1", &state).await.unwrap();

        let now = Utc::now();
        store.touch("u1", now).await.unwrap();
        store.touch("ghost", now).await.unwrap();

        let touched = store.get("u1").await.unwrap().unwrap();
        assert_eq!(touched.updated_at, now);
        assert_eq!(touched.step, Step::PostRecoSelf);
        assert!(store.get("ghost").await.unwrap().is_none());
        assert_eq!(
            store.evict_idle(now, chrono::Duration::hours(24)).await.unwrap(),
            0
        );
    }
}
