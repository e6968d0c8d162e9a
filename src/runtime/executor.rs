//! Dialog runtime executor

use super::locks::UserLocks;
use super::traits::{ConversationStore, MessageGateway};
use crate::dialog::{
    transition, ConversationState, Effect, Input, IntentClassifier, KeywordClassifier,
    TransitionResult,
};
use crate::store::StoreError;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OwnedMutexGuard;
use tokio::task::JoinHandle;

/// Message type carrying text in the webhook payload
pub const TEXT_MESSAGE_TYPE: &str = "text";

/// One inbound message as the runtime sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Sender identity, also the reply recipient
    pub from: String,
    /// Provider message type (`text`, `image`, `audio`, ...)
    pub kind: String,
    /// Text body, present for text messages
    pub text: Option<String>,
}

impl InboundMessage {
    pub fn text(from: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            kind: TEXT_MESSAGE_TYPE.to_string(),
            text: Some(body.into()),
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == TEXT_MESSAGE_TYPE
    }
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Failed to load conversation for {user}: {source}")]
    Load { user: String, source: StoreError },
    #[error("Failed to save conversation for {user}: {source}")]
    Save { user: String, source: StoreError },
}

/// Outcome of handling one message
#[derive(Debug)]
pub struct Handled {
    pub result: TransitionResult,
    /// Background task delivering the replies
    pub delivery: JoinHandle<()>,
}

/// Hosts the dialog engine over any store and gateway
pub struct DialogRuntime<S, G>
where
    S: ConversationStore + 'static,
    G: MessageGateway + Clone + 'static,
{
    store: S,
    gateway: G,
    classifier: Arc<dyn IntentClassifier>,
    locks: UserLocks,
    /// Per-user delivery order; held by the send task until its replies are out
    outbox: UserLocks,
}

impl<S, G> DialogRuntime<S, G>
where
    S: ConversationStore + 'static,
    G: MessageGateway + Clone + 'static,
{
    pub fn new(store: S, gateway: G) -> Self {
        Self {
            store,
            gateway,
            classifier: Arc::new(KeywordClassifier::new()),
            locks: UserLocks::new(),
            outbox: UserLocks::new(),
        }
    }

    /// Replace the default keyword classifier
    #[allow(dead_code)] // Used in tests
    pub fn with_classifier(mut self, classifier: Arc<dyn IntentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Process one inbound message.
    ///
    /// Load, transition and persist run under the sender's lock. Replies are
    /// sent afterwards on a spawned task; send failures are logged there and
    /// never reach the caller. The delivery slot is claimed before the state
    /// lock is released, so one user's replies go out in message order.
    pub async fn handle(&self, message: InboundMessage) -> Result<Handled, RuntimeError> {
        let input = if message.is_text() {
            Input::text(message.text.as_deref().unwrap_or_default(), &*self.classifier)
        } else {
            Input::unsupported(&message.kind)
        };

        let (result, delivery_slot) = {
            let _guard = self.locks.lock(&message.from).await;
            let stored = self
                .store
                .get(&message.from)
                .await
                .map_err(|source| RuntimeError::Load {
                    user: message.from.clone(),
                    source,
                })?;
            let known = stored.is_some();
            let mut state = stored.unwrap_or_else(|| ConversationState::new(Utc::now()));

            let result = transition(&state, &input);

            if let Input::Text {
                normalized,
                intents,
                ..
            } = &input
            {
                tracing::debug!(
                    user = %message.from,
                    normalized = %normalized,
                    intent = ?intents.primary(),
                    "Classified message"
                );
            }

            if result.persists() {
                state.apply(&result, Utc::now());
                self.store
                    .put(&message.from, &state)
                    .await
                    .map_err(|source| RuntimeError::Save {
                        user: message.from.clone(),
                        source,
                    })?;
            } else if known {
                // Re-prompts and greetings keep the conversation alive
                self.store
                    .touch(&message.from, Utc::now())
                    .await
                    .map_err(|source| RuntimeError::Save {
                        user: message.from.clone(),
                        source,
                    })?;
            }

            tracing::info!(
                user = %message.from,
                kind = %message.kind,
                step = %state.step,
                slots = state.collected_data.len(),
                replies = result.replies().count(),
                "Dialog step"
            );
            (result, self.outbox.lock(&message.from).await)
        };

        let delivery = self.dispatch(&message.from, &result.effects, delivery_slot);
        Ok(Handled { result, delivery })
    }

    /// Send replies in order on a background task, releasing `slot` when done
    fn dispatch(&self, to: &str, effects: &[Effect], slot: OwnedMutexGuard<()>) -> JoinHandle<()> {
        let bodies: Vec<String> = effects
            .iter()
            .filter_map(|e| match e {
                Effect::SendText { body } => Some(body.clone()),
                Effect::PersistState => None,
            })
            .collect();
        let gateway = self.gateway.clone();
        let to = to.to_string();

        tokio::spawn(async move {
            let _slot = slot;
            for body in bodies {
                if let Err(e) = gateway.send_text(&to, &body).await {
                    tracing::warn!(user = %to, error = %e, "Reply dropped");
                }
            }
        })
    }

    /// Evict conversations idle for longer than `ttl` and drop their locks
    pub async fn sweep_idle(&self, ttl: Duration) -> Result<usize, StoreError> {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let evicted = self.store.evict_idle(Utc::now(), ttl).await?;
        let pruned = self.locks.prune().await + self.outbox.prune().await;
        if evicted > 0 || pruned > 0 {
            tracing::info!(evicted, pruned_locks = pruned, "Idle conversations swept");
        }
        Ok(evicted)
    }
}

impl<S, G> DialogRuntime<S, G>
where
    S: ConversationStore + Send + Sync + 'static,
    G: MessageGateway + Clone + 'static,
{
    /// Run [`Self::sweep_idle`] every `interval` until the runtime is dropped
    pub fn spawn_sweeper(self: &Arc<Self>, ttl: Duration, interval: Duration) -> JoinHandle<()> {
        let runtime = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(runtime) = runtime.upgrade() else {
                    break;
                };
                if let Err(e) = runtime.sweep_idle(ttl).await {
                    tracing::error!(error = %e, "Idle sweep failed");
                }
            }
        })
    }
}
