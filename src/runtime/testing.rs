//! Mock implementations for testing
//!
//! These mocks enable runtime and API tests without real I/O.

use super::traits::*;
use crate::dialog::ConversationState;
use crate::gateway::GatewayError;
use crate::store::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Recording Gateway
// ============================================================================

/// Gateway that records every send and always succeeds
#[allow(dead_code)]
pub struct RecordingGateway {
    sent: Mutex<Vec<(String, String)>>,
    notify: Notify,
}

#[allow(dead_code)]
impl RecordingGateway {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            notify: Notify::new(),
        }
    }

    /// All `(recipient, body)` pairs in send order
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Bodies sent to one recipient
    pub fn bodies_for(&self, to: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(recipient, _)| recipient == to)
            .map(|(_, body)| body.clone())
            .collect()
    }

    /// Wait until at least `count` messages went out, or panic after `timeout`
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<(String, String)> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let notified = self.notify.notified();
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                panic!("expected {count} sends, got {}: {sent:?}", sent.len());
            }
        }
    }
}

impl Default for RecordingGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageGateway for RecordingGateway {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), GatewayError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        self.notify.notify_waiters();
        Ok(())
    }
}

// ============================================================================
// Slow-First Gateway
// ============================================================================

/// Records like [`RecordingGateway`] but stalls on the very first send
#[allow(dead_code)]
pub struct SlowFirstGateway {
    recorder: RecordingGateway,
    delay: Duration,
    calls: Mutex<usize>,
}

#[allow(dead_code)]
impl SlowFirstGateway {
    pub fn new(delay: Duration) -> Self {
        Self {
            recorder: RecordingGateway::new(),
            delay,
            calls: Mutex::new(0),
        }
    }

    pub fn recorder(&self) -> &RecordingGateway {
        &self.recorder
    }
}

#[async_trait]
impl MessageGateway for SlowFirstGateway {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), GatewayError> {
        let first = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls == 1
        };
        if first {
            tokio::time::sleep(self.delay).await;
        }
        self.recorder.send_text(to, body).await
    }
}

// ============================================================================
// Failing Gateway
// ============================================================================

/// Gateway whose sends always fail, counting attempts
#[allow(dead_code)]
pub struct FailingGateway {
    attempts: Mutex<usize>,
    notify: Notify,
}

#[allow(dead_code)]
impl FailingGateway {
    pub fn new() -> Self {
        Self {
            attempts: Mutex::new(0),
            notify: Notify::new(),
        }
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl MessageGateway for FailingGateway {
    async fn send_text(&self, _to: &str, _body: &str) -> Result<(), GatewayError> {
        *self.attempts.lock().unwrap() += 1;
        self.notify.notify_waiters();
        Err(GatewayError::from_status(503, "upstream unavailable"))
    }
}

// ============================================================================
// Failing Store
// ============================================================================

/// Store that is always unavailable
#[allow(dead_code)]
pub struct FailingStore;

#[async_trait]
impl ConversationStore for FailingStore {
    async fn get(&self, _user_id: &str) -> Result<Option<ConversationState>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn put(&self, _user_id: &str, _state: &ConversationState) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn touch(&self, _user_id: &str, _now: DateTime<Utc>) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}
