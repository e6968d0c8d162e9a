//! Outbound message delivery
//!
//! The runtime only sees [`MessageGateway`]; the WhatsApp transport and the
//! logging wrapper live here.

mod error;
mod whatsapp;

#[allow(unused_imports)] // Kind is matched on in tests
pub use error::{GatewayError, GatewayErrorKind};
pub use whatsapp::WhatsAppGateway;

use crate::runtime::MessageGateway;
use async_trait::async_trait;
use std::sync::Arc;

/// Logging wrapper for gateways
pub struct LoggingGateway {
    inner: Arc<dyn MessageGateway>,
    name: &'static str,
}

impl LoggingGateway {
    pub fn new(inner: Arc<dyn MessageGateway>, name: &'static str) -> Self {
        Self { inner, name }
    }
}

#[async_trait]
impl MessageGateway for LoggingGateway {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), GatewayError> {
        let start = std::time::Instant::now();
        let result = self.inner.send_text(to, body).await;
        let duration = start.elapsed();

        match &result {
            Ok(()) => {
                tracing::info!(
                    gateway = self.name,
                    to = %to,
                    duration_ms = %duration.as_millis(),
                    chars = body.chars().count(),
                    "Message sent"
                );
            }
            Err(e) => {
                tracing::error!(
                    gateway = self.name,
                    to = %to,
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    transient = e.kind.is_transient(),
                    error = %e.message,
                    "Message send failed"
                );
            }
        }

        result
    }
}

/// Stand-in used when outbound credentials are missing; every send fails
pub struct DisabledGateway {
    reason: String,
}

impl DisabledGateway {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl MessageGateway for DisabledGateway {
    async fn send_text(&self, _to: &str, _body: &str) -> Result<(), GatewayError> {
        Err(GatewayError::not_configured(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::testing::RecordingGateway;

    #[tokio::test]
    async fn test_logging_gateway_passes_through() {
        let recorder = Arc::new(RecordingGateway::new());
        let gateway = LoggingGateway::new(recorder.clone(), "test");
        gateway.send_text("u1", "hola").await.unwrap();
        assert_eq!(recorder.sent(), vec![("u1".to_string(), "hola".to_string())]);
    }

    #[tokio::test]
    async fn test_disabled_gateway_always_fails() {
        let gateway = LoggingGateway::new(
            Arc::new(DisabledGateway::new("WHATSAPP_TOKEN not set")),
            "disabled",
        );
        let err = gateway.send_text("u1", "hola").await.unwrap_err();
        assert_eq!(err.kind, GatewayErrorKind::NotConfigured);
        assert_eq!(err.message, "WHATSAPP_TOKEN not set");
    }
}
