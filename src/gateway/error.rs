//! Gateway error types

use thiserror::Error;

/// Outbound send error with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub message: String,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Timeout, refused connection or a truncated response
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Network, message)
    }

    /// Non-success HTTP answer from the Graph API
    pub fn from_status(status: u16, detail: &str) -> Self {
        let kind = GatewayErrorKind::from_status(status);
        let message = match kind {
            GatewayErrorKind::Auth => format!("Authentication failed: {detail}"),
            GatewayErrorKind::RateLimit => format!("Rate limited: {detail}"),
            GatewayErrorKind::InvalidRequest => format!("Invalid request: {detail}"),
            GatewayErrorKind::ServerError => format!("Server error: {detail}"),
            _ => format!("HTTP {status}: {detail}"),
        };
        Self::new(kind, message)
    }

    pub fn not_configured(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::NotConfigured, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Unknown, message)
    }
}

/// Error classification, reported in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// Network issues, timeouts
    Network,
    /// Too many messages to this number or from this business account (429)
    RateLimit,
    /// Graph API outage (5xx)
    ServerError,
    /// Access token expired or revoked (401, 403)
    Auth,
    /// Bad request (400), e.g. recipient outside the messaging window
    InvalidRequest,
    /// Credentials missing at startup
    NotConfigured,
    Unknown,
}

impl GatewayErrorKind {
    fn from_status(status: u16) -> Self {
        match status {
            400 => Self::InvalidRequest,
            401 | 403 => Self::Auth,
            429 => Self::RateLimit,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Whether a later attempt could succeed. Sends are never retried; this
    /// only tags the failure log.
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Network | Self::RateLimit | Self::ServerError)
    }
}
