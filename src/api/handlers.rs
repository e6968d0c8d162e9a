//! HTTP request handlers

use super::signature::SIGNATURE_HEADER;
use super::types::{ErrorResponse, VerifyQuery, WebhookPayload};
use super::AppState;
use crate::runtime::InboundMessage;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

const SUBSCRIBE_MODE: &str = "subscribe";

/// Create the webhook router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", get(verify_webhook).post(receive_webhook))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Subscription handshake
// ============================================================

async fn verify_webhook(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<String, AppError> {
    let mode_ok = query.mode.as_deref() == Some(SUBSCRIBE_MODE);
    let token_ok = state
        .verify_token
        .as_deref()
        .is_some_and(|expected| query.verify_token.as_deref() == Some(expected));

    if mode_ok && token_ok {
        tracing::info!("Webhook subscription verified");
        Ok(query.challenge.unwrap_or_default())
    } else {
        tracing::warn!(mode = ?query.mode, "Webhook verification rejected");
        Err(AppError::Forbidden("Verification failed".to_string()))
    }
}

// ============================================================
// Message intake
// ============================================================

async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    if let Some(verifier) = &state.signature {
        let header = headers
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok());
        verifier.verify(&body, header).map_err(|e| {
            tracing::warn!(error = %e, "Rejected webhook signature");
            AppError::Unauthorized(e.to_string())
        })?;
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, bytes = body.len(), "Ignoring malformed webhook payload");
            return Ok(StatusCode::OK);
        }
    };

    tracing::debug!(object = ?payload.object, entries = payload.entry.len(), "Webhook received");
    let messages = payload.into_messages();
    if !messages.is_empty() {
        tokio::spawn(process_messages(state, messages));
    }

    Ok(StatusCode::OK)
}

/// Handle one delivery's messages in arrival order
async fn process_messages(state: AppState, messages: Vec<InboundMessage>) {
    for message in messages {
        let from = message.from.clone();
        if let Err(e) = state.runtime.handle(message).await {
            tracing::error!(user = %from, error = %e, "Failed to handle message");
        }
    }
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("giftbot ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error handling
// ============================================================

#[derive(Debug)]
enum AppError {
    Unauthorized(String),
    Forbidden(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
