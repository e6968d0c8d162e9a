//! WhatsApp Cloud API transport

use super::GatewayError;
use crate::config::WhatsAppConfig;
use crate::runtime::MessageGateway;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends text messages through the Graph API `/{phone-number-id}/messages`
pub struct WhatsAppGateway {
    client: Client,
    access_token: String,
    url: String,
}

impl WhatsAppGateway {
    pub fn new(config: &WhatsAppConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            access_token: config.access_token.clone(),
            url: messages_url(config),
        })
    }

    fn classify_error(status: reqwest::StatusCode, body: &str) -> GatewayError {
        let detail = serde_json::from_str::<GraphErrorResponse>(body)
            .map(|e| e.error.describe())
            .unwrap_or_else(|_| body.to_string());
        GatewayError::from_status(status.as_u16(), &detail)
    }
}

fn messages_url(config: &WhatsAppConfig) -> String {
    format!(
        "{}/{}/{}/messages",
        config.api_base.trim_end_matches('/'),
        config.api_version.trim_matches('/'),
        config.phone_number_id
    )
}

#[async_trait]
impl MessageGateway for WhatsAppGateway {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), GatewayError> {
        let request = SendTextRequest::new(to, body);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    GatewayError::network(format!("Connection failed: {e}"))
                } else {
                    GatewayError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Self::classify_error(status, &text));
        }

        if let Ok(sent) = serde_json::from_str::<SendTextResponse>(&text) {
            let ids: Vec<&str> = sent.messages.iter().map(|m| m.id.as_str()).collect();
            tracing::debug!(to = %to, message_ids = ?ids, "WhatsApp accepted message");
        }
        Ok(())
    }
}

// WhatsApp Cloud API types

#[derive(Debug, Serialize)]
struct SendTextRequest<'a> {
    messaging_product: &'static str,
    recipient_type: &'static str,
    to: &'a str,
    r#type: &'static str,
    text: TextBody<'a>,
}

impl<'a> SendTextRequest<'a> {
    fn new(to: &'a str, body: &'a str) -> Self {
        Self {
            messaging_product: "whatsapp",
            recipient_type: "individual",
            to,
            r#type: "text",
            text: TextBody {
                preview_url: false,
                body,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct TextBody<'a> {
    preview_url: bool,
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendTextResponse {
    #[serde(default)]
    messages: Vec<SentMessage>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GraphErrorResponse {
    error: GraphError,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
    #[serde(default)]
    code: Option<i64>,
}

impl GraphError {
    fn describe(&self) -> String {
        match self.code {
            Some(code) => format!("{} (code {code})", self.message),
            None => self.message.clone(),
        }
    }
}
