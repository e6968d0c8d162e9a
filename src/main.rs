//! giftbot - WhatsApp gift-recommendation assistant
//!
//! Receives WhatsApp Cloud API webhooks, runs each message through a small
//! Spanish dialog state machine and replies over the Graph API.

mod api;
mod config;
mod dialog;
mod gateway;
mod runtime;
mod store;

use api::{create_router, AppState};
use config::BotConfig;
use gateway::{DisabledGateway, LoggingGateway, WhatsAppGateway};
use runtime::{DialogRuntime, MessageGateway, SharedRuntime};
use std::net::SocketAddr;
use std::sync::Arc;
use store::MemoryStore;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "giftbot=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = BotConfig::from_env()?;

    if config.verify_token.is_none() {
        tracing::warn!("VERIFY_TOKEN not set. Every webhook handshake will be rejected.");
    }
    if config.app_secret.is_none() {
        tracing::info!("WHATSAPP_APP_SECRET not set, webhook signatures are not checked");
    }

    // Outbound transport
    let transport: Arc<dyn MessageGateway> = match &config.whatsapp {
        Some(whatsapp) => {
            tracing::info!(
                phone_number_id = %whatsapp.phone_number_id,
                api_version = %whatsapp.api_version,
                "WhatsApp gateway initialized"
            );
            Arc::new(WhatsAppGateway::new(whatsapp)?)
        }
        None => {
            tracing::warn!(
                "WHATSAPP_TOKEN or PHONE_NUMBER_ID not set. Replies will be logged and dropped."
            );
            Arc::new(DisabledGateway::new(
                "WHATSAPP_TOKEN and PHONE_NUMBER_ID are required to send messages",
            ))
        }
    };
    let gateway: Arc<dyn MessageGateway> = Arc::new(LoggingGateway::new(transport, "whatsapp"));

    let runtime: Arc<SharedRuntime> = Arc::new(DialogRuntime::new(
        Arc::new(MemoryStore::new()),
        gateway,
    ));

    match config.conversation_ttl {
        Some(ttl) => {
            tracing::info!(
                ttl_secs = ttl.as_secs(),
                interval_secs = config.eviction_interval.as_secs(),
                "Idle conversation eviction enabled"
            );
            runtime.spawn_sweeper(ttl, config.eviction_interval);
        }
        None => tracing::info!("Idle conversation eviction disabled"),
    }

    let state = AppState::new(runtime, config.verify_token, config.app_secret);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("giftbot listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
