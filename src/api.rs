//! HTTP surface: webhook handshake, message intake and liveness

mod handlers;
mod signature;
mod types;

pub use handlers::create_router;
pub use signature::SignatureVerifier;

use crate::runtime::SharedRuntime;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<SharedRuntime>,
    pub verify_token: Option<Arc<str>>,
    pub signature: Option<SignatureVerifier>,
}

impl AppState {
    pub fn new(
        runtime: Arc<SharedRuntime>,
        verify_token: Option<String>,
        app_secret: Option<String>,
    ) -> Self {
        Self {
            runtime,
            verify_token: verify_token.map(Arc::from),
            signature: app_secret.map(SignatureVerifier::new),
        }
    }
}
