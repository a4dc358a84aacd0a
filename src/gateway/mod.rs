//! Axum HTTP surface of the relay: chat page, chat endpoints, health.
//!
//! Cross-cutting behavior is composed as tower layers in [`build_app`]:
//! - request body size limit and request timeout
//! - CORS allow-list on the chat routes, credentials permitted
//! - security headers on every response (HSTS only in production)

pub mod cookie;
mod handlers;
pub mod headers;
mod server;

pub use server::{build_app, build_state, run_gateway, run_gateway_with_listener};

use crate::config::AdmissionKeySource;
use crate::conversation::ConversationOrchestrator;
use crate::session::SessionSigner;
use std::sync::Arc;
use std::time::Duration;

/// Interval of the background sweep over expired sessions and idle
/// admission logs.
pub const SWEEP_INTERVAL_SECS: u64 = 300;

pub const RATE_LIMITED_MESSAGE: &str =
    "Rate limit exceeded. Please wait a moment before sending more messages.";
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred. Please try again.";

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConversationOrchestrator>,
    pub signer: Arc<SessionSigner>,
    pub session_lifetime: Duration,
    pub cookie_name: Arc<str>,
    /// Adds `Secure` to the session cookie.
    pub secure_cookies: bool,
    pub admission_key: AdmissionKeySource,
}

/// Chat request body. Both a missing and a non-string `message` read as
/// empty.
#[derive(Debug, Default, serde::Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub message: Option<String>,
}
