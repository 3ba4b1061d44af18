//! uic-wa - WhatsApp UIC Generator service
//!
//! Collects five short answers over a Twilio WhatsApp conversation
//! and derives a deterministic, privacy-preserving Unique Identifier
//! Code. The conversation state machine lives in [`flow`], the
//! derivation engine in [`uic`], and SQLite persistence in [`db`].

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use uic_common::config::Language;

pub mod api;
pub mod db;
pub mod flow;
pub mod uic;

use db::{SqliteFingerprintIndex, SqliteSessionStore};
use flow::FlowEngine;

/// The flow engine wired to SQLite persistence
pub type SqliteFlowEngine = FlowEngine<SqliteSessionStore, SqliteFingerprintIndex>;

/// Application state shared across HTTP handlers.
///
/// Services are constructed once at process start and injected here;
/// there are no process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub flow: Arc<SqliteFlowEngine>,
    /// Language for replies produced outside a session (apologies)
    pub language: Language,
}

impl AppState {
    pub fn new(flow: SqliteFlowEngine, language: Language) -> Self {
        Self {
            flow: Arc::new(flow),
            language,
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/whatsapp/webhook", post(api::whatsapp_webhook))
        .route("/whatsapp/cleanup", post(api::cleanup_sessions))
        .route("/", get(api::service_info))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
