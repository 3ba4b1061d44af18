//! uic-wa - WhatsApp UIC Generator
//!
//! Turn-based WhatsApp bot that asks five questions and returns a
//! deterministic Unique Identifier Code via the Twilio webhook.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use uic_common::config::{Overrides, Settings};
use uic_common::db::init_database;
use uic_wa::db::sessions::SessionStore;
use uic_wa::db::{SqliteFingerprintIndex, SqliteSessionStore};
use uic_wa::flow::FlowEngine;
use uic_wa::uic::UicMinter;
use uic_wa::{build_router, AppState};

/// Interval between background expiry sweeps
const SWEEP_INTERVAL_SECS: u64 = 300;

#[derive(Parser, Debug)]
#[command(name = "uic-wa", about = "WhatsApp UIC generator service")]
struct Cli {
    /// SQLite database path (overrides UIC_DATABASE_PATH)
    #[arg(long)]
    database: Option<PathBuf>,
    /// HTTP bind address (overrides UIC_BIND_ADDR)
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting WhatsApp UIC Generator (uic-wa) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let cli = Cli::parse();
    let settings = Settings::load(Overrides {
        database_path: cli.database,
        bind_addr: cli.bind,
    })?;

    let pool = init_database(&settings.database_path).await?;

    let session_store = SqliteSessionStore::new(pool.clone());
    let index = SqliteFingerprintIndex::new(pool);
    let minter = UicMinter::new(index, settings.uic_salt.clone(), settings.append_hash_suffix);
    let flow = FlowEngine::new(
        session_store.clone(),
        minter,
        settings.session_timeout_minutes,
        settings.default_language,
    );
    let state = AppState::new(flow, settings.default_language);

    // Lazy expiry already runs on every inbound message; this sweep
    // covers deployments without an external cron on /whatsapp/cleanup.
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(SWEEP_INTERVAL_SECS));
        interval.tick().await; // first tick fires immediately
        loop {
            interval.tick().await;
            match session_store.delete_all_expired(Utc::now()).await {
                Ok(0) => {}
                Ok(count) => info!(count, "Expired sessions removed by background sweep"),
                Err(e) => error!("Expiry sweep failed: {}", e),
            }
        }
    });

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!("uic-wa listening on http://{}", settings.bind_addr);
    info!("Webhook: http://{}/whatsapp/webhook", settings.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
