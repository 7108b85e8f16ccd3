// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SilverFit API Server
//!
//! Serves the local fitness assistant: accounts, onboarding profile, and
//! weekly schedules generated with Gemini.

use silverfit::{config::Config, db::KvStore, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting SilverFit API");

    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; schedule generation will fail");
    }

    // Open the local key-value store
    let store = KvStore::open(&config.data_dir)
        .await
        .expect("Failed to open data directory");
    tracing::info!(path = %config.data_dir.display(), "Data store opened");

    let state = Arc::new(AppState::new(config.clone(), store));

    // Pick up the session left by the previous run
    state.session.restore().await;

    // Build router
    let app = silverfit::routes::create_router(state);

    // Start server (local device only)
    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("silverfit=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
