// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Terraguess API Server
//!
//! Records daily guessing-game results and serves the "today" and
//! "all-time" leaderboards.

use std::sync::Arc;
use terraguess_api::{
    config::Config,
    db::FirestoreDb,
    services::{LeaderboardService, ScoreboardService},
    time_utils::SystemClock,
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Terraguess API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Build services
    let scoreboard = ScoreboardService::new(db.clone());
    let leaderboard = LeaderboardService::new(db.clone(), config.rank_pending_today);

    // Build shared state; the clock is injected so tests can pin a day
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        scoreboard,
        leaderboard,
        clock: Arc::new(SystemClock),
    });

    // Build router
    let app = terraguess_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("terraguess_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
