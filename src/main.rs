// SPDX-License-Identifier: MIT

//! TrailFuel API server.
//!
//! Drives the analyze / decide / commit wizard that keeps a T1D
//! fueling strategy and an intervals.icu training calendar in sync.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trailfuel::{config::Config, services::IntervalsClient, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        port = config.port,
        race = %config.plan.race_name,
        plan_prefix = %config.plan.plan_prefix,
        "Starting TrailFuel API"
    );

    if config.intervals_api_key.is_none() {
        tracing::warn!(
            "INTERVALS_API_KEY not set; wizard endpoints will answer 401 until configured"
        );
    }

    let intervals = IntervalsClient::new(
        config.intervals_api_key.clone(),
        config.athlete_id.clone(),
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        intervals,
        session: Mutex::new(Default::default()),
    });

    // Build router
    let app = trailfuel::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
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
                .add_directive("trailfuel=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
