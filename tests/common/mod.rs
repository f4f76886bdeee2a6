// SPDX-License-Identifier: MIT

use std::sync::Arc;
use tokio::sync::Mutex;
use trailfuel::config::Config;
use trailfuel::routes::create_router;
use trailfuel::services::IntervalsClient;
use trailfuel::AppState;

/// Create a test app whose intervals.icu client points at `base_url`
/// (usually a mockito server). Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(base_url: &str) -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default(), base_url)
}

/// Create a test app with an explicit config (e.g. a race date pushed
/// into the future so generated events survive the today cutoff).
#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config, base_url: &str) -> (axum::Router, Arc<AppState>) {
    let intervals = IntervalsClient::with_base_url(
        config.intervals_api_key.clone(),
        config.athlete_id.clone(),
        base_url.to_string(),
    );

    let state = Arc::new(AppState {
        config,
        intervals,
        session: Mutex::new(Default::default()),
    });

    (create_router(state.clone()), state)
}

/// Create a test app with no API key configured.
#[allow(dead_code)]
pub fn create_test_app_without_key(base_url: &str) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.intervals_api_key = None;
    create_test_app_with_config(config, base_url)
}
