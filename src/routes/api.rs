// SPDX-License-Identifier: MIT

//! Wizard API routes: analyze, decide, commit.
//!
//! The three steps mirror the interactive flow: step 1 fetches recent
//! history and reports the glucose trend with a suggested dose, step 2
//! fixes the dose (accept / keep / manual override), step 3 regenerates
//! the plan and pushes it to the intervals.icu calendar.

use crate::error::{AppError, Result};
use crate::services::{analysis, generate_plan, Analysis, Decision, PlanSession};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Local};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How far back the trend analysis looks for activities.
const ACTIVITY_WINDOW_DAYS: i64 = 45;

/// How far ahead the commit sweep deletes previously planned workouts.
const DELETE_HORIZON_DAYS: i64 = 365;

/// Sanity bound on the manual override. A typo here ends up in an
/// insulin-management plan, so anything implausible is rejected.
const MAX_MANUAL_DOSE_G: u32 = 60;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/session", get(get_session))
        .route("/api/analyze", post(analyze))
        .route("/api/decision", post(decide))
        .route("/api/commit", post(commit))
        .route("/api/reset", post(reset))
}

// ─── Step 0: session snapshot ────────────────────────────────

/// Current wizard state, for the front end to render the right step.
async fn get_session(State(state): State<Arc<AppState>>) -> Json<PlanSession> {
    Json(state.session.lock().await.clone())
}

// ─── Step 1: analyze ─────────────────────────────────────────

/// Run the trend analysis over the recent activity window.
///
/// Read failures degrade to "no data found"; only a missing API key is
/// an error here.
async fn analyze(State(state): State<Arc<AppState>>) -> Result<Json<Analysis>> {
    let today = Local::now().date_naive();
    let oldest = today - Duration::days(ACTIVITY_WINDOW_DAYS);

    let report =
        analysis::fetch_and_analyze(&state.intervals, &state.config.plan, oldest, today).await?;

    let (suggested_dose, verdict) =
        analysis::suggest_dose(report.avg_rate, report.current_dose, &state.config.plan);

    let analysis = Analysis {
        avg_rate: report.avg_rate,
        current_dose: report.current_dose,
        suggested_dose,
        verdict,
        has_data: report.has_data,
    };

    state.session.lock().await.record_analysis(analysis.clone());
    Ok(Json(analysis))
}

// ─── Step 2: decide ──────────────────────────────────────────

#[derive(Deserialize)]
struct DecisionRequest {
    /// "accept", "keep" or "manual"
    choice: String,
    /// Required for "manual": dose in grams per 10 minutes
    manual_dose: Option<u32>,
}

#[derive(Serialize)]
struct DecisionResponse {
    final_dose: u32,
}

/// Fix the dose for the upcoming plan regeneration.
async fn decide(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DecisionRequest>,
) -> Result<Json<DecisionResponse>> {
    let decision = match req.choice.as_str() {
        "accept" => Decision::AcceptSuggested,
        "keep" => Decision::KeepCurrent,
        "manual" => {
            let dose = req.manual_dose.ok_or_else(|| {
                AppError::BadRequest("choice 'manual' requires manual_dose".to_string())
            })?;
            if dose > MAX_MANUAL_DOSE_G {
                return Err(AppError::BadRequest(format!(
                    "manual_dose must be at most {} g per 10 minutes",
                    MAX_MANUAL_DOSE_G
                )));
            }
            Decision::Manual(dose)
        }
        other => {
            return Err(AppError::BadRequest(format!(
                "unknown choice '{}' (expected accept, keep or manual)",
                other
            )))
        }
    };

    let final_dose = state.session.lock().await.decide(decision)?;
    tracing::info!(final_dose, "Fueling decision recorded");
    Ok(Json(DecisionResponse { final_dose }))
}

// ─── Step 3: commit ──────────────────────────────────────────

#[derive(Serialize)]
struct CommitResponse {
    uploaded: usize,
    final_dose: u32,
}

/// Regenerate the remaining plan and push it to the calendar.
///
/// The delete sweep is fire-and-forget. A failed bulk upsert is
/// surfaced to the caller and leaves the session ready, so the commit
/// can simply be retried.
async fn commit(State(state): State<Arc<AppState>>) -> Result<Json<CommitResponse>> {
    let final_dose = state.session.lock().await.pending_dose()?;

    let today = Local::now().date_naive();
    let events = generate_plan(final_dose, &state.config.plan, today);

    let now = Local::now().naive_local();
    if let Err(e) = state
        .intervals
        .delete_future_workouts(now, now + Duration::days(DELETE_HORIZON_DAYS))
        .await
    {
        tracing::warn!(error = %e, "Workout delete sweep failed, continuing with upsert");
    }

    let uploaded = state.intervals.bulk_upsert_events(&events).await?;
    state.session.lock().await.reset();
    tracing::info!(uploaded, final_dose, "Plan committed to calendar");

    Ok(Json(CommitResponse {
        uploaded,
        final_dose,
    }))
}

// ─── Reset ───────────────────────────────────────────────────

/// Abandon the wizard and return to the idle state.
async fn reset(State(state): State<Arc<AppState>>) -> Json<PlanSession> {
    let mut session = state.session.lock().await;
    session.reset();
    Json(session.clone())
}
