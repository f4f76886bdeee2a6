// SPDX-License-Identifier: MIT

//! Glucose trend analysis over recent plan activities.
//!
//! Core workflow:
//! 1. Keep activities whose name carries the plan prefix
//! 2. Recover the currently active carb dose from the latest of them
//! 3. Compute the glucose rate of change over the last few sessions
//! 4. Average the rates into a single trend figure
//!
//! Everything read from the network is best-effort: a failed fetch or
//! malformed stream drops that sample, never the whole analysis.

use crate::config::PlanParameters;
use crate::error::AppError;
use crate::models::{Activity, StreamSeries};
use crate::services::IntervalsClient;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// How many recent sessions feed the trend average.
const TREND_SAMPLE_COUNT: usize = 3;

/// Sessions shorter than this (hours) are too noisy to rate.
const MIN_DURATION_HOURS: f64 = 0.2;

/// Series names under which devices report glucose.
const GLUCOSE_SERIES: [&str; 3] = ["bloodglucose", "glucose", "ga_smooth"];

/// Result of a trend analysis.
#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    /// Average glucose rate of change during matching runs, mmol/L/h
    pub avg_rate: f64,
    /// Carb dose currently in effect, grams per 10 minutes
    pub current_dose: u32,
    /// False when no activity matched the plan prefix
    pub has_data: bool,
}

/// What the trend says about the current fueling strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendVerdict {
    /// Dropping faster than the crash threshold, increase the dose
    Crash,
    /// Rising faster than the spike threshold, decrease the dose
    Spike,
    /// Rising fast but already at the baseline dose, hold
    SpikeAtBaseline,
    /// Within thresholds, keep the strategy
    Stable,
}

/// Analyzes recent activities against the plan's fueling thresholds.
pub struct TrendAnalyzer<'a> {
    client: &'a IntervalsClient,
    params: &'a PlanParameters,
}

impl<'a> TrendAnalyzer<'a> {
    pub fn new(client: &'a IntervalsClient, params: &'a PlanParameters) -> Self {
        Self { client, params }
    }

    /// Analyze a window of recent activities.
    pub async fn analyze(&self, activities: &[Activity]) -> TrendReport {
        let prefix = self.params.plan_prefix.to_lowercase();
        let mut matching: Vec<&Activity> = activities
            .iter()
            .filter(|a| a.name.to_lowercase().contains(&prefix))
            .collect();

        if matching.is_empty() {
            return TrendReport {
                avg_rate: 0.0,
                current_dose: self.params.default_carbs_g,
                has_data: false,
            };
        }

        // Most recent first; local ISO timestamps sort lexically.
        matching.sort_by(|a, b| b.start_date_local.cmp(&a.start_date_local));

        let current_dose = self.current_dose(&matching).await;

        let mut rates = Vec::new();
        for activity in matching.iter().take(TREND_SAMPLE_COUNT) {
            let streams = match self.client.get_streams(&activity.id).await {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!(
                        activity_id = %activity.id,
                        error = %e,
                        "Stream fetch failed, skipping activity"
                    );
                    continue;
                }
            };
            if let Some(rate) = rate_from_streams(&streams) {
                rates.push(rate);
            }
        }

        let avg_rate = if rates.is_empty() {
            0.0
        } else {
            rates.iter().sum::<f64>() / rates.len() as f64
        };

        tracing::info!(
            matched = matching.len(),
            rated = rates.len(),
            avg_rate,
            current_dose,
            "Trend analysis complete"
        );

        TrendReport {
            avg_rate,
            current_dose,
            has_data: true,
        }
    }

    /// Recover the dose currently in effect from the most recent
    /// matching activity: its own description first, then the planned
    /// calendar event on the same date, then the baseline.
    async fn current_dose(&self, matching: &[&Activity]) -> u32 {
        let Some(last) = matching.first() else {
            return self.params.default_carbs_g;
        };

        if let Some(dose) = last.description.as_deref().and_then(parse_fuel_dose) {
            return dose;
        }

        if let Some(date) = last.start_date() {
            let events = match self.client.list_events_for_date(date).await {
                Ok(events) => events,
                Err(e) => {
                    tracing::warn!(%date, error = %e, "Calendar lookup failed");
                    Vec::new()
                }
            };

            let prefix = self.params.plan_prefix.to_lowercase();
            for event in events {
                if !event.name.to_lowercase().contains(&prefix) {
                    continue;
                }
                let combined = format!(
                    "{} {}",
                    event.description.as_deref().unwrap_or(""),
                    event.name
                );
                if let Some(dose) = parse_fuel_dose(&combined) {
                    tracing::debug!(%date, dose, "Dose recovered from calendar plan");
                    return dose;
                }
            }
        }

        self.params.default_carbs_g
    }
}

/// Fetch the activity window and analyze it in one step.
///
/// Read failures on the activity list degrade to an empty window (and
/// so to a "no data" report); only a missing API key is surfaced.
pub async fn fetch_and_analyze(
    client: &IntervalsClient,
    params: &PlanParameters,
    oldest: chrono::NaiveDate,
    newest: chrono::NaiveDate,
) -> Result<TrendReport, AppError> {
    let activities = match client.list_activities(oldest, newest).await {
        Ok(a) => a,
        Err(AppError::MissingCredential) => return Err(AppError::MissingCredential),
        Err(e) => {
            tracing::warn!(error = %e, "Activity fetch failed, treating as empty");
            Vec::new()
        }
    };

    Ok(TrendAnalyzer::new(client, params).analyze(&activities).await)
}

/// Compute a glucose rate from an activity's stream set, if eligible.
fn rate_from_streams(streams: &[StreamSeries]) -> Option<f64> {
    let times = streams
        .iter()
        .find(|s| s.series_type == "time")?
        .numeric_data();
    // Devices can report under several glucose names at once; the
    // last matching series in the response wins.
    let glucose = streams
        .iter()
        .filter(|s| GLUCOSE_SERIES.contains(&s.series_type.as_str()))
        .last()?
        .numeric_data();
    glucose_rate(&times, &glucose)
}

/// Signed glucose rate of change in units per hour, or `None` when the
/// session is ineligible: fewer than two time samples, no glucose
/// samples, or a total duration of 0.2 hours or less.
pub fn glucose_rate(times: &[f64], glucose: &[f64]) -> Option<f64> {
    if times.len() < 2 || glucose.is_empty() {
        return None;
    }

    let duration_hours = (times[times.len() - 1] - times[0]) / 3600.0;
    if duration_hours <= MIN_DURATION_HOURS {
        return None;
    }

    let delta = glucose[glucose.len() - 1] - glucose[0];
    Some(delta / duration_hours)
}

static FUEL_RE: OnceLock<Regex> = OnceLock::new();

/// Parse an embedded fueling tag.
///
/// Grammar: `FUEL:`, optional whitespace, an integer, a literal `g`,
/// all case-insensitive (`FUEL:\s*(\d+)g`). Returns `None` when no tag
/// is present.
pub fn parse_fuel_dose(text: &str) -> Option<u32> {
    let re = FUEL_RE.get_or_init(|| Regex::new(r"(?i)FUEL:\s*(\d+)g").expect("valid fuel regex"));
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Suggest the next dose from the averaged trend.
///
/// A crash suggests +5 g; a spike suggests -5 g unless the dose is
/// already at baseline; anything within thresholds keeps the strategy.
pub fn suggest_dose(avg_rate: f64, current: u32, params: &PlanParameters) -> (u32, TrendVerdict) {
    if avg_rate < params.crash_drop_rate {
        (current.saturating_add(5), TrendVerdict::Crash)
    } else if avg_rate > params.spike_rise_rate {
        if current > params.default_carbs_g {
            (current.saturating_sub(5), TrendVerdict::Spike)
        } else {
            (current, TrendVerdict::SpikeAtBaseline)
        }
    } else {
        (current, TrendVerdict::Stable)
    }
}
