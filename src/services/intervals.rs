// SPDX-License-Identifier: MIT

//! intervals.icu API client.
//!
//! Handles:
//! - Activity listing over a date window
//! - Glucose/time stream fetching per activity
//! - Calendar event lookup for a single date
//! - Workout deletion and bulk upsert for plan sync
//!
//! Authentication is HTTP basic auth with the literal username
//! `API_KEY` and the athlete's key as password. The key is optional at
//! construction; any call without one fails with `MissingCredential`
//! before touching the network.

use crate::error::AppError;
use crate::models::{Activity, CalendarEvent, StreamSeries, WorkoutEvent};
use crate::time_utils::format_local_iso;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://intervals.icu/api/v1";

/// Stream keys requested for trend analysis. Different devices report
/// glucose under different series names.
const STREAM_KEYS: &str = "time,bloodglucose,glucose,ga_smooth";

/// intervals.icu API client.
#[derive(Clone)]
pub struct IntervalsClient {
    http: reqwest::Client,
    base_url: String,
    athlete_id: String,
    api_key: Option<String>,
}

impl IntervalsClient {
    /// Create a client against the production API.
    pub fn new(api_key: Option<String>, athlete_id: String) -> Self {
        Self::with_base_url(api_key, athlete_id, DEFAULT_BASE_URL.to_string())
    }

    /// Create a client against an arbitrary base URL (for tests).
    pub fn with_base_url(api_key: Option<String>, athlete_id: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            athlete_id,
            api_key,
        }
    }

    fn key(&self) -> Result<&str, AppError> {
        self.api_key.as_deref().ok_or(AppError::MissingCredential)
    }

    /// List activities with local start dates inside `[oldest, newest]`.
    pub async fn list_activities(
        &self,
        oldest: NaiveDate,
        newest: NaiveDate,
    ) -> Result<Vec<Activity>, AppError> {
        let key = self.key()?;
        let url = format!("{}/athlete/{}/activities", self.base_url, self.athlete_id);

        let response = self
            .http
            .get(&url)
            .basic_auth("API_KEY", Some(key))
            .query(&[
                ("oldest", oldest.to_string()),
                ("newest", newest.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::IntervalsApi(e.to_string()))?;

        check_response_json(response).await
    }

    /// Fetch the time and glucose streams for one activity.
    pub async fn get_streams(&self, activity_id: &str) -> Result<Vec<StreamSeries>, AppError> {
        let key = self.key()?;
        let url = format!("{}/activity/{}/streams", self.base_url, activity_id);

        let response = self
            .http
            .get(&url)
            .basic_auth("API_KEY", Some(key))
            .query(&[("keys", STREAM_KEYS)])
            .send()
            .await
            .map_err(|e| AppError::IntervalsApi(e.to_string()))?;

        check_response_json(response).await
    }

    /// List calendar events scheduled on a single date.
    pub async fn list_events_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<CalendarEvent>, AppError> {
        let key = self.key()?;
        let url = format!("{}/athlete/{}/events", self.base_url, self.athlete_id);
        let date_str = date.to_string();

        let response = self
            .http
            .get(&url)
            .basic_auth("API_KEY", Some(key))
            .query(&[("oldest", date_str.as_str()), ("newest", date_str.as_str())])
            .send()
            .await
            .map_err(|e| AppError::IntervalsApi(e.to_string()))?;

        check_response_json(response).await
    }

    /// Delete planned workouts inside `[oldest, newest]`.
    ///
    /// The commit path treats this as best-effort; callers log and
    /// ignore the error.
    pub async fn delete_future_workouts(
        &self,
        oldest: NaiveDateTime,
        newest: NaiveDateTime,
    ) -> Result<(), AppError> {
        let key = self.key()?;
        let url = format!("{}/athlete/{}/events", self.base_url, self.athlete_id);

        let response = self
            .http
            .delete(&url)
            .basic_auth("API_KEY", Some(key))
            .query(&[
                ("oldest", format_local_iso(oldest)),
                ("newest", format_local_iso(newest)),
                ("category", "WORKOUT".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::IntervalsApi(e.to_string()))?;

        check_response(response).await
    }

    /// Upsert the generated plan in one call, keyed by external id.
    /// Returns the number of events sent.
    pub async fn bulk_upsert_events(&self, events: &[WorkoutEvent]) -> Result<usize, AppError> {
        let key = self.key()?;
        let url = format!(
            "{}/athlete/{}/events/bulk?upsert=true",
            self.base_url, self.athlete_id
        );

        let payload: Vec<_> = events.iter().map(WorkoutEvent::to_payload).collect();

        let response = self
            .http
            .post(&url)
            .basic_auth("API_KEY", Some(key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::IntervalsApi(e.to_string()))?;

        check_response(response).await?;
        Ok(events.len())
    }
}

/// Check response status and return error if not successful.
async fn check_response(response: reqwest::Response) -> Result<(), AppError> {
    if response.status().is_success() {
        return Ok(());
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if status.as_u16() == 401 || status.as_u16() == 403 {
        tracing::warn!(status = %status, "intervals.icu rejected the API key");
    }

    Err(AppError::IntervalsApi(format!("HTTP {}: {}", status, body)))
}

/// Check response and parse JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::IntervalsApi(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::IntervalsApi(format!("JSON parse error: {}", e)))
}
