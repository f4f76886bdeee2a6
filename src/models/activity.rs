// SPDX-License-Identifier: MIT

//! Wire models for records read from intervals.icu.
//!
//! These are read-only inputs supplied by the external service, so
//! deserialization is deliberately tolerant: unexpected shapes degrade
//! to defaults instead of failing the whole response.

use serde::Deserialize;

/// A recorded activity as returned by `GET /athlete/{id}/activities`.
#[derive(Debug, Clone, Deserialize)]
pub struct Activity {
    /// intervals.icu activity id (opaque string, e.g. "i42271502")
    pub id: String,
    /// Activity name/title
    #[serde(default)]
    pub name: String,
    /// Local start time, ISO 8601. Lexical order matches time order.
    #[serde(default)]
    pub start_date_local: String,
    /// Free-text description, may embed a `FUEL: Ng` tag
    #[serde(default)]
    pub description: Option<String>,
}

impl Activity {
    /// Calendar date portion of the local start time.
    pub fn start_date(&self) -> Option<chrono::NaiveDate> {
        let date_part = self.start_date_local.split('T').next()?;
        date_part.parse().ok()
    }
}

/// One typed sample series from `GET /activity/{id}/streams`.
///
/// Sample values are kept as raw JSON: glucose feeds occasionally
/// contain nulls or non-numeric entries, which are filtered out when
/// the series is converted to numbers.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamSeries {
    #[serde(rename = "type")]
    pub series_type: String,
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
}

impl StreamSeries {
    /// Numeric samples, with nulls and malformed entries dropped.
    pub fn numeric_data(&self) -> Vec<f64> {
        self.data.iter().filter_map(|v| v.as_f64()).collect()
    }
}

/// A calendar event as returned by `GET /athlete/{id}/events`.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarEvent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}
