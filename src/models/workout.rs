// SPDX-License-Identifier: MIT

//! Generated workout calendar entries.

use crate::time_utils::format_local_iso;
use chrono::NaiveDateTime;
use serde::Serialize;

/// One planned workout, immutable once generated.
///
/// The external id is a deterministic function of (plan prefix, weekday
/// slot, week number), so regenerating the plan overwrites the previous
/// upload instead of duplicating it.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutEvent {
    /// Scheduled local start time, second precision
    pub start_date_local: NaiveDateTime,
    /// Event name shown in the calendar
    pub name: String,
    /// Structured workout text with the embedded fueling strategy
    pub description: String,
    /// Stable upsert key, e.g. "eco16-tue-5"
    pub external_id: String,
}

impl WorkoutEvent {
    /// Upload payload for the bulk upsert endpoint.
    pub fn to_payload(&self) -> EventPayload {
        EventPayload {
            category: "WORKOUT",
            event_type: "Run",
            start_date_local: format_local_iso(self.start_date_local),
            name: self.name.clone(),
            description: self.description.clone(),
            external_id: self.external_id.clone(),
        }
    }
}

/// JSON body element for `POST /athlete/{id}/events/bulk?upsert=true`.
#[derive(Debug, Clone, Serialize)]
pub struct EventPayload {
    pub category: &'static str,
    #[serde(rename = "type")]
    pub event_type: &'static str,
    pub start_date_local: String,
    pub name: String,
    pub description: String,
    pub external_id: String,
}
