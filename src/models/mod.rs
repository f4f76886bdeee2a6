// SPDX-License-Identifier: MIT

//! Data models for intervals.icu records and generated workouts.

pub mod activity;
pub mod workout;

pub use activity::{Activity, CalendarEvent, StreamSeries};
pub use workout::{EventPayload, WorkoutEvent};
