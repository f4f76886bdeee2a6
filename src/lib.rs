// SPDX-License-Identifier: MIT

//! TrailFuel: training-plan generation and intervals.icu sync for a
//! T1D trail runner.
//!
//! This crate provides the backend API driving the three-step wizard:
//! analyze recent glucose trends, decide on a fueling dose, and push a
//! regenerated workout calendar to intervals.icu.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{IntervalsClient, PlanSession};
use tokio::sync::Mutex;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub intervals: IntervalsClient,
    /// Wizard state for the single user session.
    pub session: Mutex<PlanSession>,
}
