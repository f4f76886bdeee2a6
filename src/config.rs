//! Application configuration loaded from environment variables, plus
//! the fixed plan parameters.
//!
//! The plan parameters are deliberately compile-time configuration:
//! they describe one athlete's race build and are not editable through
//! the API.

use chrono::NaiveDate;
use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// intervals.icu API key. Optional at startup: without it every
    /// wizard endpoint answers 401 so the front end can prompt for it.
    pub intervals_api_key: Option<String>,
    /// intervals.icu athlete id ("0" means the key's own athlete)
    pub athlete_id: String,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Fixed training-plan parameters
    pub plan: PlanParameters,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", raw.clone()))?,
            Err(_) => 8080,
        };

        Ok(Self {
            intervals_api_key: env::var("INTERVALS_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            athlete_id: env::var("INTERVALS_ATHLETE_ID").unwrap_or_else(|_| "0".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port,
            plan: PlanParameters::default(),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            intervals_api_key: Some("test_api_key".to_string()),
            athlete_id: "0".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            plan: PlanParameters::default(),
        }
    }
}

/// Fixed parameters describing the race build and the T1D fueling
/// thresholds.
#[derive(Debug, Clone)]
pub struct PlanParameters {
    /// Race name, for logging only
    pub race_name: String,
    /// Race day; week 1 is anchored off the Monday of this week
    pub race_date: NaiveDate,
    /// Target race distance in km
    pub race_distance_km: i64,
    /// Tag embedded in every generated event name
    pub plan_prefix: String,
    /// Total plan length in weeks
    pub plan_weeks: i64,
    /// Current comfortable long-run distance in km
    pub current_long_run_km: i64,
    /// Lactate-threshold heart rate (bpm)
    pub lthr: u32,
    /// Glucose drop rate (mmol/L/h) below which a crash is flagged
    pub crash_drop_rate: f64,
    /// Glucose rise rate (mmol/L/h) above which a spike is flagged
    pub spike_rise_rate: f64,
    /// Baseline carbohydrate dose, grams per 10-minute interval
    pub default_carbs_g: u32,
}

impl Default for PlanParameters {
    fn default() -> Self {
        Self {
            race_name: "EcoTrail".to_string(),
            race_date: NaiveDate::from_ymd_opt(2026, 6, 13).expect("valid race date"),
            race_distance_km: 16,
            plan_prefix: "eco16".to_string(),
            plan_weeks: 18,
            current_long_run_km: 8,
            lthr: 169,
            crash_drop_rate: -3.0,
            spike_rise_rate: 3.0,
            default_carbs_g: 10,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
