// SPDX-License-Identifier: MIT

//! Wizard session state machine.
//!
//! The three-step flow is an explicit FSM rather than a pair of
//! booleans: `Idle -> Analyzed -> ReadyToCommit -> Idle`. Transitions
//! are typed and unit-testable independent of the HTTP layer.

use crate::error::AppError;
use crate::services::TrendVerdict;
use serde::Serialize;

/// Snapshot of a completed trend analysis, carried between steps.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub avg_rate: f64,
    pub current_dose: u32,
    pub suggested_dose: u32,
    pub verdict: TrendVerdict,
    pub has_data: bool,
}

/// The user's fueling decision in step 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Take the analyzer's suggestion
    AcceptSuggested,
    /// Keep the dose currently in effect
    KeepCurrent,
    /// Override with an explicit dose in grams
    Manual(u32),
}

/// Wizard state for the single user session.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PlanSession {
    /// Nothing analyzed yet
    #[default]
    Idle,
    /// Step 1 done: analysis available, awaiting a decision
    Analyzed { analysis: Analysis },
    /// Step 2 done: dose fixed, awaiting commit
    ReadyToCommit { analysis: Analysis, final_dose: u32 },
}

impl PlanSession {
    /// Record a fresh analysis. Allowed from any state; re-analyzing
    /// always discards an earlier decision.
    pub fn record_analysis(&mut self, analysis: Analysis) {
        *self = PlanSession::Analyzed { analysis };
    }

    /// Apply the user's decision, fixing the final dose.
    ///
    /// Allowed from `Analyzed` and, for a changed mind, from
    /// `ReadyToCommit`. Returns the dose that will be committed.
    pub fn decide(&mut self, decision: Decision) -> Result<u32, SessionError> {
        let analysis = match self {
            PlanSession::Analyzed { analysis }
            | PlanSession::ReadyToCommit { analysis, .. } => analysis.clone(),
            PlanSession::Idle => return Err(SessionError::NotAnalyzed),
        };

        let final_dose = match decision {
            Decision::AcceptSuggested => analysis.suggested_dose,
            Decision::KeepCurrent => analysis.current_dose,
            Decision::Manual(dose) => dose,
        };

        *self = PlanSession::ReadyToCommit {
            analysis,
            final_dose,
        };
        Ok(final_dose)
    }

    /// The dose fixed in step 2, awaiting commit.
    ///
    /// Does not change state: the caller resets the wizard only after
    /// the upload has succeeded, so a failed commit can be retried
    /// without redoing the earlier steps.
    pub fn pending_dose(&self) -> Result<u32, SessionError> {
        match self {
            PlanSession::ReadyToCommit { final_dose, .. } => Ok(*final_dose),
            PlanSession::Analyzed { .. } => Err(SessionError::NotReady),
            PlanSession::Idle => Err(SessionError::NotAnalyzed),
        }
    }

    /// Abandon the wizard.
    pub fn reset(&mut self) {
        *self = PlanSession::Idle;
    }

    /// The analysis from step 1, if one has been recorded.
    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            PlanSession::Idle => None,
            PlanSession::Analyzed { analysis }
            | PlanSession::ReadyToCommit { analysis, .. } => Some(analysis),
        }
    }
}

/// Illegal wizard transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("analysis has not been run yet")]
    NotAnalyzed,

    #[error("no fueling decision has been made yet")]
    NotReady,
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::InvalidState(err.to_string())
    }
}
