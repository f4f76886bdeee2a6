// SPDX-License-Identifier: MIT

//! Service layer: intervals.icu client, trend analysis, plan
//! generation, and the wizard session state machine.

pub mod analysis;
pub mod intervals;
pub mod plan;
pub mod session;

pub use analysis::{TrendAnalyzer, TrendReport, TrendVerdict};
pub use intervals::IntervalsClient;
pub use plan::generate_plan;
pub use session::{Analysis, Decision, PlanSession, SessionError};
