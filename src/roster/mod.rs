//! Employee shift rostering on top of the CP engine.
//!
//! Turns a [`RosterInstance`] into a [`CpModel`](crate::cp::CpModel), solves it
//! with the [`DepthFirstSolver`] and reads the answer back as per-employee,
//! per-day working hours.
//!
//! # Decision variables
//!
//! - `shift[d][e]`: shift code of employee `e` on day `d`, `0` meaning off
//! - `hours[d][e]`: hours worked, drawn from [`RosterConfig::workable_hours`]
//!
//! # Constraint groups
//!
//! 1. Demand: at least `min_demand_day_shift[d][s]` employees on shift `s`
//! 2. Opening days: the first four days use four distinct codes summing to 6
//! 3. Off days work zero hours; working days work a bounded number of hours
//! 4. Weekly hours stay within the configured bounds
//! 5. Night-shift fatigue limits (optional)
//!
//! # Examples
//!
//! ```
//! use u_roster::roster::{solve_roster, RosterConfig, RosterInstance};
//!
//! let instance = RosterInstance::uniform(1, 4, 4, &[1, 1, 1]);
//! let report = solve_roster(&instance, &RosterConfig::default()).unwrap();
//! assert!(report.is_success());
//! let roster = report.roster.unwrap();
//! assert!(roster.violations(&instance, &RosterConfig::default()).is_empty());
//! ```

mod builder;
mod config;
mod extract;
mod generator;
mod instance;

pub use builder::{RosterModel, RosterModelBuilder};
pub use config::{NightShiftRules, RosterConfig, WeeklyHours, OFF_HOURS, OFF_SHIFT};
pub use extract::{Roster, Violation, NOT_SCHEDULED};
pub use generator::{GeneratorConfig, InstanceGenerator};
pub use instance::{RosterInstance, DAYS_PER_WEEK, OPENING_DAYS};

use crate::cp::{ConfigError, CpSolver, DepthFirstSolver, ModelError, SearchStats, SolverStatus};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors raised before search starts.
///
/// An instance that turns out to have no roster is not an error; it is
/// reported as [`SolverStatus::Infeasible`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// The instance parameters or the roster configuration are inconsistent.
    #[error("invalid instance: {0}")]
    Instance(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Outcome of a rostering run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterReport {
    /// How the search ended.
    pub status: SolverStatus,
    /// The roster, when one was found.
    pub roster: Option<Roster>,
    /// Search effort.
    pub stats: SearchStats,
}

impl RosterReport {
    /// Whether a roster was found.
    pub fn is_success(&self) -> bool {
        self.status == SolverStatus::Feasible
    }

    /// Whether the search proved that no roster exists.
    pub fn is_infeasible(&self) -> bool {
        self.status == SolverStatus::Infeasible
    }

    /// Number of failed branches explored.
    pub fn fails(&self) -> u64 {
        self.stats.fails
    }
}

/// Builds and solves the roster model for `instance`.
pub fn solve_roster(
    instance: &RosterInstance,
    config: &RosterConfig,
) -> Result<RosterReport, RosterError> {
    solve_roster_with_cancel(instance, config, None)
}

/// Like [`solve_roster`], stopping early once `cancel` is set.
pub fn solve_roster_with_cancel(
    instance: &RosterInstance,
    config: &RosterConfig,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<RosterReport, RosterError> {
    let built = RosterModelBuilder::new(instance, config).build()?;

    let mut solver = DepthFirstSolver::new();
    if let Some(flag) = cancel {
        solver = solver.with_cancel(flag);
    }
    let solution = solver.solve(&built.model, &config.solver)?;
    let roster = built.extract(&solution, config);

    info!(
        event = "roster_done",
        employees = instance.num_employees,
        days = instance.num_days,
        status = ?solution.status,
        fails = solution.stats.fails,
        duration_ms = solution.stats.solve_time_ms,
    );

    Ok(RosterReport {
        status: solution.status,
        roster,
        stats: solution.stats,
    })
}
