//! Rostering model configuration.

use super::instance::RosterInstance;
use super::RosterError;
use crate::cp::SolverConfig;

/// Hours worked on a day off.
pub const OFF_HOURS: i64 = 0;

/// Shift code meaning "not working".
pub const OFF_SHIFT: i64 = 0;

/// Where the weekly-hours bounds come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeeklyHours {
    /// Fixed bounds, independent of the instance.
    Fixed { min: i64, max: i64 },
    /// The instance's `min_weekly_work` / `max_weekly_work`.
    FromInstance,
}

impl Default for WeeklyHours {
    /// 20 to 40 hours, whatever the instance says.
    fn default() -> Self {
        WeeklyHours::Fixed { min: 20, max: 40 }
    }
}

/// Night-shift fatigue rules: a cap on total night shifts per employee and on
/// night shifts in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NightShiftRules {
    pub enabled: bool,
    /// Shift code of the night shift.
    pub shift: i64,
}

impl Default for NightShiftRules {
    fn default() -> Self {
        Self {
            enabled: false,
            shift: 1,
        }
    }
}

/// Configuration for building and solving a roster.
///
/// # Examples
///
/// ```
/// use u_roster::roster::{RosterConfig, WeeklyHours};
///
/// let config = RosterConfig::default()
///     .with_weekly_hours(WeeklyHours::FromInstance)
///     .with_night_shift_rules(true);
/// assert!(config.night_shift.enabled);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterConfig {
    /// Values a daily hours variable may take. Must contain [`OFF_HOURS`].
    pub workable_hours: Vec<i64>,
    /// Weekly-hours bounds policy.
    pub weekly_hours: WeeklyHours,
    /// Night-shift fatigue rules.
    pub night_shift: NightShiftRules,
    /// Start hour of each shift code; `None` for the off code.
    pub shift_starts: Vec<Option<i64>>,
    /// Search settings.
    pub solver: SolverConfig,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            workable_hours: vec![0, 4, 5, 6, 7, 8],
            weekly_hours: WeeklyHours::default(),
            night_shift: NightShiftRules::default(),
            shift_starts: vec![None, Some(0), Some(8), Some(16)],
            solver: SolverConfig::default(),
        }
    }
}

impl RosterConfig {
    pub fn with_workable_hours(mut self, hours: Vec<i64>) -> Self {
        self.workable_hours = hours;
        self
    }

    pub fn with_weekly_hours(mut self, weekly: WeeklyHours) -> Self {
        self.weekly_hours = weekly;
        self
    }

    pub fn with_night_shift_rules(mut self, enabled: bool) -> Self {
        self.night_shift.enabled = enabled;
        self
    }

    pub fn with_shift_starts(mut self, starts: Vec<Option<i64>>) -> Self {
        self.shift_starts = starts;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Weekly-hours bounds for `instance`.
    pub fn weekly_bounds(&self, instance: &RosterInstance) -> (i64, i64) {
        match self.weekly_hours {
            WeeklyHours::Fixed { min, max } => (min, max),
            WeeklyHours::FromInstance => (instance.min_weekly_work, instance.max_weekly_work),
        }
    }

    /// Start hour of `shift`, or `None` when the code means "not working".
    pub fn shift_start(&self, shift: i64) -> Option<i64> {
        usize::try_from(shift)
            .ok()
            .and_then(|s| self.shift_starts.get(s).copied().flatten())
    }

    /// Validates the configuration against an instance.
    pub fn validate(&self, instance: &RosterInstance) -> Result<(), RosterError> {
        let invalid = |msg: String| Err(RosterError::Instance(msg));

        if !self.workable_hours.contains(&OFF_HOURS) {
            return invalid("workable hours must include 0".into());
        }
        if let Some(h) = self.workable_hours.iter().find(|h| **h < 0) {
            return invalid(format!("negative workable hours {h}"));
        }
        if let WeeklyHours::Fixed { min, max } = self.weekly_hours {
            if min > max {
                return invalid(format!("weekly hours [{min}, {max}] are inverted"));
            }
        }
        if self.shift_starts.len() < instance.num_shifts {
            return invalid(format!(
                "{} shift codes but only {} start hours",
                instance.num_shifts,
                self.shift_starts.len()
            ));
        }
        if self.shift_starts.first().is_some_and(Option::is_some) {
            return invalid("shift code 0 must mean not working".into());
        }
        if let Some(missing) = (1..instance.num_shifts).find(|&s| self.shift_starts[s].is_none()) {
            return invalid(format!("shift code {missing} has no start hour"));
        }
        if self.night_shift.enabled
            && !(1..instance.num_shifts as i64).contains(&self.night_shift.shift)
        {
            return invalid(format!(
                "night shift code {} is not a working shift",
                self.night_shift.shift
            ));
        }
        self.solver.validate()?;
        Ok(())
    }
}
