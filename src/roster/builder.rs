//! Translation of a rostering instance into a CP model.
//!
//! # Reference
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"

use super::config::{RosterConfig, OFF_HOURS, OFF_SHIFT};
use super::extract::Roster;
use super::instance::{RosterInstance, DAYS_PER_WEEK, OPENING_DAYS};
use super::RosterError;
use crate::cp::{Constraint, CpModel, CpSolution, IntVar, Literal, ModelError, VarId};
use tracing::debug;

/// Sum of the four distinct codes used on the opening days.
const OPENING_CODE_SUM: i64 = 6;

/// A built roster model together with its decision variables.
#[derive(Debug, Clone)]
pub struct RosterModel {
    pub model: CpModel,
    /// `assignment[day][employee]`: shift code variable.
    pub assignment: Vec<Vec<VarId>>,
    /// `hours[day][employee]`: hours-worked variable.
    pub hours: Vec<Vec<VarId>>,
}

impl RosterModel {
    /// Reads a roster out of a feasible solution; `None` otherwise.
    pub fn extract(&self, solution: &CpSolution, config: &RosterConfig) -> Option<Roster> {
        if !solution.is_solution_found() {
            return None;
        }
        let grid = |vars: &[Vec<VarId>]| -> Option<Vec<Vec<i64>>> {
            let employees = vars.first().map_or(0, Vec::len);
            (0..employees)
                .map(|e| vars.iter().map(|day| solution.value(day[e])).collect())
                .collect()
        };
        let assignment = grid(&self.assignment)?;
        let hours = grid(&self.hours)?;
        Some(Roster::from_grids(assignment, hours, config))
    }
}

/// Builds the CP model of a rostering instance.
///
/// Variables are declared day by day: every `shift[d][e]` first, then every
/// `hours[d][e]`. With first-unbound branching the search therefore fixes
/// the shift pattern before it picks hours.
///
/// # Example
/// ```
/// use u_roster::roster::{RosterConfig, RosterInstance, RosterModelBuilder};
///
/// let instance = RosterInstance::uniform(1, 4, 4, &[1, 1, 1]);
/// let config = RosterConfig::default();
/// let built = RosterModelBuilder::new(&instance, &config).build().unwrap();
/// assert_eq!(built.model.var_count(), 2 * 7 * 4);
/// ```
pub struct RosterModelBuilder<'a> {
    instance: &'a RosterInstance,
    config: &'a RosterConfig,
}

impl<'a> RosterModelBuilder<'a> {
    pub fn new(instance: &'a RosterInstance, config: &'a RosterConfig) -> Self {
        Self { instance, config }
    }

    /// Validates the instance and configuration, then builds the model.
    ///
    /// Malformed input surfaces as [`RosterError::Instance`] before any
    /// variable is declared.
    pub fn build(&self) -> Result<RosterModel, RosterError> {
        self.instance.validate()?;
        self.config.validate(self.instance)?;

        let inst = self.instance;
        let mut model = CpModel::new("roster");

        let max_code = inst.num_shifts as i64 - 1;
        let assignment = (0..inst.num_days)
            .map(|d| {
                (0..inst.num_employees)
                    .map(|e| model.int_var(format!("shift[{d}][{e}]"), OFF_SHIFT, max_code))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        let hours = (0..inst.num_days)
            .map(|d| {
                (0..inst.num_employees)
                    .map(|e| {
                        let name = format!("hours[{d}][{e}]");
                        model.add_var(IntVar::with_values(name, &self.config.workable_hours)?)
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let demand = self.add_demand(&mut model, &assignment)?;
        let opening = self.add_opening_days(&mut model, &assignment)?;
        let daily = self.add_daily_hours(&mut model, &assignment, &hours)?;
        let weekly = self.add_weekly_hours(&mut model, &hours)?;
        let night = if self.config.night_shift.enabled {
            self.add_night_shift_rules(&mut model, &assignment)?
        } else {
            0
        };

        debug!(
            event = "roster_model_built",
            variables = model.var_count(),
            demand,
            opening,
            daily,
            weekly,
            night,
        );

        Ok(RosterModel {
            model,
            assignment,
            hours,
        })
    }

    /// Employees of `day` on shift `s`, for every code but the last.
    fn add_demand(
        &self,
        model: &mut CpModel,
        assignment: &[Vec<VarId>],
    ) -> Result<usize, ModelError> {
        let inst = self.instance;
        let mut count = 0;
        for (day, staff) in assignment.iter().enumerate() {
            for shift in 0..inst.num_shifts.saturating_sub(1) {
                let required = inst.min_demand_day_shift[day][shift] as usize;
                model.register(Constraint::at_least(staff.clone(), shift as i64, required))?;
                count += 1;
            }
        }
        Ok(count)
    }

    /// Distinct codes over the opening days, stated twice: once as
    /// all-different and once as a fixed sum.
    fn add_opening_days(
        &self,
        model: &mut CpModel,
        assignment: &[Vec<VarId>],
    ) -> Result<usize, ModelError> {
        let mut count = 0;
        for e in 0..self.instance.num_employees {
            let days: Vec<VarId> = assignment[..OPENING_DAYS].iter().map(|d| d[e]).collect();
            model.register(Constraint::all_different(days.clone()))?;
            model.register(Constraint::sum_between(
                days,
                OPENING_CODE_SUM,
                OPENING_CODE_SUM,
            ))?;
            count += 2;
        }
        Ok(count)
    }

    /// Off with zero hours, or on for a bounded number of hours.
    fn add_daily_hours(
        &self,
        model: &mut CpModel,
        assignment: &[Vec<VarId>],
        hours: &[Vec<VarId>],
    ) -> Result<usize, ModelError> {
        let inst = self.instance;
        let mut count = 0;
        for (shifts, worked) in assignment.iter().zip(hours) {
            for (&s, &h) in shifts.iter().zip(worked) {
                model.register(Constraint::disjunction(
                    vec![Literal::eq(s, OFF_SHIFT), Literal::eq(h, OFF_HOURS)],
                    vec![
                        Literal::ge(s, OFF_SHIFT + 1),
                        Literal::ge(h, inst.min_consecutive_work),
                        Literal::le(h, inst.max_daily_work),
                    ],
                ))?;
                count += 1;
            }
        }
        Ok(count)
    }

    fn add_weekly_hours(
        &self,
        model: &mut CpModel,
        hours: &[Vec<VarId>],
    ) -> Result<usize, ModelError> {
        let (min, max) = self.config.weekly_bounds(self.instance);
        let mut count = 0;
        for week in 0..self.instance.num_weeks {
            let days = &hours[week * DAYS_PER_WEEK..(week + 1) * DAYS_PER_WEEK];
            for e in 0..self.instance.num_employees {
                let vars = days.iter().map(|d| d[e]).collect();
                model.register(Constraint::sum_between(vars, min, max))?;
                count += 1;
            }
        }
        Ok(count)
    }

    /// Caps night shifts per employee, in total and within every run of
    /// `max_consecutive + 1` days.
    fn add_night_shift_rules(
        &self,
        model: &mut CpModel,
        assignment: &[Vec<VarId>],
    ) -> Result<usize, ModelError> {
        let inst = self.instance;
        let night = self.config.night_shift.shift;
        let run = inst.max_consecutive_night_shift as usize;
        let total = inst.max_total_night_shift as usize;

        let mut count = 0;
        for e in 0..inst.num_employees {
            let days: Vec<VarId> = assignment.iter().map(|d| d[e]).collect();
            for window in days.windows(run + 1) {
                model.register(Constraint::at_most(window.to_vec(), night, run))?;
                count += 1;
            }
            model.register(Constraint::at_most(days, night, total))?;
            count += 1;
        }
        Ok(count)
    }
}
