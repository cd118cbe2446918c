//! Rostering instance parameters.

use super::RosterError;

/// Days per week used when grouping weekly hours.
pub const DAYS_PER_WEEK: usize = 7;

/// Days at the start of the horizon on which every employee cycles through
/// four distinct shift codes.
pub const OPENING_DAYS: usize = 4;

/// Business and employee parameters of one rostering instance.
///
/// Filled in by whatever reads the instance description; this crate only
/// checks that the numbers are consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterInstance {
    /// Number of weeks in the horizon.
    pub num_weeks: usize,
    /// Number of days in the horizon.
    pub num_days: usize,
    pub num_employees: usize,
    /// Number of shift codes, including the off code 0.
    pub num_shifts: usize,
    /// Hour slots per day.
    pub num_intervals_in_day: usize,
    /// Minimum hours the business operates each day.
    pub min_daily_operation: i64,
    /// `min_demand_day_shift[day][shift]`: employees required on that shift.
    pub min_demand_day_shift: Vec<Vec<i64>>,
    /// Minimum hours of a working day.
    pub min_consecutive_work: i64,
    /// Maximum hours of a working day.
    pub max_daily_work: i64,
    pub min_weekly_work: i64,
    pub max_weekly_work: i64,
    pub max_consecutive_night_shift: i64,
    pub max_total_night_shift: i64,
}

impl RosterInstance {
    /// Instance with `weeks * 7` days and the same demand on every day.
    ///
    /// `demand` gives the requirement per shift code; missing codes get 0.
    pub fn uniform(weeks: usize, employees: usize, shifts: usize, demand: &[i64]) -> Self {
        let num_days = weeks * DAYS_PER_WEEK;
        let row: Vec<i64> = (0..shifts)
            .map(|s| demand.get(s).copied().unwrap_or(0))
            .collect();
        Self {
            num_weeks: weeks,
            num_days,
            num_employees: employees,
            num_shifts: shifts,
            num_intervals_in_day: 24,
            min_daily_operation: 0,
            min_demand_day_shift: vec![row; num_days],
            min_consecutive_work: 4,
            max_daily_work: 8,
            min_weekly_work: 20,
            max_weekly_work: 40,
            max_consecutive_night_shift: 1,
            max_total_night_shift: 3,
        }
    }

    /// Checks that the parameters describe a well-formed instance.
    pub fn validate(&self) -> Result<(), RosterError> {
        let invalid = |msg: String| Err(RosterError::Instance(msg));

        if self.num_employees == 0 {
            return invalid("no employees".into());
        }
        if self.num_shifts == 0 {
            return invalid("no shift codes".into());
        }
        if self.num_days < OPENING_DAYS {
            return invalid(format!(
                "{} days, at least {OPENING_DAYS} required",
                self.num_days
            ));
        }
        if self.num_days < self.num_weeks * DAYS_PER_WEEK {
            return invalid(format!(
                "{} weeks need {} days, got {}",
                self.num_weeks,
                self.num_weeks * DAYS_PER_WEEK,
                self.num_days
            ));
        }
        if self.min_demand_day_shift.len() != self.num_days {
            return invalid(format!(
                "demand table has {} rows for {} days",
                self.min_demand_day_shift.len(),
                self.num_days
            ));
        }
        for (day, row) in self.min_demand_day_shift.iter().enumerate() {
            if row.len() != self.num_shifts {
                return invalid(format!(
                    "demand row {day} has {} entries for {} shifts",
                    row.len(),
                    self.num_shifts
                ));
            }
            if let Some((shift, d)) = row.iter().enumerate().find(|(_, d)| **d < 0) {
                return invalid(format!("negative demand {d} on day {day}, shift {shift}"));
            }
        }
        if self.min_consecutive_work < 1 || self.min_consecutive_work > self.max_daily_work {
            return invalid(format!(
                "daily hours [{}, {}] must be a non-empty positive range",
                self.min_consecutive_work, self.max_daily_work
            ));
        }
        if self.min_weekly_work < 0 || self.min_weekly_work > self.max_weekly_work {
            return invalid(format!(
                "weekly hours [{}, {}] must be a non-empty range",
                self.min_weekly_work, self.max_weekly_work
            ));
        }
        if self.max_consecutive_night_shift < 0 || self.max_total_night_shift < 0 {
            return invalid("night shift limits must not be negative".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_is_valid() {
        let instance = RosterInstance::uniform(2, 4, 4, &[1, 1, 1]);
        assert_eq!(instance.num_days, 14);
        assert_eq!(instance.min_demand_day_shift[13], vec![1, 1, 1, 0]);
        assert!(instance.validate().is_ok());
    }

    #[test]
    fn test_negative_demand() {
        let mut instance = RosterInstance::uniform(1, 4, 4, &[1, 1, 1]);
        instance.min_demand_day_shift[3][2] = -1;
        let err = instance.validate().unwrap_err();
        assert!(err.to_string().contains("negative demand"));
    }

    #[test]
    fn test_demand_table_shape() {
        let mut instance = RosterInstance::uniform(1, 4, 4, &[1, 1, 1]);
        instance.min_demand_day_shift.pop();
        assert!(instance.validate().is_err());

        let mut instance = RosterInstance::uniform(1, 4, 4, &[1, 1, 1]);
        instance.min_demand_day_shift[0].push(0);
        assert!(instance.validate().is_err());
    }

    #[test]
    fn test_too_few_days() {
        let mut instance = RosterInstance::uniform(1, 4, 4, &[1, 1, 1]);
        instance.num_weeks = 2;
        assert!(instance.validate().is_err());

        let mut instance = RosterInstance::uniform(0, 4, 4, &[]);
        instance.num_days = 3;
        instance.min_demand_day_shift = vec![vec![0; 4]; 3];
        assert!(instance.validate().is_err());
    }

    #[test]
    fn test_bad_hour_ranges() {
        let mut instance = RosterInstance::uniform(1, 4, 4, &[1, 1, 1]);
        instance.min_consecutive_work = 9;
        assert!(instance.validate().is_err());

        let mut instance = RosterInstance::uniform(1, 4, 4, &[1, 1, 1]);
        instance.min_weekly_work = 50;
        assert!(instance.validate().is_err());
    }

    #[test]
    fn test_no_employees() {
        let instance = RosterInstance::uniform(1, 0, 4, &[1, 1, 1]);
        assert!(instance.validate().is_err());
    }
}
