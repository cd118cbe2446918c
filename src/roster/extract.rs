//! Rosters read out of solved models, and their invariant checker.

use super::config::{RosterConfig, OFF_HOURS, OFF_SHIFT};
use super::instance::{RosterInstance, DAYS_PER_WEEK, OPENING_DAYS};

/// Begin/end hour of a day on which the employee does not work.
pub const NOT_SCHEDULED: i64 = -1;

/// A complete roster. Every table is indexed `[employee][day]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    /// Shift code worked.
    pub assignment: Vec<Vec<i64>>,
    /// Hours worked.
    pub hours: Vec<Vec<i64>>,
    /// First working hour, or [`NOT_SCHEDULED`].
    pub begin_hour: Vec<Vec<i64>>,
    /// Hour the shift ends, or [`NOT_SCHEDULED`].
    pub end_hour: Vec<Vec<i64>>,
}

/// A broken roster rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    ShiftOutOfRange {
        employee: usize,
        day: usize,
        shift: i64,
    },
    HoursNotWorkable {
        employee: usize,
        day: usize,
        hours: i64,
    },
    /// Opening-day codes repeat or do not sum to 6.
    OpeningDays { employee: usize },
    /// Off with hours, or on with too few or too many.
    DailyHours {
        employee: usize,
        day: usize,
        shift: i64,
        hours: i64,
    },
    WeeklyHours {
        employee: usize,
        week: usize,
        total: i64,
    },
    Demand {
        day: usize,
        shift: usize,
        staffed: usize,
        required: i64,
    },
    NightTotal { employee: usize, nights: usize },
    /// A run of night shifts ending on `last_day` is too long.
    NightRun {
        employee: usize,
        last_day: usize,
        length: usize,
    },
}

impl Roster {
    /// Builds a roster from `[employee][day]` shift and hours tables.
    ///
    /// Begin hours come from the configured start of each shift code; the
    /// end hour is the begin hour plus the hours worked.
    pub fn from_grids(
        assignment: Vec<Vec<i64>>,
        hours: Vec<Vec<i64>>,
        config: &RosterConfig,
    ) -> Self {
        let mut begin_hour = Vec::with_capacity(assignment.len());
        let mut end_hour = Vec::with_capacity(assignment.len());
        for (shifts, worked) in assignment.iter().zip(&hours) {
            let (begin, end): (Vec<i64>, Vec<i64>) = shifts
                .iter()
                .zip(worked)
                .map(|(&s, &h)| match config.shift_start(s) {
                    Some(start) => (start, start + h),
                    None => (NOT_SCHEDULED, NOT_SCHEDULED),
                })
                .unzip();
            begin_hour.push(begin);
            end_hour.push(end);
        }
        Self {
            assignment,
            hours,
            begin_hour,
            end_hour,
        }
    }

    pub fn num_employees(&self) -> usize {
        self.assignment.len()
    }

    pub fn num_days(&self) -> usize {
        self.assignment.first().map_or(0, Vec::len)
    }

    /// Whether employee `e` works on `day`.
    pub fn is_working(&self, e: usize, day: usize) -> bool {
        self.assignment[e][day] != OFF_SHIFT
    }

    /// Every rule of `instance` and `config` this roster breaks.
    ///
    /// Expects tables sized for the instance.
    pub fn violations(&self, instance: &RosterInstance, config: &RosterConfig) -> Vec<Violation> {
        let mut found = Vec::new();
        let days = instance.num_days;
        let last_code = instance.num_shifts as i64 - 1;

        for (employee, (shifts, worked)) in self.assignment.iter().zip(&self.hours).enumerate() {
            for day in 0..days {
                let (shift, hours) = (shifts[day], worked[day]);
                if !(OFF_SHIFT..=last_code).contains(&shift) {
                    found.push(Violation::ShiftOutOfRange {
                        employee,
                        day,
                        shift,
                    });
                }
                if !config.workable_hours.contains(&hours) {
                    found.push(Violation::HoursNotWorkable {
                        employee,
                        day,
                        hours,
                    });
                }
                let daily_ok = if shift == OFF_SHIFT {
                    hours == OFF_HOURS
                } else {
                    (instance.min_consecutive_work..=instance.max_daily_work).contains(&hours)
                };
                if !daily_ok {
                    found.push(Violation::DailyHours {
                        employee,
                        day,
                        shift,
                        hours,
                    });
                }
            }

            let mut opening = shifts[..OPENING_DAYS].to_vec();
            opening.sort_unstable();
            opening.dedup();
            if opening.len() != OPENING_DAYS || shifts[..OPENING_DAYS].iter().sum::<i64>() != 6 {
                found.push(Violation::OpeningDays { employee });
            }

            let (min, max) = config.weekly_bounds(instance);
            for week in 0..instance.num_weeks {
                let total: i64 = worked[week * DAYS_PER_WEEK..(week + 1) * DAYS_PER_WEEK]
                    .iter()
                    .sum();
                if !(min..=max).contains(&total) {
                    found.push(Violation::WeeklyHours {
                        employee,
                        week,
                        total,
                    });
                }
            }

            if config.night_shift.enabled {
                self.check_nights(employee, instance, config, &mut found);
            }
        }

        for day in 0..days {
            for shift in 0..instance.num_shifts.saturating_sub(1) {
                let required = instance.min_demand_day_shift[day][shift];
                let staffed = self
                    .assignment
                    .iter()
                    .filter(|shifts| shifts[day] == shift as i64)
                    .count();
                if (staffed as i64) < required {
                    found.push(Violation::Demand {
                        day,
                        shift,
                        staffed,
                        required,
                    });
                }
            }
        }

        found
    }

    fn check_nights(
        &self,
        employee: usize,
        instance: &RosterInstance,
        config: &RosterConfig,
        found: &mut Vec<Violation>,
    ) {
        let night = config.night_shift.shift;
        let shifts = &self.assignment[employee];

        let nights = shifts.iter().filter(|&&s| s == night).count();
        if nights as i64 > instance.max_total_night_shift {
            found.push(Violation::NightTotal { employee, nights });
        }

        let mut length = 0usize;
        for (day, &s) in shifts.iter().enumerate() {
            length = if s == night { length + 1 } else { 0 };
            let run_ends = shifts.get(day + 1).map_or(true, |&next| next != night);
            if length as i64 > instance.max_consecutive_night_shift && run_ends {
                found.push(Violation::NightRun {
                    employee,
                    last_day: day,
                    length,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One week, two employees, hand-built to satisfy the default rules.
    fn week() -> (RosterInstance, Vec<Vec<i64>>, Vec<Vec<i64>>) {
        let mut instance = RosterInstance::uniform(1, 2, 4, &[]);
        instance.min_demand_day_shift[1][1] = 1;
        instance.min_demand_day_shift[4][1] = 1;
        let assignment = vec![vec![1, 2, 3, 0, 1, 0, 1], vec![0, 1, 2, 3, 2, 1, 3]];
        let hours = vec![vec![8, 8, 8, 0, 8, 0, 4], vec![0, 8, 4, 4, 4, 4, 4]];
        (instance, assignment, hours)
    }

    #[test]
    fn test_begin_end_lookup() {
        let (_, assignment, hours) = week();
        let roster = Roster::from_grids(assignment, hours, &RosterConfig::default());

        assert_eq!(roster.num_employees(), 2);
        assert_eq!(roster.num_days(), 7);
        assert_eq!(roster.begin_hour[0], vec![0, 8, 16, -1, 0, -1, 0]);
        assert_eq!(roster.end_hour[0], vec![8, 16, 24, -1, 8, -1, 4]);
        assert_eq!(roster.begin_hour[1][0], NOT_SCHEDULED);
        assert_eq!(roster.end_hour[1][2], 12);
        assert!(roster.is_working(1, 1));
        assert!(!roster.is_working(1, 0));
    }

    #[test]
    fn test_valid_roster_has_no_violations() {
        let (instance, assignment, hours) = week();
        let config = RosterConfig::default();
        let roster = Roster::from_grids(assignment, hours, &config);
        assert_eq!(roster.violations(&instance, &config), Vec::new());
    }

    #[test]
    fn test_detects_daily_rules() {
        let (instance, mut assignment, mut hours) = week();
        // on with no hours; the opening codes now repeat
        assignment[0][3] = 1;
        // off with hours
        hours[1][0] = 5;
        let config = RosterConfig::default();
        let roster = Roster::from_grids(assignment, hours, &config);
        let found = roster.violations(&instance, &config);

        assert_eq!(
            found,
            vec![
                Violation::DailyHours {
                    employee: 0,
                    day: 3,
                    shift: 1,
                    hours: 0
                },
                Violation::OpeningDays { employee: 0 },
                Violation::DailyHours {
                    employee: 1,
                    day: 0,
                    shift: 0,
                    hours: 5
                },
            ]
        );
    }

    #[test]
    fn test_detects_weekly_hours_and_range() {
        let (instance, mut assignment, mut hours) = week();
        assignment[1] = vec![0, 1, 2, 3, 0, 0, 0];
        hours[1] = vec![0, 4, 4, 4, 0, 0, 0];
        let config = RosterConfig::default();
        let roster = Roster::from_grids(assignment.clone(), hours.clone(), &config);
        assert_eq!(
            roster.violations(&instance, &config),
            vec![Violation::WeeklyHours {
                employee: 1,
                week: 0,
                total: 12
            }]
        );

        assignment[0][6] = 7;
        hours[0][6] = 3;
        let roster = Roster::from_grids(assignment, hours, &config);
        let found = roster.violations(&instance, &config);
        assert!(found.contains(&Violation::ShiftOutOfRange {
            employee: 0,
            day: 6,
            shift: 7
        }));
        assert!(found.contains(&Violation::HoursNotWorkable {
            employee: 0,
            day: 6,
            hours: 3
        }));
    }

    #[test]
    fn test_detects_understaffing() {
        let (instance, mut assignment, hours) = week();
        // nobody on shift 1 on day 1
        assignment[1][1] = 2;
        let config = RosterConfig::default();
        let roster = Roster::from_grids(assignment, hours, &config);
        let found = roster.violations(&instance, &config);
        assert!(found.contains(&Violation::Demand {
            day: 1,
            shift: 1,
            staffed: 0,
            required: 1
        }));
    }

    #[test]
    fn test_night_checks_only_when_enabled() {
        let (instance, assignment, hours) = week();
        let roster = Roster::from_grids(assignment, hours, &RosterConfig::default());

        // employee 0 works nights on days 0, 4 and 6; the limit is 3 in total
        // and 1 in a row, so only a lower total limit trips
        let mut strict = instance.clone();
        strict.max_total_night_shift = 2;
        let config = RosterConfig::default().with_night_shift_rules(true);
        assert!(roster.violations(&instance, &config).is_empty());
        let found = roster.violations(&strict, &config);
        assert_eq!(
            found,
            vec![Violation::NightTotal {
                employee: 0,
                nights: 3
            }]
        );
        assert!(roster
            .violations(&strict, &RosterConfig::default())
            .is_empty());
    }

    #[test]
    fn test_night_run() {
        let (instance, mut assignment, hours) = week();
        assignment[1][4] = 1;
        assignment[1][5] = 1;
        let config = RosterConfig::default().with_night_shift_rules(true);
        let roster = Roster::from_grids(assignment, hours, &config);
        let found = roster.violations(&instance, &config);
        assert!(found.contains(&Violation::NightRun {
            employee: 1,
            last_day: 5,
            length: 2
        }));
    }
}
