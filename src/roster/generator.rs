//! Seeded random rostering instances.
//!
//! Used by property tests and benchmarks. Generated instances are always
//! well-formed; whether they admit a roster depends on the demand drawn.

use super::instance::{RosterInstance, DAYS_PER_WEEK};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Configuration for generating rostering instances.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub num_weeks: usize,
    /// Employee count range (min, max), inclusive.
    pub employees_range: (usize, usize),
    /// Shift codes, including the off code.
    pub num_shifts: usize,
    /// Per-shift daily demand range (min, max), inclusive.
    pub demand_range: (i64, i64),
    /// Shortest working day range (min, max), inclusive.
    pub min_consecutive_range: (i64, i64),
    pub max_daily_work: i64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::easy()
    }
}

impl GeneratorConfig {
    /// One week, plenty of staff, light demand.
    pub fn easy() -> Self {
        Self {
            num_weeks: 1,
            employees_range: (4, 6),
            num_shifts: 4,
            demand_range: (0, 1),
            min_consecutive_range: (4, 5),
            max_daily_work: 8,
        }
    }

    /// Two weeks, tight staff, demand on every shift.
    pub fn hard() -> Self {
        Self {
            num_weeks: 2,
            employees_range: (4, 5),
            num_shifts: 4,
            demand_range: (1, 2),
            min_consecutive_range: (4, 6),
            max_daily_work: 8,
        }
    }

    pub fn with_weeks(mut self, weeks: usize) -> Self {
        self.num_weeks = weeks;
        self
    }

    pub fn with_employees(mut self, min: usize, max: usize) -> Self {
        self.employees_range = (min, max);
        self
    }
}

/// Generator for rostering instances.
pub struct InstanceGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl InstanceGenerator {
    /// Creates a generator with the given config and seed.
    pub fn new(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates the next instance.
    pub fn generate(&mut self) -> RosterInstance {
        let (lo, hi) = self.config.employees_range;
        let employees = self.rng.random_range(lo..=hi.max(lo));
        let shifts = self.config.num_shifts;

        let mut instance = RosterInstance::uniform(self.config.num_weeks, employees, shifts, &[]);
        let (d_lo, d_hi) = self.config.demand_range;
        for row in &mut instance.min_demand_day_shift {
            // no demand on the last code, which the model leaves unconstrained
            for demand in row.iter_mut().take(shifts.saturating_sub(1)) {
                *demand = self.rng.random_range(d_lo.max(0)..=d_hi.max(d_lo).max(0));
            }
        }

        let (c_lo, c_hi) = self.config.min_consecutive_range;
        let max_daily = self.config.max_daily_work;
        let shortest = self.rng.random_range(c_lo..=c_hi.max(c_lo));
        instance.min_consecutive_work = shortest.clamp(1, max_daily.max(1));
        instance.max_daily_work = max_daily;
        instance.min_daily_operation = instance.min_consecutive_work;
        instance.max_total_night_shift = (instance.num_days / DAYS_PER_WEEK * 3) as i64;
        instance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_instances_validate() {
        for config in [GeneratorConfig::easy(), GeneratorConfig::hard()] {
            let mut generator = InstanceGenerator::new(config.clone(), 7);
            for _ in 0..20 {
                let instance = generator.generate();
                assert!(instance.validate().is_ok());
                assert!((config.employees_range.0..=config.employees_range.1)
                    .contains(&instance.num_employees));
                assert_eq!(instance.num_days, config.num_weeks * DAYS_PER_WEEK);
                assert!(instance
                    .min_demand_day_shift
                    .iter()
                    .all(|row| row[config.num_shifts - 1] == 0));
            }
        }
    }

    #[test]
    fn test_same_seed_same_instance() {
        let a = InstanceGenerator::new(GeneratorConfig::hard(), 42).generate();
        let b = InstanceGenerator::new(GeneratorConfig::hard(), 42).generate();
        assert_eq!(a, b);
    }

    #[test]
    fn test_inverted_ranges() {
        let config = GeneratorConfig {
            employees_range: (5, 3),
            demand_range: (2, 1),
            min_consecutive_range: (6, 4),
            ..GeneratorConfig::easy()
        };
        let mut generator = InstanceGenerator::new(config, 3);
        for _ in 0..5 {
            let instance = generator.generate();
            assert_eq!(instance.num_employees, 5);
            assert_eq!(instance.min_consecutive_work, 6);
            assert!(instance.validate().is_ok());
        }
    }

    #[test]
    fn test_builders() {
        let config = GeneratorConfig::easy().with_weeks(3).with_employees(8, 8);
        let instance = InstanceGenerator::new(config, 1).generate();
        assert_eq!(instance.num_days, 21);
        assert_eq!(instance.num_employees, 8);
    }
}
