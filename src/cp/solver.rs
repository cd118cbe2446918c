//! CP solver interface and depth-first implementation.

use super::error::ConfigError;
use super::model::CpModel;
use super::propagators::PropagationQueue;
use super::store::{DomainStore, Token};
use super::variables::VarId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverStatus {
    /// Every variable is bound and every constraint holds.
    Feasible,
    /// The search tree was exhausted: no solution exists.
    Infeasible,
    /// The time limit expired before the search finished.
    Timeout,
    /// The fail limit was reached before the search finished.
    FailLimit,
    /// The search was cancelled externally.
    Cancelled,
}

impl SolverStatus {
    /// Whether the search stopped on a budget rather than an answer.
    pub fn is_budget_stop(self) -> bool {
        matches!(
            self,
            SolverStatus::Timeout | SolverStatus::FailLimit | SolverStatus::Cancelled
        )
    }
}

/// Branching variable selection.
///
/// Value selection is always smallest-value-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VarSelection {
    /// The unbound variable with the lowest id.
    #[default]
    FirstUnbound,
    /// The unbound variable with the smallest domain, lowest id on ties.
    MinDomain,
}

/// Solver configuration.
///
/// # Examples
///
/// ```
/// use u_roster::cp::{SolverConfig, VarSelection};
///
/// let config = SolverConfig::default()
///     .with_time_limit_ms(10_000)
///     .with_fail_limit(50_000)
///     .with_var_selection(VarSelection::MinDomain);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Maximum solve time in milliseconds.
    pub time_limit_ms: u64,
    /// Number of search workers. Must be 1: search is single-threaded so
    /// fail counts and timings are reproducible.
    pub num_workers: usize,
    /// Maximum number of fails before giving up. `None` = no limit.
    pub fail_limit: Option<u64>,
    /// Branching variable selection.
    pub var_selection: VarSelection,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 300_000,
            num_workers: 1,
            fail_limit: None,
            var_selection: VarSelection::FirstUnbound,
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn with_fail_limit(mut self, fails: u64) -> Self {
        self.fail_limit = Some(fails);
        self
    }

    pub fn with_var_selection(mut self, selection: VarSelection) -> Self {
        self.var_selection = selection;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_workers != 1 {
            return Err(ConfigError::Workers(self.num_workers));
        }
        if self.time_limit_ms == 0 {
            return Err(ConfigError::TimeLimit);
        }
        Ok(())
    }
}

/// Search effort counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Number of times propagation hit an inconsistency.
    pub fails: u64,
    /// Number of tentative bindings tried.
    pub branches: u64,
    /// Number of propagator runs.
    pub propagations: u64,
    /// Deepest choice-point stack seen.
    pub max_depth: usize,
    /// Solve time in milliseconds.
    pub solve_time_ms: u64,
}

/// Solution from a CP solver.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CpSolution {
    /// Solver status.
    pub status: SolverStatus,
    /// Value of every variable, indexed by [`VarId`]. Empty unless feasible.
    pub values: Vec<i64>,
    /// Search effort.
    pub stats: SearchStats,
}

impl CpSolution {
    /// Whether a feasible solution was found.
    pub fn is_solution_found(&self) -> bool {
        self.status == SolverStatus::Feasible
    }

    pub fn value(&self, var: VarId) -> Option<i64> {
        self.values.get(var.index()).copied()
    }

    /// Value of the first variable named `name`.
    pub fn value_of(&self, model: &CpModel, name: &str) -> Option<i64> {
        model.var_by_name(name).and_then(|v| self.value(v))
    }
}

/// Trait for CP solver implementations.
pub trait CpSolver {
    /// Solves the model and returns a solution.
    ///
    /// Each call owns its own domain store, propagation queue and trail.
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> Result<CpSolution, ConfigError>;
}

/// States of the depth-first search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchState {
    Propagating,
    Branching,
    Succeeded,
    Failed,
    /// Search stopped; carries why.
    Exhausted(SolverStatus),
}

/// A branching decision and the store state to return to.
#[derive(Debug)]
struct ChoicePoint {
    var: VarId,
    values: Vec<i64>,
    next: usize,
    token: Token,
}

/// Depth-first backtracking search with propagation at every node.
///
/// Branches on one variable at a time (see [`VarSelection`]), trying values
/// smallest first. After a failure the most recent choice point moves to its
/// next value; an exhausted choice point is popped. Budgets are checked once
/// per branch decision.
///
/// # Examples
///
/// ```
/// use u_roster::cp::{Constraint, CpModel, CpSolver, DepthFirstSolver, SolverConfig};
///
/// let mut model = CpModel::new("pair");
/// let a = model.int_var("a", 0, 1).unwrap();
/// let b = model.int_var("b", 0, 1).unwrap();
/// model.register(Constraint::all_different(vec![a, b])).unwrap();
///
/// let solution = DepthFirstSolver::new().solve(&model, &SolverConfig::default()).unwrap();
/// assert!(solution.is_solution_found());
/// assert_eq!(solution.value(a), Some(0));
/// assert_eq!(solution.value(b), Some(1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DepthFirstSolver {
    cancel: Option<Arc<AtomicBool>>,
}

impl DepthFirstSolver {
    pub fn new() -> Self {
        Self { cancel: None }
    }

    /// Stops the search at the next branch decision once `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn budget_stop(
        &self,
        config: &SolverConfig,
        deadline: Instant,
        stats: &SearchStats,
    ) -> Option<SolverStatus> {
        if let Some(ref flag) = self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Some(SolverStatus::Cancelled);
            }
        }
        if Instant::now() >= deadline {
            return Some(SolverStatus::Timeout);
        }
        if config.fail_limit.is_some_and(|limit| stats.fails >= limit) {
            return Some(SolverStatus::FailLimit);
        }
        None
    }

    /// Moves the most recent open choice point to its next value.
    fn backtrack(
        &self,
        store: &mut DomainStore,
        stack: &mut Vec<ChoicePoint>,
        stats: &mut SearchStats,
        config: &SolverConfig,
        deadline: Instant,
    ) -> SearchState {
        loop {
            let depth = stack.len();
            let Some(frame) = stack.last_mut() else {
                return SearchState::Exhausted(SolverStatus::Infeasible);
            };
            if frame.next == frame.values.len() {
                store.restore(frame.token);
                stack.pop();
                continue;
            }
            if let Some(stop) = self.budget_stop(config, deadline, stats) {
                return SearchState::Exhausted(stop);
            }

            store.restore(frame.token);
            frame.token = store.snapshot();
            let value = frame.values[frame.next];
            frame.next += 1;
            stats.branches += 1;
            trace!(event = "retry", depth, var = %frame.var, value);

            return match store.assign(frame.var, value) {
                Ok(_) => SearchState::Propagating,
                Err(_) => SearchState::Failed,
            };
        }
    }
}

fn select_var(store: &DomainStore, selection: VarSelection) -> Option<VarId> {
    let mut unbound = (0..store.len())
        .map(VarId)
        .filter(|&v| store.domain(v).size() > 1);
    match selection {
        VarSelection::FirstUnbound => unbound.next(),
        VarSelection::MinDomain => unbound.min_by_key(|&v| (store.domain(v).size(), v)),
    }
}

impl CpSolver for DepthFirstSolver {
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> Result<CpSolution, ConfigError> {
        config.validate()?;

        let start = Instant::now();
        let deadline = start + Duration::from_millis(config.time_limit_ms);
        info!(
            event = "solve_start",
            model = %model.name,
            variables = model.var_count(),
            constraints = model.constraint_count(),
            time_limit_ms = config.time_limit_ms,
        );

        let mut store = DomainStore::new(model.initial_domains());
        let mut queue = PropagationQueue::new(model);
        queue.schedule_all();

        let mut stack: Vec<ChoicePoint> = Vec::new();
        let mut stats = SearchStats::default();
        let mut values = Vec::new();
        let mut state = SearchState::Propagating;

        let status = loop {
            state = match state {
                SearchState::Propagating => match queue.fixpoint(&mut store) {
                    Err(_) => SearchState::Failed,
                    Ok(()) => match store.assignment() {
                        Some(all) => {
                            values = all;
                            SearchState::Succeeded
                        }
                        None => SearchState::Branching,
                    },
                },

                SearchState::Branching => {
                    if stack.is_empty() {
                        debug!(event = "root_propagated", propagations = queue.runs());
                    }
                    if let Some(stop) = self.budget_stop(config, deadline, &stats) {
                        SearchState::Exhausted(stop)
                    } else if let Some(var) = select_var(&store, config.var_selection) {
                        let domain_values: Vec<i64> = store.domain(var).values().collect();
                        let value = domain_values[0];
                        let token = store.snapshot();
                        stack.push(ChoicePoint {
                            var,
                            values: domain_values,
                            next: 1,
                            token,
                        });
                        stats.branches += 1;
                        stats.max_depth = stats.max_depth.max(stack.len());
                        trace!(event = "branch", depth = stack.len(), var = %var, value);

                        match store.assign(var, value) {
                            Ok(_) => SearchState::Propagating,
                            Err(_) => SearchState::Failed,
                        }
                    } else {
                        match store.assignment() {
                            Some(all) => {
                                values = all;
                                SearchState::Succeeded
                            }
                            None => SearchState::Failed,
                        }
                    }
                }

                SearchState::Failed => {
                    stats.fails += 1;
                    self.backtrack(&mut store, &mut stack, &mut stats, config, deadline)
                }

                SearchState::Succeeded => break SolverStatus::Feasible,

                SearchState::Exhausted(status) => break status,
            };
        };

        if status.is_budget_stop() {
            debug!(event = "budget_stop", status = ?status, depth = stack.len());
        }
        debug_assert!(
            status != SolverStatus::Feasible
                || model.constraints().iter().all(|c| c.is_satisfied_by(&values))
        );

        stats.propagations = queue.runs();
        stats.solve_time_ms = start.elapsed().as_millis() as u64;

        info!(
            event = "solve_end",
            model = %model.name,
            status = ?status,
            fails = stats.fails,
            branches = stats.branches,
            propagations = stats.propagations,
            duration_ms = stats.solve_time_ms,
        );

        Ok(CpSolution {
            status,
            values,
            stats,
        })
    }
}
