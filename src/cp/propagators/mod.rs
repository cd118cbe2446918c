//! Propagators and the propagation fixpoint.
//!
//! One filtering algorithm per [`Constraint`] kind:
//!
//! - **AllDifferent**: bound values are removed from the rest of the scope,
//!   plus a pigeonhole check on the union of domains
//! - **Cardinality**: bound consistency on the number of occurrences
//! - **LinearSumBound**: bounds consistency on the weighted sum
//! - **Disjunction**: constructive disjunction over two literal conjunctions
//!
//! Every propagator is monotone and only removes values through the
//! [`DomainStore`], which records the variables it touched. The
//! [`PropagationQueue`] turns those records into wake-ups of the constraints
//! watching the variables until nothing changes.
//!
//! # References
//!
//! - Bessiere (2006), "Constraint Propagation", Handbook of Constraint Programming, Ch. 3
//! - Van Hentenryck, Saraswat & Deville (1998), "Design, Implementation, and
//!   Evaluation of the Constraint Language cc(FD)"

mod all_different;
mod cardinality;
mod disjunction;
mod linear;

use super::model::{Constraint, CpModel};
use super::store::{DomainStore, PropResult};
use std::collections::VecDeque;

/// Runs the propagator matching the constraint's kind once.
pub(crate) fn propagate(constraint: &Constraint, store: &mut DomainStore) -> PropResult {
    match constraint {
        Constraint::AllDifferent { vars } => all_different::propagate(vars, store),
        Constraint::Cardinality {
            vars,
            value,
            min,
            max,
        } => cardinality::propagate(vars, *value, *min, *max, store),
        Constraint::LinearSumBound {
            vars,
            coeffs,
            lower,
            upper,
        } => linear::propagate(vars, coeffs, *lower, *upper, store),
        Constraint::Disjunction { branch_a, branch_b } => {
            disjunction::propagate(branch_a, branch_b, store)
        }
    }
}

/// Work-queue of constraints waiting to be propagated.
///
/// Built once per solve from the model's dependency index.
#[derive(Debug)]
pub struct PropagationQueue<'m> {
    constraints: &'m [Constraint],
    watchers: Vec<Vec<usize>>,
    queue: VecDeque<usize>,
    queued: Vec<bool>,
    runs: u64,
}

impl<'m> PropagationQueue<'m> {
    pub fn new(model: &'m CpModel) -> Self {
        let constraints = model.constraints();
        Self {
            constraints,
            watchers: model.dependency_index(),
            queue: VecDeque::with_capacity(constraints.len()),
            queued: vec![false; constraints.len()],
            runs: 0,
        }
    }

    fn push(&mut self, c: usize) {
        if !self.queued[c] {
            self.queued[c] = true;
            self.queue.push_back(c);
        }
    }

    /// Queues every constraint, in registration order.
    pub fn schedule_all(&mut self) {
        for c in 0..self.constraints.len() {
            self.push(c);
        }
    }

    fn schedule_changed(&mut self, store: &mut DomainStore) {
        for var in store.take_changed() {
            for i in 0..self.watchers[var.index()].len() {
                let c = self.watchers[var.index()][i];
                self.push(c);
            }
        }
    }

    fn clear(&mut self) {
        for c in self.queue.drain(..) {
            self.queued[c] = false;
        }
    }

    /// Propagates until the queue is empty or a constraint fails.
    ///
    /// Constraints watching variables changed since the last call are queued
    /// first. On failure the queue is emptied; the caller restores the store.
    pub fn fixpoint(&mut self, store: &mut DomainStore) -> PropResult {
        self.schedule_changed(store);
        while let Some(c) = self.queue.pop_front() {
            self.queued[c] = false;
            self.runs += 1;
            if let Err(conflict) = propagate(&self.constraints[c], store) {
                self.clear();
                store.clear_changed();
                return Err(conflict);
            }
            self.schedule_changed(store);
        }
        Ok(())
    }

    /// Number of propagator runs so far.
    pub fn runs(&self) -> u64 {
        self.runs
    }
}
