//! Domain store with a trail for backtracking.

use super::domain::Domain;
use super::variables::VarId;

/// Outcome of a single narrowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Narrowing {
    /// No value was removed.
    Unchanged,
    /// Some values were removed and at least one remains.
    Changed,
    /// The domain has been wiped out.
    Empty,
}

/// A propagation failure: some domain became empty, or a constraint can no
/// longer be satisfied under the current domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict;

/// Result type for pruning operations.
pub type PropResult<T = ()> = Result<T, Conflict>;

impl Narrowing {
    /// Converts to a pruning result: `Ok(changed)` or `Err(Conflict)`.
    pub fn into_result(self) -> PropResult<bool> {
        match self {
            Narrowing::Unchanged => Ok(false),
            Narrowing::Changed => Ok(true),
            Narrowing::Empty => Err(Conflict),
        }
    }
}

/// Marks a point the store can be rolled back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    trail_len: usize,
    parent_epoch: u64,
}

/// Owns the live domain of every variable during one solve.
///
/// Every narrowing is recorded so that [`DomainStore::restore`] undoes all
/// changes since a [`Token`] was taken. A variable's old domain is trailed at
/// most once per snapshot, so restoring costs O(number of changed variables).
#[derive(Debug, Clone)]
pub struct DomainStore {
    domains: Vec<Domain>,
    trail: Vec<(VarId, Domain)>,
    trailed_at: Vec<u64>,
    epoch: u64,
    next_epoch: u64,
    changed: Vec<VarId>,
    pending: Vec<bool>,
}

impl DomainStore {
    /// Creates a store from initial domains, indexed by [`VarId`].
    pub fn new(domains: Vec<Domain>) -> Self {
        let n = domains.len();
        Self {
            domains,
            trail: Vec::new(),
            trailed_at: vec![0; n],
            epoch: 0,
            next_epoch: 1,
            changed: Vec::new(),
            pending: vec![false; n],
        }
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn domain(&self, var: VarId) -> &Domain {
        &self.domains[var.0]
    }

    /// Whether the variable's domain has been wiped out.
    pub fn is_empty(&self, var: VarId) -> bool {
        self.domains[var.0].is_empty()
    }

    pub fn is_fixed(&self, var: VarId) -> bool {
        self.domains[var.0].is_fixed()
    }

    pub fn value(&self, var: VarId) -> Option<i64> {
        self.domains[var.0].value()
    }

    pub fn min(&self, var: VarId) -> PropResult<i64> {
        self.domains[var.0].min().ok_or(Conflict)
    }

    pub fn max(&self, var: VarId) -> PropResult<i64> {
        self.domains[var.0].max().ok_or(Conflict)
    }

    pub fn contains(&self, var: VarId, value: i64) -> bool {
        self.domains[var.0].contains(value)
    }

    /// Whether every variable is bound to a single value.
    pub fn all_fixed(&self) -> bool {
        self.domains.iter().all(Domain::is_fixed)
    }

    /// Removes every value of `var` failing `keep`.
    ///
    /// A change marks the variable so the propagation queue can wake the
    /// constraints watching it.
    pub fn narrow(&mut self, var: VarId, keep: impl Fn(i64) -> bool) -> Narrowing {
        let domain = &self.domains[var.0];
        if domain.values().all(&keep) {
            return if domain.is_empty() {
                Narrowing::Empty
            } else {
                Narrowing::Unchanged
            };
        }

        if self.epoch != 0 && self.trailed_at[var.0] != self.epoch {
            self.trail.push((var, domain.clone()));
            self.trailed_at[var.0] = self.epoch;
        }

        let domain = &mut self.domains[var.0];
        domain.retain(keep);
        let empty = domain.is_empty();

        if !self.pending[var.0] {
            self.pending[var.0] = true;
            self.changed.push(var);
        }

        if empty {
            Narrowing::Empty
        } else {
            Narrowing::Changed
        }
    }

    /// Binds `var` to `value`.
    pub fn assign(&mut self, var: VarId, value: i64) -> PropResult<bool> {
        self.narrow(var, |v| v == value).into_result()
    }

    pub fn remove(&mut self, var: VarId, value: i64) -> PropResult<bool> {
        self.narrow(var, |v| v != value).into_result()
    }

    pub fn set_min(&mut self, var: VarId, min: i64) -> PropResult<bool> {
        self.narrow(var, |v| v >= min).into_result()
    }

    pub fn set_max(&mut self, var: VarId, max: i64) -> PropResult<bool> {
        self.narrow(var, |v| v <= max).into_result()
    }

    /// Takes a snapshot to restore to later.
    pub fn snapshot(&mut self) -> Token {
        let token = Token {
            trail_len: self.trail.len(),
            parent_epoch: self.epoch,
        };
        self.epoch = self.next_epoch;
        self.next_epoch += 1;
        token
    }

    /// Undoes every narrowing performed since `token` was taken.
    ///
    /// Tokens taken after `token` become invalid.
    pub fn restore(&mut self, token: Token) {
        while self.trail.len() > token.trail_len {
            if let Some((var, domain)) = self.trail.pop() {
                self.domains[var.0] = domain;
            }
        }
        self.epoch = token.parent_epoch;
        self.clear_changed();
    }

    /// Number of trailed entries (diagnostics).
    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    /// Drains the variables changed since the last call.
    pub fn take_changed(&mut self) -> Vec<VarId> {
        for var in &self.changed {
            self.pending[var.0] = false;
        }
        std::mem::take(&mut self.changed)
    }

    pub fn clear_changed(&mut self) {
        self.take_changed();
    }

    /// Current value of every variable, or `None` if any is unbound.
    pub fn assignment(&self) -> Option<Vec<i64>> {
        self.domains.iter().map(Domain::value).collect()
    }
}
