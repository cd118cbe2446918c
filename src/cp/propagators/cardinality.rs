//! Counting occurrences of a value.

use crate::cp::store::{Conflict, DomainStore, PropResult};
use crate::cp::variables::VarId;

/// Bound-consistency for `min <= |{x in vars : x = value}| <= max`.
///
/// A variable is *fixed* when its domain is `{value}` and *free* when the
/// domain still holds `value` among others.
pub(crate) fn propagate(
    vars: &[VarId],
    value: i64,
    min: usize,
    max: usize,
    store: &mut DomainStore,
) -> PropResult {
    let mut fixed = 0usize;
    let mut free = Vec::new();
    for &x in vars {
        if !store.contains(x, value) {
            continue;
        }
        if store.is_fixed(x) {
            fixed += 1;
        } else {
            free.push(x);
        }
    }

    if fixed > max || fixed + free.len() < min {
        return Err(Conflict);
    }
    if free.is_empty() {
        return Ok(());
    }
    if fixed + free.len() == min {
        for &x in &free {
            store.assign(x, value)?;
        }
    } else if fixed == max {
        for &x in &free {
            store.remove(x, value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::domain::Domain;

    fn store(domains: &[(i64, i64)]) -> DomainStore {
        DomainStore::new(domains.iter().map(|&(lo, hi)| Domain::interval(lo, hi)).collect())
    }

    fn ids(n: usize) -> Vec<VarId> {
        (0..n).map(VarId).collect()
    }

    #[test]
    fn test_unreachable_minimum() {
        let mut s = store(&[(1, 3), (0, 0), (2, 3)]);
        assert_eq!(propagate(&ids(3), 0, 2, 3, &mut s), Err(Conflict));
    }

    #[test]
    fn test_forces_free_when_tight() {
        let mut s = store(&[(0, 3), (1, 1), (0, 3)]);
        propagate(&ids(3), 0, 2, 3, &mut s).unwrap();
        assert_eq!(s.value(VarId(0)), Some(0));
        assert_eq!(s.value(VarId(2)), Some(0));
    }

    #[test]
    fn test_slack_prunes_nothing() {
        let mut s = store(&[(0, 3), (0, 3), (0, 3)]);
        propagate(&ids(3), 1, 1, 3, &mut s).unwrap();
        assert!(s.take_changed().is_empty());
    }

    #[test]
    fn test_upper_bound_removes_value() {
        let mut s = store(&[(1, 1), (0, 3), (0, 3)]);
        propagate(&ids(3), 1, 0, 1, &mut s).unwrap();
        assert!(!s.contains(VarId(1), 1));
        assert!(!s.contains(VarId(2), 1));
    }

    #[test]
    fn test_upper_bound_exceeded() {
        let mut s = store(&[(1, 1), (1, 1), (0, 3)]);
        assert_eq!(propagate(&ids(3), 1, 0, 1, &mut s), Err(Conflict));
    }

    #[test]
    fn test_idempotent() {
        for (min, max) in [(2, 3), (0, 1), (3, 3)] {
            let mut s = store(&[(1, 1), (0, 3), (1, 3), (2, 3)]);
            if propagate(&ids(4), 1, min, max, &mut s).is_err() {
                continue;
            }
            s.take_changed();
            propagate(&ids(4), 1, min, max, &mut s).unwrap();
            assert!(s.take_changed().is_empty(), "min {min}, max {max}");
        }
    }
}
