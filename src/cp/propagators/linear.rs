//! Bounds consistency for weighted sums.

use crate::cp::store::{Conflict, DomainStore, PropResult};
use crate::cp::variables::VarId;

/// Propagates `lower <= sum(coeffs[i] * vars[i]) <= upper` on bounds.
///
/// Each pass tightens every variable against the slack the other terms
/// leave, computed from the bounds seen at the start of the pass. Passes
/// repeat until nothing moves, so one call reaches the bounds fixpoint of
/// this constraint.
///
/// Sums are taken in `i128`. A side whose sum still overflows is treated
/// as unbounded and prunes nothing.
pub(crate) fn propagate(
    vars: &[VarId],
    coeffs: &[i64],
    lower: i64,
    upper: i64,
    store: &mut DomainStore,
) -> PropResult {
    while tighten(vars, coeffs, i128::from(lower), i128::from(upper), store)? {}
    Ok(())
}

/// One pass; returns whether any bound moved.
fn tighten(
    vars: &[VarId],
    coeffs: &[i64],
    lower: i128,
    upper: i128,
    store: &mut DomainStore,
) -> PropResult<bool> {
    let mut terms = Vec::with_capacity(vars.len());
    let mut min_sum = Some(0i128);
    let mut max_sum = Some(0i128);
    for (&x, &c) in vars.iter().zip(coeffs) {
        let c = i128::from(c);
        let (lo, hi) = (i128::from(store.min(x)?), i128::from(store.max(x)?));
        let (t_min, t_max) = if c >= 0 { (c * lo, c * hi) } else { (c * hi, c * lo) };
        min_sum = min_sum.and_then(|s| s.checked_add(t_min));
        max_sum = max_sum.and_then(|s| s.checked_add(t_max));
        terms.push((t_min, t_max));
    }

    if min_sum.is_some_and(|s| s > upper) || max_sum.is_some_and(|s| s < lower) {
        return Err(Conflict);
    }

    let mut changed = false;
    for ((&x, &c), &(t_min, t_max)) in vars.iter().zip(coeffs).zip(&terms) {
        if c == 0 {
            continue;
        }
        let c = i128::from(c);
        // c * x <= cap_hi and c * x >= cap_lo
        let cap_hi = min_sum
            .and_then(|s| s.checked_sub(t_min))
            .and_then(|rest| upper.checked_sub(rest));
        let cap_lo = max_sum
            .and_then(|s| s.checked_sub(t_max))
            .and_then(|rest| lower.checked_sub(rest));
        let (max, min) = if c > 0 {
            (cap_hi.map(|v| floor_div(v, c)), cap_lo.map(|v| ceil_div(v, c)))
        } else {
            (cap_lo.map(|v| floor_div(v, c)), cap_hi.map(|v| ceil_div(v, c)))
        };
        if let Some(max) = max {
            changed |= store.set_max(x, clamp(max))?;
        }
        if let Some(min) = min {
            changed |= store.set_min(x, clamp(min))?;
        }
    }
    Ok(changed)
}

fn clamp(v: i128) -> i64 {
    v.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

fn floor_div(a: i128, b: i128) -> i128 {
    let q = a / b;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

fn ceil_div(a: i128, b: i128) -> i128 {
    let q = a / b;
    if a % b != 0 && ((a < 0) == (b < 0)) {
        q + 1
    } else {
        q
    }
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
    fn test_division_rounding() {
        assert_eq!(floor_div(7, 2), 3);
        assert_eq!(floor_div(-7, 2), -4);
        assert_eq!(floor_div(7, -2), -4);
        assert_eq!(floor_div(-7, -2), 3);
        assert_eq!(ceil_div(7, 2), 4);
        assert_eq!(ceil_div(-7, 2), -3);
        assert_eq!(ceil_div(7, -2), -3);
        assert_eq!(ceil_div(-7, -2), 4);
        assert_eq!(ceil_div(6, 3), 2);
    }

    #[test]
    fn test_infeasible_bounds() {
        let mut s = store(&[(0, 3), (0, 3)]);
        assert_eq!(propagate(&ids(2), &[1, 1], 7, 10, &mut s), Err(Conflict));
        assert_eq!(propagate(&ids(2), &[1, 1], -5, -1, &mut s), Err(Conflict));
    }

    #[test]
    fn test_tightens_upper_bounds() {
        // x + y <= 4 with y >= 3 gives x <= 1
        let mut s = store(&[(0, 9), (3, 9)]);
        propagate(&ids(2), &[1, 1], 0, 4, &mut s).unwrap();
        assert_eq!(s.max(VarId(0)), Ok(1));
        assert_eq!(s.max(VarId(1)), Ok(4));
    }

    #[test]
    fn test_tightens_lower_bounds() {
        // seven daily hours summing to at least 20, four days already off
        let day = |d| {
            if d < 4 {
                Domain::interval(0, 0)
            } else {
                Domain::from_values(&[0, 4, 5, 6, 7, 8])
            }
        };
        let mut s = DomainStore::new((0..7).map(day).collect());
        propagate(&ids(7), &[1; 7], 20, 40, &mut s).unwrap();
        for d in 4..7 {
            assert_eq!(s.min(VarId(d)), Ok(4));
        }
    }

    #[test]
    fn test_negative_coefficients() {
        // 2x - y = 0 with x in [0, 9], y in [0, 5] gives x <= 2
        let mut s = store(&[(0, 9), (0, 5)]);
        propagate(&ids(2), &[2, -1], 0, 0, &mut s).unwrap();
        assert_eq!(s.max(VarId(0)), Ok(2));
        assert_eq!(s.max(VarId(1)), Ok(5));
        assert_eq!(s.min(VarId(1)), Ok(0));
    }

    #[test]
    fn test_exact_sum_fixes_last_var() {
        let mut s = store(&[(0, 0), (1, 1), (2, 2), (0, 3)]);
        propagate(&ids(4), &[1, 1, 1, 1], 6, 6, &mut s).unwrap();
        assert_eq!(s.value(VarId(3)), Some(3));
    }

    #[test]
    fn test_one_call_reaches_fixpoint() {
        // 3 <= x + y <= 4 with y in {0, 5}: y = 5 is cut by x >= 0, then
        // y = 0 forces x into [3, 4]
        let mut s = DomainStore::new(vec![Domain::interval(0, 5), Domain::from_values(&[0, 5])]);
        propagate(&ids(2), &[1, 1], 3, 4, &mut s).unwrap();
        assert_eq!(s.value(VarId(1)), Some(0));
        assert_eq!((s.min(VarId(0)), s.max(VarId(0))), (Ok(3), Ok(4)));
    }

    #[test]
    fn test_idempotent() {
        let mut s = DomainStore::new(vec![
            Domain::interval(0, 9),
            Domain::from_values(&[0, 4, 8]),
            Domain::interval(-3, 3),
        ]);
        let (vars, coeffs) = (ids(3), [2, 1, -1]);
        propagate(&vars, &coeffs, 5, 9, &mut s).unwrap();
        s.take_changed();
        let before: Vec<Domain> = vars.iter().map(|&v| s.domain(v).clone()).collect();

        propagate(&vars, &coeffs, 5, 9, &mut s).unwrap();
        assert!(s.take_changed().is_empty());
        let after: Vec<Domain> = vars.iter().map(|&v| s.domain(v).clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_extreme_bounds_do_not_overflow() {
        let mut s = store(&[(0, 5), (0, 5)]);
        propagate(&ids(2), &[1, 1], i64::MIN, 3, &mut s).unwrap();
        assert_eq!(s.max(VarId(0)), Ok(3));
        assert_eq!(s.min(VarId(0)), Ok(0));

        let mut s = store(&[(0, 5), (0, 5)]);
        propagate(&ids(2), &[1, 1], 3, i64::MAX, &mut s).unwrap();
        assert_eq!(s.max(VarId(0)), Ok(5));

        let mut s = store(&[(0, 5), (0, 5)]);
        assert_eq!(propagate(&ids(2), &[1, 1], i64::MAX, i64::MAX, &mut s), Err(Conflict));
    }

    #[test]
    fn test_large_coefficients() {
        let mut s = store(&[(0, 3), (0, 3)]);
        propagate(&ids(2), &[i64::MAX, i64::MAX], 0, i64::MAX, &mut s).unwrap();
        assert_eq!(s.max(VarId(0)), Ok(1));
        assert_eq!(s.max(VarId(1)), Ok(1));

        let mut s = store(&[(0, 3), (0, 3)]);
        // MIN * x + y >= MIN with y <= 3 leaves x <= 1
        propagate(&ids(2), &[i64::MIN, 1], i64::MIN, 0, &mut s).unwrap();
        assert_eq!(s.max(VarId(0)), Ok(1));
        assert_eq!(s.max(VarId(1)), Ok(3));
    }

    #[test]
    fn test_model_with_extreme_bound_solves() {
        use crate::cp::{Constraint, CpModel, CpSolver, DepthFirstSolver, SolverConfig};

        let mut model = CpModel::new("extreme");
        let x = model.int_var("x", 0, 5).unwrap();
        let y = model.int_var("y", 0, 5).unwrap();
        model
            .register(Constraint::sum_between(vec![x, y], i64::MIN, 3))
            .unwrap();
        let solution = DepthFirstSolver::new()
            .solve(&model, &SolverConfig::default())
            .unwrap();
        assert!(solution.is_solution_found());
        let (vx, vy) = (solution.value(x).unwrap(), solution.value(y).unwrap());
        assert!(vx + vy <= 3);
    }
}
