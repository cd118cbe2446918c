//! Pairwise distinctness.

use crate::cp::store::{Conflict, DomainStore, PropResult};
use crate::cp::variables::VarId;

/// Removes every bound value from the other variables of the scope, until no
/// more values are bound. Also fails when the scope's domains jointly hold
/// fewer values than there are variables.
pub(crate) fn propagate(vars: &[VarId], store: &mut DomainStore) -> PropResult {
    loop {
        let mut changed = false;
        for (i, &x) in vars.iter().enumerate() {
            let Some(value) = store.value(x) else {
                continue;
            };
            for (j, &y) in vars.iter().enumerate() {
                if i == j {
                    continue;
                }
                if x == y {
                    return Err(Conflict);
                }
                changed |= store.remove(y, value)?;
            }
        }
        if !changed {
            break;
        }
    }

    let mut union: Vec<i64> = vars
        .iter()
        .flat_map(|&x| store.domain(x).values().collect::<Vec<_>>())
        .collect();
    union.sort_unstable();
    union.dedup();
    if union.len() < vars.len() {
        return Err(Conflict);
    }
    Ok(())
}
