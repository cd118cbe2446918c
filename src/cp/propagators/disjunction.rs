//! Constructive disjunction of two literal conjunctions.

use crate::cp::domain::Domain;
use crate::cp::model::Literal;
use crate::cp::store::{Conflict, DomainStore, PropResult};
use crate::cp::variables::VarId;

/// Domains each branch would leave, or `None` if the branch is already infeasible.
fn support(branch: &[Literal], store: &DomainStore) -> Option<Vec<(VarId, Domain)>> {
    let mut support: Vec<(VarId, Domain)> = Vec::new();
    for literal in branch {
        let pos = match support.iter().position(|(v, _)| *v == literal.var) {
            Some(pos) => pos,
            None => {
                support.push((literal.var, store.domain(literal.var).clone()));
                support.len() - 1
            }
        };
        let domain = &mut support[pos].1;
        domain.retain(|x| literal.holds(x));
        if domain.is_empty() {
            return None;
        }
    }
    Some(support)
}

fn commit(support: &[(VarId, Domain)], store: &mut DomainStore) -> PropResult {
    for (var, allowed) in support {
        store.narrow(*var, |x| allowed.contains(x)).into_result()?;
    }
    Ok(())
}

/// Commits to the only feasible branch, or keeps for every variable shared by
/// both branches just the values one of them still allows.
pub(crate) fn propagate(
    branch_a: &[Literal],
    branch_b: &[Literal],
    store: &mut DomainStore,
) -> PropResult {
    match (support(branch_a, store), support(branch_b, store)) {
        (None, None) => Err(Conflict),
        (None, Some(b)) => commit(&b, store),
        (Some(a), None) => commit(&a, store),
        (Some(a), Some(b)) => {
            for (var, in_a) in &a {
                if let Some((_, in_b)) = b.iter().find(|(v, _)| v == var) {
                    store
                        .narrow(*var, |x| in_a.contains(x) || in_b.contains(x))
                        .into_result()?;
                }
            }
            Ok(())
        }
    }
}
