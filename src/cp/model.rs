//! CP model definition.

use super::domain::Domain;
use super::error::ModelError;
use super::variables::{IntVar, VarId};

/// Comparison used by a [`Literal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Eq,
    Ne,
    Ge,
    Le,
}

/// An atomic unary constraint `var <relation> value`.
///
/// Literals are the building blocks of [`Constraint::Disjunction`] branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal {
    pub var: VarId,
    pub relation: Relation,
    pub value: i64,
}

impl Literal {
    pub fn eq(var: VarId, value: i64) -> Self {
        Self {
            var,
            relation: Relation::Eq,
            value,
        }
    }

    pub fn ne(var: VarId, value: i64) -> Self {
        Self {
            var,
            relation: Relation::Ne,
            value,
        }
    }

    pub fn ge(var: VarId, value: i64) -> Self {
        Self {
            var,
            relation: Relation::Ge,
            value,
        }
    }

    pub fn le(var: VarId, value: i64) -> Self {
        Self {
            var,
            relation: Relation::Le,
            value,
        }
    }

    /// Whether `x` satisfies this literal.
    #[inline]
    pub fn holds(&self, x: i64) -> bool {
        match self.relation {
            Relation::Eq => x == self.value,
            Relation::Ne => x != self.value,
            Relation::Ge => x >= self.value,
            Relation::Le => x <= self.value,
        }
    }
}

/// A constraint in the CP model.
///
/// Constraints are immutable once registered and refer to variables only by
/// [`VarId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// All variables take pairwise distinct values.
    AllDifferent { vars: Vec<VarId> },

    /// Between `min` and `max` of the variables take `value`.
    Cardinality {
        vars: Vec<VarId>,
        value: i64,
        min: usize,
        max: usize,
    },

    /// `lower <= sum(coeffs[i] * vars[i]) <= upper`.
    LinearSumBound {
        vars: Vec<VarId>,
        coeffs: Vec<i64>,
        lower: i64,
        upper: i64,
    },

    /// Either every literal of `branch_a` holds, or every literal of `branch_b` holds.
    Disjunction {
        branch_a: Vec<Literal>,
        branch_b: Vec<Literal>,
    },
}

impl Constraint {
    pub fn all_different(vars: Vec<VarId>) -> Self {
        Constraint::AllDifferent { vars }
    }

    /// At least `min` of `vars` equal `value`.
    ///
    /// `min` may exceed `vars.len()`; the constraint is then unsatisfiable.
    pub fn at_least(vars: Vec<VarId>, value: i64, min: usize) -> Self {
        Constraint::Cardinality {
            vars,
            value,
            min,
            max: usize::MAX,
        }
    }

    /// At most `max` of `vars` equal `value`.
    pub fn at_most(vars: Vec<VarId>, value: i64, max: usize) -> Self {
        Constraint::Cardinality {
            vars,
            value,
            min: 0,
            max,
        }
    }

    pub fn linear(vars: Vec<VarId>, coeffs: Vec<i64>, lower: i64, upper: i64) -> Self {
        Constraint::LinearSumBound {
            vars,
            coeffs,
            lower,
            upper,
        }
    }

    /// `lower <= sum(vars) <= upper` with unit coefficients.
    pub fn sum_between(vars: Vec<VarId>, lower: i64, upper: i64) -> Self {
        let coeffs = vec![1; vars.len()];
        Self::linear(vars, coeffs, lower, upper)
    }

    pub fn disjunction(branch_a: Vec<Literal>, branch_b: Vec<Literal>) -> Self {
        Constraint::Disjunction { branch_a, branch_b }
    }

    /// Short name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Constraint::AllDifferent { .. } => "all_different",
            Constraint::Cardinality { .. } => "cardinality",
            Constraint::LinearSumBound { .. } => "linear_sum",
            Constraint::Disjunction { .. } => "disjunction",
        }
    }

    /// Distinct variables this constraint reads or prunes, ascending.
    pub fn scope(&self) -> Vec<VarId> {
        let mut scope: Vec<VarId> = match self {
            Constraint::AllDifferent { vars }
            | Constraint::Cardinality { vars, .. }
            | Constraint::LinearSumBound { vars, .. } => vars.clone(),
            Constraint::Disjunction { branch_a, branch_b } => {
                branch_a.iter().chain(branch_b).map(|l| l.var).collect()
            }
        };
        scope.sort_unstable();
        scope.dedup();
        scope
    }

    /// Checks a complete assignment, indexed by [`VarId`].
    pub fn is_satisfied_by(&self, values: &[i64]) -> bool {
        let val = |v: &VarId| values[v.0];
        match self {
            Constraint::AllDifferent { vars } => {
                let mut seen: Vec<i64> = vars.iter().map(val).collect();
                seen.sort_unstable();
                seen.windows(2).all(|w| w[0] != w[1])
            }
            Constraint::Cardinality {
                vars,
                value,
                min,
                max,
            } => {
                let count = vars.iter().filter(|v| val(*v) == *value).count();
                (*min..=*max).contains(&count)
            }
            Constraint::LinearSumBound {
                vars,
                coeffs,
                lower,
                upper,
            } => {
                let sum: i64 = vars.iter().zip(coeffs).map(|(v, c)| c * val(v)).sum();
                (*lower..=*upper).contains(&sum)
            }
            Constraint::Disjunction { branch_a, branch_b } => {
                branch_a.iter().all(|l| l.holds(val(&l.var)))
                    || branch_b.iter().all(|l| l.holds(val(&l.var)))
            }
        }
    }
}

/// A constraint programming model: variable declarations plus the
/// constraint registry.
///
/// Every addition is validated immediately, so a model that exists is
/// well-formed.
///
/// # Examples
///
/// ```
/// use u_roster::cp::{Constraint, CpModel};
///
/// let mut model = CpModel::new("coloring");
/// let a = model.int_var("a", 0, 2).unwrap();
/// let b = model.int_var("b", 0, 2).unwrap();
/// model.register(Constraint::all_different(vec![a, b])).unwrap();
/// assert_eq!(model.var_count(), 2);
/// assert_eq!(model.constraint_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct CpModel {
    /// Model name.
    pub name: String,
    vars: Vec<IntVar>,
    constraints: Vec<Constraint>,
}

impl CpModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vars: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Declares a variable.
    pub fn add_var(&mut self, var: IntVar) -> Result<VarId, ModelError> {
        if var.domain.is_empty() {
            return Err(ModelError::EmptyDomain { name: var.name });
        }
        let id = VarId(self.vars.len());
        self.vars.push(var);
        Ok(id)
    }

    /// Convenience: declare a variable over `[min, max]`.
    pub fn int_var(
        &mut self,
        name: impl Into<String>,
        min: i64,
        max: i64,
    ) -> Result<VarId, ModelError> {
        self.add_var(IntVar::new(name, min, max)?)
    }

    /// Registers a constraint after checking it against the declared variables.
    pub fn register(&mut self, constraint: Constraint) -> Result<(), ModelError> {
        self.check(&constraint)?;
        self.constraints.push(constraint);
        Ok(())
    }

    fn check(&self, constraint: &Constraint) -> Result<(), ModelError> {
        let kind = constraint.kind();
        let scope = constraint.scope();
        if scope.is_empty() {
            return Err(ModelError::EmptyScope(kind));
        }
        if let Some(&var) = scope.iter().find(|v| v.0 >= self.vars.len()) {
            return Err(ModelError::UnknownVariable {
                constraint: kind,
                var,
                declared: self.vars.len(),
            });
        }
        match constraint {
            Constraint::Cardinality { min, max, .. } if min > max => {
                Err(ModelError::InvertedBounds {
                    constraint: kind,
                    lower: *min as i64,
                    upper: *max as i64,
                })
            }
            Constraint::LinearSumBound { vars, coeffs, .. } if vars.len() != coeffs.len() => {
                Err(ModelError::LengthMismatch {
                    vars: vars.len(),
                    coeffs: coeffs.len(),
                })
            }
            Constraint::LinearSumBound { lower, upper, .. } if lower > upper => {
                Err(ModelError::InvertedBounds {
                    constraint: kind,
                    lower: *lower,
                    upper: *upper,
                })
            }
            Constraint::Disjunction { branch_a, branch_b }
                if branch_a.is_empty() || branch_b.is_empty() =>
            {
                Err(ModelError::EmptyScope(kind))
            }
            _ => Ok(()),
        }
    }

    pub fn var(&self, id: VarId) -> &IntVar {
        &self.vars[id.0]
    }

    /// Looks up a variable by name (first match).
    pub fn var_by_name(&self, name: &str) -> Option<VarId> {
        self.vars.iter().position(|v| v.name == name).map(VarId)
    }

    pub fn vars(&self) -> &[IntVar] {
        &self.vars
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// For each variable, the indices of the constraints watching it.
    pub fn dependency_index(&self) -> Vec<Vec<usize>> {
        let mut index = vec![Vec::new(); self.vars.len()];
        for (c, constraint) in self.constraints.iter().enumerate() {
            for var in constraint.scope() {
                index[var.0].push(c);
            }
        }
        index
    }

    /// Initial domains, indexed by [`VarId`].
    pub fn initial_domains(&self) -> Vec<Domain> {
        self.vars.iter().map(|v| v.domain.clone()).collect()
    }

    /// Returns the number of variables.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}
