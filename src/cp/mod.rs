//! Constraint Programming (CP) engine.
//!
//! A self-contained finite-domain solver: integer variables with explicit
//! domains, a small set of global constraints, propagation to a fixpoint and
//! depth-first backtracking search.
//!
//! # Key Components
//!
//! - **Domains**: [`Domain`]: bitset of the values still possible
//! - **Store**: [`DomainStore`]: live domains with snapshot/restore
//! - **Variables**: [`IntVar`], [`VarId`]: declarations and handles
//! - **Constraints**: [`Constraint`]: AllDifferent, Cardinality, LinearSumBound, Disjunction
//! - **Model**: [`CpModel`]: variable declarations plus the constraint registry
//! - **Propagation**: [`PropagationQueue`]: wakes constraints until quiescence
//! - **Solver**: [`CpSolver`] trait, [`DepthFirstSolver`] implementation
//!
//! # Design
//!
//! Search is single-threaded and deterministic: the same model and
//! configuration give the same solution and the same fail count. A solve call
//! builds its own store, queue and trail from the model and drops them on
//! return, so models can be solved repeatedly and independently.
//!
//! # References
//!
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"

mod domain;
mod error;
mod model;
mod propagators;
mod solver;
mod store;
mod variables;

pub use domain::Domain;
pub use error::{ConfigError, ModelError};
pub use model::{Constraint, CpModel, Literal, Relation};
pub use propagators::PropagationQueue;
pub use solver::{
    CpSolution, CpSolver, DepthFirstSolver, SearchStats, SolverConfig, SolverStatus, VarSelection,
};
pub use store::{Conflict, DomainStore, Narrowing, PropResult, Token};
pub use variables::{IntVar, VarId};
