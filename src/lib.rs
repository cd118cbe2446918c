//! Finite-domain constraint programming with an employee rostering model.
//!
//! - **CP engine** ([`cp`]): integer variables with explicit domains,
//!   AllDifferent / Cardinality / LinearSumBound / Disjunction constraints,
//!   propagation to a fixpoint and deterministic depth-first search with
//!   time, fail-count and cancellation budgets.
//! - **Rostering** ([`roster`]): builds the shift-assignment model of an
//!   instance (demand per shift, opening-day rotation, daily and weekly
//!   hours, optional night-shift limits), solves it and reads back begin
//!   and end hours per employee and day.
//!
//! # Architecture
//!
//! The CP engine knows nothing about rostering; [`roster`] is one consumer
//! of it. Each solve call owns its own domain store, propagation queue and
//! trail, so nothing is shared between calls.
//!
//! The crate emits `tracing` events but installs no subscriber.

pub mod cp;
pub mod roster;
