//! Roll observations, die specifications and simulated dice.
//!
//! This module holds the inputs of every fairness computation: the
//! append-only roll history, the die arity and the confidence level.
//! Simulated dice are provided so that histories can be generated
//! without a physical die at hand.

mod die;
pub(crate) mod history;
mod spec;

pub use die::{Die, DieError, FairDie, LoadedDie};
pub use history::RollHistory;
pub use spec::{ConfidenceLevel, DieSpec, SpecError};
