//! Core automaton types.
//!
//! This module contains the pure building blocks of a counting reward
//! machine:
//! - Propositions and labelled proposition sets
//! - Formulas, the guard-string compiler and guards
//! - Counter vectors, counter modifiers and counter-state tags
//! - State identifiers and the per-episode transition trace

mod counter;
mod formula;
mod guard;
mod history;
mod parser;
mod proposition;
mod state;

pub use counter::{CounterModifier, CounterTagger, CounterVector, UntaggedCounters};
pub use formula::Formula;
pub use guard::{CounterTag, Guard};
pub use history::{AutomatonStep, EpisodeTrace};
pub use parser::{parse_formula, parse_guard, GuardParseError};
pub use proposition::{Proposition, PropositionSet};
pub use state::StateId;
