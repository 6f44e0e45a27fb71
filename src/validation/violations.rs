//! Violations found while validating a machine definition.

use crate::core::{CounterTag, StateId};
use thiserror::Error;

/// A single problem in a machine definition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ViolationError {
    #[error("Machine declares no states")]
    NoStates,

    #[error("Duplicate state name '{0}'")]
    DuplicateStateName(String),

    #[error("{context} refers to state {state}, but the machine has {num_states} states")]
    UnknownState {
        context: String,
        state: StateId,
        num_states: usize,
    },

    #[error("{context} has counter dimension {found}, expected {expected}")]
    CounterDimension {
        context: String,
        expected: usize,
        found: usize,
    },

    #[error("Rule {rule} of state {state} is tagged '{tag}' but no counter tagger is configured")]
    TagWithoutTagger {
        state: StateId,
        rule: usize,
        tag: CounterTag,
    },

    #[error("Non-terminal state {0} has no transition rules")]
    NoRules(StateId),

    #[error("Custom check failed: {message}")]
    CustomCheckFailed { message: String },
}
