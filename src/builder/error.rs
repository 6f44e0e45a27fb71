//! Build errors for machine and rule builders.

use crate::core::GuardParseError;
use crate::validation::ViolationError;
use thiserror::Error;

fn join(violations: &[ViolationError]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur when building machines and rules.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Rule source state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Rule target state not specified. Call .to(state)")]
    MissingToState,

    #[error("Rule guard not specified. Call .guard(guard)")]
    MissingGuard,

    #[error("Rule reward not specified. Call .reward(reward)")]
    MissingReward,

    #[error("Machine definition has {} violation(s): {}", .violations.len(), join(.violations))]
    InvalidMachine { violations: Vec<ViolationError> },

    #[error("Invalid guard '{guard}': {source}")]
    InvalidGuard {
        guard: String,
        #[source]
        source: GuardParseError,
    },

    #[error("Unknown state name '{0}'")]
    UnknownStateName(String),

    #[error("Invalid reward parameter {name} = {value}")]
    InvalidRewardParameter { name: &'static str, value: f64 },

    #[error("Invalid machine configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}
