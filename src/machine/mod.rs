//! Automaton transition engine and counter configuration samplers.

mod engine;
mod rule;
mod sampler;

pub use engine::{CountingRewardMachine, TransitionError, TransitionOutcome};
pub use rule::TransitionRule;
pub use sampler::{CounterGrid, CounterSampler, FixedConfigurations, PerStateConfigurations};
