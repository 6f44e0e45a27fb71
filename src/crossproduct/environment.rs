//! Collaborators consumed by the cross-product: the ground environment and
//! the labelling function.

use crate::core::{Proposition, PropositionSet};
use std::convert::Infallible;

/// Result of a single ground environment step.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundStep<O> {
    pub observation: O,
    /// Reward reported by the ground task; the cross-product replaces it.
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
}

impl<O> GroundStep<O> {
    /// Step that only carries an observation.
    pub fn observation(observation: O) -> Self {
        Self {
            observation,
            reward: 0.0,
            terminated: false,
            truncated: false,
        }
    }
}

/// The underlying task the automaton is layered on top of.
///
/// Only the observation stream is used to drive the automaton; the ground
/// reward and termination flags are passed through in
/// [`StepInfo`](super::StepInfo) for inspection.
pub trait GroundEnvironment {
    type Observation: Clone;
    type Action;
    type Frame;
    type Error: std::error::Error + Send + Sync + 'static;

    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Observation, Self::Error>;

    fn step(&mut self, action: &Self::Action) -> Result<GroundStep<Self::Observation>, Self::Error>;

    fn render(&self) -> Result<Self::Frame, Self::Error>;
}

/// Derives the propositions that hold on a ground transition.
///
/// Implemented for any infallible `Fn(&O, &A, &O) -> PropositionSet<P>`.
pub trait LabellingFunction<O, A, P: Proposition> {
    type Error: std::error::Error + Send + Sync + 'static;

    fn label(&self, obs: &O, action: &A, next_obs: &O) -> Result<PropositionSet<P>, Self::Error>;
}

impl<O, A, P, F> LabellingFunction<O, A, P> for F
where
    P: Proposition,
    F: Fn(&O, &A, &O) -> PropositionSet<P>,
{
    type Error = Infallible;

    fn label(&self, obs: &O, action: &A, next_obs: &O) -> Result<PropositionSet<P>, Self::Error> {
        Ok(self(obs, action, next_obs))
    }
}
