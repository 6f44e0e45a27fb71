//! Builder for constructing transition rules.

use crate::builder::error::BuildError;
use crate::core::{CounterModifier, Formula, Guard, Proposition, StateId};
use crate::machine::TransitionRule;
use crate::reward::{RewardFn, RewardFunction};
use std::sync::Arc;

/// Builder for constructing rules with a fluent API.
pub struct RuleBuilder<P: Proposition, O, A> {
    from: Option<StateId>,
    to: Option<StateId>,
    guard: Option<Guard<P>>,
    modifier: CounterModifier,
    reward: Option<RewardFn<O, A>>,
}

impl<P: Proposition, O, A> RuleBuilder<P, O, A> {
    /// Create a new rule builder.
    pub fn new() -> Self {
        Self {
            from: None,
            to: None,
            guard: None,
            modifier: CounterModifier::Identity,
            reward: None,
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: StateId) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: StateId) -> Self {
        self.to = Some(state);
        self
    }

    /// Set the guard (required).
    pub fn guard(mut self, guard: Guard<P>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Set an untagged guard from a formula.
    pub fn when(mut self, formula: Formula<P>) -> Self {
        self.guard = Some(Guard::new(formula));
        self
    }

    /// Set the counter modifier (defaults to identity).
    pub fn modifier(mut self, modifier: CounterModifier) -> Self {
        self.modifier = modifier;
        self
    }

    /// Set the reward (required).
    pub fn reward(mut self, reward: RewardFn<O, A>) -> Self {
        self.reward = Some(reward);
        self
    }

    /// Set the reward from any reward function value.
    pub fn reward_fn<R>(self, reward: R) -> Self
    where
        R: RewardFunction<O, A> + 'static,
    {
        self.reward(Arc::new(reward))
    }

    /// Build the rule together with its source state.
    pub fn build(self) -> Result<(StateId, TransitionRule<P, O, A>), BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;
        let guard = self.guard.ok_or(BuildError::MissingGuard)?;
        let reward = self.reward.ok_or(BuildError::MissingReward)?;

        Ok((from, TransitionRule::new(guard, to, self.modifier, reward)))
    }
}

impl<P: Proposition, O, A> Default for RuleBuilder<P, O, A> {
    fn default() -> Self {
        Self::new()
    }
}
