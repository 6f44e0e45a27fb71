//! Transition rules.

use crate::core::{CounterModifier, Guard, Proposition, StateId};
use crate::reward::RewardFn;
use std::fmt;
use std::sync::Arc;

/// One entry in a state's ordered rule list.
///
/// Rules of a state are tried in declaration order and the first rule whose
/// guard matches fires.
pub struct TransitionRule<P: Proposition, O, A> {
    pub guard: Guard<P>,
    pub to: StateId,
    pub modifier: CounterModifier,
    pub reward: RewardFn<O, A>,
}

impl<P: Proposition, O, A> TransitionRule<P, O, A> {
    pub fn new(guard: Guard<P>, to: StateId, modifier: CounterModifier, reward: RewardFn<O, A>) -> Self {
        Self {
            guard,
            to,
            modifier,
            reward,
        }
    }
}

impl<P: Proposition, O, A> Clone for TransitionRule<P, O, A> {
    fn clone(&self) -> Self {
        Self {
            guard: self.guard.clone(),
            to: self.to,
            modifier: self.modifier.clone(),
            reward: Arc::clone(&self.reward),
        }
    }
}

impl<P: Proposition, O, A> fmt::Debug for TransitionRule<P, O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionRule")
            .field("guard", &self.guard.to_string())
            .field("to", &self.to)
            .field("modifier", &self.modifier)
            .finish_non_exhaustive()
    }
}
