//! Machine definition under validation.

use crate::core::{CounterVector, Proposition, StateId};
use crate::machine::TransitionRule;
use std::collections::BTreeSet;

/// Everything a builder has collected before the machine is assembled.
///
/// Rules are kept in declaration order as `(source, rule)` pairs; their
/// relative order per source state becomes the rule priority.
pub struct MachineDraft<P: Proposition, O, A> {
    pub state_names: Vec<String>,
    pub initial_state: StateId,
    pub initial_counters: CounterVector,
    pub terminal_states: BTreeSet<StateId>,
    pub rules: Vec<(StateId, TransitionRule<P, O, A>)>,
    pub has_tagger: bool,
}

impl<P: Proposition, O, A> MachineDraft<P, O, A> {
    pub fn num_states(&self) -> usize {
        self.state_names.len()
    }

    pub fn contains(&self, state: StateId) -> bool {
        state.index() < self.num_states()
    }

    /// Rules declared for `state`, numbered by their per-state priority.
    pub fn rules_of(&self, state: StateId) -> impl Iterator<Item = (usize, &TransitionRule<P, O, A>)> {
        self.rules
            .iter()
            .filter(move |(from, _)| *from == state)
            .map(|(_, rule)| rule)
            .enumerate()
    }
}
