//! Counting reward machine and its transition function.

use crate::core::{CounterTag, CounterTagger, CounterVector, Proposition, PropositionSet, StateId};
use crate::machine::rule::TransitionRule;
use crate::machine::sampler::CounterSampler;
use crate::reward::RewardFn;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::trace;

/// Errors raised by the transition function.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransitionError {
    #[error("No rule of state {state} matches propositions {propositions} with counters {counters} (tag '{tag}')")]
    NoMatchingRule {
        state: StateId,
        counters: CounterVector,
        tag: CounterTag,
        propositions: String,
    },

    #[error("State {state} is not part of the machine ({num_states} states)")]
    UnknownState { state: StateId, num_states: usize },

    #[error("Counter vector has dimension {found}, machine expects {expected}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// Result of a successful transition.
pub struct TransitionOutcome<O, A> {
    pub next_state: StateId,
    pub next_counters: CounterVector,
    pub reward: RewardFn<O, A>,
    /// Position of the fired rule in the source state's rule list
    pub rule_index: usize,
}

impl<O, A> TransitionOutcome<O, A> {
    /// Evaluate the bound reward on a ground transition.
    pub fn reward_for(&self, obs: &O, action: &A, next_obs: &O) -> f64 {
        self.reward.evaluate(obs, action, next_obs)
    }
}

impl<O, A> Clone for TransitionOutcome<O, A> {
    fn clone(&self) -> Self {
        Self {
            next_state: self.next_state,
            next_counters: self.next_counters.clone(),
            reward: Arc::clone(&self.reward),
            rule_index: self.rule_index,
        }
    }
}

impl<O, A> std::fmt::Debug for TransitionOutcome<O, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionOutcome")
            .field("next_state", &self.next_state)
            .field("next_counters", &self.next_counters)
            .field("rule_index", &self.rule_index)
            .finish_non_exhaustive()
    }
}

/// Counting reward machine.
///
/// Holds the static rule table of the automaton. Machines are built with
/// [`MachineBuilder`](crate::builder::MachineBuilder) or from a
/// [`MachineSpec`](crate::builder::MachineSpec); both validate the table
/// before a machine exists, so every state index stored here is in range
/// and every dimension-specific modifier matches the counter dimension.
pub struct CountingRewardMachine<P: Proposition, O, A> {
    pub(crate) state_names: Vec<String>,
    pub(crate) initial_state: StateId,
    pub(crate) initial_counters: CounterVector,
    pub(crate) terminal_states: BTreeSet<StateId>,
    pub(crate) rules: Vec<Vec<TransitionRule<P, O, A>>>,
    pub(crate) tagger: Arc<dyn CounterTagger>,
    pub(crate) sampler: Arc<dyn CounterSampler>,
}

impl<P: Proposition, O, A> CountingRewardMachine<P, O, A> {
    pub fn num_states(&self) -> usize {
        self.state_names.len()
    }

    /// All states `U`, in declaration order.
    pub fn states(&self) -> impl Iterator<Item = StateId> {
        (0..self.state_names.len()).map(StateId::new)
    }

    pub fn state_name(&self, state: StateId) -> Option<&str> {
        self.state_names.get(state.index()).map(String::as_str)
    }

    /// Look up a state by its declared name.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.state_names
            .iter()
            .position(|n| n == name)
            .map(StateId::new)
    }

    pub fn initial_state(&self) -> StateId {
        self.initial_state
    }

    pub fn initial_counters(&self) -> &CounterVector {
        &self.initial_counters
    }

    pub fn counter_dim(&self) -> usize {
        self.initial_counters.dim()
    }

    /// Terminal states `F`.
    pub fn terminal_states(&self) -> &BTreeSet<StateId> {
        &self.terminal_states
    }

    pub fn is_terminal(&self, state: StateId) -> bool {
        self.terminal_states.contains(&state)
    }

    /// Ordered rules of a state; empty for unknown states.
    pub fn rules(&self, state: StateId) -> &[TransitionRule<P, O, A>] {
        self.rules
            .get(state.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Counter-state tag of a counter vector.
    pub fn counter_tag(&self, counters: &CounterVector) -> CounterTag {
        self.tagger.tag(counters)
    }

    /// Counter vectors to replay at `state` during counterfactual generation.
    pub fn sample_counter_configurations(&self, state: StateId) -> Vec<CounterVector> {
        self.sampler.sample(state)
    }

    /// Fire the first rule of `state` whose guard matches.
    ///
    /// Fails with [`TransitionError::NoMatchingRule`] when no guard matches;
    /// the machine is expected to be total over reachable inputs, so a
    /// non-match points at an incomplete rule table.
    pub fn transition(
        &self,
        state: StateId,
        counters: &CounterVector,
        props: &PropositionSet<P>,
    ) -> Result<TransitionOutcome<O, A>, TransitionError> {
        let rules = self
            .rules
            .get(state.index())
            .ok_or(TransitionError::UnknownState {
                state,
                num_states: self.num_states(),
            })?;

        if counters.dim() != self.counter_dim() {
            return Err(TransitionError::DimensionMismatch {
                expected: self.counter_dim(),
                found: counters.dim(),
            });
        }

        let tag = self.tagger.tag(counters);
        let (rule_index, rule) = rules
            .iter()
            .enumerate()
            .find(|(_, r)| r.guard.matches(props, &tag))
            .ok_or_else(|| TransitionError::NoMatchingRule {
                state,
                counters: counters.clone(),
                tag: tag.clone(),
                propositions: props.to_string(),
            })?;

        let next_counters = rule.modifier.apply(counters);
        trace!(
            from = %state,
            to = %rule.to,
            rule = rule_index,
            counters = %next_counters,
            "automaton transition"
        );

        Ok(TransitionOutcome {
            next_state: rule.to,
            next_counters,
            reward: Arc::clone(&rule.reward),
            rule_index,
        })
    }
}

impl<P: Proposition, O, A> std::fmt::Debug for CountingRewardMachine<P, O, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountingRewardMachine")
            .field("states", &self.state_names)
            .field("initial_state", &self.initial_state)
            .field("initial_counters", &self.initial_counters)
            .field("terminal_states", &self.terminal_states)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}
