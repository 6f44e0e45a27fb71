//! Counterfactual experience generation.
//!
//! Rewards and automaton transitions depend only on `(u, c, props)` and the
//! real ground transition, so one real step can be replayed against every
//! automaton state and every sampled counter configuration. Combinations
//! for which no rule matches are left out of the batch and recorded as
//! skipped.

use crate::core::{CounterVector, Proposition, PropositionSet, StateId};
use crate::crossproduct::observation::ObservationComposer;
use crate::machine::{CountingRewardMachine, TransitionError};
use tracing::{debug, trace};

/// Automaton side of one synthetic transition.
#[derive(Clone, Debug, PartialEq)]
pub struct ExperienceInfo {
    pub state: StateId,
    pub counters: CounterVector,
    pub next_state: StateId,
    pub next_counters: CounterVector,
    pub rule_index: usize,
}

/// One synthetic `(obs, action, next_obs, reward, done, info)` tuple.
#[derive(Clone, Debug, PartialEq)]
pub struct Experience<Obs, A> {
    pub obs: Obs,
    pub action: A,
    pub next_obs: Obs,
    pub reward: f64,
    pub done: bool,
    pub info: ExperienceInfo,
}

/// A `(state, counters)` combination that produced no transition.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedCombination {
    pub state: StateId,
    pub counters: CounterVector,
    pub error: TransitionError,
}

/// Output of counterfactual generation.
#[derive(Clone, Debug, PartialEq)]
pub struct CounterfactualBatch<Obs, A> {
    pub experiences: Vec<Experience<Obs, A>>,
    pub skipped: Vec<SkippedCombination>,
}

impl<Obs, A> CounterfactualBatch<Obs, A> {
    pub fn len(&self) -> usize {
        self.experiences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experiences.is_empty()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Number of combinations tried: kept plus skipped.
    pub fn attempted(&self) -> usize {
        self.experiences.len() + self.skipped.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Experience<Obs, A>> {
        self.experiences.iter()
    }

    /// Experience synthesized for a given source combination, if any.
    pub fn find(&self, state: StateId, counters: &CounterVector) -> Option<&Experience<Obs, A>> {
        self.experiences
            .iter()
            .find(|e| e.info.state == state && &e.info.counters == counters)
    }
}

impl<Obs, A> IntoIterator for CounterfactualBatch<Obs, A> {
    type Item = Experience<Obs, A>;
    type IntoIter = std::vec::IntoIter<Experience<Obs, A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.experiences.into_iter()
    }
}

/// Replay one real ground transition against every state and sampled
/// counter configuration of `machine`.
///
/// `props` must be the labelling of exactly `(ground_obs, action,
/// next_ground_obs)`.
pub fn generate_counterfactual_experience<P, O, A, C>(
    machine: &CountingRewardMachine<P, O, A>,
    composer: &C,
    props: &PropositionSet<P>,
    ground_obs: &O,
    action: &A,
    next_ground_obs: &O,
) -> CounterfactualBatch<C::Output, A>
where
    P: Proposition,
    A: Clone,
    C: ObservationComposer<O>,
{
    let mut experiences = Vec::new();
    let mut skipped = Vec::new();

    for state in machine.states() {
        for counters in machine.sample_counter_configurations(state) {
            match machine.transition(state, &counters, props) {
                Ok(outcome) => {
                    let reward = outcome.reward_for(ground_obs, action, next_ground_obs);
                    experiences.push(Experience {
                        obs: composer.compose(ground_obs, state, &counters),
                        action: action.clone(),
                        next_obs: composer.compose(
                            next_ground_obs,
                            outcome.next_state,
                            &outcome.next_counters,
                        ),
                        reward,
                        done: machine.is_terminal(outcome.next_state),
                        info: ExperienceInfo {
                            state,
                            counters,
                            next_state: outcome.next_state,
                            next_counters: outcome.next_counters,
                            rule_index: outcome.rule_index,
                        },
                    });
                }
                Err(error) => {
                    trace!(state = %state, counters = %counters, %error, "skipped counterfactual combination");
                    skipped.push(SkippedCombination {
                        state,
                        counters,
                        error,
                    });
                }
            }
        }
    }

    debug!(
        generated = experiences.len(),
        skipped = skipped.len(),
        propositions = %props,
        "generated counterfactual experience"
    );

    CounterfactualBatch {
        experiences,
        skipped,
    }
}
