//! The cross-product environment.

use crate::checkpoint::EpisodeCheckpoint;
use crate::core::{AutomatonStep, CounterVector, EpisodeTrace, Proposition, PropositionSet, StateId};
use crate::crossproduct::counterfactual::{self, CounterfactualBatch};
use crate::crossproduct::environment::{GroundEnvironment, LabellingFunction};
use crate::crossproduct::error::CrossProductError;
use crate::crossproduct::observation::ObservationComposer;
use crate::machine::CountingRewardMachine;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Configuration for the cross-product environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossProductConfig {
    /// Step count at which an episode reports truncation.
    pub max_steps: usize,
}

impl Default for CrossProductConfig {
    fn default() -> Self {
        Self { max_steps: 1000 }
    }
}

impl CrossProductConfig {
    pub fn with_max_steps(max_steps: usize) -> Self {
        Self { max_steps }
    }
}

/// Additional information returned from a step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepInfo<P: Proposition> {
    /// 1-based step index within the episode.
    pub step: usize,
    pub previous_state: StateId,
    pub state: StateId,
    pub counters: CounterVector,
    /// Position of the fired rule in the previous state's rule list.
    pub rule_index: usize,
    pub propositions: PropositionSet<P>,
    pub ground_reward: f64,
    pub ground_terminated: bool,
    pub ground_truncated: bool,
}

/// Result of a single cross-product step.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductStep<Obs, P: Proposition> {
    pub observation: Obs,
    pub reward: f64,
    /// The automaton reached a terminal state.
    pub terminated: bool,
    /// The step budget is exhausted.
    pub truncated: bool,
    pub info: StepInfo<P>,
}

struct Episode<O> {
    state: StateId,
    counters: CounterVector,
    steps: usize,
    previous_ground_obs: O,
}

/// A ground environment augmented with a counting reward machine.
///
/// Observations are `combine(ground_obs, u, c)` as produced by the
/// composer; rewards and termination come from the machine. The ground
/// environment's own reward and flags are only reported in [`StepInfo`].
///
/// The episode state is owned by this value and mutated only by
/// [`reset`](Self::reset), [`step`](Self::step) and
/// [`restore`](Self::restore).
pub struct CrossProduct<E, L, C, P>
where
    E: GroundEnvironment,
    P: Proposition,
{
    ground: E,
    machine: Arc<CountingRewardMachine<P, E::Observation, E::Action>>,
    labelling: L,
    composer: C,
    config: CrossProductConfig,
    episode: Option<Episode<E::Observation>>,
    trace: EpisodeTrace,
}

impl<E, L, C, P> CrossProduct<E, L, C, P>
where
    E: GroundEnvironment,
    L: LabellingFunction<E::Observation, E::Action, P>,
    C: ObservationComposer<E::Observation>,
    P: Proposition,
{
    pub fn new(
        ground: E,
        machine: Arc<CountingRewardMachine<P, E::Observation, E::Action>>,
        labelling: L,
        composer: C,
        config: CrossProductConfig,
    ) -> Self {
        Self {
            ground,
            machine,
            labelling,
            composer,
            config,
            episode: None,
            trace: EpisodeTrace::new(),
        }
    }

    pub fn machine(&self) -> &CountingRewardMachine<P, E::Observation, E::Action> {
        &self.machine
    }

    pub fn ground(&self) -> &E {
        &self.ground
    }

    pub fn ground_mut(&mut self) -> &mut E {
        &mut self.ground
    }

    pub fn composer(&self) -> &C {
        &self.composer
    }

    pub fn config(&self) -> &CrossProductConfig {
        &self.config
    }

    /// Automaton transitions of the current episode.
    pub fn trace(&self) -> &EpisodeTrace {
        &self.trace
    }

    /// Current automaton state, once an episode has started.
    pub fn state(&self) -> Option<StateId> {
        self.episode.as_ref().map(|e| e.state)
    }

    pub fn counters(&self) -> Option<&CounterVector> {
        self.episode.as_ref().map(|e| &e.counters)
    }

    pub fn steps(&self) -> usize {
        self.episode.as_ref().map_or(0, |e| e.steps)
    }

    /// Start a new episode.
    pub fn reset(&mut self, seed: Option<u64>) -> Result<C::Output, CrossProductError> {
        let ground_obs = self.ground.reset(seed).map_err(CrossProductError::ground)?;
        let state = self.machine.initial_state();
        let counters = self.machine.initial_counters().clone();

        debug!(?seed, state = %state, counters = %counters, "reset cross-product episode");

        let observation = self.composer.compose(&ground_obs, state, &counters);
        self.trace.clear();
        self.episode = Some(Episode {
            state,
            counters,
            steps: 0,
            previous_ground_obs: ground_obs,
        });
        Ok(observation)
    }

    /// Advance the ground environment and the automaton by one step.
    ///
    /// Propositions are labelled on `(previous ground obs, action, new ground
    /// obs)`, where the previous observation is the one returned by the last
    /// `step` or by `reset`.
    ///
    /// A failed ground step leaves the episode untouched. Once the ground
    /// environment has advanced, a labelling failure or a transition without
    /// a matching rule ends the episode: the error is returned and the next
    /// `step` fails with [`CrossProductError::NotReset`].
    pub fn step(&mut self, action: &E::Action) -> Result<ProductStep<C::Output, P>, CrossProductError> {
        let episode = self.episode.as_mut().ok_or(CrossProductError::NotReset)?;
        let step = episode.steps + 1;

        let ground_step = self.ground.step(action).map_err(CrossProductError::ground)?;
        let next_ground_obs = ground_step.observation;

        let advanced = self
            .labelling
            .label(&episode.previous_ground_obs, action, &next_ground_obs)
            .map_err(CrossProductError::labelling)
            .and_then(|props| {
                let outcome = self.machine.transition(episode.state, &episode.counters, &props)?;
                Ok((props, outcome))
            });

        let (props, outcome) = match advanced {
            Ok(advanced) => advanced,
            Err(err) => {
                warn!(step, error = %err, "automaton step failed, episode needs reset");
                self.episode = None;
                return Err(err);
            }
        };

        let reward = outcome.reward_for(&episode.previous_ground_obs, action, &next_ground_obs);
        let terminated = self.machine.is_terminal(outcome.next_state);
        let truncated = step >= self.config.max_steps;

        self.trace.record(AutomatonStep {
            step,
            from: episode.state,
            to: outcome.next_state,
            counters_before: episode.counters.clone(),
            counters_after: outcome.next_counters.clone(),
            rule_index: outcome.rule_index,
            reward,
            timestamp: Utc::now(),
        });

        trace!(
            step,
            from = %episode.state,
            to = %outcome.next_state,
            propositions = %props,
            reward,
            terminated,
            truncated,
            "cross-product step"
        );

        let info = StepInfo {
            step,
            previous_state: episode.state,
            state: outcome.next_state,
            counters: outcome.next_counters.clone(),
            rule_index: outcome.rule_index,
            propositions: props,
            ground_reward: ground_step.reward,
            ground_terminated: ground_step.terminated,
            ground_truncated: ground_step.truncated,
        };

        episode.steps = step;
        episode.state = outcome.next_state;
        episode.counters = outcome.next_counters;
        episode.previous_ground_obs = next_ground_obs;

        Ok(ProductStep {
            observation: self.composer.compose(
                &episode.previous_ground_obs,
                episode.state,
                &episode.counters,
            ),
            reward,
            terminated,
            truncated,
            info,
        })
    }

    /// Render the ground environment.
    pub fn render(&self) -> Result<E::Frame, CrossProductError> {
        self.ground.render().map_err(CrossProductError::ground)
    }

    /// Replay a real ground transition against every automaton state and
    /// sampled counter configuration.
    ///
    /// The transition is labelled here, so the batch is coherent for any
    /// triple, not only the most recent step.
    pub fn generate_counterfactual_experience(
        &self,
        ground_obs: &E::Observation,
        action: &E::Action,
        next_ground_obs: &E::Observation,
    ) -> Result<CounterfactualBatch<C::Output, E::Action>, CrossProductError>
    where
        E::Action: Clone,
    {
        let props = self
            .labelling
            .label(ground_obs, action, next_ground_obs)
            .map_err(CrossProductError::labelling)?;

        Ok(counterfactual::generate_counterfactual_experience(
            &self.machine,
            &self.composer,
            &props,
            ground_obs,
            action,
            next_ground_obs,
        ))
    }

    /// Snapshot the automaton side of the running episode.
    pub fn checkpoint(&self) -> Result<EpisodeCheckpoint<E::Observation>, CrossProductError> {
        let episode = self.episode.as_ref().ok_or(CrossProductError::NotReset)?;
        Ok(EpisodeCheckpoint::new(
            episode.state,
            episode.counters.clone(),
            episode.steps,
            episode.previous_ground_obs.clone(),
            self.trace.clone(),
        ))
    }

    /// Resume an episode from a checkpoint.
    ///
    /// The ground environment is left untouched; it must already be in the
    /// state that produced `previous_ground_obs`.
    pub fn restore(
        &mut self,
        checkpoint: EpisodeCheckpoint<E::Observation>,
    ) -> Result<(), CrossProductError> {
        checkpoint.validate(self.machine.num_states(), self.machine.counter_dim())?;

        debug!(
            id = %checkpoint.id,
            state = %checkpoint.state,
            steps = checkpoint.steps,
            "restored cross-product episode"
        );

        self.trace = checkpoint.trace;
        self.episode = Some(Episode {
            state: checkpoint.state,
            counters: checkpoint.counters,
            steps: checkpoint.steps,
            previous_ground_obs: checkpoint.previous_ground_obs,
        });
        Ok(())
    }
}

impl<E, L, C, P> std::fmt::Debug for CrossProduct<E, L, C, P>
where
    E: GroundEnvironment,
    P: Proposition,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossProduct")
            .field("machine", &self.machine)
            .field("config", &self.config)
            .field("state", &self.episode.as_ref().map(|e| e.state))
            .field("steps", &self.episode.as_ref().map_or(0, |e| e.steps))
            .finish_non_exhaustive()
    }
}
