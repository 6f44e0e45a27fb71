//! Episode trace of automaton transitions.
//!
//! Records every automaton step taken by a cross-product environment during
//! one episode. The trace is cleared on reset.

use super::counter::CounterVector;
use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single automaton transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AutomatonStep {
    /// 1-based step index within the episode
    pub step: usize,
    pub from: StateId,
    pub to: StateId,
    pub counters_before: CounterVector,
    pub counters_after: CounterVector,
    /// Position of the fired rule in the source state's rule list
    pub rule_index: usize,
    pub reward: f64,
    pub timestamp: DateTime<Utc>,
}

/// Ordered automaton transitions of one episode.
///
/// # Example
///
/// ```rust
/// use crm::core::{AutomatonStep, CounterVector, EpisodeTrace, StateId};
/// use chrono::Utc;
///
/// let mut trace = EpisodeTrace::new();
/// trace.record(AutomatonStep {
///     step: 1,
///     from: StateId::new(0),
///     to: StateId::new(1),
///     counters_before: CounterVector::zeros(1),
///     counters_after: CounterVector::from([1]),
///     rule_index: 0,
///     reward: 1.0,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(trace.state_path(), vec![StateId::new(0), StateId::new(1)]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeTrace {
    steps: Vec<AutomatonStep>,
}

impl EpisodeTrace {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn record(&mut self, step: AutomatonStep) {
        self.steps.push(step);
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn steps(&self) -> &[AutomatonStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// States visited, starting with the source of the first step.
    pub fn state_path(&self) -> Vec<StateId> {
        let mut path = Vec::with_capacity(self.steps.len() + 1);
        if let Some(first) = self.steps.first() {
            path.push(first.from);
        }
        path.extend(self.steps.iter().map(|s| s.to));
        path
    }

    /// Sum of automaton rewards over the episode so far.
    pub fn total_reward(&self) -> f64 {
        self.steps.iter().map(|s| s.reward).sum()
    }

    /// Number of steps spent in each state, indexed by state.
    pub fn visit_counts(&self, num_states: usize) -> Vec<usize> {
        let mut counts = vec![0; num_states];
        for step in &self.steps {
            if let Some(slot) = counts.get_mut(step.from.index()) {
                *slot += 1;
            }
        }
        counts
    }

    /// Wall-clock time between the first and last recorded step.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.steps.first()?, self.steps.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }
}
