//! Composition of ground observations with the automaton state.

use crate::core::{CounterVector, StateId};
use serde::{Deserialize, Serialize};

/// Builds the cross-product observation `combine(ground_obs, u, c)`.
pub trait ObservationComposer<G> {
    type Output;

    fn compose(&self, ground: &G, state: StateId, counters: &CounterVector) -> Self::Output;
}

/// Ground observation paired with the automaton state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductObservation<G> {
    pub ground: G,
    pub state: StateId,
    pub counters: CounterVector,
}

/// Composer that keeps the three parts side by side.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProductComposer;

impl<G: Clone> ObservationComposer<G> for ProductComposer {
    type Output = ProductObservation<G>;

    fn compose(&self, ground: &G, state: StateId, counters: &CounterVector) -> Self::Output {
        ProductObservation {
            ground: ground.clone(),
            state,
            counters: counters.clone(),
        }
    }
}

/// Composer producing a flat feature vector for function approximators.
///
/// Layout: ground features, then a one-hot encoding of the state, then the
/// counters as floats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OneHotComposer {
    num_states: usize,
}

impl OneHotComposer {
    pub fn new(num_states: usize) -> Self {
        Self { num_states }
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }
}

impl<G: AsRef<[f64]>> ObservationComposer<G> for OneHotComposer {
    type Output = Vec<f64>;

    fn compose(&self, ground: &G, state: StateId, counters: &CounterVector) -> Self::Output {
        let ground = ground.as_ref();
        let mut features = Vec::with_capacity(ground.len() + self.num_states + counters.dim());
        features.extend_from_slice(ground);
        features.extend((0..self.num_states).map(|i| if i == state.index() { 1.0 } else { 0.0 }));
        features.extend(counters.iter().map(|c| c as f64));
        features
    }
}
