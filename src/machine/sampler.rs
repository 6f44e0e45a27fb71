//! Counter configuration samplers.
//!
//! Counters are unbounded in principle, so counterfactual generation only
//! replays a finite, designer-chosen set of counter vectors per state. A
//! sampler must return the same set on every call for the same state.

use crate::core::{CounterVector, StateId};
use std::collections::BTreeMap;

/// Source of counter vectors to replay at a given automaton state.
///
/// Implemented for any `Fn(StateId) -> Vec<CounterVector>`.
pub trait CounterSampler: Send + Sync {
    fn sample(&self, state: StateId) -> Vec<CounterVector>;
}

impl<F> CounterSampler for F
where
    F: Fn(StateId) -> Vec<CounterVector> + Send + Sync,
{
    fn sample(&self, state: StateId) -> Vec<CounterVector> {
        self(state)
    }
}

/// Same configurations for every state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FixedConfigurations {
    configs: Vec<CounterVector>,
}

impl FixedConfigurations {
    pub fn new(configs: Vec<CounterVector>) -> Self {
        Self { configs }
    }
}

impl CounterSampler for FixedConfigurations {
    fn sample(&self, _state: StateId) -> Vec<CounterVector> {
        self.configs.clone()
    }
}

/// Explicit configurations per state; unlisted states get none.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PerStateConfigurations {
    configs: BTreeMap<StateId, Vec<CounterVector>>,
}

impl PerStateConfigurations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, state: StateId, configs: Vec<CounterVector>) -> Self {
        self.configs.insert(state, configs);
        self
    }
}

impl CounterSampler for PerStateConfigurations {
    fn sample(&self, state: StateId) -> Vec<CounterVector> {
        self.configs.get(&state).cloned().unwrap_or_default()
    }
}

/// Every vector with `0 <= c[i] <= upper[i]`, in lexicographic order.
///
/// # Example
///
/// ```rust
/// use crm::core::{CounterVector, StateId};
/// use crm::machine::{CounterGrid, CounterSampler};
///
/// let grid = CounterGrid::new(vec![1, 2]);
/// let configs = grid.sample(StateId::new(0));
///
/// assert_eq!(configs.len(), 6);
/// assert_eq!(configs[0], CounterVector::from([0, 0]));
/// assert_eq!(configs[5], CounterVector::from([1, 2]));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CounterGrid {
    upper: Vec<i64>,
}

impl CounterGrid {
    pub fn new(upper: Vec<i64>) -> Self {
        Self { upper }
    }

    /// Number of vectors the grid enumerates, or `None` if it does not fit
    /// in a `usize`.
    pub fn size(&self) -> Option<usize> {
        self.upper.iter().try_fold(1usize, |acc, &u| {
            let axis = if u < 0 {
                0
            } else {
                usize::try_from(u).ok()?.checked_add(1)?
            };
            acc.checked_mul(axis)
        })
    }
}

// Upper bound on the up-front allocation in `sample`.
const PREALLOCATE_LIMIT: usize = 1 << 16;

impl CounterSampler for CounterGrid {
    fn sample(&self, _state: StateId) -> Vec<CounterVector> {
        if self.upper.iter().any(|&u| u < 0) {
            return Vec::new();
        }

        let capacity = self.size().map_or(0, |n| n.min(PREALLOCATE_LIMIT));
        let mut out = Vec::with_capacity(capacity);
        let mut current = vec![0i64; self.upper.len()];
        loop {
            out.push(CounterVector::new(current.clone()));

            // Odometer increment, last component fastest.
            let mut i = current.len();
            loop {
                if i == 0 {
                    return out;
                }
                i -= 1;
                if current[i] < self.upper[i] {
                    current[i] += 1;
                    break;
                }
                current[i] = 0;
            }
        }
    }
}
