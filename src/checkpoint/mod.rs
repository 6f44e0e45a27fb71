//! Checkpoint and resume functionality for cross-product episodes.
//!
//! A checkpoint captures the automaton side of a running episode so that a
//! long rollout can be paused and resumed. The ground environment owns its
//! own state and is not part of the checkpoint; resume it separately before
//! restoring.

use crate::core::{CounterVector, EpisodeTrace, StateId};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of an episode.
/// Does NOT include the rule table or reward functions (not serializable).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeCheckpoint<O> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Current automaton state
    pub state: StateId,

    /// Current counters
    pub counters: CounterVector,

    /// Steps taken in the episode
    pub steps: usize,

    /// Ground observation the next step will label against
    pub previous_ground_obs: O,

    /// Automaton transitions so far
    pub trace: EpisodeTrace,
}

impl<O> EpisodeCheckpoint<O> {
    pub fn new(
        state: StateId,
        counters: CounterVector,
        steps: usize,
        previous_ground_obs: O,
        trace: EpisodeTrace,
    ) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            state,
            counters,
            steps,
            previous_ground_obs,
            trace,
        }
    }

    /// Check the checkpoint against the shape of the machine it will be
    /// restored into.
    pub fn validate(&self, num_states: usize, counter_dim: usize) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }

        if self.state.index() >= num_states {
            return Err(CheckpointError::ValidationFailed(format!(
                "state {} out of range for a machine with {} states",
                self.state, num_states
            )));
        }

        if self.counters.dim() != counter_dim {
            return Err(CheckpointError::ValidationFailed(format!(
                "counters {} have dimension {}, machine expects {}",
                self.counters,
                self.counters.dim(),
                counter_dim
            )));
        }

        if self.trace.len() > self.steps {
            return Err(CheckpointError::ValidationFailed(format!(
                "trace has {} entries but only {} steps were taken",
                self.trace.len(),
                self.steps
            )));
        }

        Ok(())
    }
}

impl<O: Serialize + DeserializeOwned> EpisodeCheckpoint<O> {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        serde_json::from_str(json).map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }
}
