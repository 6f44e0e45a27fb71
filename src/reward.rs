//! Reward functions bound to transition rules.
//!
//! A reward function is declared together with its rule but evaluated only
//! when the rule fires, on the real ground transition
//! `(obs, action, next_obs)`. This lets shaping depend on continuous state
//! while the automaton itself stays discrete.

use crate::builder::BuildError;
use std::sync::Arc;

/// Multiplier applied to constant rewards built with rescaling enabled.
pub const RESCALE_FACTOR: f64 = 0.1;

/// Deferred reward over a ground transition.
///
/// Implemented for any `Fn(&O, &A, &O) -> f64`.
pub trait RewardFunction<O, A>: Send + Sync {
    fn evaluate(&self, obs: &O, action: &A, next_obs: &O) -> f64;
}

impl<O, A, F> RewardFunction<O, A> for F
where
    F: Fn(&O, &A, &O) -> f64 + Send + Sync,
{
    fn evaluate(&self, obs: &O, action: &A, next_obs: &O) -> f64 {
        self(obs, action, next_obs)
    }
}

/// Shared handle to a reward function.
pub type RewardFn<O, A> = Arc<dyn RewardFunction<O, A>>;

/// Ground observations that expose a position for waypoint shaping.
///
/// A position and a waypoint of different lengths are compared as if the
/// shorter one were padded with zeros.
pub trait Positioned {
    fn position(&self) -> &[f64];
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    (0..a.len().max(b.len()))
        .map(|i| {
            let d = a.get(i).copied().unwrap_or(0.0) - b.get(i).copied().unwrap_or(0.0);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

fn check_max_distance(max_distance: f64) -> Result<(), BuildError> {
    if max_distance.is_finite() && max_distance > 0.0 {
        Ok(())
    } else {
        Err(BuildError::InvalidRewardParameter {
            name: "max_distance",
            value: max_distance,
        })
    }
}

/// Fixed reward, optionally scaled by [`RESCALE_FACTOR`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantReward {
    value: f64,
    rescale: bool,
}

impl ConstantReward {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            rescale: false,
        }
    }

    pub fn rescaled(value: f64) -> Self {
        Self {
            value,
            rescale: true,
        }
    }

    pub fn value(&self) -> f64 {
        if self.rescale {
            self.value * RESCALE_FACTOR
        } else {
            self.value
        }
    }
}

impl<O, A> RewardFunction<O, A> for ConstantReward {
    fn evaluate(&self, _obs: &O, _action: &A, _next_obs: &O) -> f64 {
        self.value()
    }
}

/// Dense shaping towards a waypoint: `-min(d / max_distance, 1)` where `d`
/// is the distance from the next observation's position to the waypoint.
#[derive(Clone, Debug, PartialEq)]
pub struct WaypointReward {
    waypoint: Vec<f64>,
    max_distance: f64,
}

impl WaypointReward {
    pub fn new(waypoint: Vec<f64>, max_distance: f64) -> Result<Self, BuildError> {
        check_max_distance(max_distance)?;
        Ok(Self {
            waypoint,
            max_distance,
        })
    }

    fn shaping(&self, position: &[f64]) -> f64 {
        0.0 - (distance(position, &self.waypoint) / self.max_distance).min(1.0)
    }
}

impl<O: Positioned, A> RewardFunction<O, A> for WaypointReward {
    fn evaluate(&self, _obs: &O, _action: &A, next_obs: &O) -> f64 {
        self.shaping(next_obs.position())
    }
}

/// Waypoint shaping offset by a fixed penalty.
#[derive(Clone, Debug, PartialEq)]
pub struct PenaltyWaypointReward {
    inner: WaypointReward,
    penalty: f64,
}

impl PenaltyWaypointReward {
    pub fn new(waypoint: Vec<f64>, penalty: f64, max_distance: f64) -> Result<Self, BuildError> {
        if !penalty.is_finite() {
            return Err(BuildError::InvalidRewardParameter {
                name: "penalty",
                value: penalty,
            });
        }
        Ok(Self {
            inner: WaypointReward::new(waypoint, max_distance)?,
            penalty,
        })
    }
}

impl<O: Positioned, A> RewardFunction<O, A> for PenaltyWaypointReward {
    fn evaluate(&self, _obs: &O, _action: &A, next_obs: &O) -> f64 {
        self.penalty + self.inner.shaping(next_obs.position())
    }
}

/// Shared constant reward.
pub fn constant<O, A>(value: f64) -> RewardFn<O, A> {
    Arc::new(ConstantReward::new(value))
}

/// Shared constant reward with rescaling.
pub fn constant_rescaled<O, A>(value: f64) -> RewardFn<O, A> {
    Arc::new(ConstantReward::rescaled(value))
}

/// Shared waypoint shaping reward.
pub fn waypoint<O: Positioned, A>(
    waypoint: Vec<f64>,
    max_distance: f64,
) -> Result<RewardFn<O, A>, BuildError> {
    Ok(Arc::new(WaypointReward::new(waypoint, max_distance)?))
}

/// Shared penalized waypoint shaping reward.
pub fn penalty_waypoint<O: Positioned, A>(
    waypoint: Vec<f64>,
    penalty: f64,
    max_distance: f64,
) -> Result<RewardFn<O, A>, BuildError> {
    Ok(Arc::new(PenaltyWaypointReward::new(
        waypoint,
        penalty,
        max_distance,
    )?))
}
