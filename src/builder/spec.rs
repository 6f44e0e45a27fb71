//! Declarative machine definitions loaded from JSON.
//!
//! A [`MachineSpec`] names states instead of indexing them and writes guards
//! in the `"expr / tag"` string syntax. [`MachineSpec::build`] compiles every
//! guard, resolves every name and runs the same validation as
//! [`MachineBuilder`], so a bad definition fails before any episode runs.

use crate::builder::error::BuildError;
use crate::builder::machine::MachineBuilder;
use crate::core::{CounterModifier, CounterTagger, CounterVector, Guard, Proposition, StateId};
use crate::machine::{CountingRewardMachine, FixedConfigurations, TransitionRule};
use crate::reward::{self, Positioned, RewardFn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Reward attached to a rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum RewardSpec {
    Constant {
        value: f64,
        #[serde(default)]
        rescale: bool,
    },
    Waypoint {
        waypoint: Vec<f64>,
        max_distance: f64,
    },
    PenaltyWaypoint {
        waypoint: Vec<f64>,
        penalty: f64,
        max_distance: f64,
    },
}

impl RewardSpec {
    fn build<O: Positioned, A>(&self) -> Result<RewardFn<O, A>, BuildError> {
        match self {
            RewardSpec::Constant {
                value,
                rescale: false,
            } => Ok(reward::constant(*value)),
            RewardSpec::Constant {
                value,
                rescale: true,
            } => Ok(reward::constant_rescaled(*value)),
            RewardSpec::Waypoint {
                waypoint,
                max_distance,
            } => reward::waypoint(waypoint.clone(), *max_distance),
            RewardSpec::PenaltyWaypoint {
                waypoint,
                penalty,
                max_distance,
            } => reward::penalty_waypoint(waypoint.clone(), *penalty, *max_distance),
        }
    }
}

/// One rule of a [`MachineSpec`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    pub from: String,
    pub guard: String,
    pub to: String,
    #[serde(default)]
    pub modifier: CounterModifier,
    pub reward: RewardSpec,
}

/// Serializable machine definition.
///
/// # Example
///
/// ```rust
/// use crm::builder::MachineSpec;
/// use crm::machine::CountingRewardMachine;
/// use crm::propositions;
/// use crm::reward::Positioned;
///
/// propositions! {
///     enum Event {
///         Goal => "GOAL",
///     }
/// }
///
/// struct Obs([f64; 1]);
///
/// impl Positioned for Obs {
///     fn position(&self) -> &[f64] {
///         &self.0
///     }
/// }
///
/// let spec = MachineSpec::from_json(r#"{
///     "states": ["search", "done"],
///     "initial_state": "search",
///     "terminal_states": ["done"],
///     "rules": [
///         { "from": "search", "guard": "GOAL", "to": "done",
///           "reward": { "kind": "constant", "value": 1.0 } },
///         { "from": "search", "guard": "not GOAL", "to": "search",
///           "reward": { "kind": "waypoint", "waypoint": [5.0], "max_distance": 10.0 } }
///     ]
/// }"#).unwrap();
///
/// let machine: CountingRewardMachine<Event, Obs, u8> = spec.build(None).unwrap();
/// assert_eq!(machine.num_states(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineSpec {
    pub states: Vec<String>,
    pub initial_state: String,
    #[serde(default)]
    pub terminal_states: Vec<String>,
    #[serde(default)]
    pub initial_counters: Vec<i64>,
    pub rules: Vec<RuleSpec>,
    /// Counter vectors replayed at every state during counterfactual
    /// generation; defaults to the initial counters.
    #[serde(default)]
    pub counter_configurations: Option<Vec<Vec<i64>>>,
}

impl MachineSpec {
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, BuildError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn resolve(&self, name: &str) -> Result<StateId, BuildError> {
        self.states
            .iter()
            .position(|s| s == name)
            .map(StateId::new)
            .ok_or_else(|| BuildError::UnknownStateName(name.to_string()))
    }

    /// Compile the definition into a machine.
    ///
    /// `tagger` is required as soon as any guard carries a `/ tag` suffix.
    pub fn build<P, O, A>(
        &self,
        tagger: Option<Arc<dyn CounterTagger>>,
    ) -> Result<CountingRewardMachine<P, O, A>, BuildError>
    where
        P: Proposition,
        O: Positioned,
    {
        let mut builder = MachineBuilder::new()
            .states(self.states.iter().cloned())
            .initial(self.resolve(&self.initial_state)?)
            .initial_counters(CounterVector::new(self.initial_counters.clone()));

        for name in &self.terminal_states {
            builder = builder.terminal(self.resolve(name)?);
        }

        for rule in &self.rules {
            let guard = Guard::parse(&rule.guard).map_err(|source| BuildError::InvalidGuard {
                guard: rule.guard.clone(),
                source,
            })?;
            builder = builder.add_rule(
                self.resolve(&rule.from)?,
                TransitionRule::new(
                    guard,
                    self.resolve(&rule.to)?,
                    rule.modifier.clone(),
                    rule.reward.build()?,
                ),
            );
        }

        if let Some(tagger) = tagger {
            builder = builder.shared_tagger(tagger);
        }

        if let Some(configs) = &self.counter_configurations {
            builder = builder.sampler(FixedConfigurations::new(
                configs.iter().cloned().map(CounterVector::new).collect(),
            ));
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CounterTag, PropositionSet};
    use crate::propositions;
    use crate::validation::ViolationError;

    propositions! {
        enum Event {
            A,
            B,
        }
    }

    struct Obs(Vec<f64>);

    impl Positioned for Obs {
        fn position(&self) -> &[f64] {
            &self.0
        }
    }

    const COUNTING: &str = r#"{
        "states": ["counting", "done"],
        "initial_state": "counting",
        "terminal_states": ["done"],
        "initial_counters": [0],
        "rules": [
            { "from": "counting", "guard": "A", "to": "counting",
              "modifier": { "increment": [1] },
              "reward": { "kind": "constant", "value": 1.0, "rescale": true } },
            { "from": "counting", "guard": "B / nonzero", "to": "done",
              "modifier": "reset",
              "reward": { "kind": "constant", "value": 10.0 } },
            { "from": "counting", "guard": "true", "to": "counting",
              "reward": { "kind": "penalty_waypoint", "waypoint": [0.0], "penalty": -1.0, "max_distance": 1.0 } }
        ],
        "counter_configurations": [[0], [1], [2]]
    }"#;

    fn tagger() -> Option<Arc<dyn CounterTagger>> {
        Some(Arc::new(|c: &CounterVector| {
            if c.get(0) == Some(0) {
                CounterTag::new("zero")
            } else {
                CounterTag::new("nonzero")
            }
        }))
    }

    #[test]
    fn spec_builds_working_machine() {
        let spec = MachineSpec::from_json(COUNTING).unwrap();
        let machine: CountingRewardMachine<Event, Obs, ()> = spec.build(tagger()).unwrap();

        let obs = Obs(vec![0.0]);
        let props = PropositionSet::new().with(Event::B);

        let out = machine
            .transition(StateId::new(0), &CounterVector::from([2]), &props)
            .unwrap();
        assert_eq!(out.next_state, StateId::new(1));
        assert_eq!(out.next_counters, CounterVector::from([0]));
        assert_eq!(out.reward_for(&obs, &(), &obs), 10.0);

        let out = machine
            .transition(StateId::new(0), &CounterVector::from([0]), &props)
            .unwrap();
        assert_eq!(out.rule_index, 2);
        assert_eq!(out.reward_for(&obs, &(), &Obs(vec![0.5])), -1.5);

        assert_eq!(machine.sample_counter_configurations(StateId::new(1)).len(), 3);
    }

    #[test]
    fn unknown_state_name_fails() {
        let mut spec = MachineSpec::from_json(COUNTING).unwrap();
        spec.rules[0].to = "nowhere".to_string();

        let result: Result<CountingRewardMachine<Event, Obs, ()>, _> = spec.build(tagger());
        assert!(matches!(result, Err(BuildError::UnknownStateName(name)) if name == "nowhere"));
    }

    #[test]
    fn unknown_proposition_fails() {
        let mut spec = MachineSpec::from_json(COUNTING).unwrap();
        spec.rules[0].guard = "C and A".to_string();

        let result: Result<CountingRewardMachine<Event, Obs, ()>, _> = spec.build(tagger());
        assert!(matches!(result, Err(BuildError::InvalidGuard { .. })));
    }

    #[test]
    fn tagged_guard_without_tagger_fails() {
        let spec = MachineSpec::from_json(COUNTING).unwrap();

        let result: Result<CountingRewardMachine<Event, Obs, ()>, _> = spec.build(None);
        match result {
            Err(BuildError::InvalidMachine { violations }) => {
                assert_eq!(violations.len(), 1);
                assert!(matches!(violations[0], ViolationError::TagWithoutTagger { rule: 1, .. }));
            }
            _ => panic!("Expected InvalidMachine"),
        }
    }

    #[test]
    fn unknown_reward_kind_fails_to_parse() {
        let json = COUNTING.replace("penalty_waypoint", "teleport");
        assert!(matches!(
            MachineSpec::from_json(&json),
            Err(BuildError::InvalidConfig(_))
        ));
    }

    #[test]
    fn invalid_reward_parameter_fails() {
        let json = COUNTING.replace("\"max_distance\": 1.0", "\"max_distance\": -1.0");
        let spec = MachineSpec::from_json(&json).unwrap();

        let result: Result<CountingRewardMachine<Event, Obs, ()>, _> = spec.build(tagger());
        assert!(matches!(
            result,
            Err(BuildError::InvalidRewardParameter {
                name: "max_distance",
                ..
            })
        ));
    }

    #[test]
    fn spec_serializes_back_to_json() {
        let spec = MachineSpec::from_json(COUNTING).unwrap();
        let again = MachineSpec::from_json(&spec.to_json().unwrap()).unwrap();
        assert_eq!(spec, again);
    }
}
