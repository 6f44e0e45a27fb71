//! Pick-and-place stages built from guard strings.
//!
//! Each stage is four ordered rules around one waypoint: punish a wrong
//! gripper command, push back into the safe region, succeed on the target
//! condition, and otherwise shape towards the waypoint.

use crm::builder::{self_loop, BuildError, MachineBuilder};
use crm::core::{CounterModifier, CounterTag, CounterVector, Guard, PropositionSet, StateId};
use crm::machine::{CountingRewardMachine, TransitionError, TransitionRule};
use crm::propositions;
use crm::reward::{self, Positioned, RewardFn};
use std::str::FromStr;
use thiserror::Error;

propositions! {
    enum Warehouse {
        GripperOpenActionExecuted => "GRIPPER_OPEN_ACTION_EXECUTED",
        GripperClosed => "GRIPPER_CLOSED",
        VelocityLow => "VELOCITY_LOW",
        SafeRegion => "SAFE_REGION",
        GraspCondition => "GRASP_CONDITION",
        SafeRegionRed => "SAFE_REGION_RED",
        SafeRegionBlue => "SAFE_REGION_BLUE",
        GraspRed => "GRASP_RED",
        GraspBlue => "GRASP_BLUE",
        ReleaseRegionRed => "RELEASE_REGION_RED",
        ReleaseRegionBlue => "RELEASE_REGION_BLUE",
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Arm {
    position: [f64; 3],
}

impl Arm {
    fn at(position: [f64; 3]) -> Self {
        Self { position }
    }
}

impl Positioned for Arm {
    fn position(&self) -> &[f64] {
        &self.position
    }
}

#[derive(Debug, Error)]
enum StageError {
    #[error("Invalid block colour: {0}")]
    InvalidColour(String),

    #[error(transparent)]
    Build(#[from] BuildError),
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Colour {
    Red,
    Blue,
}

impl FromStr for Colour {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RED" => Ok(Colour::Red),
            "BLUE" => Ok(Colour::Blue),
            other => Err(StageError::InvalidColour(other.to_string())),
        }
    }
}

impl Colour {
    fn symbol(self) -> &'static str {
        match self {
            Colour::Red => "RED",
            Colour::Blue => "BLUE",
        }
    }

    fn grasp_waypoint(self) -> Vec<f64> {
        match self {
            Colour::Red => vec![0.5, -0.2, 0.02],
            Colour::Blue => vec![0.5, 0.2, 0.02],
        }
    }

    fn release_waypoint(self) -> Vec<f64> {
        let mut w = self.grasp_waypoint();
        w[1] += 0.25;
        w[2] += 0.15;
        w
    }
}

type Rule = TransitionRule<Warehouse, Arm, ()>;

fn guard(expr: &str) -> Result<Guard<Warehouse>, BuildError> {
    Guard::parse(expr).map_err(|source| BuildError::InvalidGuard {
        guard: expr.to_string(),
        source,
    })
}

struct Stage<'a> {
    counter_state: &'a str,
    current: StateId,
    success: StateId,
    base: CounterModifier,
    on_success: CounterModifier,
}

impl Stage<'_> {
    /// `guards` are, in order: gripper, region, target, other.
    fn rules(
        &self,
        guards: [&str; 4],
        waypoint: Vec<f64>,
        gripper_reward: RewardFn<Arm, ()>,
        success_reward: RewardFn<Arm, ()>,
    ) -> Result<Vec<Rule>, StageError> {
        let tagged = |expr: &str| guard(&format!("{} / {}", expr, self.counter_state));
        let [gripper, region, target, other] = guards;

        Ok(vec![
            self_loop(self.current, tagged(gripper)?, self.base.clone(), gripper_reward),
            self_loop(
                self.current,
                tagged(region)?,
                self.base.clone(),
                reward::penalty_waypoint(waypoint.clone(), -1.0, 1.0)?,
            ),
            TransitionRule::new(
                tagged(target)?,
                self.success,
                self.on_success.clone(),
                success_reward,
            ),
            self_loop(
                self.current,
                tagged(other)?,
                self.base.clone(),
                reward::waypoint(waypoint, 1.0)?,
            ),
        ])
    }
}

fn grasp_stage(colour: &str, stage: &Stage<'_>) -> Result<Vec<Rule>, StageError> {
    let colour: Colour = colour.parse()?;
    let c = colour.symbol();
    stage.rules(
        [
            "not GRIPPER_OPEN_ACTION_EXECUTED",
            &format!("not SAFE_REGION_{}", c),
            &format!("GRASP_{} and VELOCITY_LOW", c),
            &format!("not (GRASP_{} and VELOCITY_LOW)", c),
        ],
        colour.grasp_waypoint(),
        reward::constant_rescaled(-1.0),
        reward::constant_rescaled(1.0),
    )
}

fn drop_stage(colour: &str, stage: &Stage<'_>) -> Result<Vec<Rule>, StageError> {
    let colour: Colour = colour.parse()?;
    let c = colour.symbol();
    stage.rules(
        [
            "not GRIPPER_OPEN_ACTION_EXECUTED",
            &format!("not RELEASE_REGION_{}", c),
            &format!("RELEASE_REGION_{} and not GRIPPER_CLOSED", c),
            &format!("RELEASE_REGION_{} and GRIPPER_CLOSED", c),
        ],
        colour.release_waypoint(),
        reward::constant(-1.0),
        reward::constant(50.0),
    )
}

fn stacked(c: &CounterVector) -> CounterTag {
    CounterTag::new(format!("k{}", c.get(0).unwrap_or(0)))
}

const ABOVE_WAYPOINT: [f64; 3] = [0.5, 0.0, 0.12];

// "above_block" with the generic stage guards; success moves to "grasping".
fn above_block_machine() -> CountingRewardMachine<Warehouse, Arm, ()> {
    let above = StateId::new(0);
    let grasping = StateId::new(1);
    let base = CounterModifier::Identity;

    MachineBuilder::new()
        .states(["above_block", "grasping"])
        .initial(above)
        .initial_counters(CounterVector::zeros(2))
        .terminal(grasping)
        .tagger(stacked)
        .rules(
            above,
            vec![
                self_loop(
                    above,
                    guard("not GRIPPER_OPEN_ACTION_EXECUTED / k0").unwrap(),
                    base.clone(),
                    reward::constant(-1.0),
                ),
                self_loop(
                    above,
                    guard("not SAFE_REGION / k0").unwrap(),
                    base.clone(),
                    reward::penalty_waypoint(ABOVE_WAYPOINT.to_vec(), -1.0, 1.0).unwrap(),
                ),
                TransitionRule::new(
                    guard("GRASP_CONDITION and VELOCITY_LOW / k0").unwrap(),
                    grasping,
                    CounterModifier::Increment(vec![0, 1]),
                    reward::constant(1.0),
                ),
                self_loop(
                    above,
                    guard("true / k0").unwrap(),
                    base,
                    reward::waypoint(ABOVE_WAYPOINT.to_vec(), 1.0).unwrap(),
                ),
            ],
        )
        .build()
        .unwrap()
}

fn props(list: &[Warehouse]) -> PropositionSet<Warehouse> {
    list.iter().copied().collect()
}

#[test]
fn above_block_grasp_condition_selects_success_rule() {
    let machine = above_block_machine();
    let labelled = props(&[
        Warehouse::GraspCondition,
        Warehouse::VelocityLow,
        Warehouse::GripperOpenActionExecuted,
        Warehouse::SafeRegion,
    ]);

    let out = machine
        .transition(StateId::new(0), &CounterVector::zeros(2), &labelled)
        .unwrap();

    assert_eq!(out.rule_index, 2);
    assert_eq!(out.next_state, machine.state_id("grasping").unwrap());
    assert!(machine.is_terminal(out.next_state));
    assert_eq!(out.next_counters, CounterVector::from([0, 1]));

    let here = Arm::at(ABOVE_WAYPOINT);
    assert_eq!(out.reward_for(&here, &(), &here), 1.0);
}

#[test]
fn above_block_earlier_rules_take_priority() {
    let machine = above_block_machine();
    let origin = CounterVector::zeros(2);
    let from = Arm::at([0.0, 0.0, 0.0]);
    let to = Arm::at([0.5, 0.0, 0.62]);

    // Gripper command missing: first rule even though the grasp holds.
    let out = machine
        .transition(
            StateId::new(0),
            &origin,
            &props(&[Warehouse::GraspCondition, Warehouse::VelocityLow, Warehouse::SafeRegion]),
        )
        .unwrap();
    assert_eq!(out.rule_index, 0);
    assert_eq!(out.reward_for(&from, &(), &to), -1.0);

    // Outside the safe region: penalty plus shaping towards the waypoint.
    let out = machine
        .transition(
            StateId::new(0),
            &origin,
            &props(&[Warehouse::GripperOpenActionExecuted, Warehouse::GraspCondition]),
        )
        .unwrap();
    assert_eq!(out.rule_index, 1);
    assert!((out.reward_for(&from, &(), &to) - (-1.5)).abs() < 1e-9);

    // Safe but not yet slow enough: plain shaping.
    let out = machine
        .transition(
            StateId::new(0),
            &origin,
            &props(&[Warehouse::GripperOpenActionExecuted, Warehouse::SafeRegion]),
        )
        .unwrap();
    assert_eq!(out.rule_index, 3);
    assert_eq!(out.next_state, StateId::new(0));
    assert!((out.reward_for(&from, &(), &to) - (-0.5)).abs() < 1e-9);
}

#[test]
fn above_block_rules_are_gated_by_counter_state() {
    let machine = above_block_machine();
    let err = machine
        .transition(
            StateId::new(0),
            &CounterVector::from([1, 0]),
            &props(&[Warehouse::SafeRegion]),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        TransitionError::NoMatchingRule { ref tag, .. } if tag.as_str() == "k1"
    ));
}

#[test]
fn invalid_colour_is_rejected() {
    let stage = Stage {
        counter_state: "k0",
        current: StateId::new(0),
        success: StateId::new(1),
        base: CounterModifier::Identity,
        on_success: CounterModifier::Identity,
    };

    let err = grasp_stage("PURPLE", &stage).unwrap_err();
    assert!(matches!(err, StageError::InvalidColour(ref c) if c == "PURPLE"));
    assert_eq!(err.to_string(), "Invalid block colour: PURPLE");
    assert!(drop_stage("purple", &stage).is_err());
}

#[test]
fn stages_chain_into_pick_and_place_task() {
    let grasp_red = StateId::new(0);
    let drop_red = StateId::new(1);
    let grasp_blue = StateId::new(2);
    let drop_blue = StateId::new(3);
    let done = StateId::new(4);

    let stage = |counter_state, current, success| Stage {
        counter_state,
        current,
        success,
        base: CounterModifier::Identity,
        on_success: CounterModifier::Increment(vec![1]),
    };

    let machine: CountingRewardMachine<Warehouse, Arm, ()> = MachineBuilder::new()
        .states(["grasp_red", "drop_red", "grasp_blue", "drop_blue", "done"])
        .initial(grasp_red)
        .initial_counters(CounterVector::zeros(1))
        .terminal(done)
        .tagger(stacked)
        .rules(grasp_red, grasp_stage("RED", &stage("k0", grasp_red, drop_red)).unwrap())
        .rules(drop_red, drop_stage("RED", &stage("k1", drop_red, grasp_blue)).unwrap())
        .rules(grasp_blue, grasp_stage("BLUE", &stage("k2", grasp_blue, drop_blue)).unwrap())
        .rules(drop_blue, drop_stage("BLUE", &stage("k3", drop_blue, done)).unwrap())
        .build()
        .unwrap();

    let arm = Arm::at([0.5, -0.2, 0.02]);
    let steps = [
        props(&[
            Warehouse::GripperOpenActionExecuted,
            Warehouse::SafeRegionRed,
            Warehouse::GraspRed,
            Warehouse::VelocityLow,
        ]),
        props(&[Warehouse::GripperOpenActionExecuted, Warehouse::ReleaseRegionRed]),
        props(&[
            Warehouse::GripperOpenActionExecuted,
            Warehouse::SafeRegionBlue,
            Warehouse::GraspBlue,
            Warehouse::VelocityLow,
        ]),
        props(&[Warehouse::GripperOpenActionExecuted, Warehouse::ReleaseRegionBlue]),
    ];

    let mut state = machine.initial_state();
    let mut counters = machine.initial_counters().clone();
    let mut rewards = Vec::new();
    for labelled in &steps {
        let out = machine.transition(state, &counters, labelled).unwrap();
        assert_eq!(out.rule_index, 2);
        rewards.push(out.reward_for(&arm, &(), &arm));
        state = out.next_state;
        counters = out.next_counters;
    }

    assert_eq!(state, done);
    assert_eq!(counters, CounterVector::from([4]));
    // Grasp rewards are rescaled; release rewards are not.
    assert_eq!(rewards, vec![0.1, 50.0, 0.1, 50.0]);
}

#[test]
fn grasp_stage_punishes_closed_gripper_with_rescaled_reward() {
    let stage = Stage {
        counter_state: "k0",
        current: StateId::new(0),
        success: StateId::new(1),
        base: CounterModifier::Identity,
        on_success: CounterModifier::Identity,
    };
    let rules = grasp_stage("BLUE", &stage).unwrap();
    let arm = Arm::at([0.0; 3]);

    assert_eq!(rules.len(), 4);
    assert_eq!(rules[0].guard.to_string(), "not GRIPPER_OPEN_ACTION_EXECUTED / k0");
    assert_eq!(rules[3].guard.to_string(), "not (GRASP_BLUE and VELOCITY_LOW) / k0");
    assert!((rules[0].reward.evaluate(&arm, &(), &arm) - (-0.1)).abs() < 1e-12);
}
