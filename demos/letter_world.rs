//! Letter World
//!
//! This example demonstrates a task no plain reward machine can express:
//! visit the `A` end of a corridor some number of times, then visit the `B`
//! end exactly as many times.
//!
//! Key concepts:
//! - Machine defined as JSON and compiled once
//! - A counter tagger gating guards on the counter value
//! - Cross-product stepping with a scripted policy
//! - Counterfactual experience from a single real step
//! - Checkpointing the automaton side of an episode
//!
//! Run with: cargo run --example letter_world
//! Set RUST_LOG=crm=trace to see every automaton transition.

use crm::builder::MachineSpec;
use crm::core::{CounterTag, CounterVector, PropositionSet};
use crm::crossproduct::{
    CrossProduct, CrossProductConfig, GroundEnvironment, GroundStep, OneHotComposer,
};
use crm::propositions;
use crm::reward::Positioned;
use crm::CountingRewardMachine;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

propositions! {
    enum Letter {
        A => "A",
        B => "B",
    }
}

const LAST_CELL: usize = 4;

const TASK: &str = r#"{
    "states": ["collect_a", "collect_b", "done", "failed"],
    "initial_state": "collect_a",
    "terminal_states": ["done", "failed"],
    "initial_counters": [0],
    "rules": [
        { "from": "collect_a", "guard": "A", "to": "collect_a",
          "modifier": { "increment": [1] },
          "reward": { "kind": "constant", "value": 1.0, "rescale": true } },
        { "from": "collect_a", "guard": "B / zero", "to": "collect_a",
          "reward": { "kind": "constant", "value": -1.0, "rescale": true } },
        { "from": "collect_a", "guard": "B / one", "to": "done",
          "modifier": { "increment": [-1] },
          "reward": { "kind": "constant", "value": 1.0 } },
        { "from": "collect_a", "guard": "B", "to": "collect_b",
          "modifier": { "increment": [-1] },
          "reward": { "kind": "constant", "value": 1.0, "rescale": true } },
        { "from": "collect_a", "guard": "true", "to": "collect_a",
          "reward": { "kind": "waypoint", "waypoint": [0.0], "max_distance": 4.0 } },

        { "from": "collect_b", "guard": "A", "to": "failed",
          "reward": { "kind": "constant", "value": -1.0 } },
        { "from": "collect_b", "guard": "B / one", "to": "done",
          "modifier": { "increment": [-1] },
          "reward": { "kind": "constant", "value": 1.0 } },
        { "from": "collect_b", "guard": "B", "to": "collect_b",
          "modifier": { "increment": [-1] },
          "reward": { "kind": "constant", "value": 1.0, "rescale": true } },
        { "from": "collect_b", "guard": "true", "to": "collect_b",
          "reward": { "kind": "waypoint", "waypoint": [4.0], "max_distance": 4.0 } }
    ],
    "counter_configurations": [[0], [1], [2], [3]]
}"#;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Cell {
    position: [f64; 1],
}

impl Cell {
    fn at(index: usize) -> Self {
        Self {
            position: [index as f64],
        }
    }

    fn index(&self) -> usize {
        self.position[0] as usize
    }
}

impl Positioned for Cell {
    fn position(&self) -> &[f64] {
        &self.position
    }
}

impl AsRef<[f64]> for Cell {
    fn as_ref(&self) -> &[f64] {
        &self.position
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Move {
    Left,
    Right,
}

// Corridor of cells 0..=LAST_CELL; A sits at cell 0, B at the last cell.
struct Corridor {
    index: usize,
}

impl GroundEnvironment for Corridor {
    type Observation = Cell;
    type Action = Move;
    type Frame = String;
    type Error = Infallible;

    fn reset(&mut self, _seed: Option<u64>) -> Result<Cell, Infallible> {
        self.index = LAST_CELL / 2;
        Ok(Cell::at(self.index))
    }

    fn step(&mut self, action: &Move) -> Result<GroundStep<Cell>, Infallible> {
        self.index = match action {
            Move::Left => self.index.saturating_sub(1),
            Move::Right => (self.index + 1).min(LAST_CELL),
        };
        Ok(GroundStep::observation(Cell::at(self.index)))
    }

    fn render(&self) -> Result<String, Infallible> {
        Ok((0..=LAST_CELL)
            .map(|i| match i {
                i if i == self.index => '@',
                0 => 'A',
                LAST_CELL => 'B',
                _ => '.',
            })
            .collect())
    }
}

// A letter is seen when the agent arrives on its cell.
fn label(obs: &Cell, _action: &Move, next_obs: &Cell) -> PropositionSet<Letter> {
    let mut props = PropositionSet::new();
    if next_obs.index() != obs.index() {
        match next_obs.index() {
            0 => {
                props.insert(Letter::A);
            }
            LAST_CELL => {
                props.insert(Letter::B);
            }
            _ => {}
        }
    }
    props
}

fn count_tag(c: &CounterVector) -> CounterTag {
    match c.get(0).unwrap_or(0) {
        0 => CounterTag::new("zero"),
        1 => CounterTag::new("one"),
        _ => CounterTag::new("many"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Letter World: A^n B^n ===\n");

    let spec = MachineSpec::from_json(TASK)?;
    let machine: CountingRewardMachine<Letter, Cell, Move> = spec.build(Some(Arc::new(count_tag)))?;
    let machine = Arc::new(machine);
    println!(
        "Compiled machine with {} states and {} counter(s)",
        machine.num_states(),
        machine.counter_dim()
    );

    let composer = OneHotComposer::new(machine.num_states());
    let mut env = CrossProduct::new(
        Corridor { index: 0 },
        Arc::clone(&machine),
        label,
        composer,
        CrossProductConfig::with_max_steps(50),
    );

    // Two A's, then two B's.
    use Move::{Left, Right};
    let policy = [Left, Left, Right, Left, Right, Right, Right, Right, Left, Right];

    let mut obs = env.reset(None)?;
    println!("Start: {}  obs={:?}\n", env.render()?, obs);

    let mut last_transition = None;
    let mut total = 0.0;
    for action in policy {
        let before = env.checkpoint()?.previous_ground_obs;
        let out = env.step(&action)?;
        total += out.reward;

        println!(
            "{:>2}. {:<5} {}  {} -> {} counters={} props={} reward={:+.3}",
            out.info.step,
            format!("{:?}", action),
            env.render()?,
            machine.state_name(out.info.previous_state).unwrap_or("?"),
            machine.state_name(out.info.state).unwrap_or("?"),
            out.info.counters,
            out.info.propositions,
            out.reward
        );

        last_transition = Some((before, action, Cell::at(env.ground().index)));
        obs = out.observation;

        if out.terminated || out.truncated {
            break;
        }
    }

    println!("\nFinal obs={:?}", obs);
    println!("Total reward: {:+.3}", total);
    println!("State path: {:?}", env.trace().state_path());
    println!("Visits per state: {:?}", env.trace().visit_counts(machine.num_states()));

    // Replay the final real step against every state and counter value.
    if let Some((from, action, to)) = last_transition {
        let batch = env.generate_counterfactual_experience(&from, &action, &to)?;
        println!(
            "\nCounterfactual batch: {} experiences, {} skipped of {} combinations",
            batch.len(),
            batch.skipped_count(),
            batch.attempted()
        );
        for exp in batch.iter() {
            println!(
                "  {} {} -> {} reward={:+.3} done={}",
                machine.state_name(exp.info.state).unwrap_or("?"),
                exp.info.counters,
                machine.state_name(exp.info.next_state).unwrap_or("?"),
                exp.reward,
                exp.done
            );
        }
    }

    let checkpoint = env.checkpoint()?;
    println!(
        "\nCheckpoint {} ({} bytes as bincode)",
        checkpoint.id,
        checkpoint.to_bytes()?.len()
    );

    Ok(())
}
