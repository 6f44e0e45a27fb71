//! CRM: Counting Reward Machines
//!
//! A counting reward machine is a finite automaton extended with integer
//! counters. Layered on top of a ground environment it decides, from the
//! propositions that hold on each ground transition, which task stage the
//! agent is in and which reward it receives. Counters let the machine
//! express tasks such as "do A n times, then B n times" that no regular
//! reward machine can.
//!
//! # Core Concepts
//!
//! - **Propositions**: the boolean event alphabet, declared with
//!   [`propositions!`]
//! - **Guards**: typed formulas over propositions, optionally restricted to a
//!   counter-state tag, compiled from `"expr / tag"` strings once
//! - **Machine**: ordered per-state rule lists with first-match semantics,
//!   validated in full when built
//! - **Cross-product**: a ground environment whose observations carry the
//!   automaton state and whose rewards come from the machine
//! - **Counterfactual experience**: one real step replayed against every
//!   automaton state and sampled counter configuration
//!
//! # Example
//!
//! ```rust
//! use crm::builder::{MachineBuilder, RuleBuilder};
//! use crm::core::{CounterModifier, CounterVector, Guard, PropositionSet, StateId};
//! use crm::machine::CountingRewardMachine;
//! use crm::propositions;
//! use crm::reward;
//!
//! propositions! {
//!     enum Letter {
//!         A => "A",
//!         B => "B",
//!     }
//! }
//!
//! let counting = StateId::new(0);
//! let done = StateId::new(1);
//!
//! let machine: CountingRewardMachine<Letter, (), ()> = MachineBuilder::new()
//!     .states(["counting", "done"])
//!     .initial(counting)
//!     .initial_counters(CounterVector::zeros(1))
//!     .terminal(done)
//!     .rule(
//!         RuleBuilder::new()
//!             .from(counting)
//!             .guard(Guard::parse("A").unwrap())
//!             .to(counting)
//!             .modifier(CounterModifier::Increment(vec![1]))
//!             .reward(reward::constant(0.0)),
//!     )
//!     .unwrap()
//!     .rule(
//!         RuleBuilder::new()
//!             .from(counting)
//!             .guard(Guard::parse("B").unwrap())
//!             .to(done)
//!             .reward(reward::constant(1.0)),
//!     )
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let props: PropositionSet<Letter> = [Letter::A].into_iter().collect();
//! let outcome = machine
//!     .transition(counting, machine.initial_counters(), &props)
//!     .unwrap();
//! assert_eq!(outcome.next_counters, CounterVector::from([1]));
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod crossproduct;
pub mod machine;
pub mod reward;
pub mod validation;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder, MachineSpec, RuleBuilder};
pub use checkpoint::{CheckpointError, EpisodeCheckpoint};
pub use crate::core::{CounterModifier, CounterVector, Formula, Guard, Proposition, PropositionSet, StateId};
pub use crossproduct::{CrossProduct, CrossProductConfig, CrossProductError, GroundEnvironment};
pub use machine::{CountingRewardMachine, TransitionError};
