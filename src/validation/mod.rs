//! Validation-based checking of machine definitions.
//!
//! A machine definition can be wrong in many places at once: a rule may
//! point at a state that does not exist, a modifier may have the wrong
//! counter dimension, a tagged guard may be used without a tagger. The
//! builder runs every check through Stillwater's `Validation` so that all
//! problems are reported together when `build()` fails.
//!
//! # Example
//!
//! ```rust
//! use crm::builder::{BuildError, MachineBuilder, RuleBuilder};
//! use crm::core::{CounterModifier, CounterVector, Guard, StateId};
//! use crm::machine::CountingRewardMachine;
//! use crm::propositions;
//! use crm::reward;
//!
//! propositions! {
//!     enum Event {
//!         Done => "DONE",
//!     }
//! }
//!
//! let result: Result<CountingRewardMachine<Event, (), ()>, BuildError> = MachineBuilder::new()
//!     .states(["start", "end"])
//!     .initial(StateId::new(0))
//!     .initial_counters(CounterVector::zeros(1))
//!     .terminal(StateId::new(3))
//!     .rule(
//!         RuleBuilder::new()
//!             .from(StateId::new(0))
//!             .guard(Guard::parse("DONE").unwrap())
//!             .to(StateId::new(4))
//!             .modifier(CounterModifier::Increment(vec![1, 1]))
//!             .reward(reward::constant(1.0)),
//!     )
//!     .unwrap()
//!     .build();
//!
//! match result {
//!     Err(BuildError::InvalidMachine { violations }) => assert_eq!(violations.len(), 4),
//!     _ => panic!("expected an invalid machine"),
//! }
//! ```

pub mod context;
pub mod rules;
pub mod violations;

pub use context::MachineDraft;
pub use rules::{MachineRules, ValidationCheck};
pub use violations::ViolationError;
