//! Builder API for ergonomic machine construction.
//!
//! This module provides fluent builders, a JSON machine definition and the
//! `propositions!` macro for creating counting reward machines with minimal
//! boilerplate. Every path validates the full rule table before a machine
//! is handed out.

pub mod error;
pub mod machine;
pub mod macros;
pub mod rule;
pub mod spec;

pub use error::BuildError;
pub use machine::MachineBuilder;
pub use rule::RuleBuilder;
pub use spec::{MachineSpec, RewardSpec, RuleSpec};

use crate::core::{CounterModifier, Guard, Proposition, StateId};
use crate::machine::TransitionRule;
use crate::reward::RewardFn;

/// Create a rule that stays in `state`.
///
/// Most stages of a task are a handful of self-loops that shape reward
/// until one guard finally leaves the state.
///
/// # Example
///
/// ```
/// use crm::builder::self_loop;
/// use crm::core::{CounterModifier, Guard, StateId};
/// use crm::propositions;
/// use crm::reward;
///
/// propositions! {
///     enum Event {
///         Safe => "SAFE_REGION",
///     }
/// }
///
/// let rule = self_loop::<Event, (), ()>(
///     StateId::new(2),
///     Guard::parse("not SAFE_REGION").unwrap(),
///     CounterModifier::Identity,
///     reward::constant(-1.0),
/// );
/// assert_eq!(rule.to, StateId::new(2));
/// ```
pub fn self_loop<P, O, A>(
    state: StateId,
    guard: Guard<P>,
    modifier: CounterModifier,
    reward: RewardFn<O, A>,
) -> TransitionRule<P, O, A>
where
    P: Proposition,
{
    TransitionRule::new(guard, state, modifier, reward)
}

/// Create a rule that fires whatever the propositions and counters are.
pub fn fallback<P, O, A>(to: StateId, reward: RewardFn<O, A>) -> TransitionRule<P, O, A>
where
    P: Proposition,
{
    TransitionRule::new(Guard::always(), to, CounterModifier::Identity, reward)
}
