//! Guards gating transition rules.
//!
//! A guard pairs a propositional formula with an optional counter-state tag.
//! It matches when the formula holds for the labelled propositions and the
//! tag equals the tag the machine derives from the current counter vector.

use super::formula::Formula;
use super::parser::{parse_guard, GuardParseError};
use super::proposition::{Proposition, PropositionSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a class of counter configurations, e.g. `"k0"`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CounterTag(String);

impl CounterTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CounterTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CounterTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// Compiled guard of a transition rule.
///
/// # Example
///
/// ```rust
/// use crm::core::{CounterTag, Guard, PropositionSet};
/// use crm::propositions;
///
/// propositions! {
///     enum Event {
///         Key => "KEY",
///     }
/// }
///
/// let guard: Guard<Event> = Guard::parse("KEY / k0").unwrap();
/// let props = PropositionSet::new().with(Event::Key);
///
/// assert!(guard.matches(&props, &CounterTag::new("k0")));
/// assert!(!guard.matches(&props, &CounterTag::new("k1")));
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Guard<P: Proposition> {
    formula: Formula<P>,
    tag: Option<CounterTag>,
}

impl<P: Proposition> Guard<P> {
    /// Guard on a formula alone; it matches in every counter state.
    pub fn new(formula: Formula<P>) -> Self {
        Self { formula, tag: None }
    }

    /// Guard that always matches. Useful as the final fallback rule.
    pub fn always() -> Self {
        Self::new(Formula::True)
    }

    /// Restrict the guard to one counter-state tag.
    pub fn with_tag(mut self, tag: CounterTag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Compile a guard string such as `"A and not B / k0"`.
    pub fn parse(input: &str) -> Result<Self, GuardParseError> {
        parse_guard(input)
    }

    pub fn formula(&self) -> &Formula<P> {
        &self.formula
    }

    pub fn tag(&self) -> Option<&CounterTag> {
        self.tag.as_ref()
    }

    /// Check the guard against labelled propositions and the current tag.
    pub fn matches(&self, props: &PropositionSet<P>, current: &CounterTag) -> bool {
        self.tag.as_ref().is_none_or(|t| t == current) && self.formula.eval(props)
    }
}

impl<P: Proposition> fmt::Display for Guard<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "{} / {}", self.formula, tag),
            None => write!(f, "{}", self.formula),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propositions;

    propositions! {
        enum Event {
            SafeRegion => "SAFE_REGION",
            Grasp => "GRASP",
        }
    }

    #[test]
    fn untagged_guard_ignores_counter_state() {
        let guard = Guard::new(Formula::atom(Event::Grasp));
        let props = PropositionSet::new().with(Event::Grasp);

        assert!(guard.matches(&props, &CounterTag::new("k0")));
        assert!(guard.matches(&props, &CounterTag::new("k7")));
    }

    #[test]
    fn tagged_guard_requires_both_conditions() {
        let guard = Guard::new(Formula::atom(Event::SafeRegion)).with_tag("k1".into());
        let props = PropositionSet::new().with(Event::SafeRegion);

        assert!(guard.matches(&props, &"k1".into()));
        assert!(!guard.matches(&props, &"k0".into()));
        assert!(!guard.matches(&PropositionSet::new(), &"k1".into()));
    }

    #[test]
    fn always_matches_everything() {
        let guard: Guard<Event> = Guard::always();
        assert!(guard.matches(&PropositionSet::new(), &"anything".into()));
    }

    #[test]
    fn guard_is_deterministic() {
        let guard: Guard<Event> = Guard::parse("not SAFE_REGION / k0").unwrap();
        let props = PropositionSet::new().with(Event::Grasp);
        let tag = CounterTag::new("k0");

        assert_eq!(guard.matches(&props, &tag), guard.matches(&props, &tag));
    }

    #[test]
    fn display_reproduces_guard_syntax() {
        let guard: Guard<Event> = Guard::parse("GRASP and not SAFE_REGION / k2").unwrap();
        assert_eq!(guard.to_string(), "GRASP and not SAFE_REGION / k2");
    }
}
