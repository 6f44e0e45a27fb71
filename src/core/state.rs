//! Automaton state identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of an automaton state.
///
/// States are numbered `0..n` in the order they were declared on the
/// machine. The identifier itself carries no notion of being initial or
/// terminal; those are properties of the machine that owns it.
///
/// # Example
///
/// ```rust
/// use crm::core::StateId;
///
/// let u = StateId::new(2);
/// assert_eq!(u.index(), 2);
/// assert_eq!(u.to_string(), "u2");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(usize);

impl StateId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for StateId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_ids_order_by_index() {
        assert!(StateId::new(0) < StateId::new(1));
        assert_eq!(StateId::from(3), StateId::new(3));
    }

    #[test]
    fn state_id_serializes_as_plain_index() {
        let json = serde_json::to_string(&StateId::new(4)).unwrap();
        assert_eq!(json, "4");
        let back: StateId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StateId::new(4));
    }
}
