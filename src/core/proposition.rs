//! Propositions and proposition sets.
//!
//! A proposition is an atomic event symbol such as `GRIPPER_CLOSED`. The
//! labelling function of a task reports, for every ground transition, the
//! set of propositions that hold. Guards are evaluated against that set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Debug};
use std::hash::Hash;

/// Trait for proposition alphabets.
///
/// Alphabets are small enumerations; the `propositions!` macro generates an
/// implementation for a plain enum.
///
/// # Example
///
/// ```rust
/// use crm::core::Proposition;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
/// enum Event {
///     Door,
///     Key,
/// }
///
/// impl Proposition for Event {
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Door => "DOOR",
///             Self::Key => "KEY",
///         }
///     }
///
///     fn from_name(name: &str) -> Option<Self> {
///         match name {
///             "DOOR" => Some(Self::Door),
///             "KEY" => Some(Self::Key),
///             _ => None,
///         }
///     }
/// }
///
/// assert_eq!(Event::from_name("KEY"), Some(Event::Key));
/// ```
pub trait Proposition:
    Copy + Eq + Hash + Ord + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Symbol used for this proposition in guard strings and logs.
    fn name(&self) -> &'static str;

    /// Resolve a symbol back to a proposition.
    fn from_name(name: &str) -> Option<Self>;
}

/// Set of propositions that hold for one ground transition.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PropositionSet<P: Proposition> {
    props: BTreeSet<P>,
}

impl<P: Proposition> Default for PropositionSet<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Proposition> PropositionSet<P> {
    pub fn new() -> Self {
        Self {
            props: BTreeSet::new(),
        }
    }

    /// Add a proposition; returns `true` if it was not already present.
    pub fn insert(&mut self, prop: P) -> bool {
        self.props.insert(prop)
    }

    /// Builder-style insert.
    pub fn with(mut self, prop: P) -> Self {
        self.props.insert(prop);
        self
    }

    pub fn contains(&self, prop: &P) -> bool {
        self.props.contains(prop)
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &P> {
        self.props.iter()
    }
}

impl<P: Proposition> FromIterator<P> for PropositionSet<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            props: iter.into_iter().collect(),
        }
    }
}

impl<P: Proposition> Extend<P> for PropositionSet<P> {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        self.props.extend(iter);
    }
}

impl<P: Proposition> fmt::Display for PropositionSet<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, prop) in self.props.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(prop.name())?;
        }
        f.write_str("}")
    }
}
