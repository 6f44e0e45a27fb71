//! Counter vectors, counter modifiers and counter-state tagging.

use super::guard::CounterTag;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-length integer counter vector carried by the machine.
///
/// # Example
///
/// ```rust
/// use crm::core::{CounterModifier, CounterVector};
///
/// let c = CounterVector::zeros(2);
/// let c = CounterModifier::Increment(vec![1, 0]).apply(&c);
/// assert_eq!(c.as_slice(), &[1, 0]);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CounterVector(Vec<i64>);

impl CounterVector {
    pub fn new(values: Vec<i64>) -> Self {
        Self(values)
    }

    pub fn zeros(dim: usize) -> Self {
        Self(vec![0; dim])
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<i64> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied()
    }
}

impl From<Vec<i64>> for CounterVector {
    fn from(values: Vec<i64>) -> Self {
        Self(values)
    }
}

impl<const N: usize> From<[i64; N]> for CounterVector {
    fn from(values: [i64; N]) -> Self {
        Self(values.to_vec())
    }
}

impl fmt::Display for CounterVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", v)?;
        }
        f.write_str(")")
    }
}

/// Pure update applied to the counters when a rule fires.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterModifier {
    /// Copy the counters unchanged.
    #[default]
    Identity,

    /// Add the given deltas elementwise.
    Increment(Vec<i64>),

    /// Set every component to zero.
    Reset,

    /// Replace the counters with fixed values.
    Set(Vec<i64>),
}

impl CounterModifier {
    /// Vector length the modifier expects, if it is dimension-specific.
    pub fn dim(&self) -> Option<usize> {
        match self {
            CounterModifier::Identity | CounterModifier::Reset => None,
            CounterModifier::Increment(v) | CounterModifier::Set(v) => Some(v.len()),
        }
    }

    /// Apply the modifier.
    ///
    /// Dimensions are validated when the machine is built; an `Increment`
    /// shorter than the vector leaves the trailing components untouched.
    pub fn apply(&self, counters: &CounterVector) -> CounterVector {
        match self {
            CounterModifier::Identity => counters.clone(),
            CounterModifier::Reset => CounterVector::zeros(counters.dim()),
            CounterModifier::Set(values) => CounterVector::new(values.clone()),
            CounterModifier::Increment(deltas) => CounterVector::new(
                counters
                    .iter()
                    .enumerate()
                    .map(|(i, v)| v + deltas.get(i).copied().unwrap_or(0))
                    .collect(),
            ),
        }
    }
}

/// Maps a counter vector to the tag guards are compared against.
///
/// Implemented for any `Fn(&CounterVector) -> CounterTag`.
pub trait CounterTagger: Send + Sync {
    fn tag(&self, counters: &CounterVector) -> CounterTag;
}

impl<F> CounterTagger for F
where
    F: Fn(&CounterVector) -> CounterTag + Send + Sync,
{
    fn tag(&self, counters: &CounterVector) -> CounterTag {
        self(counters)
    }
}

/// Tagger for machines whose guards carry no tags.
#[derive(Clone, Copy, Debug, Default)]
pub struct UntaggedCounters;

impl UntaggedCounters {
    pub const TAG: &'static str = "-";
}

impl CounterTagger for UntaggedCounters {
    fn tag(&self, _counters: &CounterVector) -> CounterTag {
        CounterTag::new(Self::TAG)
    }
}
