//! Propositional formulas over a proposition alphabet.
//!
//! Formulas are compiled once, when a machine is built, and evaluated on
//! every step against the labelled proposition set.

use super::proposition::{Proposition, PropositionSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Boolean expression tree over propositions.
///
/// # Example
///
/// ```rust
/// use crm::core::{Formula, PropositionSet};
/// use crm::propositions;
///
/// propositions! {
///     enum Event {
///         Grasp => "GRASP",
///         VelocityLow => "VELOCITY_LOW",
///     }
/// }
///
/// let formula = Formula::atom(Event::Grasp).and(Formula::atom(Event::VelocityLow));
/// let props = PropositionSet::new().with(Event::Grasp);
///
/// assert!(!formula.eval(&props));
/// assert!(formula.eval(&props.with(Event::VelocityLow)));
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum Formula<P: Proposition> {
    True,
    False,
    Atom(P),
    Not(Box<Formula<P>>),
    And(Box<Formula<P>>, Box<Formula<P>>),
    Or(Box<Formula<P>>, Box<Formula<P>>),
}

impl<P: Proposition> Formula<P> {
    pub fn atom(prop: P) -> Self {
        Formula::Atom(prop)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Formula::Not(Box::new(self))
    }

    pub fn and(self, rhs: Formula<P>) -> Self {
        Formula::And(Box::new(self), Box::new(rhs))
    }

    pub fn or(self, rhs: Formula<P>) -> Self {
        Formula::Or(Box::new(self), Box::new(rhs))
    }

    /// Evaluate against the propositions that currently hold.
    pub fn eval(&self, props: &PropositionSet<P>) -> bool {
        match self {
            Formula::True => true,
            Formula::False => false,
            Formula::Atom(p) => props.contains(p),
            Formula::Not(f) => !f.eval(props),
            Formula::And(l, r) => l.eval(props) && r.eval(props),
            Formula::Or(l, r) => l.eval(props) || r.eval(props),
        }
    }

    /// Propositions mentioned anywhere in the formula.
    pub fn atoms(&self) -> Vec<P> {
        let mut out = Vec::new();
        self.collect_atoms(&mut out);
        out.sort();
        out.dedup();
        out
    }

    fn collect_atoms(&self, out: &mut Vec<P>) {
        match self {
            Formula::True | Formula::False => {}
            Formula::Atom(p) => out.push(*p),
            Formula::Not(f) => f.collect_atoms(out),
            Formula::And(l, r) | Formula::Or(l, r) => {
                l.collect_atoms(out);
                r.collect_atoms(out);
            }
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Formula::Or(..) => 1,
            Formula::And(..) => 2,
            Formula::Not(_) => 3,
            Formula::True | Formula::False | Formula::Atom(_) => 4,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl<P: Proposition> fmt::Display for Formula<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::True => f.write_str("true"),
            Formula::False => f.write_str("false"),
            Formula::Atom(p) => f.write_str(p.name()),
            Formula::Not(inner) => {
                f.write_str("not ")?;
                inner.fmt_operand(f, 3)
            }
            Formula::And(l, r) => {
                l.fmt_operand(f, 2)?;
                f.write_str(" and ")?;
                r.fmt_operand(f, 3)
            }
            Formula::Or(l, r) => {
                l.fmt_operand(f, 1)?;
                f.write_str(" or ")?;
                r.fmt_operand(f, 2)
            }
        }
    }
}
