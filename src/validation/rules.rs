//! Structural checks for machine definitions using Validation.

use crate::core::{Proposition, StateId};
use crate::validation::context::MachineDraft;
use crate::validation::violations::ViolationError;
use std::collections::BTreeSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for validation check functions
pub type ValidationCheck<P, O, A> =
    Box<dyn Fn(&MachineDraft<P, O, A>) -> Validation<(), NonEmptyVec<ViolationError>> + Send + Sync>;

fn check(condition: bool, violation: impl FnOnce() -> ViolationError) -> Validation<(), NonEmptyVec<ViolationError>> {
    if condition {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

/// Validation rules for machine definitions.
/// Uses Validation to accumulate ALL violations.
pub struct MachineRules<P: Proposition, O, A> {
    pub(crate) required_checks: Vec<ValidationCheck<P, O, A>>,
}

impl<P: Proposition, O, A> Default for MachineRules<P, O, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Proposition, O, A> MachineRules<P, O, A> {
    pub fn new() -> Self {
        Self {
            required_checks: Vec::new(),
        }
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&MachineDraft<P, O, A>) -> Validation<(), NonEmptyVec<ViolationError>>
            + Send
            + Sync
            + 'static,
    {
        self.required_checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate check with error message
    pub fn require_pred<F>(mut self, predicate: F, error_msg: String) -> Self
    where
        F: Fn(&MachineDraft<P, O, A>) -> bool + Send + Sync + 'static,
    {
        let check = move |draft: &MachineDraft<P, O, A>| {
            if predicate(draft) {
                Validation::success(())
            } else {
                Validation::fail(ViolationError::CustomCheckFailed {
                    message: error_msg.clone(),
                })
            }
        };
        self.required_checks.push(Box::new(check));
        self
    }

    /// Run the structural checks and every custom check, accumulating ALL
    /// violations.
    pub fn validate(&self, draft: &MachineDraft<P, O, A>) -> Validation<(), NonEmptyVec<ViolationError>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ViolationError>>> = Vec::new();
        let num_states = draft.num_states();
        let dim = draft.initial_counters.dim();

        checks.push(check(num_states > 0, || ViolationError::NoStates));

        let mut seen = BTreeSet::new();
        for name in &draft.state_names {
            checks.push(check(seen.insert(name.as_str()), || {
                ViolationError::DuplicateStateName(name.clone())
            }));
        }

        checks.push(check(draft.contains(draft.initial_state), || {
            ViolationError::UnknownState {
                context: "Initial state".to_string(),
                state: draft.initial_state,
                num_states,
            }
        }));

        for &state in &draft.terminal_states {
            checks.push(check(draft.contains(state), || ViolationError::UnknownState {
                context: "Terminal state".to_string(),
                state,
                num_states,
            }));
        }

        for (position, (from, rule)) in draft.rules.iter().enumerate() {
            checks.push(check(draft.contains(*from), || ViolationError::UnknownState {
                context: format!("Source of rule #{}", position),
                state: *from,
                num_states,
            }));
            checks.push(check(draft.contains(rule.to), || ViolationError::UnknownState {
                context: format!("Destination of rule #{}", position),
                state: rule.to,
                num_states,
            }));
            if let Some(found) = rule.modifier.dim() {
                checks.push(check(found == dim, || ViolationError::CounterDimension {
                    context: format!("Modifier of rule #{}", position),
                    expected: dim,
                    found,
                }));
            }
        }

        for state in (0..num_states).map(StateId::new) {
            let mut count = 0;
            for (index, rule) in draft.rules_of(state) {
                count += 1;
                if let Some(tag) = rule.guard.tag() {
                    checks.push(check(draft.has_tagger, || ViolationError::TagWithoutTagger {
                        state,
                        rule: index,
                        tag: tag.clone(),
                    }));
                }
            }
            checks.push(check(
                count > 0 || draft.terminal_states.contains(&state),
                || ViolationError::NoRules(state),
            ));
        }

        for check_fn in &self.required_checks {
            checks.push(check_fn(draft));
        }

        // Accumulate ALL failures using all_vec
        Validation::all_vec(checks).map(|_| ())
    }
}
