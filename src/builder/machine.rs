//! Builder for constructing counting reward machines.

use crate::builder::error::BuildError;
use crate::builder::rule::RuleBuilder;
use crate::core::{CounterTagger, CounterVector, Proposition, StateId, UntaggedCounters};
use crate::machine::{CounterSampler, CountingRewardMachine, FixedConfigurations, TransitionRule};
use crate::validation::{MachineDraft, MachineRules};
use std::collections::BTreeSet;
use std::sync::Arc;
use stillwater::validation::Validation;
use tracing::debug;

/// Builder for constructing machines with a fluent API.
///
/// Rules added for the same source state keep their insertion order, which
/// is the order guards are tried in.
pub struct MachineBuilder<P: Proposition, O, A> {
    state_names: Vec<String>,
    initial: Option<StateId>,
    initial_counters: CounterVector,
    terminal_states: BTreeSet<StateId>,
    rules: Vec<(StateId, TransitionRule<P, O, A>)>,
    tagger: Option<Arc<dyn CounterTagger>>,
    sampler: Option<Arc<dyn CounterSampler>>,
    validation: MachineRules<P, O, A>,
}

impl<P: Proposition, O, A> MachineBuilder<P, O, A> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            state_names: Vec::new(),
            initial: None,
            initial_counters: CounterVector::zeros(0),
            terminal_states: BTreeSet::new(),
            rules: Vec::new(),
            tagger: None,
            sampler: None,
            validation: MachineRules::new(),
        }
    }

    /// Declare the states `U`; state `i` gets `StateId::new(i)`.
    pub fn states<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: StateId) -> Self {
        self.initial = Some(state);
        self
    }

    /// Set the initial counters; their length fixes the counter dimension.
    pub fn initial_counters(mut self, counters: CounterVector) -> Self {
        self.initial_counters = counters;
        self
    }

    /// Mark a state as terminal.
    pub fn terminal(mut self, state: StateId) -> Self {
        self.terminal_states.insert(state);
        self
    }

    /// Set the counter-state tagger used by tagged guards.
    pub fn tagger(mut self, tagger: impl CounterTagger + 'static) -> Self {
        self.tagger = Some(Arc::new(tagger));
        self
    }

    /// Set a tagger that is already shared with other machines.
    pub fn shared_tagger(mut self, tagger: Arc<dyn CounterTagger>) -> Self {
        self.tagger = Some(tagger);
        self
    }

    /// Set the counter configuration sampler.
    /// Defaults to replaying only the initial counters.
    pub fn sampler(mut self, sampler: impl CounterSampler + 'static) -> Self {
        self.sampler = Some(Arc::new(sampler));
        self
    }

    /// Add a rule using a builder.
    /// Returns an error if the builder fails validation.
    pub fn rule(mut self, builder: RuleBuilder<P, O, A>) -> Result<Self, BuildError> {
        let (from, rule) = builder.build()?;
        self.rules.push((from, rule));
        Ok(self)
    }

    /// Add a pre-built rule.
    pub fn add_rule(mut self, from: StateId, rule: TransitionRule<P, O, A>) -> Self {
        self.rules.push((from, rule));
        self
    }

    /// Add multiple rules of one source state at once.
    pub fn rules(mut self, from: StateId, rules: Vec<TransitionRule<P, O, A>>) -> Self {
        self.rules.extend(rules.into_iter().map(|r| (from, r)));
        self
    }

    /// Add extra validation on top of the structural checks.
    pub fn validate_with(mut self, rules: MachineRules<P, O, A>) -> Self {
        self.validation.required_checks.extend(rules.required_checks);
        self
    }

    /// Build the machine.
    /// Returns an error listing every violation if the definition is invalid.
    pub fn build(self) -> Result<CountingRewardMachine<P, O, A>, BuildError> {
        let initial_state = self.initial.ok_or(BuildError::MissingInitialState)?;

        let draft = MachineDraft {
            state_names: self.state_names,
            initial_state,
            initial_counters: self.initial_counters,
            terminal_states: self.terminal_states,
            rules: self.rules,
            has_tagger: self.tagger.is_some(),
        };

        if let Validation::Failure(errors) = self.validation.validate(&draft) {
            return Err(BuildError::InvalidMachine {
                violations: errors.iter().cloned().collect(),
            });
        }

        let mut rules: Vec<Vec<TransitionRule<P, O, A>>> =
            (0..draft.num_states()).map(|_| Vec::new()).collect();
        for (from, rule) in draft.rules {
            rules[from.index()].push(rule);
        }

        let sampler = self.sampler.unwrap_or_else(|| {
            Arc::new(FixedConfigurations::new(vec![draft.initial_counters.clone()]))
                as Arc<dyn CounterSampler>
        });
        let tagger = self
            .tagger
            .unwrap_or_else(|| Arc::new(UntaggedCounters) as Arc<dyn CounterTagger>);

        debug!(
            states = draft.state_names.len(),
            rules = rules.iter().map(Vec::len).sum::<usize>(),
            counter_dim = draft.initial_counters.dim(),
            "built counting reward machine"
        );

        Ok(CountingRewardMachine {
            state_names: draft.state_names,
            initial_state: draft.initial_state,
            initial_counters: draft.initial_counters,
            terminal_states: draft.terminal_states,
            rules,
            tagger,
            sampler,
        })
    }
}

impl<P: Proposition, O, A> Default for MachineBuilder<P, O, A> {
    fn default() -> Self {
        Self::new()
    }
}
