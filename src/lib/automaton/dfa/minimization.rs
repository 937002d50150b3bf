use std::borrow::Cow;

use itertools::Itertools;

use crate::{
    automaton::{
        dfa::{equivalence::EquivalenceTable, DFA},
        Alphabet, Symbol,
    },
    config::MinimizeConfig,
    error::{DfaError, Result},
};

pub trait Minimizable: Clone {
    /// Builds the minimal automaton by merging every class of equivalent
    /// states into a single state. If there is nothing to merge, `self` is
    /// returned borrowed.
    fn minimize(&self) -> Result<Cow<'_, Self>> {
        self.minimize_with(&MinimizeConfig::default())
    }

    fn minimize_with(&self, config: &MinimizeConfig) -> Result<Cow<'_, Self>>;
}

impl<S: Symbol> Minimizable for DFA<S> {
    fn minimize_with(&self, config: &MinimizeConfig) -> Result<Cow<'_, Self>> {
        if !self.is_complete() {
            return Err(DfaError::IncompleteAutomaton);
        }

        if *config.get_prune_unreachable() && self.initial().is_some() {
            let reachable = self.reachable()?;

            if reachable.state_count() < self.state_count() {
                tracing::debug!(
                    "Removed {} unreachable states",
                    self.state_count() - reachable.state_count()
                );

                let table = EquivalenceTable::build(&reachable)?;
                return Ok(Cow::Owned(
                    quotient(&reachable, &table)?.unwrap_or(reachable),
                ));
            }
        }

        self.minimize_by(&EquivalenceTable::build(self)?)
    }
}

impl<S: Symbol> DFA<S> {
    /// Owned version of [`Minimizable::minimize`].
    pub fn minimized(&self) -> Result<DFA<S>> {
        Ok(self.minimize()?.into_owned())
    }

    /// Merges the equivalence classes of an already computed `table`, which
    /// must have been built for this automaton. A table with a different
    /// number of states is rejected with [`DfaError::NotMember`].
    pub fn minimize_by(&self, table: &EquivalenceTable) -> Result<Cow<'_, Self>> {
        if table.state_count() != self.state_count() {
            return Err(DfaError::NotMember);
        }

        Ok(match quotient(self, table)? {
            Some(minimized) => Cow::Owned(minimized),
            None => Cow::Borrowed(self),
        })
    }
}

/// Builds the quotient automaton of `dfa` under the equivalence classes of
/// `table`. Returns `None` if every class is a singleton.
///
/// Each class becomes one state, created in the order of the classes'
/// smallest members. Singleton classes keep their label. Larger classes are
/// labelled with the labels of their members joined by `_`, in insertion
/// order. Accepting flag and transitions are taken from the smallest member.
fn quotient<S: Symbol>(dfa: &DFA<S>, table: &EquivalenceTable) -> Result<Option<DFA<S>>> {
    let _span = tracing::debug_span!("quotient", state_count = dfa.state_count()).entered();

    let classes = table.classes();
    if classes.len() == dfa.state_count() {
        tracing::debug!("DFA is already minimal");
        return Ok(None);
    }

    let mut class_of = vec![0; dfa.state_count()];
    for (class, members) in classes.iter().enumerate() {
        for &member in members {
            class_of[member] = class;
        }
    }

    let mut minimized = DFA::new(dfa.alphabet().to_vec());
    let mut class_states = Vec::with_capacity(classes.len());

    for members in classes.iter() {
        let representative = dfa.node_data(members[0]);

        let label = if members.len() == 1 {
            representative.label.clone()
        } else {
            let mut label = members
                .iter()
                .map(|&member| dfa.node_data(member).label())
                .join("_");

            // the joined label may already be taken by another state
            while dfa.state_by_label(&label).is_some()
                || minimized.state_by_label(&label).is_some()
            {
                label.push('\'');
            }

            tracing::trace!("Merging {} states into {}", members.len(), label);
            label
        };

        class_states.push(minimized.add_state(label, representative.accepting)?);
    }

    if let Some(initial) = dfa.initial() {
        minimized.set_initial(class_states[class_of[initial.index()]])?;
    }

    let successors = dfa.successor_table()?;
    for (class, members) in classes.iter().enumerate() {
        for (letter, &target) in dfa.alphabet().iter().zip(successors[members[0]].iter()) {
            minimized.add_transition(
                class_states[class],
                letter.clone(),
                class_states[class_of[target]],
            )?;
        }
    }

    tracing::debug!(
        "Minimized DFA from {} to {} states",
        dfa.state_count(),
        minimized.state_count()
    );

    Ok(Some(minimized))
}
