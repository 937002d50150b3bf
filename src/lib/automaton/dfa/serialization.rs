use std::{collections::BTreeMap, path::Path};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    automaton::{dfa::DFA, Alphabet, StateRef, Symbol},
    error::{DfaError, Result},
};

/// The structural interchange form of a DFA.
///
/// ```json
/// {
///   "alphabet": ["a", "b"],
///   "initial": "q0",
///   "states": [
///     { "id": "q0", "accepting": false, "transitions": { "a": "q1", "b": "q0" } },
///     { "id": "q1", "accepting": true, "transitions": { "a": "q1", "b": "q0" } }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfaSpec<S: Symbol> {
    pub alphabet: Vec<S>,
    pub initial: Option<String>,
    pub states: Vec<StateSpec<S>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Symbol + Deserialize<'de>"))]
pub struct StateSpec<S: Symbol> {
    pub id: String,
    pub accepting: bool,
    #[serde(default)]
    pub transitions: BTreeMap<S, String>,
}

impl<S: Symbol> From<&DFA<S>> for DfaSpec<S> {
    fn from(dfa: &DFA<S>) -> Self {
        let states = dfa
            .states()
            .map(|state| {
                let node = dfa.node_data(state.index());
                let transitions = dfa
                    .alphabet()
                    .iter()
                    .filter_map(|letter| {
                        let target = dfa.transition_target(state, letter).ok()?;
                        Some((letter.clone(), dfa.node_data(target.index()).label.clone()))
                    })
                    .collect();

                StateSpec {
                    id: node.label.clone(),
                    accepting: node.accepting,
                    transitions,
                }
            })
            .collect();

        DfaSpec {
            alphabet: dfa.alphabet().to_vec(),
            initial: dfa
                .initial()
                .map(|initial| dfa.node_data(initial.index()).label.clone()),
            states,
        }
    }
}

impl<S: Symbol> TryFrom<DfaSpec<S>> for DFA<S> {
    type Error = DfaError;

    /// States are created first, then the transitions, then the initial state
    /// is set. Without an `initial` entry the first state is the initial one.
    fn try_from(spec: DfaSpec<S>) -> Result<Self> {
        let mut dfa = DFA::new(spec.alphabet);

        for state in spec.states.iter() {
            dfa.add_state(state.id.clone(), state.accepting)?;
        }

        for state in spec.states {
            let from = dfa.lookup(&state.id)?;

            for (symbol, target) in state.transitions {
                let to = dfa.lookup(&target)?;
                dfa.add_transition(from, symbol, to)?;
            }
        }

        if let Some(initial) = spec.initial {
            let initial = dfa.lookup(&initial)?;
            dfa.set_initial(initial)?;
        }

        Ok(dfa)
    }
}

impl<S: Symbol> DFA<S> {
    pub fn to_spec(&self) -> DfaSpec<S> {
        DfaSpec::from(self)
    }

    pub fn from_spec(spec: DfaSpec<S>) -> Result<Self> {
        DFA::try_from(spec)
    }

    fn lookup(&self, label: &str) -> Result<StateRef> {
        self.state_by_label(label)
            .ok_or_else(|| DfaError::UnknownStateReference(label.to_string()))
    }
}

impl<S: Symbol + Serialize> DFA<S> {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_spec())?)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        Ok(std::fs::write(path, self.to_json()?)?)
    }
}

impl<S: Symbol + DeserializeOwned> DFA<S> {
    pub fn from_json(json: &str) -> Result<Self> {
        DFA::from_spec(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        DFA::from_json(&json)
    }
}
