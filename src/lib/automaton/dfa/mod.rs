use std::fmt::Debug;

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
    Direction,
};

use crate::{
    automaton::{Alphabet, AutomatonId, Language, StateRef, Symbol},
    error::{DfaError, Result},
};
use node::DfaNode;

pub mod dot;
pub mod equivalence;
pub mod minimization;
pub mod node;
pub mod serialization;

/// A deterministic finite automaton over a fixed alphabet.
///
/// States live in an arena and are identified by their insertion index, which
/// stays stable for the lifetime of the automaton. Each state carries a
/// unique label. Transitions are edges of the underlying graph, with at most
/// one outgoing edge per symbol.
pub struct DFA<S: Symbol> {
    id: AutomatonId,
    initial: Option<NodeIndex<u32>>,
    graph: DiGraph<DfaNode, S>,
    alphabet: Vec<S>,
    labels: HashMap<String, NodeIndex<u32>>,
}

impl<S: Symbol> DFA<S> {
    /// Creates an empty automaton. Repeated symbols in `alphabet` are dropped,
    /// keeping the first occurrence.
    pub fn new(alphabet: Vec<S>) -> Self {
        DFA {
            id: AutomatonId::fresh(),
            initial: None,
            graph: DiGraph::new(),
            alphabet: alphabet.into_iter().unique().collect(),
            labels: HashMap::new(),
        }
    }

    pub fn id(&self) -> AutomatonId {
        self.id
    }

    pub fn state_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn transition_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Adds a new state. The first state added becomes the initial state.
    pub fn add_state(&mut self, label: impl Into<String>, accepting: bool) -> Result<StateRef> {
        let label = label.into();
        if self.labels.contains_key(&label) {
            return Err(DfaError::DuplicateState(label));
        }

        let node = self.graph.add_node(DfaNode::new(accepting, label.clone()));
        self.labels.insert(label, node);

        if self.initial.is_none() {
            self.initial = Some(node);
        }

        Ok(self.state_ref(node))
    }

    pub fn set_initial(&mut self, state: StateRef) -> Result<()> {
        let node = self.member(state)?;
        self.initial = Some(node);

        Ok(())
    }

    pub fn initial(&self) -> Option<StateRef> {
        self.initial.map(|node| self.state_ref(node))
    }

    /// Adds the transition `from --symbol--> to`. An existing transition of
    /// `from` on `symbol` is replaced.
    pub fn add_transition(&mut self, from: StateRef, symbol: S, to: StateRef) -> Result<()> {
        let from = self.member(from)?;
        let to = self.member(to)?;

        if !self.alphabet.contains(&symbol) {
            return Err(DfaError::UnknownSymbol(symbol.to_string()));
        }

        let existing = self
            .graph
            .edges_directed(from, Direction::Outgoing)
            .find(|edge| *edge.weight() == symbol)
            .map(|edge| (edge.id(), edge.target()));

        match existing {
            Some((_, target)) if target == to => return Ok(()),
            Some((edge, target)) => {
                tracing::trace!(
                    "Replacing transition {:?} -{}-> {:?} with target {:?}",
                    from,
                    symbol,
                    target,
                    to
                );
                self.graph.remove_edge(edge);
            }
            None => {}
        }

        self.graph.add_edge(from, to, symbol);

        Ok(())
    }

    pub fn has_transition(&self, state: StateRef, symbol: &S) -> Result<bool> {
        let node = self.member(state)?;

        Ok(self.successor(node, symbol).is_some())
    }

    pub fn transition_target(&self, state: StateRef, symbol: &S) -> Result<StateRef> {
        let node = self.member(state)?;

        self.successor(node, symbol)
            .map(|target| self.state_ref(target))
            .ok_or_else(|| self.undefined_transition(node, symbol))
    }

    /// Checks if every state has a transition for every symbol of the
    /// alphabet.
    pub fn is_complete(&self) -> bool {
        self.graph.node_indices().all(|node| {
            self.alphabet
                .iter()
                .all(|letter| self.successor(node, letter).is_some())
        })
    }

    /// Iterates over all states in insertion order.
    pub fn states(&self) -> impl Iterator<Item = StateRef> + '_ {
        self.graph.node_indices().map(|node| self.state_ref(node))
    }

    /// Iterates over all transitions as `(from, symbol, to)`, ordered by source
    /// state and then by alphabet position.
    pub fn transitions(&self) -> impl Iterator<Item = (StateRef, &S, StateRef)> + '_ {
        self.graph.node_indices().flat_map(move |node| {
            self.alphabet.iter().filter_map(move |letter| {
                self.successor(node, letter)
                    .map(|target| (self.state_ref(node), letter, self.state_ref(target)))
            })
        })
    }

    pub fn label(&self, state: StateRef) -> Result<&str> {
        let node = self.member(state)?;

        Ok(self.graph[node].label())
    }

    pub fn is_accepting(&self, state: StateRef) -> Result<bool> {
        let node = self.member(state)?;

        Ok(self.graph[node].is_accepting())
    }

    pub fn state_by_label(&self, label: &str) -> Option<StateRef> {
        self.labels.get(label).map(|node| self.state_ref(*node))
    }

    pub fn index_of(&self, state: StateRef) -> Result<usize> {
        self.member(state).map(|node| node.index())
    }

    /// Adds a failure state if needed. This turns the DFA into a complete DFA:
    /// every missing transition is redirected to a new non-accepting state
    /// that loops on every symbol. Returns `None` if the DFA already was
    /// complete.
    pub fn add_sink_state(&mut self, label: impl Into<String>) -> Result<Option<StateRef>> {
        let mut missing = Vec::new();

        for node in self.graph.node_indices() {
            for letter in self.alphabet.iter() {
                if self.successor(node, letter).is_none() {
                    missing.push((node, letter.clone()));
                }
            }
        }

        if missing.is_empty() {
            return Ok(None);
        }

        let sink = self.add_state(label, false)?;

        for (node, letter) in missing {
            self.add_transition(self.state_ref(node), letter, sink)?;
        }

        for letter in self.alphabet.clone() {
            self.add_transition(sink, letter, sink)?;
        }

        Ok(Some(sink))
    }

    /// Creates a new DFA that only contains the states reachable from the
    /// initial state. The relative order of the remaining states is kept.
    pub fn reachable(&self) -> Result<DFA<S>> {
        let initial = self.initial.ok_or(DfaError::NoInitialState)?;

        let mut visited = HashSet::new();
        let mut stack = vec![initial];
        visited.insert(initial);

        while let Some(node) = stack.pop() {
            for edge in self.graph.edges_directed(node, Direction::Outgoing) {
                if visited.insert(edge.target()) {
                    stack.push(edge.target());
                }
            }
        }

        let mut reachable = DFA::new(self.alphabet.clone());
        let mut state_map = HashMap::new();

        for node in self.graph.node_indices().filter(|n| visited.contains(n)) {
            let data = &self.graph[node];
            let state = reachable.add_state(data.label.clone(), data.accepting)?;
            state_map.insert(node, state);
        }

        reachable.set_initial(state_map[&initial])?;

        for edge in self.graph.edge_references() {
            if let (Some(from), Some(to)) =
                (state_map.get(&edge.source()), state_map.get(&edge.target()))
            {
                reachable.add_transition(*from, edge.weight().clone(), *to)?;
            }
        }

        Ok(reachable)
    }

    /// The successor table of the automaton. Entry `[i][k]` is the index of the
    /// state reached from state `i` on the `k`-th symbol of the alphabet.
    pub(crate) fn successor_table(&self) -> Result<Vec<Vec<usize>>> {
        self.graph
            .node_indices()
            .map(|node| {
                self.alphabet
                    .iter()
                    .map(|letter| {
                        self.successor(node, letter)
                            .map(|target| target.index())
                            .ok_or_else(|| self.undefined_transition(node, letter))
                    })
                    .collect()
            })
            .collect()
    }

    pub(crate) fn node_data(&self, index: usize) -> &DfaNode {
        &self.graph[NodeIndex::new(index)]
    }

    pub(crate) fn state_at(&self, index: usize) -> StateRef {
        self.state_ref(NodeIndex::new(index))
    }

    fn successor(&self, node: NodeIndex<u32>, symbol: &S) -> Option<NodeIndex<u32>> {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .find(|edge| edge.weight() == symbol)
            .map(|edge| edge.target())
    }

    fn state_ref(&self, node: NodeIndex<u32>) -> StateRef {
        StateRef::new(self.id, node)
    }

    /// Validates that `state` is a handle into this automaton.
    fn member(&self, state: StateRef) -> Result<NodeIndex<u32>> {
        if state.owner() != self.id || state.index() >= self.graph.node_count() {
            return Err(DfaError::NotMember);
        }

        Ok(state.node())
    }

    fn undefined_transition(&self, node: NodeIndex<u32>, symbol: &S) -> DfaError {
        DfaError::UndefinedTransition {
            state: self.graph[node].label.clone(),
            symbol: symbol.to_string(),
        }
    }
}

impl<S: Symbol> Alphabet for DFA<S> {
    type Letter = S;

    fn alphabet(&self) -> &[S] {
        &self.alphabet
    }
}

impl<S: Symbol> Language for DFA<S> {
    fn accepts<'a>(&self, input: impl IntoIterator<Item = &'a S>) -> Result<bool>
    where
        S: 'a,
    {
        let mut current = self.initial.ok_or(DfaError::NoInitialState)?;

        for symbol in input {
            current = self
                .successor(current, symbol)
                .ok_or_else(|| self.undefined_transition(current, symbol))?;
        }

        Ok(self.graph[current].accepting)
    }
}

/// Cloning creates an independent automaton with its own identity, so state
/// handles of the original are not valid for the clone.
impl<S: Symbol> Clone for DFA<S> {
    fn clone(&self) -> Self {
        DFA {
            id: AutomatonId::fresh(),
            initial: self.initial,
            graph: self.graph.clone(),
            alphabet: self.alphabet.clone(),
            labels: self.labels.clone(),
        }
    }
}

impl<S: Symbol> Debug for DFA<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DFA")
            .field("alphabet", &self.alphabet)
            .field("state_count", &self.graph.node_count())
            .field(
                "states",
                &self
                    .graph
                    .node_indices()
                    .map(|node| (&self.graph[node].label, node.index()))
                    .collect_vec(),
            )
            .field("initial_state", &self.initial.map(|node| node.index()))
            .field(
                "final_states",
                &self
                    .graph
                    .node_indices()
                    .filter(|node| self.graph[*node].accepting)
                    .map(|node| node.index())
                    .collect_vec(),
            )
            .field("edge_count", &self.graph.edge_count())
            .field(
                "edges",
                &self
                    .graph
                    .edge_references()
                    .map(|edge| {
                        format!(
                            "{} --- {} --> {}",
                            self.graph[edge.source()].label,
                            edge.weight(),
                            self.graph[edge.target()].label
                        )
                    })
                    .collect_vec(),
            )
            .finish()
    }
}
