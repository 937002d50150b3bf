use std::{
    fmt::{Debug, Display},
    hash::Hash,
    sync::atomic::{AtomicU64, Ordering},
};

use petgraph::graph::NodeIndex;

use crate::error::Result;

pub mod dfa;

/// This trait represents types that can be used as input symbols of an
/// automaton. `Display` is used whenever a symbol needs to be rendered as
/// text, e.g. in error messages or graphviz output.
pub trait Symbol: Debug + Display + Clone + PartialEq + Eq + Hash + Ord {}
impl<T> Symbol for T where T: Debug + Display + Clone + PartialEq + Eq + Hash + Ord {}

pub trait Alphabet {
    type Letter: Symbol;

    fn alphabet(&self) -> &[Self::Letter];
}

/// The basic trait for anything that defines a language over a set alphabet.
pub trait Language: Alphabet {
    fn accepts<'a>(&self, input: impl IntoIterator<Item = &'a Self::Letter>) -> Result<bool>
    where
        Self::Letter: 'a;
}

/// Identity of a single automaton instance. Every automaton gets a fresh id on
/// construction, so handles of one automaton can never be used with another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AutomatonId(u64);

impl AutomatonId {
    pub(crate) fn fresh() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);

        AutomatonId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A handle to a state of a specific automaton.
///
/// The handle stores the id of the owning automaton and the insertion index
/// of the state. Automata validate both before using a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateRef {
    owner: AutomatonId,
    node: NodeIndex<u32>,
}

impl StateRef {
    pub(crate) fn new(owner: AutomatonId, node: NodeIndex<u32>) -> Self {
        StateRef { owner, node }
    }

    /// The insertion index of the state within its automaton.
    pub fn index(&self) -> usize {
        self.node.index()
    }

    pub fn owner(&self) -> AutomatonId {
        self.owner
    }

    pub(crate) fn node(&self) -> NodeIndex<u32> {
        self.node
    }
}
