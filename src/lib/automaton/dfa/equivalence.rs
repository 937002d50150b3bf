use std::{collections::VecDeque, fmt::Display};

use hashbrown::HashMap;
use itertools::Itertools;
use ndarray::Array2;
use petgraph::unionfind::UnionFind;

use crate::{
    automaton::{dfa::DFA, StateRef, Symbol},
    error::{DfaError, Result},
};

/// Represents the table used to find equivalent states of a complete DFA.
///
/// For every unordered pair of states `(i, j)` with `i < j` the table stores
/// whether the two states have been proven distinguishable, and the list of
/// pairs whose distinguishability follows from the distinguishability of
/// `(i, j)`. States are indexed by their insertion index. Only the upper
/// triangle of both matrices is used.
#[derive(Debug, Clone)]
pub struct EquivalenceTable {
    distinguishable: Array2<bool>,
    dependents: Array2<Vec<(usize, usize)>>,
}

impl EquivalenceTable {
    fn new(state_count: usize) -> Self {
        EquivalenceTable {
            distinguishable: Array2::from_elem((state_count, state_count), false),
            dependents: Array2::from_elem((state_count, state_count), Vec::new()),
        }
    }

    /// Fills the table for `dfa`. Fails if the DFA is not complete.
    pub fn build<S: Symbol>(dfa: &DFA<S>) -> Result<Self> {
        if !dfa.is_complete() {
            return Err(DfaError::IncompleteAutomaton);
        }

        let state_count = dfa.state_count();
        let _span = tracing::debug_span!("EquivalenceTable::build", state_count).entered();

        let successors = dfa.successor_table()?;
        let mut table = EquivalenceTable::new(state_count);

        // mark all pairs of states where exactly one of them is accepting
        for (i, j) in (0..state_count).tuple_combinations::<(usize, usize)>() {
            if dfa.node_data(i).accepting != dfa.node_data(j).accepting {
                table.distinguishable[[i, j]] = true;
            }
        }

        for (i, j) in (0..state_count).tuple_combinations::<(usize, usize)>() {
            if table.distinguishable[[i, j]] {
                continue;
            }

            let targets = successors[i]
                .iter()
                .zip(successors[j].iter())
                .map(|(&m, &n)| ordered(m, n))
                .filter(|(m, n)| m != n)
                .unique()
                .collect_vec();

            if targets
                .iter()
                .any(|&(m, n)| table.distinguishable[[m, n]])
            {
                table.mark(i, j);
            } else {
                // (i, j) can not be decided yet, remember that it becomes
                // distinguishable as soon as one of its successor pairs does
                for (m, n) in targets {
                    if (m, n) != (i, j) {
                        table.dependents[[m, n]].push((i, j));
                    }
                }
            }
        }

        tracing::debug!(
            "Found {} pairs of equivalent states",
            table.equivalent_pairs().len()
        );

        Ok(table)
    }

    /// Marks `(i, j)` and everything that depends on it as distinguishable.
    /// A pair is only enqueued if it was not marked before, so every pair is
    /// processed at most once even if the dependencies form cycles.
    fn mark(&mut self, i: usize, j: usize) {
        let start = ordered(i, j);
        if self.distinguishable[[start.0, start.1]] {
            return;
        }

        self.distinguishable[[start.0, start.1]] = true;
        let mut queue = VecDeque::from([start]);

        while let Some((p, q)) = queue.pop_front() {
            for &(a, b) in self.dependents[[p, q]].iter() {
                if !self.distinguishable[[a, b]] {
                    self.distinguishable[[a, b]] = true;
                    queue.push_back((a, b));
                }
            }
        }
    }

    pub fn state_count(&self) -> usize {
        self.distinguishable.nrows()
    }

    /// Whether states `i` and `j` have been proven distinguishable. A state is
    /// never distinguishable from itself.
    ///
    /// Panics if either index is out of range.
    pub fn is_distinguishable(&self, i: usize, j: usize) -> bool {
        assert!(
            i < self.state_count() && j < self.state_count(),
            "State index out of range"
        );

        let (i, j) = ordered(i, j);
        i != j && self.distinguishable[[i, j]]
    }

    /// The pairs that were registered to become distinguishable once `(i, j)`
    /// becomes distinguishable.
    pub fn dependents(&self, i: usize, j: usize) -> &[(usize, usize)] {
        let (i, j) = ordered(i, j);
        &self.dependents[[i, j]]
    }

    /// All pairs `(i, j)` with `i < j` of equivalent states.
    pub fn equivalent_pairs(&self) -> Vec<(usize, usize)> {
        (0..self.state_count())
            .tuple_combinations::<(usize, usize)>()
            .filter(|&(i, j)| !self.distinguishable[[i, j]])
            .collect()
    }

    /// Partitions the states into equivalence classes. Classes are ordered by
    /// their smallest member and members are sorted ascending. States without
    /// any equivalent partner form singleton classes.
    pub fn classes(&self) -> Vec<Vec<usize>> {
        let mut union_find = UnionFind::new(self.state_count());

        for (i, j) in self.equivalent_pairs() {
            union_find.union(i, j);
        }

        let mut class_index = HashMap::new();
        let mut classes: Vec<Vec<usize>> = Vec::new();

        for (state, representative) in union_find.into_labeling().into_iter().enumerate() {
            let class = *class_index.entry(representative).or_insert_with(|| {
                classes.push(Vec::new());
                classes.len() - 1
            });

            classes[class].push(state);
        }

        classes
    }
}

/// Renders the lower triangle of the table. `x` marks distinguishable pairs,
/// `.` marks equivalent pairs.
impl Display for EquivalenceTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 1..self.state_count() {
            let row = (0..i)
                .map(|j| {
                    if self.is_distinguishable(i, j) {
                        "x"
                    } else {
                        "."
                    }
                })
                .join(" ");

            writeln!(f, "{:>3} | {}", i, row)?;
        }

        Ok(())
    }
}

fn ordered(i: usize, j: usize) -> (usize, usize) {
    if i <= j {
        (i, j)
    } else {
        (j, i)
    }
}

impl<S: Symbol> DFA<S> {
    pub fn equivalence_table(&self) -> Result<EquivalenceTable> {
        EquivalenceTable::build(self)
    }

    /// All unordered pairs of distinct, behaviorally equivalent states. The
    /// state inserted first is the first element of each pair.
    pub fn equivalent_state_pairs(&self) -> Result<Vec<(StateRef, StateRef)>> {
        Ok(self
            .equivalence_table()?
            .equivalent_pairs()
            .into_iter()
            .map(|(i, j)| (self.state_at(i), self.state_at(j)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The pair (0, 1) can only be decided through (1, 2), which is marked
    /// after (0, 1) was visited.
    fn delayed_dependency_dfa() -> DFA<char> {
        let mut dfa = DFA::new(vec!['a', 'b']);
        let q0 = dfa.add_state("q0", false).unwrap();
        let q1 = dfa.add_state("q1", false).unwrap();
        let q2 = dfa.add_state("q2", false).unwrap();
        let q3 = dfa.add_state("q3", true).unwrap();

        dfa.add_transition(q0, 'a', q1).unwrap();
        dfa.add_transition(q0, 'b', q2).unwrap();
        dfa.add_transition(q1, 'a', q2).unwrap();
        dfa.add_transition(q1, 'b', q1).unwrap();
        dfa.add_transition(q2, 'a', q1).unwrap();
        dfa.add_transition(q2, 'b', q3).unwrap();
        dfa.add_transition(q3, 'a', q3).unwrap();
        dfa.add_transition(q3, 'b', q3).unwrap();

        dfa
    }

    #[test]
    fn test_mark_propagates_through_dependents() {
        let table = EquivalenceTable::build(&delayed_dependency_dfa()).unwrap();

        // (0, 1) was registered as a dependent of (1, 2) before it got marked
        assert!(table.dependents(1, 2).contains(&(0, 1)));
        assert!(table.dependents(2, 1).contains(&(0, 1)));

        for (i, j) in (0..4).tuple_combinations::<(usize, usize)>() {
            assert!(table.is_distinguishable(i, j), "({i}, {j}) must be marked");
        }
        assert!(table.equivalent_pairs().is_empty());
    }

    #[test]
    fn test_mark_is_idempotent() {
        let mut table = EquivalenceTable::new(3);
        table.dependents[[0, 1]].push((1, 2));
        table.dependents[[1, 2]].push((0, 1));

        table.mark(1, 0);
        table.mark(0, 1);

        assert!(table.is_distinguishable(0, 1));
        assert!(table.is_distinguishable(2, 1));
        assert!(!table.is_distinguishable(0, 2));
        assert!(!table.is_distinguishable(2, 2));
    }

    #[test]
    fn test_classes() {
        let mut table = EquivalenceTable::new(5);
        for (i, j) in [(0, 1), (0, 3), (1, 3), (0, 2), (1, 2), (2, 3), (0, 4)] {
            table.distinguishable[[i, j]] = true;
        }

        // equivalent pairs are (1, 4), (2, 4), (3, 4)
        assert_eq!(table.equivalent_pairs(), vec![(1, 4), (2, 4), (3, 4)]);
        assert_eq!(table.classes(), vec![vec![0], vec![1, 2, 3, 4]]);
    }

    #[test]
    fn test_display() {
        let mut table = EquivalenceTable::new(3);
        table.distinguishable[[0, 2]] = true;
        table.distinguishable[[1, 2]] = true;

        assert_eq!(table.to_string(), "  1 | .\n  2 | x x\n");
    }

    #[test]
    fn test_incomplete_dfa_is_rejected() {
        let mut dfa = DFA::new(vec!['a']);
        dfa.add_state("q0", false).unwrap();

        assert!(matches!(
            EquivalenceTable::build(&dfa),
            Err(DfaError::IncompleteAutomaton)
        ));
    }
}
