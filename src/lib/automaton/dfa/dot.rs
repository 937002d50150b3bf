use crate::automaton::{dfa::DFA, Symbol};

impl<S: Symbol> DFA<S> {
    /// Renders the automaton as a graphviz digraph.
    ///
    /// Nodes are named `s_0, s_1, ...` in state order so the output is valid
    /// whatever characters the state labels contain. The labels themselves
    /// are attached as escaped `label` attributes. Accepting states are drawn
    /// as double circles.
    pub fn to_graphviz(&self) -> String {
        let mut dot = String::new();
        dot.push_str("digraph {\n");

        for state in self.states() {
            let node = self.node_data(state.index());
            let shape = if node.accepting {
                "doublecircle"
            } else {
                "circle"
            };

            dot.push_str(&format!(
                "    s_{} [label=\"{}\", shape=\"{}\"];\n",
                state.index(),
                escape(node.label()),
                shape
            ));
        }

        dot.push('\n');

        for (from, symbol, to) in self.transitions() {
            dot.push_str(&format!(
                "    s_{} -> s_{} [label=\"{}\"];\n",
                from.index(),
                to.index(),
                escape(&symbol.to_string())
            ));
        }

        dot.push('}');

        dot
    }
}

/// Escapes a string for use inside a quoted graphviz attribute.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
