/// A node in a DFA.
/// It contains the unique label of the state and a boolean flag indicating
/// whether the node is accepting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DfaNode {
    pub accepting: bool,
    pub label: String,
}

impl DfaNode {
    pub fn new(accepting: bool, label: impl Into<String>) -> Self {
        DfaNode {
            accepting,
            label: label.into(),
        }
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}
