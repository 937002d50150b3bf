//! The errors that may occur when building, analyzing or (de)serializing an
//! automaton.

use thiserror::Error;

pub type Result<T, E = DfaError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum DfaError {
    // Construction errors
    #[error("State does not belong to this automaton")]
    NotMember,
    #[error("A state with label {0:?} already exists")]
    DuplicateState(String),
    #[error("Symbol {0} is not part of the alphabet")]
    UnknownSymbol(String),

    // Query errors
    #[error("No transition from state {state:?} on symbol {symbol}")]
    UndefinedTransition { state: String, symbol: String },
    #[error("Automaton has no initial state")]
    NoInitialState,
    #[error("Automaton is not complete, every state needs a transition for every symbol")]
    IncompleteAutomaton,

    // Deserialization errors
    #[error("Reference to undeclared state {0:?}")]
    UnknownStateReference(String),
    #[error("Malformed automaton json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to access automaton file: {0}")]
    Io(#[from] std::io::Error),
}
