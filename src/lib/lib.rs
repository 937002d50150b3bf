//! Deterministic finite automata, detection of equivalent states and
//! construction of minimal automata.

pub mod automaton;
pub mod config;
pub mod error;
pub mod logger;
pub mod validation;

pub use error::{DfaError, Result};
