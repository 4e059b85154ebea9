//! Error types for the automaton pipeline
//!
//! This module provides error handling using the `thiserror` crate.
//! Errors are categorized by their source: expression parsing, table
//! validation, pipeline stages, or simulation setup.

use thiserror::Error;

/// The main error type for the automaton pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AutomatonError {
    /// Errors that occur while parsing an expression
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Simulation was requested on an automaton without a start state
    #[error("no start state configured")]
    MissingStartState,

    /// Simulation was requested on an automaton without a final state
    #[error("no final state configured")]
    MissingFinalState,

    /// A state name appears more than once in a table
    #[error("duplicate state '{0}'")]
    DuplicateState(String),

    /// A transition refers to a state that is not in the table
    #[error("unknown state '{0}'")]
    UnknownState(String),

    /// A transition uses a symbol that is not in the alphabet
    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),

    /// A start or final index does not point into the state list
    #[error("state index {index} out of range for {len} states")]
    IndexOutOfRange {
        /// The offending index
        index: usize,
        /// Number of states in the table
        len: usize,
    },

    /// The operation needs at least one state
    #[error("automaton has no states")]
    EmptyAutomaton,

    /// The determinizer was handed a table that still has epsilon moves
    #[error("state '{0}' still has epsilon transitions")]
    EpsilonTransitions(String),

    /// A table symbol cannot be read back as an edge label
    #[error("symbol '{0}' is not a valid label")]
    InvalidSymbol(String),

    /// An edge still carries an unexpanded sub-expression
    #[error("edge {from} -> {to} still carries expression '{expression}'")]
    PendingExpression {
        /// Source node name
        from: String,
        /// Target node name
        to: String,
        /// The compound label
        expression: String,
    },

    /// Reading or writing the tabular interchange format failed
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors in the expression mini-language
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A character that is neither an atom, an operator nor grouping
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar {
        /// The character
        ch: char,
        /// Character offset in the expression
        position: usize,
    },

    /// A `(` without its `)`
    #[error("unclosed group opened at position {position}")]
    UnclosedGroup {
        /// Position of the opening parenthesis
        position: usize,
    },

    /// A `)` without a matching `(`
    #[error("unmatched ')' at position {position}")]
    UnmatchedParen {
        /// Position of the closing parenthesis
        position: usize,
    },

    /// A `[` without its `]`
    #[error("unclosed range opened at position {position}")]
    UnclosedRange {
        /// Position of the opening bracket
        position: usize,
    },

    /// A `[..]` that is not exactly `[x-y]` with `x <= y`
    #[error("invalid range '{text}' at position {position}")]
    InvalidRange {
        /// The bracketed text
        text: String,
        /// Position of the opening bracket
        position: usize,
    },

    /// A `{` without its `}`
    #[error("unclosed set opened at position {position}")]
    UnclosedSet {
        /// Position of the opening brace
        position: usize,
    },

    /// `{}`
    #[error("empty set at position {position}")]
    EmptySet {
        /// Position of the opening brace
        position: usize,
    },

    /// One side of a union is empty, as in `a+` or `a++b`
    #[error("union with an empty alternative in '{0}'")]
    EmptyAlternative(String),

    /// A postfix operator with nothing to apply to
    #[error("operator '{0}' has no operand")]
    DanglingOperator(char),

    /// Anything the rewrite rules cannot decompose
    #[error("cannot decompose '{0}'")]
    Undecomposable(String),
}

/// Result type alias for automaton operations
pub type Result<T> = std::result::Result<T, AutomatonError>;
