//! Automat Core Library
//!
//! Compiles a small regular-expression language into finite automata and
//! keeps every intermediate form: the rewrite history of the Thompson-style
//! construction, the epsilon-NFA table, its epsilon-free counterpart and the
//! subset-constructed DFA.

pub mod builder;
pub mod classes;
pub mod closure;
pub mod convert;
pub mod determinize;
pub mod dot;
pub mod eliminate;
pub mod engine;
pub mod error;
pub mod graph;
pub mod label;
pub mod lexer;
pub mod pattern;
pub mod simulate;
pub mod table;

pub use builder::{Builder, Rewrite, build};
pub use classes::{CharClass, partition, refine_alphabet};
pub use closure::{Closures, epsilon_closure};
pub use determinize::{SubsetConstruction, determinize, subset_name, to_dfa};
pub use eliminate::{remove_epsilon, remove_epsilon_with};
pub use engine::Recognizer;
pub use error::{AutomatonError, ParseError, Result};
pub use graph::{Automaton, Edge, Node, NodeId, Snapshot, Transition};
pub use label::{EPSILON, Label};
pub use lexer::{Lexer, Token};
pub use pattern::Pattern;
pub use simulate::{BatchOutcome, Rejection, Run, SimulationOptions, Step};
pub use table::TransitionTable;

/// Compile an expression into its graph automaton.
///
/// This is the construction step alone; use [`Recognizer`] to get an
/// automaton suitable for matching.
pub fn compile(expression: &str) -> Result<Automaton> {
    build(expression)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end() {
        let nfa = compile("a + b").unwrap();
        let table = TransitionTable::from_automaton(&nfa).unwrap();
        let dfa = to_dfa(&table).unwrap();
        let graph = Automaton::from_table(&dfa.table).unwrap();
        assert!(graph.accepts("a").unwrap());
        assert!(graph.accepts("b").unwrap());
        assert!(!graph.accepts("ab").unwrap());
    }

    #[test]
    fn test_compile_keeps_history() {
        let nfa = compile("ab").unwrap();
        assert_eq!(nfa.history().len(), 2);
        assert!(nfa.is_atomic());
    }
}
