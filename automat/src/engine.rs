//! Recognizer for a single expression
//!
//! Runs the whole pipeline once at construction: compile the expression,
//! tabulate it, split overlapping columns, remove epsilon transitions,
//! determinize, and rebuild a graph that answers membership queries. Every intermediate form is kept for
//! inspection.

use crate::builder::build;
use crate::classes::refine_alphabet;
use crate::determinize::{SubsetConstruction, determinize};
use crate::eliminate::remove_epsilon;
use crate::error::Result;
use crate::graph::Automaton;
use crate::simulate::{BatchOutcome, Run, SimulationOptions};
use crate::table::TransitionTable;
use tracing::debug;

/// A compiled expression
#[derive(Debug, Clone)]
pub struct Recognizer {
    expression: String,
    nfa: Automaton,
    nfa_table: TransitionTable,
    epsilon_free: TransitionTable,
    dfa: SubsetConstruction,
    graph: Automaton,
    options: SimulationOptions,
}

impl Recognizer {
    /// Compile an expression with default options
    pub fn new(expression: &str) -> Result<Self> {
        let nfa = build(expression)?;
        let nfa_table = TransitionTable::from_automaton(&nfa)?;
        let refined = refine_alphabet(&nfa_table)?;
        let epsilon_free = remove_epsilon(&refined)?;
        let dfa = determinize(&epsilon_free)?;
        let graph = Automaton::from_table(&dfa.table)?;

        debug!(
            expression,
            nfa_states = nfa.len(),
            dfa_states = dfa.table.states.len(),
            "compiled recognizer"
        );

        Ok(Recognizer {
            expression: expression.to_string(),
            nfa,
            nfa_table,
            epsilon_free,
            dfa,
            graph,
            options: SimulationOptions::default(),
        })
    }

    /// Replace the simulation options
    pub fn with_options(mut self, options: SimulationOptions) -> Self {
        self.options = options;
        self
    }

    /// Check if the input belongs to the language
    pub fn is_match(&self, input: &str) -> bool {
        self.run(input).is_ok_and(|run| run.accepted)
    }

    /// Simulate the input on the deterministic graph
    pub fn run(&self, input: &str) -> Result<Run> {
        self.graph.simulate(input, self.options)
    }

    /// Test many inputs at once
    pub fn test_all<I, S>(&self, inputs: I) -> Vec<BatchOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.graph.accepts_all(inputs, self.options)
    }

    /// The source expression
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The automaton produced by the builder, with its rewrite history
    pub fn nfa(&self) -> &Automaton {
        &self.nfa
    }

    pub fn nfa_table(&self) -> &TransitionTable {
        &self.nfa_table
    }

    pub fn epsilon_free(&self) -> &TransitionTable {
        &self.epsilon_free
    }

    /// The subset construction, including the subset each state stands for
    pub fn dfa(&self) -> &SubsetConstruction {
        &self.dfa
    }

    /// The deterministic automaton used for matching
    pub fn graph(&self) -> &Automaton {
        &self.graph
    }

    pub fn options(&self) -> SimulationOptions {
        self.options
    }
}
