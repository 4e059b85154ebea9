//! Conversion between the graph and table forms

use crate::error::{AutomatonError, Result};
use crate::graph::{Automaton, Transition};
use crate::label::{EPSILON, Label};
use crate::table::TransitionTable;
use std::collections::BTreeSet;
use tracing::debug;

impl TransitionTable {
    /// Tabulate a fully decomposed graph.
    ///
    /// Node names become state names. The alphabet lists label texts in the
    /// order they are first seen, followed by the epsilon marker.
    pub fn from_automaton(automaton: &Automaton) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for node in automaton.nodes() {
            if !seen.insert(node.name.as_str()) {
                return Err(AutomatonError::DuplicateState(node.name.clone()));
            }
        }

        let mut alphabet: Vec<String> = Vec::new();
        for (from, edge) in automaton.edges() {
            let label = match &edge.transition {
                Transition::Atom(label) => label,
                Transition::Expr(pattern) => {
                    return Err(AutomatonError::PendingExpression {
                        from: automaton.name_of(from).to_string(),
                        to: automaton.name_of(edge.target).to_string(),
                        expression: pattern.to_string(),
                    });
                }
            };
            if label.is_epsilon() {
                continue;
            }
            let text = label.to_string();
            if !alphabet.contains(&text) {
                alphabet.push(text);
            }
        }
        alphabet.push(EPSILON.to_string());

        let states = automaton.nodes().iter().map(|n| n.name.clone());
        let mut table = TransitionTable::new(states, alphabet);

        for (from, edge) in automaton.edges() {
            table.add_transition(
                automaton.name_of(from),
                &edge.transition.to_string(),
                automaton.name_of(edge.target),
            );
        }
        for node in automaton.nodes() {
            if node.is_start {
                table.mark_start(node.id);
            }
            if node.is_final {
                table.mark_final(node.id);
            }
        }

        debug!(
            states = table.states.len(),
            symbols = table.alphabet.len(),
            "tabulated automaton"
        );
        Ok(table)
    }
}

impl Automaton {
    /// Build a graph from a table, one node per state in table order.
    ///
    /// The epsilon marker becomes an epsilon edge; every other symbol must
    /// read back as a label.
    pub fn from_table(table: &TransitionTable) -> Result<Self> {
        table.validate()?;

        let labels = table
            .alphabet
            .iter()
            .map(|symbol| {
                if table.is_epsilon(symbol) {
                    Ok(Label::Epsilon)
                } else {
                    Label::parse(symbol)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let mut automaton = Automaton::new();
        for state in &table.states {
            automaton.add_named_node(state.clone());
        }

        for from in 0..table.states.len() {
            for (symbol, label) in table.alphabet.iter().zip(&labels) {
                for to in table.target_indices(from, symbol)? {
                    automaton.add_atom(from, to, label.clone());
                }
            }
        }
        for &i in &table.starts {
            automaton.set_start(i);
        }
        for &i in &table.finals {
            automaton.set_final(i);
        }

        automaton.snapshot(format!(
            "built from table: {} states, {} symbols",
            table.states.len(),
            table.alphabet.len()
        ));
        Ok(automaton)
    }
}
