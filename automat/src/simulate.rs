//! Acceptance simulation on the graph form
//!
//! The walk is deterministic-style: from the current node it takes the first
//! outgoing edge whose label matches the next symbol. Run nondeterministic
//! automata through elimination and determinization first.

use crate::error::{AutomatonError, Result};
use crate::graph::{Automaton, Edge, NodeId, Transition};
use crate::label::Label;
use std::fmt;
use tracing::{debug, warn};

/// Switches for the matcher
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationOptions {
    /// Let epsilon edges consume any single symbol
    pub legacy_epsilon: bool,
}

impl SimulationOptions {
    /// Options with the legacy epsilon rule set as given
    pub fn with_legacy_epsilon(mut self, enabled: bool) -> Self {
        self.legacy_epsilon = enabled;
        self
    }
}

/// One consumed symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Node the symbol was read on
    pub from: NodeId,
    /// The consumed symbol
    pub symbol: char,
    /// Node the edge led to
    pub to: NodeId,
}

/// Why an input was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// No outgoing edge of `node` matched the symbol at `position`
    NoTransition {
        /// Node the walk was stuck on
        node: NodeId,
        /// The unmatched symbol
        symbol: char,
        /// Character offset of the symbol in the input
        position: usize,
    },
    /// The input ran out on a non-final node
    NotFinal {
        /// Node the walk ended on
        node: NodeId,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoTransition {
                node,
                symbol,
                position,
            } => write!(
                f,
                "no transition from node {} on '{}' at position {}",
                node, symbol, position
            ),
            Rejection::NotFinal { node } => write!(f, "stopped in non-final node {}", node),
        }
    }
}

/// Outcome of simulating one input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Whether the input was accepted
    pub accepted: bool,
    /// Steps taken, in order
    pub steps: Vec<Step>,
    /// Set when the input was rejected
    pub rejection: Option<Rejection>,
}

impl Run {
    /// Node the walk ended on
    pub fn last_node(&self) -> Option<NodeId> {
        match &self.rejection {
            Some(Rejection::NoTransition { node, .. }) | Some(Rejection::NotFinal { node }) => {
                Some(*node)
            }
            None => self.steps.last().map(|s| s.to),
        }
    }
}

/// Result for one entry of a batch test
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// The tested input
    pub input: String,
    /// Whether the input was accepted
    pub accepted: bool,
    /// The configuration error that forced a rejection, if any
    pub error: Option<AutomatonError>,
}

fn label_matches(label: &Label, symbol: char, options: SimulationOptions) -> bool {
    match label {
        Label::Epsilon => options.legacy_epsilon,
        other => other.matches(symbol),
    }
}

fn edge_matches(edge: &Edge, symbol: char, options: SimulationOptions) -> bool {
    match &edge.transition {
        Transition::Atom(label) => label_matches(label, symbol, options),
        Transition::Expr(pattern) => {
            let mut buf = [0u8; 4];
            pattern.to_string() == *symbol.encode_utf8(&mut buf)
        }
    }
}

impl Automaton {
    /// Walk the input from the first start node.
    ///
    /// Fails only when the automaton has no start or no final node; a
    /// rejected input is an `Ok` run with `accepted == false`.
    pub fn simulate(&self, input: &str, options: SimulationOptions) -> Result<Run> {
        let start = self
            .start_nodes()
            .next()
            .ok_or(AutomatonError::MissingStartState)?;
        if self.final_nodes().next().is_none() {
            return Err(AutomatonError::MissingFinalState);
        }

        let mut current = start;
        let mut steps = Vec::new();

        for (position, symbol) in input.chars().enumerate() {
            let Some(edge) = current
                .edges
                .iter()
                .find(|e| edge_matches(e, symbol, options))
            else {
                debug!(node = %current.name, %symbol, position, "no matching edge");
                return Ok(Run {
                    accepted: false,
                    steps,
                    rejection: Some(Rejection::NoTransition {
                        node: current.id,
                        symbol,
                        position,
                    }),
                });
            };

            let Some(next) = self.node(edge.target) else {
                return Err(AutomatonError::UnknownState(format!("q{}", edge.target)));
            };
            debug!(from = %current.name, %symbol, to = %next.name, "step");
            steps.push(Step {
                from: current.id,
                symbol,
                to: next.id,
            });
            current = next;
        }

        let accepted = current.is_final;
        Ok(Run {
            accepted,
            steps,
            rejection: (!accepted).then_some(Rejection::NotFinal { node: current.id }),
        })
    }

    /// Whether the input is accepted, with default options
    pub fn accepts(&self, input: &str) -> Result<bool> {
        Ok(self.simulate(input, SimulationOptions::default())?.accepted)
    }

    /// Test many inputs. A configuration error rejects that entry and the
    /// batch carries on.
    pub fn accepts_all<I, S>(&self, inputs: I, options: SimulationOptions) -> Vec<BatchOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        inputs
            .into_iter()
            .map(|input| {
                let input = input.as_ref();
                match self.simulate(input, options) {
                    Ok(run) => BatchOutcome {
                        input: input.to_string(),
                        accepted: run.accepted,
                        error: None,
                    },
                    Err(e) => {
                        warn!(input, error = %e, "simulation failed, counting as rejected");
                        BatchOutcome {
                            input: input.to_string(),
                            accepted: false,
                            error: Some(e),
                        }
                    }
                }
            })
            .collect()
    }
}
