//! Tabular form of an automaton
//!
//! This is the interchange format between the graph model and the
//! elimination/determinization stages: an explicit `(state, symbol) -> states`
//! function plus start and final index sets. It reads and writes JSON.

use crate::error::{AutomatonError, Result};
use crate::label::EPSILON;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

fn default_epsilon() -> String {
    EPSILON.to_string()
}

/// An automaton as an explicit transition table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionTable {
    /// State names, in order
    pub states: Vec<String>,
    /// Input symbols, in order, possibly including the epsilon marker
    pub alphabet: Vec<String>,
    /// The symbol that denotes epsilon
    #[serde(default = "default_epsilon")]
    pub epsilon: String,
    /// state -> symbol -> successor states
    #[serde(default)]
    pub transitions: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    /// Indices of start states
    #[serde(default)]
    pub starts: BTreeSet<usize>,
    /// Indices of final states
    #[serde(default)]
    pub finals: BTreeSet<usize>,
}

impl TransitionTable {
    /// Create a table with no transitions
    pub fn new<S, A>(states: S, alphabet: A) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        TransitionTable {
            states: states.into_iter().map(Into::into).collect(),
            alphabet: alphabet.into_iter().map(Into::into).collect(),
            epsilon: default_epsilon(),
            transitions: BTreeMap::new(),
            starts: BTreeSet::new(),
            finals: BTreeSet::new(),
        }
    }

    /// Use a different epsilon marker
    pub fn with_epsilon(mut self, epsilon: impl Into<String>) -> Self {
        self.epsilon = epsilon.into();
        self
    }

    /// Position of a state
    pub fn index_of(&self, state: &str) -> Option<usize> {
        self.states.iter().position(|s| s == state)
    }

    /// Whether a symbol is the epsilon marker
    pub fn is_epsilon(&self, symbol: &str) -> bool {
        symbol == self.epsilon
    }

    /// The alphabet without the epsilon marker
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.alphabet
            .iter()
            .map(String::as_str)
            .filter(move |s| !self.is_epsilon(s))
    }

    /// Successors of `(state, symbol)`; empty when nothing is stored
    pub fn targets(&self, state: &str, symbol: &str) -> &[String] {
        self.transitions
            .get(state)
            .and_then(|row| row.get(symbol))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace the successors of `(state, symbol)`
    pub fn set_targets(&mut self, state: &str, symbol: &str, targets: Vec<String>) {
        self.transitions
            .entry(state.to_string())
            .or_default()
            .insert(symbol.to_string(), targets);
    }

    /// Add one successor to `(state, symbol)`, ignoring duplicates
    pub fn add_transition(&mut self, state: &str, symbol: &str, target: &str) {
        let targets = self
            .transitions
            .entry(state.to_string())
            .or_default()
            .entry(symbol.to_string())
            .or_default();
        if !targets.iter().any(|t| t == target) {
            targets.push(target.to_string());
        }
    }

    /// Successor indices of `(state index, symbol)`
    pub fn target_indices(&self, state: usize, symbol: &str) -> Result<BTreeSet<usize>> {
        let name = self
            .states
            .get(state)
            .ok_or(AutomatonError::IndexOutOfRange {
                index: state,
                len: self.states.len(),
            })?;
        self.targets(name, symbol)
            .iter()
            .map(|t| {
                self.index_of(t)
                    .ok_or_else(|| AutomatonError::UnknownState(t.clone()))
            })
            .collect()
    }

    /// Mark the state at `index` as a start state
    pub fn mark_start(&mut self, index: usize) {
        self.starts.insert(index);
    }

    /// Mark the state at `index` as a final state
    pub fn mark_final(&mut self, index: usize) {
        self.finals.insert(index);
    }

    /// Whether the given state index is a start state
    pub fn is_start(&self, index: usize) -> bool {
        self.starts.contains(&index)
    }

    /// Whether the given state index is a final state
    pub fn is_final(&self, index: usize) -> bool {
        self.finals.contains(&index)
    }

    /// Whether any state has a non-empty epsilon entry
    pub fn has_epsilon_moves(&self) -> bool {
        self.first_epsilon_state().is_some()
    }

    pub(crate) fn first_epsilon_state(&self) -> Option<&str> {
        self.states
            .iter()
            .find(|s| !self.targets(s, &self.epsilon).is_empty())
            .map(String::as_str)
    }

    /// Whether every (state, symbol) has at most one successor
    pub fn is_deterministic(&self) -> bool {
        !self.has_epsilon_moves()
            && self
                .transitions
                .values()
                .flat_map(BTreeMap::values)
                .all(|targets| targets.len() <= 1)
    }

    /// Check the structural invariants of the table
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for state in &self.states {
            if !seen.insert(state.as_str()) {
                return Err(AutomatonError::DuplicateState(state.clone()));
            }
        }

        let len = self.states.len();
        if let Some(&index) = self.starts.iter().chain(&self.finals).find(|&&i| i >= len) {
            return Err(AutomatonError::IndexOutOfRange { index, len });
        }

        for (state, row) in &self.transitions {
            if !seen.contains(state.as_str()) {
                return Err(AutomatonError::UnknownState(state.clone()));
            }
            for (symbol, targets) in row {
                if !self.alphabet.contains(symbol) {
                    return Err(AutomatonError::UnknownSymbol(symbol.clone()));
                }
                if let Some(target) = targets.iter().find(|t| !seen.contains(t.as_str())) {
                    return Err(AutomatonError::UnknownState(target.clone()));
                }
            }
        }

        Ok(())
    }

    /// Read and validate a table from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let table: TransitionTable = serde_json::from_str(json)
            .map_err(|e| AutomatonError::Serialization(e.to_string()))?;
        table.validate()?;
        Ok(table)
    }

    /// Write the table as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| AutomatonError::Serialization(e.to_string()))
    }
}

impl fmt::Display for TransitionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<12}", "state")?;
        for symbol in &self.alphabet {
            write!(f, "{:<10}", symbol)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "-".repeat(12 + self.alphabet.len() * 10))?;

        for (i, state) in self.states.iter().enumerate() {
            let marker = match (self.is_start(i), self.is_final(i)) {
                (true, true) => "->*",
                (true, false) => "->",
                (false, true) => "*",
                (false, false) => "",
            };
            write!(f, "{:<12}", format!("{}{}", marker, state))?;
            for symbol in &self.alphabet {
                let targets = self.targets(state, symbol);
                let cell = if targets.is_empty() {
                    "-".to_string()
                } else {
                    targets.join(",")
                };
                write!(f, "{:<10}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
