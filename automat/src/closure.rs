//! Epsilon-closures over a transition table
//!
//! The closure of a state is every state reachable from it through zero or
//! more epsilon transitions, itself included. Closures are computed once per
//! table with a stack-based traversal and then shared by elimination.

use crate::error::{AutomatonError, Result};
use crate::label::Label;
use crate::table::TransitionTable;
use std::collections::BTreeSet;
use tracing::debug;

/// Precomputed epsilon-closures, indexed by state position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Closures {
    sets: Vec<BTreeSet<usize>>,
}

impl Closures {
    /// Compute the closure of every state in the table
    pub fn compute(table: &TransitionTable) -> Result<Self> {
        let sets = (0..table.states.len())
            .map(|state| closure_of(table, state))
            .collect::<Result<Vec<_>>>()?;

        for (state, set) in table.states.iter().zip(&sets) {
            debug!(state = %state, closure = ?names(table, set), "epsilon closure");
        }

        Ok(Closures { sets })
    }

    /// Closure of the state at `index`.
    ///
    /// Panics if `index` is not a state of the table these closures were
    /// computed from.
    pub fn of(&self, index: usize) -> &BTreeSet<usize> {
        &self.sets[index]
    }

    /// Union of the closures of a set of states.
    ///
    /// Panics on an index outside the table, like [`Closures::of`].
    pub fn of_set<'a>(&self, states: impl IntoIterator<Item = &'a usize>) -> BTreeSet<usize> {
        states
            .into_iter()
            .flat_map(|&s| self.sets[s].iter().copied())
            .collect()
    }

    /// Number of states covered
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether the table had no states
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Closures keyed by state name, for display
    pub fn named<'a>(&self, table: &'a TransitionTable) -> Vec<(&'a str, Vec<&'a str>)> {
        table
            .states
            .iter()
            .zip(&self.sets)
            .map(|(state, set)| (state.as_str(), names(table, set)))
            .collect()
    }
}

/// Stack-based traversal from a single state
fn closure_of(table: &TransitionTable, state: usize) -> Result<BTreeSet<usize>> {
    let mut closure = BTreeSet::from([state]);
    let mut stack = vec![state];

    while let Some(current) = stack.pop() {
        for next in table.target_indices(current, &table.epsilon)? {
            if closure.insert(next) {
                stack.push(next);
            }
        }
    }

    Ok(closure)
}

fn names<'a>(table: &'a TransitionTable, set: &BTreeSet<usize>) -> Vec<&'a str> {
    set.iter().map(|&i| table.states[i].as_str()).collect()
}

/// Epsilon-closure of one state, by name
pub fn epsilon_closure(table: &TransitionTable, state: &str) -> Result<BTreeSet<String>> {
    let index = table
        .index_of(state)
        .ok_or_else(|| AutomatonError::UnknownState(state.to_string()))?;
    let closure = closure_of(table, index)?;
    Ok(closure.iter().map(|&i| table.states[i].clone()).collect())
}

/// Run a table as an NFA, tracking every reachable state at once.
///
/// Symbols are read as labels, so `[a-z]` or `.` columns match the characters
/// they describe. Starts from the declared starts, or the first state.
pub fn accepts(table: &TransitionTable, input: &str) -> Result<bool> {
    table.validate()?;
    if table.states.is_empty() {
        return Err(AutomatonError::EmptyAutomaton);
    }

    let closures = Closures::compute(table)?;
    let labels = table
        .symbols()
        .map(|s| Label::parse(s).map(|label| (s, label)))
        .collect::<Result<Vec<_>>>()?;

    let initial = if table.starts.is_empty() {
        BTreeSet::from([0])
    } else {
        table.starts.clone()
    };
    let mut current = closures.of_set(&initial);

    for symbol in input.chars() {
        let mut next = BTreeSet::new();
        for &state in &current {
            for (text, label) in &labels {
                if label.matches(symbol) {
                    next.extend(table.target_indices(state, text)?);
                }
            }
        }
        current = closures.of_set(&next);
        if current.is_empty() {
            return Ok(false);
        }
    }

    Ok(current.iter().any(|&s| table.is_final(s)))
}
