//! Subset construction
//!
//! Converts an epsilon-free table into a deterministic one. Each generated
//! state stands for a set of original states; sets are discovered
//! breadth-first and named `A, B, …, Z, AA, AB, …` in discovery order.

use crate::classes::refine_alphabet;
use crate::eliminate::remove_epsilon;
use crate::error::{AutomatonError, Result};
use crate::table::TransitionTable;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::debug;

/// Result of a subset construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetConstruction {
    /// The deterministic table, states sorted by name
    pub table: TransitionTable,
    /// Generated state name -> original states it stands for
    pub subsets: BTreeMap<String, Vec<String>>,
}

/// Name of the `n`-th discovered subset: `A`..`Z`, then `AA`, `AB`, …
pub fn subset_name(mut n: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// Determinize an epsilon-free table.
///
/// The initial subset holds every declared start state, or the first listed
/// state when none is declared.
pub fn determinize(table: &TransitionTable) -> Result<SubsetConstruction> {
    table.validate()?;
    if table.states.is_empty() {
        return Err(AutomatonError::EmptyAutomaton);
    }
    if let Some(state) = table.first_epsilon_state() {
        return Err(AutomatonError::EpsilonTransitions(state.to_string()));
    }

    let symbols: Vec<String> = table.symbols().map(str::to_string).collect();
    let initial: BTreeSet<usize> = if table.starts.is_empty() {
        BTreeSet::from([0])
    } else {
        table.starts.clone()
    };

    let mut names: BTreeMap<BTreeSet<usize>, String> = BTreeMap::new();
    let mut discovered: Vec<(String, BTreeSet<usize>)> = Vec::new();
    let mut rows: BTreeMap<String, BTreeMap<String, Vec<String>>> = BTreeMap::new();
    let mut queue = VecDeque::new();

    let initial_name = subset_name(0);
    names.insert(initial.clone(), initial_name.clone());
    discovered.push((initial_name.clone(), initial.clone()));
    queue.push_back(initial);

    while let Some(current) = queue.pop_front() {
        let current_name = names[&current].clone();
        let mut row = BTreeMap::new();

        for symbol in &symbols {
            let mut next = BTreeSet::new();
            for &state in &current {
                next.extend(table.target_indices(state, symbol)?);
            }

            if next.is_empty() {
                row.insert(symbol.clone(), Vec::new());
                continue;
            }

            let next_name = match names.get(&next) {
                Some(name) => name.clone(),
                None => {
                    let name = subset_name(discovered.len());
                    debug!(
                        state = %name,
                        subset = ?next.iter().map(|&i| &table.states[i]).collect::<Vec<_>>(),
                        "discovered subset"
                    );
                    names.insert(next.clone(), name.clone());
                    discovered.push((name.clone(), next.clone()));
                    queue.push_back(next);
                    name
                }
            };
            row.insert(symbol.clone(), vec![next_name]);
        }

        rows.insert(current_name, row);
    }

    let mut states: Vec<String> = discovered.iter().map(|(name, _)| name.clone()).collect();
    states.sort();

    let mut result = TransitionTable::new(states.clone(), symbols).with_epsilon(table.epsilon.clone());
    result.transitions = rows;

    let subsets: BTreeMap<&str, &BTreeSet<usize>> = discovered
        .iter()
        .map(|(name, set)| (name.as_str(), set))
        .collect();
    for (i, name) in states.iter().enumerate() {
        let set = subsets[name.as_str()];
        if *name == initial_name {
            result.mark_start(i);
        }
        if set.iter().any(|&q| table.is_final(q)) {
            result.mark_final(i);
        }
    }

    debug!(
        states = result.states.len(),
        finals = result.finals.len(),
        "subset construction finished"
    );

    Ok(SubsetConstruction {
        table: result,
        subsets: discovered
            .into_iter()
            .map(|(name, set)| {
                let members = set.iter().map(|&i| table.states[i].clone()).collect();
                (name, members)
            })
            .collect(),
    })
}

/// Split overlapping columns, eliminate epsilon transitions, then determinize
pub fn to_dfa(table: &TransitionTable) -> Result<SubsetConstruction> {
    let refined = refine_alphabet(table)?;
    let epsilon_free = remove_epsilon(&refined)?;
    determinize(&epsilon_free)
}
