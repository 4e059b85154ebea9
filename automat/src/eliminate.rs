//! Epsilon elimination
//!
//! Folds epsilon-closures into the symbol transitions so the resulting table
//! has no epsilon column. States keep their positions and are renamed
//! `S0..Sn-1`.

use crate::closure::Closures;
use crate::error::{AutomatonError, Result};
use crate::table::TransitionTable;
use std::collections::BTreeSet;
use tracing::debug;

/// Remove epsilon transitions from a table
pub fn remove_epsilon(table: &TransitionTable) -> Result<TransitionTable> {
    table.validate()?;
    let closures = Closures::compute(table)?;
    remove_epsilon_with(table, &closures)
}

/// Remove epsilon transitions using precomputed closures.
///
/// The closures must come from `table`; a closure set of a different size is
/// rejected with [`AutomatonError::IndexOutOfRange`].
pub fn remove_epsilon_with(table: &TransitionTable, closures: &Closures) -> Result<TransitionTable> {
    if closures.len() != table.states.len() {
        return Err(AutomatonError::IndexOutOfRange {
            index: closures.len(),
            len: table.states.len(),
        });
    }
    let renamed: Vec<String> = (0..table.states.len()).map(|i| format!("S{}", i)).collect();
    let symbols: Vec<String> = table.symbols().map(str::to_string).collect();

    let mut result = TransitionTable::new(renamed.clone(), symbols.clone())
        .with_epsilon(table.epsilon.clone());
    result.starts = table.starts.clone();

    for (state, name) in renamed.iter().enumerate() {
        let closure = closures.of(state);

        if closure.iter().any(|&q| table.is_final(q)) {
            result.mark_final(state);
        }

        for symbol in &symbols {
            let mut reachable = BTreeSet::new();
            for &q in closure {
                let direct = table.target_indices(q, symbol)?;
                reachable.extend(closures.of_set(&direct));
            }

            let targets = reachable.iter().map(|&r| renamed[r].clone()).collect();
            result.set_targets(name, symbol, targets);
        }
    }

    debug!(
        states = result.states.len(),
        symbols = result.alphabet.len(),
        finals = result.finals.len(),
        "removed epsilon transitions"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// q0 -ε-> q1 -0-> qf
    fn epsilon_then_zero() -> TransitionTable {
        let mut table = TransitionTable::new(["q0", "q1", "qf"], ["0", "ε"]);
        table.add_transition("q0", "ε", "q1");
        table.add_transition("q1", "0", "qf");
        table.mark_start(0);
        table.mark_final(2);
        table
    }

    #[test]
    fn test_alphabet_drops_epsilon() {
        let result = remove_epsilon(&epsilon_then_zero()).unwrap();
        assert_eq!(result.alphabet, vec!["0"]);
        assert!(!result.has_epsilon_moves());
    }

    #[test]
    fn test_states_renamed_positionally() {
        let result = remove_epsilon(&epsilon_then_zero()).unwrap();
        assert_eq!(result.states, vec!["S0", "S1", "S2"]);
    }

    #[test]
    fn test_transitions_fold_closures() {
        let result = remove_epsilon(&epsilon_then_zero()).unwrap();
        assert_eq!(result.targets("S0", "0"), ["S2"]);
        assert_eq!(result.targets("S1", "0"), ["S2"]);
        assert!(result.targets("S2", "0").is_empty());
    }

    #[test]
    fn test_every_pair_is_defined() {
        let result = remove_epsilon(&epsilon_then_zero()).unwrap();
        for state in &result.states {
            for symbol in &result.alphabet {
                assert!(result.transitions[state].contains_key(symbol));
            }
        }
    }

    #[test]
    fn test_final_through_closure() {
        let mut table = epsilon_then_zero();
        table.add_transition("qf", "ε", "q0");
        table.finals.clear();
        table.mark_final(1);

        let result = remove_epsilon(&table).unwrap();
        // S0 reaches q1 by epsilon, S1 is final, S2 reaches q1 through q0
        assert_eq!(result.finals, BTreeSet::from([0, 1, 2]));
    }

    #[test]
    fn test_targets_include_closure_of_destination() {
        // q0 -a-> q1 -ε-> q2
        let mut table = TransitionTable::new(["q0", "q1", "q2"], ["a", "ε"]);
        table.add_transition("q0", "a", "q1");
        table.add_transition("q1", "ε", "q2");
        let result = remove_epsilon(&table).unwrap();
        assert_eq!(result.targets("S0", "a"), ["S1", "S2"]);
    }

    #[test]
    fn test_multiple_starts_carried_over() {
        let mut table = epsilon_then_zero();
        table.mark_start(2);
        let result = remove_epsilon(&table).unwrap();
        assert_eq!(result.starts, BTreeSet::from([0, 2]));
    }

    #[test]
    fn test_closures_from_another_table_are_rejected() {
        let small = TransitionTable::new(["p0"], ["0"]);
        let closures = Closures::compute(&small).unwrap();
        assert_eq!(
            remove_epsilon_with(&epsilon_then_zero(), &closures),
            Err(AutomatonError::IndexOutOfRange { index: 1, len: 3 })
        );

        let mut large = TransitionTable::new(["p0", "p1", "p2", "p3"], ["0", "ε"]);
        large.add_transition("p0", "ε", "p3");
        let closures = Closures::compute(&large).unwrap();
        assert_eq!(
            remove_epsilon_with(&epsilon_then_zero(), &closures),
            Err(AutomatonError::IndexOutOfRange { index: 4, len: 3 })
        );
    }

    #[test]
    fn test_rejects_invalid_table() {
        let mut table = epsilon_then_zero();
        table.add_transition("q1", "0", "ghost");
        assert!(remove_epsilon(&table).is_err());
    }
}
