//! Integration tests for the full pipeline
//!
//! expression -> graph -> table -> epsilon-free table -> DFA -> graph

use automat::{
    Automaton, AutomatonError, Recognizer, SimulationOptions, TransitionTable, closure, compile,
    determinize, remove_epsilon, to_dfa,
};
use proptest::prelude::*;

fn check(expression: &str, accepted: &[&str], rejected: &[&str]) {
    let recognizer = Recognizer::new(expression).unwrap();
    for input in accepted {
        assert!(
            recognizer.is_match(input),
            "'{}' should accept '{}'",
            expression,
            input
        );
    }
    for input in rejected {
        assert!(
            !recognizer.is_match(input),
            "'{}' should reject '{}'",
            expression,
            input
        );
    }
}

#[test]
fn test_concatenation() {
    check("ab", &["ab"], &["a", "ba", "", "abc"]);
}

#[test]
fn test_star() {
    check("a*", &["", "a", "aaaa"], &["b", "ab"]);
}

#[test]
fn test_union() {
    check("a+b", &["a", "b"], &["ab", ""]);
}

#[test]
fn test_plus_of_group() {
    check("(ab)^", &["ab", "abab"], &["a", "aba", ""]);
}

#[test]
fn test_trailing_star_covers_whole_sequence() {
    check("ab*", &["", "ab", "abab"], &["a", "abb", "b"]);
    check("a*b", &["b", "ab", "aaab"], &["", "a", "ba"]);
}

#[test]
fn test_bracketed_atoms() {
    check("[a-c]x", &["ax", "cx"], &["dx", "x"]);
    check("{01}.", &["0z", "11"], &["2z", "0"]);
}

#[test]
fn test_epsilon_forms() {
    check("", &[""], &["a"]);
    check("a + epsilon", &["", "a"], &["aa"]);
    check("ε + b", &["", "b"], &["a"]);
}

#[test]
fn test_nested_expression() {
    check("(a+b)*c", &["c", "ac", "babc"], &["", "ab", "cc"]);
    check(
        "(0 + 1(01*0)*1)*",
        &["", "0", "11", "110", "1001"],
        &["1", "10", "111"],
    );
}

#[test]
fn test_nfa_history_is_replayable() {
    let nfa = compile("a* + (a+b*)^ a + (ab)^").unwrap();
    let history = nfa.history();
    assert!(history[0].comment.starts_with("initial expression"));
    for (i, snapshot) in history.iter().enumerate() {
        assert_eq!(snapshot.step, i);
    }
    assert!(
        history
            .last()
            .unwrap()
            .nodes
            .iter()
            .flat_map(|n| &n.edges)
            .all(|e| !e.transition.is_pending())
    );
}

#[test]
fn test_elimination_preserves_membership() {
    let json = r#"{
        "states": ["q0", "q1", "qf"],
        "alphabet": ["0", "e"],
        "epsilon": "e",
        "transitions": {
            "q0": { "e": ["q1"] },
            "q1": { "0": ["qf"] }
        },
        "starts": [0],
        "finals": [2]
    }"#;
    let table = TransitionTable::from_json(json).unwrap();
    assert!(closure::accepts(&table, "0").unwrap());

    let epsilon_free = remove_epsilon(&table).unwrap();
    assert!(!epsilon_free.has_epsilon_moves());
    assert!(Automaton::from_table(&epsilon_free).unwrap().accepts("0").unwrap());

    let dfa = to_dfa(&table).unwrap();
    assert!(Automaton::from_table(&dfa.table).unwrap().accepts("0").unwrap());
}

#[test]
fn test_two_state_nfa_determinizes_to_at_most_four_states() {
    let mut table = TransitionTable::new(["p", "q"], ["0", "1"]);
    table.add_transition("p", "0", "p");
    table.add_transition("p", "0", "q");
    table.add_transition("p", "1", "q");
    table.add_transition("q", "1", "p");
    table.add_transition("q", "1", "q");
    table.mark_start(0);
    table.mark_final(1);

    let dfa = determinize(&table).unwrap();
    assert!(dfa.table.states.len() <= 4);
    assert!(dfa.table.is_deterministic());

    let again = determinize(&dfa.table).unwrap();
    assert_eq!(again.table, dfa.table);
}

#[test]
fn test_batch_continues_past_configuration_errors() {
    let recognizer = Recognizer::new("a").unwrap();
    let outcomes = recognizer.test_all(["a", "b", ""]);
    let accepted: Vec<bool> = outcomes.iter().map(|o| o.accepted).collect();
    assert_eq!(accepted, vec![true, false, false]);

    let mut unfinished = Automaton::new();
    let q0 = unfinished.add_node();
    unfinished.set_start(q0);
    let outcomes = unfinished.accepts_all(["x", "y"], SimulationOptions::default());
    assert_eq!(outcomes.len(), 2);
    for outcome in outcomes {
        assert!(!outcome.accepted);
        assert_eq!(outcome.error, Some(AutomatonError::MissingFinalState));
    }
}

#[test]
fn test_table_json_round_trip_through_pipeline() {
    let recognizer = Recognizer::new("(ab)^").unwrap();
    let json = recognizer.dfa().table.to_json().unwrap();
    let table = TransitionTable::from_json(&json).unwrap();
    assert_eq!(&table, &recognizer.dfa().table);
}

#[test]
fn test_wildcard_overlapping_literal_branch() {
    check(".b + ac", &["ac", "ab", "bb", "cb"], &["a", "bc", "acb"]);
}

#[test]
fn test_range_overlapping_literal_branch() {
    check("[a-c]x + by", &["by", "ax", "bx", "cx"], &["ay", "b", "dx"]);
}

#[test]
fn test_literal_overlapping_wildcard_branch() {
    check("a + .b", &["a", "ab", "bb", "zb"], &["b", "aa", "abb"]);
}

#[test]
fn test_set_overlapping_range_under_star() {
    check("({ab}c + [b-c]d)*", &["", "ac", "bd", "bcbd", "cdac"], &["ad", "cc", "b"]);
}

fn expression() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        Just("a".to_string()),
        Just("b".to_string()),
        Just(".".to_string()),
        Just("[a-b]".to_string()),
        Just("{ab}".to_string()),
    ];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(x, y)| format!("({})({})", x, y)),
            (inner.clone(), inner.clone()).prop_map(|(x, y)| format!("({}+{})", x, y)),
            inner.clone().prop_map(|x| format!("({})*", x)),
            inner.prop_map(|x| format!("({})^", x)),
        ]
    })
}

fn word() -> impl Strategy<Value = String> {
    proptest::collection::vec(prop_oneof![Just('a'), Just('b'), Just('c')], 0..6)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_dfa_is_deterministic(expr in expression()) {
        let recognizer = Recognizer::new(&expr).unwrap();
        prop_assert!(recognizer.dfa().table.is_deterministic());
        prop_assert_eq!(recognizer.dfa().table.starts.len(), 1);
    }

    #[test]
    fn prop_dfa_agrees_with_nfa(expr in expression(), input in word()) {
        let recognizer = Recognizer::new(&expr).unwrap();
        let expected = closure::accepts(recognizer.nfa_table(), &input).unwrap();
        prop_assert_eq!(recognizer.is_match(&input), expected);
    }
}
