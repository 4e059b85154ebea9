//! Alphabet refinement
//!
//! Table columns are labels, and two labels can accept the same symbol: `.`
//! and `b`, or `[a-c]` and `b`. Subset construction treats every column as an
//! independent symbol, so such a table has to be split into pairwise disjoint
//! character classes before it is determinized.

use crate::error::Result;
use crate::label::Label;
use crate::table::TransitionTable;
use std::collections::BTreeSet;
use tracing::debug;

/// One column of a refined alphabet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharClass {
    /// Symbols of the class
    pub label: Label,
    /// Indices of the original labels that accept every symbol of the class
    pub members: Vec<usize>,
}

fn successor(c: char) -> Option<u32> {
    match c {
        char::MAX => None,
        '\u{D7FF}' => Some(0xE000),
        c => Some(c as u32 + 1),
    }
}

fn predecessor(point: u32) -> u32 {
    if point == 0xE000 { 0xD7FF } else { point - 1 }
}

/// Label for one contiguous run. A literal is only used when its text reads
/// back as that literal, so `.` and `ε` become one-symbol ranges.
fn run_label(lo: char, hi: char) -> Label {
    if lo == hi && Label::parse(&lo.to_string()) == Ok(Label::Literal(lo)) {
        Label::Literal(lo)
    } else {
        Label::Range(lo, hi)
    }
}

fn merge(mut intervals: Vec<(char, char)>) -> Vec<(char, char)> {
    intervals.sort();
    let mut merged: Vec<(char, char)> = Vec::new();
    for (lo, hi) in intervals {
        match merged.last_mut() {
            Some((_, last)) if successor(*last).is_none_or(|next| lo as u32 <= next) => {
                *last = (*last).max(hi);
            }
            _ => merged.push((lo, hi)),
        }
    }
    merged
}

/// Split labels into disjoint classes.
///
/// Every symbol accepted by some label lands in exactly one class, and the
/// members of that class are exactly the labels accepting it. Classes inside
/// the finite part of the alphabet come first, ordered by symbol; the symbols
/// only `.` or `[^…]` labels accept form one trailing class.
pub fn partition(labels: &[Label]) -> Vec<CharClass> {
    let region: Vec<(char, char)> = labels.iter().flat_map(Label::intervals).collect();

    let mut points = BTreeSet::new();
    for &(lo, hi) in &region {
        points.insert(lo as u32);
        if let Some(next) = successor(hi) {
            points.insert(next);
        }
    }
    let points: Vec<u32> = points.into_iter().collect();

    let mut runs: Vec<(char, char, Vec<usize>)> = Vec::new();
    for (k, &start) in points.iter().enumerate() {
        let end = points
            .get(k + 1)
            .map_or(char::MAX as u32, |&next| predecessor(next));
        let (Some(lo), Some(hi)) = (char::from_u32(start), char::from_u32(end)) else {
            continue;
        };
        if !region.iter().any(|&(a, b)| (a..=b).contains(&lo)) {
            continue;
        }

        let members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, label)| label.matches(lo))
            .map(|(i, _)| i)
            .collect();
        if members.is_empty() {
            continue;
        }

        match runs.last_mut() {
            Some((_, last_hi, last_members))
                if *last_members == members && successor(*last_hi) == Some(start) =>
            {
                *last_hi = hi;
            }
            _ => runs.push((lo, hi, members)),
        }
    }

    let mut classes: Vec<CharClass> = runs
        .into_iter()
        .map(|(lo, hi, members)| CharClass {
            label: run_label(lo, hi),
            members,
        })
        .collect();

    let cofinite: Vec<usize> = labels
        .iter()
        .enumerate()
        .filter(|(_, label)| label.is_cofinite())
        .map(|(i, _)| i)
        .collect();
    if !cofinite.is_empty() {
        let label = if region.is_empty() {
            Label::Any
        } else {
            Label::Except(merge(region))
        };
        classes.push(CharClass {
            label,
            members: cofinite,
        });
    }

    classes
}

/// Rewrite a table over pairwise disjoint columns.
///
/// A column of the result carries the union of the targets of every original
/// column accepting its symbols. The epsilon column is kept as is. Tables
/// whose columns are already disjoint, or whose symbols are not labels, are
/// returned unchanged.
pub fn refine_alphabet(table: &TransitionTable) -> Result<TransitionTable> {
    table.validate()?;

    let symbols: Vec<&str> = table.symbols().collect();
    let Ok(labels) = symbols
        .iter()
        .map(|s| Label::parse(s))
        .collect::<Result<Vec<_>>>()
    else {
        debug!("symbols are not labels, columns kept");
        return Ok(table.clone());
    };

    let classes = partition(&labels);
    if classes.iter().all(|class| class.members.len() == 1) {
        return Ok(table.clone());
    }

    let names: Vec<String> = classes
        .iter()
        .map(|class| match &class.label {
            Label::Literal(c) if table.is_epsilon(&c.to_string()) => {
                Label::Range(*c, *c).to_string()
            }
            label => label.to_string(),
        })
        .collect();

    let has_epsilon = table.alphabet.iter().any(|s| table.is_epsilon(s));
    let mut alphabet = names.clone();
    if has_epsilon {
        alphabet.push(table.epsilon.clone());
    }

    let mut result =
        TransitionTable::new(table.states.clone(), alphabet).with_epsilon(table.epsilon.clone());
    result.starts = table.starts.clone();
    result.finals = table.finals.clone();

    for (index, state) in table.states.iter().enumerate() {
        for (class, name) in classes.iter().zip(&names) {
            let mut targets = BTreeSet::new();
            for &member in &class.members {
                targets.extend(table.target_indices(index, symbols[member])?);
            }
            if !targets.is_empty() {
                let targets = targets.iter().map(|&t| table.states[t].clone()).collect();
                result.set_targets(state, name, targets);
            }
        }

        let epsilon = table.targets(state, &table.epsilon);
        if !epsilon.is_empty() {
            result.set_targets(state, &table.epsilon, epsilon.to_vec());
        }
    }

    debug!(
        symbols = symbols.len(),
        classes = classes.len(),
        "refined alphabet into disjoint classes"
    );
    Ok(result)
}
