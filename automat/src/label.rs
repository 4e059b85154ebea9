//! Atomic edge labels
//!
//! A label is parsed once, when an edge is created, and the matcher then
//! dispatches on the variant instead of re-reading label text.

use crate::error::AutomatonError;
use std::fmt;

/// Display form of the epsilon label
pub const EPSILON: &str = "ε";

/// An atomic transition label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Label {
    /// Epsilon (no input consumed)
    Epsilon,
    /// Wildcard `.`, any single symbol
    Any,
    /// A single literal symbol
    Literal(char),
    /// An inclusive range `[lo-hi]`
    Range(char, char),
    /// A set of literal symbols `{abc}`
    Set(Vec<char>),
    /// Any symbol outside the listed inclusive intervals, written `[^a-cx-x]`
    Except(Vec<(char, char)>),
}

impl Label {
    /// Check whether a symbol is consumed by this label.
    ///
    /// Epsilon never consumes a symbol.
    pub fn matches(&self, symbol: char) -> bool {
        match self {
            Label::Epsilon => false,
            Label::Any => true,
            Label::Literal(c) => *c == symbol,
            Label::Range(lo, hi) => (*lo..=*hi).contains(&symbol),
            Label::Set(chars) => chars.contains(&symbol),
            Label::Except(excluded) => !excluded
                .iter()
                .any(|(lo, hi)| (*lo..=*hi).contains(&symbol)),
        }
    }

    /// Whether this is the epsilon label
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }

    /// Whether the label accepts all but finitely many symbols
    pub fn is_cofinite(&self) -> bool {
        matches!(self, Label::Any | Label::Except(_))
    }

    /// The intervals that decide this label: the accepted ones for a finite
    /// label, the excluded ones for `.` and `[^…]`
    pub fn intervals(&self) -> Vec<(char, char)> {
        match self {
            Label::Epsilon | Label::Any => Vec::new(),
            Label::Literal(c) => vec![(*c, *c)],
            Label::Range(lo, hi) => vec![(*lo, *hi)],
            Label::Set(chars) => chars.iter().map(|c| (*c, *c)).collect(),
            Label::Except(excluded) => excluded.clone(),
        }
    }

    /// Read a label back from its textual form, as stored in a table symbol.
    pub fn parse(text: &str) -> Result<Self, AutomatonError> {
        let invalid = || AutomatonError::InvalidSymbol(text.to_string());

        if text == EPSILON || text == "epsilon" {
            return Ok(Label::Epsilon);
        }
        if text == "." {
            return Ok(Label::Any);
        }

        if let Some(excluded) = parse_excluded(text) {
            return Ok(Label::Except(excluded));
        }

        let chars: Vec<char> = text.chars().collect();
        match chars.as_slice() {
            [c] => Ok(Label::Literal(*c)),
            ['[', lo, '-', hi, ']'] if lo <= hi => Ok(Label::Range(*lo, *hi)),
            ['{', inner @ .., '}'] if !inner.is_empty() => Ok(Label::Set(inner.to_vec())),
            _ => Err(invalid()),
        }
    }
}

/// Interval list of a `[^lo-hi…]` text; `None` when the text is not one
fn parse_excluded(text: &str) -> Option<Vec<(char, char)>> {
    let inner: Vec<char> = text.strip_prefix("[^")?.strip_suffix(']')?.chars().collect();
    if inner.is_empty() || inner.len() % 3 != 0 {
        return None;
    }
    inner
        .chunks(3)
        .map(|chunk| match chunk {
            [lo, '-', hi] if lo <= hi => Some((*lo, *hi)),
            _ => None,
        })
        .collect()
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Epsilon => write!(f, "{}", EPSILON),
            Label::Any => write!(f, "."),
            Label::Literal(c) => write!(f, "{}", c),
            Label::Range(lo, hi) => write!(f, "[{}-{}]", lo, hi),
            Label::Set(chars) => {
                write!(f, "{{")?;
                for c in chars {
                    write!(f, "{}", c)?;
                }
                write!(f, "}}")
            }
            Label::Except(excluded) => {
                write!(f, "[^")?;
                for (lo, hi) in excluded {
                    write!(f, "{}-{}", lo, hi)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsilon_never_matches() {
        assert!(!Label::Epsilon.matches('a'));
        assert!(!Label::Epsilon.matches('ε'));
    }

    #[test]
    fn test_any_matches_everything() {
        assert!(Label::Any.matches('a'));
        assert!(Label::Any.matches('7'));
    }

    #[test]
    fn test_literal() {
        assert!(Label::Literal('x').matches('x'));
        assert!(!Label::Literal('x').matches('y'));
    }

    #[test]
    fn test_range_is_inclusive() {
        let range = Label::Range('a', 'c');
        assert!(range.matches('a'));
        assert!(range.matches('b'));
        assert!(range.matches('c'));
        assert!(!range.matches('d'));
    }

    #[test]
    fn test_set_membership() {
        let set = Label::Set(vec!['x', '1']);
        assert!(set.matches('1'));
        assert!(!set.matches('2'));
    }

    #[test]
    fn test_except_excludes_intervals() {
        let rest = Label::Except(vec![('a', 'c'), ('x', 'x')]);
        assert!(rest.matches('d'));
        assert!(rest.matches('7'));
        assert!(!rest.matches('b'));
        assert!(!rest.matches('x'));
        assert!(rest.is_cofinite());
        assert_eq!(rest.to_string(), "[^a-cx-x]");
    }

    #[test]
    fn test_intervals() {
        assert_eq!(Label::Literal('q').intervals(), vec![('q', 'q')]);
        assert_eq!(Label::Range('0', '9').intervals(), vec![('0', '9')]);
        assert_eq!(Label::Set(vec!['b', 'a']).intervals(), vec![('b', 'b'), ('a', 'a')]);
        assert!(Label::Any.intervals().is_empty());
        assert!(Label::Epsilon.intervals().is_empty());
        assert!(!Label::Range('0', '9').is_cofinite());
    }

    #[test]
    fn test_parse_caret_range_is_not_except() {
        assert_eq!(Label::parse("[^-a]").unwrap(), Label::Range('^', 'a'));
        assert_eq!(
            Label::parse("[^a-b]").unwrap(),
            Label::Except(vec![('a', 'b')])
        );
        assert!(Label::parse("[^]").is_err());
        assert!(Label::parse("[^b-a]").is_err());
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(Label::parse("ε").unwrap(), Label::Epsilon);
        assert_eq!(Label::parse("epsilon").unwrap(), Label::Epsilon);
        assert_eq!(Label::parse(".").unwrap(), Label::Any);
        assert_eq!(Label::parse("a").unwrap(), Label::Literal('a'));
        assert_eq!(Label::parse("[0-9]").unwrap(), Label::Range('0', '9'));
        assert_eq!(Label::parse("{ab}").unwrap(), Label::Set(vec!['a', 'b']));
    }

    #[test]
    fn test_parse_rejects_compound_text() {
        assert!(Label::parse("ab").is_err());
        assert!(Label::parse("[z-a]").is_err());
        assert!(Label::parse("{}").is_err());
        assert!(Label::parse("").is_err());
    }

    #[test]
    fn test_display_reads_back() {
        for label in [
            Label::Epsilon,
            Label::Any,
            Label::Literal('q'),
            Label::Range('a', 'f'),
            Label::Set(vec!['x', 'y', 'z']),
            Label::Except(vec![('a', 'c'), ('x', 'x')]),
        ] {
            assert_eq!(Label::parse(&label.to_string()).unwrap(), label);
        }
    }
}
