//! Thompson-style construction by edge rewriting
//!
//! The builder starts from a single edge labeled with the whole expression
//! and repeatedly replaces the first compound edge (nodes by ID, edges in
//! stored order) with a small subgraph, until every label is atomic. Each
//! rewrite is recorded as a snapshot.
//!
//! Rules, tried in order on a compound label between `from` and `to`:
//!   1. `( e )`        → `from -e-> to`
//!   2. `e1 + e2 + …`  → `from -e1-> to`, `from -e2-> to`, …
//!   3. `e^`           → `from -e-> M`, `M -ε-> to`, `M -e-> M`
//!   4. `e*`           → `from -ε-> M`, `M -ε-> to`, `M -e-> M`
//!   5. `e1 e2 …`      → `from -e1-> M1 -e2-> … -> to`
//!   6. atom           → `from -atom-> to`

use crate::error::{ParseError, Result};
use crate::graph::{Automaton, NodeId, Transition};
use crate::label::Label;
use crate::lexer::Token;
use crate::pattern::Pattern;
use tracing::debug;

/// One decomposition step for a compound label
#[derive(Debug, Clone, PartialEq)]
pub enum Rewrite {
    /// Strip enclosing parentheses
    Parens(Pattern),
    /// Split a top-level union
    Union(Vec<Pattern>),
    /// Kleene plus of the operand
    KleenePlus(Pattern),
    /// Kleene star of the operand
    KleeneStar(Pattern),
    /// Chain concatenated pieces
    Concat(Vec<Pattern>),
    /// Already a single atom
    Atom(Label),
}

impl Rewrite {
    /// Pick the rule that applies to a pattern
    pub fn classify(pattern: &Pattern) -> std::result::Result<Self, ParseError> {
        if pattern.is_empty() {
            return Ok(Rewrite::Atom(Label::Epsilon));
        }

        if let Some(inner) = pattern.interior() {
            return Ok(Rewrite::Parens(inner));
        }

        if let Some(parts) = pattern.split_union()? {
            return Ok(Rewrite::Union(parts));
        }

        if let Some((inner, op)) = pattern.strip_postfix()? {
            return Ok(match op {
                Token::Plus => Rewrite::KleenePlus(inner),
                _ => Rewrite::KleeneStar(inner),
            });
        }

        let mut pieces = pattern.split_concat()?;
        if pieces.len() >= 2 {
            return Ok(Rewrite::Concat(pieces));
        }

        match pieces.pop().as_ref().and_then(Pattern::as_atom) {
            Some(label) => Ok(Rewrite::Atom(label.clone())),
            None => Err(ParseError::Undecomposable(pattern.to_string())),
        }
    }

    /// Short name of the rule
    pub fn rule_name(&self) -> &'static str {
        match self {
            Rewrite::Parens(_) => "parentheses",
            Rewrite::Union(_) => "union",
            Rewrite::KleenePlus(_) => "kleene plus",
            Rewrite::KleeneStar(_) => "kleene star",
            Rewrite::Concat(_) => "concatenation",
            Rewrite::Atom(_) => "atom",
        }
    }
}

/// Builds a graph automaton from an expression
#[derive(Debug, Default)]
pub struct Builder {
    automaton: Automaton,
}

impl Builder {
    /// Create a builder with an empty automaton
    pub fn new() -> Self {
        Builder::default()
    }

    /// Compile an expression into an automaton with one start node `q0` and
    /// one final node `q1`
    pub fn build(mut self, expression: &str) -> Result<Automaton> {
        let pattern = Pattern::parse(expression)?;

        let start = self.automaton.add_node();
        let end = self.automaton.add_node();
        self.automaton.set_start(start);
        self.automaton.set_final(end);

        let comment = format!(
            "initial expression '{}': {} -> {}",
            pattern,
            self.automaton.name_of(start),
            self.automaton.name_of(end)
        );
        self.add_expr(start, end, pattern);
        self.automaton.snapshot(comment);

        while let Some((from, index)) = self.automaton.first_pending() {
            let edge = self.automaton.remove_edge(from, index);
            let Transition::Expr(pattern) = edge.transition else {
                continue;
            };
            let to = edge.target;

            let rewrite = Rewrite::classify(&pattern)?;
            let comment = format!(
                "{} on {} -> {} '{}'",
                rewrite.rule_name(),
                self.automaton.name_of(from),
                self.automaton.name_of(to),
                pattern
            );
            debug!(
                step = self.automaton.history().len(),
                rule = rewrite.rule_name(),
                from,
                to,
                expression = %pattern,
                "rewriting edge"
            );

            self.apply(from, to, rewrite);
            self.automaton.snapshot(comment);
        }

        debug!(
            nodes = self.automaton.len(),
            edges = self.automaton.edge_count(),
            steps = self.automaton.history().len(),
            "construction finished"
        );
        Ok(self.automaton)
    }

    /// Add an edge, keeping single atoms and the empty pattern atomic
    fn add_expr(&mut self, from: NodeId, to: NodeId, pattern: Pattern) {
        let transition = if pattern.is_empty() {
            Transition::Atom(Label::Epsilon)
        } else if let Some(label) = pattern.as_atom() {
            Transition::Atom(label.clone())
        } else {
            Transition::Expr(pattern)
        };
        self.automaton.add_edge(from, to, transition);
    }

    fn apply(&mut self, from: NodeId, to: NodeId, rewrite: Rewrite) {
        match rewrite {
            Rewrite::Parens(inner) => self.add_expr(from, to, inner),
            Rewrite::Union(parts) => {
                for part in parts {
                    self.add_expr(from, to, part);
                }
            }
            Rewrite::KleenePlus(inner) => {
                let middle = self.automaton.add_node();
                self.add_expr(from, middle, inner.clone());
                self.automaton.add_atom(middle, to, Label::Epsilon);
                self.add_expr(middle, middle, inner);
            }
            Rewrite::KleeneStar(inner) => {
                let middle = self.automaton.add_node();
                self.automaton.add_atom(from, middle, Label::Epsilon);
                self.automaton.add_atom(middle, to, Label::Epsilon);
                self.add_expr(middle, middle, inner);
            }
            Rewrite::Concat(mut pieces) => {
                let last = pieces.pop();
                let mut current = from;
                for piece in pieces {
                    let next = self.automaton.add_node();
                    self.add_expr(current, next, piece);
                    current = next;
                }
                if let Some(last) = last {
                    self.add_expr(current, to, last);
                }
            }
            Rewrite::Atom(label) => self.automaton.add_atom(from, to, label),
        }
    }
}

/// Compile an expression into a graph automaton
pub fn build(expression: &str) -> Result<Automaton> {
    Builder::new().build(expression)
}
