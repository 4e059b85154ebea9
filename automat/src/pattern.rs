//! Tokenized expressions
//!
//! A [`Pattern`] is the compound label an edge carries while the builder is
//! still decomposing it. The structural queries here are the building blocks
//! of the rewrite rules in [`crate::builder`].

use crate::error::ParseError;
use crate::label::Label;
use crate::lexer::{Lexer, Token};
use std::fmt;

/// A tokenized, parenthesis-balanced expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    tokens: Vec<Token>,
}

impl Pattern {
    /// Tokenize an expression, rejecting unbalanced parentheses and
    /// malformed atoms
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Pattern { tokens })
    }

    /// Wrap an already balanced token run
    pub(crate) fn from_tokens(tokens: &[Token]) -> Self {
        Pattern {
            tokens: tokens.to_vec(),
        }
    }

    /// The tokens of this pattern
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Whether the pattern has no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The label, if the pattern is a single atom
    pub fn as_atom(&self) -> Option<&Label> {
        match self.tokens.as_slice() {
            [Token::Atom(label)] => Some(label),
            _ => None,
        }
    }

    /// Index of the `)` matching the `(` at `open`
    fn matching_paren(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(open) {
            match token {
                Token::LeftParen => depth += 1,
                Token::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Whether one balanced `( … )` pair wraps the whole pattern
    pub fn is_enclosed(&self) -> bool {
        matches!(self.tokens.first(), Some(Token::LeftParen))
            && self.matching_paren(0) == Some(self.tokens.len() - 1)
    }

    /// The pattern inside the outer parentheses
    pub fn interior(&self) -> Option<Pattern> {
        if self.is_enclosed() {
            Some(Pattern::from_tokens(&self.tokens[1..self.tokens.len() - 1]))
        } else {
            None
        }
    }

    /// Split at every depth-0 union operator.
    ///
    /// Returns `None` when there is no top-level union.
    pub fn split_union(&self) -> Result<Option<Vec<Pattern>>, ParseError> {
        let mut parts = Vec::new();
        let mut depth = 0usize;
        let mut last_split = 0;

        for (i, token) in self.tokens.iter().enumerate() {
            match token {
                Token::LeftParen => depth += 1,
                Token::RightParen => depth -= 1,
                Token::Union if depth == 0 => {
                    parts.push(Pattern::from_tokens(&self.tokens[last_split..i]));
                    last_split = i + 1;
                }
                _ => {}
            }
        }

        if parts.is_empty() {
            return Ok(None);
        }
        parts.push(Pattern::from_tokens(&self.tokens[last_split..]));

        if parts.iter().any(Pattern::is_empty) {
            return Err(ParseError::EmptyAlternative(self.to_string()));
        }
        Ok(Some(parts))
    }

    /// Split off a trailing postfix operator, returning the operand and the
    /// operator token
    pub fn strip_postfix(&self) -> Result<Option<(Pattern, Token)>, ParseError> {
        match self.tokens.split_last() {
            Some((last, rest)) if last.is_postfix() => {
                if rest.is_empty() {
                    let op = last.operator_char().unwrap_or('*');
                    return Err(ParseError::DanglingOperator(op));
                }
                Ok(Some((Pattern::from_tokens(rest), last.clone())))
            }
            _ => Ok(None),
        }
    }

    /// Split into concatenated pieces: atoms and parenthesized spans, each
    /// with any trailing postfix operators attached
    pub fn split_concat(&self) -> Result<Vec<Pattern>, ParseError> {
        let mut pieces: Vec<Vec<Token>> = Vec::new();
        let mut i = 0;

        while i < self.tokens.len() {
            match &self.tokens[i] {
                Token::Atom(_) => {
                    pieces.push(vec![self.tokens[i].clone()]);
                    i += 1;
                }
                Token::LeftParen => {
                    let close = self
                        .matching_paren(i)
                        .ok_or_else(|| ParseError::Undecomposable(self.to_string()))?;
                    pieces.push(self.tokens[i..=close].to_vec());
                    i = close + 1;
                }
                op @ (Token::Star | Token::Plus) => {
                    let Some(previous) = pieces.last_mut() else {
                        return Err(ParseError::DanglingOperator(
                            op.operator_char().unwrap_or('*'),
                        ));
                    };
                    previous.push(op.clone());
                    i += 1;
                }
                Token::Union | Token::RightParen => {
                    return Err(ParseError::Undecomposable(self.to_string()));
                }
            }
        }

        Ok(pieces
            .iter()
            .map(|piece| Pattern::from_tokens(piece))
            .collect())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}
