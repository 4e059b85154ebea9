//! Lexer for the expression mini-language
//!
//! Every character is classified up front as an operator, an atom or
//! grouping, so the rewrite rules never look at raw text. Whitespace only
//! separates tokens.

use crate::error::ParseError;
use crate::label::Label;
use std::fmt;

/// A token in an expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Left parenthesis `(`
    LeftParen,
    /// Right parenthesis `)`
    RightParen,
    /// Union `+`
    Union,
    /// Kleene star `*`
    Star,
    /// Kleene plus `^`
    Plus,
    /// An atomic label: literal, `.`, epsilon, `[x-y]` or `{set}`
    Atom(Label),
}

impl Token {
    /// Whether this token is a postfix operator
    pub fn is_postfix(&self) -> bool {
        matches!(self, Token::Star | Token::Plus)
    }

    /// The source character of an operator token
    pub fn operator_char(&self) -> Option<char> {
        match self {
            Token::Star => Some('*'),
            Token::Plus => Some('^'),
            Token::Union => Some('+'),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Union => write!(f, "+"),
            Token::Star => write!(f, "*"),
            Token::Plus => write!(f, "^"),
            Token::Atom(label) => write!(f, "{}", label),
        }
    }
}

/// Lexer for expressions
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    /// Positions of the currently open parentheses
    open_groups: Vec<usize>,
}

impl Lexer {
    /// Create a new lexer for the given expression
    pub fn new(input: &str) -> Self {
        Lexer {
            chars: input.chars().collect(),
            position: 0,
            open_groups: Vec::new(),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Check whether the keyword `epsilon` starts at the current position
    fn at_epsilon_keyword(&self) -> bool {
        let keyword: Vec<char> = "epsilon".chars().collect();
        self.chars
            .get(self.position..self.position + keyword.len())
            .is_some_and(|window| window == keyword.as_slice())
    }

    /// Read `[x-y]`; the current char is `[`
    fn read_range(&mut self) -> Result<Token, ParseError> {
        let start = self.position;
        let close = self.chars[start..]
            .iter()
            .position(|&c| c == ']')
            .map(|offset| start + offset)
            .ok_or(ParseError::UnclosedRange { position: start })?;

        let text: String = self.chars[start..=close].iter().collect();
        self.position = close + 1;

        match Label::parse(&text) {
            Ok(label @ Label::Range(..)) => Ok(Token::Atom(label)),
            _ => Err(ParseError::InvalidRange {
                text,
                position: start,
            }),
        }
    }

    /// Read `{abc}`; the current char is `{`
    fn read_set(&mut self) -> Result<Token, ParseError> {
        let start = self.position;
        let close = self.chars[start..]
            .iter()
            .position(|&c| c == '}')
            .map(|offset| start + offset)
            .ok_or(ParseError::UnclosedSet { position: start })?;

        let members: Vec<char> = self.chars[start + 1..close].to_vec();
        self.position = close + 1;

        if members.is_empty() {
            return Err(ParseError::EmptySet { position: start });
        }
        Ok(Token::Atom(Label::Set(members)))
    }

    /// Get the next token, or `None` at the end of input
    pub fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        while let Some(c) = self.current_char() {
            if !c.is_whitespace() {
                break;
            }
            self.advance();
        }

        let Some(c) = self.current_char() else {
            if let Some(&position) = self.open_groups.first() {
                return Err(ParseError::UnclosedGroup { position });
            }
            return Ok(None);
        };

        let token = match c {
            '(' => {
                self.open_groups.push(self.position);
                self.advance();
                Token::LeftParen
            }
            ')' => {
                if self.open_groups.pop().is_none() {
                    return Err(ParseError::UnmatchedParen {
                        position: self.position,
                    });
                }
                self.advance();
                Token::RightParen
            }
            '+' => {
                self.advance();
                Token::Union
            }
            '*' => {
                self.advance();
                Token::Star
            }
            '^' => {
                self.advance();
                Token::Plus
            }
            '.' => {
                self.advance();
                Token::Atom(Label::Any)
            }
            'ε' => {
                self.advance();
                Token::Atom(Label::Epsilon)
            }
            '[' => self.read_range()?,
            '{' => self.read_set()?,
            'e' if self.at_epsilon_keyword() => {
                self.position += "epsilon".len();
                Token::Atom(Label::Epsilon)
            }
            c if c.is_alphanumeric() => {
                self.advance();
                Token::Atom(Label::Literal(c))
            }
            ch => {
                return Err(ParseError::UnexpectedChar {
                    ch,
                    position: self.position,
                });
            }
        };

        Ok(Some(token))
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Result<Vec<Token>, ParseError> {
        Lexer::new(input).tokenize()
    }

    #[test]
    fn test_literal_sequence() {
        assert_eq!(
            lex("ab1").unwrap(),
            vec![
                Token::Atom(Label::Literal('a')),
                Token::Atom(Label::Literal('b')),
                Token::Atom(Label::Literal('1')),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(lex("").unwrap(), vec![]);
        assert_eq!(lex("   ").unwrap(), vec![]);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            lex("a* + (b)^").unwrap(),
            vec![
                Token::Atom(Label::Literal('a')),
                Token::Star,
                Token::Union,
                Token::LeftParen,
                Token::Atom(Label::Literal('b')),
                Token::RightParen,
                Token::Plus,
            ]
        );
    }

    #[test]
    fn test_bracketed_atoms() {
        assert_eq!(
            lex("[a-z]{xy}").unwrap(),
            vec![
                Token::Atom(Label::Range('a', 'z')),
                Token::Atom(Label::Set(vec!['x', 'y'])),
            ]
        );
    }

    #[test]
    fn test_plus_inside_set_is_a_member() {
        assert_eq!(
            lex("{a+b}").unwrap(),
            vec![Token::Atom(Label::Set(vec!['a', '+', 'b']))]
        );
    }

    #[test]
    fn test_epsilon_forms() {
        assert_eq!(
            lex("ε epsilon").unwrap(),
            vec![Token::Atom(Label::Epsilon), Token::Atom(Label::Epsilon)]
        );
        // A lone 'e' stays a literal
        assert_eq!(lex("e").unwrap(), vec![Token::Atom(Label::Literal('e'))]);
    }

    #[test]
    fn test_unclosed_group() {
        assert_eq!(lex("(ab"), Err(ParseError::UnclosedGroup { position: 0 }));
        assert_eq!(
            lex("a((b)"),
            Err(ParseError::UnclosedGroup { position: 1 })
        );
    }

    #[test]
    fn test_unmatched_paren() {
        assert_eq!(lex("ab)"), Err(ParseError::UnmatchedParen { position: 2 }));
    }

    #[test]
    fn test_invalid_range() {
        assert!(matches!(lex("[abc]"), Err(ParseError::InvalidRange { .. })));
        assert!(matches!(lex("[z-a]"), Err(ParseError::InvalidRange { .. })));
        assert_eq!(lex("[a-"), Err(ParseError::UnclosedRange { position: 0 }));
    }

    #[test]
    fn test_invalid_set() {
        assert_eq!(lex("{}"), Err(ParseError::EmptySet { position: 0 }));
        assert_eq!(lex("a{b"), Err(ParseError::UnclosedSet { position: 1 }));
    }

    #[test]
    fn test_unexpected_char() {
        assert_eq!(
            lex("a|b"),
            Err(ParseError::UnexpectedChar { ch: '|', position: 1 })
        );
    }
}
