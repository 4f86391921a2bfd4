use bstr::BString;
use thiserror::Error;

use crate::token::TokenKind;

/// The first diagnostic produced by a parse. Parsing halts as soon as
/// one latches; no recovery is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected '{found}' in {context}")]
    UnexpectedToken {
        found: BString,
        context: &'static str,
        offset: usize,
    },
    #[error("expected {expected} instead of '{found}' in {context}")]
    ExpectedToken {
        expected: String,
        found: BString,
        context: &'static str,
        offset: usize,
    },
    #[error("unexpected character '{found}'")]
    UnexpectedCharacter { found: BString, offset: usize },
    #[error("invalid number literal")]
    InvalidNumber { offset: usize },
    #[error("unterminated string literal")]
    UnterminatedString { offset: usize },
    #[error("unterminated template literal")]
    UnterminatedTemplate { offset: usize },
    #[error("unterminated regular expression literal")]
    UnterminatedRegExp { offset: usize },
    #[error("unterminated multi-line comment")]
    UnterminatedComment { offset: usize },
}

impl ParseError {
    /// Byte offset of the look-ahead at the point of failure. Feed it
    /// to [`crate::pos::SourceLocator`] for a line/character position.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { offset, .. }
            | ParseError::ExpectedToken { offset, .. }
            | ParseError::UnexpectedCharacter { offset, .. }
            | ParseError::InvalidNumber { offset }
            | ParseError::UnterminatedString { offset }
            | ParseError::UnterminatedTemplate { offset }
            | ParseError::UnterminatedRegExp { offset }
            | ParseError::UnterminatedComment { offset } => *offset,
        }
    }
}

/// Renders an expected-kind set for [`ParseError::ExpectedToken`]:
/// `'K'`, `'A' or 'B'`, `'A', 'B', or 'C'`.
pub(crate) fn expected_list(expected: &[TokenKind]) -> String {
    let mut s = String::new();
    for (i, tt) in expected[..expected.len() - 1].iter().enumerate() {
        if 0 < i {
            s.push_str(", ");
        }
        s.push_str(&format!("'{}'", tt));
    }
    if 2 < expected.len() {
        s.push_str(", or ");
    } else if 1 < expected.len() {
        s.push_str(" or ");
    }
    s.push_str(&format!("'{}'", expected[expected.len() - 1]));
    s
}
