use crate::{Pos, Token};

use thiserror::Error as ThisError;

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    #[error("syntax error: {value:?} at {pos:?} - {message}")]
    SyntaxError {
        value: String,
        pos: Pos,
        message: &'static str,
    },

    #[error("unknown declaration keyword {value:?} at {pos:?}")]
    UnknownDeclaration { value: String, pos: Pos },

    #[error("unexpected end of input - last token: {prev_value:?} at {prev_pos:?}")]
    UnexpectedEof {
        prev_value: Option<String>,
        prev_pos: Option<Pos>,
    },
}

impl ParserError {
    pub fn syntax(token: Token<'_>, message: &'static str) -> ParserError {
        ParserError::SyntaxError {
            value: token.val.as_str().to_owned(),
            pos: token.pos,
            message,
        }
    }

    pub fn unknown_declaration(token: Token<'_>) -> ParserError {
        ParserError::UnknownDeclaration {
            value: token.val.as_str().to_owned(),
            pos: token.pos,
        }
    }

    pub fn unexpected_eof(prev: Option<Token<'_>>) -> ParserError {
        ParserError::UnexpectedEof {
            prev_value: prev.map(|t| t.val.as_str().to_owned()),
            prev_pos: prev.map(|t| t.pos),
        }
    }
}
