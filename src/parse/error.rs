use thiserror::Error;

use crate::location::Location;
use crate::tokenize::TokenKind;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserError {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("expected {0:?}, found {1:?} at {2}")]
    ExpectedToken(TokenKind, TokenKind, Location),

    #[error("expected identifier, found {0:?} at {1}")]
    ExpectedIdentifier(TokenKind, Location),

    #[error("expected a constant, identifier, unary operator or `(`, found {0:?} at {1}")]
    ExpectedFactor(TokenKind, Location),

    #[error("expected a binary operator, found {0:?} at {1}")]
    ExpectedBinaryOperator(TokenKind, Location),

    #[error("trailing input after function: {0:?} at {1}")]
    NotAtEnd(TokenKind, Location),
}
