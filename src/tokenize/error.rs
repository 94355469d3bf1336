use thiserror::Error;

use crate::location::Location;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TokenizerError {
    #[error("unexpected character `{0}` at {1}")]
    UnexpectedCharacter(char, Location),

    #[error("invalid number `{0}` at {1}")]
    InvalidNumber(String, Location),
}
