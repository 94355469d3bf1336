use thiserror::Error;

use crate::location::Location;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SemanticError {
    #[error("duplicate variable declaration `{0}` at {1}")]
    DuplicateDeclaration(String, Location),

    #[error("undeclared variable `{0}` at {1}")]
    UndeclaredVariable(String, Location),

    #[error("invalid lvalue at {0}")]
    InvalidLvalue(Location),
}
