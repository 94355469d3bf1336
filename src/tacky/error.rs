use thiserror::Error;

/// Failures here are compiler bugs: the parser and the semantic passes are
/// supposed to make these states unreachable.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IRError {
    #[error("internal error: {0} statement reached IR generation without a loop label")]
    MissingLoopLabel(&'static str),

    #[error("internal error: assignment target is not a variable after resolution")]
    InvalidAssignmentTarget,
}

pub type IResult<T> = Result<T, IRError>;
