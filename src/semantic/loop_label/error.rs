use thiserror::Error;

use crate::location::Location;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoopLabelerError {
    #[error("break statement outside of loop at {0}")]
    BreakOutsideLoop(Location),

    #[error("continue statement outside of loop at {0}")]
    ContinueOutsideLoop(Location),
}
