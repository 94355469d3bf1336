use thiserror::Error;

/// Failures here are compiler bugs: the TAC generator guarantees every
/// instruction destination is a variable.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodegenError {
    #[error("internal error: instruction destination is the constant {0}")]
    ConstantDestination(i32),
}

pub type Result<T = ()> = std::result::Result<T, CodegenError>;
