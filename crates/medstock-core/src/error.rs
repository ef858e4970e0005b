//! Engine error types.

use thiserror::Error;

/// Errors raised by the classification engine and its input boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
