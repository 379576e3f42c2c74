//! CLI error type.

use amitherm_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Bad invocation: missing options, unusable combinations.
    #[error("{0}")]
    Usage(String),
}
