use thiserror::Error;

/// Errors from the validation engine.
///
/// Problems with a proposal never surface here; they end up as issues on the
/// verdict. Only a broken engine setup is an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid validation configuration: {0}")]
    InvalidConfig(String),
}

pub type ValidationResult<T> = Result<T, ValidationError>;
