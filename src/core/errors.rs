use thiserror::Error;

/// Library-wide error type.
///
/// Variants map to the failure taxonomy the pipeline distinguishes:
/// invalid input halts a run early, provider errors come from the
/// embedding/generation HTTP boundary.
#[derive(Debug, Error)]
pub enum DocqaError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("provider error: {0}")]
    Provider(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocqaError {
    pub fn provider<E: std::fmt::Display>(err: E) -> Self {
        DocqaError::Provider(err.to_string())
    }
}
