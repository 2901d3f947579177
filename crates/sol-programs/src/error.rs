use thiserror::Error;

/// Instruction builder errors.
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("derivation error: {0}")]
    DerivationError(String),
}
