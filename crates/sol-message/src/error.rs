use thiserror::Error;

/// Message compilation and wire codec errors.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("message build error: {0}")]
    MessageBuildError(String),

    #[error("encode error: {0}")]
    EncodeError(String),

    #[error("decode error: {0}")]
    DecodeError(String),
}
