//! Error types for sfzr

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum SfzrError {
    #[error("Invalid value `{value}` for opcode `{opcode}`")]
    InvalidOpcodeValue { opcode: String, value: String },

    #[error("Unknown effect type: {0}")]
    UnknownEffect(String),

    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(f64),

    #[error("Invalid block size: {0}")]
    InvalidBlockSize(usize),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },
}

/// Result type alias
pub type SfzrResult<T> = Result<T, SfzrError>;
