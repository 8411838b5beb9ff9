//! Error types for rgsync-codec.

use thiserror::Error;

/// All errors that can arise from encoding or decoding container data.
#[derive(Debug, Error)]
pub enum CodecError {
    /// zlib stream error during per-entry decompression.
    #[error("zlib error: {0}")]
    Zlib(#[from] std::io::Error),

    /// Malformed or unsupported structured-dump data, with byte offset.
    #[error("invalid container dump at byte {offset}: {message}")]
    Dump { offset: usize, message: String },

    /// The container's root value did not have the expected shape.
    #[error("container root is not {expected}")]
    Shape { expected: &'static str },

    /// YAML serialization or parse error (text artifacts).
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A `!binary` scalar in a text artifact was not valid base64.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Malformed export digest line.
    #[error("digest line {line}: {message}")]
    Manifest { line: usize, message: String },
}

pub(crate) fn dump_err(offset: usize, message: impl Into<String>) -> CodecError {
    CodecError::Dump {
        offset,
        message: message.into(),
    }
}
