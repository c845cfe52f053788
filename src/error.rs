use std::io;
use thiserror::Error;

/// Errors from FASTQ parsing.
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid format at byte {position}: {kind}")]
    InvalidFormat { kind: FormatError, position: u64 },
}

impl ReaderError {
    pub(crate) fn format(kind: FormatError, position: u64) -> Self {
        tracing::debug!(position, %kind, "FASTQ format error");
        ReaderError::InvalidFormat { kind, position }
    }

    /// The structural problem, if this is a format error.
    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            ReaderError::InvalidFormat { kind, .. } => Some(kind),
            ReaderError::Io(_) => None,
        }
    }
}

/// Ways a byte stream can fail to be FASTQ.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("missing header marker: expected '@', found {found:?}")]
    MissingHeader { found: char },

    #[error("missing separator line")]
    MissingSeparator,

    #[error("quality length mismatch: expected {expected}, found at least {found}")]
    QualityLengthMismatch { expected: usize, found: usize },

    #[error("truncated record")]
    TruncatedRecord,

    #[error("separator does not repeat the record name")]
    SeparatorMismatch,
}
