//! Error types for sqlporter.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// How the streaming pipeline treats an error.
///
/// The set is closed: every [`PorterError`] maps to exactly one kind, and the
/// retry policy only ever looks at the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Will fail the same way again. Aborts the stream.
    Permanent,
    /// Transient condition; replaying the same bytes may succeed.
    Temporary,
    /// The overall deadline of a call expired.
    Timeout,
    /// The input can never be parsed (missing source, unterminated literal, ...).
    InvalidInput,
}

/// The main error type for sqlporter operations.
#[derive(Debug, Error)]
pub enum PorterError {
    /// The caller handed in something that can never be parsed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Rejected DDL syntax.
    #[error("Syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// A transient failure reported by a source or a dialect.
    #[error("Temporary failure: {0}")]
    Temporary(String),

    /// The overall deadline of a streaming-parse call expired.
    #[error("parsing timeout after {elapsed:?}")]
    Timeout { elapsed: Duration },

    /// A temporary failure kept happening until the retry budget ran out.
    #[error("Batch {batch} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        batch: u64,
        attempts: u32,
        source: Box<PorterError>,
    },

    /// A dialect panicked while parsing a batch.
    #[error("Worker panicked while parsing batch {batch}: {message}")]
    WorkerPanic { batch: u64, message: String },

    /// Any other failure, tagged with the batch it happened in.
    #[error("Batch {batch}: {source}")]
    Batch {
        batch: u64,
        source: Box<PorterError>,
    },

    /// The schema cannot be rendered in the target dialect.
    #[error("Generation error: {0}")]
    Generate(String),

    /// Unknown dialect name.
    #[error("Unknown dialect: '{0}'. Expected: oracle, mysql, postgres, sqlserver or sqlite")]
    UnknownDialect(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pipeline bookkeeping went wrong.
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl PorterError {
    /// Create a syntax error at the given byte offset.
    pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }

    /// Create an invalid-input error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Attach the index of the batch this error came from.
    pub fn in_batch(self, batch: u64) -> Self {
        match self {
            // Already carry their batch.
            Self::Batch { .. } | Self::RetriesExhausted { .. } | Self::WorkerPanic { .. } => self,
            other => Self::Batch {
                batch,
                source: Box::new(other),
            },
        }
    }

    /// Classify this error.
    ///
    /// Only errors that explicitly say so are temporary: [`PorterError::Temporary`]
    /// and I/O errors whose kind is `Interrupted`, `WouldBlock` or `TimedOut`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) | Self::UnknownDialect(_) => ErrorKind::InvalidInput,
            Self::Temporary(_) => ErrorKind::Temporary,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Batch { source, .. } => source.kind(),
            Self::Io(err) => match err.kind() {
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
                    ErrorKind::Temporary
                }
                _ => ErrorKind::Permanent,
            },
            Self::Syntax { .. }
            | Self::RetriesExhausted { .. }
            | Self::WorkerPanic { .. }
            | Self::Generate(_)
            | Self::Config(_)
            | Self::Internal(_) => ErrorKind::Permanent,
        }
    }

    /// Returns `true` if replaying the same input may succeed.
    pub fn is_temporary(&self) -> bool {
        self.kind() == ErrorKind::Temporary
    }

    /// Returns `true` if this is a deadline expiry.
    pub fn is_timeout(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }
}

/// Result type alias for sqlporter operations.
pub type PorterResult<T> = Result<T, PorterError>;
