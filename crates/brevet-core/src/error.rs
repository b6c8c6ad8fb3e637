//! Error types for brevet-core.
//!
//! Configuration problems (unknown subjects, empty subjects, broken banks) are
//! fatal and surface as [`QuizError`]. Storage write failures are reported as
//! [`StorageError`] and only ever logged by callers: in-memory state stays
//! authoritative.

use thiserror::Error;

use crate::model::Subject;

/// Result type alias using [`QuizError`].
pub type Result<T> = std::result::Result<T, QuizError>;

/// Errors raised by the bank, the answer store and the exam session.
#[derive(Debug, Error)]
pub enum QuizError {
    /// A subject key that is not part of the fixed subject set.
    #[error("unknown subject: {0}")]
    UnknownSubject(String),

    /// The bank holds no exercises for the requested subject.
    #[error("no exercises for subject {0}")]
    EmptySubject(Subject),

    /// No exercise with this id (in the bank, subject or exam paper).
    #[error("exercise not found: {0}")]
    NotFound(String),

    /// Two exercises share the same id.
    #[error("duplicate exercise id: {0}")]
    DuplicateId(String),

    /// An exercise violates a structural invariant.
    #[error("invalid exercise {id}: {reason}")]
    InvalidExercise { id: String, reason: String },

    /// Sampling produced no questions at all.
    #[error("cannot start an exam: the question bank is empty")]
    EmptyPaper,

    /// The operation requires a running exam session.
    #[error("exam is not running")]
    NotRunning,

    /// The operation requires the exam to be stopped first.
    #[error("exam is still running")]
    StillRunning,
}

/// Errors from a [`KeyValueStore`](crate::storage::KeyValueStore) write.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write state file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}
