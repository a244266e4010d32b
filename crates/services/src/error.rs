//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::import::ParseError;
use quiz_core::model::{TopicError, TopicId};
use storage::StorageError;

/// Errors emitted by `TopicService::import_topic`.
///
/// A failed import never leaves a topic behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImportError {
    #[error(transparent)]
    InvalidName(#[from] TopicError),
    #[error("a topic named \"{name}\" already exists")]
    DuplicateName { name: String },
    #[error("the file is empty")]
    EmptyContent,
    #[error("no valid questions found ({skipped} lines skipped)")]
    NoValidRecords { skipped: usize },
}

impl From<ParseError> for ImportError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::NoValidRecords { skipped } => Self::NoValidRecords { skipped },
            _ => Self::EmptyContent,
        }
    }
}

impl From<StorageError> for ImportError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DuplicateName { name } => Self::DuplicateName { name },
        }
    }
}

/// Errors emitted by session services.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    EmptyList,
    #[error("session already completed")]
    Completed,
    #[error("question {index} is out of range (session has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no practice session in progress")]
    NotPracticing,
    #[error("no finished session to review")]
    NotInSummary,
    #[error("a session is already active")]
    AlreadyActive,
    #[error("topic {0} not found")]
    UnknownTopic(TopicId),
}
