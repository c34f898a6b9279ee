//! Error types for study-core.

use thiserror::Error;

use crate::types::StudyMode;

/// Result type alias using StudyError.
pub type Result<T> = std::result::Result<T, StudyError>;

/// Errors raised while starting or driving a study session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StudyError {
    #[error("{mode} mode needs at least {required} card(s), deck has {actual}")]
    InsufficientData {
        mode: StudyMode,
        required: usize,
        actual: usize,
    },

    #[error("invalid command: {0}")]
    InvalidCommand(String),
}

impl StudyError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidCommand(reason.into())
    }
}
