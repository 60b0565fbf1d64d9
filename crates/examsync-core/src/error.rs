//! Attempt error types.
//!
//! Parsing and codec failures never surface as errors; they degrade to a
//! fallback value instead. The only fatal failures in the core are the ones
//! that make an attempt impossible to start.

use thiserror::Error;

/// Errors raised while turning an attempt-start payload into an `AttemptRecord`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttemptError {
    /// The payload carried no attempt id (absent or blank).
    #[error("attempt start payload has no attempt id")]
    MissingAttemptId,

    /// A section in the paper has no id.
    #[error("section #{index} in the paper has no id")]
    MissingSectionId { index: usize },

    /// The same question id appears in more than one place in the paper.
    #[error("question {question_id} appears more than once in the paper")]
    DuplicateQuestion { question_id: String },
}

impl AttemptError {
    /// Message shown to the user when the start flow has to be abandoned.
    pub fn user_message(&self) -> &'static str {
        match self {
            AttemptError::MissingAttemptId => {
                "Could not start the test: the server did not return an attempt. Please try again."
            }
            AttemptError::MissingSectionId { .. } | AttemptError::DuplicateQuestion { .. } => {
                "Could not start the test: the paper is malformed. Please contact support."
            }
        }
    }
}
