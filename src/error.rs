//! Error types for the submission workflow engine.
//!
//! Invariant violations inside the engine (a terminal message fed back in, an
//! action sitting in the wrong slot) are programming errors and panic. Everything
//! here is a runtime outcome that callers are expected to handle.

use crate::workflow::stage::WorkflowStage;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkflowError {
    #[error("Workflow cancelled for submission {submission_id} during {stage} stage")]
    Cancelled {
        submission_id: String,
        stage: WorkflowStage,
    },
    #[error("{stage} action failed for submission {submission_id}: {reason}")]
    ActionFailed {
        submission_id: String,
        stage: WorkflowStage,
        reason: String,
    },
    #[error("Submission {submission_id} exceeded {limit} stage transitions without finishing")]
    TransitionLimitExceeded { submission_id: String, limit: u32 },
    #[error("Submission {submission_id} is already at the terminal stage")]
    AlreadyFinished { submission_id: String },
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl WorkflowError {
    pub fn cancelled(submission_id: impl Into<String>, stage: WorkflowStage) -> Self {
        Self::Cancelled {
            submission_id: submission_id.into(),
            stage,
        }
    }

    pub fn action_failed(
        submission_id: impl Into<String>,
        stage: WorkflowStage,
        reason: impl Into<String>,
    ) -> Self {
        Self::ActionFailed {
            submission_id: submission_id.into(),
            stage,
            reason: reason.into(),
        }
    }

    /// Whether this error came from a triggered cancellation signal rather
    /// than a failure of the stage's work.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

impl From<serde_json::Error> for WorkflowError {
    fn from(error: serde_json::Error) -> Self {
        WorkflowError::SerializationError(format!("JSON serialization error: {error}"))
    }
}

impl From<config::ConfigError> for WorkflowError {
    fn from(error: config::ConfigError) -> Self {
        WorkflowError::ConfigurationError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
