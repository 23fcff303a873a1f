//! # Workflow Queue Message
//!
//! The unit exchanged with the external queue: "resume this submission at this
//! stage". The queue consumer deserializes it, hands it to the
//! [`WorkflowManager`](crate::workflow::WorkflowManager), and re-enqueues the
//! returned message unless it is terminal.

use crate::workflow::stage::WorkflowStage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message for resuming a submission at a given stage
///
/// Immutable once built; equality is by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowQueueMessage {
    /// Opaque submission identifier
    submission_id: String,
    /// Stage the submission should run next
    stage: WorkflowStage,
}

impl WorkflowQueueMessage {
    /// Create a new workflow message
    ///
    /// Callers must supply a non-empty `submission_id`; it is not checked here.
    pub fn new(submission_id: impl Into<String>, stage: WorkflowStage) -> Self {
        Self {
            submission_id: submission_id.into(),
            stage,
        }
    }

    pub fn submission_id(&self) -> &str {
        &self.submission_id
    }

    pub fn stage(&self) -> WorkflowStage {
        self.stage
    }

    /// Whether the submission has reached the end of the workflow and the
    /// message must not be re-enqueued
    pub fn is_terminal(&self) -> bool {
        self.stage.is_terminal()
    }

    pub fn into_parts(self) -> (String, WorkflowStage) {
        (self.submission_id, self.stage)
    }

    /// Convert to JSON for queue storage
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Create from JSON from queue
    pub fn from_json(json: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(json)
    }
}

impl fmt::Display for WorkflowQueueMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.submission_id, self.stage)
    }
}
