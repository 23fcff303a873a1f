//! # Workflow Action
//!
//! The unit of work bound to one non-terminal stage.

use crate::error::Result;
use crate::workflow::stage::WorkflowStage;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Trait for stage actions
///
/// One instance per stage is created when the manager is built and reused for
/// the life of the process, so implementations may hold expensive resources
/// and must tolerate concurrent `execute` calls for different submissions.
#[async_trait]
pub trait WorkflowAction: Send + Sync {
    /// The stage this action is bound to
    ///
    /// Must be non-terminal and must match the slot the action occupies in the
    /// manager's table.
    fn current_stage(&self) -> WorkflowStage;

    /// Perform the stage's work for a submission
    ///
    /// # Returns
    ///
    /// * `Ok(stage)` - The stage to run next. Usually `current_stage().next()`,
    ///   but any stage is accepted, including earlier ones (to redo work) or
    ///   `Finished` (to end early).
    /// * `Err(WorkflowError::Cancelled { .. })` - `cancel` fired before the work
    ///   completed
    /// * `Err` - Any other failure of the underlying work
    async fn execute(
        &self,
        submission_id: &str,
        cancel: &CancellationToken,
    ) -> Result<WorkflowStage>;

    /// Get the action name for identification
    ///
    /// This is used for logging and diagnostics.
    /// Default implementation returns the type name.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
