//! # Built-in Stage Actions
//!
//! The actions placed into the default slot table, one per non-terminal stage.
//!
//! The real analysis, report generation and telemetry emission live in the
//! services that own them. These actions mark the stage boundary: they observe
//! cancellation, record the transition, and hand the submission to the
//! natural successor stage.

use super::action::WorkflowAction;
use super::stage::WorkflowStage;
use crate::error::{Result, WorkflowError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Shared body of the built-in actions
async fn advance(
    stage: WorkflowStage,
    submission_id: &str,
    cancel: &CancellationToken,
) -> Result<WorkflowStage> {
    debug!(submission_id = %submission_id, stage = %stage, "Running built-in stage action");

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            warn!(submission_id = %submission_id, stage = %stage, "Stage action cancelled");
            Err(WorkflowError::cancelled(submission_id, stage))
        }
        _ = tokio::task::yield_now() => {
            Ok(stage.next().unwrap_or(WorkflowStage::TERMINAL))
        }
    }
}

/// Analyze stage: Analyze -> Report
#[derive(Debug, Default, Clone)]
pub struct AnalyzeAction;

#[async_trait]
impl WorkflowAction for AnalyzeAction {
    fn current_stage(&self) -> WorkflowStage {
        WorkflowStage::Analyze
    }

    async fn execute(
        &self,
        submission_id: &str,
        cancel: &CancellationToken,
    ) -> Result<WorkflowStage> {
        advance(self.current_stage(), submission_id, cancel).await
    }

    fn name(&self) -> &'static str {
        "analyze_action"
    }
}

/// Report stage: Report -> Telemetry
#[derive(Debug, Default, Clone)]
pub struct ReportAction;

#[async_trait]
impl WorkflowAction for ReportAction {
    fn current_stage(&self) -> WorkflowStage {
        WorkflowStage::Report
    }

    async fn execute(
        &self,
        submission_id: &str,
        cancel: &CancellationToken,
    ) -> Result<WorkflowStage> {
        advance(self.current_stage(), submission_id, cancel).await
    }

    fn name(&self) -> &'static str {
        "report_action"
    }
}

/// Telemetry stage: Telemetry -> Finished
#[derive(Debug, Default, Clone)]
pub struct TelemetryAction;

#[async_trait]
impl WorkflowAction for TelemetryAction {
    fn current_stage(&self) -> WorkflowStage {
        WorkflowStage::Telemetry
    }

    async fn execute(
        &self,
        submission_id: &str,
        cancel: &CancellationToken,
    ) -> Result<WorkflowStage> {
        advance(self.current_stage(), submission_id, cancel).await
    }

    fn name(&self) -> &'static str {
        "telemetry_action"
    }
}

/// One instance of every built-in action, in no particular order
pub fn builtin_actions() -> Vec<Arc<dyn WorkflowAction>> {
    vec![
        Arc::new(AnalyzeAction),
        Arc::new(ReportAction),
        Arc::new(TelemetryAction),
    ]
}
