//! Test doubles for stage actions shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use submission_workflow::{Result, WorkflowAction, WorkflowError, WorkflowStage};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// Action that records its calls and returns a fixed next stage
#[derive(Debug)]
pub struct StubAction {
    stage: WorkflowStage,
    next: WorkflowStage,
    calls: AtomicUsize,
    submissions: std::sync::Mutex<Vec<String>>,
}

impl StubAction {
    pub fn new(stage: WorkflowStage, next: WorkflowStage) -> Arc<Self> {
        Arc::new(Self {
            stage,
            next,
            calls: AtomicUsize::new(0),
            submissions: std::sync::Mutex::new(Vec::new()),
        })
    }

    /// Stub that advances to the natural successor
    pub fn advancing(stage: WorkflowStage) -> Arc<Self> {
        Self::new(stage, stage.next().unwrap_or(WorkflowStage::Finished))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> Vec<String> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkflowAction for StubAction {
    fn current_stage(&self) -> WorkflowStage {
        self.stage
    }

    async fn execute(
        &self,
        submission_id: &str,
        _cancel: &CancellationToken,
    ) -> Result<WorkflowStage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.submissions
            .lock()
            .unwrap()
            .push(submission_id.to_string());
        Ok(self.next)
    }

    fn name(&self) -> &'static str {
        "stub_action"
    }
}

/// Action whose work always fails
#[derive(Debug)]
pub struct FailingAction {
    pub stage: WorkflowStage,
    pub reason: &'static str,
}

#[async_trait]
impl WorkflowAction for FailingAction {
    fn current_stage(&self) -> WorkflowStage {
        self.stage
    }

    async fn execute(
        &self,
        submission_id: &str,
        _cancel: &CancellationToken,
    ) -> Result<WorkflowStage> {
        Err(WorkflowError::action_failed(
            submission_id,
            self.stage,
            self.reason,
        ))
    }
}

/// Action that signals when it starts and then waits until cancelled
#[derive(Debug)]
pub struct BlockingAction {
    stage: WorkflowStage,
    pub started: Notify,
}

impl BlockingAction {
    pub fn new(stage: WorkflowStage) -> Arc<Self> {
        Arc::new(Self {
            stage,
            started: Notify::new(),
        })
    }
}

#[async_trait]
impl WorkflowAction for BlockingAction {
    fn current_stage(&self) -> WorkflowStage {
        self.stage
    }

    async fn execute(
        &self,
        submission_id: &str,
        cancel: &CancellationToken,
    ) -> Result<WorkflowStage> {
        self.started.notify_one();
        tokio::select! {
            _ = cancel.cancelled() => Err(WorkflowError::cancelled(submission_id, self.stage)),
            _ = tokio::time::sleep(std::time::Duration::from_secs(3600)) => {
                Ok(self.stage.next().unwrap_or(WorkflowStage::Finished))
            }
        }
    }
}

/// A full table of advancing stubs, slot order
pub fn stub_table() -> (Vec<Arc<StubAction>>, Vec<Arc<dyn WorkflowAction>>) {
    let stubs: Vec<_> = WorkflowStage::actionable()
        .map(StubAction::advancing)
        .collect();
    let table = stubs
        .iter()
        .map(|s| s.clone() as Arc<dyn WorkflowAction>)
        .collect();
    (stubs, table)
}

/// Erase a concrete test action into a table entry
pub fn slot<A: WorkflowAction + 'static>(action: &Arc<A>) -> Arc<dyn WorkflowAction> {
    action.clone()
}
