#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Submission Workflow
//!
//! Stage-progression engine for submissions processed by a queue-driven,
//! multi-step asynchronous workflow.
//!
//! ## Overview
//!
//! A submission moves through a fixed sequence of stages:
//!
//! ```text
//! Analyze -> Report -> Telemetry -> Finished
//! ```
//!
//! Each non-terminal stage is bound to exactly one [`WorkflowAction`]. A queue
//! consumer receives a [`WorkflowQueueMessage`] ("submission X is at stage S"),
//! hands it to the [`WorkflowManager`], which runs the action bound to S and
//! returns the message for the stage the action chose next. The consumer
//! re-enqueues that message until it reaches `Finished`.
//!
//! The engine performs no business work itself and owns no transport.
//!
//! ## Module Organization
//!
//! - [`workflow`] - Stages, the action trait, built-in actions, the manager
//! - [`messaging`] - Queue message format
//! - [`config`] - Host configuration
//! - [`logging`] - Console logging setup and structured transition events
//! - [`error`] - Error types
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use submission_workflow::{WorkflowManager, WorkflowQueueMessage};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn handle(manager: Arc<WorkflowManager>, incoming: WorkflowQueueMessage)
//! #     -> submission_workflow::Result<()> {
//! let cancel = CancellationToken::new();
//! let next = manager.execute_actions_to_next_stage(&incoming, &cancel).await?;
//! if !next.is_terminal() {
//!     // enqueue `next.to_json()?` on the workflow queue
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod messaging;
pub mod workflow;

pub use config::{LogFormat, WorkflowConfig};
pub use error::{Result, WorkflowError};
pub use messaging::WorkflowQueueMessage;
pub use workflow::{
    AnalyzeAction, ReportAction, SlotBinding, TelemetryAction, WorkflowAction, WorkflowManager,
    WorkflowRun, WorkflowStage, ACTION_SLOT_COUNT,
};
