//! # Submission Workflow
//!
//! Stage enumeration, the action capability, the built-in actions and the
//! manager that chains them.

pub mod action;
pub mod actions;
pub mod manager;
pub mod stage;

pub use action::WorkflowAction;
pub use actions::{builtin_actions, AnalyzeAction, ReportAction, TelemetryAction};
pub use manager::{SlotBinding, WorkflowManager, WorkflowRun};
pub use stage::{WorkflowStage, ACTION_SLOT_COUNT};
