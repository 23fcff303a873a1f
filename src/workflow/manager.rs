//! # Workflow Manager
//!
//! Binds each non-terminal stage to its action and advances submissions one
//! stage per call.
//!
//! ## Construction
//!
//! Build a manager explicitly with [`WorkflowManager::new`] (built-in actions)
//! or [`WorkflowManager::with_actions`] (injected table) and pass it, usually
//! as an `Arc`, to the queue consumer. Processes that want one shared instance
//! can use [`WorkflowManager::initialize`] / [`WorkflowManager::initialize_with_actions`]
//! instead: the first call builds the instance, every later call of either
//! kind returns that same instance and ignores its arguments.
//!
//! ## Usage
//!
//! ```rust
//! use submission_workflow::{WorkflowManager, WorkflowStage};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> submission_workflow::Result<()> {
//! let manager = WorkflowManager::new();
//! let cancel = CancellationToken::new();
//!
//! let mut message = WorkflowManager::first_stage("abc123");
//! while !message.is_terminal() {
//!     message = manager.execute_actions_to_next_stage(&message, &cancel).await?;
//! }
//! assert_eq!(message.stage(), WorkflowStage::Finished);
//! # Ok(())
//! # }
//! ```

use super::action::WorkflowAction;
use super::actions::builtin_actions;
use super::stage::{WorkflowStage, ACTION_SLOT_COUNT};
use crate::config::WorkflowConfig;
use crate::error::{Result, WorkflowError};
use crate::logging::log_stage_transition;
use crate::messaging::WorkflowQueueMessage;
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Process-wide manager, built by whichever initializer runs first
static GLOBAL_MANAGER: OnceLock<Arc<WorkflowManager>> = OnceLock::new();

/// Executes the action bound to a message's stage and produces the message
/// for the stage that runs next
///
/// The action table is never mutated after construction, so one manager can
/// serve any number of concurrent submissions without locking.
pub struct WorkflowManager {
    /// Slot `i` holds the action for the stage with ordinal `i`
    actions: Vec<Arc<dyn WorkflowAction>>,
}

/// One occupied slot of the action table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotBinding {
    pub slot: usize,
    /// Stage the action reports, which may differ from the slot in a
    /// misconfigured injected table
    pub action_stage: WorkflowStage,
    pub action_name: &'static str,
}

/// Outcome of driving a submission to the terminal stage in-process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRun {
    pub final_message: WorkflowQueueMessage,
    /// Every stage the submission occupied, starting with the input stage
    pub visited: Vec<WorkflowStage>,
}

impl std::fmt::Debug for WorkflowManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowManager")
            .field("slot_count", &self.actions.len())
            .field(
                "actions",
                &self.actions.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Default for WorkflowManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowManager {
    /// Create a manager with one built-in action per non-terminal stage
    pub fn new() -> Self {
        let mut slots: Vec<Option<Arc<dyn WorkflowAction>>> = vec![None; ACTION_SLOT_COUNT];
        for action in builtin_actions() {
            Self::add_action(&mut slots, action);
        }

        let actions: Vec<_> = slots.into_iter().flatten().collect();
        assert_eq!(
            actions.len(),
            ACTION_SLOT_COUNT,
            "Every non-terminal stage needs a built-in action"
        );

        Self { actions }
    }

    /// Create a manager that uses `actions` as its slot table verbatim
    ///
    /// The table is not validated here. A misplaced action is reported when a
    /// message for its slot is executed.
    pub fn with_actions(actions: Vec<Arc<dyn WorkflowAction>>) -> Self {
        Self { actions }
    }

    fn add_action(slots: &mut [Option<Arc<dyn WorkflowAction>>], action: Arc<dyn WorkflowAction>) {
        let index = action.current_stage().ordinal();
        assert!(
            index < slots.len(),
            "Action {} is bound to terminal stage {}",
            action.name(),
            action.current_stage()
        );
        slots[index] = Some(action);
    }

    /// Get or build the shared manager with the built-in actions
    pub fn initialize() -> Arc<WorkflowManager> {
        GLOBAL_MANAGER
            .get_or_init(|| {
                info!(slots = ACTION_SLOT_COUNT, "Initializing shared workflow manager");
                Arc::new(WorkflowManager::new())
            })
            .clone()
    }

    /// Get or build the shared manager with an injected action table
    ///
    /// If the shared manager already exists, `actions` is dropped unused.
    pub fn initialize_with_actions(actions: Vec<Arc<dyn WorkflowAction>>) -> Arc<WorkflowManager> {
        let mut adopted = false;
        let manager = GLOBAL_MANAGER
            .get_or_init(|| {
                adopted = true;
                info!(
                    slots = actions.len(),
                    "Initializing shared workflow manager with injected actions"
                );
                Arc::new(WorkflowManager::with_actions(actions))
            })
            .clone();

        if !adopted {
            debug!("Shared workflow manager already initialized - ignoring injected actions");
        }
        manager
    }

    /// The shared manager, if one has been initialized
    pub fn global() -> Option<Arc<WorkflowManager>> {
        GLOBAL_MANAGER.get().cloned()
    }

    /// Gets the first message used to start a workflow for a submission
    pub fn first_stage(submission_id: impl Into<String>) -> WorkflowQueueMessage {
        WorkflowQueueMessage::new(submission_id, WorkflowStage::FIRST)
    }

    pub fn actions(&self) -> &[Arc<dyn WorkflowAction>] {
        &self.actions
    }

    /// The action occupying the slot for `stage`, if the table has one
    pub fn action_for(&self, stage: WorkflowStage) -> Option<&Arc<dyn WorkflowAction>> {
        if stage.is_terminal() {
            return None;
        }
        self.actions.get(stage.ordinal())
    }

    pub fn describe_slots(&self) -> Vec<SlotBinding> {
        self.actions
            .iter()
            .enumerate()
            .map(|(slot, action)| SlotBinding {
                slot,
                action_stage: action.current_stage(),
                action_name: action.name(),
            })
            .collect()
    }

    /// Executes the action for the message's stage and returns the message for
    /// the stage the action chose to run next
    ///
    /// Errors from the action, including cancellation, are returned unchanged
    /// and no message is produced.
    ///
    /// # Panics
    ///
    /// If the message is at the terminal stage or outside the action table, or
    /// if the action in the slot reports a different stage. Both mean the
    /// caller or the table is broken.
    #[instrument(
        skip_all,
        fields(submission_id = %message.submission_id(), stage = %message.stage())
    )]
    pub async fn execute_actions_to_next_stage(
        &self,
        message: &WorkflowQueueMessage,
        cancel: &CancellationToken,
    ) -> Result<WorkflowQueueMessage> {
        let stage = message.stage();
        let index = stage.ordinal();
        assert!(
            !stage.is_terminal() && index < self.actions.len(),
            "Stage {stage} must be within bounds of the action table ({} slots)",
            self.actions.len()
        );

        let action = &self.actions[index];
        assert_eq!(
            action.current_stage(),
            stage,
            "Action {} in the {stage} slot must be bound to {stage}",
            action.name()
        );

        debug!(action = action.name(), "Executing stage action");
        let started = Instant::now();

        let next_stage = match action.execute(message.submission_id(), cancel).await {
            Ok(next_stage) => next_stage,
            Err(err) => {
                if err.is_cancellation() {
                    warn!(action = action.name(), "Stage action cancelled");
                } else {
                    error!(action = action.name(), error = %err, "Stage action failed");
                }
                return Err(err);
            }
        };

        log_stage_transition(
            message.submission_id(),
            stage,
            next_stage,
            action.name(),
            started.elapsed(),
        );

        Ok(WorkflowQueueMessage::new(message.submission_id(), next_stage))
    }

    /// Drive a submission through successive stages until it is `Finished`
    ///
    /// For tests and single-process hosts; queue-driven deployments call
    /// [`execute_actions_to_next_stage`](Self::execute_actions_to_next_stage)
    /// once per dequeued message instead. Fails after
    /// `config.max_stage_transitions` steps so an action that keeps sending a
    /// submission backwards cannot loop forever.
    pub async fn run_to_completion(
        &self,
        message: WorkflowQueueMessage,
        cancel: &CancellationToken,
        config: &WorkflowConfig,
    ) -> Result<WorkflowRun> {
        if message.is_terminal() {
            return Err(WorkflowError::AlreadyFinished {
                submission_id: message.submission_id().to_string(),
            });
        }

        let mut visited = vec![message.stage()];
        let mut current = message;
        let mut transitions = 0u32;

        while !current.is_terminal() {
            if transitions >= config.max_stage_transitions {
                return Err(WorkflowError::TransitionLimitExceeded {
                    submission_id: current.submission_id().to_string(),
                    limit: config.max_stage_transitions,
                });
            }
            current = self.execute_actions_to_next_stage(&current, cancel).await?;
            transitions += 1;
            visited.push(current.stage());
        }

        info!(
            submission_id = %current.submission_id(),
            transitions = transitions,
            "Submission reached terminal stage"
        );

        Ok(WorkflowRun {
            final_message: current,
            visited,
        })
    }
}
