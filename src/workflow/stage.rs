use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow stages, in execution order: Analyze -> Report -> Telemetry -> Finished
///
/// The discriminant is the index of the stage's slot in the manager's action
/// table. Adding a stage means adding its action alongside it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    /// Submission is analyzed
    #[default]
    Analyze = 0,
    /// Report is generated from the analysis
    Report = 1,
    /// Telemetry for the submission is emitted
    Telemetry = 2,
    /// Terminal stage, no action is bound to it
    Finished = 3,
}

/// Number of stages that have a bound action
pub const ACTION_SLOT_COUNT: usize = WorkflowStage::ALL.len() - 1;

impl WorkflowStage {
    pub const ALL: [WorkflowStage; 4] = [
        Self::Analyze,
        Self::Report,
        Self::Telemetry,
        Self::Finished,
    ];

    /// Stage every new submission starts at
    pub const FIRST: WorkflowStage = Self::Analyze;

    pub const TERMINAL: WorkflowStage = Self::Finished;

    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    /// Check if this is the terminal stage (no further execution allowed)
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished)
    }

    /// The stage that follows this one in the linear sequence
    ///
    /// Actions usually return this from `execute`, but they are free to return
    /// any stage.
    pub fn next(self) -> Option<Self> {
        Self::from_ordinal(self.ordinal() + 1)
    }

    /// Stages that carry a bound action
    pub fn actionable() -> impl Iterator<Item = WorkflowStage> {
        Self::ALL.into_iter().filter(|stage| !stage.is_terminal())
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Analyze => write!(f, "analyze"),
            Self::Report => write!(f, "report"),
            Self::Telemetry => write!(f, "telemetry"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

impl std::str::FromStr for WorkflowStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "analyze" => Ok(Self::Analyze),
            "report" => Ok(Self::Report),
            "telemetry" => Ok(Self::Telemetry),
            "finished" => Ok(Self::Finished),
            _ => Err(format!("Invalid workflow stage: {s}")),
        }
    }
}
