//! # Workflow Configuration
//!
//! Settings for the process that hosts the workflow engine. Sources, in
//! increasing precedence:
//!
//! 1. Built-in defaults
//! 2. `workflow.toml` in the working directory, or an explicit file
//! 3. Environment variables prefixed with `WORKFLOW_` (e.g. `WORKFLOW_MAX_STAGE_TRANSITIONS=8`)
//!
//! ```rust,no_run
//! use submission_workflow::config::WorkflowConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WorkflowConfig::load()?;
//! println!("transition limit: {}", config.max_stage_transitions);
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, WorkflowError};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ENV_PREFIX: &str = "WORKFLOW";
pub const DEFAULT_CONFIG_FILE: &str = "workflow";

/// Console log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Deployment environment (test, development, production)
    pub environment: String,
    /// Explicit tracing filter; derived from `environment` when unset
    pub log_level: Option<String>,
    pub log_format: LogFormat,
    /// Upper bound on execution steps `run_to_completion` performs for one
    /// submission before giving up
    pub max_stage_transitions: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            environment: detect_environment(),
            log_level: None,
            log_format: LogFormat::default(),
            max_stage_transitions: 16,
        }
    }
}

impl WorkflowConfig {
    /// Load configuration from the default file and `WORKFLOW_` environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_sources(None, DEFAULT_ENV_PREFIX)
    }

    /// Load configuration from an explicit file, which must exist
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::load_from_sources(Some(path), DEFAULT_ENV_PREFIX)
    }

    /// Load configuration with an explicit file and environment prefix
    pub fn load_from_sources(file: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        builder = match file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let config: WorkflowConfig = builder
            .add_source(Environment::with_prefix(env_prefix).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;

        tracing::debug!(
            environment = %config.environment,
            max_stage_transitions = config.max_stage_transitions,
            "Workflow configuration loaded"
        );

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_stage_transitions == 0 {
            return Err(WorkflowError::ConfigurationError(
                "max_stage_transitions must be at least 1".to_string(),
            ));
        }
        if self.environment.trim().is_empty() {
            return Err(WorkflowError::ConfigurationError(
                "environment must not be empty".to_string(),
            ));
        }
        if matches!(&self.log_level, Some(level) if level.trim().is_empty()) {
            return Err(WorkflowError::ConfigurationError(
                "log_level must not be empty when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Tracing filter to install, explicit or derived from the environment
    pub fn effective_log_level(&self) -> String {
        match &self.log_level {
            Some(level) => level.clone(),
            None => match self.environment.as_str() {
                "production" => "info".to_string(),
                _ => "debug".to_string(),
            },
        }
    }
}

/// Get current environment from environment variables
fn detect_environment() -> String {
    std::env::var("WORKFLOW_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}
