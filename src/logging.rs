//! # Structured Logging
//!
//! Console logging through the tracing ecosystem. Output goes to stdout so the
//! host process (usually a container running the queue consumer) collects it.
//!
//! Initialization is idempotent: the first call wins and later calls, or a
//! subscriber installed by an embedding application, are left untouched.
//!
//! Filter precedence: an explicit `log_level` in the configuration, then
//! `RUST_LOG`, then the level derived from the environment.

use crate::config::{LogFormat, WorkflowConfig};
use crate::workflow::stage::WorkflowStage;
use chrono::Utc;
use std::io::IsTerminal;
use std::sync::OnceLock;
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console logging from `workflow.toml` and `WORKFLOW_` environment variables
pub fn init_console_logging() {
    init_logging(&console_config());
}

/// Configuration used by [`init_console_logging`]
///
/// Falls back to defaults when the configured sources cannot be loaded, since
/// logging must come up before anything can report the failure.
pub fn console_config() -> WorkflowConfig {
    WorkflowConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load workflow configuration for logging: {e}");
        eprintln!("Using default logging configuration");
        WorkflowConfig::default()
    })
}

/// Tracing filter for the given configuration
pub fn log_filter(config: &WorkflowConfig) -> EnvFilter {
    match &config.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.effective_log_level())),
    }
}

/// Initialize console logging from the given configuration
pub fn init_logging(config: &WorkflowConfig) {
    TRACING_INITIALIZED.get_or_init(|| {
        let filter = log_filter(config);

        let console_layer = match config.log_format {
            LogFormat::Json => fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .json()
                .with_filter(filter)
                .boxed(),
            LogFormat::Pretty => fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(IsTerminal::is_terminal(&std::io::stdout()))
                .with_filter(filter)
                .boxed(),
        };

        if tracing_subscriber::registry()
            .with(console_layer)
            .try_init()
            .is_err()
        {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        } else {
            tracing::info!(
                environment = %config.environment,
                log_format = ?config.log_format,
                "Console logging initialized"
            );
        }
    });
}

/// Log structured data for a stage transition of one submission
pub fn log_stage_transition(
    submission_id: &str,
    from: WorkflowStage,
    to: WorkflowStage,
    action: &str,
    elapsed: Duration,
) {
    tracing::info!(
        submission_id = %submission_id,
        from_stage = %from,
        to_stage = %to,
        action = %action,
        elapsed_ms = elapsed_millis(elapsed),
        terminal = to.is_terminal(),
        timestamp = %Utc::now().to_rfc3339(),
        "STAGE_TRANSITION"
    );
}

/// Whole milliseconds in `elapsed`, saturating at `u64::MAX`
fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
