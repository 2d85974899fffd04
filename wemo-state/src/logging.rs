//! Logging setup for hosts embedding the engine
//!
//! Every crate in the workspace logs through `tracing`. This module installs
//! a `tracing-subscriber` stack whose default filter follows the hub's
//! [`DebugLevel`] option.

use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::config::DebugLevel;

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Invalid filter directive: {0}")]
    InvalidFilter(String),
}

/// Install a global subscriber for `level`
///
/// # Environment Variables
///
/// - `WEMO_LOG_LEVEL`: filter directives, e.g. `info,soap_client=trace`
/// - `RUST_LOG`: used when `WEMO_LOG_LEVEL` is unset
///
/// ```rust,ignore
/// wemo_state::logging::init_logging(DebugLevel::Basic)?;
/// ```
pub fn init_logging(level: DebugLevel) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = create_env_filter(level.filter_directives())?;

    if level == DebugLevel::All {
        // Verbose formatter with source locations
        Registry::default()
            .with(
                fmt::layer()
                    .with_thread_names(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init()
            .map_err(|e| LoggingError::TracingInit(e.to_string()))
    } else {
        Registry::default()
            .with(fmt::layer().with_target(level.is_enabled()).compact())
            .with(filter)
            .try_init()
            .map_err(|e| LoggingError::TracingInit(e.to_string()))
    }
}

/// Like [`init_logging`], but a subscriber already installed by the host is not an error
pub fn try_init_logging(level: DebugLevel) -> Result<(), LoggingError> {
    if is_initialized() {
        return Ok(());
    }
    init_logging(level)
}

/// Filter from the environment, falling back to `default_directives`
fn create_env_filter(default_directives: &str) -> Result<EnvFilter, LoggingError> {
    let directives = std::env::var("WEMO_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_directives.to_string());

    EnvFilter::try_new(&directives)
        .map_err(|e| LoggingError::InvalidFilter(format!("{}: {}", directives, e)))
}

/// Check if a global subscriber has been installed
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}
