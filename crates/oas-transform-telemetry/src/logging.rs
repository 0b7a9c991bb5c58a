//! Structured logging to stderr.

use crate::{LogFormat, TelemetryConfig, TelemetryError};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the logging subsystem.
///
/// Sets up tracing-subscriber with either JSON or pretty format,
/// respecting the configured log level unless `RUST_LOG` is set.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => init_json_logging(filter),
        LogFormat::Pretty => init_pretty_logging(filter),
    }
}

fn init_json_logging(filter: EnvFilter) -> Result<(), TelemetryError> {
    let json_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_current_span(true)
        .with_span_list(false)
        .with_file(false)
        .with_line_number(false)
        .flatten_event(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(json_layer)
        .try_init()
        .map_err(|e: tracing_subscriber::util::TryInitError| {
            TelemetryError::LoggingInit(e.to_string())
        })
}

fn init_pretty_logging(filter: EnvFilter) -> Result<(), TelemetryError> {
    let pretty_layer = fmt::layer()
        .pretty()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(pretty_layer)
        .try_init()
        .map_err(|e: tracing_subscriber::util::TryInitError| {
            TelemetryError::LoggingInit(e.to_string())
        })
}

/// Standard log event names.
pub mod events {
    /// A run is starting.
    pub const RUN_STARTED: &str = "run_started";

    /// The filter configuration has been loaded.
    pub const CONFIG_LOADED: &str = "config_loaded";

    /// A directory entry passed the whitelist/ignore filter.
    pub const DOCUMENT_SELECTED: &str = "document_selected";

    /// A control character was removed from a document.
    pub const CONTROL_CHARACTER_STRIPPED: &str = "control_character_stripped";

    /// A document was parsed successfully.
    pub const DOCUMENT_TRANSFORMED: &str = "document_transformed";

    /// The parser rejected a document.
    pub const DOCUMENT_REJECTED: &str = "document_rejected";

    /// Every selected document has been attempted.
    pub const RUN_COMPLETED: &str = "run_completed";
}

/// Helper macros for structured logging with standard fields.
///
/// These wrap the tracing macros to ensure consistent field naming.
#[macro_export]
macro_rules! log_run_started {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::RUN_STARTED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_config_loaded {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::CONFIG_LOADED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_document_selected {
    ($($field:tt)*) => {
        tracing::debug!(
            event = $crate::logging::events::DOCUMENT_SELECTED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_control_character_stripped {
    ($($field:tt)*) => {
        tracing::debug!(
            event = $crate::logging::events::CONTROL_CHARACTER_STRIPPED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_document_transformed {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::DOCUMENT_TRANSFORMED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_document_rejected {
    ($($field:tt)*) => {
        tracing::warn!(
            event = $crate::logging::events::DOCUMENT_REJECTED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_run_completed {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::RUN_COMPLETED,
            $($field)*
        )
    };
}
