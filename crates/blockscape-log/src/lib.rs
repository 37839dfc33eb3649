//! Structured logging for the sandbox.
//!
//! Console output carries uptime, target, level and thread name. Debug builds
//! can additionally write JSON lines to a file for post-mortem analysis. The
//! level comes from `RUST_LOG` when set, otherwise from the configuration.

use std::path::{Path, PathBuf};

use blockscape_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "blockscape.log";

const DEFAULT_DIRECTIVES: &str = "info";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file (debug builds only)
/// * `debug_build` - enables file logging
/// * `config` - supplies `debug.log_level` when `RUST_LOG` is unset
///
/// Returns the path of the JSON log file when one was opened. Calling this
/// more than once leaves the first subscriber in place.
///
/// ```no_run
/// use blockscape_config::Config;
/// use blockscape_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) -> Option<PathBuf> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| config_env_filter(config));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        return subscriber
            .with(file_layer)
            .try_init()
            .ok()
            .map(|()| log_dir.join(LOG_FILE_NAME));
    }

    let _ = subscriber.try_init();
    None
}

/// Filter built from the configured log level, falling back to
/// [`default_env_filter`] when no level is configured.
pub fn config_env_filter(config: Option<&Config>) -> EnvFilter {
    match config.map(|c| c.debug.log_level.trim()) {
        Some(level) if !level.is_empty() => EnvFilter::new(level),
        _ => default_env_filter(),
    }
}

/// Create an `EnvFilter` with the default filter string (`info` everywhere).
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_DIRECTIVES)
}
