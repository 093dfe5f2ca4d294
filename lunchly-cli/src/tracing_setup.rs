//! Tracing setup for the lunchly CLI
//!
//! Usage:
//!   lunchly --debug ...                # Debug logging to stderr
//!   RUST_LOG=lunchly_core=debug lunchly  # Fine-grained log control
//!
//! Without either, the level from `[logging] level` in the config applies.
//! The subscriber is installed before the config is read, so the filter is
//! reloadable and switched to the configured level afterwards.

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Handle for swapping the active filter after startup
pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Tracing configuration options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Enable debug logging (used unless RUST_LOG is explicitly set)
    pub debug: bool,
    /// Filter directive when neither RUST_LOG nor --debug is given
    pub default_level: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            debug: false,
            default_level: "info".to_string(),
        }
    }
}

/// Directive to apply on top of the environment, if any.
///
/// RUST_LOG always wins; `--debug` beats the configured level.
fn fallback_directive<'a>(config: &'a TracingConfig, rust_log: Option<&str>) -> Option<&'a str> {
    if rust_log.is_some_and(|value| !value.trim().is_empty()) {
        None
    } else if config.debug {
        Some("debug")
    } else {
        Some(config.default_level.as_str())
    }
}

fn build_filter(config: &TracingConfig) -> Result<EnvFilter> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    match fallback_directive(config, rust_log.as_deref()) {
        None => EnvFilter::try_from_default_env().context("invalid RUST_LOG"),
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log level '{}'", directive)),
    }
}

/// Initialize tracing with console output on stderr
pub fn init_tracing(config: &TracingConfig) -> Result<FilterHandle> {
    let (filter, handle) = reload::Layer::new(build_filter(config)?);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(config.debug) // Show targets in debug mode
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .map_err(|err| anyhow!(err))?;

    Ok(handle)
}

/// Swap in the filter for `config`, typically once `default_level` has been
/// read from the config file.
pub fn apply_configured_level(handle: &FilterHandle, config: &TracingConfig) -> Result<()> {
    let filter = build_filter(config)?;
    handle
        .reload(filter)
        .map_err(|err| anyhow!("failed to update log filter: {}", err))
}
