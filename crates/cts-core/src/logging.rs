//! Diagnostic logging setup.
//!
//! Action threads log through `tracing`; this module installs the global
//! subscriber a test driver wants, in human or JSON form.

use cts_common::{Error, Result};
use cts_config::{LogConfig, LogFormat};
use tracing::Subscriber;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// A subscriber ready to be installed globally or scoped to a thread.
pub type BoxedSubscriber = Box<dyn Subscriber + Send + Sync + 'static>;

/// Parse an `EnvFilter` directive string.
pub fn parse_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).map_err(|e| Error::Logging(format!("{}: {}", directives, e)))
}

/// Filter from `RUST_LOG` when set, otherwise from the config.
pub fn build_filter(config: &LogConfig) -> Result<EnvFilter> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => parse_filter(&directives),
        _ => parse_filter(&config.filter),
    }
}

/// Build the subscriber described by `config` without installing it.
pub fn build_subscriber(config: &LogConfig) -> Result<BoxedSubscriber> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let subscriber: BoxedSubscriber = match config.format {
        LogFormat::Json => Box::new(registry.with(fmt::layer().json().with_thread_names(true))),
        LogFormat::Pretty => {
            Box::new(registry.with(fmt::layer().with_thread_names(true).with_target(false)))
        }
    };
    Ok(subscriber)
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LogConfig) -> Result<()> {
    build_subscriber(config)?
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}
