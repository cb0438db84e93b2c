//! Conformance harness configuration loading and validation.
//!
//! This crate provides:
//! - A typed `HarnessConfig` for thread spawning, wait defaults and logging
//! - Config resolution (explicit path → env → XDG → defaults)
//! - Semantic validation

pub mod harness;
pub mod resolve;
pub mod validate;

pub use harness::{HarnessConfig, LogConfig, LogFormat};
pub use resolve::{resolve_config, ConfigPaths, ConfigSource, ResolvedConfig};
pub use validate::{ValidationError, ValidationResult};
