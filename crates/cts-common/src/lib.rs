//! Conformance test suite common types, IDs, and errors.
//!
//! This crate provides foundational types shared across the harness crates:
//! - Action identity types
//! - Report schema versioning
//! - Common error types

pub mod error;
pub mod id;
pub mod schema;

pub use error::{Error, Result};
pub use id::ActionId;
pub use schema::SCHEMA_VERSION;
