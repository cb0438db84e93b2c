//! Serializable summary of a finished action.

use chrono::{DateTime, Utc};
use cts_common::{schema, ActionId, Error, SCHEMA_VERSION};
use serde::{Deserialize, Serialize};

/// Final status of an action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Succeeded,
    Failed,
    Panicked,
}

/// Per-action result with timing and failure details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionReport {
    pub schema_version: String,
    pub action_id: ActionId,
    pub name: String,
    pub status: ActionStatus,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl ActionReport {
    pub fn is_success(&self) -> bool {
        self.status == ActionStatus::Succeeded
    }

    pub fn to_json(&self) -> cts_common::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a report, rejecting one written under a different major schema.
    pub fn from_json(json: &str) -> cts_common::Result<Self> {
        let report: Self = serde_json::from_str(json)?;
        if !schema::is_compatible(&report.schema_version) {
            return Err(Error::IncompatibleSchema {
                found: report.schema_version,
                supported: SCHEMA_VERSION.to_string(),
            });
        }
        Ok(report)
    }
}
