//! Action identity types.
//!
//! Every threaded action carries an `ActionId` so log lines, thread names and
//! reports produced on different threads can be correlated.

use serde::{Deserialize, Serialize};
use std::fmt;

const PREFIX: &str = "act-";

/// Action ID for tracking a single threaded action.
///
/// Format: `act-<date>-<time>-<random>`
/// Example: `act-20260115-143022-abc123`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub String);

impl ActionId {
    /// Generate a new action ID.
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        let random: String = uuid::Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(6)
            .collect();
        ActionId(format!("{}{}-{}", PREFIX, now.format("%Y%m%d-%H%M%S"), random))
    }

    /// Parse an existing action ID string.
    pub fn parse(s: &str) -> Option<Self> {
        let rest = s.strip_prefix(PREFIX)?;
        let mut parts = rest.splitn(3, '-');
        let date = parts.next()?;
        let time = parts.next()?;
        let random = parts.next()?;
        let digits = |p: &str, len: usize| p.len() == len && p.bytes().all(|b| b.is_ascii_digit());
        if digits(date, 8) && digits(time, 6) && !random.is_empty() {
            Some(ActionId(s.to_string()))
        } else {
            None
        }
    }

    /// Random suffix, used where a short label is enough (thread names).
    pub fn short(&self) -> &str {
        self.0.rsplit('-').next().unwrap_or(&self.0)
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
