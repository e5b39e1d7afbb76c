//! Events emitted by the simulation for the operator feed.

use serde::{Deserialize, Serialize};

use crate::enums::Severity;

/// One line of the human-readable event feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    /// Monotonic sequence number; newer entries have larger values.
    pub seq: u64,
    pub time_ms: f64,
    pub severity: Severity,
    pub message: String,
}

/// Result of a command, as reported in the snapshot for queued commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOutcome {
    /// Command type tag, e.g. `"Fire"`.
    pub command: String,
    pub accepted: bool,
    /// Success summary or rejection reason.
    pub detail: String,
}
