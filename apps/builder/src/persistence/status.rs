use chrono::{DateTime, Utc};
use serde::Serialize;

/// Save indicator shown by the presentation layer.
///
/// `Saved` is transient: the coordinator reverts it to `Idle` after the display
/// window. `Failed` persists until the next successful attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SaveStatus {
    Idle,
    Saving {
        attempt: u64,
    },
    Saved {
        attempt: u64,
        at: DateTime<Utc>,
    },
    Failed {
        attempt: u64,
        message: String,
    },
}
