//! Host-renderable progress records

use serde::Serialize;
use std::fmt;

/// Whether a record reports ongoing work or the end of the activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Processing,
    Completed,
}

/// One progress update ready to hand to a renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressRecord {
    /// Distinguishes this progress bar from others
    pub activity_id: u32,
    /// Activity this one is nested under
    pub parent_id: Option<u32>,
    /// What is being done
    pub activity: String,
    /// Current state of the activity
    pub status: String,
    /// What is happening right now, usually derived from the current item
    pub current_operation: Option<String>,
    /// Whole percent complete (0-100)
    pub percent_complete: Option<u8>,
    /// Whole seconds until completion
    pub seconds_remaining: Option<u64>,
    pub kind: RecordKind,
}

impl ProgressRecord {
    /// Whether this record ends the activity
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.kind == RecordKind::Completed
    }
}

impl fmt::Display for ProgressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Progress {}, Activity=<{}>",
            self.activity_id, self.activity
        )?;
        if self.is_completed() {
            return write!(f, ", Completed");
        }

        write!(
            f,
            ", Status=<{}>, Operation=<{}>, PercentComplete=<{}>, SecondsRemaining=<{}>",
            self.status,
            self.current_operation.as_deref().unwrap_or_default(),
            self.percent_complete.map(|p| p.to_string()).unwrap_or_default(),
            self.seconds_remaining.map(|s| s.to_string()).unwrap_or_default(),
        )
    }
}
