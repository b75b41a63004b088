//! Progress information surfaced to callers

use std::time::Duration;

/// Progress for one surfaced update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressInfo {
    /// Index of the item being processed
    pub item_index: u64,
    /// Items expected but not yet processed
    pub remaining_item_count: u64,
    /// Fraction complete in `[0, 1]`, `None` when the total is unknown
    pub percent_complete: Option<f64>,
    /// Projected time until all items are processed, if an estimate exists
    pub estimated_time_remaining: Option<Duration>,
}

impl ProgressInfo {
    /// Build progress for `processed` of `expected` items
    ///
    /// An `expected` of zero means the total is unknown: no percentage and no
    /// estimate are produced.
    #[must_use]
    pub fn new(processed: u64, expected: u64, average_interval: Option<Duration>) -> Self {
        let remaining_item_count = expected.saturating_sub(processed);
        let percent_complete =
            (expected > 0).then(|| (processed as f64 / expected as f64).min(1.0));

        Self {
            item_index: processed,
            remaining_item_count,
            percent_complete,
            estimated_time_remaining: estimate_remaining(average_interval, remaining_item_count),
        }
    }

    /// Progress as a percentage (0.0-100.0)
    #[must_use]
    pub fn percentage(&self) -> Option<f64> {
        self.percent_complete.map(|fraction| fraction * 100.0)
    }

    /// Whole seconds remaining, if an estimate exists
    #[must_use]
    pub fn seconds_remaining(&self) -> Option<u64> {
        self.estimated_time_remaining.map(|eta| eta.as_secs())
    }

    /// Format the estimated time remaining in human-readable form
    #[must_use]
    pub fn format_eta(&self) -> Option<String> {
        self.estimated_time_remaining.map(format_duration)
    }
}

/// Format a duration as `Xh Ym`, `Xm Ys` or `Xs`
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    if total_seconds >= 3600 {
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        format!("{hours}h {minutes}m")
    } else if total_seconds >= 60 {
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        format!("{minutes}m {seconds}s")
    } else {
        format!("{total_seconds}s")
    }
}

/// Average time per item times the items left
///
/// `None` without an average or when nothing remains.
pub(crate) fn estimate_remaining(average_interval: Option<Duration>, remaining: u64) -> Option<Duration> {
    let average = average_interval?;
    if remaining == 0 {
        return None;
    }
    Duration::try_from_secs_f64(average.as_secs_f64() * remaining as f64).ok()
}
