//! Tunables for the progress engine

use crate::window::DEFAULT_WINDOW_CAPACITY;
use std::time::Duration;

/// Default minimum time between surfaced updates
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(500);

/// Default activity age before the first update is surfaced
pub const DEFAULT_DISPLAY_THRESHOLD: Duration = Duration::from_secs(1);

/// Default estimated time left below which updates are withheld
pub const DEFAULT_MINIMUM_TIME_LEFT: Duration = Duration::from_secs(2);

/// Configuration for the progress engine
///
/// A zero duration disables the corresponding suppression rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressConfig {
    /// Minimum time between surfaced updates (default: 500ms)
    pub refresh_interval: Duration,
    /// How long an activity must run before anything is surfaced (default: 1s)
    pub display_threshold: Duration,
    /// Withhold updates when the estimated time left is shorter (default: 2s)
    pub minimum_time_left: Duration,
    /// Number of samples in the moving-average window (default: 20)
    pub window_capacity: usize,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            display_threshold: DEFAULT_DISPLAY_THRESHOLD,
            minimum_time_left: DEFAULT_MINIMUM_TIME_LEFT,
            window_capacity: DEFAULT_WINDOW_CAPACITY,
        }
    }
}

impl ProgressConfig {
    /// Configuration with every suppression rule disabled
    #[must_use]
    pub fn unthrottled() -> Self {
        Self {
            refresh_interval: Duration::ZERO,
            display_threshold: Duration::ZERO,
            minimum_time_left: Duration::ZERO,
            window_capacity: DEFAULT_WINDOW_CAPACITY,
        }
    }

    /// Set the refresh interval
    #[must_use]
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Set the display threshold
    #[must_use]
    pub fn with_display_threshold(mut self, threshold: Duration) -> Self {
        self.display_threshold = threshold;
        self
    }

    /// Set the minimum time left to display
    #[must_use]
    pub fn with_minimum_time_left(mut self, minimum: Duration) -> Self {
        self.minimum_time_left = minimum;
        self
    }

    /// Set the sample window capacity
    #[must_use]
    pub fn with_window_capacity(mut self, capacity: usize) -> Self {
        self.window_capacity = capacity;
        self
    }
}
