//! Sampling and update decisions for one tracked activity

use crate::clock::{Clock, SystemClock};
use crate::config::ProgressConfig;
use crate::info::{estimate_remaining, ProgressInfo};
use crate::window::{Sample, SampleWindow};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Reason a decision withheld an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    /// The previous update was surfaced less than a refresh interval ago
    RefreshInterval,
    /// Nothing has been shown yet and the activity is younger than the display threshold
    DisplayThreshold,
    /// Completion is estimated to be closer than the minimum time left
    MinimumTimeLeft,
}

impl Suppression {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Suppression::RefreshInterval => "refresh_interval",
            Suppression::DisplayThreshold => "display_threshold",
            Suppression::MinimumTimeLeft => "minimum_time_left",
        }
    }
}

/// Decides when progress for a sequence of items should be surfaced
///
/// Call [`add_sample`](Self::add_sample) once per processed item, in order,
/// and [`check_time`](Self::check_time) for time-only checks between items.
/// Either returns `None` when no update should be shown.
#[derive(Debug)]
pub struct ProgressEngine<C: Clock = SystemClock> {
    window: SampleWindow,
    config: ProgressConfig,
    processed_count: u64,
    expected_count: u64,
    start_time: Option<Instant>,
    last_display_time: Option<Instant>,
    is_sampling: bool,
    clock: C,
}

impl ProgressEngine<SystemClock> {
    /// Create an engine with default configuration and the system clock
    #[must_use]
    pub fn new(expected_count: u64) -> Self {
        Self::with_clock(expected_count, SystemClock)
    }
}

impl<C: Clock> ProgressEngine<C> {
    /// Create an engine with default configuration reading time from `clock`
    #[must_use]
    pub fn with_clock(expected_count: u64, clock: C) -> Self {
        Self::with_config(expected_count, ProgressConfig::default(), clock)
    }

    /// Create an engine with custom configuration
    #[must_use]
    pub fn with_config(expected_count: u64, config: ProgressConfig, clock: C) -> Self {
        Self {
            window: SampleWindow::with_capacity(config.window_capacity),
            config,
            processed_count: 0,
            expected_count,
            start_time: None,
            last_display_time: None,
            is_sampling: false,
            clock,
        }
    }

    /// Record one processed item and decide whether to surface progress
    ///
    /// The processed count advances by one whatever the decision.
    pub fn add_sample(&mut self) -> Option<ProgressInfo> {
        self.is_sampling = true;
        let info = self.decide();
        self.processed_count = self.processed_count.saturating_add(1);
        info
    }

    /// Decide whether to surface progress without advancing the processed count
    pub fn check_time(&mut self) -> Option<ProgressInfo> {
        self.decide()
    }

    fn decide(&mut self) -> Option<ProgressInfo> {
        let now = self.clock.now();
        let start_time = *self.start_time.get_or_insert(now);

        if let Some(reason) = self.suppression(now, start_time) {
            trace!(
                reason = reason.as_str(),
                processed = self.processed_count,
                expected = self.expected_count,
                "progress update suppressed"
            );
            return None;
        }

        if self.is_sampling {
            self.window.add(Sample::new(self.processed_count, now));
        }
        self.last_display_time = Some(now);

        let info = ProgressInfo::new(
            self.processed_count,
            self.expected_count,
            self.window.average_interval(),
        );
        debug!(
            item_index = info.item_index,
            remaining = info.remaining_item_count,
            percent = ?info.percent_complete,
            eta = ?info.estimated_time_remaining,
            "progress update"
        );
        Some(info)
    }

    fn suppression(&self, now: Instant, start_time: Instant) -> Option<Suppression> {
        let first_sampled_item = self.is_sampling && self.processed_count == 0;
        if !self.config.refresh_interval.is_zero() && !first_sampled_item {
            if let Some(last) = self.last_display_time {
                if now.saturating_duration_since(last) < self.config.refresh_interval {
                    return Some(Suppression::RefreshInterval);
                }
            }
        }

        if self.last_display_time.is_none()
            && !self.config.display_threshold.is_zero()
            && now.saturating_duration_since(start_time) < self.config.display_threshold
        {
            return Some(Suppression::DisplayThreshold);
        }

        if !self.config.minimum_time_left.is_zero() && self.is_sampling {
            if let Some(time_left) = self.estimated_time_remaining() {
                if time_left < self.config.minimum_time_left {
                    return Some(Suppression::MinimumTimeLeft);
                }
            }
        }

        None
    }

    /// Current estimate of the time left, from the window average
    #[must_use]
    pub fn estimated_time_remaining(&self) -> Option<Duration> {
        estimate_remaining(self.window.average_interval(), self.remaining_item_count())
    }

    /// Items expected but not yet processed
    #[must_use]
    pub fn remaining_item_count(&self) -> u64 {
        self.expected_count.saturating_sub(self.processed_count)
    }

    /// Number of [`add_sample`](Self::add_sample) calls so far
    #[must_use]
    pub fn processed_count(&self) -> u64 {
        self.processed_count
    }

    /// Number of items expected, zero when unknown
    #[must_use]
    pub fn expected_count(&self) -> u64 {
        self.expected_count
    }

    /// Set the number of items expected
    pub fn set_expected_count(&mut self, expected_count: u64) {
        self.expected_count = expected_count;
    }

    /// Set the minimum time between surfaced updates
    pub fn set_refresh_interval(&mut self, interval: Duration) {
        self.config.refresh_interval = interval;
    }

    /// Set how long the activity must run before the first update
    pub fn set_display_threshold(&mut self, threshold: Duration) {
        self.config.display_threshold = threshold;
    }

    /// Set the estimated time left below which updates are withheld
    pub fn set_minimum_time_left(&mut self, minimum: Duration) {
        self.config.minimum_time_left = minimum;
    }

    /// Current configuration
    #[must_use]
    pub fn config(&self) -> &ProgressConfig {
        &self.config
    }

    /// Whether any item has been sampled
    #[must_use]
    pub fn is_sampling(&self) -> bool {
        self.is_sampling
    }

    /// Whether any decision has been made yet
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.start_time.is_some()
    }

    /// When the first decision was made
    #[must_use]
    pub fn start_time(&self) -> Option<Instant> {
        self.start_time
    }

    /// When an update was last surfaced
    #[must_use]
    pub fn last_display_time(&self) -> Option<Instant> {
        self.last_display_time
    }

    /// The moving-average window
    #[must_use]
    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    /// The clock the engine reads
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }
}
