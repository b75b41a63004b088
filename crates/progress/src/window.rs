//! Windowed average of time per item with incrementally maintained sums

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Default number of samples the window can hold
pub const DEFAULT_WINDOW_CAPACITY: usize = 20;

/// Smallest capacity that can still retain two samples after eviction
pub const MIN_WINDOW_CAPACITY: usize = 3;

/// An (index, timestamp) observation taken when an update was surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    index: u64,
    timestamp: Instant,
}

impl Sample {
    /// Create a sample for the item at `index` observed at `timestamp`
    #[must_use]
    pub fn new(index: u64, timestamp: Instant) -> Self {
        Self { index, timestamp }
    }

    /// Index of the item being processed when the sample was taken
    #[must_use]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// When the sample was taken
    #[must_use]
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Index and time advance from `earlier` to `self`
    fn delta_since(&self, earlier: &Sample) -> (u64, Duration) {
        (
            self.index.saturating_sub(earlier.index),
            self.timestamp.saturating_duration_since(earlier.timestamp),
        )
    }
}

/// Bounded buffer of the most recent samples
///
/// The sums of index and time deltas between consecutive retained samples are
/// kept up to date on every insert and eviction, so computing the average
/// never walks the buffer.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    samples: VecDeque<Sample>,
    capacity: usize,
    index_delta_sum: u64,
    time_delta_sum: Duration,
    average_interval: Option<Duration>,
}

impl SampleWindow {
    /// Create a window with the default capacity
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_WINDOW_CAPACITY)
    }

    /// Create a window holding at most `capacity` samples
    ///
    /// Capacities below [`MIN_WINDOW_CAPACITY`] are raised to it.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_WINDOW_CAPACITY);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            index_delta_sum: 0,
            time_delta_sum: Duration::ZERO,
            average_interval: None,
        }
    }

    /// Add a sample, evicting the oldest ones once the window is full
    pub fn add(&mut self, sample: Sample) {
        self.samples.push_back(sample);

        while self.samples.len() >= self.capacity {
            let (index_delta, time_delta) = match (self.samples.front(), self.samples.get(1)) {
                (Some(oldest), Some(next)) => next.delta_since(oldest),
                _ => break,
            };
            self.index_delta_sum = self.index_delta_sum.saturating_sub(index_delta);
            self.time_delta_sum = self.time_delta_sum.saturating_sub(time_delta);
            self.samples.pop_front();
        }

        let len = self.samples.len();
        if len > 1 {
            let (index_delta, time_delta) = self.samples[len - 1].delta_since(&self.samples[len - 2]);
            self.index_delta_sum = self.index_delta_sum.saturating_add(index_delta);
            self.time_delta_sum = self.time_delta_sum.saturating_add(time_delta);
        }

        self.average_interval = self.compute_average_interval();
    }

    /// Estimated wall-clock time per unit of index advance
    ///
    /// `None` until at least two samples are retained, and while every
    /// retained sample shares the same index.
    #[must_use]
    pub fn average_interval(&self) -> Option<Duration> {
        self.average_interval
    }

    /// Average index advance between consecutive retained samples
    ///
    /// Kept fractional: uneven advances of 3 and 4 average to 3.5 rather
    /// than truncating to 3, so throttled windows do not overstate the time
    /// per item.
    #[must_use]
    pub fn average_index_delta(&self) -> Option<f64> {
        let intervals = self.interval_count()?;
        Some(self.index_delta_sum as f64 / intervals)
    }

    /// Average time between consecutive retained samples
    #[must_use]
    pub fn average_index_interval(&self) -> Option<Duration> {
        let intervals = self.interval_count()?;
        Duration::try_from_secs_f64(self.time_delta_sum.as_secs_f64() / intervals).ok()
    }

    /// Sum of index deltas between consecutive retained samples
    #[must_use]
    pub fn index_delta_sum(&self) -> u64 {
        self.index_delta_sum
    }

    /// Sum of time deltas between consecutive retained samples
    #[must_use]
    pub fn time_delta_sum(&self) -> Duration {
        self.time_delta_sum
    }

    /// Maximum number of samples the window holds
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no sample has been retained
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Most recently added sample
    #[must_use]
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Retained samples, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    fn interval_count(&self) -> Option<f64> {
        match self.samples.len() {
            0 | 1 => None,
            len => Some((len - 1) as f64),
        }
    }

    fn compute_average_interval(&self) -> Option<Duration> {
        let average_index_delta = self.average_index_delta()?;
        if average_index_delta <= 0.0 {
            return None;
        }
        let average_index_interval = self.average_index_interval()?;
        Duration::try_from_secs_f64(average_index_interval.as_secs_f64() / average_index_delta)
            .ok()
    }
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_at(origin: Instant, index: u64, secs: u64) -> Sample {
        Sample::new(index, origin + Duration::from_secs(secs))
    }

    #[test]
    fn test_no_average_until_two_samples() {
        let origin = Instant::now();
        let mut window = SampleWindow::new();
        assert_eq!(window.average_interval(), None);

        window.add(sample_at(origin, 0, 0));
        assert_eq!(window.len(), 1);
        assert_eq!(window.average_interval(), None);

        window.add(sample_at(origin, 1, 2));
        assert_eq!(window.average_interval(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_average_accounts_for_skipped_indices() {
        let origin = Instant::now();
        let mut window = SampleWindow::new();

        // 10 items every 5 seconds
        window.add(sample_at(origin, 0, 0));
        window.add(sample_at(origin, 10, 5));
        window.add(sample_at(origin, 20, 10));

        assert_eq!(window.average_index_delta(), Some(10.0));
        assert_eq!(window.average_index_interval(), Some(Duration::from_secs(5)));
        assert_eq!(window.average_interval(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_window_never_reaches_capacity() {
        let origin = Instant::now();
        let mut window = SampleWindow::with_capacity(5);

        for i in 0..50 {
            window.add(sample_at(origin, i, i));
            assert!(window.len() < window.capacity());
        }

        assert_eq!(window.len(), 4);
        assert_eq!(window.iter().next().map(Sample::index), Some(46));
        assert_eq!(window.latest().map(Sample::index), Some(49));
    }

    #[test]
    fn test_running_sums_match_retained_samples() {
        let origin = Instant::now();
        let mut window = SampleWindow::with_capacity(4);

        let steps = [(0, 0), (1, 1), (3, 4), (4, 5), (9, 12), (10, 20)];
        for (index, secs) in steps {
            window.add(sample_at(origin, index, secs));
        }

        let retained: Vec<Sample> = window.iter().copied().collect();
        let (index_sum, time_sum) = retained.windows(2).fold(
            (0u64, Duration::ZERO),
            |(index_sum, time_sum), pair| {
                let (di, dt) = pair[1].delta_since(&pair[0]);
                (index_sum + di, time_sum + dt)
            },
        );

        assert_eq!(window.index_delta_sum(), index_sum);
        assert_eq!(window.time_delta_sum(), time_sum);
    }

    #[test]
    fn test_window_reacts_to_speed_change() {
        let origin = Instant::now();
        let mut window = SampleWindow::with_capacity(4);

        for i in 0..10 {
            window.add(sample_at(origin, i, i * 4));
        }
        assert_eq!(window.average_interval(), Some(Duration::from_secs(4)));

        // Processing speeds up to one item per second
        let base = 9 * 4;
        for i in 1..=3 {
            window.add(sample_at(origin, 9 + i, base + i));
        }
        assert_eq!(window.average_interval(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_uneven_index_advance_is_not_truncated() {
        let origin = Instant::now();
        let mut window = SampleWindow::new();

        window.add(sample_at(origin, 0, 0));
        window.add(sample_at(origin, 3, 3));
        window.add(sample_at(origin, 7, 7));

        assert_eq!(window.average_index_delta(), Some(3.5));
        assert_eq!(window.average_index_interval(), Some(Duration::from_millis(3500)));
        assert_eq!(window.average_interval(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_repeated_index_has_no_average() {
        let origin = Instant::now();
        let mut window = SampleWindow::new();

        window.add(sample_at(origin, 7, 0));
        window.add(sample_at(origin, 7, 1));

        assert_eq!(window.len(), 2);
        assert_eq!(window.average_interval(), None);
    }

    #[test]
    fn test_capacity_is_clamped() {
        assert_eq!(SampleWindow::with_capacity(0).capacity(), MIN_WINDOW_CAPACITY);
        assert_eq!(SampleWindow::new().capacity(), DEFAULT_WINDOW_CAPACITY);
    }
}
