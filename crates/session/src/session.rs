//! A tracked activity: engine plus everything needed to describe its progress

use crate::record::{ProgressRecord, RecordKind};
use pace_errors::{Error, SessionError};
use pace_progress::{Clock, ProgressEngine, ProgressInfo, SystemClock};
use std::fmt;
use std::time::Duration;
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

type Formatter<T> = Box<dyn Fn(&T) -> String + Send>;

/// Changes to apply to a running session; `None` leaves a setting alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    pub expected_count: Option<u64>,
    pub refresh_interval: Option<Duration>,
    pub display_threshold: Option<Duration>,
    pub minimum_time_left: Option<Duration>,
}

/// Progress session for one activity over items of type `T`
pub struct ProgressSession<T, C: Clock = SystemClock> {
    activity: String,
    activity_id: u32,
    parent_id: Option<u32>,
    engine: ProgressEngine<C>,
    status: Option<Formatter<T>>,
    current_operation: Option<Formatter<T>>,
    completed: bool,
}

impl<T, C: Clock> ProgressSession<T, C> {
    /// Create a session for `activity` driven by `engine`
    ///
    /// The activity id is derived from the activity text unless set with
    /// [`with_id`](Self::with_id).
    ///
    /// # Errors
    ///
    /// Returns an error if `activity` is empty or only whitespace.
    pub fn new(activity: impl Into<String>, engine: ProgressEngine<C>) -> Result<Self, Error> {
        let activity = activity.into();
        if activity.trim().is_empty() {
            return Err(SessionError::EmptyActivity.into());
        }

        Ok(Self {
            activity_id: derive_activity_id(&activity),
            activity,
            parent_id: None,
            engine,
            status: None,
            current_operation: None,
            completed: false,
        })
    }

    /// Use an explicit activity id
    #[must_use]
    pub fn with_id(mut self, activity_id: u32) -> Self {
        self.activity_id = activity_id;
        self
    }

    /// Nest this activity under `parent_id`
    #[must_use]
    pub fn with_parent_id(mut self, parent_id: u32) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Describe the status from the current item
    #[must_use]
    pub fn with_status(mut self, status: impl Fn(&T) -> String + Send + 'static) -> Self {
        self.status = Some(Box::new(status));
        self
    }

    /// Describe the current operation from the current item
    #[must_use]
    pub fn with_current_operation(
        mut self,
        operation: impl Fn(&T) -> String + Send + 'static,
    ) -> Self {
        self.current_operation = Some(Box::new(operation));
        self
    }

    /// Replace the status formatter of a running session
    pub fn set_status(&mut self, status: impl Fn(&T) -> String + Send + 'static) {
        self.status = Some(Box::new(status));
    }

    /// Replace the current operation formatter of a running session
    pub fn set_current_operation(&mut self, operation: impl Fn(&T) -> String + Send + 'static) {
        self.current_operation = Some(Box::new(operation));
    }

    /// Apply new settings; they take effect on the next decision
    pub fn update_settings(&mut self, update: &SessionUpdate) {
        if let Some(expected) = update.expected_count {
            self.engine.set_expected_count(expected);
        }
        if let Some(interval) = update.refresh_interval {
            self.engine.set_refresh_interval(interval);
        }
        if let Some(threshold) = update.display_threshold {
            self.engine.set_display_threshold(threshold);
        }
        if let Some(minimum) = update.minimum_time_left {
            self.engine.set_minimum_time_left(minimum);
        }
    }

    /// Record `item` as processed and build a record if progress should show
    pub fn sample(&mut self, item: &T) -> Option<ProgressRecord> {
        let info = self.engine.add_sample()?;
        Some(self.record_for(&info, Some(item)))
    }

    /// Check whether progress should show without processing an item
    pub fn check_time(&mut self) -> Option<ProgressRecord> {
        let info = self.engine.check_time()?;
        Some(self.record_for(&info, None))
    }

    /// Build the record describing `info`
    ///
    /// Formatters only run when an item is available.
    pub fn record_for(&self, info: &ProgressInfo, item: Option<&T>) -> ProgressRecord {
        let status = match (&self.status, item) {
            (Some(status), Some(item)) => status(item),
            _ => self.default_status(info),
        };
        let current_operation = match (&self.current_operation, item) {
            (Some(operation), Some(item)) => Some(operation(item)),
            _ => None,
        };

        let record = ProgressRecord {
            activity_id: self.activity_id,
            parent_id: self.parent_id,
            activity: self.activity.clone(),
            status,
            current_operation,
            percent_complete: info.percentage().map(whole_percent),
            seconds_remaining: info.seconds_remaining(),
            kind: RecordKind::Processing,
        };
        debug!(record = %record, "progress record");
        record
    }

    /// Record announcing that items are being collected before counting
    pub fn collecting_record(&self, item: Option<&T>) -> ProgressRecord {
        let status = match (&self.status, item) {
            (Some(status), Some(item)) => status(item),
            _ => "Collecting".to_string(),
        };

        ProgressRecord {
            activity_id: self.activity_id,
            parent_id: self.parent_id,
            activity: self.activity.clone(),
            status,
            current_operation: Some("Collecting".to_string()),
            percent_complete: None,
            seconds_remaining: None,
            kind: RecordKind::Processing,
        }
    }

    /// Finish the activity
    ///
    /// # Errors
    ///
    /// Returns an error if the session was already completed.
    pub fn complete(&mut self) -> Result<ProgressRecord, Error> {
        if self.completed {
            return Err(SessionError::AlreadyCompleted {
                activity: self.activity.clone(),
            }
            .into());
        }
        self.completed = true;

        let record = ProgressRecord {
            activity_id: self.activity_id,
            parent_id: self.parent_id,
            activity: self.activity.clone(),
            status: "Complete".to_string(),
            current_operation: None,
            percent_complete: None,
            seconds_remaining: None,
            kind: RecordKind::Completed,
        };
        debug!(record = %record, "progress completed");
        Ok(record)
    }

    fn default_status(&self, info: &ProgressInfo) -> String {
        match info.percentage() {
            Some(percent) => format!(
                "{} / {} ({percent:.2}%)",
                info.item_index,
                self.engine.expected_count()
            ),
            None => info.item_index.to_string(),
        }
    }

    pub fn activity(&self) -> &str {
        &self.activity
    }

    pub fn activity_id(&self) -> u32 {
        self.activity_id
    }

    pub fn parent_id(&self) -> Option<u32> {
        self.parent_id
    }

    pub fn expected_count(&self) -> u64 {
        self.engine.expected_count()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn engine(&self) -> &ProgressEngine<C> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ProgressEngine<C> {
        &mut self.engine
    }
}

impl<T, C: Clock + fmt::Debug> fmt::Debug for ProgressSession<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressSession")
            .field("activity", &self.activity)
            .field("activity_id", &self.activity_id)
            .field("parent_id", &self.parent_id)
            .field("engine", &self.engine)
            .field("completed", &self.completed)
            .finish_non_exhaustive()
    }
}

/// Stable non-negative id for an activity description
#[allow(clippy::cast_possible_truncation)]
fn derive_activity_id(activity: &str) -> u32 {
    (xxh3_64(activity.as_bytes()) & 0x7fff_ffff) as u32
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_percent(percent: f64) -> u8 {
    percent.clamp(0.0, 100.0) as u8
}
