//! Destinations for progress records

use crate::record::ProgressRecord;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Sender half of a progress record channel
pub type RecordSender = UnboundedSender<ProgressRecord>;

/// Receiver half of a progress record channel
pub type RecordReceiver = UnboundedReceiver<ProgressRecord>;

/// Create a new progress record channel
#[must_use]
pub fn channel() -> (RecordSender, RecordReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// Anything that accepts progress records
pub trait ProgressSink {
    /// Hand a record to the sink
    fn send_progress(&self, record: ProgressRecord);
}

impl ProgressSink for RecordSender {
    fn send_progress(&self, record: ProgressRecord) {
        // Ignore send errors - if receiver is dropped, we just continue
        let _ = self.send(record);
    }
}

impl<S: ProgressSink + ?Sized> ProgressSink for &S {
    fn send_progress(&self, record: ProgressRecord) {
        (**self).send_progress(record);
    }
}
