#![deny(clippy::pedantic, unsafe_code)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc
)]

//! Progress sessions for activities that process a sequence of items
//!
//! A [`ProgressSession`] wraps a [`ProgressEngine`](pace_progress::ProgressEngine)
//! with the descriptive side of an activity: its name, ids, and how to
//! describe the current item. Each surfaced update becomes a
//! [`ProgressRecord`] that is handed to a [`ProgressSink`] for rendering.
//!
//! [`track`] and [`track_counted`] wrap any iterator so every item is
//! sampled as it passes through.
//!
//! ```rust
//! use pace_progress::{ManualClock, ProgressConfig, ProgressEngine};
//! use pace_session::{channel, track, ProgressSession};
//!
//! let engine = ProgressEngine::with_config(3, ProgressConfig::unthrottled(), ManualClock::new());
//! let session = ProgressSession::new("Squaring", engine).unwrap();
//! let (tx, mut rx) = channel();
//!
//! let squares: Vec<u32> = track(vec![1, 2, 3], session, &tx).map(|n| n * n).collect();
//! assert_eq!(squares, vec![1, 4, 9]);
//!
//! let mut completed = false;
//! while let Ok(record) = rx.try_recv() {
//!     completed = record.is_completed();
//! }
//! assert!(completed);
//! ```

pub mod pipeline;
pub mod record;
pub mod session;
pub mod sink;

pub use pipeline::{track, track_counted, Pipeline};
pub use record::{ProgressRecord, RecordKind};
pub use session::{ProgressSession, SessionUpdate};
pub use sink::{channel, ProgressSink, RecordReceiver, RecordSender};
