#![deny(clippy::pedantic, unsafe_code)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,        // Item counts are converted to f64 for averages
    clippy::must_use_candidate,         // Many accessors are self-evident
    clippy::uninlined_format_args       // Format args are clear in context
)]

//! Sampled progress estimation for item pipelines
//!
//! This crate decides, for each processed item or time check, whether a
//! progress update should be surfaced, and estimates the time remaining:
//! - Moving-average time per item over a bounded window of samples, with
//!   running sums so every update is O(1)
//! - A refresh-interval throttle against update storms
//! - A display threshold so near-instant activities never show progress
//! - A minimum-time-left rule so progress does not flash just before completion
//!
//! The engine performs no I/O and renders nothing. Time comes from an
//! injected [`Clock`].
//!
//! ## Usage Example
//!
//! ```rust
//! use pace_progress::{ManualClock, ProgressConfig, ProgressEngine};
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! let config = ProgressConfig::default().with_display_threshold(Duration::ZERO);
//! let mut engine = ProgressEngine::with_config(100, config, clock.clone());
//!
//! for _ in 0..100 {
//!     if let Some(info) = engine.add_sample() {
//!         println!("{:.0}%", info.percentage().unwrap_or(0.0));
//!         if let Some(eta) = info.format_eta() {
//!             println!("ETA: {eta}");
//!         }
//!     }
//!     clock.advance(Duration::from_millis(100));
//! }
//!
//! assert_eq!(engine.processed_count(), 100);
//! ```

pub mod clock;
pub mod config;
pub mod engine;
pub mod info;
pub mod window;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    ProgressConfig, DEFAULT_DISPLAY_THRESHOLD, DEFAULT_MINIMUM_TIME_LEFT,
    DEFAULT_REFRESH_INTERVAL,
};
pub use engine::{ProgressEngine, Suppression};
pub use info::{format_duration, ProgressInfo};
pub use window::{Sample, SampleWindow, DEFAULT_WINDOW_CAPACITY, MIN_WINDOW_CAPACITY};
