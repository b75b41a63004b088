//! Command line interface definition

use clap::Parser;
use std::path::PathBuf;

/// pace - pass lines through while reporting progress and time remaining
#[derive(Parser, Debug)]
#[command(name = "pace")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pass stdin through to stdout while reporting progress on stderr")]
#[command(long_about = None)]
pub struct Cli {
    /// Description of the work being tracked
    #[arg(long, short, default_value = "Processing")]
    pub activity: String,

    /// Number of lines expected; without it all input is read first to count it
    #[arg(long, short = 'n', value_name = "N")]
    pub expected_count: Option<u64>,

    /// Explicit activity id
    #[arg(long, value_name = "N")]
    pub id: Option<u32>,

    /// Id of the parent activity
    #[arg(long, value_name = "N")]
    pub parent_id: Option<u32>,

    /// Minimum time between progress updates
    #[arg(long, value_name = "MS")]
    pub refresh_interval_ms: Option<u64>,

    /// How long to wait before showing any progress
    #[arg(long, value_name = "MS")]
    pub display_threshold_ms: Option<u64>,

    /// Hide progress when completion is estimated to be closer than this
    #[arg(long, value_name = "MS")]
    pub minimum_time_left_ms: Option<u64>,

    /// Number of samples averaged for the time estimate
    #[arg(long, value_name = "N")]
    pub window_capacity: Option<usize>,

    /// Use alternate config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write progress records as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging on stderr
    #[arg(long)]
    pub debug: bool,
}
