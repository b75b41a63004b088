//! pace - pass lines through while reporting progress
//!
//! Reads lines from stdin, writes them unchanged to stdout, and reports
//! progress with an estimated time remaining on stderr.

mod cli;
mod display;
mod error;
mod logging;
mod pipe;

use crate::cli::Cli;
use crate::display::ProgressRenderer;
use crate::error::CliError;
use crate::pipe::{display_line, Line};
use clap::Parser;
use pace_config::Config;
use pace_errors::Error;
use pace_progress::ProgressEngine;
use pace_session::ProgressSession;
use std::process;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli)?;

    logging::init_tracing(&config.logging, cli.debug);
    info!("Starting pace v{}", env!("CARGO_PKG_VERSION"));

    let session = build_session(&cli, &config)?;
    let (record_sender, mut record_receiver) = pace_session::channel();

    let mut renderer = ProgressRenderer::new(cli.json);
    let render_task = tokio::spawn(async move {
        while let Some(record) = record_receiver.recv().await {
            if let Err(e) = renderer.render(&record) {
                warn!(error = %e, "failed to render progress");
            }
        }
        if let Err(e) = renderer.finish() {
            warn!(error = %e, "failed to clear progress line");
        }
    });

    let written = if cli.expected_count.is_some() {
        pipe::stream_lines(session, &record_sender).await?
    } else {
        let sender = record_sender.clone();
        tokio::task::spawn_blocking(move || pipe::count_then_replay(session, &sender))
            .await
            .map_err(|e| Error::internal(format!("line counting task failed: {e}")))??
    };

    drop(record_sender);
    render_task
        .await
        .map_err(|e| Error::internal(format!("progress renderer failed: {e}")))?;

    info!(lines = written, "Input processed");
    Ok(())
}

/// Apply command line overrides on top of file and environment settings
fn apply_cli_config(config: &mut Config, cli: &Cli) -> Result<(), CliError> {
    if let Some(ms) = cli.refresh_interval_ms {
        config.progress.refresh_interval_ms = ms;
    }
    if let Some(ms) = cli.display_threshold_ms {
        config.progress.display_threshold_ms = ms;
    }
    if let Some(ms) = cli.minimum_time_left_ms {
        config.progress.minimum_time_left_ms = ms;
    }
    if let Some(capacity) = cli.window_capacity {
        config.progress.window_capacity = capacity;
    }

    if let (Some(id), Some(parent_id)) = (cli.id, cli.parent_id) {
        if id == parent_id {
            return Err(CliError::InvalidArguments(format!(
                "activity {id} cannot be its own parent"
            )));
        }
    }

    config.validate()?;
    Ok(())
}

fn build_session(cli: &Cli, config: &Config) -> Result<ProgressSession<Line>, CliError> {
    let engine = ProgressEngine::with_config(
        cli.expected_count.unwrap_or(0),
        config.progress.to_progress_config(),
        pace_progress::SystemClock,
    );

    let mut session = ProgressSession::new(cli.activity.as_str(), engine)?
        .with_current_operation(|line: &Line| display_line(line));
    if let Some(id) = cli.id {
        session = session.with_id(id);
    }
    if let Some(parent_id) = cli.parent_id {
        session = session.with_parent_id(parent_id);
    }
    Ok(session)
}
