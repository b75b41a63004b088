//! Progress rendering on stderr

use console::{style, Term};
use pace_progress::format_duration;
use pace_session::ProgressRecord;
use std::io;
use std::time::Duration;

const BAR_WIDTH: usize = 24;

/// Renders progress records as a redrawn status line or as JSON lines
pub struct ProgressRenderer {
    json_output: bool,
    term: Term,
    line_drawn: bool,
}

impl ProgressRenderer {
    pub fn new(json_output: bool) -> Self {
        Self {
            json_output,
            term: Term::stderr(),
            line_drawn: false,
        }
    }

    /// Render one record
    pub fn render(&mut self, record: &ProgressRecord) -> io::Result<()> {
        if self.json_output {
            let json = serde_json::to_string(record).map_err(io::Error::other)?;
            return self.term.write_line(&json);
        }

        if self.line_drawn {
            self.term.clear_line()?;
        }
        if record.is_completed() {
            self.line_drawn = false;
            return Ok(());
        }

        let line = format_status_line(record);
        let line = match self.term.size_checked() {
            Some((_, width)) => console::truncate_str(&line, usize::from(width), "...").into_owned(),
            None => line,
        };
        self.term.write_str(&line)?;
        self.line_drawn = true;
        Ok(())
    }

    /// Leave the terminal on a fresh line
    pub fn finish(&mut self) -> io::Result<()> {
        if self.line_drawn {
            self.term.clear_line()?;
            self.line_drawn = false;
        }
        Ok(())
    }
}

/// `activity: status [bar] ETA operation`
pub fn format_status_line(record: &ProgressRecord) -> String {
    let mut line = format!(
        "{}: {}",
        style(&record.activity).bold().for_stderr(),
        record.status
    );

    if let Some(percent) = record.percent_complete {
        line.push(' ');
        line.push_str(&progress_bar(percent));
    }
    if let Some(seconds) = record.seconds_remaining {
        line.push_str(" ETA ");
        line.push_str(&format_duration(Duration::from_secs(seconds)));
    }
    if let Some(operation) = &record.current_operation {
        line.push(' ');
        line.push_str(&style(operation).dim().for_stderr().to_string());
    }
    line
}

fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
    format!(
        "[{}{}]",
        "=".repeat(filled),
        " ".repeat(BAR_WIDTH - filled)
    )
}
