//! Passing stdin through to stdout while sampling each line
//!
//! Lines are raw bytes including their terminator, so input that is not
//! UTF-8 passes through untouched.

use crate::error::CliError;
use pace_session::{track_counted, ProgressSession, ProgressSink, RecordSender};
use std::io::{self, BufRead, BufWriter, Write};
use std::thread;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

/// One line of input as read, terminator included
pub type Line = Vec<u8>;

/// Time checks between lines never run more often than this
const MIN_TICK: Duration = Duration::from_millis(50);

/// Lines buffered between the stdin reader and the writer
const READ_AHEAD: usize = 256;

/// Text shown for a line in progress output
pub fn display_line(line: &[u8]) -> String {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// Read one line, terminator included; `None` at end of input
fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Option<Line>> {
    let mut line = Vec::new();
    match reader.read_until(b'\n', &mut line)? {
        0 => Ok(None),
        _ => Ok(Some(line)),
    }
}

/// Read stdin on a detached thread
///
/// A blocked read never holds up shutdown when output stops early.
fn spawn_stdin_reader() -> mpsc::Receiver<io::Result<Line>> {
    let (tx, rx) = mpsc::channel(READ_AHEAD);
    thread::spawn(move || {
        let mut stdin = io::stdin().lock();
        loop {
            match read_line(&mut stdin) {
                Ok(Some(line)) => {
                    if tx.blocking_send(Ok(line)).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    let _ = tx.blocking_send(Err(e));
                    break;
                }
            }
        }
    });
    rx
}

/// Stream lines with a known (or unknown) total, checking the time between lines
///
/// Lines already read are flushed and the activity is completed even when
/// reading fails part way.
pub async fn stream_lines(
    mut session: ProgressSession<Line>,
    sink: &RecordSender,
) -> Result<u64, CliError> {
    let mut lines = spawn_stdin_reader();
    let mut out = tokio::io::BufWriter::new(tokio::io::stdout());

    let result = pump(&mut session, sink, &mut lines, &mut out).await;
    let flushed = flush_async(&mut out).await;
    sink.send_progress(session.complete()?);

    let written = result?;
    flushed?;
    Ok(written)
}

async fn pump<W>(
    session: &mut ProgressSession<Line>,
    sink: &RecordSender,
    lines: &mut mpsc::Receiver<io::Result<Line>>,
    out: &mut W,
) -> Result<u64, CliError>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    let tick = session.engine().config().refresh_interval.max(MIN_TICK);
    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut written = 0u64;

    loop {
        select! {
            line = lines.recv() => {
                let Some(line) = line else { break };
                let line = line?;
                if let Some(record) = session.sample(&line) {
                    sink.send_progress(record);
                }
                if !closed_pipe_is_false(out.write_all(&line).await)? {
                    debug!("stdout closed, stopping early");
                    break;
                }
                written += 1;
            }
            _ = ticker.tick() => {
                if let Some(record) = session.check_time() {
                    sink.send_progress(record);
                }
                if !flush_async(out).await? {
                    debug!("stdout closed, stopping early");
                    break;
                }
            }
        }
    }

    Ok(written)
}

/// Read every line first to learn the total, then replay them
///
/// Lines read before a read error still pass through before it is reported.
pub fn count_then_replay(
    session: ProgressSession<Line>,
    sink: &RecordSender,
) -> Result<u64, CliError> {
    let mut stdin = io::stdin().lock();
    let mut read_error = None;
    let lines = std::iter::from_fn(|| {
        read_line(&mut stdin).unwrap_or_else(|e| {
            read_error = Some(e);
            None
        })
    });

    let mut pipeline = track_counted(lines, session, sink);

    let mut out = BufWriter::new(io::stdout().lock());
    let mut written = 0u64;
    let mut closed = false;
    for line in pipeline.by_ref() {
        if !closed_pipe_is_false(out.write_all(&line))? {
            closed = true;
            break;
        }
        written += 1;
    }

    if closed || !closed_pipe_is_false(out.flush())? {
        debug!("stdout closed, stopping early");
        pipeline.finish();
    }

    match read_error {
        Some(e) => Err(e.into()),
        None => Ok(written),
    }
}

async fn flush_async<W>(out: &mut W) -> Result<bool, CliError>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    closed_pipe_is_false(out.flush().await)
}

/// Returns false once the reader on the other end has gone away
fn closed_pipe_is_false(result: io::Result<()>) -> Result<bool, CliError> {
    match result {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(false),
        Err(e) => Err(e.into()),
    }
}
