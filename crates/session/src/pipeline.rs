//! Progress tracking for items flowing through an iterator

use crate::record::ProgressRecord;
use crate::session::ProgressSession;
use crate::sink::ProgressSink;
use pace_progress::{Clock, SystemClock};
use std::time::Instant;
use tracing::{debug, warn};

/// Iterator adapter that samples every item it yields
///
/// Items pass through unchanged. Records go to the sink as the session
/// decides to show them, and a completion record is sent once when the
/// inner iterator is exhausted.
pub struct Pipeline<I, S, T, C: Clock = SystemClock> {
    items: I,
    session: ProgressSession<T, C>,
    sink: S,
    finished: bool,
}

/// Track items whose total is already known by the session
pub fn track<I, S, C>(
    items: I,
    session: ProgressSession<I::Item, C>,
    sink: S,
) -> Pipeline<I::IntoIter, S, I::Item, C>
where
    I: IntoIterator,
    S: ProgressSink,
    C: Clock,
{
    Pipeline {
        items: items.into_iter(),
        session,
        sink,
        finished: false,
    }
}

/// Track items by collecting them first to learn the total
///
/// A collecting record is sent when the first item arrives and again for
/// later items once the session's refresh interval has passed, so a status
/// formatter follows the input while it is gathered. Once the input is
/// exhausted the session's expected count is set to the number of items and
/// the items are replayed. Empty input produces no records at all.
pub fn track_counted<I, S, C>(
    items: I,
    mut session: ProgressSession<I::Item, C>,
    sink: S,
) -> Pipeline<std::vec::IntoIter<I::Item>, S, I::Item, C>
where
    I: IntoIterator,
    S: ProgressSink,
    C: Clock,
{
    let refresh_interval = session.engine().config().refresh_interval;
    let mut last_collecting: Option<Instant> = None;
    let mut buffered = Vec::new();
    for item in items {
        let now = session.engine().clock().now();
        let due = last_collecting
            .is_none_or(|last| now.saturating_duration_since(last) >= refresh_interval);
        if due {
            emit(&sink, session.collecting_record(Some(&item)));
            last_collecting = Some(now);
        }
        buffered.push(item);
    }

    let finished = buffered.is_empty();
    if !finished {
        session
            .engine_mut()
            .set_expected_count(buffered.len() as u64);
        debug!(
            activity = session.activity(),
            count = buffered.len(),
            "collected items"
        );
    }

    Pipeline {
        items: buffered.into_iter(),
        session,
        sink,
        finished,
    }
}

impl<I, S, T, C> Pipeline<I, S, T, C>
where
    I: Iterator<Item = T>,
    S: ProgressSink,
    C: Clock,
{
    /// Send a time-only update if one is due
    pub fn check_time(&mut self) {
        if self.finished {
            return;
        }
        if let Some(record) = self.session.check_time() {
            emit(&self.sink, record);
        }
    }

    /// Complete the activity without draining the remaining items
    pub fn finish(mut self) -> ProgressSession<T, C> {
        self.complete();
        self.session
    }

    pub fn session(&self) -> &ProgressSession<T, C> {
        &self.session
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn complete(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        match self.session.complete() {
            Ok(record) => emit(&self.sink, record),
            Err(e) => warn!(error = %e, "pipeline completed twice"),
        }
    }
}

impl<I, S, T, C> Iterator for Pipeline<I, S, T, C>
where
    I: Iterator<Item = T>,
    S: ProgressSink,
    C: Clock,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.finished {
            return None;
        }

        if let Some(item) = self.items.next() {
            if let Some(record) = self.session.sample(&item) {
                emit(&self.sink, record);
            }
            Some(item)
        } else {
            self.complete();
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            self.items.size_hint()
        }
    }
}

fn emit<S: ProgressSink>(sink: &S, record: ProgressRecord) {
    sink.send_progress(record);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{channel, RecordReceiver};
    use pace_progress::{ManualClock, ProgressConfig, ProgressEngine};
    use std::time::Duration;

    fn session(expected: u64) -> ProgressSession<u32, ManualClock> {
        let engine = ProgressEngine::with_config(
            expected,
            ProgressConfig::unthrottled(),
            ManualClock::new(),
        );
        ProgressSession::new("Numbers", engine).unwrap()
    }

    fn drain(rx: &mut RecordReceiver) -> Vec<ProgressRecord> {
        let mut records = Vec::new();
        while let Ok(record) = rx.try_recv() {
            records.push(record);
        }
        records
    }

    #[test]
    fn test_items_pass_through() {
        let (tx, mut rx) = channel();
        let out: Vec<u32> = track(vec![1, 2, 3], session(3), &tx).collect();
        assert_eq!(out, vec![1, 2, 3]);

        let records = drain(&mut rx);
        assert_eq!(records.len(), 4);
        assert!(records[3].is_completed());
        assert!(records[..3].iter().all(|r| !r.is_completed()));
    }

    #[test]
    fn test_completion_sent_once() {
        let (tx, mut rx) = channel();
        let mut pipeline = track(Vec::<u32>::new(), session(0), &tx);
        assert_eq!(pipeline.next(), None);
        assert_eq!(pipeline.next(), None);
        assert!(pipeline.is_finished());

        let records = drain(&mut rx);
        assert_eq!(records.len(), 1);
        assert!(records[0].is_completed());
    }

    #[test]
    fn test_counted_empty_input_sends_nothing() {
        let (tx, mut rx) = channel();
        let out: Vec<u32> = track_counted(Vec::new(), session(0), &tx).collect();
        assert!(out.is_empty());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_counted_sets_total() {
        let (tx, mut rx) = channel();
        let pipeline = track_counted(vec![5, 6, 7, 8], session(0), &tx);
        assert_eq!(pipeline.session().expected_count(), 4);
        assert_eq!(pipeline.size_hint(), (4, Some(4)));

        let out: Vec<u32> = pipeline.collect();
        assert_eq!(out, vec![5, 6, 7, 8]);

        // Unthrottled, every collected item is announced
        let records = drain(&mut rx);
        assert!(records[..4]
            .iter()
            .all(|r| r.current_operation.as_deref() == Some("Collecting")));
        assert_eq!(records[4].status, "0 / 4 (0.00%)");
        assert!(records.last().is_some_and(ProgressRecord::is_completed));
    }

    fn throttled_session(clock: &ManualClock, expected: u64) -> ProgressSession<u32, ManualClock> {
        let config = ProgressConfig::unthrottled().with_refresh_interval(Duration::from_secs(1));
        let engine = ProgressEngine::with_config(expected, config, clock.clone());
        ProgressSession::new("Numbers", engine).unwrap()
    }

    #[test]
    fn test_counted_collecting_follows_refresh_interval() {
        let clock = ManualClock::new();
        let session = throttled_session(&clock, 0)
            .with_status(|n: &u32| format!("collecting {n}"));
        let (tx, mut rx) = channel();

        let items = (1..=5u32).inspect(|_| clock.advance(Duration::from_millis(400)));
        let pipeline = track_counted(items, session, &tx);
        assert_eq!(pipeline.session().expected_count(), 5);

        // One item every 400ms: announced at 400ms and 1600ms
        let statuses: Vec<String> = drain(&mut rx).into_iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec!["collecting 1", "collecting 4"]);
    }

    #[test]
    fn test_check_time_between_items() {
        let clock = ManualClock::new();
        let (tx, mut rx) = channel();
        let mut pipeline = track(vec![1, 2, 3], throttled_session(&clock, 3), &tx);

        assert_eq!(pipeline.next(), Some(1));
        assert_eq!(drain(&mut rx).len(), 1);

        // Too soon after the first item
        pipeline.check_time();
        assert!(drain(&mut rx).is_empty());

        clock.advance(Duration::from_secs(1));
        pipeline.check_time();
        let records = drain(&mut rx);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, "1 / 3 (33.33%)");
        assert_eq!(records[0].current_operation, None);
        assert_eq!(pipeline.session().engine().processed_count(), 1);

        // Exhaustion completes the activity and silences time checks
        assert_eq!(pipeline.by_ref().count(), 2);
        assert!(drain(&mut rx).last().is_some_and(ProgressRecord::is_completed));
        clock.advance(Duration::from_secs(5));
        pipeline.check_time();
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_finish_early() {
        let (tx, mut rx) = channel();
        let mut pipeline = track(vec![1, 2, 3], session(3), &tx);
        assert_eq!(pipeline.next(), Some(1));

        let session = pipeline.finish();
        assert!(session.is_completed());

        let records = drain(&mut rx);
        assert_eq!(records.len(), 2);
        assert!(records[1].is_completed());
    }
}
