//! Cooperative cancellation and progress reporting.
//!
//! # Protocol
//!
//! A run is driven by one [`CancellationToken`] and one [`ProgressSink`].
//! Calculators poll the token at a fixed cadence (every
//! `checkpoint_interval` processed items, starting with item 0) and report
//! a percent-complete figure at the same points. Cancellation is
//! checked by value: once set, the calculator abandons its scratch state and
//! returns [`crate::Outcome::Cancelled`].
//!
//! Progress reports are fire-and-forget. Sinks must not block the worker,
//! and a sink whose receiver has gone away silently drops reports.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// CancellationToken
// ---------------------------------------------------------------------------

/// Shared flag a caller sets to ask a running computation to stop.
///
/// Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// One progress notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Percent complete for the current calculator, `0..=100`.
    pub percent: u8,
    /// Human-readable description of the current step.
    pub description: String,
}

impl Progress {
    /// Build a report for `done` of `total` items. An empty workload counts
    /// as complete.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn of(done: usize, total: usize, description: impl Into<String>) -> Self {
        let percent = if total == 0 {
            100
        } else {
            (done.min(total) * 100 / total) as u8
        };
        Self {
            percent,
            description: description.into(),
        }
    }
}

/// Receiver of progress notifications.
pub trait ProgressSink {
    /// Deliver one report. Must return promptly and never fail.
    fn report(&self, progress: Progress);
}

/// Sink that discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _progress: Progress) {}
}

impl ProgressSink for Sender<Progress> {
    fn report(&self, progress: Progress) {
        // A hung-up receiver just means nobody is listening anymore.
        let _ = self.send(progress);
    }
}

/// Sink that records every report in memory.
#[derive(Debug, Default)]
pub struct ProgressLog {
    entries: Mutex<Vec<Progress>>,
}

impl ProgressLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    #[must_use]
    pub fn entries(&self) -> Vec<Progress> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl ProgressSink for ProgressLog {
    fn report(&self, progress: Progress) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(progress);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn token_clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn progress_percent_is_clamped() {
        assert_eq!(Progress::of(0, 10, "x").percent, 0);
        assert_eq!(Progress::of(5, 10, "x").percent, 50);
        assert_eq!(Progress::of(15, 10, "x").percent, 100);
        assert_eq!(Progress::of(0, 0, "x").percent, 100);
    }

    #[test]
    fn channel_sink_survives_dropped_receiver() {
        let (tx, rx) = mpsc::channel::<Progress>();
        drop(rx);
        tx.report(Progress::of(1, 2, "orphaned"));
    }

    #[test]
    fn progress_log_records_in_order() {
        let log = ProgressLog::new();
        log.report(Progress::of(0, 2, "first"));
        log.report(Progress::of(1, 2, "second"));
        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "first");
        assert_eq!(entries[1].percent, 50);
    }
}
