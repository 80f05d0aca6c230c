//! # Statistics Tracker Module - Ledger, Timing and Live Snapshots
//!
//! Wraps the [`Ledger`] with a tracking flag, a start time and a repeating snapshot
//! timer. The timer is a single deadline rather than a thread: the host polls
//! [`StatsTracker::tick`] from its event loop and a snapshot is published to every
//! subscriber whenever the deadline has passed. Stopping or resetting the tracker
//! disarms the deadline, so no snapshot can be published after teardown.
//!
//! ```rust
//! use retype::statistics_tracker::StatsTracker;
//! use web_time::{Duration, Instant};
//!
//! let mut tracker = StatsTracker::new();
//! let updates = tracker.subscribe();
//!
//! tracker.start_tracking();
//! tracker.record_character('a', 'a', 0);
//!
//! // One interval later the next poll publishes a snapshot
//! let later = Instant::now() + Duration::from_secs(1);
//! assert!(tracker.tick(later).is_some());
//! assert_eq!(updates.try_recv().unwrap().correct_characters, 1);
//! ```

use crossbeam_channel::{Receiver, Sender};
use web_time::{Duration, Instant};

use crate::statistics::{ErrorRecord, Ledger, SessionSummary, TypingStats};

/// Window used by [`StatsTracker::recent_errors`] when the caller has no preference
pub const DEFAULT_RECENT_ERRORS_WINDOW: Duration = Duration::from_secs(10);

/// Handles statistics tracking and timing
#[derive(Debug)]
pub struct StatsTracker {
    ledger: Ledger,
    tracking: bool,
    started_at: Option<Instant>,
    /// The armed snapshot deadline, if any. At most one exists at a time.
    next_tick: Option<Instant>,
    interval: Duration,
    listeners: Vec<Sender<TypingStats>>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_secs(1))
    }

    /// Create a tracker that publishes live snapshots every `interval`
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            ledger: Ledger::default(),
            tracking: false,
            started_at: None,
            next_tick: None,
            interval,
            listeners: Vec::new(),
        }
    }

    /// Change the snapshot interval. Takes effect from the next start.
    pub const fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub const fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn start_tracking(&mut self) {
        self.start_tracking_at(Instant::now());
    }

    /// Start tracking from `now` and arm the snapshot timer
    ///
    /// The timer stays disarmed if the first deadline lies beyond what the clock can
    /// represent.
    pub fn start_tracking_at(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.tracking = true;
        self.next_tick = now.checked_add(self.interval);
        tracing::debug!(target: "retype.stats", "tracking_started");
    }

    /// Stop tracking and disarm the snapshot timer. The ledger is kept.
    pub fn stop_tracking(&mut self) {
        if self.tracking {
            tracing::debug!(
                target: "retype.stats",
                total = self.ledger.total_characters(),
                correct = self.ledger.correct_characters(),
                errors = self.ledger.errors().len(),
                "tracking_stopped"
            );
        }
        self.tracking = false;
        self.next_tick = None;
    }

    /// Zero the ledger and stop tracking
    pub fn reset(&mut self) {
        self.ledger.clear();
        self.tracking = false;
        self.started_at = None;
        self.next_tick = None;
    }

    /// Record one attempt. Ignored while not tracking.
    pub fn record_character(&mut self, expected: char, typed: char, position: usize) {
        if !self.tracking {
            return;
        }
        self.ledger
            .record(expected, typed, position, Instant::now());
    }

    /// Undo the most recent attempt. Ignored while not tracking.
    ///
    /// See [`Ledger::remove_last`] for why this is only an approximation.
    pub fn remove_last_character(&mut self) {
        if !self.tracking {
            return;
        }
        self.ledger.remove_last();
    }

    /// Time since tracking started, or zero while not tracking
    fn elapsed_at(&self, now: Instant) -> Duration {
        match (self.tracking, self.started_at) {
            (true, Some(started_at)) => now.saturating_duration_since(started_at),
            _ => Duration::ZERO,
        }
    }

    pub fn current_stats(&self) -> TypingStats {
        self.current_stats_at(Instant::now())
    }

    pub fn current_stats_at(&self, now: Instant) -> TypingStats {
        self.ledger.snapshot(self.elapsed_at(now))
    }

    pub fn session_summary(&self) -> SessionSummary {
        self.session_summary_at(Instant::now())
    }

    pub fn session_summary_at(&self, now: Instant) -> SessionSummary {
        self.current_stats_at(now).into()
    }

    /// Errors whose position lies within `start..=end`
    pub fn errors_in_range(&self, start: usize, end: usize) -> Vec<ErrorRecord> {
        self.ledger.errors_in_range(start, end)
    }

    /// Errors recorded within the last `window`
    pub fn recent_errors(&self, window: Duration) -> Vec<ErrorRecord> {
        self.recent_errors_at(Instant::now(), window)
    }

    pub fn recent_errors_at(&self, now: Instant, window: Duration) -> Vec<ErrorRecord> {
        match now.checked_sub(window) {
            Some(cutoff) => self.ledger.errors_since(cutoff),
            // The window reaches back before the clock's origin
            None => self.ledger.errors().to_vec(),
        }
    }

    /// Register a listener for live snapshots
    ///
    /// Dropping the receiver unsubscribes it.
    pub fn subscribe(&mut self) -> Receiver<TypingStats> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.listeners.push(sender);
        receiver
    }

    /// Drop every listener
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Publish a snapshot if the timer is due at `now`
    ///
    /// Returns the published snapshot. Missed intervals are skipped rather than
    /// published in a burst.
    pub fn tick(&mut self, now: Instant) -> Option<TypingStats> {
        let deadline = self.next_tick?;
        if !self.tracking || now < deadline {
            return None;
        }

        // First deadline strictly after `now`
        let interval = self.interval.max(Duration::from_millis(1));
        let behind = now.saturating_duration_since(deadline).as_nanos();
        let steps = behind / interval.as_nanos() + 1;
        self.next_tick = u64::try_from(steps * interval.as_nanos())
            .ok()
            .and_then(|nanos| deadline.checked_add(Duration::from_nanos(nanos)));

        let stats = self.current_stats_at(now);
        self.listeners
            .retain(|listener| listener.send(stats).is_ok());

        Some(stats)
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_tracker() {
        let mut tracker = StatsTracker::new();

        // Nothing is recorded before tracking starts
        tracker.record_character('a', 'a', 0);
        assert_eq!(tracker.ledger().total_characters(), 0);
        assert!(!tracker.is_tracking());

        tracker.start_tracking();
        assert!(tracker.is_tracking());

        tracker.record_character('a', 'x', 0);
        tracker.record_character('a', 'a', 0);
        let stats = tracker.current_stats();
        assert_eq!(stats.total_characters, 2);
        assert_eq!(stats.correct_characters, 1);
        assert_eq!(stats.error_count, 1);
        assert_eq!(stats.accuracy, 50);
    }

    #[test]
    fn test_stop_keeps_ledger_and_reset_clears_it() {
        let mut tracker = StatsTracker::new();
        tracker.start_tracking();
        tracker.record_character('a', 'a', 0);
        tracker.stop_tracking();

        // Retained, but frozen: no more records or removals
        tracker.record_character('b', 'b', 1);
        tracker.remove_last_character();
        assert_eq!(tracker.ledger().total_characters(), 1);
        assert_eq!(tracker.current_stats().elapsed_seconds, 0);

        tracker.reset();
        assert_eq!(tracker.ledger().total_characters(), 0);
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn test_elapsed_time_and_summary() {
        let start = Instant::now();
        let mut tracker = StatsTracker::new();
        tracker.start_tracking_at(start);
        for (index, char) in "0123456789".chars().enumerate() {
            tracker.record_character(char, char, index);
        }

        let summary = tracker.session_summary_at(start + Duration::from_secs(60));
        assert_eq!(summary.duration_seconds, 60);
        assert_eq!(summary.total_characters, 10);
        assert_eq!(summary.correct_characters, 10);
        assert_eq!(summary.wpm, 2);
        assert_eq!(summary.accuracy, 100);
    }

    #[test]
    fn test_tick_publishes_on_interval() {
        let start = Instant::now();
        let mut tracker = StatsTracker::with_interval(Duration::from_secs(1));
        let updates = tracker.subscribe();

        // Not armed yet
        assert!(tracker.tick(start + Duration::from_secs(5)).is_none());

        tracker.start_tracking_at(start);
        assert!(tracker.tick(start + Duration::from_millis(500)).is_none());
        assert!(updates.try_recv().is_err());

        let stats = tracker.tick(start + Duration::from_secs(1)).unwrap();
        assert_eq!(stats.elapsed_seconds, 1);
        assert_eq!(updates.try_recv().unwrap(), stats);

        // Already published for this interval
        assert!(tracker.tick(start + Duration::from_millis(1500)).is_none());

        // Skips the missed intervals instead of bursting
        assert!(tracker.tick(start + Duration::from_millis(4500)).is_some());
        assert!(tracker.tick(start + Duration::from_millis(4900)).is_none());
        assert!(tracker.tick(start + Duration::from_secs(5)).is_some());
        assert_eq!(updates.try_iter().count(), 2);
    }

    #[test]
    fn test_tick_after_long_gap() {
        let start = Instant::now();
        let mut tracker = StatsTracker::with_interval(Duration::from_millis(1));
        tracker.start_tracking_at(start);

        let later = start + Duration::from_secs(3 * 60 * 60);
        assert!(tracker.tick(later).is_some());
        assert!(tracker.tick(later).is_none());
        assert!(tracker.tick(later + Duration::from_millis(1)).is_some());
    }

    #[test]
    fn test_huge_interval_leaves_timer_disarmed() {
        let start = Instant::now();
        let mut tracker = StatsTracker::with_interval(Duration::MAX);

        tracker.start_tracking_at(start);
        assert!(tracker.is_tracking());
        assert!(tracker.tick(start + Duration::from_secs(60)).is_none());

        tracker.record_character('a', 'a', 0);
        assert_eq!(tracker.current_stats().correct_characters, 1);
    }

    #[test]
    fn test_stop_and_reset_disarm_timer() {
        let start = Instant::now();
        let mut tracker = StatsTracker::new();
        let updates = tracker.subscribe();

        tracker.start_tracking_at(start);
        tracker.stop_tracking();
        assert!(tracker.tick(start + Duration::from_secs(3)).is_none());

        tracker.start_tracking_at(start);
        tracker.reset();
        assert!(tracker.tick(start + Duration::from_secs(3)).is_none());

        assert!(updates.try_recv().is_err());
    }

    #[test]
    fn test_dropped_listener_is_pruned() {
        let start = Instant::now();
        let mut tracker = StatsTracker::new();
        let kept = tracker.subscribe();
        drop(tracker.subscribe());

        tracker.start_tracking_at(start);
        tracker.tick(start + Duration::from_secs(1));
        assert_eq!(tracker.listeners.len(), 1);
        assert!(kept.try_recv().is_ok());

        tracker.clear_listeners();
        assert!(kept.try_recv().is_err());
    }

    #[test]
    fn test_recent_errors_window() {
        let mut tracker = StatsTracker::new();
        tracker.start_tracking();
        tracker.record_character('a', 'b', 0);

        let now = Instant::now();
        assert_eq!(
            tracker
                .recent_errors_at(now, DEFAULT_RECENT_ERRORS_WINDOW)
                .len(),
            1
        );
        assert!(
            tracker
                .recent_errors_at(now + Duration::from_secs(11), DEFAULT_RECENT_ERRORS_WINDOW)
                .is_empty()
        );
        assert_eq!(tracker.errors_in_range(0, 0).len(), 1);
    }
}
