use std::fmt;

pub use web_time::{Duration, Instant};

use crate::math::Rates;

/// A recorded mismatch between the expected and typed character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorRecord {
    /// Offset into the target text where the attempt happened
    pub position: usize,
    pub expected: char,
    pub typed: char,
    /// When the attempt was recorded
    pub timestamp: Instant,
}

/// A live snapshot of the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypingStats {
    pub wpm: u32,
    pub cpm: u32,
    /// Percentage between 0 and 100
    pub accuracy: u32,
    pub error_count: usize,
    pub total_characters: usize,
    pub correct_characters: usize,
    /// Whole seconds since tracking started, 0 when not tracking
    pub elapsed_seconds: u64,
}

impl TypingStats {
    /// Text for a one-line status display
    pub fn status_line(&self) -> String {
        format!(
            "ReType: {} WPM | {}% | {} errors",
            self.wpm, self.accuracy, self.error_count
        )
    }
}

/// A frozen snapshot of a finished (or stopped) session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSummary {
    pub duration_seconds: u64,
    pub total_characters: usize,
    pub correct_characters: usize,
    pub error_count: usize,
    pub wpm: u32,
    pub accuracy: u32,
}

impl From<TypingStats> for SessionSummary {
    fn from(stats: TypingStats) -> Self {
        Self {
            duration_seconds: stats.elapsed_seconds,
            total_characters: stats.total_characters,
            correct_characters: stats.correct_characters,
            error_count: stats.error_count,
            wpm: stats.wpm,
            accuracy: stats.accuracy,
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WPM: {} | Accuracy: {}% | Time: {}s | Errors: {} | Characters: {}/{}",
            self.wpm,
            self.accuracy,
            self.duration_seconds,
            self.error_count,
            self.correct_characters,
            self.total_characters
        )
    }
}

/// The running character ledger
///
/// Counts attempts and keeps an append-only log of mismatches. The ledger knows
/// nothing about the practice text itself.
///
/// `correct_characters <= total_characters` always holds. The number of errors is
/// *not* guaranteed to equal `total_characters - correct_characters`, because
/// [`Ledger::remove_last`] is a heuristic rather than an exact undo.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    total_characters: usize,
    correct_characters: usize,
    errors: Vec<ErrorRecord>,
}

impl Ledger {
    pub const fn total_characters(&self) -> usize {
        self.total_characters
    }

    pub const fn correct_characters(&self) -> usize {
        self.correct_characters
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    /// Record one attempt
    ///
    /// Only an exact match counts as correct. Equivalence rules are deliberately not
    /// consulted here, so an attempt can advance the session and still be logged as
    /// an error.
    pub fn record(&mut self, expected: char, typed: char, position: usize, timestamp: Instant) {
        self.total_characters += 1;

        if expected == typed {
            self.correct_characters += 1;
        } else {
            self.errors.push(ErrorRecord {
                position,
                expected,
                typed,
                timestamp,
            });
        }
    }

    /// Undo the most recent attempt, as well as the ledger can tell
    ///
    /// The tail error is popped when its position equals the decremented attempt
    /// count. Otherwise the undone attempt is assumed to have been correct.
    ///
    /// Returns false if there was nothing to undo.
    pub fn remove_last(&mut self) -> bool {
        if self.total_characters == 0 {
            return false;
        }

        self.total_characters -= 1;

        if self
            .errors
            .last()
            .is_some_and(|error| error.position == self.total_characters)
        {
            self.errors.pop();
        } else if self.correct_characters > 0 {
            self.correct_characters -= 1;
        }

        true
    }

    /// Zero all counts and drop the error log
    pub fn clear(&mut self) {
        self.total_characters = 0;
        self.correct_characters = 0;
        self.errors.clear();
    }

    /// Snapshot the ledger, given how long tracking has been running
    pub fn snapshot(&self, elapsed: Duration) -> TypingStats {
        let Rates { wpm, cpm, accuracy } =
            Rates::calculate(self.correct_characters, self.total_characters, elapsed);

        TypingStats {
            wpm,
            cpm,
            accuracy,
            error_count: self.errors.len(),
            total_characters: self.total_characters,
            correct_characters: self.correct_characters,
            elapsed_seconds: elapsed.as_secs_f64().round() as u64,
        }
    }

    /// Errors whose position lies within `start..=end`
    pub fn errors_in_range(&self, start: usize, end: usize) -> Vec<ErrorRecord> {
        self.errors
            .iter()
            .filter(|error| (start..=end).contains(&error.position))
            .copied()
            .collect()
    }

    /// Errors recorded at or after `cutoff`
    pub fn errors_since(&self, cutoff: Instant) -> Vec<ErrorRecord> {
        self.errors
            .iter()
            .filter(|error| error.timestamp >= cutoff)
            .copied()
            .collect()
    }
}
