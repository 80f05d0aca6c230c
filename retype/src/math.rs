use web_time::Duration;

use crate::{AVERAGE_WORD_LENGTH, Minutes};

/// The smallest divisor used for per-minute rates: one second.
///
/// Keeps the rates from blowing up right after a session starts.
pub const MIN_RATE_MINUTES: Minutes = 1.0 / 60.0;

/// Convert an elapsed duration into the minutes used for rate calculations
pub fn rate_minutes(elapsed: Duration) -> Minutes {
    (elapsed.as_secs_f64() / 60.0).max(MIN_RATE_MINUTES)
}

/// Round a non-negative measurement to the nearest whole number
fn round_clamped(value: f64, max: u32) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    // `as` saturates, the min keeps the result inside the requested range
    (value.round() as u32).min(max)
}

/// Derived typing rates for a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rates {
    /// Words per minute, where a word is [`AVERAGE_WORD_LENGTH`] correct characters
    pub wpm: u32,
    /// Correct characters per minute
    pub cpm: u32,
    /// Percentage of attempts that matched exactly, 0 - 100
    pub accuracy: u32,
}

impl Rates {
    /// Calculate rates from the ledger counts
    ///
    /// * `correct` - Attempts that matched exactly
    /// * `total` - All recorded attempts
    /// * `elapsed` - Time since tracking started
    ///
    pub fn calculate(correct: usize, total: usize, elapsed: Duration) -> Self {
        let minutes = rate_minutes(elapsed);
        let correct_chars = correct as f64;

        let wpm = (correct_chars / AVERAGE_WORD_LENGTH as f64) / minutes;
        let cpm = correct_chars / minutes;

        let accuracy = if total == 0 {
            100
        } else {
            round_clamped(correct_chars / total as f64 * 100.0, 100)
        };

        Self {
            wpm: round_clamped(wpm, u32::MAX),
            cpm: round_clamped(cpm, u32::MAX),
            accuracy,
        }
    }
}
