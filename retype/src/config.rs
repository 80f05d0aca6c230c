//! # Configuration Module - Runtime Behavior Settings
//!
//! Options that tune how a practice session behaves. Editor-owned settings such as
//! tab width live in [`crate::editor::EditorSettings`] instead, since those are read
//! from the editor at the moment they are needed.
//!
//! ## Usage
//!
//! ```rust
//! use retype::config::Configuration;
//!
//! // Use default configuration
//! let config = Configuration::default();
//!
//! // Custom configuration
//! let config = Configuration {
//!     stats_interval_seconds: 0.5, // Emit live statistics every 500ms
//!     restart_near_end: false,
//! };
//! ```

use web_time::Duration;

/// Runtime configuration for a practice session
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// Interval between live statistics snapshots in seconds
    ///
    /// **Default**: 1.0 seconds
    pub stats_interval_seconds: f64,

    /// Start from the top of the document when practice is started with the cursor
    /// at, or one character before, the end of the document.
    ///
    /// **Default**: true
    pub restart_near_end: bool,
}

impl Configuration {
    /// The live statistics interval as a [`Duration`]
    ///
    /// Values that are not a positive duration, or that do not fit in one, fall back
    /// to the default of one second.
    pub fn stats_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.stats_interval_seconds)
            .ok()
            .filter(|interval| !interval.is_zero())
            .unwrap_or(Duration::from_secs(1))
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            stats_interval_seconds: 1.0,
            restart_near_end: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_interval() {
        let config = Configuration::default();
        assert_eq!(config.stats_interval(), Duration::from_secs(1));

        let config = Configuration {
            stats_interval_seconds: 0.25,
            ..Configuration::default()
        };
        assert_eq!(config.stats_interval(), Duration::from_millis(250));

        for invalid in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = Configuration {
                stats_interval_seconds: invalid,
                ..Configuration::default()
            };
            assert_eq!(config.stats_interval(), Duration::from_secs(1));
        }
    }

    #[test]
    fn test_stats_interval_out_of_range() {
        let config = Configuration {
            stats_interval_seconds: 1e20,
            ..Configuration::default()
        };
        assert_eq!(config.stats_interval(), Duration::from_secs(1));

        // Fits in a duration, so it is kept as is
        let config = Configuration {
            stats_interval_seconds: 1e18,
            ..Configuration::default()
        };
        assert_eq!(config.stats_interval(), Duration::from_secs(1_000_000_000_000_000_000));
    }
}
