//! # retype - Retype a document, one character at a time
//!
//! A typing-practice engine meant to be embedded in a text editor. The user places a
//! cursor in an existing document, enters practice mode, and retypes the rest of the
//! document. The engine compares every keystroke with the expected character, only
//! advances on a match, and keeps live statistics.
//!
//! The editor itself (text storage, highlighting, keystroke capture, settings) stays
//! outside of this crate and is reached through the [`editor::Editor`] trait.
//!
//! ## Components
//!
//! - [`equivalence`]: decides whether a typed character satisfies an expected one
//! - [`statistics_tracker`]: the character ledger behind WPM, CPM and accuracy
//! - [`session`]: the practice state machine that drives the two above
//!
//! ## Example
//!
//! ```rust
//! use retype::editor::{DiffState, Editor, EditorSettings, RenderError};
//! use retype::session::Session;
//!
//! #[derive(Default)]
//! struct Headless(Option<DiffState>);
//!
//! impl Editor for Headless {
//!     fn editor_settings(&self) -> EditorSettings {
//!         EditorSettings::default()
//!     }
//!
//!     fn render(&mut self, diff: &DiffState) -> Result<(), RenderError> {
//!         self.0 = Some(diff.clone());
//!         Ok(())
//!     }
//!
//!     fn clear(&mut self) -> Result<(), RenderError> {
//!         self.0 = None;
//!         Ok(())
//!     }
//! }
//!
//! let mut session = Session::new(Headless::default());
//! session.start_practice("let cat = 1;", 4).unwrap();
//! session.type_text("cat");
//!
//! assert_eq!(session.cursor_offset(), 3);
//! assert_eq!(session.statistics().accuracy, 100);
//! ```

pub mod commands;
pub mod config;
pub mod editor;
pub mod equivalence;
pub mod error;
pub mod events;
pub mod math;
pub mod render;
pub mod session;
pub mod statistics;
pub mod statistics_tracker;

pub use config::Configuration;
pub use error::SessionError;
pub use events::SessionEvent;
pub use session::Session;
pub use statistics::{ErrorRecord, SessionSummary, TypingStats};
pub use statistics_tracker::StatsTracker;

/// Characters per word used by every words-per-minute calculation
pub const AVERAGE_WORD_LENGTH: usize = 5;

// Types for more general type-safety
type Minutes = f64;

/// The backspace control character, as delivered inside a burst of typed text
pub const BACKSPACE: char = '\u{8}';
