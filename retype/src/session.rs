//! # Session Module - The Practice State Machine
//!
//! A [`Session`] owns everything about one practice run: the frozen target text, the
//! accepted input, the pending error at the cursor, and the statistics tracker. It
//! talks to the hosting editor through the [`Editor`] trait and publishes
//! [`SessionEvent`]s to any number of subscribers.
//!
//! ## Session Lifecycle
//!
#![doc = simple_mermaid::mermaid!("../diagrams/session_lifecycle.mmd")]
//!
//! ## Keystroke Flow
//!
#![doc = simple_mermaid::mermaid!("../diagrams/keystroke_flow.mmd")]
//!
//! Every keystroke runs to completion (match check, ledger update, buffer update,
//! render) before the next one is accepted. All mutation goes through `&mut self`, so
//! a session shared between threads has to sit behind a single lock held for the
//! whole call.
//!
//! ## Usage Example
//!
//! ```rust
//! use retype::editor::{DiffState, Editor, EditorSettings, RenderError};
//! use retype::{Session, SessionEvent};
//!
//! struct NullEditor;
//!
//! impl Editor for NullEditor {
//!     fn editor_settings(&self) -> EditorSettings {
//!         EditorSettings::default()
//!     }
//!     fn render(&mut self, _diff: &DiffState) -> Result<(), RenderError> {
//!         Ok(())
//!     }
//!     fn clear(&mut self) -> Result<(), RenderError> {
//!         Ok(())
//!     }
//! }
//!
//! let mut session = Session::new(NullEditor);
//! let events = session.subscribe();
//!
//! session.start_practice("cat", 0).unwrap();
//! session.handle_character_input('c');
//! session.handle_character_input('x'); // wrong, the cursor stays put
//! assert_eq!(session.cursor_offset(), 1);
//!
//! session.handle_character_input('a');
//! session.handle_character_input('t');
//! assert!(session.is_completed());
//!
//! assert!(events
//!     .try_iter()
//!     .any(|event| matches!(event, SessionEvent::Completed(_))));
//! ```

use crossbeam_channel::Receiver;
use web_time::Instant;

use crate::config::Configuration;
use crate::editor::{DiffState, Editor};
use crate::equivalence;
use crate::error::SessionError;
use crate::events::{EventBus, SessionEvent};
use crate::statistics::{SessionSummary, TypingStats};
use crate::statistics_tracker::StatsTracker;
use crate::BACKSPACE;

/// The wrong character currently shown at the cursor
///
/// There is at most one, and it always sits at the current cursor offset. This is a
/// display aid, not a history: the historical error log lives in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingError {
    pub position: usize,
    pub typed: char,
}

/// State of an active practice run
#[derive(Debug)]
struct Practice {
    /// Document offset where the target text begins
    start_offset: usize,
    /// Frozen document suffix to retype
    target: Vec<char>,
    /// Accepted characters. Its length is the cursor offset.
    typed: Vec<char>,
    pending_error: Option<PendingError>,
    /// Set once the whole target has been typed, until reset or stop
    summary: Option<SessionSummary>,
    last_diff: DiffState,
}

impl Practice {
    fn new(start_offset: usize, target: Vec<char>) -> Self {
        let last_diff = DiffState::initial(start_offset, target.len());
        Self {
            start_offset,
            target,
            typed: Vec::new(),
            pending_error: None,
            summary: None,
            last_diff,
        }
    }

    const fn cursor(&self) -> usize {
        self.typed.len()
    }

    const fn is_fully_typed(&self) -> bool {
        self.typed.len() >= self.target.len()
    }

    fn restart(&mut self) {
        self.typed.clear();
        self.pending_error = None;
        self.summary = None;
        self.last_diff = DiffState::initial(self.start_offset, self.target.len());
    }

    fn refresh_diff(&mut self) {
        self.last_diff = DiffState::compute(
            self.start_offset,
            self.target.len(),
            self.cursor(),
            self.pending_error.is_some(),
        );
    }
}

/// A typing-practice session hosted by an [`Editor`]
///
/// The session starts out inactive. [`Session::start_practice`] freezes the text to
/// retype, after which keystrokes are fed through [`Session::handle_character_input`],
/// [`Session::handle_tab`], [`Session::handle_backspace`] or [`Session::type_text`].
///
/// The host is expected to call [`Session::poll`] from its event loop after each
/// callback, which drives the live statistics timer and deferred cursor corrections.
#[derive(Debug)]
pub struct Session<E: Editor> {
    editor: E,
    config: Configuration,
    tracker: StatsTracker,
    events: EventBus,
    practice: Option<Practice>,
    /// Document offset the editor cursor should be put back to on the next poll
    pending_cursor_restore: Option<usize>,
}

impl<E: Editor> Session<E> {
    /// Create an inactive session hosted by `editor`
    pub fn new(editor: E) -> Self {
        let config = Configuration::default();
        Self {
            editor,
            tracker: StatsTracker::with_interval(config.stats_interval()),
            config,
            events: EventBus::default(),
            practice: None,
            pending_cursor_restore: None,
        }
    }

    /// Configure the session with custom settings (builder pattern)
    pub fn with_configuration(mut self, config: Configuration) -> Self {
        self.tracker.set_interval(config.stats_interval());
        self.config = config;
        self
    }

    pub const fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub const fn editor(&self) -> &E {
        &self.editor
    }

    pub const fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    pub const fn tracker(&self) -> &StatsTracker {
        &self.tracker
    }

    /// Subscribe to session events. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Subscribe to live statistics snapshots only
    pub fn subscribe_stats(&mut self) -> Receiver<TypingStats> {
        self.tracker.subscribe()
    }

    pub const fn is_active(&self) -> bool {
        self.practice.is_some()
    }

    /// Returns true if the whole target has been typed and the session is waiting for
    /// a reset or stop
    pub fn is_completed(&self) -> bool {
        self.practice
            .as_ref()
            .is_some_and(|practice| practice.summary.is_some())
    }

    /// Number of accepted characters, 0 while inactive
    pub fn cursor_offset(&self) -> usize {
        self.practice.as_ref().map_or(0, Practice::cursor)
    }

    /// Document offset where the target text begins
    pub fn start_offset(&self) -> Option<usize> {
        self.practice.as_ref().map(|practice| practice.start_offset)
    }

    /// The frozen text being retyped, empty while inactive
    pub fn target_text(&self) -> &[char] {
        self.practice
            .as_ref()
            .map_or(&[], |practice| practice.target.as_slice())
    }

    /// The accepted characters, empty while inactive
    pub fn typed_text(&self) -> &[char] {
        self.practice
            .as_ref()
            .map_or(&[], |practice| practice.typed.as_slice())
    }

    /// The character that has to be typed next
    pub fn expected_character(&self) -> Option<char> {
        let practice = self.practice.as_ref()?;
        practice.target.get(practice.cursor()).copied()
    }

    pub fn pending_error(&self) -> Option<PendingError> {
        self.practice.as_ref()?.pending_error
    }

    /// The diff state most recently handed to the editor
    pub fn diff_state(&self) -> Option<&DiffState> {
        self.practice.as_ref().map(|practice| &practice.last_diff)
    }

    /// Live statistics of the current run
    pub fn statistics(&self) -> TypingStats {
        self.tracker.current_stats()
    }

    /// Enter practice mode
    ///
    /// The target text is the suffix of `document` starting at the character offset
    /// `cursor`. With [`Configuration::restart_near_end`] set, a cursor at or one
    /// character before the end of the document starts from the top instead.
    ///
    /// # Errors
    ///
    /// - [`SessionError::AlreadyActive`] if practice mode is already active
    /// - [`SessionError::StartOutOfRange`] if `cursor` lies beyond the document
    /// - [`SessionError::NothingToPractice`] if the resulting target text is empty
    pub fn start_practice(&mut self, document: &str, cursor: usize) -> Result<(), SessionError> {
        if self.is_active() {
            return Err(SessionError::AlreadyActive);
        }

        let characters: Vec<char> = document.chars().collect();
        let len = characters.len();
        if cursor > len {
            return Err(SessionError::StartOutOfRange { offset: cursor, len });
        }

        let start_offset = if self.config.restart_near_end && cursor + 1 >= len {
            0
        } else {
            cursor
        };

        let target = characters[start_offset..].to_vec();
        if target.is_empty() {
            return Err(SessionError::NothingToPractice {
                offset: start_offset,
            });
        }

        tracing::info!(
            target: "retype.session",
            start_offset,
            target_len = target.len(),
            "practice_started"
        );

        self.practice = Some(Practice::new(start_offset, target));
        self.pending_cursor_restore = None;

        self.tracker.reset();
        self.tracker.start_tracking();

        self.render();
        self.events
            .publish(&SessionEvent::ModeChanged { active: true });

        Ok(())
    }

    /// Leave practice mode
    ///
    /// Publishes [`SessionEvent::Stopped`] with the summary of the run and clears the
    /// editor highlighting. Returns `None`, and does nothing, if the session was not
    /// active.
    pub fn stop_practice(&mut self) -> Option<SessionSummary> {
        let practice = self.practice.take()?;

        let summary = practice
            .summary
            .unwrap_or_else(|| self.tracker.session_summary());
        self.tracker.stop_tracking();
        self.pending_cursor_restore = None;

        if let Err(error) = self.editor.clear() {
            tracing::error!(target: "retype.session", %error, "clear_failed");
        }

        tracing::info!(
            target: "retype.session",
            wpm = summary.wpm,
            accuracy = summary.accuracy,
            errors = summary.error_count,
            "practice_stopped"
        );

        self.events.publish(&SessionEvent::Stopped(summary));
        self.events
            .publish(&SessionEvent::ModeChanged { active: false });

        Some(summary)
    }

    /// Start the current run over with the same target text
    ///
    /// # Errors
    ///
    /// [`SessionError::NotActive`] if practice mode is not active. Nothing changes in
    /// that case.
    pub fn reset_session(&mut self) -> Result<(), SessionError> {
        let practice = self.practice.as_mut().ok_or(SessionError::NotActive)?;
        practice.restart();
        self.pending_cursor_restore = None;

        self.tracker.reset();
        self.tracker.start_tracking();

        tracing::debug!(target: "retype.session", "session_reset");
        self.render();

        Ok(())
    }

    /// Process one typed character
    ///
    /// The attempt is always recorded in the ledger first. On a match (see
    /// [`equivalence`]) the cursor advances; otherwise the character becomes the
    /// pending error at the cursor. Ignored while inactive or once the whole target
    /// has been typed.
    pub fn handle_character_input(&mut self, typed: char) {
        let Some(practice) = self.practice.as_mut() else {
            return;
        };
        if practice.summary.is_some() || practice.is_fully_typed() {
            return;
        }

        let position = practice.cursor();
        let expected = practice.target[position];

        self.tracker.record_character(expected, typed, position);

        if equivalence::is_match(typed, expected) {
            practice.typed.push(typed);
            practice.pending_error = None;
        } else {
            practice.pending_error = Some(PendingError { position, typed });
            tracing::debug!(
                target: "retype.session",
                position,
                expected = u32::from(expected),
                typed = u32::from(typed),
                "character_mismatch"
            );
        }

        let completed = practice.is_fully_typed();
        practice.refresh_diff();
        self.render();

        if completed {
            self.complete();
        }
    }

    /// Process a tab keystroke
    ///
    /// When the editor inserts spaces, the tab becomes `tab_width - cursor % tab_width`
    /// individual space keystrokes, each matched and recorded on its own. Otherwise a
    /// literal tab is typed.
    pub fn handle_tab(&mut self) {
        if !self.is_active() {
            return;
        }

        let settings = self.editor.editor_settings();
        if settings.insert_spaces {
            let tab_width = settings.tab_width.max(1);
            let spaces = tab_width - self.cursor_offset() % tab_width;
            for _ in 0..spaces {
                self.handle_character_input(' ');
            }
        } else {
            self.handle_character_input('\t');
        }
    }

    /// Step back one character
    ///
    /// Clears the pending error and undoes the last ledger entry. Ignored while
    /// inactive, at the start of the text, or once the whole target has been typed.
    pub fn handle_backspace(&mut self) {
        let Some(practice) = self.practice.as_mut() else {
            return;
        };
        if practice.summary.is_some() || practice.typed.pop().is_none() {
            return;
        }

        practice.pending_error = None;
        practice.refresh_diff();
        self.tracker.remove_last_character();

        tracing::debug!(
            target: "retype.session",
            position = practice.cursor(),
            "backspace"
        );

        self.render();
    }

    /// Feed a burst of typed text, one character at a time
    ///
    /// A backspace control character inside the burst steps back instead.
    pub fn type_text(&mut self, text: &str) {
        for character in text.chars() {
            if character == BACKSPACE {
                self.handle_backspace();
            } else {
                self.handle_character_input(character);
            }
        }
    }

    /// Report that the editor cursor is now at `document_offset`
    ///
    /// If that is not where practice expects it, a restore is scheduled for the next
    /// [`Session::poll`].
    pub fn cursor_moved(&mut self, document_offset: usize) {
        let Some(practice) = self.practice.as_ref() else {
            return;
        };

        let expected = practice.start_offset + practice.cursor();
        self.pending_cursor_restore = (document_offset != expected).then_some(expected);
    }

    /// Run deferred work: live statistics and cursor restores
    pub fn poll(&mut self) {
        self.poll_at(Instant::now());
    }

    pub fn poll_at(&mut self, now: Instant) {
        if let Some(stats) = self.tracker.tick(now) {
            self.events.publish(&SessionEvent::Stats(stats));
        }

        if let Some(offset) = self.pending_cursor_restore.take()
            && self.is_active()
        {
            self.events.publish(&SessionEvent::RestoreCursor { offset });
        }
    }

    /// Tear the session down
    ///
    /// Stops practice if needed, stops tracking and drops every subscriber. Safe to
    /// call any number of times.
    pub fn dispose(&mut self) {
        self.stop_practice();
        self.tracker.stop_tracking();
        self.tracker.clear_listeners();
        self.events.clear();
    }

    /// The whole target has been typed
    fn complete(&mut self) {
        let summary = self.tracker.session_summary();
        self.tracker.stop_tracking();

        if let Some(practice) = self.practice.as_mut() {
            practice.summary = Some(summary);
        }

        tracing::info!(
            target: "retype.session",
            wpm = summary.wpm,
            accuracy = summary.accuracy,
            duration = summary.duration_seconds,
            errors = summary.error_count,
            "practice_completed"
        );

        self.events.publish(&SessionEvent::Completed(summary));
    }

    /// Hand the last computed diff state to the editor, logging failures
    fn render(&mut self) {
        let Some(practice) = self.practice.as_ref() else {
            return;
        };

        if let Err(error) = self.editor.render(&practice.last_diff) {
            tracing::error!(target: "retype.session", %error, "render_failed");
        }
    }
}

impl<E: Editor> Drop for Session<E> {
    fn drop(&mut self) {
        self.dispose();
    }
}
