use retype::editor::{DiffState, Editor, EditorSettings, RenderError};
use retype::session::PendingError;
use retype::{Session, SessionError, SessionEvent};

/// Editor double that keeps every diff it was asked to show
#[derive(Debug, Default)]
struct RecordingEditor {
    settings: EditorSettings,
    renders: Vec<DiffState>,
    clears: usize,
}

impl Editor for RecordingEditor {
    fn editor_settings(&self) -> EditorSettings {
        self.settings
    }

    fn render(&mut self, diff: &DiffState) -> Result<(), RenderError> {
        self.renders.push(diff.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        self.clears += 1;
        Ok(())
    }
}

/// Editor whose highlighting is always gone
struct BrokenEditor;

impl Editor for BrokenEditor {
    fn editor_settings(&self) -> EditorSettings {
        EditorSettings::default()
    }

    fn render(&mut self, _diff: &DiffState) -> Result<(), RenderError> {
        Err(RenderError::new("editor closed"))
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        Err(RenderError::new("editor closed"))
    }
}

fn practice(target: &str) -> Session<RecordingEditor> {
    let mut session = Session::new(RecordingEditor::default());
    session.start_practice(target, 0).unwrap();
    session
}

#[test]
fn typing_the_whole_target_completes() {
    let mut session = practice("cat");
    let events = session.subscribe();

    session.type_text("cat");

    assert_eq!(session.cursor_offset(), 3);
    assert!(session.is_completed());

    let summary = events
        .try_iter()
        .find_map(|event| match event {
            SessionEvent::Completed(summary) => Some(summary),
            _ => None,
        })
        .expect("completion was published");
    assert_eq!(summary.accuracy, 100);
    assert_eq!(summary.total_characters, 3);
    assert_eq!(summary.error_count, 0);

    let last = session.editor().renders.last().unwrap();
    assert_eq!(last.correct, vec![0..3]);
    assert_eq!(last.current, None);
}

#[test]
fn mismatch_keeps_the_cursor_in_place() {
    let mut session = practice("cat");
    session.type_text("cx");

    assert_eq!(session.cursor_offset(), 1);
    assert_eq!(
        session.pending_error(),
        Some(PendingError {
            position: 1,
            typed: 'x'
        })
    );

    let stats = session.statistics();
    assert_eq!(stats.total_characters, 2);
    assert_eq!(stats.correct_characters, 1);

    let last = session.editor().renders.last().unwrap();
    assert_eq!(last.incorrect, vec![1..2]);
}

#[test]
fn backspace_after_mismatch_steps_back() {
    let mut session = practice("cat");
    session.type_text("cx");
    session.handle_backspace();

    assert_eq!(session.cursor_offset(), 0);
    assert!(session.typed_text().is_empty());
    assert_eq!(session.pending_error(), None);

    let stats = session.statistics();
    assert_eq!(stats.total_characters, 1);
    assert_eq!(stats.error_count, 0);
}

#[test]
fn tab_expansion_can_overshoot_the_whitespace_run() {
    // Two spaces in the target, but a four wide tab stop
    let mut session = practice("  x");
    session.handle_tab();

    // Two spaces matched, then the third synthetic space hit the `x`
    assert_eq!(session.cursor_offset(), 2);
    assert_eq!(
        session.pending_error(),
        Some(PendingError {
            position: 2,
            typed: ' '
        })
    );

    let stats = session.statistics();
    assert_eq!(stats.total_characters, 4);
    assert_eq!(stats.correct_characters, 2);
    assert_eq!(stats.error_count, 2);
}

#[test]
fn tab_expansion_against_a_literal_tab() {
    let mut session = practice("a\tb");
    session.handle_character_input('a');
    session.handle_tab();

    // 4 - 1 % 4 = 3 spaces: the first stands in for the tab, the other two hit `b`
    assert_eq!(session.cursor_offset(), 2);
    assert_eq!(session.typed_text(), &['a', ' ']);
    assert_eq!(
        session.pending_error(),
        Some(PendingError {
            position: 2,
            typed: ' '
        })
    );
    assert!(!session.is_completed());

    // Only `a` is an exact match
    let stats = session.statistics();
    assert_eq!(stats.total_characters, 4);
    assert_eq!(stats.correct_characters, 1);
    assert_eq!(stats.error_count, 3);
}

#[test]
fn curly_quote_advances_but_counts_as_incorrect() {
    let mut session = practice("\u{2019}s");
    session.handle_character_input('\'');

    assert_eq!(session.cursor_offset(), 1);
    assert_eq!(session.pending_error(), None);

    let stats = session.statistics();
    assert_eq!(stats.total_characters, 1);
    assert_eq!(stats.correct_characters, 0);
    assert_eq!(stats.error_count, 1);
    assert_eq!(stats.accuracy, 0);
}

#[test]
fn exempt_symbols_accept_anything() {
    let mut session = practice("a\u{2192}b\u{1F600}");
    session.type_text("a-b?");
    assert!(session.is_completed());
}

#[test]
fn practice_starts_at_the_cursor() {
    let mut session = Session::new(RecordingEditor::default());
    session.start_practice("fn main() {}", 3).unwrap();

    assert_eq!(session.start_offset(), Some(3));
    assert_eq!(session.expected_character(), Some('m'));
    assert_eq!(session.editor().renders, vec![DiffState::initial(3, 9)]);

    session.type_text("ma");
    let last = session.editor().renders.last().unwrap();
    assert_eq!(last.correct, vec![3..5]);
    assert_eq!(last.current, Some(5..6));
    assert_eq!(last.untyped, vec![6..12]);
}

#[test]
fn start_while_active_is_rejected_without_side_effects() {
    let mut session = practice("abc");
    session.type_text("a");

    assert_eq!(
        session.start_practice("other", 0),
        Err(SessionError::AlreadyActive)
    );
    assert_eq!(session.cursor_offset(), 1);
    assert_eq!(session.statistics().total_characters, 1);
}

#[test]
fn reset_is_idempotent() {
    let mut session = practice("abc");
    session.type_text("ax");

    session.reset_session().unwrap();
    let once = (
        session.cursor_offset(),
        session.target_text().to_vec(),
        session.diff_state().cloned(),
        session.statistics().total_characters,
    );

    session.reset_session().unwrap();
    let twice = (
        session.cursor_offset(),
        session.target_text().to_vec(),
        session.diff_state().cloned(),
        session.statistics().total_characters,
    );

    assert_eq!(once, twice);
    assert_eq!(once.0, 0);
}

#[test]
fn completion_is_reported_once() {
    let mut session = practice("ab");
    let events = session.subscribe();

    session.type_text("ab");
    session.type_text("zz");
    session.handle_tab();
    session.poll();

    let completions = events
        .try_iter()
        .filter(|event| matches!(event, SessionEvent::Completed(_)))
        .count();
    assert_eq!(completions, 1);
}

#[test]
fn lifecycle_events_are_published_in_order() {
    let mut session = Session::new(RecordingEditor::default());
    let events = session.subscribe();

    session.start_practice("ab", 0).unwrap();
    session.type_text("ab");
    let summary = session.stop_practice().unwrap();

    let received: Vec<SessionEvent> = events.try_iter().collect();
    assert_eq!(
        received,
        vec![
            SessionEvent::ModeChanged { active: true },
            SessionEvent::Completed(summary),
            SessionEvent::Stopped(summary),
            SessionEvent::ModeChanged { active: false },
        ]
    );
    assert_eq!(session.editor().clears, 1);
}

#[test]
fn render_failures_do_not_interrupt_practice() {
    let mut session = Session::new(BrokenEditor);
    session.start_practice("abc", 0).unwrap();
    session.type_text("abc");

    assert!(session.is_completed());
    assert!(session.stop_practice().is_some());
}

#[test]
fn cursor_moves_are_snapped_back_on_poll() {
    let mut session = practice("hello");
    let events = session.subscribe();
    session.type_text("he");

    session.cursor_moved(0);
    session.poll();

    assert!(
        events
            .try_iter()
            .any(|event| event == SessionEvent::RestoreCursor { offset: 2 })
    );
}

#[test]
fn invariants_hold_through_mixed_input() {
    let mut session = practice("if x {\n\treturn;\n}");
    session.editor_mut().settings.insert_spaces = false;

    for burst in ["if", "y", "\u{8}", "f x {", "\n", "\t", "ret", "q", "urn;\n}"] {
        if burst == "\t" {
            session.handle_tab();
        } else {
            session.type_text(burst);
        }

        assert_eq!(session.typed_text().len(), session.cursor_offset());
        assert!(session.cursor_offset() <= session.target_text().len());
        if let Some(error) = session.pending_error() {
            assert_eq!(error.position, session.cursor_offset());
        }
    }

    assert!(session.is_completed());
}

#[test]
fn dispose_tears_everything_down() {
    let mut session = practice("hello");
    let events = session.subscribe();
    let stats = session.subscribe_stats();

    session.dispose();
    session.dispose();

    assert!(!session.is_active());
    assert_eq!(session.editor().clears, 1);
    assert_eq!(events.iter().count(), 2);
    assert!(stats.recv().is_err());
}
