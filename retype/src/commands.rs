//! The user-facing command surface: start, stop and reset.
//!
//! Hosts bind these to keys or a command palette. Calls that make no sense in the
//! current state are answered with a warning instead of an error, with one
//! exception: starting while already active is rejected.

use std::fmt;

use crate::editor::Editor;
use crate::error::SessionError;
use crate::session::Session;

/// Prefix of every message shown to the user
pub const MESSAGE_PREFIX: &str = "ReType";

/// A practice command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Practice the rest of `document`, starting at character offset `cursor`
    StartPractice { document: &'a str, cursor: usize },
    StopPractice,
    ResetSession,
}

/// What the host should show after a command ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Info(String),
    Warning(String),
}

impl Report {
    fn info(message: impl Into<String>) -> Self {
        Self::Info(message.into())
    }

    fn warning(message: impl Into<String>) -> Self {
        Self::Warning(message.into())
    }

    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::Warning(_))
    }

    /// The bare message, without prefix
    pub fn text(&self) -> &str {
        match self {
            Self::Info(message) | Self::Warning(message) => message,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{MESSAGE_PREFIX}: {}", self.text())
    }
}

/// Run a command against a session
///
/// # Errors
///
/// Only [`Command::StartPractice`] can fail, see [`Session::start_practice`].
pub fn execute<E: Editor>(
    session: &mut Session<E>,
    command: Command<'_>,
) -> Result<Report, SessionError> {
    let report = match command {
        Command::StartPractice { document, cursor } => {
            session.start_practice(document, cursor)?;
            Report::info("Practice mode started! Start typing to begin.")
        }
        Command::StopPractice => match session.stop_practice() {
            Some(summary) => Report::info(format!("Practice mode stopped. {summary}")),
            None => Report::warning("Practice mode is not active"),
        },
        Command::ResetSession => match session.reset_session() {
            Ok(()) => Report::info("Session reset"),
            Err(SessionError::NotActive) => Report::warning("No active practice session to reset"),
            Err(error) => return Err(error),
        },
    };

    if report.is_warning() {
        tracing::warn!(target: "retype.commands", ?command, message = report.text(), "command_ignored");
    } else {
        tracing::debug!(target: "retype.commands", ?command, "command_executed");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{DiffState, EditorSettings, RenderError};

    struct NullEditor;

    impl Editor for NullEditor {
        fn editor_settings(&self) -> EditorSettings {
            EditorSettings::default()
        }

        fn render(&mut self, _diff: &DiffState) -> Result<(), RenderError> {
            Ok(())
        }

        fn clear(&mut self) -> Result<(), RenderError> {
            Ok(())
        }
    }

    #[test]
    fn test_start_practice() {
        let mut session = Session::new(NullEditor);
        let report = execute(
            &mut session,
            Command::StartPractice {
                document: "hello",
                cursor: 0,
            },
        )
        .unwrap();

        assert_eq!(
            report.to_string(),
            "ReType: Practice mode started! Start typing to begin."
        );
        assert!(session.is_active());

        let again = execute(
            &mut session,
            Command::StartPractice {
                document: "hello",
                cursor: 0,
            },
        );
        assert_eq!(again, Err(SessionError::AlreadyActive));
    }

    #[test]
    fn test_invalid_state_commands_warn() {
        let mut session = Session::new(NullEditor);

        let report = execute(&mut session, Command::StopPractice).unwrap();
        assert_eq!(report, Report::Warning("Practice mode is not active".into()));

        let report = execute(&mut session, Command::ResetSession).unwrap();
        assert_eq!(
            report,
            Report::Warning("No active practice session to reset".into())
        );
        assert!(!session.is_active());
    }

    #[test]
    fn test_reset_and_stop() {
        let mut session = Session::new(NullEditor);
        session.start_practice("hello", 0).unwrap();
        session.type_text("he");

        let report = execute(&mut session, Command::ResetSession).unwrap();
        assert_eq!(report, Report::Info("Session reset".into()));
        assert_eq!(session.cursor_offset(), 0);

        let report = execute(&mut session, Command::StopPractice).unwrap();
        assert!(!report.is_warning());
        assert!(report.text().starts_with("Practice mode stopped. WPM: "));
        assert!(!session.is_active());
    }
}
