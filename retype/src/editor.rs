//! The seam between the practice engine and the editor hosting it.
//!
//! The editor owns the document, the highlighting and the keystroke capture. The
//! engine only needs three things from it: its indentation settings, a way to show
//! a [`DiffState`], and a way to clear it again.

use thiserror::Error;

pub use crate::render::{DiffState, RangeKind};

/// Indentation settings of the editor
///
/// Read from the editor at the moment a tab is pressed, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSettings {
    /// Width of a tab stop in columns
    pub tab_width: usize,
    /// Whether a tab keystroke inserts spaces
    pub insert_spaces: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_width: 4,
            insert_spaces: true,
        }
    }
}

/// A failed render or clear call on the editor side
#[derive(Debug, Error)]
#[error("Failed to apply highlighting: {0}")]
pub struct RenderError(pub String);

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// An editor that can host a practice session
pub trait Editor {
    /// Current indentation settings
    fn editor_settings(&self) -> EditorSettings;

    /// Show the diff state of the practice area
    fn render(&mut self, diff: &DiffState) -> Result<(), RenderError>;

    /// Remove all practice highlighting
    fn clear(&mut self) -> Result<(), RenderError>;
}

impl<E: Editor + ?Sized> Editor for &mut E {
    fn editor_settings(&self) -> EditorSettings {
        (**self).editor_settings()
    }

    fn render(&mut self, diff: &DiffState) -> Result<(), RenderError> {
        (**self).render(diff)
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        (**self).clear()
    }
}
