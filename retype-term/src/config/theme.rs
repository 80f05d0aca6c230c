use ratatui::style::{Color, Modifier, Style};
use retype::editor::RangeKind;
use serde::{Deserialize, Serialize};

/// General theme
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Theme {
    pub text: TextTheme,
    pub cursor: CursorTheme,
    pub status: StatusTheme,
}

impl Theme {
    /// The style of a character inside the practice area
    pub fn style_for(&self, kind: RangeKind) -> Style {
        match kind {
            RangeKind::Untyped => Style::new()
                .fg(self.text.untyped)
                .add_modifier(Modifier::DIM),
            RangeKind::Correct => Style::new().fg(self.text.correct),
            RangeKind::Incorrect => Style::new()
                .fg(self.cursor.text)
                .bg(self.text.incorrect)
                .add_modifier(Modifier::BOLD),
            RangeKind::Current => Style::new()
                .fg(self.cursor.text)
                .bg(self.cursor.color)
                .add_modifier(Modifier::BOLD),
        }
    }
}

/// Text color theme
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct TextTheme {
    pub untyped: Color,
    pub correct: Color,
    pub incorrect: Color,
}

impl Default for TextTheme {
    fn default() -> Self {
        Self {
            untyped: Color::Gray,
            correct: Color::Green,
            incorrect: Color::Red,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct CursorTheme {
    pub color: Color,
    pub text: Color,
}

impl Default for CursorTheme {
    fn default() -> Self {
        Self {
            color: Color::White,
            text: Color::Black,
        }
    }
}

/// Status bar and notice colors
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusTheme {
    pub stats: Color,
    pub info: Color,
    pub warning: Color,
}

impl Default for StatusTheme {
    fn default() -> Self {
        Self {
            stats: Color::Yellow,
            info: Color::Blue,
            warning: Color::Red,
        }
    }
}
