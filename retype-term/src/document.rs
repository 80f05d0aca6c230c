use ratatui::{
    style::Style,
    text::{Line, Span},
};
use retype::editor::{DiffState, Editor, EditorSettings, RangeKind, RenderError};

use crate::config::theme::Theme;

/// Directions the cursor can be moved in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// The file being practiced, as the terminal shows it
///
/// This is the editor side of a practice session: it owns the text, the cursor and
/// the highlighting handed over by the session.
#[derive(Debug)]
pub struct Document {
    text: Vec<char>,
    /// Offset of the first character of every line
    line_starts: Vec<usize>,
    cursor: usize,
    settings: EditorSettings,
    diff: Option<DiffState>,
}

impl Document {
    pub fn new(text: &str, settings: EditorSettings) -> Self {
        let text: Vec<char> = text.chars().collect();
        let line_starts = std::iter::once(0)
            .chain(
                text.iter()
                    .enumerate()
                    .filter(|(_, char)| **char == '\n')
                    .map(|(index, _)| index + 1),
            )
            .collect();

        Self {
            text,
            line_starts,
            cursor: 0,
            settings,
            diff: None,
        }
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    #[cfg(test)]
    const fn len(&self) -> usize {
        self.text.len()
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.text.len());
    }

    #[cfg(test)]
    const fn diff(&self) -> Option<&DiffState> {
        self.diff.as_ref()
    }

    /// Line and column of a character offset
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let line = self
            .line_starts
            .partition_point(|start| *start <= offset)
            .saturating_sub(1);
        (line, offset - self.line_starts[line])
    }

    /// Number of characters on a line, without its newline
    fn line_len(&self, line: usize) -> usize {
        let start = self.line_starts[line];
        let end = self
            .line_starts
            .get(line + 1)
            .map_or(self.text.len(), |next| next - 1);
        end - start
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        let (line, column) = self.position(self.cursor);
        self.cursor = match direction {
            Direction::Left => self.cursor.saturating_sub(1),
            Direction::Right => (self.cursor + 1).min(self.text.len()),
            Direction::Up if line > 0 => self.line_starts[line - 1] + column.min(self.line_len(line - 1)),
            Direction::Down if line + 1 < self.line_starts.len() => {
                self.line_starts[line + 1] + column.min(self.line_len(line + 1))
            }
            Direction::Up | Direction::Down => self.cursor,
        };
    }

    fn tab_width(&self) -> usize {
        self.settings.tab_width.max(1)
    }

    /// Screen column of a character offset, with tabs expanded
    fn display_column(&self, offset: usize) -> usize {
        let (line, _) = self.position(offset);
        self.text[self.line_starts[line]..offset]
            .iter()
            .fold(0, |column, char| match char {
                '\t' => column + self.tab_width() - column % self.tab_width(),
                _ => column + 1,
            })
    }

    /// Screen position of the cursor as (column, line)
    pub fn cursor_position(&self) -> (usize, usize) {
        let (line, _) = self.position(self.cursor);
        (self.display_column(self.cursor), line)
    }

    fn style_at(&self, offset: usize, theme: &Theme) -> Style {
        self.diff
            .as_ref()
            .and_then(|diff| diff.classify(offset))
            .map_or_else(Style::new, |kind| theme.style_for(kind))
    }

    /// Styled lines of the whole document
    pub fn lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(self.line_starts.len());
        let mut spans = Vec::new();
        let mut column = 0;

        for (offset, char) in self.text.iter().enumerate() {
            let style = self.style_at(offset, theme);
            match char {
                '\n' => {
                    // A newline only takes up room while it is being typed
                    let kind = self.diff.as_ref().and_then(|diff| diff.classify(offset));
                    if matches!(kind, Some(RangeKind::Current | RangeKind::Incorrect)) {
                        spans.push(Span::styled(" ", style));
                    }
                    lines.push(Line::from(std::mem::take(&mut spans)));
                    column = 0;
                }
                '\t' => {
                    let width = self.tab_width() - column % self.tab_width();
                    spans.push(Span::styled(" ".repeat(width), style));
                    column += width;
                }
                char => {
                    spans.push(Span::styled(char.to_string(), style));
                    column += 1;
                }
            }
        }
        lines.push(Line::from(spans));

        lines
    }
}

impl Editor for Document {
    fn editor_settings(&self) -> EditorSettings {
        self.settings
    }

    fn render(&mut self, diff: &DiffState) -> Result<(), RenderError> {
        self.diff = Some(diff.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        self.diff = None;
        Ok(())
    }
}
