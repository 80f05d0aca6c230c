use std::io::stdout;
use std::time::Duration;

use crossbeam_channel::Receiver;
use crossterm::cursor::SetCursorStyle;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span, ToLine},
    widgets::{Clear, Padding, Paragraph},
};
use retype::commands::{self, Command, Report};
use retype::{Session, SessionEvent, SessionSummary, TypingStats};

use crate::config::Settings;
use crate::document::{Direction, Document};
use crate::utils::{KeyEventHelper, ROUNDED_BLOCK, center};

/// An app message
enum Message {
    /// Run a practice command
    Command(CommandKind),
    /// Quit the application
    Quit,
}

/// Owned stand-in for [`Command`], which borrows the document text
#[derive(Debug, Clone, Copy)]
enum CommandKind {
    Start,
    Stop,
    Reset,
}

/// The app itself
pub struct App {
    session: Session<Document>,
    settings: Settings,
    events: Receiver<SessionEvent>,
    stats: Receiver<TypingStats>,
    /// Latest live statistics
    live: Option<TypingStats>,
    /// Summary shown in the popup after the whole text was typed
    summary: Option<SessionSummary>,
    /// Last command report
    notice: Option<Report>,
    /// First visible line
    scroll: usize,
}

impl App {
    /// Creates a new `App`
    pub fn new(document: Document, settings: Settings) -> Self {
        let mut session = Session::new(document).with_configuration(settings.engine_configuration());
        let events = session.subscribe();
        let stats = session.subscribe_stats();

        Self {
            session,
            settings,
            events,
            stats,
            live: None,
            summary: None,
            notice: None,
            scroll: 0,
        }
    }

    /// Enter practice mode right away, at `offset`
    pub fn start_at(&mut self, offset: usize) {
        self.session.editor_mut().set_cursor(offset);
        self.execute(CommandKind::Start);
    }

    /// Runs the app
    pub fn run(&mut self) -> std::io::Result<()> {
        let mut terminal = ratatui::init();

        execute!(stdout(), SetCursorStyle::SteadyBlock)?;

        loop {
            let event = event::poll(Duration::from_millis(50))?
                .then(event::read)
                .transpose()?;

            if let Some(message) = event.and_then(|event| self.handle_events(&event)) {
                match message {
                    Message::Command(kind) => self.execute(kind),
                    Message::Quit => break,
                }
            }

            self.session.poll();
            self.drain_events();

            terminal.draw(|frame| self.draw(frame))?;
        }

        self.session.dispose();
        ratatui::restore();

        tracing::info!(target: "retype.term", "shutdown");

        Ok(())
    }

    fn execute(&mut self, kind: CommandKind) {
        let document = self.session.editor().text();
        let command = match kind {
            CommandKind::Start => Command::StartPractice {
                document: &document,
                cursor: self.session.editor().cursor(),
            },
            CommandKind::Stop => Command::StopPractice,
            CommandKind::Reset => Command::ResetSession,
        };

        self.notice = Some(match commands::execute(&mut self.session, command) {
            Ok(report) => report,
            Err(error) => Report::Warning(error.to_string()),
        });

        self.summary = None;
        self.sync_cursor();
    }

    /// Apply everything the session published since the last cycle
    fn drain_events(&mut self) {
        if let Some(stats) = self.stats.try_iter().last() {
            self.live = Some(stats);
        }

        for event in self.events.try_iter() {
            match event {
                SessionEvent::ModeChanged { active } => {
                    tracing::debug!(target: "retype.term", active, "mode_changed");
                    self.live = active.then(|| self.session.statistics());
                }
                SessionEvent::Completed(summary) => self.summary = Some(summary),
                SessionEvent::Stopped(_) => self.summary = None,
                SessionEvent::RestoreCursor { offset } => {
                    self.session.editor_mut().set_cursor(offset);
                }
                SessionEvent::Stats(_) => (),
            }
        }
    }

    /// Put the document cursor where practice expects it
    fn sync_cursor(&mut self) {
        if let Some(start) = self.session.start_offset() {
            let offset = start + self.session.cursor_offset();
            self.session.editor_mut().set_cursor(offset);
        }
    }

    /// Global event handler
    fn handle_events(&mut self, event: &Event) -> Option<Message> {
        let Event::Key(key) = event else {
            return None;
        };
        if !key.is_press() {
            return None;
        }

        if key.is_ctrl_press_char('q') {
            return Some(Message::Quit);
        }

        if self.summary.is_some() {
            return Self::handle_summary_key(key);
        }

        if self.session.is_active() {
            self.handle_practice_key(key)
        } else {
            self.handle_browse_key(key)
        }
    }

    const fn handle_summary_key(key: &KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Char('n') => Some(Message::Command(CommandKind::Reset)),
            KeyCode::Char('s') | KeyCode::Esc => Some(Message::Command(CommandKind::Stop)),
            _ => None,
        }
    }

    fn handle_browse_key(&mut self, key: &KeyEvent) -> Option<Message> {
        if key.is_ctrl_press_char('p') {
            return Some(Message::Command(CommandKind::Start));
        }

        if let Some(direction) = direction(key.code) {
            self.session.editor_mut().move_cursor(direction);
        }

        None
    }

    fn handle_practice_key(&mut self, key: &KeyEvent) -> Option<Message> {
        if key.is_ctrl_press_char('r') {
            return Some(Message::Command(CommandKind::Reset));
        }

        if let Some(direction) = direction(key.code) {
            // Out of band move, the session snaps it back on the next poll
            let editor = self.session.editor_mut();
            editor.move_cursor(direction);
            let offset = editor.cursor();
            self.session.cursor_moved(offset);
            return None;
        }

        match key.code {
            KeyCode::Esc => return Some(Message::Command(CommandKind::Stop)),
            KeyCode::Tab => self.session.handle_tab(),
            KeyCode::Backspace => self.session.handle_backspace(),
            KeyCode::Enter => self.session.handle_character_input('\n'),
            KeyCode::Char(character) if !key.has_mods(KeyModifiers::CONTROL) => {
                self.session.handle_character_input(character);
            }
            _ => return None,
        }

        self.sync_cursor();
        None
    }
}

const fn direction(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        _ => None,
    }
}

// Rendering logic
impl App {
    /// Draws the next frame
    fn draw(&mut self, frame: &mut Frame) {
        let hint = if self.session.is_active() {
            "<ESC> stop | <CTRL-R> reset | <CTRL-Q> exit"
        } else {
            "<CTRL-P> practice from cursor | <CTRL-Q> exit"
        };

        let block = ROUNDED_BLOCK
            .padding(Padding::new(1, 1, 0, 0))
            .title_top("RETYPE".to_line().bold().centered())
            .title_top(hint.to_line().right_aligned());

        let area = frame.area();
        let content = block.inner(area);
        frame.render_widget(block, area);

        let [text_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(content);

        self.render_document(frame, text_area);
        self.render_status(frame, status_area);

        if let Some(summary) = self.summary {
            self.render_summary(frame, area, summary);
        }
    }

    fn render_document(&mut self, frame: &mut Frame, area: Rect) {
        let document = self.session.editor();
        let lines = document.lines(&self.settings.theme);
        let (column, line) = document.cursor_position();

        let height = usize::from(area.height.max(1));
        if line < self.scroll {
            self.scroll = line;
        } else if line >= self.scroll + height {
            self.scroll = line + 1 - height;
        }

        let scroll = u16::try_from(self.scroll).unwrap_or(u16::MAX);
        frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), area);

        if self.summary.is_none() {
            let x = u16::try_from(column).unwrap_or(u16::MAX);
            let y = u16::try_from(line - self.scroll).unwrap_or(u16::MAX);
            if x < area.width && y < area.height {
                frame.set_cursor_position((area.x + x, area.y + y));
            }
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.settings.theme.status;

        let mut spans = Vec::new();
        if let Some(stats) = self.live.filter(|_| self.session.is_active()) {
            spans.push(Span::styled(stats.status_line(), Style::new().fg(theme.stats)));
            spans.push(Span::raw("  "));
        }
        if let Some(notice) = &self.notice {
            let color = if notice.is_warning() {
                theme.warning
            } else {
                theme.info
            };
            spans.push(Span::styled(notice.to_string(), Style::new().fg(color)));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect, summary: SessionSummary) {
        let popup = center(area, Constraint::Percentage(60), Constraint::Length(7));
        let block = ROUNDED_BLOCK
            .padding(Padding::new(1, 1, 1, 0))
            .title_top("PRACTICE COMPLETE".to_line().bold().centered());

        let text = vec![
            Line::raw(summary.to_string()).centered(),
            Line::raw(""),
            Line::from(vec![
                Span::styled("<n>", Style::new().bold().fg(self.settings.theme.status.info)),
                Span::raw(" new session   "),
                Span::styled("<s>", Style::new().bold().fg(self.settings.theme.status.info)),
                Span::raw(" stop"),
            ])
            .centered(),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(text).block(block), popup);
    }
}
