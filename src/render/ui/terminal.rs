//! Terminal UI implementation using ratatui
//!
//! Concrete implementation of `UIRenderer`. It only draws what the view state describes;
//! screen content comes from `screens` and session data from the latest snapshot.

use crate::error::Result;
use crate::render::ui::screens::{dialog_content, screen_content};
use crate::render::ui::{ColorTheme, Dialog, UIRenderer, ViewState};
use ratatui::crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{self, Stdout};

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Width of dialogs as a percentage of the terminal width
const DIALOG_WIDTH_PERCENT: u16 = 60;
const DIALOG_HEIGHT: u16 = 7;

/// Terminal UI implementation with ratatui backend
pub struct TerminalUI {
    terminal: Option<CrosstermTerminal>,
    theme: ColorTheme,
}

impl TerminalUI {
    pub fn new() -> Result<Self> {
        Ok(Self {
            terminal: None,
            theme: ColorTheme::default(),
        })
    }

    pub fn with_theme(theme: ColorTheme) -> Result<Self> {
        Ok(Self {
            terminal: None,
            theme,
        })
    }

    fn render_screen(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
        let content = screen_content(view_state);

        let mut lines = vec![Line::styled(content.title, theme.title), Line::raw("")];
        for (idx, text) in content.body.into_iter().enumerate() {
            let style = if content.progress_line == Some(idx) {
                theme.progress
            } else {
                theme.text()
            };
            lines.push(Line::styled(text, style));
        }
        lines.push(Line::raw(""));
        lines.push(Line::styled(content.hint, theme.hint));

        // Vertically center the content block
        let height = lines.len() as u16;
        let top = area.height.saturating_sub(height) / 2;
        let body_area = Rect {
            y: area.y + top,
            height: height.min(area.height),
            ..area
        };

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, body_area);
    }

    fn render_dialog(frame: &mut Frame, area: Rect, dialog: &Dialog, theme: &ColorTheme) {
        let (title, body, hint) = dialog_content(dialog);
        let border_color = match dialog {
            Dialog::Error { .. } => theme.error_text,
            Dialog::Info { .. } => theme.dialog_border,
        };

        let dialog_area = centered_rect(area, DIALOG_WIDTH_PERCENT, DIALOG_HEIGHT);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(title);
        let paragraph = Paragraph::new(vec![
            Line::styled(body, theme.text()),
            Line::raw(""),
            Line::styled(hint, theme.hint),
        ])
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

        frame.render_widget(Clear, dialog_area);
        frame.render_widget(paragraph, dialog_area);
    }

    fn render_status(frame: &mut Frame, area: Rect, view_state: &ViewState, theme: &ColorTheme) {
        let status_style = Style::default().bg(theme.status_bg).fg(theme.status_fg);
        let status = Paragraph::new(view_state.format_status_line()).style(status_style);
        frame.render_widget(status, area);
    }
}

/// Rectangle of `percent_x` width and fixed `height`, centered in `area`.
fn centered_rect(area: Rect, percent_x: u16, height: u16) -> Rect {
    let width = area.width.saturating_mul(percent_x) / 100;
    let height = height.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

impl UIRenderer for TerminalUI {
    fn render(&mut self, view_state: &ViewState) -> Result<()> {
        if let Some(ref mut terminal) = self.terminal {
            // Extract theme before closure to avoid borrowing issues
            let theme = &self.theme;

            terminal.draw(move |frame| {
                let size = frame.size();

                // Split screen: content area and status line
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(1)])
                    .split(size);

                Self::render_screen(frame, chunks[0], view_state, theme);
                if let Some(dialog) = &view_state.dialog {
                    Self::render_dialog(frame, chunks[0], dialog, theme);
                }
                Self::render_status(frame, chunks[1], view_state, theme);
            })?;
        }
        Ok(())
    }

    fn initialize(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        self.terminal = Some(terminal);

        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.terminal.is_some() {
            disable_raw_mode()?;
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.terminal = None;
        }
        Ok(())
    }

    fn get_terminal_size(&self) -> Result<(u16, u16)> {
        let (cols, rows) = ratatui::crossterm::terminal::size()?;
        Ok((cols, rows))
    }
}

impl Drop for TerminalUI {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_terminal_ui_creation() {
        let ui = TerminalUI::new().unwrap();
        assert!(ui.terminal.is_none());
        assert_eq!(ui.theme.status_bg, Color::Blue);

        let ui_with_theme = TerminalUI::with_theme(ColorTheme::monochrome()).unwrap();
        assert_eq!(ui_with_theme.theme.status_bg, Color::Black);
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 41);
        let rect = centered_rect(area, 60, 7);
        assert_eq!(rect, Rect::new(20, 17, 60, 7));

        // Dialog never exceeds a tiny terminal
        let tiny = centered_rect(Rect::new(0, 0, 10, 3), 60, 7);
        assert_eq!(tiny.height, 3);
        assert_eq!(tiny.y, 0);
    }

    #[test]
    fn test_render_without_terminal_is_noop() {
        use crate::rental::SessionSnapshot;

        let mut ui = TerminalUI::new().unwrap();
        let view_state = ViewState::new(SessionSnapshot::default(), 80, 24);
        assert!(ui.render(&view_state).is_ok());
        assert!(ui.cleanup().is_ok());
    }
}
