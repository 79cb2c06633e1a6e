//! Help popup widget - displays keyboard shortcuts

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

const POPUP_WIDTH: u16 = 44;
const POPUP_HEIGHT: u16 = 18;

/// Width of the key column
const KEY_COLUMN: usize = 18;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Grid",
        &[
            ("←/→ or h/l", "Previous/next week"),
            ("↑/↓ or k/j", "Previous/next day"),
            ("Enter / Space", "Select day"),
            ("[ / ] or p/n", "Previous/next year"),
        ],
    ),
    (
        "General",
        &[
            ("Esc", "Clear selection / quit"),
            ("q / Ctrl+C", "Quit"),
            ("?", "Toggle help"),
        ],
    ),
];

/// Help popup widget showing keyboard shortcuts
pub struct HelpPopup {
    theme: Theme,
}

impl HelpPopup {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Calculate centered popup area
    pub fn centered_area(area: Rect) -> Rect {
        let x = area.x + (area.width.saturating_sub(POPUP_WIDTH)) / 2;
        let y = area.y + (area.height.saturating_sub(POPUP_HEIGHT)) / 2;
        Rect {
            x,
            y,
            width: POPUP_WIDTH.min(area.width),
            height: POPUP_HEIGHT.min(area.height),
        }
    }

    fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let header = Style::default()
            .fg(self.theme.date())
            .add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(self.theme.muted());

        let mut lines = vec![Line::default()];
        for (title, bindings) in SECTIONS {
            lines.push(Line::styled(*title, header));
            lines.push(Line::styled("─".repeat(width as usize), muted));
            lines.extend(bindings.iter().map(|(key, desc)| keybinding(key, desc, self.theme)));
            lines.push(Line::default());
        }
        lines.push(Line::styled("Press ? to close", muted).centered());
        lines
    }
}

impl Default for HelpPopup {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl Widget for HelpPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .title(format!(" contribgrid v{} ", VERSION))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));

        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.lines(inner.width)).render(inner, buf);
    }
}

/// A single keybinding line
fn keybinding(key: &str, desc: &str, theme: Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {:<width$}", key, width = KEY_COLUMN),
            Style::default().fg(theme.accent()),
        ),
        Span::styled(desc.to_string(), Style::default().fg(theme.text())),
    ])
}
