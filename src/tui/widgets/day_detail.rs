//! Panel describing the selected day

use std::fmt;

use chrono::{Local, TimeZone};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::services::Aggregator;
use crate::tui::theme::Theme;
use crate::types::{DayKey, Entry, EntryTime};

/// Times shown before collapsing into "+N more"
const MAX_TIMES: usize = 12;

/// Selected date, its completion count and when each completion happened
pub struct DayDetail {
    key: DayKey,
    count: u32,
    times: Vec<String>,
    theme: Theme,
}

impl DayDetail {
    pub fn new(key: DayKey, count: u32, times: Vec<String>, theme: Theme) -> Self {
        Self {
            key,
            count,
            times,
            theme,
        }
    }

    /// Collect the times of `entries` falling on `key` in `tz`, sorted
    pub fn from_entries<Tz: TimeZone>(
        key: DayKey,
        count: u32,
        entries: &[Entry],
        tz: &Tz,
        theme: Theme,
    ) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        let mut times: Vec<String> = Aggregator::entries_on(entries, key, tz)
            .into_iter()
            .filter_map(|e| e.completed_at.as_ref())
            .map(|t| time_label(t, tz))
            .collect();
        times.sort();
        Self::new(key, count, times, theme)
    }

    /// Same as [`Self::from_entries`] in the system time zone
    pub fn from_entries_local(key: DayKey, count: u32, entries: &[Entry], theme: Theme) -> Self {
        Self::from_entries(key, count, entries, &Local, theme)
    }

    /// Rows needed including borders
    pub fn height(&self) -> u16 {
        // border + summary + times + border
        if self.times.is_empty() {
            3
        } else {
            4
        }
    }

    fn summary(&self) -> Line<'static> {
        let weekday = self.key.date().format("%A").to_string();
        let noun = if self.count == 1 { "completion" } else { "completions" };
        Line::from(vec![
            Span::styled(
                format!("{} ", self.key),
                Style::default()
                    .fg(self.theme.date())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("({}) ", weekday),
                Style::default().fg(self.theme.muted()),
            ),
            Span::styled(
                format!("{} {}", self.count, noun),
                Style::default().fg(self.theme.text()),
            ),
        ])
    }

    fn times_line(&self) -> Option<Line<'static>> {
        if self.times.is_empty() {
            return None;
        }
        let mut text = self
            .times
            .iter()
            .take(MAX_TIMES)
            .cloned()
            .collect::<Vec<_>>()
            .join("  ");
        if self.times.len() > MAX_TIMES {
            text.push_str(&format!("  +{} more", self.times.len() - MAX_TIMES));
        }
        Some(Line::styled(text, Style::default().fg(self.theme.muted())))
    }
}

impl Widget for DayDetail {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.muted()))
            .title(" Selected ");

        let mut lines = vec![self.summary()];
        lines.extend(self.times_line());

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}

/// Clock time of a completion in `tz`; date-only entries have no time
fn time_label<Tz: TimeZone>(time: &EntryTime, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    match time {
        EntryTime::Instant(dt) => dt.with_timezone(tz).format("%H:%M").to_string(),
        EntryTime::Floating(dt) => dt.format("%H:%M").to_string(),
        EntryTime::Day(_) => "all day".to_string(),
    }
}
