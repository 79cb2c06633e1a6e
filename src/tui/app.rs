//! Application state and event loop

use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Widget,
    DefaultTerminal, Frame,
};
use tracing::{debug, info};

use crate::config::{Config, RendererChoice};
use crate::services::{
    initial_scroll, keep_visible, Aggregator, ContributionGrid, GridBuilder, GridCursor,
    YearCursor,
};
use crate::types::{CompletionMap, DayKey, Entry, Result};

use super::theme::{LevelColors, Theme};
use super::widgets::{
    day_detail::DayDetail,
    grid::{renderer_for, ContributionGridView},
    help::HelpPopup,
};

/// Event poll timeout
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Left margin of the whole view
const MARGIN: u16 = 1;

/// Host callback invoked with the key of an activated day
pub type DatePressHandler = Box<dyn FnMut(DayKey)>;

/// How the grid is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub theme: Theme,
    pub colors: LevelColors,
    pub renderer: RendererChoice,
    pub square_width: u16,
    pub square_spacing: u16,
    pub show_header: bool,
    pub show_legend: bool,
}

impl ViewOptions {
    /// Resolve configured options against a detected or chosen theme
    pub fn from_config(config: &Config, theme: Theme) -> Result<Self> {
        Ok(Self {
            theme,
            colors: theme.level_colors().with_overrides(&config.colors)?,
            renderer: config.renderer,
            square_width: config.square_width,
            square_spacing: config.square_spacing,
            show_header: config.show_header,
            show_legend: config.show_legend,
        })
    }
}

impl Default for ViewOptions {
    fn default() -> Self {
        let theme = Theme::default();
        Self {
            theme,
            colors: theme.level_colors(),
            renderer: RendererChoice::Default,
            square_width: 2,
            square_spacing: 1,
            show_header: true,
            show_legend: true,
        }
    }
}

/// Main application
pub struct App {
    entries: Vec<Entry>,
    completions: CompletionMap,
    builder: GridBuilder,
    today: NaiveDate,
    years: YearCursor,
    grid: ContributionGrid,
    cursor: GridCursor,
    /// First visible week column; None until the first draw of a year
    scroll: Option<usize>,
    selected: Option<DayKey>,
    on_date_press: Option<DatePressHandler>,
    view: ViewOptions,
    show_help: bool,
    should_quit: bool,
}

impl App {
    /// Create an app showing `year` (clamped to `today`'s year)
    pub fn new(
        entries: Vec<Entry>,
        builder: GridBuilder,
        year: i32,
        today: NaiveDate,
        view: ViewOptions,
    ) -> Self {
        let completions = Aggregator::completions_local(&entries);
        let years = YearCursor::new(year, today);
        let grid = builder.build(&completions, years.year(), today);
        let cursor = GridCursor::initial(&grid, today);
        info!(
            entries = entries.len(),
            days = completions.len(),
            year = years.year(),
            "starting grid view"
        );

        Self {
            entries,
            completions,
            builder,
            today,
            years,
            grid,
            cursor,
            scroll: None,
            selected: None,
            on_date_press: None,
            view,
            show_help: false,
            should_quit: false,
        }
    }

    /// Also call `handler` whenever a day is activated
    pub fn with_on_date_press(mut self, handler: impl FnMut(DayKey) + 'static) -> Self {
        self.on_date_press = Some(Box::new(handler));
        self
    }

    pub fn grid(&self) -> &ContributionGrid {
        &self.grid
    }

    pub fn year(&self) -> i32 {
        self.years.year()
    }

    pub fn cursor(&self) -> GridCursor {
        self.cursor
    }

    pub fn selected(&self) -> Option<DayKey> {
        self.selected
    }

    pub fn scroll(&self) -> Option<usize> {
        self.scroll
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // Help overlay swallows everything except closing it
        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Esc => {
                if self.selected.take().is_none() {
                    self.should_quit = true;
                }
            }
            KeyCode::Left | KeyCode::Char('h') => self.cursor.step_weeks(-1, &self.grid),
            KeyCode::Right | KeyCode::Char('l') => self.cursor.step_weeks(1, &self.grid),
            KeyCode::Up | KeyCode::Char('k') => self.cursor.step(-1, &self.grid),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.step(1, &self.grid),
            KeyCode::Char('[') | KeyCode::Char('p') => self.prev_year(),
            KeyCode::Char(']') | KeyCode::Char('n') => self.next_year(),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    /// Show the previous year
    pub fn prev_year(&mut self) {
        self.years.prev();
        self.rebuild();
    }

    /// Show the next year; no-op at the current year
    pub fn next_year(&mut self) {
        if self.years.next() {
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        self.grid = self
            .builder
            .build(&self.completions, self.years.year(), self.today);
        self.cursor = GridCursor::initial(&self.grid, self.today);
        self.scroll = None;
        debug!(year = self.years.year(), "switched year");
    }

    /// Move "today" forward when the date changes while the view is open.
    /// The grid is rebuilt only when its range depends on today.
    pub fn set_today(&mut self, today: NaiveDate) {
        if today == self.today {
            return;
        }
        let old_today = self.today;
        let was_current = self.years.is_current_year();
        self.today = today;
        self.years = YearCursor::new(self.years.year(), today);
        debug!(%old_today, %today, "date changed");

        if !was_current && !self.years.is_current_year() {
            return;
        }
        let on_old_today =
            self.grid.position_of(DayKey::new(old_today)) == Some(self.cursor.position());
        self.grid = self
            .builder
            .build(&self.completions, self.years.year(), self.today);

        let last = GridCursor::last(&self.grid);
        if on_old_today {
            self.cursor = GridCursor::initial(&self.grid, self.today);
        } else if self.cursor.position() > last.position() {
            self.cursor = last;
        }
    }

    /// Activate the day under the cursor; padding days are ignored
    pub fn activate(&mut self) {
        let Some(key) = self.cursor.activate(&self.grid) else {
            return;
        };
        self.selected = Some(key);
        if let Some(handler) = self.on_date_press.as_mut() {
            handler(key);
        }
    }

    fn grid_view(&self) -> ContributionGridView<'_> {
        ContributionGridView::new(&self.grid)
            .renderer(renderer_for(self.view.renderer))
            .colors(self.view.colors)
            .theme(self.view.theme)
            .square_size(self.view.square_width, self.view.square_spacing)
            .show_header(self.view.show_header)
            .show_legend(self.view.show_legend)
            .next_disabled(self.years.is_next_disabled())
            .selected(self.selected)
            .cursor(Some(self.cursor.position()))
    }

    /// Fit the scroll offset to `width` columns and keep the cursor on screen
    pub fn sync_viewport(&mut self, width: u16) {
        let visible = self.grid_view().visible_weeks(width.saturating_sub(MARGIN));
        let total = self.grid.week_count();
        let offset = self
            .scroll
            .unwrap_or_else(|| initial_scroll(self.years.year(), self.today, total, visible));
        let offset = keep_visible(offset, self.cursor.week(), visible);
        self.scroll = Some(offset.min(total.saturating_sub(visible)));
    }

    fn summary(&self) -> Line<'static> {
        let muted = Style::default().fg(self.view.theme.muted());
        let text = Style::default().fg(self.view.theme.text());
        Line::from(vec![
            Span::styled(self.grid.total_count().to_string(), text),
            Span::styled(" completions on ", muted),
            Span::styled(self.grid.active_days().to_string(), text),
            Span::styled(format!(" days in {}", self.years.year()), muted),
        ])
    }

    fn detail(&self) -> Option<DayDetail> {
        self.selected.map(|key| {
            DayDetail::from_entries_local(
                key,
                self.completions.get(key),
                &self.entries,
                self.view.theme,
            )
        })
    }

    /// Draw the application
    pub fn draw(&mut self, frame: &mut Frame) {
        self.sync_viewport(frame.area().width);
        frame.render_widget(&*self, frame.area());
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = Rect {
            x: area.x + MARGIN,
            width: area.width.saturating_sub(MARGIN),
            ..area
        };
        let view = self.grid_view().scroll(self.scroll.unwrap_or(0));
        let detail = self.detail();

        let [grid_area, summary_area, detail_area, _, hint_area] = Layout::vertical([
            Constraint::Length(view.height() + 1),
            Constraint::Length(1),
            Constraint::Length(detail.as_ref().map_or(0, |d| d.height())),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        view.render(grid_area, buf);
        self.summary().render(summary_area, buf);
        if let Some(detail) = detail {
            detail.render(detail_area, buf);
        }

        Line::styled(
            "←↓↑→ move  enter select  [ ] year  ? help  q quit",
            Style::default().fg(self.view.theme.muted()),
        )
        .render(hint_area, buf);

        if self.show_help {
            let popup_area = HelpPopup::centered_area(area);
            HelpPopup::new(self.view.theme).render(popup_area, buf);
        }
    }
}

/// Run the TUI application until the user quits
pub fn run(mut app: App) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn run_app(terminal: &mut DefaultTerminal, app: &mut App) -> anyhow::Result<()> {
    loop {
        app.set_today(Local::now().date_naive());
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        if event::poll(POLL_INTERVAL)? {
            app.handle_event(event::read()?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntryTime;
    use crossterm::event::KeyEvent;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn key(y: i32, m: u32, d: u32) -> DayKey {
        DayKey::new(date(y, m, d))
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    /// Today is Wednesday 2024-06-12; three entries on Jun 10, one on Jun 11
    fn make_app() -> App {
        let mut entries: Vec<Entry> = (0..3)
            .map(|_| Entry::new(EntryTime::Day(date(2024, 6, 10))))
            .collect();
        entries.push(Entry::new(EntryTime::parse("2024-06-11T08:15:00").unwrap()));
        App::new(
            entries,
            GridBuilder::default(),
            2024,
            date(2024, 6, 12),
            ViewOptions::default(),
        )
    }

    fn render(app: &App, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buf
    }

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ========== Quit tests ==========

    #[test]
    fn test_quit_keys() {
        let mut app = make_app();
        app.handle_event(press(KeyCode::Char('q')));
        assert!(app.should_quit());

        let mut app = make_app();
        app.handle_event(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(app.should_quit());
    }

    #[test]
    fn test_esc_clears_selection_then_quits() {
        let mut app = make_app();
        app.handle_event(press(KeyCode::Enter));
        assert!(app.selected().is_some());

        app.handle_event(press(KeyCode::Esc));
        assert!(app.selected().is_none());
        assert!(!app.should_quit());

        app.handle_event(press(KeyCode::Esc));
        assert!(app.should_quit());
    }

    #[test]
    fn test_release_events_ignored() {
        let mut app = make_app();
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        app.handle_event(Event::Key(release));
        assert!(!app.should_quit());
    }

    // ========== Cursor & activation tests ==========

    #[test]
    fn test_cursor_starts_on_today() {
        let app = make_app();
        assert_eq!(app.cursor().activate(app.grid()), Some(key(2024, 6, 12)));
    }

    #[test]
    fn test_cursor_movement_keys() {
        let mut app = make_app();
        let start = app.cursor().position();

        app.handle_event(press(KeyCode::Char('k')));
        assert_eq!(app.cursor().position(), (start.0, start.1 - 1));

        app.handle_event(press(KeyCode::Left));
        assert_eq!(app.cursor().position(), (start.0 - 1, start.1 - 1));

        app.handle_event(press(KeyCode::Char('l')));
        app.handle_event(press(KeyCode::Down));
        assert_eq!(app.cursor().position(), start);

        // Tomorrow is not drawn
        app.handle_event(press(KeyCode::Char('j')));
        assert_eq!(app.cursor().position(), start);
    }

    #[test]
    fn test_activate_selects_and_calls_handler() {
        let pressed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&pressed);
        let mut app = make_app().with_on_date_press(move |k| sink.borrow_mut().push(k));

        app.handle_event(press(KeyCode::Up));
        app.handle_event(press(KeyCode::Up));
        app.handle_event(press(KeyCode::Char(' ')));

        assert_eq!(app.selected(), Some(key(2024, 6, 10)));
        assert_eq!(*pressed.borrow(), vec![key(2024, 6, 10)]);
    }

    #[test]
    fn test_activate_padding_does_nothing() {
        let called = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&called);
        let mut app = App::new(
            Vec::new(),
            GridBuilder::default(),
            2025,
            date(2026, 1, 1),
            ViewOptions::default(),
        )
        .with_on_date_press(move |_| *flag.borrow_mut() = true);

        // Monday of week 0 is Dec 30 2024
        app.cursor = GridCursor::new(0, 0);
        app.handle_event(press(KeyCode::Enter));

        assert_eq!(app.selected(), None);
        assert!(!*called.borrow());
    }

    // ========== Year navigation tests ==========

    #[test]
    fn test_next_year_disabled_at_current() {
        let mut app = make_app();
        app.handle_event(press(KeyCode::Char(']')));
        assert_eq!(app.year(), 2024);
    }

    #[test]
    fn test_prev_then_next_year() {
        let mut app = make_app();
        app.sync_viewport(80);
        app.handle_event(press(KeyCode::Char('[')));
        assert_eq!(app.year(), 2023);
        assert_eq!(app.grid().year, 2023);
        assert_eq!(app.scroll(), None);
        // Past year: cursor on Dec 31
        assert_eq!(app.cursor().activate(app.grid()), Some(key(2023, 12, 31)));

        app.handle_event(press(KeyCode::Char('n')));
        assert_eq!(app.year(), 2024);
        assert_eq!(app.cursor().activate(app.grid()), Some(key(2024, 6, 12)));
    }

    #[test]
    fn test_future_year_clamped() {
        let app = App::new(
            Vec::new(),
            GridBuilder::default(),
            2030,
            date(2024, 6, 12),
            ViewOptions::default(),
        );
        assert_eq!(app.year(), 2024);
    }

    #[test]
    fn test_selection_survives_year_change() {
        let mut app = make_app();
        app.handle_event(press(KeyCode::Enter));
        app.handle_event(press(KeyCode::Char('p')));
        assert_eq!(app.selected(), Some(key(2024, 6, 12)));
    }

    // ========== Viewport tests ==========

    #[test]
    fn test_sync_viewport_keeps_cursor_visible() {
        let mut app = make_app();
        // 1 margin + 2 labels + 10 weeks * 3 - 1
        app.sync_viewport(1 + 2 + 29);
        let scroll = app.scroll().unwrap();
        let week = app.cursor().week();
        assert!(week >= scroll && week < scroll + 10);

        for _ in 0..20 {
            app.handle_event(press(KeyCode::Left));
        }
        app.sync_viewport(1 + 2 + 29);
        assert_eq!(app.scroll(), Some(app.cursor().week()));
    }

    #[test]
    fn test_sync_viewport_wide_terminal_no_scroll() {
        let mut app = make_app();
        app.sync_viewport(400);
        assert_eq!(app.scroll(), Some(0));
    }

    // ========== Date change tests ==========

    #[test]
    fn test_set_today_extends_current_year() {
        let mut app = make_app();
        assert!(app.grid().day(key(2024, 6, 13)).is_none());

        app.set_today(date(2024, 6, 13));
        assert!(app.grid().day(key(2024, 6, 13)).is_some());
        // Cursor follows today
        assert_eq!(app.cursor().activate(app.grid()), Some(key(2024, 6, 13)));
    }

    #[test]
    fn test_set_today_keeps_moved_cursor() {
        let mut app = make_app();
        app.handle_event(press(KeyCode::Left));
        let before = app.cursor();

        app.set_today(date(2024, 6, 13));
        assert_eq!(app.cursor(), before);
    }

    #[test]
    fn test_set_today_same_day_is_noop() {
        let mut app = make_app();
        app.sync_viewport(80);
        app.set_today(date(2024, 6, 12));
        assert!(app.scroll().is_some());
    }

    #[test]
    fn test_set_today_past_year_unchanged() {
        let mut app = make_app();
        app.handle_event(press(KeyCode::Char('[')));
        let grid = app.grid().clone();

        app.set_today(date(2024, 6, 13));
        assert_eq!(*app.grid(), grid);
    }

    #[test]
    fn test_set_today_new_year_enables_next() {
        let mut app = App::new(
            Vec::new(),
            GridBuilder::default(),
            2024,
            date(2024, 12, 31),
            ViewOptions::default(),
        );
        app.set_today(date(2025, 1, 1));

        assert_eq!(app.year(), 2024);
        // 2024 is now a past year: trailing days of 2025 are padding
        assert_eq!(app.grid().range.end, date(2025, 1, 5));
        assert_eq!(app.cursor().activate(app.grid()), Some(key(2024, 12, 31)));

        app.handle_event(press(KeyCode::Char(']')));
        assert_eq!(app.year(), 2025);
    }

    // ========== Help tests ==========

    #[test]
    fn test_help_toggle_swallows_keys() {
        let mut app = make_app();
        app.handle_event(press(KeyCode::Char('?')));
        assert!(app.show_help());

        let before = app.cursor();
        app.handle_event(press(KeyCode::Left));
        assert_eq!(app.cursor(), before);

        app.handle_event(press(KeyCode::Esc));
        assert!(!app.show_help());
        assert!(!app.should_quit());
    }

    // ========== Render tests ==========

    #[test]
    fn test_render_summary_and_detail() {
        let mut app = make_app();
        app.handle_event(press(KeyCode::Up));
        app.handle_event(press(KeyCode::Enter));
        app.sync_viewport(100);

        let text = buffer_text(&render(&app, 100, 24));
        assert!(text.contains("2024"));
        assert!(text.contains("4 completions on 2 days in 2024"));
        assert!(text.contains("2024-06-11 (Tuesday) 1 completion"));
        assert!(text.contains("08:15"));
    }

    #[test]
    fn test_render_help_overlay() {
        let mut app = make_app();
        app.handle_event(press(KeyCode::Char('?')));
        app.sync_viewport(100);
        let text = buffer_text(&render(&app, 100, 30));
        assert!(text.contains("Toggle help"));
    }

    #[test]
    fn test_view_options_from_config() {
        let config = Config {
            renderer: RendererChoice::Blocks,
            square_width: 1,
            ..Config::default()
        };
        let view = ViewOptions::from_config(&config, Theme::Light).unwrap();
        assert_eq!(view.renderer, RendererChoice::Blocks);
        assert_eq!(view.square_width, 1);
        assert_eq!(view.colors, LevelColors::LIGHT);
    }
}
