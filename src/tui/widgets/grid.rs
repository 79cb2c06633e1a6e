//! Contribution grid widget and its pluggable renderers

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::config::RendererChoice;
use crate::services::ContributionGrid;
use crate::tui::theme::{LevelColors, Theme};
use crate::types::{DayInfo, DayKey, Level, DAY_LABELS};

/// Weekday label column: "M "
const LABEL_WIDTH: u16 = 2;
/// Header line + blank line
const HEADER_HEIGHT: u16 = 2;
/// Blank line + legend line
const LEGEND_HEIGHT: u16 = 2;
/// Month label row
const MONTH_ROW_HEIGHT: u16 = 1;
const DAY_ROWS: u16 = 7;
/// Largest accepted square width and spacing; larger values are clamped
const MAX_SQUARE_WIDTH: u16 = 8;
const MAX_SQUARE_SPACING: u16 = 4;

/// What the header renderer gets to work with
#[derive(Debug, Clone, Copy)]
pub struct HeaderContext {
    pub year: i32,
    pub is_next_disabled: bool,
    pub theme: Theme,
}

/// What the square renderer gets to work with
#[derive(Debug, Clone, Copy)]
pub struct SquareContext<'a> {
    pub day: &'a DayInfo,
    pub is_selected: bool,
    pub is_cursor: bool,
    /// Columns the square occupies
    pub width: u16,
    /// Blank columns after the square
    pub spacing: u16,
    pub colors: &'a LevelColors,
}

impl SquareContext<'_> {
    fn fill(&self, glyph: &str) -> String {
        glyph.repeat(self.width as usize)
    }
}

/// Drawing strategy for each customizable part of the grid.
///
/// Every method has a default; implementors override only what they change.
pub trait GridRenderer {
    /// Year line: `‹ 2024 ›`, next arrow dimmed when unavailable
    fn header(&self, ctx: &HeaderContext) -> Line<'static> {
        let arrow = Style::default().fg(ctx.theme.accent());
        let next = if ctx.is_next_disabled {
            Style::default().fg(ctx.theme.muted())
        } else {
            arrow
        };
        Line::from(vec![
            Span::styled("‹   ", arrow),
            Span::styled(
                ctx.year.to_string(),
                Style::default()
                    .fg(ctx.theme.text())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("   ›", next),
        ])
        .centered()
    }

    /// `Less ■ ■ ■ ■ ■ More`
    fn legend(&self, colors: &LevelColors, theme: Theme) -> Line<'static> {
        let muted = Style::default().fg(theme.muted());
        let mut spans = vec![Span::styled("Less ", muted)];
        for level in Level::SCALE {
            spans.push(Span::styled(
                "██",
                Style::default().fg(colors.color_for(level)),
            ));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled("More", muted));
        Line::from(spans).centered()
    }

    /// Symbol and style of one day square
    fn square(&self, ctx: &SquareContext<'_>) -> (String, Style) {
        if ctx.day.is_padding() {
            return (ctx.fill(" "), Style::default());
        }
        let color = ctx.colors.color_for(ctx.day.level);
        if ctx.is_selected {
            (ctx.fill("█"), Style::default().fg(ctx.colors.selected_border))
        } else if ctx.is_cursor {
            (
                ctx.fill("▓"),
                Style::default()
                    .fg(color)
                    .bg(ctx.colors.selected_border),
            )
        } else {
            (ctx.fill("█"), Style::default().fg(color))
        }
    }

    fn month_label(&self, label: &'static str, _index: usize, theme: Theme) -> Span<'static> {
        Span::styled(label, Style::default().fg(theme.muted()))
    }

    fn day_label(&self, label: &'static str, _index: usize, theme: Theme) -> Span<'static> {
        Span::styled(label, Style::default().fg(theme.muted()))
    }
}

/// Colored block squares
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultRenderer;

impl GridRenderer for DefaultRenderer {}

/// Distinct shade glyph per level, readable without color
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockRenderer;

impl BlockRenderer {
    /// Glyph for a level
    pub fn glyph(level: Level) -> &'static str {
        match level {
            Level::Padding => " ",
            Level::Empty => "·",
            Level::L1 => "░",
            Level::L2 => "▒",
            Level::L3 => "▓",
            Level::L4 => "█",
        }
    }
}

impl GridRenderer for BlockRenderer {
    fn legend(&self, colors: &LevelColors, theme: Theme) -> Line<'static> {
        let muted = Style::default().fg(theme.muted());
        let mut spans = vec![Span::styled("Less ", muted)];
        for level in Level::SCALE {
            spans.push(Span::styled(
                Self::glyph(level).repeat(2),
                Style::default().fg(colors.color_for(level)),
            ));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled("More", muted));
        Line::from(spans).centered()
    }

    fn square(&self, ctx: &SquareContext<'_>) -> (String, Style) {
        let glyph = if ctx.is_selected && !ctx.day.is_padding() {
            "◆"
        } else {
            Self::glyph(ctx.day.level)
        };
        let mut style = Style::default().fg(ctx.colors.color_for(ctx.day.level));
        if ctx.is_selected {
            style = style.fg(ctx.colors.selected_border);
        }
        if ctx.is_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        (ctx.fill(glyph), style)
    }
}

static DEFAULT_RENDERER: DefaultRenderer = DefaultRenderer;
static BLOCK_RENDERER: BlockRenderer = BlockRenderer;

/// Built-in renderer for a configured choice
pub fn renderer_for(choice: RendererChoice) -> &'static dyn GridRenderer {
    match choice {
        RendererChoice::Default => &DEFAULT_RENDERER,
        RendererChoice::Blocks => &BLOCK_RENDERER,
    }
}

/// Contribution grid widget: header, month labels, 7 weekday rows of
/// week columns, legend
pub struct ContributionGridView<'a> {
    grid: &'a ContributionGrid,
    renderer: &'a dyn GridRenderer,
    colors: LevelColors,
    theme: Theme,
    selected: Option<DayKey>,
    cursor: Option<(usize, usize)>,
    scroll: usize,
    square_width: u16,
    square_spacing: u16,
    show_header: bool,
    show_legend: bool,
    is_next_disabled: bool,
}

impl<'a> ContributionGridView<'a> {
    pub fn new(grid: &'a ContributionGrid) -> Self {
        Self {
            grid,
            renderer: &DEFAULT_RENDERER,
            colors: Theme::default().level_colors(),
            theme: Theme::default(),
            selected: None,
            cursor: None,
            scroll: 0,
            square_width: 2,
            square_spacing: 1,
            show_header: true,
            show_legend: true,
            is_next_disabled: true,
        }
    }

    pub fn renderer(mut self, renderer: &'a dyn GridRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn colors(mut self, colors: LevelColors) -> Self {
        self.colors = colors;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn selected(mut self, selected: Option<DayKey>) -> Self {
        self.selected = selected;
        self
    }

    /// Highlighted (week, weekday) cell
    pub fn cursor(mut self, cursor: Option<(usize, usize)>) -> Self {
        self.cursor = cursor;
        self
    }

    /// First visible week column
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    /// Columns per square and blank columns after it, clamped to 1..=8 and 0..=4
    pub fn square_size(mut self, width: u16, spacing: u16) -> Self {
        self.square_width = width.clamp(1, MAX_SQUARE_WIDTH);
        self.square_spacing = spacing.min(MAX_SQUARE_SPACING);
        self
    }

    pub fn show_header(mut self, show: bool) -> Self {
        self.show_header = show;
        self
    }

    pub fn show_legend(mut self, show: bool) -> Self {
        self.show_legend = show;
        self
    }

    pub fn next_disabled(mut self, disabled: bool) -> Self {
        self.is_next_disabled = disabled;
        self
    }

    /// Columns per week: square plus spacing
    pub fn cell_width(&self) -> u16 {
        self.square_width + self.square_spacing
    }

    /// Week columns that fit in `width`
    pub fn visible_weeks(&self, width: u16) -> usize {
        let available = width.saturating_sub(LABEL_WIDTH);
        // The last column needs no trailing spacing
        (available.saturating_add(self.square_spacing) / self.cell_width()) as usize
    }

    /// Rows needed to draw everything
    pub fn height(&self) -> u16 {
        let mut height = MONTH_ROW_HEIGHT + DAY_ROWS;
        if self.show_header {
            height += HEADER_HEIGHT;
        }
        if self.show_legend {
            height += LEGEND_HEIGHT;
        }
        height
    }

    /// Columns needed to show every week
    pub fn full_width(&self) -> u16 {
        let weeks = u16::try_from(self.grid.week_count()).unwrap_or(u16::MAX);
        LABEL_WIDTH
            .saturating_add(weeks.saturating_mul(self.cell_width()))
            .saturating_sub(self.square_spacing)
    }

    /// Render into plain text lines (styles dropped, trailing blanks trimmed)
    pub fn to_plain_lines(self, width: u16) -> Vec<String> {
        let area = Rect::new(0, 0, width, self.height());
        let mut buf = Buffer::empty(area);
        self.render(area, &mut buf);

        (0..area.height)
            .map(|y| {
                let row: String = (0..area.width)
                    .map(|x| buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "))
                    .collect();
                row.trim_end().to_string()
            })
            .collect()
    }

    fn render_month_labels(&self, area: Rect, buf: &mut Buffer, y: u16, end: usize) {
        let grid_x = area.x + LABEL_WIDTH;
        let max_x = area.x + area.width;
        let mut next_free = grid_x;

        for (idx, month) in self.grid.month_starts.iter().enumerate() {
            if month.week_index < self.scroll || month.week_index >= end {
                continue;
            }
            let col = (month.week_index - self.scroll) as u16;
            let x = grid_x.saturating_add(col.saturating_mul(self.cell_width()));
            // Labels of adjacent months may collide on narrow squares
            if x < next_free {
                continue;
            }
            let span = self.renderer.month_label(month.label, idx, self.theme);
            let width = span.width() as u16;
            if x.saturating_add(width) > max_x {
                break;
            }
            buf.set_string(x, y, span.content.as_ref(), span.style);
            next_free = x + width + 1;
        }
    }

    fn render_day_row(&self, area: Rect, buf: &mut Buffer, y: u16, row: usize, end: usize) {
        let label = self.renderer.day_label(DAY_LABELS[row], row, self.theme);
        buf.set_string(area.x, y, label.content.as_ref(), label.style);

        let grid_x = area.x + LABEL_WIDTH;
        let max_x = area.x + area.width;
        let start = self.scroll.min(end);

        for (col, week) in self.grid.weeks[start..end].iter().enumerate() {
            // Short final week: nothing drawn past its last day
            let Some(day) = week.get(row) else {
                continue;
            };
            let x = grid_x.saturating_add((col as u16).saturating_mul(self.cell_width()));
            if x.saturating_add(self.square_width) > max_x {
                break;
            }
            let ctx = SquareContext {
                day,
                is_selected: self.selected == Some(day.key),
                is_cursor: self.cursor == Some((start + col, row)),
                width: self.square_width,
                spacing: self.square_spacing,
                colors: &self.colors,
            };
            let (symbol, style) = self.renderer.square(&ctx);
            buf.set_stringn(x, y, &symbol, self.square_width as usize, style);
        }
    }
}

impl Widget for ContributionGridView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bottom = area.y + area.height;
        let mut y = area.y;

        if self.show_header && y < bottom {
            let header = self.renderer.header(&HeaderContext {
                year: self.grid.year,
                is_next_disabled: self.is_next_disabled,
                theme: self.theme,
            });
            header.render(Rect::new(area.x, y, area.width, 1), buf);
            y += HEADER_HEIGHT;
        }

        let end = (self.scroll + self.visible_weeks(area.width)).min(self.grid.week_count());

        if y < bottom {
            self.render_month_labels(area, buf, y, end);
            y += MONTH_ROW_HEIGHT;
        }

        for row in 0..DAY_ROWS as usize {
            if y >= bottom {
                break;
            }
            self.render_day_row(area, buf, y, row, end);
            y += 1;
        }

        if self.show_legend {
            y += 1;
            if y < bottom {
                let legend = self.renderer.legend(&self.colors, self.theme);
                legend.render(Rect::new(area.x, y, area.width, 1), buf);
            }
        }
    }
}
