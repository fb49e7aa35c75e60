//! Ratatui-based terminal dashboard.
//!
//! A sidebar holds the filter (date range, region and category toggles);
//! the main area shows KPI cards and four charts. Every filter change
//! recomputes the view and summary from the loaded dataset.

use std::io;
use std::time::Duration;

use chrono::{Days, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::pipeline::{self, DashboardRun};
use crate::domain::{Dataset, DateRange, FilterSpec, PeriodLabel};
use crate::error::AppError;
use crate::report::{NOT_AVAILABLE, format_amount, format_count, format_opt_amount, truncate};

mod plotters_chart;

use plotters_chart::{RegionTrendChart, series_color};

/// Start the TUI with `filter` as the initial selection.
pub fn run(dataset: &Dataset, filter: FilterSpec, currency: &str) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(dataset, filter, currency);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Sidebar section with keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Dates,
    Regions,
    Categories,
}

impl Pane {
    fn next(self) -> Self {
        match self {
            Pane::Dates => Pane::Regions,
            Pane::Regions => Pane::Categories,
            Pane::Categories => Pane::Dates,
        }
    }

    fn prev(self) -> Self {
        match self {
            Pane::Dates => Pane::Categories,
            Pane::Regions => Pane::Dates,
            Pane::Categories => Pane::Regions,
        }
    }

    fn index(self) -> usize {
        match self {
            Pane::Dates => 0,
            Pane::Regions => 1,
            Pane::Categories => 2,
        }
    }
}

struct App<'a> {
    dataset: &'a Dataset,
    currency: String,
    /// Every region/category in the file, in display order.
    all_regions: Vec<String>,
    all_categories: Vec<String>,
    focus: Pane,
    cursors: [usize; 3],
    /// `Some` while typing a date into the From (0) or To (1) field.
    editing: Option<usize>,
    date_input: String,
    status: String,
    run: DashboardRun<'a>,
}

impl<'a> App<'a> {
    fn new(dataset: &'a Dataset, filter: FilterSpec, currency: &str) -> Self {
        let status = format!(
            "Loaded {} rows ({} dropped).",
            dataset.records.len(),
            dataset.dropped.len()
        );
        Self {
            dataset,
            currency: currency.to_string(),
            all_regions: dataset.regions().into_iter().collect(),
            all_categories: dataset.categories().into_iter().collect(),
            focus: Pane::Dates,
            cursors: [0; 3],
            editing: None,
            date_input: String::new(),
            status,
            run: pipeline::run(dataset, filter),
        }
    }

    fn filter(&self) -> &FilterSpec {
        &self.run.filter
    }

    fn set_filter(&mut self, filter: FilterSpec) {
        self.run = pipeline::run(self.dataset, filter);
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing.is_some() {
            self.handle_date_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Up => {
                let c = &mut self.cursors[self.focus.index()];
                *c = c.saturating_sub(1);
            }
            KeyCode::Down => {
                let len = self.pane_len(self.focus);
                let c = &mut self.cursors[self.focus.index()];
                if *c + 1 < len {
                    *c += 1;
                }
            }
            KeyCode::Left if self.focus == Pane::Dates => self.shift_date(-1),
            KeyCode::Right if self.focus == Pane::Dates => self.shift_date(1),
            KeyCode::Enter if self.focus == Pane::Dates => {
                let field = self.cursors[0];
                self.editing = Some(field);
                self.date_input = self.date_field(field).to_string();
                self.status = "Editing date (YYYY-MM-DD). Enter to apply, Esc to cancel.".to_string();
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected(),
            KeyCode::Char('a') => self.toggle_all(),
            KeyCode::Char('r') => {
                self.set_filter(FilterSpec::unfiltered(self.dataset));
                self.status = "Filter reset.".to_string();
            }
            _ => {}
        }

        false
    }

    fn handle_date_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = "Date edit canceled.".to_string();
            }
            KeyCode::Enter => {
                if let Some(field) = self.editing.take() {
                    self.apply_date_input(field);
                }
            }
            KeyCode::Backspace => {
                self.date_input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '-' {
                    self.date_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn apply_date_input(&mut self, field: usize) {
        match crate::cli::parse_day(&self.date_input) {
            Ok(day) => self.set_date_field(field, day),
            Err(e) => self.status = format!("Invalid date '{}': {e}", self.date_input.trim()),
        }
    }

    fn date_field(&self, field: usize) -> NaiveDate {
        if field == 0 {
            self.filter().range.start
        } else {
            self.filter().range.end
        }
    }

    fn set_date_field(&mut self, field: usize, day: NaiveDate) {
        let range = self.filter().range;
        let range = if field == 0 {
            DateRange::new(day, range.end)
        } else {
            DateRange::new(range.start, day)
        };
        let filter = self.filter().clone().with_range(range);
        self.set_filter(filter);
        self.status = if range.start > range.end {
            "From is after To: nothing selected.".to_string()
        } else {
            format!("Dates: {} .. {}", range.start, range.end)
        };
    }

    fn shift_date(&mut self, delta: i64) {
        let field = self.cursors[0];
        let day = self.date_field(field);
        let shifted = if delta >= 0 {
            day.checked_add_days(Days::new(delta as u64))
        } else {
            day.checked_sub_days(Days::new(delta.unsigned_abs()))
        };
        if let Some(day) = shifted {
            self.set_date_field(field, day);
        }
    }

    fn pane_len(&self, pane: Pane) -> usize {
        match pane {
            Pane::Dates => 2,
            Pane::Regions => self.all_regions.len(),
            Pane::Categories => self.all_categories.len(),
        }
    }

    fn toggle_selected(&mut self) {
        let idx = self.cursors[self.focus.index()];
        let mut filter = self.filter().clone();
        let (all, selected) = match self.focus {
            Pane::Dates => return,
            Pane::Regions => (&self.all_regions, &mut filter.regions),
            Pane::Categories => (&self.all_categories, &mut filter.categories),
        };
        let Some(key) = all.get(idx) else {
            return;
        };
        if !selected.remove(key) {
            selected.insert(key.clone());
        }
        self.set_filter(filter);
        self.status = format!("{} row(s) selected.", format_count(self.run.view.len()));
    }

    /// Select everything, or nothing if everything is already selected.
    fn toggle_all(&mut self) {
        let mut filter = self.filter().clone();
        let (all, selected) = match self.focus {
            Pane::Dates => return,
            Pane::Regions => (&self.all_regions, &mut filter.regions),
            Pane::Categories => (&self.all_categories, &mut filter.categories),
        };
        if selected.len() == all.len() {
            selected.clear();
        } else {
            selected.extend(all.iter().cloned());
        }
        self.set_filter(filter);
        self.status = format!("{} row(s) selected.", format_count(self.run.view.len()));
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(0)])
            .split(chunks[1]);
        self.draw_sidebar(frame, body[0]);
        self.draw_main(frame, body[1]);

        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let filter = self.filter();
        let lines = vec![
            Line::from(vec![
                Span::styled("dash", Style::default().fg(Color::Cyan)),
                Span::raw(format!(" - Sales Analytics | {}", self.dataset.path.display())),
            ]),
            Line::from(Span::styled(
                format!(
                    "{} .. {} | regions {}/{} | categories {}/{} | rows {}/{}",
                    filter.range.start,
                    filter.range.end,
                    filter.regions.len(),
                    self.all_regions.len(),
                    filter.categories.len(),
                    self.all_categories.len(),
                    format_count(self.run.view.len()),
                    format_count(self.dataset.records.len()),
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_sidebar(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Percentage(50),
                Constraint::Percentage(50),
            ])
            .split(area);

        let dates: Vec<ListItem> = ["From", "To"]
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let value = if self.editing == Some(i) {
                    format!("{}_", self.date_input)
                } else {
                    self.date_field(i).to_string()
                };
                ListItem::new(format!("{label:<5} {value}"))
            })
            .collect();
        self.render_pane(frame, chunks[0], Pane::Dates, "Dates", dates);

        let regions = checkbox_items(&self.all_regions, &self.filter().regions);
        self.render_pane(frame, chunks[1], Pane::Regions, "Regions", regions);

        let categories = checkbox_items(&self.all_categories, &self.filter().categories);
        self.render_pane(frame, chunks[2], Pane::Categories, "Categories", categories);
    }

    fn render_pane(&self, frame: &mut ratatui::Frame<'_>, area: Rect, pane: Pane, title: &str, items: Vec<ListItem>) {
        let focused = self.focus == pane;
        let border = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let list = List::new(items)
            .block(Block::default().title(title.to_string()).borders(Borders::ALL).border_style(border))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        if focused {
            state.select(Some(self.cursors[pane.index()]));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_main(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        self.draw_kpis(frame, chunks[0]);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[0]);
        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        self.draw_region_trend(frame, top[0]);
        self.draw_category_share(frame, top[1]);
        self.draw_revenue_by_product(frame, bottom[0]);
        self.draw_monthly_orders(frame, bottom[1]);
    }

    fn draw_kpis(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let summary = &self.run.summary;
        let cur = self.currency.as_str();
        let top = |t: &Option<crate::analytics::TopKey>| {
            t.as_ref()
                .map(|t| t.key.clone())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };

        let cards = [
            ("Total Revenue", format_amount(summary.total, cur)),
            ("Average Order Value", format_opt_amount(summary.mean, cur)),
            ("Total Orders", format_count(summary.count)),
            (
                "Top Region / Category",
                format!("{} / {}", top(&summary.top_region), top(&summary.top_category)),
            ),
        ];

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(area);

        for ((title, value), rect) in cards.into_iter().zip(cols.iter()) {
            let p = Paragraph::new(Line::from(Span::styled(
                value,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )))
            .block(Block::default().title(title).borders(Borders::ALL));
            frame.render_widget(p, *rect);
        }
    }

    fn draw_region_trend(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Sales by region over time").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(trend) = trend_series(&self.run.summary.region_trend) else {
            frame.render_widget(no_data(), inner);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let legend: Vec<Span> = trend
            .series
            .iter()
            .enumerate()
            .flat_map(|(i, (name, _))| {
                [
                    Span::styled("━ ", Style::default().fg(series_color(i))),
                    Span::raw(format!("{name}  ")),
                ]
            })
            .collect();
        frame.render_widget(Paragraph::new(Line::from(legend)), chunks[0]);

        let cur = self.currency.clone();
        let fmt_y = move |v: f64| format_amount(v, &cur);
        let widget = RegionTrendChart {
            series: &trend.series,
            periods: &trend.periods,
            x_bounds: trend.x_bounds,
            y_bounds: trend.y_bounds,
            fmt_y: &fmt_y,
        };
        frame.render_widget(widget, chunks[1]);
    }

    fn draw_category_share(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Category share").borders(Borders::ALL);
        let Some(shares) = self.run.summary.by_category.shares() else {
            frame.render_widget(no_data().block(block), area);
            return;
        };

        let inner_width = block.inner(area).width as usize;
        let items: Vec<ListItem> = shares
            .iter()
            .enumerate()
            .map(|(i, (key, pct))| {
                let bar_len = ((pct / 100.0) * inner_width.saturating_sub(22) as f64).round() as usize;
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:<12} {pct:>5.1}% ", truncate(key, 12))),
                    Span::styled("█".repeat(bar_len), Style::default().fg(series_color(i))),
                ]))
            })
            .collect();
        frame.render_widget(List::new(items).block(block), area);
    }

    fn draw_revenue_by_product(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Revenue by product").borders(Borders::ALL);
        let entries = self.run.summary.by_category.ascending();
        if entries.is_empty() {
            frame.render_widget(no_data().block(block), area);
            return;
        }

        let cur = self.currency.as_str();
        let bars: Vec<Bar> = entries
            .iter()
            .map(|(key, v)| {
                Bar::default()
                    .label(Line::from(truncate(key, 12)))
                    .value(v.max(0.0).round() as u64)
                    .text_value(format_amount(*v, cur))
            })
            .collect();
        let chart = BarChart::default()
            .block(block)
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, area);
    }

    fn draw_monthly_orders(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Monthly orders").borders(Borders::ALL);
        let orders = &self.run.summary.orders_by_period;
        if orders.is_empty() {
            frame.render_widget(no_data().block(block), area);
            return;
        }

        let multi_year = spans_years(orders.keys());
        let bars: Vec<Bar> = orders
            .iter()
            .map(|(period, n)| {
                Bar::default()
                    .label(Line::from(period_label(*period, multi_year)))
                    .value(*n as u64)
            })
            .collect();
        let chart = BarChart::default()
            .block(block)
            .bar_width(5)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Yellow))
            .value_style(Style::default().fg(Color::Black).bg(Color::Yellow))
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab pane  ↑/↓ move  ←/→ ±1 day  Enter edit/toggle  Space toggle  a all/none  r reset  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn checkbox_items<'b>(all: &[String], selected: &std::collections::BTreeSet<String>) -> Vec<ListItem<'b>> {
    all.iter()
        .map(|key| {
            let mark = if selected.contains(key) { "[x]" } else { "[ ]" };
            ListItem::new(format!("{mark} {key}"))
        })
        .collect()
}

fn no_data() -> Paragraph<'static> {
    Paragraph::new("No data for this selection.").style(Style::default().fg(Color::Yellow))
}

/// Whether sorted periods cover more than one calendar year.
fn spans_years<'p>(mut periods: impl DoubleEndedIterator<Item = &'p PeriodLabel>) -> bool {
    let first = periods.next().map(|p| p.year);
    let last = periods.next_back().map(|p| p.year);
    last.is_some() && first != last
}

/// Month name for chart axes, suffixed with the two-digit year (`Jan24`)
/// when the view spans several years.
fn period_label(period: PeriodLabel, multi_year: bool) -> String {
    if multi_year {
        format!("{}{:02}", period.short_name(), period.year.rem_euclid(100))
    } else {
        period.short_name().to_string()
    }
}

/// Plot-ready region trend: one line per region over period indices.
struct TrendSeries {
    series: Vec<(String, Vec<(f64, f64)>)>,
    periods: Vec<String>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

fn trend_series(
    trend: &std::collections::BTreeMap<PeriodLabel, std::collections::BTreeMap<String, f64>>,
) -> Option<TrendSeries> {
    if trend.is_empty() {
        return None;
    }

    let multi_year = spans_years(trend.keys());
    let periods: Vec<String> = trend.keys().map(|p| period_label(*p, multi_year)).collect();
    let mut series: Vec<(String, Vec<(f64, f64)>)> = Vec::new();
    for (i, row) in trend.values().enumerate() {
        for (region, v) in row {
            match series.iter_mut().find(|(name, _)| name == region) {
                Some((_, points)) => points.push((i as f64, *v)),
                None => series.push((region.clone(), vec![(i as f64, *v)])),
            }
        }
    }

    // A single month still needs a non-empty x span.
    let x_bounds = if periods.len() > 1 {
        [0.0, (periods.len() - 1) as f64]
    } else {
        [-0.5, 0.5]
    };

    let (y_min, y_max) = series
        .iter()
        .flat_map(|(_, pts)| pts.iter().map(|&(_, y)| y))
        .fold((0.0_f64, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));
    let y_max = if y_max.is_finite() && y_max > y_min { y_max } else { y_min + 1.0 };
    let pad = ((y_max - y_min) * 0.05).max(1e-12);

    Some(TrendSeries {
        series,
        periods,
        x_bounds,
        y_bounds: [y_min - pad, y_max + pad],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::{day, sample_dataset};

    #[test]
    fn toggling_a_region_recomputes() {
        let ds = sample_dataset();
        let mut app = App::new(&ds, FilterSpec::unfiltered(&ds), "₹");
        assert_eq!(app.run.summary.count, 3);

        app.handle_key(KeyCode::Tab);
        assert_eq!(app.focus, Pane::Regions);
        // North is first; deselect it.
        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.run.summary.count, 1);
        assert_eq!(app.run.summary.total, 50.0);

        app.handle_key(KeyCode::Char('a'));
        assert_eq!(app.run.summary.count, 3);
        app.handle_key(KeyCode::Char('a'));
        assert!(app.run.view.is_empty());
        assert_eq!(app.run.summary.mean, None);
    }

    #[test]
    fn editing_dates_narrows_the_view() {
        let ds = sample_dataset();
        let mut app = App::new(&ds, FilterSpec::unfiltered(&ds), "₹");

        // Move to "To", replace it with 2024-01-31.
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.editing, Some(1));
        for _ in 0..10 {
            app.handle_key(KeyCode::Backspace);
        }
        for c in "2024-01-31".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.editing, None);
        assert_eq!(app.filter().range.end, day(2024, 1, 31));
        assert_eq!(app.run.summary.count, 2);

        app.handle_key(KeyCode::Right);
        assert_eq!(app.filter().range.end, day(2024, 2, 1));
        assert_eq!(app.run.summary.count, 3);
    }

    #[test]
    fn bad_date_keeps_filter() {
        let ds = sample_dataset();
        let mut app = App::new(&ds, FilterSpec::unfiltered(&ds), "₹");
        let before = app.filter().clone();

        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Char('9'));
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.filter(), &before);
        assert!(app.status.starts_with("Invalid date"));
    }

    #[test]
    fn reset_and_quit() {
        let ds = sample_dataset();
        let narrowed = FilterSpec::unfiltered(&ds).with_regions(["South"]);
        let mut app = App::new(&ds, narrowed, "₹");
        assert!(!app.handle_key(KeyCode::Char('r')));
        assert_eq!(app.filter(), &FilterSpec::unfiltered(&ds));
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn trend_series_covers_every_region() {
        let ds = sample_dataset();
        let run = pipeline::run(&ds, FilterSpec::unfiltered(&ds));
        let trend = trend_series(&run.summary.region_trend).unwrap();

        assert_eq!(trend.periods, vec!["Jan", "Feb"]);
        assert_eq!(trend.x_bounds, [0.0, 1.0]);
        assert_eq!(trend.series.len(), 2);
        assert_eq!(trend.series[0], ("North".to_string(), vec![(0.0, 100.0), (1.0, 200.0)]));
        assert_eq!(trend.series[1], ("South".to_string(), vec![(0.0, 50.0), (1.0, 0.0)]));
        assert!(trend.y_bounds[0] < 0.0 && trend.y_bounds[1] > 200.0);

        assert!(trend_series(&Default::default()).is_none());
    }

    #[test]
    fn trend_labels_carry_year_across_years() {
        let dec = PeriodLabel { year: 2023, month: 12 };
        let jan = PeriodLabel { year: 2024, month: 1 };
        let trend = std::collections::BTreeMap::from([
            (dec, std::collections::BTreeMap::from([("North".to_string(), 1.0)])),
            (jan, std::collections::BTreeMap::from([("North".to_string(), 2.0)])),
        ]);
        let series = trend_series(&trend).unwrap();
        assert_eq!(series.periods, vec!["Dec23", "Jan24"]);

        assert!(!spans_years([jan].iter()));
        assert_eq!(period_label(jan, false), "Jan");
    }
}
