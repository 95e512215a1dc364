//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for the year range, chart kind, rolling
//! window, and indicator selection, then renders the selected chart plus
//! summary pages. All computation goes through the same pipeline as the CLI;
//! this module only handles input and presentation.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Terminal,
};

use crate::app::pipeline::{build_view, ViewOutput};
use crate::cli::ViewArgs;
use crate::data::{cached_dataset, resolve_data_path, Dataset};
use crate::domain::{ChartKind, ViewConfig, YearRange};
use crate::error::AppError;
use crate::view::{build_chart, Annotation, AxisSide, ChartData, ChartSpec};

mod plotters_chart;

use plotters_chart::DashPlottersChart;

/// Start the TUI.
pub fn run(args: ViewArgs) -> Result<(), AppError> {
    let path = resolve_data_path(args.data.as_deref());
    let dataset = cached_dataset(&path)?;
    let config = crate::app::view_config_from_args(&args, dataset);

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(dataset, config);
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Overview,
    Trends,
    Comparisons,
    Data,
}

impl Page {
    const ALL: [Page; 4] = [Page::Overview, Page::Trends, Page::Comparisons, Page::Data];

    fn display_name(self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::Trends => "Trends",
            Page::Comparisons => "Comparisons",
            Page::Data => "Data",
        }
    }

    fn step(self, delta: isize) -> Page {
        let pos = Self::ALL.iter().position(|&p| p == self).unwrap_or(0) as isize;
        let n = Self::ALL.len() as isize;
        Self::ALL[(pos + delta).rem_euclid(n) as usize]
    }
}

// Settings rows before the per-indicator toggles.
const FIELD_YEAR_FROM: usize = 0;
const FIELD_YEAR_TO: usize = 1;
const FIELD_CHART: usize = 2;
const FIELD_WINDOW: usize = 3;
const FIXED_FIELDS: usize = 4;

struct App {
    dataset: &'static Dataset,
    bounds: YearRange,
    view: ViewConfig,
    out: ViewOutput,
    page: Page,
    selected_field: usize,
    status: String,
}

impl App {
    fn new(dataset: &'static Dataset, view: ViewConfig) -> Self {
        let bounds = dataset
            .year_bounds()
            .unwrap_or_else(|| YearRange::new(0, -1));
        let out = build_view(dataset, &view);
        let status = dataset.summary_line();
        Self {
            dataset,
            bounds,
            view,
            out,
            page: Page::Overview,
            selected_field: 0,
            status,
        }
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
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
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

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => {
                self.page = self.page.step(1);
            }
            KeyCode::BackTab => {
                self.page = self.page.step(-1);
            }
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field + 1 < self.field_count() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => {
                if self.selected_field >= FIXED_FIELDS {
                    self.toggle_indicator(self.selected_field - FIXED_FIELDS);
                } else if self.selected_field == FIELD_CHART {
                    self.adjust_field(1);
                }
            }
            KeyCode::Char('e') => self.export_table(),
            KeyCode::Char('j') => self.export_chart(),
            _ => {}
        }
        false
    }

    fn field_count(&self) -> usize {
        FIXED_FIELDS + self.dataset.available.len()
    }

    fn effective_range(&self) -> YearRange {
        self.view.years.unwrap_or(self.bounds)
    }

    /// The stored range snapped into the dataset span, for editing.
    ///
    /// A request that is inverted or lies entirely outside the span (possible
    /// via `--from`/`--to`) resets to the full span, so arrow-key edits always
    /// start from a well-ordered interval inside the dataset.
    fn edit_range(&self) -> YearRange {
        let r = self.effective_range().clamped_to(self.bounds);
        if r.is_empty() { self.bounds } else { r }
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            FIELD_YEAR_FROM => {
                let mut r = self.edit_range();
                r.lo = r.lo.saturating_add(delta).clamp(self.bounds.lo, r.hi);
                self.view.years = Some(r);
                self.status = format!("range: {r}");
            }
            FIELD_YEAR_TO => {
                let mut r = self.edit_range();
                r.hi = r.hi.saturating_add(delta).clamp(r.lo, self.bounds.hi);
                self.view.years = Some(r);
                self.status = format!("range: {r}");
            }
            FIELD_CHART => {
                let pos = ChartKind::ALL
                    .iter()
                    .position(|&c| c == self.view.chart)
                    .unwrap_or(0) as i32;
                let n = ChartKind::ALL.len() as i32;
                self.view.chart = ChartKind::ALL[(pos + delta).rem_euclid(n) as usize];
                self.status = format!("chart: {}", self.view.chart.display_name());
            }
            FIELD_WINDOW => {
                let next = if delta >= 0 {
                    self.view.window.saturating_add(1)
                } else {
                    self.view.window.saturating_sub(1)
                };
                self.view.window = next.clamp(2, 25);
                self.status = format!("window: {}y", self.view.window);
            }
            field => {
                self.toggle_indicator(field - FIXED_FIELDS);
                return;
            }
        }
        self.refresh();
    }

    /// Toggle the nth available indicator, preserving selection order.
    fn toggle_indicator(&mut self, slot: usize) {
        let Some(&indicator) = self.dataset.available.get(slot) else {
            return;
        };
        if let Some(pos) = self.view.indicators.iter().position(|&i| i == indicator) {
            self.view.indicators.remove(pos);
            self.status = format!("deselected: {}", indicator.short_label());
        } else {
            self.view.indicators.push(indicator);
            self.status = format!("selected: {}", indicator.short_label());
        }
        self.refresh();
    }

    fn refresh(&mut self) {
        self.out = build_view(self.dataset, &self.view);
    }

    fn export_table(&mut self) {
        let path = timestamped_path("econ_dash_table", "csv");
        let columns = crate::report::export_columns(self.dataset, &self.out);
        match crate::io::write_table_csv(&path, &self.out, &columns) {
            Ok(()) => self.status = format!("Wrote table CSV: {}", path.display()),
            Err(err) => self.status = format!("Table export failed: {err}"),
        }
    }

    fn export_chart(&mut self) {
        let path = timestamped_path("econ_dash_chart", "json");
        match crate::io::write_chart_json(&path, &self.out.chart, self.out.range, self.view.window) {
            Ok(()) => self.status = format!("Wrote chart JSON: {}", path.display()),
            Err(err) => self.status = format!("Chart export failed: {err}"),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let settings_height = (self.field_count() + self.dataset.missing.len()) as u16 + 2;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(settings_height),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_settings(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("econ-dash", Style::default().fg(Color::Cyan)),
            Span::raw(" — economic & demographic indicators"),
            Span::raw("   "),
            Span::styled(
                Page::ALL
                    .iter()
                    .map(|p| {
                        if *p == self.page {
                            format!("[{}]", p.display_name())
                        } else {
                            format!(" {} ", p.display_name())
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" "),
                Style::default().fg(Color::Gray),
            ),
        ]));

        lines.push(Line::from(Span::styled(
            format!(
                "years: {} | chart: {} | window: {}y | rows in range: {}",
                self.out.range,
                self.view.chart.display_name(),
                self.view.window,
                self.out.filtered_rows,
            ),
            Style::default().fg(Color::Gray),
        )));

        let latest: Vec<String> = self
            .out
            .selection
            .iter()
            .filter_map(|&ind| {
                let (year, value) = self.out.annual.latest(ind)?;
                Some(format!(
                    "{}: {} ({year})",
                    ind.short_label(),
                    ind.format_value(value)
                ))
            })
            .collect();
        if !latest.is_empty() {
            lines.push(Line::from(Span::styled(
                latest.join(" | "),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        match self.page {
            Page::Overview => self.draw_overview(frame, area),
            Page::Trends => self.draw_chart(frame, area, &self.out.chart),
            Page::Comparisons => self.draw_comparisons(frame, area),
            Page::Data => self.draw_data(frame, area),
        }
    }

    fn draw_overview(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(self.dataset.summary_line()));
        lines.push(Line::raw(""));

        for note in &self.out.notes {
            lines.push(Line::from(Span::styled(
                format!("note: {note}"),
                Style::default().fg(Color::Yellow),
            )));
        }
        if !self.out.notes.is_empty() {
            lines.push(Line::raw(""));
        }

        let insights = crate::report::build_insights(&self.out, self.view.window);
        if insights.is_empty() {
            lines.push(Line::from("No insights for the current selection."));
        } else {
            for insight in insights {
                lines.push(Line::from(format!("- {insight}")));
            }
        }

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Overview").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_comparisons(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        let scatter = build_chart(
            ChartKind::Scatter,
            &self.out.selection,
            &self.out.annual,
            self.view.window,
        );
        self.draw_chart(frame, chunks[0], &scatter);

        let correlation = build_chart(
            ChartKind::Correlation,
            &self.out.selection,
            &self.out.annual,
            self.view.window,
        );
        let text = crate::report::format_chart_text(&correlation.data)
            .unwrap_or_else(|| "No correlation data.".to_string());
        let p = Paragraph::new(text)
            .block(Block::default().title(correlation.title).borders(Borders::ALL));
        frame.render_widget(p, chunks[1]);
    }

    fn draw_data(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let p = Paragraph::new(crate::report::format_table(&self.out))
            .block(Block::default().title("Annual table").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect, spec: &ChartSpec) {
        let Some(prepared) = prepare_chart(spec) else {
            // Matrix and placeholder payloads render as text.
            let text = crate::report::format_chart_text(&spec.data)
                .unwrap_or_else(|| "No data points in the selected range.".to_string());
            let p = Paragraph::new(text)
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().title(spec.title.clone()).borders(Borders::ALL));
            frame.render_widget(p, area);
            return;
        };

        // Multi-indicator trends get one panel per series so each keeps its
        // own scale. All other charts share one set of axes.
        if spec.chart == ChartKind::Trend && prepared.series.len() > 1 {
            let panels = prepared.series.len().min(3) as u32;
            let constraints: Vec<Constraint> =
                (0..panels).map(|_| Constraint::Ratio(1, panels)).collect();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints(constraints)
                .split(area);

            for (idx, chunk) in chunks.iter().enumerate() {
                let series = &prepared.series[idx];
                let Some((x_bounds, y_bounds)) = point_bounds(std::slice::from_ref(series))
                else {
                    continue;
                };
                self.render_panel(
                    frame,
                    *chunk,
                    &prepared.names[idx],
                    std::slice::from_ref(series),
                    &prepared.thresholds,
                    &prepared.events,
                    false,
                    x_bounds,
                    y_bounds,
                    spec,
                );
            }
            return;
        }

        let title = if prepared.series.len() > 1 {
            format!("{} [{}]", spec.title, prepared.names.join(" | "))
        } else {
            spec.title.clone()
        };
        self.render_panel(
            frame,
            area,
            &title,
            &prepared.series,
            &prepared.thresholds,
            &prepared.events,
            prepared.scatter,
            prepared.x_bounds,
            prepared.y_bounds,
            spec,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn render_panel(
        &self,
        frame: &mut ratatui::Frame<'_>,
        area: Rect,
        title: &str,
        series: &[Vec<(f64, f64)>],
        thresholds: &[f64],
        events: &[f64],
        scatter: bool,
        x_bounds: [f64; 2],
        y_bounds: [f64; 2],
        spec: &ChartSpec,
    ) {
        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let widget = DashPlottersChart {
            series,
            thresholds,
            events,
            scatter,
            x_bounds,
            y_bounds,
            x_label: &spec.x_label,
            y_label: spec.y_label.clone(),
            fmt_x: fmt_axis_x,
            fmt_y: fmt_axis_y,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let range = self.effective_range();

        let mut items = Vec::new();
        items.push(ListItem::new(format!("From: {}", range.lo)));
        items.push(ListItem::new(format!("To: {}", range.hi)));
        items.push(ListItem::new(format!(
            "Chart: {}",
            self.view.chart.display_name()
        )));
        items.push(ListItem::new(format!("Window: {}y", self.view.window)));
        for &indicator in &self.dataset.available {
            let selected = self.view.indicators.contains(&indicator);
            items.push(ListItem::new(format!(
                "[{}] {}",
                if selected { "x" } else { " " },
                indicator.label()
            )));
        }
        // Not selectable; shown so the user knows why they are absent.
        for &indicator in &self.dataset.missing {
            items.push(
                ListItem::new(format!("[-] {} (not in dataset)", indicator.label()))
                    .style(Style::default().fg(Color::DarkGray)),
            );
        }

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter toggle  Tab page  e export csv  j export json  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn timestamped_path(stem: &str, ext: &str) -> PathBuf {
    PathBuf::from(format!(
        "{stem}_{}.{ext}",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ))
}

/// Render-ready form of a series chart: plain point lists, resolved bounds,
/// and annotation positions.
struct PreparedChart {
    names: Vec<String>,
    series: Vec<Vec<(f64, f64)>>,
    thresholds: Vec<f64>,
    events: Vec<f64>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    scatter: bool,
}

/// Build chart series for Plotters.
///
/// Returns `None` for matrix/placeholder payloads and for series payloads
/// with no points. Secondary-axis series are min-max rescaled into the
/// primary y-range (a terminal chart gets one scale) and flagged by name.
fn prepare_chart(spec: &ChartSpec) -> Option<PreparedChart> {
    let ChartData::Series { series } = &spec.data else {
        return None;
    };

    let primary_y: Vec<f64> = series
        .iter()
        .filter(|s| s.axis == AxisSide::Primary)
        .flat_map(|s| s.points.iter().map(|&(_, y)| y))
        .collect();
    let all_x: Vec<f64> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|&(x, _)| x))
        .collect();
    if all_x.is_empty() {
        return None;
    }

    let thresholds: Vec<f64> = spec
        .annotations
        .iter()
        .filter_map(|a| match a {
            Annotation::Threshold { value, .. } => Some(*value),
            Annotation::Event { .. } => None,
        })
        .collect();
    let events: Vec<f64> = spec
        .annotations
        .iter()
        .filter_map(|a| match a {
            Annotation::Event { year, .. } => Some(*year as f64),
            Annotation::Threshold { .. } => None,
        })
        .collect();

    let x_bounds = padded_bounds(&all_x, 0.0)?;
    let mut y_values = primary_y;
    // Fall back to all points when every series is secondary.
    if y_values.is_empty() {
        y_values = series
            .iter()
            .flat_map(|s| s.points.iter().map(|&(_, y)| y))
            .collect();
    }
    y_values.extend_from_slice(&thresholds);
    let y_bounds = padded_bounds(&y_values, 0.05)?;

    let mut names = Vec::with_capacity(series.len());
    let mut point_lists = Vec::with_capacity(series.len());
    for s in series {
        if s.axis == AxisSide::Secondary {
            names.push(format!("{} (rescaled)", s.name));
            point_lists.push(rescale_points(&s.points, y_bounds));
        } else {
            names.push(s.name.clone());
            point_lists.push(s.points.clone());
        }
    }

    Some(PreparedChart {
        names,
        series: point_lists,
        thresholds,
        events,
        x_bounds,
        y_bounds,
        scatter: spec.chart == ChartKind::Scatter,
    })
}

/// Min-max rescale points into the target y-range.
fn rescale_points(points: &[(f64, f64)], y_bounds: [f64; 2]) -> Vec<(f64, f64)> {
    let lo = points.iter().map(|&(_, y)| y).fold(f64::INFINITY, f64::min);
    let hi = points
        .iter()
        .map(|&(_, y)| y)
        .fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;
    points
        .iter()
        .map(|&(x, y)| {
            let u = if span > 0.0 { (y - lo) / span } else { 0.5 };
            (x, y_bounds[0] + u * (y_bounds[1] - y_bounds[0]))
        })
        .collect()
}

/// Padded min/max of a value list; `None` when empty or non-finite.
fn padded_bounds(values: &[f64], frac: f64) -> Option<[f64; 2]> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    let pad = ((hi - lo).abs() * frac).max(1e-9);
    Some([lo - pad, hi + pad])
}

/// Bounds over raw point lists (per-panel trend rendering).
fn point_bounds(series: &[Vec<(f64, f64)>]) -> Option<([f64; 2], [f64; 2])> {
    let xs: Vec<f64> = series.iter().flatten().map(|&(x, _)| x).collect();
    let ys: Vec<f64> = series.iter().flatten().map(|&(_, y)| y).collect();
    Some((padded_bounds(&xs, 0.0)?, padded_bounds(&ys, 0.05)?))
}

fn fmt_axis_x(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_y(v: f64) -> String {
    if v.abs() >= 1e6 {
        format!("{v:.1e}")
    } else {
        format!("{v:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::read_dataset;
    use crate::domain::{AnnualSeries, Indicator};

    fn leaked_dataset() -> &'static Dataset {
        let csv = "time_period,ny.gdp.mktp.cd\n1970-Q1,100\n1971-Q1,200\n";
        Box::leak(Box::new(read_dataset(csv.as_bytes()).unwrap()))
    }

    fn sample_series() -> AnnualSeries {
        let years: Vec<i32> = (2000..2010).collect();
        let mut columns = vec![vec![None; years.len()]; Indicator::COUNT];
        columns[Indicator::Gdp.index()] =
            (0..10).map(|i| Some(1.0e9 + 1.0e8 * i as f64)).collect();
        columns[Indicator::LifeExpectancy.index()] =
            (0..10).map(|i| Some(70.0 + 0.1 * i as f64)).collect();
        AnnualSeries::new(years, columns)
    }

    #[test]
    fn placeholder_spec_has_no_prepared_chart() {
        let spec = ChartSpec::placeholder(ChartKind::Trend, "nothing to draw");
        assert!(prepare_chart(&spec).is_none());
    }

    #[test]
    fn dual_axis_secondary_is_rescaled_into_primary_range() {
        let spec = build_chart(
            ChartKind::DualAxis,
            &[Indicator::Gdp, Indicator::LifeExpectancy],
            &sample_series(),
            5,
        );
        let prepared = prepare_chart(&spec).unwrap();

        assert_eq!(prepared.series.len(), 2);
        assert!(prepared.names[1].ends_with("(rescaled)"));
        for &(_, y) in &prepared.series[1] {
            assert!(y >= prepared.y_bounds[0] && y <= prepared.y_bounds[1]);
        }
        // Primary bounds come from GDP, so they stay in the billions.
        assert!(prepared.y_bounds[1] > 1.0e9);
    }

    #[test]
    fn threshold_extends_y_bounds() {
        let spec = build_chart(
            ChartKind::Trend,
            &[Indicator::FertilityRate],
            &{
                let years: Vec<i32> = (2000..2005).collect();
                let mut columns = vec![vec![None; years.len()]; Indicator::COUNT];
                columns[Indicator::FertilityRate.index()] =
                    (0..5).map(|_| Some(1.5)).collect();
                AnnualSeries::new(years, columns)
            },
            5,
        );
        let prepared = prepare_chart(&spec).unwrap();
        // Replacement fertility (2.1) sits above the flat 1.5 series and must
        // be inside the plotted range.
        assert!(prepared.y_bounds[1] > 2.1);
        assert_eq!(prepared.thresholds, vec![2.1]);
    }

    #[test]
    fn adjusting_range_outside_dataset_span_snaps_into_bounds() {
        // A CLI request like `--from 1900 --to 1950` against a 1970..1971
        // dataset stores a range disjoint from the span; arrow-key edits must
        // recover instead of panicking on an inverted clamp.
        let mut view = ViewConfig {
            years: Some(YearRange::new(1900, 1950)),
            indicators: vec![Indicator::Gdp],
            ..ViewConfig::default()
        };
        let mut app = App::new(leaked_dataset(), view.clone());
        app.selected_field = FIELD_YEAR_FROM;
        app.adjust_field(1);
        let r = app.effective_range();
        assert!(!r.is_empty());
        assert!(r.lo >= 1970 && r.hi <= 1971);

        // Symmetric case: entirely above the span, edited from the To field.
        view.years = Some(YearRange::new(2030, 2040));
        let mut app = App::new(leaked_dataset(), view);
        app.selected_field = FIELD_YEAR_TO;
        app.adjust_field(-1);
        let r = app.effective_range();
        assert!(!r.is_empty());
        assert!(r.lo >= 1970 && r.hi <= 1971);
    }

    #[test]
    fn inverted_stored_range_resets_to_full_span_for_editing() {
        let view = ViewConfig {
            years: Some(YearRange::new(1971, 1970)),
            indicators: vec![Indicator::Gdp],
            ..ViewConfig::default()
        };
        let app = App::new(leaked_dataset(), view);
        assert_eq!(app.edit_range(), YearRange::new(1970, 1971));
    }

    #[test]
    fn page_cycle_wraps_both_directions() {
        assert_eq!(Page::Overview.step(1), Page::Trends);
        assert_eq!(Page::Overview.step(-1), Page::Data);
        assert_eq!(Page::Data.step(1), Page::Overview);
    }

    #[test]
    fn scatter_prepares_point_mode() {
        let spec = build_chart(
            ChartKind::Scatter,
            &[Indicator::Gdp, Indicator::LifeExpectancy],
            &sample_series(),
            5,
        );
        let prepared = prepare_chart(&spec).unwrap();
        assert!(prepared.scatter);
        assert_eq!(prepared.series.len(), 1);
        assert_eq!(prepared.series[0].len(), 10);
    }
}
