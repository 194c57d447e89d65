//! Ratatui-based terminal UI.
//!
//! The TUI renders the aggregated deal charts full-screen: a Plotters-drawn
//! chart pane, a side panel with the legend and top categories, and a status
//! footer. Keys flip the dimension/metric/mode, toggle the total series, and
//! adjust the year window; every change re-aggregates the already normalized
//! dataset without reloading it.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Terminal,
};

use crate::agg::trim_leading_zero_rows;
use crate::app::pipeline::{aggregate_view, run_report};
use crate::chart::{axis_domain, ColorDistributor, Rgb};
use crate::domain::{AggregatedSeries, ChartMode, Metric, ReportConfig};
use crate::error::AppError;
use crate::io::ingest::IngestedData;
use crate::report::Rankings;

mod plotters_chart;

use plotters_chart::{DealPlottersChart, SeriesLine, StackSegment};

const TOTAL_COLOR: Rgb = Rgb(0xff, 0xff, 0xff);

/// Start the TUI.
pub fn run(config: ReportConfig) -> Result<(), AppError> {
    // Load before switching the terminal over, so load errors print normally.
    let run = run_report(&config)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, run.ingest, run.series, run.rankings);
    app.event_loop(&mut terminal)
}

/// Restores the terminal (raw mode, alternate screen) on every exit path.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
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

struct App {
    config: ReportConfig,
    ingest: IngestedData,
    series: AggregatedSeries,
    rankings: Rankings,
    colors: ColorDistributor,
    status: String,
}

impl App {
    fn new(
        config: ReportConfig,
        ingest: IngestedData,
        series: AggregatedSeries,
        rankings: Rankings,
    ) -> Self {
        let colors = ColorDistributor::for_dimension(config.dimension);
        Self {
            config,
            ingest,
            series,
            rankings,
            colors,
            status: "Ready.".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
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

    /// Returns true when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('d') => {
                self.config.dimension = self.config.dimension.next();
                // A new chart gets a fresh distributor; within it, colors stay
                // stable for the lifetime of the view.
                self.colors = ColorDistributor::for_dimension(self.config.dimension);
                self.reaggregate();
                self.status = format!("dimension: {}", self.config.dimension.display_name());
            }
            KeyCode::Char('m') => {
                self.config.metric = self.config.metric.toggle();
                self.reaggregate();
                self.status = format!("metric: {}", self.config.metric.unit_label());
            }
            KeyCode::Char('c') => {
                self.config.mode = self.config.mode.toggle();
                self.status = format!("mode: {}", self.config.mode.display_name());
            }
            KeyCode::Char('t') => {
                self.config.show_total = !self.config.show_total;
                self.status = format!(
                    "total series: {}",
                    if self.config.show_total { "on" } else { "off" }
                );
            }
            KeyCode::Char('[') => self.adjust_first_year(-1),
            KeyCode::Char(']') => self.adjust_first_year(1),
            KeyCode::Char(',') => self.adjust_last_year(-1),
            KeyCode::Char('.') => self.adjust_last_year(1),
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
        false
    }

    fn reaggregate(&mut self) {
        let (series, rankings) = aggregate_view(&self.config, &self.ingest);
        self.series = series;
        self.rankings = rankings;
    }

    fn reload(&mut self) {
        match run_report(&self.config) {
            Ok(run) => {
                self.ingest = run.ingest;
                self.series = run.series;
                self.rankings = run.rankings;
                self.status = "Reloaded dataset.".to_string();
            }
            Err(err) => {
                self.status = format!("Reload failed: {err}");
            }
        }
    }

    fn adjust_first_year(&mut self, delta: i32) {
        let Some((observed_min, observed_max)) = self.observed_span() else {
            return;
        };
        let current = self.config.filter.year_min.unwrap_or(observed_min);
        let last = self.config.filter.year_max.unwrap_or(observed_max);
        let next = (current + delta).clamp(observed_min, last);
        self.config.filter.year_min = Some(next);
        self.reaggregate();
        self.status = format!("first year: {next}");
    }

    fn adjust_last_year(&mut self, delta: i32) {
        let Some((observed_min, observed_max)) = self.observed_span() else {
            return;
        };
        let current = self.config.filter.year_max.unwrap_or(observed_max);
        let first = self.config.filter.year_min.unwrap_or(observed_min);
        let next = (current + delta).clamp(first, observed_max);
        self.config.filter.year_max = Some(next);
        self.reaggregate();
        self.status = format!("last year: {next}");
    }

    fn observed_span(&self) -> Option<(i32, i32)> {
        match (self.ingest.stats.year_min, self.ingest.stats.year_max) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("vcp", Style::default().fg(Color::Cyan)),
            Span::raw(" — Swiss startup & VC deals"),
        ]));

        let span = self
            .series
            .year_span()
            .map(|(a, b)| format!("{a}-{b}"))
            .unwrap_or_else(|| "-".to_string());

        lines.push(Line::from(Span::styled(
            format!(
                "{} | {} | {}{} | years: {span} | n={}",
                self.config.dimension.display_name(),
                self.config.metric.unit_label(),
                self.config.mode.display_name(),
                if self.config.show_total { " + total" } else { "" },
                self.ingest.rows_used,
            ),
            Style::default().fg(Color::Gray),
        )));

        lines.push(Line::from(Span::styled(
            format!(
                "volume: {:.1} CHF m | confidential dropped: {} | row errors: {}",
                self.ingest.stats.total_volume,
                self.ingest.confidential_dropped,
                self.ingest.row_errors.len(),
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(34)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_side_panel(frame, chunks[1]);
    }

    fn draw_chart(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = format!("Deals by {}", self.config.dimension.display_name());
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.series.is_empty() {
            let msg = Paragraph::new("No year-bucketed deals for the current filters.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        }

        let (lines, segments, x_bounds, y_bounds) = self.chart_inputs();

        let widget = DealPlottersChart {
            mode: self.config.mode,
            lines: &lines,
            segments: &segments,
            x_bounds,
            y_bounds,
            x_label: "year",
            y_label: self.config.metric.unit_label().to_string(),
            fmt_x: fmt_axis_year,
            fmt_y: fmt_axis_value,
        };
        frame.render_widget(widget, inner);
    }

    /// Build the Plotters series/segments for the current view.
    fn chart_inputs(&mut self) -> (Vec<SeriesLine>, Vec<StackSegment>, [f64; 2], [f64; 2]) {
        let metric = self.config.metric;
        let categories = self.series.categories.clone();

        // The compact view trims leading all-zero years; the aggregation
        // itself stays untouched.
        let rows = trim_leading_zero_rows(&self.series.rows);
        let axis = axis_domain(rows, &categories, metric, self.config.mode, self.config.show_total);

        let (first, last) = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) => (first.year, last.year),
            _ => (0, 1),
        };
        let x_bounds = [first as f64 - 0.5, last as f64 + 0.5];
        let y_bounds = [0.0, axis.max];

        let mut lines = Vec::new();
        let mut segments = Vec::new();

        match self.config.mode {
            ChartMode::Line => {
                for category in &categories {
                    let color = self.colors.color_of(category, &categories);
                    lines.push(SeriesLine {
                        color,
                        points: rows
                            .iter()
                            .map(|row| (row.year as f64, row.value_of(category, metric)))
                            .collect(),
                    });
                }
                if self.config.show_total {
                    lines.push(SeriesLine {
                        color: TOTAL_COLOR,
                        points: rows
                            .iter()
                            .map(|row| (row.year as f64, row.total_of(metric)))
                            .collect(),
                    });
                }
            }
            ChartMode::Column => {
                for row in rows {
                    let mut cumulative = 0.0;
                    for category in &categories {
                        let value = row.value_of(category, metric);
                        if value <= 0.0 {
                            continue;
                        }
                        let color = self.colors.color_of(category, &categories);
                        segments.push(StackSegment {
                            color,
                            x0: row.year as f64 - 0.35,
                            x1: row.year as f64 + 0.35,
                            y0: cumulative,
                            y1: cumulative + value,
                        });
                        cumulative += value;
                    }
                }
            }
        }

        (lines, segments, x_bounds, y_bounds)
    }

    fn draw_side_panel(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(self.config.top_n as u16 + 2)])
            .split(area);

        self.draw_legend(frame, chunks[0]);
        self.draw_rankings(frame, chunks[1]);
    }

    fn draw_legend(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let categories = self.series.categories.clone();
        let mut items: Vec<ListItem> = categories
            .iter()
            .map(|category| {
                let color = self.colors.color_of(category, &categories);
                ListItem::new(Line::from(vec![
                    Span::styled("■ ", Style::default().fg(Color::Rgb(color.0, color.1, color.2))),
                    Span::raw(category.clone()),
                ]))
            })
            .collect();

        if self.config.show_total && self.config.mode == ChartMode::Line {
            items.push(ListItem::new(Line::from(vec![
                Span::styled(
                    "■ ",
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("Total"),
            ])));
        }

        let list = List::new(items).block(Block::default().title("Legend").borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_rankings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let entries = match self.config.metric {
            Metric::Volume => &self.rankings.by_volume,
            Metric::Count => &self.rankings.by_count,
        };

        let items: Vec<ListItem> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let value = match self.config.metric {
                    Metric::Volume => format!("{:.1}", entry.volume),
                    Metric::Count => entry.count.to_string(),
                };
                ListItem::new(format!("{:>2}. {:<20} {value:>8}", i + 1, entry.name))
            })
            .collect();

        let list = List::new(items).block(Block::default().title("Top categories").borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "d dim  m metric  c mode  t total  [/] first yr  ,/. last yr  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn fmt_axis_year(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_value(v: f64) -> String {
    format!("{v:.0}")
}
