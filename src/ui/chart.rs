//! Performance chart widget for visualizing exchange-rate history.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use super::theme::Theme;
use super::widgets::spinner_frame;
use crate::data::Period;
use crate::performance::PerformanceState;

/// Period selector shown in the chart header
pub struct PeriodTabs<'a> {
    active: Period,
    theme: &'a Theme,
}

impl<'a> PeriodTabs<'a> {
    pub fn new(active: Period, theme: &'a Theme) -> Self {
        PeriodTabs { active, theme }
    }

    pub fn line(&self) -> Line<'static> {
        let spans: Vec<Span> = Period::ALL
            .iter()
            .enumerate()
            .flat_map(|(i, p)| {
                let style = if *p == self.active {
                    self.theme.highlight_style()
                } else {
                    self.theme.muted_style()
                };
                vec![
                    Span::styled(format!("{}", i + 1), Style::default().add_modifier(Modifier::DIM)),
                    Span::styled(format!(" {} ", p.label()), style),
                    Span::raw(" "),
                ]
            })
            .collect();
        Line::from(spans)
    }
}

/// Line chart of the selected pair over the selected period
pub struct PerformanceChart<'a> {
    state: &'a PerformanceState,
    theme: &'a Theme,
    tick: u64,
}

impl<'a> PerformanceChart<'a> {
    pub fn new(state: &'a PerformanceState, theme: &'a Theme, tick: u64) -> Self {
        PerformanceChart { state, theme, tick }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let (border_style, title_style) = self.theme.panel_styles(focused);
        let block = Block::default()
            .title(" Performance ")
            .borders(Borders::ALL)
            .border_style(border_style)
            .title_style(title_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Pair + period selector
                Constraint::Min(3),    // Plot
                Constraint::Length(1), // Cursor readout
            ])
            .split(inner);

        self.render_header(frame, chunks[0]);

        if self.state.is_loading() {
            let spinner = Paragraph::new(format!("{} Loading history...", spinner_frame(self.tick)))
                .style(self.theme.accent_style())
                .alignment(Alignment::Center);
            let mid = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(50), Constraint::Length(1), Constraint::Min(0)])
                .split(chunks[1]);
            frame.render_widget(spinner, mid[1]);
            return;
        }

        if self.state.points().is_empty() {
            let message = Paragraph::new("No data available")
                .style(Style::default().add_modifier(Modifier::DIM))
                .alignment(Alignment::Center);
            frame.render_widget(message, chunks[1]);
            return;
        }

        self.render_plot(frame, chunks[1]);
        self.render_readout(frame, chunks[2]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(32)])
            .split(area);

        let pair = Paragraph::new(Line::from(vec![
            Span::styled(" $ ", self.theme.accent_style()),
            Span::styled(
                format!("{} → {}", self.state.base(), self.state.currency()),
                self.theme.title_style(),
            ),
        ]));
        frame.render_widget(pair, halves[0]);

        let tabs = Paragraph::new(PeriodTabs::new(self.state.period(), self.theme).line())
            .alignment(Alignment::Right);
        frame.render_widget(tabs, halves[1]);
    }

    fn render_plot(&self, frame: &mut Frame, area: Rect) {
        let points = self.state.points();
        let data: Vec<(f64, f64)> = points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.price))
            .collect();

        let (y_min, y_max) = self.state.bounds();
        let y_max = if y_max > y_min { y_max } else { y_min + 1.0 };
        let x_max = (data.len().saturating_sub(1) as f64).max(1.0);

        let cursor: Vec<(f64, f64)> = self
            .state
            .selected_point()
            .map(|(i, p)| vec![(i as f64, p.price)])
            .unwrap_or_default();

        let mut datasets = vec![Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(self.theme.accent))
            .data(&data)];
        if !cursor.is_empty() {
            datasets.push(
                Dataset::default()
                    .marker(Marker::Dot)
                    .graph_type(GraphType::Scatter)
                    .style(self.theme.highlight_style().fg(self.theme.fg))
                    .data(&cursor),
            );
        }

        // Dates replace numeric x labels
        let first = points.first().map(|p| p.label.clone()).unwrap_or_default();
        let last = points.last().map(|p| p.label.clone()).unwrap_or_default();

        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .style(self.theme.muted_style())
                    .bounds([0.0, x_max])
                    .labels(vec![Span::raw(first), Span::raw(last)]),
            )
            .y_axis(
                Axis::default()
                    .style(self.theme.muted_style())
                    .bounds([y_min, y_max])
                    .labels(vec![
                        Span::raw(format_price(y_min)),
                        Span::raw(format_price((y_min + y_max) / 2.0)),
                        Span::raw(format_price(y_max)),
                    ]),
            );

        frame.render_widget(chart, area);
    }

    fn render_readout(&self, frame: &mut Frame, area: Rect) {
        let Some((_, point)) = self.state.selected_point() else {
            return;
        };
        let line = Line::from(vec![
            Span::styled(
                format!("{:.4} {}", point.price, self.state.currency()),
                self.theme.title_style(),
            ),
            Span::styled(format!("  {}", point.label), self.theme.muted_style()),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }
}

/// Format a price for axis labels
pub fn format_price(value: f64) -> String {
    if value.abs() >= 100_000.0 {
        format!("{:.3e}", value)
    } else if value.abs() >= 100.0 {
        format!("{:.1}", value)
    } else if value.abs() >= 1.0 || value == 0.0 {
        format!("{:.3}", value)
    } else {
        format!("{:.4}", value)
    }
}
