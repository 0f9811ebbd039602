//! Conversion form widget.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use super::theme::Theme;
use super::widgets::spinner_frame;
use crate::converter::{ConverterState, ResultDisplay};

/// Which form field has keyboard focus, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Amount,
    From,
    To,
}

/// Amount input, currency selectors, swap control and result box
pub struct ConverterPanel<'a> {
    state: &'a ConverterState,
    focus: Option<FormField>,
    theme: &'a Theme,
    tick: u64,
}

impl<'a> ConverterPanel<'a> {
    pub fn new(
        state: &'a ConverterState,
        focus: Option<FormField>,
        theme: &'a Theme,
        tick: u64,
    ) -> Self {
        ConverterPanel {
            state,
            focus,
            theme,
            tick,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let (border_style, title_style) = self.theme.panel_styles(self.focus.is_some());
        let block = Block::default()
            .title(" Currency Converter ")
            .borders(Borders::ALL)
            .border_style(border_style)
            .title_style(title_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let fields = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(12),    // Amount
                Constraint::Length(10), // From
                Constraint::Length(5),  // Swap
                Constraint::Length(10), // To
                Constraint::Min(18),    // Result
            ])
            .split(inner);

        let amount = if self.state.amount().is_empty() {
            Span::styled("0", self.theme.muted_style())
        } else {
            Span::styled(self.state.amount(), self.theme.title_style())
        };
        let mut amount_line = vec![amount];
        if self.focus == Some(FormField::Amount) {
            amount_line.push(Span::styled("▏", self.theme.accent_style()));
        }
        self.render_field(frame, fields[0], "Amount", Line::from(amount_line), FormField::Amount);

        self.render_field(
            frame,
            fields[1],
            "From",
            Line::from(format!("{} ▾", self.state.from())),
            FormField::From,
        );

        let swap = Paragraph::new("⇅")
            .alignment(Alignment::Center)
            .style(self.theme.muted_style())
            .block(self.field_block(None, false));
        frame.render_widget(swap, fields[2]);

        self.render_field(
            frame,
            fields[3],
            "To",
            Line::from(format!("{} ▾", self.state.to())),
            FormField::To,
        );

        let result = match self.state.display() {
            ResultDisplay::Loading => Line::from(Span::styled(
                spinner_frame(self.tick),
                self.theme.accent_style(),
            )),
            ResultDisplay::Error(e) => Line::from(Span::styled(e.to_string(), self.theme.error_style())),
            ResultDisplay::Value(v) => Line::from(Span::styled(
                format!("{} {}", v, self.state.to()),
                self.theme.accent_style(),
            )),
            ResultDisplay::Placeholder => Line::from(Span::styled(
                format!("0 {}", self.state.to()),
                self.theme.muted_style(),
            )),
        };
        let result = Paragraph::new(result)
            .alignment(Alignment::Center)
            .block(self.field_block(Some("Result"), false));
        frame.render_widget(result, fields[4]);
    }

    fn field_block(&self, title: Option<&'a str>, focused: bool) -> Block<'a> {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if focused {
                self.theme.focused_border_style()
            } else {
                Style::default().fg(self.theme.border)
            });
        if let Some(t) = title {
            block = block.title(Span::styled(t, self.theme.muted_style()));
        }
        block
    }

    fn render_field(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &'a str,
        content: Line<'a>,
        field: FormField,
    ) {
        let paragraph = Paragraph::new(content)
            .alignment(Alignment::Center)
            .block(self.field_block(Some(title), self.focus == Some(field)));
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use ratatui::{backend::TestBackend, Terminal};

    use super::*;

    fn render(state: &ConverterState) -> String {
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(80, 5)).unwrap();
        terminal
            .draw(|f| {
                ConverterPanel::new(state, Some(FormField::Amount), &theme, 0).render(f, f.area())
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_placeholder_shows_target() {
        let now = Instant::now();
        let state = ConverterState::new("25", "USD", "EUR", Duration::from_millis(500), now);
        let text = render(&state);
        assert!(text.contains("25"));
        assert!(text.contains("USD ▾"));
        assert!(text.contains("0 EUR"));
    }

    #[test]
    fn test_converted_value_shown() {
        let now = Instant::now();
        let mut state = ConverterState::new("2", "USD", "EUR", Duration::ZERO, now);
        let Some(crate::worker::FetchRequest::Convert { id, .. }) = state.tick(now) else {
            panic!("expected conversion request");
        };
        state.apply_result(id, Ok(1.84));
        let text = render(&state);
        assert!(text.contains("1.84 EUR"));
    }
}
