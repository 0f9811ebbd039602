//! General-purpose UI widgets for the dashboard.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use super::theme::Theme;

const SPINNER_FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Braille spinner frame for the given animation tick
pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick % SPINNER_FRAMES.len() as u64) as usize]
}

/// A bordered card with a small title and a prominent value line
pub struct Card<'a> {
    title: &'a str,
    subtitle: Line<'a>,
    theme: &'a Theme,
}

impl<'a> Card<'a> {
    pub fn new(title: &'a str, subtitle: impl Into<Line<'a>>, theme: &'a Theme) -> Self {
        Card {
            title,
            subtitle: subtitle.into(),
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.border_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = vec![
            Line::from(Span::styled(self.title, self.theme.muted_style())),
            self.subtitle.clone(),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }
}

/// Lays out cards side by side in equal-width columns
pub struct CardRow<'a> {
    cards: Vec<Card<'a>>,
}

impl<'a> CardRow<'a> {
    pub fn new(cards: Vec<Card<'a>>) -> Self {
        CardRow { cards }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if self.cards.is_empty() {
            return;
        }
        let n = self.cards.len() as u32;
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(self.cards.iter().map(|_| Constraint::Ratio(1, n)))
            .split(area);

        for (card, column) in self.cards.iter().zip(columns.iter()) {
            card.render(frame, *column);
        }
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    pair: Option<&'a str>,
    error: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(pair: Option<&'a str>, error: Option<&'a str>, theme: &'a Theme) -> Self {
        StatusBar { pair, error, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let (text, style) = if let Some(e) = self.error {
            (format!("Error: {e}"), self.theme.error_style())
        } else {
            let text = match self.pair {
                Some(p) => format!("fxboard: {p} | [Tab] Focus [x] Swap [?] Help [q] Quit"),
                None => "fxboard | [?] Help [q] Quit".to_string(),
            };
            (text, self.theme.muted_style())
        };

        let paragraph = Paragraph::new(text)
            .style(style)
            .block(Block::default().borders(Borders::TOP).border_style(Style::default().fg(self.theme.border)));

        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_spinner_cycles() {
        assert_eq!(spinner_frame(0), spinner_frame(SPINNER_FRAMES.len() as u64));
        assert_ne!(spinner_frame(0), spinner_frame(1));
    }

    #[test]
    fn test_card_row_renders_every_card() {
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(60, 4)).unwrap();
        terminal
            .draw(|f| {
                CardRow::new(vec![
                    Card::new("High", "1.2345", &theme),
                    Card::new("Low", "0.9876", &theme),
                ])
                .render(f, f.area());
            })
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("High"));
        assert!(text.contains("0.9876"));
    }

    #[test]
    fn test_status_bar_prefers_error() {
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(60, 2)).unwrap();
        terminal
            .draw(|f| StatusBar::new(Some("USD/UZS"), Some("boom"), &theme).render(f, f.area()))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Error: boom"));
        assert!(!text.contains("USD/UZS"));
    }
}
