//! Help overlay widget showing keyboard shortcuts.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::theme::Theme;

const DESCRIPTION: &str =
    "Convert amounts between currencies and chart how the base currency has moved against the selected currency.";

/// Help overlay showing all keyboard shortcuts
pub struct HelpOverlay<'a> {
    theme: &'a Theme,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        HelpOverlay { theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = super::centered_rect(65, 80, area);

        frame.render_widget(Clear, popup_area);

        let shortcuts = [
            ("Navigation", vec![
                ("Tab", "Cycle focus: amount, from, to, chart"),
                ("Shift+Tab", "Cycle focus backwards"),
            ]),
            ("Converter", vec![
                ("0-9 / .", "Edit amount (amount field)"),
                ("Backspace", "Delete last digit"),
                ("Del", "Clear amount"),
                ("Enter / Space", "Open currency picker (from/to)"),
                ("j / k", "Next / previous currency (from/to)"),
                ("x", "Swap currencies"),
            ]),
            ("Chart", vec![
                ("1-5", "Select period 1D 1M 3M 6M 1Y (chart)"),
                ("[ / ]", "Previous / next period"),
                ("← / →", "Move cursor between days"),
            ]),
            ("General", vec![
                ("r", "Refetch conversion and history"),
                ("? / F1", "Toggle this help"),
                ("q / Ctrl+C", "Quit"),
            ]),
        ];

        let mut lines: Vec<Line> = Vec::new();

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {DESCRIPTION}"),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
        lines.push(Line::from(""));

        for (section, items) in shortcuts {
            lines.push(Line::from(Span::styled(
                format!("  {section} "),
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::UNDERLINED),
            )));
            lines.push(Line::from(""));

            for (key, desc) in items {
                lines.push(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(format!("{key:<16}"), Style::default().fg(self.theme.accent)),
                    Span::raw(desc),
                ]));
            }
            lines.push(Line::from(""));
        }

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(" fxboard Help ")
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style())
                    .title_style(self.theme.title_style())
                    .style(self.theme.surface_style()),
            )
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false })
            .style(self.theme.surface_style());

        frame.render_widget(paragraph, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;

    #[test]
    fn test_description_names_no_fixed_base() {
        assert!(DESCRIPTION.contains("base currency"));
        assert!(!DESCRIPTION.contains("dollar"));
    }

    #[test]
    fn test_renders_sections() {
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(120, 50)).unwrap();
        terminal
            .draw(|f| HelpOverlay::new(&theme).render(f, f.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("fxboard Help"));
        assert!(text.contains("Converter"));
    }
}
