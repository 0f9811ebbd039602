//! Toast stack rendered in the bottom-right corner.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::theme::Theme;
use crate::toast::Toaster;

const TOAST_WIDTH: u16 = 42;
const TOAST_HEIGHT: u16 = 4;

pub struct ToastStack<'a> {
    toaster: &'a Toaster,
    theme: &'a Theme,
}

impl<'a> ToastStack<'a> {
    pub fn new(toaster: &'a Toaster, theme: &'a Theme) -> Self {
        ToastStack { toaster, theme }
    }

    /// Newest toast sits at the bottom, older ones stack upward
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let width = TOAST_WIDTH.min(area.width);
        let x = area.x + area.width - width;
        let mut bottom = area.y + area.height;

        for toast in self.toaster.visible().collect::<Vec<_>>().into_iter().rev() {
            if bottom < area.y + TOAST_HEIGHT {
                break;
            }
            let rect = Rect::new(x, bottom - TOAST_HEIGHT, width, TOAST_HEIGHT);
            bottom -= TOAST_HEIGHT;

            let mut lines = Vec::new();
            if let Some(ref title) = toast.props.title {
                lines.push(Line::from(Span::styled(title.as_str(), self.theme.title_style())));
            }
            if let Some(ref description) = toast.props.description {
                lines.push(Line::from(Span::styled(
                    description.as_str(),
                    self.theme.muted_style(),
                )));
            }

            let paragraph = Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(self.theme.toast_border_style(toast.props.variant))
                        .style(self.theme.surface_style()),
                );

            frame.render_widget(Clear, rect);
            frame.render_widget(paragraph, rect);
        }
    }
}
