//! Terminal User Interface components for fxboard.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub mod chart;
pub mod converter;
pub mod currency_picker;
mod help;
pub mod theme;
pub mod toast;
pub mod widgets;

pub use help::HelpOverlay;
pub use theme::Theme;

/// Create a centered rect for popup dialogs
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
