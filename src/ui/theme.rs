//! Theme configuration for the TUI.

use ratatui::style::{Color, Modifier, Style};

use crate::toast::ToastVariant;

/// Color theme for the application
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub border: Color,
    pub title: Color,
    /// Positive values, the price line and focus accents
    pub accent: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            bg: Color::Reset,
            fg: Color::White,
            muted: Color::Gray,
            highlight_bg: Color::Rgb(42, 42, 42),
            highlight_fg: Color::White,
            border: Color::Rgb(64, 64, 64),
            title: Color::White,
            accent: Color::Rgb(134, 239, 172),
            error: Color::LightRed,
        }
    }
}

impl Theme {
    /// Build a theme by name. Unknown names fall back to the default.
    pub fn named(name: &str) -> Self {
        match name {
            // Plain ANSI colors for terminals without truecolor
            "basic" => Theme {
                highlight_bg: Color::DarkGray,
                border: Color::DarkGray,
                accent: Color::Green,
                error: Color::Red,
                ..Theme::default()
            },
            _ => Theme::default(),
        }
    }

    /// Base surface style used to paint widget backgrounds
    pub fn surface_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Convenience helper returning (border_style, title_style) for focus state
    pub fn panel_styles(&self, focused: bool) -> (Style, Style) {
        if focused {
            (self.focused_border_style(), self.focused_border_style())
        } else {
            (self.border_style(), self.dimmed_title_style())
        }
    }

    pub fn normal_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Get style for highlighted/selected items
    pub fn highlight_style(&self) -> Style {
        Style::default()
            .fg(self.highlight_fg)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Get style for focused panel borders (distinct from normal borders)
    pub fn focused_border_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for unfocused/dimmed titles
    pub fn dimmed_title_style(&self) -> Style {
        Style::default()
            .fg(self.muted)
            .add_modifier(Modifier::DIM)
    }

    /// Bold accent used for the converted amount and the price line
    pub fn accent_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Color for a signed change (up is accent, down is error)
    pub fn change_style(&self, change: f64) -> Style {
        if change < 0.0 {
            self.error_style()
        } else {
            Style::default().fg(self.accent)
        }
    }

    pub fn toast_border_style(&self, variant: ToastVariant) -> Style {
        match variant {
            ToastVariant::Default => self.border_style(),
            ToastVariant::Destructive => self.error_style().add_modifier(Modifier::BOLD),
        }
    }
}
