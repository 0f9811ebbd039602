//! Currency picker popup state and widget.
//!
//! Opened from the From/To selectors. Typing narrows the list by code or
//! name; Enter confirms the highlighted currency.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::theme::Theme;
use crate::data::Currency;

/// Which selector the picker will write back to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerTarget {
    From,
    To,
}

#[derive(Debug, Clone)]
pub struct PickerState {
    pub target: PickerTarget,
    filter: String,
    selected: usize,
}

impl PickerState {
    /// Open the picker with `current` highlighted
    pub fn open(target: PickerTarget, current: &str, currencies: &[Currency]) -> Self {
        let selected = currencies
            .iter()
            .position(|c| c.code == current)
            .unwrap_or(0);
        PickerState {
            target,
            filter: String::new(),
            selected,
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Currencies matching the filter, in list order
    pub fn matches<'a>(&self, currencies: &'a [Currency]) -> Vec<&'a Currency> {
        if self.filter.is_empty() {
            return currencies.iter().collect();
        }
        let needle = self.filter.to_lowercase();
        currencies
            .iter()
            .filter(|c| {
                c.code.to_lowercase().contains(&needle) || c.name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn input_char(&mut self, c: char) {
        self.filter.push(c);
        self.selected = 0;
    }

    pub fn backspace(&mut self) {
        self.filter.pop();
        self.selected = 0;
    }

    pub fn next(&mut self, currencies: &[Currency]) {
        let n = self.matches(currencies).len();
        if n > 0 {
            self.selected = (self.selected + 1) % n;
        }
    }

    pub fn prev(&mut self, currencies: &[Currency]) {
        let n = self.matches(currencies).len();
        if n > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(n - 1);
        }
    }

    /// Code of the highlighted currency, if anything matches
    pub fn selected_code(&self, currencies: &[Currency]) -> Option<String> {
        let matches = self.matches(currencies);
        matches
            .get(self.selected.min(matches.len().saturating_sub(1)))
            .map(|c| c.code.clone())
    }
}

/// Popup listing currencies for selection
pub struct CurrencyPicker<'a> {
    state: &'a PickerState,
    currencies: &'a [Currency],
    theme: &'a Theme,
}

impl<'a> CurrencyPicker<'a> {
    pub fn new(state: &'a PickerState, currencies: &'a [Currency], theme: &'a Theme) -> Self {
        CurrencyPicker {
            state,
            currencies,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = super::centered_rect(50, 70, area);
        frame.render_widget(Clear, popup);

        let title = match self.state.target {
            PickerTarget::From => " From currency ",
            PickerTarget::To => " To currency ",
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.focused_border_style())
            .title_style(self.theme.title_style())
            .style(self.theme.surface_style());
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(inner);

        let filter = Paragraph::new(Line::from(vec![
            Span::styled(" / ", self.theme.muted_style()),
            Span::styled(self.state.filter(), self.theme.normal_style()),
        ]));
        frame.render_widget(filter, chunks[0]);

        let matches = self.state.matches(self.currencies);
        if matches.is_empty() {
            let empty = Paragraph::new(" No matching currency").style(self.theme.muted_style());
            frame.render_widget(empty, chunks[1]);
            return;
        }

        let items: Vec<ListItem> = matches.iter().map(|c| ListItem::new(c.label())).collect();
        let list = List::new(items)
            .highlight_style(self.theme.highlight_style())
            .highlight_symbol("> ");

        let mut list_state = ListState::default();
        list_state.select(Some(self.state.selected.min(matches.len() - 1)));
        frame.render_stateful_widget(list, chunks[1], &mut list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::default_currencies;

    #[test]
    fn test_open_highlights_current() {
        let list = default_currencies();
        let state = PickerState::open(PickerTarget::To, "UZS", &list);
        assert_eq!(state.selected_code(&list).as_deref(), Some("UZS"));
    }

    #[test]
    fn test_filter_by_code_or_name() {
        let list = default_currencies();
        let mut state = PickerState::open(PickerTarget::From, "USD", &list);
        for c in "franc".chars() {
            state.input_char(c);
        }
        let codes: Vec<_> = state.matches(&list).iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["CHF"]);

        state.backspace();
        state.backspace();
        state.backspace();
        state.backspace();
        state.backspace();
        state.input_char('k');
        state.input_char('r');
        let codes: Vec<_> = state.matches(&list).iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["KRW"]);
    }

    #[test]
    fn test_navigation_wraps() {
        let list = default_currencies();
        let mut state = PickerState::open(PickerTarget::From, "USD", &list);
        state.prev(&list);
        assert_eq!(state.selected_code(&list).as_deref(), Some("TRY"));
        state.next(&list);
        assert_eq!(state.selected_code(&list).as_deref(), Some("USD"));
    }

    #[test]
    fn test_no_match_selects_nothing() {
        let list = default_currencies();
        let mut state = PickerState::open(PickerTarget::From, "USD", &list);
        state.input_char('z');
        state.input_char('z');
        assert!(state.selected_code(&list).is_none());
    }
}
