//! Main application logic and TUI event loop.

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    Terminal,
};

use crate::cli::AppConfig;
use crate::converter::{ConvertOutcome, ConverterState};
use crate::data::{HttpRatesProvider, Period, RatesProvider};
use crate::performance::PerformanceState;
use crate::toast::{ToastProps, Toaster};
use crate::ui::{
    chart::{format_price, PerformanceChart},
    converter::{ConverterPanel, FormField},
    currency_picker::{CurrencyPicker, PickerState, PickerTarget},
    toast::ToastStack,
    widgets::{Card, CardRow, StatusBar},
    HelpOverlay, Theme,
};
use crate::worker::{FetchRequest, FetchResponse, FetchWorker};

/// Upper bound on how long the loop blocks waiting for input
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Which panel is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPanel {
    Amount,
    From,
    To,
    Chart,
}

impl FocusedPanel {
    fn next(self) -> Self {
        match self {
            FocusedPanel::Amount => FocusedPanel::From,
            FocusedPanel::From => FocusedPanel::To,
            FocusedPanel::To => FocusedPanel::Chart,
            FocusedPanel::Chart => FocusedPanel::Amount,
        }
    }

    fn prev(self) -> Self {
        match self {
            FocusedPanel::Amount => FocusedPanel::Chart,
            FocusedPanel::From => FocusedPanel::Amount,
            FocusedPanel::To => FocusedPanel::From,
            FocusedPanel::Chart => FocusedPanel::To,
        }
    }

    fn form_field(self) -> Option<FormField> {
        match self {
            FocusedPanel::Amount => Some(FormField::Amount),
            FocusedPanel::From => Some(FormField::From),
            FocusedPanel::To => Some(FormField::To),
            FocusedPanel::Chart => None,
        }
    }
}

/// Application state
pub struct App {
    theme: Theme,
    worker: FetchWorker,

    // Components
    converter: ConverterState,
    chart: PerformanceState,
    toaster: Toaster,

    // UI State
    focused: FocusedPanel,
    picker: Option<PickerState>,
    show_help: bool,
    tick: u64,

    should_quit: bool,

    // Error message to display (non-fatal)
    error_message: Option<String>,
}

impl App {
    /// Create the app and queue the initial symbol and history fetches
    pub fn new(config: &AppConfig, provider: Box<dyn RatesProvider>, now: Instant) -> Result<Self> {
        let worker = FetchWorker::spawn(provider)?;

        let converter =
            ConverterState::new(&config.amount, &config.from, &config.to, config.debounce, now);
        let mut chart =
            PerformanceState::new(&config.chart_base, &config.chart_currency, config.period);

        worker.send(FetchRequest::Symbols)?;
        worker.send(chart.request(today()))?;

        Ok(App {
            theme: Theme::named(&config.theme),
            worker,
            converter,
            chart,
            toaster: Toaster::new(),
            focused: FocusedPanel::Amount,
            picker: None,
            show_help: false,
            tick: 0,
            should_quit: false,
            error_message: None,
        })
    }

    /// Set an error message to display (non-fatal)
    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    /// The form reported a new source currency; the chart follows it
    fn on_currency_change(&mut self, code: String) -> Result<()> {
        if let Some(request) = self.chart.set_currency(&code, today()) {
            self.worker.send(request)?;
        }
        Ok(())
    }

    fn set_period(&mut self, period: Period) -> Result<()> {
        if let Some(request) = self.chart.set_period(period, today()) {
            self.worker.send(request)?;
        }
        Ok(())
    }

    fn refresh(&mut self, now: Instant) -> Result<()> {
        self.error_message = None;
        self.converter.refresh(now);
        self.worker.send(self.chart.request(today()))?;
        Ok(())
    }

    /// Advance timers: fire a due conversion and expire toasts
    pub fn on_tick(&mut self, now: Instant) -> Result<()> {
        self.tick = self.tick.wrapping_add(1);
        if let Some(request) = self.converter.tick(now) {
            self.worker.send(request)?;
        }
        self.toaster.prune(now);
        Ok(())
    }

    /// Apply everything the fetch thread has sent back
    pub fn process_responses(&mut self, now: Instant) {
        for response in self.worker.poll() {
            match response {
                FetchResponse::Symbols(Ok(currencies)) => {
                    tracing::info!(count = currencies.len(), "currency list loaded");
                    self.converter.set_currencies(currencies);
                }
                FetchResponse::Symbols(Err(e)) => {
                    self.set_error(format!("Could not load currency list: {e}"));
                }
                FetchResponse::Converted { id, result } => {
                    if let ConvertOutcome::Failed(reason) = self.converter.apply_result(id, result) {
                        self.toaster
                            .toast(ToastProps::error("Conversion failed", reason), now);
                    }
                }
                FetchResponse::History { id, symbol, result } => {
                    let failure = result.as_ref().err().map(|e| e.to_string());
                    if self.chart.apply_history(id, result) {
                        if let Some(reason) = failure {
                            self.toaster.toast(
                                ToastProps::error(format!("No history for {symbol}"), reason),
                                now,
                            );
                        }
                    }
                }
            }
        }
    }

    /// How long the loop may block before something needs attention
    fn poll_timeout(&self, now: Instant) -> Duration {
        self.converter
            .pending_in(now)
            .map(|d| d.min(FRAME_INTERVAL))
            .unwrap_or(FRAME_INTERVAL)
    }

    /// Handle keyboard input
    fn handle_input(&mut self, key: KeyCode, modifiers: KeyModifiers, now: Instant) -> Result<()> {
        if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        if self.picker.is_some() {
            return self.handle_picker_input(key, now);
        }

        // Global shortcuts
        match key {
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.show_help = !self.show_help;
                return Ok(());
            }
            KeyCode::Esc if self.show_help => {
                self.show_help = false;
                return Ok(());
            }
            _ => {}
        }

        // If help is shown, don't process other keys
        if self.show_help {
            return Ok(());
        }

        match key {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return Ok(());
            }
            KeyCode::Char('r') => return self.refresh(now),
            KeyCode::Char('x') => {
                let code = self.converter.swap(now);
                return self.on_currency_change(code);
            }
            KeyCode::Char('[') => return self.set_period(self.chart.period().prev()),
            KeyCode::Char(']') => return self.set_period(self.chart.period().next()),
            KeyCode::Tab => {
                self.focused = self.focused.next();
                return Ok(());
            }
            KeyCode::BackTab => {
                self.focused = self.focused.prev();
                return Ok(());
            }
            _ => {}
        }

        match self.focused {
            FocusedPanel::Amount => self.handle_amount_input(key, now),
            FocusedPanel::From => self.handle_selector_input(PickerTarget::From, key, now)?,
            FocusedPanel::To => self.handle_selector_input(PickerTarget::To, key, now)?,
            FocusedPanel::Chart => self.handle_chart_input(key)?,
        }

        Ok(())
    }

    fn handle_amount_input(&mut self, key: KeyCode, now: Instant) {
        match key {
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                self.converter.input_char(c, now);
            }
            KeyCode::Backspace => self.converter.backspace(now),
            KeyCode::Delete => self.converter.clear_amount(now),
            KeyCode::Enter | KeyCode::Right => self.focused = FocusedPanel::From,
            _ => {}
        }
    }

    fn handle_selector_input(&mut self, target: PickerTarget, key: KeyCode, now: Instant) -> Result<()> {
        let current = match target {
            PickerTarget::From => self.converter.from(),
            PickerTarget::To => self.converter.to(),
        };

        match key {
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.picker = Some(PickerState::open(target, current, self.converter.currencies()));
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Up | KeyCode::Char('k') => {
                let currencies = self.converter.currencies();
                if currencies.is_empty() {
                    return Ok(());
                }
                let n = currencies.len();
                let idx = currencies.iter().position(|c| c.code == current);
                let forward = matches!(key, KeyCode::Down | KeyCode::Char('j'));
                let next = match (idx, forward) {
                    (Some(i), true) => (i + 1) % n,
                    (Some(i), false) => i.checked_sub(1).unwrap_or(n - 1),
                    (None, _) => 0,
                };
                let code = currencies[next].code.clone();
                self.select_currency(target, &code, now)?;
            }
            KeyCode::Esc => self.focused = FocusedPanel::Amount,
            _ => {}
        }
        Ok(())
    }

    fn select_currency(&mut self, target: PickerTarget, code: &str, now: Instant) -> Result<()> {
        match target {
            PickerTarget::From => {
                let code = self.converter.set_from(code, now);
                self.on_currency_change(code)
            }
            PickerTarget::To => {
                self.converter.set_to(code, now);
                Ok(())
            }
        }
    }

    fn handle_picker_input(&mut self, key: KeyCode, now: Instant) -> Result<()> {
        let Some(picker) = self.picker.as_mut() else {
            return Ok(());
        };
        let currencies = self.converter.currencies();

        match key {
            KeyCode::Esc => self.picker = None,
            KeyCode::Down => picker.next(currencies),
            KeyCode::Up => picker.prev(currencies),
            KeyCode::Backspace => picker.backspace(),
            KeyCode::Char(c) if c.is_alphanumeric() || c == ' ' => picker.input_char(c),
            KeyCode::Enter => {
                let target = picker.target;
                let chosen = picker.selected_code(currencies);
                self.picker = None;
                if let Some(code) = chosen {
                    self.select_currency(target, &code, now)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_chart_input(&mut self, key: KeyCode) -> Result<()> {
        match key {
            KeyCode::Char(c @ '1'..='5') => {
                let idx = (c as usize) - ('1' as usize);
                self.set_period(Period::ALL[idx])?;
            }
            KeyCode::Left | KeyCode::Char('h') => self.chart.cursor_left(),
            KeyCode::Right | KeyCode::Char('l') => self.chart.cursor_right(),
            KeyCode::Esc => self.focused = FocusedPanel::Amount,
            _ => {}
        }
        Ok(())
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let size = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // Converter
                Constraint::Min(10),   // Chart
                Constraint::Length(4), // Summary cards
                Constraint::Length(2), // Status bar
            ])
            .split(size);

        ConverterPanel::new(
            &self.converter,
            self.focused.form_field(),
            &self.theme,
            self.tick,
        )
        .render(frame, chunks[0]);

        PerformanceChart::new(&self.chart, &self.theme, self.tick).render(
            frame,
            chunks[1],
            self.focused == FocusedPanel::Chart,
        );

        self.render_summary(frame, chunks[2]);

        let pair = format!("{} → {}", self.converter.from(), self.converter.to());
        StatusBar::new(Some(pair.as_str()), self.error_message.as_deref(), &self.theme)
            .render(frame, chunks[3]);

        if let Some(ref picker) = self.picker {
            CurrencyPicker::new(picker, self.converter.currencies(), &self.theme).render(frame, size);
        }

        ToastStack::new(&self.toaster, &self.theme).render(frame, chunks[1]);

        if self.show_help {
            HelpOverlay::new(&self.theme).render(frame, size);
        }
    }

    fn render_summary(&self, frame: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        let Some(summary) = self.chart.summary().filter(|_| !self.chart.is_loading()) else {
            return;
        };

        let value = |v: f64| Line::from(Span::styled(format_price(v), self.theme.title_style()));
        let change = summary.change();
        let change_text = match summary.change_percent() {
            Some(pct) => format!("{:+.4} ({:+.2}%)", change, pct),
            None => format!("{:+.4}", change),
        };

        let period = format!("Change ({})", self.chart.period());
        CardRow::new(vec![
            Card::new("Last", value(summary.last), &self.theme),
            Card::new("High", value(summary.high), &self.theme),
            Card::new("Low", value(summary.low), &self.theme),
            Card::new(
                &period,
                Line::from(Span::styled(change_text, self.theme.change_style(change))),
                &self.theme,
            ),
        ])
        .render(frame, area);
    }
}

/// Today's date in UTC, the end of every history window
fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Restore terminal to normal state
fn restore_terminal() {
    // Best effort cleanup - ignore errors since we may be in a panic
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Run the TUI application
pub fn run(config: AppConfig) -> Result<()> {
    if config.api.api_key.is_none() {
        tracing::warn!("no API key configured; requests will fail");
    }
    let provider = HttpRatesProvider::new(config.api.api_key.clone(), config.api.host.clone())
        .context("Failed to build HTTP client")?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        restore_terminal();
        return Err(e).context("Failed to setup terminal");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(t) => t,
        Err(e) => {
            restore_terminal();
            return Err(e).context("Failed to create terminal");
        }
    };

    // Create app - if this fails, restore terminal first
    let mut app = match App::new(&config, Box::new(provider), Instant::now()) {
        Ok(a) => a,
        Err(e) => {
            restore_terminal();
            return Err(e).context("Failed to initialize application");
        }
    };
    tracing::info!(from = %config.from, to = %config.to, "dashboard started");

    let result = run_main_loop(&mut terminal, &mut app);

    // Always restore terminal, regardless of result
    restore_terminal();
    terminal.show_cursor().ok();

    tracing::info!("dashboard stopped");
    result
}

/// Main application loop
fn run_main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        let now = Instant::now();
        app.process_responses(now);
        if let Err(e) = app.on_tick(now) {
            app.set_error(format!("Fetch error: {e}"));
        }

        terminal.draw(|f| app.render(f))?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Err(e) = app.handle_input(key.code, key.modifiers, Instant::now()) {
                        app.set_error(format!("Input error: {e}"));
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
