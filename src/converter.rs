//! Currency conversion form state.
//!
//! Owns the amount being typed, the source and target currencies and the
//! latest conversion result. Edits arm a debounce timer; when it fires the
//! form produces a `FetchRequest` for the worker thread.

use std::sync::LazyLock;
use std::time::{Duration, Instant};

use regex::{Regex, RegexBuilder};

use crate::data::{default_currencies, ApiError, Currency};
use crate::debounce::Debouncer;
use crate::worker::FetchRequest;

/// Message shown in place of the result when a conversion fails
pub const CONVERSION_FAILED: &str = "Conversion failed";

/// Digits with at most one decimal point, ASCII only
static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"^\d*\.?\d*$")
        .unicode(false)
        .build()
        .expect("Invalid amount pattern")
});

/// Whether `value` is an acceptable amount text: empty, or digits with at
/// most one decimal point
pub fn is_valid_amount(value: &str) -> bool {
    AMOUNT_RE.is_match(value)
}

/// Parse amount text into a convertible positive number
pub fn parse_amount(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// What the result box should show
#[derive(Debug, Clone, PartialEq)]
pub enum ResultDisplay<'a> {
    Loading,
    Error(&'a str),
    Value(&'a str),
    Placeholder,
}

/// Outcome of applying a worker response to the form
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertOutcome {
    /// Response belonged to a superseded request and was dropped
    Stale,
    Converted,
    Failed(String),
}

#[derive(Debug)]
pub struct ConverterState {
    amount: String,
    from: String,
    to: String,
    converted: Option<String>,
    loading: bool,
    error: Option<String>,
    currencies: Vec<Currency>,
    debounce: Debouncer,
    next_id: u64,
    in_flight: Option<u64>,
}

impl ConverterState {
    /// Create the form and arm the initial conversion
    pub fn new(amount: &str, from: &str, to: &str, delay: Duration, now: Instant) -> Self {
        let amount = if is_valid_amount(amount) {
            amount.to_string()
        } else {
            tracing::warn!(%amount, "ignoring invalid initial amount");
            String::new()
        };

        let mut state = ConverterState {
            amount,
            from: from.to_string(),
            to: to.to_string(),
            converted: None,
            loading: false,
            error: None,
            currencies: default_currencies(),
            debounce: Debouncer::new(delay),
            next_id: 0,
            in_flight: None,
        };
        state.debounce.schedule(now);
        state
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    #[allow(dead_code)] // Used in tests
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replace the amount text. Rejected (returns false) unless it is a
    /// valid amount; a rejected edit leaves the form untouched.
    pub fn set_amount(&mut self, value: &str, now: Instant) -> bool {
        if !is_valid_amount(value) {
            return false;
        }
        if value != self.amount {
            self.amount = value.to_string();
            self.debounce.schedule(now);
        }
        true
    }

    /// Append a typed character to the amount
    pub fn input_char(&mut self, c: char, now: Instant) -> bool {
        let mut next = self.amount.clone();
        next.push(c);
        self.set_amount(&next, now)
    }

    pub fn backspace(&mut self, now: Instant) {
        let mut next = self.amount.clone();
        if next.pop().is_some() {
            self.set_amount(&next, now);
        }
    }

    pub fn clear_amount(&mut self, now: Instant) {
        self.set_amount("", now);
    }

    /// Change the source currency. Returns the code the page shell should
    /// now chart.
    pub fn set_from(&mut self, code: &str, now: Instant) -> String {
        if self.from != code {
            self.from = code.to_string();
            self.debounce.schedule(now);
        }
        self.from.clone()
    }

    pub fn set_to(&mut self, code: &str, now: Instant) {
        if self.to != code {
            self.to = code.to_string();
            self.debounce.schedule(now);
        }
    }

    /// Exchange source and target. Returns the new source currency for the
    /// page shell.
    pub fn swap(&mut self, now: Instant) -> String {
        std::mem::swap(&mut self.from, &mut self.to);
        self.debounce.schedule(now);
        self.from.clone()
    }

    /// Re-run the conversion without waiting for an edit
    pub fn refresh(&mut self, now: Instant) {
        self.debounce.schedule(now);
    }

    /// Time left before a pending conversion fires
    pub fn pending_in(&self, now: Instant) -> Option<Duration> {
        self.debounce.remaining(now)
    }

    /// Advance the debounce timer. Returns a request when a conversion
    /// should be sent.
    pub fn tick(&mut self, now: Instant) -> Option<FetchRequest> {
        if !self.debounce.fire_if_due(now) {
            return None;
        }

        let Some(amount) = parse_amount(&self.amount) else {
            // Nothing to convert; drop whatever is in flight
            self.converted = None;
            self.error = None;
            self.loading = false;
            self.in_flight = None;
            return None;
        };

        self.next_id += 1;
        let id = self.next_id;
        self.in_flight = Some(id);
        self.loading = true;
        self.error = None;

        tracing::debug!(id, from = %self.from, to = %self.to, amount, "conversion scheduled");

        Some(FetchRequest::Convert {
            id,
            from: self.from.clone(),
            to: self.to.clone(),
            amount,
        })
    }

    /// Apply the worker's answer to conversion `id`
    pub fn apply_result(&mut self, id: u64, result: Result<f64, ApiError>) -> ConvertOutcome {
        if self.in_flight != Some(id) {
            return ConvertOutcome::Stale;
        }
        self.in_flight = None;
        self.loading = false;

        match result {
            Ok(value) => {
                self.converted = Some(format!("{value:.2}"));
                self.error = None;
                ConvertOutcome::Converted
            }
            Err(e) => {
                self.converted = None;
                self.error = Some(CONVERSION_FAILED.to_string());
                ConvertOutcome::Failed(e.to_string())
            }
        }
    }

    /// Replace the selectable currencies with the API's symbol list
    pub fn set_currencies(&mut self, currencies: Vec<Currency>) {
        if currencies.is_empty() {
            return;
        }
        self.currencies = currencies;
    }

    pub fn display(&self) -> ResultDisplay<'_> {
        if self.loading {
            ResultDisplay::Loading
        } else if let Some(ref e) = self.error {
            ResultDisplay::Error(e)
        } else if let Some(ref v) = self.converted {
            ResultDisplay::Value(v)
        } else {
            ResultDisplay::Placeholder
        }
    }
}
