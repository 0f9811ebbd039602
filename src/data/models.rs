//! Data models for currencies, chart periods and rate history.

use std::collections::BTreeMap;

use chrono::{Days, Months, NaiveDate};

/// A currency the exchange-rate API knows about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    pub code: String,
    pub name: String,
}

impl Currency {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Currency {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Label shown in selectors, e.g. "USD - US Dollar"
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}

/// Currencies offered before the symbol list has been fetched
pub fn default_currencies() -> Vec<Currency> {
    [
        ("USD", "US Dollar"),
        ("EUR", "Euro"),
        ("GBP", "British Pound"),
        ("JPY", "Japanese Yen"),
        ("CAD", "Canadian Dollar"),
        ("AUD", "Australian Dollar"),
        ("CHF", "Swiss Franc"),
        ("CNY", "Chinese Yuan"),
        ("RUB", "Russian Ruble"),
        ("UZS", "Uzbek Som"),
        ("KZT", "Kazakhstani Tenge"),
        ("KRW", "South Korean Won"),
        ("SGD", "Singapore Dollar"),
        ("INR", "Indian Rupee"),
        ("TRY", "Turkish Lira"),
    ]
    .into_iter()
    .map(|(code, name)| Currency::new(code, name))
    .collect()
}

/// Look-back window of the performance chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    OneDay,
    OneMonth,
    ThreeMonths,
    SixMonths,
    #[default]
    OneYear,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::OneDay,
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Period::OneDay => "1D",
            Period::OneMonth => "1M",
            Period::ThreeMonths => "3M",
            Period::SixMonths => "6M",
            Period::OneYear => "1Y",
        }
    }

    /// Parse a period label such as "3M" (case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        Period::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(label.trim()))
    }

    pub fn index(self) -> usize {
        Period::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Period::ALL[(self.index() + 1) % Period::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Period::ALL[(self.index() + Period::ALL.len() - 1) % Period::ALL.len()]
    }

    /// First day of the window ending at `end`.
    ///
    /// Month arithmetic clamps to the last day of the target month
    /// (e.g. 31 March minus one month is 29 February in a leap year).
    pub fn start_date(self, end: NaiveDate) -> NaiveDate {
        let start = match self {
            Period::OneDay => end.checked_sub_days(Days::new(1)),
            Period::OneMonth => end.checked_sub_months(Months::new(1)),
            Period::ThreeMonths => end.checked_sub_months(Months::new(3)),
            Period::SixMonths => end.checked_sub_months(Months::new(6)),
            Period::OneYear => end.checked_sub_months(Months::new(12)),
        };
        start.unwrap_or(end)
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Daily rates keyed by date, as returned by the timeseries endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateSeries {
    pub base: String,
    pub rates: BTreeMap<NaiveDate, BTreeMap<String, f64>>,
}

/// A single plotted point of the performance chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// `None` for placeholder points
    pub date: Option<NaiveDate>,
    pub label: String,
    pub price: f64,
}
