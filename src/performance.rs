//! Historical performance chart state.
//!
//! Tracks the charted currency pair and period, issues history requests
//! when either changes, and keeps the plotted points plus a cursor used to
//! inspect individual days.

use chrono::NaiveDate;

use crate::data::{
    chart_points, fallback_points, price_bounds, ApiError, ChartPoint, Period, RateSeries,
    SeriesSummary,
};
use crate::worker::FetchRequest;

#[derive(Debug)]
pub struct PerformanceState {
    base: String,
    currency: String,
    period: Period,
    loading: bool,
    points: Vec<ChartPoint>,
    cursor: Option<usize>,
    next_id: u64,
    in_flight: Option<u64>,
}

impl PerformanceState {
    /// Chart starts in the loading state until the first history arrives
    pub fn new(base: &str, currency: &str, period: Period) -> Self {
        PerformanceState {
            base: base.to_string(),
            currency: currency.to_string(),
            period,
            loading: true,
            points: Vec::new(),
            cursor: None,
            next_id: 0,
            in_flight: None,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    pub fn bounds(&self) -> (f64, f64) {
        price_bounds(&self.points)
    }

    pub fn summary(&self) -> Option<SeriesSummary> {
        SeriesSummary::from_points(&self.points)
    }

    /// Build the history request for the current pair and period, ending
    /// on `today`
    pub fn request(&mut self, today: NaiveDate) -> FetchRequest {
        self.next_id += 1;
        let id = self.next_id;
        self.in_flight = Some(id);
        self.loading = true;

        FetchRequest::History {
            id,
            start: self.period.start_date(today),
            end: today,
            base: self.base.clone(),
            symbol: self.currency.clone(),
        }
    }

    /// Switch the charted currency. Returns a new request if it changed.
    pub fn set_currency(&mut self, currency: &str, today: NaiveDate) -> Option<FetchRequest> {
        if self.currency == currency {
            return None;
        }
        self.currency = currency.to_string();
        Some(self.request(today))
    }

    /// Switch the period. Returns a new request if it changed.
    pub fn set_period(&mut self, period: Period, today: NaiveDate) -> Option<FetchRequest> {
        if self.period == period {
            return None;
        }
        self.period = period;
        Some(self.request(today))
    }

    /// Apply the worker's answer to history request `id`. Returns false if
    /// the answer was for a superseded request.
    pub fn apply_history(&mut self, id: u64, result: Result<RateSeries, ApiError>) -> bool {
        if self.in_flight != Some(id) {
            return false;
        }
        self.in_flight = None;
        self.loading = false;

        self.points = match result {
            Ok(series) => chart_points(&series, &self.currency),
            Err(_) => fallback_points(),
        };
        self.cursor = self.points.len().checked_sub(1);
        true
    }

    /// Point currently under the cursor
    pub fn selected_point(&self) -> Option<(usize, &ChartPoint)> {
        let idx = self.cursor?;
        self.points.get(idx).map(|p| (idx, p))
    }

    pub fn cursor_left(&mut self) {
        if let Some(idx) = self.cursor {
            self.cursor = Some(idx.saturating_sub(1));
        }
    }

    pub fn cursor_right(&mut self) {
        if let Some(idx) = self.cursor {
            if idx + 1 < self.points.len() {
                self.cursor = Some(idx + 1);
            }
        }
    }
}
