//! Data layer for the exchange-rate API.
//!
//! Handles fetching symbols, conversions and rate history, and shaping
//! history into chart points.

mod client;
mod error;
mod models;
mod series;

pub use client::{HttpRatesProvider, RatesProvider, DEFAULT_API_HOST};
pub use error::ApiError;
pub use models::{default_currencies, ChartPoint, Currency, Period, RateSeries};
pub use series::{chart_points, fallback_points, price_bounds, SeriesSummary};
