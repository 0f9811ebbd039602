//! Client-side shaping of rate history for the performance chart.

use super::models::{ChartPoint, RateSeries};

/// Headroom applied below the lowest and above the highest price
const LOWER_MARGIN: f64 = 0.95;
const UPPER_MARGIN: f64 = 1.05;

/// Y-axis bounds used when there is nothing to plot
const EMPTY_BOUNDS: (f64, f64) = (0.0, 100.0);

/// Turn a timeseries response into chart points for `symbol`, oldest first.
///
/// Dates missing the symbol are plotted at 0.
pub fn chart_points(series: &RateSeries, symbol: &str) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = series
        .rates
        .iter()
        .map(|(date, rates)| ChartPoint {
            date: Some(*date),
            label: date.format("%b %-d").to_string(),
            price: rates.get(symbol).copied().unwrap_or(0.0),
        })
        .collect();

    points.sort_by_key(|p| p.date);
    points
}

/// Flat placeholder line shown after a failed history fetch
pub fn fallback_points() -> Vec<ChartPoint> {
    vec![
        ChartPoint {
            date: None,
            label: "Start".to_string(),
            price: 1.0,
        },
        ChartPoint {
            date: None,
            label: "End".to_string(),
            price: 1.0,
        },
    ]
}

/// Y-axis domain for a series: 5% below the minimum to 5% above the maximum
pub fn price_bounds(points: &[ChartPoint]) -> (f64, f64) {
    if points.is_empty() {
        return EMPTY_BOUNDS;
    }

    let (min, max) = points.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| {
        (lo.min(p.price), hi.max(p.price))
    });

    (min * LOWER_MARGIN, max * UPPER_MARGIN)
}

/// Headline figures for a plotted period
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub first: f64,
    pub last: f64,
    pub high: f64,
    pub low: f64,
}

impl SeriesSummary {
    pub fn from_points(points: &[ChartPoint]) -> Option<Self> {
        let first = points.first()?.price;
        let last = points.last()?.price;
        let (low, high) = points.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| {
            (lo.min(p.price), hi.max(p.price))
        });
        Some(SeriesSummary {
            first,
            last,
            high,
            low,
        })
    }

    pub fn change(&self) -> f64 {
        self.last - self.first
    }

    /// Relative change in percent; `None` when the period starts at zero
    pub fn change_percent(&self) -> Option<f64> {
        if self.first == 0.0 {
            None
        } else {
            Some(self.change() / self.first * 100.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;

    fn series(entries: &[(&str, Option<f64>)]) -> RateSeries {
        let mut rates = BTreeMap::new();
        for (date, rate) in entries {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
            let mut day = BTreeMap::new();
            if let Some(rate) = rate {
                day.insert("UZS".to_string(), *rate);
            }
            day.insert("EUR".to_string(), 0.9);
            rates.insert(date, day);
        }
        RateSeries {
            base: "USD".to_string(),
            rates,
        }
    }

    #[test]
    fn test_chart_points_sorted_and_labelled() {
        let s = series(&[
            ("2024-02-01", Some(12600.0)),
            ("2024-01-05", Some(12400.0)),
            ("2024-01-20", Some(12500.0)),
        ]);
        let points = chart_points(&s, "UZS");
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Jan 5", "Jan 20", "Feb 1"]);
        assert_eq!(points[0].price, 12400.0);
        assert_eq!(points[2].price, 12600.0);
    }

    #[test]
    fn test_missing_symbol_plots_zero() {
        let s = series(&[("2024-01-01", None), ("2024-01-02", Some(1.5))]);
        let points = chart_points(&s, "UZS");
        assert_eq!(points[0].price, 0.0);
        assert_eq!(points[1].price, 1.5);
    }

    #[test]
    fn test_price_bounds() {
        let s = series(&[("2024-01-01", Some(100.0)), ("2024-01-02", Some(200.0))]);
        let (lo, hi) = price_bounds(&chart_points(&s, "UZS"));
        assert!((lo - 95.0).abs() < 1e-9);
        assert!((hi - 210.0).abs() < 1e-9);
        assert_eq!(price_bounds(&[]), (0.0, 100.0));
    }

    #[test]
    fn test_fallback_is_flat() {
        let points = fallback_points();
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.price == 1.0 && p.date.is_none()));
        assert_eq!(points[0].label, "Start");
    }

    #[test]
    fn test_summary() {
        let s = series(&[
            ("2024-01-01", Some(10.0)),
            ("2024-01-02", Some(8.0)),
            ("2024-01-03", Some(12.0)),
        ]);
        let summary = SeriesSummary::from_points(&chart_points(&s, "UZS")).unwrap();
        assert_eq!(summary.high, 12.0);
        assert_eq!(summary.low, 8.0);
        assert_eq!(summary.change(), 2.0);
        assert_eq!(summary.change_percent(), Some(20.0));
        assert!(SeriesSummary::from_points(&[]).is_none());
    }
}
