//! Pre-loaded series held in memory.

use super::{check_range, SeriesProvider};
use crate::core::PriceSeries;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Serves series registered up front, filtered to the requested range.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    series: HashMap<String, PriceSeries>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `series` under `ticker`, replacing any previous entry.
    pub fn insert(&mut self, ticker: impl Into<String>, series: PriceSeries) {
        self.series.insert(ticker.into(), series);
    }

    pub fn with_series(mut self, ticker: impl Into<String>, series: PriceSeries) -> Self {
        self.insert(ticker, series);
        self
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }
}

impl SeriesProvider for InMemoryProvider {
    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        check_range(start, end)?;
        let series = self
            .series
            .get(ticker)
            .ok_or_else(|| ForecastError::unavailable(ticker, "unknown ticker"))?;

        let window = series.between(start, end);
        if window.is_empty() {
            return Err(ForecastError::unavailable(
                ticker,
                format!("no rows in {start} .. {end}"),
            ));
        }
        Ok(window)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    fn provider() -> InMemoryProvider {
        let series =
            PriceSeries::from_pairs([(date(3), 10.0), (date(4), 11.0), (date(5), 12.0)]).unwrap();
        InMemoryProvider::new().with_series("TCS.NS", series)
    }

    #[test]
    fn filters_to_half_open_range() {
        let series = provider().fetch("TCS.NS", date(4), date(5)).unwrap();
        assert_eq!(series.dates(), &[date(4)]);
        assert_eq!(series.closes(), &[11.0]);
    }

    #[test]
    fn unknown_ticker_is_unavailable() {
        let err = provider().fetch("INFY.NS", date(1), date(30)).unwrap_err();
        assert_eq!(
            err,
            ForecastError::DataUnavailable {
                ticker: "INFY.NS".to_string(),
                reason: "unknown ticker".to_string(),
            }
        );
    }

    #[test]
    fn empty_range_is_unavailable() {
        assert!(matches!(
            provider().fetch("TCS.NS", date(10), date(20)),
            Err(ForecastError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn lists_registered_tickers() {
        assert_eq!(provider().tickers().collect::<Vec<_>>(), vec!["TCS.NS"]);
    }
}
