//! Dated series containers for closing prices and their transforms.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::ops::Deref;

/// Policy for handling missing closes (absent, NaN or infinite).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingValuePolicy {
    /// Drop observations with missing values.
    #[default]
    Drop,
    /// Forward fill (use previous valid value); leading gaps are dropped.
    ForwardFill,
    /// Return error if missing values found.
    Error,
}

/// A series of finite values indexed by strictly increasing dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl DatedSeries {
    /// Create a series, validating ordering and finiteness.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::InvalidSeries(format!(
                "{} dates but {} values",
                dates.len(),
                values.len()
            )));
        }

        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(ForecastError::InvalidSeries(format!(
                    "dates must be strictly increasing ({} follows {})",
                    pair[1], pair[0]
                )));
            }
        }

        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidSeries(format!(
                "non-finite value at {}",
                dates[pos]
            )));
        }

        Ok(Self { dates, values })
    }

    /// Create a series from `(date, value)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let (dates, values) = pairs.into_iter().unzip();
        Self::new(dates, values)
    }

    /// Build from parts whose invariants the caller already upholds.
    pub(crate) fn from_parts(dates: Vec<NaiveDate>, values: Vec<f64>) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        Self { dates, values }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Iterate over `(date, value)` pairs in date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Observations with `start <= date < end`.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Self {
        let lo = self.dates.partition_point(|d| *d < start);
        let hi = self.dates.partition_point(|d| *d < end).max(lo);
        Self::from_parts(self.dates[lo..hi].to_vec(), self.values[lo..hi].to_vec())
    }
}

/// Closing prices: a [`DatedSeries`] whose values are all strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceSeries(DatedSeries);

impl PriceSeries {
    /// Create a price series from aligned dates and closes.
    pub fn new(dates: Vec<NaiveDate>, closes: Vec<f64>) -> Result<Self> {
        Self::try_from(DatedSeries::new(dates, closes)?)
    }

    /// Create a price series from `(date, close)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::try_from(DatedSeries::from_pairs(pairs)?)
    }

    /// Create a price series from raw rows that may have missing closes.
    ///
    /// A close is missing when it is `None`, NaN or infinite.
    pub fn from_observations<I>(observations: I, policy: MissingValuePolicy) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
    {
        let mut dates = Vec::new();
        let mut closes = Vec::new();
        let mut last_valid: Option<f64> = None;

        for (date, close) in observations {
            match close.filter(|c| c.is_finite()) {
                Some(c) => {
                    last_valid = Some(c);
                    dates.push(date);
                    closes.push(c);
                }
                None => match policy {
                    MissingValuePolicy::Drop => {}
                    MissingValuePolicy::ForwardFill => {
                        if let Some(c) = last_valid {
                            dates.push(date);
                            closes.push(c);
                        }
                    }
                    MissingValuePolicy::Error => {
                        return Err(ForecastError::InvalidSeries(format!(
                            "missing close on {date}"
                        )));
                    }
                },
            }
        }

        Self::new(dates, closes)
    }

    pub fn as_series(&self) -> &DatedSeries {
        &self.0
    }

    pub fn closes(&self) -> &[f64] {
        self.0.values()
    }

    /// Prices with `start <= date < end`.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self(self.0.between(start, end))
    }
}

impl TryFrom<DatedSeries> for PriceSeries {
    type Error = ForecastError;

    fn try_from(series: DatedSeries) -> Result<Self> {
        if let Some((date, close)) = series.iter().find(|(_, v)| *v <= 0.0) {
            return Err(ForecastError::InvalidSeries(format!(
                "close must be positive, got {close} on {date}"
            )));
        }
        Ok(Self(series))
    }
}

impl Deref for PriceSeries {
    type Target = DatedSeries;

    fn deref(&self) -> &DatedSeries {
        &self.0
    }
}

impl AsRef<DatedSeries> for PriceSeries {
    fn as_ref(&self) -> &DatedSeries {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    #[test]
    fn new_rejects_unsorted_dates() {
        let result = DatedSeries::new(vec![day(4), day(3)], vec![1.0, 2.0]);
        assert!(matches!(result, Err(ForecastError::InvalidSeries(_))));
    }

    #[test]
    fn new_rejects_duplicate_dates() {
        let result = DatedSeries::new(vec![day(3), day(3)], vec![1.0, 2.0]);
        assert!(matches!(result, Err(ForecastError::InvalidSeries(_))));
    }

    #[test]
    fn new_rejects_length_mismatch() {
        let result = DatedSeries::new(vec![day(3), day(4)], vec![1.0]);
        assert!(matches!(result, Err(ForecastError::InvalidSeries(_))));
    }

    #[test]
    fn new_rejects_nan() {
        let result = DatedSeries::new(vec![day(3), day(4)], vec![1.0, f64::NAN]);
        assert!(matches!(result, Err(ForecastError::InvalidSeries(_))));
    }

    #[test]
    fn dated_series_allows_negative_values() {
        let series = DatedSeries::new(vec![day(3), day(4)], vec![2.0, -1.0]).unwrap();
        assert_eq!(series.values(), &[2.0, -1.0]);
    }

    #[test]
    fn price_series_rejects_non_positive_close() {
        let result = PriceSeries::new(vec![day(3), day(4)], vec![10.0, 0.0]);
        assert!(matches!(result, Err(ForecastError::InvalidSeries(_))));
    }

    #[test]
    fn accessors() {
        let prices = PriceSeries::from_pairs([(day(3), 10.0), (day(4), 12.0), (day(5), 11.0)])
            .unwrap();
        assert_eq!(prices.len(), 3);
        assert_eq!(prices.first_date(), Some(day(3)));
        assert_eq!(prices.last_date(), Some(day(5)));
        assert_eq!(prices.last_value(), Some(11.0));
        assert_eq!(prices.closes(), &[10.0, 12.0, 11.0]);
        let pairs: Vec<_> = prices.iter().collect();
        assert_eq!(pairs[1], (day(4), 12.0));
    }

    #[test]
    fn between_is_end_exclusive() {
        let prices = PriceSeries::from_pairs((3..=7).map(|d| (day(d), d as f64))).unwrap();
        let window = prices.between(day(4), day(6));
        assert_eq!(window.dates(), &[day(4), day(5)]);

        let empty = prices.between(day(8), day(10));
        assert!(empty.is_empty());

        let inverted = prices.between(day(6), day(4));
        assert!(inverted.is_empty());
    }

    #[test]
    fn missing_values_are_dropped_by_default() {
        let rows = vec![
            (day(3), Some(10.0)),
            (day(4), None),
            (day(5), Some(f64::NAN)),
            (day(6), Some(11.0)),
        ];
        let prices = PriceSeries::from_observations(rows, MissingValuePolicy::default()).unwrap();
        assert_eq!(prices.dates(), &[day(3), day(6)]);
    }

    #[test]
    fn missing_values_forward_fill() {
        let rows = vec![
            (day(3), None),
            (day(4), Some(10.0)),
            (day(5), None),
            (day(6), Some(11.0)),
        ];
        let prices = PriceSeries::from_observations(rows, MissingValuePolicy::ForwardFill).unwrap();
        assert_eq!(prices.dates(), &[day(4), day(5), day(6)]);
        assert_eq!(prices.closes(), &[10.0, 10.0, 11.0]);
    }

    #[test]
    fn missing_values_error_policy() {
        let rows = vec![(day(3), Some(10.0)), (day(4), None)];
        let result = PriceSeries::from_observations(rows, MissingValuePolicy::Error);
        assert!(matches!(result, Err(ForecastError::InvalidSeries(_))));
    }
}
