//! Sources of historical closing prices.
//!
//! A [`SeriesProvider`] returns the closes for a ticker over `[start, end)`.
//! Three providers are available:
//!
//! - [`SyntheticProvider`]: deterministic seeded random walk on business days
//! - [`InMemoryProvider`]: pre-loaded series, filtered to the range
//! - [`CsvProvider`]: `<dir>/<TICKER>.csv` files with `Date` and `Close` columns

mod file;
mod memory;
mod synthetic;

pub use file::CsvProvider;
pub use memory::InMemoryProvider;
pub use synthetic::SyntheticProvider;

use crate::core::PriceSeries;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;

/// Fetches closing prices for a ticker and date range.
///
/// Implementations fail with `DataUnavailable` when no rows exist for the
/// ticker and range, and with `InvalidParameter` when `start >= end`.
pub trait SeriesProvider: Send + Sync {
    /// Closes with `start <= date < end`, ascending by date.
    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries>;

    /// Short provider name used in logs.
    fn name(&self) -> &str;
}

pub(crate) fn check_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start >= end {
        return Err(ForecastError::InvalidParameter(format!(
            "start date {start} must be before end date {end}"
        )));
    }
    Ok(())
}
