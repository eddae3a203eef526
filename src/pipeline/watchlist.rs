//! Stocks offered for analysis and the default history window.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// First day of the default history window.
pub const DEFAULT_START: NaiveDate = match NaiveDate::from_ymd_opt(2024, 1, 1) {
    Some(date) => date,
    None => panic!("invalid default start date"),
};

/// End (exclusive) of the default history window.
pub const DEFAULT_END: NaiveDate = match NaiveDate::from_ymd_opt(2025, 11, 11) {
    Some(date) => date,
    None => panic!("invalid default end date"),
};

/// A display name and the ticker its data is fetched under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub name: String,
    pub ticker: String,
}

impl Stock {
    pub fn new(name: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ticker: ticker.into(),
        }
    }
}

/// Named stocks and the date window they are analysed over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWatchlist")]
pub struct Watchlist {
    stocks: Vec<Stock>,
    start: NaiveDate,
    end: NaiveDate,
}

/// Unchecked form of [`Watchlist`] read by serde.
#[derive(Deserialize)]
struct RawWatchlist {
    stocks: Vec<Stock>,
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawWatchlist> for Watchlist {
    type Error = ForecastError;

    fn try_from(raw: RawWatchlist) -> Result<Self> {
        Watchlist::new(raw.stocks, raw.start, raw.end)
    }
}

impl Default for Watchlist {
    fn default() -> Self {
        Self {
            stocks: vec![
                Stock::new("TCS", "TCS.NS"),
                Stock::new("WIPRO", "WIPRO.NS"),
                Stock::new("HCLTECH", "HCLTECH.NS"),
            ],
            start: DEFAULT_START,
            end: DEFAULT_END,
        }
    }
}

impl Watchlist {
    pub fn new(stocks: Vec<Stock>, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if stocks.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "watchlist needs at least one stock".to_string(),
            ));
        }
        if start >= end {
            return Err(ForecastError::InvalidParameter(format!(
                "start date {start} must be before end date {end}"
            )));
        }
        Ok(Self { stocks, start, end })
    }

    pub fn stocks(&self) -> &[Stock] {
        &self.stocks
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Look a stock up by display name or ticker, ignoring case.
    pub fn find(&self, query: &str) -> Option<&Stock> {
        let query = query.trim();
        self.stocks
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(query) || s.ticker.eq_ignore_ascii_case(query))
    }
}
