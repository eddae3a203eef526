//! Deterministic synthetic price paths.

use super::{check_range, SeriesProvider};
use crate::core::{business_days_between, PriceSeries};
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use statrs::distribution::Normal;

/// Geometric random walk on business days, seeded per ticker.
///
/// The same seed, ticker and range always produce the same series.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticProvider {
    seed: u64,
    start_price: f64,
    /// Mean daily log return.
    drift: f64,
    /// Standard deviation of daily log returns.
    volatility: f64,
    /// When set, only these tickers have data.
    tickers: Option<Vec<String>>,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            seed: 42,
            start_price: 1000.0,
            drift: 0.0002,
            volatility: 0.015,
            tickers: None,
        }
    }
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    pub fn with_start_price(mut self, price: f64) -> Result<Self> {
        if !(price > 0.0 && price.is_finite()) {
            return Err(ForecastError::InvalidParameter(format!(
                "start price must be positive, got {price}"
            )));
        }
        self.start_price = price;
        Ok(self)
    }

    pub fn with_dynamics(mut self, drift: f64, volatility: f64) -> Result<Self> {
        if !drift.is_finite() || !(volatility > 0.0 && volatility.is_finite()) {
            return Err(ForecastError::InvalidParameter(format!(
                "invalid drift {drift} or volatility {volatility}"
            )));
        }
        self.drift = drift;
        self.volatility = volatility;
        Ok(self)
    }

    /// Restrict data to the given tickers; others are unavailable.
    pub fn with_tickers<I, S>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tickers = Some(tickers.into_iter().map(Into::into).collect());
        self
    }

    fn knows(&self, ticker: &str) -> bool {
        self.tickers
            .as_ref()
            .map_or(true, |known| known.iter().any(|t| t == ticker))
    }
}

impl SeriesProvider for SyntheticProvider {
    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        check_range(start, end)?;
        if ticker.trim().is_empty() {
            return Err(ForecastError::InvalidParameter(
                "ticker must not be empty".to_string(),
            ));
        }
        if !self.knows(ticker) {
            return Err(ForecastError::unavailable(ticker, "unknown ticker"));
        }

        let dates = business_days_between(start, end);
        if dates.is_empty() {
            return Err(ForecastError::unavailable(
                ticker,
                format!("no business days in {start} .. {end}"),
            ));
        }

        let shocks = Normal::new(0.0, 1.0)
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
        let mut rng = StdRng::seed_from_u64(self.seed ^ fnv1a(ticker));

        let step_mean = self.drift - 0.5 * self.volatility * self.volatility;
        let mut close = self.start_price;
        let closes: Vec<f64> = dates
            .iter()
            .map(|_| {
                let price = close;
                close *= (step_mean + self.volatility * shocks.sample(&mut rng)).exp();
                price
            })
            .collect();

        tracing::debug!(ticker, rows = closes.len(), "generated synthetic series");
        PriceSeries::new(dates, closes)
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

/// 64-bit FNV-1a hash, stable across runs and platforms.
fn fnv1a(text: &str) -> u64 {
    text.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}
