//! # stock-forecast
//!
//! Stationarity diagnostics and ARIMA forecasts for equity closing prices.
//!
//! A run takes a closing-price series from a [`provider::SeriesProvider`],
//! tests the prices and their first differences for a unit root with the
//! augmented Dickey-Fuller test, fits an ARIMA(p, d, q) model and dates the
//! forecast on the business days after the last observation.
//!
//! # Example
//!
//! ```
//! use stock_forecast::prelude::*;
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! let series = SyntheticProvider::default().fetch("TCS.NS", start, end).unwrap();
//!
//! let pipeline = ForecastPipeline::new(PipelineConfig::default()).unwrap();
//! let report = pipeline.run(&series).unwrap();
//! println!("stationary: {}", report.verdict.is_stationary);
//! ```

// Allow some clippy warnings for cleaner numeric code
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod provider;
pub mod transform;
pub mod utils;
pub mod validation;

pub use error::{ErrorKind, ForecastError, Result};

pub mod prelude {
    pub use crate::core::{future_business_days, DatedSeries, Forecast, PriceSeries};
    pub use crate::error::{ErrorKind, ForecastError, Result};
    pub use crate::models::{fit_and_forecast, ForecastEngine, Forecaster, ModelOrder};
    pub use crate::pipeline::{ForecastPipeline, ForecastReport, PipelineConfig, Watchlist};
    pub use crate::provider::{CsvProvider, InMemoryProvider, SeriesProvider, SyntheticProvider};
    pub use crate::transform::difference;
    pub use crate::validation::{StationarityChecker, StationarityVerdict};
}
