//! End-to-end run: stationarity of the prices and their differences, then
//! a dated ARIMA forecast.
//!
//! # Example
//!
//! ```
//! use stock_forecast::pipeline::{ForecastPipeline, PipelineConfig, Watchlist};
//! use stock_forecast::provider::SyntheticProvider;
//!
//! let watchlist = Watchlist::default();
//! let pipeline = ForecastPipeline::new(PipelineConfig::default()).unwrap();
//! let report = pipeline
//!     .run_with(&SyntheticProvider::default(), "TCS.NS", watchlist.start(), watchlist.end())
//!     .unwrap();
//!
//! assert_eq!(report.forecast_values().len(), 10);
//! assert!(report.forecast_dates()[0] > report.actual_series.last_date().unwrap());
//! ```

mod config;
mod report;
mod watchlist;

pub use config::{PipelineConfig, DEFAULT_HORIZON};
pub use report::ForecastReport;
pub use watchlist::{Stock, Watchlist, DEFAULT_END, DEFAULT_START};

use crate::core::PriceSeries;
use crate::error::Result;
use crate::models::ForecastEngine;
use crate::provider::SeriesProvider;
use crate::transform::difference;
use crate::validation::StationarityChecker;
use chrono::NaiveDate;

/// Runs the stationarity checks and the forecast with one configuration.
///
/// Stateless between runs: the same input always gives the same report.
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    config: PipelineConfig,
    checker: StationarityChecker,
    engine: ForecastEngine,
}

impl ForecastPipeline {
    /// Build a pipeline, validating the configuration.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let checker = StationarityChecker::new(config.effective_adf())?;
        let mut engine = ForecastEngine::new(config.arima.clone())?;
        if let Some(level) = config.interval_level {
            engine = engine.with_interval_level(level)?;
        }
        Ok(Self {
            config,
            checker,
            engine,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Analyse and forecast `series`.
    pub fn run(&self, series: &PriceSeries) -> Result<ForecastReport> {
        let verdict = self.checker.check(series)?;
        tracing::debug!(
            p_value = verdict.p_value,
            stationary = verdict.is_stationary,
            "raw series checked"
        );

        let differenced = difference(series)?;
        let diff_verdict = self.checker.check(&differenced)?;
        tracing::debug!(
            p_value = diff_verdict.p_value,
            stationary = diff_verdict.is_stationary,
            "differenced series checked"
        );

        let forecast = self
            .engine
            .forecast(series, self.config.order, self.config.horizon)?;

        Ok(ForecastReport {
            ticker: None,
            order: self.config.order,
            verdict,
            diff_verdict,
            forecast,
            actual_series: series.clone(),
        })
    }

    /// Fetch `ticker` over `[start, end)` from `provider`, then [`run`](Self::run).
    pub fn run_with(
        &self,
        provider: &dyn SeriesProvider,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ForecastReport> {
        let series = provider.fetch(ticker, start, end)?;
        tracing::info!(
            ticker,
            provider = provider.name(),
            rows = series.len(),
            order = %self.config.order,
            "running forecast pipeline"
        );

        let mut report = self.run(&series)?;
        report.ticker = Some(ticker.to_string());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;
    use crate::models::ModelOrder;
    use crate::provider::{InMemoryProvider, SyntheticProvider};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn report_covers_every_stage() {
        let pipeline = ForecastPipeline::new(PipelineConfig::default()).unwrap();
        let report = pipeline
            .run_with(
                &SyntheticProvider::default(),
                "WIPRO.NS",
                date(2024, 1, 1),
                date(2025, 11, 11),
            )
            .unwrap();

        assert_eq!(report.ticker.as_deref(), Some("WIPRO.NS"));
        assert_eq!(report.order, ModelOrder::default());
        assert!((0.0..=1.0).contains(&report.verdict.p_value));
        assert!((0.0..=1.0).contains(&report.diff_verdict.p_value));
        assert_eq!(report.forecast_values().len(), 10);
        assert!(report.forecast_lower().is_none());
        assert_eq!(report.actual_series.last_date(), Some(date(2025, 11, 10)));
        assert_eq!(report.forecast_dates()[0], date(2025, 11, 11));
    }

    #[test]
    fn intervals_when_configured() {
        let config = PipelineConfig::default().with_interval_level(0.95);
        let pipeline = ForecastPipeline::new(config).unwrap();
        let series = SyntheticProvider::default()
            .fetch("TCS.NS", date(2024, 1, 1), date(2025, 1, 1))
            .unwrap();

        let report = pipeline.run(&series).unwrap();
        assert!(report.ticker.is_none());
        assert_eq!(report.forecast_upper().map(<[f64]>::len), Some(10));
    }

    #[test]
    fn provider_errors_propagate() {
        let pipeline = ForecastPipeline::new(PipelineConfig::default()).unwrap();
        let result = pipeline.run_with(
            &InMemoryProvider::new(),
            "TCS.NS",
            date(2024, 1, 1),
            date(2025, 1, 1),
        );
        assert!(matches!(result, Err(ForecastError::DataUnavailable { .. })));
    }

    #[test]
    fn short_series_fails_before_forecasting() {
        let pipeline = ForecastPipeline::new(PipelineConfig::default()).unwrap();
        let series = SyntheticProvider::default()
            .fetch("TCS.NS", date(2025, 11, 3), date(2025, 11, 14))
            .unwrap();
        assert!(matches!(
            pipeline.run(&series),
            Err(ForecastError::InsufficientData { .. })
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(ForecastPipeline::new(PipelineConfig::default().with_horizon(0)).is_err());
    }
}
