//! ARIMA forecasting on price series.

use super::arima::{Arima, ArimaConfig, ModelOrder};
use super::traits::Forecaster;
use crate::core::{future_business_days, Forecast, PriceSeries};
use crate::error::{ForecastError, Result};

/// Fits ARIMA models to price series and produces forecasts.
///
/// # Example
/// ```
/// use chrono::{Duration, NaiveDate};
/// use stock_forecast::core::PriceSeries;
/// use stock_forecast::models::{ForecastEngine, ModelOrder};
///
/// let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let mut close = 100.0;
/// let pairs: Vec<_> = (0..80)
///     .map(|i| {
///         close += if (i * 31) % 7 < 3 { 0.8 } else { -0.5 };
///         (start + Duration::days(i), close)
///     })
///     .collect();
/// let series = PriceSeries::from_pairs(pairs).unwrap();
///
/// let engine = ForecastEngine::default();
/// let values = engine
///     .fit_and_forecast(&series, ModelOrder::new(2, 1, 0).unwrap(), 5)
///     .unwrap();
/// assert_eq!(values.len(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastEngine {
    config: ArimaConfig,
    interval_level: Option<f64>,
}

impl ForecastEngine {
    pub fn new(config: ArimaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            interval_level: None,
        })
    }

    /// Produce prediction intervals at `level` from [`forecast`](Self::forecast).
    pub fn with_interval_level(mut self, level: f64) -> Result<Self> {
        if !(level > 0.0 && level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "interval level must lie in (0, 1), got {level}"
            )));
        }
        self.interval_level = Some(level);
        Ok(self)
    }

    pub fn config(&self) -> &ArimaConfig {
        &self.config
    }

    pub fn interval_level(&self) -> Option<f64> {
        self.interval_level
    }

    /// Fit an ARIMA model of the given order to the closing prices.
    pub fn fit(&self, series: &PriceSeries, order: ModelOrder) -> Result<Arima> {
        order.validate()?;
        let mut model = Arima::with_config(order, self.config.clone());
        model.fit(series.closes())?;
        Ok(model)
    }

    /// Point forecast of the next `horizon` closing prices.
    pub fn fit_and_forecast(
        &self,
        series: &PriceSeries,
        order: ModelOrder,
        horizon: usize,
    ) -> Result<Vec<f64>> {
        check_horizon(horizon)?;
        let model = self.fit(series, order)?;
        Ok(model.predict(horizon)?.point)
    }

    /// Dated forecast, with interval bands when an interval level is set.
    pub fn forecast(
        &self,
        series: &PriceSeries,
        order: ModelOrder,
        horizon: usize,
    ) -> Result<Forecast> {
        check_horizon(horizon)?;
        let last_date = series.last_date().ok_or(ForecastError::InsufficientData {
            needed: 1,
            got: 0,
        })?;
        let dates = future_business_days(last_date, horizon)?;
        let model = self.fit(series, order)?;

        let forecast = match self.interval_level {
            Some(level) => {
                let prediction = model.predict_with_intervals(horizon, level)?;
                let forecast = Forecast::new(dates, prediction.point)?;
                match (prediction.lower, prediction.upper) {
                    (Some(lower), Some(upper)) => forecast.with_intervals(lower, upper)?,
                    _ => forecast,
                }
            }
            None => Forecast::new(dates, model.predict(horizon)?.point)?,
        };

        tracing::debug!(
            order = %order,
            horizon,
            intervals = forecast.has_intervals(),
            "forecast produced"
        );

        Ok(forecast)
    }
}

/// [`ForecastEngine::fit_and_forecast`] with default estimation settings.
pub fn fit_and_forecast(
    series: &PriceSeries,
    order: ModelOrder,
    horizon: usize,
) -> Result<Vec<f64>> {
    ForecastEngine::default().fit_and_forecast(series, order, horizon)
}

fn check_horizon(horizon: usize) -> Result<()> {
    if horizon == 0 {
        return Err(ForecastError::InvalidParameter(
            "forecast horizon must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::business_days_between;
    use chrono::NaiveDate;

    fn business_walk(n: usize) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let dates: Vec<NaiveDate> = business_days_between(start, end).into_iter().take(n).collect();
        let mut state: u64 = 99;
        let mut close = 500.0;
        let closes = (0..n)
            .map(|_| {
                state = (state * 1_103_515_245 + 12_345) % (1 << 31);
                close += 4.0 * (state as f64 / (1u64 << 31) as f64 - 0.5);
                close
            })
            .collect();
        PriceSeries::new(dates, closes).unwrap()
    }

    #[test]
    fn forecast_length_matches_horizon() {
        let series = business_walk(250);
        for horizon in [1, 5, 10, 60] {
            let values = fit_and_forecast(&series, ModelOrder::default(), horizon).unwrap();
            assert_eq!(values.len(), horizon);
        }
    }

    #[test]
    fn zero_horizon_is_invalid() {
        let series = business_walk(100);
        assert!(matches!(
            fit_and_forecast(&series, ModelOrder::default(), 0),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn too_short_series_is_a_fit_error() {
        let series = business_walk(6);
        assert!(matches!(
            fit_and_forecast(&series, ModelOrder::default(), 3),
            Err(ForecastError::ModelFit(_))
        ));
    }

    #[test]
    fn dated_forecast_follows_last_observation() {
        let series = business_walk(120);
        let forecast = ForecastEngine::default()
            .forecast(&series, ModelOrder::default(), 5)
            .unwrap();

        assert_eq!(forecast.horizon(), 5);
        assert!(!forecast.has_intervals());
        assert!(forecast.dates()[0] > series.last_date().unwrap());
        assert_eq!(
            forecast.point(),
            fit_and_forecast(&series, ModelOrder::default(), 5).unwrap()
        );
    }

    #[test]
    fn intervals_only_when_configured() {
        let series = business_walk(200);
        let engine = ForecastEngine::default().with_interval_level(0.9).unwrap();
        let forecast = engine.forecast(&series, ModelOrder::default(), 8).unwrap();

        assert!(forecast.has_intervals());
        let lower = forecast.lower().unwrap();
        let upper = forecast.upper().unwrap();
        for (h, point) in forecast.point().iter().enumerate() {
            assert!(lower[h] <= *point && *point <= upper[h]);
        }
    }

    #[test]
    fn interval_level_is_validated() {
        assert!(ForecastEngine::default().with_interval_level(1.0).is_err());
        assert!(ForecastEngine::default().with_interval_level(0.0).is_err());
    }
}
