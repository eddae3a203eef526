//! Forecasting models.

mod engine;
mod traits;

pub mod arima;

pub use arima::{Arima, ArimaConfig, MeanTerm, ModelOrder};
pub use engine::{fit_and_forecast, ForecastEngine};
pub use traits::{Forecaster, PointForecast};
