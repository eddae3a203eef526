//! Everything the presentation layer needs from one run.

use crate::core::{Forecast, PriceSeries};
use crate::models::ModelOrder;
use crate::validation::StationarityVerdict;
use chrono::NaiveDate;
use serde::Serialize;

/// Result of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    pub order: ModelOrder,
    /// ADF verdict for the closing prices.
    pub verdict: StationarityVerdict,
    /// ADF verdict for the first-differenced prices.
    pub diff_verdict: StationarityVerdict,
    pub forecast: Forecast,
    /// The closes the model was fitted to.
    pub actual_series: PriceSeries,
}

impl ForecastReport {
    pub fn forecast_dates(&self) -> &[NaiveDate] {
        self.forecast.dates()
    }

    pub fn forecast_values(&self) -> &[f64] {
        self.forecast.point()
    }

    pub fn forecast_lower(&self) -> Option<&[f64]> {
        self.forecast.lower()
    }

    pub fn forecast_upper(&self) -> Option<&[f64]> {
        self.forecast.upper()
    }
}
