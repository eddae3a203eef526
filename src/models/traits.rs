//! Forecaster trait defining the common interface for models.

use crate::error::{ForecastError, Result};
use serde::Serialize;

/// Undated model output: point predictions and optional interval bands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointForecast {
    pub point: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<Vec<f64>>,
}

impl PointForecast {
    pub fn from_values(point: Vec<f64>) -> Self {
        Self {
            point,
            lower: None,
            upper: None,
        }
    }

    /// Point predictions with matching lower and upper bands.
    pub fn with_intervals(point: Vec<f64>, lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if lower.len() != point.len() || upper.len() != point.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "interval bands of length {}/{} for {} predictions",
                lower.len(),
                upper.len(),
                point.len()
            )));
        }
        Ok(Self {
            point,
            lower: Some(lower),
            upper: Some(upper),
        })
    }

    pub fn horizon(&self) -> usize {
        self.point.len()
    }
}

/// Common interface for forecasting models.
///
/// Object-safe, so models can be held as `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to a series of observations.
    fn fit(&mut self, values: &[f64]) -> Result<()>;

    /// Point predictions for the next `horizon` steps.
    fn predict(&self, horizon: usize) -> Result<PointForecast>;

    /// Predictions with intervals at the given confidence `level`.
    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<PointForecast> {
        let _ = level;
        self.predict(horizon)
    }

    /// In-sample one-step predictions on the scale the model is estimated on.
    fn fitted_values(&self) -> Option<&[f64]>;

    /// In-sample residuals.
    fn residuals(&self) -> Option<&[f64]>;

    /// Model name.
    fn name(&self) -> &str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LastValue {
        last: Option<f64>,
    }

    impl Forecaster for LastValue {
        fn fit(&mut self, values: &[f64]) -> Result<()> {
            self.last = values.last().copied();
            Ok(())
        }

        fn predict(&self, horizon: usize) -> Result<PointForecast> {
            let last = self
                .last
                .ok_or_else(|| ForecastError::ModelFit("not fitted".to_string()))?;
            Ok(PointForecast::from_values(vec![last; horizon]))
        }

        fn fitted_values(&self) -> Option<&[f64]> {
            self.last.as_ref().map(std::slice::from_ref)
        }

        fn residuals(&self) -> Option<&[f64]> {
            None
        }

        fn name(&self) -> &str {
            "LastValue"
        }
    }

    #[test]
    fn default_intervals_fall_back_to_points() {
        let mut model: Box<dyn Forecaster> = Box::new(LastValue { last: None });
        assert!(!model.is_fitted());

        model.fit(&[1.0, 2.0, 3.0]).unwrap();
        assert!(model.is_fitted());

        let forecast = model.predict_with_intervals(3, 0.95).unwrap();
        assert_eq!(forecast.point, vec![3.0; 3]);
        assert!(forecast.lower.is_none());
    }

    #[test]
    fn mismatched_bands_are_rejected() {
        let result = PointForecast::with_intervals(vec![1.0, 2.0], vec![0.0], vec![3.0, 4.0]);
        assert!(result.is_err());
    }
}
