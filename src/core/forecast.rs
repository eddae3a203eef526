//! Forecast result structure for holding dated predictions.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// Dated point predictions with optional prediction-interval bands.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Forecast {
    dates: Vec<NaiveDate>,
    point: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lower: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    upper: Option<Vec<f64>>,
}

impl Forecast {
    /// Create a forecast from dates and point predictions of equal length.
    pub fn new(dates: Vec<NaiveDate>, point: Vec<f64>) -> Result<Self> {
        if dates.len() != point.len() {
            return Err(ForecastError::InvalidSeries(format!(
                "{} forecast dates but {} values",
                dates.len(),
                point.len()
            )));
        }
        Ok(Self {
            dates,
            point,
            lower: None,
            upper: None,
        })
    }

    /// Attach lower and upper bands of the same length as the predictions.
    pub fn with_intervals(mut self, lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if lower.len() != self.point.len() || upper.len() != self.point.len() {
            return Err(ForecastError::InvalidSeries(format!(
                "interval bands of length {}/{} for {} predictions",
                lower.len(),
                upper.len(),
                self.point.len()
            )));
        }
        self.lower = Some(lower);
        self.upper = Some(upper);
        Ok(self)
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn point(&self) -> &[f64] {
        &self.point
    }

    pub fn lower(&self) -> Option<&[f64]> {
        self.lower.as_deref()
    }

    pub fn upper(&self) -> Option<&[f64]> {
        self.upper.as_deref()
    }

    pub fn has_intervals(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }

    /// Iterate over `(date, prediction)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.point.iter().copied())
    }
}
