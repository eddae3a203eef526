//! Error types for the stock-forecast library.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Coarse error category shown to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    InsufficientData,
    InvalidParameter,
    ModelFit,
    DataUnavailable,
    InvalidSeries,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InsufficientData => "InsufficientDataError",
            ErrorKind::InvalidParameter => "InvalidParameterError",
            ErrorKind::ModelFit => "ModelFitError",
            ErrorKind::DataUnavailable => "DataUnavailableError",
            ErrorKind::InvalidSeries => "InvalidSeriesError",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while fetching, testing or forecasting a series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Too few observations for the requested operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Model estimation failed or the order does not fit the series.
    #[error("model fit failed: {0}")]
    ModelFit(String),

    /// The provider has no rows for the ticker and range.
    #[error("no data available for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    /// Series violates its ordering or value constraints.
    #[error("invalid series: {0}")]
    InvalidSeries(String),
}

impl ForecastError {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForecastError::InsufficientData { .. } => ErrorKind::InsufficientData,
            ForecastError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            ForecastError::ModelFit(_) => ErrorKind::ModelFit,
            ForecastError::DataUnavailable { .. } => ErrorKind::DataUnavailable,
            ForecastError::InvalidSeries(_) => ErrorKind::InvalidSeries,
        }
    }

    pub(crate) fn unavailable(ticker: &str, reason: impl Into<String>) -> Self {
        ForecastError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }
}
