//! Pipeline configuration.

use crate::error::{ForecastError, Result};
use crate::models::{ArimaConfig, ModelOrder};
use crate::validation::{AdfConfig, DEFAULT_SIGNIFICANCE};
use serde::{Deserialize, Serialize};

/// Default number of business days forecast.
pub const DEFAULT_HORIZON: usize = 10;

/// Settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub order: ModelOrder,
    /// Number of business days to forecast.
    pub horizon: usize,
    /// Significance for both stationarity checks; overrides `adf.significance`.
    pub significance: f64,
    /// Prediction-interval level; no intervals when `None`.
    pub interval_level: Option<f64>,
    pub adf: AdfConfig,
    pub arima: ArimaConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            order: ModelOrder::default(),
            horizon: DEFAULT_HORIZON,
            significance: DEFAULT_SIGNIFICANCE,
            interval_level: None,
            adf: AdfConfig::default(),
            arima: ArimaConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn with_order(mut self, order: ModelOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_significance(mut self, significance: f64) -> Self {
        self.significance = significance;
        self
    }

    pub fn with_interval_level(mut self, level: f64) -> Self {
        self.interval_level = Some(level);
        self
    }

    pub fn with_adf(mut self, adf: AdfConfig) -> Self {
        self.adf = adf;
        self
    }

    pub fn with_arima(mut self, arima: ArimaConfig) -> Self {
        self.arima = arima;
        self
    }

    /// ADF settings with the pipeline significance applied.
    pub fn effective_adf(&self) -> AdfConfig {
        AdfConfig {
            significance: self.significance,
            ..self.adf.clone()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.order.validate()?;
        if self.horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "forecast horizon must be at least 1".to_string(),
            ));
        }
        if let Some(level) = self.interval_level {
            if !(level > 0.0 && level < 1.0) {
                return Err(ForecastError::InvalidParameter(format!(
                    "interval level must lie in (0, 1), got {level}"
                )));
            }
        }
        self.effective_adf().validate()?;
        self.arima.validate()
    }
}
