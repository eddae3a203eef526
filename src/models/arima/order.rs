//! ARIMA order `(p, d, q)`.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// ARIMA model order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelOrder {
    /// Autoregressive order.
    pub p: usize,
    /// Differencing order.
    pub d: usize,
    /// Moving-average order.
    pub q: usize,
}

impl ModelOrder {
    /// Largest accepted AR order.
    pub const MAX_P: usize = 10;
    /// Largest accepted differencing order.
    pub const MAX_D: usize = 2;
    /// Largest accepted MA order.
    pub const MAX_Q: usize = 10;

    /// Create a validated order.
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        let order = Self { p, d, q };
        order.validate()?;
        Ok(order)
    }

    /// Check every component is within range.
    pub fn validate(&self) -> Result<()> {
        if self.p > Self::MAX_P {
            return Err(ForecastError::InvalidParameter(format!(
                "AR order p must be at most {}, got {}",
                Self::MAX_P,
                self.p
            )));
        }
        if self.d > Self::MAX_D {
            return Err(ForecastError::InvalidParameter(format!(
                "differencing order d must be at most {}, got {}",
                Self::MAX_D,
                self.d
            )));
        }
        if self.q > Self::MAX_Q {
            return Err(ForecastError::InvalidParameter(format!(
                "MA order q must be at most {}, got {}",
                Self::MAX_Q,
                self.q
            )));
        }
        Ok(())
    }

    /// Number of ARMA coefficients (excluding any mean term).
    pub fn num_coefficients(&self) -> usize {
        self.p + self.q
    }
}

impl Default for ModelOrder {
    /// ARIMA(5, 1, 0).
    fn default() -> Self {
        Self { p: 5, d: 1, q: 0 }
    }
}

impl TryFrom<(i64, i64, i64)> for ModelOrder {
    type Error = ForecastError;

    fn try_from((p, d, q): (i64, i64, i64)) -> Result<Self> {
        let component = |name: &str, value: i64| {
            usize::try_from(value).map_err(|_| {
                ForecastError::InvalidParameter(format!(
                    "order component {name} must be non-negative, got {value}"
                ))
            })
        };
        Self::new(component("p", p)?, component("d", d)?, component("q", q)?)
    }
}

impl fmt::Display for ModelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.p, self.d, self.q)
    }
}
