//! Numerical helpers shared by the stationarity test and the ARIMA engine.

pub mod ols;
pub mod optimization;
pub mod stats;

pub use ols::{ols_fit, OlsFit};
pub use optimization::{nelder_mead, Minimum, NelderMeadConfig};
pub use stats::{mean, normal_cdf, normal_quantile, polyval};
