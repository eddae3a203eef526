//! ARIMA (Autoregressive Integrated Moving Average) models.
//!
//! This module provides:
//! - [`ModelOrder`], the validated `(p, d, q)` specification
//! - [`Arima`], estimated by conditional sum of squares

mod model;
mod order;

pub use model::{Arima, ArimaConfig, MeanTerm};
pub use order::ModelOrder;
