//! Stationarity testing.
//!
//! # Example
//!
//! ```
//! use stock_forecast::validation::{adf_test, AdfConfig};
//!
//! let mut level = 100.0;
//! let walk: Vec<f64> = (0..120)
//!     .map(|i| {
//!         level += if (i * 37) % 11 < 5 { 0.7 } else { -0.6 };
//!         level
//!     })
//!     .collect();
//!
//! let verdict = adf_test(&walk, &AdfConfig::default()).unwrap();
//! println!("p = {:.3}, stationary: {}", verdict.p_value, verdict.is_stationary);
//! ```

pub mod stationarity;

pub use stationarity::{
    adf_test, mackinnon_p_value, AdfConfig, CriticalValues, LagSelection, StationarityChecker,
    StationarityVerdict, DEFAULT_SIGNIFICANCE, MIN_OBSERVATIONS,
};
