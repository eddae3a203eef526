//! Series transformations.
//!
//! # Example
//!
//! ```
//! use stock_forecast::transform::{difference_values, integrate};
//!
//! let prices = vec![10.0, 12.0, 11.0, 13.0];
//! let diffs = difference_values(&prices, 1);
//! assert_eq!(diffs, vec![2.0, -1.0, 2.0]);
//!
//! // Two more steps of +1 continue from the last price
//! assert_eq!(integrate(&[1.0, 1.0], &prices, 1), vec![14.0, 15.0]);
//! ```

pub mod difference;

pub use difference::{difference, difference_values, integrate};
