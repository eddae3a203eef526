//! Differencing and its inverse.

use crate::core::DatedSeries;
use crate::error::{ForecastError, Result};

/// First difference of a dated series.
///
/// Entry `i` of the result is `value[i+1] - value[i]`, dated at the later
/// observation; the first (undefined) difference is dropped.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use stock_forecast::core::DatedSeries;
/// use stock_forecast::transform::difference;
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 11, day).unwrap();
/// let series = DatedSeries::from_pairs([(d(3), 10.0), (d(4), 12.0), (d(5), 11.0)]).unwrap();
/// let diffed = difference(&series).unwrap();
/// assert_eq!(diffed.dates(), &[d(4), d(5)]);
/// assert_eq!(diffed.values(), &[2.0, -1.0]);
/// ```
pub fn difference(series: &DatedSeries) -> Result<DatedSeries> {
    if series.len() < 2 {
        return Err(ForecastError::InsufficientData {
            needed: 2,
            got: series.len(),
        });
    }

    Ok(DatedSeries::from_parts(
        series.dates()[1..].to_vec(),
        difference_values(series.values(), 1),
    ))
}

/// Apply differencing `d` times to a raw series.
pub fn difference_values(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            return Vec::new();
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Integrate (reverse differencing) values forecast on the differenced scale.
///
/// # Arguments
/// * `differenced` - Values continuing the `d`-times differenced series
/// * `original` - The undifferenced series the forecasts continue
/// * `d` - Differencing order used
pub fn integrate(differenced: &[f64], original: &[f64], d: usize) -> Vec<f64> {
    let mut result = differenced.to_vec();

    for level in (0..d).rev() {
        // Last observed value of the series differenced `level` times.
        let anchor = difference_values(original, level)
            .last()
            .copied()
            .unwrap_or(0.0);

        let mut cumsum = anchor;
        result = result
            .iter()
            .map(|&step| {
                cumsum += step;
                cumsum
            })
            .collect();
    }

    result
}
