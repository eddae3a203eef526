//! Business-day calendar used to date forecasts.
//!
//! Weekends are the only non-business days; no holiday calendar is applied.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate, Weekday};

/// Whether `date` falls on Monday through Friday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The first business day strictly after `date`.
pub fn next_business_day(date: NaiveDate) -> Result<NaiveDate> {
    let mut next = date;
    loop {
        next = next.succ_opt().ok_or_else(|| {
            ForecastError::InvalidParameter(format!("no calendar date after {date}"))
        })?;
        if is_business_day(next) {
            return Ok(next);
        }
    }
}

/// The `horizon` business days following `last_date`, in order.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use stock_forecast::core::future_business_days;
///
/// // 2025-11-07 is a Friday
/// let friday = NaiveDate::from_ymd_opt(2025, 11, 7).unwrap();
/// let dates = future_business_days(friday, 1).unwrap();
/// assert_eq!(dates, vec![NaiveDate::from_ymd_opt(2025, 11, 10).unwrap()]);
/// ```
pub fn future_business_days(last_date: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    if horizon == 0 {
        return Err(ForecastError::InvalidParameter(
            "horizon must be at least 1".to_string(),
        ));
    }

    let mut dates = Vec::with_capacity(horizon);
    let mut current = last_date;
    for _ in 0..horizon {
        current = next_business_day(current)?;
        dates.push(current);
    }
    Ok(dates)
}

/// Business days with `start <= date < end`.
pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d < end)
        .filter(|d| is_business_day(*d))
        .collect()
}
