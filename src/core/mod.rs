//! Core data structures: dated series, forecasts and the business-day calendar.

mod calendar;
mod forecast;
mod series;

pub use calendar::{
    business_days_between, future_business_days, is_business_day, next_business_day,
};
pub use forecast::Forecast;
pub use series::{DatedSeries, MissingValuePolicy, PriceSeries};
