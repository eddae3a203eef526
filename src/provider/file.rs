//! Closing prices from CSV files.

use super::{check_range, SeriesProvider};
use crate::core::{MissingValuePolicy, PriceSeries};
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

const DATE_COLUMN: &str = "Date";
const CLOSE_COLUMN: &str = "Close";

/// Reads `<dir>/<TICKER>.csv`.
///
/// Files need a header row with `Date` (`YYYY-MM-DD`, optionally followed
/// by a time) and `Close` columns; other columns are ignored. Empty or
/// non-numeric closes are missing values, handled by the configured
/// [`MissingValuePolicy`].
#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
    policy: MissingValuePolicy,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            policy: MissingValuePolicy::default(),
        }
    }

    pub fn with_missing_values(mut self, policy: MissingValuePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{ticker}.csv"))
    }
}

impl SeriesProvider for CsvProvider {
    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        check_range(start, end)?;
        if ticker.is_empty() || ticker.contains(['/', '\\']) {
            return Err(ForecastError::InvalidParameter(format!(
                "invalid ticker {ticker:?}"
            )));
        }

        let path = self.path_for(ticker);
        if !path.is_file() {
            return Err(ForecastError::unavailable(
                ticker,
                format!("{} not found", path.display()),
            ));
        }

        let rows = read_rows(&path)?;
        let observations = rows
            .into_iter()
            .filter(|(date, _)| *date >= start && *date < end);
        let series = PriceSeries::from_observations(observations, self.policy)?;
        if series.is_empty() {
            return Err(ForecastError::unavailable(
                ticker,
                format!("no rows in {start} .. {end}"),
            ));
        }

        tracing::debug!(ticker, rows = series.len(), path = %path.display(), "loaded csv");
        Ok(series)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// All `(date, close)` rows of a file, closes `None` when missing.
fn read_rows(path: &Path) -> Result<Vec<(NaiveDate, Option<f64>)>> {
    let malformed =
        |e: csv::Error| ForecastError::InvalidSeries(format!("{}: {e}", path.display()));

    let mut reader = csv::Reader::from_path(path).map_err(malformed)?;
    let headers = reader.headers().map_err(malformed)?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                ForecastError::InvalidSeries(format!(
                    "{}: missing '{name}' column",
                    path.display()
                ))
            })
    };
    let date_idx = column(DATE_COLUMN)?;
    let close_idx = column(CLOSE_COLUMN)?;

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(malformed)?;
        let raw_date = record.get(date_idx).unwrap_or("").trim();
        let date = raw_date
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .ok_or_else(|| {
                ForecastError::InvalidSeries(format!(
                    "{}: bad date {raw_date:?} on data row {}",
                    path.display(),
                    line + 1
                ))
            })?;
        let close = record
            .get(close_idx)
            .and_then(|c| c.trim().parse::<f64>().ok());
        rows.push((date, close));
    }
    Ok(rows)
}
