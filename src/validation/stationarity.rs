//! Augmented Dickey-Fuller test for a unit root.
//!
//! Tests the null hypothesis that the series has a unit root (is
//! non-stationary); a small p-value rejects it. The regression includes a
//! constant:
//!
//! `Δy_t = α + γ·y_{t-1} + Σ_{i=1..k} β_i·Δy_{t-i} + ε_t`
//!
//! and the statistic is the t ratio of `γ`.

use crate::core::DatedSeries;
use crate::error::{ForecastError, Result};
use crate::transform::difference_values;
use crate::utils::{normal_cdf, ols_fit, polyval, OlsFit};
use serde::{Deserialize, Serialize};

/// Significance level used when none is configured.
pub const DEFAULT_SIGNIFICANCE: f64 = 0.05;

/// Fewest observations the test accepts.
pub const MIN_OBSERVATIONS: usize = 12;

// MacKinnon (1994) p-value surface, constant term, one variable.
const TAU_MAX: f64 = 2.74;
const TAU_MIN: f64 = -18.83;
const TAU_STAR: f64 = -1.61;
const TAU_SMALL_P: [f64; 3] = [2.1659, 1.4412, 3.8269e-2];
const TAU_LARGE_P: [f64; 4] = [1.7339, 9.3202e-1, -1.2745e-1, -1.0368e-2];

// MacKinnon (2010) critical value response surface in 1/T, constant term.
const CRIT_1PCT: [f64; 4] = [-3.43035, -6.5393, -16.786, -79.433];
const CRIT_5PCT: [f64; 4] = [-2.86154, -2.8903, -4.234, -40.040];
const CRIT_10PCT: [f64; 4] = [-2.56677, -1.5384, -2.809, 0.0];

/// How the number of lagged differences is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LagSelection {
    /// Minimise Akaike's information criterion.
    #[default]
    Aic,
    /// Minimise the Bayesian information criterion.
    Bic,
    /// Use the maximum lag as given.
    Fixed,
}

/// Configuration for the ADF test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdfConfig {
    /// Maximum lag; defaults to `floor(12 * (n/100)^(1/4))`.
    pub max_lag: Option<usize>,
    pub lag_selection: LagSelection,
    /// Series with `p_value <= significance` are classified stationary.
    pub significance: f64,
    /// Fewest observations accepted; never below [`MIN_OBSERVATIONS`].
    pub min_observations: usize,
}

impl Default for AdfConfig {
    fn default() -> Self {
        Self {
            max_lag: None,
            lag_selection: LagSelection::Aic,
            significance: DEFAULT_SIGNIFICANCE,
            min_observations: MIN_OBSERVATIONS,
        }
    }
}

impl AdfConfig {
    pub fn with_max_lag(mut self, max_lag: usize) -> Self {
        self.max_lag = Some(max_lag);
        self
    }

    pub fn with_lag_selection(mut self, selection: LagSelection) -> Self {
        self.lag_selection = selection;
        self
    }

    pub fn with_significance(mut self, significance: f64) -> Self {
        self.significance = significance;
        self
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.significance > 0.0 && self.significance < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "significance must lie in (0, 1), got {}",
                self.significance
            )));
        }
        if self.min_observations < MIN_OBSERVATIONS {
            return Err(ForecastError::InvalidParameter(format!(
                "min_observations must be at least {MIN_OBSERVATIONS}, got {}",
                self.min_observations
            )));
        }
        Ok(())
    }
}

/// Critical values for the test statistic.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CriticalValues {
    /// Critical value at 1% significance
    pub cv_1pct: f64,
    /// Critical value at 5% significance
    pub cv_5pct: f64,
    /// Critical value at 10% significance
    pub cv_10pct: f64,
}

impl CriticalValues {
    /// MacKinnon (2010) critical values for `nobs` regression observations.
    pub fn for_nobs(nobs: usize) -> Self {
        let inv = 1.0 / nobs.max(1) as f64;
        Self {
            cv_1pct: polyval(&CRIT_1PCT, inv),
            cv_5pct: polyval(&CRIT_5PCT, inv),
            cv_10pct: polyval(&CRIT_10PCT, inv),
        }
    }
}

/// Outcome of a stationarity check.
///
/// A non-stationary verdict is a valid result, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationarityVerdict {
    /// ADF t statistic; NaN when the regression is degenerate.
    pub statistic: f64,
    /// Approximate p-value in [0, 1].
    pub p_value: f64,
    /// `p_value <= significance`.
    pub is_stationary: bool,
    /// Number of lagged differences used.
    pub lags: usize,
    /// Observations in the final regression.
    pub n_obs: usize,
    pub critical_values: CriticalValues,
    pub significance: f64,
}

/// Runs the ADF test on dated series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationarityChecker {
    config: AdfConfig,
}

impl StationarityChecker {
    /// Create a checker, validating the configuration.
    pub fn new(config: AdfConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Default test with a custom significance level.
    pub fn with_significance(significance: f64) -> Result<Self> {
        Self::new(AdfConfig::default().with_significance(significance))
    }

    pub fn config(&self) -> &AdfConfig {
        &self.config
    }

    /// Test `series` for a unit root.
    pub fn check(&self, series: &DatedSeries) -> Result<StationarityVerdict> {
        adf_test(series.values(), &self.config)
    }
}

/// Augmented Dickey-Fuller test on raw values.
///
/// # Example
/// ```
/// use stock_forecast::validation::{adf_test, AdfConfig};
///
/// let series: Vec<f64> = (0..100).map(|i| ((i * 7919) % 101) as f64).collect();
/// let verdict = adf_test(&series, &AdfConfig::default()).unwrap();
/// assert!((0.0..=1.0).contains(&verdict.p_value));
/// ```
pub fn adf_test(series: &[f64], config: &AdfConfig) -> Result<StationarityVerdict> {
    config.validate()?;

    let n = series.len();
    if n < config.min_observations {
        return Err(ForecastError::InsufficientData {
            needed: config.min_observations,
            got: n,
        });
    }
    if series.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::InvalidSeries(
            "stationarity test input contains non-finite values".to_string(),
        ));
    }

    let diff = difference_values(series, 1);

    // Keep at least one residual degree of freedom at the largest lag.
    let cap = (n / 2).saturating_sub(2);
    let max_lag = config.max_lag.unwrap_or_else(|| default_max_lag(n)).min(cap);

    let lags = match config.lag_selection {
        LagSelection::Fixed => max_lag,
        LagSelection::Aic => select_lag(series, &diff, max_lag, 2.0),
        LagSelection::Bic => select_lag(series, &diff, max_lag, f64::NAN),
    };

    let significance = config.significance;
    let verdict = match adf_regression(series, &diff, lags, lags) {
        Some(fit) if fit.std_errors[1].is_finite() && fit.std_errors[1] > 0.0 => {
            let statistic = fit.t_stat(1);
            let p_value = mackinnon_p_value(statistic);
            StationarityVerdict {
                statistic,
                p_value,
                is_stationary: p_value <= significance,
                lags,
                n_obs: fit.nobs,
                critical_values: CriticalValues::for_nobs(fit.nobs),
                significance,
            }
        }
        // Constant or perfectly linear input: no evidence against a unit root.
        other => {
            let n_obs = other.map_or(diff.len() - lags, |fit| fit.nobs);
            StationarityVerdict {
                statistic: f64::NAN,
                p_value: 1.0,
                is_stationary: false,
                lags,
                n_obs,
                critical_values: CriticalValues::for_nobs(n_obs),
                significance,
            }
        }
    };

    tracing::debug!(
        n,
        lags = verdict.lags,
        statistic = verdict.statistic,
        p_value = verdict.p_value,
        "adf test"
    );

    Ok(verdict)
}

/// Schwert's rule of thumb, `floor(12 * (n/100)^(1/4))`.
fn default_max_lag(n: usize) -> usize {
    (12.0 * (n as f64 / 100.0).powf(0.25)).floor() as usize
}

/// Lag minimising the information criterion over a common sample.
///
/// `penalty` is the per-parameter penalty; NaN selects `ln(nobs)` (BIC).
fn select_lag(series: &[f64], diff: &[f64], max_lag: usize, penalty: f64) -> usize {
    let mut best_lag = 0;
    let mut best_ic = f64::INFINITY;

    for lag in 0..=max_lag {
        let Some(fit) = adf_regression(series, diff, lag, max_lag) else {
            continue;
        };
        let nobs = fit.nobs as f64;
        let k = fit.coefficients.len() as f64;
        let per_param = if penalty.is_nan() { nobs.ln() } else { penalty };
        let ic = nobs * (fit.rss / nobs).ln() + per_param * k;
        if ic < best_ic {
            best_ic = ic;
            best_lag = lag;
        }
    }

    best_lag
}

/// Fit the ADF regression with `lag` lagged differences, using rows of
/// `diff` from `first_row` on (`first_row >= lag`).
///
/// Coefficient 0 is the constant, coefficient 1 is `γ`.
fn adf_regression(series: &[f64], diff: &[f64], lag: usize, first_row: usize) -> Option<OlsFit> {
    let rows = first_row..diff.len();
    let y = diff[rows.clone()].to_vec();

    let mut columns = Vec::with_capacity(lag + 2);
    columns.push(vec![1.0; y.len()]);
    columns.push(series[rows.clone()].to_vec());
    for i in 1..=lag {
        columns.push(rows.clone().map(|j| diff[j - i]).collect());
    }

    ols_fit(&y, &columns)
}

/// Approximate p-value of the ADF statistic (MacKinnon 1994).
pub fn mackinnon_p_value(statistic: f64) -> f64 {
    if statistic.is_nan() {
        return 1.0;
    }
    if statistic > TAU_MAX {
        return 1.0;
    }
    if statistic < TAU_MIN {
        return 0.0;
    }
    let coefficients: &[f64] = if statistic <= TAU_STAR {
        &TAU_SMALL_P
    } else {
        &TAU_LARGE_P
    };
    normal_cdf(polyval(coefficients, statistic)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn lcg_noise(seed: u64, n: usize) -> Vec<f64> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = (state * 1_103_515_245 + 12_345) % (1 << 31);
                state as f64 / (1u64 << 31) as f64 - 0.5
            })
            .collect()
    }

    fn random_walk(seed: u64, n: usize) -> Vec<f64> {
        let mut series = vec![100.0];
        for shock in lcg_noise(seed, n - 1) {
            let last = series[series.len() - 1];
            series.push(last + shock);
        }
        series
    }

    #[test]
    fn white_noise_is_stationary() {
        let verdict = adf_test(&lcg_noise(7, 200), &AdfConfig::default()).unwrap();

        assert!(verdict.statistic < verdict.critical_values.cv_1pct);
        assert!(verdict.p_value < 0.01);
        assert!(verdict.is_stationary);
    }

    #[test]
    fn random_walk_is_not_stationary() {
        let verdict = adf_test(&random_walk(11, 200), &AdfConfig::default()).unwrap();

        assert!(!verdict.statistic.is_nan());
        assert!((0.0..=1.0).contains(&verdict.p_value));
        assert!(verdict.p_value > 0.05);
        assert!(!verdict.is_stationary);
    }

    #[test]
    fn trending_series_is_not_stationary() {
        let series: Vec<f64> = lcg_noise(5, 200)
            .iter()
            .enumerate()
            .map(|(i, e)| i as f64 * 0.5 + 0.3 * e)
            .collect();

        let verdict = adf_test(&series, &AdfConfig::default()).unwrap();
        assert!(!verdict.is_stationary);
    }

    #[test]
    fn constant_series_is_degenerate_not_error() {
        let verdict = adf_test(&[5.0; 40], &AdfConfig::default()).unwrap();

        assert!(verdict.statistic.is_nan());
        assert_eq!(verdict.p_value, 1.0);
        assert!(!verdict.is_stationary);
    }

    #[test]
    fn short_series_is_insufficient() {
        let result = adf_test(&random_walk(3, 11), &AdfConfig::default());
        assert_eq!(
            result,
            Err(ForecastError::InsufficientData { needed: 12, got: 11 })
        );
    }

    #[test]
    fn minimum_length_series_is_accepted() {
        let verdict = adf_test(&random_walk(3, 12), &AdfConfig::default()).unwrap();
        assert!((0.0..=1.0).contains(&verdict.p_value));
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let mut series = random_walk(5, 30);
        series[10] = f64::NAN;
        assert!(matches!(
            adf_test(&series, &AdfConfig::default()),
            Err(ForecastError::InvalidSeries(_))
        ));
    }

    #[test]
    fn verdict_follows_configured_significance() {
        let series = random_walk(11, 200);
        for significance in [0.01, 0.05, 0.5, 0.99] {
            let config = AdfConfig::default().with_significance(significance);
            let verdict = adf_test(&series, &config).unwrap();
            assert_eq!(verdict.is_stationary, verdict.p_value <= significance);
            assert_eq!(verdict.significance, significance);
        }
    }

    #[test]
    fn invalid_significance_is_rejected() {
        for significance in [0.0, 1.0, -0.1, f64::NAN] {
            assert!(matches!(
                StationarityChecker::with_significance(significance),
                Err(ForecastError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn min_observations_cannot_go_below_floor() {
        let config = AdfConfig {
            min_observations: 5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn fixed_lag_is_used() {
        let config = AdfConfig::default()
            .with_max_lag(3)
            .with_lag_selection(LagSelection::Fixed);
        let verdict = adf_test(&random_walk(11, 100), &config).unwrap();
        assert_eq!(verdict.lags, 3);
        // 99 differences minus 3 lags
        assert_eq!(verdict.n_obs, 96);
    }

    #[test]
    fn lag_is_capped_for_short_series() {
        let config = AdfConfig::default()
            .with_max_lag(50)
            .with_lag_selection(LagSelection::Fixed);
        let verdict = adf_test(&random_walk(2, 20), &config).unwrap();
        assert_eq!(verdict.lags, 8);
    }

    #[test]
    fn bic_never_picks_more_lags_than_allowed() {
        let config = AdfConfig::default()
            .with_max_lag(4)
            .with_lag_selection(LagSelection::Bic);
        let verdict = adf_test(&random_walk(9, 150), &config).unwrap();
        assert!(verdict.lags <= 4);
    }

    #[test]
    fn critical_values_are_ordered() {
        let cv = CriticalValues::for_nobs(100);
        assert!(cv.cv_1pct < cv.cv_5pct);
        assert!(cv.cv_5pct < cv.cv_10pct);

        let asymptotic = CriticalValues::for_nobs(1_000_000);
        assert_relative_eq!(asymptotic.cv_5pct, -2.86154, epsilon = 1e-4);
    }

    #[test]
    fn p_value_surface() {
        assert_relative_eq!(mackinnon_p_value(-2.86), 0.05, epsilon = 2e-3);
        assert_eq!(mackinnon_p_value(3.0), 1.0);
        assert_eq!(mackinnon_p_value(-20.0), 0.0);
        assert!(mackinnon_p_value(-3.5) < mackinnon_p_value(-2.0));
        assert!(mackinnon_p_value(-1.0) < mackinnon_p_value(1.0));
    }

    #[test]
    fn checker_reads_dated_series() {
        use chrono::{Duration, NaiveDate};

        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let values = random_walk(4, 60);
        let dates = (0..60).map(|i| base + Duration::days(i)).collect();
        let series = DatedSeries::new(dates, values.clone()).unwrap();

        let checker = StationarityChecker::default();
        assert_eq!(
            checker.check(&series).unwrap(),
            adf_test(&values, &AdfConfig::default()).unwrap()
        );
    }
}
