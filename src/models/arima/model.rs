//! ARIMA (Autoregressive Integrated Moving Average) model.

use super::order::ModelOrder;
use crate::error::{ForecastError, Result};
use crate::models::traits::{Forecaster, PointForecast};
use crate::transform::{difference_values, integrate};
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::{normal_quantile, ols_fit};
use serde::{Deserialize, Serialize};

/// Bound on the partial autocorrelations searched by the optimiser.
const PACF_BOUND: f64 = 0.99;

/// Per-run iteration floor for each estimated parameter.
const ITERATIONS_PER_PARAMETER: usize = 1000;

/// Default per-run iteration cap for small models.
const DEFAULT_MAX_ITER: usize = 5000;

/// Whether the differenced series is modelled around a non-zero mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeanTerm {
    /// Mean for undifferenced models only (`d == 0`).
    #[default]
    Auto,
    /// Always estimate a mean (a drift when `d >= 1`).
    Include,
    /// Never estimate a mean.
    Exclude,
}

impl MeanTerm {
    /// Whether a mean is estimated for differencing order `d`.
    pub fn includes_mean(self, d: usize) -> bool {
        match self {
            MeanTerm::Auto => d == 0,
            MeanTerm::Include => true,
            MeanTerm::Exclude => false,
        }
    }
}

/// Estimation settings for [`Arima`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArimaConfig {
    pub mean: MeanTerm,
    /// Fail with `ModelFit` when the optimiser has not converged after every
    /// restart; otherwise log a warning and keep the best point found.
    pub require_convergence: bool,
    /// Nelder-Mead iteration cap per run (models with an MA part). `None`
    /// scales with the model: `max(5000, 1000 * parameters)`.
    pub max_iter: Option<usize>,
    /// Runs restarted from the best point before giving up on convergence.
    pub max_restarts: usize,
    /// Nelder-Mead tolerance.
    pub tolerance: f64,
}

impl Default for ArimaConfig {
    fn default() -> Self {
        Self {
            mean: MeanTerm::Auto,
            require_convergence: true,
            max_iter: None,
            max_restarts: 10,
            tolerance: 1e-9,
        }
    }
}

impl ArimaConfig {
    pub fn with_mean(mut self, mean: MeanTerm) -> Self {
        self.mean = mean;
        self
    }

    pub fn with_require_convergence(mut self, require: bool) -> Self {
        self.require_convergence = require;
        self
    }

    /// Fix the per-run iteration cap instead of scaling it with the model.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = Some(max_iter);
        self
    }

    pub fn with_max_restarts(mut self, max_restarts: usize) -> Self {
        self.max_restarts = max_restarts;
        self
    }

    /// Per-run iteration cap for a model with `n_params` parameters.
    pub fn iteration_cap(&self, n_params: usize) -> usize {
        self.max_iter
            .unwrap_or_else(|| DEFAULT_MAX_ITER.max(ITERATIONS_PER_PARAMETER * n_params))
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iter == Some(0) {
            return Err(ForecastError::InvalidParameter(
                "max_iter must be positive".to_string(),
            ));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(ForecastError::InvalidParameter(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// ARIMA forecasting model.
///
/// ARIMA(p, d, q) combines:
/// - AR(p): autoregression on the differenced series
/// - I(d): differencing `d` times
/// - MA(q): moving average of past shocks
///
/// Parameters are estimated by conditional sum of squares on the
/// differenced series `w`:
///
/// `w_t = c + Σ φ_i w_{t-i} + Σ θ_j e_{t-j} + e_t`
///
/// Pure AR models are solved exactly by least squares. Models with an MA
/// part are minimised with bounded Nelder-Mead over partial
/// autocorrelations, which keeps the AR part stationary and the MA part
/// invertible.
#[derive(Debug, Clone)]
pub struct Arima {
    order: ModelOrder,
    config: ArimaConfig,
    ar_coefficients: Vec<f64>,
    ma_coefficients: Vec<f64>,
    /// Constant `c`; zero when no mean is estimated.
    intercept: f64,
    include_mean: bool,
    /// Series the model was fitted to.
    original: Option<Vec<f64>>,
    differenced: Option<Vec<f64>>,
    /// One-step predictions on the differenced scale, NaN before `p`.
    fitted_diff: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    sigma2: Option<f64>,
    aic: Option<f64>,
    bic: Option<f64>,
    iterations: usize,
    converged: bool,
}

impl Arima {
    /// Create an unfitted model with default estimation settings.
    pub fn new(order: ModelOrder) -> Self {
        Self::with_config(order, ArimaConfig::default())
    }

    pub fn with_config(order: ModelOrder, config: ArimaConfig) -> Self {
        Self {
            order,
            config,
            ar_coefficients: vec![],
            ma_coefficients: vec![],
            intercept: 0.0,
            include_mean: false,
            original: None,
            differenced: None,
            fitted_diff: None,
            residuals: None,
            sigma2: None,
            aic: None,
            bic: None,
            iterations: 0,
            converged: false,
        }
    }

    pub fn order(&self) -> ModelOrder {
        self.order
    }

    pub fn config(&self) -> &ArimaConfig {
        &self.config
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Whether the fitted model carries a mean (drift) term.
    pub fn include_mean(&self) -> bool {
        self.include_mean
    }

    /// Innovation variance, CSS divided by the number of residuals.
    pub fn sigma2(&self) -> Option<f64> {
        self.sigma2
    }

    pub fn aic(&self) -> Option<f64> {
        self.aic
    }

    pub fn bic(&self) -> Option<f64> {
        self.bic
    }

    /// Optimiser iterations used; zero for least-squares fits.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether estimation converged. Least-squares fits always do.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Estimate `(intercept, ar)` by least squares on the differenced series.
    fn least_squares(w: &[f64], p: usize, include_mean: bool) -> Result<(f64, Vec<f64>)> {
        if p == 0 && !include_mean {
            return Ok((0.0, vec![]));
        }

        let y = w[p..].to_vec();
        let mut columns = Vec::with_capacity(p + 1);
        if include_mean {
            columns.push(vec![1.0; y.len()]);
        }
        for i in 1..=p {
            columns.push((p..w.len()).map(|t| w[t - i]).collect());
        }

        let fit = ols_fit(&y, &columns).ok_or_else(|| {
            ForecastError::ModelFit("least-squares design matrix is singular".to_string())
        })?;

        let mut coefficients = fit.coefficients;
        let intercept = if include_mean {
            coefficients.remove(0)
        } else {
            0.0
        };
        Ok((intercept, coefficients))
    }

    /// Minimise the CSS over the intercept and the AR and MA partial
    /// autocorrelations, restarting from the best point until converged.
    fn estimate_arma(
        &mut self,
        w: &[f64],
        n_resid: usize,
    ) -> Result<(f64, Vec<f64>, Vec<f64>)> {
        let p = self.order.p;
        let q = self.order.q;
        let include_mean = self.include_mean;

        let mut initial = Vec::with_capacity(p + q + 1);
        let start = Self::least_squares(w, p, include_mean)
            .ok()
            .and_then(|(intercept, ar)| coefficients_to_pacf(&ar).map(|pacf| (intercept, pacf)));
        match start {
            Some((intercept, pacf)) => {
                if include_mean {
                    initial.push(intercept);
                }
                initial.extend(pacf);
            }
            None => {
                if include_mean {
                    initial.push(crate::utils::mean(w));
                }
                initial.extend((0..p).map(|i| 0.1 / (i + 1) as f64));
            }
        }
        initial.extend((0..q).map(|i| 0.1 / (i + 1) as f64));

        let mut bounds = Vec::with_capacity(initial.len());
        if include_mean {
            bounds.push((f64::NEG_INFINITY, f64::INFINITY));
        }
        bounds.extend(std::iter::repeat((-PACF_BOUND, PACF_BOUND)).take(p + q));

        let config = NelderMeadConfig {
            max_iter: self.config.iteration_cap(initial.len()),
            tolerance: self.config.tolerance,
            ..Default::default()
        };

        let objective = |params: &[f64]| {
            let (intercept, ar, ma) = unpack_params(params, include_mean, p);
            let value =
                sum_of_squares(&css_residuals(w, p, intercept, &ar, &ma)[p..]) / n_resid as f64;
            if value.is_finite() {
                value
            } else {
                f64::INFINITY
            }
        };

        let mut result = nelder_mead(&objective, &initial, Some(&bounds), &config)?;
        let mut iterations = result.iterations;
        let mut restarts = 0;
        while !result.converged && restarts < self.config.max_restarts {
            restarts += 1;
            // The start is a simplex vertex, so a restart never loses ground.
            result = nelder_mead(&objective, &result.point, Some(&bounds), &config)?;
            iterations += result.iterations;
        }

        if !result.value.is_finite() {
            return Err(ForecastError::ModelFit(
                "conditional sum of squares is not finite".to_string(),
            ));
        }

        self.iterations = iterations;
        self.converged = result.converged;
        if restarts > 0 {
            tracing::debug!(
                order = %self.order,
                restarts,
                iterations,
                converged = result.converged,
                "restarted ARIMA optimizer"
            );
        }
        if !result.converged {
            if self.config.require_convergence {
                return Err(ForecastError::ModelFit(format!(
                    "optimizer did not converge after {iterations} iterations and {restarts} restarts"
                )));
            }
            tracing::warn!(
                order = %self.order,
                iterations,
                restarts,
                "ARIMA optimizer did not converge, using best parameters found"
            );
        }

        Ok(unpack_params(&result.point, include_mean, p))
    }

    /// MA(∞) weights of the integrated process, `ψ_0 = 1`.
    fn psi_weights(&self, horizon: usize) -> Vec<f64> {
        // φ(B)(1 - B)^d
        let mut poly = vec![1.0];
        poly.extend(self.ar_coefficients.iter().map(|a| -a));
        for _ in 0..self.order.d {
            let mut next = vec![0.0; poly.len() + 1];
            for (i, c) in poly.iter().enumerate() {
                next[i] += c;
                next[i + 1] -= c;
            }
            poly = next;
        }
        let phi: Vec<f64> = poly[1..].iter().map(|c| -c).collect();

        let mut psi = vec![0.0; horizon];
        if horizon == 0 {
            return psi;
        }
        psi[0] = 1.0;
        for j in 1..horizon {
            let mut value = self.ma_coefficients.get(j - 1).copied().unwrap_or(0.0);
            for (i, coefficient) in phi.iter().enumerate().take(j) {
                value += coefficient * psi[j - 1 - i];
            }
            psi[j] = value;
        }
        psi
    }

    fn not_fitted() -> ForecastError {
        ForecastError::ModelFit("model must be fitted before predicting".to_string())
    }
}

/// Map an optimiser point `[intercept?, ar pacf.., ma pacf..]` to
/// `(intercept, ar, ma)` coefficients.
fn unpack_params(params: &[f64], include_mean: bool, p: usize) -> (f64, Vec<f64>, Vec<f64>) {
    let (intercept, rest) = if include_mean {
        (params[0], &params[1..])
    } else {
        (0.0, params)
    };
    let (ar, ma) = rest.split_at(p);
    let ar = pacf_to_coefficients(ar);
    // 1 + θ(B) = 1 - ψ(B) with ψ built like a stationary AR polynomial.
    let ma = pacf_to_coefficients(ma).into_iter().map(|c| -c).collect();
    (intercept, ar, ma)
}

/// Durbin-Levinson map from partial autocorrelations in (-1, 1) to the
/// coefficients of a stationary AR polynomial.
fn pacf_to_coefficients(pacf: &[f64]) -> Vec<f64> {
    let mut coefficients: Vec<f64> = Vec::with_capacity(pacf.len());
    for (k, &r) in pacf.iter().enumerate() {
        let previous = coefficients.clone();
        for (i, c) in coefficients.iter_mut().enumerate() {
            *c = previous[i] - r * previous[k - 1 - i];
        }
        coefficients.push(r);
    }
    coefficients
}

/// Inverse of [`pacf_to_coefficients`]; `None` when the polynomial is not
/// stationary.
fn coefficients_to_pacf(coefficients: &[f64]) -> Option<Vec<f64>> {
    let mut current = coefficients.to_vec();
    let mut pacf = vec![0.0; coefficients.len()];
    for k in (0..coefficients.len()).rev() {
        let r = current[k];
        if r.is_nan() || r.abs() >= 1.0 {
            return None;
        }
        pacf[k] = r;
        current = (0..k)
            .map(|i| (current[i] + r * current[k - 1 - i]) / (1.0 - r * r))
            .collect();
    }
    Some(pacf)
}

/// Residuals of the conditional recursion; entries before `p` are zero.
fn css_residuals(w: &[f64], p: usize, intercept: f64, ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let mut residuals = vec![0.0; w.len()];
    for t in p..w.len() {
        let mut pred = intercept;
        for (i, phi) in ar.iter().enumerate() {
            pred += phi * w[t - 1 - i];
        }
        for (j, theta) in ma.iter().enumerate() {
            if t > j {
                pred += theta * residuals[t - 1 - j];
            }
        }
        residuals[t] = w[t] - pred;
    }
    residuals
}

fn sum_of_squares(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum()
}

impl Default for Arima {
    fn default() -> Self {
        Self::new(ModelOrder::default())
    }
}

impl Forecaster for Arima {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidSeries(
                "ARIMA input contains non-finite values".to_string(),
            ));
        }
        self.config.validate()?;
        self.order.validate()?;

        let ModelOrder { p, d, q } = self.order;
        let include_mean = self.config.mean.includes_mean(d);
        let n_params = p + q + usize::from(include_mean);
        let n_resid = values.len().saturating_sub(d + p);
        if n_resid <= n_params {
            return Err(ForecastError::ModelFit(format!(
                "series of length {} is too short for ARIMA{}: {} usable residuals for {} parameters",
                values.len(),
                self.order,
                n_resid,
                n_params
            )));
        }

        self.include_mean = include_mean;
        let w = difference_values(values, d);

        if q == 0 {
            let (intercept, ar) = Self::least_squares(&w, p, include_mean)?;
            self.intercept = intercept;
            self.ar_coefficients = ar;
            self.ma_coefficients = vec![];
            self.iterations = 0;
            self.converged = true;
        } else {
            let (intercept, ar, ma) = self.estimate_arma(&w, n_resid)?;
            self.intercept = intercept;
            self.ar_coefficients = ar;
            self.ma_coefficients = ma;
        }

        let residuals = css_residuals(
            &w,
            p,
            self.intercept,
            &self.ar_coefficients,
            &self.ma_coefficients,
        );
        let fitted: Vec<f64> = w
            .iter()
            .zip(&residuals)
            .enumerate()
            .map(|(t, (x, e))| if t < p { f64::NAN } else { x - e })
            .collect();

        let n_eff = n_resid as f64;
        let sigma2 = sum_of_squares(&residuals[p..]) / n_eff;
        if !sigma2.is_finite() {
            return Err(ForecastError::ModelFit(
                "residual variance is not finite".to_string(),
            ));
        }

        // Gaussian log-likelihood; the variance counts as a parameter.
        let k = (n_params + 1) as f64;
        let ll = -0.5 * n_eff * (1.0 + sigma2.ln() + (2.0 * std::f64::consts::PI).ln());
        self.aic = Some(-2.0 * ll + 2.0 * k);
        self.bic = Some(-2.0 * ll + k * n_eff.ln());
        self.sigma2 = Some(sigma2);

        tracing::debug!(
            order = %self.order,
            intercept = self.intercept,
            ar = ?self.ar_coefficients,
            ma = ?self.ma_coefficients,
            sigma2,
            "fitted ARIMA"
        );

        self.original = Some(values.to_vec());
        self.differenced = Some(w);
        self.fitted_diff = Some(fitted);
        self.residuals = Some(residuals);

        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<PointForecast> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "forecast horizon must be at least 1".to_string(),
            ));
        }
        let original = self.original.as_ref().ok_or_else(Self::not_fitted)?;
        let w = self.differenced.as_ref().ok_or_else(Self::not_fitted)?;
        let residuals = self.residuals.as_ref().ok_or_else(Self::not_fitted)?;

        let mut extended = w.clone();
        let mut shocks = residuals.clone();
        for _ in 0..horizon {
            let t = extended.len();
            let mut pred = self.intercept;
            for (i, phi) in self.ar_coefficients.iter().enumerate() {
                pred += phi * extended[t - 1 - i];
            }
            for (j, theta) in self.ma_coefficients.iter().enumerate() {
                if t > j {
                    pred += theta * shocks[t - 1 - j];
                }
            }
            extended.push(pred);
            // Future shocks have expectation zero.
            shocks.push(0.0);
        }

        let forecast_diff = &extended[w.len()..];
        Ok(PointForecast::from_values(integrate(
            forecast_diff,
            original,
            self.order.d,
        )))
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<PointForecast> {
        if !(level > 0.0 && level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "interval level must lie in (0, 1), got {level}"
            )));
        }
        let forecast = self.predict(horizon)?;
        let sigma2 = self.sigma2.ok_or_else(Self::not_fitted)?;
        let z = normal_quantile((1.0 + level) / 2.0)?;

        let mut variance = 0.0;
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (point, psi) in forecast.point.iter().zip(self.psi_weights(horizon)) {
            variance += sigma2 * psi * psi;
            let half_width = z * variance.sqrt();
            lower.push(point - half_width);
            upper.push(point + half_width);
        }

        PointForecast::with_intervals(forecast.point, lower, upper)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted_diff.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "ARIMA"
    }
}
