//! Bounded Nelder-Mead simplex minimisation used for ARMA estimation.

use crate::error::{ForecastError, Result};
use std::cmp::Ordering;

/// Outcome of a Nelder-Mead run.
#[derive(Debug, Clone)]
pub struct Minimum {
    /// Best point found.
    pub point: Vec<f64>,
    /// Objective value at `point`.
    pub value: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether a stopping tolerance was met before `max_iter`.
    pub converged: bool,
}

/// Configuration for Nelder-Mead optimisation.
#[derive(Debug, Clone, PartialEq)]
pub struct NelderMeadConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Relative tolerance on the spread of objective values, and absolute
    /// tolerance on the simplex diameter.
    pub tolerance: f64,
    /// Reflection coefficient (default: 1.0).
    pub alpha: f64,
    /// Expansion coefficient (default: 2.0).
    pub gamma: f64,
    /// Contraction coefficient (default: 0.5).
    pub rho: f64,
    /// Shrinkage coefficient (default: 0.5).
    pub sigma: f64,
    /// Initial simplex step size (default: 0.05).
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

/// Minimise `objective` starting from `initial`, keeping every coordinate
/// inside the optional `(min, max)` bounds.
///
/// # Example
/// ```
/// use stock_forecast::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// // Minimize (x-2)^2 + (y-3)^2
/// let min = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     &NelderMeadConfig::default(),
/// )
/// .unwrap();
///
/// assert!(min.converged);
/// assert!((min.point[0] - 2.0).abs() < 0.01);
/// assert!((min.point[1] - 3.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: &NelderMeadConfig,
) -> Result<Minimum>
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return Err(ForecastError::InvalidParameter(
            "nelder-mead needs at least one parameter".to_string(),
        ));
    }
    if let Some(b) = bounds {
        if b.len() != n {
            return Err(ForecastError::InvalidParameter(format!(
                "{} bounds for {} parameters",
                b.len(),
                n
            )));
        }
    }

    let start = clamp_to(initial, bounds);
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(start.clone());
    for i in 0..n {
        let mut vertex = start.clone();
        let step = if start[i].abs() > 1e-10 {
            config.initial_step * start[i].abs()
        } else {
            config.initial_step
        };
        // Step inward when the start sits on its upper bound.
        let upper = bounds.map_or(f64::INFINITY, |b| b[i].1);
        vertex[i] = if vertex[i] + step <= upper {
            vertex[i] + step
        } else {
            vertex[i] - step
        };
        simplex.push(clamp_to(&vertex, bounds));
    }

    let mut values: Vec<f64> = simplex.iter().map(|v| objective(v)).collect();
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;

        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));
        let best = order[0];
        let worst = order[n];
        let second_worst = order[n - 1];

        let spread = values[worst] - values[best];
        if spread <= config.tolerance * (1.0 + values[best].abs()) {
            converged = true;
            break;
        }

        let centroid = centroid_without(&simplex, worst);
        let diameter = simplex
            .iter()
            .map(|v| distance(v, &centroid))
            .fold(0.0, f64::max);
        if diameter < config.tolerance {
            converged = true;
            break;
        }

        let reflected = clamp_to(&along(&centroid, &simplex[worst], -config.alpha), bounds);
        let reflected_value = objective(&reflected);

        if reflected_value < values[best] {
            let expanded = clamp_to(&along(&centroid, &reflected, config.gamma), bounds);
            let expanded_value = objective(&expanded);
            if expanded_value < reflected_value {
                simplex[worst] = expanded;
                values[worst] = expanded_value;
            } else {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
            }
            continue;
        }

        if reflected_value < values[second_worst] {
            simplex[worst] = reflected;
            values[worst] = reflected_value;
            continue;
        }

        let (toward, threshold) = if reflected_value < values[worst] {
            (reflected.as_slice(), reflected_value)
        } else {
            (simplex[worst].as_slice(), values[worst])
        };
        let contracted = clamp_to(&along(&centroid, toward, config.rho), bounds);
        let contracted_value = objective(&contracted);
        if contracted_value < threshold {
            simplex[worst] = contracted;
            values[worst] = contracted_value;
            continue;
        }

        let anchor = simplex[best].clone();
        for i in 0..=n {
            if i == best {
                continue;
            }
            let shrunk: Vec<f64> = anchor
                .iter()
                .zip(&simplex[i])
                .map(|(a, x)| a + config.sigma * (x - a))
                .collect();
            simplex[i] = clamp_to(&shrunk, bounds);
            values[i] = objective(&simplex[i]);
        }
    }

    let best = (0..=n)
        .min_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal))
        .unwrap_or(0);

    Ok(Minimum {
        point: simplex[best].clone(),
        value: values[best],
        iterations,
        converged,
    })
}

/// Centroid of every vertex except `exclude`.
fn centroid_without(simplex: &[Vec<f64>], exclude: usize) -> Vec<f64> {
    let dims = simplex[0].len();
    let count = (simplex.len() - 1) as f64;
    let mut centroid = vec![0.0; dims];
    for (_, vertex) in simplex.iter().enumerate().filter(|(i, _)| *i != exclude) {
        for (c, x) in centroid.iter_mut().zip(vertex) {
            *c += x;
        }
    }
    centroid.iter_mut().for_each(|c| *c /= count);
    centroid
}

/// `origin + factor * (point - origin)`.
fn along(origin: &[f64], point: &[f64], factor: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(point)
        .map(|(o, p)| o + factor * (p - o))
        .collect()
}

fn clamp_to(point: &[f64], bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    match bounds {
        None => point.to_vec(),
        Some(b) => point
            .iter()
            .zip(b)
            .map(|(&x, &(lo, hi))| x.clamp(lo, hi))
            .collect(),
    }
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quadratic_2d() {
        let min = nelder_mead(
            |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
            &[0.0, 0.0],
            None,
            &NelderMeadConfig::default(),
        )
        .unwrap();

        assert!(min.converged);
        assert_relative_eq!(min.point[0], 2.0, epsilon = 1e-3);
        assert_relative_eq!(min.point[1], 3.0, epsilon = 1e-3);
        assert_relative_eq!(min.value, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn rosenbrock() {
        // Minimum at (1, 1)
        let config = NelderMeadConfig {
            max_iter: 5000,
            tolerance: 1e-12,
            ..Default::default()
        };

        let min = nelder_mead(
            |x| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2),
            &[0.0, 0.0],
            None,
            &config,
        )
        .unwrap();

        assert_relative_eq!(min.point[0], 1.0, epsilon = 1e-2);
        assert_relative_eq!(min.point[1], 1.0, epsilon = 1e-2);
    }

    #[test]
    fn respects_bounds() {
        // Unconstrained optimum x=5 lies outside [0, 3]
        let min = nelder_mead(
            |x| (x[0] - 5.0).powi(2),
            &[1.0],
            Some(&[(0.0, 3.0)]),
            &NelderMeadConfig::default(),
        )
        .unwrap();

        assert_relative_eq!(min.point[0], 3.0, epsilon = 1e-4);
    }

    #[test]
    fn start_outside_bounds_is_clamped() {
        let min = nelder_mead(
            |x| (x[0] - 0.5).powi(2),
            &[4.0],
            Some(&[(-0.99, 0.99)]),
            &NelderMeadConfig::default(),
        )
        .unwrap();

        assert!(min.point[0] <= 0.99);
        assert_relative_eq!(min.point[0], 0.5, epsilon = 1e-3);
    }

    #[test]
    fn ar1_sum_of_squares() {
        // y_t = 0.6 y_{t-1} + e_t with LCG shocks
        let mut state: u64 = 12345;
        let mut y = vec![1.0];
        for t in 1..200 {
            state = (state * 1_103_515_245 + 12_345) % (1 << 31);
            let shock = state as f64 / (1u64 << 31) as f64 - 0.5;
            y.push(0.6 * y[t - 1] + shock);
        }
        let css = |params: &[f64]| {
            y.windows(2)
                .map(|w| (w[1] - params[0] * w[0]).powi(2))
                .sum::<f64>()
        };

        let min = nelder_mead(
            css,
            &[0.1],
            Some(&[(-0.99, 0.99)]),
            &NelderMeadConfig::default(),
        )
        .unwrap();

        assert!(min.converged);
        assert!((min.point[0] - 0.6).abs() < 0.15);
    }

    #[test]
    fn empty_parameters_are_rejected() {
        let result = nelder_mead(|_| 0.0, &[], None, &NelderMeadConfig::default());
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
    }

    #[test]
    fn bounds_length_must_match() {
        let result = nelder_mead(
            |x| x[0] * x[0],
            &[1.0, 2.0],
            Some(&[(0.0, 1.0)]),
            &NelderMeadConfig::default(),
        );
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
    }
}
