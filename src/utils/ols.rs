//! Ordinary least squares on a column-major design matrix.
//!
//! Used for the Dickey-Fuller regressions and for conditional least squares
//! estimation of pure autoregressive models.

/// Fitted OLS regression `y = X @ coefficients + e`.
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// One coefficient per design column.
    pub coefficients: Vec<f64>,
    /// Standard errors of the coefficients.
    pub std_errors: Vec<f64>,
    /// Residual sum of squares.
    pub rss: f64,
    /// Number of observations.
    pub nobs: usize,
}

impl OlsFit {
    /// Residual degrees of freedom.
    pub fn df_resid(&self) -> usize {
        self.nobs.saturating_sub(self.coefficients.len())
    }

    /// t statistic of coefficient `index`.
    pub fn t_stat(&self, index: usize) -> f64 {
        self.coefficients[index] / self.std_errors[index]
    }
}

/// Fit OLS by Cholesky factorisation of the normal equations.
///
/// `columns` holds the design matrix column by column; every column must have
/// the same length as `y`. Returns `None` when the design is rank deficient or
/// leaves no residual degrees of freedom.
pub fn ols_fit(y: &[f64], columns: &[Vec<f64>]) -> Option<OlsFit> {
    let n = y.len();
    let k = columns.len();
    if k == 0 || n <= k || columns.iter().any(|c| c.len() != n) {
        return None;
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for i in 0..k {
        for j in 0..=i {
            let dot: f64 = columns[i].iter().zip(&columns[j]).map(|(a, b)| a * b).sum();
            xtx[i][j] = dot;
            xtx[j][i] = dot;
        }
        xty[i] = columns[i].iter().zip(y).map(|(a, b)| a * b).sum();
    }

    let chol = cholesky(&xtx)?;
    let coefficients = chol_solve(&chol, &xty);

    let rss: f64 = (0..n)
        .map(|t| {
            let fitted: f64 = columns
                .iter()
                .zip(&coefficients)
                .map(|(col, b)| col[t] * b)
                .sum();
            (y[t] - fitted).powi(2)
        })
        .sum();
    let sigma2 = rss / (n - k) as f64;

    // Diagonal of (X'X)^-1 via unit-vector solves.
    let std_errors = (0..k)
        .map(|i| {
            let mut unit = vec![0.0; k];
            unit[i] = 1.0;
            (sigma2 * chol_solve(&chol, &unit)[i]).sqrt()
        })
        .collect();

    Some(OlsFit {
        coefficients,
        std_errors,
        rss,
        nobs: n,
    })
}

/// Lower-triangular Cholesky factor, or `None` if `a` is not numerically
/// positive definite.
fn cholesky(a: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if !(sum > 1e-12 * a[i][i].abs()) {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    Some(l)
}

/// Solve `L L' x = b`.
fn chol_solve(l: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = b.len();

    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exact_line() {
        // y = 2 + 3x
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 + 3.0 * v).collect();
        let fit = ols_fit(&y, &[vec![1.0; 10], x]).unwrap();

        assert_relative_eq!(fit.coefficients[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(fit.coefficients[1], 3.0, epsilon = 1e-9);
        assert_relative_eq!(fit.rss, 0.0, epsilon = 1e-9);
        assert_eq!(fit.df_resid(), 8);
    }

    #[test]
    fn standard_error_of_mean() {
        // Regressing on a constant gives the mean and s / sqrt(n)
        let y = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let fit = ols_fit(&y, &[vec![1.0; 5]]).unwrap();

        assert_relative_eq!(fit.coefficients[0], 3.0, epsilon = 1e-12);
        // sample variance 2.5, se = sqrt(2.5 / 5)
        assert_relative_eq!(fit.std_errors[0], 0.5f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(fit.t_stat(0), 3.0 / 0.5f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn collinear_design_is_rejected() {
        let y = vec![1.0, 2.0, 3.0, 4.0];
        let ones = vec![1.0; 4];
        let fives = vec![5.0; 4];
        assert!(ols_fit(&y, &[ones, fives]).is_none());
    }

    #[test]
    fn no_degrees_of_freedom_is_rejected() {
        let y = vec![1.0, 2.0];
        assert!(ols_fit(&y, &[vec![1.0; 2], vec![0.0, 1.0]]).is_none());
    }

    #[test]
    fn column_length_mismatch_is_rejected() {
        assert!(ols_fit(&[1.0, 2.0, 3.0], &[vec![1.0; 2]]).is_none());
    }
}
