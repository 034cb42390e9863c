//! Linear model implementations

use crate::error::{RealtyError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Relative diagonal jitter that keeps rank-deficient designs (a full one-hot
/// block next to an intercept) solvable. Approximates the minimum-norm solution.
const OLS_JITTER: f64 = 1e-10;

/// Solve symmetric positive-definite system Ax = b using Cholesky decomposition.
/// Returns None if the matrix is not positive definite.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    // A = L * L^T
    let mut l = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }

            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 || !diag.is_finite() {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // Forward substitution: L * y = b
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * y[j];
        }
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L^T * x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    Some(x)
}

/// Gauss-Jordan inverse with partial pivoting (fallback when Cholesky fails)
fn matrix_inverse(m: &Array2<f64>) -> Option<Array2<f64>> {
    let n = m.nrows();
    if n != m.ncols() {
        return None;
    }

    // [M | I]
    let mut aug = Array2::<f64>::zeros((n, 2 * n));
    for i in 0..n {
        for j in 0..n {
            aug[[i, j]] = m[[i, j]];
        }
        aug[[i, n + i]] = 1.0;
    }

    for col in 0..n {
        let mut max_row = col;
        for row in col + 1..n {
            if aug[[row, col]].abs() > aug[[max_row, col]].abs() {
                max_row = row;
            }
        }

        if max_row != col {
            for j in 0..2 * n {
                aug.swap([col, j], [max_row, j]);
            }
        }

        if aug[[col, col]].abs() < 1e-12 {
            return None;
        }

        let pivot = aug[[col, col]];
        for j in 0..2 * n {
            aug[[col, j]] /= pivot;
        }

        for row in 0..n {
            if row != col {
                let factor = aug[[row, col]];
                if factor != 0.0 {
                    for j in 0..2 * n {
                        aug[[row, j]] -= factor * aug[[col, j]];
                    }
                }
            }
        }
    }

    let mut inv = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            inv[[i, j]] = aug[[i, n + j]];
        }
    }

    Some(inv)
}

fn check_shapes(x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(RealtyError::ShapeError {
            expected: format!("y length = {}", x.nrows()),
            actual: format!("y length = {}", y.len()),
        });
    }
    if x.nrows() == 0 {
        return Err(RealtyError::TrainingError("cannot fit on zero samples".to_string()));
    }
    Ok(())
}

/// Solve (Xc^T Xc + penalty*I) w = Xc^T yc on centered data and recover the intercept.
/// The intercept is never penalized.
fn fit_penalized(x: &Array2<f64>, y: &Array1<f64>, penalty: f64) -> Result<(Array1<f64>, f64)> {
    let n_features = x.ncols();

    let x_mean = x
        .mean_axis(Axis(0))
        .ok_or_else(|| RealtyError::TrainingError("empty design matrix".to_string()))?;
    let y_mean = y.mean().unwrap_or(0.0);
    let x_centered = x - &x_mean.clone().insert_axis(Axis(0));
    let y_centered = y - y_mean;

    let mut xtx = x_centered.t().dot(&x_centered);
    for i in 0..n_features {
        xtx[[i, i]] += penalty;
    }
    let xty = x_centered.t().dot(&y_centered);

    let coefficients = match cholesky_solve(&xtx, &xty) {
        Some(coef) => coef,
        None => match matrix_inverse(&xtx) {
            Some(inv) => inv.dot(&xty),
            None => {
                return Err(RealtyError::ComputationError(
                    "Matrix is singular, cannot solve normal equations".to_string(),
                ));
            }
        },
    };

    let intercept = y_mean - coefficients.dot(&x_mean);

    Ok((coefficients, intercept))
}

/// Ordinary least squares
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Fitted coefficients (weights)
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept (bias)
    pub intercept: Option<f64>,
    pub is_fitted: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Create a new linear regression model
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            is_fitted: false,
        }
    }

    /// Fit the model to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        check_shapes(x, y)?;

        // scale the jitter to the design so it stays negligible for well-posed problems
        let n_features = x.ncols().max(1);
        let gram_trace: f64 = x.iter().map(|v| v * v).sum::<f64>() / n_features as f64;
        let jitter = OLS_JITTER * gram_trace.max(1.0);

        let (coefficients, intercept) = fit_penalized(x, y, jitter)?;

        self.coefficients = Some(coefficients);
        self.intercept = Some(intercept);
        self.is_fitted = true;
        Ok(self)
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = match (&self.coefficients, self.is_fitted) {
            (Some(c), true) => c,
            _ => return Err(RealtyError::ModelNotFitted),
        };
        check_width(x, coefficients.len())?;
        Ok(x.dot(coefficients) + self.intercept.unwrap_or(0.0))
    }
}

/// L2-regularized least squares
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RidgeRegression {
    pub coefficients: Option<Array1<f64>>,
    pub intercept: Option<f64>,
    /// L2 regularization strength
    pub alpha: f64,
    pub is_fitted: bool,
}

impl Default for RidgeRegression {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RidgeRegression {
    pub fn new(alpha: f64) -> Self {
        Self {
            coefficients: None,
            intercept: None,
            alpha,
            is_fitted: false,
        }
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        check_shapes(x, y)?;
        if self.alpha < 0.0 || !self.alpha.is_finite() {
            return Err(RealtyError::InvalidInput(format!("ridge alpha must be >= 0, got {}", self.alpha)));
        }

        let (coefficients, intercept) = fit_penalized(x, y, self.alpha)?;

        self.coefficients = Some(coefficients);
        self.intercept = Some(intercept);
        self.is_fitted = true;
        Ok(self)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = match (&self.coefficients, self.is_fitted) {
            (Some(c), true) => c,
            _ => return Err(RealtyError::ModelNotFitted),
        };
        check_width(x, coefficients.len())?;
        Ok(x.dot(coefficients) + self.intercept.unwrap_or(0.0))
    }
}

fn check_width(x: &Array2<f64>, expected: usize) -> Result<()> {
    if x.ncols() != expected {
        return Err(RealtyError::ShapeError {
            expected: format!("{} features", expected),
            actual: format!("{} features", x.ncols()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_linear_regression_recovers_line() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![3.0, 5.0, 7.0, 9.0, 11.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let coef = model.coefficients.as_ref().unwrap();
        assert!((coef[0] - 2.0).abs() < 1e-6);
        assert!((model.intercept.unwrap() - 1.0).abs() < 1e-6);

        let pred = model.predict(&array![[6.0]]).unwrap();
        assert!((pred[0] - 13.0).abs() < 1e-6);
    }

    #[test]
    fn test_linear_regression_rank_deficient_one_hot() {
        // two one-hot columns that always sum to one, plus an intercept
        let x = array![
            [1.0, 0.0, 1.0],
            [0.0, 1.0, 2.0],
            [1.0, 0.0, 3.0],
            [0.0, 1.0, 4.0],
            [1.0, 0.0, 5.0],
        ];
        let y = array![12.0, 4.0, 16.0, 8.0, 20.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();
        let pred = model.predict(&x).unwrap();

        for (p, t) in pred.iter().zip(y.iter()) {
            assert!(p.is_finite());
            assert!((p - t).abs() < 1e-3, "prediction {} vs {}", p, t);
        }
    }

    #[test]
    fn test_ridge_shrinks_coefficients() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![2.0, 4.0, 6.0, 8.0, 10.0];

        let mut ols = LinearRegression::new();
        ols.fit(&x, &y).unwrap();
        let mut ridge = RidgeRegression::new(10.0);
        ridge.fit(&x, &y).unwrap();

        let ols_coef = ols.coefficients.as_ref().unwrap()[0];
        let ridge_coef = ridge.coefficients.as_ref().unwrap()[0];
        assert!(ridge_coef < ols_coef);
        // centered sum of squares is 10, so w = 20 / (10 + 10)
        assert!((ridge_coef - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_predict_before_fit() {
        let model = RidgeRegression::default();
        assert!(matches!(model.predict(&array![[1.0]]), Err(RealtyError::ModelNotFitted)));
    }

    #[test]
    fn test_shape_mismatch() {
        let mut model = LinearRegression::new();
        let err = model.fit(&array![[1.0], [2.0]], &array![1.0]).unwrap_err();
        assert!(matches!(err, RealtyError::ShapeError { .. }));
    }

    #[test]
    fn test_negative_alpha_rejected() {
        let mut model = RidgeRegression::new(-1.0);
        assert!(model.fit(&array![[1.0], [2.0]], &array![1.0, 2.0]).is_err());
    }
}
