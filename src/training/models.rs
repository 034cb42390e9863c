//! Estimator configurations, fitted model variants and regression metrics

use crate::error::{RealtyError, Result};
use super::linear_models::{LinearRegression, RidgeRegression};
use super::random_forest::RandomForest;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Estimator configuration of a candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EstimatorSpec {
    LinearRegression,
    Ridge { alpha: f64 },
    RandomForest { n_estimators: usize, random_state: u64 },
}

impl EstimatorSpec {
    /// Fit a fresh estimator of this kind
    pub fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<TrainedModel> {
        match *self {
            EstimatorSpec::LinearRegression => {
                let mut model = LinearRegression::new();
                model.fit(x, y)?;
                Ok(TrainedModel::LinearRegression(model))
            }
            EstimatorSpec::Ridge { alpha } => {
                let mut model = RidgeRegression::new(alpha);
                model.fit(x, y)?;
                Ok(TrainedModel::RidgeRegression(model))
            }
            EstimatorSpec::RandomForest { n_estimators, random_state } => {
                let mut model = RandomForest::new_regressor(n_estimators).with_random_state(random_state);
                model.fit(x, y)?;
                Ok(TrainedModel::RandomForestRegressor(model))
            }
        }
    }
}

/// Enum to hold trained model variants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TrainedModel {
    LinearRegression(LinearRegression),
    RidgeRegression(RidgeRegression),
    RandomForestRegressor(RandomForest),
}

impl TrainedModel {
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        match self {
            TrainedModel::LinearRegression(m) => m.predict(x),
            TrainedModel::RidgeRegression(m) => m.predict(x),
            TrainedModel::RandomForestRegressor(m) => m.predict(x),
        }
    }

    /// Short estimator label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            TrainedModel::LinearRegression(_) => "linear_regression",
            TrainedModel::RidgeRegression(_) => "ridge",
            TrainedModel::RandomForestRegressor(_) => "random_forest",
        }
    }
}

/// Held-out regression metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Coefficient of determination
    pub r2: f64,
    pub n_samples: usize,
}

impl RegressionMetrics {
    /// Compute MAE, RMSE and R². With a constant truth vector R² is 1.0 for a
    /// perfect prediction and 0.0 otherwise.
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(RealtyError::ShapeError {
                expected: format!("{} predictions", y_true.len()),
                actual: format!("{} predictions", y_pred.len()),
            });
        }
        if y_true.is_empty() {
            return Err(RealtyError::InvalidInput("cannot score an empty evaluation set".to_string()));
        }

        let n = y_true.len() as f64;
        let errors: Vec<f64> = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(t, p)| t - p)
            .collect();

        let mse: f64 = errors.iter().map(|e| e * e).sum::<f64>() / n;
        let mae: f64 = errors.iter().map(|e| e.abs()).sum::<f64>() / n;

        let y_mean: f64 = y_true.iter().sum::<f64>() / n;
        let ss_tot: f64 = y_true.iter().map(|y| (y - y_mean).powi(2)).sum();
        let ss_res: f64 = errors.iter().map(|e| e * e).sum();

        let r2 = if ss_tot > 0.0 {
            1.0 - ss_res / ss_tot
        } else if ss_res == 0.0 {
            1.0
        } else {
            0.0
        };

        Ok(Self {
            mae,
            mse,
            rmse: mse.sqrt(),
            r2,
            n_samples: y_true.len(),
        })
    }
}
