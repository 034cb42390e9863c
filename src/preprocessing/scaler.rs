//! Standard (z-score) feature scaling

use crate::error::{RealtyError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameters for a fitted column
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScalerParams {
    mean: f64,
    scale: f64,
}

/// Standard scaling: (x - mean) / std, with the population standard deviation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    params: HashMap<String, ScalerParams>,
    is_fitted: bool,
}

impl StandardScaler {
    /// Create a new scaler
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit one column. A constant column gets scale 1.0 so it maps to zero.
    pub fn fit_column(&mut self, name: &str, values: &[f64]) -> Result<&mut Self> {
        if values.is_empty() {
            return Err(RealtyError::PreprocessingError(format!(
                "cannot fit scaler on empty column '{}'",
                name
            )));
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();

        self.params.insert(
            name.to_string(),
            ScalerParams {
                mean,
                scale: if std == 0.0 || !std.is_finite() { 1.0 } else { std },
            },
        );
        self.is_fitted = true;
        Ok(self)
    }

    /// Scale one column with its fitted parameters
    pub fn transform_column(&self, name: &str, values: &[f64]) -> Result<Vec<f64>> {
        if !self.is_fitted {
            return Err(RealtyError::ModelNotFitted);
        }
        let params = self
            .params
            .get(name)
            .ok_or_else(|| RealtyError::SchemaError(format!("scaler was not fitted on column '{}'", name)))?;

        Ok(values.iter().map(|v| (v - params.mean) / params.scale).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_scaling_zero_mean_unit_variance() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let mut scaler = StandardScaler::new();
        scaler.fit_column("x", &values).unwrap();

        let scaled = scaler.transform_column("x", &values).unwrap();
        let n = scaled.len() as f64;
        let mean = scaled.iter().sum::<f64>() / n;
        let var = scaled.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        assert!(mean.abs() < 1e-12);
        assert!((var - 1.0).abs() < 1e-12);
        // mean 5, population std 2
        assert!((scaled[0] + 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column() {
        let mut scaler = StandardScaler::new();
        scaler.fit_column("c", &[3.0, 3.0, 3.0]).unwrap();
        let scaled = scaler.transform_column("c", &[3.0, 4.0]).unwrap();
        assert_eq!(scaled, vec![0.0, 1.0]);
    }

    #[test]
    fn test_unfitted_scaler() {
        let scaler = StandardScaler::new();
        assert!(matches!(scaler.transform_column("x", &[1.0]), Err(RealtyError::ModelNotFitted)));
    }
}
