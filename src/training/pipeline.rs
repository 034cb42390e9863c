//! Preprocessing plan plus estimator, fitted and applied as one unit

use crate::error::{RealtyError, Result};
use crate::preprocessing::ColumnTransformer;
use super::models::{EstimatorSpec, TrainedModel};
use ndarray::Array1;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// A fitted candidate: the column transformer learned on the training split
/// and the estimator trained on its output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePipeline {
    name: String,
    target: String,
    feature_columns: Vec<String>,
    transformer: ColumnTransformer,
    model: TrainedModel,
}

impl PricePipeline {
    /// Fit a fresh transformer and estimator. `features` must hold exactly the
    /// feature columns, `y` the aligned target values.
    pub fn fit(
        name: &str,
        estimator: &EstimatorSpec,
        target: &str,
        features: &DataFrame,
        y: &Array1<f64>,
    ) -> Result<Self> {
        if features.height() != y.len() {
            return Err(RealtyError::ShapeError {
                expected: format!("{} target values", features.height()),
                actual: format!("{} target values", y.len()),
            });
        }

        let mut transformer = ColumnTransformer::new();
        let x = transformer.fit_transform(features)?;
        let model = estimator.fit(&x, y)?;

        Ok(Self {
            name: name.to_string(),
            target: target.to_string(),
            feature_columns: features
                .get_column_names()
                .into_iter()
                .map(|c| c.to_string())
                .collect(),
            transformer,
            model,
        })
    }

    /// Predict every row of `df`. Columns are picked by name, so extra columns
    /// (the target included) are ignored and a missing feature is an error.
    pub fn predict(&self, df: &DataFrame) -> Result<Array1<f64>> {
        for column in &self.feature_columns {
            if df.column(column).is_err() {
                return Err(RealtyError::FeatureNotFound(column.clone()));
            }
        }

        let x = self.transformer.transform(df)?;
        let predictions = self.model.predict(&x)?;

        if let Some(row) = predictions.iter().position(|p| !p.is_finite()) {
            return Err(RealtyError::InferenceError(format!(
                "{} produced a non-finite prediction for row {}",
                self.name, row
            )));
        }
        Ok(predictions)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn transformer(&self) -> &ColumnTransformer {
        &self.transformer
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn features() -> DataFrame {
        df!(
            "area" => &[40.0, 60.0, 80.0, 100.0, 120.0, 140.0],
            "bairro" => &["A", "B", "A", "B", "A", "B"]
        )
        .unwrap()
    }

    #[test]
    fn test_fit_and_predict_by_name() {
        let y = array![100.0, 160.0, 200.0, 260.0, 300.0, 360.0];
        let pipeline = PricePipeline::fit("ols", &EstimatorSpec::LinearRegression, "preco", &features(), &y).unwrap();

        assert_eq!(pipeline.feature_columns(), &["area".to_string(), "bairro".to_string()]);
        assert_eq!(pipeline.target(), "preco");

        // reordered columns plus an extra one still predict
        let query = df!(
            "preco" => &[0.0],
            "bairro" => &["B"],
            "area" => &[60.0]
        )
        .unwrap();
        let pred = pipeline.predict(&query).unwrap();
        assert_eq!(pred.len(), 1);
        assert!((pred[0] - 160.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_feature_is_fatal() {
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let pipeline = PricePipeline::fit("ols", &EstimatorSpec::LinearRegression, "preco", &features(), &y).unwrap();

        let query = df!("area" => &[60.0]).unwrap();
        let err = pipeline.predict(&query).unwrap_err();
        assert!(matches!(err, RealtyError::FeatureNotFound(ref c) if c == "bairro"));
    }

    #[test]
    fn test_length_mismatch() {
        let y = array![1.0, 2.0];
        assert!(PricePipeline::fit("ols", &EstimatorSpec::LinearRegression, "preco", &features(), &y).is_err());
    }
}
