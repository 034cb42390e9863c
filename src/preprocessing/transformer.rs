//! Column-wise transformer combining the numeric and categorical branches

use crate::error::{RealtyError, Result};
use super::{
    categorical_values, numeric_values, partition_columns,
    ColumnType, Imputer, ImputeStrategy, OneHotEncoder, StandardScaler,
};
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// One step of a column group's transformation sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformStep {
    Impute(ImputeStrategy),
    StandardScale,
    OneHotEncode,
}

/// Columns of one dtype group and the ordered steps applied to them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnGroup {
    pub kind: ColumnType,
    pub steps: Vec<TransformStep>,
    pub columns: Vec<String>,
}

/// Fitted preprocessing plan: numeric columns are imputed with the median and
/// standardized, categorical columns are imputed with the mode and one-hot
/// encoded. Output layout is all numeric columns, then every one-hot block,
/// each in training feature order. Columns not seen during fit are dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnTransformer {
    numeric_columns: Vec<String>,
    categorical_columns: Vec<String>,
    numeric_imputer: Imputer,
    categorical_imputer: Imputer,
    scaler: StandardScaler,
    encoder: OneHotEncoder,
    n_outputs: usize,
    is_fitted: bool,
}

impl Default for ColumnTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnTransformer {
    pub fn new() -> Self {
        Self {
            numeric_columns: Vec::new(),
            categorical_columns: Vec::new(),
            numeric_imputer: Imputer::new(ImputeStrategy::Median),
            categorical_imputer: Imputer::new(ImputeStrategy::MostFrequent),
            scaler: StandardScaler::new(),
            encoder: OneHotEncoder::new(),
            n_outputs: 0,
            is_fitted: false,
        }
    }

    /// Fit on the training feature frame. Every column of `df` is a feature.
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        let start = Instant::now();

        if df.height() == 0 {
            return Err(RealtyError::PreprocessingError("cannot fit on an empty frame".to_string()));
        }

        let features: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        let (numeric, categorical) = partition_columns(df, &features)?;

        let mut numeric_imputer = Imputer::new(ImputeStrategy::Median);
        let mut scaler = StandardScaler::new();
        for name in &numeric {
            let raw = numeric_values(df, name)?;
            numeric_imputer.fit_numeric(name, &raw)?;
            let imputed = numeric_imputer.fill_numeric(name, &raw)?;
            scaler.fit_column(name, &imputed)?;
        }

        let mut categorical_imputer = Imputer::new(ImputeStrategy::MostFrequent);
        let mut encoder = OneHotEncoder::new();
        let mut n_onehot = 0;
        for name in &categorical {
            let raw = categorical_values(df, name)?;
            categorical_imputer.fit_categorical(name, &raw)?;
            let imputed = categorical_imputer.fill_categorical(name, &raw)?;
            encoder.fit_column(name, &imputed)?;
            n_onehot += encoder.n_outputs(name)?;
        }

        self.n_outputs = numeric.len() + n_onehot;
        self.numeric_columns = numeric;
        self.categorical_columns = categorical;
        self.numeric_imputer = numeric_imputer;
        self.categorical_imputer = categorical_imputer;
        self.scaler = scaler;
        self.encoder = encoder;
        self.is_fitted = true;

        debug!(
            numeric = self.numeric_columns.len(),
            categorical = self.categorical_columns.len(),
            outputs = self.n_outputs,
            elapsed_us = start.elapsed().as_micros() as u64,
            "column transformer fitted"
        );
        Ok(self)
    }

    /// Transform any frame carrying the fitted feature columns
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(RealtyError::ModelNotFitted);
        }

        let n_rows = df.height();
        let mut out = Array2::<f64>::zeros((n_rows, self.n_outputs));
        let mut offset = 0;

        for name in &self.numeric_columns {
            let raw = numeric_values(df, name)?;
            let imputed = self.numeric_imputer.fill_numeric(name, &raw)?;
            let scaled = self.scaler.transform_column(name, &imputed)?;
            for (row, value) in scaled.into_iter().enumerate() {
                out[[row, offset]] = value;
            }
            offset += 1;
        }

        for name in &self.categorical_columns {
            let raw = categorical_values(df, name)?;
            let imputed = self.categorical_imputer.fill_categorical(name, &raw)?;
            let hot = self.encoder.encode_column(name, &imputed)?;
            for (row, idx) in hot.into_iter().enumerate() {
                if let Some(idx) = idx {
                    out[[row, offset + idx]] = 1.0;
                }
            }
            offset += self.encoder.n_outputs(name)?;
        }

        Ok(out)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<Array2<f64>> {
        self.fit(df)?;
        self.transform(df)
    }

    /// Names of the output columns (`num__<col>`, `cat__<col>_<category>`)
    pub fn output_feature_names(&self) -> Result<Vec<String>> {
        if !self.is_fitted {
            return Err(RealtyError::ModelNotFitted);
        }
        let mut names: Vec<String> = self
            .numeric_columns
            .iter()
            .map(|c| format!("num__{}", c))
            .collect();
        for column in &self.categorical_columns {
            for category in self.encoder.categories(column)? {
                names.push(format!("cat__{}_{}", column, category));
            }
        }
        Ok(names)
    }

    /// The numeric and categorical groups with their step sequences
    pub fn plan(&self) -> Vec<ColumnGroup> {
        vec![
            ColumnGroup {
                kind: ColumnType::Numeric,
                steps: vec![
                    TransformStep::Impute(self.numeric_imputer.strategy()),
                    TransformStep::StandardScale,
                ],
                columns: self.numeric_columns.clone(),
            },
            ColumnGroup {
                kind: ColumnType::Categorical,
                steps: vec![
                    TransformStep::Impute(self.categorical_imputer.strategy()),
                    TransformStep::OneHotEncode,
                ],
                columns: self.categorical_columns.clone(),
            },
        ]
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical_columns
    }

    pub fn n_outputs(&self) -> usize {
        self.n_outputs
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_dataframe() -> DataFrame {
        df!(
            "area" => &[Some(50.0), Some(70.0), None, Some(90.0), Some(110.0)],
            "quartos" => &[1i64, 2, 2, 3, 4],
            "bairro" => &[Some("Centro"), Some("Norte"), Some("Centro"), None, Some("Sul")]
        )
        .unwrap()
    }

    #[test]
    fn test_transformer_creation() {
        let transformer = ColumnTransformer::new();
        assert!(!transformer.is_fitted());
    }

    #[test]
    fn test_column_detection() {
        let df = create_test_dataframe();
        let mut transformer = ColumnTransformer::new();
        transformer.fit(&df).unwrap();

        assert_eq!(transformer.numeric_columns(), &["area".to_string(), "quartos".to_string()]);
        assert_eq!(transformer.categorical_columns(), &["bairro".to_string()]);
        // 2 numeric + 3 categories
        assert_eq!(transformer.n_outputs(), 5);
    }

    #[test]
    fn test_fit_transform_layout() {
        let df = create_test_dataframe();
        let mut transformer = ColumnTransformer::new();
        let out = transformer.fit_transform(&df).unwrap();

        assert_eq!(out.dim(), (5, 5));
        assert_eq!(
            transformer.output_feature_names().unwrap(),
            vec!["num__area", "num__quartos", "cat__bairro_Centro", "cat__bairro_Norte", "cat__bairro_Sul"]
        );

        // every row has exactly one hot category (the null bairro is imputed with the mode)
        for row in out.rows() {
            let hot: f64 = row.iter().skip(2).sum();
            assert_eq!(hot, 1.0);
        }
        // missing area imputed with the median (80) which is the mean of the imputed column
        assert!(out[[2, 0]].abs() < 1e-12);
        // the imputed bairro lands on Centro
        assert_eq!(out[[3, 2]], 1.0);
    }

    #[test]
    fn test_unknown_category_at_inference() {
        let df = create_test_dataframe();
        let mut transformer = ColumnTransformer::new();
        transformer.fit(&df).unwrap();

        let unseen = df!(
            "area" => &[60.0],
            "quartos" => &[2i64],
            "bairro" => &["Leste"]
        )
        .unwrap();
        let out = transformer.transform(&unseen).unwrap();
        assert_eq!(out.dim(), (1, 5));
        assert_eq!(out.row(0).iter().skip(2).sum::<f64>(), 0.0);
    }

    #[test]
    fn test_missing_column_at_inference_is_fatal() {
        let df = create_test_dataframe();
        let mut transformer = ColumnTransformer::new();
        transformer.fit(&df).unwrap();

        let partial = df!("area" => &[60.0], "quartos" => &[2i64]).unwrap();
        let err = transformer.transform(&partial).unwrap_err();
        assert!(matches!(err, RealtyError::SchemaError(_)));
    }

    #[test]
    fn test_extra_columns_are_dropped() {
        let df = create_test_dataframe();
        let mut transformer = ColumnTransformer::new();
        transformer.fit(&df).unwrap();

        let wider = df.hstack(&[Column::new("extra".into(), &[1.0, 2.0, 3.0, 4.0, 5.0])]).unwrap();
        let out = transformer.transform(&wider).unwrap();
        assert_eq!(out.ncols(), 5);
    }

    #[test]
    fn test_plan_steps() {
        let df = create_test_dataframe();
        let mut transformer = ColumnTransformer::new();
        transformer.fit(&df).unwrap();

        let plan = transformer.plan();
        assert_eq!(plan[0].kind, ColumnType::Numeric);
        assert_eq!(plan[0].steps, vec![TransformStep::Impute(ImputeStrategy::Median), TransformStep::StandardScale]);
        assert_eq!(plan[1].steps, vec![TransformStep::Impute(ImputeStrategy::MostFrequent), TransformStep::OneHotEncode]);
        assert_eq!(plan[1].columns, vec!["bairro".to_string()]);
    }
}
