//! Missing value imputation strategies

use crate::error::{RealtyError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Strategy for imputing missing values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Replace with the median of the observed values (numeric only)
    Median,
    /// Replace with the most frequent observed value (categorical)
    MostFrequent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum ImputeValue {
    Numeric(f64),
    String(String),
}

/// Imputer for handling missing values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Imputer {
    strategy: ImputeStrategy,
    fill_values: HashMap<String, ImputeValue>,
    is_fitted: bool,
}

impl Imputer {
    /// Create a new imputer with the specified strategy
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self {
            strategy,
            fill_values: HashMap::new(),
            is_fitted: false,
        }
    }

    pub fn strategy(&self) -> ImputeStrategy {
        self.strategy
    }

    /// Learn the fill value of a numeric column
    pub fn fit_numeric(&mut self, name: &str, values: &[Option<f64>]) -> Result<&mut Self> {
        let fill = match self.strategy {
            ImputeStrategy::Median => median(values).unwrap_or(0.0),
            ImputeStrategy::MostFrequent => {
                return Err(RealtyError::PreprocessingError(format!(
                    "most-frequent imputation is reserved for categorical columns, got numeric '{}'",
                    name
                )));
            }
        };
        self.fill_values.insert(name.to_string(), ImputeValue::Numeric(fill));
        self.is_fitted = true;
        Ok(self)
    }

    /// Learn the fill value of a categorical column
    pub fn fit_categorical(&mut self, name: &str, values: &[Option<String>]) -> Result<&mut Self> {
        let fill = match self.strategy {
            ImputeStrategy::MostFrequent => most_frequent(values).unwrap_or_default(),
            ImputeStrategy::Median => {
                return Err(RealtyError::PreprocessingError(format!(
                    "median imputation needs a numeric column, got categorical '{}'",
                    name
                )));
            }
        };
        self.fill_values.insert(name.to_string(), ImputeValue::String(fill));
        self.is_fitted = true;
        Ok(self)
    }

    /// Replace missing numeric values with the learned fill value
    pub fn fill_numeric(&self, name: &str, values: &[Option<f64>]) -> Result<Vec<f64>> {
        match self.fill_value(name)? {
            ImputeValue::Numeric(fill) => Ok(values.iter().map(|v| v.unwrap_or(*fill)).collect()),
            ImputeValue::String(_) => Err(RealtyError::PreprocessingError(format!(
                "column '{}' was fitted as categorical",
                name
            ))),
        }
    }

    /// Replace missing categorical values with the learned fill value
    pub fn fill_categorical(&self, name: &str, values: &[Option<String>]) -> Result<Vec<String>> {
        match self.fill_value(name)? {
            ImputeValue::String(fill) => Ok(values
                .iter()
                .map(|v| v.clone().unwrap_or_else(|| fill.clone()))
                .collect()),
            ImputeValue::Numeric(_) => Err(RealtyError::PreprocessingError(format!(
                "column '{}' was fitted as numeric",
                name
            ))),
        }
    }

    fn fill_value(&self, name: &str) -> Result<&ImputeValue> {
        if !self.is_fitted {
            return Err(RealtyError::ModelNotFitted);
        }
        self.fill_values
            .get(name)
            .ok_or_else(|| RealtyError::SchemaError(format!("imputer was not fitted on column '{}'", name)))
    }
}

fn median(values: &[Option<f64>]) -> Option<f64> {
    let mut observed: Vec<f64> = values.iter().flatten().copied().collect();
    if observed.is_empty() {
        return None;
    }
    observed.sort_by(|a, b| a.total_cmp(b));
    let mid = observed.len() / 2;
    if observed.len() % 2 == 0 {
        Some((observed[mid - 1] + observed[mid]) / 2.0)
    } else {
        Some(observed[mid])
    }
}

/// Mode of the observed values; ties go to the lexicographically smallest value
fn most_frequent(values: &[Option<String>]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for val in values.iter().flatten() {
        *counts.entry(val.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|(a_val, a_count), (b_val, b_count)| a_count.cmp(b_count).then_with(|| b_val.cmp(a_val)))
        .map(|(val, _)| val.to_string())
}
