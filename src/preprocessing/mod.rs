//! Data preprocessing module
//!
//! Builds the column-wise transformation applied in front of every estimator:
//! - numeric columns: median imputation, then standard scaling
//! - categorical columns: most-frequent imputation, then one-hot encoding
//!   (categories unseen during fit encode as all zeros)

mod imputer;
mod scaler;
mod encoder;
mod transformer;

pub use imputer::{Imputer, ImputeStrategy};
pub use scaler::StandardScaler;
pub use encoder::OneHotEncoder;
pub use transformer::{ColumnTransformer, ColumnGroup, TransformStep};

use crate::error::{RealtyError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Column data type for preprocessing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Numeric,
    Categorical,
}

impl ColumnType {
    /// Integer and float dtypes are numeric; everything else is treated as categorical
    pub fn of(dtype: &DataType) -> Self {
        match dtype {
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 |
            DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 |
            DataType::Float32 | DataType::Float64 => ColumnType::Numeric,
            _ => ColumnType::Categorical,
        }
    }
}

/// Split `features` into (numeric, categorical), preserving their order
pub fn partition_columns(df: &DataFrame, features: &[String]) -> Result<(Vec<String>, Vec<String>)> {
    let mut numeric = Vec::new();
    let mut categorical = Vec::new();

    for name in features {
        let column = lookup(df, name)?;
        match ColumnType::of(column.dtype()) {
            ColumnType::Numeric => numeric.push(name.clone()),
            ColumnType::Categorical => categorical.push(name.clone()),
        }
    }

    Ok((numeric, categorical))
}

/// Read a column as optional f64 values. NaN counts as missing.
pub(crate) fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = lookup(df, name)?;
    let casted = column
        .cast(&DataType::Float64)
        .map_err(|e| RealtyError::PreprocessingError(e.to_string()))?;
    let ca = casted
        .f64()
        .map_err(|e| RealtyError::PreprocessingError(e.to_string()))?;

    Ok(ca.into_iter().map(|v| v.filter(|x| !x.is_nan())).collect())
}

/// Read a column as optional strings
pub(crate) fn categorical_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = lookup(df, name)?;
    let casted = column
        .cast(&DataType::String)
        .map_err(|e| RealtyError::PreprocessingError(e.to_string()))?;
    let ca = casted
        .str()
        .map_err(|e| RealtyError::PreprocessingError(e.to_string()))?;

    Ok(ca.into_iter().map(|v| v.map(|s| s.to_string())).collect())
}

fn lookup<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| {
        RealtyError::SchemaError(format!("column '{}' is required by the pipeline but missing from the input", name))
    })
}
