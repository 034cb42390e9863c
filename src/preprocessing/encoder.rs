//! One-hot categorical encoding

use crate::error::{RealtyError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One-hot encoder. Categories are sorted per column; a value not seen during
/// fit encodes as an all-zero block instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneHotEncoder {
    // column name -> sorted categories
    categories: HashMap<String, Vec<String>>,
    is_fitted: bool,
}

impl OneHotEncoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn the categories of one column
    pub fn fit_column(&mut self, name: &str, values: &[String]) -> Result<&mut Self> {
        let unique: BTreeSet<&str> = values.iter().map(|s| s.as_str()).collect();
        self.categories
            .insert(name.to_string(), unique.into_iter().map(|s| s.to_string()).collect());
        self.is_fitted = true;
        Ok(self)
    }

    /// Categories learned for a column, in output order
    pub fn categories(&self, name: &str) -> Result<&[String]> {
        if !self.is_fitted {
            return Err(RealtyError::ModelNotFitted);
        }
        self.categories
            .get(name)
            .map(|c| c.as_slice())
            .ok_or_else(|| RealtyError::SchemaError(format!("encoder was not fitted on column '{}'", name)))
    }

    /// Width of the one-hot block for a column
    pub fn n_outputs(&self, name: &str) -> Result<usize> {
        Ok(self.categories(name)?.len())
    }

    /// Index of the hot position for each value (None = unknown category)
    pub fn encode_column(&self, name: &str, values: &[String]) -> Result<Vec<Option<usize>>> {
        let categories = self.categories(name)?;
        Ok(values
            .iter()
            .map(|v| categories.binary_search(v).ok())
            .collect())
    }
}
