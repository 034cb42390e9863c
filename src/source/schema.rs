//! Schema report and target/feature resolution

use crate::error::{RealtyError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Optional description of the modelling columns, as published by the ETL step.
/// Unknown keys in the source JSON are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaReport {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
}

/// Target and ordered feature columns after fallback and validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSchema {
    pub target: String,
    pub features: Vec<String>,
}

impl SchemaReport {
    /// Effective target: the report's, else `default_target`
    pub fn target_or(&self, default_target: &str) -> String {
        self.target
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| default_target.to_string())
    }

    /// Resolve for training. The target must exist in the dataset and every
    /// listed feature must be present; nothing is fitted before this passes.
    pub fn resolve_for_training(&self, df: &DataFrame, default_target: &str) -> Result<ResolvedSchema> {
        let columns = column_names(df);
        let target = self.target_or(default_target);

        if !columns.contains(&target) {
            return Err(RealtyError::TargetNotFound { target, columns });
        }

        let schema = self.resolve_features(&columns, target);
        check_presence(&schema.features, &columns)?;

        if schema.features.is_empty() {
            return Err(RealtyError::SchemaError("no feature columns left after removing the target".to_string()));
        }

        info!(target_col = %schema.target, n_features = schema.features.len(), "schema resolved");
        Ok(schema)
    }

    /// Resolve for inference. The target does not have to be present; listed
    /// features are still checked against the dataset.
    pub fn resolve_for_inference(&self, df: &DataFrame, default_target: &str) -> Result<ResolvedSchema> {
        let columns = column_names(df);
        let target = self.target_or(default_target);
        let schema = self.resolve_features(&columns, target);
        check_presence(&schema.features, &columns)?;
        Ok(schema)
    }

    fn resolve_features(&self, columns: &[String], target: String) -> ResolvedSchema {
        let features: Vec<String> = match &self.features {
            Some(listed) if !listed.is_empty() => {
                if listed.contains(&target) {
                    warn!(target_col = %target, "schema report lists the target as a feature, dropping it");
                }
                listed.iter().filter(|f| **f != target).cloned().collect()
            }
            _ => columns.iter().filter(|c| **c != target).cloned().collect(),
        };

        ResolvedSchema { target, features }
    }
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

fn check_presence(features: &[String], columns: &[String]) -> Result<()> {
    match features.iter().find(|f| !columns.contains(f)) {
        Some(missing) => Err(RealtyError::FeatureNotFound(missing.clone())),
        None => Ok(()),
    }
}
