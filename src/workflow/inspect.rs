//! Read-only view of the resolved schema and the last run's artifacts

use crate::config::WorkflowConfig;
use crate::error::{RealtyError, Result};
use crate::persistence::{load_model, MetricsSummary, ModelMetadata};
use crate::preprocessing::partition_columns;
use crate::source::{fetch_dataset, fetch_report, SchemaReport};
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct InspectionReport {
    pub root: PathBuf,
    pub n_rows: usize,
    pub n_cols: usize,
    /// Whether the schema report was readable and named anything
    pub report_used: bool,
    pub target: String,
    pub target_present: bool,
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    /// Metadata of the current model, if one exists and loads
    pub model: Option<ModelMetadata>,
    pub last_metrics: Option<MetricsSummary>,
}

pub fn run_inspection(config: &WorkflowConfig) -> Result<InspectionReport> {
    let layout = super::layout_for(config)?;

    let report = fetch_report(&config.report());
    let df = fetch_dataset(&config.data())?;
    let schema = report.resolve_for_inference(&df, &config.default_target)?;
    let (numeric, categorical) = partition_columns(&df, &schema.features)?;

    let model = match load_model(layout.model_path()) {
        Ok((_, metadata)) => Some(metadata),
        Err(RealtyError::ModelMissing(_)) => None,
        Err(e) => {
            warn!(error = %e, "current model could not be loaded");
            None
        }
    };

    let metrics_path = layout.metrics_path();
    let last_metrics = if metrics_path.is_file() {
        MetricsSummary::load(&metrics_path)
            .map_err(|e| warn!(error = %e, "metrics summary could not be read"))
            .ok()
    } else {
        None
    };

    Ok(InspectionReport {
        root: layout.root().to_path_buf(),
        n_rows: df.height(),
        n_cols: df.width(),
        report_used: report != SchemaReport::default(),
        target_present: df.column(&schema.target).is_ok(),
        target: schema.target,
        numeric,
        categorical,
        model,
        last_metrics,
    })
}
