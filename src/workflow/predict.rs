//! Reload the persisted model and score the first dataset row

use crate::config::WorkflowConfig;
use crate::error::{RealtyError, Result};
use crate::persistence::{load_model, ModelMetadata};
use crate::source::{fetch_dataset, fetch_report};
use polars::prelude::*;
use std::path::PathBuf;
use tracing::{info, warn};

/// Result of the example prediction
#[derive(Debug, Clone)]
pub struct PredictionOutcome {
    pub model_path: PathBuf,
    pub metadata: ModelMetadata,
    /// Target as resolved for this run (report or fallback)
    pub target: String,
    /// First dataset row restricted to the resolved features
    pub example: DataFrame,
    pub prediction: f64,
}

pub fn run_prediction(config: &WorkflowConfig) -> Result<PredictionOutcome> {
    let layout = super::layout_for(config)?;
    let model_path = layout.model_path().to_path_buf();

    let (pipeline, metadata) = load_model(&model_path)?;
    info!(path = %model_path.display(), model = %metadata.name, "model loaded");

    let report = fetch_report(&config.report());
    let df = fetch_dataset(&config.data())?;
    let schema = report.resolve_for_inference(&df, &config.default_target)?;

    if schema.features != pipeline.feature_columns() {
        warn!(
            resolved = ?schema.features,
            trained = ?pipeline.feature_columns(),
            "resolved features differ from the ones the model was trained on"
        );
    }

    let example = df
        .slice(0, 1)
        .select(schema.features.iter().map(|s| s.as_str()))?;

    let predictions = pipeline.predict(&example)?;
    let prediction = predictions
        .first()
        .copied()
        .ok_or_else(|| RealtyError::InferenceError("model returned no prediction".to_string()))?;

    info!(prediction, "example scored");
    Ok(PredictionOutcome {
        model_path,
        metadata,
        target: schema.target,
        example,
        prediction,
    })
}
