//! Fetch, fit every candidate, rank and persist the winner

use crate::config::WorkflowConfig;
use crate::error::Result;
use crate::persistence::{
    rotate_backup, save_model, timestamp_now, write_comparison, MetricsSummary, ModelMetadata,
};
use crate::source::{fetch_dataset, fetch_report};
use crate::training::{EvaluationRecord, TrainEngine};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// What a training run produced
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub root: PathBuf,
    pub target: String,
    pub features: Vec<String>,
    pub n_train: usize,
    pub n_test: usize,
    /// Ascending by RMSE
    pub ranking: Vec<EvaluationRecord>,
    pub best_model: String,
    pub model_path: PathBuf,
    /// Where the previous model was moved, if there was one
    pub backup_path: Option<PathBuf>,
    pub comparison_path: PathBuf,
    pub metrics_path: PathBuf,
    pub generated_at: String,
    pub elapsed_secs: f64,
}

/// Run the whole training workflow. Any error aborts before later artifacts
/// are written; artifacts already written stay on disk.
pub fn run_training(config: &WorkflowConfig) -> Result<TrainingReport> {
    let start = Instant::now();
    let layout = super::layout_for(config)?;
    info!(root = %layout.root().display(), "starting training run");

    let report = fetch_report(&config.report());
    let df = fetch_dataset(&config.data())?;
    let schema = report.resolve_for_training(&df, &config.default_target)?;

    let engine = TrainEngine::new(config.candidates.clone())
        .with_test_size(config.test_size)
        .with_random_state(config.random_state);
    let outcome = engine.run(&df, &schema)?;

    let best = outcome.best_record().clone();
    info!(model = %best.name, rmse = best.rmse, "best candidate selected");

    layout.ensure_output_dir()?;
    let generated_at = timestamp_now();

    let comparison_path = layout.comparison_path();
    write_comparison(&comparison_path, &outcome.ranking)?;

    let backup_path = rotate_backup(&layout, &generated_at)?;
    let metadata = ModelMetadata::new(&outcome.best, &best, &generated_at);
    save_model(layout.model_path(), &outcome.best, metadata)?;
    info!(path = %layout.model_path().display(), "model saved");

    let metrics_path = layout.metrics_path();
    MetricsSummary::new(&best, &schema.target, &generated_at).save(&metrics_path)?;

    Ok(TrainingReport {
        root: layout.root().to_path_buf(),
        target: schema.target,
        features: schema.features,
        n_train: outcome.n_train,
        n_test: outcome.n_test,
        ranking: outcome.ranking,
        best_model: best.name,
        model_path: layout.model_path().to_path_buf(),
        backup_path,
        comparison_path,
        metrics_path,
        generated_at,
        elapsed_secs: start.elapsed().as_secs_f64(),
    })
}
