//! Run artifacts: comparison table, metrics summary and the persisted model

mod artifacts;
mod layout;

pub use artifacts::{
    load_model, read_comparison, rotate_backup, save_model, timestamp_now, write_comparison,
    BestMetrics, MetricsSummary, ModelArtifact, ModelMetadata,
};
pub use layout::{ArtifactLayout, COMPARISON_FILE, METRICS_FILE};
