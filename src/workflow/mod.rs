//! End-to-end entry points behind the `realty` subcommands

mod inspect;
mod predict;
mod train;

pub use inspect::{run_inspection, InspectionReport};
pub use predict::{run_prediction, PredictionOutcome};
pub use train::{run_training, TrainingReport};

use crate::config::WorkflowConfig;
use crate::error::Result;
use crate::persistence::ArtifactLayout;
use crate::project::find_project_root;
use std::path::PathBuf;

/// Pinned root from the config, else discovered from the working directory
pub fn resolve_root(config: &WorkflowConfig) -> Result<PathBuf> {
    match &config.root {
        Some(root) => Ok(root.clone()),
        None => Ok(find_project_root(&std::env::current_dir()?)),
    }
}

pub(crate) fn layout_for(config: &WorkflowConfig) -> Result<ArtifactLayout> {
    Ok(ArtifactLayout::new(resolve_root(config)?, config))
}
