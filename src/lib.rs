//! Realty Regressor - real-estate price model training and scoring
//!
//! This crate trains a regression model for a price metric (`preco_m2` by
//! default) from a tabular dataset, keeps the best of several candidates by
//! held-out RMSE and reloads it later to score new rows.
//!
//! # Modules
//!
//! ## Core
//! - [`source`] - Dataset and schema-report retrieval with fallback schema
//! - [`preprocessing`] - Median/standard-scale numeric, mode/one-hot categorical
//! - [`training`] - Split, estimators, candidate pipelines and ranking
//!
//! ## Artifacts
//! - [`persistence`] - Comparison table, metrics summary, model file and backups
//! - [`project`] - Project root discovery
//!
//! ## Entry points
//! - [`workflow`] - Train, predict and inspect runs
//! - [`cli`] - Command-line interface
//! - [`config`] - Workflow configuration

// Core error handling
pub mod error;
pub mod config;

// Core
pub mod source;
pub mod preprocessing;
pub mod training;

// Artifacts
pub mod persistence;
pub mod project;

// Entry points
pub mod workflow;
pub mod cli;

pub use error::{RealtyError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{RealtyError, Result};

    // Configuration
    pub use crate::config::WorkflowConfig;

    // Data source
    pub use crate::source::{fetch_dataset, fetch_report, Location, ResolvedSchema, SchemaReport};

    // Preprocessing
    pub use crate::preprocessing::{ColumnTransformer, ColumnType};

    // Training
    pub use crate::training::{
        Candidate, CandidateSet, EstimatorSpec, EvaluationRecord, PricePipeline, TrainEngine,
    };

    // Persistence
    pub use crate::persistence::{load_model, ArtifactLayout, MetricsSummary};

    // Workflows
    pub use crate::workflow::{run_inspection, run_prediction, run_training};
}
