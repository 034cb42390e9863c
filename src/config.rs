//! Workflow configuration

use crate::source::Location;
pub use crate::training::CandidateSet;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw CSV with the modelling base
pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/zilioalberto/N3_Ciencia_Dados/main/data/dataset_processado_N3/base_modelagem.csv";

/// ETL report describing target and features
pub const DEFAULT_REPORT_URL: &str =
    "https://raw.githubusercontent.com/zilioalberto/N3_Ciencia_Dados/main/data/dataset_processado_N3/etl_report.json";

/// Target used when the report does not name one
pub const DEFAULT_TARGET: &str = "preco_m2";

/// Configuration shared by the train, predict and inspect workflows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Where the dataset CSV lives
    pub data_location: String,

    /// Where the schema report JSON lives
    pub report_location: String,

    /// Target column when the report is absent or has no `target`
    pub default_target: String,

    /// Held-out fraction for evaluation
    pub test_size: f64,

    /// Seed for the hold-out split. Estimator seeds are part of `candidates`.
    pub random_state: u64,

    /// Explicit project root (None = discover from the working directory)
    pub root: Option<PathBuf>,

    /// File name of the persisted model, relative to the root
    pub model_file: String,

    /// Directory for the comparison table and metrics summary, relative to the root
    pub output_dir: PathBuf,

    /// Candidates evaluated by `realty train`, in tie-breaking order
    pub candidates: CandidateSet,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            data_location: DEFAULT_DATA_URL.to_string(),
            report_location: DEFAULT_REPORT_URL.to_string(),
            default_target: DEFAULT_TARGET.to_string(),
            test_size: 0.2,
            random_state: 42,
            root: None,
            model_file: "modelo_final.bin".to_string(),
            output_dir: PathBuf::from("data").join("dataset_processado_N3"),
            candidates: CandidateSet::standard(42),
        }
    }
}

impl WorkflowConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the dataset location
    pub fn with_data_location(mut self, location: impl Into<String>) -> Self {
        self.data_location = location.into();
        self
    }

    /// Builder method to set the schema report location
    pub fn with_report_location(mut self, location: impl Into<String>) -> Self {
        self.report_location = location.into();
        self
    }

    /// Builder method to pin the project root
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Builder method to set the fallback target
    pub fn with_default_target(mut self, target: impl Into<String>) -> Self {
        self.default_target = target.into();
        self
    }

    /// Builder method to replace the candidate list
    pub fn with_candidates(mut self, candidates: CandidateSet) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn data(&self) -> Location {
        Location::parse(&self.data_location)
    }

    pub fn report(&self) -> Location {
        Location::parse(&self.report_location)
    }
}
