//! Model training module
//!
//! Provides the train/evaluate/select loop:
//! - Seeded 80/20 hold-out split
//! - Linear models (OLS, Ridge)
//! - Regression trees and random forests
//! - Candidate pipelines (preprocessing + estimator) ranked by RMSE

mod candidates;
mod engine;
mod models;
mod pipeline;
mod split;
pub mod decision_tree;
pub mod linear_models;
pub mod random_forest;

pub use candidates::{Candidate, CandidateSet};
pub use engine::{target_vector, EvaluationRecord, SelectionOutcome, TrainEngine};
pub use models::{EstimatorSpec, RegressionMetrics, TrainedModel};
pub use pipeline::PricePipeline;
pub use split::{take_rows, train_test_split, TrainTestSplit};
pub use decision_tree::{DecisionTree, TreeNode};
pub use linear_models::{LinearRegression, RidgeRegression};
pub use random_forest::RandomForest;
