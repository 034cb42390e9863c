//! Train, score and rank the candidate pipelines

use crate::error::{RealtyError, Result};
use crate::source::ResolvedSchema;
use super::candidates::CandidateSet;
use super::models::RegressionMetrics;
use super::pipeline::PricePipeline;
use super::split::{take_rows, train_test_split};
use ndarray::{Array1, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// Held-out scores of one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub name: String,
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
}

/// Ranked comparison plus the winning fitted pipeline
#[derive(Debug, Clone)]
pub struct SelectionOutcome {
    /// Records sorted ascending by RMSE
    pub ranking: Vec<EvaluationRecord>,
    /// Pipeline of `ranking[0]`
    pub best: PricePipeline,
    pub n_train: usize,
    pub n_test: usize,
}

impl SelectionOutcome {
    pub fn best_record(&self) -> &EvaluationRecord {
        // ranking is never empty: the engine refuses an empty candidate set
        &self.ranking[0]
    }
}

/// Runs every candidate on one shared split
#[derive(Debug, Clone)]
pub struct TrainEngine {
    candidates: CandidateSet,
    test_size: f64,
    random_state: u64,
}

impl Default for TrainEngine {
    fn default() -> Self {
        Self::new(CandidateSet::default())
    }
}

impl TrainEngine {
    /// Create a new engine with the 80/20 split seeded at 42
    pub fn new(candidates: CandidateSet) -> Self {
        Self {
            candidates,
            test_size: 0.2,
            random_state: 42,
        }
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Fit and score each candidate in declaration order, then rank them by
    /// RMSE with a stable sort. The first failure aborts the whole run.
    pub fn run(&self, df: &DataFrame, schema: &ResolvedSchema) -> Result<SelectionOutcome> {
        if self.candidates.is_empty() {
            return Err(RealtyError::InvalidInput("no candidates to train".to_string()));
        }

        let y = target_vector(df, &schema.target)?;
        let features = df.select(schema.features.iter().map(|s| s.as_str()))?;

        let split = train_test_split(df.height(), self.test_size, self.random_state)?;
        let x_train = take_rows(&features, &split.train)?;
        let x_test = take_rows(&features, &split.test)?;
        let y_train = y.select(Axis(0), &split.train);
        let y_test = y.select(Axis(0), &split.test);

        info!(
            rows = df.height(),
            train = split.train.len(),
            test = split.test.len(),
            features = schema.features.len(),
            "split dataset"
        );

        let mut scored: Vec<(EvaluationRecord, PricePipeline)> = Vec::with_capacity(self.candidates.len());
        for candidate in self.candidates.iter() {
            let start = Instant::now();
            let pipeline = PricePipeline::fit(
                &candidate.name,
                &candidate.estimator,
                &schema.target,
                &x_train,
                &y_train,
            )?;

            let y_pred = pipeline.predict(&x_test).map_err(|e| match e {
                RealtyError::InferenceError(msg) => RealtyError::TrainingError(msg),
                other => other,
            })?;
            let metrics = RegressionMetrics::compute(&y_test, &y_pred)?;

            info!(
                model = %candidate.name,
                mae = metrics.mae,
                rmse = metrics.rmse,
                r2 = metrics.r2,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "candidate scored"
            );

            scored.push((
                EvaluationRecord {
                    name: candidate.name.clone(),
                    mae: metrics.mae,
                    rmse: metrics.rmse,
                    r2: metrics.r2,
                },
                pipeline,
            ));
        }

        // Vec::sort_by is stable, so equal RMSE keeps declaration order
        scored.sort_by(|a, b| a.0.rmse.total_cmp(&b.0.rmse));

        let mut scored = scored.into_iter();
        let (best_record, best) = scored
            .next()
            .ok_or_else(|| RealtyError::TrainingError("no candidate was scored".to_string()))?;
        let mut ranking = vec![best_record];
        ranking.extend(scored.map(|(record, _)| record));

        Ok(SelectionOutcome {
            ranking,
            best,
            n_train: split.train.len(),
            n_test: split.test.len(),
        })
    }
}

/// Target column as f64. Missing values in the target are rejected.
pub fn target_vector(df: &DataFrame, target: &str) -> Result<Array1<f64>> {
    let column = df
        .column(target)
        .map_err(|_| RealtyError::TargetNotFound {
            target: target.to_string(),
            columns: df.get_column_names().into_iter().map(|c| c.to_string()).collect(),
        })?;

    let casted = column
        .cast(&DataType::Float64)
        .map_err(|e| RealtyError::DataError(format!("target '{}' is not numeric: {}", target, e)))?;

    let values = casted
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| match v {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(RealtyError::DataError(format!(
                "target '{}' has a missing or non-finite value at row {}",
                target, row
            ))),
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(Array1::from_vec(values))
}
