//! Comparison table, metrics summary and model artifact IO

use crate::error::{RealtyError, Result};
use crate::training::{EvaluationRecord, PricePipeline};
use super::layout::ArtifactLayout;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// `YYYYmmdd_HHMMSS` in local time, shared by backups and `generated_at`
pub fn timestamp_now() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Write the ranked comparison as `Modelo,MAE,RMSE,R2`
pub fn write_comparison(path: &Path, ranking: &[EvaluationRecord]) -> Result<()> {
    let mut df = df!(
        "Modelo" => ranking.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        "MAE" => ranking.iter().map(|r| r.mae).collect::<Vec<_>>(),
        "RMSE" => ranking.iter().map(|r| r.rmse).collect::<Vec<_>>(),
        "R2" => ranking.iter().map(|r| r.r2).collect::<Vec<_>>()
    )?;

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    Ok(())
}

/// Read a comparison table back
pub fn read_comparison(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Scores of the winning candidate, keyed as in the JSON summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestMetrics {
    #[serde(rename = "MAE")]
    pub mae: f64,
    #[serde(rename = "RMSE")]
    pub rmse: f64,
    #[serde(rename = "R2")]
    pub r2: f64,
}

/// Contents of `metrics.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub best_model: String,
    pub target: String,
    pub metrics: BestMetrics,
    pub generated_at: String,
}

impl MetricsSummary {
    pub fn new(best: &EvaluationRecord, target: &str, generated_at: &str) -> Self {
        Self {
            best_model: best.name.clone(),
            target: target.to_string(),
            metrics: BestMetrics {
                mae: best.mae,
                rmse: best.rmse,
                r2: best.r2,
            },
            generated_at: generated_at.to_string(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Move an existing model aside to a timestamped backup. Returns the backup
/// path, or None when there was no model. An existing backup is never
/// overwritten: colliding names get `_1`, `_2`, ... appended.
pub fn rotate_backup(layout: &ArtifactLayout, timestamp: &str) -> Result<Option<PathBuf>> {
    let model_path = layout.model_path();
    if !model_path.exists() {
        return Ok(None);
    }

    let mut n = 0;
    let mut backup = layout.backup_path(timestamp);
    while backup.exists() {
        n += 1;
        backup = layout.backup_path_with_suffix(timestamp, n);
    }

    std::fs::rename(model_path, &backup)?;
    info!(from = %model_path.display(), to = %backup.display(), "previous model backed up");
    Ok(Some(backup))
}

/// Descriptive fields stored alongside the fitted pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Candidate name of the winner
    pub name: String,
    pub target: String,
    pub feature_columns: Vec<String>,
    pub trained_at: String,
    pub metrics: BestMetrics,
    /// Crate version that wrote the artifact
    pub written_by: String,
}

impl ModelMetadata {
    pub fn new(pipeline: &PricePipeline, best: &EvaluationRecord, trained_at: &str) -> Self {
        Self {
            name: pipeline.name().to_string(),
            target: pipeline.target().to_string(),
            feature_columns: pipeline.feature_columns().to_vec(),
            trained_at: trained_at.to_string(),
            metrics: BestMetrics {
                mae: best.mae,
                rmse: best.rmse,
                r2: best.r2,
            },
            written_by: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// On-disk envelope of the persisted model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Magic bytes for format detection
    pub magic: [u8; 4],
    pub format_version: u32,
    pub metadata: ModelMetadata,
    /// bincode-encoded `PricePipeline`
    pub payload: Vec<u8>,
    /// FNV-1a of `payload`
    pub checksum: u64,
}

impl ModelArtifact {
    pub const MAGIC: [u8; 4] = [b'R', b'L', b'T', b'Y'];
    pub const VERSION: u32 = 1;

    pub fn new(pipeline: &PricePipeline, metadata: ModelMetadata) -> Result<Self> {
        let payload = bincode::serialize(pipeline)?;
        Ok(Self {
            magic: Self::MAGIC,
            format_version: Self::VERSION,
            metadata,
            checksum: fnv1a(&payload),
            payload,
        })
    }

    /// Validate the envelope and decode the pipeline
    pub fn into_pipeline(self) -> Result<(PricePipeline, ModelMetadata)> {
        if self.magic != Self::MAGIC {
            return Err(RealtyError::SerializationError(
                "not a realty model file (bad magic bytes)".to_string(),
            ));
        }
        if self.format_version != Self::VERSION {
            return Err(RealtyError::SerializationError(format!(
                "unsupported model format version {} (expected {})",
                self.format_version,
                Self::VERSION
            )));
        }
        if fnv1a(&self.payload) != self.checksum {
            return Err(RealtyError::SerializationError(
                "checksum verification failed, model file may be corrupted".to_string(),
            ));
        }
        let pipeline: PricePipeline = bincode::deserialize(&self.payload)?;
        Ok((pipeline, self.metadata))
    }
}

fn fnv1a(data: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 14695981039346656037;
    const FNV_PRIME: u64 = 1099511628211;

    let mut hash = FNV_OFFSET;
    for byte in data {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Serialize the pipeline to `path`
pub fn save_model(path: &Path, pipeline: &PricePipeline, metadata: ModelMetadata) -> Result<()> {
    let artifact = ModelArtifact::new(pipeline, metadata)?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, &artifact)?;
    writer.flush()?;
    Ok(())
}

/// Load and validate the model at `path`. A missing file maps to
/// [`RealtyError::ModelMissing`].
pub fn load_model(path: &Path) -> Result<(PricePipeline, ModelMetadata)> {
    if !path.is_file() {
        return Err(RealtyError::ModelMissing(path.display().to_string()));
    }
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;
    let artifact: ModelArtifact = bincode::deserialize(&bytes)?;
    artifact.into_pipeline()
}
