//! Where run artifacts live under the project root

use crate::config::WorkflowConfig;
use crate::error::Result;
use std::path::{Path, PathBuf};

pub const COMPARISON_FILE: &str = "comparacao_modelos.csv";
pub const METRICS_FILE: &str = "metrics.json";

/// Resolved artifact paths for one project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    root: PathBuf,
    model_path: PathBuf,
    output_dir: PathBuf,
}

impl ArtifactLayout {
    pub fn new(root: impl Into<PathBuf>, config: &WorkflowConfig) -> Self {
        let root = root.into();
        Self {
            model_path: root.join(&config.model_file),
            output_dir: root.join(&config.output_dir),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The current model file
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn comparison_path(&self) -> PathBuf {
        self.output_dir.join(COMPARISON_FILE)
    }

    pub fn metrics_path(&self) -> PathBuf {
        self.output_dir.join(METRICS_FILE)
    }

    /// `<stem>_backup_<ts>.<ext>` next to the model file
    pub fn backup_path(&self, timestamp: &str) -> PathBuf {
        self.backup_path_with_suffix(timestamp, 0)
    }

    /// Backup name for the `n`-th collision within the same timestamp
    pub(crate) fn backup_path_with_suffix(&self, timestamp: &str, n: usize) -> PathBuf {
        let stem = self
            .model_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());
        let suffix = if n == 0 { String::new() } else { format!("_{}", n) };
        let file_name = match self.model_path.extension() {
            Some(ext) => format!("{}_backup_{}{}.{}", stem, timestamp, suffix, ext.to_string_lossy()),
            None => format!("{}_backup_{}{}", stem, timestamp, suffix),
        };
        self.model_path.with_file_name(file_name)
    }

    /// Create the output directory (and parents) if needed
    pub fn ensure_output_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = ArtifactLayout::new("/proj", &WorkflowConfig::default());

        assert_eq!(layout.model_path(), Path::new("/proj/modelo_final.bin"));
        assert_eq!(
            layout.comparison_path(),
            PathBuf::from("/proj/data/dataset_processado_N3/comparacao_modelos.csv")
        );
        assert_eq!(
            layout.metrics_path(),
            PathBuf::from("/proj/data/dataset_processado_N3/metrics.json")
        );
    }

    #[test]
    fn test_backup_names() {
        let layout = ArtifactLayout::new("/proj", &WorkflowConfig::default());
        assert_eq!(
            layout.backup_path("20240131_235959"),
            PathBuf::from("/proj/modelo_final_backup_20240131_235959.bin")
        );
        assert_eq!(
            layout.backup_path_with_suffix("20240131_235959", 2),
            PathBuf::from("/proj/modelo_final_backup_20240131_235959_2.bin")
        );
    }
}
