//! Error types for the realty regressor

use thiserror::Error;

/// Result type alias for realty operations
pub type Result<T> = std::result::Result<T, RealtyError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum RealtyError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Fetch error: {0}")]
    FetchError(String),

    #[error("HTTP {status} while fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Schema report could not be parsed: {0}")]
    ReportParse(String),

    #[error("Target '{target}' not found in dataset. Columns: {columns:?}")]
    TargetNotFound { target: String, columns: Vec<String> },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Preprocessing error: {0}")]
    PreprocessingError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Model file not found at {0}. Run `realty train` first")]
    ModelMissing(String),

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl RealtyError {
    /// Short label for the failure class, used in fallback warnings
    pub fn kind(&self) -> &'static str {
        match self {
            RealtyError::FetchError(_) => "network",
            RealtyError::HttpStatus { .. } => "http-status",
            RealtyError::IoError(_) => "io",
            RealtyError::ReportParse(_) | RealtyError::SerializationError(_) => "parse",
            _ => "other",
        }
    }
}

impl From<polars::error::PolarsError> for RealtyError {
    fn from(err: polars::error::PolarsError) -> Self {
        RealtyError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for RealtyError {
    fn from(err: serde_json::Error) -> Self {
        RealtyError::SerializationError(err.to_string())
    }
}

impl From<bincode::Error> for RealtyError {
    fn from(err: bincode::Error) -> Self {
        RealtyError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for RealtyError {
    fn from(err: reqwest::Error) -> Self {
        RealtyError::FetchError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for RealtyError {
    fn from(err: ndarray::ShapeError) -> Self {
        RealtyError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RealtyError::DataError("test error".to_string());
        assert_eq!(err.to_string(), "Data error: test error");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RealtyError = io_err.into();
        assert!(matches!(err, RealtyError::IoError(_)));
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn test_target_not_found_lists_columns() {
        let err = RealtyError::TargetNotFound {
            target: "preco_m2".to_string(),
            columns: vec!["area".to_string(), "bairro".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("preco_m2"));
        assert!(msg.contains("bairro"));
    }

    #[test]
    fn test_model_missing_mentions_training() {
        let err = RealtyError::ModelMissing("/tmp/modelo_final.bin".to_string());
        assert!(err.to_string().contains("realty train"));
    }
}
