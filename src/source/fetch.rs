//! Blocking retrieval of the dataset CSV and the schema report JSON

use crate::error::{RealtyError, Result};
use super::SchemaReport;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Where a resource is read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    /// http(s) URL, fetched once with a blocking client
    Url(String),
    /// Local file
    Path(PathBuf),
}

impl Location {
    /// Classify a location string. `file://` prefixes are stripped.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let is_url = ["http://", "https://"]
            .iter()
            .any(|scheme| strip_prefix_ignore_case(trimmed, scheme).is_some());
        if is_url {
            Location::Url(trimmed.to_string())
        } else if let Some(path) = strip_prefix_ignore_case(trimmed, "file://") {
            Location::Path(PathBuf::from(path))
        } else {
            Location::Path(PathBuf::from(trimmed))
        }
    }

    /// Read the raw bytes behind this location (one attempt, no retry)
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Location::Url(url) => {
                // the blocking client defaults to a 30s total timeout
                let client = reqwest::blocking::Client::builder().timeout(None).build()?;
                let response = client.get(url).send()?;
                let status = response.status();
                if !status.is_success() {
                    return Err(RealtyError::HttpStatus {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                Ok(response.bytes()?.to_vec())
            }
            Location::Path(path) => Ok(std::fs::read(path)?),
        }
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Url(url) => write!(f, "{}", url),
            Location::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Parse CSV bytes with a header row, inferring dtypes over the whole file
pub fn parse_csv(bytes: Vec<u8>) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| RealtyError::DataError(e.to_string()))
}

/// Load the dataset. Any failure here is fatal for the run.
pub fn fetch_dataset(location: &Location) -> Result<DataFrame> {
    let start = Instant::now();
    info!(source = %location, "loading dataset");

    let bytes = location.read_bytes()?;
    let df = parse_csv(bytes)?;

    if df.height() == 0 {
        return Err(RealtyError::DataError(format!("dataset at {} has no rows", location)));
    }

    info!(
        rows = df.height(),
        cols = df.width(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "dataset loaded"
    );
    Ok(df)
}

/// Load and parse the schema report, surfacing the failure kind
pub fn try_fetch_report(location: &Location) -> Result<SchemaReport> {
    let bytes = location.read_bytes()?;
    let text = String::from_utf8(bytes)
        .map_err(|e| RealtyError::ReportParse(format!("report is not UTF-8: {}", e)))?;
    let report: SchemaReport = serde_json::from_str(&text)
        .map_err(|e| RealtyError::ReportParse(e.to_string()))?;
    debug!(target_col = ?report.target, n_features = report.features.as_ref().map(|f| f.len()), "schema report parsed");
    Ok(report)
}

/// Load the schema report, degrading to an empty report on any failure
pub fn fetch_report(location: &Location) -> SchemaReport {
    info!(source = %location, "loading schema report");
    match try_fetch_report(location) {
        Ok(report) => report,
        Err(e) => {
            warn!(kind = e.kind(), error = %e, "could not read schema report, using fallback schema");
            SchemaReport::default()
        }
    }
}
