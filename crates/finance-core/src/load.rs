//! Loading record snapshots from local exports (JSON or CSV)

use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::record::FinancialRecord;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON records: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV records: {0}")]
    Csv(#[from] csv::Error),

    #[error("unsupported record file '{}' (expected .json or .csv)", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Accepted JSON layouts: a bare array, or the platform's `{ "data": [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsDocument {
    List(Vec<FinancialRecord>),
    Wrapped { data: Vec<FinancialRecord> },
}

pub fn from_json_str(json: &str) -> Result<Vec<FinancialRecord>, LoadError> {
    let records = match serde_json::from_str(json)? {
        RecordsDocument::List(records) => records,
        RecordsDocument::Wrapped { data } => data,
    };
    Ok(records)
}

pub fn from_json_path(path: &Path) -> Result<Vec<FinancialRecord>, LoadError> {
    from_json_str(&read(path)?)
}

/// Read CSV with a header row (`date,amount,category,data_type`).
/// Empty cells are treated as absent; extra columns are ignored. Text cells
/// are kept as written, so a category like `007` stays `007`.
pub fn from_csv_reader<R: Read>(reader: R) -> Result<Vec<FinancialRecord>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        records.push(FinancialRecord::from_fields(headers.iter().zip(row.iter())));
    }
    Ok(records)
}

pub fn from_csv_path(path: &Path) -> Result<Vec<FinancialRecord>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_csv_reader(file)
}

/// Load records, picking the decoder from the file extension
pub fn from_path(path: &Path) -> Result<Vec<FinancialRecord>, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let records = match ext.as_deref() {
        Some("json") => from_json_path(path)?,
        Some("csv") => from_csv_path(path)?,
        _ => return Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    };

    tracing::debug!(count = records.len(), path = %path.display(), "loaded records");
    Ok(records)
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
