use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{DataTable, Row, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("missing header row")]
    MissingHeader,
    #[error("line {line}: expected {expected} fields but found {found}")]
    RaggedRow { line: u64, expected: u64, found: u64 },
    #[error("required column '{0}' not found")]
    MissingColumn(&'static str),
    #[error("malformed JSON: {0}")]
    Json(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a country table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`         – comma-delimited with a header row
/// * `.tsv`, `.tab` – tab-delimited with a header row
/// * `.json`        – `[{ "time": 1960, "location": "...", ... }, ...]`
/// * `.parquet`     – any column types, rendered to text
pub fn load_file(path: &Path) -> Result<DataTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let open = || {
        File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    let table = match ext.as_str() {
        "csv" => load_delimited(open()?, b',')?,
        "tsv" | "tab" => load_delimited(open()?, b'\t')?,
        "json" => load_json(open()?)?,
        "parquet" | "pq" => load_parquet(open()?)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        table.len(),
        table.headers,
        path.display()
    );
    Ok(table)
}

fn check_required(headers: &[String]) -> Result<(), LoadError> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row with column names, every record the same width.
pub fn load_delimited<R: Read>(source: R, delimiter: u8) -> Result<DataTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::Headers)
        .from_reader(source);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::MissingHeader);
    }
    check_required(&headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(ragged_or_csv)?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.as_str(), v))
            .collect();
        rows.push(row);
    }

    Ok(DataTable::new(headers, rows))
}

fn ragged_or_csv(err: csv::Error) -> LoadError {
    if let csv::ErrorKind::UnequalLengths {
        pos,
        expected_len,
        len,
    } = err.kind()
    {
        return LoadError::RaggedRow {
            line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
            expected: *expected_len,
            found: *len,
        };
    }
    LoadError::Csv(err)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "time": 1960, "location": "Chad", "fertility_rate": 6.3, ... },
///   ...
/// ]
/// ```
///
/// Columns are the keys of the first record in sorted order (`serde_json`
/// maps are ordered by key). Every later record must carry exactly the same
/// keys.
fn load_json<R: Read>(source: R) -> Result<DataTable, LoadError> {
    let root: JsonValue =
        serde_json::from_reader(source).map_err(|e| LoadError::Json(e.to_string()))?;

    let records = root
        .as_array()
        .ok_or_else(|| LoadError::Json("expected top-level array".into()))?;

    let headers: Vec<String> = match records.first() {
        Some(JsonValue::Object(first)) => first.keys().cloned().collect(),
        Some(_) => return Err(LoadError::Json("row 0 is not an object".into())),
        None => return Err(LoadError::MissingHeader),
    };
    check_required(&headers)?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::Json(format!("row {i} is not an object")))?;
        if obj.len() != headers.len() || headers.iter().any(|h| !obj.contains_key(h)) {
            let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
            return Err(LoadError::Json(format!(
                "row {i}: expected columns {headers:?}, found {keys:?}"
            )));
        }
        let row: Row = obj
            .iter()
            .map(|(key, val)| (key.as_str(), json_to_text(val)))
            .collect();
        rows.push(row);
    }

    Ok(DataTable::new(headers, rows))
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file. Every cell is rendered with Arrow's display
/// formatter so downstream code sees the same raw text a CSV would carry.
fn load_parquet(file: File) -> Result<DataTable, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    check_required(&headers)?;

    let reader = builder.build()?;
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        for row_idx in 0..batch.num_rows() {
            let mut row = Row::default();
            for (col_idx, name) in headers.iter().enumerate() {
                let column = batch.column(col_idx);
                let text = if column.is_null(row_idx) {
                    String::new()
                } else {
                    array_value_to_string(column, row_idx)?
                };
                row.fields.insert(name.clone(), text);
            }
            rows.push(row);
        }
    }

    Ok(DataTable::new(headers, rows))
}
