//! The CSV-to-table ingestion pipeline and its orchestration.
//!
//! [`load_file`] takes one dataset from CSV to destination table: header
//! normalization, column mapping, required-identifier checks, date coercion,
//! NOT-NULL-safe fills, projection onto the destination columns, and a
//! transactional write. Failures are values, not panics: each file yields a
//! `Result` that [`run_all`] folds into a per-dataset report, so one bad
//! file never stops the others.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use log::{error, info, warn};
use rusqlite::Connection;
use serde::Serialize;
use thiserror::Error;

use crate::cli::{IngestArgs, WriteMode};
use crate::dataset::{DATASETS, Dataset};
use crate::schema::{ColumnKind, REQUIRED_IDENTIFIERS};
use crate::{data, store, table};

/// Fill placeholder for missing values in textual, non-identifier columns.
const TEXT_FILL: &str = "Unknown";
/// Fill value for missing values in numeric, non-identifier columns.
const NUMERIC_FILL: &str = "0";

/// Per-file failure taxonomy. None of these cross the file boundary; the
/// orchestrator converts them into report entries.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("source file {0:?} not found")]
    MissingFile(PathBuf),
    #[error("source file {0:?} is empty")]
    EmptyFile(PathBuf),
    #[error("destination table '{0}' does not exist")]
    MissingTable(String),
    #[error("required column(s) {missing:?} absent after mapping; available columns: {available:?}")]
    MissingRequired {
        missing: Vec<String>,
        available: Vec<String>,
    },
    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("writing to store: {0}")]
    Store(#[from] rusqlite::Error),
}

#[derive(Debug, Serialize)]
pub struct DatasetOutcome {
    pub dataset: String,
    pub table: String,
    pub success: bool,
    pub rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub status: String,
    pub datasets: Vec<DatasetOutcome>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.datasets.iter().all(|outcome| outcome.success)
    }
}

pub fn execute(args: &IngestArgs) -> Result<()> {
    // A store that can't be opened fails the whole run before any per-file
    // attempt.
    let mut conn = store::open(&args.db)?;
    let report = run_all(&mut conn, &args.data_dir, args.mode);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    if !report.is_success() {
        bail!("Ingestion completed with status '{}'", report.status);
    }
    Ok(())
}

/// Runs every dataset declaration against `data_dir`, isolating failures per
/// file.
pub fn run_all(conn: &mut Connection, data_dir: &Path, mode: WriteMode) -> RunReport {
    let mut datasets = Vec::with_capacity(DATASETS.len());
    for dataset in DATASETS {
        info!("Processing {}", dataset.file);
        let outcome = match load_file(conn, data_dir, dataset, mode) {
            Ok(rows) => {
                info!("✓ Loaded {rows} row(s) into '{}'", dataset.table);
                DatasetOutcome {
                    dataset: dataset.name.to_string(),
                    table: dataset.table.to_string(),
                    success: true,
                    rows,
                    error: None,
                }
            }
            Err(err) => {
                error!("✗ {}: {err}", dataset.file);
                DatasetOutcome {
                    dataset: dataset.name.to_string(),
                    table: dataset.table.to_string(),
                    success: false,
                    rows: 0,
                    error: Some(err.to_string()),
                }
            }
        };
        datasets.push(outcome);
    }

    let status = if datasets.iter().all(|outcome| outcome.success) {
        "Success"
    } else {
        "Partial or Failed"
    };
    info!("Data ingestion completed with status: {status}");
    RunReport {
        status: status.to_string(),
        datasets,
    }
}

/// Ingests one dataset file, returning the number of rows written. All-or-
/// nothing: any error leaves the destination table untouched.
pub fn load_file(
    conn: &mut Connection,
    data_dir: &Path,
    dataset: &Dataset,
    mode: WriteMode,
) -> Result<usize, IngestError> {
    let path = data_dir.join(dataset.file);
    if !path.exists() {
        return Err(IngestError::MissingFile(path));
    }
    if fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0) == 0 {
        return Err(IngestError::EmptyFile(path));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_path(&path)?;
    let raw_headers = reader.headers()?.clone();
    if raw_headers.is_empty() {
        return Err(IngestError::EmptyFile(path));
    }

    // Normalize headers, then rename through the dataset mapping.
    let headers = raw_headers
        .iter()
        .map(|name| dataset.map_header(&data::normalize_header(name)))
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = (0..headers.len())
            .map(|idx| {
                record
                    .get(idx)
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
            })
            .collect::<Vec<_>>();
        rows.push(row);
    }
    info!("Read {} row(s) from {}", rows.len(), dataset.file);

    let schema = store::table_schema(conn, dataset.table, dataset.date_columns)?
        .ok_or_else(|| IngestError::MissingTable(dataset.table.to_string()))?;

    let missing = schema.missing_required(&headers);
    if !missing.is_empty() {
        return Err(IngestError::MissingRequired {
            missing,
            available: headers,
        });
    }

    for (idx, header) in headers.iter().enumerate() {
        match schema.kind_of(header) {
            Some(ColumnKind::Date) => {
                for row in &mut rows {
                    row[idx] = row[idx].as_deref().and_then(data::clean_date);
                }
            }
            Some(kind) => {
                // Required identifiers are never auto-filled; a hole there
                // must surface as a constraint failure, not a silent zero.
                if REQUIRED_IDENTIFIERS.contains(&header.as_str()) {
                    continue;
                }
                let fill = match kind {
                    ColumnKind::Numeric => NUMERIC_FILL,
                    _ => TEXT_FILL,
                };
                for row in &mut rows {
                    if row[idx].is_none() {
                        row[idx] = Some(fill.to_string());
                    }
                }
            }
            None => {}
        }
    }

    // Only columns the destination table knows survive.
    let keep = headers
        .iter()
        .enumerate()
        .filter(|(_, header)| schema.contains(header))
        .map(|(idx, _)| idx)
        .collect::<Vec<_>>();
    let columns = keep
        .iter()
        .map(|&idx| headers[idx].clone())
        .collect::<Vec<_>>();
    if columns.len() < headers.len() {
        warn!(
            "Dropping {} source column(s) with no destination counterpart",
            headers.len() - columns.len()
        );
    }
    let missing = schema.missing_required(&columns);
    if !missing.is_empty() {
        return Err(IngestError::MissingRequired {
            missing,
            available: columns,
        });
    }
    let rows = rows
        .into_iter()
        .map(|row| keep.iter().map(|&idx| row[idx].clone()).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    let written = store::write_rows(conn, &schema, &columns, &rows, mode)?;
    Ok(written)
}

fn print_report(report: &RunReport) {
    let headers = vec![
        "dataset".to_string(),
        "table".to_string(),
        "status".to_string(),
        "rows".to_string(),
        "detail".to_string(),
    ];
    let rows = report
        .datasets
        .iter()
        .map(|outcome| {
            vec![
                outcome.dataset.clone(),
                outcome.table.clone(),
                if outcome.success { "ok" } else { "failed" }.to_string(),
                outcome.rows.to_string(),
                outcome.error.clone().unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
    println!("Overall status: {}", report.status);
}
