//! Reader for the table of scientific references.

use crate::errors::{SR15Error, SR15Result};
use crate::io::{csv_error, find_column, io_error};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const COLUMNS: [&str; 6] = ["project", "model", "scenario", "reference", "doi", "bibliography"];

/// A row of the reference table
///
/// `model` and `scenario` are filters selecting the scenarios the reference
/// applies to. Both may hold a `;`-separated list of names or `*` patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    /// Zero-based data row in the source file
    pub line: usize,
    pub project: Option<String>,
    pub model: Option<String>,
    pub scenario: Option<String>,
    pub reference: Option<String>,
    pub doi: Option<String>,
    pub bibliography: Option<String>,
}

impl ReferenceRecord {
    /// Scenario filters of the row, if any are given
    ///
    /// A value containing `;` is split into a list of names.
    pub fn model_filter(&self) -> Vec<String> {
        split_filter(self.model.as_deref())
    }

    pub fn scenario_filter(&self) -> Vec<String> {
        split_filter(self.scenario.as_deref())
    }

    pub fn has_filters(&self) -> bool {
        self.model.is_some() || self.scenario.is_some()
    }
}

fn split_filter(value: Option<&str>) -> Vec<String> {
    match value {
        None => vec![],
        Some(v) if v.contains(';') => v
            .split(';')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
        Some(v) => vec![v.to_string()],
    }
}

/// Reads the reference CSV file.
///
/// Expected columns: `project,model,scenario,reference,doi,bibliography`.
/// Files are usually exported from spreadsheets in ISO-8859-1, so any content
/// that is not valid UTF-8 is decoded as Latin-1.
pub struct ReferenceReader {
    path: PathBuf,
}

impl ReferenceReader {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn read(&self) -> SR15Result<Vec<ReferenceRecord>> {
        let bytes = std::fs::read(&self.path).map_err(|e| io_error(&self.path, e))?;
        self.read_bytes(&bytes)
    }

    pub fn read_bytes(&self, bytes: &[u8]) -> SR15Result<Vec<ReferenceRecord>> {
        let content = decode(bytes);
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let header = rdr.headers().map_err(|e| csv_error(&self.path, e))?.clone();
        let mut columns = [0; 6];
        for (slot, name) in columns.iter_mut().zip(COLUMNS) {
            *slot = find_column(&header, name).ok_or_else(|| SR15Error::MissingColumn {
                path: self.path.clone(),
                column: name.to_string(),
            })?;
        }

        let mut records = vec![];
        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| csv_error(&self.path, e))?;
            let cell = |idx: usize| {
                record
                    .get(columns[idx])
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            };
            records.push(ReferenceRecord {
                line,
                project: cell(0),
                model: cell(1),
                scenario: cell(2),
                reference: cell(3),
                doi: cell(4),
                bibliography: cell(5),
            });
        }

        info!("Read {} references from {}", records.len(), self.path.display());
        Ok(records)
    }
}

fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(content) => content.to_string(),
        // Latin-1 maps every byte onto the code point of the same value
        Err(_) => bytes.iter().map(|b| *b as char).collect(),
    }
}
