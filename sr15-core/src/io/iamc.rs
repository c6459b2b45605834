//! Reader for scenario data in the IAMC wide format.

use crate::dataset::ScenarioDataset;
use crate::errors::{SR15Error, SR15Result};
use crate::io::{csv_error, find_column, io_error};
use crate::scenario::ScenarioId;
use crate::timeseries::{FloatValue, TimeAxis, Timeseries, Year};
use log::{debug, info, warn};
use ndarray::Array1;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_REGION: &str = "World";

/// Reads a CSV file with one row per timeseries.
///
/// Expected CSV format:
/// - `Model,Scenario,Region,Variable,Unit,<year>,<year>,...`
/// - Header names are matched case-insensitively; year columns may appear in any order
/// - Empty cells and `nan` mark years that are not reported
///
/// Only rows for a single region (`World` by default) are kept.
pub struct IamcReader {
    path: PathBuf,
    region: String,
}

impl IamcReader {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            region: DEFAULT_REGION.to_string(),
        }
    }

    pub fn with_region(mut self, region: &str) -> Self {
        self.region = region.to_string();
        self
    }

    pub fn read(&self) -> SR15Result<ScenarioDataset> {
        let file = std::fs::File::open(&self.path).map_err(|e| io_error(&self.path, e))?;
        self.read_from(file)
    }

    /// Read from any source, using the configured path in error messages
    pub fn read_from<R: Read>(&self, source: R) -> SR15Result<ScenarioDataset> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(source);

        let header = rdr.headers().map_err(|e| csv_error(&self.path, e))?.clone();
        let column = |name: &str| {
            find_column(&header, name).ok_or_else(|| SR15Error::MissingColumn {
                path: self.path.clone(),
                column: name.to_string(),
            })
        };
        let model_col = column("model")?;
        let scenario_col = column("scenario")?;
        let region_col = column("region")?;
        let variable_col = column("variable")?;
        let unit_col = column("unit")?;

        let mut year_cols: Vec<(Year, usize)> = header
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| name.trim().parse::<Year>().ok().map(|year| (year, idx)))
            .collect();
        year_cols.sort();
        debug!("Found {} year columns in {}", year_cols.len(), self.path.display());

        let time_axis = Arc::new(TimeAxis::from_values(
            year_cols.iter().map(|(year, _)| *year).collect(),
        )?);

        let mut dataset = ScenarioDataset::new();
        let mut skipped = 0;
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| csv_error(&self.path, e))?;
            let get = |idx: usize| record.get(idx).unwrap_or("").trim();

            if get(region_col) != self.region {
                skipped += 1;
                continue;
            }

            let values = year_cols
                .iter()
                .map(|(_, idx)| {
                    parse_value(get(*idx)).ok_or_else(|| SR15Error::InvalidValue {
                        path: self.path.clone(),
                        row,
                        column: header.get(*idx).unwrap_or("").to_string(),
                        raw: get(*idx).to_string(),
                    })
                })
                .collect::<SR15Result<Array1<FloatValue>>>()?;

            let id = ScenarioId::new(get(model_col), get(scenario_col));
            let variable = get(variable_col);
            if dataset.get(&id, variable).is_some() {
                warn!("Duplicate timeseries `{}` for {}, keeping the last", variable, id);
            }
            let timeseries = Timeseries::new(values, time_axis.clone(), get(unit_col))?;
            dataset.insert(id, variable, timeseries);
        }

        if skipped > 0 {
            debug!("Skipped {} rows outside region {}", skipped, self.region);
        }
        info!(
            "Loaded {} scenarios from {}",
            dataset.len(),
            self.path.display()
        );
        Ok(dataset)
    }
}

fn parse_value(raw: &str) -> Option<FloatValue> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Some(FloatValue::NAN);
    }
    raw.parse().ok()
}
