//! Export of assessment results as a directory of CSV sheets.
//!
//! Each sheet of the published xlsx workbook becomes one CSV file with the same
//! columns, named after the sheet.

use crate::errors::SR15Result;
use crate::io::{csv_error, io_error};
use crate::meta::{DefinitionTable, MetaTable};
use crate::pipeline::Assessment;
use log::{debug, info};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes an [`Assessment`] to an output directory.
///
/// Each sheet of the workbook becomes its own file:
/// - `meta.csv`: one row per scenario with all categories and indicators
/// - `categories_indicators_doc.csv`: description of every metadata column
/// - `def_<name>.csv`: one file per definition table
///
/// The directory is created if it does not exist.
pub struct WorkbookWriter {
    output_dir: PathBuf,
}

impl WorkbookWriter {
    pub fn new(output_dir: &Path) -> SR15Result<Self> {
        fs::create_dir_all(output_dir).map_err(|e| io_error(output_dir, e))?;
        debug!("Output directory {} ready", output_dir.display());
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn write(&self, assessment: &Assessment) -> SR15Result<()> {
        self.write_meta(&assessment.meta)?;
        self.write_docs(&assessment.meta)?;
        for table in &assessment.tables {
            self.write_table(table)?;
        }
        info!(
            "Wrote metadata for {} scenarios to {}",
            assessment.meta.len(),
            self.output_dir.display()
        );
        Ok(())
    }

    pub fn write_meta(&self, meta: &MetaTable) -> SR15Result<PathBuf> {
        let path = self.output_dir.join("meta.csv");
        let mut header = vec!["model", "scenario"];
        header.extend(meta.columns());

        let rows = meta.scenarios().map(|id| {
            let mut row = vec![id.model.clone(), id.scenario.clone()];
            row.extend(meta.row(id).iter().map(ToString::to_string));
            row
        });
        self.write_csv(&path, &header, rows)?;
        Ok(path)
    }

    pub fn write_docs(&self, meta: &MetaTable) -> SR15Result<PathBuf> {
        let path = self.output_dir.join("categories_indicators_doc.csv");
        let rows = meta
            .docs()
            .map(|(name, description)| vec![name.to_string(), description.to_string()]);
        self.write_csv(&path, &["Category or indicator", "Description"], rows)?;
        Ok(path)
    }

    pub fn write_table(&self, table: &DefinitionTable) -> SR15Result<PathBuf> {
        let path = self.output_dir.join(format!("def_{}.csv", table.name));
        let header: Vec<&str> = table.columns.iter().map(String::as_str).collect();
        self.write_csv(&path, &header, table.rows.iter().cloned())?;
        Ok(path)
    }

    /// Write any serialisable specification to `<name>.toml`
    pub fn write_toml<T: Serialize>(&self, name: &str, value: &T) -> SR15Result<PathBuf> {
        let path = self.output_dir.join(format!("{}.toml", name));
        let content = toml::to_string_pretty(value)?;
        fs::write(&path, content).map_err(|e| io_error(&path, e))?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }

    fn write_csv<I>(&self, path: &Path, header: &[&str], rows: I) -> SR15Result<()>
    where
        I: Iterator<Item = Vec<String>>,
    {
        let mut wtr = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
        wtr.write_record(header).map_err(|e| csv_error(path, e))?;
        for row in rows {
            wtr.write_record(&row).map_err(|e| csv_error(path, e))?;
        }
        wtr.flush().map_err(|e| io_error(path, e))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}
