//! Reading scenario data and writing assessment results.

mod iamc;
mod references;
mod writer;

pub use iamc::IamcReader;
pub use references::{ReferenceReader, ReferenceRecord};
pub use writer::WorkbookWriter;

use crate::errors::SR15Error;
use std::path::Path;

pub(crate) fn csv_error(path: &Path, source: csv::Error) -> SR15Error {
    SR15Error::Csv {
        path: path.to_path_buf(),
        source,
    }
}

pub(crate) fn io_error(path: &Path, source: std::io::Error) -> SR15Error {
    SR15Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Position of a header column, matched case-insensitively
pub(crate) fn find_column(header: &csv::StringRecord, name: &str) -> Option<usize> {
    header
        .iter()
        .position(|column| column.trim().eq_ignore_ascii_case(name))
}
