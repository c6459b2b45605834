use crate::timeseries::Year;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug)]
pub enum SR15Error {
    #[error("{0}")]
    Error(String),
    #[error("Timeseries `{variable}` is not reported for {scenario}")]
    MissingTimeseries { scenario: String, variable: String },
    #[error("Metadata `{name}` is not available for {scenario}")]
    MissingMeta { scenario: String, name: String },
    #[error("The timeseries does not cover {first_year}-{last_year}")]
    OutOfDomain { first_year: Year, last_year: Year },
    #[error("Invalid interval: first year {first_year} is after last year {last_year}")]
    InvalidInterval { first_year: Year, last_year: Year },
    #[error("Time axis must be strictly increasing, found {found} after {previous}")]
    NonMonotonicTimeAxis { previous: Year, found: Year },
    #[error("Expected {expected} values to match the time axis, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
    #[error("Wrong input units. Expected {0}, got {1}")]
    WrongUnits(String, String),
    #[error("Metadata `{0}` is produced by more than one indicator")]
    DuplicateOutput(String),
    #[error("Indicators form a dependency cycle involving `{0}`")]
    DependencyCycle(String),
    #[error("Cannot access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV parse error in {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Invalid value {raw:?} in {path}, row {row}, column `{column}`")]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: String,
        raw: String,
    },
    #[error("Missing column `{column}` in {path}")]
    MissingColumn { path: PathBuf, column: String },
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Failed to serialise: {0}")]
    Serialise(#[from] toml::ser::Error),
}

impl SR15Error {
    /// True if the error only reflects data a scenario did not report
    ///
    /// These are expected in a heterogeneous ensemble and leave the affected
    /// indicator absent rather than signalling a problem.
    pub fn is_missing_data(&self) -> bool {
        matches!(
            self,
            SR15Error::MissingTimeseries { .. }
                | SR15Error::MissingMeta { .. }
                | SR15Error::OutOfDomain { .. }
        )
    }
}

/// Convenience type for `Result<T, SR15Error>`.
pub type SR15Result<T> = Result<T, SR15Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_data_classification() {
        let missing = SR15Error::MissingTimeseries {
            scenario: "AIM/CGE 2.0 / SSP1-19".to_string(),
            variable: "Emissions|CO2".to_string(),
        };
        assert!(missing.is_missing_data());
        assert!(SR15Error::OutOfDomain {
            first_year: 2016,
            last_year: 2100
        }
        .is_missing_data());
        assert!(!SR15Error::WrongUnits("Gt CO2/yr".into(), "ppm".into()).is_missing_data());
    }

    #[test]
    fn messages() {
        let err = SR15Error::InvalidInterval {
            first_year: 2100,
            last_year: 2016,
        };
        assert_eq!(
            err.to_string(),
            "Invalid interval: first year 2100 is after last year 2016"
        );
    }
}
