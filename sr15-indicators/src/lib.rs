//! Categorisation and indicators of the SR1.5 scenario assessment
//!
//! Each indicator is available as a plain function on a [`Timeseries`](sr15_core::timeseries::Timeseries)
//! and as an [`Indicator`](sr15_core::indicator::Indicator) writing scenario
//! metadata. [`assess`] runs the complete assessment as configured by an
//! [`AssessmentConfig`].

pub mod baseline;
pub mod carbon_price;
pub mod category;
pub mod config;
pub mod cumulative;
pub mod exceedance;
pub mod markers;
pub mod net_zero;
pub mod npv;
pub mod overshoot;
pub mod peak_warming;
pub mod references;
pub mod specs;
pub mod statistics;
pub mod validation;
pub mod values;

pub use config::AssessmentConfig;

use references::ScientificReferences;
use sr15_core::dataset::ScenarioDataset;
use sr15_core::errors::SR15Result;
use sr15_core::io::ReferenceRecord;
use sr15_core::pipeline::Assessment;

/// Categorise all scenarios of `dataset` and compute their indicators
///
/// Rows of the reference table that match no scenario are skipped.
pub fn assess(
    config: AssessmentConfig,
    dataset: &ScenarioDataset,
    references: Option<Vec<ReferenceRecord>>,
) -> SR15Result<Assessment> {
    let references = references.map(|records| ScientificReferences::resolve(records, dataset));
    let pipeline = config.into_pipeline(references)?;
    Ok(pipeline.run(dataset))
}
