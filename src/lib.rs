//! Categorisation and indicator assessment of IAMC scenario ensembles
//!
//! Rust API of the `sr15` Python package. The assessment itself lives in
//! [`sr15_core`] and [`sr15_indicators`]; the `python` feature builds the
//! `sr15._lib` extension module on top of them.

pub use sr15_core;
pub use sr15_indicators;
pub use sr15_indicators::{assess, AssessmentConfig};

#[cfg(feature = "python")]
mod python;
