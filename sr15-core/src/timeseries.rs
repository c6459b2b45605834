//! Annual timeseries with gaps
//!
//! A [`Timeseries`] maps integer years onto values. Years need not be contiguous
//! and any value may be missing (stored as NaN). Missing values represent years a
//! scenario did not report; they are skipped by every operation in this crate and
//! are never treated as zero.
//!
//! ```rust
//! use sr15_core::timeseries::Timeseries;
//!
//! let ts = Timeseries::from_pairs(&[(2020, 1.0), (2030, f64::NAN), (2040, 3.0)], "Gt CO2/yr").unwrap();
//! assert_eq!(ts.at(2030), None);
//! assert_eq!(ts.fill(2030), Some(2.0));
//! ```

use crate::errors::{SR15Error, SR15Result};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type FloatValue = f64;
pub type Year = i32;

/// Strictly increasing sequence of years
///
/// Time axes are typically shared between all rows read from the same file,
/// hence they are handed around behind an [`Arc`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeAxis {
    years: Array1<Year>,
}

impl TimeAxis {
    /// Create a time axis, verifying that the years are strictly increasing
    pub fn from_values(years: Array1<Year>) -> SR15Result<Self> {
        for pair in years.windows(2) {
            if pair[1] <= pair[0] {
                return Err(SR15Error::NonMonotonicTimeAxis {
                    previous: pair[0],
                    found: pair[1],
                });
            }
        }
        Ok(Self { years })
    }

    /// Time axis from `start` to `end` (inclusive) with a fixed step
    pub fn from_range(start: Year, end: Year, step: usize) -> Self {
        Self {
            years: (start..=end).step_by(step.max(1)).collect(),
        }
    }

    pub fn values(&self) -> ArrayView1<Year> {
        self.years.view()
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Position of `year` on the axis, if present
    pub fn index_of(&self, year: Year) -> Option<usize> {
        match self.years.as_slice() {
            Some(slice) => slice.binary_search(&year).ok(),
            None => self.years.iter().position(|y| *y == year),
        }
    }
}

/// A timeseries of values for a single scenario and variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeseries {
    time_axis: Arc<TimeAxis>,
    values: Array1<FloatValue>,
    unit: String,
}

impl Timeseries {
    pub fn new(values: Array1<FloatValue>, time_axis: Arc<TimeAxis>, unit: &str) -> SR15Result<Self> {
        if values.len() != time_axis.len() {
            return Err(SR15Error::ShapeMismatch {
                expected: time_axis.len(),
                got: values.len(),
            });
        }
        Ok(Self {
            time_axis,
            values,
            unit: unit.to_string(),
        })
    }

    /// Build a timeseries from `(year, value)` pairs in any order
    ///
    /// Fails if the same year appears more than once.
    pub fn from_pairs(pairs: &[(Year, FloatValue)], unit: &str) -> SR15Result<Self> {
        let mut sorted = pairs.to_vec();
        sorted.sort_by_key(|(year, _)| *year);
        let years: Array1<Year> = sorted.iter().map(|(year, _)| *year).collect();
        let values: Array1<FloatValue> = sorted.iter().map(|(_, value)| *value).collect();

        Self::new(values, Arc::new(TimeAxis::from_values(years)?), unit)
    }

    pub fn time_axis(&self) -> &TimeAxis {
        &self.time_axis
    }

    pub fn values(&self) -> ArrayView1<FloatValue> {
        self.values.view()
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all `(year, value)` pairs in ascending order, including gaps
    pub fn iter(&self) -> impl Iterator<Item = (Year, FloatValue)> + '_ {
        self.time_axis
            .years
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Iterate over the reported `(year, value)` pairs, skipping gaps
    pub fn iter_valid(&self) -> impl Iterator<Item = (Year, FloatValue)> + '_ {
        self.iter().filter(|(_, value)| !value.is_nan())
    }

    /// True if at least one value is reported
    pub fn has_data(&self) -> bool {
        self.iter_valid().next().is_some()
    }

    /// Value reported for exactly `year`
    pub fn at(&self, year: Year) -> Option<FloatValue> {
        self.time_axis
            .index_of(year)
            .map(|idx| self.values[idx])
            .filter(|value| !value.is_nan())
    }

    /// Value at `year`, linearly interpolated between the nearest reported years
    ///
    /// Returns the reported value if available. Values are never extrapolated:
    /// `None` is returned if `year` lies before the first or after the last
    /// reported value.
    pub fn fill(&self, year: Year) -> Option<FloatValue> {
        if let Some(value) = self.at(year) {
            return Some(value);
        }

        let mut previous = None;
        for (yr, value) in self.iter_valid() {
            if yr < year {
                previous = Some((yr, value));
            } else {
                let (prev_yr, prev_value) = previous?;
                let span = (yr - prev_yr) as FloatValue;
                return Some(
                    ((yr - year) as FloatValue * prev_value + (year - prev_yr) as FloatValue * value)
                        / span,
                );
            }
        }
        None
    }

    /// First and last reported year
    pub fn valid_range(&self) -> Option<(Year, Year)> {
        let first = self.iter_valid().next()?.0;
        let last = self.iter_valid().last()?.0;
        Some((first, last))
    }

    /// Largest reported value and the first year it occurs in
    pub fn max(&self) -> Option<(Year, FloatValue)> {
        self.iter_valid().fold(None, |acc, (year, value)| match acc {
            Some((_, best)) if value <= best => acc,
            _ => Some((year, value)),
        })
    }

    /// Smallest reported value and the first year it occurs in
    pub fn min(&self) -> Option<(Year, FloatValue)> {
        self.iter_valid().fold(None, |acc, (year, value)| match acc {
            Some((_, best)) if value >= best => acc,
            _ => Some((year, value)),
        })
    }

    /// Restrict the timeseries to the given years
    ///
    /// Years not on the time axis are ignored.
    pub fn select_years(&self, years: &[Year]) -> Self {
        let pairs: Vec<(Year, FloatValue)> = self
            .iter()
            .filter(|(year, _)| years.contains(year))
            .collect();
        Self {
            time_axis: Arc::new(TimeAxis {
                years: pairs.iter().map(|(year, _)| *year).collect(),
            }),
            values: pairs.iter().map(|(_, value)| *value).collect(),
            unit: self.unit.clone(),
        }
    }

    /// Apply `f(year, value)` to every value, keeping the time axis
    ///
    /// Gaps stay gaps as long as `f` propagates NaN.
    pub fn map_values<F>(&self, f: F) -> Self
    where
        F: Fn(Year, FloatValue) -> FloatValue,
    {
        Self {
            time_axis: self.time_axis.clone(),
            values: self.iter().map(|(year, value)| f(year, value)).collect(),
            unit: self.unit.clone(),
        }
    }

    /// Rescale all values by `factor` and relabel the unit
    pub fn convert_unit(&self, unit: &str, factor: FloatValue) -> Self {
        Self {
            time_axis: self.time_axis.clone(),
            values: self.values.mapv(|value| value * factor),
            unit: unit.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;
    use ndarray::array;

    fn ramp() -> Timeseries {
        Timeseries::from_pairs(&[(2010, 0.0), (2020, 10.0), (2030, f64::NAN), (2050, 30.0)], "Mt CO2/yr")
            .unwrap()
    }

    #[test]
    fn time_axis_must_increase() {
        let err = TimeAxis::from_values(array![2010, 2020, 2020]).unwrap_err();
        assert!(matches!(
            err,
            SR15Error::NonMonotonicTimeAxis {
                previous: 2020,
                found: 2020
            }
        ));
    }

    #[test]
    fn time_axis_range() {
        let axis = TimeAxis::from_range(2020, 2100, 10);
        assert_eq!(axis.len(), 9);
        assert_eq!(axis.index_of(2050), Some(3));
        assert_eq!(axis.index_of(2055), None);
    }

    #[test]
    fn shape_mismatch() {
        let axis = Arc::new(TimeAxis::from_range(2020, 2030, 10));
        let err = Timeseries::new(array![1.0], axis, "EJ/yr").unwrap_err();
        assert!(matches!(err, SR15Error::ShapeMismatch { expected: 2, got: 1 }));
    }

    #[test]
    fn from_pairs_sorts() {
        let ts = Timeseries::from_pairs(&[(2030, 3.0), (2010, 1.0)], "EJ/yr").unwrap();
        assert_eq!(ts.iter().collect::<Vec<_>>(), vec![(2010, 1.0), (2030, 3.0)]);
    }

    #[test]
    fn gaps_are_skipped() {
        let ts = ramp();
        assert_eq!(ts.len(), 4);
        assert_eq!(ts.iter_valid().count(), 3);
        assert_eq!(ts.at(2030), None);
        assert_eq!(ts.at(2020), Some(10.0));
        assert_eq!(ts.valid_range(), Some((2010, 2050)));
    }

    #[test]
    fn fill_interpolates_across_gaps() {
        let ts = ramp();
        assert!(is_close!(ts.fill(2015).unwrap(), 5.0));
        // 2030 is missing, so interpolate between 2020 and 2050
        assert!(is_close!(ts.fill(2030).unwrap(), 16.666666666666668));
        assert_eq!(ts.fill(2050), Some(30.0));
    }

    #[test]
    fn fill_never_extrapolates() {
        let ts = ramp();
        assert_eq!(ts.fill(2005), None);
        assert_eq!(ts.fill(2051), None);
    }

    #[test]
    fn max_and_min_pick_first_occurrence() {
        let ts = Timeseries::from_pairs(
            &[(2020, 1.0), (2030, 2.0), (2040, 2.0), (2050, f64::NAN), (2060, -1.0)],
            "K",
        )
        .unwrap();
        assert_eq!(ts.max(), Some((2030, 2.0)));
        assert_eq!(ts.min(), Some((2060, -1.0)));
    }

    #[test]
    fn empty_series_has_no_extrema() {
        let ts = Timeseries::from_pairs(&[(2020, f64::NAN)], "K").unwrap();
        assert!(!ts.has_data());
        assert_eq!(ts.max(), None);
        assert_eq!(ts.valid_range(), None);
    }

    #[test]
    fn select_and_convert() {
        let ts = ramp().select_years(&[2020, 2050, 2070]);
        assert_eq!(ts.iter().collect::<Vec<_>>(), vec![(2020, 10.0), (2050, 30.0)]);

        let converted = ts.convert_unit("Gt CO2/yr", 0.001);
        assert_eq!(converted.unit(), "Gt CO2/yr");
        assert!(is_close!(converted.at(2050).unwrap(), 0.03));
    }

    #[test]
    fn map_values_uses_year() {
        let ts = ramp().map_values(|year, value| value + (year - 2010) as f64);
        assert_eq!(ts.at(2020), Some(20.0));
        assert_eq!(ts.at(2030), None);
    }
}
