//! Exceedance of a warming threshold
//!
//! Determines the year in which a timeseries first exceeds a threshold, the year
//! in which it returns below it, and the number of years in between.
//!
//! Crossings are located by linear interpolation between the two reported
//! values around the crossing. The fractional number of years after the earlier
//! value is rounded down and one is added, so the reported year is the first
//! full year after the crossing.

use serde::{Deserialize, Serialize};
use sr15_core::errors::SR15Result;
use sr15_core::indicator::{Indicator, IndicatorOutput, RequirementDefinition, ScenarioContext};
use sr15_core::meta::MetaValue;
use sr15_core::standard_variables::VAR_MAGICC6_MEDIAN_TEMPERATURE;
use sr15_core::timeseries::{FloatValue, Timeseries, Year};

/// Result of scanning a timeseries for threshold crossings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdCrossing {
    pub exceedance_year: Option<Year>,
    pub return_year: Option<Year>,
    pub overshoot_years: Option<i32>,
}

/// Year of a crossing between `(prev_year, prev)` and `(year, current)`
pub(crate) fn crossing_year(
    prev_year: Year,
    prev: FloatValue,
    year: Year,
    current: FloatValue,
    threshold: FloatValue,
) -> Year {
    // change per year
    let x = (current - prev) / (year - prev_year) as FloatValue;
    prev_year + ((threshold - prev) / x).floor() as Year + 1
}

/// Scan `ts` for the first exceedance of `threshold` and the subsequent return
///
/// Gaps in the series are skipped. If the first reported value is already above
/// the threshold, the exceedance year is the first reported year.
///
/// ```rust
/// use sr15_core::timeseries::Timeseries;
/// use sr15_indicators::exceedance::exceedance;
///
/// let ts = Timeseries::from_pairs(&[(2020, 1.2), (2030, 1.6)], "K").unwrap();
/// let crossing = exceedance(&ts, 1.5);
/// assert_eq!(crossing.exceedance_year, Some(2028));
/// assert_eq!(crossing.return_year, None);
/// ```
pub fn exceedance(ts: &Timeseries, threshold: FloatValue) -> ThresholdCrossing {
    let mut exceedance_year = None;
    let mut return_year = None;
    let mut prev: Option<(Year, FloatValue)> = None;

    for (year, value) in ts.iter_valid() {
        match (exceedance_year, prev) {
            (None, None) if value > threshold => exceedance_year = Some(year),
            (None, Some((prev_year, prev_value))) if value > threshold => {
                exceedance_year = Some(crossing_year(prev_year, prev_value, year, value, threshold))
            }
            (Some(_), Some((prev_year, prev_value))) if value <= threshold => {
                return_year = Some(crossing_year(prev_year, prev_value, year, value, threshold));
                break;
            }
            _ => {}
        }
        prev = Some((year, value));
    }

    let overshoot_years = match (exceedance_year, return_year) {
        (Some(exceedance), Some(ret)) => Some(ret - exceedance),
        _ => None,
    };
    ThresholdCrossing {
        exceedance_year,
        return_year,
        overshoot_years,
    }
}

/// Label of a warming threshold as used in metadata names, e.g. `1.5°C`
pub fn threshold_label(threshold: FloatValue) -> String {
    format!("{:.1}°C", threshold)
}

/// Exceedance year, return year and overshoot duration of median warming
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exceedance {
    pub variable: String,
    pub threshold: FloatValue,
}

impl Exceedance {
    pub fn new(threshold: FloatValue) -> Self {
        Self {
            variable: VAR_MAGICC6_MEDIAN_TEMPERATURE.name.to_string(),
            threshold,
        }
    }

    pub fn exceedance_name(&self) -> String {
        format!("exceedance year|{}", threshold_label(self.threshold))
    }

    pub fn return_name(&self) -> String {
        format!("return year|{}", threshold_label(self.threshold))
    }

    pub fn overshoot_name(&self) -> String {
        format!("overshoot years|{}", threshold_label(self.threshold))
    }
}

#[typetag::serde]
impl Indicator for Exceedance {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let label = threshold_label(self.threshold);
        vec![
            RequirementDefinition::variable(&self.variable, "K"),
            RequirementDefinition::meta_output(
                &self.exceedance_name(),
                &format!("year in which the {} median warming threshold is exceeded", label),
            ),
            RequirementDefinition::meta_output(
                &self.return_name(),
                &format!("year in which median warming returns below the {} threshold", label),
            ),
            RequirementDefinition::meta_output(
                &self.overshoot_name(),
                &format!("number of years where {} median warming threshold is exceeded", label),
            ),
        ]
    }

    fn evaluate(&self, ctx: &ScenarioContext) -> SR15Result<IndicatorOutput> {
        let crossing = exceedance(ctx.timeseries(&self.variable)?, self.threshold);
        Ok(IndicatorOutput::from([
            (self.exceedance_name(), MetaValue::from(crossing.exceedance_year)),
            (self.return_name(), MetaValue::from(crossing.return_year)),
            (self.overshoot_name(), MetaValue::from(crossing.overshoot_years)),
        ]))
    }
}
