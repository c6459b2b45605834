//! Severity of a temperature overshoot
//!
//! The severity is the sum of warming above the threshold over the years from
//! the exceedance year up to the year before the return year:
//!
//! $$ S = \sum_{y = y_e}^{y_r - 1} T(y) - (y_r - y_e) \cdot T_{thr} $$

use crate::cumulative::cumulative;
use crate::exceedance::{threshold_label, Exceedance};
use serde::{Deserialize, Serialize};
use sr15_core::errors::SR15Result;
use sr15_core::indicator::{Indicator, IndicatorOutput, RequirementDefinition, ScenarioContext};
use sr15_core::meta::MetaValue;
use sr15_core::standard_variables::VAR_MAGICC6_MEDIAN_TEMPERATURE;
use sr15_core::timeseries::{FloatValue, Timeseries, Year};

/// Temperature-years above `threshold` between exceedance and return
///
/// Returns `None` if either year is unknown or not positive.
pub fn overshoot_severity(
    ts: &Timeseries,
    exceedance_year: Option<Year>,
    return_year: Option<Year>,
    threshold: FloatValue,
) -> SR15Result<Option<FloatValue>> {
    let (Some(first_year), Some(return_year)) = (exceedance_year, return_year) else {
        return Ok(None);
    };
    // the return year itself is below the threshold
    let last_year = return_year - 1;
    if first_year <= 0 || last_year <= 0 {
        return Ok(None);
    }
    if last_year < first_year {
        return Ok(Some(0.0));
    }

    let years = (last_year - first_year + 1) as FloatValue;
    Ok(Some(
        cumulative(ts, first_year, last_year)? - years * threshold,
    ))
}

/// Overshoot severity of median warming, based on the exceedance and return years
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OvershootSeverity {
    pub variable: String,
    pub threshold: FloatValue,
}

impl OvershootSeverity {
    pub fn new(threshold: FloatValue) -> Self {
        Self {
            variable: VAR_MAGICC6_MEDIAN_TEMPERATURE.name.to_string(),
            threshold,
        }
    }

    pub fn name(&self) -> String {
        format!("exceedance severity|{}", threshold_label(self.threshold))
    }

    fn crossing(&self) -> Exceedance {
        Exceedance {
            variable: self.variable.clone(),
            threshold: self.threshold,
        }
    }
}

#[typetag::serde]
impl Indicator for OvershootSeverity {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let crossing = self.crossing();
        vec![
            RequirementDefinition::variable(&self.variable, "K"),
            RequirementDefinition::meta_input(&crossing.exceedance_name()),
            RequirementDefinition::meta_input(&crossing.return_name()),
            RequirementDefinition::meta_output(
                &self.name(),
                &format!(
                    "sum of median temperature exceeding the {} threshold",
                    threshold_label(self.threshold)
                ),
            ),
        ]
    }

    fn evaluate(&self, ctx: &ScenarioContext) -> SR15Result<IndicatorOutput> {
        let crossing = self.crossing();
        let year = |name: String| ctx.meta_float(&name).ok().map(|y| y as Year);
        let severity = overshoot_severity(
            ctx.timeseries(&self.variable)?,
            year(crossing.exceedance_name()),
            year(crossing.return_name()),
            self.threshold,
        )?;
        Ok(IndicatorOutput::from([(self.name(), MetaValue::from(severity))]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceedance::exceedance;
    use is_close::is_close;
    use sr15_core::dataset::ScenarioDataset;
    use sr15_core::meta::MetaTable;
    use sr15_core::scenario::ScenarioId;

    fn triangle() -> Timeseries {
        // 1.5 in 2040, peaking at 2.0 in 2050, back to 1.5 in 2060
        Timeseries::from_pairs(&[(2020, 1.0), (2040, 1.5), (2050, 2.0), (2060, 1.5), (2100, 1.0)], "K")
            .unwrap()
    }

    #[test]
    fn severity_of_triangle() {
        let ts = triangle();
        let crossing = exceedance(&ts, 1.5);
        assert_eq!(crossing.exceedance_year, Some(2041));
        assert_eq!(crossing.return_year, Some(2061));

        // 2041..=2060 is 0.05 .. 0.5 .. 0.0 above the threshold
        let expected: FloatValue = (2041..=2060)
            .map(|y: Year| 0.5 - 0.05 * (y - 2050).abs() as FloatValue)
            .sum();
        let severity = overshoot_severity(&ts, crossing.exceedance_year, crossing.return_year, 1.5)
            .unwrap()
            .unwrap();
        assert!(is_close!(severity, expected));
        assert!(is_close!(severity, 5.0));
    }

    #[test]
    fn absent_boundaries() {
        let ts = triangle();
        assert_eq!(overshoot_severity(&ts, Some(2041), None, 1.5).unwrap(), None);
        assert_eq!(overshoot_severity(&ts, None, Some(2061), 1.5).unwrap(), None);
        assert_eq!(overshoot_severity(&ts, Some(0), Some(2061), 1.5).unwrap(), None);
    }

    #[test]
    fn empty_interval() {
        let ts = triangle();
        assert_eq!(overshoot_severity(&ts, Some(2050), Some(2050), 1.5).unwrap(), Some(0.0));
    }

    #[test]
    fn indicator_reads_crossing_years() {
        let id = ScenarioId::new("REMIND-MAgPIE 1.5", "SSP5-19");
        let indicator = OvershootSeverity::new(1.5);
        let mut ds = ScenarioDataset::new();
        ds.insert(id.clone(), &indicator.variable, triangle());

        let mut meta = MetaTable::new();
        let ctx = ScenarioContext::new(&id, &ds, &meta);
        let output = indicator.evaluate(&ctx).unwrap();
        assert_eq!(output["exceedance severity|1.5°C"], MetaValue::Missing);

        meta.set(&id, "exceedance year|1.5°C", MetaValue::Int(2041));
        meta.set(&id, "return year|1.5°C", MetaValue::Int(2061));
        let ctx = ScenarioContext::new(&id, &ds, &meta);
        let output = indicator.evaluate(&ctx).unwrap();
        assert!(is_close!(output["exceedance severity|1.5°C"].as_float().unwrap(), 5.0));
    }
}
