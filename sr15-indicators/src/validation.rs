//! Data-quality checks on reported timeseries
use log::{info, warn};
use serde::{Deserialize, Serialize};
use sr15_core::dataset::ScenarioDataset;
use sr15_core::errors::SR15Result;
use sr15_core::indicator::{Indicator, IndicatorOutput, RequirementDefinition, ScenarioContext};
use sr15_core::meta::{MetaTable, MetaValue};
use sr15_core::standard_variables::{VAR_CO2_EMISSIONS, VAR_KYOTO_EMISSIONS};
use sr15_core::timeseries::{FloatValue, Year};

/// Flags scenarios whose value in a given year lies outside a valid range
///
/// Scenarios that do not report the value are considered in range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueRange {
    pub name: String,
    pub description: String,
    pub variable: String,
    pub year: Year,
    pub lower: FloatValue,
    pub upper: FloatValue,
}

impl ValueRange {
    pub const IN_RANGE: &'static str = "in range";
    pub const EXCLUDE: &'static str = "exclude";
    pub const KYOTO_GHG_2010: &'static str = "Kyoto-GHG|2010 (SAR)";

    /// Kyoto-GHG emissions in 2010 as assessed by the IPCC SAR
    pub fn kyoto_ghg_2010(lower: FloatValue, upper: FloatValue) -> Self {
        Self {
            name: Self::KYOTO_GHG_2010.to_string(),
            description: "Indicator whether 2010 Kyoto-GHG reported by the scenario (as assessed by IPCC SAR) are in the valid range".to_string(),
            variable: VAR_KYOTO_EMISSIONS.name.to_string(),
            year: 2010,
            lower,
            upper,
        }
    }

    pub fn in_range(&self, value: Option<FloatValue>) -> bool {
        value.map_or(true, |v| v >= self.lower && v <= self.upper)
    }
}

#[typetag::serde]
impl Indicator for ValueRange {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::variable(&self.variable, ""),
            RequirementDefinition::meta_output(&self.name, &self.description),
        ]
    }

    fn evaluate(&self, ctx: &ScenarioContext) -> SR15Result<IndicatorOutput> {
        let value = ctx
            .try_timeseries(&self.variable)
            .and_then(|ts| ts.at(self.year));
        let flag = if self.in_range(value) {
            Self::IN_RANGE
        } else {
            Self::EXCLUDE
        };
        Ok(IndicatorOutput::from([(self.name.clone(), MetaValue::from(flag))]))
    }

    fn finalize(&self, _dataset: &ScenarioDataset, meta: &MetaTable) -> SR15Result<()> {
        let excluded = meta.scenarios_with(&self.name, &[Self::EXCLUDE]);
        if !excluded.is_empty() {
            info!(
                "{} scenarios report `{}` in {} outside of [{}, {}]",
                excluded.len(),
                self.variable,
                self.year,
                self.lower,
                self.upper
            );
        }
        Ok(())
    }
}

/// Reports scenarios that do not include a variable in a given year
///
/// Produces no metadata; missing scenarios are logged once all scenarios are
/// evaluated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredVariable {
    pub variable: String,
    pub year: Year,
    /// Models that are not expected to report the variable
    #[serde(default)]
    pub exclude_models: Vec<String>,
}

impl Default for RequiredVariable {
    fn default() -> Self {
        Self {
            variable: VAR_CO2_EMISSIONS.name.to_string(),
            year: 2030,
            exclude_models: vec!["Reference".to_string()],
        }
    }
}

impl RequiredVariable {
    /// Scenarios lacking the variable in the required year
    pub fn missing(&self, dataset: &ScenarioDataset) -> Vec<String> {
        dataset
            .scenarios()
            .filter(|id| !self.exclude_models.contains(&id.model))
            .filter(|id| {
                dataset
                    .get(id, &self.variable)
                    .and_then(|ts| ts.at(self.year))
                    .is_none()
            })
            .map(|id| id.to_string())
            .collect()
    }
}

#[typetag::serde]
impl Indicator for RequiredVariable {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![RequirementDefinition::variable(&self.variable, "")]
    }

    fn evaluate(&self, _ctx: &ScenarioContext) -> SR15Result<IndicatorOutput> {
        Ok(IndicatorOutput::new())
    }

    fn finalize(&self, dataset: &ScenarioDataset, _meta: &MetaTable) -> SR15Result<()> {
        let missing = self.missing(dataset);
        if !missing.is_empty() {
            warn!(
                "{} scenarios do not include required variable `{}` in {}: {}",
                missing.len(),
                self.variable,
                self.year,
                missing.join(", ")
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sr15_core::scenario::ScenarioId;
    use sr15_core::timeseries::Timeseries;

    fn dataset() -> ScenarioDataset {
        let mut ds = ScenarioDataset::new();
        let series = |value: FloatValue| {
            Timeseries::from_pairs(&[(2010, value), (2030, value)], "Mt CO2-equiv/yr").unwrap()
        };
        ds.insert(ScenarioId::new("A", "low"), VAR_KYOTO_EMISSIONS.name, series(40000.0));
        ds.insert(ScenarioId::new("A", "valid"), VAR_KYOTO_EMISSIONS.name, series(50000.0));
        ds.insert(ScenarioId::new("A", "valid"), VAR_CO2_EMISSIONS.name, series(38000.0));
        ds.insert(ScenarioId::new("B", "high"), VAR_KYOTO_EMISSIONS.name, series(60000.0));
        ds.add_scenario(ScenarioId::new("Reference", "CEDS"));
        ds
    }

    #[test]
    fn kyoto_range() {
        let ds = dataset();
        let meta = MetaTable::new();
        let indicator = ValueRange::kyoto_ghg_2010(44500.0, 53500.0);
        let flag = |model: &str, scenario: &str| {
            let id = ScenarioId::new(model, scenario);
            let ctx = ScenarioContext::new(&id, &ds, &meta);
            indicator.evaluate(&ctx).unwrap()["Kyoto-GHG|2010 (SAR)"].clone()
        };
        assert_eq!(flag("A", "low"), MetaValue::from("exclude"));
        assert_eq!(flag("A", "valid"), MetaValue::from("in range"));
        assert_eq!(flag("B", "high"), MetaValue::from("exclude"));
        // not reported
        assert_eq!(flag("Reference", "CEDS"), MetaValue::from("in range"));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let indicator = ValueRange::kyoto_ghg_2010(44500.0, 53500.0);
        assert!(indicator.in_range(Some(44500.0)));
        assert!(indicator.in_range(Some(53500.0)));
        assert!(!indicator.in_range(Some(53500.1)));
    }

    #[test]
    fn required_variable() {
        let ds = dataset();
        let indicator = RequiredVariable::default();
        assert_eq!(indicator.missing(&ds), vec!["A / low", "B / high"]);
        assert!(indicator.outputs().is_empty());
        assert!(indicator.finalize(&ds, &MetaTable::new()).is_ok());
    }
}
