use crate::errors::{SR15Error, SR15Result};
use crate::scenario::{pattern_match, ScenarioId};
use crate::timeseries::Timeseries;
use std::collections::BTreeMap;

/// Timeseries reported by a single scenario, keyed by variable name
pub type ScenarioData = BTreeMap<String, Timeseries>;

/// A collection of scenario timeseries.
///
/// Allows access to the data by `(model, scenario, variable)`. Scenarios are kept
/// in sorted order so that iterating over the dataset is deterministic.
#[derive(Debug, Clone, Default)]
pub struct ScenarioDataset {
    scenarios: BTreeMap<ScenarioId, ScenarioData>,
}

impl ScenarioDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a timeseries, replacing any existing data for the same variable
    pub fn insert(&mut self, id: ScenarioId, variable: &str, timeseries: Timeseries) {
        self.scenarios
            .entry(id)
            .or_default()
            .insert(variable.to_string(), timeseries);
    }

    /// Register a scenario without any data
    pub fn add_scenario(&mut self, id: ScenarioId) {
        self.scenarios.entry(id).or_default();
    }

    pub fn contains(&self, id: &ScenarioId) -> bool {
        self.scenarios.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn scenarios(&self) -> impl Iterator<Item = &ScenarioId> {
        self.scenarios.keys()
    }

    pub fn get(&self, id: &ScenarioId, variable: &str) -> Option<&Timeseries> {
        self.scenarios.get(id).and_then(|data| data.get(variable))
    }

    /// Get a timeseries, failing with [`SR15Error::MissingTimeseries`] if it is not reported
    pub fn require(&self, id: &ScenarioId, variable: &str) -> SR15Result<&Timeseries> {
        self.get(id, variable)
            .ok_or_else(|| SR15Error::MissingTimeseries {
                scenario: id.to_string(),
                variable: variable.to_string(),
            })
    }

    /// All variables reported by a scenario
    pub fn variables(&self, id: &ScenarioId) -> impl Iterator<Item = &str> {
        self.scenarios
            .get(id)
            .into_iter()
            .flat_map(|data| data.keys().map(String::as_str))
    }

    /// Scenarios whose model and scenario names match any of the given patterns
    ///
    /// An empty pattern list matches everything. Patterns may contain `*` wildcards.
    pub fn filter(&self, models: &[String], scenarios: &[String]) -> Vec<&ScenarioId> {
        let matches = |patterns: &[String], value: &str| {
            patterns.is_empty() || patterns.iter().any(|p| pattern_match(p, value))
        };
        self.scenarios
            .keys()
            .filter(|id| matches(models, &id.model) && matches(scenarios, &id.scenario))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(value: f64) -> Timeseries {
        Timeseries::from_pairs(&[(2020, value), (2030, value)], "Mt CO2/yr").unwrap()
    }

    fn dataset() -> ScenarioDataset {
        let mut ds = ScenarioDataset::new();
        ds.insert(ScenarioId::new("AIM/CGE 2.0", "SSP1-19"), "Emissions|CO2", series(1.0));
        ds.insert(ScenarioId::new("AIM/CGE 2.0", "SSP1-Baseline"), "Emissions|CO2", series(2.0));
        ds.insert(ScenarioId::new("REMIND-MAgPIE 1.5", "SSP5-19"), "Emissions|CO2", series(3.0));
        ds.insert(ScenarioId::new("REMIND-MAgPIE 1.5", "SSP5-19"), "Final Energy", series(4.0));
        ds
    }

    #[test]
    fn insert_and_get() {
        let ds = dataset();
        assert_eq!(ds.len(), 3);
        let id = ScenarioId::new("REMIND-MAgPIE 1.5", "SSP5-19");
        assert_eq!(ds.get(&id, "Final Energy").unwrap().at(2020), Some(4.0));
        assert_eq!(ds.variables(&id).collect::<Vec<_>>(), vec!["Emissions|CO2", "Final Energy"]);
    }

    #[test]
    fn require_reports_missing() {
        let ds = dataset();
        let id = ScenarioId::new("AIM/CGE 2.0", "SSP1-19");
        let err = ds.require(&id, "Final Energy").unwrap_err();
        assert!(err.is_missing_data());
        assert_eq!(
            err.to_string(),
            "Timeseries `Final Energy` is not reported for AIM/CGE 2.0 / SSP1-19"
        );
    }

    #[test]
    fn filter_by_patterns() {
        let ds = dataset();
        assert_eq!(ds.filter(&[], &[]).len(), 3);
        assert_eq!(ds.filter(&["AIM*".to_string()], &[]).len(), 2);
        assert_eq!(ds.filter(&[], &["*-19".to_string()]).len(), 2);
        assert_eq!(
            ds.filter(&["AIM/CGE 2.0".to_string()], &["SSP1-19".to_string()]),
            vec![&ScenarioId::new("AIM/CGE 2.0", "SSP1-19")]
        );
        assert!(ds.filter(&["GCAM*".to_string()], &[]).is_empty());
    }

    #[test]
    fn scenarios_without_data() {
        let mut ds = ScenarioDataset::new();
        let id = ScenarioId::new("Reference", "CEDS");
        ds.add_scenario(id.clone());
        assert!(ds.contains(&id));
        assert_eq!(ds.variables(&id).count(), 0);
    }
}
