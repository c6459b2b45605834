//! Scenario indicators
//!
//! An [`Indicator`] derives one or more named metadata values for a single
//! scenario, from the scenario's timeseries and from metadata produced by other
//! indicators. Indicators declare what they read and write through
//! [`Indicator::definitions`], which the [`Pipeline`](crate::pipeline::Pipeline)
//! uses to order them.

use crate::dataset::ScenarioDataset;
use crate::errors::{SR15Error, SR15Result};
use crate::meta::{DefinitionTable, MetaDefinition, MetaTable, MetaValue};
use crate::scenario::ScenarioId;
use crate::timeseries::{FloatValue, Timeseries};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Metadata values produced for a single scenario
pub type IndicatorOutput = IndexMap<String, MetaValue>;

#[derive(Debug, Eq, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum RequirementType {
    /// A timeseries reported by the scenario
    Variable,
    /// Metadata produced by another indicator
    MetaInput,
    /// Metadata produced by this indicator
    MetaOutput,
}

#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct RequirementDefinition {
    pub name: String,
    /// Unit of a variable or the description of a metadata output
    pub detail: String,
    pub requirement_type: RequirementType,
}

impl RequirementDefinition {
    pub fn new(name: &str, detail: &str, requirement_type: RequirementType) -> Self {
        Self {
            name: name.to_string(),
            detail: detail.to_string(),
            requirement_type,
        }
    }

    pub fn variable(name: &str, unit: &str) -> Self {
        Self::new(name, unit, RequirementType::Variable)
    }

    pub fn meta_input(name: &str) -> Self {
        Self::new(name, "", RequirementType::MetaInput)
    }

    pub fn meta_output(name: &str, description: &str) -> Self {
        Self::new(name, description, RequirementType::MetaOutput)
    }
}

/// Data available while evaluating an indicator for one scenario
///
/// Metadata written by indicators evaluated earlier in the pipeline is visible
/// through [`ScenarioContext::meta`].
pub struct ScenarioContext<'a> {
    pub id: &'a ScenarioId,
    pub dataset: &'a ScenarioDataset,
    pub meta: &'a MetaTable,
}

impl<'a> ScenarioContext<'a> {
    pub fn new(id: &'a ScenarioId, dataset: &'a ScenarioDataset, meta: &'a MetaTable) -> Self {
        Self { id, dataset, meta }
    }

    pub fn model(&self) -> &str {
        &self.id.model
    }

    pub fn timeseries(&self, variable: &str) -> SR15Result<&'a Timeseries> {
        self.dataset.require(self.id, variable)
    }

    pub fn try_timeseries(&self, variable: &str) -> Option<&'a Timeseries> {
        self.dataset.get(self.id, variable)
    }

    pub fn meta(&self, name: &str) -> Option<&'a MetaValue> {
        self.meta.get(self.id, name)
    }

    pub fn meta_float(&self, name: &str) -> SR15Result<FloatValue> {
        self.meta.require_float(self.id, name)
    }

    pub fn meta_text(&self, name: &str) -> Option<&'a str> {
        self.meta.get_text(self.id, name)
    }

    pub fn missing_meta(&self, name: &str) -> SR15Error {
        SR15Error::MissingMeta {
            scenario: self.id.to_string(),
            name: name.to_string(),
        }
    }
}

/// Indicator interface
///
/// Implementations are serialised with `typetag` so that a full list of
/// indicators can be stored in an assessment configuration.
#[typetag::serde(tag = "type")]
pub trait Indicator: Debug + Send + Sync {
    /// Timeseries and metadata the indicator reads, and the metadata it writes
    fn definitions(&self) -> Vec<RequirementDefinition>;

    /// Metadata columns written by this indicator
    fn outputs(&self) -> Vec<MetaDefinition> {
        self.definitions()
            .iter()
            .filter(|d| d.requirement_type == RequirementType::MetaOutput)
            .map(|d| MetaDefinition::new(&d.name, &d.detail))
            .collect()
    }

    /// Metadata read from other indicators
    fn meta_inputs(&self) -> Vec<String> {
        self.definitions()
            .into_iter()
            .filter(|d| d.requirement_type == RequirementType::MetaInput)
            .map(|d| d.name)
            .collect()
    }

    /// Compute the indicator values for a single scenario
    ///
    /// Outputs that cannot be determined should either be left out or set to
    /// [`MetaValue::Missing`]. Returning an error discards all outputs of this
    /// indicator for the scenario.
    fn evaluate(&self, ctx: &ScenarioContext) -> SR15Result<IndicatorOutput>;

    /// Documentation tables exported alongside the metadata
    fn tables(&self) -> Vec<DefinitionTable> {
        vec![]
    }

    /// Review the complete assessment once all scenarios are evaluated
    ///
    /// Used to report data-quality issues across the ensemble.
    fn finalize(&self, _dataset: &ScenarioDataset, _meta: &MetaTable) -> SR15Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    struct Reporting {
        variable: String,
    }

    #[typetag::serde]
    impl Indicator for Reporting {
        fn definitions(&self) -> Vec<RequirementDefinition> {
            vec![
                RequirementDefinition::variable(&self.variable, "Mt CO2/yr"),
                RequirementDefinition::meta_input("category"),
                RequirementDefinition::meta_output("reported", "Variable is reported"),
            ]
        }

        fn evaluate(&self, ctx: &ScenarioContext) -> SR15Result<IndicatorOutput> {
            let reported = ctx.try_timeseries(&self.variable).is_some();
            Ok(IndexMap::from([(
                "reported".to_string(),
                MetaValue::from(if reported { "yes" } else { "no" }),
            )]))
        }
    }

    #[test]
    fn derived_definitions() {
        let indicator = Reporting {
            variable: "Emissions|CO2".to_string(),
        };
        assert_eq!(indicator.meta_inputs(), vec!["category".to_string()]);
        assert_eq!(
            indicator.outputs(),
            vec![MetaDefinition::new("reported", "Variable is reported")]
        );
        assert!(indicator.tables().is_empty());
    }

    #[test]
    fn evaluate_with_context() {
        let indicator = Reporting {
            variable: "Emissions|CO2".to_string(),
        };
        let dataset = ScenarioDataset::new();
        let meta = MetaTable::new();
        let id = ScenarioId::new("AIM/CGE 2.0", "SSP1-19");
        let ctx = ScenarioContext::new(&id, &dataset, &meta);

        let output = indicator.evaluate(&ctx).unwrap();
        assert_eq!(output["reported"], MetaValue::from("no"));
        assert!(ctx.timeseries("Emissions|CO2").unwrap_err().is_missing_data());
        assert!(ctx.meta_float("category").is_err());
    }

    #[test]
    fn serialise_trait_object() {
        let indicator: Box<dyn Indicator> = Box::new(Reporting {
            variable: "Emissions|CO2".to_string(),
        });
        let serialised = serde_json::to_string(&indicator).unwrap();
        assert_eq!(
            serialised,
            r#"{"type":"Reporting","variable":"Emissions|CO2"}"#
        );
        let restored: Box<dyn Indicator> = serde_json::from_str(&serialised).unwrap();
        assert_eq!(restored.definitions().len(), 3);
    }
}
