//! Scientific references and contributing projects
//!
//! Each row of the reference table selects scenarios by model and scenario
//! name. A scenario collects the references of all rows that select it, while
//! the project of the last matching row wins.
use log::warn;
use serde::{Deserialize, Serialize};
use sr15_core::dataset::ScenarioDataset;
use sr15_core::errors::SR15Result;
use sr15_core::indicator::{Indicator, IndicatorOutput, RequirementDefinition, ScenarioContext};
use sr15_core::io::ReferenceRecord;
use sr15_core::meta::{DefinitionTable, MetaValue};
use sr15_core::scenario::{pattern_match, ScenarioId};

const UNDEFINED_REFERENCE: &str = "undefined";
const UNKNOWN_PROJECT: &str = "unknown";

fn matches(patterns: &[String], value: &str) -> bool {
    patterns.is_empty() || patterns.iter().any(|p| pattern_match(p, value))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScientificReferences {
    pub records: Vec<ReferenceRecord>,
}

impl ScientificReferences {
    /// Keep the rows that select at least one scenario of `dataset`
    ///
    /// Rows without any filter or without a matching scenario are skipped with
    /// a warning.
    pub fn resolve(records: Vec<ReferenceRecord>, dataset: &ScenarioDataset) -> Self {
        let project = |r: &ReferenceRecord| r.project.clone().unwrap_or_default();
        let records = records
            .into_iter()
            .filter(|record| {
                if !record.has_filters() {
                    warn!(
                        "project `{}` on line {} has no filters assigned",
                        project(record),
                        record.line
                    );
                    return false;
                }
                let selected = dataset.filter(&record.model_filter(), &record.scenario_filter());
                if selected.is_empty() {
                    warn!(
                        "no scenarios satisfy filters for project `{}` on line {} (model: {:?}, scenario: {:?})",
                        project(record),
                        record.line,
                        record.model,
                        record.scenario
                    );
                    return false;
                }
                true
            })
            .collect();
        Self { records }
    }

    fn selecting<'a>(&'a self, id: &'a ScenarioId) -> impl Iterator<Item = &'a ReferenceRecord> {
        self.records.iter().filter(move |record| {
            record.has_filters()
                && matches(&record.model_filter(), &id.model)
                && matches(&record.scenario_filter(), &id.scenario)
        })
    }
}

#[typetag::serde]
impl Indicator for ScientificReferences {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::meta_output("reference", "Scientific references"),
            RequirementDefinition::meta_output(
                "project",
                "Project identifier contributing the scenario",
            ),
        ]
    }

    fn evaluate(&self, ctx: &ScenarioContext) -> SR15Result<IndicatorOutput> {
        let mut references: Vec<&str> = vec![];
        let mut project = UNKNOWN_PROJECT;
        for record in self.selecting(ctx.id) {
            if let Some(p) = &record.project {
                project = p.as_str();
            }
            if let Some(r) = &record.reference {
                references.push(r.as_str());
            }
        }
        let reference = if references.is_empty() {
            UNDEFINED_REFERENCE.to_string()
        } else {
            references.join("; ")
        };
        Ok(IndicatorOutput::from([
            ("reference".to_string(), MetaValue::from(reference)),
            ("project".to_string(), MetaValue::from(project)),
        ]))
    }

    fn tables(&self) -> Vec<DefinitionTable> {
        let mut table = DefinitionTable::new(
            "references",
            &["Project", "Model", "Scenario", "Reference", "Doi", "Bibliography"],
        );
        for record in &self.records {
            let cells = [
                &record.project,
                &record.model,
                &record.scenario,
                &record.reference,
                &record.doi,
                &record.bibliography,
            ];
            table.push_row(&cells.map(|cell| cell.as_deref().unwrap_or("")));
        }
        vec![table]
    }
}
