//! Dependency-ordered evaluation of indicators
//!
//! Indicators may consume metadata written by other indicators, e.g. the
//! overshoot severity reads the exceedance and return years. The [`Pipeline`]
//! builds a graph of these dependencies and evaluates the indicators in
//! topological order.
//!
//! Indicators are evaluated for every scenario in the dataset. A failure for one
//! scenario never aborts the assessment: the outputs of the failing indicator
//! are marked as missing for that scenario and the error is logged.

use crate::dataset::ScenarioDataset;
use crate::errors::{SR15Error, SR15Result};
use crate::indicator::{Indicator, ScenarioContext};
use crate::meta::{DefinitionTable, MetaTable, MetaValue};
use log::{debug, info, warn};
use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use petgraph::Graph;
use std::collections::HashMap;
use std::sync::Arc;

pub type I = Arc<dyn Indicator>;
type IGraph = Graph<I, String>;

/// Result of an assessment
#[derive(Debug, Clone, Default)]
pub struct Assessment {
    pub meta: MetaTable,
    pub tables: Vec<DefinitionTable>,
}

/// Short name of an indicator for log messages
fn indicator_name(indicator: &I) -> String {
    let name = format!("{:?}", indicator);
    name.split(['{', ' ', '('])
        .next()
        .unwrap_or("UnknownIndicator")
        .to_string()
}

/// An ordered set of indicators
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Indicators in declaration order, which defines the column order
    indicators: Vec<I>,
    /// Evaluation order
    order: Vec<usize>,
}

impl Pipeline {
    /// Order the indicators by their metadata dependencies
    ///
    /// Fails if two indicators write the same metadata or if the dependencies
    /// form a cycle. Metadata inputs that no indicator produces are expected to
    /// be present in the metadata table the pipeline is run with.
    pub fn new(indicators: Vec<I>) -> SR15Result<Self> {
        let mut graph: IGraph = Graph::new();
        let mut producers: HashMap<String, NodeIndex> = HashMap::new();

        let nodes: Vec<NodeIndex> = indicators
            .iter()
            .map(|indicator| graph.add_node(indicator.clone()))
            .collect();

        for (indicator, node) in indicators.iter().zip(&nodes) {
            for output in indicator.outputs() {
                if producers.insert(output.name.clone(), *node).is_some() {
                    return Err(SR15Error::DuplicateOutput(output.name));
                }
            }
        }

        for (indicator, node) in indicators.iter().zip(&nodes) {
            for input in indicator.meta_inputs() {
                match producers.get(&input) {
                    // Reading back its own output doesn't constrain the order
                    Some(producer) if producer == node => {}
                    Some(producer) => {
                        graph.add_edge(*producer, *node, input);
                    }
                    None => debug!(
                        "`{}` is not produced by any indicator and must be supplied",
                        input
                    ),
                }
            }
        }

        let sorted = toposort(&graph, None).map_err(|cycle| {
            SR15Error::DependencyCycle(indicator_name(&graph[cycle.node_id()]))
        })?;

        Ok(Self {
            order: sorted.iter().map(|node| node.index()).collect(),
            indicators,
        })
    }

    pub fn from_boxed(indicators: Vec<Box<dyn Indicator>>) -> SR15Result<Self> {
        Self::new(indicators.into_iter().map(Arc::from).collect())
    }

    pub fn indicators(&self) -> &[I] {
        &self.indicators
    }

    /// Indicators in the order they are evaluated
    pub fn evaluation_order(&self) -> impl Iterator<Item = &I> {
        self.order.iter().map(|idx| &self.indicators[*idx])
    }

    /// Evaluate all indicators for every scenario in `dataset`
    pub fn run(&self, dataset: &ScenarioDataset) -> Assessment {
        self.run_with_meta(dataset, MetaTable::new())
    }

    /// Evaluate all indicators, starting from existing metadata
    ///
    /// Existing values written by an indicator of this pipeline are overwritten.
    pub fn run_with_meta(&self, dataset: &ScenarioDataset, mut meta: MetaTable) -> Assessment {
        for id in dataset.scenarios() {
            meta.add_scenario(id);
        }
        for indicator in &self.indicators {
            for definition in indicator.outputs() {
                meta.declare(&definition);
            }
        }

        for indicator in self.evaluation_order() {
            let name = indicator_name(indicator);
            let mut failures = 0;

            for id in dataset.scenarios() {
                let result = indicator.evaluate(&ScenarioContext::new(id, dataset, &meta));
                match result {
                    Ok(output) => {
                        for (column, value) in output {
                            meta.set(id, &column, value);
                        }
                    }
                    Err(err) => {
                        if err.is_missing_data() {
                            debug!("{} skipped for {}: {}", name, id, err);
                        } else {
                            warn!("{} failed for {}: {}", name, id, err);
                            failures += 1;
                        }
                        for definition in indicator.outputs() {
                            meta.set(id, &definition.name, MetaValue::Missing);
                        }
                    }
                }
            }
            if failures > 0 {
                warn!("{} failed for {} scenario(s)", name, failures);
            }
        }

        for indicator in self.evaluation_order() {
            if let Err(err) = indicator.finalize(dataset, &meta) {
                warn!("Review by {} failed: {}", indicator_name(indicator), err);
            }
        }

        let tables = self
            .indicators
            .iter()
            .flat_map(|indicator| indicator.tables())
            .collect();

        info!(
            "Assessed {} scenario(s) with {} indicator(s)",
            dataset.len(),
            self.indicators.len()
        );
        Assessment { meta, tables }
    }
}
