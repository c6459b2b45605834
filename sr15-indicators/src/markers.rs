//! Illustrative pathways (marker scenarios)
use serde::{Deserialize, Serialize};
use sr15_core::errors::SR15Result;
use sr15_core::indicator::{Indicator, IndicatorOutput, RequirementDefinition, ScenarioContext};
use sr15_core::meta::{DefinitionTable, MetaValue};
use sr15_core::scenario::ScenarioId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub marker: String,
    pub model: String,
    pub scenario: String,
    pub reference: String,
    /// Symbol as a matplotlib marker style, e.g. `s` for a square
    pub symbol: String,
    /// Fill colour of the symbol
    pub color: String,
    #[serde(default = "default_edge_color")]
    pub edge_color: String,
}

fn default_edge_color() -> String {
    "black".to_string()
}

impl Marker {
    pub fn new(marker: &str, model: &str, scenario: &str, reference: &str, symbol: &str, color: &str) -> Self {
        Self {
            marker: marker.to_string(),
            model: model.to_string(),
            scenario: scenario.to_string(),
            reference: reference.to_string(),
            symbol: symbol.to_string(),
            color: color.to_string(),
            edge_color: default_edge_color(),
        }
    }

    pub fn id(&self) -> ScenarioId {
        ScenarioId::new(&self.model, &self.scenario)
    }

    fn symbol_name(&self) -> String {
        let shape = match self.symbol.as_str() {
            "s" => "square",
            "o" => "circle",
            "^" => "triangle",
            "D" => "diamond",
            other => other,
        };
        format!("{} {}", self.color, shape)
    }
}

/// Assigns the `marker` metadata to the illustrative pathways
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerScenarios {
    pub markers: Vec<Marker>,
}

impl Default for MarkerScenarios {
    fn default() -> Self {
        Self {
            markers: vec![
                Marker::new("S1", "AIM/CGE 2.0", "SSP1-19", "Fujimori et al., 2017", "s", "white"),
                Marker::new("S2", "MESSAGE-GLOBIOM 1.0", "SSP2-19", "Fricko et al., 2017", "s", "yellow"),
                Marker::new("S5", "REMIND-MAgPIE 1.5", "SSP5-19", "Kriegler et al., 2017", "s", "black"),
                Marker::new(
                    "LED",
                    "MESSAGEix-GLOBIOM 1.0",
                    "LowEnergyDemand",
                    "Grubler et al., 2018",
                    "o",
                    "white",
                ),
            ],
        }
    }
}

impl MarkerScenarios {
    pub fn labels(&self) -> Vec<String> {
        self.markers.iter().map(|m| m.marker.clone()).collect()
    }
}

#[typetag::serde]
impl Indicator for MarkerScenarios {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![RequirementDefinition::meta_output(
            "marker",
            "Illustrative pathways (marker scenarios)",
        )]
    }

    fn evaluate(&self, ctx: &ScenarioContext) -> SR15Result<IndicatorOutput> {
        let marker = self
            .markers
            .iter()
            .find(|m| m.id() == *ctx.id)
            .map_or("", |m| m.marker.as_str());
        Ok(IndicatorOutput::from([(
            "marker".to_string(),
            MetaValue::from(marker),
        )]))
    }

    fn tables(&self) -> Vec<DefinitionTable> {
        let mut table = DefinitionTable::new(
            "marker scenarios",
            &["Marker", "Model and scenario name", "Reference", "Symbol"],
        );
        for marker in &self.markers {
            table.push_row(&[
                marker.marker.clone(),
                marker.id().to_string(),
                marker.reference.clone(),
                marker.symbol_name(),
            ]);
        }
        vec![table]
    }
}
