//! Lists and plotting conventions shared with downstream analyses
//!
//! Written next to the metadata as `specs.toml`, with the keys of the yaml
//! specification file used by the plotting notebooks.
use crate::category::{Category, Subcategory};
use crate::markers::MarkerScenarios;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Mapping from a metadata column to a style per value, e.g. `category` to colours
pub type StyleMap = IndexMap<String, IndexMap<String, String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlottingArgs {
    /// Metadata column that determines the line colour
    pub color: String,
    pub linewidth: f64,
}

impl Default for PlottingArgs {
    fn default() -> Self {
        Self {
            color: "category".to_string(),
            linewidth: 0.2,
        }
    }
}

/// Styles of categories and markers for plotting libraries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunControl {
    pub color: StyleMap,
    pub marker: StyleMap,
    /// Fill colour of marker symbols
    pub c: StyleMap,
    pub edgecolors: StyleMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specs {
    pub cats: Vec<String>,
    pub all_cats: Vec<String>,
    pub subcats: Vec<String>,
    pub all_subcats: Vec<String>,
    pub cats_15: Vec<String>,
    pub cats_15_no_lo: Vec<String>,
    pub cats_2: Vec<String>,
    pub marker: Vec<String>,
    pub plotting_args: PlottingArgs,
    pub run_control: RunControl,
}

fn labels<T: ToString>(items: impl IntoIterator<Item = T>) -> Vec<String> {
    items.into_iter().map(|item| item.to_string()).collect()
}

impl Specs {
    pub fn new(markers: &MarkerScenarios) -> Self {
        let other_cats = [Category::NoClimateAssessment, Category::Reference];

        let mut run_control = RunControl::default();
        run_control.color.insert(
            "category".to_string(),
            Category::ASSESSED
                .iter()
                .map(|c| (c.to_string(), c.color().to_string()))
                .collect(),
        );
        run_control.color.insert(
            "subcategory".to_string(),
            Subcategory::ASSESSED
                .iter()
                .map(|s| (s.to_string(), s.color().to_string()))
                .collect(),
        );
        for marker in &markers.markers {
            let style = [
                (&mut run_control.marker, &marker.symbol),
                (&mut run_control.c, &marker.color),
                (&mut run_control.edgecolors, &marker.edge_color),
            ];
            for (map, value) in style {
                map.entry("marker".to_string())
                    .or_default()
                    .insert(marker.marker.clone(), value.clone());
            }
        }

        Self {
            cats: labels(Category::ASSESSED),
            all_cats: labels(Category::ASSESSED.into_iter().chain(other_cats)),
            subcats: labels(Subcategory::ASSESSED),
            all_subcats: labels(
                Subcategory::ASSESSED
                    .iter()
                    .map(ToString::to_string)
                    .chain(other_cats.iter().map(ToString::to_string)),
            ),
            cats_15: labels(Category::PATHWAYS_15),
            cats_15_no_lo: labels([Category::Below15, Category::LowOvershoot15]),
            cats_2: labels([Category::Lower2C, Category::Higher2C]),
            marker: markers.labels(),
            plotting_args: PlottingArgs::default(),
            run_control,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_lists() {
        let specs = Specs::new(&MarkerScenarios::default());
        assert_eq!(specs.cats.len(), 6);
        assert_eq!(specs.all_cats[6..], ["no-climate-assessment", "reference"]);
        assert_eq!(specs.all_subcats.len(), 11);
        assert_eq!(specs.cats_15_no_lo, vec!["Below 1.5C", "1.5C low overshoot"]);
        assert_eq!(specs.cats_2, vec!["Lower 2C", "Higher 2C"]);
        assert_eq!(specs.marker, vec!["S1", "S2", "S5", "LED"]);
    }

    #[test]
    fn run_control() {
        let specs = Specs::new(&MarkerScenarios::default());
        let rc = &specs.run_control;
        assert_eq!(rc.color["category"]["Below 1.5C"], "xkcd:baby blue");
        assert_eq!(rc.color["category"]["1.5C high overshoot"], "xkcd:darkish blue");
        assert_eq!(rc.color["subcategory"]["Above 2C"], "darkgrey");
        assert_eq!(rc.marker["marker"]["LED"], "o");
        assert_eq!(rc.c["marker"]["S2"], "yellow");
        assert_eq!(rc.edgecolors["marker"]["S5"], "black");
    }

    #[test]
    fn toml_round_trip() {
        let specs = Specs::new(&MarkerScenarios::default());
        let content = toml::to_string_pretty(&specs).unwrap();
        assert!(content.contains("linewidth = 0.2"));
        let restored: Specs = toml::from_str(&content).unwrap();
        assert_eq!(restored, specs);
    }
}
