//! Summary statistics of the 1.5°C pathways
//!
//! Characteristics of the pathways consistent with 1.5°C of warming, reported
//! as count, median, interquartile range and extremes for the pathways with no
//! or limited overshoot and for each illustrative pathway.
//!
//! Quantiles interpolate linearly between the two nearest ranks.

use crate::category::Category;
use crate::cumulative::cumulative;
use crate::validation::ValueRange;
use log::{debug, info};
use sr15_core::dataset::ScenarioDataset;
use sr15_core::meta::{DefinitionTable, MetaTable};
use sr15_core::scenario::ScenarioId;
use sr15_core::standard_variables::*;
use sr15_core::timeseries::{FloatValue, Year};

/// Count, median, interquartile range and extremes of a sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub median: FloatValue,
    pub q25: FloatValue,
    pub q75: FloatValue,
    pub min: FloatValue,
    pub max: FloatValue,
}

/// Quantile `q` of sorted values
fn quantile(sorted: &[FloatValue], q: FloatValue) -> FloatValue {
    let position = q * (sorted.len() - 1) as FloatValue;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as FloatValue)
}

/// Summarise the finite values of a sample, `None` if there are none
pub fn describe(values: &[FloatValue]) -> Option<Summary> {
    let mut sorted: Vec<FloatValue> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    Some(Summary {
        count: sorted.len(),
        median: quantile(&sorted, 0.5),
        q25: quantile(&sorted, 0.25),
        q75: quantile(&sorted, 0.75),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
    })
}

/// How a row derives one value per scenario
#[derive(Debug, Clone, PartialEq)]
pub enum Measure {
    /// Change relative to the base year in percent
    RelativeChange {
        variable: String,
        year: Year,
        /// Only use scenarios with valid Kyoto-GHG emissions in 2010
        in_range_only: bool,
    },
    /// Sum of the components as a percentage of the total
    Share {
        components: Vec<String>,
        total: String,
        year: Year,
    },
    Cumulative {
        variable: String,
        first_year: Year,
        last_year: Year,
        factor: FloatValue,
    },
    Value {
        variable: String,
        year: Year,
        factor: FloatValue,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub header: String,
    pub subheader: String,
    pub measure: Measure,
}

/// A named set of scenarios summarised together
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    pub scenarios: Vec<ScenarioId>,
}

#[derive(Debug, Clone)]
pub struct SummaryStatistics {
    pub base_year: Year,
    pub rows: Vec<SummaryRow>,
    /// Metadata column flagging valid Kyoto-GHG emissions
    pub range_column: String,
}

impl SummaryStatistics {
    /// Characteristics of the illustrative pathways
    pub fn illustrative_pathways(base_year: Year, compare_years: &[Year]) -> Self {
        let mut rows = vec![];
        let mut relative = |header: String, variable: &str, in_range_only: bool| {
            for year in compare_years {
                rows.push(SummaryRow {
                    header: header.clone(),
                    subheader: year.to_string(),
                    measure: Measure::RelativeChange {
                        variable: variable.to_string(),
                        year: *year,
                        in_range_only,
                    },
                });
            }
        };
        relative(
            format!("CO2 emission reduction (% relative to {})", base_year),
            VAR_CO2_EMISSIONS.name,
            true,
        );
        relative(
            format!("Kyoto-GHG emission reduction (SAR-GWP100), % relative to {})", base_year),
            VAR_KYOTO_EMISSIONS.name,
            true,
        );
        relative(
            format!("Final energy demand reduction relative to {} (%)", base_year),
            VAR_FINAL_ENERGY.name,
            false,
        );
        for (name, variable) in [
            ("coal", VAR_PRIMARY_ENERGY_COAL),
            ("oil", VAR_PRIMARY_ENERGY_OIL),
            ("gas", VAR_PRIMARY_ENERGY_GAS),
            ("nuclear", VAR_PRIMARY_ENERGY_NUCLEAR),
            ("bioenergy", VAR_PRIMARY_ENERGY_BIOMASS),
            ("non-biomass renewables", VAR_PRIMARY_ENERGY_NON_BIOMASS_RENEWABLES),
        ] {
            relative(
                format!("Primary energy from {} (% rel to {})", name, base_year),
                variable.name,
                false,
            );
        }
        for (species, variable) in [("CH4", VAR_CH4_AFOLU_EMISSIONS), ("N2O", VAR_N2O_AFOLU_EMISSIONS)] {
            relative(
                format!("Agricultural {} emissions (% rel to {})", species, base_year),
                variable.name,
                true,
            );
        }

        for year in compare_years {
            rows.push(SummaryRow {
                header: "Share of renewables in electricity (%)".to_string(),
                subheader: year.to_string(),
                measure: Measure::Share {
                    components: vec![
                        VAR_ELECTRICITY_BIOMASS.name.to_string(),
                        VAR_ELECTRICITY_NON_BIOMASS_RENEWABLES.name.to_string(),
                    ],
                    total: VAR_ELECTRICITY.name.to_string(),
                    year: *year,
                },
            });
        }
        for (name, variable) in [("CCS", VAR_CCS), ("BECCS", VAR_BECCS)] {
            rows.push(SummaryRow {
                header: format!("Cumulative {} until 2100 (GtCO2)", name),
                subheader: String::new(),
                measure: Measure::Cumulative {
                    variable: variable.name.to_string(),
                    first_year: 2016,
                    last_year: 2100,
                    factor: 0.001,
                },
            });
        }
        rows.push(SummaryRow {
            header: "Land area for energy crops (million km2)".to_string(),
            subheader: "2050".to_string(),
            measure: Measure::Value {
                variable: VAR_ENERGY_CROPS_LAND.name.to_string(),
                year: 2050,
                // million ha to million km2
                factor: 0.01,
            },
        });

        Self {
            base_year,
            rows,
            range_column: ValueRange::KYOTO_GHG_2010.to_string(),
        }
    }

    fn measure(
        &self,
        measure: &Measure,
        id: &ScenarioId,
        dataset: &ScenarioDataset,
        meta: &MetaTable,
    ) -> Option<FloatValue> {
        match measure {
            Measure::RelativeChange {
                variable,
                year,
                in_range_only,
            } => {
                if *in_range_only
                    && meta.get_text(id, &self.range_column) != Some(ValueRange::IN_RANGE)
                {
                    return None;
                }
                let ts = dataset.get(id, variable)?;
                let base = ts.at(self.base_year)?;
                Some((ts.at(*year)? / base - 1.0) * 100.0)
            }
            Measure::Share {
                components,
                total,
                year,
            } => {
                let component = components
                    .iter()
                    .map(|v| dataset.get(id, v).and_then(|ts| ts.at(*year)))
                    .sum::<Option<FloatValue>>()?;
                Some(component / dataset.get(id, total)?.at(*year)? * 100.0)
            }
            Measure::Cumulative {
                variable,
                first_year,
                last_year,
                factor,
            } => {
                let ts = dataset.get(id, variable)?;
                cumulative(ts, *first_year, *last_year)
                    .map(|total| total * factor)
                    .map_err(|e| debug!("{}: {}", id, e))
                    .ok()
            }
            Measure::Value {
                variable,
                year,
                factor,
            } => dataset
                .get(id, variable)
                .and_then(|ts| ts.at(*year))
                .map(|v| v * factor),
        }
    }

    /// Groups of the summary: all pathways with no or low overshoot and each marker
    pub fn groups(meta: &MetaTable, markers: &[String]) -> Vec<Group> {
        let no_lo = [Category::Below15.label(), Category::LowOvershoot15.label()];
        let mut groups = vec![Group {
            name: "no & lo os 1.5".to_string(),
            scenarios: meta.scenarios_with("category", &no_lo).into_iter().cloned().collect(),
        }];
        for marker in markers {
            groups.push(Group {
                name: marker.clone(),
                scenarios: meta
                    .scenarios_with("marker", &[marker.as_str()])
                    .into_iter()
                    .cloned()
                    .collect(),
            });
        }
        groups
    }

    /// Summarise all rows for the 1.5°C pathways of each group
    pub fn summarize(
        &self,
        dataset: &ScenarioDataset,
        meta: &MetaTable,
        markers: &[String],
    ) -> DefinitionTable {
        let pathways_15 = Category::PATHWAYS_15.map(|c| c.label());
        let population = meta.scenarios_with("category", &pathways_15);
        let groups = Self::groups(meta, markers);

        let mut table = DefinitionTable::new(
            "figure3b_summary",
            &["Header", "Subheader", "Group", "count", "median", "25%", "75%", "min", "max"],
        );
        for row in &self.rows {
            for group in &groups {
                let values: Vec<FloatValue> = group
                    .scenarios
                    .iter()
                    .filter(|id| population.contains(id))
                    .filter_map(|id| self.measure(&row.measure, id, dataset, meta))
                    .collect();
                let mut cells = vec![row.header.clone(), row.subheader.clone(), group.name.clone()];
                match describe(&values) {
                    Some(s) => {
                        cells.push(s.count.to_string());
                        cells.extend(
                            [s.median, s.q25, s.q75, s.min, s.max].map(|v| format!("{:.0}", v)),
                        );
                    }
                    None => {
                        cells.push("0".to_string());
                        cells.extend(std::iter::repeat(String::new()).take(5));
                    }
                }
                table.push_row(&cells);
            }
        }
        info!(
            "Summarised {} pathways in {} groups",
            population.len(),
            groups.len()
        );
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;
    use sr15_core::meta::MetaValue;
    use sr15_core::timeseries::Timeseries;

    #[test]
    fn quantiles_interpolate() {
        let summary = describe(&[4.0, 1.0, 3.0, 2.0, FloatValue::NAN]).unwrap();
        assert_eq!(summary.count, 4);
        assert!(is_close!(summary.median, 2.5));
        assert!(is_close!(summary.q25, 1.75));
        assert!(is_close!(summary.q75, 3.25));
        assert_eq!((summary.min, summary.max), (1.0, 4.0));
        assert_eq!(describe(&[]), None);
    }

    #[test]
    fn single_value() {
        let summary = describe(&[-42.0]).unwrap();
        assert_eq!(summary.median, -42.0);
        assert_eq!(summary.q25, -42.0);
    }

    fn assessment() -> (ScenarioDataset, MetaTable) {
        let mut ds = ScenarioDataset::new();
        let mut meta = MetaTable::new();
        let scenarios = [
            ("A", "low", "Below 1.5C", "S1", 20.0),
            ("B", "overshoot", "1.5C low overshoot", "", 12.0),
            ("C", "high", "1.5C high overshoot", "", 5.0),
            ("D", "warm", "Above 2C", "", 40.0),
        ];
        for (model, scenario, category, marker, co2_2030) in scenarios {
            let id = ScenarioId::new(model, scenario);
            ds.insert(
                id.clone(),
                VAR_CO2_EMISSIONS.name,
                Timeseries::from_pairs(&[(2010, 40.0), (2030, co2_2030), (2050, 0.0)], "Gt CO2/yr")
                    .unwrap(),
            );
            meta.set(&id, "category", MetaValue::from(category));
            meta.set(&id, "marker", MetaValue::from(marker));
            meta.set(&id, "Kyoto-GHG|2010 (SAR)", MetaValue::from("in range"));
        }
        (ds, meta)
    }

    #[test]
    fn relative_change() {
        let (ds, meta) = assessment();
        let statistics = SummaryStatistics::illustrative_pathways(2010, &[2030, 2050]);
        let table = statistics.summarize(&ds, &meta, &["S1".to_string()]);

        let co2_2030: Vec<_> = table
            .rows
            .iter()
            .filter(|r| r[0] == "CO2 emission reduction (% relative to 2010)" && r[1] == "2030")
            .collect();
        assert_eq!(co2_2030.len(), 2);
        // -50% and -70%, the high-overshoot and 2C pathways are excluded
        assert_eq!(co2_2030[0][2..], ["no & lo os 1.5", "2", "-60", "-65", "-55", "-70", "-50"]);
        assert_eq!(co2_2030[1][2..5], ["S1", "1", "-50"]);
    }

    #[test]
    fn invalid_kyoto_emissions_are_excluded() {
        let (ds, mut meta) = assessment();
        meta.set(&ScenarioId::new("A", "low"), "Kyoto-GHG|2010 (SAR)", MetaValue::from("exclude"));
        let statistics = SummaryStatistics::illustrative_pathways(2010, &[2030]);
        let table = statistics.summarize(&ds, &meta, &["S1".to_string()]);
        let s1 = table
            .rows
            .iter()
            .find(|r| r[0].starts_with("CO2 emission") && r[2] == "S1")
            .unwrap();
        assert_eq!(s1[3], "0");
        assert_eq!(s1[4], "");
    }

    #[test]
    fn share_requires_all_components() {
        let id = ScenarioId::new("A", "low");
        let mut ds = ScenarioDataset::new();
        let series = |v: FloatValue| Timeseries::from_pairs(&[(2030, v)], "EJ/yr").unwrap();
        ds.insert(id.clone(), VAR_ELECTRICITY.name, series(100.0));
        ds.insert(id.clone(), VAR_ELECTRICITY_BIOMASS.name, series(5.0));
        let statistics = SummaryStatistics::illustrative_pathways(2010, &[2030]);
        let measure = Measure::Share {
            components: vec![
                VAR_ELECTRICITY_BIOMASS.name.to_string(),
                VAR_ELECTRICITY_NON_BIOMASS_RENEWABLES.name.to_string(),
            ],
            total: VAR_ELECTRICITY.name.to_string(),
            year: 2030,
        };
        let meta = MetaTable::new();
        assert_eq!(statistics.measure(&measure, &id, &ds, &meta), None);

        ds.insert(id.clone(), VAR_ELECTRICITY_NON_BIOMASS_RENEWABLES.name, series(60.0));
        let share = statistics.measure(&measure, &id, &ds, &meta).unwrap();
        assert!(is_close!(share, 65.0));
    }
}
