//! Carbon price indicators
//!
//! Carbon prices are reported in selected years, as net-present values (NPV)
//! in the same years, and averaged over a window using three conventions:
//!
//! - `Avg NPV`: cumulative sum of the discounted prices divided by the number of years
//! - `AC NPV`: annually compounded NPV, see [`Compounding::Annual`]
//! - `CC NPV`: continuously compounded NPV, see [`Compounding::Continuous`]
//!
//! All NPVs are discounted to a common year before averaging.

use crate::cumulative::cumulative;
use crate::npv::{discount, npv_weighted, Compounding, WeightCache};
use log::debug;
use serde::{Deserialize, Serialize};
use sr15_core::errors::SR15Result;
use sr15_core::indicator::{Indicator, IndicatorOutput, RequirementDefinition, ScenarioContext};
use sr15_core::meta::{DefinitionTable, MetaValue};
use sr15_core::standard_variables::VAR_CARBON_PRICE;
use sr15_core::timeseries::{FloatValue, Timeseries, Year};
use std::sync::Mutex;

#[derive(Debug, Serialize, Deserialize)]
pub struct CarbonPrice {
    pub variable: String,
    /// Annual discount rate
    pub rate: FloatValue,
    pub discount_year: Year,
    /// First year of the NPV window
    pub first_year: Year,
    /// Last year of the NPV window (inclusive)
    pub last_year: Year,
    /// Years in which the price is reported individually
    pub years: Vec<Year>,
    /// Years of the reported prices used for all indicators
    pub sampled_years: Vec<Year>,
    #[serde(skip)]
    cache: Mutex<WeightCache>,
}

impl Default for CarbonPrice {
    fn default() -> Self {
        Self::new(0.05, 2020, 2030, 2100)
    }
}

impl CarbonPrice {
    pub fn new(rate: FloatValue, discount_year: Year, first_year: Year, last_year: Year) -> Self {
        Self {
            variable: VAR_CARBON_PRICE.name.to_string(),
            rate,
            discount_year,
            first_year,
            last_year,
            years: vec![2030, 2050, 2100],
            sampled_years: (2020..=2100).step_by(10).collect(),
            cache: Mutex::new(WeightCache::new()),
        }
    }

    fn window(&self) -> String {
        format!("{}-{}", self.first_year, self.last_year)
    }

    fn window_years(&self) -> Year {
        self.last_year - self.first_year + 1
    }

    pub fn price_name(year: Year) -> String {
        format!("carbon price|{}", year)
    }

    pub fn price_npv_name(year: Year) -> String {
        format!("carbon price|{} (NPV)", year)
    }

    pub fn average_name(&self) -> String {
        format!("carbon price|Avg NPV ({})", self.window())
    }

    pub fn compounded_name(&self, compounding: Compounding) -> String {
        let acronym = match compounding {
            Compounding::Annual => "AC",
            Compounding::Continuous => "CC",
        };
        format!("carbon price|{} NPV ({})", acronym, self.window())
    }

    fn discount_docs(&self) -> String {
        format!(
            " from {} until {} including the last year, discounted to {} using a {}% discount rate",
            self.first_year,
            self.last_year,
            self.discount_year,
            self.rate * 100.0
        )
    }

    fn npv(&self, npv: &Timeseries, compounding: Compounding) -> Option<FloatValue> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        npv_weighted(
            npv,
            self.first_year,
            self.last_year,
            self.rate,
            compounding,
            &mut cache,
        )
        .map_err(|e| debug!("{}", e))
        .ok()
    }
}

#[typetag::serde]
impl Indicator for CarbonPrice {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions = vec![RequirementDefinition::variable(
            &self.variable,
            VAR_CARBON_PRICE.unit,
        )];
        for year in &self.years {
            definitions.push(RequirementDefinition::meta_output(
                &Self::price_name(*year),
                &format!("carbon price in {} (2010USD/tCO2)", year),
            ));
            definitions.push(RequirementDefinition::meta_output(
                &Self::price_npv_name(*year),
                &format!(
                    "net-present value of carbon price in {} (2010USD/tCO2), discounted to {}",
                    year, self.discount_year
                ),
            ));
        }
        definitions.push(RequirementDefinition::meta_output(
            &self.average_name(),
            &format!(
                "average net-present value of carbon prices (2010USD/tCO2){}",
                self.discount_docs()
            ),
        ));
        definitions.push(RequirementDefinition::meta_output(
            &self.compounded_name(Compounding::Annual),
            &format!(
                "annually compounded net-present value of carbon prices (2010USD/tCO2){}",
                self.discount_docs()
            ),
        ));
        definitions.push(RequirementDefinition::meta_output(
            &self.compounded_name(Compounding::Continuous),
            &format!(
                "continuously compounded net-present value of carbon prices (2010USD/tCO2){}",
                self.discount_docs()
            ),
        ));
        definitions
    }

    fn evaluate(&self, ctx: &ScenarioContext) -> SR15Result<IndicatorOutput> {
        let price = ctx
            .timeseries(&self.variable)?
            .select_years(&self.sampled_years);
        let npv = discount(&price, self.rate, self.discount_year);

        let mut output = IndicatorOutput::new();
        for year in &self.years {
            output.insert(Self::price_name(*year), MetaValue::from(price.at(*year)));
            output.insert(Self::price_npv_name(*year), MetaValue::from(npv.at(*year)));
        }

        let average = cumulative(&npv, self.first_year, self.last_year)
            .map(|total| total / self.window_years() as FloatValue)
            .map_err(|e| debug!("{}", e))
            .ok();
        output.insert(self.average_name(), MetaValue::from(average));
        for compounding in [Compounding::Annual, Compounding::Continuous] {
            output.insert(
                self.compounded_name(compounding),
                MetaValue::from(self.npv(&npv, compounding)),
            );
        }
        Ok(output)
    }

    fn tables(&self) -> Vec<DefinitionTable> {
        let mut table = DefinitionTable::new("carbon_price", &["Indicator type", "Description"]);
        let averaged = |kind: &str| {
            format!(
                "{} carbon price from {} until {} divided by number of years ({})",
                kind,
                self.first_year,
                self.last_year,
                self.window_years()
            )
        };
        table.push_row(&["Price by year", "Global carbon price as reported by each scenario"]);
        table.push_row(&[
            "Price by year (as NPV)".to_string(),
            format!(
                "Global carbon price as reported by each scenario discounted to {} NPV",
                self.discount_year
            ),
        ]);
        table.push_row(&["Average (Avg) NPV".to_string(), averaged("Cumulative NPV")]);
        table.push_row(&["Annual compounded (AC) NPV".to_string(), averaged("Annual compounded NPV")]);
        table.push_row(&[
            "Continuously compounded (CC) NPV".to_string(),
            averaged("Continuously compounded NPV"),
        ]);
        table.push_row(&["", ""]);
        table.push_row(&[
            "Note on NPV".to_string(),
            format!(
                "All NPV indicators are discounted to {} using a {}% discount rate",
                self.discount_year,
                self.rate * 100.0
            ),
        ]);
        vec![table]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;
    use sr15_core::dataset::ScenarioDataset;
    use sr15_core::meta::MetaTable;
    use sr15_core::scenario::ScenarioId;

    fn context_data(pairs: &[(Year, FloatValue)]) -> (ScenarioDataset, MetaTable, ScenarioId) {
        let id = ScenarioId::new("MESSAGE-GLOBIOM 1.0", "SSP2-19");
        let mut ds = ScenarioDataset::new();
        ds.insert(
            id.clone(),
            VAR_CARBON_PRICE.name,
            Timeseries::from_pairs(pairs, VAR_CARBON_PRICE.unit).unwrap(),
        );
        (ds, MetaTable::new(), id)
    }

    #[test]
    fn names() {
        let indicator = CarbonPrice::default();
        assert_eq!(indicator.average_name(), "carbon price|Avg NPV (2030-2100)");
        assert_eq!(
            indicator.compounded_name(Compounding::Annual),
            "carbon price|AC NPV (2030-2100)"
        );
        assert_eq!(
            indicator.compounded_name(Compounding::Continuous),
            "carbon price|CC NPV (2030-2100)"
        );
        // three years reported raw and as NPV, plus three averages
        assert_eq!(indicator.outputs().len(), 9);
    }

    #[test]
    fn rising_price() {
        let pairs: Vec<(Year, FloatValue)> = (2020..=2100)
            .step_by(10)
            .map(|y| (y, 10.0 * 1.05f64.powi(y - 2020)))
            .collect();
        let (ds, meta, id) = context_data(&pairs);
        let indicator = CarbonPrice::default();
        let output = indicator.evaluate(&ScenarioContext::new(&id, &ds, &meta)).unwrap();

        assert!(is_close!(
            output["carbon price|2050"].as_float().unwrap(),
            10.0 * 1.05f64.powi(30)
        ));
        // growing at the discount rate gives a constant NPV
        for year in [2030, 2050, 2100] {
            let name = CarbonPrice::price_npv_name(year);
            assert!(is_close!(output[&name].as_float().unwrap(), 10.0));
        }
        assert!(is_close!(
            output["carbon price|Avg NPV (2030-2100)"].as_float().unwrap(),
            10.0
        ));
        assert!(output["carbon price|AC NPV (2030-2100)"].as_float().is_some());
        assert!(output["carbon price|CC NPV (2030-2100)"].as_float().is_some());
    }

    #[test]
    fn only_sampled_years_are_used() {
        // a spike in an off-decade year is ignored
        let (ds, meta, id) = context_data(&[(2020, 10.0), (2025, 1000.0), (2030, 10.0), (2100, 10.0)]);
        let indicator = CarbonPrice::new(0.0, 2020, 2020, 2100);
        let output = indicator.evaluate(&ScenarioContext::new(&id, &ds, &meta)).unwrap();
        assert!(is_close!(
            output["carbon price|Avg NPV (2020-2100)"].as_float().unwrap(),
            10.0
        ));
        assert!(is_close!(
            output["carbon price|CC NPV (2020-2100)"].as_float().unwrap(),
            10.0
        ));
    }

    #[test]
    fn short_series_leaves_averages_missing() {
        let (ds, meta, id) = context_data(&[(2020, 10.0), (2030, 20.0), (2050, 40.0)]);
        let indicator = CarbonPrice::default();
        let output = indicator.evaluate(&ScenarioContext::new(&id, &ds, &meta)).unwrap();
        assert_eq!(output["carbon price|2030"], MetaValue::Float(20.0));
        assert_eq!(output["carbon price|2100"], MetaValue::Missing);
        assert_eq!(output["carbon price|Avg NPV (2030-2100)"], MetaValue::Missing);
        assert_eq!(output["carbon price|AC NPV (2030-2100)"], MetaValue::Missing);
    }

    #[test]
    fn documentation_table() {
        let tables = CarbonPrice::default().tables();
        assert_eq!(tables[0].name, "carbon_price");
        assert_eq!(tables[0].rows.len(), 7);
        assert_eq!(
            tables[0].rows[2][1],
            "Cumulative NPV carbon price from 2030 until 2100 divided by number of years (71)"
        );
        assert_eq!(
            tables[0].rows[6][1],
            "All NPV indicators are discounted to 2020 using a 5% discount rate"
        );
    }

    #[test]
    fn cache_is_not_serialised() {
        let indicator: Box<dyn Indicator> = Box::new(CarbonPrice::default());
        let serialised = serde_json::to_string(&indicator).unwrap();
        assert!(!serialised.contains("cache"));
        let restored: Box<dyn Indicator> = serde_json::from_str(&serialised).unwrap();
        assert_eq!(restored.outputs().len(), 9);
    }
}
