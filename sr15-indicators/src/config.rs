//! Assessment configuration
//!
//! All settings have defaults matching the SR1.5 assessment, so a partial TOML
//! file only needs to name what differs:
//!
//! ```toml
//! region = "World"
//!
//! [carbon_price]
//! rate = 0.03
//! ```
//!
//! The indicators are derived from these settings unless an explicit list is
//! given under `[[indicators]]`. `sr15-assess dump-config` writes the full list
//! as a starting point.

use crate::baseline::Baseline;
use crate::carbon_price::CarbonPrice;
use crate::category::Categorization;
use crate::cumulative::{Boundary, CumulativeIndicator};
use crate::exceedance::Exceedance;
use crate::markers::{Marker, MarkerScenarios};
use crate::net_zero::NetZeroYear;
use crate::overshoot::OvershootSeverity;
use crate::peak_warming::PeakWarming;
use crate::references::ScientificReferences;
use crate::validation::{RequiredVariable, ValueRange};
use crate::values::{MinimumValue, ValueInYear};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use sr15_core::errors::{SR15Error, SR15Result};
use sr15_core::indicator::Indicator;
use sr15_core::pipeline::Pipeline;
use sr15_core::standard_variables::{
    VAR_BECCS, VAR_CCS, VAR_CO2_EMISSIONS, VAR_FINAL_ENERGY, VAR_LAND_USE_SEQUESTRATION,
    VAR_MAGICC6_MEDIAN_TEMPERATURE,
};
use sr15_core::timeseries::{FloatValue, Year};
use std::path::Path;

/// Settings of the carbon price indicators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarbonPriceConfig {
    /// Annual discount rate.
    ///
    /// Default: 0.05
    pub rate: FloatValue,
    /// Year all net-present values are discounted to.
    ///
    /// Default: 2020
    pub discount_year: Year,
    /// First year of the averaging window.
    ///
    /// Default: 2030
    pub first_year: Year,
    /// Last year of the averaging window, included in the average.
    ///
    /// Default: 2100
    pub last_year: Year,
    /// Years in which prices are reported individually.
    pub years: Vec<Year>,
    /// Years of the reported prices used by all indicators.
    ///
    /// Default: every decade from 2020 until 2100
    pub sampled_years: Vec<Year>,
}

impl Default for CarbonPriceConfig {
    fn default() -> Self {
        let reference = CarbonPrice::default();
        Self {
            rate: reference.rate,
            discount_year: reference.discount_year,
            first_year: reference.first_year,
            last_year: reference.last_year,
            years: reference.years.clone(),
            sampled_years: reference.sampled_years.clone(),
        }
    }
}

impl CarbonPriceConfig {
    pub fn indicator(&self) -> CarbonPrice {
        let mut indicator =
            CarbonPrice::new(self.rate, self.discount_year, self.first_year, self.last_year);
        indicator.years = self.years.clone();
        indicator.sampled_years = self.sampled_years.clone();
        indicator
    }
}

/// Range of the summary statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Year that changes are reported relative to.
    ///
    /// Default: 2010
    pub base_year: Year,
    /// Default: 2030 and 2050
    pub compare_years: Vec<Year>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            base_year: 2010,
            compare_years: vec![2030, 2050],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentConfig {
    /// Region of the scenario data that is assessed.
    ///
    /// Default: `World`
    pub region: String,
    /// First year of the cumulative indicators.
    ///
    /// Default: 2016
    pub base_year: Year,
    /// Last year of the cumulative indicators.
    ///
    /// Default: 2100
    pub last_year: Year,
    /// Conversion of emissions before cumulating, Mt CO2 to Gt CO2 by default
    pub unit_factor: FloatValue,
    /// Unit after applying `unit_factor`
    pub unit: String,
    /// Model name of the historical reference data.
    ///
    /// Default: `Reference`
    pub reference_model: String,
    /// Valid range of Kyoto-GHG emissions in 2010 (Mt CO2-equiv/yr).
    ///
    /// Default: 44500 to 53500
    pub kyoto_ghg_2010: (FloatValue, FloatValue),
    pub carbon_price: CarbonPriceConfig,
    pub summary: SummaryConfig,
    pub markers: Vec<Marker>,
    /// Explicit list of indicators replacing the ones derived from the settings above
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicators: Option<Vec<Box<dyn Indicator>>>,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            region: "World".to_string(),
            base_year: 2016,
            last_year: 2100,
            unit_factor: 0.001,
            unit: "Gt CO2".to_string(),
            reference_model: "Reference".to_string(),
            kyoto_ghg_2010: (44500.0, 53500.0),
            carbon_price: CarbonPriceConfig::default(),
            summary: SummaryConfig::default(),
            markers: MarkerScenarios::default().markers,
            indicators: None,
        }
    }
}

impl AssessmentConfig {
    pub fn from_toml(content: &str) -> SR15Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> SR15Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SR15Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn to_toml(&self) -> SR15Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn marker_scenarios(&self) -> MarkerScenarios {
        MarkerScenarios {
            markers: self.markers.clone(),
        }
    }

    fn window(&self) -> String {
        format!("{}-{}", self.base_year, self.last_year)
    }

    fn cumulative(&self, name: &str, description: &str, variable: &str) -> CumulativeIndicator {
        CumulativeIndicator {
            name: format!("cumulative {} ({}, {})", name, self.window(), self.unit),
            description: format!(
                "Cumulative {} from {} until {} (including the last year, {})",
                description, self.base_year, self.last_year, self.unit
            ),
            variable: variable.to_string(),
            unit: self.unit.clone(),
            factor: self.unit_factor,
            first_year: self.base_year,
            last_year: Boundary::Year(self.last_year),
            zero_if_zero: None,
        }
    }

    /// Indicators of the assessment in the order their columns are exported
    ///
    /// `references` are placed after the marker scenarios if given.
    pub fn default_indicators(
        &self,
        references: Option<ScientificReferences>,
    ) -> Vec<Box<dyn Indicator>> {
        let peak_warming = PeakWarming::magicc6();
        let peak_year = peak_warming.year_name();
        let net_zero = NetZeroYear::default();
        let net_zero_year = net_zero.name.clone();
        let rate_unit = format!("{}/yr", self.unit);
        let (lower, upper) = self.kyoto_ghg_2010;

        let mut indicators: Vec<Box<dyn Indicator>> = vec![
            Box::new(RequiredVariable {
                exclude_models: vec![self.reference_model.clone()],
                ..RequiredVariable::default()
            }),
            Box::new(Categorization {
                reference_model: self.reference_model.clone(),
                ..Categorization::default()
            }),
            Box::new(ValueRange::kyoto_ghg_2010(lower, upper)),
            Box::new(Baseline::default()),
            Box::new(self.marker_scenarios()),
        ];
        if let Some(references) = references {
            indicators.push(Box::new(references));
        }

        let ccs = self.cumulative("CCS", "carbon capture and sequestration", VAR_CCS.name);
        let beccs = CumulativeIndicator {
            zero_if_zero: Some(ccs.name.clone()),
            ..self.cumulative(
                "BECCS",
                "carbon capture and sequestration from bioenergy",
                VAR_BECCS.name,
            )
        };
        let climate: Vec<Box<dyn Indicator>> = vec![
            Box::new(peak_warming),
            Box::new(PeakWarming::fair()),
            Box::new(Exceedance::new(1.5)),
            Box::new(OvershootSeverity::new(1.5)),
            Box::new(Exceedance::new(2.0)),
            Box::new(MinimumValue {
                name: format!("minimum net CO2 emissions ({})", rate_unit),
                description: format!(
                    "Minimum of net CO2 emissions over the century ({})",
                    rate_unit
                ),
                variable: VAR_CO2_EMISSIONS.name.to_string(),
                unit: rate_unit.clone(),
                factor: self.unit_factor,
            }),
            Box::new(self.cumulative("CO2 emissions", "net CO2 emissions", VAR_CO2_EMISSIONS.name)),
            Box::new(ccs),
            Box::new(beccs),
            Box::new(self.cumulative(
                "sequestration land-use",
                "carbon sequestration from land use",
                VAR_LAND_USE_SEQUESTRATION.name,
            )),
            Box::new(CumulativeIndicator {
                name: format!(
                    "cumulative CO2 emissions ({} to peak warming, {})",
                    self.base_year, self.unit
                ),
                description: format!(
                    "cumulative net CO2 emissions from {} until the year of peak warming as computed by MAGICC6 (including the year of peak warming, {})",
                    self.base_year, self.unit
                ),
                last_year: Boundary::Meta(peak_year),
                ..self.cumulative("", "", VAR_CO2_EMISSIONS.name)
            }),
            Box::new(net_zero),
            Box::new(CumulativeIndicator {
                name: format!(
                    "cumulative CO2 emissions ({} to netzero, {})",
                    self.base_year, self.unit
                ),
                description: format!(
                    "net CO2 emissions from {} until the year of net-zero CO2 emissions (including the last year, {})",
                    self.base_year, self.unit
                ),
                last_year: Boundary::Meta(net_zero_year.clone()),
                ..self.cumulative("", "", VAR_CO2_EMISSIONS.name)
            }),
            Box::new(ValueInYear {
                name: "warming at netzero (MAGICC6)".to_string(),
                description: "median warming above pre-industrial temperatures in the year of net-zero CO2 emission (MAGICC, °C)".to_string(),
                variable: VAR_MAGICC6_MEDIAN_TEMPERATURE.name.to_string(),
                year: Boundary::Meta(net_zero_year),
                interpolate: true,
            }),
            Box::new(ValueInYear {
                name: "final energy|2100".to_string(),
                description: "Final energy demand at the end of the century (EJ/yr)".to_string(),
                variable: VAR_FINAL_ENERGY.name.to_string(),
                year: Boundary::Year(2100),
                interpolate: false,
            }),
            Box::new(self.carbon_price.indicator()),
        ];
        indicators.extend(climate);
        indicators
    }

    /// Pipeline of the explicit indicators, or of the default ones
    ///
    /// `references` are added to an explicit list unless it already produces
    /// the `reference` metadata.
    pub fn into_pipeline(self, references: Option<ScientificReferences>) -> SR15Result<Pipeline> {
        let indicators = match self.indicators {
            Some(mut indicators) => {
                if let Some(references) = references {
                    let has_references = indicators
                        .iter()
                        .any(|i| i.outputs().iter().any(|o| o.name == "reference"));
                    if has_references {
                        warn!("Configured indicators already assign references, ignoring the reference table");
                    } else {
                        indicators.push(Box::new(references));
                    }
                }
                info!("Using {} configured indicators", indicators.len());
                indicators
            }
            None => self.default_indicators(references),
        };
        Pipeline::from_boxed(indicators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(indicators: &[Box<dyn Indicator>]) -> Vec<String> {
        indicators
            .iter()
            .flat_map(|i| i.outputs())
            .map(|d| d.name)
            .collect()
    }

    #[test]
    fn partial_config() {
        let config = AssessmentConfig::from_toml(
            r#"
            region = "R5ASIA"

            [carbon_price]
            rate = 0.03
            "#,
        )
        .unwrap();
        assert_eq!(config.region, "R5ASIA");
        assert_eq!(config.carbon_price.rate, 0.03);
        assert_eq!(config.carbon_price.discount_year, 2020);
        assert_eq!(config.kyoto_ghg_2010, (44500.0, 53500.0));
        assert_eq!(config.markers.len(), 4);
        assert!(config.indicators.is_none());
    }

    #[test]
    fn invalid_config() {
        assert!(AssessmentConfig::from_toml("base_year = \"soon\"").is_err());
    }

    #[test]
    fn column_order() {
        let config = AssessmentConfig::default();
        let names = names(&config.default_indicators(None));
        let position = |name: &str| {
            names
                .iter()
                .position(|n| n == name)
                .unwrap_or_else(|| panic!("{} not found", name))
        };
        assert_eq!(names[0], "category");
        assert!(position("marker") < position("median warming at peak (MAGICC6)"));
        assert!(position("median warming at peak (MAGICC6)") < position("median warming at peak (FAIR)"));
        assert!(position("exceedance year|1.5°C") < position("exceedance severity|1.5°C"));
        assert!(
            position("cumulative CO2 emissions (2016 to peak warming, Gt CO2)")
                < position("year of netzero CO2 emissions")
        );
        assert!(
            position("year of netzero CO2 emissions")
                < position("cumulative CO2 emissions (2016 to netzero, Gt CO2)")
        );
        assert_eq!(names[names.len() - 1], "carbon price|CC NPV (2030-2100)");
        assert!(names.contains(&"cumulative BECCS (2016-2100, Gt CO2)".to_string()));
        assert!(names.contains(&"minimum net CO2 emissions (Gt CO2/yr)".to_string()));
    }

    #[test]
    fn references_follow_markers() {
        let config = AssessmentConfig::default();
        let names = names(&config.default_indicators(Some(ScientificReferences::default())));
        let marker = names.iter().position(|n| n == "marker").unwrap();
        assert_eq!(names[marker + 1], "reference");
        assert_eq!(names[marker + 2], "project");
    }

    #[test]
    fn explicit_indicators_keep_their_references() {
        let mut config = AssessmentConfig::default();
        config.indicators = Some(vec![
            Box::new(Categorization::default()),
            Box::new(ScientificReferences::default()),
        ]);
        let pipeline = config
            .into_pipeline(Some(ScientificReferences::default()))
            .unwrap();
        assert_eq!(pipeline.indicators().len(), 2);

        let pipeline = AssessmentConfig::default()
            .into_pipeline(Some(ScientificReferences::default()))
            .unwrap();
        assert_eq!(pipeline.indicators().len(), 22);
    }

    #[test]
    fn explicit_indicators_round_trip() {
        let mut config = AssessmentConfig::default();
        let indicators = config.default_indicators(None);
        let expected = names(&indicators);
        config.indicators = Some(indicators);

        let content = config.to_toml().unwrap();
        assert!(content.contains("type = \"Categorization\""));
        let restored = AssessmentConfig::from_toml(&content).unwrap();
        assert_eq!(names(restored.indicators.as_deref().unwrap()), expected);
        assert_eq!(restored.carbon_price, config.carbon_price);
    }
}
