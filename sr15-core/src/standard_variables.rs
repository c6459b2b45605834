//! Standard variable definitions used by the assessment.
//!
//! Variable names follow the IAMC convention using `|` as a hierarchical separator:
//! - `Emissions|CO2` - net CO2 emissions
//! - `Carbon Sequestration|CCS|Biomass` - CO2 captured from bioenergy
//! - `AR5 climate diagnostics|Temperature|Global Mean|MAGICC6|MED` - median warming
//!
//! ```rust
//! use sr15_core::standard_variables::{exceedance_probability, VAR_CO2_EMISSIONS};
//!
//! assert_eq!(VAR_CO2_EMISSIONS.name, "Emissions|CO2");
//! assert_eq!(
//!     exceedance_probability(1.5),
//!     "AR5 climate diagnostics|Temperature|Exceedance Probability|1.5 °C|MAGICC6"
//! );
//! ```

use crate::timeseries::FloatValue;

/// Name, canonical unit and description of a reported variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableDefinition {
    pub name: &'static str,
    pub unit: &'static str,
    pub description: &'static str,
}

macro_rules! define_variable {
    ($ident:ident, name = $name:expr, unit = $unit:expr, description = $description:expr $(,)?) => {
        pub const $ident: VariableDefinition = VariableDefinition {
            name: $name,
            unit: $unit,
            description: $description,
        };
    };
}

// ============================================================================
// Emissions
// ============================================================================

define_variable!(
    VAR_CO2_EMISSIONS,
    name = "Emissions|CO2",
    unit = "Mt CO2/yr",
    description = "Net CO2 emissions from all sources",
);

define_variable!(
    VAR_KYOTO_EMISSIONS,
    name = "Emissions|Kyoto Gases (SAR-GWP100)",
    unit = "Mt CO2-equiv/yr",
    description = "Kyoto greenhouse gas emissions aggregated with SAR GWP100",
);

define_variable!(
    VAR_CH4_AFOLU_EMISSIONS,
    name = "Emissions|CH4|AFOLU",
    unit = "Mt CH4/yr",
    description = "Methane emissions from agriculture, forestry and other land use",
);

define_variable!(
    VAR_N2O_AFOLU_EMISSIONS,
    name = "Emissions|N2O|AFOLU",
    unit = "kt N2O/yr",
    description = "Nitrous oxide emissions from agriculture, forestry and other land use",
);

// ============================================================================
// Carbon sequestration
// ============================================================================

define_variable!(
    VAR_CCS,
    name = "Carbon Sequestration|CCS",
    unit = "Mt CO2/yr",
    description = "Total carbon capture and storage",
);

define_variable!(
    VAR_BECCS,
    name = "Carbon Sequestration|CCS|Biomass",
    unit = "Mt CO2/yr",
    description = "Carbon capture and storage from bioenergy",
);

define_variable!(
    VAR_LAND_USE_SEQUESTRATION,
    name = "Carbon Sequestration|Land Use",
    unit = "Mt CO2/yr",
    description = "Carbon sequestration on land",
);

// ============================================================================
// Energy
// ============================================================================

define_variable!(
    VAR_FINAL_ENERGY,
    name = "Final Energy",
    unit = "EJ/yr",
    description = "Total final energy consumption",
);

define_variable!(
    VAR_PRIMARY_ENERGY,
    name = "Primary Energy",
    unit = "EJ/yr",
    description = "Total primary energy supply",
);

define_variable!(
    VAR_PRIMARY_ENERGY_COAL,
    name = "Primary Energy|Coal",
    unit = "EJ/yr",
    description = "Primary energy from coal",
);

define_variable!(
    VAR_PRIMARY_ENERGY_OIL,
    name = "Primary Energy|Oil",
    unit = "EJ/yr",
    description = "Primary energy from oil",
);

define_variable!(
    VAR_PRIMARY_ENERGY_GAS,
    name = "Primary Energy|Gas",
    unit = "EJ/yr",
    description = "Primary energy from natural gas",
);

define_variable!(
    VAR_PRIMARY_ENERGY_NUCLEAR,
    name = "Primary Energy|Nuclear",
    unit = "EJ/yr",
    description = "Primary energy from nuclear power",
);

define_variable!(
    VAR_PRIMARY_ENERGY_BIOMASS,
    name = "Primary Energy|Biomass",
    unit = "EJ/yr",
    description = "Primary energy from biomass",
);

define_variable!(
    VAR_PRIMARY_ENERGY_NON_BIOMASS_RENEWABLES,
    name = "Primary Energy|Non-Biomass Renewables",
    unit = "EJ/yr",
    description = "Primary energy from renewables other than biomass",
);

define_variable!(
    VAR_ELECTRICITY,
    name = "Secondary Energy|Electricity",
    unit = "EJ/yr",
    description = "Total electricity generation",
);

define_variable!(
    VAR_ELECTRICITY_BIOMASS,
    name = "Secondary Energy|Electricity|Biomass",
    unit = "EJ/yr",
    description = "Electricity generation from biomass",
);

define_variable!(
    VAR_ELECTRICITY_NON_BIOMASS_RENEWABLES,
    name = "Secondary Energy|Electricity|Non-Biomass Renewables",
    unit = "EJ/yr",
    description = "Electricity generation from renewables other than biomass",
);

// ============================================================================
// Land use
// ============================================================================

define_variable!(
    VAR_ENERGY_CROPS_LAND,
    name = "Land Cover|Cropland|Energy Crops",
    unit = "million ha",
    description = "Land area used for dedicated energy crops",
);

// ============================================================================
// Prices
// ============================================================================

define_variable!(
    VAR_CARBON_PRICE,
    name = "Price|Carbon",
    unit = "US$2010/t CO2",
    description = "Price of carbon",
);

// ============================================================================
// Climate diagnostics
// ============================================================================

define_variable!(
    VAR_MAGICC6_MEDIAN_TEMPERATURE,
    name = "AR5 climate diagnostics|Temperature|Global Mean|MAGICC6|MED",
    unit = "K",
    description = "Median global mean warming above pre-industrial (MAGICC6)",
);

define_variable!(
    VAR_MAGICC6_EXPECTED_TEMPERATURE,
    name = "AR5 climate diagnostics|Temperature|Global Mean|MAGICC6|Expected value",
    unit = "K",
    description = "Expected global mean warming above pre-industrial (MAGICC6)",
);

define_variable!(
    VAR_FAIR_MEDIAN_TEMPERATURE,
    name = "AR5 climate diagnostics|Temperature|Global Mean|FAIR|MED",
    unit = "K",
    description = "Median global mean warming above pre-industrial (FAIR)",
);

/// Name of the MAGICC6 probability of exceeding `threshold` degrees of warming
///
/// Thresholds are formatted with one decimal, e.g. `1.5 °C` and `2.0 °C`.
pub fn exceedance_probability(threshold: FloatValue) -> String {
    format!(
        "AR5 climate diagnostics|Temperature|Exceedance Probability|{:.1} °C|MAGICC6",
        threshold
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exceedance_names() {
        assert_eq!(
            exceedance_probability(2.0),
            "AR5 climate diagnostics|Temperature|Exceedance Probability|2.0 °C|MAGICC6"
        );
    }

    #[test]
    fn units() {
        assert_eq!(VAR_CO2_EMISSIONS.unit, "Mt CO2/yr");
        assert_eq!(VAR_MAGICC6_MEDIAN_TEMPERATURE.unit, "K");
    }
}
