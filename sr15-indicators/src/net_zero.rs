//! Year in which a declining series falls below a threshold, typically net-zero CO2 emissions
use crate::exceedance::crossing_year;
use serde::{Deserialize, Serialize};
use sr15_core::errors::SR15Result;
use sr15_core::indicator::{Indicator, IndicatorOutput, RequirementDefinition, ScenarioContext};
use sr15_core::meta::MetaValue;
use sr15_core::standard_variables::VAR_CO2_EMISSIONS;
use sr15_core::timeseries::{FloatValue, Timeseries, Year};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetZero {
    Reached(Year),
    /// The series stays at or above the threshold over all reported years
    NotReached,
}

impl From<NetZero> for MetaValue {
    /// A threshold that is never reached is stored as an infinite year
    fn from(value: NetZero) -> Self {
        match value {
            NetZero::Reached(year) => MetaValue::from(year),
            NetZero::NotReached => MetaValue::Float(FloatValue::INFINITY),
        }
    }
}

/// First year after the series drops from at or above `threshold` to below it
///
/// Uses the same rounding as [`exceedance`](crate::exceedance::exceedance).
/// Returns `None` if the series has no data or is already below the threshold
/// in its first reported year, since no crossing can be located.
///
/// ```rust
/// use sr15_core::timeseries::Timeseries;
/// use sr15_indicators::net_zero::{year_of_net_zero, NetZero};
///
/// let ts = Timeseries::from_pairs(&[(2040, 5.0), (2050, -5.0)], "Gt CO2/yr").unwrap();
/// assert_eq!(year_of_net_zero(&ts, 0.0), Some(NetZero::Reached(2046)));
/// ```
pub fn year_of_net_zero(ts: &Timeseries, threshold: FloatValue) -> Option<NetZero> {
    let mut prev: Option<(Year, FloatValue)> = None;
    for (year, value) in ts.iter_valid() {
        if value < threshold {
            let (prev_year, prev_value) = prev?;
            return Some(NetZero::Reached(crossing_year(
                prev_year, prev_value, year, value, threshold,
            )));
        }
        prev = Some((year, value));
    }
    prev.map(|_| NetZero::NotReached)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetZeroYear {
    pub name: String,
    pub description: String,
    pub variable: String,
    pub threshold: FloatValue,
}

impl Default for NetZeroYear {
    fn default() -> Self {
        Self {
            name: "year of netzero CO2 emissions".to_string(),
            description: "year in which net CO2 emissions reach zero".to_string(),
            variable: VAR_CO2_EMISSIONS.name.to_string(),
            threshold: 0.0,
        }
    }
}

#[typetag::serde]
impl Indicator for NetZeroYear {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::variable(&self.variable, VAR_CO2_EMISSIONS.unit),
            RequirementDefinition::meta_output(&self.name, &self.description),
        ]
    }

    fn evaluate(&self, ctx: &ScenarioContext) -> SR15Result<IndicatorOutput> {
        let year = year_of_net_zero(ctx.timeseries(&self.variable)?, self.threshold);
        Ok(IndicatorOutput::from([(self.name.clone(), MetaValue::from(year))]))
    }
}
