//! Peak warming and the decline from the peak until the end of the century
use serde::{Deserialize, Serialize};
use sr15_core::errors::SR15Result;
use sr15_core::indicator::{Indicator, IndicatorOutput, RequirementDefinition, ScenarioContext};
use sr15_core::meta::MetaValue;
use sr15_core::standard_variables::{VAR_FAIR_MEDIAN_TEMPERATURE, VAR_MAGICC6_MEDIAN_TEMPERATURE};
use sr15_core::timeseries::Year;

/// Median warming at its peak and the year of the peak
///
/// If `end_year` is set, warming in that year and the peak-and-decline (peak
/// minus warming in `end_year`) are reported as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeakWarming {
    /// Climate model used in the output names, e.g. `MAGICC6`
    pub climate_model: String,
    pub variable: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_year: Option<Year>,
}

impl PeakWarming {
    pub fn magicc6() -> Self {
        Self {
            climate_model: "MAGICC6".to_string(),
            variable: VAR_MAGICC6_MEDIAN_TEMPERATURE.name.to_string(),
            end_year: Some(2100),
        }
    }

    pub fn fair() -> Self {
        Self {
            climate_model: "FAIR".to_string(),
            variable: VAR_FAIR_MEDIAN_TEMPERATURE.name.to_string(),
            end_year: None,
        }
    }

    pub fn peak_name(&self) -> String {
        format!("median warming at peak ({})", self.climate_model)
    }

    pub fn year_name(&self) -> String {
        format!("year of peak warming ({})", self.climate_model)
    }

    fn end_name(&self, year: Year) -> String {
        format!("median warming in {} ({})", year, self.climate_model)
    }

    fn decline_name(&self) -> String {
        format!("median warming peak-and-decline ({})", self.climate_model)
    }
}

#[typetag::serde]
impl Indicator for PeakWarming {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions = vec![
            RequirementDefinition::variable(&self.variable, "K"),
            RequirementDefinition::meta_output(
                &self.peak_name(),
                &format!(
                    "median warming above pre-industrial temperature at peak (°C) as computed by {}",
                    self.climate_model
                ),
            ),
            RequirementDefinition::meta_output(
                &self.year_name(),
                &format!("year of peak median warming as computed by {}", self.climate_model),
            ),
        ];
        if let Some(year) = self.end_year {
            definitions.push(RequirementDefinition::meta_output(
                &self.end_name(year),
                &format!(
                    "median warming above pre-industrial temperature in {} (°C) as computed by {}",
                    year, self.climate_model
                ),
            ));
            definitions.push(RequirementDefinition::meta_output(
                &self.decline_name(),
                &format!(
                    "median warming peak-and-decline from peak to temperature in {} (°C) as computed by {}",
                    year, self.climate_model
                ),
            ));
        }
        definitions
    }

    fn evaluate(&self, ctx: &ScenarioContext) -> SR15Result<IndicatorOutput> {
        let ts = ctx.timeseries(&self.variable)?;
        let peak = ts.max();

        let mut output = IndicatorOutput::from([
            (self.peak_name(), MetaValue::from(peak.map(|(_, value)| value))),
            (self.year_name(), MetaValue::from(peak.map(|(year, _)| year))),
        ]);
        if let Some(year) = self.end_year {
            let end = ts.at(year);
            let decline = peak.zip(end).map(|((_, peak), end)| peak - end);
            output.insert(self.end_name(year), MetaValue::from(end));
            output.insert(self.decline_name(), MetaValue::from(decline));
        }
        Ok(output)
    }
}
