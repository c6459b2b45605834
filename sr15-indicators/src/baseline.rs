//! Assignment of baseline (reference or no-policy) scenarios
//!
//! Scenario names of the major model intercomparison projects follow naming
//! conventions from which the name of the corresponding baseline can be
//! derived. The baseline is only assigned if the same model reports it.

use serde::{Deserialize, Serialize};
use sr15_core::errors::SR15Result;
use sr15_core::indicator::{Indicator, IndicatorOutput, RequirementDefinition, ScenarioContext};
use sr15_core::meta::MetaValue;
use sr15_core::scenario::ScenarioId;

/// First `n` characters of a scenario name
fn prefix(scenario: &str, n: usize) -> String {
    scenario.chars().take(n).collect()
}

/// Name of the baseline of `scenario` according to its project's naming convention
///
/// Rules are applied in order and later matches take precedence.
pub fn baseline_name(scenario: &str) -> Option<String> {
    let s = scenario;
    let mut baseline = None;
    if s.starts_with("SSP") && !s.contains("Baseline") {
        baseline = Some(format!("{}Baseline", prefix(s, 5)));
    }
    if s.starts_with("CD-LINKS") && !s.contains("NoPolicy") {
        baseline = Some(format!("{}NoPolicy", prefix(s, 9)));
    }
    if s.starts_with("EMF33") && !s.contains("Baseline") {
        baseline = Some(format!("{}Baseline", prefix(s, 6)));
    }
    if s.starts_with("ADVANCE") && !s.contains("NoPolicy") {
        baseline = Some(format!("{}NoPolicy", prefix(s, 8)));
    }
    if s.starts_with("GEA") && !s.contains("base") {
        baseline = Some(format!("{}base", prefix(s, 8)));
    }
    if s.starts_with("TERL") && !s.contains("Baseline") {
        baseline = Some(s.replace("15D", "Baseline").replace("2D", "Baseline"));
    }
    if s.starts_with("SFCM") && !s.contains("Baseline") {
        baseline = Some(
            s.replace("1p5Degree", "Baseline")
                .replace("2Degree", "Baseline"),
        );
    }
    if s.starts_with("CEMICS") && s != "CEMICS-Ref" {
        baseline = Some("CEMICS-Ref".to_string());
    }
    if s.starts_with("SMP") && !s.contains("REF") {
        baseline = Some(if s.ends_with("Def") || s.ends_with("regul") {
            "SMP_REF_Def".to_string()
        } else {
            "SMP_REF_Sust".to_string()
        });
    }
    if s.starts_with("DAC") {
        baseline = Some("BAU".to_string());
    }
    baseline
}

/// Assigns the `baseline` metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Baseline {}

#[typetag::serde]
impl Indicator for Baseline {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![RequirementDefinition::meta_output(
            "baseline",
            "Name of the respective baseline (or reference/no-policy) scenario",
        )]
    }

    fn evaluate(&self, ctx: &ScenarioContext) -> SR15Result<IndicatorOutput> {
        let baseline = baseline_name(&ctx.id.scenario)
            .filter(|name| ctx.dataset.contains(&ScenarioId::new(ctx.model(), name)));
        Ok(IndicatorOutput::from([(
            "baseline".to_string(),
            MetaValue::from(baseline),
        )]))
    }
}
