//! Categorisation of scenarios by their warming outcome
//!
//! Every scenario is assigned exactly one [`Subcategory`] from the MAGICC6
//! probabilities of exceeding 1.5°C and 2.0°C of warming. The [`Category`] is a
//! coarsening of the subcategory.
//!
//! The term $P_{x}$ refers to the largest probability of exceeding $x$ in any
//! year of the century, $P_{x}(y)$ to the probability in year $y$.
//!
//! | Subcategory                | Criteria                                                   |
//! |----------------------------|------------------------------------------------------------|
//! | Below 1.5C (I)             | $P_{1.5} \leq 0.34$                                        |
//! | Below 1.5C (II)            | $0.34 < P_{1.5} \leq 0.50$                                 |
//! | Lower 1.5C low overshoot   | $0.50 < P_{1.5} \leq 0.67$ and $P_{1.5}(2100) \leq 0.34$    |
//! | Higher 1.5C low overshoot  | $0.50 < P_{1.5} \leq 0.67$ and $0.34 < P_{1.5}(2100) \leq 0.50$ |
//! | Lower 1.5C high overshoot  | $0.66 < P_{1.5}$ and $P_{1.5}(2100) \leq 0.34$              |
//! | Higher 1.5C high overshoot | $0.66 < P_{1.5}$ and $0.34 < P_{1.5}(2100) \leq 0.50$       |
//! | Lower 2C                   | $P_{2.0} \leq 0.34$ (excluding above)                       |
//! | Higher 2C                  | $0.34 < P_{2.0} \leq 0.50$ (excluding above)                |
//! | Above 2C                   | $P_{2.0} > 0.50$ for at least one year                      |
//!
//! The low overshoot band is bounded by 0.67 while the high overshoot band
//! starts above 0.66. Scenarios that fall into an overshoot band but fail the
//! split by $P_{1.5}(2100)$ continue with the 2°C rules.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use sr15_core::dataset::ScenarioDataset;
use sr15_core::errors::SR15Result;
use sr15_core::indicator::{Indicator, IndicatorOutput, RequirementDefinition, ScenarioContext};
use sr15_core::meta::{DefinitionTable, MetaTable, MetaValue};
use sr15_core::scenario::ScenarioId;
use sr15_core::standard_variables::{exceedance_probability, VAR_CO2_EMISSIONS};
use sr15_core::timeseries::{FloatValue, Year};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subcategory {
    Below15I,
    Below15II,
    Lower15LowOvershoot,
    Higher15LowOvershoot,
    Lower15HighOvershoot,
    Higher15HighOvershoot,
    Lower2C,
    Higher2C,
    Above2C,
    /// No post-processed climate diagnostics, e.g. no CO2 emissions in 2100
    NoClimateAssessment,
    /// Historical reference data rather than a scenario
    Reference,
    Uncategorized,
}

impl Subcategory {
    /// Subcategories assigned from exceedance probabilities, in order of warming
    pub const ASSESSED: [Subcategory; 9] = [
        Subcategory::Below15I,
        Subcategory::Below15II,
        Subcategory::Lower15LowOvershoot,
        Subcategory::Higher15LowOvershoot,
        Subcategory::Lower15HighOvershoot,
        Subcategory::Higher15HighOvershoot,
        Subcategory::Lower2C,
        Subcategory::Higher2C,
        Subcategory::Above2C,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Subcategory::Below15I => "Below 1.5C (I)",
            Subcategory::Below15II => "Below 1.5C (II)",
            Subcategory::Lower15LowOvershoot => "Lower 1.5C low overshoot",
            Subcategory::Higher15LowOvershoot => "Higher 1.5C low overshoot",
            Subcategory::Lower15HighOvershoot => "Lower 1.5C high overshoot",
            Subcategory::Higher15HighOvershoot => "Higher 1.5C high overshoot",
            Subcategory::Lower2C => "Lower 2C",
            Subcategory::Higher2C => "Higher 2C",
            Subcategory::Above2C => "Above 2C",
            Subcategory::NoClimateAssessment => "no-climate-assessment",
            Subcategory::Reference => "reference",
            Subcategory::Uncategorized => "uncategorized",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Subcategory::Below15I | Subcategory::Below15II => Category::Below15,
            Subcategory::Lower15LowOvershoot | Subcategory::Higher15LowOvershoot => {
                Category::LowOvershoot15
            }
            Subcategory::Lower15HighOvershoot | Subcategory::Higher15HighOvershoot => {
                Category::HighOvershoot15
            }
            Subcategory::Lower2C => Category::Lower2C,
            Subcategory::Higher2C => Category::Higher2C,
            Subcategory::Above2C => Category::Above2C,
            Subcategory::NoClimateAssessment => Category::NoClimateAssessment,
            Subcategory::Reference => Category::Reference,
            Subcategory::Uncategorized => Category::Uncategorized,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Subcategory::Below15I | Subcategory::Below15II => "xkcd:baby blue",
            Subcategory::Lower15LowOvershoot | Subcategory::Higher15LowOvershoot => "xkcd:bluish",
            Subcategory::Lower15HighOvershoot | Subcategory::Higher15HighOvershoot => {
                "xkcd:darkish blue"
            }
            Subcategory::Lower2C => "xkcd:orange",
            Subcategory::Higher2C => "xkcd:red",
            Subcategory::Above2C => "darkgrey",
            _ => "",
        }
    }
}

impl fmt::Display for Subcategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Below15,
    LowOvershoot15,
    HighOvershoot15,
    Lower2C,
    Higher2C,
    Above2C,
    NoClimateAssessment,
    Reference,
    Uncategorized,
}

impl Category {
    pub const ASSESSED: [Category; 6] = [
        Category::Below15,
        Category::LowOvershoot15,
        Category::HighOvershoot15,
        Category::Lower2C,
        Category::Higher2C,
        Category::Above2C,
    ];

    /// Categories of scenarios consistent with limiting warming to 1.5°C
    pub const PATHWAYS_15: [Category; 3] = [
        Category::Below15,
        Category::LowOvershoot15,
        Category::HighOvershoot15,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Below15 => "Below 1.5C",
            Category::LowOvershoot15 => "1.5C low overshoot",
            Category::HighOvershoot15 => "1.5C high overshoot",
            Category::Lower2C => "Lower 2C",
            Category::Higher2C => "Higher 2C",
            Category::Above2C => "Above 2C",
            Category::NoClimateAssessment => "no-climate-assessment",
            Category::Reference => "reference",
            Category::Uncategorized => "uncategorized",
        }
    }

    /// Colour of the category, taken from one of its subcategories
    pub fn color(&self) -> &'static str {
        match self {
            Category::Below15 => Subcategory::Below15II.color(),
            Category::LowOvershoot15 => Subcategory::Lower15LowOvershoot.color(),
            Category::HighOvershoot15 => Subcategory::Lower15HighOvershoot.color(),
            Category::Lower2C => Subcategory::Lower2C.color(),
            Category::Higher2C => Subcategory::Higher2C.color(),
            Category::Above2C => Subcategory::Above2C.color(),
            _ => "",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Everything the classification of a single scenario depends on
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClassifierInput {
    /// The scenario is historical reference data
    pub is_reference: bool,
    /// The scenario reports CO2 emissions at the end of the century
    pub has_co2_2100: bool,
    /// Largest probability of exceeding 1.5°C in any year
    pub p15_max: Option<FloatValue>,
    /// Probability of exceeding 1.5°C at the end of the century
    pub p15_2100: Option<FloatValue>,
    /// Largest probability of exceeding 2.0°C in any year
    pub p20_max: Option<FloatValue>,
}

type Rule = fn(&ClassifierInput) -> Option<Subcategory>;

/// Rules in order of priority, the first match wins
const RULES: [Rule; 6] = [
    reference,
    no_climate_assessment,
    below_15,
    low_overshoot,
    high_overshoot,
    two_degrees,
];

fn reference(input: &ClassifierInput) -> Option<Subcategory> {
    input.is_reference.then_some(Subcategory::Reference)
}

fn no_climate_assessment(input: &ClassifierInput) -> Option<Subcategory> {
    (!input.has_co2_2100).then_some(Subcategory::NoClimateAssessment)
}

fn below_15(input: &ClassifierInput) -> Option<Subcategory> {
    match input.p15_max? {
        p if p <= 0.34 => Some(Subcategory::Below15I),
        p if p <= 0.50 => Some(Subcategory::Below15II),
        _ => None,
    }
}

/// Split an overshoot band by the probability at the end of the century
fn by_return(input: &ClassifierInput, lower: Subcategory, higher: Subcategory) -> Option<Subcategory> {
    match input.p15_2100? {
        p if p <= 0.34 => Some(lower),
        p if p <= 0.50 => Some(higher),
        _ => None,
    }
}

fn low_overshoot(input: &ClassifierInput) -> Option<Subcategory> {
    if input.p15_max? > 0.67 {
        return None;
    }
    by_return(
        input,
        Subcategory::Lower15LowOvershoot,
        Subcategory::Higher15LowOvershoot,
    )
}

fn high_overshoot(input: &ClassifierInput) -> Option<Subcategory> {
    if input.p15_max? <= 0.66 {
        return None;
    }
    by_return(
        input,
        Subcategory::Lower15HighOvershoot,
        Subcategory::Higher15HighOvershoot,
    )
}

fn two_degrees(input: &ClassifierInput) -> Option<Subcategory> {
    match input.p20_max? {
        p if p <= 0.34 => Some(Subcategory::Lower2C),
        p if p <= 0.50 => Some(Subcategory::Higher2C),
        _ => Some(Subcategory::Above2C),
    }
}

/// Assign the subcategory of a single scenario
///
/// ```rust
/// use sr15_indicators::category::{classify, ClassifierInput, Category, Subcategory};
///
/// let input = ClassifierInput {
///     has_co2_2100: true,
///     p15_max: Some(0.6),
///     p15_2100: Some(0.2),
///     ..Default::default()
/// };
/// assert_eq!(classify(&input), Subcategory::Lower15LowOvershoot);
/// assert_eq!(classify(&input).category(), Category::LowOvershoot15);
/// ```
pub fn classify(input: &ClassifierInput) -> Subcategory {
    RULES
        .iter()
        .find_map(|rule| rule(input))
        .unwrap_or(Subcategory::Uncategorized)
}

/// Scenarios reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryReview {
    /// Scenarios matching none of the rules
    pub uncategorized: Vec<ScenarioId>,
    /// 1.5°C pathways with P2.0°C above 0.34 in at least one year
    pub not_lower_2c: Vec<ScenarioId>,
    /// 1.5°C pathways with P2.0°C above 0.50 in at least one year
    pub not_2c: Vec<ScenarioId>,
}

/// Assigns the `category` and `subcategory` metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Categorization {
    /// Model name identifying historical reference data
    pub reference_model: String,
    pub co2_variable: String,
    pub probability_15: String,
    pub probability_20: String,
    /// End of the assessed period
    pub end_year: Year,
}

impl Default for Categorization {
    fn default() -> Self {
        Self {
            reference_model: "Reference".to_string(),
            co2_variable: VAR_CO2_EMISSIONS.name.to_string(),
            probability_15: exceedance_probability(1.5),
            probability_20: exceedance_probability(2.0),
            end_year: 2100,
        }
    }
}

impl Categorization {
    pub fn input(&self, ctx: &ScenarioContext) -> ClassifierInput {
        let max = |variable: &str| {
            ctx.try_timeseries(variable)
                .and_then(|ts| ts.max())
                .map(|(_, value)| value)
        };
        ClassifierInput {
            is_reference: ctx.model() == self.reference_model,
            has_co2_2100: ctx
                .try_timeseries(&self.co2_variable)
                .and_then(|ts| ts.at(self.end_year))
                .is_some(),
            p15_max: max(&self.probability_15),
            p15_2100: ctx
                .try_timeseries(&self.probability_15)
                .and_then(|ts| ts.at(self.end_year)),
            p20_max: max(&self.probability_20),
        }
    }

    /// Definition of all categories as exported to `def_categories`
    pub fn definition_table() -> DefinitionTable {
        let mut table = DefinitionTable::new(
            "categories",
            &[
                "Categories of scenarios",
                "Subcategories",
                "Criteria for assignment to category",
                "Acronym",
                "Color",
            ],
        );
        let rows = [
            ["Below 1.5°C", "Below 1.5°C (I)", "P1.5°C ≤ 0.34"],
            ["", "Below 1.5°C (II)", "0.34 < P1.5°C ≤ 0.50"],
            [
                "1.5°C return with low overshoot",
                "Lower 1.5°C return with low overshoot",
                "0.50 < P1.5°C ≤ 0.67 and P1.5°C(2100) ≤ 0.34",
            ],
            [
                "",
                "Higher 1.5°C return with low overshoot",
                "0.50 < P1.5°C ≤ 0.67 and 0.34 < P1.5°C(2100) ≤ 0.50",
            ],
            [
                "1.5°C return with high overshoot",
                "Lower 1.5°C return with high overshoot",
                "0.67 < P1.5°C and P1.5°C(2100) ≤ 0.34",
            ],
            [
                "",
                "Higher 1.5°C return with high overshoot",
                "0.67 < P1.5°C and 0.34 < P1.5°C(2100) ≤ 0.50",
            ],
            ["Lower 2.0°C", "", "P2.0°C ≤ 0.34 (excluding above)"],
            ["Higher 2.0°C", "", "0.34 < P2.0°C ≤ 0.50 (excluding above)"],
            ["Above 2.0°C", "", "P2.0°C > 0.50 during at least 1 year"],
        ];
        for (i, ([category, subcategory, criteria], acronym)) in
            rows.iter().zip(Subcategory::ASSESSED).enumerate()
        {
            // colours are only listed once per category
            let color = match i {
                1 | 3 | 5 => "",
                _ => acronym.color(),
            };
            table.push_row(&[*category, *subcategory, *criteria, acronym.label(), color]);
        }
        table
    }

    /// Scenarios flagged for review once all scenarios are categorised
    pub fn review(&self, dataset: &ScenarioDataset, meta: &MetaTable) -> CategoryReview {
        let owned = |ids: Vec<&ScenarioId>| -> Vec<ScenarioId> { ids.into_iter().cloned().collect() };
        CategoryReview {
            uncategorized: owned(meta.scenarios_with("category", &[Category::Uncategorized.label()])),
            not_lower_2c: owned(self.max_probability_20(dataset, meta, 0.34)),
            not_2c: owned(self.max_probability_20(dataset, meta, 0.50)),
        }
    }

    /// 1.5°C pathways whose largest P2.0°C is above `above`
    fn max_probability_20<'a>(
        &self,
        dataset: &ScenarioDataset,
        meta: &'a MetaTable,
        above: FloatValue,
    ) -> Vec<&'a ScenarioId> {
        let labels: Vec<&str> = Category::PATHWAYS_15.iter().map(Category::label).collect();
        meta.scenarios_with("category", &labels)
            .into_iter()
            .filter(|id| {
                dataset
                    .get(id, &self.probability_20)
                    .and_then(|ts| ts.max())
                    .is_some_and(|(_, p)| p > above)
            })
            .collect()
    }
}

#[typetag::serde]
impl Indicator for Categorization {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::variable(&self.co2_variable, VAR_CO2_EMISSIONS.unit),
            RequirementDefinition::variable(&self.probability_15, ""),
            RequirementDefinition::variable(&self.probability_20, ""),
            RequirementDefinition::meta_output(
                "category",
                "Categorization of scenarios by global warming impact",
            ),
            RequirementDefinition::meta_output(
                "subcategory",
                "Sub-categorization of scenarios by global warming impact",
            ),
        ]
    }

    fn evaluate(&self, ctx: &ScenarioContext) -> SR15Result<IndicatorOutput> {
        let subcategory = classify(&self.input(ctx));
        Ok(IndicatorOutput::from([
            ("category".to_string(), MetaValue::from(subcategory.category().label())),
            ("subcategory".to_string(), MetaValue::from(subcategory.label())),
        ]))
    }

    fn tables(&self) -> Vec<DefinitionTable> {
        vec![Self::definition_table()]
    }

    fn finalize(&self, dataset: &ScenarioDataset, meta: &MetaTable) -> SR15Result<()> {
        for category in Category::ASSESSED
            .into_iter()
            .chain([Category::NoClimateAssessment, Category::Reference])
        {
            let count = meta.scenarios_with("category", &[category.label()]).len();
            info!("{}: {} scenarios", category, count);
        }

        let review = self.review(dataset, meta);
        let names = |ids: &[ScenarioId]| {
            ids.iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        if !review.uncategorized.is_empty() {
            warn!(
                "There are {} scenarios that are not yet categorized: {}",
                review.uncategorized.len(),
                names(&review.uncategorized)
            );
        }
        if !review.not_lower_2c.is_empty() {
            warn!(
                "The following 1.5C-scenarios are not `Lower 2C` scenarios: {}",
                names(&review.not_lower_2c)
            );
        }
        if !review.not_2c.is_empty() {
            warn!(
                "The following 1.5C-scenarios are not `2C` scenarios: {}",
                names(&review.not_2c)
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sr15_core::timeseries::Timeseries;

    fn assessed(p15_max: FloatValue, p15_2100: FloatValue, p20_max: FloatValue) -> ClassifierInput {
        ClassifierInput {
            is_reference: false,
            has_co2_2100: true,
            p15_max: Some(p15_max),
            p15_2100: Some(p15_2100),
            p20_max: Some(p20_max),
        }
    }

    #[test]
    fn below_15() {
        assert_eq!(classify(&assessed(0.30, 0.30, 0.05)), Subcategory::Below15I);
        assert_eq!(classify(&assessed(0.34, 0.20, 0.05)), Subcategory::Below15I);
        assert_eq!(classify(&assessed(0.45, 0.20, 0.05)), Subcategory::Below15II);
        assert_eq!(Subcategory::Below15I.category(), Category::Below15);
    }

    #[test]
    fn low_overshoot() {
        assert_eq!(
            classify(&assessed(0.60, 0.20, 0.10)),
            Subcategory::Lower15LowOvershoot
        );
        assert_eq!(
            classify(&assessed(0.67, 0.45, 0.10)),
            Subcategory::Higher15LowOvershoot
        );
    }

    #[test]
    fn failed_split_falls_through_to_two_degrees() {
        assert_eq!(classify(&assessed(0.60, 0.80, 0.20)), Subcategory::Lower2C);
        assert_eq!(classify(&assessed(0.90, 0.60, 0.40)), Subcategory::Higher2C);
    }

    #[test]
    fn failed_split_without_two_degree_data_is_uncategorized() {
        let input = ClassifierInput {
            p20_max: None,
            ..assessed(0.60, 0.80, 0.0)
        };
        assert_eq!(classify(&input), Subcategory::Uncategorized);
        assert_eq!(classify(&input).category(), Category::Uncategorized);
    }

    #[test]
    fn high_overshoot() {
        assert_eq!(
            classify(&assessed(0.80, 0.30, 0.60)),
            Subcategory::Lower15HighOvershoot
        );
        assert_eq!(
            classify(&assessed(0.80, 0.50, 0.60)),
            Subcategory::Higher15HighOvershoot
        );
        // between the two cutoffs the low overshoot band takes precedence
        assert_eq!(
            classify(&assessed(0.665, 0.30, 0.60)),
            Subcategory::Lower15LowOvershoot
        );
    }

    #[test]
    fn two_degrees() {
        assert_eq!(classify(&assessed(0.95, 0.90, 0.34)), Subcategory::Lower2C);
        assert_eq!(classify(&assessed(0.95, 0.90, 0.50)), Subcategory::Higher2C);
        assert_eq!(classify(&assessed(1.0, 1.0, 0.51)), Subcategory::Above2C);
        assert_eq!(Subcategory::Above2C.category(), Category::Above2C);
    }

    #[test]
    fn sentinels_take_precedence() {
        let reference = ClassifierInput {
            is_reference: true,
            ..assessed(0.1, 0.1, 0.1)
        };
        assert_eq!(classify(&reference), Subcategory::Reference);

        let incomplete = ClassifierInput {
            has_co2_2100: false,
            ..assessed(0.1, 0.1, 0.1)
        };
        assert_eq!(classify(&incomplete), Subcategory::NoClimateAssessment);
        assert_eq!(
            classify(&incomplete).category().label(),
            "no-climate-assessment"
        );
    }

    #[test]
    fn missing_end_of_century_probability() {
        let input = ClassifierInput {
            p15_2100: None,
            ..assessed(0.60, 0.0, 0.20)
        };
        assert_eq!(classify(&input), Subcategory::Lower2C);
    }

    #[test]
    fn classification_is_idempotent() {
        let input = assessed(0.62, 0.41, 0.3);
        assert_eq!(classify(&input), classify(&input));
    }

    #[test]
    fn every_subcategory_maps_to_a_category() {
        let labels: Vec<&str> = Subcategory::ASSESSED
            .iter()
            .map(|s| s.category().label())
            .collect();
        assert_eq!(
            labels,
            vec![
                "Below 1.5C",
                "Below 1.5C",
                "1.5C low overshoot",
                "1.5C low overshoot",
                "1.5C high overshoot",
                "1.5C high overshoot",
                "Lower 2C",
                "Higher 2C",
                "Above 2C"
            ]
        );
    }

    #[test]
    fn definition_table() {
        let table = Categorization::definition_table();
        assert_eq!(table.name, "categories");
        assert_eq!(table.rows.len(), 9);
        assert_eq!(
            table.rows[2],
            vec![
                "1.5°C return with low overshoot",
                "Lower 1.5°C return with low overshoot",
                "0.50 < P1.5°C ≤ 0.67 and P1.5°C(2100) ≤ 0.34",
                "Lower 1.5C low overshoot",
                "xkcd:bluish"
            ]
        );
        assert_eq!(table.rows[3][4], "");
        assert_eq!(table.rows[8][4], "darkgrey");
    }

    #[test]
    fn indicator_reads_probabilities() {
        let indicator = Categorization::default();
        let id = ScenarioId::new("MESSAGE-GLOBIOM 1.0", "SSP2-19");
        let mut ds = ScenarioDataset::new();
        let years = |values: [FloatValue; 3]| {
            Timeseries::from_pairs(&[(2050, values[0]), (2075, values[1]), (2100, values[2])], "")
                .unwrap()
        };
        ds.insert(id.clone(), &indicator.co2_variable, years([10000.0, 0.0, -5000.0]));
        ds.insert(id.clone(), &indicator.probability_15, years([0.55, 0.60, 0.40]));
        ds.insert(id.clone(), &indicator.probability_20, years([0.10, 0.12, 0.05]));
        let meta = MetaTable::new();
        let ctx = ScenarioContext::new(&id, &ds, &meta);

        let output = indicator.evaluate(&ctx).unwrap();
        assert_eq!(output["subcategory"], MetaValue::from("Higher 1.5C low overshoot"));
        assert_eq!(output["category"], MetaValue::from("1.5C low overshoot"));

        let reference = ScenarioId::new("Reference", "CEDS");
        let ctx = ScenarioContext::new(&reference, &ds, &meta);
        let output = indicator.evaluate(&ctx).unwrap();
        assert_eq!(output["category"], MetaValue::from("reference"));
    }

    #[test]
    fn review_lists_uncategorized_and_overlapping_scenarios() {
        let indicator = Categorization::default();
        let years = |values: [FloatValue; 3]| {
            Timeseries::from_pairs(&[(2050, values[0]), (2075, values[1]), (2100, values[2])], "")
                .unwrap()
        };
        let failed_split = ScenarioId::new("GCAM 4.2", "SSP2-19");
        let below = ScenarioId::new("AIM/CGE 2.0", "SSP1-19");

        let mut ds = ScenarioDataset::new();
        for id in [&failed_split, &below] {
            ds.insert(id.clone(), &indicator.co2_variable, years([10000.0, 0.0, -5000.0]));
        }
        ds.insert(failed_split.clone(), &indicator.probability_15, years([0.55, 0.60, 0.80]));
        ds.insert(below.clone(), &indicator.probability_15, years([0.20, 0.30, 0.25]));
        ds.insert(below.clone(), &indicator.probability_20, years([0.10, 0.40, 0.20]));

        let mut meta = MetaTable::new();
        for id in [&failed_split, &below] {
            let output = indicator.evaluate(&ScenarioContext::new(id, &ds, &meta)).unwrap();
            for (name, value) in output {
                meta.set(id, &name, value);
            }
        }
        assert_eq!(meta.get_text(&failed_split, "subcategory"), Some("uncategorized"));
        assert_eq!(meta.get_text(&below, "subcategory"), Some("Below 1.5C (I)"));

        let review = indicator.review(&ds, &meta);
        assert_eq!(review.uncategorized, vec![failed_split]);
        assert_eq!(review.not_lower_2c, vec![below]);
        assert!(review.not_2c.is_empty());
        assert!(indicator.finalize(&ds, &meta).is_ok());
    }
}
