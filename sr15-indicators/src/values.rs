//! Indicators that pick single values out of a timeseries
use crate::cumulative::Boundary;
use serde::{Deserialize, Serialize};
use sr15_core::errors::SR15Result;
use sr15_core::indicator::{Indicator, IndicatorOutput, RequirementDefinition, ScenarioContext};
use sr15_core::meta::MetaValue;
use sr15_core::timeseries::FloatValue;

fn default_factor() -> FloatValue {
    1.0
}

/// Smallest reported value, e.g. the minimum of net CO2 emissions over the century
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimumValue {
    pub name: String,
    pub description: String,
    pub variable: String,
    pub unit: String,
    #[serde(default = "default_factor")]
    pub factor: FloatValue,
}

#[typetag::serde]
impl Indicator for MinimumValue {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::variable(&self.variable, &self.unit),
            RequirementDefinition::meta_output(&self.name, &self.description),
        ]
    }

    fn evaluate(&self, ctx: &ScenarioContext) -> SR15Result<IndicatorOutput> {
        let minimum = ctx
            .timeseries(&self.variable)?
            .min()
            .map(|(_, value)| value * self.factor);
        Ok(IndicatorOutput::from([(self.name.clone(), MetaValue::from(minimum))]))
    }
}

/// Value of a variable in a given year
///
/// The year is either fixed or read from metadata. Unless `interpolate` is set
/// only values reported for exactly that year are used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueInYear {
    pub name: String,
    pub description: String,
    pub variable: String,
    pub year: Boundary,
    #[serde(default)]
    pub interpolate: bool,
}

#[typetag::serde]
impl Indicator for ValueInYear {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions = vec![RequirementDefinition::variable(&self.variable, "")];
        if let Boundary::Meta(name) = &self.year {
            definitions.push(RequirementDefinition::meta_input(name));
        }
        definitions.push(RequirementDefinition::meta_output(
            &self.name,
            &self.description,
        ));
        definitions
    }

    fn evaluate(&self, ctx: &ScenarioContext) -> SR15Result<IndicatorOutput> {
        let ts = ctx.timeseries(&self.variable)?;
        let year = self.year.resolve(ctx, ts)?;
        let value = if self.interpolate {
            ts.fill(year)
        } else {
            ts.at(year)
        };
        Ok(IndicatorOutput::from([(self.name.clone(), MetaValue::from(value))]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;
    use sr15_core::dataset::ScenarioDataset;
    use sr15_core::meta::MetaTable;
    use sr15_core::scenario::ScenarioId;
    use sr15_core::timeseries::Timeseries;

    fn data() -> (ScenarioDataset, MetaTable, ScenarioId) {
        let id = ScenarioId::new("AIM/CGE 2.0", "SSP1-19");
        let mut ds = ScenarioDataset::new();
        ds.insert(
            id.clone(),
            "Emissions|CO2",
            Timeseries::from_pairs(&[(2020, 40000.0), (2060, -2000.0), (2080, FloatValue::NAN), (2100, -1000.0)], "Mt CO2/yr")
                .unwrap(),
        );
        let mut meta = MetaTable::new();
        meta.set(&id, "year of netzero CO2 emissions", MetaValue::Int(2058));
        (ds, meta, id)
    }

    #[test]
    fn minimum() {
        let (ds, meta, id) = data();
        let indicator = MinimumValue {
            name: "minimum net CO2 emissions (Gt CO2/yr)".to_string(),
            description: "Minimum of net CO2 emissions over the century (Gt CO2/yr)".to_string(),
            variable: "Emissions|CO2".to_string(),
            unit: "Gt CO2/yr".to_string(),
            factor: 0.001,
        };
        let output = indicator.evaluate(&ScenarioContext::new(&id, &ds, &meta)).unwrap();
        let minimum = output["minimum net CO2 emissions (Gt CO2/yr)"].as_float().unwrap();
        assert!(is_close!(minimum, -2.0));
    }

    #[test]
    fn value_in_fixed_year() {
        let (ds, meta, id) = data();
        let mut indicator = ValueInYear {
            name: "CO2|2080".to_string(),
            description: "".to_string(),
            variable: "Emissions|CO2".to_string(),
            year: Boundary::Year(2080),
            interpolate: false,
        };
        let ctx = ScenarioContext::new(&id, &ds, &meta);
        assert_eq!(indicator.evaluate(&ctx).unwrap()["CO2|2080"], MetaValue::Missing);

        indicator.interpolate = true;
        assert_eq!(indicator.evaluate(&ctx).unwrap()["CO2|2080"], MetaValue::Float(-1500.0));
    }

    #[test]
    fn value_in_meta_year() {
        let (ds, meta, id) = data();
        let indicator = ValueInYear {
            name: "CO2 at netzero".to_string(),
            description: "".to_string(),
            variable: "Emissions|CO2".to_string(),
            year: Boundary::Meta("year of netzero CO2 emissions".to_string()),
            interpolate: true,
        };
        assert_eq!(indicator.meta_inputs(), vec!["year of netzero CO2 emissions".to_string()]);
        let output = indicator.evaluate(&ScenarioContext::new(&id, &ds, &meta)).unwrap();
        // 2058 lies between 2020 and 2060
        let expected = 40000.0 + 38.0 * (-42000.0 / 40.0);
        assert!(is_close!(output["CO2 at netzero"].as_float().unwrap(), expected));
    }
}
