//! Cumulative sums of annual quantities
//!
//! Reported values are treated as the end points of linear segments. The sum
//! runs over every year in `[first_year, last_year]`, including both ends,
//! with values between reported years obtained by linear interpolation.
//!
//! For consecutive points $(y_0, x_0)$ and $(y_1, x_1)$ with $\Delta t = y_1 - y_0$
//! the years $y_0, \dots, y_1 - 1$ contribute
//!
//! $$ \frac{(\Delta t + 1) x_0 + (\Delta t - 1) x_1}{2} $$
//!
//! and the value in `last_year` is added once at the end.

use serde::{Deserialize, Serialize};
use sr15_core::errors::{SR15Error, SR15Result};
use sr15_core::indicator::{Indicator, IndicatorOutput, RequirementDefinition, ScenarioContext};
use sr15_core::meta::MetaValue;
use sr15_core::timeseries::{FloatValue, Timeseries, Year};

/// Points used to integrate `ts` over `[first_year, last_year]`
///
/// Values at the boundaries are interpolated if they are not reported.
pub(crate) fn interval_points(
    ts: &Timeseries,
    first_year: Year,
    last_year: Year,
) -> SR15Result<Vec<(Year, FloatValue)>> {
    if first_year > last_year {
        return Err(SR15Error::InvalidInterval {
            first_year,
            last_year,
        });
    }
    let out_of_domain = || SR15Error::OutOfDomain {
        first_year,
        last_year,
    };
    let first = ts.fill(first_year).ok_or_else(out_of_domain)?;
    let last = ts.fill(last_year).ok_or_else(out_of_domain)?;

    let mut points = vec![(first_year, first)];
    points.extend(
        ts.iter_valid()
            .filter(|(year, _)| *year > first_year && *year < last_year),
    );
    if last_year > first_year {
        points.push((last_year, last));
    }
    Ok(points)
}

/// Sum of `ts` over every year from `first_year` to `last_year` (inclusive)
///
/// Fails with [`SR15Error::OutOfDomain`] if either boundary lies outside the
/// reported years; values are never extrapolated.
///
/// ```rust
/// use sr15_core::timeseries::Timeseries;
/// use sr15_indicators::cumulative::cumulative;
///
/// let ts = Timeseries::from_pairs(&[(2016, 0.0), (2100, 84.0)], "Gt CO2/yr").unwrap();
/// assert_eq!(cumulative(&ts, 2016, 2100).unwrap(), 3570.0);
/// ```
pub fn cumulative(ts: &Timeseries, first_year: Year, last_year: Year) -> SR15Result<FloatValue> {
    let points = interval_points(ts, first_year, last_year)?;

    let mut value = 0.0;
    for pair in points.windows(2) {
        let ((yr, x_yr), (next_yr, x_next)) = (pair[0], pair[1]);
        let dt = (next_yr - yr) as FloatValue;
        value += ((dt - 1.0) * x_next + (dt + 1.0) * x_yr) / 2.0;
    }
    // the loop above does not include the last year
    let (_, x_last) = points[points.len() - 1];
    Ok(value + x_last)
}

/// End of the summation interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Boundary {
    Year(Year),
    /// A year stored as metadata, e.g. the year of peak warming
    ///
    /// An infinite value (a threshold that is never reached) is replaced by the
    /// last reported year of the series.
    Meta(String),
}

impl Boundary {
    pub(crate) fn resolve(&self, ctx: &ScenarioContext, ts: &Timeseries) -> SR15Result<Year> {
        match self {
            Boundary::Year(year) => Ok(*year),
            Boundary::Meta(name) => {
                let value = ctx.meta_float(name)?;
                if value.is_finite() {
                    Ok(value as Year)
                } else {
                    ts.valid_range()
                        .map(|(_, last)| last)
                        .ok_or_else(|| ctx.missing_meta(name))
                }
            }
        }
    }
}

/// Cumulative sum of a variable stored as scenario metadata
///
/// Values are multiplied by `factor` before summation, e.g. `0.001` to go from
/// Mt CO2/yr to Gt CO2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CumulativeIndicator {
    pub name: String,
    pub description: String,
    pub variable: String,
    pub unit: String,
    pub factor: FloatValue,
    pub first_year: Year,
    pub last_year: Boundary,
    /// Report zero if the variable is missing while this metadata is zero
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero_if_zero: Option<String>,
}

impl CumulativeIndicator {
    fn compute(&self, ctx: &ScenarioContext) -> SR15Result<FloatValue> {
        let ts = ctx.timeseries(&self.variable)?;
        let last_year = self.last_year.resolve(ctx, ts)?;
        let ts = ts.convert_unit(&self.unit, self.factor);
        cumulative(&ts, self.first_year, last_year)
    }
}

#[typetag::serde]
impl Indicator for CumulativeIndicator {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions = vec![RequirementDefinition::variable(&self.variable, &self.unit)];
        if let Boundary::Meta(name) = &self.last_year {
            definitions.push(RequirementDefinition::meta_input(name));
        }
        if let Some(name) = &self.zero_if_zero {
            definitions.push(RequirementDefinition::meta_input(name));
        }
        definitions.push(RequirementDefinition::meta_output(
            &self.name,
            &self.description,
        ));
        definitions
    }

    fn evaluate(&self, ctx: &ScenarioContext) -> SR15Result<IndicatorOutput> {
        let value = match (self.compute(ctx), &self.zero_if_zero) {
            (Ok(value), _) => value,
            (Err(err), Some(name)) => match ctx.meta_float(name) {
                Ok(reference) if reference == 0.0 => 0.0,
                _ => return Err(err),
            },
            (Err(err), None) => return Err(err),
        };
        Ok(IndicatorOutput::from([(
            self.name.clone(),
            MetaValue::Float(value),
        )]))
    }
}
