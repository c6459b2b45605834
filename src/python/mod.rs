use indexmap::IndexMap;
use numpy::PyReadonlyArray1;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pythonize::pythonize;
use serde::Serialize;
use sr15_core::errors::SR15Error;
use sr15_core::io::{IamcReader, ReferenceReader};
use sr15_core::meta::{DefinitionTable, MetaValue};
use sr15_core::timeseries::{FloatValue, TimeAxis, Timeseries, Year};
use sr15_indicators::category::{classify as classify_scenario, ClassifierInput};
use sr15_indicators::npv::{Compounding, WeightCache};
use sr15_indicators::{assess as run_assessment, AssessmentConfig};
use std::path::PathBuf;
use std::sync::Arc;

fn value_error(err: SR15Error) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn timeseries(years: Vec<Year>, values: PyReadonlyArray1<'_, FloatValue>) -> PyResult<Timeseries> {
    let time_axis = TimeAxis::from_values(years.into_iter().collect()).map_err(value_error)?;
    Timeseries::new(values.as_array().to_owned(), Arc::new(time_axis), "").map_err(value_error)
}

/// Exceedance year, return year and number of overshoot years of `threshold`
#[pyfunction]
fn exceedance<'py>(
    years: Vec<Year>,
    values: PyReadonlyArray1<'py, FloatValue>,
    threshold: FloatValue,
) -> PyResult<(Option<Year>, Option<Year>, Option<i32>)> {
    let crossing = sr15_indicators::exceedance::exceedance(&timeseries(years, values)?, threshold);
    Ok((
        crossing.exceedance_year,
        crossing.return_year,
        crossing.overshoot_years,
    ))
}

#[pyfunction]
fn overshoot_severity<'py>(
    years: Vec<Year>,
    values: PyReadonlyArray1<'py, FloatValue>,
    threshold: FloatValue,
) -> PyResult<Option<FloatValue>> {
    let ts = timeseries(years, values)?;
    let crossing = sr15_indicators::exceedance::exceedance(&ts, threshold);
    sr15_indicators::overshoot::overshoot_severity(
        &ts,
        crossing.exceedance_year,
        crossing.return_year,
        threshold,
    )
    .map_err(value_error)
}

/// Sum of the annual values from `first_year` to `last_year`, interpolating gaps
#[pyfunction]
fn cumulative<'py>(
    years: Vec<Year>,
    values: PyReadonlyArray1<'py, FloatValue>,
    first_year: Year,
    last_year: Year,
) -> PyResult<FloatValue> {
    sr15_indicators::cumulative::cumulative(&timeseries(years, values)?, first_year, last_year)
        .map_err(value_error)
}

/// First year below `threshold`, `inf` if the series never drops below it
#[pyfunction]
#[pyo3(signature = (years, values, threshold=0.0))]
fn year_of_net_zero<'py>(
    years: Vec<Year>,
    values: PyReadonlyArray1<'py, FloatValue>,
    threshold: FloatValue,
) -> PyResult<Option<FloatValue>> {
    let year = sr15_indicators::net_zero::year_of_net_zero(&timeseries(years, values)?, threshold);
    Ok(year.and_then(|year| MetaValue::from(year).as_float()))
}

/// Average net-present value of a series discounted to `discount_year`
#[pyfunction]
#[pyo3(signature = (years, values, rate, discount_year, first_year, last_year, continuous=false))]
#[allow(clippy::too_many_arguments)]
fn npv<'py>(
    years: Vec<Year>,
    values: PyReadonlyArray1<'py, FloatValue>,
    rate: FloatValue,
    discount_year: Year,
    first_year: Year,
    last_year: Year,
    continuous: bool,
) -> PyResult<FloatValue> {
    let compounding = if continuous {
        Compounding::Continuous
    } else {
        Compounding::Annual
    };
    let discounted = sr15_indicators::npv::discount(&timeseries(years, values)?, rate, discount_year);
    sr15_indicators::npv::npv_weighted(
        &discounted,
        first_year,
        last_year,
        rate,
        compounding,
        &mut WeightCache::new(),
    )
    .map_err(value_error)
}

/// Subcategory of a scenario from its exceedance probabilities
#[pyfunction]
#[pyo3(signature = (p15_max=None, p15_2100=None, p20_max=None, has_co2_2100=true, is_reference=false))]
fn classify(
    p15_max: Option<FloatValue>,
    p15_2100: Option<FloatValue>,
    p20_max: Option<FloatValue>,
    has_co2_2100: bool,
    is_reference: bool,
) -> (String, String) {
    let subcategory = classify_scenario(&ClassifierInput {
        is_reference,
        has_co2_2100,
        p15_max,
        p15_2100,
        p20_max,
    });
    (
        subcategory.category().label().to_string(),
        subcategory.label().to_string(),
    )
}

#[derive(Serialize)]
struct AssessmentOutput {
    meta: Vec<IndexMap<String, MetaValue>>,
    docs: IndexMap<String, String>,
    tables: Vec<DefinitionTable>,
}

/// Run the assessment on a scenario file
///
/// `config` is the content of a TOML configuration. Returns a dict with the
/// metadata rows, the column descriptions and the definition tables.
#[pyfunction]
#[pyo3(signature = (data, references=None, config=None))]
fn assess(
    py: Python<'_>,
    data: PathBuf,
    references: Option<PathBuf>,
    config: Option<String>,
) -> PyResult<PyObject> {
    let config = match config {
        Some(content) => AssessmentConfig::from_toml(&content).map_err(value_error)?,
        None => AssessmentConfig::default(),
    };
    let dataset = IamcReader::new(&data)
        .with_region(&config.region)
        .read()
        .map_err(value_error)?;
    let references = references
        .map(|path| ReferenceReader::new(&path).read())
        .transpose()
        .map_err(value_error)?;

    let assessment = run_assessment(config, &dataset, references).map_err(value_error)?;
    let meta = &assessment.meta;
    let output = AssessmentOutput {
        meta: meta
            .scenarios()
            .map(|id| {
                let mut row = IndexMap::new();
                row.insert("model".to_string(), MetaValue::from(id.model.as_str()));
                row.insert("scenario".to_string(), MetaValue::from(id.scenario.as_str()));
                row.extend(meta.columns().map(str::to_string).zip(meta.row(id)));
                row
            })
            .collect(),
        docs: meta
            .docs()
            .map(|(name, description)| (name.to_string(), description.to_string()))
            .collect(),
        tables: assessment.tables,
    };
    Ok(pythonize(py, &output)?.into())
}

#[pymodule]
#[pyo3(name = "_lib")]
fn sr15(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_function(wrap_pyfunction!(exceedance, m)?)?;
    m.add_function(wrap_pyfunction!(overshoot_severity, m)?)?;
    m.add_function(wrap_pyfunction!(cumulative, m)?)?;
    m.add_function(wrap_pyfunction!(year_of_net_zero, m)?)?;
    m.add_function(wrap_pyfunction!(npv, m)?)?;
    m.add_function(wrap_pyfunction!(classify, m)?)?;
    m.add_function(wrap_pyfunction!(assess, m)?)?;
    Ok(())
}
