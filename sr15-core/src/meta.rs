//! Per-scenario metadata
//!
//! Categories and indicators are stored as named values attached to each scenario.
//! The [`MetaTable`] keeps the columns in the order they were declared, together
//! with a description of every column, so that the exported workbook documents
//! itself.

use crate::errors::{SR15Error, SR15Result};
use crate::scenario::ScenarioId;
use crate::timeseries::{FloatValue, Year};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single metadata value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Int(i64),
    Float(FloatValue),
    Text(String),
    /// The indicator could not be determined for this scenario
    Missing,
}

impl MetaValue {
    pub fn is_missing(&self) -> bool {
        match self {
            MetaValue::Missing => true,
            MetaValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the value
    ///
    /// Integers are widened; text and missing values yield `None`.
    pub fn as_float(&self) -> Option<FloatValue> {
        match self {
            MetaValue::Int(v) => Some(*v as FloatValue),
            MetaValue::Float(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetaValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Int(v) => write!(f, "{}", v),
            MetaValue::Float(v) if v.is_nan() => Ok(()),
            MetaValue::Float(v) if v.is_infinite() => {
                write!(f, "{}", if *v > 0.0 { "inf" } else { "-inf" })
            }
            MetaValue::Float(v) => write!(f, "{}", v),
            MetaValue::Text(v) => write!(f, "{}", v),
            MetaValue::Missing => Ok(()),
        }
    }
}

impl From<FloatValue> for MetaValue {
    fn from(value: FloatValue) -> Self {
        MetaValue::Float(value)
    }
}

impl From<Year> for MetaValue {
    fn from(value: Year) -> Self {
        MetaValue::Int(value as i64)
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Text(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Text(value)
    }
}

impl<T: Into<MetaValue>> From<Option<T>> for MetaValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(MetaValue::Missing, Into::into)
    }
}

/// Description of a metadata column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaDefinition {
    pub name: String,
    pub description: String,
}

impl MetaDefinition {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// Metadata for all scenarios of an assessment
///
/// Setting a value that already exists overwrites it, so evaluating the same
/// indicators twice yields the same table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetaTable {
    columns: IndexMap<String, String>,
    rows: BTreeMap<ScenarioId, IndexMap<String, MetaValue>>,
}

impl MetaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a column with its description
    ///
    /// Columns keep their original position if they are declared again.
    pub fn declare(&mut self, definition: &MetaDefinition) {
        self.columns
            .insert(definition.name.clone(), definition.description.clone());
    }

    /// Add a scenario without any metadata
    pub fn add_scenario(&mut self, id: &ScenarioId) {
        self.rows.entry(id.clone()).or_default();
    }

    pub fn set(&mut self, id: &ScenarioId, name: &str, value: MetaValue) {
        if !self.columns.contains_key(name) {
            self.columns.insert(name.to_string(), String::new());
        }
        self.rows
            .entry(id.clone())
            .or_default()
            .insert(name.to_string(), value);
    }

    pub fn get(&self, id: &ScenarioId, name: &str) -> Option<&MetaValue> {
        self.rows
            .get(id)
            .and_then(|row| row.get(name))
            .filter(|value| !value.is_missing())
    }

    /// Numeric value, failing with [`SR15Error::MissingMeta`] if absent
    pub fn require_float(&self, id: &ScenarioId, name: &str) -> SR15Result<FloatValue> {
        self.get(id, name)
            .and_then(MetaValue::as_float)
            .ok_or_else(|| SR15Error::MissingMeta {
                scenario: id.to_string(),
                name: name.to_string(),
            })
    }

    pub fn get_text(&self, id: &ScenarioId, name: &str) -> Option<&str> {
        self.get(id, name).and_then(MetaValue::as_text)
    }

    /// Values of one column for all scenarios that have it set
    pub fn column(&self, name: &str) -> impl Iterator<Item = (&ScenarioId, &MetaValue)> + '_ {
        let name = name.to_string();
        self.rows.iter().filter_map(move |(id, row)| {
            row.get(&name)
                .filter(|value| !value.is_missing())
                .map(|value| (id, value))
        })
    }

    /// Scenarios whose text value in `name` is one of `values`
    pub fn scenarios_with(&self, name: &str, values: &[&str]) -> Vec<&ScenarioId> {
        self.column(name)
            .filter(|(_, value)| value.as_text().is_some_and(|v| values.contains(&v)))
            .map(|(id, _)| id)
            .collect()
    }

    pub fn scenarios(&self) -> impl Iterator<Item = &ScenarioId> {
        self.rows.keys()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// `(column, description)` pairs in declaration order
    pub fn docs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(|(name, description)| (name.as_str(), description.as_str()))
    }

    /// Row of a scenario in column order, with gaps for unset columns
    pub fn row(&self, id: &ScenarioId) -> Vec<MetaValue> {
        let row = self.rows.get(id);
        self.columns
            .keys()
            .map(|name| {
                row.and_then(|r| r.get(name))
                    .cloned()
                    .unwrap_or(MetaValue::Missing)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// An auxiliary table documenting definitions used in the assessment
///
/// Examples are the category criteria, the marker scenarios and the
/// bibliographic references. Each table is exported as its own sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DefinitionTable {
    pub fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: vec![],
        }
    }

    pub fn push_row<S: AsRef<str>>(&mut self, row: &[S]) {
        self.rows
            .push(row.iter().map(|cell| cell.as_ref().to_string()).collect());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(MetaValue::from(2045), MetaValue::Int(2045));
        assert_eq!(MetaValue::from(1.5), MetaValue::Float(1.5));
        assert_eq!(MetaValue::from("in range"), MetaValue::Text("in range".to_string()));
        assert_eq!(MetaValue::from(None::<f64>), MetaValue::Missing);
        assert!(MetaValue::Float(f64::NAN).is_missing());
        assert_eq!(MetaValue::Int(2050).as_float(), Some(2050.0));
    }

    #[test]
    fn display() {
        assert_eq!(MetaValue::Float(f64::INFINITY).to_string(), "inf");
        assert_eq!(MetaValue::Missing.to_string(), "");
        assert_eq!(MetaValue::Float(1.25).to_string(), "1.25");
        assert_eq!(MetaValue::Int(2061).to_string(), "2061");
    }

    #[test]
    fn set_overwrites() {
        let id = ScenarioId::new("GCAM 4.2", "SSP1-19");
        let mut table = MetaTable::new();
        table.set(&id, "category", "uncategorized".into());
        table.set(&id, "category", "Below 1.5C".into());
        assert_eq!(table.get_text(&id, "category"), Some("Below 1.5C"));
        assert_eq!(table.columns().count(), 1);
    }

    #[test]
    fn column_order_follows_declaration() {
        let id = ScenarioId::new("GCAM 4.2", "SSP1-19");
        let mut table = MetaTable::new();
        table.declare(&MetaDefinition::new("category", "Categorization"));
        table.declare(&MetaDefinition::new("marker", "Illustrative pathways"));
        table.set(&id, "marker", "S1".into());
        table.set(&id, "category", "Below 1.5C".into());

        assert_eq!(table.columns().collect::<Vec<_>>(), vec!["category", "marker"]);
        assert_eq!(
            table.row(&id),
            vec![MetaValue::from("Below 1.5C"), MetaValue::from("S1")]
        );
        assert_eq!(table.docs().next(), Some(("category", "Categorization")));
    }

    #[test]
    fn missing_values_are_absent() {
        let id = ScenarioId::new("GCAM 4.2", "SSP1-19");
        let mut table = MetaTable::new();
        table.set(&id, "return year|1.5°C", MetaValue::Missing);
        assert_eq!(table.get(&id, "return year|1.5°C"), None);
        assert!(table.require_float(&id, "return year|1.5°C").unwrap_err().is_missing_data());
        assert_eq!(table.column("return year|1.5°C").count(), 0);
    }

    #[test]
    fn scenarios_with_values() {
        let a = ScenarioId::new("A", "1");
        let b = ScenarioId::new("B", "1");
        let mut table = MetaTable::new();
        table.set(&a, "category", "Below 1.5C".into());
        table.set(&b, "category", "Above 2C".into());
        assert_eq!(table.scenarios_with("category", &["Below 1.5C", "Lower 2C"]), vec![&a]);
    }

    #[test]
    fn definition_tables() {
        let mut table = DefinitionTable::new("marker scenarios", &["Marker", "Symbol"]);
        table.push_row(&["S1", "white square"]);
        assert_eq!(table.rows, vec![vec!["S1".to_string(), "white square".to_string()]]);
    }
}
