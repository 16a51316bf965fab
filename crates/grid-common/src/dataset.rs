//! In-memory representation of a decoded grid file.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::axis::{Axis, Dimension};
use crate::error::GridResult;
use crate::grid::Grid;

/// A variable attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Number(f64),
    Text(String),
}

impl AttrValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(value) => Some(*value),
            AttrValue::Text(_) => None,
        }
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Number(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

/// Values of an auxiliary coordinate or non-grid variable such as `time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CoordinateValues {
    /// Datetimes, interpreted as UTC.
    Temporal(Vec<NaiveDateTime>),
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl CoordinateValues {
    pub fn len(&self) -> usize {
        match self {
            CoordinateValues::Temporal(values) => values.len(),
            CoordinateValues::Numeric(values) => values.len(),
            CoordinateValues::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named 2-D field of raw samples with its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct DataVariable {
    pub name: String,
    pub values: Grid<f64>,
    pub attrs: BTreeMap<String, AttrValue>,
}

impl DataVariable {
    pub fn new(name: impl Into<String>, values: Grid<f64>) -> Self {
        Self {
            name: name.into(),
            values,
            attrs: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key)
    }
}

/// A decoded dataset: data variables sharing one latitude/longitude frame.
///
/// Data variables keep their insertion order; the first one is treated as
/// the primary field.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub data_vars: Vec<DataVariable>,
    pub latitude: Axis,
    pub longitude: Axis,
    /// Named coordinates (`time`, `valid_time`, ...).
    pub coords: BTreeMap<String, CoordinateValues>,
    /// Non-grid variables that are not declared as coordinates.
    pub variables: BTreeMap<String, CoordinateValues>,
}

impl Dataset {
    pub fn new(latitude: Axis, longitude: Axis) -> Self {
        Self {
            data_vars: Vec::new(),
            latitude,
            longitude,
            coords: BTreeMap::new(),
            variables: BTreeMap::new(),
        }
    }

    /// A dataset with no variables and empty axes.
    pub fn empty() -> Self {
        Self::new(Axis::Regular(Vec::new()), Axis::Regular(Vec::new()))
    }

    pub fn with_data_var(mut self, var: DataVariable) -> Self {
        self.data_vars.push(var);
        self
    }

    pub fn with_coord(mut self, name: impl Into<String>, values: CoordinateValues) -> Self {
        self.coords.insert(name.into(), values);
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, values: CoordinateValues) -> Self {
        self.variables.insert(name.into(), values);
        self
    }

    /// The first declared data variable, if any.
    pub fn primary_variable(&self) -> Option<&DataVariable> {
        self.data_vars.first()
    }

    /// Look up a variable by name: coordinates first, then other variables.
    pub fn coordinate_or_variable(&self, name: &str) -> Option<&CoordinateValues> {
        self.coords.get(name).or_else(|| self.variables.get(name))
    }

    /// Check that both axes line up with a `rows × cols` data grid.
    pub fn check_axes(&self, rows: usize, cols: usize) -> GridResult<()> {
        self.latitude
            .check_alignment("latitude", Dimension::Rows, rows, cols)?;
        self.longitude
            .check_alignment("longitude", Dimension::Columns, rows, cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_primary_variable_is_first_inserted() {
        let grid = Grid::new(1, 1, vec![0.0]).unwrap();
        let ds = Dataset::new(Axis::Regular(vec![0.0]), Axis::Regular(vec![0.0]))
            .with_data_var(DataVariable::new("zeta", grid.clone()))
            .with_data_var(DataVariable::new("alpha", grid));
        assert_eq!(ds.primary_variable().map(|v| v.name.as_str()), Some("zeta"));
    }

    #[test]
    fn test_empty_dataset_has_no_primary() {
        assert!(Dataset::empty().primary_variable().is_none());
    }

    #[test]
    fn test_coordinate_takes_precedence_over_variable() {
        let ds = Dataset::empty()
            .with_variable("time", CoordinateValues::Numeric(vec![1.0]))
            .with_coord("time", CoordinateValues::Temporal(vec![noon()]));
        assert_eq!(
            ds.coordinate_or_variable("time"),
            Some(&CoordinateValues::Temporal(vec![noon()]))
        );
    }

    #[test]
    fn test_variable_fallback() {
        let ds = Dataset::empty().with_variable("time", CoordinateValues::Temporal(vec![noon()]));
        assert!(ds.coordinate_or_variable("time").is_some());
        assert!(ds.coordinate_or_variable("step").is_none());
    }

    #[test]
    fn test_attr_lookup() {
        let var = DataVariable::new("t", Grid::new(0, 0, Vec::new()).unwrap())
            .with_attr("missing_value", -9999.0)
            .with_attr("units", "K");
        assert_eq!(var.attr("missing_value").and_then(AttrValue::as_f64), Some(-9999.0));
        assert_eq!(var.attr("units").and_then(AttrValue::as_f64), None);
    }
}
