// netsec-core/src/domain/project/schema.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Expected layout of the ingested table (`data_schema/schema.yaml`).
///
/// ```yaml
/// columns:
///   - having_IP_Address: int64
///   - Result: int64
/// numerical_columns:
///   - having_IP_Address
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct DataSchema {
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub numerical_columns: Vec<String>,
}

/// One `name: dtype` entry of the `columns` list.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct ColumnSpec {
    pub name: String,
    pub dtype: String,
}

impl TryFrom<BTreeMap<String, String>> for ColumnSpec {
    type Error = String;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut entries = map.into_iter();
        match (entries.next(), entries.next()) {
            (Some((name, dtype)), None) => Ok(ColumnSpec { name, dtype }),
            _ => Err("each schema column must be a single `name: dtype` entry".to_string()),
        }
    }
}

impl From<ColumnSpec> for BTreeMap<String, String> {
    fn from(spec: ColumnSpec) -> Self {
        BTreeMap::from([(spec.name, spec.dtype)])
    }
}

impl DataSchema {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Columns the drift check runs on. Falls back to every declared column
    /// when the schema lists no numerical columns.
    pub fn drift_columns(&self) -> Vec<&str> {
        if self.numerical_columns.is_empty() {
            self.column_names()
        } else {
            self.numerical_columns.iter().map(String::as_str).collect()
        }
    }

    /// Entries of `numerical_columns` that `columns` does not declare.
    pub fn undeclared_numerical_columns(&self) -> Vec<&str> {
        self.numerical_columns
            .iter()
            .filter(|n| !self.columns.iter().any(|c| &c.name == *n))
            .map(String::as_str)
            .collect()
    }

    /// Names declared by the schema and absent from `actual`, then names
    /// present in `actual` that the schema does not declare.
    pub fn diff(&self, actual: &[String]) -> (Vec<String>, Vec<String>) {
        let missing = self
            .columns
            .iter()
            .filter(|c| !actual.iter().any(|a| a == &c.name))
            .map(|c| c.name.clone())
            .collect();
        let unexpected = actual
            .iter()
            .filter(|a| !self.columns.iter().any(|c| &c.name == *a))
            .cloned()
            .collect();
        (missing, unexpected)
    }
}
