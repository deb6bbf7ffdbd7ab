//! JSON feature-table documents.
//!
//! Model-loading pipelines deliver per-feature metadata as a JSON document
//! alongside the mesh data. The types here mirror that wire shape;
//! [`FeatureTable::from_json`] turns a document into a validated table.
//!
//! Values arrive as natural JSON: numbers, strings, bools, numeric arrays
//! for vectors, objects for structs. There is no null: absent data is
//! expressed by omitting the property column entirely.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::table::FeatureTable;
use crate::value::{PropertyValue, VectorValue};
use crate::{Error, Result};

/// Top-level table document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDocument {
    pub feature_count: usize,
    /// Structural-scheme columns, in declaration order.
    #[serde(default)]
    pub properties: Vec<PropertyDocument>,
    /// Legacy-scheme columns, in declaration order.
    #[serde(default)]
    pub legacy: Vec<LegacyPropertyDocument>,
}

/// One structural-scheme column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDocument {
    pub id: String,
    #[serde(default)]
    pub semantic: Option<String>,
    #[serde(default)]
    pub read_only: bool,
    pub values: Vec<serde_json::Value>,
}

/// One legacy-scheme column. No semantics, never read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPropertyDocument {
    pub id: String,
    pub values: Vec<serde_json::Value>,
}

impl TableDocument {
    /// Convert the document into a validated table.
    pub fn into_table(self) -> Result<FeatureTable> {
        let mut builder = FeatureTable::builder(self.feature_count);

        for property in self.properties {
            let values = convert_values(&property.id, &property.values)?;
            builder = if property.read_only {
                builder.derived_property(property.id, property.semantic.as_deref(), values)
            } else if let Some(semantic) = property.semantic {
                builder.semantic_property(property.id, semantic, values)
            } else {
                builder.structural_property(property.id, values)
            };
        }

        for property in self.legacy {
            let values = convert_values(&property.id, &property.values)?;
            builder = builder.legacy_property(property.id, values);
        }

        builder.build()
    }
}

impl FeatureTable {
    /// Parse and validate a JSON table document.
    pub fn from_json(json: &str) -> Result<FeatureTable> {
        let document: TableDocument = serde_json::from_str(json)?;
        tracing::debug!(
            feature_count = document.feature_count,
            structural = document.properties.len(),
            legacy = document.legacy.len(),
            "loading feature table document"
        );
        document.into_table()
    }
}

fn convert_values(id: &str, raw: &[serde_json::Value]) -> Result<Vec<PropertyValue>> {
    raw.iter().map(|value| convert_value(id, value)).collect()
}

/// Map one natural JSON value onto the closed `PropertyValue` set.
fn convert_value(id: &str, raw: &serde_json::Value) -> Result<PropertyValue> {
    use serde_json::Value as Json;

    match raw {
        Json::Bool(b) => Ok(PropertyValue::Bool(*b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(PropertyValue::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(PropertyValue::Float(f))
            } else {
                Err(unsupported(id, format!("unrepresentable number {n}")))
            }
        }
        Json::String(s) => Ok(PropertyValue::String(s.clone())),
        Json::Array(items) => {
            let mut components: VectorValue = SmallVec::with_capacity(items.len());
            for item in items {
                let component = item
                    .as_f64()
                    .ok_or_else(|| unsupported(id, "arrays must hold numbers only".into()))?;
                components.push(component);
            }
            Ok(PropertyValue::Vector(components))
        }
        Json::Object(fields) => {
            let mut map = hashbrown::HashMap::with_capacity(fields.len());
            for (key, value) in fields {
                map.insert(key.clone(), convert_value(id, value)?);
            }
            Ok(PropertyValue::Struct(map))
        }
        Json::Null => Err(unsupported(id, "null (omit the property instead)".into())),
    }
}

fn unsupported(id: &str, reason: String) -> Error {
    Error::UnsupportedValue { id: id.to_owned(), reason }
}
