//! Property values stored in a feature table.

use std::fmt;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Fixed-length numeric vector payload. Columns declare an arity of 2–4
/// components; up to four live inline without a heap allocation.
pub type VectorValue = SmallVec<[f64; 4]>;

/// A metadata value attached to one feature.
///
/// This is a closed set; consumers pattern-match exhaustively instead of
/// inspecting shapes at runtime:
/// - Scalars: Bool, Int, Float, String
/// - Fixed-length numeric vectors (2–4 components)
/// - Nested structs (string-keyed, values of any variant)
///
/// Absence of a property is expressed by `Option::None` at the lookup site,
/// never by a dedicated variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Vector(VectorValue),
    Struct(HashMap<String, PropertyValue>),
}

/// Shape discriminant of a property value. Every column of a feature table
/// holds values of exactly one kind; vector kinds carry their arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    Bool,
    Int,
    Float,
    String,
    Vector(usize),
    Struct,
}

// ============================================================================
// Type checking
// ============================================================================

impl PropertyValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Bool(_) => "BOOLEAN",
            PropertyValue::Int(_) => "INTEGER",
            PropertyValue::Float(_) => "FLOAT",
            PropertyValue::String(_) => "STRING",
            PropertyValue::Vector(_) => "VECTOR",
            PropertyValue::Struct(_) => "STRUCT",
        }
    }

    /// The shape of this value, as checked against a column declaration.
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Bool(_) => PropertyKind::Bool,
            PropertyValue::Int(_) => PropertyKind::Int,
            PropertyValue::Float(_) => PropertyKind::Float,
            PropertyValue::String(_) => PropertyKind::String,
            PropertyValue::Vector(v) => PropertyKind::Vector(v.len()),
            PropertyValue::Struct(_) => PropertyKind::Struct,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, PropertyValue::Int(_) | PropertyValue::Float(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, PropertyValue::String(_))
    }

    /// Attempt to extract as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempt to extract as i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(i) => Some(*i),
            PropertyValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// Attempt to extract as f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            PropertyValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Attempt to extract as &str
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempt to extract as a vector slice
    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            PropertyValue::Vector(v) => Some(v),
            _ => None,
        }
    }

    /// Attempt to extract as a struct map
    pub fn as_struct(&self) -> Option<&HashMap<String, PropertyValue>> {
        match self {
            PropertyValue::Struct(m) => Some(m),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for PropertyValue { fn from(v: bool) -> Self { PropertyValue::Bool(v) } }
impl From<i32> for PropertyValue { fn from(v: i32) -> Self { PropertyValue::Int(v as i64) } }
impl From<i64> for PropertyValue { fn from(v: i64) -> Self { PropertyValue::Int(v) } }
impl From<f64> for PropertyValue { fn from(v: f64) -> Self { PropertyValue::Float(v) } }
impl From<String> for PropertyValue { fn from(v: String) -> Self { PropertyValue::String(v) } }
impl From<&str> for PropertyValue { fn from(v: &str) -> Self { PropertyValue::String(v.to_owned()) } }
impl From<[f64; 2]> for PropertyValue {
    fn from(v: [f64; 2]) -> Self { PropertyValue::Vector(SmallVec::from_slice(&v)) }
}
impl From<[f64; 3]> for PropertyValue {
    fn from(v: [f64; 3]) -> Self { PropertyValue::Vector(SmallVec::from_slice(&v)) }
}
impl From<[f64; 4]> for PropertyValue {
    fn from(v: [f64; 4]) -> Self { PropertyValue::Vector(SmallVec::from_slice(&v)) }
}
impl<K, V> From<Vec<(K, V)>> for PropertyValue
where
    K: Into<String>,
    V: Into<PropertyValue>,
{
    fn from(fields: Vec<(K, V)>) -> Self {
        PropertyValue::Struct(fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Int(i) => write!(f, "{i}"),
            PropertyValue::Float(v) => write!(f, "{v}"),
            PropertyValue::String(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            PropertyValue::Vector(v) => {
                write!(f, "[")?;
                for (i, c) in v.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{c}")?;
                }
                write!(f, "]")
            }
            PropertyValue::Struct(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKind::Bool => write!(f, "BOOLEAN"),
            PropertyKind::Int => write!(f, "INTEGER"),
            PropertyKind::Float => write!(f, "FLOAT"),
            PropertyKind::String => write!(f, "STRING"),
            PropertyKind::Vector(n) => write!(f, "VECTOR[{n}]"),
            PropertyKind::Struct => write!(f, "STRUCT"),
        }
    }
}
