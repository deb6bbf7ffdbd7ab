//! Columnar in-memory feature table.
//!
//! This is the reference implementation of `FeatureStore`. Show flags and
//! tints live in plain per-feature arrays; metadata lives in per-property
//! columns under two addressing schemes:
//!
//! - **structural**: the current scheme. Columns may carry a semantic tag
//!   (a closed, schema-defined namespace mapped onto property ids) and a
//!   read-only flag for derived columns.
//! - **legacy**: the predecessor scheme. Property ids only, always writable.
//!
//! Property-id lookup checks structural columns before legacy columns;
//! semantic lookup only ever consults the structural scheme.
//!
//! ## Limitations
//!
//! - **Single logical thread**: per-collection locks keep individual reads
//!   and writes consistent, but the execution model is one thread driving
//!   scene updates and picking. There is no multi-writer coordination.
//! - **Fixed schema**: columns are declared at build time. `set_property`
//!   never creates a column; writes to undeclared ids report `false`.

use hashbrown::HashMap;
use parking_lot::RwLock;

use super::FeatureStore;
use crate::color::Color;
use crate::feature::FeatureId;
use crate::value::{PropertyKind, PropertyValue};
use crate::{Error, Result};

// ============================================================================
// Column
// ============================================================================

/// One per-property column. The declaration (id, flags, shape) is fixed at
/// build time; only the values mutate. Semantic tags live in the table's
/// semantic index, not on the column.
#[derive(Debug)]
struct Column {
    id: String,
    read_only: bool,
    /// Shape shared by every value in the column. `None` only for tables
    /// with zero features, where no value can ever be read or written.
    kind: Option<PropertyKind>,
    values: RwLock<Vec<PropertyValue>>,
}

impl Column {
    fn value(&self, feature: FeatureId) -> PropertyValue {
        self.values.read()[feature.index()].clone()
    }

    /// Write one slot, rejecting values that do not match the column shape.
    fn write(&self, feature: FeatureId, value: PropertyValue) -> bool {
        match self.kind {
            Some(kind) if kind == value.kind() => {
                self.values.write()[feature.index()] = value;
                true
            }
            _ => false,
        }
    }
}

// ============================================================================
// FeatureTable
// ============================================================================

/// Columnar per-feature store shared by all handles of one model.
#[derive(Debug)]
pub struct FeatureTable {
    feature_count: usize,
    show: RwLock<Vec<bool>>,
    color: RwLock<Vec<Color>>,
    structural: Vec<Column>,
    legacy: Vec<Column>,
    /// property id → position in `structural`
    structural_index: HashMap<String, usize>,
    /// property id → position in `legacy`
    legacy_index: HashMap<String, usize>,
    /// semantic tag → position in `structural`
    semantic_index: HashMap<String, usize>,
}

impl FeatureTable {
    /// Start declaring a table for `feature_count` features.
    pub fn builder(feature_count: usize) -> FeatureTableBuilder {
        FeatureTableBuilder::new(feature_count)
    }

    /// An empty table: show/color state only, no metadata columns.
    pub fn empty(feature_count: usize) -> Self {
        FeatureTableBuilder::new(feature_count)
            .build()
            .expect("empty table declarations cannot conflict")
    }
}

// ============================================================================
// FeatureStore impl
// ============================================================================

impl FeatureStore for FeatureTable {
    fn feature_count(&self) -> usize {
        self.feature_count
    }

    // ========================================================================
    // Visibility and tint
    // ========================================================================

    fn show(&self, feature: FeatureId) -> bool {
        self.show.read()[feature.index()]
    }

    fn set_show(&self, feature: FeatureId, show: bool) {
        self.show.write()[feature.index()] = show;
    }

    fn color_into(&self, feature: FeatureId, out: &mut Color) {
        *out = self.color.read()[feature.index()];
    }

    fn set_color(&self, feature: FeatureId, color: Color) {
        self.color.write()[feature.index()] = color;
    }

    // ========================================================================
    // Metadata properties
    // ========================================================================

    fn has_property(&self, _feature: FeatureId, property_id: &str) -> bool {
        self.structural_index.contains_key(property_id)
            || self.legacy_index.contains_key(property_id)
    }

    fn property(&self, feature: FeatureId, property_id: &str) -> Option<PropertyValue> {
        if let Some(&pos) = self.structural_index.get(property_id) {
            return Some(self.structural[pos].value(feature));
        }
        if let Some(&pos) = self.legacy_index.get(property_id) {
            return Some(self.legacy[pos].value(feature));
        }
        None
    }

    fn property_ids_into(&self, _feature: FeatureId, results: &mut Vec<String>) {
        results.clear();
        for column in &self.structural {
            results.push(column.id.clone());
        }
        for column in &self.legacy {
            // Legacy ids shadowed by a structural column of the same
            // spelling resolve to the structural value; listing them twice
            // would misreport the namespace.
            if !self.structural_index.contains_key(&column.id) {
                results.push(column.id.clone());
            }
        }
    }

    fn set_property(&self, feature: FeatureId, property_id: &str, value: PropertyValue) -> bool {
        if let Some(&pos) = self.structural_index.get(property_id) {
            let column = &self.structural[pos];
            if column.read_only {
                return false;
            }
            return column.write(feature, value);
        }
        if let Some(&pos) = self.legacy_index.get(property_id) {
            return self.legacy[pos].write(feature, value);
        }
        false
    }

    // ========================================================================
    // Semantic addressing
    // ========================================================================

    fn has_property_by_semantic(&self, _feature: FeatureId, semantic: &str) -> bool {
        self.semantic_index.contains_key(semantic)
    }

    fn property_by_semantic(&self, feature: FeatureId, semantic: &str) -> Option<PropertyValue> {
        self.semantic_index
            .get(semantic)
            .map(|&pos| self.structural[pos].value(feature))
    }
}

// ============================================================================
// Builder
// ============================================================================

/// One pending column declaration inside the builder.
struct ColumnDecl {
    id: String,
    semantic: Option<String>,
    read_only: bool,
    values: Vec<PropertyValue>,
}

/// Declares and validates a `FeatureTable`.
///
/// Declaration order is the table's enumeration order. All validation
/// happens in [`build`](FeatureTableBuilder::build): column lengths must
/// match the feature count, every value in a column must share one shape,
/// vector columns must have 2–4 components, and ids/semantics must be
/// unique within their scheme.
pub struct FeatureTableBuilder {
    feature_count: usize,
    structural: Vec<ColumnDecl>,
    legacy: Vec<ColumnDecl>,
}

impl FeatureTableBuilder {
    pub fn new(feature_count: usize) -> Self {
        Self {
            feature_count,
            structural: Vec::new(),
            legacy: Vec::new(),
        }
    }

    /// Declare a writable structural column with no semantic tag.
    pub fn structural_property(
        mut self,
        id: impl Into<String>,
        values: Vec<PropertyValue>,
    ) -> Self {
        self.structural.push(ColumnDecl {
            id: id.into(),
            semantic: None,
            read_only: false,
            values,
        });
        self
    }

    /// Declare a writable structural column addressable by a semantic tag.
    pub fn semantic_property(
        mut self,
        id: impl Into<String>,
        semantic: impl Into<String>,
        values: Vec<PropertyValue>,
    ) -> Self {
        self.structural.push(ColumnDecl {
            id: id.into(),
            semantic: Some(semantic.into()),
            read_only: false,
            values,
        });
        self
    }

    /// Declare a read-only structural column, e.g. one derived from a
    /// feature hierarchy rather than stored per feature.
    pub fn derived_property(
        mut self,
        id: impl Into<String>,
        semantic: Option<&str>,
        values: Vec<PropertyValue>,
    ) -> Self {
        self.structural.push(ColumnDecl {
            id: id.into(),
            semantic: semantic.map(str::to_owned),
            read_only: true,
            values,
        });
        self
    }

    /// Declare a legacy-scheme column. Always writable, never semantic.
    pub fn legacy_property(mut self, id: impl Into<String>, values: Vec<PropertyValue>) -> Self {
        self.legacy.push(ColumnDecl {
            id: id.into(),
            semantic: None,
            read_only: false,
            values,
        });
        self
    }

    pub fn build(self) -> Result<FeatureTable> {
        let feature_count = self.feature_count;

        let mut structural = Vec::with_capacity(self.structural.len());
        let mut structural_index = HashMap::new();
        let mut semantic_index = HashMap::new();
        for decl in self.structural {
            if let Some(semantic) = &decl.semantic {
                if semantic_index.contains_key(semantic) {
                    return Err(Error::DuplicateSemantic(semantic.clone()));
                }
                semantic_index.insert(semantic.clone(), structural.len());
            }
            let column = validate_column(feature_count, decl)?;
            if structural_index.contains_key(&column.id) {
                return Err(Error::DuplicateProperty(column.id));
            }
            structural_index.insert(column.id.clone(), structural.len());
            structural.push(column);
        }

        let mut legacy = Vec::with_capacity(self.legacy.len());
        let mut legacy_index = HashMap::new();
        for decl in self.legacy {
            let column = validate_column(feature_count, decl)?;
            if legacy_index.contains_key(&column.id) {
                return Err(Error::DuplicateProperty(column.id));
            }
            legacy_index.insert(column.id.clone(), legacy.len());
            legacy.push(column);
        }

        Ok(FeatureTable {
            feature_count,
            show: RwLock::new(vec![true; feature_count]),
            color: RwLock::new(vec![Color::WHITE; feature_count]),
            structural,
            legacy,
            structural_index,
            legacy_index,
            semantic_index,
        })
    }
}

fn validate_column(feature_count: usize, decl: ColumnDecl) -> Result<Column> {
    if decl.values.len() != feature_count {
        return Err(Error::ColumnLength {
            id: decl.id,
            expected: feature_count,
            got: decl.values.len(),
        });
    }

    let kind = decl.values.first().map(PropertyValue::kind);
    if let Some(first) = kind {
        for value in &decl.values {
            if value.kind() != first {
                return Err(Error::MixedColumn {
                    id: decl.id,
                    first,
                    second: value.kind(),
                });
            }
        }
        if let PropertyKind::Vector(arity) = first {
            if !(2..=4).contains(&arity) {
                return Err(Error::VectorArity { id: decl.id, arity });
            }
        }
    }

    Ok(Column {
        id: decl.id,
        read_only: decl.read_only,
        kind,
        values: RwLock::new(decl.values),
    })
}

// ============================================================================
// Tests
// ============================================================================
