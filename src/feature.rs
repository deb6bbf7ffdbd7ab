//! Feature handles: per-feature accessors over a shared store.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::store::{FeatureStore, FeatureTable};
use crate::value::PropertyValue;
use crate::ModelId;

/// Index of one feature within its table.
///
/// Unique within a table, never re-keyed. A `FeatureId` that is out of
/// range for the table it is used against is a bug in the constructing
/// collaborator (picking or model loading), not something this layer
/// validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureId(pub u32);

impl FeatureId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to one pickable, independently styleable sub-part of a model.
///
/// A `Feature` owns no state of its own beyond its identity (the owning
/// model, the shared table, the feature index) and a scratch tint buffer.
/// Every accessor is one synchronous table lookup or mutation, so writes
/// through one handle are immediately visible through every other handle
/// on the same table.
///
/// Handles are created once per feature when a model is loaded or when
/// picking first resolves a feature, and simply go out of scope with the
/// model. A handle must not outlive its model; nothing here enforces that.
pub struct Feature<S: FeatureStore = FeatureTable> {
    model: ModelId,
    table: Arc<S>,
    feature_id: FeatureId,
    /// Allocated on first `color()` call, then refilled in place on every
    /// later call. Exclusively owned by this handle.
    color_scratch: Option<Box<Color>>,
}

impl<S: FeatureStore> Feature<S> {
    /// Construct a handle for `feature_id` within `table`.
    ///
    /// `feature_id` must be a valid index into `table` for the handle's
    /// entire lifetime.
    pub fn new(model: ModelId, table: Arc<S>, feature_id: FeatureId) -> Self {
        Self {
            model,
            table,
            feature_id,
            color_scratch: None,
        }
    }

    // ========================================================================
    // Identity
    // ========================================================================

    /// The model this feature is part of. Picking results use this to
    /// report what a hit belongs to; resolving the id after the model has
    /// been destroyed is a precondition violation.
    pub fn model(&self) -> ModelId {
        self.model
    }

    pub fn feature_id(&self) -> FeatureId {
        self.feature_id
    }

    /// The backing store. For internal collaborators, not part of the
    /// styling/picking surface.
    pub fn table(&self) -> &Arc<S> {
        &self.table
    }

    // ========================================================================
    // Visibility and tint
    // ========================================================================

    /// Whether the feature will be rendered. `true` until a styling pass
    /// or an explicit `set_shown` changes it.
    pub fn is_shown(&self) -> bool {
        self.table.show(self.feature_id)
    }

    pub fn set_shown(&self, show: bool) {
        self.table.set_show(self.feature_id, show);
    }

    /// The current tint, opaque white when never set.
    ///
    /// The returned reference points into a scratch buffer owned by this
    /// handle: it is allocated on the first call and refilled in place on
    /// every later call, so a picking/readback loop reading colors each
    /// frame never allocates. The buffer always holds the table's current
    /// value at the time of the call.
    pub fn color(&mut self) -> &Color {
        let scratch = self
            .color_scratch
            .get_or_insert_with(|| Box::new(Color::WHITE));
        self.table.color_into(self.feature_id, scratch);
        scratch
    }

    /// Set the tint. The value is copied into the table; the table never
    /// aliases caller state.
    pub fn set_color(&self, color: Color) {
        self.table.set_color(self.feature_id, color);
    }

    // ========================================================================
    // Metadata properties
    // ========================================================================

    /// Whether `name` is a declared property id for this feature.
    /// Case-sensitive, no normalization.
    pub fn has_property(&self, name: &str) -> bool {
        self.table.has_property(self.feature_id, name)
    }

    /// Look up a property by id. Returns an owned copy; mutating the
    /// result cannot corrupt table state. `None` is the routine outcome
    /// for an undeclared name, not an error.
    pub fn property(&self, name: &str) -> Option<PropertyValue> {
        self.table.property(self.feature_id, name)
    }

    /// Look up a property with semantic precedence.
    ///
    /// Resolution runs exactly two tiers:
    ///
    /// 1. If the structural scheme declares a property under the semantic
    ///    tag `name`, that value is returned.
    /// 2. Otherwise the plain property-id path of [`property`](Self::property)
    ///    is consulted, with no semantic indirection.
    ///
    /// A semantic match always wins over a property id of the same
    /// spelling: semantics name the standard concept unambiguously even
    /// when the structural and legacy schemes expose overlapping ids.
    /// Semantic tags and property ids are independent namespaces: a
    /// property id never resolves through tier 1, and a semantic tag never
    /// resolves through tier 2 unless a property id happens to share its
    /// spelling.
    pub fn property_inherited(&self, name: &str) -> Option<PropertyValue> {
        if self.table.has_property_by_semantic(self.feature_id, name) {
            return self.table.property_by_semantic(self.feature_id, name);
        }
        self.table.property(self.feature_id, name)
    }

    /// Declared property ids, in the table's enumeration order.
    pub fn property_ids(&self) -> Vec<String> {
        let mut results = Vec::new();
        self.property_ids_into(&mut results);
        results
    }

    /// Like [`property_ids`](Self::property_ids), but clears and refills a
    /// caller-supplied buffer so hot picking loops can reuse one
    /// allocation.
    pub fn property_ids_into(&self, results: &mut Vec<String>) {
        self.table.property_ids_into(self.feature_id, results);
    }

    /// Write a property value, copying it into the table.
    ///
    /// Returns `false` when the table rejects the write: the property is
    /// read-only (e.g. derived from a feature hierarchy), undeclared, or
    /// the value does not match the column's shape. Rejection is
    /// reportable but non-fatal; callers decide whether to surface it.
    pub fn set_property(&self, name: &str, value: PropertyValue) -> bool {
        self.table.set_property(self.feature_id, name, value)
    }
}

impl<S: FeatureStore> fmt::Debug for Feature<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("model", &self.model)
            .field("feature_id", &self.feature_id)
            .finish_non_exhaustive()
    }
}
