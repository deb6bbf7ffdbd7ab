//! # Feature Store Boundary
//!
//! `FeatureStore` is THE contract between feature handles and any backing
//! store. Everything a handle needs from its table is defined here.
//!
//! ## Implementations
//!
//! | Store | Module | Description |
//! |-------|--------|-------------|
//! | `FeatureTable` | `table` | Columnar in-memory reference implementation |

pub mod schema;
pub mod table;

pub use table::{FeatureTable, FeatureTableBuilder};

use crate::color::Color;
use crate::feature::FeatureId;
use crate::value::PropertyValue;

/// The universal per-feature store contract.
///
/// Every operation is synchronous and completes within the calling frame:
/// no suspension, no I/O, no retries. Mutations through any handle are
/// visible immediately to every other handle sharing the store.
///
/// Passing a feature index that is out of range for the store is a contract
/// violation by the constructing collaborator; stores index their columns
/// directly and do not validate or recover.
pub trait FeatureStore: Send + Sync + 'static {
    /// Number of features this store holds state for.
    fn feature_count(&self) -> usize;

    // ========================================================================
    // Visibility and tint
    // ========================================================================

    /// Current show flag of a feature. Defaults to `true` until written.
    fn show(&self, feature: FeatureId) -> bool;

    /// Overwrite the show flag of a feature.
    fn set_show(&self, feature: FeatureId, show: bool);

    /// Fill `out` with the current tint of a feature.
    ///
    /// The caller owns `out`; passing the same buffer on every call is the
    /// intended hot-path usage. Defaults to opaque white until written.
    fn color_into(&self, feature: FeatureId, out: &mut Color);

    /// Overwrite the tint of a feature. The value is copied into storage.
    fn set_color(&self, feature: FeatureId, color: Color);

    // ========================================================================
    // Metadata properties
    // ========================================================================

    /// Whether `property_id` names a property declared for this feature.
    /// Case-sensitive, no normalization.
    fn has_property(&self, feature: FeatureId, property_id: &str) -> bool;

    /// Look up a property by id, checking the structural scheme before the
    /// legacy scheme. Returns an owned copy; `None` means the property is
    /// not declared.
    fn property(&self, feature: FeatureId, property_id: &str) -> Option<PropertyValue>;

    /// Enumerate declared property ids into a caller-supplied buffer.
    ///
    /// `results` is cleared and refilled rather than replaced. Order is the
    /// store's own enumeration order and is stable across repeated calls on
    /// an unchanged store.
    fn property_ids_into(&self, feature: FeatureId, results: &mut Vec<String>);

    /// Write a property value, copying it into storage.
    ///
    /// Returns `false` (never an error) when the property is undeclared,
    /// declared read-only, or the value does not match the column's shape.
    fn set_property(&self, feature: FeatureId, property_id: &str, value: PropertyValue) -> bool;

    // ========================================================================
    // Semantic addressing (structural scheme only)
    // ========================================================================

    /// Whether the structural scheme declares a property under this
    /// semantic tag. Semantics are a namespace of their own, independent of
    /// property ids.
    fn has_property_by_semantic(&self, feature: FeatureId, semantic: &str) -> bool;

    /// Look up a property by semantic tag. Returns an owned copy.
    fn property_by_semantic(&self, feature: FeatureId, semantic: &str) -> Option<PropertyValue>;
}
