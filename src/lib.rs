//! # scene-features — Per-Feature Metadata Accessors
//!
//! The metadata accessor layer for a rendered 3D model: one lightweight
//! [`Feature`] handle per pickable sub-object (mesh instance, glTF node,
//! batched primitive), backed by a shared [`FeatureTable`].
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: [`FeatureStore`] is the contract between handles and storage
//! 2. **Clean DTOs**: [`Color`], [`PropertyValue`], ids cross all boundaries
//! 3. **Handles own nothing**: every accessor is one synchronous table call
//! 4. **Two-tier resolution**: semantic tags win over raw property ids
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_features::{FeatureId, FeatureStyle, FeatureTable, Model, ModelId, PropertyValue};
//!
//! # fn example() -> scene_features::Result<()> {
//! let table = FeatureTable::builder(2)
//!     .semantic_property("height", "HEIGHT", vec![
//!         PropertyValue::Float(12.5),
//!         PropertyValue::Float(30.0),
//!     ])
//!     .build()?;
//! let model = Model::with_table(ModelId(1), table);
//!
//! // Per-feature accessors for picking and styling.
//! let feature = model.feature(FeatureId(0));
//! assert!(feature.is_shown());
//! assert_eq!(feature.property_inherited("HEIGHT"), Some(PropertyValue::Float(12.5)));
//!
//! // A styling pass hides the whole model uniformly.
//! model.apply_style(&FeatureStyle::new().with_show(false));
//! assert!(!feature.is_shown());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Stores
//!
//! | Store | Description |
//! |-------|-------------|
//! | [`FeatureTable`] | Columnar in-memory store, structural + legacy schemes |

// ============================================================================
// Modules
// ============================================================================

pub mod color;
pub mod feature;
pub mod store;
pub mod style;
pub mod value;

// ============================================================================
// Re-exports: DTOs
// ============================================================================

pub use color::Color;
pub use feature::{Feature, FeatureId};
pub use value::{PropertyKind, PropertyValue, VectorValue};

// ============================================================================
// Re-exports: Store
// ============================================================================

pub use store::schema::TableDocument;
pub use store::{FeatureStore, FeatureTable, FeatureTableBuilder};

// ============================================================================
// Re-exports: Styling
// ============================================================================

pub use style::FeatureStyle;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ============================================================================
// Model identity
// ============================================================================

/// Opaque identifier of an owning rendered-model entity.
///
/// Handles carry a `ModelId` instead of a reference so they never extend
/// the model's lifetime or form a cycle with it. Resolving the id against
/// a registry after the model's destruction is a precondition violation by
/// the caller; nothing here guards against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelId(pub u64);

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Top-level Model handle
// ============================================================================

/// A rendered model's feature state: a [`ModelId`] paired with the shared
/// store all of its feature handles delegate to.
#[derive(Debug)]
pub struct Model<S: FeatureStore = FeatureTable> {
    id: ModelId,
    table: Arc<S>,
}

impl<S: FeatureStore> Model<S> {
    /// Wrap a store, taking ownership.
    pub fn with_table(id: ModelId, table: S) -> Self {
        Self { id, table: Arc::new(table) }
    }

    /// Wrap a store that is already shared with other collaborators.
    pub fn with_shared_table(id: ModelId, table: Arc<S>) -> Self {
        Self { id, table }
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    /// Access the underlying store (for internal collaborators).
    pub fn table(&self) -> &Arc<S> {
        &self.table
    }

    pub fn feature_count(&self) -> usize {
        self.table.feature_count()
    }

    /// A handle for one feature. `feature_id` must be in range for the
    /// table; this is the constructing collaborator's contract to uphold.
    pub fn feature(&self, feature_id: FeatureId) -> Feature<S> {
        Feature::new(self.id, Arc::clone(&self.table), feature_id)
    }

    /// Fresh handles for every feature, in feature-id order.
    pub fn features(&self) -> Vec<Feature<S>> {
        (0..self.table.feature_count())
            .map(|index| self.feature(FeatureId(index as u32)))
            .collect()
    }

    /// Apply a uniform show/color override to all features.
    pub fn apply_style(&self, style: &FeatureStyle) {
        style::apply(style, self.table.as_ref());
    }
}

impl Model<FeatureTable> {
    /// Load a model's feature state from a JSON table document.
    pub fn from_json(id: ModelId, json: &str) -> Result<Self> {
        Ok(Self::with_table(id, FeatureTable::from_json(json)?))
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Failures raised while declaring or loading a feature table.
///
/// Routine outcomes are deliberately not represented here: an absent
/// property is `None`, and a rejected write is `false`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("property '{id}' declares {got} values for {expected} features")]
    ColumnLength { id: String, expected: usize, got: usize },

    #[error("property '{id}' mixes value shapes: {first} vs {second}")]
    MixedColumn {
        id: String,
        first: value::PropertyKind,
        second: value::PropertyKind,
    },

    #[error("vector property '{id}' must have 2-4 components, got {arity}")]
    VectorArity { id: String, arity: usize },

    #[error("duplicate property id '{0}'")]
    DuplicateProperty(String),

    #[error("duplicate semantic '{0}'")]
    DuplicateSemantic(String),

    #[error("unsupported value for property '{id}': {reason}")]
    UnsupportedValue { id: String, reason: String },

    #[error("malformed table document: {0}")]
    Document(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
