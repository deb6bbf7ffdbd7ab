//! End-to-end tests for property access and two-tier resolution.

use pretty_assertions::assert_eq;
use scene_features::{FeatureId, FeatureTable, Model, ModelId, PropertyValue};

fn model_with(table: FeatureTable) -> Model {
    Model::with_table(ModelId(1), table)
}

// ============================================================================
// 1. Absence is routine, presence is exact
// ============================================================================

#[test]
fn test_absent_property_is_none() {
    let model = model_with(FeatureTable::empty(1));
    let feature = model.feature(FeatureId(0));

    assert!(!feature.has_property("Height"));
    assert_eq!(feature.property("Height"), None);
    assert_eq!(feature.property_inherited("Height"), None);
}

#[test]
fn test_property_returns_exact_last_set_value() {
    let model = model_with(
        FeatureTable::builder(1)
            .structural_property("Height", vec![PropertyValue::Float(10.0)])
            .build()
            .unwrap(),
    );
    let feature = model.feature(FeatureId(0));

    assert_eq!(feature.property("Height"), Some(PropertyValue::Float(10.0)));
    assert!(feature.set_property("Height", PropertyValue::Float(84.5)));
    assert_eq!(feature.property("Height"), Some(PropertyValue::Float(84.5)));
}

#[test]
fn test_composite_values_deep_equal_and_isolated() {
    let address = PropertyValue::from(vec![
        ("street", PropertyValue::from("Main")),
        ("number", PropertyValue::Int(4)),
    ]);
    let model = model_with(
        FeatureTable::builder(1)
            .structural_property("address", vec![address.clone()])
            .build()
            .unwrap(),
    );
    let feature = model.feature(FeatureId(0));

    // Deep-equal copy out.
    assert_eq!(feature.property("address"), Some(address.clone()));

    // Mutating the returned copy cannot corrupt table state.
    let mut stolen = feature.property("address").unwrap();
    if let PropertyValue::Struct(map) = &mut stolen {
        map.insert("number".into(), PropertyValue::Int(999));
    }
    assert_eq!(feature.property("address"), Some(address));
}

// ============================================================================
// 2. Case sensitivity
// ============================================================================

#[test]
fn test_property_names_are_case_sensitive() {
    let model = model_with(
        FeatureTable::builder(1)
            .structural_property("height", vec![PropertyValue::Int(1)])
            .build()
            .unwrap(),
    );
    let feature = model.feature(FeatureId(0));

    assert!(feature.has_property("height"));
    assert!(!feature.has_property("HEIGHT"));
    assert!(!feature.has_property("Height"));
}

// ============================================================================
// 3. Semantic precedence
// ============================================================================

// A structural column "SEM_ID" carries the semantic tag "id"; the legacy
// scheme also declares a plain "id" column. Resolving "id" with inheritance
// must prefer the semantic match.
#[test]
fn test_semantic_match_wins_over_property_id() {
    let model = model_with(
        FeatureTable::builder(1)
            .semantic_property("SEM_ID", "id", vec![PropertyValue::Int(9)])
            .legacy_property("id", vec![PropertyValue::Int(5)])
            .build()
            .unwrap(),
    );
    let feature = model.feature(FeatureId(0));

    assert_eq!(feature.property_inherited("id"), Some(PropertyValue::Int(9)));
    // The plain path never takes semantic indirection.
    assert_eq!(feature.property("id"), Some(PropertyValue::Int(5)));
}

#[test]
fn test_without_semantic_mapping_falls_back_to_property_id() {
    // Same table, minus the semantic tag.
    let model = model_with(
        FeatureTable::builder(1)
            .structural_property("SEM_ID", vec![PropertyValue::Int(9)])
            .legacy_property("id", vec![PropertyValue::Int(5)])
            .build()
            .unwrap(),
    );
    let feature = model.feature(FeatureId(0));

    assert_eq!(feature.property_inherited("id"), Some(PropertyValue::Int(5)));
}

#[test]
fn test_semantic_and_property_namespaces_are_independent() {
    // "id" -> 5 through the property path; the semantic "SEM_A" points at a
    // different column holding 7. Neither name leaks into the other space.
    let model = model_with(
        FeatureTable::builder(1)
            .semantic_property("element_id", "SEM_A", vec![PropertyValue::Int(7)])
            .structural_property("id", vec![PropertyValue::Int(5)])
            .build()
            .unwrap(),
    );
    let feature = model.feature(FeatureId(0));

    assert_eq!(feature.property_inherited("SEM_A"), Some(PropertyValue::Int(7)));
    // No semantic entry keyed exactly "id".
    assert_eq!(feature.property_inherited("id"), Some(PropertyValue::Int(5)));
    // "SEM_A" is not a property id.
    assert_eq!(feature.property("SEM_A"), None);
    assert!(!feature.has_property("SEM_A"));
}

// ============================================================================
// 4. Writes
// ============================================================================

#[test]
fn test_set_property_read_only_returns_false_and_preserves_value() {
    let model = model_with(
        FeatureTable::builder(1)
            .derived_property("component_of", None, vec![PropertyValue::from("b-1")])
            .structural_property("height", vec![PropertyValue::Int(10)])
            .build()
            .unwrap(),
    );
    let feature = model.feature(FeatureId(0));

    assert!(!feature.set_property("component_of", PropertyValue::from("b-2")));
    assert_eq!(feature.property("component_of"), Some(PropertyValue::from("b-1")));

    assert!(feature.set_property("height", PropertyValue::Int(11)));
    assert_eq!(feature.property("height"), Some(PropertyValue::Int(11)));
}

#[test]
fn test_set_property_does_not_create_columns() {
    let model = model_with(FeatureTable::empty(1));
    let feature = model.feature(FeatureId(0));

    assert!(!feature.set_property("brand_new", PropertyValue::Int(1)));
    assert!(!feature.has_property("brand_new"));
}

#[test]
fn test_writes_are_per_feature() {
    let model = model_with(
        FeatureTable::builder(3)
            .structural_property(
                "height",
                vec![PropertyValue::Int(1), PropertyValue::Int(2), PropertyValue::Int(3)],
            )
            .build()
            .unwrap(),
    );

    assert!(model.feature(FeatureId(1)).set_property("height", PropertyValue::Int(20)));

    assert_eq!(model.feature(FeatureId(0)).property("height"), Some(PropertyValue::Int(1)));
    assert_eq!(model.feature(FeatureId(1)).property("height"), Some(PropertyValue::Int(20)));
    assert_eq!(model.feature(FeatureId(2)).property("height"), Some(PropertyValue::Int(3)));
}

// ============================================================================
// 5. Enumeration
// ============================================================================

#[test]
fn test_property_ids_stable_across_calls() {
    let model = model_with(
        FeatureTable::builder(1)
            .structural_property("height", vec![PropertyValue::Int(1)])
            .semantic_property("area", "AREA", vec![PropertyValue::Int(2)])
            .legacy_property("name", vec![PropertyValue::from("x")])
            .build()
            .unwrap(),
    );
    let feature = model.feature(FeatureId(0));

    let first = feature.property_ids();
    let second = feature.property_ids();
    assert_eq!(first, second);
    assert_eq!(first, vec!["height", "area", "name"]);
}

#[test]
fn test_property_ids_buffer_is_cleared_and_reused() {
    let model = model_with(
        FeatureTable::builder(1)
            .structural_property("height", vec![PropertyValue::Int(1)])
            .build()
            .unwrap(),
    );
    let feature = model.feature(FeatureId(0));

    let mut buffer = vec!["stale".to_owned(), "entries".to_owned()];
    feature.property_ids_into(&mut buffer);
    assert_eq!(buffer, vec!["height"]);

    feature.property_ids_into(&mut buffer);
    assert_eq!(buffer, vec!["height"]);
}
