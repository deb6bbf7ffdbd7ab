//! Uniform styling overrides.
//!
//! A styling pass evaluates its rules once per model and pushes the result
//! into the feature table as show/color overrides. Only the application
//! side lives here; the expression language that produces the values is a
//! separate concern entirely.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::feature::FeatureId;
use crate::store::FeatureStore;

/// A show/color override applied uniformly across all features of a model.
/// `None` fields leave the corresponding per-feature state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureStyle {
    pub show: Option<bool>,
    pub color: Option<Color>,
}

impl FeatureStyle {
    /// A style that overrides nothing.
    pub const fn new() -> Self {
        Self { show: None, color: None }
    }

    pub const fn with_show(mut self, show: bool) -> Self {
        self.show = Some(show);
        self
    }

    pub const fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub const fn is_empty(&self) -> bool {
        self.show.is_none() && self.color.is_none()
    }
}

/// Apply `style` to every feature in `store`.
pub fn apply<S: FeatureStore>(style: &FeatureStyle, store: &S) {
    let count = store.feature_count();
    if count == 0 {
        tracing::warn!("styling a model with no features; was the table loaded?");
        return;
    }
    tracing::debug!(features = count, ?style, "applying uniform feature style");

    for index in 0..count {
        let feature = FeatureId(index as u32);
        if let Some(show) = style.show {
            store.set_show(feature, show);
        }
        if let Some(color) = style.color {
            store.set_color(feature, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FeatureTable;

    #[test]
    fn test_apply_overrides_every_feature() {
        let table = FeatureTable::empty(3);
        let style = FeatureStyle::new()
            .with_show(false)
            .with_color(Color::from_bytes(255, 0, 0, 255));

        apply(&style, &table);

        let mut out = Color::WHITE;
        for index in 0..3 {
            let feature = FeatureId(index);
            assert!(!table.show(feature));
            table.color_into(feature, &mut out);
            assert_eq!(out, Color::from_bytes(255, 0, 0, 255));
        }
    }

    #[test]
    fn test_empty_style_leaves_state_alone() {
        let table = FeatureTable::empty(1);
        table.set_show(FeatureId(0), false);

        apply(&FeatureStyle::new(), &table);

        assert!(!table.show(FeatureId(0)));
        let mut out = Color::new(0.0, 0.0, 0.0, 0.0);
        table.color_into(FeatureId(0), &mut out);
        assert_eq!(out, Color::WHITE);
    }

    #[test]
    fn test_partial_style() {
        let table = FeatureTable::empty(1);
        apply(&FeatureStyle::new().with_show(false), &table);

        assert!(!table.show(FeatureId(0)));
        let mut out = Color::new(0.0, 0.0, 0.0, 0.0);
        table.color_into(FeatureId(0), &mut out);
        assert_eq!(out, Color::WHITE);
    }
}
