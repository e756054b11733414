//! Scale denominator ranges and their layer → class inheritance.

use serde::Serialize;

use crate::parser::Block;

/// Visibility range by map scale.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScaleDenominator {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl ScaleDenominator {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Read `MINSCALEDENOM` / `MAXSCALEDENOM` (or the legacy `MINSCALE` /
    /// `MAXSCALE`) from a block. Negative values mean "unset".
    pub fn from_block(block: &Block) -> Option<Self> {
        Self::from_keys(block, ("minscaledenom", "minscale"), ("maxscaledenom", "maxscale"))
    }

    /// Layer-level label bounds (`LABELMINSCALEDENOM` / `LABELMAXSCALEDENOM`).
    pub fn label_bounds(block: &Block) -> Option<Self> {
        Self::from_keys(
            block,
            ("labelminscaledenom", "labelminscale"),
            ("labelmaxscaledenom", "labelmaxscale"),
        )
    }

    fn from_keys(block: &Block, min: (&str, &str), max: (&str, &str)) -> Option<Self> {
        let bound = |(key, legacy): (&str, &str)| {
            block
                .number(key)
                .or_else(|| block.number(legacy))
                .filter(|v| *v >= 0.0)
        };
        let scale = Self::new(bound(min), bound(max));
        if scale.is_empty() {
            None
        } else {
            Some(scale)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Most specific wins: each bound defined by `inner` replaces the one
    /// from `outer`; undefined bounds are inherited.
    pub fn merge(outer: Option<Self>, inner: Option<Self>) -> Option<Self> {
        let outer = outer.unwrap_or_default();
        let inner = inner.unwrap_or_default();
        let merged = Self::new(inner.min.or(outer.min), inner.max.or(outer.max));
        if merged.is_empty() {
            None
        } else {
            Some(merged)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Node;

    fn block(pairs: &[(&str, &str)]) -> Block {
        let mut block = Block::new();
        for (key, value) in pairs {
            block.insert(*key, Node::scalar(*value));
        }
        block
    }

    #[test]
    fn test_from_block() {
        let scale = ScaleDenominator::from_block(&block(&[("maxscaledenom", "320000")]));
        assert_eq!(scale, Some(ScaleDenominator::new(None, Some(320000.0))));
        assert_eq!(ScaleDenominator::from_block(&block(&[])), None);
    }

    #[test]
    fn test_legacy_keys_and_unset_values() {
        let scale = ScaleDenominator::from_block(&block(&[("minscale", "1000"), ("maxscaledenom", "-1")]));
        assert_eq!(scale, Some(ScaleDenominator::new(Some(1000.0), None)));
    }

    #[test]
    fn test_class_bound_overrides_layer_bound() {
        let layer = Some(ScaleDenominator::new(None, Some(320000.0)));
        let class = Some(ScaleDenominator::new(Some(0.0), Some(160000.0)));
        assert_eq!(
            ScaleDenominator::merge(layer, class),
            Some(ScaleDenominator::new(Some(0.0), Some(160000.0)))
        );
    }

    #[test]
    fn test_less_restrictive_inner_bound_still_wins() {
        let layer = Some(ScaleDenominator::new(Some(5000.0), Some(10000.0)));
        let class = Some(ScaleDenominator::new(None, Some(50000.0)));
        assert_eq!(
            ScaleDenominator::merge(layer, class),
            Some(ScaleDenominator::new(Some(5000.0), Some(50000.0)))
        );
    }

    #[test]
    fn test_merge_inherits_and_empties() {
        let layer = Some(ScaleDenominator::new(Some(6000.0), None));
        assert_eq!(ScaleDenominator::merge(layer, None), layer);
        assert_eq!(ScaleDenominator::merge(None, None), None);
    }

    #[test]
    fn test_serializes_defined_bounds_only() {
        let scale = ScaleDenominator::new(None, Some(35000.0));
        assert_eq!(
            serde_json::to_value(scale).unwrap(),
            serde_json::json!({ "max": 35000.0 })
        );
    }
}
