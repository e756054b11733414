use crate::diagnostics::Diagnostics;
use crate::parser::Block;

use super::model::FillSymbolizer;
use super::point::{has_symbol, point_symbolizer};
use super::value::{colour, numbers, opacity};

/// Fill symbolizer for one `STYLE` of a polygon layer.
///
/// `COLOR` fills the area and `OUTLINECOLOR` strokes it; whichever is
/// missing gets an opacity of zero. A symbol turns the fill into a
/// graphic fill.
pub fn fill_symbolizer(style: &Block, diagnostics: &mut Diagnostics) -> FillSymbolizer {
    let graphic_fill = if has_symbol(style) {
        Some(point_symbolizer(style, diagnostics))
    } else {
        None
    };

    let color = if graphic_fill.is_some() {
        None
    } else {
        colour(style, "color")
    };
    let outline_color = colour(style, "outlinecolor");
    let opacity = opacity(style).unwrap_or(1.0);

    FillSymbolizer {
        fill_opacity: Some(if color.is_some() || graphic_fill.is_some() {
            opacity
        } else {
            0.0
        }),
        color,
        outline_width: outline_color
            .as_ref()
            .map(|_| style.number("width").unwrap_or(1.0)),
        outline_opacity: Some(if outline_color.is_some() { opacity } else { 0.0 }),
        outline_dasharray: outline_color
            .as_ref()
            .and_then(|_| numbers(style, "pattern")),
        outline_color,
        graphic_fill,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Node;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn style(pairs: &[(&str, &str)]) -> Block {
        let mut block = Block::new();
        for (key, value) in pairs {
            block.insert(*key, Node::scalar(*value));
        }
        block
    }

    #[test]
    fn test_colour_only() {
        let mut diagnostics = Diagnostics::new();
        let fill = fill_symbolizer(&style(&[("color", "0 255 0")]), &mut diagnostics);
        assert_eq!(
            serde_json::to_value(&fill).unwrap(),
            json!({ "color": "#00FF00", "fillOpacity": 1.0, "outlineOpacity": 0.0 })
        );
    }

    #[test]
    fn test_outline_only() {
        let mut diagnostics = Diagnostics::new();
        let fill = fill_symbolizer(
            &style(&[("outlinecolor", "0 0 0"), ("width", "2"), ("pattern", "4 2")]),
            &mut diagnostics,
        );
        assert_eq!(
            fill,
            FillSymbolizer {
                fill_opacity: Some(0.0),
                outline_color: Some("#000000".to_string()),
                outline_width: Some(2.0),
                outline_opacity: Some(1.0),
                outline_dasharray: Some(vec![4.0, 2.0]),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_opacity_applies_to_both() {
        let mut diagnostics = Diagnostics::new();
        let fill = fill_symbolizer(
            &style(&[("color", "1 2 3"), ("outlinecolor", "4 5 6"), ("opacity", "50")]),
            &mut diagnostics,
        );
        assert_eq!(fill.fill_opacity, Some(0.5));
        assert_eq!(fill.outline_opacity, Some(0.5));
        assert_eq!(fill.outline_width, Some(1.0));
    }

    #[test]
    fn test_symbol_becomes_graphic_fill() {
        let mut diagnostics = Diagnostics::new();
        let fill = fill_symbolizer(
            &style(&[("symbol", "hatch.png"), ("color", "255 0 0")]),
            &mut diagnostics,
        );
        assert_eq!(fill.color, None);
        assert!(fill.graphic_fill.is_some());
        assert_eq!(fill.fill_opacity, Some(1.0));
    }
}
