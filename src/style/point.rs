//! Point symbolizers from a `STYLE` block and its resolved `SYMBOL`.
//!
//! The same derivation is reused for graphic strokes, graphic fills and
//! label icons.

use crate::diagnostics::{Category, Diagnostic, Diagnostics};
use crate::parser::{Block, Node};

use super::model::{Anchor, IconSymbolizer, MarkSymbolizer, PointSymbolizer};
use super::shape::{is_cross, is_square, is_triangle, parse_points};
use super::value::{angle, colour, flag, opacity};

/// Shapes a Mark can name directly.
pub const WELL_KNOWN_NAMES: [&str; 6] = ["circle", "square", "triangle", "cross", "star", "x"];

/// Build the point symbolizer for a style.
pub fn point_symbolizer(style: &Block, diagnostics: &mut Diagnostics) -> PointSymbolizer {
    match style.get("symbol") {
        Some(Node::Block(symbol)) => from_symbol(style, symbol, diagnostics),
        Some(Node::Scalar(reference)) if reference.trim() != "0" => {
            from_reference(style, reference, diagnostics)
        }
        // no symbol (or SYMBOL 0): MapServer draws its default dot
        _ => PointSymbolizer::Mark(mark(style, Some("circle".to_string()), true)),
    }
}

/// Whether a style draws a symbol (graphic stroke / fill rather than a plain one).
pub fn has_symbol(style: &Block) -> bool {
    match style.get("symbol") {
        Some(Node::Block(_)) => true,
        Some(Node::Scalar(reference)) => reference.trim() != "0",
        _ => false,
    }
}

fn from_symbol(style: &Block, symbol: &Block, diagnostics: &mut Diagnostics) -> PointSymbolizer {
    let kind = symbol.str("type").unwrap_or("").to_ascii_lowercase();
    let filled = flag(symbol, "filled").unwrap_or(true);

    match kind.as_str() {
        "pixmap" | "svg" => PointSymbolizer::Icon(icon(style, symbol.str("image"), symbol)),
        "ellipse" => {
            let points = symbol.str("points").map(parse_points).unwrap_or_default();
            let name = match points.as_slice() {
                [w, h] if (w - h).abs() < f64::EPSILON => Some("circle".to_string()),
                [] => Some("circle".to_string()),
                _ => {
                    diagnostics.push(unrecognized_shape(style, symbol));
                    None
                }
            };
            PointSymbolizer::Mark(mark(style, name, filled))
        }
        "vector" => {
            let points = symbol.str("points").map(parse_points).unwrap_or_default();
            let name = if is_square(&points) {
                Some("square")
            } else if is_triangle(&points) {
                Some("triangle")
            } else if is_cross(&points) {
                Some("cross")
            } else {
                diagnostics.push(unrecognized_shape(style, symbol));
                None
            };
            PointSymbolizer::Mark(mark(style, name.map(str::to_string), filled))
        }
        "truetype" => {
            let glyph = symbol.str("character").and_then(decode_character);
            let name = match glyph {
                Some(code) => Some(format!(
                    "ttf://{}#0x{:04x}",
                    symbol.str("font").unwrap_or(""),
                    code
                )),
                None => {
                    diagnostics.push(unrecognized_shape(style, symbol));
                    None
                }
            };
            PointSymbolizer::Mark(mark(style, name, true))
        }
        _ => {
            diagnostics.push(unrecognized_shape(style, symbol));
            PointSymbolizer::Mark(mark(style, None, filled))
        }
    }
}

fn from_reference(style: &Block, reference: &str, diagnostics: &mut Diagnostics) -> PointSymbolizer {
    let name = reference.trim();
    let lower = name.to_ascii_lowercase();

    if WELL_KNOWN_NAMES.contains(&lower.as_str()) {
        return PointSymbolizer::Mark(mark(style, Some(lower), true));
    }

    // attribute bindings and unresolved indexes have no static symbol
    if name.starts_with('[') || name.parse::<f64>().is_ok() {
        diagnostics.push(
            Diagnostic::warning(
                Category::Symbolizer,
                "mapstyle::symbolizer::symbol",
                format!("Symbol '{}' cannot be resolved to a shape or image", name),
            )
            .at_line(style.line()),
        );
        return PointSymbolizer::Mark(mark(style, None, true));
    }

    PointSymbolizer::Icon(icon(style, Some(name), &Block::new()))
}

fn mark(style: &Block, well_known_name: Option<String>, filled: bool) -> MarkSymbolizer {
    let colour = colour(style, "color");
    let outline = super::value::colour(style, "outlinecolor");
    let opacity = opacity(style);

    // unfilled shapes are drawn with the fill colour as their stroke
    let (fill, stroke) = if filled {
        (colour, outline)
    } else {
        (None, outline.or(colour))
    };
    let visible = fill.is_some() || stroke.is_some();

    MarkSymbolizer {
        well_known_name,
        fill_opacity: Some(if filled { opacity.unwrap_or(1.0) } else { 0.0 }),
        color: fill,
        opacity,
        radius: style.number("size").map(|size| size / 2.0),
        rotate: Some(angle(style)),
        stroke_width: stroke.as_ref().map(|_| style.number("width").unwrap_or(1.0)),
        stroke_opacity: stroke.as_ref().map(|_| opacity.unwrap_or(1.0)),
        stroke_color: stroke,
        visibility: if visible { None } else { Some(false) },
    }
}

fn icon(style: &Block, image: Option<&str>, symbol: &Block) -> IconSymbolizer {
    let anchor = symbol.str("anchorpoint").and_then(|value| {
        let mut parts = value.split_whitespace().filter_map(|p| p.parse::<f64>().ok());
        Some(Anchor::from_anchor_point(parts.next()?, parts.next()?))
    });

    IconSymbolizer {
        image: image.map(str::to_string),
        size: style.number("size"),
        rotate: Some(angle(style)),
        opacity: opacity(style),
        anchor,
    }
}

/// Decode a truetype `CHARACTER`: a single character or an `&#NNN;` entity.
pub fn decode_character(value: &str) -> Option<u32> {
    if let Some(entity) = value.strip_prefix("&#").and_then(|v| v.strip_suffix(';')) {
        return match entity.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => entity.parse().ok(),
        };
    }

    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c as u32),
        _ => None,
    }
}

fn unrecognized_shape(style: &Block, symbol: &Block) -> Diagnostic {
    let definition: Vec<String> = symbol
        .iter()
        .filter_map(|(key, node)| node.as_str().map(|v| format!("{} {}", key.to_uppercase(), v)))
        .collect();

    Diagnostic::warning(
        Category::Symbolizer,
        "mapstyle::symbolizer::shape",
        format!(
            "Symbol '{}' has no well-known shape ({})",
            symbol.str("name").unwrap_or(""),
            definition.join(", ")
        ),
    )
    .at_line(style.line().or(symbol.line()))
    .with_help("Supported vector shapes are squares, apex-up triangles and crosses")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_symbolset;
    use pretty_assertions::assert_eq;

    const SYMBOLS: &str = r#"
SYMBOL
  NAME "circle"
  TYPE ELLIPSE
  POINTS 1 1 END
END
SYMBOL
  NAME "oval"
  TYPE ELLIPSE
  POINTS 2 1 END
END
SYMBOL
  NAME "square"
  TYPE VECTOR
  POINTS 0 0 1 0 1 1 0 1 0 0 END
END
SYMBOL
  NAME "ring"
  TYPE VECTOR
  FILLED FALSE
  POINTS 0 0 1 0 1 1 0 1 0 0 END
END
SYMBOL
  NAME "star"
  TYPE VECTOR
  POINTS 0 0.375 0.35 0.375 0.5 0 0.65 0.375 1 0.375 0 0.375 END
END
SYMBOL
  NAME "glyph"
  TYPE TRUETYPE
  FONT "dejavu"
  CHARACTER "&#65;"
END
SYMBOL
  NAME "pin"
  TYPE PIXMAP
  IMAGE "pin.png"
  ANCHORPOINT 0.5 1
END
"#;

    fn style_with(symbol_name: &str, extra: &[(&str, &str)]) -> Block {
        let symbols = parse_symbolset(SYMBOLS, &mut Diagnostics::new()).unwrap();
        let symbol = symbols
            .into_iter()
            .find(|s| s.str("name") == Some(symbol_name))
            .unwrap();

        let mut style = Block::at_line(10);
        style.insert("symbol", Node::Block(symbol));
        style.insert("color", Node::scalar("255 0 0"));
        style.insert("size", Node::scalar("10"));
        for (key, value) in extra {
            style.insert(*key, Node::scalar(*value));
        }
        style
    }

    fn mark_of(point: PointSymbolizer) -> MarkSymbolizer {
        match point {
            PointSymbolizer::Mark(mark) => mark,
            other => panic!("expected a mark, got {:?}", other),
        }
    }

    #[test]
    fn test_circle() {
        let mut diagnostics = Diagnostics::new();
        let mark = mark_of(point_symbolizer(&style_with("circle", &[]), &mut diagnostics));
        assert_eq!(mark.well_known_name.as_deref(), Some("circle"));
        assert_eq!(mark.color.as_deref(), Some("#FF0000"));
        assert_eq!(mark.radius, Some(5.0));
        assert_eq!(mark.fill_opacity, Some(1.0));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_uneven_ellipse_is_diagnosed() {
        let mut diagnostics = Diagnostics::new();
        let mark = mark_of(point_symbolizer(&style_with("oval", &[]), &mut diagnostics));
        assert_eq!(mark.well_known_name, None);
        assert!(diagnostics.contains_code("mapstyle::symbolizer::shape"));
    }

    #[test]
    fn test_vector_square() {
        let mut diagnostics = Diagnostics::new();
        let mark = mark_of(point_symbolizer(&style_with("square", &[]), &mut diagnostics));
        assert_eq!(mark.well_known_name.as_deref(), Some("square"));
    }

    #[test]
    fn test_unfilled_vector_uses_stroke() {
        let mut diagnostics = Diagnostics::new();
        let mark = mark_of(point_symbolizer(&style_with("ring", &[("width", "2")]), &mut diagnostics));
        assert_eq!(mark.color, None);
        assert_eq!(mark.fill_opacity, Some(0.0));
        assert_eq!(mark.stroke_color.as_deref(), Some("#FF0000"));
        assert_eq!(mark.stroke_width, Some(2.0));
        assert_eq!(mark.visibility, None);
    }

    #[test]
    fn test_unrecognized_vector_lists_definition() {
        let mut diagnostics = Diagnostics::new();
        let mark = mark_of(point_symbolizer(&style_with("star", &[]), &mut diagnostics));
        assert_eq!(mark.well_known_name, None);

        let warning = diagnostics.with_code("mapstyle::symbolizer::shape").next().unwrap();
        assert!(warning.message.contains("'star'"));
        assert!(warning.message.contains("TYPE VECTOR"));
        assert_eq!(warning.line, Some(10));
    }

    #[test]
    fn test_truetype_glyph() {
        let mut diagnostics = Diagnostics::new();
        let mark = mark_of(point_symbolizer(&style_with("glyph", &[]), &mut diagnostics));
        assert_eq!(mark.well_known_name.as_deref(), Some("ttf://dejavu#0x0041"));
    }

    #[test]
    fn test_pixmap_icon() {
        let mut diagnostics = Diagnostics::new();
        let point = point_symbolizer(&style_with("pin", &[("angle", "45")]), &mut diagnostics);
        assert_eq!(
            point,
            PointSymbolizer::Icon(IconSymbolizer {
                image: Some("pin.png".to_string()),
                size: Some(10.0),
                rotate: Some(45.0),
                opacity: None,
                anchor: Some(Anchor::Bottom),
            })
        );
    }

    #[test]
    fn test_scalar_references() {
        let mut diagnostics = Diagnostics::new();
        let mut style = Block::new();
        style.insert("symbol", Node::scalar("Triangle"));
        let mark = mark_of(point_symbolizer(&style, &mut diagnostics));
        assert_eq!(mark.well_known_name.as_deref(), Some("triangle"));
        assert_eq!(mark.visibility, Some(false));

        style.insert("symbol", Node::scalar("icons/bus.svg"));
        match point_symbolizer(&style, &mut diagnostics) {
            PointSymbolizer::Icon(icon) => assert_eq!(icon.image.as_deref(), Some("icons/bus.svg")),
            other => panic!("expected an icon, got {:?}", other),
        }
        assert!(diagnostics.is_empty());

        style.insert("symbol", Node::scalar("[sym]"));
        point_symbolizer(&style, &mut diagnostics);
        assert!(diagnostics.contains_code("mapstyle::symbolizer::symbol"));
    }

    #[test]
    fn test_symbol_zero_draws_default_dot() {
        let mut diagnostics = Diagnostics::new();
        let mut style = Block::new();
        style.insert("symbol", Node::scalar("0"));
        style.insert("color", Node::scalar("0 0 255"));

        let mark = mark_of(point_symbolizer(&style, &mut diagnostics));
        assert_eq!(mark.well_known_name.as_deref(), Some("circle"));
        assert_eq!(mark.color.as_deref(), Some("#0000FF"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_decode_character() {
        assert_eq!(decode_character("&#65;"), Some(65));
        assert_eq!(decode_character("&#x41;"), Some(65));
        assert_eq!(decode_character("A"), Some(65));
        assert_eq!(decode_character("AB"), None);
    }

    #[test]
    fn test_has_symbol() {
        let mut style = Block::new();
        assert!(!has_symbol(&style));
        style.insert("symbol", Node::scalar("0"));
        assert!(!has_symbol(&style));
        style.insert("symbol", Node::scalar("arrow"));
        assert!(has_symbol(&style));
    }
}
