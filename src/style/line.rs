use crate::diagnostics::Diagnostics;
use crate::parser::Block;

use super::model::{LineCap, LineJoin, LineSymbolizer};
use super::point::{has_symbol, point_symbolizer};
use super::value::{colour, numbers, opacity};

/// Line symbolizer for one `STYLE` of a line layer.
///
/// A style with its own symbol becomes a graphic stroke: the point
/// symbolizer repeated along the line instead of a solid colour.
pub fn line_symbolizer(style: &Block, diagnostics: &mut Diagnostics) -> LineSymbolizer {
    let graphic_stroke = if has_symbol(style) {
        Some(point_symbolizer(style, diagnostics))
    } else {
        None
    };

    LineSymbolizer {
        color: if graphic_stroke.is_some() {
            None
        } else {
            colour(style, "color")
        },
        width: style.number("width"),
        opacity: opacity(style),
        dasharray: numbers(style, "pattern"),
        dash_offset: style.number("initialgap"),
        join: Some(
            style
                .str("linejoin")
                .and_then(LineJoin::parse)
                .unwrap_or(LineJoin::Round),
        ),
        cap: style.str("linecap").and_then(LineCap::parse),
        graphic_stroke,
    }
}
