//! Label symbolizers.
//!
//! A `LABEL` yields the icons of its own nested styles followed by one
//! text symbolizer, so the icons are drawn underneath the text.

use crate::diagnostics::{Category, Diagnostic, Diagnostics};
use crate::parser::Block;

use super::model::{Anchor, Justify, PointSymbolizer, Symbolizer, TextSymbolizer};
use super::point::point_symbolizer;
use super::scale::ScaleDenominator;
use super::value::{angle, colour};

/// Symbolizers for one label of a class, in drawing order.
pub fn label_symbolizers(
    layer: &Block,
    class: &Block,
    label: &Block,
    diagnostics: &mut Diagnostics,
) -> Vec<Symbolizer> {
    if ScaleDenominator::from_block(label).is_some() {
        diagnostics.push(
            Diagnostic::warning(
                Category::Scale,
                "mapstyle::scale::label-bounds",
                "Label scale bounds cannot be represented and were dropped",
            )
            .at_line(label.line())
            .with_help("Move the bounds to the CLASS or LAYER"),
        );
    }

    let mut symbolizers: Vec<Symbolizer> = label
        .blocks("styles")
        .filter_map(|style| match point_symbolizer(style, diagnostics) {
            icon @ PointSymbolizer::Icon(_) => Some(icon.into()),
            PointSymbolizer::Mark(_) => None,
        })
        .collect();

    symbolizers.push(Symbolizer::Text(text_symbolizer(layer, class, label)));
    symbolizers
}

fn text_symbolizer(layer: &Block, class: &Block, label: &Block) -> TextSymbolizer {
    let text = label
        .str("text")
        .or_else(|| class.str("text"))
        .map(str::to_string)
        .or_else(|| layer.str("labelitem").map(|item| format!("[{}]", item)));

    let halo_color = colour(label, "outlinecolor");

    TextSymbolizer {
        label: text.as_deref().map(template),
        font: label.str("font").map(|fonts| {
            fonts
                .split(',')
                .map(|font| font.trim().to_string())
                .filter(|font| !font.is_empty())
                .collect()
        }),
        size: label.number("size"),
        color: colour(label, "color"),
        rotate: Some(angle(label)),
        offset: label.str("offset").and_then(offset),
        justify: label.str("align").and_then(Justify::parse),
        padding: label.number("buffer"),
        anchor: label.str("position").and_then(Anchor::from_position),
        halo_width: halo_color
            .as_ref()
            .map(|_| label.number("outlinewidth").unwrap_or(1.0)),
        halo_color,
    }
}

/// Rewrite `[attr]` bindings as `{{attr}}` placeholders.
pub fn template(text: &str) -> String {
    let text = text.trim();
    // `("[name]")` style expressions wrap the template in parentheses and quotes
    let text = text
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(text)
        .trim();
    let text = crate::parser::strip_quotes(text);

    let mut out = String::with_capacity(text.len() + 4);
    let mut rest = text;
    while let Some(start) = rest.find('[') {
        match rest[start..].find(']') {
            Some(len) => {
                out.push_str(&rest[..start]);
                out.push_str("{{");
                out.push_str(&rest[start + 1..start + len]);
                out.push_str("}}");
                rest = &rest[start + len + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

fn offset(value: &str) -> Option<[f64; 2]> {
    let mut parts = value.split_whitespace().map(str::parse::<f64>);
    match (parts.next(), parts.next()) {
        (Some(Ok(x)), Some(Ok(y))) => Some([x, y]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Node;
    use pretty_assertions::assert_eq;

    fn block(pairs: &[(&str, &str)]) -> Block {
        let mut block = Block::new();
        for (key, value) in pairs {
            block.insert(*key, Node::scalar(*value));
        }
        block
    }

    #[test]
    fn test_template() {
        assert_eq!(template("[ref]"), "{{ref}}");
        assert_eq!(template("'[name] ([ele] m)'"), "{{name}} ({{ele}} m)");
        assert_eq!(template("(\"[ref]\")"), "{{ref}}");
        assert_eq!(template("Nisosa"), "Nisosa");
        assert_eq!(template("open [bracket"), "open [bracket");
    }

    #[test]
    fn test_simple_label() {
        let mut diagnostics = Diagnostics::new();
        let label = block(&[
            ("text", "Nisosa"),
            ("font", "Verdana"),
            ("color", "0 255 0"),
            ("size", "9"),
        ]);
        let symbolizers = label_symbolizers(&Block::new(), &Block::new(), &label, &mut diagnostics);

        assert_eq!(
            symbolizers,
            vec![Symbolizer::Text(TextSymbolizer {
                label: Some("Nisosa".to_string()),
                font: Some(vec!["Verdana".to_string()]),
                size: Some(9.0),
                color: Some("#00FF00".to_string()),
                rotate: Some(0.0),
                ..Default::default()
            })]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_label_falls_back_to_class_then_labelitem() {
        let mut diagnostics = Diagnostics::new();
        let layer = block(&[("labelitem", "ref")]);
        let class = block(&[("text", "[name]")]);

        let text = |class: &Block, diagnostics: &mut Diagnostics| {
            match label_symbolizers(&layer, class, &Block::new(), diagnostics).pop() {
                Some(Symbolizer::Text(text)) => text.label,
                other => panic!("expected text, got {:?}", other),
            }
        };
        assert_eq!(text(&class, &mut diagnostics).as_deref(), Some("{{name}}"));
        assert_eq!(text(&Block::new(), &mut diagnostics).as_deref(), Some("{{ref}}"));
    }

    #[test]
    fn test_placement_and_halo() {
        let label = block(&[
            ("offset", "2 -4"),
            ("align", "CENTER"),
            ("buffer", "3"),
            ("position", "uc"),
            ("outlinecolor", "255 255 255"),
            ("outlinewidth", "2"),
            ("font", "sans, sans-bold"),
            ("angle", "30"),
        ]);
        let text = text_symbolizer(&Block::new(), &Block::new(), &label);

        assert_eq!(text.offset, Some([2.0, -4.0]));
        assert_eq!(text.justify, Some(Justify::Center));
        assert_eq!(text.padding, Some(3.0));
        assert_eq!(text.anchor, Some(Anchor::Top));
        assert_eq!(text.halo_color.as_deref(), Some("#FFFFFF"));
        assert_eq!(text.halo_width, Some(2.0));
        assert_eq!(text.font, Some(vec!["sans".to_string(), "sans-bold".to_string()]));
        assert_eq!(text.rotate, Some(30.0));
    }

    #[test]
    fn test_label_icons_come_first() {
        let mut diagnostics = Diagnostics::new();
        let mut label = block(&[("text", "[ref]")]);
        label.push("styles", Node::Block(block(&[("symbol", "shield.svg")])));
        label.push("styles", Node::Block(block(&[("symbol", "circle"), ("color", "0 0 0")])));

        let kinds: Vec<_> = label_symbolizers(&Block::new(), &Block::new(), &label, &mut diagnostics)
            .iter()
            .map(Symbolizer::kind)
            .collect();
        assert_eq!(kinds, vec!["Icon", "Text"]);
    }

    #[test]
    fn test_label_scale_bounds_are_diagnosed() {
        let mut diagnostics = Diagnostics::new();
        let label = block(&[("text", "x"), ("maxscaledenom", "5000")]);
        label_symbolizers(&Block::new(), &Block::new(), &label, &mut diagnostics);
        assert!(diagnostics.contains_code("mapstyle::scale::label-bounds"));
    }
}
