//! Layer → style translation.

use crate::diagnostics::{Category, Diagnostic, Diagnostics};
use crate::error::{MapstyleError, Result};
use crate::expression::{
    find_unsupported, is_classitem_shorthand, parse_classitem_expression, parse_expression,
    ExpressionError, Filter,
};
use crate::parser::Block;

use super::fill::fill_symbolizer;
use super::line::line_symbolizer;
use super::model::{Rule, Style, Symbolizer};
use super::point::point_symbolizer;
use super::raster::raster_symbolizer;
use super::scale::ScaleDenominator;
use super::text::label_symbolizers;

/// Geometry a layer's styles are drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Point,
    Line,
    Polygon,
    Raster,
}

impl LayerKind {
    /// Read a layer's `TYPE`. Annotation layers draw like point layers.
    pub fn from_layer(layer: &Block) -> Result<Self> {
        let kind = layer.str("type").unwrap_or("").trim().to_ascii_lowercase();
        match kind.as_str() {
            "point" | "annotation" => Ok(LayerKind::Point),
            "line" => Ok(LayerKind::Line),
            "polygon" => Ok(LayerKind::Polygon),
            "raster" => Ok(LayerKind::Raster),
            _ => Err(MapstyleError::UnsupportedLayerType {
                layer: layer_name(layer).to_string(),
                kind: if kind.is_empty() { "(none)".to_string() } else { kind },
            }),
        }
    }
}

/// Builds the symbolizer for one `STYLE` block of a vector layer.
type StyleSymbolizer = fn(&Block, &mut Diagnostics) -> Symbolizer;

fn layer_name(layer: &Block) -> &str {
    layer.str("name").unwrap_or("")
}

/// Translate one resolved `LAYER` block.
pub fn layer_to_style(layer: &Block, diagnostics: &mut Diagnostics) -> Result<Style> {
    let kind = LayerKind::from_layer(layer)?;
    let layer_scale = ScaleDenominator::from_block(layer);

    if ScaleDenominator::label_bounds(layer).is_some() {
        diagnostics.push(
            Diagnostic::warning(
                Category::Scale,
                "mapstyle::scale::layer-label-bounds",
                format!(
                    "Label scale bounds of layer '{}' cannot be represented and were dropped",
                    layer_name(layer)
                ),
            )
            .at_line(layer.line()),
        );
    }

    let symbolizer: StyleSymbolizer = match kind {
        LayerKind::Point => point,
        LayerKind::Line => line,
        LayerKind::Polygon => fill,
        LayerKind::Raster => {
            return Ok(Style {
                name: layer_name(layer).to_string(),
                rules: vec![raster_rule(layer, layer_scale, diagnostics)],
            })
        }
    };

    let rules = layer
        .blocks("classes")
        .map(|class| class_rule(layer, class, symbolizer, layer_scale, diagnostics))
        .collect::<Result<Vec<_>>>()?;

    Ok(Style {
        name: layer_name(layer).to_string(),
        rules,
    })
}

fn point(style: &Block, diagnostics: &mut Diagnostics) -> Symbolizer {
    point_symbolizer(style, diagnostics).into()
}

fn line(style: &Block, diagnostics: &mut Diagnostics) -> Symbolizer {
    Symbolizer::Line(line_symbolizer(style, diagnostics))
}

fn fill(style: &Block, diagnostics: &mut Diagnostics) -> Symbolizer {
    Symbolizer::Fill(fill_symbolizer(style, diagnostics))
}

fn raster_rule(
    layer: &Block,
    scale: Option<ScaleDenominator>,
    diagnostics: &mut Diagnostics,
) -> Rule {
    let name = layer
        .blocks("classes")
        .next()
        .and_then(|class| class.str("name"))
        .unwrap_or("");

    Rule {
        name: name.to_string(),
        filter: None,
        scale_denominator: scale,
        symbolizers: vec![Symbolizer::Raster(raster_symbolizer(layer, diagnostics))],
    }
}

fn class_rule(
    layer: &Block,
    class: &Block,
    symbolizer: StyleSymbolizer,
    layer_scale: Option<ScaleDenominator>,
    diagnostics: &mut Diagnostics,
) -> Result<Rule> {
    let filter = class_filter(layer, class, diagnostics)?;
    let scale_denominator = ScaleDenominator::merge(layer_scale, ScaleDenominator::from_block(class));

    let mut symbolizers = Vec::new();
    for style in class.blocks("styles") {
        if ScaleDenominator::from_block(style).is_some() {
            diagnostics.push(
                Diagnostic::warning(
                    Category::Scale,
                    "mapstyle::scale::style-bounds",
                    "Style scale bounds cannot be represented and were dropped",
                )
                .at_line(style.line())
                .with_help("Split the class in two, or move the bounds to the CLASS"),
            );
        }

        symbolizers.push(symbolizer(style, diagnostics));
    }

    for label in class.blocks("labels") {
        symbolizers.extend(label_symbolizers(layer, class, label, diagnostics));
    }

    Ok(Rule {
        name: class.str("name").unwrap_or("").to_string(),
        filter,
        scale_denominator,
        symbolizers,
    })
}

/// Filter for a class `EXPRESSION`.
///
/// Only a missing attribute, operator or value is fatal. Every other
/// problem leaves the rule without a filter and is reported.
pub fn class_filter(
    layer: &Block,
    class: &Block,
    diagnostics: &mut Diagnostics,
) -> Result<Option<Filter>> {
    let Some(expression) = class.str("expression").map(str::trim) else {
        return Ok(None);
    };
    let line = class.line();

    if let Some(construct) = find_unsupported(expression) {
        diagnostics.push(
            Diagnostic::error(
                Category::Expression,
                "mapstyle::expression::unsupported",
                format!("Expression {} uses {} and was dropped", expression, construct),
            )
            .at_line(line),
        );
        return Ok(None);
    }

    let parsed = if is_classitem_shorthand(expression) {
        match layer.str("classitem") {
            Some(classitem) => parse_classitem_expression(expression, classitem),
            None => {
                diagnostics.push(
                    Diagnostic::error(
                        Category::Expression,
                        "mapstyle::expression::no-classitem",
                        format!("Expression {} needs a CLASSITEM on the layer", expression),
                    )
                    .at_line(line)
                    .with_help("Declare CLASSITEM or write the comparison out, e.g. ([attr] = \"value\")"),
                );
                return Ok(None);
            }
        }
    } else if expression.starts_with('(') && expression.ends_with(')') {
        parse_expression(expression)
    } else {
        diagnostics.push(
            Diagnostic::error(
                Category::Expression,
                "mapstyle::expression::unparenthesized",
                format!("Expression {} is not wrapped in parentheses", expression),
            )
            .at_line(line)
            .with_help("Logical expressions must be written as ( ... )"),
        );
        return Ok(None);
    };

    match parsed {
        Ok(filter) => Ok(Some(filter)),
        Err(err) if err.is_fatal() => Err(err.into()),
        Err(err) => {
            let code = match err {
                ExpressionError::UnknownOperator { .. } => "mapstyle::expression::operator",
                _ => "mapstyle::expression::leftover",
            };
            diagnostics.push(
                Diagnostic::error(
                    Category::Expression,
                    code,
                    format!("Expression {}: {}; the class has no filter", expression, err),
                )
                .at_line(line),
            );
            Ok(None)
        }
    }
}
