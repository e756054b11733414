//! Raster layers: one rule, one raster symbolizer.

use crate::diagnostics::{Category, Diagnostic, Diagnostics};
use crate::parser::Block;
use crate::types::Colour;

use super::model::{
    Channel, ChannelSelection, ColorMap, ColorMapEntry, ColorMapType, RasterSymbolizer, Resampling,
};
use super::value::{opacity, percent};

/// Build the raster symbolizer for a `LAYER` of type raster.
pub fn raster_symbolizer(layer: &Block, diagnostics: &mut Diagnostics) -> RasterSymbolizer {
    let processing = Processing::from_layer(layer);

    RasterSymbolizer {
        opacity: raster_opacity(layer),
        resampling: processing.resampling,
        channel_selection: processing.channels,
        color_map: color_map(layer, diagnostics),
    }
}

/// Opacity from the first place that declares one: `COMPOSITE`, the
/// layer's legacy `OPACITY`/`TRANSPARENCY`, then the first style.
fn raster_opacity(layer: &Block) -> Option<f64> {
    layer
        .block("composite")
        .and_then(opacity)
        .or_else(|| opacity(layer))
        .or_else(|| percent(layer, "transparency"))
        .or_else(|| {
            layer
                .blocks("classes")
                .next()
                .and_then(|class| class.blocks("styles").next())
                .and_then(opacity)
        })
}

/// Settings read from the layer's `PROCESSING "KEY=VALUE"` directives.
#[derive(Debug, Default, PartialEq)]
struct Processing {
    resampling: Option<Resampling>,
    channels: Option<ChannelSelection>,
}

impl Processing {
    fn from_layer(layer: &Block) -> Self {
        let mut processing = Self::default();

        for directive in layer.scalars("processings") {
            let Some((key, value)) = directive.split_once('=') else {
                continue;
            };
            match key.trim().to_ascii_uppercase().as_str() {
                "RESAMPLE" => {
                    processing.resampling = match value.trim().to_ascii_uppercase().as_str() {
                        "AVERAGE" | "BILINEAR" => Some(Resampling::Linear),
                        "NEAREST" => Some(Resampling::Nearest),
                        _ => None,
                    }
                }
                "BANDS" => processing.channels = channels(value),
                _ => {}
            }
        }

        processing
    }
}

fn channels(bands: &str) -> Option<ChannelSelection> {
    let bands: Vec<&str> = bands
        .split(',')
        .map(str::trim)
        .filter(|band| !band.is_empty())
        .collect();

    match bands.as_slice() {
        [gray] => Some(ChannelSelection {
            gray_channel: Some(Channel::new(*gray)),
            ..Default::default()
        }),
        [red, green, blue, ..] => Some(ChannelSelection {
            red_channel: Some(Channel::new(*red)),
            green_channel: Some(Channel::new(*green)),
            blue_channel: Some(Channel::new(*blue)),
            ..Default::default()
        }),
        _ => None,
    }
}

/// A ramp built from `COLORRANGE` + `DATARANGE` of the single class.
fn color_map(layer: &Block, diagnostics: &mut Diagnostics) -> Option<ColorMap> {
    let classes: Vec<&Block> = layer.blocks("classes").collect();

    match classes.as_slice() {
        [] => None,
        [class] => {
            let entries: Vec<ColorMapEntry> = class.blocks("styles").flat_map(ramp_entries).collect();
            if entries.is_empty() {
                None
            } else {
                Some(ColorMap {
                    kind: ColorMapType::Ramp,
                    color_map_entries: entries,
                })
            }
        }
        [first, ..] => {
            diagnostics.push(
                Diagnostic::warning(
                    Category::Raster,
                    "mapstyle::raster::multi-class",
                    format!(
                        "Raster layer has {} classes; per-class colouring is not supported and no colour map was produced",
                        classes.len()
                    ),
                )
                .at_line(first.line().or(layer.line()))
                .with_help("Use a single CLASS with COLORRANGE and DATARANGE"),
            );
            None
        }
    }
}

fn ramp_entries(style: &Block) -> Vec<ColorMapEntry> {
    let range: Vec<&str> = style
        .str("colorrange")
        .map(|value| value.split_whitespace().collect())
        .unwrap_or_default();
    let data = style.str("datarange").map(split_numbers).unwrap_or_default();

    // COLORRANGE is two R G B triples: the low and the high end
    if range.len() != 6 {
        return Vec::new();
    }
    let colours = [
        Colour::from_rgb_triple(&range[..3].join(" ")),
        Colour::from_rgb_triple(&range[3..].join(" ")),
    ];

    colours
        .into_iter()
        .zip([data.first().copied(), data.get(1).copied()])
        .filter_map(|(colour, quantity)| {
            colour.map(|c| ColorMapEntry {
                color: c.to_string(),
                quantity,
            })
        })
        .collect()
}

fn split_numbers(value: &str) -> Vec<f64> {
    value
        .split_whitespace()
        .filter_map(|token| token.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Node;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn block(pairs: &[(&str, &str)]) -> Block {
        let mut block = Block::new();
        for (key, value) in pairs {
            block.insert(*key, Node::scalar(*value));
        }
        block
    }

    #[test]
    fn test_processing_directives() {
        let mut layer = Block::new();
        layer.push("processings", Node::scalar("RESAMPLE=BILINEAR"));
        layer.push("processings", Node::scalar("BANDS=3,2,1"));

        let processing = Processing::from_layer(&layer);
        assert_eq!(processing.resampling, Some(Resampling::Linear));
        assert_eq!(
            serde_json::to_value(processing.channels).unwrap(),
            json!({
                "redChannel": { "sourceChannelName": "3" },
                "greenChannel": { "sourceChannelName": "2" },
                "blueChannel": { "sourceChannelName": "1" }
            })
        );

        let mut layer = Block::new();
        layer.push("processings", Node::scalar("BANDS=1"));
        layer.push("processings", Node::scalar("RESAMPLE=NEAREST"));
        let processing = Processing::from_layer(&layer);
        assert_eq!(processing.resampling, Some(Resampling::Nearest));
        assert_eq!(
            processing.channels.and_then(|c| c.gray_channel),
            Some(Channel::new("1"))
        );
    }

    #[test]
    fn test_two_bands_select_nothing() {
        assert_eq!(channels("1,2"), None);
    }

    #[test]
    fn test_opacity_sources() {
        let mut layer = block(&[("opacity", "80")]);
        assert_eq!(raster_opacity(&layer), Some(0.8));

        layer.insert("composite", Node::Block(block(&[("opacity", "50")])));
        assert_eq!(raster_opacity(&layer), Some(0.5));

        let mut class = Block::new();
        class.push("styles", Node::Block(block(&[("opacity", "25")])));
        let mut layer = Block::new();
        layer.push("classes", Node::Block(class));
        assert_eq!(raster_opacity(&layer), Some(0.25));
    }

    #[test]
    fn test_colour_ramp_from_single_class() {
        let mut class = Block::new();
        class.push(
            "styles",
            Node::Block(block(&[("colorrange", "0 0 0 255 255 255"), ("datarange", "370 3557")])),
        );
        let mut layer = Block::new();
        layer.push("classes", Node::Block(class));

        let mut diagnostics = Diagnostics::new();
        let raster = raster_symbolizer(&layer, &mut diagnostics);
        assert_eq!(
            serde_json::to_value(raster.color_map).unwrap(),
            json!({
                "type": "ramp",
                "colorMapEntries": [
                    { "color": "#000000", "quantity": 370.0 },
                    { "color": "#FFFFFF", "quantity": 3557.0 }
                ]
            })
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_multiple_classes_are_diagnosed() {
        let mut layer = Block::new();
        for _ in 0..2 {
            let mut class = Block::at_line(4);
            class.push("styles", Node::Block(block(&[("color", "0 255 0")])));
            layer.push("classes", Node::Block(class));
        }

        let mut diagnostics = Diagnostics::new();
        let raster = raster_symbolizer(&layer, &mut diagnostics);
        assert_eq!(raster.color_map, None);
        let warning = diagnostics.with_code("mapstyle::raster::multi-class").next().unwrap();
        assert_eq!(warning.line, Some(4));
    }
}
