//! Normalized style model.
//!
//! This is the data handed to consumers: one [`Style`] per layer, one
//! [`Rule`] per class. Field names serialize in camelCase and absent
//! values are omitted.

use serde::Serialize;

use crate::expression::Filter;

use super::scale::ScaleDenominator;

/// A named list of rules. Built from one Mapfile `LAYER`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Style {
    pub name: String,
    pub rules: Vec<Rule>,
}

/// Filter, visibility range and symbolizers of one Mapfile `CLASS`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_denominator: Option<ScaleDenominator>,
    /// Drawing order: styles, then label icons, then label text.
    pub symbolizers: Vec<Symbolizer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Symbolizer {
    Mark(MarkSymbolizer),
    Icon(IconSymbolizer),
    Line(LineSymbolizer),
    Fill(FillSymbolizer),
    Raster(RasterSymbolizer),
    Text(TextSymbolizer),
}

impl Symbolizer {
    pub fn kind(&self) -> &'static str {
        match self {
            Symbolizer::Mark(_) => "Mark",
            Symbolizer::Icon(_) => "Icon",
            Symbolizer::Line(_) => "Line",
            Symbolizer::Fill(_) => "Fill",
            Symbolizer::Raster(_) => "Raster",
            Symbolizer::Text(_) => "Text",
        }
    }
}

/// Symbolizers that can be drawn at a point, or repeated along a line
/// or across an area.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum PointSymbolizer {
    Mark(MarkSymbolizer),
    Icon(IconSymbolizer),
}

impl From<PointSymbolizer> for Symbolizer {
    fn from(point: PointSymbolizer) -> Self {
        match point {
            PointSymbolizer::Mark(mark) => Symbolizer::Mark(mark),
            PointSymbolizer::Icon(icon) => Symbolizer::Icon(icon),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkSymbolizer {
    /// `circle`, `square`, `triangle`, `cross`, `star`, `x` or a
    /// `ttf://font#0xNNNN` glyph reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub well_known_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconSymbolizer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSymbolizer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dasharray: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_offset: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join: Option<LineJoin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap: Option<LineCap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphic_stroke: Option<PointSymbolizer>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillSymbolizer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_dasharray: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphic_fill: Option<PointSymbolizer>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RasterSymbolizer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resampling: Option<Resampling>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_selection: Option<ChannelSelection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_map: Option<ColorMap>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSymbolizer {
    /// Template with `{{attribute}}` placeholders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify: Option<Justify>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub halo_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub halo_width: Option<f64>,
}

/// Nine-point anchor grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    Center,
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Anchor {
    /// Snap a relative `ANCHORPOINT x y` (0..1, y down) onto the grid.
    pub fn from_anchor_point(x: f64, y: f64) -> Self {
        let column = if x < 1.0 / 3.0 {
            -1
        } else if x > 2.0 / 3.0 {
            1
        } else {
            0
        };
        let row = if y < 1.0 / 3.0 {
            -1
        } else if y > 2.0 / 3.0 {
            1
        } else {
            0
        };

        match (column, row) {
            (-1, -1) => Anchor::TopLeft,
            (0, -1) => Anchor::Top,
            (1, -1) => Anchor::TopRight,
            (-1, 0) => Anchor::Left,
            (1, 0) => Anchor::Right,
            (-1, 1) => Anchor::BottomLeft,
            (0, 1) => Anchor::Bottom,
            (1, 1) => Anchor::BottomRight,
            _ => Anchor::Center,
        }
    }

    /// Map a label `POSITION` (`ul`..`lr` or MapServer's 101..109 codes).
    ///
    /// `auto` has no fixed anchor and yields `None`.
    pub fn from_position(position: &str) -> Option<Self> {
        let anchor = match position.trim().to_ascii_lowercase().as_str() {
            "ul" | "101" => Anchor::TopLeft,
            "lr" | "102" => Anchor::BottomRight,
            "ur" | "103" => Anchor::TopRight,
            "ll" | "104" => Anchor::BottomLeft,
            "cr" | "105" => Anchor::Right,
            "cl" | "106" => Anchor::Left,
            "uc" | "107" => Anchor::Top,
            "lc" | "108" => Anchor::Bottom,
            "cc" | "109" => Anchor::Center,
            _ => return None,
        };
        Some(anchor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Round,
    Miter,
    Bevel,
    None,
}

impl LineJoin {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "round" => Some(LineJoin::Round),
            "miter" => Some(LineJoin::Miter),
            "bevel" => Some(LineJoin::Bevel),
            "none" => Some(LineJoin::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "butt" => Some(LineCap::Butt),
            "round" => Some(LineCap::Round),
            "square" => Some(LineCap::Square),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Justify {
    Left,
    Center,
    Right,
}

impl Justify {
    /// `ALIGN` accepts names or MapServer's 0/1/2 codes.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "0" => Some(Justify::Left),
            "center" | "1" => Some(Justify::Center),
            "right" | "2" => Some(Justify::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resampling {
    Linear,
    Nearest,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSelection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gray_channel: Option<Channel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub red_channel: Option<Channel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub green_channel: Option<Channel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blue_channel: Option<Channel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub source_channel_name: String,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            source_channel_name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorMap {
    #[serde(rename = "type")]
    pub kind: ColorMapType,
    pub color_map_entries: Vec<ColorMapEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMapType {
    Ramp,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorMapEntry {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
}
