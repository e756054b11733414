//! Mapfile → normalized style translation.
//!
//! [`MapfileStyleParser`] runs the whole pipeline: block parsing, symbol
//! resolution, then one [`Style`] per `LAYER`. Recoverable problems are
//! returned next to the result as [`Diagnostics`].
//!
//! # Usage
//!
//! ```ignore
//! use mapstyle::style::MapfileStyleParser;
//!
//! let parser = MapfileStyleParser::new().with_symbols_path("symbols.sym");
//! let translation = parser.read_style(&std::fs::read_to_string("roads.map")?)?;
//!
//! for diagnostic in translation.diagnostics.iter() {
//!     eprintln!("{}", diagnostic);
//! }
//! println!("{}", serde_json::to_string_pretty(&translation.value)?);
//! ```

mod fill;
mod line;
mod model;
mod point;
mod raster;
mod scale;
mod shape;
mod text;
mod translate;
mod value;

use std::path::PathBuf;

use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::error::{MapstyleError, Result};
use crate::parser::{parse, Block};
use crate::symbols::{self, ResolveOptions};

pub use model::{
    Anchor, Channel, ChannelSelection, ColorMap, ColorMapEntry, ColorMapType, FillSymbolizer,
    IconSymbolizer, Justify, LineCap, LineJoin, LineSymbolizer, MarkSymbolizer, PointSymbolizer,
    RasterSymbolizer, Resampling, Rule, Style, Symbolizer, TextSymbolizer,
};
pub use point::WELL_KNOWN_NAMES;
pub use scale::ScaleDenominator;
pub use shape::{is_cross, is_square, is_triangle, parse_points};
pub use text::template;
pub use translate::{class_filter, LayerKind};

/// A result together with the diagnostics raised while producing it.
#[derive(Debug, Clone)]
pub struct Translation<T> {
    pub value: T,
    pub diagnostics: Diagnostics,
}

impl<T> Translation<T> {
    pub fn new(value: T, diagnostics: Diagnostics) -> Self {
        Self { value, diagnostics }
    }
}

/// Translates Mapfile text into normalized styles.
#[derive(Debug, Clone)]
pub struct MapfileStyleParser {
    options: ResolveOptions,
}

impl Default for MapfileStyleParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MapfileStyleParser {
    /// Parser that scans the process arguments for `mapfile-symbols-path=`.
    pub fn new() -> Self {
        Self {
            options: ResolveOptions {
                default_path: None,
                args: std::env::args().collect(),
                base_dir: None,
            },
        }
    }

    /// Parser configured from a mapstyle.yaml.
    pub fn from_config(config: &Config) -> Self {
        let mut parser = Self::new();
        parser.options.default_path = config.symbols_path.clone();
        parser
    }

    /// Symbolset used when neither the Mapfile nor the arguments name one.
    pub fn with_symbols_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.default_path = Some(path.into());
        self
    }

    /// Directory relative `SYMBOLSET` paths are resolved against.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.base_dir = Some(dir.into());
        self
    }

    /// Replace the argument list scanned for `mapfile-symbols-path=`.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Parse Mapfile text and resolve its symbol references.
    pub fn parse_tree(&self, content: &str) -> Result<Translation<Block>> {
        let mut diagnostics = Diagnostics::new();
        let mut tree = parse(content, &mut diagnostics)?;
        symbols::resolve(&mut tree, &self.options, &mut diagnostics)?;
        Ok(Translation::new(tree, diagnostics))
    }

    /// Translate a Mapfile holding exactly one layer.
    pub fn read_style(&self, content: &str) -> Result<Translation<Style>> {
        let Translation {
            value: tree,
            mut diagnostics,
        } = self.parse_tree(content)?;

        let layers = layers(&tree);
        match layers.as_slice() {
            [] => Err(MapstyleError::NoLayers),
            [layer] => {
                let style = translate::layer_to_style(layer, &mut diagnostics)?;
                Ok(Translation::new(style, diagnostics))
            }
            _ => Err(MapstyleError::MultipleLayers { count: layers.len() }),
        }
    }

    /// Translate every layer of a Mapfile, in declaration order.
    pub fn read_multi_styles(&self, content: &str) -> Result<Translation<Vec<Style>>> {
        let Translation {
            value: tree,
            mut diagnostics,
        } = self.parse_tree(content)?;

        let styles = layers(&tree)
            .into_iter()
            .map(|layer| translate::layer_to_style(layer, &mut diagnostics))
            .collect::<Result<Vec<_>>>()?;

        Ok(Translation::new(styles, diagnostics))
    }

    /// Translate one already-resolved `LAYER` block.
    pub fn layer_to_style(&self, layer: &Block) -> Result<Translation<Style>> {
        let mut diagnostics = Diagnostics::new();
        let style = translate::layer_to_style(layer, &mut diagnostics)?;
        Ok(Translation::new(style, diagnostics))
    }
}

fn layers(tree: &Block) -> Vec<&Block> {
    tree.block("map")
        .map(|map| map.blocks("layers").collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parser() -> MapfileStyleParser {
        MapfileStyleParser::new().with_args(Vec::<String>::new())
    }

    const CIRCLE: &str = r#"
MAP
  LAYER
    NAME "points"
    TYPE POINT
    CLASS
      STYLE
        SYMBOL 'circle'
        COLOR 255 0 0
        SIZE 15
      END
    END
  END
END
"#;

    #[test]
    fn test_read_style_circle() {
        let translation = parser().read_style(CIRCLE).unwrap();
        let style = translation.value;

        assert_eq!(style.name, "points");
        assert_eq!(style.rules.len(), 1);
        assert_eq!(
            style.rules[0].symbolizers,
            vec![Symbolizer::Mark(MarkSymbolizer {
                well_known_name: Some("circle".to_string()),
                color: Some("#FF0000".to_string()),
                fill_opacity: Some(1.0),
                radius: Some(7.5),
                rotate: Some(0.0),
                ..Default::default()
            })]
        );
        assert!(translation
            .diagnostics
            .contains_code("mapstyle::symbol::unresolved-path"));
    }

    #[test]
    fn test_read_style_rejects_multiple_layers() {
        let content = "LAYER\nNAME a\nTYPE LINE\nEND\nLAYER\nNAME b\nTYPE LINE\nEND\n";
        match parser().read_style(content) {
            Err(MapstyleError::MultipleLayers { count }) => assert_eq!(count, 2),
            other => panic!("expected MultipleLayers, got {:?}", other.map(|t| t.value)),
        }

        let styles = parser().read_multi_styles(content).unwrap().value;
        let names: Vec<_> = styles.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_read_style_without_layers() {
        assert!(matches!(
            parser().read_style("MAP\nNAME empty\nEND\n"),
            Err(MapstyleError::NoLayers)
        ));
    }

    #[test]
    fn test_from_config_uses_symbols_path() {
        let config = Config {
            symbols_path: Some(PathBuf::from("osm.sym")),
            ..Default::default()
        };
        let parser = MapfileStyleParser::from_config(&config);
        assert_eq!(parser.options.default_path, Some(PathBuf::from("osm.sym")));
    }

    #[test]
    fn test_translation_is_deterministic() {
        let first = parser().read_style(CIRCLE).unwrap().value;
        let second = parser().read_style(CIRCLE).unwrap().value;
        assert_eq!(first, second);
    }
}
