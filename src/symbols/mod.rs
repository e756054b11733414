//! Symbol reference resolution.
//!
//! Styles refer to symbols by name (`SYMBOL "circle"`) or by index into the
//! symbolset (`SYMBOL 3`). Resolution replaces each reference in the tree
//! with the full `SYMBOL` block so the translator never has to look symbols
//! up itself.
//!
//! The symbolset is taken from, in order:
//!
//! 1. the Mapfile's own `SYMBOLSET` path
//! 2. a `mapfile-symbols-path=<path>` invocation argument
//! 3. the configured default path
//!
//! A Mapfile with inline `SYMBOL` blocks and no `SYMBOLSET` is resolved
//! against those blocks instead.

use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::{Category, Diagnostic, Diagnostics};
use crate::error::{MapstyleError, Result};
use crate::parser::{parse_symbolset, Block, Node};

/// Invocation argument prefix naming a symbolset file.
pub const SYMBOLS_PATH_ARG: &str = "mapfile-symbols-path=";

/// The symbolset path given as a `mapfile-symbols-path=` argument, if any.
pub fn symbols_path_from_args<S: AsRef<str>>(args: &[S]) -> Option<PathBuf> {
    args.iter()
        .find_map(|arg| arg.as_ref().strip_prefix(SYMBOLS_PATH_ARG))
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
}

/// Where to look for a symbolset.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Fallback symbolset file.
    pub default_path: Option<PathBuf>,
    /// Invocation arguments scanned for `mapfile-symbols-path=`.
    pub args: Vec<String>,
    /// Directory relative `SYMBOLSET` paths are resolved against.
    pub base_dir: Option<PathBuf>,
}

impl ResolveOptions {
    /// Candidate symbolset files in priority order.
    pub fn candidates(&self, declared: Option<&str>) -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Some(declared) = declared.filter(|d| !d.is_empty()) {
            let path = PathBuf::from(declared);
            match &self.base_dir {
                Some(base) if path.is_relative() => candidates.push(base.join(&path)),
                _ => candidates.push(path),
            }
        }
        if let Some(path) = symbols_path_from_args(&self.args) {
            candidates.push(path);
        }
        if let Some(path) = &self.default_path {
            candidates.push(path.clone());
        }

        candidates
    }
}

/// A loaded list of symbol definitions.
#[derive(Debug, Clone, Default)]
pub struct SymbolResolver {
    symbols: Vec<Block>,
}

impl SymbolResolver {
    pub fn new(symbols: Vec<Block>) -> Self {
        Self { symbols }
    }

    /// Load and parse a symbolset file.
    pub fn from_file(path: &Path, diagnostics: &mut Diagnostics) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| MapstyleError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self::new(parse_symbolset(&content, diagnostics)?))
    }

    pub fn symbols(&self) -> &[Block] {
        &self.symbols
    }

    /// Find a symbol by name, falling back to a 0-based index.
    pub fn lookup(&self, reference: &str) -> Option<&Block> {
        let name = unquote(reference);
        self.symbols
            .iter()
            .find(|symbol| symbol.str("name").map(unquote) == Some(name))
            .or_else(|| {
                name.parse::<usize>()
                    .ok()
                    .and_then(|index| self.symbols.get(index))
            })
    }

    /// Find a symbol whose name or image matches (inline symbol lists).
    pub fn lookup_inline(&self, reference: &str) -> Option<&Block> {
        let name = unquote(reference);
        self.symbols.iter().find(|symbol| {
            symbol.str("name").map(unquote) == Some(name)
                || symbol.str("image").map(unquote) == Some(name)
        })
    }

    /// Replace every `symbol` reference below `block`, recursively.
    pub fn substitute(&self, block: &mut Block, diagnostics: &mut Diagnostics) {
        let line = block.line();
        let mut clear = false;

        for (key, node) in block.iter_mut() {
            match node {
                Node::Block(child) => self.substitute(child, diagnostics),
                Node::List(items) => {
                    for child in items.iter_mut().filter_map(Node::as_block_mut) {
                        self.substitute(child, diagnostics);
                    }
                }
                Node::Scalar(value) if key == "symbol" => {
                    let reference = value.clone();
                    if reference == "0" {
                        clear = true;
                        continue;
                    }
                    if !is_reference(&reference) {
                        continue;
                    }
                    match self.lookup(&reference) {
                        Some(symbol) => *node = Node::Block(symbol.clone()),
                        None => diagnostics.push(unknown_reference(&reference, line)),
                    }
                }
                Node::Scalar(_) => {}
            }
        }

        if clear {
            block.remove("symbol");
        }
    }

    /// Resolve only the styles of classes and labels (inline symbol lists).
    fn substitute_styles(&self, map: &mut Block, diagnostics: &mut Diagnostics) {
        for layer in map.blocks_mut("layers") {
            for class in layer.blocks_mut("classes") {
                for style in class.blocks_mut("styles") {
                    self.substitute_style(style, diagnostics);
                }
                for label in class.blocks_mut("labels") {
                    for style in label.blocks_mut("styles") {
                        self.substitute_style(style, diagnostics);
                    }
                }
            }
        }
    }

    fn substitute_style(&self, style: &mut Block, diagnostics: &mut Diagnostics) {
        let Some(reference) = style.str("symbol").map(str::to_string) else {
            return;
        };

        if reference == "0" {
            style.remove("symbol");
        } else if is_reference(&reference) {
            match self.lookup_inline(&reference) {
                Some(symbol) => {
                    style.insert("symbol", Node::Block(symbol.clone()));
                }
                None => diagnostics.push(unknown_reference(&reference, style.line())),
            }
        }
    }
}

/// Resolve symbol references in a parsed Mapfile tree, in place.
///
/// Only I/O and parse failures of the symbolset itself are fatal; a
/// missing symbolset leaves references untouched with a diagnostic.
pub fn resolve(tree: &mut Block, options: &ResolveOptions, diagnostics: &mut Diagnostics) -> Result<()> {
    let Some(map) = tree.block_mut("map") else {
        return Ok(());
    };

    let declared = map.str("symbolset").map(str::to_string);

    if declared.is_none() && !map.list("symbols").is_empty() {
        let inline = SymbolResolver::new(map.blocks("symbols").cloned().collect());
        inline.substitute_styles(map, diagnostics);
        return Ok(());
    }

    let candidates = options.candidates(declared.as_deref());
    match candidates.iter().find(|path| path.is_file()) {
        Some(path) => {
            let resolver = SymbolResolver::from_file(path, diagnostics)?;
            resolver.substitute(tree, diagnostics);
        }
        None if has_references(tree) => {
            let tried = if candidates.is_empty() {
                "no symbolset path configured".to_string()
            } else {
                let paths: Vec<_> = candidates.iter().map(|p| p.display().to_string()).collect();
                format!("tried {}", paths.join(", "))
            };
            diagnostics.push(
                Diagnostic::warning(
                    Category::Symbol,
                    "mapstyle::symbol::unresolved-path",
                    format!("Symbolset could not be found ({}), symbol references are left unresolved", tried),
                )
                .at_line(tree.block("map").and_then(Block::line))
                .with_help(format!(
                    "Set SYMBOLSET in the Mapfile, pass {}<path>, or configure symbols_path",
                    SYMBOLS_PATH_ARG
                )),
            );
        }
        None => {}
    }

    Ok(())
}

/// Whether any resolvable `symbol` reference exists below `block`.
fn has_references(block: &Block) -> bool {
    block.iter().any(|(key, node)| match node {
        Node::Scalar(value) => key == "symbol" && value != "0" && is_reference(value),
        Node::Block(child) => has_references(child),
        Node::List(items) => items.iter().filter_map(Node::as_block).any(has_references),
    })
}

/// Attribute bindings (`[symbol]`) are data-driven and never resolved.
fn is_reference(value: &str) -> bool {
    !value.trim().is_empty() && !value.trim_start().starts_with('[')
}

fn unquote(s: &str) -> &str {
    s.trim().trim_matches(|c| c == '"' || c == '\'')
}

fn unknown_reference(reference: &str, line: Option<usize>) -> Diagnostic {
    Diagnostic::warning(
        Category::Symbol,
        "mapstyle::symbol::unknown-reference",
        format!("Symbol '{}' is not defined in the symbolset", reference),
    )
    .at_line(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SYMBOLSET: &str = r#"
SYMBOLSET
  SYMBOL
    NAME "circle"
    TYPE ELLIPSE
    FILLED TRUE
    POINTS 1 1 END
  END
  SYMBOL
    NAME "square"
    TYPE VECTOR
    FILLED TRUE
    POINTS
      0 0
      1 0
      1 1
      0 1
      0 0
    END
  END
END
"#;

    fn symbolset_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SYMBOLSET.as_bytes()).unwrap();
        file
    }

    fn style_symbol(tree: &Block) -> Option<&Node> {
        tree.block("map")?
            .blocks("layers")
            .next()?
            .blocks("classes")
            .next()?
            .blocks("styles")
            .next()?
            .get("symbol")
    }

    fn parse_tree(content: &str) -> Block {
        let mut diagnostics = Diagnostics::new();
        parse(content, &mut diagnostics).unwrap()
    }

    const LAYER: &str = "LAYER\n CLASS\n  STYLE\n   SYMBOL SYM\n  END\n END\nEND\n";

    fn layer_with(symbol: &str) -> String {
        LAYER.replace("SYM", symbol)
    }

    #[test]
    fn test_args_path() {
        let args = vec!["mapstyle".to_string(), "mapfile-symbols-path=/tmp/a.sym".to_string()];
        assert_eq!(symbols_path_from_args(&args), Some(PathBuf::from("/tmp/a.sym")));
        assert_eq!(symbols_path_from_args(&["mapfile-symbols-path="]), None);
    }

    #[test]
    fn test_substitutes_by_name_and_index() {
        let file = symbolset_file();
        let options = ResolveOptions {
            default_path: Some(file.path().to_path_buf()),
            ..Default::default()
        };

        for (reference, expected) in [("'circle'", "circle"), ("1", "square")] {
            let mut tree = parse_tree(&layer_with(reference));
            let mut diagnostics = Diagnostics::new();
            resolve(&mut tree, &options, &mut diagnostics).unwrap();

            let symbol = style_symbol(&tree).and_then(Node::as_block).unwrap();
            assert_eq!(symbol.str("name"), Some(expected));
            assert!(diagnostics.is_empty());
        }
    }

    #[test]
    fn test_zero_clears_reference() {
        let file = symbolset_file();
        let options = ResolveOptions {
            default_path: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let mut tree = parse_tree(&layer_with("0"));
        resolve(&mut tree, &options, &mut Diagnostics::new()).unwrap();
        assert!(style_symbol(&tree).is_none());
    }

    #[test]
    fn test_unknown_reference_stays() {
        let file = symbolset_file();
        let options = ResolveOptions {
            default_path: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let mut tree = parse_tree(&layer_with("'hexagon'"));
        let mut diagnostics = Diagnostics::new();
        resolve(&mut tree, &options, &mut diagnostics).unwrap();

        assert_eq!(style_symbol(&tree).and_then(Node::as_str), Some("hexagon"));
        let warning = diagnostics
            .with_code("mapstyle::symbol::unknown-reference")
            .next()
            .unwrap();
        assert_eq!(warning.line, Some(3));
    }

    #[test]
    fn test_missing_symbolset_is_diagnosed() {
        let options = ResolveOptions {
            default_path: Some(PathBuf::from("/definitely/not/here.sym")),
            ..Default::default()
        };
        let mut tree = parse_tree(&layer_with("'circle'"));
        let mut diagnostics = Diagnostics::new();
        resolve(&mut tree, &options, &mut diagnostics).unwrap();

        assert!(diagnostics.contains_code("mapstyle::symbol::unresolved-path"));
        assert_eq!(style_symbol(&tree).and_then(Node::as_str), Some("circle"));
    }

    #[test]
    fn test_no_references_no_diagnostic() {
        let mut tree = parse_tree("LAYER\n CLASS\n  STYLE\n   COLOR 1 2 3\n  END\n END\nEND\n");
        let mut diagnostics = Diagnostics::new();
        resolve(&mut tree, &ResolveOptions::default(), &mut diagnostics).unwrap();
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_declared_symbolset_wins_over_args_and_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("local.sym"), SYMBOLSET).unwrap();
        std::fs::write(
            dir.path().join("other.sym"),
            "SYMBOLSET\n SYMBOL\n  NAME \"circle\"\n  TYPE PIXMAP\n END\nEND\n",
        )
        .unwrap();

        let options = ResolveOptions {
            default_path: Some(dir.path().join("other.sym")),
            args: vec![format!("{}{}", SYMBOLS_PATH_ARG, dir.path().join("other.sym").display())],
            base_dir: Some(dir.path().to_path_buf()),
        };
        let content = format!("MAP\n SYMBOLSET \"local.sym\"\n{}END\n", layer_with("'circle'"));
        let mut tree = parse_tree(&content);
        resolve(&mut tree, &options, &mut Diagnostics::new()).unwrap();

        let symbol = style_symbol(&tree).and_then(Node::as_block).unwrap();
        assert_eq!(symbol.str("type"), Some("ELLIPSE"));
    }

    #[test]
    fn test_args_win_over_default() {
        let options = ResolveOptions {
            default_path: Some(PathBuf::from("b.sym")),
            args: vec!["mapfile-symbols-path=a.sym".to_string()],
            base_dir: None,
        };
        assert_eq!(
            options.candidates(None),
            vec![PathBuf::from("a.sym"), PathBuf::from("b.sym")]
        );
    }

    #[test]
    fn test_inline_symbols() {
        let content = r#"
MAP
  SYMBOL
    NAME "marker"
    TYPE PIXMAP
    IMAGE "marker.png"
  END
  LAYER
    CLASS
      STYLE
        SYMBOL "marker.png"
      END
      LABEL
        STYLE
          SYMBOL "marker"
        END
      END
    END
  END
END
"#;
        let mut tree = parse_tree(content);
        let mut diagnostics = Diagnostics::new();
        resolve(&mut tree, &ResolveOptions::default(), &mut diagnostics).unwrap();

        let symbol = style_symbol(&tree).and_then(Node::as_block).unwrap();
        assert_eq!(symbol.str("name"), Some("marker"));

        let label_style = tree
            .block("map")
            .and_then(|map| map.blocks("layers").next())
            .and_then(|layer| layer.blocks("classes").next())
            .and_then(|class| class.blocks("labels").next())
            .and_then(|label| label.blocks("styles").next())
            .unwrap();
        assert!(label_style.block("symbol").is_some());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_attribute_binding_is_left_alone() {
        let file = symbolset_file();
        let options = ResolveOptions {
            default_path: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let mut tree = parse_tree(&layer_with("[sym]"));
        let mut diagnostics = Diagnostics::new();
        resolve(&mut tree, &options, &mut diagnostics).unwrap();
        assert_eq!(style_symbol(&tree).and_then(Node::as_str), Some("[sym]"));
        assert!(diagnostics.is_empty());
    }
}
