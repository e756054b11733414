pub mod check;
pub mod completions;
pub mod convert;
pub mod tree;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::{MapstyleError, Result};
use crate::style::MapfileStyleParser;

/// mapstyle - MapServer Mapfile to normalized style translator
#[derive(Parser, Debug)]
#[command(name = "mapstyle")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a Mapfile into style JSON
    Convert(convert::ConvertArgs),

    /// Translate Mapfiles and report diagnostics without writing output
    Check(check::CheckArgs),

    /// Dump the parsed block tree of a Mapfile
    Tree(tree::TreeArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Read a Mapfile, mapping failures to an error naming the path.
pub(crate) fn read_mapfile(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| MapstyleError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read Mapfile: {}", e),
    })
}

/// Load `--config`, or discover mapstyle.yaml in the working directory.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::discover("."),
    }
}

/// Translator for one input file: relative `SYMBOLSET` paths resolve
/// against the file's directory and `--symbols` overrides the config.
pub(crate) fn style_parser(config: &Config, input: &Path, symbols: Option<&PathBuf>) -> MapfileStyleParser {
    let mut parser = MapfileStyleParser::from_config(config);
    if let Some(dir) = input.parent() {
        parser = parser.with_base_dir(dir);
    }
    if let Some(symbols) = symbols {
        parser = parser.with_symbols_path(symbols);
    }
    parser
}
