//! Convert command implementation.
//!
//! Translates one Mapfile and writes the style JSON to stdout or a file.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::error::{MapstyleError, Result};
use crate::output::{display_path, plural, summary, Printer};
use crate::style::Translation;

use super::{load_config, read_mapfile, style_parser};

/// Translate a Mapfile into style JSON
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Mapfile to translate
    pub file: PathBuf,

    /// Symbolset used when the Mapfile declares none
    #[arg(long)]
    pub symbols: Option<PathBuf>,

    /// Translate every layer (outputs an array of styles)
    #[arg(long)]
    pub multi: bool,

    /// Write JSON here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Single-line JSON
    #[arg(long)]
    pub compact: bool,

    /// Configuration file (default: ./mapstyle.yaml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: ConvertArgs, printer: &Printer) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let content = read_mapfile(&args.file)?;
    let parser = style_parser(&config, &args.file, args.symbols.as_ref());
    let pretty = config.pretty && !args.compact;

    printer.status("Converting", &display_path(&args.file));

    let (json, layers, diagnostics) = if args.multi || config.multi {
        let Translation { value, diagnostics } = parser.read_multi_styles(&content)?;
        (to_json(&value, pretty)?, value.len(), diagnostics)
    } else {
        let Translation { value, diagnostics } = parser.read_style(&content)?;
        (to_json(&value, pretty)?, 1, diagnostics)
    };

    printer.diagnostics(&diagnostics);

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{}\n", json)).map_err(|e| MapstyleError::Io {
                path: path.clone(),
                message: format!("Failed to write output: {}", e),
            })?;
            printer.success(
                "Wrote",
                &format!("{} ({})", display_path(path), plural(layers, "layer", "layers")),
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }

    if diagnostics.is_empty() {
        printer.success("Finished", &plural(layers, "layer", "layers"));
    } else {
        printer.warning("Finished", &format!("{} with {}", plural(layers, "layer", "layers"), summary(&diagnostics)));
    }

    Ok(())
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
