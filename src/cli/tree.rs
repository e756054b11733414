//! Tree command implementation.
//!
//! Dumps what the block parser sees: the generic tree as JSON, or each
//! line re-indented by its computed depth.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::output::Printer;
use crate::parser::{parse, parse_document, LineRecord};

use super::read_mapfile;

/// Dump the parsed block tree of a Mapfile
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Mapfile (or symbolset) to parse
    pub file: PathBuf,

    /// Print line records indented by block depth instead of JSON
    #[arg(long)]
    pub lines: bool,
}

pub fn run(args: TreeArgs, printer: &Printer) -> Result<()> {
    let content = read_mapfile(&args.file)?;
    let mut diagnostics = Diagnostics::new();

    let rendered = if args.lines {
        let document = parse_document(&content, &mut diagnostics)?;
        render_lines(&document.lines)
    } else {
        let tree = parse(&content, &mut diagnostics)?;
        serde_json::to_string_pretty(&tree)?
    };

    printer.diagnostics(&diagnostics);
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", rendered)?;
    Ok(())
}

/// One line per record: number, then the code indented two spaces per depth.
pub fn render_lines(lines: &[LineRecord]) -> String {
    lines
        .iter()
        .map(|record| {
            let mut line = format!("{:>4} {}{}", record.number, "  ".repeat(record.depth), record.code.trim());
            if let Some(comment) = &record.comment {
                line.push_str(" # ");
                line.push_str(comment);
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
