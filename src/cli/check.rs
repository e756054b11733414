//! Check command implementation.
//!
//! Translates every Mapfile it is given (directories are walked) and
//! reports diagnostics without writing any output.

use std::path::{Path, PathBuf};

use clap::Args;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{MapstyleError, Result};
use crate::output::{display_path, plural, summary, Printer};

use super::{load_config, read_mapfile, style_parser};

/// Translate Mapfiles and report diagnostics without writing output
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Mapfiles or directories containing them
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Symbolset used when a Mapfile declares none
    #[arg(long)]
    pub symbols: Option<PathBuf>,

    /// Configuration file (default: ./mapstyle.yaml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Outcome of checking a set of files.
#[derive(Debug, Default, PartialEq)]
pub struct CheckReport {
    pub files: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
}

pub fn run(args: CheckArgs, printer: &Printer) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let report = check_paths(&args.paths, &config, args.symbols.as_ref(), printer);

    let totals = format!(
        "{} ({} failed, {}, {})",
        plural(report.files, "file", "files"),
        report.failed,
        plural(report.errors, "error", "errors"),
        plural(report.warnings, "warning", "warnings")
    );

    if report.failed > 0 {
        printer.error("Checked", &totals);
        return Err(MapstyleError::Check {
            message: format!("{} could not be translated", plural(report.failed, "file", "files")),
            help: Some("Fatal errors are listed above each file".to_string()),
        });
    }

    printer.success("Checked", &totals);
    Ok(())
}

/// Translate every Mapfile under `paths`, printing per-file results.
pub fn check_paths(
    paths: &[PathBuf],
    config: &Config,
    symbols: Option<&PathBuf>,
    printer: &Printer,
) -> CheckReport {
    let mut report = CheckReport::default();

    for file in collect_mapfiles(paths, config) {
        report.files += 1;

        let translated = read_mapfile(&file).and_then(|content| {
            style_parser(config, &file, symbols).read_multi_styles(&content)
        });

        match translated {
            Ok(translation) => {
                let diagnostics = &translation.diagnostics;
                report.errors += diagnostics.error_count();
                report.warnings += diagnostics.warning_count();

                if diagnostics.is_empty() {
                    printer.success("Checked", &display_path(&file));
                } else {
                    printer.warning(
                        "Checked",
                        &format!("{} ({})", display_path(&file), summary(diagnostics)),
                    );
                    printer.diagnostics(diagnostics);
                }
            }
            Err(err) => {
                report.failed += 1;
                printer.error("Failed", &format!("{}: {}", display_path(&file), err));
            }
        }
    }

    report
}

/// Files named directly, plus every `.map` file below named directories.
fn collect_mapfiles(paths: &[PathBuf], config: &Config) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|entry| entry.into_path())
            .filter(|p| p.is_file() && is_mapfile(p) && !config.is_excluded(p))
            .collect();
        found.sort();
        files.extend(found);
    }

    files
}

fn is_mapfile(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("map"))
}
