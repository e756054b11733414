//! Typed reads of Mapfile style values.

use crate::parser::Block;
use crate::types::Colour;

/// Colour under `key` as `#RRGGBB` (or `#RRGGBBAA`).
///
/// `-1 -1 -1` and attribute bindings yield `None`.
pub fn colour(block: &Block, key: &str) -> Option<String> {
    block
        .str(key)
        .and_then(Colour::parse_mapfile)
        .map(|c| c.to_string())
}

/// A 0–100 `OPACITY` as 0–1.
pub fn opacity(block: &Block) -> Option<f64> {
    percent(block, "opacity")
}

/// A 0–100 value under `key` as 0–1.
pub fn percent(block: &Block, key: &str) -> Option<f64> {
    block.number(key).map(|v| (v / 100.0).clamp(0.0, 1.0))
}

/// Whitespace-separated numbers, e.g. a `PATTERN` dash list.
pub fn numbers(block: &Block, key: &str) -> Option<Vec<f64>> {
    let values: Vec<f64> = block
        .str(key)?
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

/// `ANGLE`; `AUTO` and attribute bindings read as 0.
pub fn angle(block: &Block) -> f64 {
    block.number("angle").unwrap_or(0.0)
}

/// Boolean keywords (`TRUE`/`FALSE`, `ON`/`OFF`, `YES`/`NO`).
pub fn flag(block: &Block, key: &str) -> Option<bool> {
    match block.str(key)?.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}
