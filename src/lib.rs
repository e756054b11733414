//! mapstyle - MapServer Mapfile to normalized style translator
//!
//! A library for turning Mapfile `LAYER`/`CLASS`/`STYLE` definitions into
//! a renderer-neutral style model: rules with filters, scale ranges and
//! symbolizers.
//!
//! The pipeline runs in four stages:
//! - [`parser`] turns Mapfile text into a generic block tree
//! - [`symbols`] replaces symbol references with their definitions
//! - [`expression`] turns class expressions into filters
//! - [`style`] translates each layer into a [`Style`]

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod expression;
pub mod output;
pub mod parser;
pub mod style;
pub mod symbols;
pub mod types;

pub use config::{Config, CONFIG_FILENAME};
pub use diagnostics::{Category, Diagnostic, Diagnostics, Severity};
pub use error::{MapstyleError, Result};
pub use expression::{parse_expression, Filter, Literal};
pub use parser::{parse, parse_symbolset, Block, Node};
pub use style::{MapfileStyleParser, Rule, ScaleDenominator, Style, Symbolizer, Translation};
pub use symbols::{ResolveOptions, SymbolResolver};
pub use types::{is_hex_colour, rgb_to_hex, Colour};
