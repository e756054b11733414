//! Block parser for Mapfile and symbolset text.
//!
//! Both formats share one grammar: `KEY value` lines, `KEY ... END` blocks
//! and a handful of pseudo-blocks whose body is really a value. The parser
//! produces a generic [`Block`] tree and knows nothing about styling.
//!
//! # Usage
//!
//! ```ignore
//! use mapstyle::diagnostics::Diagnostics;
//! use mapstyle::parser::parse;
//!
//! let mut diagnostics = Diagnostics::new();
//! let tree = parse(&std::fs::read_to_string("roads.map")?, &mut diagnostics)?;
//!
//! for layer in tree.block("map").into_iter().flat_map(|m| m.blocks("layers")) {
//!     println!("{:?}", layer.str("name"));
//! }
//! ```

mod block;
mod line;
mod node;

pub use block::{check_block_end_sum, parse, parse_document, parse_symbolset, plural, Document};
pub use line::{strip_quotes, LineRecord};
pub use node::{Block, Node};
