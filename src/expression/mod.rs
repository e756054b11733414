//! Mapfile expression parsing.
//!
//! Class `EXPRESSION` values come in two flavours:
//!
//! - CLASSITEM shorthands: `"literal"`, `/regex/`, `{a,b}`, compared
//!   against the layer's `CLASSITEM` attribute
//! - Logical expressions: `([attr] op value AND ...)`, parsed by a
//!   recursive-descent reader
//!
//! Constructs that cannot be expressed as a [`Filter`] are caught by
//! [`find_unsupported`] before parsing.
//!
//! # Usage
//!
//! ```ignore
//! use mapstyle::expression::{find_unsupported, parse_expression};
//!
//! let expr = "([type] = 'road' AND [lanes] > 2)";
//! assert!(find_unsupported(expr).is_none());
//! let filter = parse_expression(expr)?;
//! ```

mod filter;
mod parser;
mod precheck;
mod reader;

pub use filter::{ComparisonOperator, Filter, Literal, LogicalOperator, STR_MATCHES};
pub use parser::{
    is_classitem_shorthand, parse_classitem_expression, parse_expression, ExpressionError,
};
pub use precheck::{find_unsupported, Unsupported};
pub use reader::Reader;
