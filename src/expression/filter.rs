//! Normalized filter tree.
//!
//! Filters serialize in the array-expression convention used by style
//! consumers:
//!
//! - `["==", "attr", value]`
//! - `["*=", ["FN_strMatches", "attr", "/re/"], true]`
//! - `["!", filter]`
//! - `["&&", f1, f2, ...]` / `["||", ...]`

use std::fmt;

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;

/// Name of the string-matching function pattern filters lower to.
pub const STR_MATCHES: &str = "FN_strMatches";

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl ComparisonOperator {
    /// Normalize a Mapfile operator token (`eq`, `=`, `!=`, `le`, ...).
    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token.to_ascii_lowercase().as_str() {
            "=" | "==" | "eq" => ComparisonOperator::Eq,
            "!=" | "ne" => ComparisonOperator::Ne,
            "<" | "lt" => ComparisonOperator::Lt,
            ">" | "gt" => ComparisonOperator::Gt,
            "<=" | "le" => ComparisonOperator::Le,
            ">=" | "ge" => ComparisonOperator::Ge,
            _ => return None,
        };
        Some(op)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "==",
            ComparisonOperator::Ne => "!=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Le => "<=",
            ComparisonOperator::Ge => ">=",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical combination operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
        }
    }
}

/// A comparison value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
}

impl Literal {
    /// Type a raw token: anything starting with a digit (or `-digit`) that
    /// parses as a number is a number, everything else is text.
    pub fn from_token(token: &str) -> Self {
        let digits = token.strip_prefix('-').unwrap_or(token);
        let numeric_start = digits.chars().next().is_some_and(|c| c.is_ascii_digit());

        match token.parse::<f64>() {
            Ok(n) if numeric_start && n.is_finite() => Literal::Number(n),
            _ => Literal::Text(token.to_string()),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Literal::Text(value.into())
    }
}

impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // whole numbers print without a trailing ".0"
            Literal::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                serializer.serialize_i64(*n as i64)
            }
            Literal::Number(n) => serializer.serialize_f64(*n),
            Literal::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Text(s) => write!(f, "'{}'", s),
        }
    }
}

/// A filter expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Comparison {
        operator: ComparisonOperator,
        attribute: String,
        value: Literal,
    },
    /// String-matches-regex; `pattern` is written as `/body/` or `/body/i`.
    Match { attribute: String, pattern: String },
    Not(Box<Filter>),
    Combination {
        operator: LogicalOperator,
        filters: Vec<Filter>,
    },
}

impl Filter {
    pub fn comparison(operator: ComparisonOperator, attribute: impl Into<String>, value: Literal) -> Self {
        Filter::Comparison {
            operator,
            attribute: attribute.into(),
            value,
        }
    }

    pub fn matches(attribute: impl Into<String>, pattern: impl Into<String>) -> Self {
        Filter::Match {
            attribute: attribute.into(),
            pattern: pattern.into(),
        }
    }

    pub fn negate(filter: Filter) -> Self {
        Filter::Not(Box::new(filter))
    }

    /// Combine filters; a single filter is returned unwrapped.
    pub fn combine(operator: LogicalOperator, mut filters: Vec<Filter>) -> Self {
        if filters.len() == 1 {
            if let Some(only) = filters.pop() {
                return only;
            }
        }
        Filter::Combination { operator, filters }
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Filter::Comparison {
                operator,
                attribute,
                value,
            } => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element(operator.as_str())?;
                seq.serialize_element(attribute)?;
                seq.serialize_element(value)?;
                seq.end()
            }
            Filter::Match { attribute, pattern } => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element("*=")?;
                seq.serialize_element(&(STR_MATCHES, attribute, pattern))?;
                seq.serialize_element(&true)?;
                seq.end()
            }
            Filter::Not(inner) => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element("!")?;
                seq.serialize_element(inner.as_ref())?;
                seq.end()
            }
            Filter::Combination { operator, filters } => {
                let mut seq = serializer.serialize_seq(Some(filters.len() + 1))?;
                seq.serialize_element(operator.as_str())?;
                for filter in filters {
                    seq.serialize_element(filter)?;
                }
                seq.end()
            }
        }
    }
}
