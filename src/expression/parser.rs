//! Recursive-descent parser for Mapfile logical expressions.
//!
//! ```text
//! or         := and (("OR" | "||") and)*
//! and        := unary (("AND" | "&&") unary)*
//! unary      := ("!" | "NOT") unary | "(" or ")" | comparison
//! comparison := attribute operator value
//! attribute  := ["'] "[" name "]" ["']
//! ```

use thiserror::Error;

use crate::error::MapstyleError;

use super::filter::{ComparisonOperator, Filter, Literal, LogicalOperator};
use super::reader::Reader;

/// Why an expression could not be turned into a filter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("missing attribute reference at '{near}'")]
    MissingAttribute { near: String },

    #[error("missing operator after [{attribute}]")]
    MissingOperator { attribute: String },

    #[error("missing value in '[{attribute}] {operator}'")]
    MissingValue { attribute: String, operator: String },

    #[error("unknown operator '{operator}'")]
    UnknownOperator { operator: String },

    #[error("unbalanced expression, expected '{expected}'")]
    Unbalanced { expected: char },

    #[error("could not parse '{rest}'")]
    Leftover { rest: String },

    #[error("empty expression")]
    Empty,
}

impl ExpressionError {
    /// Tokenization failures with no fallback interpretation.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExpressionError::MissingAttribute { .. }
                | ExpressionError::MissingOperator { .. }
                | ExpressionError::MissingValue { .. }
        )
    }
}

impl From<ExpressionError> for MapstyleError {
    fn from(err: ExpressionError) -> Self {
        let help = match &err {
            ExpressionError::MissingAttribute { .. } => {
                Some("Comparisons start with an attribute such as [name]".to_string())
            }
            ExpressionError::MissingOperator { .. } => {
                Some("Use one of =, !=, <, >, <=, >=, ~, ~*, IN".to_string())
            }
            ExpressionError::MissingValue { .. } => Some("Add a value after the operator".to_string()),
            _ => None,
        };
        MapstyleError::Expression {
            message: err.to_string(),
            help,
        }
    }
}

type ParseResult<T> = std::result::Result<T, ExpressionError>;

/// Parse a parenthesized Mapfile expression such as
/// `([type] = 'road' AND [lanes] > 2)`.
///
/// The whole input must be consumed; trailing text is a
/// [`ExpressionError::Leftover`].
pub fn parse_expression(expr: &str) -> ParseResult<Filter> {
    let mut reader = Reader::new(expr);
    reader.skip_whitespace();
    if reader.is_at_end() {
        return Err(ExpressionError::Empty);
    }

    let filter = parse_or(&mut reader)?;
    finish(&mut reader)?;
    Ok(filter)
}

/// Whether a raw class expression is a CLASSITEM shorthand
/// (`"literal"`, `/regex/` or `{a,b}`).
pub fn is_classitem_shorthand(expr: &str) -> bool {
    matches!(expr.trim_start().chars().next(), Some('"' | '\'' | '/' | '{'))
}

/// Parse a CLASSITEM shorthand against the layer's `classitem` attribute.
///
/// - `"road"` → `classitem == "road"` (always a string)
/// - `/^A/i` → `classitem` matches `/^A/i`
/// - `{a,b}` → `classitem` matches `/(a|b)/`
pub fn parse_classitem_expression(expr: &str, classitem: &str) -> ParseResult<Filter> {
    let mut reader = Reader::new(expr);
    reader.skip_whitespace();

    let filter = match reader.peek() {
        Some(q @ ('"' | '\'')) => {
            let text = reader
                .take_delimited(q)
                .ok_or(ExpressionError::Unbalanced { expected: q })?;
            Filter::comparison(ComparisonOperator::Eq, classitem, Literal::text(text))
        }
        Some('/') => Filter::matches(classitem, regex(&mut reader, false)?),
        Some('{') => Filter::matches(classitem, list(&mut reader)?),
        _ => {
            return Err(ExpressionError::Leftover {
                rest: reader.remaining().to_string(),
            })
        }
    };

    finish(&mut reader)?;
    Ok(filter)
}

fn finish(reader: &mut Reader<'_>) -> ParseResult<()> {
    reader.skip_whitespace();
    if reader.is_at_end() {
        Ok(())
    } else {
        Err(ExpressionError::Leftover {
            rest: reader.remaining().to_string(),
        })
    }
}

fn parse_or(reader: &mut Reader<'_>) -> ParseResult<Filter> {
    let mut terms = vec![parse_and(reader)?];
    while eat_logical(reader, LogicalOperator::Or) {
        terms.push(parse_and(reader)?);
    }
    Ok(Filter::combine(LogicalOperator::Or, terms))
}

fn parse_and(reader: &mut Reader<'_>) -> ParseResult<Filter> {
    let mut terms = vec![parse_unary(reader)?];
    while eat_logical(reader, LogicalOperator::And) {
        terms.push(parse_unary(reader)?);
    }
    Ok(Filter::combine(LogicalOperator::And, terms))
}

fn eat_logical(reader: &mut Reader<'_>, operator: LogicalOperator) -> bool {
    reader.skip_whitespace();
    match operator {
        LogicalOperator::And => reader.eat_str("&&") || reader.eat_keyword("and"),
        LogicalOperator::Or => reader.eat_str("||") || reader.eat_keyword("or"),
    }
}

fn parse_unary(reader: &mut Reader<'_>) -> ParseResult<Filter> {
    reader.skip_whitespace();

    if reader.eat('!') || reader.eat_keyword("not") {
        return Ok(Filter::negate(parse_unary(reader)?));
    }

    if reader.eat('(') {
        let inner = parse_or(reader)?;
        reader.skip_whitespace();
        if !reader.eat(')') {
            return Err(ExpressionError::Unbalanced { expected: ')' });
        }
        return Ok(inner);
    }

    parse_comparison(reader)
}

fn parse_comparison(reader: &mut Reader<'_>) -> ParseResult<Filter> {
    let attribute = attribute(reader)?;

    reader.skip_whitespace();
    let operator = match reader.peek() {
        Some(c) if "=!<>~".contains(c) => reader.take_while(|c| "=!<>~*".contains(c)),
        Some(c) if c.is_alphabetic() => reader.take_while(char::is_alphabetic),
        _ => "",
    };
    if operator.is_empty() {
        return Err(ExpressionError::MissingOperator { attribute });
    }

    reader.skip_whitespace();
    if reader.is_at_end() || reader.peek() == Some(')') {
        return Err(ExpressionError::MissingValue {
            attribute,
            operator: operator.to_string(),
        });
    }

    match operator.to_ascii_lowercase().as_str() {
        "~" => Ok(Filter::matches(attribute, regex(reader, false)?)),
        "~*" => Ok(Filter::matches(attribute, regex(reader, true)?)),
        "in" => Ok(Filter::matches(attribute, list(reader)?)),
        token => {
            let operator = ComparisonOperator::from_token(token).ok_or_else(|| {
                ExpressionError::UnknownOperator {
                    operator: operator.to_string(),
                }
            })?;
            let value = match reader.peek() {
                Some(q @ ('"' | '\'')) => reader
                    .take_delimited(q)
                    .ok_or(ExpressionError::Unbalanced { expected: q })?,
                _ => bare_token(reader),
            };
            Ok(Filter::comparison(operator, attribute, Literal::from_token(value)))
        }
    }
}

/// `[name]`, optionally wrapped in quotes.
fn attribute(reader: &mut Reader<'_>) -> ParseResult<String> {
    reader.skip_whitespace();

    let quote = match reader.peek() {
        Some(q @ ('"' | '\'')) if reader.remaining()[1..].starts_with('[') => {
            reader.eat(q);
            Some(q)
        }
        _ => None,
    };

    let name = reader
        .take_between('[', ']')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ExpressionError::MissingAttribute {
            near: reader.remaining().to_string(),
        })?;

    if let Some(q) = quote {
        if !reader.eat(q) {
            return Err(ExpressionError::Unbalanced { expected: q });
        }
    }

    Ok(name.to_string())
}

/// A regex value, returned as `/body/` or `/body/i`.
fn regex(reader: &mut Reader<'_>, insensitive: bool) -> ParseResult<String> {
    let (body, flagged) = match reader.peek() {
        Some(d @ ('/' | '"' | '\'')) => {
            let body = reader
                .take_delimited(d)
                .ok_or(ExpressionError::Unbalanced { expected: d })?;
            (body, d == '/' && reader.eat('i'))
        }
        _ => (bare_token(reader), false),
    };

    let flags = if insensitive || flagged { "i" } else { "" };
    Ok(format!("/{}/{}", body, flags))
}

/// A `{a,b}` or quoted `"a,b"` list, returned as `/(a|b)/`.
fn list(reader: &mut Reader<'_>) -> ParseResult<String> {
    let raw = match reader.peek() {
        Some('{') => reader
            .take_between('{', '}')
            .ok_or(ExpressionError::Unbalanced { expected: '}' })?,
        Some(q @ ('"' | '\'')) => reader
            .take_delimited(q)
            .ok_or(ExpressionError::Unbalanced { expected: q })?,
        _ => bare_token(reader),
    };

    let items: Vec<&str> = raw
        .split(',')
        .map(|item| item.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|item| !item.is_empty())
        .collect();
    Ok(format!("/({})/", items.join("|")))
}

fn bare_token<'a>(reader: &mut Reader<'a>) -> &'a str {
    reader.take_while(|c| !c.is_whitespace() && c != ')')
}
