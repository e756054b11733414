//! Detection of expression constructs that have no filter equivalent.
//!
//! Arithmetic, string functions, spatial predicates and temporal literals
//! are rejected up front instead of being half-parsed.

use std::fmt;

/// MapServer string functions.
const STRING_FUNCTIONS: [&str; 7] = [
    "tostring", "commify", "upper", "lower", "initcap", "firstcap", "length",
];

/// MapServer spatial predicates and geometry functions.
const SPATIAL_FUNCTIONS: [&str; 19] = [
    "intersects",
    "disjoint",
    "touches",
    "overlaps",
    "crosses",
    "within",
    "contains",
    "equals",
    "beyond",
    "dwithin",
    "area",
    "distance",
    "fromtext",
    "buffer",
    "difference",
    "simplify",
    "simplifypt",
    "generalize",
    "smoothsia",
];

/// Words that may legitimately precede a parenthesis.
const KEYWORDS: [&str; 10] = ["not", "and", "or", "in", "eq", "ne", "lt", "gt", "le", "ge"];

/// Stands in for quoted text, attribute references, lists and regexes.
const OPERAND: char = '\u{1}';

/// A construct that makes an expression untranslatable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unsupported {
    Arithmetic(char),
    StringFunction(String),
    SpatialPredicate(String),
    Function(String),
    Temporal,
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unsupported::Arithmetic(op) => write!(f, "arithmetic operator '{}'", op),
            Unsupported::StringFunction(name) => write!(f, "string function '{}'", name),
            Unsupported::SpatialPredicate(name) => write!(f, "spatial function '{}'", name),
            Unsupported::Function(name) => write!(f, "function '{}'", name),
            Unsupported::Temporal => write!(f, "temporal literal"),
        }
    }
}

/// Find the first unsupported construct in a raw expression.
pub fn find_unsupported(expr: &str) -> Option<Unsupported> {
    let masked = match mask(expr) {
        Ok(masked) => masked,
        Err(found) => return Some(found),
    };
    find_arithmetic(&masked).or_else(|| find_function(&masked))
}

/// Replace every literal with a single [`OPERAND`] so operators inside
/// strings or regexes are never seen. A backtick outside a literal is a
/// temporal expression and short-circuits.
fn mask(expr: &str) -> Result<Vec<char>, Unsupported> {
    let chars: Vec<char> = expr.chars().collect();
    let mut out = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let closing = match c {
            '"' | '\'' => Some(c),
            '[' => Some(']'),
            '{' => Some('}'),
            '/' if starts_regex(&out) => Some('/'),
            '`' => return Err(Unsupported::Temporal),
            _ => None,
        };

        match closing {
            Some(close) => {
                i = skip_literal(&chars, i + 1, close);
                out.push(OPERAND);
            }
            None => {
                out.push(c);
                i += 1;
            }
        }
    }

    Ok(out)
}

/// Index just past the closing character (or the end of input).
fn skip_literal(chars: &[char], mut i: usize, close: char) -> usize {
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == close => return i + 1,
            _ => i += 1,
        }
    }
    i
}

/// A `/` opens a regex at the start of an expression or after `~` / `~*`.
fn starts_regex(masked: &[char]) -> bool {
    let mut significant = masked.iter().rev().copied().filter(|c| !c.is_whitespace());
    match significant.next() {
        None | Some('~') | Some('(') => true,
        Some('*') => significant.next() == Some('~'),
        _ => false,
    }
}

fn is_operand_end(c: char) -> bool {
    c == OPERAND || c == ')' || c == '.' || c.is_alphanumeric()
}

fn previous_significant(masked: &[char], i: usize) -> Option<char> {
    masked[..i].iter().rev().copied().find(|c| !c.is_whitespace())
}

fn find_arithmetic(masked: &[char]) -> Option<Unsupported> {
    for (i, &c) in masked.iter().enumerate() {
        let arithmetic = match c {
            '+' | '^' | '%' | '/' => true,
            '*' => previous_significant(masked, i) != Some('~'),
            '-' => is_binary_minus(masked, i),
            _ => false,
        };
        if arithmetic {
            return Some(Unsupported::Arithmetic(c));
        }
    }
    None
}

/// `-` is a subtraction when it follows an operand, unless it joins two
/// word characters (`2004-01-01`, `north-east`).
fn is_binary_minus(masked: &[char], i: usize) -> bool {
    if !previous_significant(masked, i).is_some_and(is_operand_end) {
        return false;
    }

    let word = |c: Option<&char>| c.is_some_and(|c| *c != OPERAND && c.is_alphanumeric());
    let joined = i > 0 && word(masked.get(i - 1)) && word(masked.get(i + 1));
    !joined
}

fn find_function(masked: &[char]) -> Option<Unsupported> {
    let mut i = 0;
    while i < masked.len() {
        if !masked[i].is_alphabetic() {
            i += 1;
            continue;
        }

        let start = i;
        while i < masked.len() && (masked[i].is_alphanumeric() || masked[i] == '_') {
            i += 1;
        }
        let name: String = masked[start..i].iter().collect::<String>().to_lowercase();

        let next = masked[i..].iter().find(|c| !c.is_whitespace());
        if next != Some(&'(') || KEYWORDS.contains(&name.as_str()) {
            continue;
        }

        return Some(if STRING_FUNCTIONS.contains(&name.as_str()) {
            Unsupported::StringFunction(name)
        } else if SPATIAL_FUNCTIONS.contains(&name.as_str()) {
            Unsupported::SpatialPredicate(name)
        } else {
            Unsupported::Function(name)
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_expressions_pass() {
        assert_eq!(find_unsupported("([type] = 'road')"), None);
        assert_eq!(find_unsupported("([level] > -2 AND [level] < 5)"), None);
        assert_eq!(find_unsupported("(NOT ([a] = 1) OR ([b] IN {x,y}))"), None);
        assert_eq!(find_unsupported("([date] = 2004-01-01)"), None);
    }

    #[test]
    fn test_operators_inside_literals_are_ignored() {
        assert_eq!(find_unsupported("([name] = 'a+b/c')"), None);
        assert_eq!(find_unsupported("([name] ~ /^(a|b)+$/)"), None);
        assert_eq!(find_unsupported("([name] ~* \"x*\")"), None);
        assert_eq!(find_unsupported("/^A.*/"), None);
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(
            find_unsupported("([width] * 2 > 10)"),
            Some(Unsupported::Arithmetic('*'))
        );
        assert_eq!(
            find_unsupported("([a] + [b] = 3)"),
            Some(Unsupported::Arithmetic('+'))
        );
        assert_eq!(
            find_unsupported("([a] - 1 = 3)"),
            Some(Unsupported::Arithmetic('-'))
        );
        assert_eq!(
            find_unsupported("([a]/2 = 3)"),
            Some(Unsupported::Arithmetic('/'))
        );
    }

    #[test]
    fn test_functions() {
        assert_eq!(
            find_unsupported("(upper([name]) = 'X')"),
            Some(Unsupported::StringFunction("upper".to_string()))
        );
        assert_eq!(
            find_unsupported("(intersects([shape], fromText('POINT(1 1)')))"),
            Some(Unsupported::SpatialPredicate("intersects".to_string()))
        );
        assert_eq!(
            find_unsupported("(round([a], 2) = 3)"),
            Some(Unsupported::Function("round".to_string()))
        );
    }

    #[test]
    fn test_temporal() {
        assert_eq!(
            find_unsupported("([time] = `2004-01-01`)"),
            Some(Unsupported::Temporal)
        );
        assert_eq!(find_unsupported("([time] = '`')"), None);
    }
}
