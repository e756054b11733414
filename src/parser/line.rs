//! Line records: one per meaningful Mapfile line.
//!
//! A record splits a line into key, value and trailing comment, and
//! classifies it as a block opener and/or single-line block.

/// Object representation of a Mapfile line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineRecord {
    /// Line number (1-indexed)
    pub number: usize,
    /// Trimmed line text
    pub content: String,
    /// Line text with the trailing comment removed
    pub code: String,
    /// Trailing comment text, without the `#`
    pub comment: Option<String>,
    /// First token, lower-cased and unquoted
    pub key: String,
    /// Remainder of the line; unquoted except for `EXPRESSION`
    pub value: String,
    /// Opens a block (`LAYER`, `CLASS`, `PATTERN 10 10 END`, ...)
    pub is_block_key: bool,
    /// Opens and closes on the same line (`PATTERN 10 10 END`)
    pub is_block_line: bool,
    /// Nesting depth, assigned after parsing
    pub depth: usize,
}

impl LineRecord {
    /// Parse a raw line. Blank lines and whole-line comments yield `None`.
    pub fn parse(number: usize, raw: &str) -> Option<Self> {
        let content = raw.trim();
        if content.is_empty() || content.starts_with('#') {
            return None;
        }

        let (code, comment) = split_comment(content);
        let (raw_key, raw_value) = split_key_value(code);
        let key = strip_quotes(raw_key).to_lowercase();

        // quoting is significant inside expressions
        let value = match raw_value {
            Some(v) if key == "expression" => v.to_string(),
            Some(v) => strip_quotes(v).to_string(),
            None => String::new(),
        };

        let (is_block_key, is_block_line) = classify(&key, raw_value);

        Some(Self {
            number,
            content: content.to_string(),
            code: code.to_string(),
            comment: comment.map(str::to_string),
            key,
            value,
            is_block_key,
            is_block_line,
            depth: 0,
        })
    }

    pub fn is_end(&self) -> bool {
        self.key == "end"
    }
}

/// Split off a trailing comment.
///
/// A `#` only starts a comment outside of quoted text, so quoted hex
/// colours such as `"#DEADBEEF"` are never mistaken for one. A quote only
/// opens quoted text when it does not follow a letter or digit, so
/// `[a]="#FF0000"` is quoted while `O'Neil` is not.
pub fn split_comment(line: &str) -> (&str, Option<&str>) {
    let mut quote: Option<char> = None;
    let mut previous: Option<char> = None;

    for (i, c) in line.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' if !previous.is_some_and(char::is_alphanumeric) => quote = Some(c),
                '#' => return (line[..i].trim_end(), Some(line[i + 1..].trim())),
                _ => {}
            },
        }
        previous = Some(c);
    }

    (line, None)
}

/// Split at the first whitespace run into key and (non-empty) value.
pub fn split_key_value(line: &str) -> (&str, Option<&str>) {
    match line.split_once(char::is_whitespace) {
        Some((key, rest)) => {
            let rest = rest.trim();
            (key, if rest.is_empty() { None } else { Some(rest) })
        }
        None => (line, None),
    }
}

/// Remove one pair of matching surrounding quotes.
pub fn strip_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Whether a raw value ends with a separate `END` token.
pub fn closes_inline(raw_value: &str) -> bool {
    match raw_value.trim_end().rsplit_once(char::is_whitespace) {
        Some((_, last)) => last.eq_ignore_ascii_case("end"),
        None => false,
    }
}

/// Remove the trailing `END` token of a single-line block value.
pub fn strip_inline_end(value: &str) -> &str {
    match value.trim_end().rsplit_once(char::is_whitespace) {
        Some((head, last)) if last.eq_ignore_ascii_case("end") => head.trim_end(),
        _ => value,
    }
}

/// Returns `(is_block_key, is_block_line)`.
fn classify(key: &str, raw_value: Option<&str>) -> (bool, bool) {
    match raw_value {
        // the PROJECTION body ("init=epsg:4326") looks like a key-only line
        None => (key != "end" && !key.contains("init="), false),
        Some(v) if closes_inline(v) => (true, true),
        Some(_) => (false, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(line: &str) -> LineRecord {
        LineRecord::parse(1, line).unwrap()
    }

    #[test]
    fn test_skips_blank_and_comment_lines() {
        assert!(LineRecord::parse(1, "   ").is_none());
        assert!(LineRecord::parse(1, "  # just a comment").is_none());
    }

    #[test]
    fn test_inline_comment() {
        let r = record("END # foo comment");
        assert_eq!(r.comment.as_deref(), Some("foo comment"));
        assert_eq!(r.code, "END");
        assert!(r.is_end());
    }

    #[test]
    fn test_hex_colour_is_not_a_comment() {
        let r = record(r##"COLOR "#BADA55""##);
        assert_eq!(r.comment, None);
        assert_eq!(r.value, "#BADA55");
    }

    #[test]
    fn test_hex_colour_with_comment() {
        let r = record(r##"COLOR "#DEADBEEF" # baz comment"##);
        assert_eq!(r.comment.as_deref(), Some("baz comment"));
        assert_eq!(r.code, r##"COLOR "#DEADBEEF""##);
        assert_eq!(r.value, "#DEADBEEF");
    }

    #[test]
    fn test_hex_colour_after_operator_is_not_a_comment() {
        let r = record(r##"EXPRESSION ([colour]="#FF0000") # red only"##);
        assert_eq!(r.comment.as_deref(), Some("red only"));
        assert_eq!(r.value, r##"([colour]="#FF0000")"##);

        let r = record(r##"EXPRESSION ('[colour]'='#00FF00')"##);
        assert_eq!(r.comment, None);
        assert_eq!(r.value, r##"('[colour]'='#00FF00')"##);
    }

    #[test]
    fn test_key_only_line() {
        let r = record("MAP");
        assert_eq!(r.key, "map");
        assert_eq!(r.value, "");
        assert!(r.is_block_key);
        assert!(!r.is_block_line);
    }

    #[test]
    fn test_key_value_line() {
        let r = record("IMAGETYPE PNG");
        assert_eq!(r.key, "imagetype");
        assert_eq!(r.value, "PNG");
        assert!(!r.is_block_key);
    }

    #[test]
    fn test_expression_keeps_quotes() {
        let r = record(r#"EXPRESSION "2005""#);
        assert_eq!(r.key, "expression");
        assert_eq!(r.value, r#""2005""#);
    }

    #[test]
    fn test_single_line_block() {
        let r = record("PATTERN 10 10 END");
        assert!(r.is_block_key);
        assert!(r.is_block_line);
        assert_eq!(strip_inline_end(&r.value), "10 10");
    }

    #[test]
    fn test_end_is_not_a_block() {
        let r = record("END");
        assert!(!r.is_block_key);
        assert!(!r.is_block_line);
    }

    #[test]
    fn test_projection_body_is_not_a_block() {
        let r = record(r#""init=epsg:2056""#);
        assert_eq!(r.key, "init=epsg:2056");
        assert!(!r.is_block_key);
    }

    #[test]
    fn test_quoted_text_ending_in_end_is_not_a_block() {
        let r = record("TEXT 'The END'");
        assert!(!r.is_block_line);
        assert_eq!(r.value, "The END");
    }

    #[test]
    fn test_apostrophe_inside_word_does_not_open_quote() {
        let (code, comment) = split_comment("NAME O'Neil # owner");
        assert_eq!(code, "NAME O'Neil");
        assert_eq!(comment, Some("owner"));
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("'circle'"), "circle");
        assert_eq!(strip_quotes("\"x\""), "x");
        assert_eq!(strip_quotes("\"x'"), "\"x'");
        assert_eq!(strip_quotes("\""), "\"");
    }
}
