//! Position-based reader over an immutable expression string.

/// Cursor over an expression. All offsets are byte offsets into `input`.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Unconsumed input.
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    pub fn starts_with(&self, s: &str) -> bool {
        self.remaining().starts_with(s)
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    pub fn skip_whitespace(&mut self) {
        let trimmed = self.remaining().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    /// Consume `ch` if it is next.
    pub fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.advance(ch.len_utf8());
            true
        } else {
            false
        }
    }

    /// Consume `s` if it is next.
    pub fn eat_str(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.advance(s.len());
            true
        } else {
            false
        }
    }

    /// Consume a case-insensitive keyword that is not part of a longer word.
    pub fn eat_keyword(&mut self, keyword: &str) -> bool {
        let rest = self.remaining();
        let Some(head) = rest.get(..keyword.len()) else {
            return false;
        };
        if !head.eq_ignore_ascii_case(keyword) {
            return false;
        }
        let boundary = rest[keyword.len()..]
            .chars()
            .next()
            .map_or(true, |c| !(c.is_alphanumeric() || c == '_'));
        if boundary {
            self.advance(keyword.len());
        }
        boundary
    }

    /// Consume characters while `pred` holds.
    pub fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.remaining();
        let end = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.advance(end);
        &rest[..end]
    }

    /// Consume `open ... close` and return the text in between.
    ///
    /// A backslash escapes the closing character. Returns `None` (consuming
    /// nothing) when the input does not start with `open` or never closes.
    pub fn take_between(&mut self, open: char, close: char) -> Option<&'a str> {
        let rest = self.remaining();
        let body = rest.strip_prefix(open)?;

        let mut escaped = false;
        for (i, c) in body.char_indices() {
            match c {
                '\\' if !escaped => escaped = true,
                c if c == close && !escaped => {
                    self.advance(open.len_utf8() + i + close.len_utf8());
                    return Some(&body[..i]);
                }
                _ => escaped = false,
            }
        }
        None
    }

    /// Consume a `q ... q` delimited token.
    pub fn take_delimited(&mut self, delimiter: char) -> Option<&'a str> {
        self.take_between(delimiter, delimiter)
    }
}
