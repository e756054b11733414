//! Line-by-line block parser.
//!
//! Turns Mapfile (or symbolset) text into a generic [`Block`] tree. The
//! parser knows which keys repeat and which blocks are really just values
//! (`PROJECTION`, `PATTERN`, `POINTS`); everything else is structure only.

use crate::diagnostics::{Category, Diagnostic, Diagnostics};
use crate::error::{MapstyleError, Result};

use super::line::{strip_inline_end, LineRecord};
use super::node::{Block, Node};

/// Blocks whose body is collapsed into a single space-joined scalar.
const PSEUDO_BLOCK_KEYS: [&str; 3] = ["projection", "pattern", "points"];

/// Blocks that may repeat as siblings.
const REPEATABLE_BLOCK_KEYS: [&str; 6] = ["layer", "class", "style", "label", "symbol", "outputformat"];

/// Key/value lines that may repeat within one block.
const REPEATABLE_VALUE_KEYS: [&str; 3] = ["formatoption", "include", "processing"];

/// A parsed document: the raw tree plus depth-annotated line records.
#[derive(Debug, Clone)]
pub struct Document {
    /// Tree exactly as written (no root wrapper injected).
    pub root: Block,
    /// Every non-blank, non-comment line.
    pub lines: Vec<LineRecord>,
}

/// Key under which repeated `key` entries are collected.
pub fn plural(key: &str) -> String {
    match key {
        "class" => "classes".to_string(),
        _ => format!("{}s", key),
    }
}

/// Parse Mapfile content into a tree rooted at `map` (or `symbolset`).
///
/// A `MAP` wrapper is injected when the content is a bare fragment (for
/// example a single `LAYER`), so consumers always find `map.layers`.
pub fn parse(content: &str, diagnostics: &mut Diagnostics) -> Result<Block> {
    let document = parse_document(content, diagnostics)?;
    let root = document.root;

    if root.contains_key("map") || root.contains_key("symbolset") {
        return Ok(root);
    }

    let mut wrapped = Block::new();
    wrapped.insert("map", Node::Block(root));
    Ok(wrapped)
}

/// Parse symbolset content into its list of `SYMBOL` blocks.
///
/// Accepts content with or without the enclosing `SYMBOLSET ... END`.
pub fn parse_symbolset(content: &str, diagnostics: &mut Diagnostics) -> Result<Vec<Block>> {
    let document = parse_document(content, diagnostics)?;
    let root = document.root;

    let symbols = root.block("symbolset").unwrap_or(&root);
    Ok(symbols.blocks("symbols").cloned().collect())
}

/// Parse content into a [`Document`] without injecting a root wrapper.
pub fn parse_document(content: &str, diagnostics: &mut Diagnostics) -> Result<Document> {
    // normalize \r\n and lone \r
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");

    let mut parser = BlockParser::new(diagnostics);
    let mut lines = Vec::new();

    for (index, raw) in normalized.split('\n').enumerate() {
        if let Some(mut record) = LineRecord::parse(index + 1, raw) {
            parser.feed(&mut record);
            lines.push(record);
        }
    }

    let root = parser.finish();

    check_block_end_sum(&lines)?;
    assign_depths(&mut lines);

    Ok(Document { root, lines })
}

/// An open block waiting for its `END`.
struct Frame {
    key: String,
    block: Block,
    repeatable: bool,
}

/// Value accumulation for `PROJECTION`-style pseudo-blocks.
struct PseudoBlock {
    key: String,
    line: usize,
    text: String,
}

struct BlockParser<'d> {
    stack: Vec<Frame>,
    pseudo: Option<PseudoBlock>,
    diagnostics: &'d mut Diagnostics,
}

impl<'d> BlockParser<'d> {
    fn new(diagnostics: &'d mut Diagnostics) -> Self {
        Self {
            stack: vec![Frame {
                key: String::new(),
                block: Block::new(),
                repeatable: false,
            }],
            pseudo: None,
            diagnostics,
        }
    }

    fn current(&mut self) -> &mut Block {
        // the root frame is never popped
        let last = self.stack.len() - 1;
        &mut self.stack[last].block
    }

    fn feed(&mut self, record: &mut LineRecord) {
        if self.pseudo.is_some() {
            self.feed_pseudo(record);
            return;
        }

        if PSEUDO_BLOCK_KEYS.contains(&record.key.as_str()) {
            self.open_pseudo(record);
            return;
        }

        // stray projection body outside of a PROJECTION block
        if record.key.contains("init=") {
            let value = record.key.clone();
            self.insert_scalar("projection", value, record.number);
            return;
        }

        if record.is_block_line {
            self.diagnostics.push(
                Diagnostic::warning(
                    Category::Syntax,
                    "mapstyle::syntax::block-line",
                    format!("Single-line block is not supported: {}", record.content),
                )
                .at_line(Some(record.number))
                .with_help("Write the block over several lines"),
            );
            return;
        }

        if record.is_block_key {
            self.open(record);
            return;
        }

        if record.is_end() {
            self.close();
            return;
        }

        if REPEATABLE_VALUE_KEYS.contains(&record.key.as_str()) {
            let key = plural(&record.key);
            let value = Node::scalar(record.value.clone());
            self.current().push(key, value);
            return;
        }

        let (key, value) = (record.key.clone(), record.value.clone());
        self.insert_scalar(&key, value, record.number);
    }

    fn open_pseudo(&mut self, record: &mut LineRecord) {
        let text = strip_inline_end(&record.value).replace('"', "");

        if record.is_block_line {
            let key = record.key.clone();
            self.insert_scalar(&key, text, record.number);
            return;
        }

        // `POINTS 1 1` continues until END, so it opens a block as well
        record.is_block_key = true;
        self.pseudo = Some(PseudoBlock {
            key: record.key.clone(),
            line: record.number,
            text,
        });
    }

    fn feed_pseudo(&mut self, record: &mut LineRecord) {
        if record.is_end() {
            if let Some(pseudo) = self.pseudo.take() {
                self.insert_scalar(&pseudo.key, pseudo.text, pseudo.line);
            }
            return;
        }

        // body lines are values, never blocks
        record.is_block_key = false;
        record.is_block_line = false;

        let value = record.code.replace('"', "");
        if let Some(pseudo) = self.pseudo.as_mut() {
            if !pseudo.text.is_empty() {
                pseudo.text.push(' ');
            }
            pseudo.text.push_str(value.trim());
        }
    }

    fn open(&mut self, record: &LineRecord) {
        let repeatable = REPEATABLE_BLOCK_KEYS.contains(&record.key.as_str());

        if !repeatable && self.current().contains_key(&record.key) {
            self.warn_duplicate(&record.key, record.number);
        }

        self.stack.push(Frame {
            key: record.key.clone(),
            block: Block::at_line(record.number),
            repeatable,
        });
    }

    fn close(&mut self) {
        // a stray END at the root is reported by check_block_end_sum
        if self.stack.len() > 1 {
            if let Some(frame) = self.stack.pop() {
                self.attach(frame);
            }
        }
    }

    fn attach(&mut self, frame: Frame) {
        let Frame {
            key,
            block,
            repeatable,
        } = frame;
        let parent = self.current();
        if repeatable {
            parent.push(plural(&key), Node::Block(block));
        } else {
            parent.insert(key, Node::Block(block));
        }
    }

    fn insert_scalar(&mut self, key: &str, value: String, line: usize) {
        if self.current().contains_key(key) {
            self.warn_duplicate(key, line);
        }
        self.current().insert(key, Node::Scalar(value));
    }

    fn warn_duplicate(&mut self, key: &str, line: usize) {
        self.diagnostics.push(
            Diagnostic::warning(
                Category::Syntax,
                "mapstyle::syntax::duplicate-key",
                format!("Duplicate key '{}', overwriting the earlier value", key),
            )
            .at_line(Some(line))
            .with_help("Consider declaring it as a repeatable key"),
        );
    }

    /// Close whatever is still open and return the root block.
    fn finish(mut self) -> Block {
        if let Some(pseudo) = self.pseudo.take() {
            self.insert_scalar(&pseudo.key, pseudo.text, pseudo.line);
        }
        while self.stack.len() > 1 {
            if let Some(frame) = self.stack.pop() {
                self.attach(frame);
            }
        }
        self.stack
            .pop()
            .map(|frame| frame.block)
            .unwrap_or_default()
    }
}

/// Every block opener needs exactly one `END`.
///
/// Single-line blocks count once on each side.
pub fn check_block_end_sum(lines: &[LineRecord]) -> Result<()> {
    let mut blocks = 0;
    let mut ends = 0;

    for line in lines {
        if line.is_block_line {
            blocks += 1;
            ends += 1;
        } else if line.is_block_key {
            blocks += 1;
        } else if line.is_end() {
            ends += 1;
        }
    }

    if blocks < ends {
        return Err(MapstyleError::Parse {
            message: format!("Too many ends (blocks: {}, ends: {}).", blocks, ends),
            help: Some("Remove the extra END or add the missing block key".to_string()),
        });
    }
    if blocks > ends {
        return Err(MapstyleError::Parse {
            message: format!("Too few ends (blocks: {}, ends: {}).", blocks, ends),
            help: Some("Close every block with END".to_string()),
        });
    }
    Ok(())
}

/// Assign each line its nesting depth. `END` sits at its opener's depth.
pub fn assign_depths(lines: &mut [LineRecord]) {
    let mut depth: usize = 0;

    for line in lines.iter_mut() {
        line.depth = depth;
        if line.is_block_key && !line.is_block_line {
            depth += 1;
        } else if line.is_end() {
            depth = depth.saturating_sub(1);
            line.depth = depth;
        }
    }
}
