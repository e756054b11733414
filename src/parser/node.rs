//! Generic tree produced by the block parser.
//!
//! The tree carries no Mapfile knowledge beyond key casing and the
//! repeatable-key pluralization done while parsing. Every value is a
//! [`Node`]: a scalar string, a nested [`Block`], or an ordered list.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::Serialize;

/// A value in the generic tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// `KEY value` lines and collapsed pseudo-blocks.
    Scalar(String),
    /// A `KEY ... END` block.
    Block(Block),
    /// Repeatable keys, always collected under their plural name.
    List(Vec<Node>),
}

impl Node {
    pub fn scalar(value: impl Into<String>) -> Self {
        Node::Scalar(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_block_mut(&mut self) -> Option<&mut Block> {
        match self {
            Node::Block(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }
}

/// A mapping from lower-cased key to [`Node`].
///
/// Keys are kept sorted so traversal order never depends on insertion
/// history; list order is declaration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Block {
    entries: BTreeMap<String, Node>,
    /// Line (1-indexed) on which the block was opened.
    #[serde(skip)]
    line: Option<usize>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty block opened on the given line.
    pub fn at_line(line: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            line: Some(line),
        }
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert a value, returning the one it replaced.
    pub fn insert(&mut self, key: impl Into<String>, node: Node) -> Option<Node> {
        self.entries.insert(key.into(), node)
    }

    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.entries.remove(key)
    }

    /// Append to the list stored under `key`, creating it if needed.
    pub fn push(&mut self, key: impl Into<String>, node: Node) {
        match self.entries.entry(key.into()) {
            Entry::Occupied(mut entry) => match entry.get_mut() {
                Node::List(items) => items.push(node),
                other => *other = Node::List(vec![node]),
            },
            Entry::Vacant(entry) => {
                entry.insert(Node::List(vec![node]));
            }
        }
    }

    /// Scalar value under `key`.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Node::as_str)
    }

    /// Scalar value under `key` parsed as a number.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.str(key).and_then(|s| s.trim().parse().ok())
    }

    pub fn block(&self, key: &str) -> Option<&Block> {
        self.get(key).and_then(Node::as_block)
    }

    pub fn block_mut(&mut self, key: &str) -> Option<&mut Block> {
        self.get_mut(key).and_then(Node::as_block_mut)
    }

    /// Items of the list under `key`; empty when absent.
    pub fn list(&self, key: &str) -> &[Node] {
        self.get(key).and_then(Node::as_list).unwrap_or(&[])
    }

    /// Blocks of the list under `key`, in declaration order.
    pub fn blocks<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a Block> + 'a {
        self.list(key).iter().filter_map(Node::as_block)
    }

    pub fn blocks_mut<'a>(&'a mut self, key: &str) -> impl Iterator<Item = &'a mut Block> + 'a {
        let items = match self.entries.get_mut(key) {
            Some(Node::List(items)) => Some(items),
            _ => None,
        };
        items
            .into_iter()
            .flat_map(|items| items.iter_mut())
            .filter_map(Node::as_block_mut)
    }

    /// Scalar items of the list under `key`, in declaration order.
    pub fn scalars<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.list(key).iter().filter_map(Node::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Node)> {
        self.entries.iter_mut()
    }
}
