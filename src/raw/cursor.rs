//! Ordered consumption of a raw node's children.
//!
//! Handlers take a [`RawNode`] by value, turn it into a [`Cursor`] and pull
//! children front to back. A child is read exactly once; there is no way to
//! go back.

use std::vec::IntoIter;

use super::{Position, Raw, RawNode};
use crate::errors::{malformed_node, NormalizeResult};

pub struct Cursor {
    tag: String,
    children: IntoIter<Raw>,
}

impl Cursor {
    pub fn new(tag: String, children: Vec<Raw>) -> Self {
        Self {
            tag,
            children: children.into_iter(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn remaining(&self) -> usize {
        self.children.len()
    }

    /// The next child; a missing child reads as `nil`.
    pub fn next_raw(&mut self) -> Raw {
        self.children.next().unwrap_or(Raw::Nil)
    }

    /// The next child, which must be a node.
    pub fn node(&mut self) -> NormalizeResult<RawNode> {
        match self.next_raw() {
            Raw::Node(node) => Ok(node),
            other => Err(self.malformed(format!("expected a node, found {}", other))),
        }
    }

    /// The next child as an optional node. `nil`, `false` and a missing
    /// child all read as `None`.
    pub fn opt_node(&mut self) -> NormalizeResult<Option<RawNode>> {
        match self.next_raw() {
            Raw::Node(node) => Ok(Some(node)),
            Raw::Nil | Raw::Bool(false) => Ok(None),
            other => Err(self.malformed(format!("expected a node or nil, found {}", other))),
        }
    }

    pub fn string(&mut self) -> NormalizeResult<String> {
        match self.next_raw() {
            Raw::Str(text) => Ok(text),
            other => Err(self.malformed(format!("expected a string, found {}", other))),
        }
    }

    pub fn symbol(&mut self) -> NormalizeResult<String> {
        match self.next_raw() {
            Raw::Sym(name) => Ok(name),
            other => Err(self.malformed(format!("expected a symbol, found {}", other))),
        }
    }

    pub fn position(&mut self) -> NormalizeResult<Position> {
        match self.next_raw() {
            Raw::Pos(position) => Ok(position),
            other => Err(self.malformed(format!("expected a position, found {}", other))),
        }
    }

    /// Everything not yet consumed.
    pub fn rest(self) -> Vec<Raw> {
        self.children.collect()
    }

    /// The remaining children that are nodes; absent entries are skipped.
    pub fn rest_nodes(self) -> NormalizeResult<Vec<RawNode>> {
        let tag = self.tag;
        self.children
            .filter(|child| !child.is_absent())
            .map(|child| match child {
                Raw::Node(node) => Ok(node),
                other => Err(malformed_node(
                    tag.clone(),
                    format!("expected a node, found {}", other),
                )),
            })
            .collect()
    }

    /// Error for a child of the wrong shape in this node.
    pub fn malformed(&self, detail: impl Into<String>) -> crate::errors::NormalizeError {
        malformed_node(self.tag.clone(), detail)
    }
}
