//! # Tree normalizer
//!
//! Walks a raw tree and rewrites it into the canonical schema, one node at a
//! time, by looking up the node's tag in [`registry::HANDLERS`].
//!
//! ## Design Principles
//!
//! - **Ownership flows down**: handlers receive their raw node by value and
//!   hand each child to [`Processor::process_node`] exactly once.
//! - **Total dispatch**: a tag without a rule is an
//!   [`UnsupportedNode`](crate::errors::NormalizeError::UnsupportedNode)
//!   error, never a silent pass-through.
//! - **Lines are set once**: after a handler returns, the result takes the
//!   line of the first token in its raw subtree unless the handler already
//!   chose one.

use tracing::trace;

use crate::config::{ParserConfig, SourceFile};
use crate::errors::{malformed_node, unsupported_node, NormalizeResult};
use crate::handlers::helpers;
use crate::literal::LiteralDecoder;
use crate::position;
use crate::raw::{Raw, RawNode};
use crate::sexp::{SourceEncoding, Sexp};

pub mod registry;

pub use registry::{HandlerFn, HandlerRegistry, HANDLERS};

/// Per-parse normalization state. Build a fresh one for every parse.
pub struct Processor {
    filename: String,
    line_offset: usize,
    decoder: LiteralDecoder,
    in_method_body: bool,
}

impl Processor {
    pub fn new(source: &SourceFile, config: ParserConfig) -> Self {
        Self {
            filename: source.filename.clone(),
            line_offset: source.line_offset(),
            decoder: LiteralDecoder::new(source.encoding, config.extra_compatible),
            in_method_body: false,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn decoder(&self) -> &LiteralDecoder {
        &self.decoder
    }

    pub fn encoding(&self) -> SourceEncoding {
        self.decoder.encoding()
    }

    /// True while processing a `def` body; class variables assign with
    /// `cvasgn` there and `cvdecl` elsewhere.
    pub fn in_method_body(&self) -> bool {
        self.in_method_body
    }

    /// Runs `f` with the method-body flag set to `value`, then restores it.
    pub fn with_method_body<T>(
        &mut self,
        value: bool,
        f: impl FnOnce(&mut Self) -> NormalizeResult<T>,
    ) -> NormalizeResult<T> {
        let saved = std::mem::replace(&mut self.in_method_body, value);
        let result = f(self);
        self.in_method_body = saved;
        result
    }

    /// Source line of a front-end line number.
    pub fn line(&self, raw_line: usize) -> usize {
        raw_line + self.line_offset
    }

    /// Source line of the first token in `node`.
    pub fn line_of(&self, node: &RawNode) -> Option<usize> {
        node.first_line().map(|line| self.line(line))
    }

    /// Absent input stays absent.
    pub fn process(&mut self, node: Option<RawNode>) -> NormalizeResult<Option<Sexp>> {
        node.map(|node| self.process_node(node)).transpose()
    }

    /// Processes a child that must be a node or absent.
    pub fn process_raw(&mut self, raw: Raw) -> NormalizeResult<Option<Sexp>> {
        match raw {
            Raw::Node(node) => self.process_node(node).map(Some),
            raw if raw.is_absent() => Ok(None),
            other => Err(malformed_node(
                "value",
                format!("expected a node, found {}", other),
            )),
        }
    }

    pub fn process_node(&mut self, node: RawNode) -> NormalizeResult<Sexp> {
        let line = self.line_of(&node);
        let Some(handler) = HANDLERS.get(&node.tag) else {
            return Err(unsupported_node(node.tag));
        };
        trace!(tag = %node.tag, ?line, "dispatch");

        let mut result = handler(self, node)?;
        result.set_line_if_unset(line);
        if result.line.is_none() {
            position::trickle_up(&mut result);
        }
        Ok(result)
    }

    /// Whole-file entry: one statement stands alone, several become a
    /// `block`, none gives `None`.
    pub fn process_program(&mut self, node: RawNode) -> NormalizeResult<Option<Sexp>> {
        if !node.is("program") {
            return self.process_node(node).map(Some);
        }
        let mut cursor = node.into_cursor();
        let statements = helpers::statements(self, cursor.next_raw())?;
        let Some(mut tree) = helpers::wrap_statements(statements) else {
            return Ok(None);
        };
        position::trickle_up(&mut tree);
        let line = tree.line;
        position::trickle_down(&mut tree, line);
        Ok(Some(tree))
    }
}
