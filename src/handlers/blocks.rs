//! Statement sequences, blocks and lambdas.
//!
//! A call with a block becomes `(iter, call, params, body)`. The params slot
//! tells apart three situations that must never be confused:
//!
//! | source          | params        |
//! |-----------------|---------------|
//! | `foo { }`       | `0`           |
//! | `foo { || }`    | `(args)`      |
//! | `foo { |a| }`   | `(args :a)`   |
//!
//! The body is left out entirely when the block is empty.

use super::helpers::{body, statements, wrap_statements};
use super::methods::{block_args, method_args};
use crate::errors::NormalizeResult;
use crate::normalizer::{HandlerRegistry, Processor};
use crate::raw::{Raw, RawNode};
use crate::s;
use crate::sexp::{Item, Sexp};

pub fn register_block_handlers(registry: &mut HandlerRegistry) {
    registry.register(crate::raw::LIST_TAG, process_statements);
    registry.register("stmts", process_statements);
    registry.register("void_stmt", process_void_stmt);
    registry.register("paren", process_paren);
    registry.register("method_add_block", process_method_add_block);
    registry.register("lambda", process_lambda);
    registry.register("BEGIN", process_begin_block);
    registry.register("END", process_end_block);
}

// ============================================================================
// BLOCK PARAMETERS
// ============================================================================

/// The parameter slot of an `iter`.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockParams {
    /// No `|...|` section at all.
    Absent,
    /// An explicit but empty section, `||` or `()`.
    Empty,
    Explicit(Sexp),
}

impl BlockParams {
    fn from_args(args: Sexp) -> Self {
        if args.is_empty() {
            BlockParams::Empty
        } else {
            BlockParams::Explicit(args)
        }
    }

    pub fn into_item(self) -> Item {
        match self {
            BlockParams::Absent => Item::Int(0),
            BlockParams::Empty => Item::Node(s!("args")),
            BlockParams::Explicit(args) => Item::Node(args),
        }
    }
}

/// Parameters of a `brace_block`/`do_block`.
fn block_params(p: &mut Processor, raw: Raw) -> NormalizeResult<BlockParams> {
    match raw {
        Raw::Node(node) => Ok(BlockParams::from_args(block_args(p, node)?)),
        _ => Ok(BlockParams::Absent),
    }
}

/// Parameters of a lambda literal. Unparenthesized parameters that are empty
/// mean no parameter section was written.
fn lambda_params(p: &mut Processor, raw: Raw) -> NormalizeResult<BlockParams> {
    match raw {
        Raw::Node(node) if node.is("paren") => Ok(BlockParams::from_args(method_args(
            p,
            Raw::Node(node),
        )?)),
        Raw::Node(node) => {
            let args = block_args(p, node)?;
            if args.is_empty() {
                Ok(BlockParams::Absent)
            } else {
                Ok(BlockParams::Explicit(args))
            }
        }
        _ => Ok(BlockParams::Absent),
    }
}

fn iter(call: Sexp, params: BlockParams, body: Option<Sexp>) -> Sexp {
    let mut node = s!("iter"; call, params.into_item());
    if let Some(body) = body {
        node.push(body);
    }
    node
}

// ============================================================================
// HANDLERS
// ============================================================================

/// A statement list reached directly: its body, `nil` when empty.
fn process_statements(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let stmts = statements(p, Raw::Node(node))?;
    Ok(wrap_statements(stmts).unwrap_or_else(|| s!("nil")))
}

fn process_void_stmt(_p: &mut Processor, _node: RawNode) -> NormalizeResult<Sexp> {
    Ok(s!("nil"))
}

/// `( ... )`
fn process_paren(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    match cursor.next_raw() {
        Raw::Node(params) if params.is("params") => method_args(p, Raw::Node(params)),
        other => Ok(body(p, other)?.unwrap_or_else(|| s!("nil"))),
    }
}

/// `call { |params| body }` / `call do |params| body end`
fn process_method_add_block(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let call = p.process_node(cursor.node()?)?;
    let block = cursor.node()?;
    let (params, body) = block_parts(p, block)?;
    Ok(iter(call, params, body))
}

fn block_parts(
    p: &mut Processor,
    block: RawNode,
) -> NormalizeResult<(BlockParams, Option<Sexp>)> {
    let mut cursor = block.into_cursor();
    let params = block_params(p, cursor.next_raw())?;
    let body = body(p, cursor.next_raw())?;
    Ok((params, body))
}

/// `->(params) { body }`
fn process_lambda(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let line = p.line_of(&node);
    let mut cursor = node.into_cursor();
    let params = lambda_params(p, cursor.next_raw())?;
    let body = body(p, cursor.next_raw())?;
    Ok(iter(s!("lambda").with_line(line), params, body))
}

/// `BEGIN { ... }`
fn process_begin_block(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    hook(p, node, "preexe")
}

/// `END { ... }`
fn process_end_block(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    hook(p, node, "postexe")
}

fn hook(p: &mut Processor, node: RawNode, tag: &'static str) -> NormalizeResult<Sexp> {
    let line = p.line_of(&node);
    let mut cursor = node.into_cursor();
    let body = body(p, cursor.next_raw())?;
    Ok(iter(s!(tag).with_line(line), BlockParams::Absent, body))
}
