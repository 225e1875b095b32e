//! `while`, `until` and `for`.
//!
//! Both condition loops become `(while|until, cond, body, check_first)`.
//! `check_first` is false only for the postfix form applied to a
//! `begin...end` body, which runs the body once before testing.

use super::assignment::loop_target;
use super::conditionals::condition;
use super::helpers::body;
use crate::errors::NormalizeResult;
use crate::normalizer::{HandlerRegistry, Processor};
use crate::raw::RawNode;
use crate::s;
use crate::sexp::Sexp;

pub fn register_loop_handlers(registry: &mut HandlerRegistry) {
    registry.register("while", process_while);
    registry.register("until", process_until);
    registry.register("while_mod", process_while_mod);
    registry.register("until_mod", process_until_mod);
    registry.register("for", process_for);
}

fn process_while(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    condition_loop(p, node, "while")
}

fn process_until(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    condition_loop(p, node, "until")
}

fn process_while_mod(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    postfix_loop(p, node, "while")
}

fn process_until_mod(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    postfix_loop(p, node, "until")
}

fn condition_loop(p: &mut Processor, node: RawNode, tag: &'static str) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let cond = condition(p, cursor.node()?, true)?;
    let stmts = body(p, cursor.next_raw())?;
    let tag = if cond.negated { opposite(tag) } else { tag };
    Ok(s!(tag; cond.expr, stmts, true))
}

/// `stmt while cond`
fn postfix_loop(p: &mut Processor, node: RawNode, tag: &'static str) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let cond = condition(p, cursor.node()?, true)?;
    let stmt = cursor.node()?;
    let check_first = !stmt.is("begin");
    let stmt = p.process_node(stmt)?;
    let tag = if cond.negated { opposite(tag) } else { tag };
    Ok(s!(tag; cond.expr, stmt, check_first))
}

fn opposite(tag: &'static str) -> &'static str {
    if tag == "while" {
        "until"
    } else {
        "while"
    }
}

/// `(for, iter, var, body)`; the body is omitted when empty.
fn process_for(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let var = loop_target(p, cursor.node()?)?;
    let iter = p.process_node(cursor.node()?)?;
    let mut node = s!("for"; iter, var);
    if let Some(stmts) = body(p, cursor.next_raw())? {
        node.push(stmts);
    }
    Ok(node)
}
