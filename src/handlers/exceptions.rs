//! `begin`/`rescue`/`else`/`ensure` and postfix `rescue`.
//!
//! Clauses flatten so that `ensure` wraps `rescue`, which wraps the body.
//! Each rescue clause becomes a `resbody` holding an `array` of exception
//! classes (plus the `$!` assignment when a variable is bound) followed by
//! its statements. Chained clauses are siblings inside the `rescue` node.

use super::assignment::assign_target;
use super::helpers::{body, body_statements, call_args, statements, wrap_statements};
use crate::errors::NormalizeResult;
use crate::normalizer::{HandlerRegistry, Processor};
use crate::raw::{Raw, RawNode};
use crate::s;
use crate::sexp::{sym, Item, Sexp};

pub fn register_exception_handlers(registry: &mut HandlerRegistry) {
    registry.register("begin", process_begin);
    registry.register("bodystmt", process_bodystmt);
    registry.register("rescue_mod", process_rescue_mod);
}

// ============================================================================
// HANDLERS
// ============================================================================

/// `begin ... end`: the body itself, `nil` when empty.
fn process_begin(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let stmts = statements(p, cursor.next_raw())?;
    Ok(wrap_statements(stmts).unwrap_or_else(|| s!("nil")))
}

fn process_bodystmt(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let stmts = body_statements(p, node)?;
    Ok(wrap_statements(stmts).unwrap_or_else(|| s!("nil")))
}

/// `expr rescue fallback`
fn process_rescue_mod(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let expr = p.process_node(cursor.node()?)?;
    let fallback = p.process_node(cursor.node()?)?;
    let line = expr.line;
    let resbody = s!("resbody"; s!("array"), fallback).with_line(line);
    Ok(s!("rescue"; expr, resbody))
}

// ============================================================================
// CLAUSES
// ============================================================================

/// Builds one `resbody` per clause of a `[:rescue, classes, var, stmts,
/// next]` chain.
pub fn rescue_clauses(p: &mut Processor, node: RawNode) -> NormalizeResult<Vec<Sexp>> {
    let mut clauses = Vec::new();
    let mut next = Some(node);
    while let Some(node) = next {
        let line = p.line_of(&node);
        let mut cursor = node.into_cursor();
        let classes_raw = cursor.next_raw();
        let var = cursor.opt_node()?;
        let body_raw = cursor.next_raw();
        next = cursor.opt_node()?;

        let mut classes = s!("array");
        for class in call_args(p, classes_raw)? {
            classes.push(class);
        }
        if let Some(var) = var {
            classes.push(assign_target(p, var, Some(s!("gvar"; sym("$!"))))?);
        }

        let mut resbody = s!("resbody"; classes).with_line(line);
        let stmts = statements(p, body_raw)?;
        if stmts.is_empty() {
            resbody.push(Item::Nil);
        } else {
            resbody.extend(stmts.into_iter().map(Item::Node));
        }
        clauses.push(resbody);
    }
    Ok(clauses)
}

/// The body of an `[:ensure, stmts]` clause; `nil` when empty.
pub fn ensure_body(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let stmts = if node.is("ensure") {
        let mut cursor = node.into_cursor();
        cursor.next_raw()
    } else {
        Raw::Node(node)
    };
    Ok(body(p, stmts)?.unwrap_or_else(|| s!("nil")))
}
