//! Conditionals: `if`, `unless`, `elsif`, the ternary operator, postfix
//! modifiers and `case`/`when`.
//!
//! Every form becomes `(if, cond, then, else)` with absent branches as `nil`.
//! `unless` swaps the branches, and so does a negated match condition.
//!
//! ## Conditions
//!
//! A bare range literal (possibly inside `begin`/parens) used directly as the
//! condition of `if`, `unless`, `while` or `until` is a flip-flop and becomes
//! `flip2`/`flip3`. `elsif` and the ternary operator do not get this
//! treatment. A regexp literal used as a condition matches against `$_`.

use super::helpers::{body, call_args, else_statements, statements, wrap_statements};
use super::operators::is_regexp;
use crate::errors::NormalizeResult;
use crate::normalizer::{HandlerRegistry, Processor};
use crate::raw::{Raw, RawNode};
use crate::s;
use crate::sexp::{Item, Sexp};

pub fn register_conditional_handlers(registry: &mut HandlerRegistry) {
    registry.register("if", process_if);
    registry.register("unless", process_unless);
    registry.register("elsif", process_elsif);
    registry.register("if_mod", process_if_mod);
    registry.register("unless_mod", process_unless_mod);
    registry.register("ifop", process_ifop);
    registry.register("case", process_case);
}

// ============================================================================
// CONDITIONS
// ============================================================================

/// A processed condition. `negated` is set when the condition was a `!~`
/// match; the caller swaps its branches and `expr` holds the positive match.
pub struct Condition {
    pub expr: Sexp,
    pub negated: bool,
}

/// Processes a condition. With `flip_flop`, a bare range becomes a
/// `flip2`/`flip3` toggle.
pub fn condition(p: &mut Processor, raw: RawNode, flip_flop: bool) -> NormalizeResult<Condition> {
    let unwrapped = raw
        .unwrap_begin()
        .filter(|inner| is_range(inner))
        .cloned();
    let raw = unwrapped.unwrap_or(raw);

    let expr = if flip_flop && is_range(&raw) {
        let tag = if raw.is("dot2") { "flip2" } else { "flip3" };
        let mut cursor = raw.into_cursor();
        let from = p.process_raw(cursor.next_raw())?;
        let to = p.process_raw(cursor.next_raw())?;
        s!(tag; from, to)
    } else {
        p.process_node(raw)?
    };

    if expr.is("not") && expr.len() == 1 {
        let line = expr.line;
        let mut items = expr.items;
        if let Some(Item::Node(inner)) = items.pop() {
            return Ok(Condition {
                expr: inner.with_line(line),
                negated: true,
            });
        }
        return Ok(Condition {
            expr: Sexp::from_items("not", items).with_line(line),
            negated: false,
        });
    }
    if is_regexp(&expr) {
        let line = expr.line;
        return Ok(Condition {
            expr: s!("match"; expr).with_line(line),
            negated: false,
        });
    }
    Ok(Condition {
        expr,
        negated: false,
    })
}

fn is_range(node: &RawNode) -> bool {
    node.is("dot2") || node.is("dot3")
}

/// Builds `(if, cond, then, else)`, swapping the branches when `swap` is set.
fn if_node(cond: Condition, then: Option<Sexp>, otherwise: Option<Sexp>, swap: bool) -> Sexp {
    let (then, otherwise) = if swap != cond.negated {
        (otherwise, then)
    } else {
        (then, otherwise)
    };
    s!("if"; cond.expr, then, otherwise)
}

/// The `else` part of an `if`/`unless`: an `elsif` chain, an `else` clause or
/// nothing.
fn else_branch(p: &mut Processor, raw: Raw) -> NormalizeResult<Option<Sexp>> {
    match raw {
        Raw::Node(node) if node.is("elsif") => p.process_node(node).map(Some),
        other => Ok(wrap_statements(else_statements(p, other)?)),
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

fn process_if(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    conditional(p, node, true, false)
}

fn process_unless(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    conditional(p, node, true, true)
}

fn process_elsif(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    conditional(p, node, false, false)
}

fn conditional(
    p: &mut Processor,
    node: RawNode,
    flip_flop: bool,
    swap: bool,
) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let cond = condition(p, cursor.node()?, flip_flop)?;
    let then = body(p, cursor.next_raw())?;
    let otherwise = else_branch(p, cursor.next_raw())?;
    Ok(if_node(cond, then, otherwise, swap))
}

fn process_if_mod(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    modifier(p, node, false)
}

fn process_unless_mod(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    modifier(p, node, true)
}

/// `stmt if cond` / `stmt unless cond`
fn modifier(p: &mut Processor, node: RawNode, swap: bool) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let cond = condition(p, cursor.node()?, true)?;
    let stmt = p.process_raw(cursor.next_raw())?;
    Ok(if_node(cond, stmt, None, swap))
}

/// `cond ? a : b`
fn process_ifop(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let cond = condition(p, cursor.node()?, false)?;
    let then = p.process_raw(cursor.next_raw())?;
    let otherwise = p.process_raw(cursor.next_raw())?;
    Ok(if_node(cond, then, otherwise, false))
}

/// `(case, subject, when..., else)`; the trailing `else` is always present,
/// `nil` when the source has none.
fn process_case(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let subject = p.process_raw(cursor.next_raw())?;
    let mut case = s!("case"; subject);

    let mut next = cursor.opt_node()?;
    let mut otherwise = None;
    while let Some(clause) = next.take() {
        if !clause.is("when") {
            otherwise = wrap_statements(else_statements(p, Raw::Node(clause))?);
            break;
        }
        let line = p.line_of(&clause);
        let mut when = clause.into_cursor();
        let mut conditions = s!("array");
        for test in call_args(p, when.next_raw())? {
            conditions.push(test);
        }
        let mut node = s!("when"; conditions).with_line(line);
        let stmts = statements(p, when.next_raw())?;
        if stmts.is_empty() {
            node.push(Item::Nil);
        } else {
            node.extend(stmts.into_iter().map(Item::Node));
        }
        case.push(node);
        next = when.opt_node()?;
    }
    case.push(otherwise);
    Ok(case)
}
