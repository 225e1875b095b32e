//! Method calls, `super`, `yield` and the jump keywords.
//!
//! Every call shape becomes `(call, receiver_or_nil, name, args...)`, or
//! `safe_call` for `&.`. Arguments are flattened in source order: splats,
//! keyword hashes and the block argument are ordinary entries of the list.

use super::helpers::{call_args, is_safe_navigation, jump_value, name};
use crate::errors::NormalizeResult;
use crate::normalizer::{HandlerRegistry, Processor};
use crate::raw::{Raw, RawNode};
use crate::s;
use crate::sexp::{sym, Item, Sexp};

pub fn register_call_handlers(registry: &mut HandlerRegistry) {
    registry.register("call", process_call);
    registry.register("fcall", process_fcall);
    registry.register("vcall", process_fcall);
    registry.register("command", process_command);
    registry.register("command_call", process_command_call);
    registry.register("method_add_arg", process_method_add_arg);
    registry.register("aref", process_aref);
    registry.register("super", process_super);
    registry.register("zsuper", process_zsuper);
    registry.register("yield", process_yield);
    registry.register("yield0", process_yield0);
    registry.register("return", process_return);
    registry.register("return0", process_return0);
    registry.register("break", process_break);
    registry.register("next", process_next);
    registry.register("redo", process_redo);
    registry.register("retry", process_retry);
    registry.register("star", process_star);
    registry.register("block_pass", process_block_pass);
    registry.register("assoc_splat", process_assoc_splat);
    registry.register("args_forward", process_args_forward);
}

// ============================================================================
// CALLS
// ============================================================================

/// `recv.name`, `recv&.name`, `recv::name`, `recv.()`
fn process_call(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let receiver = p.process_raw(cursor.next_raw())?;
    let safe = is_safe_navigation(&cursor.next_raw());
    let method = name(cursor.next_raw())?;
    let tag = if safe { "safe_call" } else { "call" };
    Ok(s!(tag; receiver, sym(method)))
}

/// `name` with no receiver: `foo()` before its arguments are added, or a
/// bare identifier that is not a local variable.
fn process_fcall(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let line = p.line_of(&node);
    let mut cursor = node.into_cursor();
    let method = name(cursor.next_raw())?;
    Ok(s!("call"; Item::Nil, sym(method)).with_line(line))
}

/// `name arg, ...`
fn process_command(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let line = p.line_of(&node);
    let mut cursor = node.into_cursor();
    let method = name(cursor.next_raw())?;
    let mut call = s!("call"; Item::Nil, sym(method)).with_line(line);
    push_args(&mut call, call_args(p, cursor.next_raw())?);
    Ok(call)
}

/// `recv.name arg, ...`
fn process_command_call(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let receiver = p.process_raw(cursor.next_raw())?;
    let safe = is_safe_navigation(&cursor.next_raw());
    let method = name(cursor.next_raw())?;
    let tag = if safe { "safe_call" } else { "call" };
    let mut call = s!(tag; receiver, sym(method));
    push_args(&mut call, call_args(p, cursor.next_raw())?);
    Ok(call)
}

/// A call followed by its parenthesized arguments.
fn process_method_add_arg(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let mut call = p.process_node(cursor.node()?)?;
    push_args(&mut call, call_args(p, cursor.next_raw())?);
    Ok(call)
}

/// `recv[args]`
fn process_aref(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let receiver = p.process_node(cursor.node()?)?;
    let mut call = s!("call"; receiver, sym("[]"));
    push_args(&mut call, call_args(p, cursor.next_raw())?);
    Ok(call)
}

fn push_args(call: &mut Sexp, args: Vec<Sexp>) {
    call.extend(args.into_iter().map(Item::Node));
}

// ============================================================================
// SUPER / YIELD
// ============================================================================

/// `super(args)`; explicit parentheses, even empty ones.
fn process_super(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let mut node = s!("super");
    push_args(&mut node, call_args(p, cursor.next_raw())?);
    Ok(node)
}

/// Bare `super`, forwarding the current arguments.
fn process_zsuper(_p: &mut Processor, _node: RawNode) -> NormalizeResult<Sexp> {
    Ok(s!("zsuper"))
}

fn process_yield(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let args = match cursor.next_raw() {
        Raw::Node(paren) if paren.is("paren") => {
            let mut paren = paren.into_cursor();
            paren.next_raw()
        }
        other => other,
    };
    let mut node = s!("yield");
    push_args(&mut node, call_args(p, args)?);
    Ok(node)
}

fn process_yield0(_p: &mut Processor, _node: RawNode) -> NormalizeResult<Sexp> {
    Ok(s!("yield"))
}

// ============================================================================
// JUMPS
// ============================================================================

fn process_return(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    jump(p, node, "return")
}

fn process_return0(_p: &mut Processor, _node: RawNode) -> NormalizeResult<Sexp> {
    Ok(s!("return"))
}

fn process_break(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    jump(p, node, "break")
}

fn process_next(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    jump(p, node, "next")
}

fn process_redo(_p: &mut Processor, _node: RawNode) -> NormalizeResult<Sexp> {
    Ok(s!("redo"))
}

fn process_retry(_p: &mut Processor, _node: RawNode) -> NormalizeResult<Sexp> {
    Ok(s!("retry"))
}

/// `return`/`break`/`next` with an optional value.
fn jump(p: &mut Processor, node: RawNode, tag: &'static str) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let args = call_args(p, cursor.next_raw())?;
    let mut node = s!(tag);
    if let Some(value) = jump_value(args) {
        node.push(value);
    }
    Ok(node)
}

// ============================================================================
// ARGUMENT FORMS
// ============================================================================

/// `*args`
fn process_star(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let value = p.process_raw(cursor.next_raw())?;
    let mut splat = s!("splat");
    if let Some(value) = value {
        splat.push(value);
    }
    Ok(splat)
}

/// `&blk`; anonymous when the value is absent.
fn process_block_pass(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let value = p.process_raw(cursor.next_raw())?;
    let mut pass = s!("block_pass");
    if let Some(value) = value {
        pass.push(value);
    }
    Ok(pass)
}

/// `**opts` inside a hash.
fn process_assoc_splat(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let value = p.process_raw(cursor.next_raw())?;
    let mut kwsplat = s!("kwsplat");
    if let Some(value) = value {
        kwsplat.push(value);
    }
    Ok(kwsplat)
}

/// `foo(...)`
fn process_args_forward(_p: &mut Processor, _node: RawNode) -> NormalizeResult<Sexp> {
    Ok(s!("forward_args"))
}
