//! Single, multiple and operator assignment.
//!
//! ## Target kinds
//!
//! | raw target            | canonical                          |
//! |-----------------------|------------------------------------|
//! | local, ivar, gvar     | `lasgn`, `iasgn`, `gasgn`          |
//! | class variable        | `cvasgn` in a method, else `cvdecl`|
//! | constant / path       | `cdecl`                            |
//! | `a.b` / `a&.b`        | `attrasgn` / `safe_attrasgn`       |
//! | `a[i]`                | `attrasgn` with `:[]=`             |
//!
//! Multiple assignment classifies its right-hand side three ways: a single
//! expression is wrapped in `to_ary`, an explicit list becomes an `array`,
//! and a single splatted expression stays a bare `splat`.

use super::helpers::{call_args, is_safe_navigation, name, token};
use crate::errors::{malformed_node, NormalizeResult};
use crate::normalizer::{HandlerRegistry, Processor};
use crate::raw::{Raw, RawNode};
use crate::s;
use crate::sexp::{sym, Item, Sexp};

pub fn register_assignment_handlers(registry: &mut HandlerRegistry) {
    registry.register("assign", process_assign);
    registry.register("opassign", process_opassign);
    registry.register("massign", process_massign);
}

// ============================================================================
// HANDLERS
// ============================================================================

fn process_assign(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let target = cursor.node()?;
    let value = match cursor.next_raw() {
        Raw::Node(list) if list.is_list() => {
            let args = call_args(p, Raw::Node(list))?;
            svalue(args)
        }
        Raw::Node(value) => p.process_node(value)?,
        other => return Err(cursor.malformed(format!("expected a value, found {}", other))),
    };
    assign_target(p, target, Some(value))
}

fn process_massign(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let targets = mlhs_targets(p, cursor.node()?)?;
    let rhs = match cursor.next_raw() {
        Raw::Node(list) if list.is_list() => {
            let mut args = call_args(p, Raw::Node(list))?;
            if args.len() == 1 && args[0].is("splat") {
                args.remove(0)
            } else {
                array(args)
            }
        }
        Raw::Node(value) => s!("to_ary"; p.process_node(value)?),
        other => return Err(cursor.malformed(format!("expected a value, found {}", other))),
    };
    Ok(s!("masgn"; array(targets), rhs))
}

fn process_opassign(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let target = cursor.node()?;
    let operator = name(cursor.next_raw())?;
    let operator = operator
        .strip_suffix('=')
        .unwrap_or(&operator)
        .to_string();
    let value = p.process_node(cursor.node()?)?;

    match target.tag.as_str() {
        "aref_field" => {
            let mut target = target.into_cursor();
            let receiver = p.process_node(target.node()?)?;
            let mut arglist = s!("arglist");
            for arg in call_args(p, target.next_raw())? {
                arglist.push(arg);
            }
            Ok(s!("op_asgn1"; receiver, arglist, sym(operator), value))
        }
        "field" => {
            let mut target = target.into_cursor();
            let receiver = p.process_node(target.node()?)?;
            let safe = is_safe_navigation(&target.next_raw());
            let attribute = name(target.next_raw())?;
            let tag = if safe { "safe_op_asgn2" } else { "op_asgn2" };
            Ok(s!(tag; receiver, sym(format!("{}=", attribute)), sym(operator), value))
        }
        _ => {
            let read = reference(p, target.clone())?;
            match operator.as_str() {
                "||" => Ok(s!("op_asgn_or"; read, assign_target(p, target, Some(value))?)),
                "&&" => Ok(s!("op_asgn_and"; read, assign_target(p, target, Some(value))?)),
                _ => {
                    let line = read.line;
                    let call = s!("call"; read, sym(operator), value).with_line(line);
                    assign_target(p, target, Some(call))
                }
            }
        }
    }
}

// ============================================================================
// TARGETS
// ============================================================================

/// Builds the assignment node for `target`, with `value` appended when
/// given. Without a value this is the bare lvalue used in multiple
/// assignment, `for` loops and rescue variables.
pub fn assign_target(
    p: &mut Processor,
    target: RawNode,
    value: Option<Sexp>,
) -> NormalizeResult<Sexp> {
    let mut node = match target.tag.as_str() {
        "var_field" => {
            let mut cursor = target.into_cursor();
            let Some(variable) = cursor.opt_node()? else {
                return Err(cursor.malformed("assignment to nothing"));
            };
            return assign_target(p, variable, value);
        }
        tag if tag.starts_with('@') => {
            let (kind, text, position) = token(target)?;
            let tag = match kind.as_str() {
                "ident" => "lasgn",
                "ivar" => "iasgn",
                "gvar" => "gasgn",
                "cvar" if p.in_method_body() => "cvasgn",
                "cvar" => "cvdecl",
                "const" => "cdecl",
                other => {
                    return Err(malformed_node(
                        "assign",
                        format!("cannot assign to @{}", other),
                    ))
                }
            };
            s!(tag; sym(text)).with_line(Some(p.line(position.line)))
        }
        "field" => {
            let mut cursor = target.into_cursor();
            let receiver = p.process_node(cursor.node()?)?;
            let safe = is_safe_navigation(&cursor.next_raw());
            let attribute = name(cursor.next_raw())?;
            let tag = if safe { "safe_attrasgn" } else { "attrasgn" };
            s!(tag; receiver, sym(format!("{}=", attribute)))
        }
        "aref_field" => {
            let mut cursor = target.into_cursor();
            let receiver = p.process_node(cursor.node()?)?;
            let mut node = s!("attrasgn"; receiver, sym("[]="));
            for arg in call_args(p, cursor.next_raw())? {
                node.push(arg);
            }
            node
        }
        "const_path_field" | "top_const_field" => {
            let path = constant_path(p, target)?;
            s!("cdecl"; path)
        }
        "mlhs" => return Ok(s!("masgn"; array(mlhs_targets(p, target)?))),
        "star" | "rest_param" => {
            let mut cursor = target.into_cursor();
            return match cursor.opt_node()? {
                Some(inner) => Ok(s!("splat"; assign_target(p, inner, None)?)),
                None => Ok(s!("splat")),
            };
        }
        other => {
            return Err(malformed_node(
                "assign",
                format!("unexpected assignment target {}", other),
            ))
        }
    };
    if let Some(value) = value {
        node.push(value);
    }
    Ok(node)
}

/// Targets of a left-hand side list (`[...]` or `[:mlhs, ...]`).
pub fn mlhs_targets(p: &mut Processor, node: RawNode) -> NormalizeResult<Vec<Sexp>> {
    if !node.is_list() && !node.is("mlhs") {
        return Ok(vec![assign_target(p, node, None)?]);
    }
    let mut targets = Vec::with_capacity(node.len());
    for child in node.children {
        match child {
            Raw::Node(target) => targets.push(assign_target(p, target, None)?),
            raw if raw.is_absent() => {}
            other => {
                return Err(malformed_node(
                    "mlhs",
                    format!("unexpected target {}", other),
                ))
            }
        }
    }
    Ok(targets)
}

/// The loop variable of `for`: a single lvalue or a destructuring `masgn`.
pub fn loop_target(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    if node.is_list() || node.is("mlhs") {
        let targets = mlhs_targets(p, node)?;
        return Ok(s!("masgn"; array(targets)));
    }
    assign_target(p, node, None)
}

/// The read side of an operator-assignment target.
fn reference(p: &mut Processor, target: RawNode) -> NormalizeResult<Sexp> {
    match target.tag.as_str() {
        "var_field" => {
            let mut cursor = target.into_cursor();
            let variable = cursor.node()?;
            let line = p.line_of(&variable);
            let (kind, text, _) = token(variable)?;
            let tag = match kind.as_str() {
                "ident" => "lvar",
                "ivar" => "ivar",
                "gvar" => "gvar",
                "cvar" => "cvar",
                "const" => "const",
                other => {
                    return Err(malformed_node(
                        "opassign",
                        format!("cannot read @{}", other),
                    ))
                }
            };
            Ok(s!(tag; sym(text)).with_line(line))
        }
        "const_path_field" | "top_const_field" => constant_path(p, target),
        other => Err(malformed_node(
            "opassign",
            format!("unexpected target {}", other),
        )),
    }
}

/// `A::B` and `::A` as assignment targets.
fn constant_path(p: &mut Processor, target: RawNode) -> NormalizeResult<Sexp> {
    let top = target.is("top_const_field");
    let mut cursor = target.into_cursor();
    if top {
        let constant = name(cursor.next_raw())?;
        return Ok(s!("colon3"; sym(constant)));
    }
    let scope = p.process_node(cursor.node()?)?;
    let constant = name(cursor.next_raw())?;
    Ok(s!("colon2"; scope, sym(constant)))
}

fn array(items: Vec<Sexp>) -> Sexp {
    Sexp::from_items("array", items.into_iter().map(Item::Node).collect())
}

/// Right-hand side list of a single assignment (`a = *b`, `a = b, c`).
fn svalue(mut args: Vec<Sexp>) -> Sexp {
    if args.len() == 1 && args[0].is("splat") {
        return s!("svalue"; args.remove(0));
    }
    s!("svalue"; array(args))
}
