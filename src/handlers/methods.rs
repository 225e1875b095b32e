//! Definitions and their surroundings: `def`, `defs`, `class`, `module`,
//! singleton classes, parameter lists, `alias`, `undef` and attached
//! comments.
//!
//! Definition bodies always hold at least one statement; an empty `def`
//! body is `(nil)`. Every definition node carries a `comments` string, empty
//! unless the front end wrapped it in a `comment` node.

use super::helpers::{name, statements, token, token_text};
use crate::errors::{malformed_node, NormalizeResult};
use crate::normalizer::{HandlerRegistry, Processor};
use crate::raw::{Raw, RawNode};
use crate::s;
use crate::sexp::{sym, Item, Sexp};

pub fn register_method_handlers(registry: &mut HandlerRegistry) {
    registry.register("def", process_def);
    registry.register("defs", process_defs);
    registry.register("class", process_class);
    registry.register("module", process_module);
    registry.register("sclass", process_sclass);
    registry.register("comment", process_comment);
    registry.register("params", process_params);
    registry.register("alias", process_alias);
    registry.register("var_alias", process_var_alias);
    registry.register("undef", process_undef);
}

// ============================================================================
// DEFINITIONS
// ============================================================================

/// `(defn, name, args, body...)`
fn process_def(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let method = name(cursor.next_raw())?;
    let args = method_args(p, cursor.next_raw())?;
    let body = method_body(p, cursor.next_raw())?;

    let mut defn = s!("defn"; sym(method), args);
    defn.extend(body.into_iter().map(Item::Node));
    defn.comments = Some(String::new());
    Ok(defn)
}

/// `(defs, receiver, name, args, body...)`
fn process_defs(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let receiver = p.process_node(cursor.node()?)?;
    cursor.next_raw();
    let method = name(cursor.next_raw())?;
    let args = method_args(p, cursor.next_raw())?;
    let body = method_body(p, cursor.next_raw())?;

    let mut defs = s!("defs"; receiver, sym(method), args);
    defs.extend(body.into_iter().map(Item::Node));
    defs.comments = Some(String::new());
    Ok(defs)
}

fn method_body(p: &mut Processor, raw: Raw) -> NormalizeResult<Vec<Sexp>> {
    let body = p.with_method_body(true, |p| statements(p, raw))?;
    if body.is_empty() {
        return Ok(vec![s!("nil")]);
    }
    Ok(body)
}

/// `(class, name, superclass, body...)`
fn process_class(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let path = class_path(p, cursor.node()?)?;
    let superclass = p.process_raw(cursor.next_raw())?;
    let body = scope_body(p, cursor.next_raw())?;

    let mut class = s!("class"; path, superclass);
    class.extend(body.into_iter().map(Item::Node));
    class.comments = Some(String::new());
    Ok(class)
}

/// `(module, name, body...)`
fn process_module(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let path = class_path(p, cursor.node()?)?;
    let body = scope_body(p, cursor.next_raw())?;

    let mut module = s!("module"; path);
    module.extend(body.into_iter().map(Item::Node));
    module.comments = Some(String::new());
    Ok(module)
}

/// `class << target`
fn process_sclass(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let target = p.process_node(cursor.node()?)?;
    let body = scope_body(p, cursor.next_raw())?;

    let mut sclass = s!("sclass"; target);
    sclass.extend(body.into_iter().map(Item::Node));
    sclass.comments = Some(String::new());
    Ok(sclass)
}

fn scope_body(p: &mut Processor, raw: Raw) -> NormalizeResult<Vec<Sexp>> {
    p.with_method_body(false, |p| statements(p, raw))
}

/// A class or module name: a bare constant becomes a symbol, a scoped one
/// stays a `colon2`/`colon3` path.
fn class_path(p: &mut Processor, node: RawNode) -> NormalizeResult<Item> {
    match node.tag.as_str() {
        "const_ref" => {
            let mut cursor = node.into_cursor();
            Ok(sym(name(cursor.next_raw())?))
        }
        "@const" => Ok(sym(token_text(node)?)),
        _ => p.process_node(node).map(Item::Node),
    }
}

/// `[:comment, text, definition]`: the definition with its comment text.
fn process_comment(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let text = cursor.string()?;
    let mut definition = p.process_node(cursor.node()?)?;
    definition.comments = Some(text);
    Ok(definition)
}

// ============================================================================
// PARAMETERS
// ============================================================================

fn process_params(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    method_args(p, Raw::Node(node))
}

/// Builds `(args ...)` from a `params` node, possibly wrapped in `paren`.
/// Order: required, optional, splat, post-required, keywords, keyword
/// splat, block.
pub fn method_args(p: &mut Processor, raw: Raw) -> NormalizeResult<Sexp> {
    let node = match raw {
        Raw::Node(node) if node.is("paren") => {
            let mut cursor = node.into_cursor();
            return method_args(p, cursor.next_raw());
        }
        Raw::Node(node) if node.is("params") => node,
        raw if raw.is_absent() => return Ok(s!("args")),
        other => {
            return Err(malformed_node(
                "params",
                format!("expected a parameter list, found {}", other),
            ))
        }
    };

    let mut cursor = node.into_cursor();
    let mut args = s!("args");
    let mut trailing_comma = false;

    for param in raw_list(cursor.next_raw())? {
        args.push(required_param(param)?);
    }
    for pair in raw_list(cursor.next_raw())? {
        let mut pair = pair.into_cursor();
        let param = name(pair.next_raw())?;
        let default = p.process_node(pair.node()?)?;
        args.push(s!("lasgn"; sym(param), default));
    }
    match cursor.next_raw() {
        Raw::Node(rest) if rest.is("rest_param") => {
            let mut rest = rest.into_cursor();
            args.push(prefixed("*", rest.next_raw())?);
        }
        Raw::Node(rest) if rest.is("excessed_comma") => trailing_comma = true,
        Raw::Node(rest) if rest.is("args_forward") => args.push(s!("forward_args")),
        Raw::Int(_) => trailing_comma = true,
        _ => {}
    }
    for param in raw_list(cursor.next_raw())? {
        args.push(required_param(param)?);
    }
    for pair in raw_list(cursor.next_raw())? {
        let mut pair = pair.into_cursor();
        let label = name(pair.next_raw())?;
        let label = label.trim_end_matches(':').to_string();
        let mut kwarg = s!("kwarg"; sym(label));
        if let Some(default) = p.process_raw(pair.next_raw())? {
            kwarg.push(default);
        }
        args.push(kwarg);
    }
    match cursor.next_raw() {
        Raw::Node(kwrest) if kwrest.is("kwrest_param") => {
            let mut kwrest = kwrest.into_cursor();
            args.push(prefixed("**", kwrest.next_raw())?);
        }
        Raw::Node(kwrest) if kwrest.is("args_forward") => args.push(s!("forward_args")),
        Raw::Sym(nil) if nil == "nil" => args.push(sym("**nil")),
        _ => {}
    }
    if let Raw::Node(block) = cursor.next_raw() {
        let mut block = block.into_cursor();
        args.push(prefixed("&", block.next_raw())?);
    }
    if trailing_comma {
        args.push(Item::Nil);
    }
    Ok(args)
}

/// Block parameters: the method-style list plus `(shadow ...)` for
/// block-local variables.
pub fn block_args(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    if !node.is("block_var") {
        return method_args(p, Raw::Node(node));
    }
    let mut cursor = node.into_cursor();
    let mut args = method_args(p, cursor.next_raw())?;
    let locals = raw_list(cursor.next_raw())?;
    if !locals.is_empty() {
        let mut shadow = s!("shadow");
        for local in locals {
            shadow.push(sym(token_text(local)?));
        }
        args.push(shadow);
    }
    Ok(args)
}

/// A required parameter: a name, or a destructuring `(masgn ...)`.
fn required_param(param: RawNode) -> NormalizeResult<Item> {
    match param.tag.as_str() {
        "mlhs" => {
            let mut masgn = s!("masgn");
            for inner in param.children {
                match inner {
                    Raw::Node(inner) => masgn.push(required_param(inner)?),
                    raw if raw.is_absent() => {}
                    other => {
                        return Err(malformed_node(
                            "mlhs",
                            format!("unexpected parameter {}", other),
                        ))
                    }
                }
            }
            Ok(Item::Node(masgn))
        }
        "star" | "rest_param" => {
            let mut cursor = param.into_cursor();
            prefixed("*", cursor.next_raw())
        }
        "var_field" => {
            let mut cursor = param.into_cursor();
            required_param(cursor.node()?)
        }
        _ => Ok(sym(token_text(param)?)),
    }
}

/// `*name`, `**name`, `&name`; just the sigil when anonymous.
fn prefixed(sigil: &str, raw: Raw) -> NormalizeResult<Item> {
    match raw {
        Raw::Node(node) if node.is("var_field") => {
            let mut cursor = node.into_cursor();
            prefixed(sigil, cursor.next_raw())
        }
        Raw::Node(node) => Ok(sym(format!("{}{}", sigil, token_text(node)?))),
        raw if raw.is_absent() => Ok(sym(sigil)),
        other => Err(malformed_node(
            "params",
            format!("unexpected parameter {}", other),
        )),
    }
}

/// The nodes of an optional untagged list.
fn raw_list(raw: Raw) -> NormalizeResult<Vec<RawNode>> {
    match raw {
        Raw::Node(node) if node.is_list() => node.into_cursor().rest_nodes(),
        raw if raw.is_absent() => Ok(Vec::new()),
        Raw::Int(0) => Ok(Vec::new()),
        other => Err(malformed_node(
            "params",
            format!("expected a list, found {}", other),
        )),
    }
}

// ============================================================================
// ALIAS / UNDEF
// ============================================================================

/// `alias new old`
fn process_alias(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let new = p.process_node(cursor.node()?)?;
    let old = p.process_node(cursor.node()?)?;
    Ok(s!("alias"; new, old))
}

/// `alias $new $old`
fn process_var_alias(_p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let (_, new, _) = token(cursor.node()?)?;
    let (_, old, _) = token(cursor.node()?)?;
    Ok(s!("valias"; sym(new), sym(old)))
}

/// `undef a, b` becomes a `block` of single-name `undef`s.
fn process_undef(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let mut undefs = Vec::new();
    for target in raw_list(cursor.next_raw())? {
        let line = p.line_of(&target);
        let target = p.process_node(target)?;
        undefs.push(s!("undef"; target).with_line(line));
    }
    match undefs.len() {
        0 => Err(malformed_node("undef", "no method names")),
        1 => Ok(undefs.remove(0)),
        _ => Ok(Sexp::from_items("block", undefs.into_iter().map(Item::Node).collect())),
    }
}
