//! Shared pieces used by every handler family: statement sequences, bodies,
//! argument lists and token text.

use crate::errors::{malformed_node, NormalizeResult};
use crate::handlers::exceptions;
use crate::normalizer::Processor;
use crate::position;
use crate::raw::{Position, Raw, RawNode};
use crate::s;
use crate::sexp::{Item, Sexp};

// ============================================================================
// STATEMENT SEQUENCES
// ============================================================================

/// Processes a statement sequence. Void statements vanish; a `bodystmt`
/// contributes its combined body; any other single node is a one-statement
/// sequence.
pub fn statements(p: &mut Processor, raw: Raw) -> NormalizeResult<Vec<Sexp>> {
    let node = match raw {
        Raw::Node(node) => node,
        raw if raw.is_absent() => return Ok(Vec::new()),
        other => {
            return Err(malformed_node(
                "stmts",
                format!("expected statements, found {}", other),
            ))
        }
    };

    if node.is("bodystmt") {
        return body_statements(p, node);
    }
    if node.is("void_stmt") {
        return Ok(Vec::new());
    }
    if !node.is_statements() {
        return Ok(vec![p.process_node(node)?]);
    }

    let mut out = Vec::with_capacity(node.len());
    for child in node.children {
        match child {
            Raw::Node(stmt) if stmt.is("void_stmt") => {}
            Raw::Node(stmt) => out.push(p.process_node(stmt)?),
            raw if raw.is_absent() => {}
            other => {
                return Err(malformed_node(
                    "stmts",
                    format!("expected a statement, found {}", other),
                ))
            }
        }
    }
    Ok(out)
}

/// Empty gives `None`, one statement stands alone, several make a `block`.
pub fn wrap_statements(mut stmts: Vec<Sexp>) -> Option<Sexp> {
    match stmts.len() {
        0 => None,
        1 => stmts.pop(),
        _ => Some(block(stmts)),
    }
}

pub fn block(stmts: Vec<Sexp>) -> Sexp {
    let line = stmts.first().and_then(|stmt| stmt.line);
    Sexp::from_items("block", stmts.into_iter().map(Item::Node).collect()).with_line(line)
}

/// A body in `nil`/single/`block` form.
pub fn body(p: &mut Processor, raw: Raw) -> NormalizeResult<Option<Sexp>> {
    Ok(wrap_statements(statements(p, raw)?))
}

/// The statements of a `bodystmt`. A `rescue` clause wraps the body into a
/// single `rescue` node and an `ensure` clause wraps that again.
pub fn body_statements(p: &mut Processor, node: RawNode) -> NormalizeResult<Vec<Sexp>> {
    let mut cursor = node.into_cursor();
    let main = statements(p, cursor.next_raw())?;
    let rescue = cursor.opt_node()?;
    let else_raw = cursor.next_raw();
    let ensure = cursor.opt_node()?;

    let mut else_stmts = else_statements(p, else_raw)?;
    let mut body = match rescue {
        Some(rescue) => {
            let mut node = s!("rescue");
            if let Some(main) = wrap_statements(main) {
                node.push(main);
            }
            for clause in exceptions::rescue_clauses(p, rescue)? {
                node.push(clause);
            }
            if let Some(else_body) = wrap_statements(else_stmts) {
                node.push(else_body);
            }
            position::trickle_up(&mut node);
            vec![node]
        }
        None => {
            let mut main = main;
            main.append(&mut else_stmts);
            main
        }
    };

    if let Some(ensure) = ensure {
        let ensure_body = exceptions::ensure_body(p, ensure)?;
        let mut node = s!("ensure");
        if let Some(main) = wrap_statements(body) {
            node.push(main);
        }
        node.push(ensure_body);
        position::trickle_up(&mut node);
        body = vec![node];
    }
    Ok(body)
}

/// An `else` clause: `[:else, stmts]`, a bare statement list, or absent.
pub fn else_statements(p: &mut Processor, raw: Raw) -> NormalizeResult<Vec<Sexp>> {
    match raw {
        Raw::Node(node) if node.is("else") => {
            let mut cursor = node.into_cursor();
            statements(p, cursor.next_raw())
        }
        other => statements(p, other),
    }
}

// ============================================================================
// ARGUMENTS
// ============================================================================

/// Flattens an argument list into canonical arguments. Accepts an
/// `arg_paren`, a list, a single node or nothing. Splats, keyword hashes and
/// block passes are handled by their own rules.
pub fn call_args(p: &mut Processor, raw: Raw) -> NormalizeResult<Vec<Sexp>> {
    let node = match raw {
        Raw::Node(node) => node,
        raw if raw.is_absent() => return Ok(Vec::new()),
        other => {
            return Err(malformed_node(
                "args",
                format!("expected arguments, found {}", other),
            ))
        }
    };
    if node.is("arg_paren") {
        let mut cursor = node.into_cursor();
        return call_args(p, cursor.next_raw());
    }
    if !node.is_list() {
        return Ok(vec![p.process_node(node)?]);
    }
    let mut out = Vec::with_capacity(node.len());
    for child in node.children {
        if let Some(arg) = p.process_raw(child)? {
            out.push(arg);
        }
    }
    Ok(out)
}

/// Value of `return`, `break` and `next`: one argument stands alone, a lone
/// splat becomes `svalue`, several become an `array`.
pub fn jump_value(args: Vec<Sexp>) -> Option<Sexp> {
    let mut args = args;
    match args.len() {
        0 => None,
        1 if args[0].is("splat") => args.pop().map(|splat| s!("svalue"; splat)),
        1 => args.pop(),
        _ => Some(Sexp::from_items(
            "array",
            args.into_iter().map(Item::Node).collect(),
        )),
    }
}

// ============================================================================
// TOKENS
// ============================================================================

/// Kind (without `@`), text and position of a scanner leaf.
pub fn token(node: RawNode) -> NormalizeResult<(String, String, Position)> {
    if !node.is_token() {
        return Err(malformed_node(
            node.tag.clone(),
            "expected a scanner token",
        ));
    }
    let kind = node.tag[1..].to_string();
    let mut cursor = node.into_cursor();
    let text = cursor.string()?;
    let position = cursor.position()?;
    Ok((kind, text, position))
}

pub fn token_text(node: RawNode) -> NormalizeResult<String> {
    token(node).map(|(_, text, _)| text)
}

/// A method or operator name: a token, or a bare symbol such as `:call`
/// for `foo.()`.
pub fn name(raw: Raw) -> NormalizeResult<String> {
    match raw {
        Raw::Sym(name) => Ok(name),
        Raw::Node(node) => token_text(node),
        other => Err(malformed_node(
            "name",
            format!("expected a name, found {}", other),
        )),
    }
}

/// True when a call operator is safe navigation (`&.`).
pub fn is_safe_navigation(raw: &Raw) -> bool {
    match raw {
        Raw::Sym(op) => op == "&.",
        Raw::Node(node) => node.token_text() == Some("&."),
        _ => false,
    }
}
