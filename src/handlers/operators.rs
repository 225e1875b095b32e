//! Binary and unary operators.
//!
//! Most operators are method calls. The exceptions: `&&`/`and` and `||`/`or`
//! build right-nested `and`/`or` chains, `=~` against a regexp literal
//! becomes `match2`/`match3`, and `!~` becomes a negated `=~` that
//! conditions and loops fold away by swapping branches.

use super::helpers::name;
use crate::errors::NormalizeResult;
use crate::normalizer::{HandlerRegistry, Processor};
use crate::raw::RawNode;
use crate::s;
use crate::sexp::{sym, Item, Sexp};

pub fn register_operator_handlers(registry: &mut HandlerRegistry) {
    registry.register("binary", process_binary);
    registry.register("unary", process_unary);
    registry.register("defined", process_defined);
}

fn process_binary(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let left_raw = cursor.node()?;
    let grouped = left_raw.is("paren");
    let left = p.process_node(left_raw)?;
    let operator = name(cursor.next_raw())?;
    let right = p.process_node(cursor.node()?)?;

    Ok(match operator.as_str() {
        "&&" | "and" if grouped => s!("and"; left, right),
        "||" | "or" if grouped => s!("or"; left, right),
        "&&" | "and" => logical("and", left, right),
        "||" | "or" => logical("or", left, right),
        "=~" if is_regexp(&left) => s!("match2"; left, right),
        "=~" if is_regexp(&right) => s!("match3"; right, left),
        "!~" => {
            let line = left.line;
            s!("not"; s!("call"; left, sym("=~"), right).with_line(line))
        }
        _ => s!("call"; left, sym(operator), right),
    })
}

fn process_unary(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let operator = name(cursor.next_raw())?;
    let operand = p.process_raw(cursor.next_raw())?;

    match (operator.as_str(), operand) {
        ("!" | "not", operand) => Ok(s!("call"; operand, sym("!"))),
        ("-@", Some(mut operand)) if is_numeric(&operand) => {
            negate(&mut operand);
            Ok(operand)
        }
        (_, operand) => Ok(s!("call"; operand, sym(operator))),
    }
}

fn process_defined(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let expr = p.process_raw(cursor.next_raw())?;
    Ok(s!("defined"; expr))
}

// ============================================================================
// INTERNAL HELPERS
// ============================================================================

/// `(a && b) && c` arrives left-nested; the canonical chain nests right.
fn logical(tag: &'static str, left: Sexp, right: Sexp) -> Sexp {
    if !left.is(tag) || left.len() != 2 {
        return s!(tag; left, right);
    }
    let line = left.line;
    let mut items = left.items;
    match items.pop() {
        Some(Item::Node(second)) => {
            items.push(Item::Node(logical(tag, second, right)));
            Sexp::from_items(tag, items).with_line(line)
        }
        other => {
            items.extend(other);
            s!(tag; Sexp::from_items(tag, items).with_line(line), right)
        }
    }
}

/// A regexp literal, interpolated or not.
pub fn is_regexp(node: &Sexp) -> bool {
    match node.tag {
        "lit" => matches!(node.items.first(), Some(Item::Regexp(_))),
        "dregx" | "dregx_once" => true,
        _ => false,
    }
}

fn is_numeric(node: &Sexp) -> bool {
    node.is("lit")
        && matches!(
            node.items.first(),
            Some(
                Item::Int(_)
                    | Item::BigInt(_)
                    | Item::Float(_)
                    | Item::Rational(_)
                    | Item::Imaginary(_)
            )
        )
}

fn negate(node: &mut Sexp) {
    let Some(value) = node.items.first_mut() else {
        return;
    };
    match value {
        Item::Int(n) => *n = -*n,
        Item::BigInt(digits) => {
            *digits = match digits.strip_prefix('-') {
                Some(positive) => positive.to_string(),
                None => format!("-{}", digits),
            };
        }
        Item::Float(x) => *x = -*x,
        Item::Rational(text) => {
            *text = match text.strip_prefix('(') {
                Some(inner) => format!("(-{}", inner),
                None => format!("-{}", text),
            };
        }
        Item::Imaginary(text) => {
            if let Some(rest) = text.strip_prefix("(0+") {
                *text = format!("(0-{}", rest);
            }
        }
        _ => {}
    }
}
