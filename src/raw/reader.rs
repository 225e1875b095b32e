//! Reader for raw trees written in Ruby-inspect notation.
//!
//! This is the notation `pp` prints for a Ripper sexp, so raw trees can be
//! captured from any Ruby front end and replayed through the normalizer:
//!
//! ```text
//! [:program, [[:assign, [:var_field, [:@ident, "a", [1, 0]]], [:@int, "1", [1, 4]]]]]
//! ```

use pest::{iterators::Pair, Parser};
use pest_derive::Parser;

use super::{Position, Raw, RawNode};
use crate::errors::{syntax_error, NormalizeResult};
use crate::literal::unescape;

#[derive(Parser)]
#[grammar = "raw/grammar.pest"]
struct DumpParser;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses one raw tree. `origin` names the input in error messages.
pub fn read_dump(text: &str, origin: &str) -> NormalizeResult<Raw> {
    let mut pairs = DumpParser::parse(Rule::dump, text).map_err(|e| {
        let line = match e.line_col {
            pest::error::LineColLocation::Pos((line, _)) => line,
            pest::error::LineColLocation::Span((line, _), _) => line,
        };
        syntax_error(format!("malformed raw dump: {}", e.variant.message()), origin, Some(line))
    })?;

    let Some(dump) = pairs.next() else {
        return Err(syntax_error("empty raw dump", origin, None));
    };
    let Some(value) = dump.into_inner().find(|p| p.as_rule() != Rule::EOI) else {
        return Err(syntax_error("empty raw dump", origin, None));
    };
    build_value(value, origin)
}

/// Convenience for callers that expect a node at the top.
pub fn read_node(text: &str, origin: &str) -> NormalizeResult<RawNode> {
    match read_dump(text, origin)? {
        Raw::Node(node) => Ok(node),
        other => Err(syntax_error(
            format!("raw dump must be an array, found {}", other),
            origin,
            Some(1),
        )),
    }
}

// ============================================================================
// TREE BUILDERS
// ============================================================================

fn build_value(pair: Pair<Rule>, origin: &str) -> NormalizeResult<Raw> {
    let line = pair.as_span().start_pos().line_col().0;
    match pair.as_rule() {
        Rule::array => {
            let items = pair
                .into_inner()
                .map(|p| build_value(p, origin))
                .collect::<NormalizeResult<Vec<_>>>()?;
            Ok(build_array(items))
        }
        Rule::nil => Ok(Raw::Nil),
        Rule::boolean => Ok(Raw::Bool(pair.as_str() == "true")),
        Rule::integer => pair
            .as_str()
            .parse::<i64>()
            .map(Raw::Int)
            .map_err(|e| syntax_error(format!("bad integer: {}", e), origin, Some(line))),
        Rule::float => pair
            .as_str()
            .parse::<f64>()
            .map(Raw::Float)
            .map_err(|e| syntax_error(format!("bad float: {}", e), origin, Some(line))),
        Rule::string => Ok(Raw::Str(inner_text(pair))),
        Rule::symbol => {
            let Some(inner) = pair.into_inner().next() else {
                return Err(syntax_error("empty symbol", origin, Some(line)));
            };
            match inner.as_rule() {
                Rule::quoted_symbol => Ok(Raw::Sym(inner_text(inner))),
                _ => Ok(Raw::Sym(inner.as_str().to_string())),
            }
        }
        rule => Err(syntax_error(
            format!("unexpected {:?} in raw dump", rule),
            origin,
            Some(line),
        )),
    }
}

/// Tagged arrays become nodes, `[line, column]` pairs become positions and
/// everything else gets the placeholder tag.
fn build_array(items: Vec<Raw>) -> Raw {
    if let [Raw::Int(line), Raw::Int(column)] = items.as_slice() {
        if *line >= 0 && *column >= 0 {
            return Raw::Pos(Position::new(*line as usize, *column as usize));
        }
    }
    let mut items = items.into_iter();
    match items.next() {
        Some(Raw::Sym(tag)) => Raw::Node(RawNode::new(tag, items.collect())),
        Some(first) => {
            let mut children = vec![first];
            children.extend(items);
            Raw::Node(RawNode::list(children))
        }
        None => Raw::Node(RawNode::list(Vec::new())),
    }
}

/// Unescaped contents of a quoted string or symbol.
fn inner_text(pair: Pair<Rule>) -> String {
    let text = pair
        .into_inner()
        .next()
        .map(|inner| inner.as_str())
        .unwrap_or_default();
    String::from_utf8_lossy(&unescape(text).bytes).into_owned()
}
