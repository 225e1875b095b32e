//! Raw parse tree as produced by the front end.
//!
//! A [`RawNode`] is a tag followed by children that are nodes, scalars or
//! absent (`nil`/`false`). Scanner tokens are leaves tagged `@kind` holding
//! the token text and a [`Position`]. Arrays that do not start with a tag
//! carry the synthetic placeholder tag [`LIST_TAG`] so every node can be
//! dispatched.

use std::fmt;

pub mod cursor;
pub mod reader;

pub use cursor::Cursor;

/// Placeholder tag for untagged arrays.
pub const LIST_TAG: &str = "-";

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Source position of a scanner token: 1-based line, 0-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// A child of a raw node.
#[derive(Debug, Clone, PartialEq)]
pub enum Raw {
    Node(RawNode),
    Str(String),
    Sym(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Nil,
    Pos(Position),
}

/// A tagged raw node. Handlers take these by value and consume the children.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNode {
    pub tag: String,
    pub children: Vec<Raw>,
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Raw {
    /// True for the two encodings of "nothing here": `nil` and `false`.
    pub fn is_absent(&self) -> bool {
        matches!(self, Raw::Nil | Raw::Bool(false))
    }

    pub fn as_node(&self) -> Option<&RawNode> {
        match self {
            Raw::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn into_node(self) -> Option<RawNode> {
        match self {
            Raw::Node(node) => Some(node),
            _ => None,
        }
    }
}

impl RawNode {
    pub fn new(tag: impl Into<String>, children: Vec<Raw>) -> Self {
        Self {
            tag: tag.into(),
            children,
        }
    }

    /// An untagged array.
    pub fn list(children: Vec<Raw>) -> Self {
        Self::new(LIST_TAG, children)
    }

    /// A scanner leaf `[:@kind, token, [line, column]]`.
    pub fn token(kind: &str, text: impl Into<String>, position: Position) -> Self {
        Self::new(
            format!("@{}", kind),
            vec![Raw::Str(text.into()), Raw::Pos(position)],
        )
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    pub fn is_list(&self) -> bool {
        self.tag == LIST_TAG
    }

    pub fn is_token(&self) -> bool {
        self.tag.starts_with('@')
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn push(&mut self, child: Raw) {
        self.children.push(child);
    }

    /// The child node at `index`, if that child is a node.
    pub fn child(&self, index: usize) -> Option<&RawNode> {
        self.children.get(index).and_then(Raw::as_node)
    }

    /// Text of a scanner leaf.
    pub fn token_text(&self) -> Option<&str> {
        if !self.is_token() {
            return None;
        }
        match self.children.first() {
            Some(Raw::Str(text)) => Some(text),
            _ => None,
        }
    }

    /// The first position found in a pre-order walk of this subtree.
    pub fn first_position(&self) -> Option<Position> {
        self.children.iter().find_map(|child| match child {
            Raw::Pos(position) => Some(*position),
            Raw::Node(node) => node.first_position(),
            _ => None,
        })
    }

    pub fn first_line(&self) -> Option<usize> {
        self.first_position().map(|position| position.line)
    }

    /// Consumes the node into a cursor over its children.
    pub fn into_cursor(self) -> Cursor {
        Cursor::new(self.tag, self.children)
    }

    /// True for a statement sequence: an untagged list or a `stmts` node.
    pub fn is_statements(&self) -> bool {
        self.is_list() || self.is("stmts")
    }

    /// The single statement wrapped by `paren` or by a `begin` without
    /// rescue/else/ensure clauses, looking through nested wrappers.
    pub fn unwrap_begin(&self) -> Option<&RawNode> {
        let statements = match self.tag.as_str() {
            "paren" => self.child(0)?.statement_nodes(),
            "begin" => {
                let body = self.child(0)?;
                if !body.is("bodystmt") {
                    return None;
                }
                if body.children.iter().skip(1).any(|c| !c.is_absent()) {
                    return None;
                }
                body.child(0)?.statement_nodes()
            }
            _ => return None,
        };
        let [single] = statements.as_slice() else {
            return None;
        };
        let single: &RawNode = single;
        Some(single.unwrap_begin().unwrap_or(single))
    }

    /// Non-void statements of a sequence; any other node is its own sequence.
    fn statement_nodes(&self) -> Vec<&RawNode> {
        if self.is_statements() {
            self.children
                .iter()
                .filter_map(Raw::as_node)
                .filter(|node| !node.is("void_stmt"))
                .collect()
        } else {
            vec![self]
        }
    }
}

// ============================================================================
// DISPLAY
// ============================================================================

impl fmt::Display for Raw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Raw::Node(node) => write!(f, "{}", node),
            Raw::Str(text) => write!(f, "{}", crate::sexp::RubyString::utf8(text).inspect()),
            Raw::Sym(name) => write!(f, "{}", crate::sexp::inspect_symbol(name)),
            Raw::Int(n) => write!(f, "{}", n),
            Raw::Float(x) => write!(f, "{:?}", x),
            Raw::Bool(b) => write!(f, "{}", b),
            Raw::Nil => write!(f, "nil"),
            Raw::Pos(position) => write!(f, "[{}, {}]", position.line, position.column),
        }
    }
}

impl fmt::Display for RawNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        let mut first = true;
        if !self.is_list() {
            write!(f, "{}", crate::sexp::inspect_symbol(&self.tag))?;
            first = false;
        }
        for child in &self.children {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", child)?;
            first = false;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str, line: usize) -> Raw {
        Raw::Node(RawNode::token("ident", name, Position::new(line, 0)))
    }

    #[test]
    fn first_position_searches_depth_first() {
        let node = RawNode::new(
            "assign",
            vec![
                Raw::Node(RawNode::new("var_field", vec![ident("a", 4)])),
                ident("b", 5),
            ],
        );
        assert_eq!(node.first_line(), Some(4));
    }

    #[test]
    fn displays_ruby_inspect_notation() {
        let node = RawNode::new("vcall", vec![ident("foo", 1)]);
        assert_eq!(node.to_string(), r#"[:vcall, [:@ident, "foo", [1, 0]]]"#);
        let list = RawNode::list(vec![Raw::Nil, Raw::Bool(false)]);
        assert_eq!(list.to_string(), "[nil, false]");
    }

    #[test]
    fn unwraps_parenthesized_single_statement() {
        let dot2 = RawNode::new("dot2", vec![ident("a", 1), ident("b", 1)]);
        let paren = RawNode::new(
            "paren",
            vec![Raw::Node(RawNode::list(vec![Raw::Node(dot2.clone())]))],
        );
        assert_eq!(paren.unwrap_begin(), Some(&dot2));
    }

    #[test]
    fn begin_with_rescue_does_not_unwrap() {
        let body = RawNode::new("stmts", vec![ident("a", 1)]);
        let bodystmt = RawNode::new(
            "bodystmt",
            vec![
                Raw::Node(body),
                Raw::Node(RawNode::new("rescue", vec![])),
                Raw::Nil,
                Raw::Nil,
            ],
        );
        let begin = RawNode::new("begin", vec![Raw::Node(bodystmt)]);
        assert_eq!(begin.unwrap_begin(), None);
    }
}
