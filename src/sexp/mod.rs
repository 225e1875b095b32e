//! Canonical s-expression tree produced by the normalizer.
//!
//! A [`Sexp`] is a tag followed by ordered items. Two attributes travel out
//! of band and do not take part in equality:
//!
//! - `line`: the source line the node came from, set once.
//! - `comments`: only on `class`, `module`, `defn`, `defs` and `sclass`
//!   nodes; the comment text that preceded the definition, possibly empty.
//!
//! # Examples
//!
//! ```rust
//! use ruby_canon::s;
//! use ruby_canon::sexp::{sym, Item};
//! let call = s!("call"; Item::Nil, sym("foo"));
//! assert_eq!(call.to_string(), "s(:call, nil, :foo)");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

pub mod value;

pub use value::{RangeValue, RegexpValue, RubyString, SourceEncoding};

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// One canonical AST node.
#[derive(Debug, Clone, Serialize)]
pub struct Sexp {
    pub tag: &'static str,
    pub items: Vec<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// A child of a canonical node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Item {
    Node(Sexp),
    Nil,
    Bool(bool),
    Sym(String),
    Int(i128),
    /// An integer too large for `Int`, as decimal digits.
    BigInt(String),
    Float(f64),
    Str(RubyString),
    Regexp(RegexpValue),
    Range(RangeValue),
    Rational(String),
    Imaginary(String),
}

/// Builds an [`Item::Sym`].
pub fn sym(name: impl Into<String>) -> Item {
    Item::Sym(name.into())
}

/// Builds a canonical node from a tag and any number of items.
///
/// Items are converted with `Item::from`, so nodes, `Option<Sexp>`, integers,
/// booleans and already-built items can be mixed freely.
#[macro_export]
macro_rules! s {
    ($tag:expr) => {
        $crate::sexp::Sexp::new($tag)
    };
    ($tag:expr; $($item:expr),+ $(,)?) => {
        $crate::sexp::Sexp::from_items($tag, vec![$($crate::sexp::Item::from($item)),+])
    };
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl Sexp {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            items: Vec::new(),
            line: None,
            comments: None,
        }
    }

    pub fn from_items(tag: &'static str, items: Vec<Item>) -> Self {
        Self {
            tag,
            items,
            line: None,
            comments: None,
        }
    }

    /// Returns true if this node carries the given tag.
    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: impl Into<Item>) {
        self.items.push(item.into());
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = Item>) {
        self.items.extend(items);
    }

    /// Returns the node at `index` if that item is a node.
    pub fn node(&self, index: usize) -> Option<&Sexp> {
        match self.items.get(index) {
            Some(Item::Node(node)) => Some(node),
            _ => None,
        }
    }

    pub fn node_mut(&mut self, index: usize) -> Option<&mut Sexp> {
        match self.items.get_mut(index) {
            Some(Item::Node(node)) => Some(node),
            _ => None,
        }
    }

    /// Returns the symbol name at `index` if that item is a symbol.
    pub fn sym_at(&self, index: usize) -> Option<&str> {
        match self.items.get(index) {
            Some(Item::Sym(name)) => Some(name),
            _ => None,
        }
    }

    /// Iterates over the child nodes, skipping scalar items.
    pub fn child_nodes(&self) -> impl Iterator<Item = &Sexp> {
        self.items.iter().filter_map(|item| match item {
            Item::Node(node) => Some(node),
            _ => None,
        })
    }

    pub fn child_nodes_mut(&mut self) -> impl Iterator<Item = &mut Sexp> {
        self.items.iter_mut().filter_map(|item| match item {
            Item::Node(node) => Some(node),
            _ => None,
        })
    }

    /// Sets the line unless one is already present.
    pub fn set_line_if_unset(&mut self, line: Option<usize>) {
        if self.line.is_none() {
            self.line = line;
        }
    }

    /// Builder-style variant of [`Sexp::set_line_if_unset`].
    pub fn with_line(mut self, line: Option<usize>) -> Self {
        self.set_line_if_unset(line);
        self
    }

    /// Splits a statement sequence: a `block` yields its children, anything
    /// else yields itself.
    pub fn into_statements(self) -> Vec<Sexp> {
        if self.is("block") {
            self.items
                .into_iter()
                .filter_map(|item| match item {
                    Item::Node(node) => Some(node),
                    _ => None,
                })
                .collect()
        } else {
            vec![self]
        }
    }

    /// Renders the tree with line annotations, one node per `s(...)`, as
    /// `s(:tag, ...)@line`.
    pub fn to_string_with_lines(&self) -> String {
        let mut out = String::new();
        write_sexp(&mut out, self, true);
        out
    }
}

impl PartialEq for Sexp {
    /// Structural equality; `line` and `comments` are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.items == other.items
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<Sexp> for Item {
    fn from(node: Sexp) -> Self {
        Item::Node(node)
    }
}

impl From<Option<Sexp>> for Item {
    fn from(node: Option<Sexp>) -> Self {
        node.map_or(Item::Nil, Item::Node)
    }
}

impl From<bool> for Item {
    fn from(value: bool) -> Self {
        Item::Bool(value)
    }
}

impl From<i32> for Item {
    fn from(value: i32) -> Self {
        Item::Int(value as i128)
    }
}

impl From<i64> for Item {
    fn from(value: i64) -> Self {
        Item::Int(value as i128)
    }
}

impl From<i128> for Item {
    fn from(value: i128) -> Self {
        Item::Int(value)
    }
}

impl From<usize> for Item {
    fn from(value: usize) -> Self {
        Item::Int(value as i128)
    }
}

impl From<f64> for Item {
    fn from(value: f64) -> Self {
        Item::Float(value)
    }
}

impl From<RubyString> for Item {
    fn from(value: RubyString) -> Self {
        Item::Str(value)
    }
}

impl From<RegexpValue> for Item {
    fn from(value: RegexpValue) -> Self {
        Item::Regexp(value)
    }
}

impl From<RangeValue> for Item {
    fn from(value: RangeValue) -> Self {
        Item::Range(value)
    }
}

// ============================================================================
// DISPLAY
// ============================================================================

impl fmt::Display for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_sexp(&mut out, self, false);
        f.write_str(&out)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_item(&mut out, self, false);
        f.write_str(&out)
    }
}

fn write_sexp(out: &mut String, node: &Sexp, with_lines: bool) {
    out.push_str("s(:");
    out.push_str(node.tag);
    for item in &node.items {
        out.push_str(", ");
        write_item(out, item, with_lines);
    }
    out.push(')');
    if with_lines {
        if let Some(line) = node.line {
            out.push_str(&format!("@{}", line));
        }
    }
}

fn write_item(out: &mut String, item: &Item, with_lines: bool) {
    match item {
        Item::Node(node) => write_sexp(out, node, with_lines),
        Item::Nil => out.push_str("nil"),
        Item::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Item::Sym(name) => out.push_str(&inspect_symbol(name)),
        Item::Int(n) => out.push_str(&n.to_string()),
        Item::BigInt(digits) => out.push_str(digits),
        Item::Float(x) => out.push_str(&inspect_float(*x)),
        Item::Str(s) => out.push_str(&s.inspect()),
        Item::Regexp(re) => out.push_str(&re.to_string()),
        Item::Range(range) => out.push_str(&range.to_string()),
        Item::Rational(text) | Item::Imaginary(text) => out.push_str(text),
    }
}

/// Ruby `Float#inspect`: the shortest round-trip digits, fixed notation
/// for decimal exponents from -4 to 15 and `d.ddde+XX` outside that.
pub fn inspect_float(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let sign = if x.is_sign_negative() { "-" } else { "" };
    let scientific = format!("{:e}", x.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let point = exponent + 1;
    let width = digits.len() as i32;

    let body = if !(-3..=16).contains(&point) {
        let (first, rest) = digits.split_at(1);
        let rest = if rest.is_empty() { "0" } else { rest };
        format!("{}.{}e{:+03}", first, rest, exponent)
    } else if point <= 0 {
        format!("0.{}{}", "0".repeat(point.unsigned_abs() as usize), digits)
    } else if width <= point {
        format!("{}{}.0", digits, "0".repeat((point - width) as usize))
    } else {
        let (whole, fraction) = digits.split_at(point as usize);
        format!("{}.{}", whole, fraction)
    };
    format!("{}{}", sign, body)
}

static PLAIN_SYMBOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?:@@?|\$)?[A-Za-z_][A-Za-z0-9_]*|[A-Za-z_][A-Za-z0-9_]*[?!=]|\$(?:[0-9]+|[~*$?!@/\\;,.=:<>&`'+\x22_0])|\[\]=?|\*\*?|[+\-]@?|[/%~!^&|<>`]|<=>|==?=?|=~|!=|!~|<=|>=|<<|>>)$",
    )
    .expect("symbol pattern is a valid regex")
});

/// Ruby `Symbol#inspect`: bare when the name is a plain identifier or
/// operator, quoted otherwise.
pub fn inspect_symbol(name: &str) -> String {
    if PLAIN_SYMBOL.is_match(name) {
        format!(":{}", name)
    } else {
        format!(":{}", RubyString::utf8(name).inspect())
    }
}
