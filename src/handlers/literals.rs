//! # Literals
//!
//! Numbers, variables and constants, strings in all their forms, symbols,
//! regexps, arrays, hashes and ranges.
//!
//! ## Strings
//!
//! Every string-like literal is a sequence of fragments: literal text tagged
//! with the delimiter that opened it, and embedded expressions. Fragments
//! are decoded by the delimiter's grammar, adjacent text is merged, empty
//! interior text is dropped, and embedded string literals fold into the
//! surrounding text. What remains decides the result:
//!
//! | fragments          | string   | symbol | regexp       | command |
//! |--------------------|----------|--------|--------------|---------|
//! | text only          | `str`    | `lit`  | `lit`        | `xstr`  |
//! | with interpolation | `dstr`   | `dsym` | `dregx`      | `dxstr` |

use super::helpers::{body, call_args, name, token};
use crate::errors::{malformed_node, NormalizeResult};
use crate::literal::heredoc::{dedent_squiggly, Heredoc, HeredocKind, QuoteStyle};
use crate::literal::regexp::{parse_flags, unescape_regexp};
use crate::literal::{delimiter_char, LiteralDecoder};
use crate::normalizer::{HandlerRegistry, Processor};
use crate::raw::{Raw, RawNode};
use crate::s;
use crate::sexp::{inspect_float, sym, Item, RangeValue, RegexpValue, RubyString, Sexp};
use num_bigint::BigInt;

pub fn register_literal_handlers(registry: &mut HandlerRegistry) {
    registry.register("@int", process_int);
    registry.register("@float", process_float);
    registry.register("@rational", process_rational);
    registry.register("@imaginary", process_imaginary);
    registry.register("@CHAR", process_char);
    registry.register("@label", process_label);
    registry.register("@backref", process_variable_token);
    registry.register("@const", process_variable_token);
    registry.register("@ivar", process_variable_token);
    registry.register("@gvar", process_variable_token);
    registry.register("@cvar", process_variable_token);
    registry.register("@tstring_content", process_tstring_content);
    registry.register("var_ref", process_var_ref);
    registry.register("const_ref", process_var_ref);
    registry.register("const_path_ref", process_const_path_ref);
    registry.register("top_const_ref", process_top_const_ref);

    registry.register("string_literal", process_string_literal);
    registry.register("string_content", process_string_literal);
    registry.register("string_concat", process_string_concat);
    registry.register("xstring_literal", process_xstring_literal);
    registry.register("dyna_symbol", process_dyna_symbol);
    registry.register("symbol_literal", process_symbol_literal);
    registry.register("symbol", process_symbol_literal);
    registry.register("regexp_literal", process_regexp_literal);
    registry.register("words", process_words);
    registry.register("qwords", process_words);
    registry.register("symbols", process_symbols);
    registry.register("qsymbols", process_symbols);

    registry.register("array", process_array);
    registry.register("hash", process_hash);
    registry.register("bare_assoc_hash", process_hash);
    registry.register("dot2", process_range);
    registry.register("dot3", process_range);
}

// ============================================================================
// NUMBERS
// ============================================================================

fn process_int(_p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let (_, text, _) = token(node)?;
    let value = parse_integer(&text)
        .ok_or_else(|| malformed_node("@int", format!("invalid integer literal {}", text)))?;
    Ok(s!("lit"; integer_item(value)))
}

fn process_float(_p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let (_, text, _) = token(node)?;
    let value = parse_float(&text)
        .ok_or_else(|| malformed_node("@float", format!("invalid float literal {}", text)))?;
    Ok(s!("lit"; value))
}

fn process_rational(_p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let (_, text, _) = token(node)?;
    let value = rational(&text)
        .ok_or_else(|| malformed_node("@rational", format!("invalid rational {}", text)))?;
    Ok(s!("lit"; Item::Rational(value)))
}

fn process_imaginary(_p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let (_, text, _) = token(node)?;
    let value = imaginary(&text)
        .ok_or_else(|| malformed_node("@imaginary", format!("invalid imaginary {}", text)))?;
    Ok(s!("lit"; Item::Imaginary(value)))
}

/// Integer literal text: underscores, `0x`/`0b`/`0o`/`0d` prefixes and
/// leading-zero octal. Any size.
pub fn parse_integer(text: &str) -> Option<BigInt> {
    let clean: String = text.chars().filter(|c| *c != '_').collect();
    let (negative, digits) = match clean.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, clean.strip_prefix('+').unwrap_or(&clean)),
    };
    let lower = digits.to_ascii_lowercase();
    let (radix, body) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = lower.strip_prefix("0d") {
        (10, rest)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (8, &lower[1..])
    } else {
        (10, lower.as_str())
    };
    if body.is_empty() || !body.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let value = BigInt::parse_bytes(body.as_bytes(), radix)?;
    Some(if negative { -value } else { value })
}

/// `Int` when the value fits, the decimal digits otherwise.
pub fn integer_item(value: BigInt) -> Item {
    match i128::try_from(&value) {
        Ok(n) => Item::Int(n),
        Err(_) => Item::BigInt(value.to_string()),
    }
}

fn parse_float(text: &str) -> Option<f64> {
    let clean: String = text.chars().filter(|c| *c != '_').collect();
    clean.parse().ok()
}

/// `3r` is `(3/1)`, `1.5r` is `(3/2)`.
fn rational(text: &str) -> Option<String> {
    let digits = text.strip_suffix('r')?;
    let clean: String = digits.chars().filter(|c| *c != '_').collect();
    let (numerator, denominator) = match clean.split_once('.') {
        Some((whole, fraction)) => {
            let numerator: BigInt = format!("{}{}", whole, fraction).parse().ok()?;
            (numerator, BigInt::from(10u32).pow(fraction.len() as u32))
        }
        None => (parse_integer(&clean)?, BigInt::from(1u32)),
    };
    let divisor = gcd(numerator.clone(), denominator.clone());
    let divisor = if divisor == BigInt::from(0u32) { BigInt::from(1u32) } else { divisor };
    Some(format!("({}/{})", &numerator / &divisor, &denominator / &divisor))
}

/// `2i` is `(0+2i)`, `1ri` is `(0+(1/1)*i)`.
fn imaginary(text: &str) -> Option<String> {
    let number = text.strip_suffix('i')?;
    if number.ends_with('r') {
        return Some(format!("(0+{}*i)", rational(number)?));
    }
    if number.contains(['.', 'e', 'E']) && !number.starts_with("0x") {
        return Some(format!("(0+{}i)", inspect_float(parse_float(number)?)));
    }
    Some(format!("(0+{}i)", parse_integer(number)?))
}

/// Non-negative greatest common divisor.
fn gcd(mut a: BigInt, mut b: BigInt) -> BigInt {
    let zero = BigInt::from(0u32);
    while b != zero {
        let remainder = &a % &b;
        a = b;
        b = remainder;
    }
    if a < zero {
        -a
    } else {
        a
    }
}

// ============================================================================
// VARIABLES AND CONSTANTS
// ============================================================================

/// `?a`
fn process_char(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let (_, text, _) = token(node)?;
    let body = text.strip_prefix('?').unwrap_or(&text);
    Ok(s!("str"; p.decoder().double_quoted(body)))
}

/// `foo:` as a hash key.
fn process_label(_p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let (_, text, _) = token(node)?;
    Ok(s!("lit"; sym(text.trim_end_matches(':'))))
}

fn process_variable_token(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let (kind, text, position) = token(node)?;
    variable(p, &kind, text, p.line(position.line))
}

/// `[:var_ref, token]`: a read of a variable, constant or keyword value.
fn process_var_ref(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let (kind, text, position) = token(cursor.node()?)?;
    variable(p, &kind, text, p.line(position.line))
}

fn variable(p: &Processor, kind: &str, text: String, line: usize) -> NormalizeResult<Sexp> {
    let node = match kind {
        "ident" => s!("lvar"; sym(text)),
        "ivar" => s!("ivar"; sym(text)),
        "gvar" => s!("gvar"; sym(text)),
        "cvar" => s!("cvar"; sym(text)),
        "const" => s!("const"; sym(text)),
        "backref" => {
            let Some(name) = text.strip_prefix('$') else {
                return Err(malformed_node("@backref", format!("invalid back reference {:?}", text)));
            };
            match name.parse::<i64>() {
                Ok(n) => s!("nth_ref"; n),
                Err(_) => s!("back_ref"; sym(name)),
            }
        }
        "kw" => match text.as_str() {
            "nil" => s!("nil"),
            "true" => s!("true"),
            "false" => s!("false"),
            "self" => s!("self"),
            "__FILE__" => s!("str"; p.decoder().verbatim(p.filename())),
            "__LINE__" => s!("lit"; line),
            "__ENCODING__" => s!(
                "colon2";
                s!("const"; sym("Encoding")),
                sym(p.encoding().constant_name())
            ),
            other => return Err(malformed_node("var_ref", format!("keyword {}", other))),
        },
        other => return Err(malformed_node("var_ref", format!("unexpected @{}", other))),
    };
    Ok(node.with_line(Some(line)))
}

/// `Scope::Name`
fn process_const_path_ref(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let scope = p.process_node(cursor.node()?)?;
    let constant = name(cursor.next_raw())?;
    Ok(s!("colon2"; scope, sym(constant)))
}

/// `::Name`
fn process_top_const_ref(_p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let constant = name(cursor.next_raw())?;
    Ok(s!("colon3"; sym(constant)))
}

// ============================================================================
// STRING FRAGMENTS
// ============================================================================

/// How literal text between delimiters is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quoting {
    Double,
    Single(char),
    Word(char),
    /// Single-quoted heredocs: no escape processing at all.
    Verbatim,
    Regexp(char),
}

impl Quoting {
    fn for_opener(opener: Option<&str>) -> Self {
        let Some(opener) = opener else {
            return Quoting::Double;
        };
        if let Some(heredoc) = Heredoc::from_opener(opener) {
            return match heredoc.quote {
                QuoteStyle::Single => Quoting::Verbatim,
                QuoteStyle::Double | QuoteStyle::Command => Quoting::Double,
            };
        }
        let delimiter = delimiter_char(opener);
        if opener.starts_with("%w") || opener.starts_with("%i") {
            Quoting::Word(delimiter)
        } else if opener == "'" || opener == ":'" || opener.starts_with("%q") || opener.starts_with("%s") {
            Quoting::Single(delimiter)
        } else if opener == "/" || opener.starts_with("%r") {
            Quoting::Regexp(delimiter)
        } else {
            Quoting::Double
        }
    }

    fn decode(self, decoder: &LiteralDecoder, text: &str) -> RubyString {
        match self {
            Quoting::Double => decoder.double_quoted(text),
            Quoting::Single(delimiter) => decoder.single_quoted(text, delimiter),
            Quoting::Word(delimiter) => decoder.word(text, delimiter),
            Quoting::Verbatim => decoder.verbatim(text),
            Quoting::Regexp(delimiter) => decoder.verbatim(&unescape_regexp(text, delimiter)),
        }
    }
}

/// A piece of a string-like literal before decoding.
enum Fragment {
    Text { text: String, opener: Option<String> },
    Part(Part),
}

/// A decoded piece: literal text or a canonical node (`evstr`, or an inner
/// piece of a folded `dstr`).
#[derive(Debug, Clone)]
enum Part {
    Text(RubyString),
    Node(Sexp),
}

/// Reads the fragments of a literal body. Embedded expressions are
/// processed here, in source order.
fn fragments(p: &mut Processor, parts: Vec<Raw>) -> NormalizeResult<Vec<Fragment>> {
    let mut out = Vec::with_capacity(parts.len());
    for part in parts {
        let node = match part {
            Raw::Node(node) => node,
            raw if raw.is_absent() => continue,
            other => {
                return Err(malformed_node(
                    "string_content",
                    format!("unexpected string part {}", other),
                ))
            }
        };
        match node.tag.as_str() {
            "@tstring_content" => {
                let mut cursor = node.into_cursor();
                let text = cursor.string()?;
                cursor.next_raw();
                let opener = match cursor.next_raw() {
                    Raw::Str(opener) => Some(opener),
                    _ => None,
                };
                out.push(Fragment::Text { text, opener });
            }
            "string_embexpr" => {
                let line = p.line_of(&node);
                let mut cursor = node.into_cursor();
                match body(p, cursor.next_raw())? {
                    None => out.push(Fragment::Part(Part::Node(s!("evstr").with_line(line)))),
                    Some(inner) => {
                        out.extend(parts_of(inner).into_iter().map(Fragment::Part));
                    }
                }
            }
            "string_dvar" => {
                let mut cursor = node.into_cursor();
                let var = p.process_node(cursor.node()?)?;
                let line = var.line;
                out.push(Fragment::Part(Part::Node(s!("evstr"; var).with_line(line))));
            }
            _ => {
                let inner = p.process_node(node)?;
                out.extend(parts_of(inner).into_iter().map(Fragment::Part));
            }
        }
    }
    Ok(out)
}

/// Splits a processed node back into parts: `str` is text, `dstr` spreads
/// into its pieces, anything else is interpolated.
fn parts_of(node: Sexp) -> Vec<Part> {
    match node.tag {
        "str" => match node.items.into_iter().next() {
            Some(Item::Str(text)) => vec![Part::Text(text)],
            _ => Vec::new(),
        },
        "dstr" => node
            .items
            .into_iter()
            .filter_map(|item| match item {
                Item::Str(text) => Some(Part::Text(text)),
                Item::Node(inner) if inner.is("str") => parts_of(inner).into_iter().next(),
                Item::Node(inner) => Some(Part::Node(inner)),
                _ => None,
            })
            .collect(),
        _ => {
            let line = node.line;
            vec![Part::Node(s!("evstr"; node).with_line(line))]
        }
    }
}

/// Decodes text fragments. `forced` overrides the per-fragment delimiter
/// grammar (regexp bodies). Squiggly heredocs are dedented before decoding.
fn decode(p: &Processor, fragments: Vec<Fragment>, forced: Option<Quoting>) -> Vec<Part> {
    let decoder = *p.decoder();
    let squiggly = fragments.iter().any(|fragment| match fragment {
        Fragment::Text { opener: Some(opener), .. } => Heredoc::from_opener(opener)
            .is_some_and(|heredoc| heredoc.kind == HeredocKind::Squiggly),
        _ => false,
    });

    let mut texts: Vec<Option<String>> = Vec::with_capacity(fragments.len());
    let mut openers = Vec::with_capacity(fragments.len());
    let mut parts = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        match fragment {
            Fragment::Text { text, opener } => {
                texts.push(Some(text));
                openers.push(opener);
                parts.push(None);
            }
            Fragment::Part(part) => {
                texts.push(None);
                openers.push(None);
                parts.push(Some(part));
            }
        }
    }
    if squiggly {
        dedent_squiggly(&mut texts);
    }

    texts
        .into_iter()
        .zip(openers)
        .zip(parts)
        .filter_map(|((text, opener), part)| match (text, part) {
            (Some(text), _) => {
                let quoting = forced.unwrap_or_else(|| Quoting::for_opener(opener.as_deref()));
                Some(Part::Text(quoting.decode(&decoder, &text)))
            }
            (None, part) => part,
        })
        .collect()
}

/// Merged literal text, or a head string plus the remaining pieces.
enum Assembled {
    Plain(RubyString),
    Interpolated(RubyString, Vec<Sexp>),
}

fn assemble(p: &Processor, parts: Vec<Part>) -> Assembled {
    let empty = || RubyString::new(Vec::new(), p.encoding());
    let mut head = empty();
    let mut rest: Option<Vec<Sexp>> = None;
    let mut pending = empty();

    for part in parts {
        match part {
            Part::Text(text) if rest.is_none() => head.push(&text),
            Part::Text(text) => pending.push(&text),
            Part::Node(node) => {
                let nodes = rest.get_or_insert_with(Vec::new);
                if !pending.is_empty() {
                    nodes.push(s!("str"; std::mem::replace(&mut pending, empty())));
                }
                nodes.push(node);
            }
        }
    }
    match rest {
        None => Assembled::Plain(head),
        Some(mut nodes) => {
            if !pending.is_empty() {
                nodes.push(s!("str"; pending));
            }
            Assembled::Interpolated(head, nodes)
        }
    }
}

fn interpolated(tag: &'static str, head: Item, nodes: Vec<Sexp>) -> Sexp {
    let mut node = s!(tag; head);
    node.extend(nodes.into_iter().map(Item::Node));
    node
}

/// The parts of a `string_content` node or a bare list.
fn content_parts(raw: Raw) -> NormalizeResult<Vec<Raw>> {
    match raw {
        Raw::Node(node) if node.is("string_content") || node.is_list() => Ok(node.children),
        Raw::Node(node) => Ok(vec![Raw::Node(node)]),
        raw if raw.is_absent() => Ok(Vec::new()),
        other => Err(malformed_node(
            "string_literal",
            format!("unexpected string body {}", other),
        )),
    }
}

fn string_node(p: &Processor, parts: Vec<Part>) -> Sexp {
    match assemble(p, parts) {
        Assembled::Plain(text) => s!("str"; text),
        Assembled::Interpolated(head, nodes) => interpolated("dstr", Item::Str(head), nodes),
    }
}

fn symbol_node(p: &Processor, parts: Vec<Part>) -> Sexp {
    match assemble(p, parts) {
        Assembled::Plain(text) => s!("lit"; sym(text.to_text())),
        Assembled::Interpolated(head, nodes) => interpolated("dsym", Item::Str(head), nodes),
    }
}

// ============================================================================
// STRING HANDLERS
// ============================================================================

fn process_tstring_content(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let fragments = fragments(p, vec![Raw::Node(node)])?;
    let parts = decode(p, fragments, None);
    Ok(string_node(p, parts))
}

/// `"..."`, `'...'`, `%q(...)`, heredocs.
fn process_string_literal(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let raw = if node.is("string_content") {
        Raw::Node(node)
    } else {
        let mut cursor = node.into_cursor();
        cursor.next_raw()
    };
    let fragments = fragments(p, content_parts(raw)?)?;
    let parts = decode(p, fragments, None);
    Ok(string_node(p, parts))
}

/// `"a" "b"`
fn process_string_concat(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let left = p.process_node(cursor.node()?)?;
    let right = p.process_node(cursor.node()?)?;
    let line = left.line;
    let mut parts = parts_of(left);
    parts.extend(parts_of(right));
    Ok(string_node(p, parts).with_line(line))
}

/// `` `cmd` `` and `%x(cmd)`
fn process_xstring_literal(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let fragments = fragments(p, content_parts(cursor.next_raw())?)?;
    let parts = decode(p, fragments, None);
    Ok(match assemble(p, parts) {
        Assembled::Plain(text) => s!("xstr"; text),
        Assembled::Interpolated(head, nodes) => interpolated("dxstr", Item::Str(head), nodes),
    })
}

/// `:"..."`, `%s(...)` and quoted hash labels.
fn process_dyna_symbol(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let fragments = fragments(p, content_parts(cursor.next_raw())?)?;
    let parts = decode(p, fragments, None);
    Ok(symbol_node(p, parts))
}

/// `:name`, and bare names in `alias`/`undef`.
fn process_symbol_literal(_p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let text = match cursor.next_raw() {
        Raw::Node(inner) if inner.is("symbol") => {
            let mut inner = inner.into_cursor();
            name(inner.next_raw())?
        }
        other => name(other)?,
    };
    Ok(s!("lit"; sym(text)))
}

/// `/.../flags` and `%r{...}flags`
fn process_regexp_literal(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    let raw_parts = content_parts(cursor.next_raw())?;
    let flags = match cursor.next_raw() {
        Raw::Node(end) => parse_flags(end.token_text().unwrap_or("/")),
        _ => Default::default(),
    };
    let fragments = fragments(p, raw_parts)?;
    let delimiter = fragments
        .iter()
        .find_map(|fragment| match fragment {
            Fragment::Text { opener: Some(opener), .. } => Some(delimiter_char(opener)),
            _ => None,
        })
        .unwrap_or('/');
    let parts = decode(p, fragments, Some(Quoting::Regexp(delimiter)));

    Ok(match assemble(p, parts) {
        Assembled::Plain(source) => s!(
            "lit";
            RegexpValue {
                source: source.to_text(),
                options: flags.options,
            }
        ),
        Assembled::Interpolated(head, nodes) => {
            let tag = if flags.once { "dregx_once" } else { "dregx" };
            let mut node = interpolated(tag, Item::Str(head), nodes);
            if flags.options != 0 {
                node.push(Item::Int(flags.options as i128));
            }
            node
        }
    })
}

/// `%w()`/`%W()`: an `array` of strings.
fn process_words(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut array = s!("array");
    for word in node.children {
        let parts = word_parts(p, word)?;
        array.push(string_node(p, parts));
    }
    Ok(array)
}

/// `%i()`/`%I()`: an `array` of symbols.
fn process_symbols(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut array = s!("array");
    for word in node.children {
        let parts = word_parts(p, word)?;
        array.push(symbol_node(p, parts));
    }
    Ok(array)
}

/// One element of a word list: a bare content token or a `word` node.
fn word_parts(p: &mut Processor, word: Raw) -> NormalizeResult<Vec<Part>> {
    let raw_parts = match word {
        Raw::Node(node) if node.is("word") => node.children,
        other => vec![other],
    };
    let fragments = fragments(p, raw_parts)?;
    Ok(decode(p, fragments, None))
}

// ============================================================================
// COLLECTIONS AND RANGES
// ============================================================================

/// `[a, b]` and the word-list literals wrapped in `array`.
fn process_array(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut cursor = node.into_cursor();
    match cursor.next_raw() {
        Raw::Node(inner) if !inner.is_list() => p.process_node(inner),
        other => {
            let mut array = s!("array");
            array.extend(call_args(p, other)?.into_iter().map(Item::Node));
            Ok(array)
        }
    }
}

/// `{k => v}` and trailing keyword arguments; pairs are spread.
fn process_hash(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let mut hash = s!("hash");
    for entry in node.into_cursor().rest_nodes()? {
        if !entry.is("assoc_new") {
            hash.push(p.process_node(entry)?);
            continue;
        }
        let mut pair = entry.into_cursor();
        let key = p.process_node(pair.node()?)?;
        let value = p.process_raw(pair.next_raw())?;
        hash.push(key);
        hash.push(value);
    }
    Ok(hash)
}

/// `a..b`, `a...b`; two integer literals fold into a range literal.
fn process_range(p: &mut Processor, node: RawNode) -> NormalizeResult<Sexp> {
    let exclusive = node.is("dot3");
    let tag = if exclusive { "dot3" } else { "dot2" };
    let mut cursor = node.into_cursor();
    let from = p.process_raw(cursor.next_raw())?;
    let to = p.process_raw(cursor.next_raw())?;

    if let (Some(start), Some(end)) = (int_literal(&from), int_literal(&to)) {
        let line = from.as_ref().and_then(|node| node.line);
        return Ok(s!("lit"; RangeValue { start, end, exclusive }).with_line(line));
    }
    Ok(s!(tag; from, to))
}

fn int_literal(node: &Option<Sexp>) -> Option<i128> {
    match node {
        Some(node) if node.is("lit") => match node.items.first() {
            Some(Item::Int(n)) => Some(*n),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_radixes() {
        let int = |n: i64| Some(BigInt::from(n));
        assert_eq!(parse_integer("1_000"), int(1000));
        assert_eq!(parse_integer("0x1f"), int(31));
        assert_eq!(parse_integer("0b101"), int(5));
        assert_eq!(parse_integer("0o17"), int(15));
        assert_eq!(parse_integer("017"), int(15));
        assert_eq!(parse_integer("0d19"), int(19));
        assert_eq!(parse_integer("0"), int(0));
        assert_eq!(parse_integer("-42"), int(-42));
        assert_eq!(parse_integer("09"), None);
        assert_eq!(parse_integer("0x"), None);
    }

    #[test]
    fn integers_past_i128_keep_their_digits() {
        let digits = "123456789012345678901234567890123456789012345";
        let value = parse_integer(digits).unwrap();
        assert_eq!(integer_item(value), Item::BigInt(digits.to_string()));
        let hex = parse_integer("0xffffffffffffffffffffffffffffffffff").unwrap();
        assert_eq!(
            integer_item(hex),
            Item::BigInt("87112285931760246646623899502532662132735".to_string())
        );
        assert_eq!(integer_item(BigInt::from(7)), Item::Int(7));
    }

    #[test]
    fn rationals_reduce() {
        assert_eq!(rational("3r").as_deref(), Some("(3/1)"));
        assert_eq!(rational("1.5r").as_deref(), Some("(3/2)"));
        assert_eq!(rational("0.75r").as_deref(), Some("(3/4)"));
        assert_eq!(
            rational("123456789012345678901234567890123456789012345r").as_deref(),
            Some("(123456789012345678901234567890123456789012345/1)")
        );
        assert_eq!(
            rational("0.000000000000000000000000000000000000000005r").as_deref(),
            Some("(1/200000000000000000000000000000000000000000)")
        );
    }

    #[test]
    fn imaginaries() {
        assert_eq!(imaginary("1i").as_deref(), Some("(0+1i)"));
        assert_eq!(imaginary("2.5i").as_deref(), Some("(0+2.5i)"));
        assert_eq!(imaginary("1ri").as_deref(), Some("(0+(1/1)*i)"));
    }

    #[test]
    fn quoting_follows_the_opener() {
        assert_eq!(Quoting::for_opener(Some("'")), Quoting::Single('\''));
        assert_eq!(Quoting::for_opener(Some("%q(")), Quoting::Single('('));
        assert_eq!(Quoting::for_opener(Some("%w[")), Quoting::Word('['));
        assert_eq!(Quoting::for_opener(Some("<<~'EOS'")), Quoting::Verbatim);
        assert_eq!(Quoting::for_opener(Some("<<-EOS")), Quoting::Double);
        assert_eq!(Quoting::for_opener(Some("%r{")), Quoting::Regexp('{'));
        assert_eq!(Quoting::for_opener(None), Quoting::Double);
    }
}
