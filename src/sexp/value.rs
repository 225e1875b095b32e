//! Scalar payloads carried by canonical nodes: encoded strings, regexp
//! literals and range literals.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ENCODINGS
// ============================================================================

/// Text encoding tag attached to decoded string content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SourceEncoding {
    #[default]
    Utf8,
    /// ASCII-8BIT: raw bytes with no character semantics.
    Binary,
    UsAscii,
}

impl SourceEncoding {
    /// Resolves a magic-comment encoding name. Returns `None` for names this
    /// crate does not know.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(SourceEncoding::Utf8),
            "binary" | "ascii-8bit" => Some(SourceEncoding::Binary),
            "us-ascii" | "ascii" => Some(SourceEncoding::UsAscii),
            _ => None,
        }
    }

    /// The constant name Ruby uses under `Encoding::`.
    pub fn constant_name(self) -> &'static str {
        match self {
            SourceEncoding::Utf8 => "UTF_8",
            SourceEncoding::Binary => "ASCII_8BIT",
            SourceEncoding::UsAscii => "US_ASCII",
        }
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceEncoding::Utf8 => write!(f, "UTF-8"),
            SourceEncoding::Binary => write!(f, "ASCII-8BIT"),
            SourceEncoding::UsAscii => write!(f, "US-ASCII"),
        }
    }
}

// ============================================================================
// STRINGS
// ============================================================================

/// A byte string tagged with an encoding, the way Ruby string literals are.
///
/// Equality compares both bytes and encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RubyString {
    pub bytes: Vec<u8>,
    pub encoding: SourceEncoding,
}

impl RubyString {
    pub fn new(bytes: impl Into<Vec<u8>>, encoding: SourceEncoding) -> Self {
        Self {
            bytes: bytes.into(),
            encoding,
        }
    }

    /// A UTF-8 tagged string from Rust text.
    pub fn utf8(text: &str) -> Self {
        Self::new(text.as_bytes(), SourceEncoding::Utf8)
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Appends another fragment. The receiver keeps its encoding unless it is
    /// empty, in which case it adopts the fragment's.
    pub fn push(&mut self, other: &RubyString) {
        if self.bytes.is_empty() {
            self.encoding = other.encoding;
        }
        self.bytes.extend_from_slice(&other.bytes);
    }

    /// Lossy text view, used for symbols and diagnostics.
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Ruby `inspect`-style rendering with surrounding double quotes.
    pub fn inspect(&self) -> String {
        let mut out = String::from("\"");
        match std::str::from_utf8(&self.bytes) {
            Ok(text) if self.encoding != SourceEncoding::Binary => {
                let mut chars = text.chars().peekable();
                while let Some(ch) = chars.next() {
                    push_inspect_char(&mut out, ch, chars.peek().copied());
                }
            }
            _ => {
                let mut bytes = self.bytes.iter().copied().peekable();
                while let Some(byte) = bytes.next() {
                    if byte.is_ascii() {
                        let next = bytes.peek().map(|b| *b as char);
                        push_inspect_char(&mut out, byte as char, next);
                    } else {
                        out.push_str(&format!("\\x{:02X}", byte));
                    }
                }
            }
        }
        out.push('"');
        out
    }
}

/// `next` is the following character; `#` before `{`, `$` or `@` would
/// start an interpolation and is escaped.
fn push_inspect_char(out: &mut String, ch: char, next: Option<char>) {
    match ch {
        '"' => out.push_str("\\\""),
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\t' => out.push_str("\\t"),
        '\r' => out.push_str("\\r"),
        '\u{7}' => out.push_str("\\a"),
        '\u{8}' => out.push_str("\\b"),
        '\u{b}' => out.push_str("\\v"),
        '\u{c}' => out.push_str("\\f"),
        '\u{1b}' => out.push_str("\\e"),
        '#' if matches!(next, Some('{' | '$' | '@')) => out.push_str("\\#"),
        c if (c as u32) < 0x20 || c as u32 == 0x7f => {
            out.push_str(&format!("\\x{:02X}", c as u32));
        }
        c => out.push(c),
    }
}

// ============================================================================
// REGEXPS
// ============================================================================

/// Option bits of a regexp literal, matching Ruby's `Regexp` constants.
pub mod regexp_options {
    pub const IGNORECASE: u32 = 1;
    pub const EXTENDED: u32 = 2;
    pub const MULTILINE: u32 = 4;
    pub const FIXEDENCODING: u32 = 16;
    pub const NOENCODING: u32 = 32;
}

/// A compiled (non-interpolated) regexp literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegexpValue {
    pub source: String,
    pub options: u32,
}

impl fmt::Display for RegexpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use regexp_options::*;
        f.write_str("/")?;
        let mut chars = self.source.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '\\' => {
                    f.write_str("\\")?;
                    if let Some(escaped) = chars.next() {
                        write!(f, "{}", escaped)?;
                    }
                }
                '/' => f.write_str("\\/")?,
                c => write!(f, "{}", c)?,
            }
        }
        f.write_str("/")?;
        if self.options & MULTILINE != 0 {
            write!(f, "m")?;
        }
        if self.options & IGNORECASE != 0 {
            write!(f, "i")?;
        }
        if self.options & EXTENDED != 0 {
            write!(f, "x")?;
        }
        if self.options & NOENCODING != 0 {
            write!(f, "n")?;
        }
        Ok(())
    }
}

// ============================================================================
// RANGES
// ============================================================================

/// An integer range literal such as `1..3` or `1...3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeValue {
    pub start: i128,
    pub end: i128,
    pub exclusive: bool,
}

impl fmt::Display for RangeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dots = if self.exclusive { "..." } else { ".." };
        write!(f, "{}{}{}", self.start, dots, self.end)
    }
}
