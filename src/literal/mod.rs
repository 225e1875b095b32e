//! # Literal decoding
//!
//! Turns the source text of string, symbol, regexp and backtick literals into
//! the bytes Ruby would build, and decides which encoding the result carries.
//!
//! ## Grammars
//!
//! - **Double-quoted**: octal, `\x`, `\u`, `\M-`/`\C-`/`\c` prefixes in any
//!   combination, single-letter mnemonics, line splices, and pass-through for
//!   every other escaped character.
//! - **Single-quoted**: only `\\` and the escaped delimiter.
//! - **Words** (`%w`, `%i`): single-quoted plus escaped whitespace.
//!
//! Heredoc indentation lives in [`heredoc`], regexp bodies and flags in
//! [`regexp`].

use crate::sexp::{RubyString, SourceEncoding};

pub mod heredoc;
pub mod regexp;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Result of double-quoted unescaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub bytes: Vec<u8>,
    /// A `\x` or `\u` escape was seen.
    pub multibyte_escape: bool,
}

/// Per-parse literal decoder; carries the source encoding and the
/// compatibility toggle.
#[derive(Debug, Clone, Copy)]
pub struct LiteralDecoder {
    encoding: SourceEncoding,
    extra_compatible: bool,
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl LiteralDecoder {
    pub fn new(encoding: SourceEncoding, extra_compatible: bool) -> Self {
        Self {
            encoding,
            extra_compatible,
        }
    }

    pub fn encoding(&self) -> SourceEncoding {
        self.encoding
    }

    /// Decodes double-quoted literal text.
    pub fn double_quoted(&self, text: &str) -> RubyString {
        let decoded = unescape(text);
        let encoding = self.result_encoding(&decoded);
        RubyString::new(decoded.bytes, encoding)
    }

    /// Decodes single-quoted literal text opened by `delimiter`.
    pub fn single_quoted(&self, text: &str, delimiter: char) -> RubyString {
        RubyString::new(unescape_single(text, delimiter).into_bytes(), self.encoding)
    }

    /// Decodes one element of a `%w`/`%i` list.
    pub fn word(&self, text: &str, delimiter: char) -> RubyString {
        RubyString::new(unescape_word(text, delimiter).into_bytes(), self.encoding)
    }

    /// Text taken verbatim.
    pub fn verbatim(&self, text: &str) -> RubyString {
        RubyString::new(text.as_bytes(), self.encoding)
    }

    /// Promotion to UTF-8 happens only for a multibyte escape whose bytes
    /// already form valid, non-ASCII UTF-8.
    fn result_encoding(&self, decoded: &Decoded) -> SourceEncoding {
        if !decoded.multibyte_escape
            || self.extra_compatible
            || self.encoding == SourceEncoding::Utf8
        {
            return self.encoding;
        }
        match std::str::from_utf8(&decoded.bytes) {
            Ok(text) if !text.is_ascii() => SourceEncoding::Utf8,
            _ => self.encoding,
        }
    }
}

/// The closing counterpart of a percent-literal opening delimiter.
pub fn closing_delimiter(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        '<' => '>',
        other => other,
    }
}

/// The delimiter character of an opening token such as `"`, `'`, `%q(`,
/// `%w[` or `:"`.
pub fn delimiter_char(opener: &str) -> char {
    opener.chars().last().unwrap_or('"')
}

/// Double-quoted unescaping.
pub fn unescape(text: &str) -> Decoded {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut multibyte_escape = false;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\\' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        i += 1;
        let Some(&c) = bytes.get(i) else {
            out.push(b'\\');
            break;
        };
        match c {
            b'\n' => i += 1,
            b'0'..=b'7' => {
                let (value, used) = read_digits(&bytes[i..], 8, 3);
                out.push((value & 0xff) as u8);
                i += used;
            }
            b'x' => {
                multibyte_escape = true;
                let (value, used) = read_digits(&bytes[i + 1..], 16, 2);
                if used == 0 {
                    out.push(b'x');
                } else {
                    out.push(value as u8);
                }
                i += 1 + used;
            }
            b'u' => {
                multibyte_escape = true;
                i += 1;
                i += push_unicode_escape(&bytes[i..], &mut out);
            }
            b'M' | b'C' if bytes.get(i + 1) == Some(&b'-') => {
                out.push(modified_byte(bytes, &mut i));
            }
            b'c' => out.push(modified_byte(bytes, &mut i)),
            _ => {
                if let Some(byte) = mnemonic(c) {
                    out.push(byte);
                    i += 1;
                } else {
                    let len = utf8_len(c);
                    let end = (i + len).min(bytes.len());
                    out.extend_from_slice(&bytes[i..end]);
                    i = end;
                }
            }
        }
    }

    Decoded {
        bytes: out,
        multibyte_escape,
    }
}

/// Single-quoted unescaping: `\\` and an escaped delimiter (either side of
/// a bracket pair) lose their backslash; anything else is kept as written.
pub fn unescape_single(text: &str, delimiter: char) -> String {
    unescape_minimal(text, delimiter, false)
}

/// `%w`/`%i` element unescaping: single-quoted rules plus escaped whitespace.
pub fn unescape_word(text: &str, delimiter: char) -> String {
    unescape_minimal(text, delimiter, true)
}

// ============================================================================
// INTERNAL HELPERS
// ============================================================================

fn unescape_minimal(text: &str, delimiter: char, whitespace: bool) -> String {
    let close = closing_delimiter(delimiter);
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.peek().copied() {
            Some(next)
                if next == '\\'
                    || next == delimiter
                    || next == close
                    || (whitespace && next.is_whitespace()) =>
            {
                out.push(next);
                chars.next();
            }
            _ => out.push('\\'),
        }
    }
    out
}

fn mnemonic(c: u8) -> Option<u8> {
    Some(match c {
        b'a' => 0x07,
        b'b' => 0x08,
        b'e' => 0x1b,
        b'f' => 0x0c,
        b'n' => 0x0a,
        b'r' => 0x0d,
        b's' => 0x20,
        b't' => 0x09,
        b'v' => 0x0b,
        _ => return None,
    })
}

/// Reads up to `max` digits in `radix`; returns the value and digits used.
fn read_digits(bytes: &[u8], radix: u32, max: usize) -> (u32, usize) {
    let mut value = 0u32;
    let mut used = 0;
    for &b in bytes.iter().take(max) {
        let Some(digit) = (b as char).to_digit(radix) else {
            break;
        };
        value = value * radix + digit;
        used += 1;
    }
    (value, used)
}

/// Handles the part after `\u`; returns the number of bytes consumed.
fn push_unicode_escape(bytes: &[u8], out: &mut Vec<u8>) -> usize {
    if bytes.first() == Some(&b'{') {
        let Some(close) = bytes.iter().position(|&b| b == b'}') else {
            out.push(b'u');
            return 0;
        };
        let body = String::from_utf8_lossy(&bytes[1..close]);
        for code in body.split_whitespace() {
            push_code_point(u32::from_str_radix(code, 16).ok(), out);
        }
        return close + 1;
    }
    let (value, used) = read_digits(bytes, 16, 4);
    if used == 4 {
        push_code_point(Some(value), out);
        used
    } else {
        out.push(b'u');
        0
    }
}

fn push_code_point(code: Option<u32>, out: &mut Vec<u8>) {
    if let Some(ch) = code.and_then(char::from_u32) {
        let mut buf = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    }
}

/// Decodes a `\M-`, `\C-` or `\c` sequence starting at the prefix letter.
/// Prefixes compose in any order: meta sets 0x80, control masks to 0x9F and
/// turns `?` into DEL.
fn modified_byte(bytes: &[u8], i: &mut usize) -> u8 {
    let (meta, control) = match bytes[*i] {
        b'M' => {
            *i += 2;
            (true, false)
        }
        b'C' => {
            *i += 2;
            (false, true)
        }
        _ => {
            *i += 1;
            (false, true)
        }
    };

    let operand = match bytes.get(*i) {
        Some(b'\\') => {
            let next = bytes.get(*i + 1).copied();
            let after = bytes.get(*i + 2).copied();
            match next {
                Some(b'M') | Some(b'C') if after == Some(b'-') => {
                    *i += 1;
                    modified_byte(bytes, i)
                }
                Some(b'c') => {
                    *i += 1;
                    modified_byte(bytes, i)
                }
                Some(c) => {
                    *i += 2;
                    mnemonic(c).unwrap_or(c)
                }
                None => {
                    *i += 1;
                    b'\\'
                }
            }
        }
        Some(&b) => {
            *i += 1;
            b
        }
        None => 0,
    };

    let mut value = operand;
    if control {
        value = if value == b'?' { 0x7f } else { value & 0x9f };
    }
    if meta {
        value |= 0x80;
    }
    value
}

fn utf8_len(lead: u8) -> usize {
    match lead {
        0xf0..=0xff => 4,
        0xe0..=0xef => 3,
        0xc0..=0xdf => 2,
        _ => 1,
    }
}
