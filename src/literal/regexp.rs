//! Regexp literal bodies and option flags.

use crate::sexp::value::regexp_options::{
    EXTENDED, FIXEDENCODING, IGNORECASE, MULTILINE, NOENCODING,
};

/// Options decoded from the closing token of a regexp literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegexpFlags {
    pub options: u32,
    /// `o`: interpolate once.
    pub once: bool,
}

/// Decodes the flags trailing a closing token such as `/mix` or `}o`.
pub fn parse_flags(end_token: &str) -> RegexpFlags {
    let mut flags = RegexpFlags::default();
    for ch in end_token.chars().skip(1) {
        match ch {
            'i' => flags.options |= IGNORECASE,
            'x' => flags.options |= EXTENDED,
            'm' => flags.options |= MULTILINE,
            'n' => flags.options |= NOENCODING,
            'e' | 's' | 'u' => flags.options |= FIXEDENCODING,
            'o' => flags.once = true,
            _ => {}
        }
    }
    flags
}

/// Regexp source text keeps its escapes; only line splices and an escaped
/// `/` inside a slash-delimited literal are resolved.
pub fn unescape_regexp(text: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.peek().copied() {
            Some('\n') => {
                chars.next();
            }
            Some('/') if delimiter == '/' => {
                out.push('/');
                chars.next();
            }
            Some(next) => {
                out.push('\\');
                out.push(next);
                chars.next();
            }
            None => out.push('\\'),
        }
    }
    out
}
