//! Parser configuration and source-file metadata.
//!
//! Configuration is per [`crate::RubyParser`] instance. The only behavioural
//! switch is `extra_compatible`, which keeps literal bytes in the source
//! encoding instead of promoting escaped multibyte text to UTF-8.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{syntax_error, NormalizeResult};
use crate::sexp::SourceEncoding;

// ============================================================================
// PARSER CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Match legacy byte-for-byte literal decoding.
    pub extra_compatible: bool,
}

impl ParserConfig {
    pub fn extra_compatible() -> Self {
        Self {
            extra_compatible: true,
        }
    }

    /// Reads a configuration object such as `{"extra_compatible": true}`.
    /// Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

// ============================================================================
// SOURCE FILES
// ============================================================================

/// One unit of Ruby input together with the labels the parse reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub text: String,
    /// Used for `__FILE__` and in error messages.
    pub filename: String,
    /// Line number of the first source line.
    pub lineno: usize,
    pub encoding: SourceEncoding,
}

impl SourceFile {
    /// Builds a source file, honouring an encoding magic comment on the
    /// first two lines.
    pub fn new(
        text: impl Into<String>,
        filename: impl Into<String>,
        lineno: usize,
    ) -> NormalizeResult<Self> {
        let text = text.into();
        let filename = filename.into();
        let encoding = detect_encoding(&text, &filename)?;
        Ok(Self {
            text,
            filename,
            lineno,
            encoding,
        })
    }

    /// A source with no text, for normalizing raw trees captured elsewhere.
    pub fn named(filename: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            filename: filename.into(),
            lineno: 1,
            encoding: SourceEncoding::default(),
        }
    }

    pub fn with_lineno(mut self, lineno: usize) -> Self {
        self.lineno = lineno;
        self
    }

    pub fn with_encoding(mut self, encoding: SourceEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Offset added to front-end line numbers.
    pub fn line_offset(&self) -> usize {
        self.lineno.saturating_sub(1)
    }
}

static MAGIC_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*#.*?\b(?:en)?coding\s*[:=]\s*([\w.-]+)")
        .expect("magic comment pattern is a valid regex")
});

/// Source encoding from a magic comment on line 1 or 2; UTF-8 otherwise.
pub fn detect_encoding(text: &str, filename: &str) -> NormalizeResult<SourceEncoding> {
    for (index, line) in text.lines().take(2).enumerate() {
        let Some(captures) = MAGIC_COMMENT.captures(line) else {
            continue;
        };
        let name = &captures[1];
        return match SourceEncoding::from_name(name) {
            Some(encoding) => {
                debug!(encoding = %encoding, line = index + 1, "magic comment");
                Ok(encoding)
            }
            None => Err(syntax_error(
                format!("unknown encoding name: {}", name),
                filename,
                Some(index + 1),
            )),
        };
    }
    Ok(SourceEncoding::Utf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_from_partial_json() {
        assert_eq!(ParserConfig::from_json("{}").unwrap(), ParserConfig::default());
        assert!(
            ParserConfig::from_json(r#"{"extra_compatible": true}"#)
                .unwrap()
                .extra_compatible
        );
    }

    #[test]
    fn magic_comment_on_first_two_lines() {
        assert_eq!(
            detect_encoding("# encoding: ascii-8bit\n", "t").unwrap(),
            SourceEncoding::Binary
        );
        assert_eq!(
            detect_encoding("#!/usr/bin/env ruby\n# -*- coding: US-ASCII -*-\n", "t").unwrap(),
            SourceEncoding::UsAscii
        );
        assert_eq!(
            detect_encoding("\n\n# coding: binary\n", "t").unwrap(),
            SourceEncoding::Utf8
        );
    }

    #[test]
    fn unknown_encoding_is_a_syntax_error() {
        let error = detect_encoding("# encoding: klingon\n", "foo.rb").unwrap_err();
        assert!(error.is_syntax_error());
        assert_eq!(error.to_string(), "foo.rb:1: unknown encoding name: klingon");
    }

    #[test]
    fn ordinary_comments_are_not_magic() {
        assert_eq!(
            detect_encoding("# just a comment\nfoo\n", "t").unwrap(),
            SourceEncoding::Utf8
        );
    }
}
