//! Public entry point: source text in, canonical tree out.
//!
//! ```rust
//! use ruby_canon::{ParserConfig, RubyParser, SourceFile};
//! use ruby_canon::raw::reader::read_dump;
//!
//! let raw = read_dump(r#"[:program, [[:@int, "42", [1, 0]]]]"#, "dump").unwrap();
//! let parser = RubyParser::new(ParserConfig::default());
//! let tree = parser.normalize(raw, &SourceFile::named("(string)")).unwrap();
//! assert_eq!(tree.unwrap().to_string(), "s(:lit, 42)");
//! ```

use tracing::debug;

use crate::config::{ParserConfig, SourceFile};
use crate::errors::{malformed_node, NormalizeResult};
use crate::frontend::{CommentFrontEnd, RubyGrammar};
use crate::normalizer::Processor;
use crate::raw::Raw;
use crate::sexp::Sexp;

/// A configured normalizer. Holds no per-parse state, so one instance can
/// serve any number of parses.
#[derive(Debug, Clone, Copy, Default)]
pub struct RubyParser {
    config: ParserConfig,
}

impl RubyParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> ParserConfig {
        self.config
    }

    /// Parses Ruby source with `grammar` and normalizes the result. Returns
    /// `None` for a file with no statements.
    pub fn parse(
        &self,
        grammar: &mut dyn RubyGrammar,
        text: &str,
        filename: &str,
        lineno: usize,
    ) -> NormalizeResult<Option<Sexp>> {
        let source = SourceFile::new(text, filename, lineno)?;
        debug!(filename, encoding = %source.encoding, "parse");

        let mut front_end = CommentFrontEnd::new(&source);
        let raw = grammar.drive(&source, &mut front_end)?;
        front_end.finish()?;

        match raw {
            Some(raw) => self.normalize(raw, &source),
            None => Ok(None),
        }
    }

    /// Normalizes a raw tree that was built elsewhere, typically a `program`
    /// node.
    pub fn normalize(&self, raw: Raw, source: &SourceFile) -> NormalizeResult<Option<Sexp>> {
        let mut processor = Processor::new(source, self.config);
        match raw {
            Raw::Node(node) => processor.process_program(node),
            raw if raw.is_absent() => Ok(None),
            other => Err(malformed_node(
                "program",
                format!("expected a node, found {}", other),
            )),
        }
    }
}
