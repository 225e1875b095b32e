//! # Comment front end
//!
//! Sits between a Ruby grammar and the normalizer. The grammar reports every
//! scanner token and every reduction through [`ParserEvents`]; the front end
//! builds the raw tree from them and on the way:
//!
//! - collects comment text and attaches it to the next `class`, `module`,
//!   `def` or singleton class as a `[:comment, text, node]` wrapper,
//! - flattens the `*_new`/`*_add` list-building reductions into plain lists,
//! - tags every `@tstring_content` with the delimiter that opened it,
//! - turns grammar error events into a syntax error.
//!
//! The grammar itself is outside this crate. [`EventScript`] replays a
//! recorded event trace and is enough to drive the front end in tests.

use tracing::trace;

use crate::config::SourceFile;
use crate::errors::{malformed_node, syntax_error, NormalizeError, NormalizeResult};
use crate::raw::{Position, Raw, RawNode};

pub mod script;
pub mod state;

pub use script::{EventScript, Step};
pub use state::{CommentKind, CommentState};

// ============================================================================
// COLLABORATOR CONTRACT
// ============================================================================

/// Receives the callbacks of a Ripper-style grammar.
pub trait ParserEvents {
    /// A scanner token; `kind` is the Ripper token name without `on_`.
    fn on_scanner_event(
        &mut self,
        kind: &str,
        token: &str,
        position: Position,
    ) -> NormalizeResult<Raw>;

    /// A completed reduction with the values of its children.
    fn on_parser_event(&mut self, event: &str, args: Vec<Raw>) -> NormalizeResult<Raw>;
}

/// A Ruby tokenizer and grammar.
pub trait RubyGrammar {
    /// Parses `source`, reporting to `events` in source order, and returns the
    /// value of the final `program` reduction. Line numbers are relative to
    /// the start of `source.text`.
    fn drive(
        &mut self,
        source: &SourceFile,
        events: &mut dyn ParserEvents,
    ) -> NormalizeResult<Option<Raw>>;
}

// ============================================================================
// FRONT END
// ============================================================================

pub struct CommentFrontEnd {
    state: CommentState,
    delimiters: Vec<String>,
    filename: String,
    line_offset: usize,
    last_line: Option<usize>,
}

impl CommentFrontEnd {
    pub fn new(source: &SourceFile) -> Self {
        Self {
            state: CommentState::new(),
            delimiters: Vec::new(),
            filename: source.filename.clone(),
            line_offset: source.line_offset(),
            last_line: None,
        }
    }

    pub fn state(&self) -> &CommentState {
        &self.state
    }

    /// Must be called once the grammar is done.
    pub fn finish(&self) -> NormalizeResult<()> {
        self.state.finish()
    }

    fn syntax(&self, args: Vec<Raw>) -> NormalizeError {
        let message = match args.into_iter().next() {
            Some(Raw::Str(message)) => message,
            Some(other) => other.to_string(),
            None => "syntax error".to_string(),
        };
        let line = self.last_line.map(|line| line + self.line_offset);
        syntax_error(message, self.filename.clone(), line)
    }
}

impl ParserEvents for CommentFrontEnd {
    fn on_scanner_event(
        &mut self,
        kind: &str,
        token: &str,
        position: Position,
    ) -> NormalizeResult<Raw> {
        self.last_line = Some(position.line);
        match kind {
            "comment" | "embdoc_beg" | "embdoc" | "embdoc_end" => self.state.add_comment(token),
            "kw" => self.state.keyword(token),
            "symbeg" => {
                self.state.in_symbol = true;
                if token != ":" {
                    self.delimiters.push(token.to_string());
                }
            }
            "embexpr_beg" => self.state.in_symbol = false,
            "tstring_beg" | "heredoc_beg" | "regexp_beg" | "backtick" | "qwords_beg"
            | "words_beg" | "qsymbols_beg" | "symbols_beg" => {
                self.delimiters.push(token.to_string());
            }
            "tstring_end" | "heredoc_end" | "regexp_end" | "label_end" => {
                self.delimiters.pop();
            }
            _ => {}
        }

        let mut leaf = RawNode::token(kind, token, position);
        if kind == "tstring_content" {
            if let Some(delimiter) = self.delimiters.last() {
                leaf.push(Raw::Str(delimiter.clone()));
            }
        }
        Ok(Raw::Node(leaf))
    }

    fn on_parser_event(&mut self, event: &str, args: Vec<Raw>) -> NormalizeResult<Raw> {
        trace!(event, arity = args.len(), "parser event");
        let node = match event {
            "parse_error" | "class_name_error" | "alias_error" | "assign_error"
            | "param_error" => return Err(self.syntax(args)),

            "stmts_new" | "args_new" | "mlhs_new" | "mrhs_new" | "xstring_new"
            | "regexp_new" => RawNode::list(Vec::new()),
            "qwords_new" | "words_new" | "qsymbols_new" | "symbols_new" | "word_new" => {
                RawNode::new(event.trim_end_matches("_new"), Vec::new())
            }
            "string_content" => RawNode::new("string_content", Vec::new()),

            "stmts_add" | "args_add" | "mlhs_add" | "mrhs_add" | "xstring_add"
            | "regexp_add" | "qwords_add" | "words_add" | "qsymbols_add" | "symbols_add"
            | "word_add" | "string_add" => append(event, args, Some)?,
            "args_add_star" | "mlhs_add_star" | "mrhs_add_star" => {
                append(event, args, |item| Some(star(item)))?
            }
            "args_add_block" => append(event, args, |block| {
                (!block.is_absent())
                    .then(|| Raw::Node(RawNode::new("block_pass", vec![block])))
            })?,
            "mlhs_add_post" => {
                let mut args = args.into_iter();
                let mut list = expect_node(event, args.next())?;
                let post = expect_node(event, args.next())?;
                list.children.extend(post.children);
                list
            }
            "mlhs_paren" => match args.into_iter().next() {
                Some(Raw::Node(list)) if list.is_list() => RawNode::new("mlhs", list.children),
                other => return Ok(other.unwrap_or(Raw::Nil)),
            },
            "mrhs_new_from_args" => {
                let mut args = args.into_iter();
                let mut list = expect_node(event, args.next())?;
                if let Some(last) = args.next().filter(|raw| !raw.is_absent()) {
                    list.push(last);
                }
                list
            }
            "assoclist_from_args" => expect_node(event, args.into_iter().next())?,
            "hash" | "bare_assoc_hash" => {
                let children = match args.into_iter().next() {
                    Some(Raw::Node(list)) if list.is_list() => list.children,
                    Some(raw) if !raw.is_absent() => vec![raw],
                    _ => Vec::new(),
                };
                RawNode::new(event, children)
            }
            "heredoc_dedent" => return Ok(args.into_iter().next().unwrap_or(Raw::Nil)),
            "params" => {
                self.state.in_def_header = false;
                RawNode::new(event, args)
            }
            "symbol" | "dyna_symbol" => {
                self.state.in_symbol = false;
                RawNode::new(event, args)
            }
            "alias" | "var_alias" | "undef" => {
                self.state.in_alias = false;
                RawNode::new(event, args)
            }
            _ => RawNode::new(event, args),
        };

        let Some(kind) = CommentKind::from_event(event) else {
            return Ok(Raw::Node(node));
        };
        let text = self.state.close(kind)?;
        Ok(Raw::Node(RawNode::new(
            "comment",
            vec![Raw::Str(text), Raw::Node(node)],
        )))
    }
}

// ============================================================================
// INTERNAL HELPERS
// ============================================================================

fn expect_node(event: &str, raw: Option<Raw>) -> NormalizeResult<RawNode> {
    match raw {
        Some(Raw::Node(node)) => Ok(node),
        other => Err(malformed_node(
            event,
            format!("expected a list, found {}", other.unwrap_or(Raw::Nil)),
        )),
    }
}

/// Pushes the (optionally transformed) second argument onto the first.
fn append(
    event: &str,
    args: Vec<Raw>,
    transform: impl FnOnce(Raw) -> Option<Raw>,
) -> NormalizeResult<RawNode> {
    let mut args = args.into_iter();
    let mut list = expect_node(event, args.next())?;
    if let Some(item) = transform(args.next().unwrap_or(Raw::Nil)) {
        list.push(item);
    }
    Ok(list)
}

fn star(item: Raw) -> Raw {
    Raw::Node(RawNode::new("star", vec![item]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn front_end() -> CommentFrontEnd {
        CommentFrontEnd::new(&SourceFile::named("test.rb"))
    }

    fn list(front: &mut CommentFrontEnd, event: &str, items: Vec<Raw>) -> Raw {
        let mut acc = front.on_parser_event(&format!("{}_new", event), vec![]).unwrap();
        for item in items {
            acc = front
                .on_parser_event(&format!("{}_add", event), vec![acc, item])
                .unwrap();
        }
        acc
    }

    #[test]
    fn flattens_list_events() {
        let mut front = front_end();
        let a = front.on_scanner_event("int", "1", Position::new(1, 0)).unwrap();
        let b = front.on_scanner_event("int", "2", Position::new(1, 3)).unwrap();
        let args = list(&mut front, "args", vec![a, b]);
        let splat = front.on_scanner_event("ident", "c", Position::new(1, 7)).unwrap();
        let args = front.on_parser_event("args_add_star", vec![args, splat]).unwrap();
        let args = front
            .on_parser_event("args_add_block", vec![args, Raw::Bool(false)])
            .unwrap();
        assert_eq!(
            args.to_string(),
            r#"[[:@int, "1", [1, 0]], [:@int, "2", [1, 3]], [:star, [:@ident, "c", [1, 7]]]]"#
        );
    }

    #[test]
    fn tags_string_content_with_open_delimiter() {
        let mut front = front_end();
        front.on_scanner_event("tstring_beg", "'", Position::new(1, 0)).unwrap();
        let content = front
            .on_scanner_event("tstring_content", "a", Position::new(1, 1))
            .unwrap();
        front.on_scanner_event("tstring_end", "'", Position::new(1, 2)).unwrap();
        let after = front
            .on_scanner_event("tstring_content", "b", Position::new(2, 0))
            .unwrap();
        assert_eq!(content.to_string(), r#"[:@tstring_content, "a", [1, 1], "'"]"#);
        assert_eq!(after.to_string(), r#"[:@tstring_content, "b", [2, 0]]"#);
    }

    #[test]
    fn wraps_definitions_in_comment_nodes() {
        let mut front = front_end();
        front.on_scanner_event("comment", "# Foo\n", Position::new(1, 0)).unwrap();
        front.on_scanner_event("kw", "def", Position::new(2, 0)).unwrap();
        let name = front.on_scanner_event("ident", "foo", Position::new(2, 4)).unwrap();
        let params = front.on_parser_event("params", vec![Raw::Nil; 7]).unwrap();
        let def = front
            .on_parser_event("def", vec![name, params, Raw::Nil])
            .unwrap();
        let node = def.as_node().unwrap();
        assert_eq!(node.tag, "comment");
        assert_eq!(node.children[0], Raw::Str("# Foo\n".into()));
        assert!(front.finish().is_ok());
    }

    #[test]
    fn undef_of_keyword_names_leaves_no_frame() {
        let mut front = front_end();
        front.on_scanner_event("kw", "undef", Position::new(1, 0)).unwrap();
        let target = front.on_scanner_event("kw", "module", Position::new(1, 6)).unwrap();
        let target = front.on_parser_event("symbol_literal", vec![target]).unwrap();
        front
            .on_parser_event("undef", vec![Raw::Node(RawNode::list(vec![target]))])
            .unwrap();
        assert!(front.finish().is_ok());

        front.on_scanner_event("kw", "class", Position::new(2, 0)).unwrap();
        assert!(front.finish().is_err());
    }

    #[test]
    fn grammar_errors_become_syntax_errors() {
        let mut front = front_end();
        front.on_scanner_event("ident", "foo", Position::new(3, 0)).unwrap();
        let error = front
            .on_parser_event("parse_error", vec![Raw::Str("unexpected end-of-input".into())])
            .unwrap_err();
        assert_eq!(error.to_string(), "test.rb:3: unexpected end-of-input");
    }

    #[test]
    fn hash_splices_assoc_list() {
        let mut front = front_end();
        let assoc = Raw::Node(RawNode::new("assoc_new", vec![Raw::Nil, Raw::Nil]));
        let assocs = front
            .on_parser_event("assoclist_from_args", vec![Raw::Node(RawNode::list(vec![assoc]))])
            .unwrap();
        let hash = front.on_parser_event("hash", vec![assocs]).unwrap();
        assert_eq!(hash.to_string(), "[:hash, [:assoc_new, nil, nil]]");
        let empty = front.on_parser_event("hash", vec![Raw::Nil]).unwrap();
        assert_eq!(empty.to_string(), "[:hash]");
    }
}
