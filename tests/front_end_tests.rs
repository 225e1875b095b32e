// tests/front_end_tests.rs

mod common;

use ruby_canon::frontend::EventScript;
use ruby_canon::sexp::SourceEncoding;
use ruby_canon::{ErrorCategory, NormalizeResult, Raw, RubyParser, Sexp, SourceFile};

fn parse(script: EventScript) -> NormalizeResult<Option<Sexp>> {
    parse_from(script, 1)
}

fn parse_from(mut script: EventScript, lineno: usize) -> NormalizeResult<Option<Sexp>> {
    RubyParser::default().parse(&mut script, "", "test.rb", lineno)
}

/// `def name; end` at `line`, without the statement-list reductions around
/// it.
fn empty_def(script: EventScript, name: &str, line: usize) -> EventScript {
    script
        .skip("kw", "def", line, 0)
        .scan("ident", name, line, 4)
        .nil()
        .nil()
        .nil()
        .nil()
        .nil()
        .nil()
        .nil()
        .reduce("params", 7)
        .reduce("stmts_new", 0)
        .reduce("void_stmt", 0)
        .reduce("stmts_add", 2)
        .nil()
        .nil()
        .nil()
        .reduce("bodystmt", 4)
        .skip("kw", "end", line + 1, 0)
        .reduce("def", 3)
}

// ---
// Comments
// ---

#[test]
fn comment_attaches_to_the_following_method_only() {
    let script = EventScript::new()
        .reduce("stmts_new", 0)
        .skip("comment", "# Foo\n", 1, 0);
    let script = empty_def(script, "foo", 2).reduce("stmts_add", 2);
    let script = empty_def(script, "bar", 5)
        .reduce("stmts_add", 2)
        .reduce("program", 1);

    let tree = parse(script).unwrap().unwrap();
    assert_eq!(
        tree.to_string(),
        "s(:block, s(:defn, :foo, s(:args), s(:nil)), s(:defn, :bar, s(:args), s(:nil)))"
    );
    assert_eq!(tree.node(0).unwrap().comments.as_deref(), Some("# Foo\n"));
    assert_eq!(tree.node(1).unwrap().comments.as_deref(), Some(""));
}

#[test]
fn comments_inside_a_class_belong_to_the_inner_method() {
    let script = EventScript::new()
        .reduce("stmts_new", 0)
        .skip("comment", "# Outer\n", 1, 0)
        .skip("kw", "class", 2, 0)
        .scan("const", "A", 2, 6)
        .reduce("const_ref", 1)
        .nil()
        .reduce("stmts_new", 0)
        .skip("comment", "# Inner\n", 3, 2);
    let script = empty_def(script, "b", 4)
        .reduce("stmts_add", 2)
        .nil()
        .nil()
        .nil()
        .reduce("bodystmt", 4)
        .skip("kw", "end", 6, 0)
        .reduce("class", 3)
        .reduce("stmts_add", 2)
        .reduce("program", 1);

    let tree = parse(script).unwrap().unwrap();
    assert_eq!(tree.to_string(), "s(:class, :A, nil, s(:defn, :b, s(:args), s(:nil)))");
    assert_eq!(tree.comments.as_deref(), Some("# Outer\n"));
    assert_eq!(tree.node(2).unwrap().comments.as_deref(), Some("# Inner\n"));
}

#[test]
fn keyword_method_names_do_not_open_frames() {
    let script = EventScript::new()
        .reduce("stmts_new", 0)
        .skip("kw", "def", 1, 0)
        .scan("kw", "class", 1, 4)
        .nil()
        .nil()
        .nil()
        .nil()
        .nil()
        .nil()
        .nil()
        .reduce("params", 7)
        .reduce("stmts_new", 0)
        .reduce("void_stmt", 0)
        .reduce("stmts_add", 2)
        .nil()
        .nil()
        .nil()
        .reduce("bodystmt", 4)
        .skip("kw", "end", 2, 0)
        .reduce("def", 3)
        .reduce("stmts_add", 2)
        .reduce("program", 1);

    let tree = parse(script).unwrap().unwrap();
    assert_eq!(tree.to_string(), "s(:defn, :class, s(:args), s(:nil))");
}

#[test]
fn keyword_symbols_do_not_open_frames() {
    let script = EventScript::new()
        .reduce("stmts_new", 0)
        .skip("symbeg", ":", 1, 0)
        .scan("kw", "def", 1, 1)
        .reduce("symbol", 1)
        .reduce("symbol_literal", 1)
        .reduce("stmts_add", 2)
        .reduce("program", 1);

    let tree = parse(script).unwrap().unwrap();
    assert_eq!(tree.to_string(), "s(:lit, :def)");
}

#[test]
fn alias_of_keyword_names_does_not_open_frames() {
    let script = EventScript::new()
        .reduce("stmts_new", 0)
        .skip("kw", "alias", 1, 0)
        .scan("ident", "new_class", 1, 6)
        .reduce("symbol_literal", 1)
        .scan("kw", "class", 1, 16)
        .reduce("symbol_literal", 1)
        .reduce("alias", 2)
        .reduce("stmts_add", 2);
    let script = empty_def(script, "foo", 2)
        .reduce("stmts_add", 2)
        .reduce("program", 1);

    let tree = parse(script).unwrap().unwrap();
    assert_eq!(
        tree.to_string(),
        "s(:block, s(:alias, s(:lit, :new_class), s(:lit, :class)), s(:defn, :foo, s(:args), s(:nil)))"
    );
}

// ---
// Errors
// ---

#[test]
fn parse_error_reports_the_last_token_line() {
    let script = EventScript::new()
        .scan("ident", "foo", 3, 0)
        .push(Raw::Str("unexpected end-of-input".to_string()))
        .reduce("parse_error", 1);

    let error = parse(script).unwrap_err();
    assert!(error.is_syntax_error());
    assert_eq!(error.to_string(), "test.rb:3: unexpected end-of-input");
}

#[test]
fn parse_error_line_honours_starting_line() {
    let script = EventScript::new()
        .scan("ident", "foo", 3, 0)
        .push(Raw::Str("unexpected end-of-input".to_string()))
        .reduce("parse_error", 1);

    let error = parse_from(script, 10).unwrap_err();
    assert_eq!(error.to_string(), "test.rb:12: unexpected end-of-input");
}

#[test]
fn unclosed_definition_is_an_internal_error() {
    let script = EventScript::new()
        .skip("kw", "class", 1, 0)
        .reduce("stmts_new", 0)
        .reduce("program", 1);

    let error = parse(script).unwrap_err();
    assert_eq!(error.category(), ErrorCategory::Internal);
    assert!(error.to_string().contains("left open"));
}

#[test]
fn unknown_events_are_unsupported() {
    let script = EventScript::new()
        .reduce("stmts_new", 0)
        .reduce("frobnicate", 0)
        .reduce("stmts_add", 2)
        .reduce("program", 1);

    let error = parse(script).unwrap_err();
    assert_eq!(error.category(), ErrorCategory::Internal);
    assert!(error.to_string().starts_with("unsupported construct `frobnicate`"));
}

// ---
// Whole programs
// ---

#[test]
fn empty_program_is_nil() {
    let script = EventScript::new().reduce("stmts_new", 0).reduce("program", 1);
    assert_eq!(parse(script).unwrap(), None);
}

#[test]
fn interpolated_string() {
    let script = EventScript::new()
        .reduce("stmts_new", 0)
        .skip("tstring_beg", "\"", 1, 0)
        .reduce("string_content", 0)
        .scan("tstring_content", "a", 1, 1)
        .reduce("string_add", 2)
        .skip("embexpr_beg", "#{", 1, 2)
        .reduce("stmts_new", 0)
        .scan("ident", "b", 1, 4)
        .reduce("vcall", 1)
        .reduce("stmts_add", 2)
        .skip("embexpr_end", "}", 1, 5)
        .reduce("string_embexpr", 1)
        .reduce("string_add", 2)
        .skip("tstring_end", "\"", 1, 6)
        .reduce("string_literal", 1)
        .reduce("stmts_add", 2)
        .reduce("program", 1);

    let tree = parse(script).unwrap().unwrap();
    assert_eq!(tree.to_string(), r#"s(:dstr, "a", s(:evstr, s(:call, nil, :b)))"#);
}

#[test]
fn single_quoted_text_keeps_backslash_n() {
    let script = EventScript::new()
        .reduce("stmts_new", 0)
        .skip("tstring_beg", "'", 1, 0)
        .reduce("string_content", 0)
        .scan("tstring_content", "a\\n", 1, 1)
        .reduce("string_add", 2)
        .skip("tstring_end", "'", 1, 4)
        .reduce("string_literal", 1)
        .reduce("stmts_add", 2)
        .reduce("program", 1);

    let tree = parse(script).unwrap().unwrap();
    assert_eq!(tree.to_string(), r#"s(:str, "a\\n")"#);
}

#[test]
fn squiggly_heredoc_is_dedented() {
    let script = EventScript::new()
        .reduce("stmts_new", 0)
        .skip("heredoc_beg", "<<~EOS", 1, 0)
        .reduce("string_content", 0)
        .scan("tstring_content", "  x\n", 2, 0)
        .reduce("string_add", 2)
        .skip("heredoc_end", "EOS\n", 3, 0)
        .push(Raw::Int(2))
        .reduce("heredoc_dedent", 2)
        .reduce("string_literal", 1)
        .reduce("stmts_add", 2)
        .reduce("program", 1);

    let tree = parse(script).unwrap().unwrap();
    assert_eq!(tree.to_string(), r#"s(:str, "x\n")"#);
}

#[test]
fn call_with_block_argument() {
    let script = EventScript::new()
        .reduce("stmts_new", 0)
        .scan("ident", "foo", 1, 0)
        .reduce("fcall", 1)
        .reduce("args_new", 0)
        .scan("int", "1", 1, 4)
        .reduce("args_add", 2)
        .scan("ident", "b", 1, 8)
        .reduce("vcall", 1)
        .reduce("args_add_block", 2)
        .reduce("arg_paren", 1)
        .reduce("method_add_arg", 2)
        .reduce("stmts_add", 2)
        .reduce("program", 1);

    let tree = parse(script).unwrap().unwrap();
    assert_eq!(
        tree.to_string(),
        "s(:call, nil, :foo, s(:lit, 1), s(:block_pass, s(:call, nil, :b)))"
    );
}

// ---
// Source files
// ---

#[test]
fn magic_comment_selects_the_encoding() {
    let source = SourceFile::new("# encoding: ascii-8bit\nx\n", "t.rb", 1).unwrap();
    assert_eq!(source.encoding, SourceEncoding::Binary);

    let source = SourceFile::new("#!/usr/bin/env ruby\n# -*- coding: utf-8 -*-\n", "t.rb", 1).unwrap();
    assert_eq!(source.encoding, SourceEncoding::Utf8);

    let source = SourceFile::new("x = 1\n", "t.rb", 1).unwrap();
    assert_eq!(source.encoding, SourceEncoding::Utf8);
}
