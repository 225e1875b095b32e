//! # ruby-canon test helpers
//!
//! Normalizes raw dumps written in Ruby-inspect notation and loads `.case`
//! fixture files. A fixture file holds any number of cases:
//!
//! ```text
//! === local assignment
//! [:program, [[:assign, [:var_field, [:@ident, "a", [1, 0]]], [:@int, "1", [1, 4]]]]]
//! ---
//! s(:lasgn, :a, s(:lit, 1))
//! ```
//!
//! A `--- lines` separator compares the line-annotated rendering instead.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use ruby_canon::raw::reader::read_dump;
use ruby_canon::{NormalizeResult, ParserConfig, RubyParser, Sexp, SourceFile};

pub const FIXTURE_EXTENSION: &str = "case";

/// Normalizes `dump` with an explicit configuration and source.
pub fn normalize_with(
    dump: &str,
    config: ParserConfig,
    source: &SourceFile,
) -> NormalizeResult<Option<Sexp>> {
    let raw = read_dump(dump, "test")?;
    RubyParser::new(config).normalize(raw, source)
}

pub fn try_normalize(dump: &str) -> NormalizeResult<Option<Sexp>> {
    normalize_with(dump, ParserConfig::default(), &SourceFile::named("(string)"))
}

/// Normalizes `dump` with the default configuration; panics on failure.
pub fn normalize(dump: &str) -> Option<Sexp> {
    match try_normalize(dump) {
        Ok(tree) => tree,
        Err(error) => panic!("normalization failed: {error}\n  dump: {dump}"),
    }
}

/// The canonical rendering, `nil` for an empty program.
pub fn canon(dump: &str) -> String {
    render(normalize(dump).as_ref(), false)
}

/// The canonical rendering with `@line` annotations.
pub fn canon_lines(dump: &str) -> String {
    render(normalize(dump).as_ref(), true)
}

pub fn render(tree: Option<&Sexp>, with_lines: bool) -> String {
    match tree {
        Some(tree) if with_lines => tree.to_string_with_lines(),
        Some(tree) => tree.to_string(),
        None => "nil".to_string(),
    }
}

/// Wraps single statements in a `program` node.
pub fn program(statements: &[&str]) -> String {
    format!("[:program, [{}]]", statements.join(", "))
}

// ============================================================================
// FIXTURES
// ============================================================================

/// One case from a `.case` file.
#[derive(Debug, Clone)]
pub struct Case {
    pub file: PathBuf,
    pub name: String,
    pub dump: String,
    pub expected: String,
    pub with_lines: bool,
}

/// Loads every case below `dir`, in file-name order.
pub fn load_cases(dir: &Path) -> Result<Vec<Case>, String> {
    let mut cases = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| format!("cannot walk {}: {e}", dir.display()))?;
        let is_case = entry
            .path()
            .extension()
            .is_some_and(|ext| ext == FIXTURE_EXTENSION);
        if !entry.file_type().is_file() || !is_case {
            continue;
        }
        let text = std::fs::read_to_string(entry.path())
            .map_err(|e| format!("cannot read {}: {e}", entry.path().display()))?;
        cases.extend(parse_cases(entry.path(), &text)?);
    }
    Ok(cases)
}

fn parse_cases(file: &Path, text: &str) -> Result<Vec<Case>, String> {
    let mut cases = Vec::new();
    let mut current: Option<(String, Vec<&str>, Option<(bool, Vec<&str>)>)> = None;

    for line in text.lines() {
        if let Some(name) = line.strip_prefix("=== ") {
            if let Some(case) = current.take() {
                cases.push(finish_case(file, case)?);
            }
            current = Some((name.trim().to_string(), Vec::new(), None));
            continue;
        }
        let Some((_, dump, expected)) = current.as_mut() else {
            continue;
        };
        match (line.trim_end(), expected.as_mut()) {
            ("---", None) => *expected = Some((false, Vec::new())),
            ("--- lines", None) => *expected = Some((true, Vec::new())),
            (_, Some((_, lines))) => lines.push(line),
            (_, None) => dump.push(line),
        }
    }
    if let Some(case) = current.take() {
        cases.push(finish_case(file, case)?);
    }
    Ok(cases)
}

fn finish_case(
    file: &Path,
    (name, dump, expected): (String, Vec<&str>, Option<(bool, Vec<&str>)>),
) -> Result<Case, String> {
    let Some((with_lines, expected)) = expected else {
        return Err(format!("{}: case `{}` has no expectation", file.display(), name));
    };
    Ok(Case {
        file: file.to_path_buf(),
        name,
        dump: dump.join("\n"),
        expected: expected.join("\n").trim().to_string(),
        with_lines,
    })
}
