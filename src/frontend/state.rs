//! Per-parse comment bookkeeping.

use tracing::debug;

use crate::errors::{invariant_violation, NormalizeResult};

/// Construct kinds that collect the comments written before them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Class,
    Module,
    Def,
}

impl CommentKind {
    /// The kind opened by a keyword token, if any.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "class" => Some(CommentKind::Class),
            "module" => Some(CommentKind::Module),
            "def" => Some(CommentKind::Def),
            _ => None,
        }
    }

    /// The kind closed by a completed parser event, if any.
    pub fn from_event(event: &str) -> Option<Self> {
        match event {
            "class" | "sclass" => Some(CommentKind::Class),
            "module" => Some(CommentKind::Module),
            "def" | "defs" => Some(CommentKind::Def),
            _ => None,
        }
    }
}

/// Pending comment text, the stack of open definitions and the flags that
/// decide whether a keyword opens one.
#[derive(Debug, Default)]
pub struct CommentState {
    pending: String,
    stack: Vec<(CommentKind, String)>,
    /// Between a symbol opener and the end of that symbol.
    pub in_symbol: bool,
    /// Between `def` and its parameter list, where keywords are method names.
    pub in_def_header: bool,
    /// Between `alias` or `undef` and the end of that statement, where
    /// keywords are method names.
    pub in_alias: bool,
}

impl CommentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_comment(&mut self, text: &str) {
        self.pending.push_str(text);
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Handles a keyword token. Opens a frame for `class`, `module` and
    /// `def` unless the keyword is part of a symbol or a method name.
    pub fn keyword(&mut self, keyword: &str) {
        if matches!(keyword, "alias" | "undef") && !self.in_symbol && !self.in_def_header {
            self.in_alias = true;
            return;
        }
        let Some(kind) = CommentKind::from_keyword(keyword) else {
            return;
        };
        if self.in_symbol || self.in_def_header || self.in_alias {
            return;
        }
        let text = std::mem::take(&mut self.pending);
        debug!(?kind, depth = self.stack.len(), "comment frame opened");
        self.stack.push((kind, text));
        if kind == CommentKind::Def {
            self.in_def_header = true;
        }
    }

    /// Closes the innermost frame, which must be of `kind`.
    pub fn close(&mut self, kind: CommentKind) -> NormalizeResult<String> {
        let Some((open, text)) = self.stack.pop() else {
            return Err(invariant_violation(format!(
                "{:?} completed with no open definition",
                kind
            )));
        };
        if open != kind {
            return Err(invariant_violation(format!(
                "{:?} completed while {:?} was open",
                kind, open
            )));
        }
        debug!(?kind, depth = self.stack.len(), "comment frame closed");
        Ok(text)
    }

    /// Checks that every opened frame was closed.
    pub fn finish(&self) -> NormalizeResult<()> {
        match self.stack.last() {
            None => Ok(()),
            Some((kind, _)) => Err(invariant_violation(format!(
                "{} definition frame(s) left open at end of input, innermost {:?}",
                self.stack.len(),
                kind
            ))),
        }
    }
}
