//! Tag → rewrite rule table.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::Processor;
use crate::errors::NormalizeResult;
use crate::raw::RawNode;
use crate::sexp::Sexp;

/// A rewrite rule. It owns the raw node and consumes its children in order.
pub type HandlerFn = fn(&mut Processor, RawNode) -> NormalizeResult<Sexp>;

#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<&'static str, HandlerFn>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tag: &'static str, handler: HandlerFn) {
        self.handlers.insert(tag, handler);
    }

    pub fn get(&self, tag: &str) -> Option<HandlerFn> {
        self.handlers.get(tag).copied()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered tags in sorted order.
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.handlers.keys().copied().collect();
        tags.sort_unstable();
        tags
    }
}

/// The process-wide registry, built on first use and never changed after.
pub static HANDLERS: Lazy<HandlerRegistry> = Lazy::new(|| {
    let mut registry = HandlerRegistry::new();
    crate::handlers::register_all_handlers(&mut registry);
    registry
});
