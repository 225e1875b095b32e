//! # ruby-canon
//!
//! Normalizes Ripper-style Ruby parse trees into canonical s-expressions in
//! the RubyParser schema.
//!
//! ## Pipeline
//!
//! 1. A [`frontend::RubyGrammar`] reports tokens and reductions to the
//!    [`frontend::CommentFrontEnd`], which builds the raw tree and attaches
//!    comments to definitions.
//! 2. The [`normalizer::Processor`] walks the raw tree and dispatches each
//!    node to its rule in [`handlers`].
//! 3. [`position`] settles line numbers on the finished tree.
//!
//! [`RubyParser`] runs the whole pipeline. Raw trees captured elsewhere can
//! be read with [`raw::reader`] and passed to [`RubyParser::normalize`].

pub mod cli;
pub mod config;
pub mod errors;
pub mod frontend;
pub mod handlers;
pub mod literal;
pub mod normalizer;
pub mod parser;
pub mod position;
pub mod raw;
pub mod sexp;

pub use config::{ParserConfig, SourceFile};
pub use errors::{ErrorCategory, NormalizeError, NormalizeResult};
pub use parser::RubyParser;
pub use raw::{Raw, RawNode};
pub use sexp::{Item, Sexp};
