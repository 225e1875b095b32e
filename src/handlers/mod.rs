//! # Node handlers
//!
//! One rewrite rule per raw tag, grouped by construct family. Each family
//! exposes a `register_*_handlers` function; [`register_all_handlers`] is the
//! only place the registry is filled.
//!
//! ## Families
//!
//! - [`assignment`]: single, multiple and operator assignment
//! - [`blocks`]: statement sequences, blocks, lambdas, `BEGIN`/`END`
//! - [`conditionals`]: `if`/`unless`/ternary/postfix forms and `case`
//! - [`exceptions`]: `begin`/`rescue`/`ensure`
//! - [`literals`]: numbers, strings, symbols, regexps, arrays, hashes, ranges
//! - [`loops`]: `while`/`until`/`for`
//! - [`method_calls`]: calls, `super`, `yield` and jumps
//! - [`methods`]: definitions, parameters, `alias`/`undef`, comments
//! - [`operators`]: binary and unary operators, `defined?`

use crate::normalizer::HandlerRegistry;

pub mod assignment;
pub mod blocks;
pub mod conditionals;
pub mod exceptions;
pub mod helpers;
pub mod literals;
pub mod loops;
pub mod method_calls;
pub mod methods;
pub mod operators;

/// Registers every rewrite rule.
pub fn register_all_handlers(registry: &mut HandlerRegistry) {
    assignment::register_assignment_handlers(registry);
    blocks::register_block_handlers(registry);
    conditionals::register_conditional_handlers(registry);
    exceptions::register_exception_handlers(registry);
    literals::register_literal_handlers(registry);
    loops::register_loop_handlers(registry);
    method_calls::register_call_handlers(registry);
    methods::register_method_handlers(registry);
    operators::register_operator_handlers(registry);
}
