//! ruby-canon error handling.
//!
//! Every failure aborts the whole parse call and surfaces as one
//! [`NormalizeError`]. Nothing is retried or partially recovered.
//!
//! Construct errors through the helper functions at the bottom of this module
//! rather than building variants inline.

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// The single error type returned by parsing and normalization.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum NormalizeError {
    /// Malformed Ruby input reported by the front end.
    #[error("{filename}:{}: {message}", .line.map_or_else(|| "?".to_string(), |l| l.to_string()))]
    #[diagnostic(code(ruby_canon::syntax))]
    Syntax {
        message: String,
        filename: String,
        line: Option<usize>,
    },

    /// The normalizer met a raw construct it has no rule for, or a raw node
    /// whose children do not have the expected shape.
    #[error("unsupported construct `{construct}`{}", .detail.as_ref().map(|d| format!(": {}", d)).unwrap_or_default())]
    #[diagnostic(
        code(ruby_canon::unsupported),
        help("this is a coverage gap in the normalizer, not a problem with the Ruby source")
    )]
    UnsupportedNode {
        construct: String,
        detail: Option<String>,
    },

    /// Comment-stack discipline was broken by the event stream.
    #[error("comment stack violation: {message}")]
    #[diagnostic(code(ruby_canon::invariant))]
    InvariantViolation { message: String },
}

/// Coarse classification used by tests and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The input is not valid Ruby.
    Syntax,
    /// A defect in the normalizer or its collaborator.
    Internal,
}

/// Result alias used throughout the crate.
pub type NormalizeResult<T> = Result<T, NormalizeError>;

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl NormalizeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            NormalizeError::Syntax { .. } => ErrorCategory::Syntax,
            NormalizeError::UnsupportedNode { .. } | NormalizeError::InvariantViolation { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn is_syntax_error(&self) -> bool {
        self.category() == ErrorCategory::Syntax
    }
}

// ============================================================================
// ERROR CONSTRUCTION HELPERS
// ============================================================================

/// Constructs a syntax error (malformed Ruby input).
///
/// # Example
/// ```rust
/// use ruby_canon::errors::syntax_error;
/// let error = syntax_error("syntax error, unexpected end-of-input", "(string)", Some(1));
/// assert!(error.is_syntax_error());
/// ```
pub fn syntax_error(
    message: impl Into<String>,
    filename: impl Into<String>,
    line: Option<usize>,
) -> NormalizeError {
    NormalizeError::Syntax {
        message: message.into(),
        filename: filename.into(),
        line,
    }
}

/// Constructs the error for a raw tag with no registered rule.
pub fn unsupported_node(construct: impl Into<String>) -> NormalizeError {
    NormalizeError::UnsupportedNode {
        construct: construct.into(),
        detail: None,
    }
}

/// Constructs the error for a raw node whose children have an unexpected shape.
pub fn malformed_node(construct: impl Into<String>, detail: impl Into<String>) -> NormalizeError {
    NormalizeError::UnsupportedNode {
        construct: construct.into(),
        detail: Some(detail.into()),
    }
}

/// Constructs a comment-stack invariant violation.
pub fn invariant_violation(message: impl Into<String>) -> NormalizeError {
    NormalizeError::InvariantViolation {
        message: message.into(),
    }
}
