//! Rill Error Handling
//!
//! A single error type carries everything the rest of the crate needs:
//! what went wrong (`ErrorKind`), where it happened (`SourceInfo`), and how
//! to present it (`DiagnosticInfo`). Rendering goes through `miette` so the
//! CLI can show labeled source snippets for fatal errors.
//!
//! The check runner never matches on error message text. It asks one
//! capability question — [`RillError::is_assertion_failure`] — to decide
//! between FAIL (a correctness check did not hold) and ERROR (an unexpected
//! fault of any other kind).

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use thiserror::Error;

use crate::ast::Span;

// ============================================================================
// SOURCE CONTEXT
// ============================================================================

/// Source text attached to errors for snippet rendering.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Create a source context from real file content. Preferred.
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Fallback for errors with no file behind them (discovery failures,
    /// internal faults).
    pub fn fallback(context: &str) -> Self {
        Self {
            name: "fallback".to_string(),
            content: format!("; {context}"),
        }
    }

    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

// ============================================================================
// ERROR TYPE
// ============================================================================

/// The single error type for every failure mode in the crate.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct RillError {
    pub kind: ErrorKind,
    pub source_info: SourceInfo,
    pub diagnostic_info: DiagnosticInfo,
}

/// What went wrong, with type-specific data. `Display` gives the exact text
/// that the runner prints after `ERROR: <path> -> `.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    // Parse errors
    #[error("Parse error: {message}")]
    Syntax { message: String },
    #[error("Parse error: invalid {literal_type} '{value}'")]
    InvalidLiteral { literal_type: String, value: String },

    // Runtime errors
    #[error("Evaluation error: undefined symbol '{symbol}'")]
    UndefinedSymbol { symbol: String },
    #[error("Evaluation error: first element of a call must be a symbol, found {found}")]
    NotCallable { found: String },
    #[error("Evaluation error: `{operation}` expects {expected} arguments, got {actual}")]
    ArityMismatch {
        operation: String,
        expected: String,
        actual: usize,
    },
    #[error("Type error: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },
    #[error("Evaluation error: division by zero")]
    DivisionByZero,
    #[error("Evaluation error: malformed `{form}` form: {reason}")]
    MalformedForm { form: String, reason: String },
    #[error("Evaluation error: recursion depth limit of {limit} exceeded")]
    RecursionLimit { limit: usize },

    // Check failures
    #[error("Assertion failed: {detail}")]
    AssertionFailure { detail: String },

    // Environment faults
    #[error("I/O error: {message}")]
    Io { message: String },
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Where the error happened.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
}

/// How to present the error.
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

/// Coarse grouping of kinds, used by tests and by the runner's
/// classification step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Parse,
    Runtime,
    Assertion,
    Fault,
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Syntax { .. } | Self::InvalidLiteral { .. } => ErrorCategory::Parse,

            Self::UndefinedSymbol { .. }
            | Self::NotCallable { .. }
            | Self::ArityMismatch { .. }
            | Self::TypeMismatch { .. }
            | Self::DivisionByZero
            | Self::MalformedForm { .. }
            | Self::RecursionLimit { .. } => ErrorCategory::Runtime,

            Self::AssertionFailure { .. } => ErrorCategory::Assertion,

            Self::Io { .. } | Self::Internal { .. } => ErrorCategory::Fault,
        }
    }

    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::Syntax { .. } => "syntax",
            Self::InvalidLiteral { .. } => "invalid_literal",
            Self::UndefinedSymbol { .. } => "undefined_symbol",
            Self::NotCallable { .. } => "not_callable",
            Self::ArityMismatch { .. } => "arity_mismatch",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::DivisionByZero => "division_by_zero",
            Self::MalformedForm { .. } => "malformed_form",
            Self::RecursionLimit { .. } => "recursion_limit",
            Self::AssertionFailure { .. } => "assertion_failure",
            Self::Io { .. } => "io",
            Self::Internal { .. } => "internal",
        }
    }

    fn phase(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Parse => "parse",
            ErrorCategory::Runtime => "eval",
            ErrorCategory::Assertion => "check",
            ErrorCategory::Fault => "fault",
        }
    }
}

impl RillError {
    pub fn new(kind: ErrorKind, source: &SourceContext, span: SourceSpan) -> Self {
        let error_code = format!("rill::{}::{}", kind.phase(), kind.code_suffix());
        Self {
            kind,
            source_info: SourceInfo {
                source: source.to_named_source(),
                primary_span: span,
            },
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code,
            },
        }
    }

    /// Attach a help message shown by miette's report renderer.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.diagnostic_info.help = Some(help.into());
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// True when the raised condition represents a failed correctness check
    /// rather than an unexpected fault.
    pub fn is_assertion_failure(&self) -> bool {
        matches!(self.kind, ErrorKind::AssertionFailure { .. })
    }

    fn primary_label(&self) -> String {
        match &self.kind {
            ErrorKind::Syntax { .. } => "invalid syntax".into(),
            ErrorKind::InvalidLiteral { .. } => "invalid literal".into(),
            ErrorKind::UndefinedSymbol { .. } => "undefined symbol".into(),
            ErrorKind::NotCallable { .. } => "not callable".into(),
            ErrorKind::ArityMismatch { .. } => "arity mismatch".into(),
            ErrorKind::TypeMismatch { .. } => "type mismatch".into(),
            ErrorKind::DivisionByZero => "division by zero".into(),
            ErrorKind::MalformedForm { .. } => "malformed form".into(),
            ErrorKind::RecursionLimit { .. } => "recursion limit exceeded".into(),
            ErrorKind::AssertionFailure { .. } => "assertion failed here".into(),
            ErrorKind::Io { .. } => "i/o failure".into(),
            ErrorKind::Internal { .. } => "internal fault".into(),
        }
    }
}

impl Diagnostic for RillError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.primary_label()),
            self.source_info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source_info.source)
    }
}

// ============================================================================
// SPAN UTILITIES
// ============================================================================

/// Converts an AST span to the miette span format.
pub fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::from(span.start..span.end)
}

/// Placeholder span for errors not tied to a source location, such as I/O
/// failures during discovery. Explicit and searchable.
pub fn unspanned() -> SourceSpan {
    SourceSpan::from(0..0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> SourceContext {
        SourceContext::from_file("check.rill", "(assert false)")
    }

    #[test]
    fn assertion_failures_are_distinguishable() {
        let err = RillError::new(
            ErrorKind::AssertionFailure {
                detail: "false".to_string(),
            },
            &ctx(),
            to_source_span(Span { start: 0, end: 14 }),
        );
        assert!(err.is_assertion_failure());
        assert_eq!(err.category(), ErrorCategory::Assertion);
        assert_eq!(err.to_string(), "Assertion failed: false");
    }

    #[test]
    fn other_kinds_are_not_assertion_failures() {
        let err = RillError::new(
            ErrorKind::UndefinedSymbol {
                symbol: "frobnicate".to_string(),
            },
            &ctx(),
            unspanned(),
        );
        assert!(!err.is_assertion_failure());
        assert_eq!(
            err.to_string(),
            "Evaluation error: undefined symbol 'frobnicate'"
        );
    }

    #[test]
    fn error_codes_follow_phase_and_kind() {
        let err = RillError::new(ErrorKind::DivisionByZero, &ctx(), unspanned());
        assert_eq!(err.diagnostic_info.error_code, "rill::eval::division_by_zero");
    }

    #[test]
    fn reports_render_help_and_labels() {
        let err = RillError::new(
            ErrorKind::Syntax {
                message: "unexpected token".to_string(),
            },
            &ctx(),
            to_source_span(Span { start: 0, end: 1 }),
        )
        .with_help("check for a missing closing parenthesis");
        let report = miette::Report::new(err);
        let rendered = format!("{report:?}");
        assert!(rendered.contains("unexpected token"));
        assert!(rendered.contains("missing closing parenthesis"));
    }
}
