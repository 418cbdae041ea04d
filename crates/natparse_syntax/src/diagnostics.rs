//! Diagnostics and error reporting.
//!
//! Problems in user source are never Rust errors: every pass records [`Diagnostic`] values and keeps going, so callers
//! always get a tree plus a list of findings.

use std::fmt;

use crate::ast::Span;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Stable classification of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    LexError,
    SyntaxError,
    TypeMismatch,
    ReferenceNotMutable,
    UnresolvedReference,
    RedefinitionTooLarge,
}

impl DiagnosticKind {
    /// Stable identifier, used in JSON output.
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::LexError => "LexError",
            DiagnosticKind::SyntaxError => "SyntaxError",
            DiagnosticKind::TypeMismatch => "TypeMismatch",
            DiagnosticKind::ReferenceNotMutable => "ReferenceNotMutable",
            DiagnosticKind::UnresolvedReference => "UnresolvedReference",
            DiagnosticKind::RedefinitionTooLarge => "RedefinitionTooLarge",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::LexError => write!(f, "lex error"),
            DiagnosticKind::SyntaxError => write!(f, "syntax error"),
            DiagnosticKind::TypeMismatch => write!(f, "type mismatch"),
            DiagnosticKind::ReferenceNotMutable => write!(f, "reference not mutable"),
            DiagnosticKind::UnresolvedReference => write!(f, "unresolved reference"),
            DiagnosticKind::RedefinitionTooLarge => write!(f, "redefinition too large"),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Structured context carried by semantic diagnostics, so consumers don't have to parse messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticDetail {
    /// Operand shape/format did not match its position.
    OperandDefinition { allowed: String },
    /// Two inferred types were incompatible.
    Types { expected: String, found: String },
    /// REDEFINE members exceed the redefined variable.
    RedefinitionSize { available: u64, required: u64 },
}

/// A finding in one module's source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Span,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
    pub detail: Option<DiagnosticDetail>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            message: message.into(),
            span,
            notes: Vec::new(),
            hints: Vec::new(),
            detail: None,
        }
    }

    pub fn lex(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::LexError, message, span)
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::SyntaxError, message, span)
    }

    pub fn type_mismatch(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::TypeMismatch, message, span)
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn with_detail(mut self, detail: DiagnosticDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Build a `miette` report with the source attached, for graphical rendering.
    pub fn to_report(&self, file_name: &str, source: &str) -> miette::Report {
        let severity = match self.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
            Severity::Info => miette::Severity::Advice,
        };
        let mut help: Vec<String> = self.notes.iter().map(|n| format!("note: {n}")).collect();
        help.extend(self.hints.iter().cloned());

        let report = if help.is_empty() {
            miette::miette!(
                severity = severity,
                code = self.kind.code(),
                labels = vec![miette::LabeledSpan::at(self.span, "here")],
                "{}",
                self.message
            )
        } else {
            miette::miette!(
                severity = severity,
                code = self.kind.code(),
                help = help.join("\n"),
                labels = vec![miette::LabeledSpan::at(self.span, "here")],
                "{}",
                self.message
            )
        };
        report.with_source_code(miette::NamedSource::new(file_name, source.to_string()))
    }
}

/// One-line rendering: `file:line:col: severity[Kind]: message`, followed by notes and hints.
pub fn format_error(file_name: &str, source: &str, diagnostic: &Diagnostic) -> String {
    let (line, col, _) = get_line_info(source, diagnostic.span.start);
    let mut out = format!(
        "{file_name}:{line}:{col}: {}[{}]: {}",
        diagnostic.severity,
        diagnostic.kind.code(),
        diagnostic.message
    );
    for note in &diagnostic.notes {
        out.push_str(&format!("\n  = note: {note}"));
    }
    for hint in &diagnostic.hints {
        out.push_str(&format!("\n  = hint: {hint}"));
    }
    out
}

/// Get line number, column number, and line text for a byte offset.
pub fn get_line_info(source: &str, offset: usize) -> (usize, usize, &str) {
    let offset = offset.min(source.len());
    let mut line_num = 1;
    let mut line_start = 0;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line_num += 1;
            line_start = i + 1;
        }
    }

    let line_end = source[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(source.len());

    let line_text = source[line_start..line_end].trim_end_matches('\r');
    let col_num = offset - line_start + 1;

    (line_num, col_num, line_text)
}

// ============================================================================
// Error catalog
// ============================================================================

/// Recurring diagnostics, built in one place so their messages stay stable.
pub mod errors {
    use super::*;

    pub fn unexpected_character(c: char, span: Span) -> Diagnostic {
        Diagnostic::lex(format!("Unexpected character '{c}'"), span)
    }

    pub fn unknown_system_variable(spelling: &str, span: Span) -> Diagnostic {
        Diagnostic::lex(format!("Unknown system variable or function {spelling}"), span)
    }

    pub fn unterminated_string(span: Span) -> Diagnostic {
        Diagnostic::lex("Unterminated string literal", span).with_hint("Close the literal on the same line")
    }

    pub fn expected(what: &str, found: &str, span: Span) -> Diagnostic {
        Diagnostic::syntax(format!("{what}, found {found}"), span)
    }

    pub fn missing_none_branch(span: Span) -> Diagnostic {
        Diagnostic::syntax("DECIDE requires a NONE branch", span).with_hint("Add NONE IGNORE if nothing should happen")
    }

    pub fn invalid_type(text: &str, reason: &str, span: Span) -> Diagnostic {
        Diagnostic::syntax(format!("Invalid type specification ({text}): {reason}"), span)
    }

    pub fn constant_without_value(name: &str, span: Span) -> Diagnostic {
        Diagnostic::syntax(format!("Constant {name} must be initialized with CONST <...>"), span)
    }

    pub fn redefine_without_target(name: &str, span: Span) -> Diagnostic {
        Diagnostic::new(
            DiagnosticKind::UnresolvedReference,
            format!("REDEFINE target {name} is not declared on this level"),
            span,
        )
    }

    pub fn missing_function_argument(name: &str, param: &str, span: Span) -> Diagnostic {
        Diagnostic::syntax(format!("{name} requires the parameter {param}"), span)
    }

    pub fn too_many_function_arguments(name: &str, max: usize, span: Span) -> Diagnostic {
        Diagnostic::syntax(format!("{name} takes at most {max} parameter(s)"), span)
    }

    pub fn unresolved_variable(name: &str, span: Span) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::UnresolvedReference, format!("Unresolved reference: {name}"), span)
            .with_severity(Severity::Warning)
    }

    pub fn unresolved_module(name: &str, span: Span) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::UnresolvedReference, format!("Unresolved module: {name}"), span)
            .with_severity(Severity::Warning)
    }

    pub fn unresolved_subroutine(name: &str, span: Span) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::UnresolvedReference, format!("Unresolved subroutine: {name}"), span)
            .with_severity(Severity::Warning)
    }

    pub fn format_not_allowed(format: &str, allowed: &str, span: Span) -> Diagnostic {
        Diagnostic::type_mismatch(format!("Operand can't be of format {format}. Allowed formats: {allowed}"), span)
            .with_detail(DiagnosticDetail::OperandDefinition {
                allowed: allowed.to_string(),
            })
    }

    pub fn scalar_not_allowed(structures: &str, span: Span) -> Diagnostic {
        shape(DiagnosticKind::TypeMismatch, "a scalar value", structures, span)
    }

    pub fn array_not_allowed(structures: &str, span: Span) -> Diagnostic {
        shape(DiagnosticKind::TypeMismatch, "an array", structures, span)
    }

    pub fn constant_not_allowed(structures: &str, span: Span) -> Diagnostic {
        shape(DiagnosticKind::ReferenceNotMutable, "a constant value", structures, span)
    }

    pub fn group_not_allowed(structures: &str, span: Span) -> Diagnostic {
        shape(DiagnosticKind::TypeMismatch, "a group", structures, span)
    }

    pub fn unmodifiable_system_variable(structures: &str, span: Span) -> Diagnostic {
        shape(DiagnosticKind::ReferenceNotMutable, "an unmodifiable system variable", structures, span)
    }

    pub fn arithmetic_not_allowed(structures: &str, span: Span) -> Diagnostic {
        shape(DiagnosticKind::TypeMismatch, "an arithmetic expression", structures, span)
    }

    fn shape(kind: DiagnosticKind, what: &str, structures: &str, span: Span) -> Diagnostic {
        Diagnostic::new(kind, format!("Operand can not be {what}. {structures}"), span).with_detail(
            DiagnosticDetail::OperandDefinition {
                allowed: structures.to_string(),
            },
        )
    }

    pub fn incompatible_types(target: &str, found: &str, span: Span) -> Diagnostic {
        Diagnostic::type_mismatch(
            format!("Type mismatch: inferred type {found} is not compatible with {target}"),
            span,
        )
        .with_detail(DiagnosticDetail::Types {
            expected: target.to_string(),
            found: found.to_string(),
        })
    }

    pub fn different_families(left: &str, right: &str, span: Span) -> Diagnostic {
        Diagnostic::type_mismatch(
            format!("Type mismatch: inferred type {right} is not in the same format family as {left}"),
            span,
        )
        .with_detail(DiagnosticDetail::Types {
            expected: left.to_string(),
            found: right.to_string(),
        })
    }

    pub fn redefinition_too_large(name: &str, available: u64, required: u64, span: Span) -> Diagnostic {
        Diagnostic::new(
            DiagnosticKind::RedefinitionTooLarge,
            format!("Redefinition of {name} ({available} bytes) exceeds its size: members take {required} bytes"),
            span,
        )
        .with_detail(DiagnosticDetail::RedefinitionSize { available, required })
    }
}
