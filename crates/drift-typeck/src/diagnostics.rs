//! Diagnostic codes, ariadne rendering, and JSON export.
//!
//! Every [`TypeError`] variant maps to a stable string code that embedders
//! can match on. `render_diagnostic` produces labeled, human-readable
//! output through ariadne; `Diagnostic` is the flat summary editor tooling
//! consumes as JSON.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use drift_core::Loc;
use serde::Serialize;

use crate::error::TypeError;

// ── Error Codes ────────────────────────────────────────────────────────

/// The stable code for an error variant.
pub fn error_code(err: &TypeError) -> &'static str {
    match err {
        TypeError::UndefinedName { .. } => "undefined-name",
        TypeError::Mismatch { .. } => "type-mismatch",
        TypeError::InfiniteType { .. } => "infinite-type",
        TypeError::FnArityMismatch { .. } => "function-arity-mismatch",
        TypeError::NonExhaustiveMatch { .. } => "non-exhaustive-match",
        TypeError::PatternArityMismatch { .. } => "pattern-arity-mismatch",
        TypeError::ConstructorNotFound { .. } => "constructor-not-found",
        TypeError::RecordFieldNotFound { .. } => "record-field-not-found",
        TypeError::FieldOnNonRecord { .. } => "field-on-non-record",
        TypeError::RecordPatternOnNonRecord { .. } => "record-pattern-on-non-record",
        TypeError::DuplicateBinding { .. } => "duplicate-binding-in-pattern",
        TypeError::OverloadNoMatch { .. } => "overload-no-match",
        TypeError::OverloadAmbiguous { .. } => "overload-ambiguous",
        TypeError::OverloadInconsistentJsName { .. } => "overload-inconsistent-jsname",
        TypeError::OverloadInconsistentFrom { .. } => "overload-inconsistent-from",
        TypeError::OverloadNonFunction { .. } => "overload-non-function",
        TypeError::AnnotationMismatch { .. } => "type-annotation-mismatch",
        TypeError::UnsupportedLambdaPattern { .. } => "unsupported-pattern-in-lambda",
        TypeError::UnresolvedOverload { .. } => "unresolved-overload-use",
    }
}

// ── Rendering Options ──────────────────────────────────────────────────

/// Knobs for diagnostic rendering.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticOptions {
    /// Whether to emit ANSI colors.
    pub color: bool,
}

impl DiagnosticOptions {
    /// Colorless output, for tests and non-terminal sinks.
    pub fn colorless() -> Self {
        DiagnosticOptions { color: false }
    }
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        DiagnosticOptions { color: true }
    }
}

// ── Rendering ──────────────────────────────────────────────────────────

/// Render a type error into a formatted diagnostic string.
///
/// The span is derived from the error's byte offset, clamped to the source
/// bounds (locations can outlive edits in editor sessions).
pub fn render_diagnostic(
    error: &TypeError,
    source: &str,
    _filename: &str,
    options: &DiagnosticOptions,
) -> String {
    let config = Config::default().with_color(options.color);
    let source_len = source.len();

    let clamp = |r: Range<usize>| -> Range<usize> {
        let start = r.start.min(source_len);
        let end = r.end.min(source_len).max(start);
        if start == end {
            start..end.saturating_add(1).min(source_len)
        } else {
            start..end
        }
    };

    let offset = error.loc().offset as usize;
    let span = clamp(offset..offset + 1);

    let (label, help) = label_and_help(error);

    let mut builder = Report::build(ReportKind::Error, span.clone())
        .with_code(error_code(error))
        .with_message(error.to_string())
        .with_config(config)
        .with_label(Label::new(span).with_message(label).with_color(Color::Red));
    if let Some(help) = help {
        builder.set_help(help);
    }
    let report = builder.finish();

    let mut buf = Vec::new();
    let cache = Source::from(source);
    report
        .write(cache, &mut buf)
        .expect("failed to write diagnostic");
    String::from_utf8(buf).expect("diagnostic output should be valid UTF-8")
}

/// The label under the offending span, plus an optional fix hint.
fn label_and_help(error: &TypeError) -> (String, Option<String>) {
    match error {
        TypeError::UndefinedName { .. } => ("not found in this scope".into(), None),
        TypeError::Mismatch {
            expected, found, ..
        } => (format!("expected {}, found {}", expected, found), None),
        TypeError::InfiniteType { .. } => (
            "recursive type here".into(),
            Some("a value cannot have a type that refers to itself".into()),
        ),
        TypeError::FnArityMismatch {
            expected, found, ..
        } => {
            let help = if expected > found {
                format!("missing {} argument(s)", expected - found)
            } else {
                format!("{} extra argument(s)", found - expected)
            };
            (format!("expected {} argument(s)", expected), Some(help))
        }
        TypeError::NonExhaustiveMatch { missing, .. } => (
            "not all cases are handled".into(),
            Some(format!("add cases for: {}", missing.join(", "))),
        ),
        TypeError::PatternArityMismatch { expected, .. } => {
            (format!("this pattern needs {} argument(s)", expected), None)
        }
        TypeError::ConstructorNotFound { .. } => ("unknown constructor".into(), None),
        TypeError::RecordFieldNotFound { field, .. } => {
            (format!("no field `{}`", field), None)
        }
        TypeError::FieldOnNonRecord { found, .. } => {
            (format!("this has type {}", found), None)
        }
        TypeError::RecordPatternOnNonRecord { found, .. } => (
            format!("the matched value has type {}", found),
            Some("annotate the scrutinee with its record type".into()),
        ),
        TypeError::DuplicateBinding { name, .. } => {
            (format!("`{}` bound again here", name), None)
        }
        TypeError::OverloadNoMatch { available, .. } => (
            "no overload with this arity".into(),
            Some(format!(
                "declared arities: {}",
                available
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        ),
        TypeError::OverloadAmbiguous { .. } => (
            "more than one overload matches".into(),
            Some("give the overloads distinct arities".into()),
        ),
        TypeError::OverloadInconsistentJsName { expected, .. } => (
            format!("expected JavaScript name `{}`", expected),
            None,
        ),
        TypeError::OverloadInconsistentFrom { .. } => {
            ("declared against a different module here".into(), None)
        }
        TypeError::OverloadNonFunction { found, .. } => {
            (format!("this overload has type {}", found), None)
        }
        TypeError::AnnotationMismatch {
            annotated,
            inferred,
            ..
        } => (
            format!("annotated {}, inferred {}", annotated, inferred),
            None,
        ),
        TypeError::UnsupportedLambdaPattern { .. } => (
            "pattern not allowed here".into(),
            Some("bind a name and match on it in the body".into()),
        ),
        TypeError::UnresolvedOverload { .. } => {
            ("overloaded name used outside a call".into(), None)
        }
    }
}

// ── JSON Summary ───────────────────────────────────────────────────────

/// The flat diagnostic summary consumed by editor tooling.
#[derive(Clone, Debug, Serialize)]
pub struct Diagnostic {
    pub code: &'static str,
    pub message: String,
    pub loc: Loc,
}

impl Diagnostic {
    pub fn from_error(error: &TypeError) -> Self {
        Diagnostic {
            code: error_code(error),
            message: error.to_string(),
            loc: error.loc().clone(),
        }
    }
}

/// Serialize errors to a JSON array of diagnostic summaries.
pub fn diagnostics_json(errors: &[TypeError]) -> String {
    let diags: Vec<Diagnostic> = errors.iter().map(Diagnostic::from_error).collect();
    serde_json::to_string_pretty(&diags).expect("diagnostics serialize without fail")
}
