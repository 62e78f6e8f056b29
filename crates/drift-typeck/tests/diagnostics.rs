//! Rendered diagnostics and the JSON summary surface.
//!
//! Rendering goes through the ariadne pipeline; assertions check for the
//! stable code, the message, and the labeled source line rather than exact
//! layout.

mod common;

use common::*;
use drift_core::{BinaryOp, Loc};
use drift_typeck::diagnostics::{
    diagnostics_json, render_diagnostic, DiagnosticOptions,
};
use drift_typeck::error::TypeError;
use drift_typeck::ty::Ty;

fn opts() -> DiagnosticOptions {
    DiagnosticOptions::colorless()
}

#[test]
fn type_mismatch_renders_code_message_and_source() {
    let source = "let x = 1 + true\n";
    let err = TypeError::Mismatch {
        expected: Ty::int(),
        found: Ty::bool(),
        loc: Loc::new("test.drift", 1, 11, 10),
    };
    let out = render_diagnostic(&err, source, "test.drift", &opts());
    assert!(out.contains("type-mismatch"), "missing code: {out}");
    assert!(
        out.contains("expected `Int`, found `Bool`"),
        "missing message: {out}"
    );
    assert!(out.contains("1 + true"), "missing source line: {out}");
}

#[test]
fn non_exhaustive_match_lists_missing_cases() {
    let err = TypeError::NonExhaustiveMatch {
        scrutinee: "Option<Int>".into(),
        missing: vec!["None".into()],
        loc: Loc::new("test.drift", 1, 1, 0),
    };
    let out = render_diagnostic(&err, "match opt ...", "test.drift", &opts());
    assert!(out.contains("non-exhaustive-match"));
    assert!(out.contains("`None`"));
    assert!(out.contains("add cases for: None"), "missing help: {out}");
}

#[test]
fn undefined_name_diagnostic_from_checker() {
    let result = check(vec![let_decl("y", var("nope"))]);
    let rendered = result.render_errors("let y = nope\n", "test.drift", &opts());
    assert_eq!(rendered.len(), 1);
    assert!(rendered[0].contains("undefined-name"));
    assert!(rendered[0].contains("nope"));
}

#[test]
fn one_rendered_error_per_failed_declaration() {
    let result = check(vec![
        let_decl("a", var("missing1")),
        let_decl("b", int(1)),
        let_decl("c", binop(BinaryOp::Add, int(1), boolean(true))),
    ]);
    assert_eq!(result.errors.len(), 2);
    let rendered = result.render_errors("let a = missing1\nlet b = 1\n", "test.drift", &opts());
    assert_eq!(rendered.len(), 2);
}

#[test]
fn json_summary_has_code_message_and_loc() {
    let result = check(vec![let_decl("y", var("nope"))]);
    let json = diagnostics_json(&result.errors);
    assert!(json.contains("\"code\": \"undefined-name\""));
    assert!(json.contains("nope"));
    assert!(json.contains("\"file\": \"test.drift\""));
    assert!(json.contains("\"line\": 1"));
}

#[test]
fn every_checker_error_carries_a_stable_code() {
    use drift_typeck::diagnostics::error_code;

    // One failing module per family; each produced error must map to the
    // code the embedding API documents.
    let undefined = check(vec![let_decl("a", var("ghost"))]);
    assert_eq!(error_code(&undefined.errors[0]), "undefined-name");

    let occurs = check(vec![let_decl(
        "f",
        lam("x", app(var("x"), vec![var("x")])),
    )]);
    assert_eq!(error_code(&occurs.errors[0]), "infinite-type");

    let annot = check(vec![let_decl("x", annotated(int(1), tcon("String")))]);
    assert_eq!(error_code(&annot.errors[0]), "type-annotation-mismatch");

    let non_exhaustive = check(vec![let_decl(
        "m",
        match_(
            variant("Some", vec![int(1)]),
            vec![case(pvariant("Some", vec![pvar("n")]), var("n"))],
        ),
    )]);
    assert_eq!(error_code(&non_exhaustive.errors[0]), "non-exhaustive-match");
}
