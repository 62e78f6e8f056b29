//! Shared builders for integration tests.
//!
//! The checker consumes desugared core trees, so tests construct them
//! directly; these helpers keep that terse. Locations are synthetic.

#![allow(dead_code)]

use drift_core::{
    BinaryOp, CoreDecl, CoreExpr, CoreModule, CorePattern, CoreTypeExpr, Loc, MatchCase,
    PatternLiteral, RecBinding, UnaryOp,
};
use drift_typeck::{typecheck, TypeckResult};

pub fn l() -> Loc {
    Loc::start("test.drift")
}

// ── Expressions ────────────────────────────────────────────────────────

pub fn int(value: i64) -> CoreExpr {
    CoreExpr::IntLit { value, loc: l() }
}

pub fn float(value: f64) -> CoreExpr {
    CoreExpr::FloatLit { value, loc: l() }
}

pub fn string(value: &str) -> CoreExpr {
    CoreExpr::StringLit {
        value: value.into(),
        loc: l(),
    }
}

pub fn boolean(value: bool) -> CoreExpr {
    CoreExpr::BoolLit { value, loc: l() }
}

pub fn unit() -> CoreExpr {
    CoreExpr::UnitLit { loc: l() }
}

pub fn var(name: &str) -> CoreExpr {
    CoreExpr::Var {
        name: name.into(),
        loc: l(),
    }
}

pub fn lam(param: &str, body: CoreExpr) -> CoreExpr {
    CoreExpr::Lambda {
        param: pvar(param),
        body: Box::new(body),
        loc: l(),
    }
}

pub fn app(func: CoreExpr, args: Vec<CoreExpr>) -> CoreExpr {
    CoreExpr::App {
        func: Box::new(func),
        args,
        loc: l(),
    }
}

/// `name(args...)`.
pub fn call(name: &str, args: Vec<CoreExpr>) -> CoreExpr {
    app(var(name), args)
}

pub fn let_in(name: &str, value: CoreExpr, body: CoreExpr) -> CoreExpr {
    CoreExpr::Let {
        pattern: pvar(name),
        value: Box::new(value),
        mutable: false,
        body: Box::new(body),
        loc: l(),
    }
}

pub fn let_pat_in(pattern: CorePattern, value: CoreExpr, body: CoreExpr) -> CoreExpr {
    CoreExpr::Let {
        pattern,
        value: Box::new(value),
        mutable: false,
        body: Box::new(body),
        loc: l(),
    }
}

pub fn letrec_in(name: &str, value: CoreExpr, body: CoreExpr) -> CoreExpr {
    CoreExpr::LetRec {
        bindings: vec![RecBinding {
            pattern: pvar(name),
            value,
            loc: l(),
        }],
        body: Box::new(body),
        loc: l(),
    }
}

pub fn binop(op: BinaryOp, lhs: CoreExpr, rhs: CoreExpr) -> CoreExpr {
    CoreExpr::BinOp {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
        loc: l(),
    }
}

pub fn unop(op: UnaryOp, operand: CoreExpr) -> CoreExpr {
    CoreExpr::UnaryOp {
        op,
        operand: Box::new(operand),
        loc: l(),
    }
}

pub fn annotated(expr: CoreExpr, type_expr: CoreTypeExpr) -> CoreExpr {
    CoreExpr::Annotated {
        expr: Box::new(expr),
        type_expr,
        loc: l(),
    }
}

pub fn match_(scrutinee: CoreExpr, cases: Vec<MatchCase>) -> CoreExpr {
    CoreExpr::Match {
        scrutinee: Box::new(scrutinee),
        cases,
        loc: l(),
    }
}

pub fn case(pattern: CorePattern, body: CoreExpr) -> MatchCase {
    MatchCase {
        pattern,
        guard: None,
        body,
        loc: l(),
    }
}

pub fn case_guarded(pattern: CorePattern, guard: CoreExpr, body: CoreExpr) -> MatchCase {
    MatchCase {
        pattern,
        guard: Some(guard),
        body,
        loc: l(),
    }
}

pub fn record(fields: Vec<(&str, CoreExpr)>) -> CoreExpr {
    CoreExpr::Record {
        fields: fields.into_iter().map(|(n, e)| (n.into(), e)).collect(),
        loc: l(),
    }
}

pub fn access(record: CoreExpr, field: &str) -> CoreExpr {
    CoreExpr::RecordAccess {
        record: Box::new(record),
        field: field.into(),
        loc: l(),
    }
}

pub fn update(record: CoreExpr, fields: Vec<(&str, CoreExpr)>) -> CoreExpr {
    CoreExpr::RecordUpdate {
        record: Box::new(record),
        fields: fields.into_iter().map(|(n, e)| (n.into(), e)).collect(),
        loc: l(),
    }
}

pub fn variant(name: &str, args: Vec<CoreExpr>) -> CoreExpr {
    CoreExpr::Variant {
        name: name.into(),
        args,
        loc: l(),
    }
}

pub fn unsafe_(expr: CoreExpr) -> CoreExpr {
    CoreExpr::Unsafe {
        expr: Box::new(expr),
        loc: l(),
    }
}

// ── Patterns ───────────────────────────────────────────────────────────

pub fn pvar(name: &str) -> CorePattern {
    CorePattern::Var {
        name: name.into(),
        loc: l(),
    }
}

pub fn pwild() -> CorePattern {
    CorePattern::Wildcard { loc: l() }
}

pub fn plit_int(value: i64) -> CorePattern {
    CorePattern::Literal {
        value: PatternLiteral::Int(value),
        loc: l(),
    }
}

pub fn plit_bool(value: bool) -> CorePattern {
    CorePattern::Literal {
        value: PatternLiteral::Bool(value),
        loc: l(),
    }
}

pub fn pvariant(name: &str, args: Vec<CorePattern>) -> CorePattern {
    CorePattern::Variant {
        name: name.into(),
        args,
        loc: l(),
    }
}

pub fn precord(fields: Vec<(&str, CorePattern)>) -> CorePattern {
    CorePattern::Record {
        fields: fields.into_iter().map(|(n, p)| (n.into(), p)).collect(),
        loc: l(),
    }
}

// ── Type Expressions ───────────────────────────────────────────────────

pub fn tcon(name: &str) -> CoreTypeExpr {
    CoreTypeExpr::Const {
        name: name.into(),
        loc: l(),
    }
}

pub fn tvar(name: &str) -> CoreTypeExpr {
    CoreTypeExpr::Var {
        name: name.into(),
        loc: l(),
    }
}

pub fn tfun(params: Vec<CoreTypeExpr>, ret: CoreTypeExpr) -> CoreTypeExpr {
    CoreTypeExpr::Fun {
        params,
        ret: Box::new(ret),
        loc: l(),
    }
}

pub fn tapp(name: &str, args: Vec<CoreTypeExpr>) -> CoreTypeExpr {
    CoreTypeExpr::App {
        ctor: Box::new(tcon(name)),
        args,
        loc: l(),
    }
}

pub fn tvariant(constructors: Vec<(&str, Vec<CoreTypeExpr>)>) -> CoreTypeExpr {
    CoreTypeExpr::Variant {
        constructors: constructors
            .into_iter()
            .map(|(n, p)| (n.into(), p))
            .collect(),
        loc: l(),
    }
}

// ── Declarations ───────────────────────────────────────────────────────

pub fn let_decl(name: &str, value: CoreExpr) -> CoreDecl {
    CoreDecl::Let {
        pattern: pvar(name),
        value,
        mutable: false,
        recursive: false,
        exported: false,
        loc: l(),
    }
}

pub fn let_decl_pat(pattern: CorePattern, value: CoreExpr) -> CoreDecl {
    CoreDecl::Let {
        pattern,
        value,
        mutable: false,
        recursive: false,
        exported: false,
        loc: l(),
    }
}

pub fn let_rec_decl(name: &str, value: CoreExpr) -> CoreDecl {
    CoreDecl::Let {
        pattern: pvar(name),
        value,
        mutable: false,
        recursive: true,
        exported: false,
        loc: l(),
    }
}

pub fn let_mut_decl(name: &str, value: CoreExpr) -> CoreDecl {
    CoreDecl::Let {
        pattern: pvar(name),
        value,
        mutable: true,
        recursive: false,
        exported: false,
        loc: l(),
    }
}

pub fn let_rec_group(bindings: Vec<(&str, CoreExpr)>) -> CoreDecl {
    CoreDecl::LetRecGroup {
        bindings: bindings
            .into_iter()
            .map(|(name, value)| RecBinding {
                pattern: pvar(name),
                value,
                loc: l(),
            })
            .collect(),
        loc: l(),
    }
}

pub fn type_decl(name: &str, params: Vec<&str>, body: CoreTypeExpr) -> CoreDecl {
    CoreDecl::Type {
        name: name.into(),
        params: params.into_iter().map(String::from).collect(),
        body,
        loc: l(),
    }
}

pub fn external(name: &str, type_expr: CoreTypeExpr, js_name: &str) -> CoreDecl {
    CoreDecl::External {
        name: name.into(),
        type_expr,
        js_name: js_name.into(),
        from: None,
        exported: false,
        loc: l(),
    }
}

pub fn external_from(name: &str, type_expr: CoreTypeExpr, js_name: &str, from: &str) -> CoreDecl {
    CoreDecl::External {
        name: name.into(),
        type_expr,
        js_name: js_name.into(),
        from: Some(from.into()),
        exported: false,
        loc: l(),
    }
}

// ── Running ────────────────────────────────────────────────────────────

pub fn module(declarations: Vec<CoreDecl>) -> CoreModule {
    CoreModule {
        name: "Test".into(),
        declarations,
    }
}

/// Build a module from the declarations and type-check it.
pub fn check(declarations: Vec<CoreDecl>) -> TypeckResult {
    typecheck(&module(declarations))
}

/// Assert the result is error-free; panic with the errors otherwise.
pub fn assert_ok(result: &TypeckResult) {
    assert!(
        result.errors.is_empty(),
        "expected no errors, got: {:?}",
        result.errors
    );
}

/// The display form of a declaration's inferred type.
pub fn decl_ty(result: &TypeckResult, name: &str) -> String {
    result
        .declaration_types
        .get(name)
        .unwrap_or_else(|| panic!("no inferred type for `{name}`"))
        .to_string()
}
