//! The desugared core tree.
//!
//! The parser produces a surface tree with pattern-matching lambdas, pipe
//! operators, multi-parameter functions, and other sugar; the desugarer
//! reduces all of that to the small core language below. Multi-parameter
//! lambdas arrive curried (nested single-parameter `Lambda` nodes), while
//! applications stay n-ary so externally declared JavaScript functions keep
//! their native arity.
//!
//! Every node carries a [`Loc`] so the type checker can attach diagnostics
//! to real source positions.

use crate::loc::Loc;

/// A desugared module: a named sequence of top-level declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreModule {
    pub name: String,
    pub declarations: Vec<CoreDecl>,
}

/// One binding of a recursive group.
#[derive(Debug, Clone, PartialEq)]
pub struct RecBinding {
    pub pattern: CorePattern,
    pub value: CoreExpr,
    pub loc: Loc,
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreDecl {
    /// `let p = e` / `let mut p = e` / `let rec f = e`.
    Let {
        pattern: CorePattern,
        value: CoreExpr,
        mutable: bool,
        recursive: bool,
        exported: bool,
        loc: Loc,
    },
    /// A group of mutually recursive bindings (`let rec ... and ...`).
    LetRecGroup { bindings: Vec<RecBinding>, loc: Loc },
    /// `type Name<params> = body`.
    Type {
        name: String,
        params: Vec<String>,
        body: CoreTypeExpr,
        loc: Loc,
    },
    /// `external type Name<params>` -- an opaque or aliased JavaScript type.
    ExternalType {
        name: String,
        params: Vec<String>,
        body: Option<CoreTypeExpr>,
        loc: Loc,
    },
    /// `external name : type = "jsName" [from "module"]`.
    ///
    /// Repeating the same `name` declares an overload group; the checker
    /// merges the group and resolves calls by arity.
    External {
        name: String,
        type_expr: CoreTypeExpr,
        js_name: String,
        from: Option<String>,
        exported: bool,
        loc: Loc,
    },
    /// `import Module` -- resolved before type checking; trusted here.
    Import { module: String, loc: Loc },
}

impl CoreDecl {
    pub fn loc(&self) -> &Loc {
        match self {
            CoreDecl::Let { loc, .. }
            | CoreDecl::LetRecGroup { loc, .. }
            | CoreDecl::Type { loc, .. }
            | CoreDecl::ExternalType { loc, .. }
            | CoreDecl::External { loc, .. }
            | CoreDecl::Import { loc, .. } => loc,
        }
    }
}

/// A binary operator tag.
///
/// `Divide` is what the desugarer emits for `/`; the type checker rewrites
/// it to `IntDivide` once both operands are confirmed `Int`. `FloatDivide`
/// is reserved for float-typed division in a later phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    IntDivide,
    FloatDivide,
    Modulo,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Equal,
    NotEqual,
    LogicalAnd,
    LogicalOr,
    Concat,
    RefAssign,
}

/// A unary operator tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    LogicalNot,
    Deref,
}

/// One arm of a `match` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCase {
    pub pattern: CorePattern,
    pub guard: Option<CoreExpr>,
    pub body: CoreExpr,
    pub loc: Loc,
}

/// A desugared expression.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreExpr {
    IntLit {
        value: i64,
        loc: Loc,
    },
    FloatLit {
        value: f64,
        loc: Loc,
    },
    StringLit {
        value: String,
        loc: Loc,
    },
    BoolLit {
        value: bool,
        loc: Loc,
    },
    UnitLit {
        loc: Loc,
    },
    Var {
        name: String,
        loc: Loc,
    },
    /// A single-parameter function. Multi-parameter surface lambdas are
    /// curried by the desugarer.
    Lambda {
        param: CorePattern,
        body: Box<CoreExpr>,
        loc: Loc,
    },
    /// An n-ary application. Externals keep their JavaScript arity.
    App {
        func: Box<CoreExpr>,
        args: Vec<CoreExpr>,
        loc: Loc,
    },
    /// `let p = v in b`.
    Let {
        pattern: CorePattern,
        value: Box<CoreExpr>,
        mutable: bool,
        body: Box<CoreExpr>,
        loc: Loc,
    },
    /// `let rec f = v [and g = w ...] in b`.
    LetRec {
        bindings: Vec<RecBinding>,
        body: Box<CoreExpr>,
        loc: Loc,
    },
    Match {
        scrutinee: Box<CoreExpr>,
        cases: Vec<MatchCase>,
        loc: Loc,
    },
    BinOp {
        op: BinaryOp,
        lhs: Box<CoreExpr>,
        rhs: Box<CoreExpr>,
        loc: Loc,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<CoreExpr>,
        loc: Loc,
    },
    /// `e : ty`.
    Annotated {
        expr: Box<CoreExpr>,
        type_expr: CoreTypeExpr,
        loc: Loc,
    },
    /// `{ f1: e1, ... }`.
    Record {
        fields: Vec<(String, CoreExpr)>,
        loc: Loc,
    },
    /// `e.field`.
    RecordAccess {
        record: Box<CoreExpr>,
        field: String,
        loc: Loc,
    },
    /// `{ ...e, f1: e1, ... }`.
    RecordUpdate {
        record: Box<CoreExpr>,
        fields: Vec<(String, CoreExpr)>,
        loc: Loc,
    },
    /// `Ctor(e1, ..., en)` -- constructor application by name.
    Variant {
        name: String,
        args: Vec<CoreExpr>,
        loc: Loc,
    },
    /// `unsafe e` -- marks a JavaScript-escape region for codegen. The type
    /// checker treats it as transparent.
    Unsafe {
        expr: Box<CoreExpr>,
        loc: Loc,
    },
}

impl CoreExpr {
    pub fn loc(&self) -> &Loc {
        match self {
            CoreExpr::IntLit { loc, .. }
            | CoreExpr::FloatLit { loc, .. }
            | CoreExpr::StringLit { loc, .. }
            | CoreExpr::BoolLit { loc, .. }
            | CoreExpr::UnitLit { loc }
            | CoreExpr::Var { loc, .. }
            | CoreExpr::Lambda { loc, .. }
            | CoreExpr::App { loc, .. }
            | CoreExpr::Let { loc, .. }
            | CoreExpr::LetRec { loc, .. }
            | CoreExpr::Match { loc, .. }
            | CoreExpr::BinOp { loc, .. }
            | CoreExpr::UnaryOp { loc, .. }
            | CoreExpr::Annotated { loc, .. }
            | CoreExpr::Record { loc, .. }
            | CoreExpr::RecordAccess { loc, .. }
            | CoreExpr::RecordUpdate { loc, .. }
            | CoreExpr::Variant { loc, .. }
            | CoreExpr::Unsafe { loc, .. } => loc,
        }
    }
}

/// A literal inside a pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternLiteral {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Unit,
}

/// A desugared pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum CorePattern {
    Wildcard {
        loc: Loc,
    },
    Var {
        name: String,
        loc: Loc,
    },
    Literal {
        value: PatternLiteral,
        loc: Loc,
    },
    /// `Ctor(p1, ..., pn)`.
    Variant {
        name: String,
        args: Vec<CorePattern>,
        loc: Loc,
    },
    /// `{ f1: p1, ... }` -- matches a subset of the record's fields.
    Record {
        fields: Vec<(String, CorePattern)>,
        loc: Loc,
    },
    /// Reserved; tuples are not yet in the surface language.
    Tuple {
        elems: Vec<CorePattern>,
        loc: Loc,
    },
}

impl CorePattern {
    pub fn loc(&self) -> &Loc {
        match self {
            CorePattern::Wildcard { loc }
            | CorePattern::Var { loc, .. }
            | CorePattern::Literal { loc, .. }
            | CorePattern::Variant { loc, .. }
            | CorePattern::Record { loc, .. }
            | CorePattern::Tuple { loc, .. } => loc,
        }
    }
}

/// A type expression as written in source (annotations, `type` bodies,
/// `external` signatures). Converted to checker types by `drift-typeck`.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreTypeExpr {
    /// A named type: `Int`, `String`, a user type name.
    Const { name: String, loc: Loc },
    /// `(T1, ..., Tn) -> R`.
    Fun {
        params: Vec<CoreTypeExpr>,
        ret: Box<CoreTypeExpr>,
        loc: Loc,
    },
    /// `Ctor<T1, ..., Tn>`.
    App {
        ctor: Box<CoreTypeExpr>,
        args: Vec<CoreTypeExpr>,
        loc: Loc,
    },
    /// A lowercase type variable: `a`, `b`.
    Var { name: String, loc: Loc },
    /// `{ f1: T1, ... }`.
    Record {
        fields: Vec<(String, CoreTypeExpr)>,
        loc: Loc,
    },
    /// `C1(T...) | C2 | ...`.
    Variant {
        constructors: Vec<(String, Vec<CoreTypeExpr>)>,
        loc: Loc,
    },
    /// An ad-hoc union of JavaScript types: `Int | String`. Only appears in
    /// external declarations.
    Union { types: Vec<CoreTypeExpr>, loc: Loc },
}

impl CoreTypeExpr {
    pub fn loc(&self) -> &Loc {
        match self {
            CoreTypeExpr::Const { loc, .. }
            | CoreTypeExpr::Fun { loc, .. }
            | CoreTypeExpr::App { loc, .. }
            | CoreTypeExpr::Var { loc, .. }
            | CoreTypeExpr::Record { loc, .. }
            | CoreTypeExpr::Variant { loc, .. }
            | CoreTypeExpr::Union { loc, .. } => loc,
        }
    }
}
