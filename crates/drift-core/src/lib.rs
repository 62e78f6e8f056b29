//! Shared types for the Drift compiler.
//!
//! Drift is a small ML-family functional language that compiles to
//! JavaScript. The surface syntax is lexed, parsed, and desugared by the
//! frontend crates; everything downstream of desugaring (type checking,
//! code generation) operates on the *core tree* defined here.
//!
//! - [`loc`]: source locations carried by every core node
//! - [`ast`]: the desugared core tree (`CoreModule` and friends)

pub mod ast;
pub mod loc;

pub use ast::{
    BinaryOp, CoreDecl, CoreExpr, CoreModule, CorePattern, CoreTypeExpr, MatchCase,
    PatternLiteral, RecBinding, UnaryOp,
};
pub use loc::Loc;
