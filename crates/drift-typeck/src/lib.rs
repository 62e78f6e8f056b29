//! Drift type checker: Hindley-Milner inference with level-based
//! let-polymorphism.
//!
//! Consumes a desugared [`CoreModule`] and either annotates every
//! top-level declaration with an inferred principal type or rejects the
//! program with locatable diagnostics. Supports:
//!
//! - Let-polymorphism (generalize + instantiate) scoped by levels
//! - Unification with occurs check
//! - The value restriction for sound mutable references
//! - Pattern checking with binder extraction and exhaustiveness analysis
//! - Arity-based resolution of overloaded external functions
//!
//! # Architecture
//!
//! - [`ty`]: core type representation (Ty, TyVar, Scheme)
//! - [`subst`]: substitutions (apply / compose)
//! - [`unify`]: inference context and the structural unifier
//! - [`env`]: type environment and the environment builder
//! - [`builtins`]: built-in types and the stdlib scheme seed
//! - [`annot`]: source type expressions to checker types
//! - [`resolve`]: arity-based overload resolution
//! - [`pattern`]: pattern checking with binder extraction
//! - [`exhaustiveness`]: missing-constructor analysis for `match`
//! - [`infer`]: Algorithm W engine and declaration driver
//! - [`error`], [`diagnostics`]: error taxonomy, codes, and rendering

pub mod annot;
pub mod builtins;
pub mod diagnostics;
pub mod env;
pub mod error;
pub mod exhaustiveness;
pub mod infer;
pub mod pattern;
pub mod resolve;
pub mod subst;
pub mod ty;
pub mod unify;

use drift_core::CoreModule;
use rustc_hash::FxHashMap;

use crate::diagnostics::DiagnosticOptions;
use crate::env::Env;
use crate::error::TypeError;
use crate::ty::Ty;

/// The result of type-checking a module.
pub struct TypeckResult {
    /// The checked module, with integer division lowered (`Divide` becomes
    /// `IntDivide` once its operands are confirmed `Int`).
    pub module: CoreModule,
    /// The final environment: built-ins, externals, and every top-level
    /// binding the module introduced.
    pub env: Env,
    /// Inferred type per top-level name, in final substituted form.
    pub declaration_types: FxHashMap<String, Ty>,
    /// Errors, at most one per failed declaration.
    pub errors: Vec<TypeError>,
}

impl TypeckResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Render all errors as formatted diagnostic strings.
    pub fn render_errors(
        &self,
        source: &str,
        filename: &str,
        options: &DiagnosticOptions,
    ) -> Vec<String> {
        self.errors
            .iter()
            .map(|err| diagnostics::render_diagnostic(err, source, filename, options))
            .collect()
    }
}

/// Type-check a module.
///
/// Declarations are checked in order, each seeing the bindings of the ones
/// before it. A failing declaration contributes one error and checking
/// continues, so users see every broken declaration in one run.
pub fn typecheck(module: &CoreModule) -> TypeckResult {
    infer::infer_module(module)
}

/// Type-check a module, streaming each diagnostic to `emit` as well as
/// collecting it in the result.
pub fn typecheck_with(module: &CoreModule, mut emit: impl FnMut(&TypeError)) -> TypeckResult {
    let result = infer::infer_module(module);
    for err in &result.errors {
        emit(err);
    }
    result
}
