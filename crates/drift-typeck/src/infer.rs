//! Algorithm W inference engine and declaration driver.
//!
//! Walks the desugared core tree, inferring a principal type for every
//! expression. Implements Hindley-Milner inference with:
//! - Let-polymorphism (generalize + instantiate) scoped by levels
//! - The value restriction (only syntactic values generalize)
//! - Occurs check (rejects infinite types)
//! - Arity-based resolution of overloaded externals at call sites
//! - Exhaustiveness analysis for `match`
//!
//! Substitutions flow forward: no expression returns a type without also
//! returning the substitution it refined, and sibling expressions are
//! inferred under their predecessors' substitution.

use drift_core::{
    BinaryOp, CoreDecl, CoreExpr, CoreModule, CorePattern, Loc, MatchCase, RecBinding, UnaryOp,
};
use rustc_hash::FxHashMap;

use crate::annot::convert_type_expr;
use crate::env::{build_env, Binding, Env};
use crate::error::TypeError;
use crate::exhaustiveness;
use crate::pattern::check_pattern;
use crate::resolve::{resolve_call, Resolution};
use crate::subst::Subst;
use crate::ty::Ty;
use crate::unify::{unify_under, InferCtx};
use crate::TypeckResult;

// ── Driver ──────────────────────────────────────────────────────────────

/// Type-check a whole module.
///
/// Declarations are processed in order, each one seeing the bindings the
/// previous ones introduced. A failing declaration contributes one error
/// and no bindings; checking continues with the next declaration.
pub(crate) fn infer_module(module: &CoreModule) -> TypeckResult {
    let mut ctx = InferCtx::new();
    let (mut env, mut errors) = build_env(&mut ctx, module);
    let mut declaration_types: FxHashMap<String, Ty> = FxHashMap::default();
    let mut declarations = Vec::with_capacity(module.declarations.len());

    // One substitution grows across the whole module: a later declaration
    // may refine a type variable that an earlier, non-generalized binding
    // (a ref cell, say) left free in the environment. A failing
    // declaration's refinements are discarded along with its bindings.
    let mut subst = Subst::new();
    for decl in &module.declarations {
        match infer_decl(&mut ctx, &env, subst.clone(), decl, &mut declaration_types) {
            Ok((next_env, next_subst, lowered)) => {
                env = next_env;
                subst = next_subst;
                declarations.push(lowered);
            }
            Err(err) => {
                errors.push(err);
                declarations.push(decl.clone());
            }
        }
    }

    // Report declaration types in final substituted form: no variable with
    // a binding in the module substitution may remain.
    for ty in declaration_types.values_mut() {
        *ty = subst.apply(ty);
    }

    TypeckResult {
        module: CoreModule {
            name: module.name.clone(),
            declarations,
        },
        env,
        declaration_types,
        errors,
    }
}

/// Check one declaration under the module substitution; on success return
/// the extended environment, the updated substitution, and the
/// declaration with integer division lowered.
fn infer_decl(
    ctx: &mut InferCtx,
    env: &Env,
    subst: Subst,
    decl: &CoreDecl,
    declaration_types: &mut FxHashMap<String, Ty>,
) -> Result<(Env, Subst, CoreDecl), TypeError> {
    match decl {
        CoreDecl::Let {
            pattern,
            value,
            mutable,
            recursive,
            exported,
            loc,
        } => {
            ctx.enter_level();
            let inferred = infer_let_value(ctx, env, subst, pattern, value, *recursive, loc);
            ctx.leave_level();
            let (value_ty, subst) = inferred?;
            let applied = subst.apply(&value_ty);

            let (next_env, subst) = bind_let_pattern(
                ctx,
                env,
                pattern,
                value,
                *mutable,
                &applied,
                subst,
                loc,
                &mut |name, ty| {
                    declaration_types.insert(name, ty);
                },
            )?;

            let lowered = CoreDecl::Let {
                pattern: pattern.clone(),
                value: lower_divide(value),
                mutable: *mutable,
                recursive: *recursive,
                exported: *exported,
                loc: loc.clone(),
            };
            Ok((next_env, subst, lowered))
        }

        CoreDecl::LetRecGroup { bindings, loc } => {
            let (next_env, subst, bound) = infer_rec_group(ctx, env, bindings, subst, loc)?;
            for (name, ty) in bound {
                declaration_types.insert(name, ty);
            }
            let lowered = CoreDecl::LetRecGroup {
                bindings: bindings
                    .iter()
                    .map(|b| RecBinding {
                        pattern: b.pattern.clone(),
                        value: lower_divide(&b.value),
                        loc: b.loc.clone(),
                    })
                    .collect(),
                loc: loc.clone(),
            };
            Ok((next_env, subst, lowered))
        }

        // Handled by the environment builder; nothing to infer.
        CoreDecl::Type { .. }
        | CoreDecl::ExternalType { .. }
        | CoreDecl::External { .. }
        | CoreDecl::Import { .. } => Ok((env.clone(), subst, decl.clone())),
    }
}

/// Infer a let-bound value, using a placeholder for `let rec`.
fn infer_let_value(
    ctx: &mut InferCtx,
    env: &Env,
    subst: Subst,
    pattern: &CorePattern,
    value: &CoreExpr,
    recursive: bool,
    loc: &Loc,
) -> Result<(Ty, Subst), TypeError> {
    // Recursion needs a name to tie the knot on; the desugarer only emits
    // variable patterns for `let rec`, so anything else checks as plain let.
    if recursive {
        if let CorePattern::Var { name, .. } = pattern {
            let placeholder = ctx.fresh_var();
            let rec_env = env.with_mono(name.clone(), placeholder.clone(), loc.clone());
            let (value_ty, subst) = infer_expr(ctx, &rec_env, subst, value)?;
            let subst = unify_under(ctx, &subst, &value_ty, &placeholder, loc)?;
            return Ok((placeholder, subst));
        }
    }
    infer_expr(ctx, env, subst, value)
}

/// Bind the pattern of a (top-level or expression) let, generalizing when
/// the value restriction allows it. Returns the extended environment and
/// the substitution as refined by the pattern check, and reports each
/// introduced name through `record`.
#[allow(clippy::too_many_arguments)]
fn bind_let_pattern(
    ctx: &mut InferCtx,
    env: &Env,
    pattern: &CorePattern,
    value: &CoreExpr,
    mutable: bool,
    applied_ty: &Ty,
    subst: Subst,
    loc: &Loc,
    record: &mut dyn FnMut(String, Ty),
) -> Result<(Env, Subst), TypeError> {
    if let CorePattern::Var { name, .. } = pattern {
        if !mutable && is_syntactic_value(value) {
            let scheme = ctx.generalize(applied_ty);
            record(name.clone(), applied_ty.clone());
            let next = env.with_value(
                name.clone(),
                Binding::Value {
                    scheme,
                    loc: loc.clone(),
                },
            );
            return Ok((next, subst));
        }
    }
    let checked = check_pattern(ctx, env, pattern, applied_ty, subst)?;
    for (name, ty) in &checked.bindings {
        // A monomorphic binding shares its variables with the enclosing
        // scope; pinning their levels stops later lets from quantifying
        // them.
        ctx.pin_at_current_level(ty);
        record(name.clone(), ty.clone());
    }
    let next = env.with_monos(
        checked
            .bindings
            .into_iter()
            .map(|(name, ty)| (name, ty, loc.clone())),
    );
    Ok((next, checked.subst))
}

/// Infer a mutually recursive binding group. Returns the environment with
/// the finished bindings, the threaded substitution, and the
/// `(name, type)` pairs the group introduced.
fn infer_rec_group(
    ctx: &mut InferCtx,
    env: &Env,
    bindings: &[RecBinding],
    subst: Subst,
    loc: &Loc,
) -> Result<(Env, Subst, Vec<(String, Ty)>), TypeError> {
    ctx.enter_level();
    let result = infer_rec_group_inner(ctx, env, bindings, subst, loc);
    ctx.leave_level();
    let (subst, placeholders) = result?;

    // Each binding generalizes independently, under the value restriction.
    let mut next_env = env.clone();
    let mut bound = Vec::new();
    for (binding, (name, placeholder)) in bindings.iter().zip(placeholders) {
        let final_ty = subst.apply(&placeholder);
        bound.push((name.clone(), final_ty.clone()));
        let scheme = if is_syntactic_value(&binding.value) {
            ctx.generalize(&final_ty)
        } else {
            ctx.pin_at_current_level(&final_ty);
            crate::ty::Scheme::mono(final_ty)
        };
        next_env.insert_value(
            name,
            Binding::Value {
                scheme,
                loc: binding.loc.clone(),
            },
        );
    }
    Ok((next_env, subst, bound))
}

/// The placeholder pass of a recursive group: runs at the raised level.
fn infer_rec_group_inner(
    ctx: &mut InferCtx,
    env: &Env,
    bindings: &[RecBinding],
    mut subst: Subst,
    loc: &Loc,
) -> Result<(Subst, Vec<(String, Ty)>), TypeError> {
    let mut placeholders = Vec::with_capacity(bindings.len());
    for binding in bindings {
        let CorePattern::Var { name, .. } = &binding.pattern else {
            return Err(TypeError::UnsupportedLambdaPattern {
                loc: binding.pattern.loc().clone(),
            });
        };
        placeholders.push((name.clone(), ctx.fresh_var()));
    }

    let rec_env = env.with_monos(
        placeholders
            .iter()
            .map(|(name, ty)| (name.clone(), ty.clone(), loc.clone())),
    );

    for (binding, (_, placeholder)) in bindings.iter().zip(placeholders.iter()) {
        let (value_ty, next) = infer_expr(ctx, &rec_env, subst, &binding.value)?;
        subst = unify_under(ctx, &next, &value_ty, placeholder, &binding.loc)?;
    }
    Ok((subst, placeholders))
}

// ── Expression Inference ───────────────────────────────────────────────

/// Infer the type of an expression under `subst`, returning the type and
/// the updated substitution.
pub(crate) fn infer_expr(
    ctx: &mut InferCtx,
    env: &Env,
    subst: Subst,
    expr: &CoreExpr,
) -> Result<(Ty, Subst), TypeError> {
    match expr {
        CoreExpr::IntLit { .. } => Ok((Ty::int(), subst)),
        CoreExpr::FloatLit { .. } => Ok((Ty::float(), subst)),
        CoreExpr::StringLit { .. } => Ok((Ty::string(), subst)),
        CoreExpr::BoolLit { .. } => Ok((Ty::bool(), subst)),
        CoreExpr::UnitLit { .. } => Ok((Ty::unit(), subst)),

        CoreExpr::Var { name, loc } => match env.lookup_value(name) {
            Some(Binding::Value { scheme, .. }) | Some(Binding::External { scheme, .. }) => {
                let scheme = scheme.clone();
                Ok((ctx.instantiate(&scheme), subst))
            }
            Some(Binding::ExternalOverload { .. }) => Err(TypeError::UnresolvedOverload {
                name: name.clone(),
                loc: loc.clone(),
            }),
            None => Err(TypeError::UndefinedName {
                name: name.clone(),
                loc: loc.clone(),
            }),
        },

        CoreExpr::Lambda { param, body, loc } => {
            let param_ty = ctx.fresh_var();
            let body_env = match param {
                CorePattern::Var { name, .. } => {
                    env.with_mono(name.clone(), param_ty.clone(), loc.clone())
                }
                CorePattern::Wildcard { .. } => env.clone(),
                _ => {
                    return Err(TypeError::UnsupportedLambdaPattern {
                        loc: param.loc().clone(),
                    });
                }
            };
            let (body_ty, subst) = infer_expr(ctx, &body_env, subst, body)?;
            Ok((Ty::fun(vec![subst.apply(&param_ty)], body_ty), subst))
        }

        CoreExpr::App { func, args, loc } => {
            // A bare overloaded name in call position resolves by arity;
            // anywhere else it is an error (see Var above).
            let (fn_ty, mut subst) = match func.as_ref() {
                CoreExpr::Var { name, .. }
                    if matches!(
                        env.lookup_value(name),
                        Some(Binding::ExternalOverload { .. })
                    ) =>
                {
                    match resolve_call(env, name, args.len(), loc)? {
                        Resolution::Overload { entry, .. } => {
                            let scheme = entry.scheme.clone();
                            (ctx.instantiate(&scheme), subst)
                        }
                        Resolution::Single(_) => {
                            unreachable!("binding was checked to be an overload group")
                        }
                    }
                }
                _ => infer_expr(ctx, env, subst, func)?,
            };

            let mut arg_tys = Vec::with_capacity(args.len());
            for arg in args {
                let (arg_ty, next) = infer_expr(ctx, env, subst, arg)?;
                subst = next;
                arg_tys.push(arg_ty);
            }

            let result = ctx.fresh_var();
            let expected = Ty::Fun(arg_tys, Box::new(result.clone()));
            let subst = unify_under(ctx, &subst, &fn_ty, &expected, loc)?;
            Ok((subst.apply(&result), subst))
        }

        CoreExpr::BinOp { op, lhs, rhs, loc } => infer_binop(ctx, env, subst, *op, lhs, rhs, loc),

        CoreExpr::UnaryOp { op, operand, loc } => {
            infer_unaryop(ctx, env, subst, *op, operand, loc)
        }

        CoreExpr::Annotated {
            expr: inner,
            type_expr,
            loc,
        } => {
            let mut vars = FxHashMap::default();
            let annotation = convert_type_expr(ctx, type_expr, &mut vars);
            let (inferred, subst) = infer_expr(ctx, env, subst, inner)?;
            let subst = unify_under(ctx, &subst, &annotation, &inferred, loc).map_err(|err| {
                match err {
                    TypeError::Mismatch {
                        expected, found, ..
                    } => TypeError::AnnotationMismatch {
                        annotated: expected,
                        inferred: found,
                        loc: loc.clone(),
                    },
                    other => other,
                }
            })?;
            Ok((subst.apply(&annotation), subst))
        }

        CoreExpr::Let {
            pattern,
            value,
            mutable,
            body,
            loc,
        } => {
            ctx.enter_level();
            let inferred = infer_let_value(ctx, env, subst, pattern, value, false, loc);
            ctx.leave_level();
            let (value_ty, subst) = inferred?;
            let applied = subst.apply(&value_ty);
            let (body_env, subst) = bind_let_pattern(
                ctx,
                env,
                pattern,
                value,
                *mutable,
                &applied,
                subst,
                loc,
                &mut |_, _| {},
            )?;
            infer_expr(ctx, &body_env, subst, body)
        }

        CoreExpr::LetRec { bindings, body, loc } => {
            let (body_env, subst, _) = infer_rec_group(ctx, env, bindings, subst, loc)?;
            infer_expr(ctx, &body_env, subst, body)
        }

        CoreExpr::Match {
            scrutinee,
            cases,
            loc,
        } => infer_match(ctx, env, subst, scrutinee, cases, loc),

        CoreExpr::Record { fields, loc: _ } => {
            let mut subst = subst;
            let mut field_tys = std::collections::BTreeMap::new();
            for (name, value) in fields {
                let (ty, next) = infer_expr(ctx, env, subst, value)?;
                subst = next;
                field_tys.insert(name.clone(), ty);
            }
            // Earlier fields may mention variables later fields refined.
            let record = subst.apply(&Ty::Record(field_tys));
            Ok((record, subst))
        }

        CoreExpr::RecordAccess { record, field, loc } => {
            let (record_ty, subst) = infer_expr(ctx, env, subst, record)?;
            match subst.apply(&record_ty) {
                Ty::Record(fields) => match fields.get(field) {
                    Some(ty) => Ok((ty.clone(), subst)),
                    None => Err(TypeError::RecordFieldNotFound {
                        field: field.clone(),
                        record: Ty::Record(fields),
                        loc: loc.clone(),
                    }),
                },
                other => Err(TypeError::FieldOnNonRecord {
                    field: field.clone(),
                    found: other,
                    loc: loc.clone(),
                }),
            }
        }

        CoreExpr::RecordUpdate {
            record,
            fields,
            loc,
        } => {
            let (record_ty, mut subst) = infer_expr(ctx, env, subst, record)?;
            let field_tys = match subst.apply(&record_ty) {
                Ty::Record(tys) => tys,
                other => {
                    let field = fields.first().map(|(n, _)| n.clone()).unwrap_or_default();
                    return Err(TypeError::FieldOnNonRecord {
                        field,
                        found: other,
                        loc: loc.clone(),
                    });
                }
            };
            for (name, value) in fields {
                let Some(field_ty) = field_tys.get(name) else {
                    return Err(TypeError::RecordFieldNotFound {
                        field: name.clone(),
                        record: Ty::Record(field_tys.clone()),
                        loc: loc.clone(),
                    });
                };
                let field_ty = field_ty.clone();
                let (value_ty, next) = infer_expr(ctx, env, subst, value)?;
                subst = unify_under(ctx, &next, &value_ty, &field_ty, value.loc())?;
            }
            Ok((subst.apply(&Ty::Record(field_tys)), subst))
        }

        CoreExpr::Variant { name, args, loc } => {
            let scheme = match env.lookup_value(name) {
                Some(Binding::Value { scheme, .. }) | Some(Binding::External { scheme, .. }) => {
                    scheme.clone()
                }
                _ => {
                    return Err(TypeError::ConstructorNotFound {
                        name: name.clone(),
                        loc: loc.clone(),
                    });
                }
            };
            let ctor_ty = ctx.instantiate(&scheme);

            // Nullary constructors are plain values of their type.
            if args.is_empty() && !matches!(ctor_ty, Ty::Fun(_, _)) {
                return Ok((ctor_ty, subst));
            }

            let mut subst = subst;
            let mut arg_tys = Vec::with_capacity(args.len());
            for arg in args {
                let (arg_ty, next) = infer_expr(ctx, env, subst, arg)?;
                subst = next;
                arg_tys.push(arg_ty);
            }
            let result = ctx.fresh_var();
            let expected = Ty::Fun(arg_tys, Box::new(result.clone()));
            let subst = unify_under(ctx, &subst, &ctor_ty, &expected, loc)?;
            Ok((subst.apply(&result), subst))
        }

        CoreExpr::Unsafe { expr: inner, .. } => infer_expr(ctx, env, subst, inner),
    }
}

/// Binary operators have fixed signatures, except equality (polymorphic)
/// and `:=` (reference assignment).
fn infer_binop(
    ctx: &mut InferCtx,
    env: &Env,
    subst: Subst,
    op: BinaryOp,
    lhs: &CoreExpr,
    rhs: &CoreExpr,
    loc: &Loc,
) -> Result<(Ty, Subst), TypeError> {
    match op {
        BinaryOp::RefAssign => {
            let (lhs_ty, subst) = infer_expr(ctx, env, subst, lhs)?;
            let cell = ctx.fresh_var();
            let subst = unify_under(ctx, &subst, &lhs_ty, &Ty::reference(cell.clone()), loc)?;
            let (rhs_ty, subst) = infer_expr(ctx, env, subst, rhs)?;
            let subst = unify_under(ctx, &subst, &rhs_ty, &cell, loc)?;
            Ok((Ty::unit(), subst))
        }
        BinaryOp::Equal | BinaryOp::NotEqual => {
            let (lhs_ty, subst) = infer_expr(ctx, env, subst, lhs)?;
            let (rhs_ty, subst) = infer_expr(ctx, env, subst, rhs)?;
            let operand = ctx.fresh_var();
            let subst = unify_under(ctx, &subst, &lhs_ty, &operand, loc)?;
            let subst = unify_under(ctx, &subst, &rhs_ty, &operand, loc)?;
            Ok((Ty::bool(), subst))
        }
        _ => {
            let (operand, result) = match op {
                BinaryOp::Add
                | BinaryOp::Subtract
                | BinaryOp::Multiply
                | BinaryOp::Divide
                | BinaryOp::IntDivide
                | BinaryOp::Modulo => (Ty::int(), Ty::int()),
                BinaryOp::FloatDivide => (Ty::float(), Ty::float()),
                BinaryOp::LessThan
                | BinaryOp::LessEqual
                | BinaryOp::GreaterThan
                | BinaryOp::GreaterEqual => (Ty::int(), Ty::bool()),
                BinaryOp::LogicalAnd | BinaryOp::LogicalOr => (Ty::bool(), Ty::bool()),
                BinaryOp::Concat => (Ty::string(), Ty::string()),
                BinaryOp::Equal | BinaryOp::NotEqual | BinaryOp::RefAssign => {
                    unreachable!("handled above")
                }
            };
            let (lhs_ty, subst) = infer_expr(ctx, env, subst, lhs)?;
            let subst = unify_under(ctx, &subst, &lhs_ty, &operand, loc)?;
            let (rhs_ty, subst) = infer_expr(ctx, env, subst, rhs)?;
            let subst = unify_under(ctx, &subst, &rhs_ty, &operand, loc)?;
            Ok((result, subst))
        }
    }
}

fn infer_unaryop(
    ctx: &mut InferCtx,
    env: &Env,
    subst: Subst,
    op: UnaryOp,
    operand: &CoreExpr,
    loc: &Loc,
) -> Result<(Ty, Subst), TypeError> {
    match op {
        UnaryOp::Negate => {
            let (ty, subst) = infer_expr(ctx, env, subst, operand)?;
            let subst = unify_under(ctx, &subst, &ty, &Ty::int(), loc)?;
            Ok((Ty::int(), subst))
        }
        UnaryOp::LogicalNot => {
            let (ty, subst) = infer_expr(ctx, env, subst, operand)?;
            let subst = unify_under(ctx, &subst, &ty, &Ty::bool(), loc)?;
            Ok((Ty::bool(), subst))
        }
        UnaryOp::Deref => {
            let (ty, subst) = infer_expr(ctx, env, subst, operand)?;
            let cell = ctx.fresh_var();
            let subst = unify_under(ctx, &subst, &ty, &Ty::reference(cell.clone()), loc)?;
            Ok((subst.apply(&cell), subst))
        }
    }
}

fn infer_match(
    ctx: &mut InferCtx,
    env: &Env,
    subst: Subst,
    scrutinee: &CoreExpr,
    cases: &[MatchCase],
    loc: &Loc,
) -> Result<(Ty, Subst), TypeError> {
    let (scrutinee_ty, mut subst) = infer_expr(ctx, env, subst, scrutinee)?;
    let result = ctx.fresh_var();

    for case in cases {
        let expected = subst.apply(&scrutinee_ty);
        let checked = check_pattern(ctx, env, &case.pattern, &expected, subst)?;
        subst = checked.subst;
        let case_env = env.with_monos(
            checked
                .bindings
                .into_iter()
                .map(|(name, ty)| (name, ty, case.loc.clone())),
        );

        if let Some(guard) = &case.guard {
            let (guard_ty, next) = infer_expr(ctx, &case_env, subst, guard)?;
            subst = unify_under(ctx, &next, &guard_ty, &Ty::bool(), guard.loc())?;
        }

        let (body_ty, next) = infer_expr(ctx, &case_env, subst, &case.body)?;
        subst = unify_under(ctx, &next, &body_ty, &result, &case.loc)?;
    }

    let final_scrutinee = subst.apply(&scrutinee_ty);
    let patterns: Vec<CorePattern> = cases.iter().map(|c| c.pattern.clone()).collect();
    let missing = exhaustiveness::missing_cases(env, &patterns, &final_scrutinee);
    if !missing.is_empty() {
        return Err(TypeError::NonExhaustiveMatch {
            scrutinee: final_scrutinee.to_string(),
            missing,
            loc: loc.clone(),
        });
    }

    Ok((subst.apply(&result), subst))
}

// ── Value Restriction ──────────────────────────────────────────────────

/// Whether an expression is a *syntactic value*: evaluation cannot allocate
/// mutable state, so a let binding it may generalize. Applications --
/// including `ref(x)` -- are never values; that is the whole point.
pub(crate) fn is_syntactic_value(expr: &CoreExpr) -> bool {
    match expr {
        CoreExpr::IntLit { .. }
        | CoreExpr::FloatLit { .. }
        | CoreExpr::StringLit { .. }
        | CoreExpr::BoolLit { .. }
        | CoreExpr::UnitLit { .. }
        | CoreExpr::Var { .. }
        | CoreExpr::Lambda { .. } => true,
        CoreExpr::Variant { args, .. } => args.iter().all(is_syntactic_value),
        // An annotation does not evaluate anything.
        CoreExpr::Annotated { expr, .. } => is_syntactic_value(expr),
        _ => false,
    }
}

// ── Integer Division Lowering ──────────────────────────────────────────

/// Rewrite `Divide` to `IntDivide` throughout a checked expression. The
/// current operator table types `/` at `(Int, Int) -> Int`, so on a
/// well-typed tree the rewrite is unconditional.
fn lower_divide(expr: &CoreExpr) -> CoreExpr {
    match expr {
        CoreExpr::IntLit { .. }
        | CoreExpr::FloatLit { .. }
        | CoreExpr::StringLit { .. }
        | CoreExpr::BoolLit { .. }
        | CoreExpr::UnitLit { .. }
        | CoreExpr::Var { .. } => expr.clone(),

        CoreExpr::Lambda { param, body, loc } => CoreExpr::Lambda {
            param: param.clone(),
            body: Box::new(lower_divide(body)),
            loc: loc.clone(),
        },
        CoreExpr::App { func, args, loc } => CoreExpr::App {
            func: Box::new(lower_divide(func)),
            args: args.iter().map(lower_divide).collect(),
            loc: loc.clone(),
        },
        CoreExpr::Let {
            pattern,
            value,
            mutable,
            body,
            loc,
        } => CoreExpr::Let {
            pattern: pattern.clone(),
            value: Box::new(lower_divide(value)),
            mutable: *mutable,
            body: Box::new(lower_divide(body)),
            loc: loc.clone(),
        },
        CoreExpr::LetRec {
            bindings,
            body,
            loc,
        } => CoreExpr::LetRec {
            bindings: bindings
                .iter()
                .map(|b| RecBinding {
                    pattern: b.pattern.clone(),
                    value: lower_divide(&b.value),
                    loc: b.loc.clone(),
                })
                .collect(),
            body: Box::new(lower_divide(body)),
            loc: loc.clone(),
        },
        CoreExpr::Match {
            scrutinee,
            cases,
            loc,
        } => CoreExpr::Match {
            scrutinee: Box::new(lower_divide(scrutinee)),
            cases: cases
                .iter()
                .map(|c| MatchCase {
                    pattern: c.pattern.clone(),
                    guard: c.guard.as_ref().map(lower_divide),
                    body: lower_divide(&c.body),
                    loc: c.loc.clone(),
                })
                .collect(),
            loc: loc.clone(),
        },
        CoreExpr::BinOp { op, lhs, rhs, loc } => CoreExpr::BinOp {
            op: match op {
                BinaryOp::Divide => BinaryOp::IntDivide,
                other => *other,
            },
            lhs: Box::new(lower_divide(lhs)),
            rhs: Box::new(lower_divide(rhs)),
            loc: loc.clone(),
        },
        CoreExpr::UnaryOp { op, operand, loc } => CoreExpr::UnaryOp {
            op: *op,
            operand: Box::new(lower_divide(operand)),
            loc: loc.clone(),
        },
        CoreExpr::Annotated {
            expr,
            type_expr,
            loc,
        } => CoreExpr::Annotated {
            expr: Box::new(lower_divide(expr)),
            type_expr: type_expr.clone(),
            loc: loc.clone(),
        },
        CoreExpr::Record { fields, loc } => CoreExpr::Record {
            fields: fields
                .iter()
                .map(|(name, value)| (name.clone(), lower_divide(value)))
                .collect(),
            loc: loc.clone(),
        },
        CoreExpr::RecordAccess { record, field, loc } => CoreExpr::RecordAccess {
            record: Box::new(lower_divide(record)),
            field: field.clone(),
            loc: loc.clone(),
        },
        CoreExpr::RecordUpdate {
            record,
            fields,
            loc,
        } => CoreExpr::RecordUpdate {
            record: Box::new(lower_divide(record)),
            fields: fields
                .iter()
                .map(|(name, value)| (name.clone(), lower_divide(value)))
                .collect(),
            loc: loc.clone(),
        },
        CoreExpr::Variant { name, args, loc } => CoreExpr::Variant {
            name: name.clone(),
            args: args.iter().map(lower_divide).collect(),
            loc: loc.clone(),
        },
        CoreExpr::Unsafe { expr, loc } => CoreExpr::Unsafe {
            expr: Box::new(lower_divide(expr)),
            loc: loc.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::PatternLiteral;

    fn loc() -> Loc {
        Loc::default()
    }

    fn int(v: i64) -> CoreExpr {
        CoreExpr::IntLit { value: v, loc: loc() }
    }

    fn var(name: &str) -> CoreExpr {
        CoreExpr::Var {
            name: name.into(),
            loc: loc(),
        }
    }

    #[test]
    fn syntactic_values() {
        assert!(is_syntactic_value(&int(1)));
        assert!(is_syntactic_value(&var("x")));
        assert!(is_syntactic_value(&CoreExpr::Lambda {
            param: CorePattern::Var {
                name: "x".into(),
                loc: loc(),
            },
            body: Box::new(var("x")),
            loc: loc(),
        }));
        // Constructor of values: yes. Constructor of an application: no.
        assert!(is_syntactic_value(&CoreExpr::Variant {
            name: "Some".into(),
            args: vec![int(1)],
            loc: loc(),
        }));
        assert!(!is_syntactic_value(&CoreExpr::Variant {
            name: "Some".into(),
            args: vec![CoreExpr::App {
                func: Box::new(var("f")),
                args: vec![],
                loc: loc(),
            }],
            loc: loc(),
        }));
        // Applications never generalize, `ref` included.
        assert!(!is_syntactic_value(&CoreExpr::App {
            func: Box::new(var("ref")),
            args: vec![int(1)],
            loc: loc(),
        }));
        assert!(!is_syntactic_value(&CoreExpr::BinOp {
            op: BinaryOp::Add,
            lhs: Box::new(int(1)),
            rhs: Box::new(int(2)),
            loc: loc(),
        }));
    }

    #[test]
    fn lower_divide_rewrites_nested() {
        let div = CoreExpr::BinOp {
            op: BinaryOp::Divide,
            lhs: Box::new(int(6)),
            rhs: Box::new(int(3)),
            loc: loc(),
        };
        let wrapped = CoreExpr::Match {
            scrutinee: Box::new(div),
            cases: vec![MatchCase {
                pattern: CorePattern::Literal {
                    value: PatternLiteral::Int(2),
                    loc: loc(),
                },
                guard: None,
                body: CoreExpr::BinOp {
                    op: BinaryOp::Divide,
                    lhs: Box::new(int(4)),
                    rhs: Box::new(int(2)),
                    loc: loc(),
                },
                loc: loc(),
            }],
            loc: loc(),
        };
        let lowered = lower_divide(&wrapped);
        let CoreExpr::Match {
            scrutinee, cases, ..
        } = lowered
        else {
            panic!("expected match");
        };
        assert!(matches!(
            *scrutinee,
            CoreExpr::BinOp {
                op: BinaryOp::IntDivide,
                ..
            }
        ));
        assert!(matches!(
            cases[0].body,
            CoreExpr::BinOp {
                op: BinaryOp::IntDivide,
                ..
            }
        ));
    }

    #[test]
    fn float_divide_untouched() {
        let fdiv = CoreExpr::BinOp {
            op: BinaryOp::FloatDivide,
            lhs: Box::new(CoreExpr::FloatLit {
                value: 1.0,
                loc: loc(),
            }),
            rhs: Box::new(CoreExpr::FloatLit {
                value: 2.0,
                loc: loc(),
            }),
            loc: loc(),
        };
        assert!(matches!(
            lower_divide(&fdiv),
            CoreExpr::BinOp {
                op: BinaryOp::FloatDivide,
                ..
            }
        ));
    }
}
