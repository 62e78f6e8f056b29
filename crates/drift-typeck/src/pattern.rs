//! Pattern checking with binder extraction.
//!
//! Checks a pattern shape against the expected (scrutinee) type, producing
//! the names the pattern binds and the substitution the checks refined.
//! Bindings are monomorphic; the caller decides whether a variable pattern
//! at a let boundary may generalize instead.

use drift_core::{CorePattern, PatternLiteral};
use rustc_hash::FxHashSet;

use crate::env::{Binding, Env};
use crate::error::TypeError;
use crate::subst::Subst;
use crate::ty::Ty;
use crate::unify::{unify_under, InferCtx};

/// The result of checking one pattern.
#[derive(Debug)]
pub struct CheckedPattern {
    /// The scrutinee type with every refinement applied.
    pub ty: Ty,
    /// Names bound by the pattern and their (fully applied) types.
    pub bindings: Vec<(String, Ty)>,
    /// The updated substitution.
    pub subst: Subst,
}

/// Check `pattern` against `expected` under `subst`.
pub fn check_pattern(
    ctx: &mut InferCtx,
    env: &Env,
    pattern: &CorePattern,
    expected: &Ty,
    subst: Subst,
) -> Result<CheckedPattern, TypeError> {
    let mut bindings = Vec::new();
    let mut seen = FxHashSet::default();
    let subst = check(ctx, env, pattern, expected, subst, &mut bindings, &mut seen)?;
    // Later sub-patterns may refine variables bound by earlier ones, so
    // binding types are only applied once the whole pattern is done.
    let bindings = bindings
        .into_iter()
        .map(|(name, ty)| (name, subst.apply(&ty)))
        .collect();
    Ok(CheckedPattern {
        ty: subst.apply(expected),
        bindings,
        subst,
    })
}

fn check(
    ctx: &mut InferCtx,
    env: &Env,
    pattern: &CorePattern,
    expected: &Ty,
    subst: Subst,
    bindings: &mut Vec<(String, Ty)>,
    seen: &mut FxHashSet<String>,
) -> Result<Subst, TypeError> {
    match pattern {
        CorePattern::Wildcard { .. } => Ok(subst),

        CorePattern::Var { name, loc } => {
            if !seen.insert(name.clone()) {
                return Err(TypeError::DuplicateBinding {
                    name: name.clone(),
                    loc: loc.clone(),
                });
            }
            bindings.push((name.clone(), expected.clone()));
            Ok(subst)
        }

        CorePattern::Literal { value, loc } => {
            let lit_ty = literal_ty(value);
            unify_under(ctx, &subst, &lit_ty, expected, loc)
        }

        CorePattern::Variant { name, args, loc } => {
            let scheme = match env.lookup_value(name) {
                Some(Binding::Value { scheme, .. }) | Some(Binding::External { scheme, .. }) => {
                    scheme.clone()
                }
                Some(Binding::ExternalOverload { .. }) | None => {
                    return Err(TypeError::ConstructorNotFound {
                        name: name.clone(),
                        loc: loc.clone(),
                    });
                }
            };
            let ctor_ty = ctx.instantiate(&scheme);

            match ctor_ty {
                Ty::Fun(params, ret) => {
                    if args.len() != params.len() {
                        return Err(TypeError::PatternArityMismatch {
                            constructor: name.clone(),
                            expected: params.len(),
                            found: args.len(),
                            loc: loc.clone(),
                        });
                    }
                    // The result type fixes the constructor's type
                    // variables before the argument patterns see them.
                    let mut subst = unify_under(ctx, &subst, &ret, expected, loc)?;
                    for (arg, param) in args.iter().zip(params.iter()) {
                        let param = subst.apply(param);
                        subst = check(ctx, env, arg, &param, subst, bindings, seen)?;
                    }
                    Ok(subst)
                }
                ctor_ty => {
                    if !args.is_empty() {
                        return Err(TypeError::PatternArityMismatch {
                            constructor: name.clone(),
                            expected: 0,
                            found: args.len(),
                            loc: loc.clone(),
                        });
                    }
                    unify_under(ctx, &subst, &ctor_ty, expected, loc)
                }
            }
        }

        CorePattern::Record { fields, loc } => {
            let field_tys = match subst.apply(expected) {
                Ty::Record(tys) => tys,
                other => {
                    return Err(TypeError::RecordPatternOnNonRecord {
                        found: other,
                        loc: loc.clone(),
                    });
                }
            };
            let mut subst = subst;
            for (field, pat) in fields {
                let Some(field_ty) = field_tys.get(field) else {
                    return Err(TypeError::RecordFieldNotFound {
                        field: field.clone(),
                        record: Ty::Record(field_tys.clone()),
                        loc: loc.clone(),
                    });
                };
                let field_ty = subst.apply(field_ty);
                subst = check(ctx, env, pat, &field_ty, subst, bindings, seen)?;
            }
            Ok(subst)
        }

        // Reserved; checked as identity until tuples land in the surface
        // language.
        CorePattern::Tuple { .. } => Ok(subst),
    }
}

/// The type of a literal pattern.
fn literal_ty(lit: &PatternLiteral) -> Ty {
    match lit {
        PatternLiteral::Int(_) => Ty::int(),
        PatternLiteral::Float(_) => Ty::float(),
        PatternLiteral::String(_) => Ty::string(),
        PatternLiteral::Bool(_) => Ty::bool(),
        PatternLiteral::Unit => Ty::unit(),
    }
}
