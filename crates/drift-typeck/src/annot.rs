//! Conversion from source type expressions to checker types.
//!
//! Named type variables (`a`, `b`) share one table per signature, so every
//! mention of `a` inside a single annotation converts to the same fresh
//! unification variable. The environment builder then quantifies external
//! signatures over exactly those variables.

use drift_core::CoreTypeExpr;
use rustc_hash::FxHashMap;

use crate::ty::Ty;
use crate::unify::InferCtx;

/// Convert a type expression, allocating fresh variables for named type
/// variables through `vars`.
pub fn convert_type_expr(
    ctx: &mut InferCtx,
    texpr: &CoreTypeExpr,
    vars: &mut FxHashMap<String, Ty>,
) -> Ty {
    match texpr {
        CoreTypeExpr::Const { name, .. } => Ty::Con(name.clone()),
        CoreTypeExpr::Var { name, .. } => vars
            .entry(name.clone())
            .or_insert_with(|| ctx.fresh_var())
            .clone(),
        CoreTypeExpr::Fun { params, ret, .. } => {
            let params = params
                .iter()
                .map(|p| convert_type_expr(ctx, p, vars))
                .collect();
            let ret = convert_type_expr(ctx, ret, vars);
            Ty::fun(params, ret)
        }
        CoreTypeExpr::App { ctor, args, .. } => {
            let ctor = convert_type_expr(ctx, ctor, vars);
            let args = args
                .iter()
                .map(|a| convert_type_expr(ctx, a, vars))
                .collect();
            Ty::App(Box::new(ctor), args)
        }
        CoreTypeExpr::Record { fields, .. } => Ty::Record(
            fields
                .iter()
                .map(|(name, t)| (name.clone(), convert_type_expr(ctx, t, vars)))
                .collect(),
        ),
        CoreTypeExpr::Variant { constructors, .. } => Ty::Variant(
            constructors
                .iter()
                .map(|(name, payload)| {
                    (
                        name.clone(),
                        payload
                            .iter()
                            .map(|t| convert_type_expr(ctx, t, vars))
                            .collect(),
                    )
                })
                .collect(),
        ),
        CoreTypeExpr::Union { types, .. } => Ty::Union(
            types
                .iter()
                .map(|t| convert_type_expr(ctx, t, vars))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::Loc;

    fn const_expr(name: &str) -> CoreTypeExpr {
        CoreTypeExpr::Const {
            name: name.into(),
            loc: Loc::default(),
        }
    }

    fn var_expr(name: &str) -> CoreTypeExpr {
        CoreTypeExpr::Var {
            name: name.into(),
            loc: Loc::default(),
        }
    }

    #[test]
    fn converts_function_types() {
        let mut ctx = InferCtx::new();
        let mut vars = FxHashMap::default();
        let texpr = CoreTypeExpr::Fun {
            params: vec![const_expr("Int"), const_expr("String")],
            ret: Box::new(const_expr("Bool")),
            loc: Loc::default(),
        };
        let ty = convert_type_expr(&mut ctx, &texpr, &mut vars);
        assert_eq!(ty, Ty::fun(vec![Ty::int(), Ty::string()], Ty::bool()));
    }

    #[test]
    fn repeated_type_var_shares_one_variable() {
        let mut ctx = InferCtx::new();
        let mut vars = FxHashMap::default();
        let texpr = CoreTypeExpr::Fun {
            params: vec![var_expr("a")],
            ret: Box::new(var_expr("a")),
            loc: Loc::default(),
        };
        let ty = convert_type_expr(&mut ctx, &texpr, &mut vars);
        match ty {
            Ty::Fun(params, ret) => assert_eq!(params[0], *ret),
            other => panic!("expected Fun, got {:?}", other),
        }
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn converts_type_application() {
        let mut ctx = InferCtx::new();
        let mut vars = FxHashMap::default();
        let texpr = CoreTypeExpr::App {
            ctor: Box::new(const_expr("List")),
            args: vec![const_expr("Int")],
            loc: Loc::default(),
        };
        let ty = convert_type_expr(&mut ctx, &texpr, &mut vars);
        assert_eq!(ty, Ty::list(Ty::int()));
    }
}
