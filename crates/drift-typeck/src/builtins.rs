//! Built-in type and standard-library registration.
//!
//! Seeds the environment with the `List`, `Option`, and `Result` variant
//! types (and their constructors as polymorphic value schemes), the `Ref`
//! type constructor, and the standard-library function schemes. Member
//! names are camelCase to match the JavaScript compile target.
//!
//! `Ref` has no value-side constructor; cells are created with the `ref`
//! function so that reference creation is an application and therefore
//! never generalizes (the value restriction).

use drift_core::Loc;

use crate::env::{Binding, Env, TypeDef};
use crate::ty::{Scheme, Ty, TyVar};
use crate::unify::InferCtx;

fn builtin_loc() -> Loc {
    Loc::start("<builtin>")
}

/// Quantify a type over `n` fresh variables handed to `build`.
fn poly(ctx: &mut InferCtx, n: usize, build: impl FnOnce(&[Ty]) -> Ty) -> Scheme {
    let vars: Vec<TyVar> = (0..n).map(|_| ctx.fresh_tyvar()).collect();
    let args: Vec<Ty> = vars.iter().map(|v| Ty::Var(*v)).collect();
    Scheme {
        vars,
        ty: build(&args),
    }
}

fn value(scheme: Scheme) -> Binding {
    Binding::Value {
        scheme,
        loc: builtin_loc(),
    }
}

/// Register all built-in types and standard-library schemes.
pub fn register_builtins(ctx: &mut InferCtx, env: &mut Env) {
    register_builtin_types(ctx, env);
    register_stdlib(ctx, env);
}

/// `List`, `Option`, `Result` variant definitions plus `Ref`, and the six
/// data constructors.
fn register_builtin_types(ctx: &mut InferCtx, env: &mut Env) {
    let loc = builtin_loc();

    // type List<a> = Cons(a, List<a>) | Nil
    {
        let a = ctx.fresh_tyvar();
        let list_a = Ty::list(Ty::Var(a));
        env.insert_type(TypeDef {
            name: "List".into(),
            params: vec!["a".into()],
            body: Some(Ty::Variant(
                [
                    ("Cons".to_string(), vec![Ty::Var(a), list_a.clone()]),
                    ("Nil".to_string(), vec![]),
                ]
                .into_iter()
                .collect(),
            )),
            loc: loc.clone(),
        });
    }
    env.insert_value(
        "Cons",
        value(poly(ctx, 1, |v| {
            Ty::fun(vec![v[0].clone(), Ty::list(v[0].clone())], Ty::list(v[0].clone()))
        })),
    );
    env.insert_value("Nil", value(poly(ctx, 1, |v| Ty::list(v[0].clone()))));

    // type Option<a> = Some(a) | None
    {
        let a = ctx.fresh_tyvar();
        env.insert_type(TypeDef {
            name: "Option".into(),
            params: vec!["a".into()],
            body: Some(Ty::Variant(
                [
                    ("Some".to_string(), vec![Ty::Var(a)]),
                    ("None".to_string(), vec![]),
                ]
                .into_iter()
                .collect(),
            )),
            loc: loc.clone(),
        });
    }
    env.insert_value(
        "Some",
        value(poly(ctx, 1, |v| {
            Ty::fun(vec![v[0].clone()], Ty::option(v[0].clone()))
        })),
    );
    env.insert_value("None", value(poly(ctx, 1, |v| Ty::option(v[0].clone()))));

    // type Result<a, e> = Ok(a) | Err(e)
    {
        let a = ctx.fresh_tyvar();
        let e = ctx.fresh_tyvar();
        env.insert_type(TypeDef {
            name: "Result".into(),
            params: vec!["a".into(), "e".into()],
            body: Some(Ty::Variant(
                [
                    ("Ok".to_string(), vec![Ty::Var(a)]),
                    ("Err".to_string(), vec![Ty::Var(e)]),
                ]
                .into_iter()
                .collect(),
            )),
            loc: loc.clone(),
        });
    }
    env.insert_value(
        "Ok",
        value(poly(ctx, 2, |v| {
            Ty::fun(vec![v[0].clone()], Ty::result(v[0].clone(), v[1].clone()))
        })),
    );
    env.insert_value(
        "Err",
        value(poly(ctx, 2, |v| {
            Ty::fun(vec![v[1].clone()], Ty::result(v[0].clone(), v[1].clone()))
        })),
    );

    // Ref<a> is opaque on the type side; `ref` below creates cells.
    env.insert_type(TypeDef {
        name: "Ref".into(),
        params: vec!["a".into()],
        body: None,
        loc,
    });
}

/// The standard-library schemes.
fn register_stdlib(ctx: &mut InferCtx, env: &mut Env) {
    // ── List ────────────────────────────────────────────────────────
    env.insert_value(
        "List.map",
        value(poly(ctx, 2, |v| {
            Ty::fun(
                vec![
                    Ty::list(v[0].clone()),
                    Ty::fun(vec![v[0].clone()], v[1].clone()),
                ],
                Ty::list(v[1].clone()),
            )
        })),
    );
    env.insert_value(
        "List.filter",
        value(poly(ctx, 1, |v| {
            Ty::fun(
                vec![
                    Ty::list(v[0].clone()),
                    Ty::fun(vec![v[0].clone()], Ty::bool()),
                ],
                Ty::list(v[0].clone()),
            )
        })),
    );
    env.insert_value(
        "List.fold",
        value(poly(ctx, 2, |v| {
            Ty::fun(
                vec![
                    Ty::list(v[0].clone()),
                    v[1].clone(),
                    Ty::fun(vec![v[1].clone(), v[0].clone()], v[1].clone()),
                ],
                v[1].clone(),
            )
        })),
    );
    env.insert_value(
        "List.length",
        value(poly(ctx, 1, |v| Ty::fun(vec![Ty::list(v[0].clone())], Ty::int()))),
    );
    env.insert_value(
        "List.head",
        value(poly(ctx, 1, |v| {
            Ty::fun(vec![Ty::list(v[0].clone())], Ty::option(v[0].clone()))
        })),
    );
    env.insert_value(
        "List.tail",
        value(poly(ctx, 1, |v| {
            Ty::fun(
                vec![Ty::list(v[0].clone())],
                Ty::option(Ty::list(v[0].clone())),
            )
        })),
    );
    env.insert_value(
        "List.reverse",
        value(poly(ctx, 1, |v| {
            Ty::fun(vec![Ty::list(v[0].clone())], Ty::list(v[0].clone()))
        })),
    );
    env.insert_value(
        "List.append",
        value(poly(ctx, 1, |v| {
            Ty::fun(
                vec![Ty::list(v[0].clone()), Ty::list(v[0].clone())],
                Ty::list(v[0].clone()),
            )
        })),
    );
    env.insert_value(
        "List.concat",
        value(poly(ctx, 1, |v| {
            Ty::fun(
                vec![Ty::list(Ty::list(v[0].clone()))],
                Ty::list(v[0].clone()),
            )
        })),
    );
    env.insert_value(
        "List.isEmpty",
        value(poly(ctx, 1, |v| Ty::fun(vec![Ty::list(v[0].clone())], Ty::bool()))),
    );
    env.insert_value(
        "List.nth",
        value(poly(ctx, 1, |v| {
            Ty::fun(
                vec![Ty::list(v[0].clone()), Ty::int()],
                Ty::option(v[0].clone()),
            )
        })),
    );

    // ── Option ──────────────────────────────────────────────────────
    env.insert_value(
        "Option.map",
        value(poly(ctx, 2, |v| {
            Ty::fun(
                vec![
                    Ty::option(v[0].clone()),
                    Ty::fun(vec![v[0].clone()], v[1].clone()),
                ],
                Ty::option(v[1].clone()),
            )
        })),
    );
    env.insert_value(
        "Option.andThen",
        value(poly(ctx, 2, |v| {
            Ty::fun(
                vec![
                    Ty::option(v[0].clone()),
                    Ty::fun(vec![v[0].clone()], Ty::option(v[1].clone())),
                ],
                Ty::option(v[1].clone()),
            )
        })),
    );
    env.insert_value(
        "Option.withDefault",
        value(poly(ctx, 1, |v| {
            Ty::fun(vec![Ty::option(v[0].clone()), v[0].clone()], v[0].clone())
        })),
    );
    env.insert_value(
        "Option.isSome",
        value(poly(ctx, 1, |v| {
            Ty::fun(vec![Ty::option(v[0].clone())], Ty::bool())
        })),
    );
    env.insert_value(
        "Option.isNone",
        value(poly(ctx, 1, |v| {
            Ty::fun(vec![Ty::option(v[0].clone())], Ty::bool())
        })),
    );
    env.insert_value(
        "Option.toResult",
        value(poly(ctx, 2, |v| {
            Ty::fun(
                vec![Ty::option(v[0].clone()), v[1].clone()],
                Ty::result(v[0].clone(), v[1].clone()),
            )
        })),
    );

    // ── Result ──────────────────────────────────────────────────────
    env.insert_value(
        "Result.map",
        value(poly(ctx, 3, |v| {
            Ty::fun(
                vec![
                    Ty::result(v[0].clone(), v[2].clone()),
                    Ty::fun(vec![v[0].clone()], v[1].clone()),
                ],
                Ty::result(v[1].clone(), v[2].clone()),
            )
        })),
    );
    env.insert_value(
        "Result.mapError",
        value(poly(ctx, 3, |v| {
            Ty::fun(
                vec![
                    Ty::result(v[0].clone(), v[1].clone()),
                    Ty::fun(vec![v[1].clone()], v[2].clone()),
                ],
                Ty::result(v[0].clone(), v[2].clone()),
            )
        })),
    );
    env.insert_value(
        "Result.andThen",
        value(poly(ctx, 3, |v| {
            Ty::fun(
                vec![
                    Ty::result(v[0].clone(), v[2].clone()),
                    Ty::fun(vec![v[0].clone()], Ty::result(v[1].clone(), v[2].clone())),
                ],
                Ty::result(v[1].clone(), v[2].clone()),
            )
        })),
    );
    env.insert_value(
        "Result.withDefault",
        value(poly(ctx, 2, |v| {
            Ty::fun(
                vec![Ty::result(v[0].clone(), v[1].clone()), v[0].clone()],
                v[0].clone(),
            )
        })),
    );
    env.insert_value(
        "Result.isOk",
        value(poly(ctx, 2, |v| {
            Ty::fun(vec![Ty::result(v[0].clone(), v[1].clone())], Ty::bool())
        })),
    );
    env.insert_value(
        "Result.isError",
        value(poly(ctx, 2, |v| {
            Ty::fun(vec![Ty::result(v[0].clone(), v[1].clone())], Ty::bool())
        })),
    );
    env.insert_value(
        "Result.toOption",
        value(poly(ctx, 2, |v| {
            Ty::fun(
                vec![Ty::result(v[0].clone(), v[1].clone())],
                Ty::option(v[0].clone()),
            )
        })),
    );

    // ── String ──────────────────────────────────────────────────────
    env.insert_value(
        "String.length",
        value(Scheme::mono(Ty::fun(vec![Ty::string()], Ty::int()))),
    );
    env.insert_value(
        "String.concat",
        value(Scheme::mono(Ty::fun(
            vec![Ty::string(), Ty::string()],
            Ty::string(),
        ))),
    );
    env.insert_value(
        "String.slice",
        value(Scheme::mono(Ty::fun(
            vec![Ty::string(), Ty::int(), Ty::int()],
            Ty::string(),
        ))),
    );
    env.insert_value(
        "String.contains",
        value(Scheme::mono(Ty::fun(
            vec![Ty::string(), Ty::string()],
            Ty::bool(),
        ))),
    );
    env.insert_value(
        "String.startsWith",
        value(Scheme::mono(Ty::fun(
            vec![Ty::string(), Ty::string()],
            Ty::bool(),
        ))),
    );
    env.insert_value(
        "String.toUpperCase",
        value(Scheme::mono(Ty::fun(vec![Ty::string()], Ty::string()))),
    );
    env.insert_value(
        "String.toLowerCase",
        value(Scheme::mono(Ty::fun(vec![Ty::string()], Ty::string()))),
    );
    env.insert_value(
        "String.trim",
        value(Scheme::mono(Ty::fun(vec![Ty::string()], Ty::string()))),
    );
    env.insert_value(
        "String.split",
        value(Scheme::mono(Ty::fun(
            vec![Ty::string(), Ty::string()],
            Ty::list(Ty::string()),
        ))),
    );

    // ── Int ─────────────────────────────────────────────────────────
    env.insert_value(
        "Int.toString",
        value(Scheme::mono(Ty::fun(vec![Ty::int()], Ty::string()))),
    );
    env.insert_value(
        "Int.toFloat",
        value(Scheme::mono(Ty::fun(vec![Ty::int()], Ty::float()))),
    );
    env.insert_value(
        "Int.abs",
        value(Scheme::mono(Ty::fun(vec![Ty::int()], Ty::int()))),
    );
    env.insert_value(
        "Int.min",
        value(Scheme::mono(Ty::fun(vec![Ty::int(), Ty::int()], Ty::int()))),
    );
    env.insert_value(
        "Int.max",
        value(Scheme::mono(Ty::fun(vec![Ty::int(), Ty::int()], Ty::int()))),
    );

    // ── Float ───────────────────────────────────────────────────────
    env.insert_value(
        "Float.round",
        value(Scheme::mono(Ty::fun(vec![Ty::float()], Ty::int()))),
    );
    env.insert_value(
        "Float.floor",
        value(Scheme::mono(Ty::fun(vec![Ty::float()], Ty::int()))),
    );
    env.insert_value(
        "Float.ceil",
        value(Scheme::mono(Ty::fun(vec![Ty::float()], Ty::int()))),
    );
    env.insert_value(
        "Float.abs",
        value(Scheme::mono(Ty::fun(vec![Ty::float()], Ty::float()))),
    );

    // ── Core ────────────────────────────────────────────────────────
    env.insert_value(
        "panic",
        value(Scheme::mono(Ty::fun(vec![Ty::string()], Ty::never()))),
    );
    env.insert_value(
        "ref",
        value(poly(ctx, 1, |v| {
            Ty::fun(vec![v[0].clone()], Ty::reference(v[0].clone()))
        })),
    );
    env.insert_value(
        "print",
        value(Scheme::mono(Ty::fun(vec![Ty::string()], Ty::unit()))),
    );
    env.insert_value(
        "println",
        value(Scheme::mono(Ty::fun(vec![Ty::string()], Ty::unit()))),
    );
}
