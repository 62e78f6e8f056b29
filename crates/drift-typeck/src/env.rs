//! The type environment and the environment builder.
//!
//! `Env` maps value names to bindings and type names to definitions. It is
//! extended by *functional update*: inference never mutates an environment
//! it was handed, so a snapshot taken before a declaration stays valid
//! after it. The builder seeds the built-ins and ingests user `type`,
//! `external type`, and `external` declarations, merging repeated
//! `external` names into overload groups.

use drift_core::{CoreDecl, CoreModule, CoreTypeExpr, Loc};
use rustc_hash::FxHashMap;

use crate::annot::convert_type_expr;
use crate::builtins;
use crate::error::TypeError;
use crate::ty::{Scheme, Ty, TyVar};
use crate::unify::{quantify, InferCtx};

/// One entry of an external overload group.
#[derive(Clone, Debug)]
pub struct OverloadEntry {
    pub scheme: Scheme,
    /// Parameter count of the entry's function type; resolution key.
    pub arity: usize,
    pub loc: Loc,
}

/// What a value name is bound to.
#[derive(Clone, Debug)]
pub enum Binding {
    /// A user-defined or inferred name.
    Value { scheme: Scheme, loc: Loc },
    /// A single externally declared function or value.
    External {
        scheme: Scheme,
        js_name: String,
        from: Option<String>,
        loc: Loc,
    },
    /// Two or more external declarations sharing one name, distinguished
    /// by arity at call sites.
    ExternalOverload {
        overloads: Vec<OverloadEntry>,
        js_name: String,
        from: Option<String>,
        loc: Loc,
    },
}

impl Binding {
    /// The scheme of a non-overloaded binding.
    pub fn scheme(&self) -> Option<&Scheme> {
        match self {
            Binding::Value { scheme, .. } | Binding::External { scheme, .. } => Some(scheme),
            Binding::ExternalOverload { .. } => None,
        }
    }
}

/// A registered type definition (`type` or `external type`).
#[derive(Clone, Debug)]
pub struct TypeDef {
    pub name: String,
    /// Named type parameters, e.g. `["a"]` for `Option<a>`.
    pub params: Vec<String>,
    /// The definition body; `None` for opaque external types.
    pub body: Option<Ty>,
    pub loc: Loc,
}

/// The type environment.
#[derive(Clone, Debug, Default)]
pub struct Env {
    values: FxHashMap<String, Binding>,
    types: FxHashMap<String, TypeDef>,
}

impl Env {
    pub fn new() -> Self {
        Env::default()
    }

    /// Insert a value binding in place. Builder-side API; inference uses
    /// the functional [`Env::with_value`] instead.
    pub fn insert_value(&mut self, name: impl Into<String>, binding: Binding) {
        self.values.insert(name.into(), binding);
    }

    pub fn insert_type(&mut self, def: TypeDef) {
        self.types.insert(def.name.clone(), def);
    }

    pub fn lookup_value(&self, name: &str) -> Option<&Binding> {
        self.values.get(name)
    }

    pub fn lookup_type(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// All value bindings; exhaustiveness scans these for constructors.
    pub fn values(&self) -> impl Iterator<Item = (&String, &Binding)> {
        self.values.iter()
    }

    /// Extend with one value binding, leaving `self` untouched.
    pub fn with_value(&self, name: impl Into<String>, binding: Binding) -> Env {
        let mut next = self.clone();
        next.values.insert(name.into(), binding);
        next
    }

    /// Extend with a monomorphic value binding.
    pub fn with_mono(&self, name: impl Into<String>, ty: Ty, loc: Loc) -> Env {
        self.with_value(
            name,
            Binding::Value {
                scheme: Scheme::mono(ty),
                loc,
            },
        )
    }

    /// Extend with several monomorphic value bindings at once.
    pub fn with_monos(&self, bindings: impl IntoIterator<Item = (String, Ty, Loc)>) -> Env {
        let mut next = self.clone();
        for (name, ty, loc) in bindings {
            next.values.insert(
                name,
                Binding::Value {
                    scheme: Scheme::mono(ty),
                    loc,
                },
            );
        }
        next
    }

    /// Free variables of every scheme in the environment. Spec-level
    /// definition of the non-generalizable set; the level discipline makes
    /// computing it unnecessary during inference, but tests use it to
    /// cross-check generalization.
    pub fn free_vars(&self) -> Vec<TyVar> {
        let mut out = Vec::new();
        for binding in self.values.values() {
            match binding {
                Binding::Value { scheme, .. } | Binding::External { scheme, .. } => {
                    out.extend(scheme.free_vars());
                }
                Binding::ExternalOverload { overloads, .. } => {
                    for entry in overloads {
                        out.extend(entry.scheme.free_vars());
                    }
                }
            }
        }
        let mut seen = rustc_hash::FxHashSet::default();
        out.retain(|v| seen.insert(*v));
        out
    }
}

// ── Environment Builder ────────────────────────────────────────────────

/// Build the initial environment for a module: built-ins, then user type
/// and external declarations in source order (user names override
/// built-ins, last write wins).
///
/// Malformed overload groups produce diagnostics and are not registered;
/// inference then reports uses of the name as undefined, which is the
/// continue-on-declaration-boundary policy applied to the builder.
pub fn build_env(ctx: &mut InferCtx, module: &CoreModule) -> (Env, Vec<TypeError>) {
    let mut env = Env::new();
    let mut errors = Vec::new();

    builtins::register_builtins(ctx, &mut env);

    // External declarations sharing a name form one overload group; all
    // other declarations register individually, in order.
    let mut external_groups: Vec<(String, Vec<&CoreDecl>)> = Vec::new();
    for decl in &module.declarations {
        match decl {
            CoreDecl::Type {
                name,
                params,
                body,
                loc,
            } => register_type_decl(ctx, &mut env, name, params, Some(body), loc),
            CoreDecl::ExternalType {
                name,
                params,
                body,
                loc,
            } => register_type_decl(ctx, &mut env, name, params, body.as_ref(), loc),
            CoreDecl::External { name, .. } => {
                match external_groups.iter_mut().find(|(n, _)| n.as_str() == name) {
                    Some((_, group)) => group.push(decl),
                    None => external_groups.push((name.clone(), vec![decl])),
                }
            }
            CoreDecl::Let { .. } | CoreDecl::LetRecGroup { .. } | CoreDecl::Import { .. } => {}
        }
    }

    for (name, group) in external_groups {
        match build_external_binding(ctx, &name, &group) {
            Ok(binding) => env.insert_value(name, binding),
            Err(errs) => errors.extend(errs),
        }
    }

    (env, errors)
}

/// Register a `type` / `external type` declaration and, when the body is a
/// variant, its constructors as polymorphic value schemes.
fn register_type_decl(
    ctx: &mut InferCtx,
    env: &mut Env,
    name: &str,
    params: &[String],
    body: Option<&CoreTypeExpr>,
    loc: &Loc,
) {
    let mut vars: FxHashMap<String, Ty> = FxHashMap::default();
    for param in params {
        let fresh = ctx.fresh_var();
        vars.insert(param.clone(), fresh);
    }

    let body_ty = body.map(|b| convert_type_expr(ctx, b, &mut vars));

    let param_vars: Vec<TyVar> = params
        .iter()
        .filter_map(|p| match vars.get(p) {
            Some(Ty::Var(v)) => Some(*v),
            _ => None,
        })
        .collect();

    // Constructors of a variant body become callable (and matchable)
    // values returning the applied type.
    if let Some(Ty::Variant(ctors)) = &body_ty {
        let result = if params.is_empty() {
            Ty::app(name, vec![])
        } else {
            Ty::app(name, param_vars.iter().map(|v| Ty::Var(*v)).collect())
        };
        for (ctor_name, payload) in ctors {
            let ctor_ty = if payload.is_empty() {
                result.clone()
            } else {
                Ty::fun(payload.clone(), result.clone())
            };
            env.insert_value(
                ctor_name.clone(),
                Binding::Value {
                    scheme: quantify(&param_vars, &ctor_ty),
                    loc: loc.clone(),
                },
            );
        }
    }

    env.insert_type(TypeDef {
        name: name.to_string(),
        params: params.to_vec(),
        body: body_ty,
        loc: loc.clone(),
    });
}

/// Build the binding for one external name: a single `External`, or an
/// `ExternalOverload` when the name was declared more than once.
fn build_external_binding(
    ctx: &mut InferCtx,
    name: &str,
    group: &[&CoreDecl],
) -> Result<Binding, Vec<TypeError>> {
    let mut entries = Vec::new();
    for decl in group {
        let CoreDecl::External {
            type_expr,
            js_name,
            from,
            loc,
            ..
        } = decl
        else {
            unreachable!("external group built from External declarations");
        };
        let mut vars: FxHashMap<String, Ty> = FxHashMap::default();
        let ty = convert_type_expr(ctx, type_expr, &mut vars);
        let named: Vec<TyVar> = vars
            .values()
            .filter_map(|t| match t {
                Ty::Var(v) => Some(*v),
                _ => None,
            })
            .collect();
        let scheme = quantify(&named, &ty);
        entries.push((scheme, js_name.clone(), from.clone(), loc.clone()));
    }

    if entries.len() == 1 {
        let (scheme, js_name, from, loc) = entries.pop().expect("one entry");
        return Ok(Binding::External {
            scheme,
            js_name,
            from,
            loc,
        });
    }

    // Overload group: same jsName, same source module, function types only.
    let mut errors = Vec::new();
    let (_, first_js, first_from, group_loc) = entries[0].clone();
    let mut overloads = Vec::new();
    for (scheme, js_name, from, loc) in &entries {
        if *js_name != first_js {
            errors.push(TypeError::OverloadInconsistentJsName {
                name: name.to_string(),
                expected: first_js.clone(),
                found: js_name.clone(),
                loc: loc.clone(),
            });
        }
        if *from != first_from {
            errors.push(TypeError::OverloadInconsistentFrom {
                name: name.to_string(),
                loc: loc.clone(),
            });
        }
        match &scheme.ty {
            Ty::Fun(params, _) => overloads.push(OverloadEntry {
                scheme: scheme.clone(),
                arity: params.len(),
                loc: loc.clone(),
            }),
            other => errors.push(TypeError::OverloadNonFunction {
                name: name.to_string(),
                found: other.clone(),
                loc: loc.clone(),
            }),
        }
    }

    if errors.is_empty() {
        Ok(Binding::ExternalOverload {
            overloads,
            js_name: first_js,
            from: first_from,
            loc: group_loc,
        })
    } else {
        Err(errors)
    }
}
