//! Type representation for the Drift type system.
//!
//! Defines the core `Ty` enum, type variables (`TyVar`), and polymorphic
//! type schemes (`Scheme`). These form the foundation of Hindley-Milner
//! type inference.

use std::collections::BTreeMap;
use std::fmt;

/// A unification variable, identified by a `u32` id.
///
/// Ids are handed out by the inference context's fresh-variable generator
/// and are unique within one type-checking run. The let-depth (*level*) at
/// which each variable was born lives in a side table owned by the context,
/// so lowering a level never rewrites a type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TyVar(pub u32);

impl fmt::Display for TyVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// A Drift type.
///
/// - `Var`: an inference variable (to be resolved by unification)
/// - `Con`: a nullary named type (Int, String, Bool, user type names)
/// - `Fun`: an n-ary function type; curried forms are nested `Fun`s
/// - `App`: an applied type constructor (`List<Int>`, `Ref<T>`)
/// - `Record`: a structural record
/// - `Variant`: a named sum with constructor payload arities
/// - `Union`: an ad-hoc union of JavaScript types; unifies only with an
///   equal union
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ty {
    Var(TyVar),
    Con(String),
    Fun(Vec<Ty>, Box<Ty>),
    App(Box<Ty>, Vec<Ty>),
    Record(BTreeMap<String, Ty>),
    Variant(BTreeMap<String, Vec<Ty>>),
    Union(Vec<Ty>),
}

impl Ty {
    pub fn int() -> Ty {
        Ty::Con("Int".into())
    }

    pub fn float() -> Ty {
        Ty::Con("Float".into())
    }

    pub fn string() -> Ty {
        Ty::Con("String".into())
    }

    pub fn bool() -> Ty {
        Ty::Con("Bool".into())
    }

    pub fn unit() -> Ty {
        Ty::Con("Unit".into())
    }

    /// The type of expressions that never return (`panic`).
    pub fn never() -> Ty {
        Ty::Con("Never".into())
    }

    /// Create a function type.
    pub fn fun(params: Vec<Ty>, ret: Ty) -> Ty {
        Ty::Fun(params, Box::new(ret))
    }

    /// Apply a named constructor to arguments: `app("List", [Int])`.
    pub fn app(name: &str, args: Vec<Ty>) -> Ty {
        Ty::App(Box::new(Ty::Con(name.into())), args)
    }

    pub fn list(inner: Ty) -> Ty {
        Ty::app("List", vec![inner])
    }

    pub fn option(inner: Ty) -> Ty {
        Ty::app("Option", vec![inner])
    }

    pub fn result(ok: Ty, err: Ty) -> Ty {
        Ty::app("Result", vec![ok, err])
    }

    /// A mutable reference cell: `Ref<T>`.
    pub fn reference(inner: Ty) -> Ty {
        Ty::app("Ref", vec![inner])
    }

    pub fn record(fields: impl IntoIterator<Item = (String, Ty)>) -> Ty {
        Ty::Record(fields.into_iter().collect())
    }

    /// Collect the free type variables, in order of first appearance,
    /// without duplicates.
    pub fn free_vars(&self) -> Vec<TyVar> {
        let mut out = Vec::new();
        self.collect_free_vars(&mut out);
        let mut seen = rustc_hash::FxHashSet::default();
        out.retain(|v| seen.insert(*v));
        out
    }

    fn collect_free_vars(&self, out: &mut Vec<TyVar>) {
        match self {
            Ty::Var(v) => out.push(*v),
            Ty::Con(_) => {}
            Ty::Fun(params, ret) => {
                for p in params {
                    p.collect_free_vars(out);
                }
                ret.collect_free_vars(out);
            }
            Ty::App(con, args) => {
                con.collect_free_vars(out);
                for a in args {
                    a.collect_free_vars(out);
                }
            }
            Ty::Record(fields) => {
                for ty in fields.values() {
                    ty.collect_free_vars(out);
                }
            }
            Ty::Variant(ctors) => {
                for payload in ctors.values() {
                    for ty in payload {
                        ty.collect_free_vars(out);
                    }
                }
            }
            Ty::Union(types) => {
                for ty in types {
                    ty.collect_free_vars(out);
                }
            }
        }
    }

    /// Whether `var` occurs free anywhere in this type.
    pub fn occurs(&self, var: TyVar) -> bool {
        match self {
            Ty::Var(v) => *v == var,
            Ty::Con(_) => false,
            Ty::Fun(params, ret) => params.iter().any(|p| p.occurs(var)) || ret.occurs(var),
            Ty::App(con, args) => con.occurs(var) || args.iter().any(|a| a.occurs(var)),
            Ty::Record(fields) => fields.values().any(|t| t.occurs(var)),
            Ty::Variant(ctors) => ctors.values().flatten().any(|t| t.occurs(var)),
            Ty::Union(types) => types.iter().any(|t| t.occurs(var)),
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Var(v) => write!(f, "{}", v),
            Ty::Con(name) => write!(f, "{}", name),
            Ty::Fun(params, ret) => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p)?;
                }
                write!(f, ") -> {}", ret)
            }
            Ty::App(con, args) => {
                write!(f, "{}", con)?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, a) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", a)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            Ty::Record(fields) => {
                write!(f, "{{ ")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, ty)?;
                }
                write!(f, " }}")
            }
            Ty::Variant(ctors) => {
                for (i, (name, payload)) in ctors.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", name)?;
                    if !payload.is_empty() {
                        write!(f, "(")?;
                        for (j, ty) in payload.iter().enumerate() {
                            if j > 0 {
                                write!(f, ", ")?;
                            }
                            write!(f, "{}", ty)?;
                        }
                        write!(f, ")")?;
                    }
                }
                Ok(())
            }
            Ty::Union(types) => {
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", ty)?;
                }
                Ok(())
            }
        }
    }
}

/// A polymorphic type scheme: a type with universally quantified variables.
///
/// The type of `identity` is `forall a. (a) -> a`, represented as
/// `Scheme { vars: [a], ty: Fun([Var(a)], Var(a)) }`. A scheme with no
/// quantified variables is monomorphic.
#[derive(Clone, Debug, PartialEq)]
pub struct Scheme {
    /// The quantified (generic) type variables.
    pub vars: Vec<TyVar>,
    /// The underlying type (may reference vars).
    pub ty: Ty,
}

impl Scheme {
    /// Create a monomorphic scheme (no quantified variables).
    pub fn mono(ty: Ty) -> Self {
        Scheme {
            vars: Vec::new(),
            ty,
        }
    }

    /// Free variables of the scheme: free variables of the body minus the
    /// quantified ones.
    pub fn free_vars(&self) -> Vec<TyVar> {
        self.ty
            .free_vars()
            .into_iter()
            .filter(|v| !self.vars.contains(v))
            .collect()
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.vars.is_empty() {
            write!(f, "forall")?;
            for v in &self.vars {
                write!(f, " {}", v)?;
            }
            write!(f, ". ")?;
        }
        write!(f, "{}", self.ty)
    }
}
