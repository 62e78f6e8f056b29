//! Substitutions: finite mappings from type variables to types.
//!
//! The unifier returns a `Subst`; inference threads one forward through
//! every sibling expression. Absent keys map to themselves. Composition is
//! in application order: `s2.compose(&s1)` applies `s1` first, then `s2`.

use rustc_hash::FxHashMap;

use crate::ty::{Ty, TyVar};

/// A finite mapping `TyVar -> Ty`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Subst {
    map: FxHashMap<TyVar, Ty>,
}

impl Subst {
    /// The empty (identity) substitution.
    pub fn new() -> Self {
        Subst::default()
    }

    /// A substitution with a single binding.
    pub fn singleton(var: TyVar, ty: Ty) -> Self {
        let mut map = FxHashMap::default();
        map.insert(var, ty);
        Subst { map }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn get(&self, var: TyVar) -> Option<&Ty> {
        self.map.get(&var)
    }

    pub fn contains(&self, var: TyVar) -> bool {
        self.map.contains_key(&var)
    }

    /// Apply this substitution to a type, replacing every mapped variable.
    ///
    /// Bindings are followed transitively, so the result contains no
    /// variable in this substitution's domain. Termination relies on the
    /// occurs check: the unifier never binds a variable to a type that
    /// contains it.
    pub fn apply(&self, ty: &Ty) -> Ty {
        match ty {
            Ty::Var(v) => match self.map.get(v) {
                Some(bound) => self.apply(bound),
                None => ty.clone(),
            },
            Ty::Con(_) => ty.clone(),
            Ty::Fun(params, ret) => Ty::Fun(
                params.iter().map(|p| self.apply(p)).collect(),
                Box::new(self.apply(ret)),
            ),
            Ty::App(con, args) => Ty::App(
                Box::new(self.apply(con)),
                args.iter().map(|a| self.apply(a)).collect(),
            ),
            Ty::Record(fields) => Ty::Record(
                fields
                    .iter()
                    .map(|(name, t)| (name.clone(), self.apply(t)))
                    .collect(),
            ),
            Ty::Variant(ctors) => Ty::Variant(
                ctors
                    .iter()
                    .map(|(name, payload)| {
                        (name.clone(), payload.iter().map(|t| self.apply(t)).collect())
                    })
                    .collect(),
            ),
            Ty::Union(types) => Ty::Union(types.iter().map(|t| self.apply(t)).collect()),
        }
    }

    /// Compose two substitutions in application order: the result first
    /// applies `inner`, then `self`.
    ///
    /// `s2.compose(&s1).apply(t) == s2.apply(&s1.apply(t))` for every `t`.
    pub fn compose(&self, inner: &Subst) -> Subst {
        let mut map = FxHashMap::default();
        for (var, ty) in &inner.map {
            map.insert(*var, self.apply(ty));
        }
        for (var, ty) in &self.map {
            if !inner.map.contains_key(var) {
                map.insert(*var, ty.clone());
            }
        }
        Subst { map }
    }

    /// Add a binding in place. Used by the environment builder when
    /// quantifying external signatures; the unifier goes through
    /// `singleton` + `compose` instead.
    pub fn insert(&mut self, var: TyVar, ty: Ty) {
        self.map.insert(var, ty);
    }
}

impl FromIterator<(TyVar, Ty)> for Subst {
    fn from_iter<I: IntoIterator<Item = (TyVar, Ty)>>(iter: I) -> Self {
        Subst {
            map: iter.into_iter().collect(),
        }
    }
}
