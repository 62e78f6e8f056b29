//! Unification engine for Hindley-Milner type inference.
//!
//! Implements structural first-order unification with occurs check,
//! level-based generalization, and scheme instantiation. `unify` returns
//! the substitution it discovered; callers compose it onto the one they
//! are threading (see [`unify_under`]).

use drift_core::Loc;
use rustc_hash::FxHashSet;

use crate::error::TypeError;
use crate::subst::Subst;
use crate::ty::{Scheme, Ty, TyVar};

/// The inference context -- owns the fresh-variable generator, the
/// per-variable level table, and the current let-nesting level.
///
/// One context covers one type-checking run; creating a new context resets
/// variable ids, which keeps tests deterministic. Embedders that check
/// modules in parallel get disjoint id spaces for free.
pub struct InferCtx {
    /// Next fresh variable id.
    next_var: u32,
    /// Level at which each type variable was created. Indexed by `TyVar.0`.
    var_levels: Vec<u32>,
    /// Current let-nesting level for generalization.
    level: u32,
}

impl InferCtx {
    /// Create a new, empty inference context at level 0.
    pub fn new() -> Self {
        InferCtx {
            next_var: 0,
            var_levels: Vec::new(),
            level: 0,
        }
    }

    // ── Type Variable Creation ──────────────────────────────────────────

    /// Create a fresh type variable at the current level.
    pub fn fresh_var(&mut self) -> Ty {
        Ty::Var(self.fresh_tyvar())
    }

    /// Create a fresh `TyVar` at the current level.
    pub fn fresh_tyvar(&mut self) -> TyVar {
        let var = TyVar(self.next_var);
        self.next_var += 1;
        self.var_levels.push(self.level);
        var
    }

    /// The level at which `var` was born (possibly lowered since).
    pub fn var_level(&self, var: TyVar) -> u32 {
        self.var_levels.get(var.0 as usize).copied().unwrap_or(0)
    }

    fn lower_var_level(&mut self, var: TyVar, to: u32) {
        if let Some(level) = self.var_levels.get_mut(var.0 as usize) {
            if *level > to {
                *level = to;
            }
        }
    }

    /// Lower every free variable of `ty` to the current level.
    ///
    /// Called when a binding enters the environment *without* being
    /// generalized (value restriction, complex patterns): its variables are
    /// now shared state of the enclosing scope, so no later let may
    /// quantify them.
    pub fn pin_at_current_level(&mut self, ty: &Ty) {
        let level = self.level;
        for var in ty.free_vars() {
            self.lower_var_level(var, level);
        }
    }

    // ── Level Management ────────────────────────────────────────────────

    /// Enter a new let-binding level (increases nesting depth).
    pub fn enter_level(&mut self) {
        self.level += 1;
    }

    /// Leave the current let-binding level (decreases nesting depth).
    pub fn leave_level(&mut self) {
        debug_assert!(self.level > 0, "cannot leave level 0");
        self.level -= 1;
    }

    /// Current nesting level.
    pub fn current_level(&self) -> u32 {
        self.level
    }

    // ── Generalization ──────────────────────────────────────────────────

    /// Generalize a type into a polymorphic scheme.
    ///
    /// Quantifies every free variable of `ty` whose level is strictly
    /// greater than the current level -- the variables born inside the let
    /// being generalized that did not escape into the enclosing scope.
    /// `ty` must already be fully substituted.
    pub fn generalize(&self, ty: &Ty) -> Scheme {
        let vars = ty
            .free_vars()
            .into_iter()
            .filter(|v| self.var_level(*v) > self.level)
            .collect();
        Scheme {
            vars,
            ty: ty.clone(),
        }
    }

    // ── Instantiation ───────────────────────────────────────────────────

    /// Instantiate a polymorphic scheme with fresh type variables at the
    /// current level.
    ///
    /// Quantified ids never leak: each is replaced by a brand-new variable,
    /// so two instantiations of the same scheme are independent.
    pub fn instantiate(&mut self, scheme: &Scheme) -> Ty {
        if scheme.vars.is_empty() {
            return scheme.ty.clone();
        }
        let fresh: Subst = scheme
            .vars
            .iter()
            .map(|v| (*v, self.fresh_var()))
            .collect();
        fresh.apply(&scheme.ty)
    }
}

impl Default for InferCtx {
    fn default() -> Self {
        Self::new()
    }
}

// ── Unification ─────────────────────────────────────────────────────────

/// Unify two types, returning the substitution that makes them equal.
///
/// Inputs must already be applied under the caller's current substitution;
/// recursive calls keep later pairs applied under the bindings discovered
/// so far. `loc` tags any failure with the caller's source position.
pub fn unify(ctx: &mut InferCtx, a: &Ty, b: &Ty, loc: &Loc) -> Result<Subst, TypeError> {
    match (a, b) {
        // Two identical variables -- already equal.
        (Ty::Var(v1), Ty::Var(v2)) if v1 == v2 => Ok(Subst::new()),

        // Variable meets variable -- the lower-level one becomes the
        // representative, so the binding never raises a level.
        (Ty::Var(v1), Ty::Var(v2)) => {
            if ctx.var_level(*v1) <= ctx.var_level(*v2) {
                bind(ctx, *v2, a, loc)
            } else {
                bind(ctx, *v1, b, loc)
            }
        }

        // Variable meets a concrete type -- occurs check, lower levels, bind.
        (Ty::Var(v), ty) | (ty, Ty::Var(v)) => bind(ctx, *v, ty, loc),

        // Concrete constructor meets concrete constructor -- names must match.
        (Ty::Con(n), Ty::Con(m)) => {
            if n == m {
                Ok(Subst::new())
            } else {
                Err(mismatch(a, b, loc))
            }
        }

        // Function types -- params pairwise, then return types.
        (Ty::Fun(p1, r1), Ty::Fun(p2, r2)) => {
            if p1.len() != p2.len() {
                return Err(TypeError::FnArityMismatch {
                    expected: p1.len(),
                    found: p2.len(),
                    loc: loc.clone(),
                });
            }
            let mut subst = Subst::new();
            for (x, y) in p1.iter().zip(p2.iter()) {
                let s = unify(ctx, &subst.apply(x), &subst.apply(y), loc)?;
                subst = s.compose(&subst);
            }
            let s = unify(ctx, &subst.apply(r1), &subst.apply(r2), loc)?;
            Ok(s.compose(&subst))
        }

        // Type applications -- constructor, then each argument.
        (Ty::App(c1, a1), Ty::App(c2, a2)) => {
            if a1.len() != a2.len() {
                return Err(mismatch(a, b, loc));
            }
            let mut subst = unify(ctx, c1, c2, loc)?;
            for (x, y) in a1.iter().zip(a2.iter()) {
                let s = unify(ctx, &subst.apply(x), &subst.apply(y), loc)?;
                subst = s.compose(&subst);
            }
            Ok(subst)
        }

        // Records -- keysets must agree exactly, then field-wise.
        (Ty::Record(f1), Ty::Record(f2)) => {
            if f1.len() != f2.len() || !f1.keys().eq(f2.keys()) {
                return Err(mismatch(a, b, loc));
            }
            let mut subst = Subst::new();
            for (name, x) in f1 {
                let y = &f2[name];
                let s = unify(ctx, &subst.apply(x), &subst.apply(y), loc)?;
                subst = s.compose(&subst);
            }
            Ok(subst)
        }

        // Variants -- constructor sets and payload arities must agree.
        (Ty::Variant(c1), Ty::Variant(c2)) => {
            if c1.len() != c2.len() || !c1.keys().eq(c2.keys()) {
                return Err(mismatch(a, b, loc));
            }
            let mut subst = Subst::new();
            for (name, p1) in c1 {
                let p2 = &c2[name];
                if p1.len() != p2.len() {
                    return Err(mismatch(a, b, loc));
                }
                for (x, y) in p1.iter().zip(p2.iter()) {
                    let s = unify(ctx, &subst.apply(x), &subst.apply(y), loc)?;
                    subst = s.compose(&subst);
                }
            }
            Ok(subst)
        }

        // Unions are external JavaScript types: equal or nothing.
        (Ty::Union(t1), Ty::Union(t2)) => {
            if t1 == t2 {
                Ok(Subst::new())
            } else {
                Err(mismatch(a, b, loc))
            }
        }

        // Everything else is a mismatch.
        _ => Err(mismatch(a, b, loc)),
    }
}

/// Unify under an existing substitution and return the updated whole.
///
/// Applies `subst` to both sides, unifies, and composes the result onto
/// `subst`. This is the form inference uses while threading a substitution
/// through sibling expressions.
pub fn unify_under(
    ctx: &mut InferCtx,
    subst: &Subst,
    a: &Ty,
    b: &Ty,
    loc: &Loc,
) -> Result<Subst, TypeError> {
    let s = unify(ctx, &subst.apply(a), &subst.apply(b), loc)?;
    Ok(s.compose(subst))
}

/// Bind `var` to `ty`, enforcing the occurs check and the level discipline.
fn bind(ctx: &mut InferCtx, var: TyVar, ty: &Ty, loc: &Loc) -> Result<Subst, TypeError> {
    if ty.occurs(var) {
        return Err(TypeError::InfiniteType {
            var,
            ty: ty.clone(),
            loc: loc.clone(),
        });
    }
    // Every variable escaping into `var`'s scope is pinned to `var`'s
    // level, so it can no longer be generalized past that scope.
    let var_level = ctx.var_level(var);
    for free in ty.free_vars() {
        ctx.lower_var_level(free, var_level);
    }
    Ok(Subst::singleton(var, ty.clone()))
}

fn mismatch(expected: &Ty, found: &Ty, loc: &Loc) -> TypeError {
    TypeError::Mismatch {
        expected: expected.clone(),
        found: found.clone(),
        loc: loc.clone(),
    }
}

/// Free variables of `ty` whose level does not exceed `level` -- the ones
/// an enclosing let at `level` may *not* quantify.
pub fn free_vars_at_level(ctx: &InferCtx, ty: &Ty, level: u32) -> Vec<TyVar> {
    ty.free_vars()
        .into_iter()
        .filter(|v| ctx.var_level(*v) <= level)
        .collect()
}

/// Remap a scheme's quantified variables to a caller-supplied set.
///
/// The environment builder uses this to quantify external signatures over
/// exactly the named type variables of the annotation.
pub fn quantify(named: &[TyVar], ty: &Ty) -> Scheme {
    let named_set: FxHashSet<TyVar> = named.iter().copied().collect();
    let vars = ty
        .free_vars()
        .into_iter()
        .filter(|v| named_set.contains(v))
        .collect();
    Scheme {
        vars,
        ty: ty.clone(),
    }
}
