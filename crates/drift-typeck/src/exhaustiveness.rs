//! Missing-constructor analysis for `match` expressions.
//!
//! Works on the checked scrutinee type and the raw case patterns. For a
//! scrutinee of an applied variant type (`Option<Int>`, `Shape`), the
//! constructors of the type are enumerated from the environment and the
//! uncovered ones reported. Literal patterns are never analyzed for
//! coverage: a case list of only literals without a catch-all reports the
//! symbolic witness `<other values>`.

use drift_core::CorePattern;

use crate::env::{Binding, Env};
use crate::ty::{Scheme, Ty};

/// The witness used when literal case lists cannot be proven exhaustive.
pub const OTHER_VALUES: &str = "<other values>";

/// Names of constructors the case list does not cover. Empty means the
/// match is exhaustive as far as this analysis can tell.
pub fn missing_cases(env: &Env, patterns: &[CorePattern], scrutinee: &Ty) -> Vec<String> {
    // A catch-all case covers everything.
    if patterns
        .iter()
        .any(|p| matches!(p, CorePattern::Wildcard { .. } | CorePattern::Var { .. }))
    {
        return Vec::new();
    }

    // Applied variant type: compare against the type's constructor set.
    if let Ty::App(con, _) = scrutinee {
        if let Ty::Con(type_name) = con.as_ref() {
            let all = constructors_of(env, type_name);
            if !all.is_empty() {
                let mut missing: Vec<String> = all
                    .into_iter()
                    .filter(|ctor| {
                        !patterns.iter().any(|p| {
                            matches!(p, CorePattern::Variant { name, .. } if name == ctor)
                        })
                    })
                    .collect();
                missing.sort();
                return missing;
            }
        }
    }

    // Literals alone cover finitely many values of an infinite type.
    if !patterns.is_empty()
        && patterns
            .iter()
            .all(|p| matches!(p, CorePattern::Literal { .. }))
    {
        return vec![OTHER_VALUES.to_string()];
    }

    // Record patterns (and anything else) are exhaustive for their shape.
    Vec::new()
}

/// Enumerate the constructors of `type_name` by scanning environment value
/// bindings: a constructor is an uppercase, dot-free name whose scheme
/// returns an application of the type. Stdlib helpers like `List.map` are
/// excluded by the dot rule.
pub fn constructors_of(env: &Env, type_name: &str) -> Vec<String> {
    let mut out: Vec<String> = env
        .values()
        .filter(|(name, _)| {
            name.chars().next().is_some_and(|c| c.is_ascii_uppercase()) && !name.contains('.')
        })
        .filter_map(|(name, binding)| {
            let scheme = match binding {
                Binding::Value { scheme, .. } | Binding::External { scheme, .. } => scheme,
                Binding::ExternalOverload { .. } => return None,
            };
            constructs(scheme, type_name).then(|| name.clone())
        })
        .collect();
    out.sort();
    out
}

/// Whether a scheme's return head is an application of `type_name`.
fn constructs(scheme: &Scheme, type_name: &str) -> bool {
    let head = match &scheme.ty {
        Ty::Fun(_, ret) => ret.as_ref(),
        other => other,
    };
    match head {
        Ty::App(con, _) => matches!(con.as_ref(), Ty::Con(name) if name == type_name),
        _ => false,
    }
}
