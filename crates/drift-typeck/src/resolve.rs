//! Arity-based resolution of overloaded external functions.
//!
//! Overload groups are resolved purely by argument *count*, never by
//! argument types: type-directed selection would interact with principal
//! inference, while arity alone already disambiguates the common
//! `fetch(url)` vs `fetch(url, opts)` shape. Same-arity overloads are
//! legal in the environment; only a call can make them ambiguous.

use drift_core::Loc;

use crate::env::{Binding, Env, OverloadEntry};
use crate::error::TypeError;

/// The outcome of resolving a called name.
#[derive(Debug)]
pub enum Resolution<'a> {
    /// The name binds to a plain value or a single external.
    Single(&'a Binding),
    /// Arity picked exactly one entry of an overload group.
    Overload {
        entry: &'a OverloadEntry,
        js_name: &'a str,
        from: Option<&'a str>,
        /// Position within the group; codegen emits it alongside `js_name`.
        index: usize,
    },
}

/// Resolve `name` called with `arity` arguments.
pub fn resolve_call<'a>(
    env: &'a Env,
    name: &str,
    arity: usize,
    loc: &Loc,
) -> Result<Resolution<'a>, TypeError> {
    let binding = env.lookup_value(name).ok_or_else(|| TypeError::UndefinedName {
        name: name.to_string(),
        loc: loc.clone(),
    })?;

    let (overloads, js_name, from) = match binding {
        Binding::Value { .. } | Binding::External { .. } => {
            return Ok(Resolution::Single(binding));
        }
        Binding::ExternalOverload {
            overloads,
            js_name,
            from,
            ..
        } => (overloads, js_name, from),
    };

    let mut matches = overloads
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.arity == arity);

    match (matches.next(), matches.next()) {
        (Some((index, entry)), None) => Ok(Resolution::Overload {
            entry,
            js_name,
            from: from.as_deref(),
            index,
        }),
        (Some(_), Some(_)) => Err(TypeError::OverloadAmbiguous {
            name: name.to_string(),
            arity,
            loc: loc.clone(),
        }),
        (None, _) => Err(TypeError::OverloadNoMatch {
            name: name.to_string(),
            arity,
            available: overloads.iter().map(|e| e.arity).collect(),
            loc: loc.clone(),
        }),
    }
}
