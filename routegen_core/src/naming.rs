//! Client method naming.
//!
//! Handlers named after a generic verb (`Get`, `List`, ...) read poorly on a
//! client that aggregates many controllers, so the receiver's meaningful
//! words are appended: `DefaultVersionController` + `Get` becomes
//! `GetVersion`.

use crate::types::Route;
use convert_case::{Case, Casing};
use tracing::trace;

const WELL_KNOWN_METHODS: &[&str] = &["Create", "Delete", "Inspect", "Get", "List", "Update"];
const NOISE_TOKENS: &[&str] = &["Default", "Controller"];

/// Derives a client method name from a receiver type name and a handler name.
///
/// `raw` is returned unchanged unless it is one of the well-known verbs
/// (matched case sensitively).
pub fn resolve_name(receiver: &str, raw: &str) -> String {
    if !WELL_KNOWN_METHODS.contains(&raw) {
        return raw.to_string();
    }

    let cleaned: Vec<String> = receiver
        .to_case(Case::Snake)
        .split('_')
        .filter(|token| !token.is_empty())
        .filter(|token| {
            !NOISE_TOKENS
                .iter()
                .any(|noise| noise.eq_ignore_ascii_case(token))
        })
        .map(str::to_string)
        .collect();
    if cleaned.is_empty() {
        return raw.to_case(Case::Pascal);
    }
    let cleaned = cleaned.join("_").to_case(Case::Pascal);

    format!("{}_{}", raw, cleaned).to_case(Case::Pascal)
}

/// Replaces every route's handler name with its resolved client method name.
///
/// Rust handlers are snake case, so the raw identifier is converted to
/// Pascal case before matching the verb set.
pub fn apply_names(routes: &mut [Route]) {
    for route in routes.iter_mut() {
        let raw = route.handler_name.to_case(Case::Pascal);
        let resolved = resolve_name(&route.receiver, &raw);
        trace!(
            "Resolved {}::{} to {}",
            route.receiver, route.handler_name, resolved
        );
        route.handler_name = resolved;
    }
}
