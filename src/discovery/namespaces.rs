//! Namespace selector handling
//!
//! The selector is a literal comma-separated list of namespace names. It is
//! not a label selector, even though the option name suggests one.

use crate::kube::Scope;

/// Resolve the configured selector into the list calls to issue
///
/// An empty selector yields a single all-namespaces scope. Otherwise each
/// comma-separated token is trimmed and becomes one namespace scope; blank
/// tokens are dropped.
pub fn resolve_scopes(selector: &str) -> Vec<Scope> {
    let namespaces: Vec<Scope> = selector
        .split(',')
        .map(str::trim)
        .filter(|ns| !ns.is_empty())
        .map(|ns| Scope::Namespace(ns.to_string()))
        .collect();

    if namespaces.is_empty() {
        vec![Scope::All]
    } else {
        namespaces
    }
}
