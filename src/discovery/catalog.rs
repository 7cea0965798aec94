//! Accumulator for apps observed during one refresh

use std::collections::HashMap;

use crate::models::App;

/// What to do with an existing app's primary version when a new
/// observation for the same name arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryVersion {
    /// The latest observation becomes the primary version
    Replace,
    /// The first observation stays the primary version
    Keep,
}

/// Name-keyed app map shared by all sources within a single refresh
///
/// Iteration order of the resulting apps is unspecified.
#[derive(Debug, Default)]
pub struct AppCatalog {
    apps: HashMap<String, App>,
}

impl AppCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one (name, version) observation into the catalog
    ///
    /// New names start with a single variant. Known names gain the version as
    /// a variant only if it has not been seen yet, so variants stay
    /// duplicate-free in first-seen order.
    pub fn fold(&mut self, name: &str, version: &str, primary: PrimaryVersion) {
        match self.apps.get_mut(name) {
            Some(existing) => {
                if !existing.variants.iter().any(|v| v == version) {
                    existing.variants.push(version.to_string());
                }
                if primary == PrimaryVersion::Replace {
                    existing.primary_version = version.to_string();
                }
            }
            None => {
                self.apps.insert(
                    name.to_string(),
                    App {
                        name: name.to_string(),
                        primary_version: version.to_string(),
                        variants: vec![version.to_string()],
                    },
                );
            }
        }
    }

    pub fn into_apps(self) -> Vec<App> {
        self.apps.into_values().collect()
    }
}

#[cfg(test)]
impl AppCatalog {
    pub(crate) fn get(&self, name: &str) -> Option<&App> {
        self.apps.get(name)
    }

    pub(crate) fn len(&self) -> usize {
        self.apps.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_name_creates_single_variant() {
        let mut catalog = AppCatalog::new();
        catalog.fold("web", "1.0.0", PrimaryVersion::Replace);

        let app = catalog.get("web").unwrap();
        assert_eq!(app.primary_version, "1.0.0");
        assert_eq!(app.variants, vec!["1.0.0"]);
    }

    #[test]
    fn test_replace_updates_primary_and_dedups_variants() {
        let mut catalog = AppCatalog::new();
        catalog.fold("web", "1.0.0", PrimaryVersion::Replace);
        catalog.fold("web", "2.0.0", PrimaryVersion::Replace);
        catalog.fold("web", "1.0.0", PrimaryVersion::Replace);

        let app = catalog.get("web").unwrap();
        assert_eq!(app.primary_version, "1.0.0");
        assert_eq!(app.variants, vec!["1.0.0", "2.0.0"]);
    }

    #[test]
    fn test_keep_preserves_primary() {
        let mut catalog = AppCatalog::new();
        catalog.fold("web", "1.0.0", PrimaryVersion::Replace);
        catalog.fold("web", "0.9.0", PrimaryVersion::Keep);

        let app = catalog.get("web").unwrap();
        assert_eq!(app.primary_version, "1.0.0");
        assert_eq!(app.variants, vec!["1.0.0", "0.9.0"]);
    }

    #[test]
    fn test_variants_keep_first_seen_order() {
        let mut catalog = AppCatalog::new();
        for version in ["3.0", "1.0", "2.0", "1.0", "3.0"] {
            catalog.fold("db", version, PrimaryVersion::Keep);
        }

        assert_eq!(catalog.get("db").unwrap().variants, vec!["3.0", "1.0", "2.0"]);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_into_apps() {
        let mut catalog = AppCatalog::new();
        assert!(catalog.is_empty());
        catalog.fold("a", "1", PrimaryVersion::Replace);
        catalog.fold("b", "1", PrimaryVersion::Replace);

        let mut names: Vec<String> = catalog.into_apps().into_iter().map(|a| a.name).collect();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
    }
}
