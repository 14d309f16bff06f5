//! Type Registry - shortcuts and search namespaces for unqualified tags.
//!
//! Two resolution aids live here:
//! - explicit shortcuts: short tag name → qualified type name
//! - search namespaces: ordered prefixes probed as `prefix + "." + tag`
//!
//! Shortcuts always win over namespace search. Namespaces are probed from
//! the most recently registered backwards, so a library registered later
//! can shadow earlier ones for the tags it provides.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::catalog::ComponentCatalog;
use super::constructors::ConstructorCache;
use crate::types::QUALIFIER_SEPARATOR;

// =============================================================================
// Registry State
// =============================================================================

#[derive(Default)]
struct Tables {
    shortcuts: HashMap<String, String>,
    namespaces: Vec<String>,
}

/// Tag-name resolution tables, shared by all builders of one engine.
pub struct TypeRegistry {
    tables: Mutex<Tables>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Map a short tag name to a qualified type name.
    ///
    /// Overwrites any earlier shortcut for the same short name. The
    /// qualified name is not validated until its first use.
    pub fn register_shortcut(
        &self,
        short_name: impl Into<String>,
        qualified_name: impl Into<String>,
    ) {
        self.tables
            .lock()
            .shortcuts
            .insert(short_name.into(), qualified_name.into());
    }

    /// Append a search namespace prefix.
    ///
    /// The prefix is trimmed; empty prefixes are rejected. Re-registering an
    /// existing prefix keeps its original position.
    pub fn register_namespace(&self, prefix: &str) {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            log::warn!("ignoring empty search namespace registration");
            return;
        }
        let mut tables = self.tables.lock();
        if !tables.namespaces.iter().any(|existing| existing == prefix) {
            tables.namespaces.push(prefix.to_string());
        }
    }

    /// Registered namespaces in registration order.
    pub fn namespaces(&self) -> Vec<String> {
        self.tables.lock().namespaces.clone()
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve a tag name to a qualified type name.
    ///
    /// Already-qualified tags pass through unchanged. Unqualified tags
    /// consult the shortcut table first, then probe each namespace from
    /// last-registered to first against the constructor cache and the
    /// catalog. `None` signals "unresolved".
    pub fn resolve(
        &self,
        tag: &str,
        constructors: &ConstructorCache,
        catalog: &ComponentCatalog,
    ) -> Option<String> {
        if tag.contains(QUALIFIER_SEPARATOR) {
            return Some(tag.to_string());
        }

        let tables = self.tables.lock();
        if let Some(qualified) = tables.shortcuts.get(tag) {
            return Some(qualified.clone());
        }

        for prefix in tables.namespaces.iter().rev() {
            let candidate = format!("{prefix}{QUALIFIER_SEPARATOR}{tag}");
            if constructors.contains(&candidate) || catalog.contains(&candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::NodeRef;
    use std::any::Any;
    use std::rc::Rc;

    struct Probe;

    impl crate::component::Component for Probe {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn type_name(&self) -> &str {
            "probe"
        }
    }

    fn catalog_with(names: &[&str]) -> ComponentCatalog {
        let catalog = ComponentCatalog::new();
        for name in names {
            catalog.register(*name, |_scope, _attrs| Ok(Rc::new(Probe) as NodeRef));
        }
        catalog
    }

    #[test]
    fn test_qualified_tags_pass_through() {
        let registry = TypeRegistry::new();
        let resolved = registry.resolve(
            "acme.widget.Label",
            &ConstructorCache::new(),
            &catalog_with(&[]),
        );
        assert_eq!(resolved.as_deref(), Some("acme.widget.Label"));
    }

    #[test]
    fn test_shortcut_beats_namespace_search() {
        let registry = TypeRegistry::new();
        registry.register_shortcut("Foo", "pkg.Foo");
        registry.register_namespace("pkg2");

        let catalog = catalog_with(&["pkg.Foo", "pkg2.Foo"]);
        let resolved = registry.resolve("Foo", &ConstructorCache::new(), &catalog);
        assert_eq!(resolved.as_deref(), Some("pkg.Foo"));
    }

    #[test]
    fn test_last_registered_namespace_tried_first() {
        let registry = TypeRegistry::new();
        registry.register_namespace("a");
        registry.register_namespace("b");

        let catalog = catalog_with(&["a.Widget", "b.Widget"]);
        let resolved = registry.resolve("Widget", &ConstructorCache::new(), &catalog);
        assert_eq!(resolved.as_deref(), Some("b.Widget"));
    }

    #[test]
    fn test_namespace_normalization_and_dedup() {
        let registry = TypeRegistry::new();
        registry.register_namespace("  pkg  ");
        registry.register_namespace("pkg");
        registry.register_namespace("");
        registry.register_namespace("other");

        assert_eq!(registry.namespaces(), vec!["pkg", "other"]);
    }

    #[test]
    fn test_unresolved_tag_yields_none() {
        let registry = TypeRegistry::new();
        registry.register_namespace("pkg");
        let resolved = registry.resolve("Ghost", &ConstructorCache::new(), &catalog_with(&[]));
        assert_eq!(resolved, None);
    }
}
