//! Instance Registry - one builder per owning scope.
//!
//! Scope associations are non-owning: the registry keys entries on the
//! scope's address and keeps only a `Weak` reference, so destroying a scope
//! never requires deregistration. A lookup whose weak reference is dead (or
//! whose address was reused by a new scope) behaves as "not found" and the
//! stale entry is replaced.
//!
//! Child builders for finer-grained scopes live in a second map keyed by
//! `(parent builder, finer scope)`; they snapshot the parent's factory
//! chain and filter at creation time.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::builder::Inflater;
use crate::engine::Engine;
use crate::types::{Scope, ScopeRef};

// =============================================================================
// Registry
// =============================================================================

struct ScopeEntry {
    scope: Weak<dyn Scope>,
    inflater: Arc<Inflater>,
}

impl ScopeEntry {
    /// The cached builder, if its scope is still the given one.
    fn live_for(&self, scope: &ScopeRef) -> Option<Arc<Inflater>> {
        let current = self.scope.upgrade()?;
        Arc::ptr_eq(&current, scope).then(|| self.inflater.clone())
    }
}

/// Process-wide cache of builders, one per owning scope.
pub struct InflaterRegistry {
    engine: Arc<Engine>,
    by_scope: Mutex<HashMap<usize, ScopeEntry>>,
    children: Mutex<HashMap<(usize, usize), ScopeEntry>>,
}

impl InflaterRegistry {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
            by_scope: Mutex::new(HashMap::new()),
            children: Mutex::new(HashMap::new()),
        }
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// The builder bound to `scope`, created on first use.
    pub fn for_scope(&self, scope: &ScopeRef) -> Arc<Inflater> {
        let key = scope_key(scope);
        let mut map = self.by_scope.lock();

        if let Some(inflater) = map.get(&key).and_then(|entry| entry.live_for(scope)) {
            return inflater;
        }

        let inflater = Inflater::new(self.engine.clone(), scope);
        map.insert(
            key,
            ScopeEntry {
                scope: Arc::downgrade(scope),
                inflater: inflater.clone(),
            },
        );
        inflater
    }

    /// A builder for a finer-grained scope under `parent`, inheriting the
    /// parent's factory chain and filter as they are right now.
    pub fn child_builder_for(&self, parent: &Arc<Inflater>, finer: &ScopeRef) -> Arc<Inflater> {
        let key = (Arc::as_ptr(parent) as usize, scope_key(finer));
        let mut map = self.children.lock();

        if let Some(inflater) = map.get(&key).and_then(|entry| entry.live_for(finer)) {
            return inflater;
        }

        let inflater = parent.clone_for_scope(finer);
        map.insert(
            key,
            ScopeEntry {
                scope: Arc::downgrade(finer),
                inflater: inflater.clone(),
            },
        );
        inflater
    }

    /// Drop entries whose scope has been destroyed. Lookups already treat
    /// dead entries as "not found"; pruning lets long-lived processes shed
    /// the builders those entries keep alive.
    pub fn prune(&self) {
        self.by_scope
            .lock()
            .retain(|_, entry| entry.scope.strong_count() > 0);
        self.children
            .lock()
            .retain(|_, entry| entry.scope.strong_count() > 0);
    }

    /// Number of live scope associations (diagnostics).
    pub fn len(&self) -> usize {
        self.by_scope.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_scope.lock().is_empty()
    }
}

fn scope_key(scope: &ScopeRef) -> usize {
    Arc::as_ptr(scope) as *const () as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentCursor, DocumentStore};
    use crate::error::CursorError;
    use crate::types::DocumentHandle;
    use std::any::Any;

    struct NullStore;

    impl DocumentStore for NullStore {
        fn open(&self, _handle: &DocumentHandle) -> Result<Box<dyn DocumentCursor>, CursorError> {
            Err("no documents".into())
        }
    }

    struct TestScope;

    impl Scope for TestScope {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn registry() -> InflaterRegistry {
        InflaterRegistry::new(Arc::new(Engine::new(Arc::new(NullStore))))
    }

    #[test]
    fn test_same_scope_yields_same_builder() {
        let registry = registry();
        let scope: ScopeRef = Arc::new(TestScope);

        let first = registry.for_scope(&scope);
        let second = registry.for_scope(&scope);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_scopes_yield_distinct_builders() {
        let registry = registry();
        let a: ScopeRef = Arc::new(TestScope);
        let b: ScopeRef = Arc::new(TestScope);

        let for_a = registry.for_scope(&a);
        let for_b = registry.for_scope(&b);
        assert!(!Arc::ptr_eq(&for_a, &for_b));
    }

    #[test]
    fn test_dropped_scope_behaves_as_not_found() {
        let registry = registry();
        let scope: ScopeRef = Arc::new(TestScope);
        let stale = registry.for_scope(&scope);
        drop(scope);

        // A new scope may reuse the old address; the weak check catches it.
        let fresh_scope: ScopeRef = Arc::new(TestScope);
        let fresh = registry.for_scope(&fresh_scope);
        assert!(!Arc::ptr_eq(&stale, &fresh));
        assert!(fresh.scope().is_some());
        assert!(stale.scope().is_none());
    }

    #[test]
    fn test_prune_drops_dead_entries() {
        let registry = registry();
        let scope: ScopeRef = Arc::new(TestScope);
        let _builder = registry.for_scope(&scope);
        assert_eq!(registry.len(), 1);

        drop(scope);
        registry.prune();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_child_builder_is_cached_per_parent_and_scope() {
        let registry = registry();
        let screen: ScopeRef = Arc::new(TestScope);
        let widget: ScopeRef = Arc::new(TestScope);

        let parent = registry.for_scope(&screen);
        let first = registry.child_builder_for(&parent, &widget);
        let second = registry.child_builder_for(&parent, &widget);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &parent));
    }
}
