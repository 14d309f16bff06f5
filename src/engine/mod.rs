//! Resolution engine - catalog, type registry, constructor cache.
//!
//! The engine bundles the process-wide resolution machinery:
//! - Catalog: qualified name → typed construction closure
//! - TypeRegistry: shortcuts and search namespaces for unqualified tags
//! - ConstructorCache: memoized resolution results
//!
//! One `Engine` is constructed explicitly at startup (or one per test) and
//! shared by every builder through an `Arc`. All builders holding the same
//! engine share one constructor cache; none of this state records security
//! decisions, which stay per-builder.

use std::sync::Arc;

mod catalog;
mod constructors;
mod factory;
mod filter;
mod type_registry;

pub use catalog::{ComponentCatalog, ConstructFn, TypeDescriptor};
pub use constructors::{ConstructorCache, ResolvedConstructor};
pub use factory::{Factory, FactoryChain, factory_fn};
pub use filter::{FilterPredicate, FilterSlot};
pub use type_registry::TypeRegistry;

use crate::document::DocumentStore;

// =============================================================================
// Engine
// =============================================================================

/// Process-wide resolution state plus the document source, shared by all
/// builders.
pub struct Engine {
    catalog: ComponentCatalog,
    types: TypeRegistry,
    constructors: ConstructorCache,
    documents: Arc<dyn DocumentStore>,
}

impl Engine {
    /// Create an engine over the given document source, with empty tables.
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self {
            catalog: ComponentCatalog::new(),
            types: TypeRegistry::new(),
            constructors: ConstructorCache::new(),
            documents,
        }
    }

    pub fn catalog(&self) -> &ComponentCatalog {
        &self.catalog
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn constructors(&self) -> &ConstructorCache {
        &self.constructors
    }

    pub fn documents(&self) -> &Arc<dyn DocumentStore> {
        &self.documents
    }

    /// Resolve a tag name to a qualified type name, or `None` if every
    /// shortcut and namespace fails.
    pub fn resolve_tag(&self, tag: &str) -> Option<String> {
        self.types.resolve(tag, &self.constructors, &self.catalog)
    }
}
