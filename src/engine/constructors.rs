//! Constructor Cache - memoized resolution of qualified names.
//!
//! Resolving a qualified name means finding its catalog descriptor and its
//! construction handle. Both are cached here, keyed by the exact qualified
//! name string, so that different builders (and repeated builds) never redo
//! the lookup. The cache records how to build a type, never whether a
//! filter allowed it; security decisions stay per-builder.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::catalog::{ComponentCatalog, ConstructFn, TypeDescriptor};
use crate::error::ResolveError;

// =============================================================================
// Cache Entry
// =============================================================================

/// One successfully resolved qualified name.
#[derive(Clone)]
pub struct ResolvedConstructor {
    pub descriptor: TypeDescriptor,
    pub handle: ConstructFn,
}

impl std::fmt::Debug for ResolvedConstructor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedConstructor")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Cache
// =============================================================================

/// Process-wide memo of qualified name → construction handle.
pub struct ConstructorCache {
    entries: Mutex<HashMap<String, ResolvedConstructor>>,
}

impl ConstructorCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a qualified name, populating the cache on first use.
    ///
    /// Repeated resolutions of one name return clones sharing the same
    /// handle `Arc`.
    pub fn resolve(
        &self,
        qualified_name: &str,
        catalog: &ComponentCatalog,
    ) -> Result<ResolvedConstructor, ResolveError> {
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get(qualified_name) {
            return Ok(entry.clone());
        }

        let descriptor = catalog
            .lookup(qualified_name)
            .ok_or(ResolveError::TypeNotFound)?;
        let handle = descriptor
            .construct_handle()
            .cloned()
            .ok_or(ResolveError::NoMatchingConstructor)?;

        log::trace!("caching constructor for `{qualified_name}`");
        let entry = ResolvedConstructor { descriptor, handle };
        entries.insert(qualified_name.to_string(), entry.clone());
        Ok(entry)
    }

    /// Whether a name has already been resolved.
    pub fn contains(&self, qualified_name: &str) -> bool {
        self.entries.lock().contains_key(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for ConstructorCache {
    fn default() -> Self {
        Self::new()
    }
}
