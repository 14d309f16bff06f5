//! Component Catalog - typed construction closures keyed by qualified name.
//!
//! The embedding component library registers, per qualified type name, a
//! closure that builds one instance from `(owner scope, attribute set)`.
//! This replaces by-name runtime type loading while keeping the
//! "resolve by string, construct via handle" contract.
//!
//! An entry may also be registered without a constructor (a base type a
//! shortcut can point at but that cannot be built); resolving it fails with
//! a distinct error.
//!
//! # Example
//!
//! ```ignore
//! use sprig::{ComponentCatalog, NodeRef};
//! use std::rc::Rc;
//!
//! let catalog = ComponentCatalog::new();
//! catalog.register("acme.widget.Label", |scope, attrs| {
//!     Ok(Rc::new(Label::from_attrs(scope, attrs)) as NodeRef)
//! });
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::component::NodeRef;
use crate::document::AttributeSet;
use crate::error::ConstructError;
use crate::types::ScopeRef;

// =============================================================================
// Construct Handle
// =============================================================================

/// An invocable handle that builds one instance of a component type from
/// `(owner scope, attribute set)`.
///
/// Handles are shared: the constructor cache hands out the same `Arc` for
/// every resolution of one qualified name.
pub type ConstructFn =
    Arc<dyn Fn(&ScopeRef, &dyn AttributeSet) -> Result<NodeRef, ConstructError> + Send + Sync>;

// =============================================================================
// Type Descriptor
// =============================================================================

/// A registered component type: its qualified name and, when constructible,
/// its construction handle.
#[derive(Clone)]
pub struct TypeDescriptor {
    qualified_name: Arc<str>,
    construct: Option<ConstructFn>,
}

impl TypeDescriptor {
    /// Descriptor for a constructible type.
    pub fn new(qualified_name: impl AsRef<str>, construct: ConstructFn) -> Self {
        Self {
            qualified_name: Arc::from(qualified_name.as_ref()),
            construct: Some(construct),
        }
    }

    /// Descriptor for a known type that cannot be constructed from markup.
    pub fn without_constructor(qualified_name: impl AsRef<str>) -> Self {
        Self {
            qualified_name: Arc::from(qualified_name.as_ref()),
            construct: None,
        }
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn construct_handle(&self) -> Option<&ConstructFn> {
        self.construct.as_ref()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("qualified_name", &self.qualified_name)
            .field("constructible", &self.construct.is_some())
            .finish()
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// All component types the process knows how to build, keyed by qualified
/// name. Later registrations for the same name overwrite earlier ones.
pub struct ComponentCatalog {
    entries: Mutex<HashMap<String, TypeDescriptor>>,
}

impl ComponentCatalog {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Register a constructible component type.
    pub fn register<F>(&self, qualified_name: impl Into<String>, construct: F)
    where
        F: Fn(&ScopeRef, &dyn AttributeSet) -> Result<NodeRef, ConstructError>
            + Send
            + Sync
            + 'static,
    {
        let qualified_name = qualified_name.into();
        let descriptor = TypeDescriptor::new(&qualified_name, Arc::new(construct));
        self.entries.lock().insert(qualified_name, descriptor);
    }

    /// Register a pre-built descriptor (possibly constructor-less).
    pub fn register_descriptor(&self, descriptor: TypeDescriptor) {
        self.entries
            .lock()
            .insert(descriptor.qualified_name().to_string(), descriptor);
    }

    /// Look up a descriptor by qualified name.
    pub fn lookup(&self, qualified_name: &str) -> Option<TypeDescriptor> {
        self.entries.lock().get(qualified_name).cloned()
    }

    /// Whether the name denotes a known type (constructible or not).
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

impl Default for ComponentCatalog {
    fn default() -> Self {
        Self::new()
    }
}
