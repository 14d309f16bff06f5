//! # sprig
//!
//! Markup-driven UI component tree builder.
//!
//! sprig turns a hierarchical markup description into a live tree of UI
//! component objects. The markup tokenizer, the component library and the
//! resource system are collaborators behind narrow traits; this crate owns
//! the construction pipeline:
//!
//! ```text
//! DocumentCursor → Factory Chain → Type Registry → Constructor Cache
//!                → Security Filter → construct → attach → finish_build
//! ```
//!
//! ## Architecture
//!
//! One [`Engine`] holds the process-wide resolution state (component
//! catalog, shortcut/namespace tables, constructor cache) plus the document
//! source. An [`InflaterRegistry`] caches one [`Inflater`] per owning scope
//! (weakly, so scopes can die freely); each inflater carries its own
//! factory chain and security filter.
//!
//! Four control tags are structural rather than constructed: `flatten`
//! splices a document's children into an existing container, `include`
//! splices another document, `request-focus` marks its enclosing container
//! for initial focus, and `blink` builds the time-toggled
//! [`BlinkContainer`].
//!
//! ## Example
//!
//! ```ignore
//! use sprig::{Engine, InflaterRegistry};
//! use std::sync::Arc;
//!
//! let engine = Arc::new(Engine::new(documents));
//! engine.catalog().register("acme.widget.Panel", panel_constructor);
//! engine.catalog().register("acme.widget.Label", label_constructor);
//! engine.types().register_namespace("acme.widget");
//!
//! let registry = InflaterRegistry::new(engine);
//! let inflater = registry.for_scope(&screen_scope);
//! let tree = inflater.build(&"screens/main".into(), None, false)?;
//! ```
//!
//! ## Modules
//!
//! - [`types`] - handles, scopes, visibility, layout parameters, control tags
//! - [`component`] - the engine-facing component/container traits
//! - [`document`] - cursor and document-store collaborator traits
//! - [`engine`] - catalog, type registry, constructor cache, factories, filter
//! - [`builder`] - the recursive-descent tree builder
//! - [`scopes`] - per-scope builder registry
//! - [`primitives`] - the built-in blink container and deferred slot

pub mod builder;
pub mod component;
pub mod document;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod primitives;
pub mod scopes;
pub mod types;

// Re-export commonly used items
pub use types::{
    DocumentHandle, LayoutParams, QUALIFIER_SEPARATOR, Scope, ScopeRef, TAG_BLINK, TAG_FLATTEN,
    TAG_INCLUDE, TAG_REQUEST_FOCUS, Visibility,
};

pub use component::{Component, Container, NodeFlags, NodeRef};

pub use document::{
    AttributeSet, CursorEvent, DocumentCursor, DocumentStore, INCLUDE_REFERENCE_ATTRIBUTE,
    TagEvent,
};

pub use engine::{
    ComponentCatalog, ConstructFn, ConstructorCache, Engine, Factory, FactoryChain,
    FilterPredicate, FilterSlot, ResolvedConstructor, TypeDescriptor, TypeRegistry, factory_fn,
};

pub use error::{BuildError, ConstructError, CursorError, LayoutParamsError, ResolveError};

pub use builder::Inflater;

pub use scopes::InflaterRegistry;

pub use lifecycle::dispatch_finish_build;

pub use primitives::{BLINK_PERIOD_MS, BlinkContainer, DeferredSlot};
