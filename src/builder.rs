//! Tree Builder - recursive-descent construction of component trees.
//!
//! An [`Inflater`] is bound to one owner scope and drives the whole
//! pipeline: open a document cursor, resolve each tag (factory chain →
//! type registry → constructor cache → security filter), construct the
//! node, attach it, recurse, and fire the post-construction hook on the
//! finished root.
//!
//! Four control tags get structural treatment instead of construction:
//! `flatten`, `include`, `request-focus` and `blink` (the latter resolves
//! to the built-in [`BlinkContainer`]).
//!
//! # Example
//!
//! ```ignore
//! use sprig::{Engine, InflaterRegistry};
//! use std::sync::Arc;
//!
//! let engine = Arc::new(Engine::new(documents));
//! engine.catalog().register("acme.widget.Panel", panel_constructor);
//! engine.types().register_namespace("acme.widget");
//!
//! let registry = InflaterRegistry::new(engine);
//! let inflater = registry.for_scope(&screen_scope);
//! let tree = inflater.build(&"screens/main".into(), None, false)?;
//! ```

use std::rc::Rc;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::component::{Component, Container, NodeRef};
use crate::document::{AttributeSet, CursorEvent, DocumentCursor, TagEvent};
use crate::engine::{Engine, Factory, FactoryChain, FilterPredicate, FilterSlot};
use crate::error::{BuildError, ResolveError};
use crate::lifecycle;
use crate::primitives::BlinkContainer;
use crate::types::{
    DocumentHandle, QUALIFIER_SEPARATOR, Scope, ScopeRef, TAG_BLINK, TAG_FLATTEN, TAG_INCLUDE,
    TAG_REQUEST_FOCUS, Visibility,
};

// =============================================================================
// Inflater
// =============================================================================

/// Builds component trees from markup documents, on behalf of one owner
/// scope.
///
/// Obtained from an [`InflaterRegistry`](crate::scopes::InflaterRegistry),
/// which caches one instance per scope. The factory chain and the security
/// filter are per-instance; the resolution tables and constructor cache are
/// shared through the [`Engine`].
pub struct Inflater {
    engine: Arc<Engine>,
    scope: Weak<dyn Scope>,
    factories: Mutex<FactoryChain>,
    filter: FilterSlot,
    // One top-level build at a time per inflater. Inclusion recursion stays
    // inside the held region; only `build` acquires it.
    build_lock: Mutex<()>,
}

impl Inflater {
    /// Create a builder bound to `scope`, with an empty factory chain and
    /// no filter.
    pub fn new(engine: Arc<Engine>, scope: &ScopeRef) -> Arc<Self> {
        Arc::new(Self {
            engine,
            scope: Arc::downgrade(scope),
            factories: Mutex::new(FactoryChain::new()),
            filter: FilterSlot::new(),
            build_lock: Mutex::new(()),
        })
    }

    /// Create a builder for another scope that snapshots this builder's
    /// factory chain and filter. Later changes here are not visible to the
    /// clone.
    pub fn clone_for_scope(&self, scope: &ScopeRef) -> Arc<Self> {
        let clone = Arc::new(Self {
            engine: self.engine.clone(),
            scope: Arc::downgrade(scope),
            factories: Mutex::new(self.factories.lock().clone()),
            filter: FilterSlot::new(),
            build_lock: Mutex::new(()),
        });
        clone.filter.set(self.filter.get());
        clone
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// The owner scope, while it is still alive.
    pub fn scope(&self) -> Option<ScopeRef> {
        self.scope.upgrade()
    }

    // =========================================================================
    // Factories and Filter
    // =========================================================================

    /// Insert a creation hook at `index` (appended when `None`).
    pub fn add_factory(&self, hook: Arc<dyn Factory>, index: Option<usize>) {
        self.factories.lock().add(hook, index);
    }

    /// Legacy single-hook registration; takes precedence over hooks added
    /// via [`add_factory`](Self::add_factory).
    pub fn set_factory(&self, hook: Arc<dyn Factory>) {
        self.factories.lock().set_legacy(hook);
    }

    /// Install or clear the security filter. Decisions memoized under a
    /// previous filter are discarded.
    pub fn set_filter(&self, predicate: Option<FilterPredicate>) {
        self.filter.set(predicate);
    }

    pub fn filter(&self) -> Option<FilterPredicate> {
        self.filter.get()
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Build the tree described by `document`.
    ///
    /// With `attach_target = Some(target)` and `attach_to_target = true`
    /// the built root is attached under the target and the target itself is
    /// returned. With a target but `attach_to_target = false` the detached
    /// root is returned carrying layout parameters synthesized by the
    /// target. Without a target the detached root is returned as-is.
    ///
    /// Any error aborts the whole call; no partial tree is returned.
    pub fn build(
        self: &Arc<Self>,
        document: &DocumentHandle,
        attach_target: Option<&NodeRef>,
        attach_to_target: bool,
    ) -> Result<NodeRef, BuildError> {
        let _exclusive = self.build_lock.lock();

        let scope = self.scope.upgrade().ok_or(BuildError::ScopeDropped)?;
        let mut cursor = self.open_document(document)?;
        self.build_document(&mut *cursor, attach_target, attach_to_target, &scope)
    }

    fn open_document(
        &self,
        document: &DocumentHandle,
    ) -> Result<Box<dyn DocumentCursor>, BuildError> {
        self.engine
            .documents()
            .open(document)
            .map_err(|source| BuildError::DocumentRead {
                position: format!("document `{document}`"),
                source,
            })
    }

    /// Root dispatch: seek the root tag and decide between flatten-splicing
    /// and ordinary root construction. Also applied to every included
    /// document, with the inclusion point as the target.
    fn build_document(
        self: &Arc<Self>,
        cursor: &mut dyn DocumentCursor,
        attach_target: Option<&NodeRef>,
        attach_to_target: bool,
        scope: &ScopeRef,
    ) -> Result<NodeRef, BuildError> {
        let root_event = seek_root(cursor)?;

        match root_event.name.as_str() {
            TAG_FLATTEN => {
                let target = match (attach_target, attach_to_target) {
                    (Some(target), true) => target,
                    _ => {
                        return Err(BuildError::InvalidFlattenUsage {
                            position: root_event.position,
                        });
                    }
                };
                if target.as_container().is_none() {
                    return Err(BuildError::InvalidFlattenUsage {
                        position: root_event.position,
                    });
                }
                // The children splice straight into the pre-existing target;
                // no node is built for the control tag and no lifecycle hook
                // fires.
                self.populate_children(cursor, target, scope)?;
                Ok(target.clone())
            }
            TAG_INCLUDE => Err(BuildError::IncludeAtRoot {
                position: root_event.position,
            }),
            _ => {
                let root = self.create_node(attach_target, &root_event, scope)?;

                // Layout parameters come from the root tag's own attributes,
                // synthesized by the target, before the attributes go away.
                let target_container = match attach_target {
                    Some(target) => {
                        let container = target.as_container().ok_or_else(|| {
                            BuildError::AttachNeedsContainer {
                                position: root_event.position.clone(),
                            }
                        })?;
                        let params = container
                            .synthesize_layout_params(&*root_event.attributes)
                            .map_err(|source| BuildError::LayoutParams {
                                tag: root_event.name.clone(),
                                position: root_event.position.clone(),
                                source,
                            })?;
                        Some((target, container, params))
                    }
                    None => None,
                };

                self.populate_children(cursor, &root, scope)?;
                lifecycle::dispatch_finish_build(&root);

                match target_container {
                    Some((target, container, params)) if attach_to_target => {
                        container.attach_child(root.clone(), params);
                        root.on_attached();
                        Ok(target.clone())
                    }
                    Some((_, _, params)) => {
                        root.set_layout_params(params);
                        Ok(root)
                    }
                    None => Ok(root),
                }
            }
        }
    }

    /// Process every child tag at the current depth under `parent`. Ends on
    /// the matching close tag or end of document.
    fn populate_children(
        self: &Arc<Self>,
        cursor: &mut dyn DocumentCursor,
        parent: &NodeRef,
        scope: &ScopeRef,
    ) -> Result<(), BuildError> {
        loop {
            let event = match read(cursor)? {
                CursorEvent::OpenTag(event) => event,
                CursorEvent::CloseTag | CursorEvent::EndOfDocument => return Ok(()),
            };

            match event.name.as_str() {
                TAG_REQUEST_FOCUS => {
                    // Marks the currently open container, constructs nothing,
                    // and ignores whatever was nested under it.
                    match parent.as_container() {
                        Some(container) => container.request_initial_focus(),
                        None => log::warn!(
                            "`{TAG_REQUEST_FOCUS}` under a non-container parent ({})",
                            event.position
                        ),
                    }
                    skip_subtree(cursor)?;
                }
                TAG_FLATTEN => {
                    return Err(BuildError::FlattenNotAtRoot {
                        position: event.position,
                    });
                }
                TAG_INCLUDE => {
                    self.splice_include(cursor, &event, parent, scope)?;
                }
                _ => {
                    let container = parent.as_container().ok_or_else(|| {
                        BuildError::AttachNeedsContainer {
                            position: event.position.clone(),
                        }
                    })?;
                    let child = self.create_node(Some(parent), &event, scope)?;
                    let params = container
                        .synthesize_layout_params(&*event.attributes)
                        .map_err(|source| BuildError::LayoutParams {
                            tag: event.name.clone(),
                            position: event.position.clone(),
                            source,
                        })?;
                    self.populate_children(cursor, &child, scope)?;
                    container.attach_child(child.clone(), params);
                    child.on_attached();
                }
            }
        }
    }

    /// Splice another document at the current position, per the inclusion
    /// tag's reference. The referenced document goes through full root
    /// dispatch with `parent` as the inclusion point.
    fn splice_include(
        self: &Arc<Self>,
        cursor: &mut dyn DocumentCursor,
        include_event: &TagEvent,
        parent: &NodeRef,
        scope: &ScopeRef,
    ) -> Result<(), BuildError> {
        let container =
            parent
                .as_container()
                .ok_or_else(|| BuildError::IncludeNeedsContainerParent {
                    position: include_event.position.clone(),
                })?;

        let reference = self
            .engine
            .documents()
            .resolve_include_reference(&*include_event.attributes)
            .ok_or_else(|| BuildError::MissingIncludeReference {
                position: include_event.position.clone(),
            })?;

        let mut included = self.open_document(&reference)?;
        let root_event = seek_root(&mut *included)?;

        match root_event.name.as_str() {
            TAG_FLATTEN => {
                // Flattened roots splice their children directly; the
                // including tag's overrides have nothing to land on.
                self.populate_children(&mut *included, parent, scope)?;
            }
            TAG_INCLUDE => {
                return Err(BuildError::IncludeAtRoot {
                    position: root_event.position,
                });
            }
            _ => {
                let child = self.create_node(Some(parent), &root_event, scope)?;

                // The including tag's attributes win for layout-parameter
                // synthesis; the included root's own are the fallback.
                let params = match container
                    .synthesize_layout_params(&*include_event.attributes)
                {
                    Ok(params) => params,
                    Err(_) => container
                        .synthesize_layout_params(&*root_event.attributes)
                        .map_err(|source| BuildError::LayoutParams {
                            tag: root_event.name.clone(),
                            position: root_event.position.clone(),
                            source,
                        })?,
                };

                self.populate_children(&mut *included, &child, scope)?;
                lifecycle::dispatch_finish_build(&child);
                container.attach_child(child.clone(), params);
                child.on_attached();
                apply_include_overrides(&child, &*include_event.attributes);
            }
        }

        // Content nested under the including tag itself is ignored.
        skip_subtree(cursor)
    }

    // =========================================================================
    // Single-Node Resolution
    // =========================================================================

    /// Resolve and construct one node for `event`.
    fn create_node(
        self: &Arc<Self>,
        parent: Option<&NodeRef>,
        event: &TagEvent,
        scope: &ScopeRef,
    ) -> Result<NodeRef, BuildError> {
        let tag = event.name.as_str();
        let attrs = &*event.attributes;

        // The time-toggled container is built in, resolved ahead of every
        // pluggable path.
        if tag == TAG_BLINK {
            let node: NodeRef = Rc::new(BlinkContainer::new());
            node.attach_builder(self);
            return Ok(node);
        }

        // Factory chain: first hit wins and bypasses registry and filter.
        let chain = self.factories.lock().clone();
        if let Some(node) = chain.create(parent, tag, scope, attrs) {
            node.attach_builder(self);
            return Ok(node);
        }

        // Qualified tags resolve through the cache immediately; unqualified
        // ones go through shortcuts and namespace search first, deferring
        // constructor resolution until the filter has spoken.
        let (qualified, early_resolved) = if tag.contains(QUALIFIER_SEPARATOR) {
            let resolved = self.resolve_constructor(tag, tag, &event.position)?;
            (tag.to_string(), Some(resolved))
        } else {
            let qualified =
                self.engine
                    .resolve_tag(tag)
                    .ok_or_else(|| BuildError::UnresolvedTag {
                        tag: tag.to_string(),
                        position: event.position.clone(),
                    })?;
            (qualified, None)
        };

        if !self.filter.check_allowed(tag, &qualified) {
            return Err(BuildError::NotAllowed {
                tag: tag.to_string(),
                qualified,
                position: event.position.clone(),
            });
        }

        let resolved = match early_resolved {
            Some(resolved) => resolved,
            None => self.resolve_constructor(tag, &qualified, &event.position)?,
        };

        let node =
            (resolved.handle)(scope, attrs).map_err(|source| BuildError::ConstructionFailed {
                tag: tag.to_string(),
                position: event.position.clone(),
                source,
            })?;
        node.attach_builder(self);
        Ok(node)
    }

    fn resolve_constructor(
        &self,
        tag: &str,
        qualified: &str,
        position: &str,
    ) -> Result<crate::engine::ResolvedConstructor, BuildError> {
        self.engine
            .constructors()
            .resolve(qualified, self.engine.catalog())
            .map_err(|kind| match kind {
                ResolveError::TypeNotFound => BuildError::TypeNotFound {
                    tag: tag.to_string(),
                    qualified: qualified.to_string(),
                    position: position.to_string(),
                },
                ResolveError::NoMatchingConstructor => BuildError::NoMatchingConstructor {
                    tag: tag.to_string(),
                    qualified: qualified.to_string(),
                    position: position.to_string(),
                },
            })
    }
}

// =============================================================================
// Cursor Helpers
// =============================================================================

fn read(cursor: &mut dyn DocumentCursor) -> Result<CursorEvent, BuildError> {
    cursor.next().map_err(|source| BuildError::DocumentRead {
        position: cursor.position(),
        source,
    })
}

/// Advance past the prolog to the first open tag.
fn seek_root(cursor: &mut dyn DocumentCursor) -> Result<TagEvent, BuildError> {
    match read(cursor)? {
        CursorEvent::OpenTag(event) => Ok(event),
        CursorEvent::CloseTag => Err(BuildError::UnexpectedCloseTag {
            position: cursor.position(),
        }),
        CursorEvent::EndOfDocument => Err(BuildError::EmptyDocument),
    }
}

/// Consume everything up to and including the close tag matching the open
/// tag that was just read.
fn skip_subtree(cursor: &mut dyn DocumentCursor) -> Result<(), BuildError> {
    let mut depth = 1usize;
    while depth > 0 {
        match read(cursor)? {
            CursorEvent::OpenTag(_) => depth += 1,
            CursorEvent::CloseTag => depth -= 1,
            CursorEvent::EndOfDocument => {
                return Err(BuildError::UnexpectedEndOfDocument {
                    position: cursor.position(),
                });
            }
        }
    }
    Ok(())
}

/// Apply `id`/`visibility` overrides declared on an including tag to the
/// spliced root.
fn apply_include_overrides(node: &NodeRef, attrs: &dyn AttributeSet) {
    if let Some(id) = attrs.get("id") {
        let id = id.trim();
        if !id.is_empty() {
            node.set_assigned_id(id);
        }
    }
    if let Some(value) = attrs.get("visibility") {
        match Visibility::parse(value) {
            Some(visibility) => node.set_visibility(visibility),
            None => log::warn!("ignoring unknown visibility override `{value}`"),
        }
    }
}
