//! Deferred Slot - on-demand expansion of a referenced document.
//!
//! A lightweight placeholder node: it records a document reference at
//! construction and nothing else happens until someone calls
//! [`expand`](DeferredSlot::expand), which builds the referenced document
//! through the builder that constructed the slot. This is the one node
//! kind the builder injects a back-reference into after construction.
//!
//! Expansion consumes the stored reference; a slot expands at most once.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use crate::builder::Inflater;
use crate::component::{Component, NodeRef};
use crate::document::{AttributeSet, INCLUDE_REFERENCE_ATTRIBUTE};
use crate::engine::ComponentCatalog;
use crate::error::BuildError;
use crate::types::{DocumentHandle, LayoutParams, ScopeRef, Visibility};

// =============================================================================
// Deferred Slot
// =============================================================================

/// Placeholder component that expands a referenced document on demand.
pub struct DeferredSlot {
    reference: RefCell<Option<DocumentHandle>>,
    builder: RefCell<Option<Arc<Inflater>>>,
    assigned_id: RefCell<Option<String>>,
    visibility: Cell<Visibility>,
    layout_params: RefCell<Option<LayoutParams>>,
}

impl DeferredSlot {
    pub fn new(reference: Option<DocumentHandle>) -> Self {
        Self {
            reference: RefCell::new(reference),
            builder: RefCell::new(None),
            assigned_id: RefCell::new(None),
            visibility: Cell::new(Visibility::Visible),
            layout_params: RefCell::new(None),
        }
    }

    /// Construct from a tag's attributes, reading the same reference
    /// attribute the inclusion tag uses.
    pub fn from_attrs(_scope: &ScopeRef, attrs: &dyn AttributeSet) -> Self {
        let reference = attrs
            .get(INCLUDE_REFERENCE_ATTRIBUTE)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(DocumentHandle::new);
        Self::new(reference)
    }

    /// Register this component under `qualified_name` in a catalog.
    pub fn register(catalog: &ComponentCatalog, qualified_name: impl Into<String>) {
        catalog.register(qualified_name, |scope, attrs| {
            Ok(Rc::new(DeferredSlot::from_attrs(scope, attrs)) as NodeRef)
        });
    }

    /// The still-unconsumed document reference, if any.
    pub fn reference(&self) -> Option<DocumentHandle> {
        self.reference.borrow().clone()
    }

    /// The builder injected after construction, if any.
    pub fn builder(&self) -> Option<Arc<Inflater>> {
        self.builder.borrow().clone()
    }

    /// Build the referenced document, detached, consuming the reference.
    ///
    /// Fails with [`BuildError::DeferredSlotNotReady`] before a builder was
    /// injected or after the reference was consumed. The caller decides how
    /// to swap the result in for the slot.
    pub fn expand(&self) -> Result<NodeRef, BuildError> {
        let builder = self
            .builder
            .borrow()
            .clone()
            .ok_or(BuildError::DeferredSlotNotReady)?;
        let reference = self
            .reference
            .borrow_mut()
            .take()
            .ok_or(BuildError::DeferredSlotNotReady)?;
        builder.build(&reference, None, false)
    }
}

impl Component for DeferredSlot {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &str {
        "deferred-slot"
    }

    fn set_layout_params(&self, params: LayoutParams) {
        *self.layout_params.borrow_mut() = Some(params);
    }

    fn layout_params(&self) -> Option<LayoutParams> {
        self.layout_params.borrow().clone()
    }

    fn set_assigned_id(&self, id: &str) {
        *self.assigned_id.borrow_mut() = Some(id.to_string());
    }

    fn assigned_id(&self) -> Option<String> {
        self.assigned_id.borrow().clone()
    }

    fn set_visibility(&self, visibility: Visibility) {
        self.visibility.set(visibility);
    }

    fn visibility(&self) -> Visibility {
        self.visibility.get()
    }

    fn attach_builder(&self, builder: &Arc<Inflater>) {
        *self.builder.borrow_mut() = Some(builder.clone());
    }
}
