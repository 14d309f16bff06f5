//! Component model - the engine-facing surface of a UI component library.
//!
//! The engine builds trees out of [`Component`] trait objects. It never
//! renders, measures or dispatches events; it only needs enough surface to
//! construct, attach, override and hand trees back to the embedding library:
//! - container capability (`as_container`) for attachment and recursion
//! - layout-parameter plumbing (synthesized by parents, stored on children)
//! - inclusion overrides (`set_assigned_id`, `set_visibility`)
//! - the post-construction `finish_build` hook
//! - attach/detach notifications for timer-backed nodes

use std::any::Any;
use std::rc::Rc;
use std::sync::Arc;

use bitflags::bitflags;

use crate::builder::Inflater;
use crate::document::AttributeSet;
use crate::error::LayoutParamsError;
use crate::types::{LayoutParams, Visibility};

// =============================================================================
// Node Flags
// =============================================================================

bitflags! {
    /// Tree-membership state tracked by component implementations.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NodeFlags: u8 {
        /// The node is attached to a live tree.
        const ATTACHED = 1 << 0;
        /// The node should receive input focus once attached.
        const PENDING_FOCUS = 1 << 1;
    }
}

/// Shared handle to a constructed node.
///
/// Trees are single-threaded; nodes are reference-counted so the builder,
/// parents and callers can hold the same instance.
pub type NodeRef = Rc<dyn Component>;

// =============================================================================
// Component
// =============================================================================

/// One constructed UI node.
///
/// Everything here except `as_any` and `type_name` has a no-op default so
/// that leaf components only implement what they carry.
pub trait Component: Any {
    /// For downcasting.
    fn as_any(&self) -> &dyn Any;

    /// The qualified type name this node was built as (diagnostics only).
    fn type_name(&self) -> &str;

    /// Container capability. `Some` means the node can hold children and
    /// the builder may recurse into it.
    fn as_container(&self) -> Option<&dyn Container> {
        None
    }

    /// Store layout parameters synthesized by a (prospective) parent.
    fn set_layout_params(&self, params: LayoutParams) {
        let _ = params;
    }

    /// The last stored layout parameters, if the node keeps them.
    fn layout_params(&self) -> Option<LayoutParams> {
        None
    }

    /// Inclusion override: assign an identifier declared on the including tag.
    fn set_assigned_id(&self, id: &str) {
        let _ = id;
    }

    fn assigned_id(&self) -> Option<String> {
        None
    }

    /// Inclusion override: visibility declared on the including tag.
    fn set_visibility(&self, visibility: Visibility) {
        let _ = visibility;
    }

    fn visibility(&self) -> Visibility {
        Visibility::Visible
    }

    /// Post-construction hook, invoked once per construction entry point
    /// after the node's whole subtree is built. Panics from this hook are
    /// swallowed by the dispatcher.
    fn finish_build(&self) {}

    /// The node was attached to a live tree.
    fn on_attached(&self) {}

    /// The node was detached from a live tree.
    fn on_detached(&self) {}

    /// Back-reference injection for deferred-content placeholders that
    /// expand markup on demand later. A no-op for every other node kind.
    fn attach_builder(&self, builder: &Arc<Inflater>) {
        let _ = builder;
    }
}

impl std::fmt::Debug for dyn Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("type_name", &self.type_name())
            .finish()
    }
}

// =============================================================================
// Container
// =============================================================================

/// Capability of holding child nodes.
///
/// `synthesize_layout_params` is the layout-parameter synthesis collaborator:
/// the builder always asks the parent-to-be, never interprets attributes
/// itself.
pub trait Container {
    /// Attach a child with the parameters previously synthesized for it.
    fn attach_child(&self, child: NodeRef, params: LayoutParams);

    /// Remove a child again. Component libraries drive this during teardown;
    /// implementations call `on_detached` on the removed child.
    fn detach_child(&self, child: &NodeRef) {
        let _ = child;
    }

    /// Current children in attachment order.
    fn children(&self) -> Vec<NodeRef>;

    /// Mark this container to receive input focus once attached. Raised by
    /// the deferred-focus control tag.
    fn request_initial_focus(&self);

    /// Synthesize layout parameters for a child declared with `attrs`.
    fn synthesize_layout_params(
        &self,
        attrs: &dyn AttributeSet,
    ) -> Result<LayoutParams, LayoutParamsError> {
        let _ = attrs;
        Ok(LayoutParams::default())
    }
}
