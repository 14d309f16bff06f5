//! Factory Chain - pluggable creation hooks tried before the catalog path.
//!
//! Hooks run in list order for every tag, from the top of the document down
//! to the leaves. The first hook returning a node wins and short-circuits
//! both the remaining hooks and the registry/cache path entirely (including
//! the security filter, which only guards catalog construction).

use std::sync::Arc;

use crate::component::NodeRef;
use crate::document::AttributeSet;
use crate::types::ScopeRef;

// =============================================================================
// Factory
// =============================================================================

/// One pluggable creation hook.
///
/// `parent` is the node the result would be attached under (`None` at the
/// document root). Returning `None` means "not mine, try the next hook".
pub trait Factory: Send + Sync {
    fn create(
        &self,
        parent: Option<&NodeRef>,
        tag: &str,
        scope: &ScopeRef,
        attrs: &dyn AttributeSet,
    ) -> Option<NodeRef>;
}

/// Adapt a plain closure with the simpler legacy hook shape (no parent)
/// into the chain's calling convention. Ordering semantics are unchanged:
/// the adapter occupies one chain position like any other hook.
pub fn factory_fn<F>(hook: F) -> Arc<dyn Factory>
where
    F: Fn(&str, &ScopeRef, &dyn AttributeSet) -> Option<NodeRef> + Send + Sync + 'static,
{
    Arc::new(FnFactory(hook))
}

struct FnFactory<F>(F);

impl<F> Factory for FnFactory<F>
where
    F: Fn(&str, &ScopeRef, &dyn AttributeSet) -> Option<NodeRef> + Send + Sync,
{
    fn create(
        &self,
        _parent: Option<&NodeRef>,
        tag: &str,
        scope: &ScopeRef,
        attrs: &dyn AttributeSet,
    ) -> Option<NodeRef> {
        (self.0)(tag, scope, attrs)
    }
}

// =============================================================================
// Chain
// =============================================================================

/// Ordered list of creation hooks.
///
/// Cloning snapshots the current hook list (the hooks themselves are
/// shared); child builders clone at creation time, so later mutations of
/// the parent's chain are not retroactively visible to them.
#[derive(Clone, Default)]
pub struct FactoryChain {
    hooks: Vec<Arc<dyn Factory>>,
}

impl FactoryChain {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Insert a hook at `index` (clamped), or append with `None`.
    pub fn add(&mut self, hook: Arc<dyn Factory>, index: Option<usize>) {
        let index = index.unwrap_or(self.hooks.len()).min(self.hooks.len());
        self.hooks.insert(index, hook);
    }

    /// Legacy single-hook registration: inserts at the front so it takes
    /// precedence over hooks added through [`add`](Self::add).
    pub fn set_legacy(&mut self, hook: Arc<dyn Factory>) {
        self.hooks.insert(0, hook);
    }

    /// Run the chain; first non-`None` result wins.
    pub fn create(
        &self,
        parent: Option<&NodeRef>,
        tag: &str,
        scope: &ScopeRef,
        attrs: &dyn AttributeSet,
    ) -> Option<NodeRef> {
        self.hooks
            .iter()
            .find_map(|hook| hook.create(parent, tag, scope, attrs))
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
