//! Lifecycle Hook Dispatcher - best-effort post-construction dispatch.
//!
//! Every component exposes a no-argument `finish_build` hook (default
//! no-op), so locating the hook is a plain virtual call rather than any
//! runtime ancestry walk. What remains here is the dispatch discipline:
//! the builder fires the hook exactly once per construction entry point
//! (the top-level root or an inclusion's spliced root), and a hook that
//! panics must not take the build down with it.

use std::panic::{self, AssertUnwindSafe};

use crate::component::{Component, NodeRef};

/// Invoke `finish_build` on a freshly built subtree root.
///
/// Panics from the hook are swallowed and logged; this hook is bookkeeping,
/// not correctness-critical, and never fails a build.
pub fn dispatch_finish_build(node: &NodeRef) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| node.finish_build()));
    if let Err(payload) = outcome {
        log::warn!(
            "finish_build hook panicked for `{}`: {}",
            node.type_name(),
            describe_panic(payload.as_ref())
        );
    }
}

fn describe_panic(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
