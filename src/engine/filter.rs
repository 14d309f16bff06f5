//! Security Filter Slot - pluggable allow-list over resolved types.
//!
//! Each builder carries one optional filter predicate judging
//! `(tag name, qualified name)` pairs. Decisions are memoized per tag name,
//! not per qualified name: two shortcuts resolving to the same type are
//! judged independently, matching the source engine.
//!
//! The decision cache is scoped to the filter's identity. Installing a new
//! filter (or clearing the slot) discards every prior decision, so a tag
//! allowed under filter A is re-evaluated under filter B.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

// =============================================================================
// Predicate
// =============================================================================

/// Filter predicate over `(tag name, qualified name)`. `true` allows
/// construction.
pub type FilterPredicate = Arc<dyn Fn(&str, &str) -> bool + Send + Sync>;

// =============================================================================
// Slot
// =============================================================================

struct FilterState {
    predicate: FilterPredicate,
    decisions: HashMap<String, bool>,
}

/// One builder's filter slot. Empty by default; nothing is cached while no
/// filter is installed.
pub struct FilterSlot {
    state: Mutex<Option<FilterState>>,
}

impl FilterSlot {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }

    /// Install or clear the filter. Either way the decision cache starts
    /// fresh.
    pub fn set(&self, predicate: Option<FilterPredicate>) {
        *self.state.lock() = predicate.map(|predicate| FilterState {
            predicate,
            decisions: HashMap::new(),
        });
    }

    /// The installed predicate, if any.
    pub fn get(&self) -> Option<FilterPredicate> {
        self.state.lock().as_ref().map(|s| s.predicate.clone())
    }

    /// Judge a resolved tag. Always `true` without a filter; with one, the
    /// predicate runs at most once per tag name.
    pub fn check_allowed(&self, tag: &str, qualified_name: &str) -> bool {
        let predicate = {
            let state = self.state.lock();
            let Some(state) = state.as_ref() else {
                return true;
            };
            if let Some(allowed) = state.decisions.get(tag) {
                return *allowed;
            }
            state.predicate.clone()
        };

        // The predicate runs outside the lock so it may inspect the builder.
        let allowed = predicate(tag, qualified_name);

        let mut state = self.state.lock();
        if let Some(state) = state.as_mut() {
            // A concurrent set() discards the slot; only memoize decisions
            // made under the filter that is still installed.
            if Arc::ptr_eq(&state.predicate, &predicate) {
                state.decisions.insert(tag.to_string(), allowed);
            }
        }
        allowed
    }
}

impl Default for FilterSlot {
    fn default() -> Self {
        Self::new()
    }
}
