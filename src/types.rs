//! Core types for sprig.
//!
//! These types define the foundation that everything builds on.
//! They flow between the tree builder, the component catalog and the
//! embedding component library.

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

// =============================================================================
// Control Tags
// =============================================================================

/// Control tag whose children are spliced directly into a provided parent
/// without an intermediate wrapper node. Only valid as the document root.
pub const TAG_FLATTEN: &str = "flatten";

/// Control tag that splices the root (or flattened children) of another
/// markup document into the current tree. Never valid as the document root.
pub const TAG_INCLUDE: &str = "include";

/// Control tag that marks its enclosing container to receive initial input
/// focus. Produces no node of its own.
pub const TAG_REQUEST_FOCUS: &str = "request-focus";

/// Control tag resolved to the built-in time-toggled visibility container.
pub const TAG_BLINK: &str = "blink";

/// Separator between namespace prefixes and type names. A tag containing
/// this character is treated as already qualified.
pub const QUALIFIER_SEPARATOR: char = '.';

// =============================================================================
// Document Handle
// =============================================================================

/// Identifies one markup document to the embedding resource system.
///
/// The engine never interprets the handle; it only passes it to the
/// [`DocumentStore`](crate::document::DocumentStore) to obtain a cursor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentHandle(Arc<str>);

impl DocumentHandle {
    /// Create a handle from any string-ish name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentHandle {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for DocumentHandle {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

// =============================================================================
// Owner Scope
// =============================================================================

/// The logical context a constructed component belongs to, e.g. a screen or
/// a finer-grained sub-scope of one.
///
/// The engine never owns scopes: builders and the instance registry hold
/// `Weak` references so that dropping a scope invalidates everything keyed
/// on it without explicit deregistration.
pub trait Scope: Any + Send + Sync {
    /// For downcasting by construction closures.
    fn as_any(&self) -> &dyn Any;

    /// Short human-readable label used in diagnostics.
    fn label(&self) -> &str {
        "scope"
    }
}

/// Shared handle to an owner scope.
pub type ScopeRef = Arc<dyn Scope>;

// =============================================================================
// Visibility
// =============================================================================

/// Visibility of a constructed node.
///
/// `Hidden` keeps the node's layout slot, `Collapsed` removes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapsed,
}

impl Visibility {
    /// Parse the markup spelling used by inclusion overrides.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "visible" => Some(Self::Visible),
            "hidden" => Some(Self::Hidden),
            "collapsed" => Some(Self::Collapsed),
            _ => None,
        }
    }
}

// =============================================================================
// Layout Parameters
// =============================================================================

/// Layout parameters synthesized by a parent container for one child.
///
/// The engine treats these as opaque: it asks the parent container to
/// synthesize them from an attribute set and hands them back on attachment.
/// The flexbox style covers the common case; `extension` carries whatever
/// else a component library wants to smuggle through.
#[derive(Clone, Default)]
pub struct LayoutParams {
    pub style: taffy::Style,
    pub extension: Option<Rc<dyn Any>>,
}

impl LayoutParams {
    /// Parameters wrapping just a flexbox style.
    pub fn from_style(style: taffy::Style) -> Self {
        Self {
            style,
            extension: None,
        }
    }
}

impl fmt::Debug for LayoutParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutParams")
            .field("style", &self.style)
            .field("extension", &self.extension.as_ref().map(|_| "..."))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_handle_round_trip() {
        let handle = DocumentHandle::new("screens/main");
        assert_eq!(handle.as_str(), "screens/main");
        assert_eq!(handle, DocumentHandle::from("screens/main"));
        assert_eq!(handle.to_string(), "screens/main");
    }

    #[test]
    fn test_visibility_parse() {
        assert_eq!(Visibility::parse("visible"), Some(Visibility::Visible));
        assert_eq!(Visibility::parse(" hidden "), Some(Visibility::Hidden));
        assert_eq!(Visibility::parse("collapsed"), Some(Visibility::Collapsed));
        assert_eq!(Visibility::parse("gone"), None);
    }

    #[test]
    fn test_layout_params_default_is_plain_style() {
        let params = LayoutParams::default();
        assert!(params.extension.is_none());
        assert_eq!(params.style, taffy::Style::default());
    }
}
