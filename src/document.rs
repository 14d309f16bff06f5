//! Document interfaces - the markup cursor and resource collaborators.
//!
//! The markup grammar itself is an external contract. The engine only
//! consumes a flat stream of open/close events from a [`DocumentCursor`]
//! and resolves document handles through a [`DocumentStore`]. Attribute
//! sets are borrowed for the duration of one tag's processing; nothing in
//! the engine retains them past the construction call.

use crate::error::CursorError;
use crate::types::DocumentHandle;

// =============================================================================
// Attributes
// =============================================================================

/// The attribute set of one tag event.
///
/// Opaque to the engine apart from named lookup; construction closures and
/// containers interpret the values.
pub trait AttributeSet {
    /// Look up an attribute value by name.
    fn get(&self, name: &str) -> Option<&str>;
}

/// Attribute carrying the referenced document of an inclusion tag, as
/// understood by the default [`DocumentStore::resolve_include_reference`].
pub const INCLUDE_REFERENCE_ATTRIBUTE: &str = "document";

// =============================================================================
// Cursor Events
// =============================================================================

/// One open-tag event from the cursor.
pub struct TagEvent {
    /// Tag name, possibly qualified.
    pub name: String,
    /// Attributes, alive for this tag's processing only.
    pub attributes: Box<dyn AttributeSet>,
    /// Human-readable position for diagnostics ("line 12" or similar).
    pub position: String,
}

/// Event stream alphabet. Cursors fold prologs, comments and text out of
/// the stream themselves.
pub enum CursorEvent {
    OpenTag(TagEvent),
    CloseTag,
    EndOfDocument,
}

/// Pull cursor over one markup document.
pub trait DocumentCursor {
    /// Advance to the next structural event.
    fn next(&mut self) -> Result<CursorEvent, CursorError>;

    /// Current position for diagnostics.
    fn position(&self) -> String;
}

// =============================================================================
// Document Store
// =============================================================================

/// Resolves document handles to cursors, and inclusion tags to handles.
///
/// Implementations may block on I/O; the engine propagates their failures
/// as structural build errors and never retries.
pub trait DocumentStore: Send + Sync {
    /// Open a cursor over the named document.
    fn open(&self, handle: &DocumentHandle) -> Result<Box<dyn DocumentCursor>, CursorError>;

    /// Extract the referenced document from an inclusion tag's attributes.
    ///
    /// `None` means absent or blank; the builder turns that into a
    /// missing-reference error at the inclusion site.
    fn resolve_include_reference(&self, attrs: &dyn AttributeSet) -> Option<DocumentHandle> {
        let value = attrs.get(INCLUDE_REFERENCE_ATTRIBUTE)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(DocumentHandle::new(value))
        }
    }
}
