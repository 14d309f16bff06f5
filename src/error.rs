//! Error taxonomy for tree construction.
//!
//! Every failure of a [`build`](crate::builder::Inflater::build) call is one
//! of these variants. Structural and resolution errors are fatal to the
//! whole call: no partial tree is ever returned. Post-construction lifecycle
//! hook failures are deliberately absent from this taxonomy; they are caught
//! and logged, never surfaced.

use thiserror::Error;

/// Error produced by an embedding construction closure.
pub type ConstructError = Box<dyn std::error::Error + Send + Sync>;

/// Error produced by the external document cursor/source.
pub type CursorError = Box<dyn std::error::Error + Send + Sync>;

/// Error produced by layout-parameter synthesis on a parent container.
pub type LayoutParamsError = Box<dyn std::error::Error + Send + Sync>;

// =============================================================================
// Build Errors
// =============================================================================

/// Failure of one tree-construction call.
///
/// Variants carry the offending tag name and the document position reported
/// by the cursor where applicable.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The document contains no root open tag.
    #[error("document contains no root tag")]
    EmptyDocument,

    /// `flatten` appeared at the root without a container attach target and
    /// immediate attachment.
    #[error("`flatten` requires a container attach target and immediate attachment ({position})")]
    InvalidFlattenUsage { position: String },

    /// `flatten` appeared somewhere other than the document root.
    #[error("`flatten` is only valid as the document root ({position})")]
    FlattenNotAtRoot { position: String },

    /// `include` appeared at document depth 0.
    #[error("`include` cannot be the document root ({position})")]
    IncludeAtRoot { position: String },

    /// `include` appeared under a parent that cannot hold children.
    #[error("`include` needs a container-capable parent ({position})")]
    IncludeNeedsContainerParent { position: String },

    /// `include` carried no resolvable document reference.
    #[error("`include` is missing a document reference ({position})")]
    MissingIncludeReference { position: String },

    /// No shortcut or search namespace produced a known type for the tag.
    #[error("unresolved tag `{tag}` ({position})")]
    UnresolvedTag { tag: String, position: String },

    /// The qualified name is not registered in the component catalog.
    #[error("no component type registered for `{qualified}` (tag `{tag}`, {position})")]
    TypeNotFound {
        tag: String,
        qualified: String,
        position: String,
    },

    /// The catalog entry exists but carries no two-argument constructor.
    #[error("component type `{qualified}` has no (scope, attributes) constructor (tag `{tag}`, {position})")]
    NoMatchingConstructor {
        tag: String,
        qualified: String,
        position: String,
    },

    /// The construction closure itself failed; the original cause is kept.
    #[error("failed to construct `{tag}` ({position})")]
    ConstructionFailed {
        tag: String,
        position: String,
        #[source]
        source: ConstructError,
    },

    /// The installed security filter rejected the resolved type.
    #[error("tag `{tag}` (`{qualified}`) is not allowed by the installed filter ({position})")]
    NotAllowed {
        tag: String,
        qualified: String,
        position: String,
    },

    /// The builder's owner scope was dropped before the build ran.
    #[error("owner scope was dropped before the build ran")]
    ScopeDropped,

    /// The external document source failed to open or advance.
    #[error("failed to read markup document ({position})")]
    DocumentRead {
        position: String,
        #[source]
        source: CursorError,
    },

    /// A close tag arrived before any open tag.
    #[error("unexpected close tag ({position})")]
    UnexpectedCloseTag { position: String },

    /// The document ended inside an open tag that had to be consumed whole.
    #[error("document ended inside an open tag ({position})")]
    UnexpectedEndOfDocument { position: String },

    /// An attach target was supplied that cannot hold children.
    #[error("attach target cannot hold children ({position})")]
    AttachNeedsContainer { position: String },

    /// The parent container refused to synthesize layout parameters.
    #[error("could not synthesize layout parameters for `{tag}` ({position})")]
    LayoutParams {
        tag: String,
        position: String,
        #[source]
        source: LayoutParamsError,
    },

    /// A deferred-content placeholder was expanded before it received a
    /// builder back-reference, or after its reference was consumed.
    #[error("deferred slot has no builder or document reference left")]
    DeferredSlotNotReady,
}

impl BuildError {
    /// Whether this failure is a security rejection.
    ///
    /// Callers that degrade gracefully on untrusted fragments key off this
    /// rather than matching the variant directly.
    pub fn is_security_rejection(&self) -> bool {
        matches!(self, BuildError::NotAllowed { .. })
    }
}

// =============================================================================
// Resolution Errors
// =============================================================================

/// Failure of one constructor-cache resolution, before tag/position context
/// is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    TypeNotFound,
    NoMatchingConstructor,
}
