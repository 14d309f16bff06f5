//! Built-in components.
//!
//! The component library proper lives in the embedding application; the two
//! node kinds defined by the engine itself are here:
//! - [`BlinkContainer`]: the time-toggled visibility container behind the
//!   `blink` control tag
//! - [`DeferredSlot`]: a placeholder that expands another document on
//!   demand, using the builder back-reference injected at construction

mod blink;
mod deferred;

pub use blink::{BLINK_PERIOD_MS, BlinkContainer};
pub use deferred::DeferredSlot;
