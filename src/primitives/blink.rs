//! Blink Container - time-toggled visibility.
//!
//! A normal container for child-processing purposes, with one twist: while
//! attached to a live tree it flips an internal visible/invisible flag on a
//! fixed period, and reports its children as paintable only during the
//! visible phase. The timer thread starts on attach, stops on detach, and
//! restarts on reattach; detached containers always read as visible.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::component::{Component, Container, NodeFlags, NodeRef};
use crate::types::{LayoutParams, TAG_BLINK, Visibility};

/// Toggle period of the `blink` control tag.
pub const BLINK_PERIOD_MS: u64 = 500;

// =============================================================================
// Blink Container
// =============================================================================

/// The container constructed for the `blink` control tag.
pub struct BlinkContainer {
    children: RefCell<Vec<NodeRef>>,
    flags: Cell<NodeFlags>,
    assigned_id: RefCell<Option<String>>,
    visibility: Cell<Visibility>,
    layout_params: RefCell<Option<LayoutParams>>,
    period: Duration,
    /// Blink phase, toggled from the timer thread.
    phase_visible: Arc<AtomicBool>,
    /// Tells the timer thread to keep going.
    running: Arc<AtomicBool>,
    timer: RefCell<Option<JoinHandle<()>>>,
}

impl BlinkContainer {
    pub fn new() -> Self {
        Self::with_period(Duration::from_millis(BLINK_PERIOD_MS))
    }

    /// A container with a custom toggle period. The markup tag always uses
    /// [`BLINK_PERIOD_MS`]; this is for embedders and tests.
    pub fn with_period(period: Duration) -> Self {
        Self {
            children: RefCell::new(Vec::new()),
            flags: Cell::new(NodeFlags::empty()),
            assigned_id: RefCell::new(None),
            visibility: Cell::new(Visibility::Visible),
            layout_params: RefCell::new(None),
            period,
            phase_visible: Arc::new(AtomicBool::new(true)),
            running: Arc::new(AtomicBool::new(false)),
            timer: RefCell::new(None),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_attached(&self) -> bool {
        self.flags.get().contains(NodeFlags::ATTACHED)
    }

    pub fn has_pending_focus(&self) -> bool {
        self.flags.get().contains(NodeFlags::PENDING_FOCUS)
    }

    /// Whether the timer is currently driving the phase.
    pub fn is_blinking(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Current blink phase. Always visible while detached.
    pub fn is_phase_visible(&self) -> bool {
        self.phase_visible.load(Ordering::SeqCst)
    }

    /// The children to paint right now: all of them during the visible
    /// phase, none during the invisible one.
    pub fn paintable_children(&self) -> Vec<NodeRef> {
        if self.is_phase_visible() {
            self.children.borrow().clone()
        } else {
            Vec::new()
        }
    }

    fn start_timer(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        self.phase_visible.store(true, Ordering::SeqCst);

        let running = Arc::clone(&self.running);
        let phase_visible = Arc::clone(&self.phase_visible);
        let period = self.period;

        let handle = thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                thread::sleep(period);
                if running.load(Ordering::SeqCst) {
                    let current = phase_visible.load(Ordering::SeqCst);
                    phase_visible.store(!current, Ordering::SeqCst);
                }
            }
        });
        *self.timer.borrow_mut() = Some(handle);
    }

    fn stop_timer(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.phase_visible.store(true, Ordering::SeqCst);
        // The thread exits on its next wakeup; joining here would block
        // detach for up to one period.
        self.timer.borrow_mut().take();
    }
}

impl Default for BlinkContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BlinkContainer {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// Component / Container
// =============================================================================

impl Component for BlinkContainer {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &str {
        TAG_BLINK
    }

    fn as_container(&self) -> Option<&dyn Container> {
        Some(self)
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

    fn on_attached(&self) {
        self.flags.set(self.flags.get() | NodeFlags::ATTACHED);
        self.start_timer();
    }

    fn on_detached(&self) {
        self.flags.set(self.flags.get() - NodeFlags::ATTACHED);
        self.stop_timer();
    }
}

impl Container for BlinkContainer {
    fn attach_child(&self, child: NodeRef, params: LayoutParams) {
        child.set_layout_params(params);
        self.children.borrow_mut().push(child);
    }

    fn detach_child(&self, child: &NodeRef) {
        let mut children = self.children.borrow_mut();
        if let Some(index) = children.iter().position(|c| Rc::ptr_eq(c, child)) {
            let removed = children.remove(index);
            drop(children);
            removed.on_detached();
        }
    }

    fn children(&self) -> Vec<NodeRef> {
        self.children.borrow().clone()
    }

    fn request_initial_focus(&self) {
        self.flags.set(self.flags.get() | NodeFlags::PENDING_FOCUS);
    }
}
