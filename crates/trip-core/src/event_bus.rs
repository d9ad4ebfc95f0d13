//! Simple event bus for decoupled communication between core services
//! and the UI.
//!
//! The bus is single-threaded (WASM constraint) and uses interior
//! mutability via RefCell. Events are buffered and drained by the UI on
//! each frame.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use trip_types::event::AppEvent;

/// Shared event bus — clone-cheap via Rc.
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<RefCell<VecDeque<AppEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// Publish an event. Called by the core services.
    pub fn emit(&self, event: AppEvent) {
        self.inner.borrow_mut().push_back(event);
    }

    /// Convenience for the transient toast notifications used on read
    /// and write failures.
    pub fn toast(&self, message: impl Into<String>, success: bool) {
        self.emit(AppEvent::Toast {
            message: message.into(),
            success,
        });
    }

    /// Drain all pending events. Called by the UI layer each frame.
    pub fn drain(&self) -> Vec<AppEvent> {
        self.inner.borrow_mut().drain(..).collect()
    }

    /// Check if there are pending events (useful for egui repaint triggers).
    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().is_empty()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
