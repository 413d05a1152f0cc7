//! Event handler capability
//!
//! Handlers are caller-owned `'static` objects. Any bound state a handler
//! needs (a channel to signal, a counter) lives inside the handler itself.

use core::fmt;

use crate::pin::{Pin, Trigger};

/// Receiver of pin events
///
/// Called from interrupt context, outside the driver's critical section,
/// so implementations may call back into the driver.
pub trait EventHandler: Sync {
    /// A trigger fired on `pin`
    fn on_event(&self, pin: Pin, trigger: Trigger);
}

impl<F> EventHandler for F
where
    F: Fn(Pin, Trigger) + Sync,
{
    fn on_event(&self, pin: Pin, trigger: Trigger) {
        self(pin, trigger)
    }
}

/// Registered handler
///
/// Compares by identity: two references are equal when they point at the
/// same handler object.
#[derive(Clone, Copy)]
pub struct HandlerRef(&'static dyn EventHandler);

impl HandlerRef {
    /// Wrap a handler
    pub const fn new(handler: &'static dyn EventHandler) -> Self {
        Self(handler)
    }

    /// Deliver an event
    pub fn call(&self, pin: Pin, trigger: Trigger) {
        self.0.on_event(pin, trigger)
    }
}

impl PartialEq for HandlerRef {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::addr_eq(self.0, other.0)
    }
}

impl Eq for HandlerRef {}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandlerRef({:p})", self.0 as *const dyn EventHandler)
    }
}

/// Requested per-pin handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandlerConfig {
    /// Handler to install; `None` removes the current one
    pub handler: Option<HandlerRef>,
}

impl HandlerConfig {
    /// Install `handler` for the pin
    pub const fn new(handler: &'static dyn EventHandler) -> Self {
        Self {
            handler: Some(HandlerRef::new(handler)),
        }
    }

    /// Remove the pin's handler (events fall back to the global handler)
    pub const fn none() -> Self {
        Self { handler: None }
    }
}

/// A resolved event: which pin fired and why
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinEvent {
    /// Pin that triggered
    pub pin: Pin,
    /// Trigger that led to the event
    pub trigger: Trigger,
}

impl PinEvent {
    /// Create an event
    pub const fn new(pin: Pin, trigger: Trigger) -> Self {
        Self { pin, trigger }
    }
}

/// Pick the handler for an event: the pin's own, else the global fallback
pub fn select_handler(
    pin_handler: Option<HandlerRef>,
    global: Option<HandlerRef>,
) -> Option<HandlerRef> {
    pin_handler.or(global)
}
