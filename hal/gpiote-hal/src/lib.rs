//! GPIOTE Hardware Abstraction Layer
//!
//! This crate defines the hardware-access capability the GPIOTE channel
//! driver calls into. Chip-specific crates implement the traits with raw
//! register accesses; the driver core never touches a register itself.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (pin wiring, handlers)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  gpiote-core (pool, pin table, dispatch)│
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  gpiote-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  gpiote-hal-  │
//!             │   nrf52840    │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::PinPort`] - Pin drive/pull/sense/level registers
//! - [`gpiote::GpiotePeripheral`] - Task/Event channel registers and interrupts
//! - [`GpioteHardware`] - Both of the above, what the driver is generic over
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O on a single pin

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod gpiote;

// Re-export key traits at crate root for convenience
pub use gpio::{Drive, InputBuffer, InputPin, Level, OutputPin, PinPort, Pull, Sense};
pub use gpiote::{
    in_interrupt_mask, EventId, GpiotePeripheral, Polarity, TaskId, MAX_IRQ_PRIORITY,
    PORT_INTERRUPT_MASK,
};

/// Complete hardware capability consumed by the driver
///
/// Implemented automatically for anything that provides both the pin port
/// and the GPIOTE peripheral.
pub trait GpioteHardware: PinPort + GpiotePeripheral {}

// Blanket implementation for types that implement both traits
impl<T: PinPort + GpiotePeripheral> GpioteHardware for T {}
