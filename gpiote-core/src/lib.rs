//! Board-agnostic core of the GPIOTE channel driver
//!
//! This crate contains all driver logic that does not depend on a
//! specific chip's registers:
//!
//! - Channel pool (lock-free allocation of Task/Event channels)
//! - Pin state table (per-pin role, trigger, channel and handler)
//! - Configuration state machine (legal transitions, verify-then-commit)
//! - Interrupt dispatcher (channel and port events to handlers)
//! - Driver lifecycle and configuration
//!
//! Register access goes through the [`gpiote_hal::GpioteHardware`] capability.
//!
//! # Usage
//!
//! ```ignore
//! static GPIOTE: Gpiote<MyHardware> = Gpiote::new(MyHardware::new(), GpioteConfig::NRF52840);
//!
//! GPIOTE.init(6)?;
//! let ch = GPIOTE.channel_alloc()?;
//! GPIOTE.configure_input(
//!     button,
//!     Some(InputConfig::new(Pull::Up)),
//!     Some(TriggerConfig::event(Trigger::FallingEdge, ch)),
//!     Some(HandlerConfig::new(&BUTTON_HANDLER)),
//! )?;
//! GPIOTE.trigger_enable(button, true)?;
//! ```

// std only for the host test harness and its threads
#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod channel;
pub mod config;
pub mod dispatch;
pub mod driver;
pub mod error;
pub mod pin;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use channel::{Channel, ChannelPool};
pub use config::{ConfigError, GpioteConfig};
pub use dispatch::{EventHandler, HandlerConfig, HandlerRef, PinEvent};
pub use driver::{Gpiote, GpioteInput, GpioteOutput};
pub use error::Error;
pub use pin::{
    Detection, Edge, InputConfig, OutputConfig, Pin, PinRecord, PinState, PinTable, Role,
    TaskBinding, TaskConfig, Trigger, TriggerConfig,
};

// Electrical value types callers need to build configurations
pub use gpiote_hal::{Drive, EventId, InputBuffer, Level, Polarity, Pull, TaskId};
