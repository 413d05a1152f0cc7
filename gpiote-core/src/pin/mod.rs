//! Pin state
//!
//! The pin state table is the single source of truth for how every pin is
//! wired into the GPIOTE peripheral. Records are only ever replaced as a
//! whole, after the state machine has accepted a transition.

pub mod config;
pub mod record;
pub mod table;

pub use config::{Edge, InputConfig, OutputConfig, Pin, TaskConfig, Trigger, TriggerConfig};
pub use record::{Detection, PinRecord, PinState, Role, TaskBinding};
pub use table::PinTable;
