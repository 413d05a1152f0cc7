//! Pin configuration state machine
//!
//! Decides whether a requested configuration is legal for a pin and what
//! its record looks like afterwards. Planning never touches hardware: the
//! driver only writes registers and commits the record once a plan exists.

pub mod machine;

pub use machine::{
    plan_input, plan_output, plan_trigger_enable, plan_uninit, Electrical, Transition,
};
