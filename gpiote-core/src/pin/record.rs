//! Per-pin record
//!
//! The record is a tagged variant over role, trigger mechanism and channel
//! presence. Combinations the hardware cannot support (a level trigger on
//! a channel, a channel event on an output pin) are either not expressible
//! or rejected by [`PinRecord::is_consistent`].

use gpiote_hal::{InputBuffer, Level, Polarity};

use super::config::{Edge, InputConfig, OutputConfig, Trigger};
use crate::channel::Channel;
use crate::dispatch::HandlerRef;

/// Electrical role of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    /// Not managed by the driver
    Unconfigured,
    /// Input pin
    Input,
    /// Output pin
    Output,
}

/// Mechanism detecting the pin's trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Detection {
    /// No trigger
    Off,
    /// Pin sensing through the PORT event (never holds [`Trigger::None`])
    Sense(Trigger),
    /// Channel IN event
    Event {
        /// Channel wired to the pin
        channel: Channel,
        /// Detected edge
        edge: Edge,
    },
}

impl Detection {
    /// Trigger condition this detection reports
    pub fn trigger(&self) -> Trigger {
        match *self {
            Detection::Off => Trigger::None,
            Detection::Sense(trigger) => trigger,
            Detection::Event { edge, .. } => edge.trigger(),
        }
    }

    /// Channel used by the detection, if any
    pub fn channel(&self) -> Option<Channel> {
        match *self {
            Detection::Event { channel, .. } => Some(channel),
            _ => None,
        }
    }

    /// Check if the detection uses pin sensing
    pub fn is_sensing(&self) -> bool {
        matches!(self, Detection::Sense(_))
    }
}

/// OUT task bound to an output pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskBinding {
    /// Channel wired to the pin
    pub channel: Channel,
    /// OUT task action (never [`Polarity::None`])
    pub polarity: Polarity,
    /// Pin level when the task is enabled
    pub init: Level,
}

/// Role-specific pin state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// Not managed by the driver
    Unconfigured,
    /// Input pin, optionally with a trigger
    Input {
        /// Applied electrical configuration
        config: InputConfig,
        /// Trigger mechanism
        detection: Detection,
    },
    /// Output pin, optionally with a task and/or a sensing trigger
    Output {
        /// Applied electrical configuration
        config: OutputConfig,
        /// Bound OUT task
        task: Option<TaskBinding>,
        /// Trigger mechanism (sensing only)
        detection: Detection,
    },
}

/// Everything the driver knows about one pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinRecord {
    pub(crate) state: PinState,
    /// Trigger delivery enabled (`trigger_enable` called since last trigger change)
    pub(crate) enabled: bool,
    pub(crate) handler: Option<HandlerRef>,
}

impl Default for PinRecord {
    fn default() -> Self {
        Self::UNCONFIGURED
    }
}

impl PinRecord {
    /// Record of a pin the driver does not manage
    pub const UNCONFIGURED: Self = Self {
        state: PinState::Unconfigured,
        enabled: false,
        handler: None,
    };

    /// Role-specific state
    pub fn state(&self) -> &PinState {
        &self.state
    }

    /// Electrical role
    pub fn role(&self) -> Role {
        match self.state {
            PinState::Unconfigured => Role::Unconfigured,
            PinState::Input { .. } => Role::Input,
            PinState::Output { .. } => Role::Output,
        }
    }

    /// Trigger mechanism
    pub fn detection(&self) -> Detection {
        match self.state {
            PinState::Unconfigured => Detection::Off,
            PinState::Input { detection, .. } | PinState::Output { detection, .. } => detection,
        }
    }

    /// Configured trigger
    pub fn trigger(&self) -> Trigger {
        self.detection().trigger()
    }

    /// Bound OUT task, if the pin is an output with a task
    pub fn task(&self) -> Option<TaskBinding> {
        match self.state {
            PinState::Output { task, .. } => task,
            _ => None,
        }
    }

    /// Channel wired to the pin, by either an IN event or an OUT task
    pub fn channel(&self) -> Option<Channel> {
        self.detection()
            .channel()
            .or_else(|| self.task().map(|t| t.channel))
    }

    /// Check if level sensing is armed for this pin
    pub fn sensing_active(&self) -> bool {
        self.enabled && self.detection().is_sensing()
    }

    /// Check if trigger delivery is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Per-pin handler
    pub fn handler(&self) -> Option<HandlerRef> {
        self.handler
    }

    /// Check if the record is configured
    pub fn is_configured(&self) -> bool {
        !matches!(self.state, PinState::Unconfigured)
    }

    /// Check the record against the pin invariants
    pub fn is_consistent(&self) -> bool {
        if self.enabled && self.detection() == Detection::Off {
            return false;
        }
        if self.detection() == Detection::Sense(Trigger::None) {
            return false;
        }

        match self.state {
            PinState::Unconfigured => !self.enabled && self.handler.is_none(),
            PinState::Input { .. } => true,
            PinState::Output {
                config,
                task,
                detection,
            } => {
                let task_ok = task.map_or(true, |t| t.polarity != Polarity::None);
                let detection_ok = match detection {
                    Detection::Off => true,
                    Detection::Sense(_) => config.input == InputBuffer::Connect,
                    Detection::Event { .. } => false,
                };
                task_ok && detection_ok
            }
        }
    }
}
