//! Pin identifiers and requested configurations

use gpiote_hal::{Drive, InputBuffer, Level, Polarity, Pull};

use crate::channel::Channel;
use crate::config::MAX_PINS;

/// Absolute pin number (`port * 32 + index`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin(pub(crate) u8);

impl Pin {
    /// Create a pin from its absolute number
    ///
    /// Returns `None` if the number is beyond the pin table.
    pub const fn new(number: u8) -> Option<Self> {
        if (number as usize) < MAX_PINS {
            Some(Self(number))
        } else {
            None
        }
    }

    /// Create a pin from a port and an index within the port
    pub const fn from_port(port: u8, index: u8) -> Option<Self> {
        let number = port as usize * 32 + index as usize;
        if index >= 32 || number >= MAX_PINS {
            return None;
        }
        Some(Self(number as u8))
    }

    /// Absolute pin number
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Port the pin belongs to
    pub const fn port(self) -> u8 {
        self.0 / 32
    }

    /// Index within the port
    pub const fn index(self) -> u8 {
        self.0 % 32
    }
}

/// Condition under which a pin produces an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// No trigger
    #[default]
    None,
    /// Low to high edge
    RisingEdge,
    /// High to low edge
    FallingEdge,
    /// Any edge
    Toggle,
    /// Pin is low
    LevelLow,
    /// Pin is high
    LevelHigh,
}

impl Trigger {
    /// Check if this is an edge trigger (usable with a channel)
    pub fn edge(self) -> Option<Edge> {
        match self {
            Trigger::RisingEdge => Some(Edge::Rising),
            Trigger::FallingEdge => Some(Edge::Falling),
            Trigger::Toggle => Some(Edge::Toggle),
            _ => None,
        }
    }

    /// Check if this is a level trigger (sensing only)
    pub fn is_level(self) -> bool {
        matches!(self, Trigger::LevelLow | Trigger::LevelHigh)
    }
}

/// Edge detected by a channel IN event
///
/// Level triggers have no channel representation, which keeps
/// "level trigger on a channel" unrepresentable in the pin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Low to high
    Rising,
    /// High to low
    Falling,
    /// Either direction
    Toggle,
}

impl Edge {
    /// Channel polarity detecting this edge
    pub const fn polarity(self) -> Polarity {
        match self {
            Edge::Rising => Polarity::LoToHi,
            Edge::Falling => Polarity::HiToLo,
            Edge::Toggle => Polarity::Toggle,
        }
    }

    /// Trigger reported to handlers
    pub const fn trigger(self) -> Trigger {
        match self {
            Edge::Rising => Trigger::RisingEdge,
            Edge::Falling => Trigger::FallingEdge,
            Edge::Toggle => Trigger::Toggle,
        }
    }
}

/// Input pin electrical configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputConfig {
    /// Pull resistor
    pub pull: Pull,
}

impl InputConfig {
    /// Create an input configuration
    pub const fn new(pull: Pull) -> Self {
        Self { pull }
    }
}

/// Output pin electrical configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputConfig {
    /// Drive strength
    pub drive: Drive,
    /// Input buffer connection (must be connected to sense an output pin)
    pub input: InputBuffer,
    /// Pull resistor, used together with the disconnecting drive modes
    pub pull: Pull,
}

impl OutputConfig {
    /// Standard drive, input disconnected, no pull
    pub const fn new() -> Self {
        Self {
            drive: Drive::S0S1,
            input: InputBuffer::Disconnect,
            pull: Pull::None,
        }
    }

    /// Same configuration with the input buffer connected
    pub const fn with_input_connected(mut self) -> Self {
        self.input = InputBuffer::Connect;
        self
    }

    /// Same configuration with another drive strength
    pub const fn with_drive(mut self, drive: Drive) -> Self {
        self.drive = drive;
        self
    }
}

/// Requested trigger for a pin
///
/// Without a channel the sensing mechanism is used; with a channel the pin
/// is wired to that channel's IN event, which only detects edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TriggerConfig {
    /// Trigger condition
    pub trigger: Trigger,
    /// Channel for the IN event, allocated by the caller
    pub channel: Option<Channel>,
}

impl TriggerConfig {
    /// Remove any trigger
    pub const fn none() -> Self {
        Self {
            trigger: Trigger::None,
            channel: None,
        }
    }

    /// Trigger through pin sensing
    pub const fn sense(trigger: Trigger) -> Self {
        Self {
            trigger,
            channel: None,
        }
    }

    /// Trigger through a channel IN event
    pub const fn event(trigger: Trigger, channel: Channel) -> Self {
        Self {
            trigger,
            channel: Some(channel),
        }
    }
}

/// Requested OUT task for an output pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskConfig {
    /// Channel for the task, allocated by the caller
    pub channel: Channel,
    /// OUT task action; [`Polarity::None`] detaches a previously bound task
    pub polarity: Polarity,
    /// Pin level when the task is enabled
    pub init: Level,
}

impl TaskConfig {
    /// Create a task configuration
    pub const fn new(channel: Channel, polarity: Polarity, init: Level) -> Self {
        Self {
            channel,
            polarity,
            init,
        }
    }

    /// Detach the task bound to the pin (the channel stays allocated)
    pub const fn detach(channel: Channel) -> Self {
        Self::new(channel, Polarity::None, Level::Low)
    }
}
