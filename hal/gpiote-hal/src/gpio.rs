//! GPIO pin abstractions
//!
//! Electrical configuration values for a pin, the [`PinPort`] register
//! capability, and single-pin digital I/O traits.
//!
//! Pins are addressed by absolute number: `port * 32 + index`.

/// Pull resistor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// No pull resistor
    #[default]
    None,
    /// Pull-down resistor
    Down,
    /// Pull-up resistor
    Up,
}

/// Output drive strength
///
/// Naming follows the usual `<low><high>` convention: `S` standard,
/// `H` high drive, `D` disconnected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Drive {
    /// Standard 0, standard 1
    #[default]
    S0S1,
    /// High drive 0, standard 1
    H0S1,
    /// Standard 0, high drive 1
    S0H1,
    /// High drive 0, high drive 1
    H0H1,
    /// Disconnect 0, standard 1 (wired-or)
    D0S1,
    /// Disconnect 0, high drive 1 (wired-or)
    D0H1,
    /// Standard 0, disconnect 1 (wired-and)
    S0D1,
    /// High drive 0, disconnect 1 (wired-and)
    H0D1,
}

/// Input buffer connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputBuffer {
    /// Input buffer connected, pin level can be read and sensed
    Connect,
    /// Input buffer disconnected
    #[default]
    Disconnect,
}

/// Pin sense (level detection) configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sense {
    /// Sensing disabled
    #[default]
    None,
    /// Detect when the pin is low
    Low,
    /// Detect when the pin is high
    High,
}

impl Sense {
    /// Sense level that detects `level`
    pub const fn detecting(level: Level) -> Self {
        match level {
            Level::Low => Sense::Low,
            Level::High => Sense::High,
        }
    }

    /// Check whether this sense setting detects the given level
    pub fn matches(self, level: Level) -> bool {
        matches!(
            (self, level),
            (Sense::Low, Level::Low) | (Sense::High, Level::High)
        )
    }

    /// The opposite detection level (`None` stays `None`)
    pub fn flipped(self) -> Self {
        match self {
            Sense::None => Sense::None,
            Sense::Low => Sense::High,
            Sense::High => Sense::Low,
        }
    }
}

/// Logic level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic 0
    #[default]
    Low,
    /// Logic 1
    High,
}

impl Level {
    /// Level from a boolean (`true` = high)
    pub const fn from_bool(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }

    /// Check if this is the high level
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }
}

/// Pin configuration registers
///
/// Implementations write the chip's pin configuration and data registers.
/// The driver core treats every call as trusted and side-effect-only.
pub trait PinPort {
    /// Configure the pin as an input with the input buffer connected
    ///
    /// The sense configuration of the pin is left untouched.
    fn configure_input(&mut self, pin: u8, pull: Pull);

    /// Configure the pin as an output
    fn configure_output(&mut self, pin: u8, drive: Drive, pull: Pull, input: InputBuffer);

    /// Restore the reset configuration (input, buffer disconnected, no pull, no sense)
    fn configure_default(&mut self, pin: u8);

    /// Program the pin's sense level
    fn set_sense(&mut self, pin: u8, sense: Sense);

    /// Currently programmed sense level
    fn sense(&self, pin: u8) -> Sense;

    /// Read the pin's input level
    fn is_high(&self, pin: u8) -> bool;

    /// Read the pin's input level as a [`Level`]
    fn level(&self, pin: u8) -> Level {
        Level::from_bool(self.is_high(pin))
    }

    /// Read the pin's output latch
    fn is_set_high(&self, pin: u8) -> bool;

    /// Drive the output high
    fn set_high(&mut self, pin: u8);

    /// Drive the output low
    fn set_low(&mut self, pin: u8);

    /// Invert the output latch
    fn toggle(&mut self, pin: u8);
}

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Toggle the pin state
    fn toggle(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}
