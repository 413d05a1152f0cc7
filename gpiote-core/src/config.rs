//! Driver configuration
//!
//! Describes the GPIOTE instance the driver manages: how many channels the
//! hardware has, which of them are reserved for use outside the driver, and
//! how many absolute pins are addressable. Optionally stored as postcard
//! binary data alongside other board configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Width of the channel bitmask
pub const MAX_CHANNELS: usize = 32;

/// Most channels a GPIOTE instance may have (bit 31 of the interrupt
/// enable register belongs to the PORT event)
pub const MAX_HW_CHANNELS: u8 = 31;

/// Largest pin count the pin table can hold (two 32-bit ports, P1 half populated)
pub const MAX_PINS: usize = 48;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Channel count is zero or above [`MAX_HW_CHANNELS`]
    ChannelCount,
    /// Pin count is zero or above [`MAX_PINS`]
    PinCount,
    /// Reserved mask names channels the hardware does not have
    ReservedOutOfRange,
    /// Serialization failed (buffer too small)
    Encode,
    /// Deserialization failed
    Decode,
}

/// GPIOTE instance configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpioteConfig {
    /// Number of Task/Event channels in hardware
    pub channel_count: u8,
    /// Channels reserved for use outside this driver (bit per channel)
    pub reserved_channels: u32,
    /// Number of addressable absolute pins
    pub pin_count: u8,
}

impl Default for GpioteConfig {
    fn default() -> Self {
        Self::NRF52840
    }
}

impl GpioteConfig {
    /// nRF52840: 8 channels, P0.00-P0.31 and P1.00-P1.15
    pub const NRF52840: Self = Self::new(8, 48);

    /// nRF52832: 8 channels, P0.00-P0.31
    pub const NRF52832: Self = Self::new(8, 32);

    /// Create a configuration with no reserved channels
    pub const fn new(channel_count: u8, pin_count: u8) -> Self {
        Self {
            channel_count,
            reserved_channels: 0,
            pin_count,
        }
    }

    /// Reserve channels for use outside the driver
    pub const fn with_reserved(mut self, reserved_channels: u32) -> Self {
        self.reserved_channels = reserved_channels;
        self
    }

    /// Mask of every channel the hardware has
    pub const fn hardware_mask(&self) -> u32 {
        if self.channel_count as usize >= MAX_CHANNELS {
            u32::MAX
        } else {
            (1u32 << self.channel_count) - 1
        }
    }

    /// Mask of channels available to the application
    pub const fn app_channel_mask(&self) -> u32 {
        self.hardware_mask() & !self.reserved_channels
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_count == 0 || self.channel_count > MAX_HW_CHANNELS {
            return Err(ConfigError::ChannelCount);
        }
        if self.pin_count == 0 || self.pin_count as usize > MAX_PINS {
            return Err(ConfigError::PinCount);
        }
        if self.reserved_channels & !self.hardware_mask() != 0 {
            return Err(ConfigError::ReservedOutOfRange);
        }
        Ok(())
    }

    /// Serialize into `buf`, returning the used part
    #[cfg(feature = "serde")]
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Encode)
    }

    /// Deserialize and validate a stored configuration
    #[cfg(feature = "serde")]
    pub fn decode(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(GpioteConfig::NRF52840.channel_count, 8);
        assert_eq!(GpioteConfig::NRF52840.pin_count, 48);
        assert_eq!(GpioteConfig::NRF52832.pin_count, 32);
        assert!(GpioteConfig::NRF52840.validate().is_ok());
        assert_eq!(GpioteConfig::default(), GpioteConfig::NRF52840);
    }

    #[test]
    fn test_app_channel_mask() {
        let config = GpioteConfig::new(8, 48);
        assert_eq!(config.app_channel_mask(), 0xFF);

        // Channels 0 and 3 used by a radio timing library
        let config = config.with_reserved(0b1001);
        assert_eq!(config.app_channel_mask(), 0b1111_0110);

        let full = GpioteConfig::new(32, 48);
        assert_eq!(full.app_channel_mask(), u32::MAX);
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            GpioteConfig::new(0, 48).validate(),
            Err(ConfigError::ChannelCount)
        );
        assert_eq!(
            GpioteConfig::new(32, 48).validate(),
            Err(ConfigError::ChannelCount)
        );
        assert_eq!(GpioteConfig::new(8, 0).validate(), Err(ConfigError::PinCount));
        assert_eq!(GpioteConfig::new(8, 49).validate(), Err(ConfigError::PinCount));
        assert_eq!(
            GpioteConfig::new(8, 48).with_reserved(1 << 8).validate(),
            Err(ConfigError::ReservedOutOfRange)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_stored_config() {
        let config = GpioteConfig::NRF52832.with_reserved(0b11);
        let mut buf = [0u8; 16];
        let used = config.encode(&mut buf).unwrap().len();
        assert_eq!(GpioteConfig::decode(&buf[..used]), Ok(config));

        // Too small a buffer
        let mut tiny = [0u8; 1];
        assert_eq!(config.encode(&mut tiny), Err(ConfigError::Encode));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_stored_config_rejected_when_invalid() {
        let bad = GpioteConfig::new(8, 200);
        let mut buf = [0u8; 16];
        let used = bad.encode(&mut buf).unwrap().len();
        assert_eq!(GpioteConfig::decode(&buf[..used]), Err(ConfigError::PinCount));
        assert_eq!(GpioteConfig::decode(&[]), Err(ConfigError::Decode));
    }
}
