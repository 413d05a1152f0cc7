//! Driver error type

use core::fmt;

use crate::config::ConfigError;

/// Errors returned by driver operations
///
/// None of these are retried internally and none leave the driver in a
/// partially applied state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// `init` called while the driver is already initialized
    AlreadyInitialized,
    /// Pin operation attempted before `init`
    NotInitialized,
    /// No free channel left in the pool
    ResourceExhausted,
    /// Illegal transition, out-of-range index, or unconfigured pin
    InvalidParam,
    /// Driver configuration rejected at `init`
    Config(ConfigError),
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AlreadyInitialized => f.write_str("driver already initialized"),
            Error::NotInitialized => f.write_str("driver not initialized"),
            Error::ResourceExhausted => f.write_str("no free GPIOTE channel"),
            Error::InvalidParam => f.write_str("invalid parameter"),
            Error::Config(e) => write!(f, "invalid configuration: {:?}", e),
        }
    }
}
