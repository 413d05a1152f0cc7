//! Lock-free channel pool
//!
//! A bitmask where a set bit marks a free channel. Allocation claims the
//! lowest set bit with a compare-and-exchange loop, so two concurrent
//! callers can never be handed the same channel.

use portable_atomic::{AtomicU32, Ordering};

use crate::config::{GpioteConfig, MAX_CHANNELS};
use crate::error::Error;

/// A GPIOTE Task/Event channel index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel(pub(crate) u8);

impl Channel {
    /// Create a channel index
    ///
    /// Returns `None` if the index does not fit the channel bitmask.
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < MAX_CHANNELS {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Raw channel index
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Bit of this channel in a channel mask
    pub const fn mask(self) -> u32 {
        1 << self.0
    }
}

/// Pool of allocatable channels
#[derive(Debug)]
pub struct ChannelPool {
    /// Set bit = channel free
    free: AtomicU32,
    /// Channels this pool may hand out
    app_mask: u32,
}

impl ChannelPool {
    /// Create a pool where every channel in `app_mask` starts free
    pub const fn new(app_mask: u32) -> Self {
        Self {
            free: AtomicU32::new(app_mask),
            app_mask,
        }
    }

    /// Create a pool for a GPIOTE instance, leaving reserved channels out
    pub const fn from_config(config: &GpioteConfig) -> Self {
        Self::new(config.app_channel_mask())
    }

    /// Mask of channels the pool manages
    pub const fn app_mask(&self) -> u32 {
        self.app_mask
    }

    /// Allocate the lowest free channel
    ///
    /// Safe to call from any context, including interrupts.
    pub fn allocate(&self) -> Result<Channel, Error> {
        let mut current = self.free.load(Ordering::Acquire);
        loop {
            if current == 0 {
                debug!("channel pool exhausted");
                return Err(Error::ResourceExhausted);
            }

            let index = current.trailing_zeros() as u8;
            let claimed = current & !(1 << index);

            match self.free.compare_exchange_weak(
                current,
                claimed,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    trace!("channel {} allocated", index);
                    return Ok(Channel(index));
                }
                Err(observed) => current = observed,
            }
        }
    }

    /// Return a channel to the pool
    ///
    /// Fails with `InvalidParam` for channels outside the allocatable mask
    /// (reserved or non-existent) and for channels that are already free.
    pub fn free(&self, channel: Channel) -> Result<(), Error> {
        let bit = channel.mask();
        if self.app_mask & bit == 0 {
            warn!("channel {} is not user-configurable", channel.index());
            return Err(Error::InvalidParam);
        }

        let previous = self.free.fetch_or(bit, Ordering::AcqRel);
        if previous & bit != 0 {
            warn!("channel {} freed twice", channel.index());
            return Err(Error::InvalidParam);
        }

        trace!("channel {} freed", channel.index());
        Ok(())
    }

    /// Check if `channel` is currently allocated from this pool
    pub fn is_allocated(&self, channel: Channel) -> bool {
        let bit = channel.mask();
        self.app_mask & bit != 0 && self.free.load(Ordering::Acquire) & bit == 0
    }

    /// Number of channels still free
    pub fn available(&self) -> u32 {
        self.free.load(Ordering::Acquire).count_ones()
    }
}
