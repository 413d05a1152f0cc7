//! Pin state table
//!
//! Fixed-size table of [`PinRecord`]s plus the reverse channel-to-pin map
//! the dispatcher uses to resolve channel events.

use super::config::Pin;
use super::record::PinRecord;
use crate::channel::Channel;
use crate::config::{MAX_CHANNELS, MAX_PINS};

/// Records for every addressable pin
#[derive(Debug, Clone)]
pub struct PinTable {
    records: [PinRecord; MAX_PINS],
    /// Pin currently wired to each channel
    channel_owner: [Option<Pin>; MAX_CHANNELS],
}

impl Default for PinTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PinTable {
    /// Create a table with every pin unconfigured
    pub const fn new() -> Self {
        Self {
            records: [PinRecord::UNCONFIGURED; MAX_PINS],
            channel_owner: [None; MAX_CHANNELS],
        }
    }

    /// Record of `pin`
    pub fn get(&self, pin: Pin) -> &PinRecord {
        &self.records[pin.number() as usize]
    }

    /// Replace the record of `pin`, keeping the channel map in step
    pub fn commit(&mut self, pin: Pin, record: PinRecord) {
        let slot = &mut self.records[pin.number() as usize];

        if let Some(old) = slot.channel() {
            if self.channel_owner[old.index() as usize] == Some(pin) {
                self.channel_owner[old.index() as usize] = None;
            }
        }
        if let Some(new) = record.channel() {
            self.channel_owner[new.index() as usize] = Some(pin);
        }

        *slot = record;
    }

    /// Return every pin to its unconfigured state
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Pin wired to `channel`
    pub fn owner(&self, channel: Channel) -> Option<Pin> {
        self.channel_owner[channel.index() as usize]
    }

    /// Check if `pin` may wire `channel` (free, or already its own)
    pub fn channel_available_to(&self, channel: Channel, pin: Pin) -> bool {
        self.owner(channel).map_or(true, |owner| owner == pin)
    }

    /// Iterate over the first `count` pins in ascending order
    pub fn iter(&self, count: u8) -> impl Iterator<Item = (Pin, &PinRecord)> + '_ {
        self.records
            .iter()
            .take(count as usize)
            .enumerate()
            .map(|(n, record)| (Pin(n as u8), record))
    }

    /// Number of pins currently configured
    pub fn configured_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_configured()).count()
    }

    /// Check every record and the channel map against the invariants
    pub fn is_consistent(&self) -> bool {
        let records_ok = self.records.iter().all(PinRecord::is_consistent);

        let map_ok = self.channel_owner.iter().enumerate().all(|(index, owner)| {
            let users = self
                .records
                .iter()
                .filter(|r| r.channel().map(Channel::index) == Some(index as u8))
                .count();
            match owner {
                Some(pin) => {
                    users == 1 && self.get(*pin).channel().map(Channel::index) == Some(index as u8)
                }
                None => users == 0,
            }
        });

        records_ok && map_ok
    }
}
