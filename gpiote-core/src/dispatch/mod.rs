//! Interrupt dispatch
//!
//! Turns pending hardware events into [`PinEvent`]s. Collection runs with
//! the driver locked; handlers are called by the driver afterwards, one
//! lookup per event, with the lock released.
//!
//! Delivery order within one interrupt:
//!
//! ```text
//!   PORT event pending?
//!     └─► sensing pins, ascending pin number   (repeated while levels move)
//!   channel IN events
//!     └─► ascending channel number
//! ```

mod handler;

pub use handler::{select_handler, EventHandler, HandlerConfig, HandlerRef, PinEvent};

use gpiote_hal::{EventId, GpiotePeripheral, Level, PinPort, Sense};
use heapless::Vec;

use crate::channel::Channel;
use crate::config::{MAX_CHANNELS, MAX_PINS};
use crate::pin::{Detection, PinTable, Trigger};

/// Bound on PORT rescans per interrupt
///
/// A pin that keeps toggling faster than the handlers run would otherwise
/// hold the interrupt forever. Anything left over raises PORT again.
pub const MAX_PORT_PASSES: usize = 4;

/// Events resolved from channel IN events
pub type ChannelEvents = Vec<PinEvent, MAX_CHANNELS>;

/// Events resolved from one PORT pass
pub type PortEvents = Vec<PinEvent, MAX_PINS>;

/// Pending IN events that have their interrupt enabled
///
/// Every returned event is cleared. Only channels in `mask` are looked at,
/// so channels reserved for other users are left alone.
pub fn take_channel_events<H: GpiotePeripheral>(hw: &mut H, mask: u32) -> u32 {
    let mut fired = 0;
    let mut remaining = mask;
    while remaining != 0 {
        let index = remaining.trailing_zeros() as u8;
        remaining &= remaining - 1;

        let event = EventId::In(index);
        if hw.event_pending(event) && hw.interrupts_enabled(event.interrupt_mask()) {
            hw.clear_event(event);
            fired |= 1 << index;
        }
    }
    fired
}

/// Clear the PORT event, reporting if it was pending
pub fn take_port_event<H: GpiotePeripheral>(hw: &mut H) -> bool {
    if hw.event_pending(EventId::Port) {
        hw.clear_event(EventId::Port);
        true
    } else {
        false
    }
}

/// Resolve fired channels to the pins wired to them, ascending channel order
///
/// A channel with no owner, or whose owner no longer uses it for an IN
/// event, is dropped.
pub fn resolve_channels(fired: u32, table: &PinTable) -> ChannelEvents {
    let mut events = ChannelEvents::new();
    let mut remaining = fired;
    while remaining != 0 {
        let index = remaining.trailing_zeros() as u8;
        remaining &= remaining - 1;

        let Some(channel) = Channel::new(index) else {
            continue;
        };
        let Some(pin) = table.owner(channel) else {
            trace!("channel {} fired without owner", index);
            continue;
        };
        if let Detection::Event { edge, .. } = table.get(pin).detection() {
            // Capacity matches the channel count, push can't fail
            let _ = events.push(PinEvent::new(pin, edge.trigger()));
        }
    }
    events
}

/// Input levels of every armed sensing pin, bit per pin
pub fn sensing_levels<H: PinPort>(hw: &H, table: &PinTable, pin_count: u8) -> u64 {
    table
        .iter(pin_count)
        .filter(|(_, record)| record.sensing_active())
        .filter(|(pin, _)| hw.is_high(pin.number()))
        .fold(0, |levels, (pin, _)| levels | (1 << pin.number()))
}

/// One pass over the armed sensing pins, ascending pin order
///
/// `levels` is the snapshot from [`sensing_levels`]. A pin whose level
/// matches its programmed sense has detected something:
///
/// - level triggers fire and are re-armed once the pass is done: their
///   sense is cleared and then restored, so a held level gives DETECT a
///   fresh rising edge and PORT is raised again
/// - edge triggers flip their sense to catch the next transition, and fire
///   only when the detected level ends an edge of the requested direction
///
/// PORT only fires when DETECT rises. Until the held levels are re-armed
/// DETECT stays high and every other sensing pin goes unnoticed.
pub fn scan_sensing<H: PinPort>(
    hw: &mut H,
    table: &PinTable,
    pin_count: u8,
    levels: u64,
) -> PortEvents {
    let mut events = PortEvents::new();
    let mut held = 0u64;

    for (pin, record) in table.iter(pin_count) {
        if !record.sensing_active() {
            continue;
        }

        let n = pin.number();
        let level = Level::from_bool(levels & (1 << n) != 0);
        let sense = hw.sense(n);
        if !sense.matches(level) {
            continue;
        }

        let trigger = record.trigger();
        let fire = match trigger {
            Trigger::LevelLow | Trigger::LevelHigh => {
                held |= 1 << n;
                true
            }
            Trigger::RisingEdge | Trigger::FallingEdge | Trigger::Toggle => {
                hw.set_sense(n, sense.flipped());
                match trigger {
                    Trigger::RisingEdge => level == Level::High,
                    Trigger::FallingEdge => level == Level::Low,
                    _ => true,
                }
            }
            Trigger::None => false,
        };

        if fire {
            let _ = events.push(PinEvent::new(pin, trigger));
        }
    }

    rearm_levels(hw, held, levels);
    events
}

/// Drop DETECT for every held level pin, then arm them all again
fn rearm_levels<H: PinPort>(hw: &mut H, held: u64, levels: u64) {
    let pins = || (0..MAX_PINS as u8).filter(move |n| held & (1 << n) != 0);

    for n in pins() {
        hw.set_sense(n, Sense::None);
    }
    for n in pins() {
        // A matched level pin's sense equals the level it holds
        let sense = match Level::from_bool(levels & (1 << n) != 0) {
            Level::High => Sense::High,
            Level::Low => Sense::Low,
        };
        hw.set_sense(n, sense);
    }
}
