//! GPIO Task/Event peripheral abstraction
//!
//! A GPIOTE channel binds one pin either to an IN event (edge detection)
//! or to OUT/SET/CLR tasks. The PORT event aggregates pin sensing.

use crate::gpio::Level;

/// Interrupt enable bit for the PORT (sensing) event
pub const PORT_INTERRUPT_MASK: u32 = 1 << 31;

/// Lowest-urgency interrupt priority (the NVIC implements 3 priority bits)
pub const MAX_IRQ_PRIORITY: u8 = 7;

/// Interrupt enable bit for the IN event of `channel`
pub const fn in_interrupt_mask(channel: u8) -> u32 {
    1 << channel
}

/// Channel polarity
///
/// For an IN event this is the detected edge, for a task it is the action
/// performed by the OUT task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// No event generated / no task action
    #[default]
    None,
    /// Low to high transition / set pin
    LoToHi,
    /// High to low transition / clear pin
    HiToLo,
    /// Any transition / toggle pin
    Toggle,
}

/// Task identifier, usable for interconnect (PPI/DPPI) wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskId {
    /// OUT task of a channel (acts according to the channel polarity)
    Out(u8),
    /// SET task of a channel
    Set(u8),
    /// CLR task of a channel
    Clr(u8),
}

impl TaskId {
    /// Channel the task belongs to
    pub const fn channel(self) -> u8 {
        match self {
            TaskId::Out(ch) | TaskId::Set(ch) | TaskId::Clr(ch) => ch,
        }
    }
}

/// Event identifier, usable for interconnect (PPI/DPPI) wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventId {
    /// IN event of a channel
    In(u8),
    /// Aggregate PORT event raised by pin sensing
    Port,
}

impl EventId {
    /// Interrupt enable mask for this event
    pub const fn interrupt_mask(self) -> u32 {
        match self {
            EventId::In(ch) => in_interrupt_mask(ch),
            EventId::Port => PORT_INTERRUPT_MASK,
        }
    }
}

/// GPIOTE peripheral registers
///
/// Implementations own the register block of the chip's GPIOTE instance
/// and the interrupt line it raises.
pub trait GpiotePeripheral {
    /// Configure `channel` as an IN event on `pin` (mode is left disabled)
    fn configure_event(&mut self, channel: u8, pin: u8, polarity: Polarity);

    /// Configure `channel` as a task on `pin` (mode is left disabled)
    fn configure_task(&mut self, channel: u8, pin: u8, polarity: Polarity, init: Level);

    /// Switch `channel` into event mode
    fn enable_event(&mut self, channel: u8);

    /// Switch `channel` into task mode
    fn enable_task(&mut self, channel: u8);

    /// Disable `channel` without clearing its pin and polarity
    fn disable_channel(&mut self, channel: u8);

    /// Return `channel` to its reset configuration
    fn reset_channel(&mut self, channel: u8);

    /// Check if `event` is pending
    fn event_pending(&self, event: EventId) -> bool;

    /// Clear a pending `event`
    fn clear_event(&mut self, event: EventId);

    /// Set bits in the interrupt enable register
    fn enable_interrupts(&mut self, mask: u32);

    /// Clear bits in the interrupt enable register
    fn disable_interrupts(&mut self, mask: u32);

    /// Check if every bit of `mask` is enabled
    fn interrupts_enabled(&self, mask: u32) -> bool;

    /// Trigger a task manually
    fn trigger_task(&mut self, task: TaskId);

    /// Force the pin bound to `channel` to `level` while keeping task mode
    fn force_task(&mut self, channel: u8, level: Level);

    /// Bus address of a task register
    fn task_address(&self, task: TaskId) -> u32;

    /// Bus address of an event register
    fn event_address(&self, event: EventId) -> u32;

    /// Enable the peripheral interrupt line at `priority`
    ///
    /// `priority` is at most [`MAX_IRQ_PRIORITY`].
    fn enable_irq(&mut self, priority: u8);

    /// Disable the peripheral interrupt line
    fn disable_irq(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_masks() {
        assert_eq!(EventId::In(0).interrupt_mask(), 0x01);
        assert_eq!(EventId::In(7).interrupt_mask(), 0x80);
        assert_eq!(EventId::Port.interrupt_mask(), 0x8000_0000);
    }

    #[test]
    fn test_task_channel() {
        assert_eq!(TaskId::Out(3).channel(), 3);
        assert_eq!(TaskId::Set(5).channel(), 5);
        assert_eq!(TaskId::Clr(1).channel(), 1);
    }
}
