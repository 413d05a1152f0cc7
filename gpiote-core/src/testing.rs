//! In-memory GPIOTE hardware for host tests
//!
//! Models the registers the driver touches closely enough to exercise
//! the state machine and the dispatcher: pin configuration and levels,
//! channel modes and IN event generation. PORT is raised only when the
//! combined DETECT signal goes from low to high, as on the real chip.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use gpiote_hal::{
    Drive, EventId, GpiotePeripheral, InputBuffer, Level, PinPort, Polarity, Pull, Sense, TaskId,
};
use heapless::Vec;

use crate::config::{MAX_CHANNELS, MAX_PINS};
use crate::dispatch::EventHandler;
use crate::pin::{Pin, Trigger};

/// Base address reported for the fake register block
pub const FAKE_BASE: u32 = 0x4000_6000;

/// Electrical configuration of a fake pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FakePinConfig {
    #[default]
    Default,
    Input(Pull),
    Output {
        drive: Drive,
        pull: Pull,
        input: InputBuffer,
    },
}

/// Channel mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FakeMode {
    #[default]
    Disabled,
    Event,
    Task,
}

/// Channel register state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FakeChannel {
    pub mode: FakeMode,
    pub pin: u8,
    pub polarity: Polarity,
    pub init: Level,
}

/// Fake GPIO + GPIOTE register set
#[derive(Debug, Clone)]
pub struct FakeHardware {
    pub pins: [FakePinConfig; MAX_PINS],
    pub senses: [Sense; MAX_PINS],
    /// Input levels, bit per pin
    pub levels: u64,
    /// Output latch, bit per pin
    pub latch: u64,
    pub channels: [FakeChannel; MAX_CHANNELS],
    /// Pending IN events, bit per channel
    pub pending: u32,
    pub port_pending: bool,
    pub inten: u32,
    pub irq_priority: Option<u8>,
    pub triggered: Vec<TaskId, 16>,
}

impl Default for FakeHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeChannel {
    const RESET: Self = Self {
        mode: FakeMode::Disabled,
        pin: 0,
        polarity: Polarity::None,
        init: Level::Low,
    };
}

impl FakeHardware {
    pub const fn new() -> Self {
        Self {
            pins: [FakePinConfig::Default; MAX_PINS],
            senses: [Sense::None; MAX_PINS],
            levels: 0,
            latch: 0,
            channels: [FakeChannel::RESET; MAX_CHANNELS],
            pending: 0,
            port_pending: false,
            inten: 0,
            irq_priority: None,
            triggered: Vec::new(),
        }
    }

    /// Drive an external level onto a pin, raising the events real hardware would
    pub fn drive(&mut self, pin: Pin, level: Level) {
        let n = pin.number();
        let bit = 1u64 << n;
        let before = Level::from_bool(self.levels & bit != 0);
        let detect = self.detect();
        match level {
            Level::High => self.levels |= bit,
            Level::Low => self.levels &= !bit,
        }
        self.latch_port(detect);

        if before == level {
            return;
        }
        for (index, channel) in self.channels.iter().enumerate() {
            if channel.mode != FakeMode::Event || channel.pin != n {
                continue;
            }
            let fires = match channel.polarity {
                Polarity::None => false,
                Polarity::LoToHi => level == Level::High,
                Polarity::HiToLo => level == Level::Low,
                Polarity::Toggle => true,
            };
            if fires {
                self.pending |= 1 << index;
            }
        }
    }

    /// DETECT: any pin whose level matches its sense
    pub fn detect(&self) -> bool {
        self.senses.iter().enumerate().any(|(n, sense)| {
            sense.matches(Level::from_bool(self.levels & (1 << n) != 0))
        })
    }

    /// PORT is only raised on a rising edge of DETECT
    fn latch_port(&mut self, detect_before: bool) {
        if !detect_before && self.detect() {
            self.port_pending = true;
        }
    }
}

impl PinPort for FakeHardware {
    fn configure_input(&mut self, pin: u8, pull: Pull) {
        self.pins[pin as usize] = FakePinConfig::Input(pull);
    }

    fn configure_output(&mut self, pin: u8, drive: Drive, pull: Pull, input: InputBuffer) {
        self.pins[pin as usize] = FakePinConfig::Output { drive, pull, input };
    }

    fn configure_default(&mut self, pin: u8) {
        self.pins[pin as usize] = FakePinConfig::Default;
        self.senses[pin as usize] = Sense::None;
    }

    fn set_sense(&mut self, pin: u8, sense: Sense) {
        let detect = self.detect();
        self.senses[pin as usize] = sense;
        self.latch_port(detect);
    }

    fn sense(&self, pin: u8) -> Sense {
        self.senses[pin as usize]
    }

    fn is_high(&self, pin: u8) -> bool {
        self.levels & (1 << pin) != 0
    }

    fn is_set_high(&self, pin: u8) -> bool {
        self.latch & (1 << pin) != 0
    }

    fn set_high(&mut self, pin: u8) {
        self.latch |= 1 << pin;
    }

    fn set_low(&mut self, pin: u8) {
        self.latch &= !(1 << pin);
    }

    fn toggle(&mut self, pin: u8) {
        self.latch ^= 1 << pin;
    }
}

impl GpiotePeripheral for FakeHardware {
    fn configure_event(&mut self, channel: u8, pin: u8, polarity: Polarity) {
        let ch = &mut self.channels[channel as usize];
        ch.pin = pin;
        ch.polarity = polarity;
    }

    fn configure_task(&mut self, channel: u8, pin: u8, polarity: Polarity, init: Level) {
        let ch = &mut self.channels[channel as usize];
        ch.pin = pin;
        ch.polarity = polarity;
        ch.init = init;
    }

    fn enable_event(&mut self, channel: u8) {
        self.channels[channel as usize].mode = FakeMode::Event;
    }

    fn enable_task(&mut self, channel: u8) {
        let ch = self.channels[channel as usize];
        self.channels[channel as usize].mode = FakeMode::Task;
        match ch.init {
            Level::High => self.latch |= 1 << ch.pin,
            Level::Low => self.latch &= !(1 << ch.pin),
        }
    }

    fn disable_channel(&mut self, channel: u8) {
        self.channels[channel as usize].mode = FakeMode::Disabled;
    }

    fn reset_channel(&mut self, channel: u8) {
        self.channels[channel as usize] = FakeChannel::RESET;
        self.pending &= !(1 << channel);
    }

    fn event_pending(&self, event: EventId) -> bool {
        match event {
            EventId::In(ch) => self.pending & (1 << ch) != 0,
            EventId::Port => self.port_pending,
        }
    }

    fn clear_event(&mut self, event: EventId) {
        match event {
            EventId::In(ch) => self.pending &= !(1 << ch),
            EventId::Port => self.port_pending = false,
        }
    }

    fn enable_interrupts(&mut self, mask: u32) {
        self.inten |= mask;
    }

    fn disable_interrupts(&mut self, mask: u32) {
        self.inten &= !mask;
    }

    fn interrupts_enabled(&self, mask: u32) -> bool {
        self.inten & mask == mask
    }

    fn trigger_task(&mut self, task: TaskId) {
        let _ = self.triggered.push(task);
        let ch = self.channels[task.channel() as usize];
        if ch.mode != FakeMode::Task {
            return;
        }
        let pin = ch.pin;
        match task {
            TaskId::Set(_) => self.latch |= 1 << pin,
            TaskId::Clr(_) => self.latch &= !(1 << pin),
            TaskId::Out(_) => match ch.polarity {
                Polarity::None => {}
                Polarity::LoToHi => self.latch |= 1 << pin,
                Polarity::HiToLo => self.latch &= !(1 << pin),
                Polarity::Toggle => self.latch ^= 1 << pin,
            },
        }
    }

    fn force_task(&mut self, channel: u8, level: Level) {
        let pin = self.channels[channel as usize].pin;
        match level {
            Level::High => self.latch |= 1 << pin,
            Level::Low => self.latch &= !(1 << pin),
        }
    }

    fn task_address(&self, task: TaskId) -> u32 {
        let ch = task.channel() as u32 * 4;
        match task {
            TaskId::Out(_) => FAKE_BASE + ch,
            TaskId::Set(_) => FAKE_BASE + 0x030 + ch,
            TaskId::Clr(_) => FAKE_BASE + 0x060 + ch,
        }
    }

    fn event_address(&self, event: EventId) -> u32 {
        match event {
            EventId::In(ch) => FAKE_BASE + 0x100 + ch as u32 * 4,
            EventId::Port => FAKE_BASE + 0x17C,
        }
    }

    fn enable_irq(&mut self, priority: u8) {
        self.irq_priority = Some(priority);
    }

    fn disable_irq(&mut self) {
        self.irq_priority = None;
    }
}

/// Handler that records every event it receives
pub struct Recorder {
    events: Mutex<CriticalSectionRawMutex, RefCell<Vec<(Pin, Trigger), 32>>>,
}

impl Recorder {
    pub const fn new() -> Self {
        Self {
            events: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    /// Events received so far, in delivery order
    pub fn events(&self) -> std::vec::Vec<(Pin, Trigger)> {
        self.events.lock(|events| events.borrow().iter().copied().collect())
    }

    pub fn count(&self) -> usize {
        self.events.lock(|events| events.borrow().len())
    }
}

impl EventHandler for Recorder {
    fn on_event(&self, pin: Pin, trigger: Trigger) {
        self.events.lock(|events| {
            let _ = events.borrow_mut().push((pin, trigger));
        });
    }
}

pub fn pin(n: u8) -> Pin {
    Pin::new(n).unwrap()
}
