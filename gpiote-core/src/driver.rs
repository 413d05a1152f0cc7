//! GPIOTE driver
//!
//! [`Gpiote`] owns the hardware handle, the pin state table and the
//! global handler behind a critical-section mutex, plus the lock-free
//! channel pool beside it. It is `const`-constructible so boards can keep
//! it in a `static` and call [`Gpiote::on_interrupt`] from the vector.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use gpiote_hal::{
    in_interrupt_mask, EventId, GpioteHardware, InputPin, Level, OutputPin, Sense, TaskId,
    MAX_IRQ_PRIORITY, PORT_INTERRUPT_MASK,
};

use crate::channel::{Channel, ChannelPool};
use crate::config::GpioteConfig;
use crate::dispatch::{
    resolve_channels, scan_sensing, select_handler, sensing_levels, take_channel_events,
    take_port_event, EventHandler, HandlerConfig, HandlerRef, PinEvent, MAX_PORT_PASSES,
};
use crate::error::Error;
use crate::pin::{
    Detection, InputConfig, OutputConfig, Pin, PinRecord, PinTable, Role, TaskBinding,
    TaskConfig, Trigger, TriggerConfig,
};
use crate::state::{
    plan_input, plan_output, plan_trigger_enable, plan_uninit, Electrical, Transition,
};

/// State guarded by the driver mutex
struct Inner<H> {
    hw: H,
    table: PinTable,
    global: Option<HandlerRef>,
    initialized: bool,
    config: GpioteConfig,
}

impl<H: GpioteHardware> Inner<H> {
    /// Common precondition of every pin operation
    fn check(&self, pin: Pin) -> Result<(), Error> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        if pin.number() >= self.config.pin_count {
            warn!("pin {} beyond pin count", pin.number());
            return Err(Error::InvalidParam);
        }
        Ok(())
    }

    fn task(&self, pin: Pin) -> Result<TaskBinding, Error> {
        self.table.get(pin).task().ok_or(Error::InvalidParam)
    }

    /// Arm the pin's detection in hardware
    fn start_trigger(&mut self, pin: Pin, record: &PinRecord, interrupt: bool) {
        let n = pin.number();
        match record.detection() {
            Detection::Off => {}
            Detection::Event { channel, .. } => {
                let ch = channel.index();
                self.hw.clear_event(EventId::In(ch));
                self.hw.enable_event(ch);
                if interrupt {
                    self.hw.enable_interrupts(in_interrupt_mask(ch));
                }
            }
            Detection::Sense(trigger) => {
                let sense = match trigger {
                    Trigger::LevelLow => Sense::Low,
                    Trigger::LevelHigh => Sense::High,
                    // Wait for the pin to leave its current level
                    _ => match self.hw.level(n) {
                        Level::High => Sense::Low,
                        Level::Low => Sense::High,
                    },
                };
                self.hw.set_sense(n, sense);
            }
        }
    }

    fn stop_trigger(&mut self, pin: Pin, record: &PinRecord) {
        match record.detection() {
            Detection::Off => {}
            Detection::Event { channel, .. } => {
                self.hw.disable_interrupts(in_interrupt_mask(channel.index()));
                self.hw.disable_channel(channel.index());
            }
            Detection::Sense(_) => self.hw.set_sense(pin.number(), Sense::None),
        }
    }

    /// Write the hardware side of an accepted transition, then commit it
    fn apply(&mut self, pin: Pin, old: &PinRecord, transition: Transition) {
        let new = transition.record;
        let n = pin.number();
        let detection_changed = old.detection() != new.detection();
        let task_changed = old.task() != new.task();

        if detection_changed {
            if old.is_enabled() {
                self.stop_trigger(pin, old);
            }
            if let Some(channel) = old.detection().channel() {
                self.hw.reset_channel(channel.index());
            }
        }
        if task_changed {
            if let Some(task) = old.task() {
                self.hw.reset_channel(task.channel.index());
            }
        }

        match transition.electrical {
            Some(Electrical::Input(config)) => self.hw.configure_input(n, config.pull),
            Some(Electrical::Output(config)) => {
                self.hw
                    .configure_output(n, config.drive, config.pull, config.input)
            }
            None => {}
        }

        if detection_changed {
            if let Detection::Event { channel, edge } = new.detection() {
                self.hw.configure_event(channel.index(), n, edge.polarity());
            }
        }
        if task_changed {
            if let Some(task) = new.task() {
                self.hw
                    .configure_task(task.channel.index(), n, task.polarity, task.init);
            }
        }

        self.table.commit(pin, new);
    }
}

/// GPIOTE channel driver
pub struct Gpiote<H> {
    channels: ChannelPool,
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner<H>>>,
}

impl<H> Gpiote<H> {
    /// Create an uninitialized driver
    ///
    /// The channel pool is usable right away; pin operations need [`Gpiote::init`].
    pub const fn new(hw: H, config: GpioteConfig) -> Self {
        Self {
            channels: ChannelPool::from_config(&config),
            inner: Mutex::new(RefCell::new(Inner {
                hw,
                table: PinTable::new(),
                global: None,
                initialized: false,
                config,
            })),
        }
    }
}

impl<H: GpioteHardware> Gpiote<H> {
    fn with<R>(&self, f: impl FnOnce(&mut Inner<H>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    fn with_pin<R>(
        &self,
        pin: Pin,
        f: impl FnOnce(&mut Inner<H>) -> Result<R, Error>,
    ) -> Result<R, Error> {
        self.with(|inner| {
            inner.check(pin)?;
            f(inner)
        })
    }

    /// Initialize the driver and enable the peripheral interrupt at `priority`
    ///
    /// Priorities above [`MAX_IRQ_PRIORITY`] are rejected with
    /// [`Error::InvalidParam`].
    pub fn init(&self, priority: u8) -> Result<(), Error> {
        self.with(|inner| {
            if inner.initialized {
                warn!("GPIOTE already initialized");
                return Err(Error::AlreadyInitialized);
            }
            inner.config.validate()?;
            if priority > MAX_IRQ_PRIORITY {
                debug!("interrupt priority {} out of range", priority);
                return Err(Error::InvalidParam);
            }

            inner.table.reset();
            inner.hw.clear_event(EventId::Port);
            inner.hw.enable_interrupts(PORT_INTERRUPT_MASK);
            inner.hw.enable_irq(priority);
            inner.initialized = true;

            info!(
                "GPIOTE initialized: {} channels ({:#x} free to allocate), {} pins",
                inner.config.channel_count,
                inner.config.app_channel_mask(),
                inner.config.pin_count
            );
            Ok(())
        })
    }

    /// Check if the driver is initialized
    pub fn is_init(&self) -> bool {
        self.with(|inner| inner.initialized)
    }

    /// Return every pin to its default configuration and disable the interrupt
    ///
    /// Allocated channels stay allocated. Does nothing if not initialized.
    pub fn uninit(&self) {
        self.with(|inner| {
            if !inner.initialized {
                return;
            }

            for n in 0..inner.config.pin_count {
                let Some(pin) = Pin::new(n) else { break };
                let old = *inner.table.get(pin);
                if !old.is_configured() {
                    continue;
                }
                inner.apply(pin, &old, Transition {
                    record: PinRecord::UNCONFIGURED,
                    electrical: None,
                });
                inner.hw.configure_default(n);
            }

            inner.hw.disable_irq();
            inner
                .hw
                .disable_interrupts(PORT_INTERRUPT_MASK | inner.config.app_channel_mask());
            inner.table.reset();
            inner.initialized = false;
            info!("GPIOTE uninitialized");
        })
    }

    /// Allocate a channel
    ///
    /// Independent of the driver lifecycle and safe from any context.
    pub fn channel_alloc(&self) -> Result<Channel, Error> {
        self.channels.allocate()
    }

    /// Return a channel to the pool
    ///
    /// The caller must unbind it from its pin first.
    pub fn channel_free(&self, channel: Channel) -> Result<(), Error> {
        self.channels.free(channel)
    }

    /// The channel pool
    pub fn channels(&self) -> &ChannelPool {
        &self.channels
    }

    /// Configure a pin as an input, its trigger, and its handler
    ///
    /// `None` leaves that aspect as it is. The whole request is checked
    /// before anything is written; a rejected request changes nothing.
    pub fn configure_input(
        &self,
        pin: Pin,
        input: Option<InputConfig>,
        trigger: Option<TriggerConfig>,
        handler: Option<HandlerConfig>,
    ) -> Result<(), Error> {
        self.with_pin(pin, |inner| {
            let current = *inner.table.get(pin);
            let table = &inner.table;
            let transition = plan_input(pin, &current, input, trigger, handler, |channel| {
                self.channels.is_allocated(channel) && table.channel_available_to(channel, pin)
            })?;

            inner.apply(pin, &current, transition);
            debug!("pin {} configured as input", pin.number());
            Ok(())
        })
    }

    /// Configure a pin as an output and its OUT task
    ///
    /// A task with [`gpiote_hal::Polarity::None`] unbinds the pin's task; the
    /// channel stays allocated.
    pub fn configure_output(
        &self,
        pin: Pin,
        output: Option<OutputConfig>,
        task: Option<TaskConfig>,
    ) -> Result<(), Error> {
        self.with_pin(pin, |inner| {
            let current = *inner.table.get(pin);
            let table = &inner.table;
            let transition = plan_output(pin, &current, output, task, |channel| {
                self.channels.is_allocated(channel) && table.channel_available_to(channel, pin)
            })?;

            inner.apply(pin, &current, transition);
            debug!("pin {} configured as output", pin.number());
            Ok(())
        })
    }

    /// Restore a pin's default configuration
    ///
    /// A channel the pin used is not freed.
    pub fn pin_uninit(&self, pin: Pin) -> Result<(), Error> {
        self.with_pin(pin, |inner| {
            let current = *inner.table.get(pin);
            let transition = plan_uninit(pin, &current)?;

            inner.apply(pin, &current, transition);
            inner.hw.configure_default(pin.number());
            Ok(())
        })
    }

    /// Start detecting the pin's trigger
    ///
    /// With `interrupt` false a channel event only feeds the interconnect.
    /// Sensing always needs the interrupt.
    pub fn trigger_enable(&self, pin: Pin, interrupt: bool) -> Result<(), Error> {
        self.with_pin(pin, |inner| {
            let current = *inner.table.get(pin);
            let record = plan_trigger_enable(pin, &current, interrupt)?;

            if current.is_enabled() {
                inner.stop_trigger(pin, &current);
            }
            inner.start_trigger(pin, &record, interrupt);
            inner.table.commit(pin, record);
            Ok(())
        })
    }

    /// Stop detecting the pin's trigger
    pub fn trigger_disable(&self, pin: Pin) -> Result<(), Error> {
        self.with_pin(pin, |inner| {
            let current = *inner.table.get(pin);
            if !current.is_configured() {
                return Err(Error::InvalidParam);
            }

            if current.is_enabled() {
                inner.stop_trigger(pin, &current);
                inner.table.commit(
                    pin,
                    PinRecord {
                        enabled: false,
                        ..current
                    },
                );
            }
            Ok(())
        })
    }

    /// Set or clear the handler for pins without their own
    pub fn set_global_handler(&self, handler: Option<&'static dyn EventHandler>) {
        self.with(|inner| inner.global = handler.map(HandlerRef::new));
    }

    /// Channel wired to the pin, by a trigger or a task
    pub fn channel_get(&self, pin: Pin) -> Result<Channel, Error> {
        self.with_pin(pin, |inner| {
            inner.table.get(pin).channel().ok_or(Error::InvalidParam)
        })
    }

    /// Copy of the pin's record
    pub fn pin_record(&self, pin: Pin) -> Result<PinRecord, Error> {
        self.with_pin(pin, |inner| Ok(*inner.table.get(pin)))
    }

    /// Run `f` on the hardware handle
    ///
    /// For registers the driver does not manage. Changing state the driver
    /// tracks through this breaks its bookkeeping.
    pub fn with_hardware<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        self.with(|inner| f(&mut inner.hw))
    }

    // Output level

    fn with_plain_output(
        &self,
        pin: Pin,
        f: impl FnOnce(&mut H, u8),
    ) -> Result<(), Error> {
        self.with_pin(pin, |inner| {
            let record = inner.table.get(pin);
            if record.role() != Role::Output || record.task().is_some() {
                return Err(Error::InvalidParam);
            }
            f(&mut inner.hw, pin.number());
            Ok(())
        })
    }

    /// Drive an output pin high
    pub fn out_set(&self, pin: Pin) -> Result<(), Error> {
        self.with_plain_output(pin, |hw, n| hw.set_high(n))
    }

    /// Drive an output pin low
    pub fn out_clear(&self, pin: Pin) -> Result<(), Error> {
        self.with_plain_output(pin, |hw, n| hw.set_low(n))
    }

    /// Invert an output pin
    pub fn out_toggle(&self, pin: Pin) -> Result<(), Error> {
        self.with_plain_output(pin, |hw, n| hw.toggle(n))
    }

    // Task control

    /// Hand the pin over to its task (drives the task's initial level)
    pub fn out_task_enable(&self, pin: Pin) -> Result<(), Error> {
        self.with_pin(pin, |inner| {
            let task = inner.task(pin)?;
            inner.hw.enable_task(task.channel.index());
            Ok(())
        })
    }

    /// Take the pin back from its task
    pub fn out_task_disable(&self, pin: Pin) -> Result<(), Error> {
        self.with_pin(pin, |inner| {
            let task = inner.task(pin)?;
            inner.hw.disable_channel(task.channel.index());
            Ok(())
        })
    }

    /// Trigger the OUT task from software
    pub fn out_task_trigger(&self, pin: Pin) -> Result<(), Error> {
        self.with_pin(pin, |inner| {
            let task = inner.task(pin)?;
            inner.hw.trigger_task(TaskId::Out(task.channel.index()));
            Ok(())
        })
    }

    /// Trigger the SET task from software
    pub fn set_task_trigger(&self, pin: Pin) -> Result<(), Error> {
        self.with_pin(pin, |inner| {
            let task = inner.task(pin)?;
            inner.hw.trigger_task(TaskId::Set(task.channel.index()));
            Ok(())
        })
    }

    /// Trigger the CLR task from software
    pub fn clr_task_trigger(&self, pin: Pin) -> Result<(), Error> {
        self.with_pin(pin, |inner| {
            let task = inner.task(pin)?;
            inner.hw.trigger_task(TaskId::Clr(task.channel.index()));
            Ok(())
        })
    }

    /// Force the pin to `level` without leaving task mode
    pub fn out_task_force(&self, pin: Pin, level: Level) -> Result<(), Error> {
        self.with_pin(pin, |inner| {
            let task = inner.task(pin)?;
            inner.hw.force_task(task.channel.index(), level);
            Ok(())
        })
    }

    // Interconnect identifiers

    /// OUT task of the pin's channel
    pub fn out_task(&self, pin: Pin) -> Result<TaskId, Error> {
        self.with_pin(pin, |inner| Ok(TaskId::Out(inner.task(pin)?.channel.index())))
    }

    /// Address of the OUT task register
    pub fn out_task_address(&self, pin: Pin) -> Result<u32, Error> {
        let task = self.out_task(pin)?;
        Ok(self.with(|inner| inner.hw.task_address(task)))
    }

    /// SET task of the pin's channel
    pub fn set_task(&self, pin: Pin) -> Result<TaskId, Error> {
        self.with_pin(pin, |inner| Ok(TaskId::Set(inner.task(pin)?.channel.index())))
    }

    /// Address of the SET task register
    pub fn set_task_address(&self, pin: Pin) -> Result<u32, Error> {
        let task = self.set_task(pin)?;
        Ok(self.with(|inner| inner.hw.task_address(task)))
    }

    /// CLR task of the pin's channel
    pub fn clr_task(&self, pin: Pin) -> Result<TaskId, Error> {
        self.with_pin(pin, |inner| Ok(TaskId::Clr(inner.task(pin)?.channel.index())))
    }

    /// Address of the CLR task register
    pub fn clr_task_address(&self, pin: Pin) -> Result<u32, Error> {
        let task = self.clr_task(pin)?;
        Ok(self.with(|inner| inner.hw.task_address(task)))
    }

    /// Event raised by the pin's trigger
    ///
    /// The channel IN event for channel triggers, the shared PORT event for
    /// sensing triggers.
    pub fn in_event(&self, pin: Pin) -> Result<EventId, Error> {
        self.with_pin(pin, |inner| match inner.table.get(pin).detection() {
            Detection::Event { channel, .. } => Ok(EventId::In(channel.index())),
            Detection::Sense(_) => Ok(EventId::Port),
            Detection::Off => Err(Error::InvalidParam),
        })
    }

    /// Address of the pin's event register
    pub fn in_event_address(&self, pin: Pin) -> Result<u32, Error> {
        let event = self.in_event(pin)?;
        Ok(self.with(|inner| inner.hw.event_address(event)))
    }

    /// Read the input level of a configured pin
    pub fn in_is_set(&self, pin: Pin) -> Result<bool, Error> {
        self.with_pin(pin, |inner| {
            if !inner.table.get(pin).is_configured() {
                return Err(Error::InvalidParam);
            }
            Ok(inner.hw.is_high(pin.number()))
        })
    }

    // Pin handles

    /// Digital output handle for an output pin without a task
    pub fn output_pin(&self, pin: Pin) -> Result<GpioteOutput<'_, H>, Error> {
        self.with_pin(pin, |inner| {
            let record = inner.table.get(pin);
            if record.role() != Role::Output || record.task().is_some() {
                return Err(Error::InvalidParam);
            }
            Ok(())
        })?;
        Ok(GpioteOutput { driver: self, pin })
    }

    /// Digital input handle for a configured pin
    pub fn input_pin(&self, pin: Pin) -> Result<GpioteInput<'_, H>, Error> {
        self.with_pin(pin, |inner| {
            if !inner.table.get(pin).is_configured() {
                return Err(Error::InvalidParam);
            }
            Ok(())
        })?;
        Ok(GpioteInput { driver: self, pin })
    }

    // Interrupt

    /// Handle the GPIOTE interrupt
    ///
    /// Sensing pins are reported first in ascending pin order, then channel
    /// events in ascending channel order. Handlers run outside the lock.
    pub fn on_interrupt(&self) {
        let pending = self.with(|inner| {
            if !inner.initialized {
                return None;
            }
            let mask = inner.config.app_channel_mask();
            let fired = take_channel_events(&mut inner.hw, mask);
            let port = take_port_event(&mut inner.hw);
            Some((fired, port))
        });
        let Some((fired, port)) = pending else {
            trace!("GPIOTE interrupt while uninitialized");
            return;
        };

        if port {
            for _ in 0..MAX_PORT_PASSES {
                let (events, moved) = self.with(|inner| {
                    let count = inner.config.pin_count;
                    let before = sensing_levels(&inner.hw, &inner.table, count);
                    let events = scan_sensing(&mut inner.hw, &inner.table, count, before);
                    let after = sensing_levels(&inner.hw, &inner.table, count);
                    (events, before != after)
                });
                self.deliver(&events);
                if !moved {
                    break;
                }
            }
        }

        if fired != 0 {
            let events = self.with(|inner| resolve_channels(fired, &inner.table));
            self.deliver(&events);
        }
    }

    fn deliver(&self, events: &[PinEvent]) {
        for event in events {
            // A handler earlier in the batch may have changed this pin
            let handler = self.with(|inner| {
                let record = inner.table.get(event.pin);
                if !record.is_enabled() {
                    return None;
                }
                select_handler(record.handler(), inner.global)
            });

            match handler {
                Some(handler) => handler.call(event.pin, event.trigger),
                None => trace!("pin {} event dropped", event.pin.number()),
            }
        }
    }
}

/// Output pin handle
///
/// Writes go straight to the port; reconfiguring the pin while the handle
/// is alive is the caller's concern.
pub struct GpioteOutput<'a, H> {
    driver: &'a Gpiote<H>,
    pin: Pin,
}

impl<H: GpioteHardware> GpioteOutput<'_, H> {
    /// Pin behind the handle
    pub fn pin(&self) -> Pin {
        self.pin
    }
}

impl<H: GpioteHardware> OutputPin for GpioteOutput<'_, H> {
    fn set_high(&mut self) {
        let n = self.pin.number();
        self.driver.with_hardware(|hw| hw.set_high(n));
    }

    fn set_low(&mut self) {
        let n = self.pin.number();
        self.driver.with_hardware(|hw| hw.set_low(n));
    }

    fn toggle(&mut self) {
        let n = self.pin.number();
        self.driver.with_hardware(|hw| hw.toggle(n));
    }

    fn is_set_high(&self) -> bool {
        let n = self.pin.number();
        self.driver.with_hardware(|hw| hw.is_set_high(n))
    }
}

/// Input pin handle
pub struct GpioteInput<'a, H> {
    driver: &'a Gpiote<H>,
    pin: Pin,
}

impl<H: GpioteHardware> GpioteInput<'_, H> {
    /// Pin behind the handle
    pub fn pin(&self) -> Pin {
        self.pin
    }
}

impl<H: GpioteHardware> InputPin for GpioteInput<'_, H> {
    fn is_high(&self) -> bool {
        let n = self.pin.number();
        self.driver.with_hardware(|hw| hw.is_high(n))
    }
}
