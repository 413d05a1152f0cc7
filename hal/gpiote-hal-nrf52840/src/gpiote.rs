//! GPIOTE peripheral registers

use cortex_m::peripheral::NVIC;
use gpiote_hal::{EventId, GpiotePeripheral, Level, Polarity, TaskId, MAX_IRQ_PRIORITY};

use crate::pac::Interrupt;
use crate::{bits, gpiote_regs, Nrf52840Gpiote, NVIC_PRIO_BITS};

impl GpiotePeripheral for Nrf52840Gpiote {
    fn configure_event(&mut self, channel: u8, pin: u8, polarity: Polarity) {
        let config = bits::event_config(pin, polarity);
        // SAFETY: every bit pattern from `bits` is a valid CONFIG value
        gpiote_regs().config[usize::from(channel)].write(|w| unsafe { w.bits(config) });
    }

    fn configure_task(&mut self, channel: u8, pin: u8, polarity: Polarity, init: Level) {
        let config = bits::task_config(pin, polarity, init);
        gpiote_regs().config[usize::from(channel)].write(|w| unsafe { w.bits(config) });
    }

    fn enable_event(&mut self, channel: u8) {
        gpiote_regs().config[usize::from(channel)]
            .modify(|r, w| unsafe { w.bits(bits::with_mode_event(r.bits())) });
    }

    fn enable_task(&mut self, channel: u8) {
        gpiote_regs().config[usize::from(channel)]
            .modify(|r, w| unsafe { w.bits(bits::with_mode_task(r.bits())) });
    }

    fn disable_channel(&mut self, channel: u8) {
        gpiote_regs().config[usize::from(channel)]
            .modify(|r, w| unsafe { w.bits(bits::with_mode_disabled(r.bits())) });
    }

    fn reset_channel(&mut self, channel: u8) {
        let regs = gpiote_regs();
        regs.config[usize::from(channel)].write(|w| unsafe { w.bits(0) });
        regs.events_in[usize::from(channel)].write(|w| unsafe { w.bits(0) });
    }

    fn event_pending(&self, event: EventId) -> bool {
        let regs = gpiote_regs();
        match event {
            EventId::In(ch) => regs.events_in[usize::from(ch)].read().bits() != 0,
            EventId::Port => regs.events_port.read().bits() != 0,
        }
    }

    fn clear_event(&mut self, event: EventId) {
        let regs = gpiote_regs();
        match event {
            EventId::In(ch) => regs.events_in[usize::from(ch)].write(|w| unsafe { w.bits(0) }),
            EventId::Port => regs.events_port.write(|w| unsafe { w.bits(0) }),
        }
        // Make sure the clear lands before the interrupt returns
        let _ = self.event_pending(event);
    }

    fn enable_interrupts(&mut self, mask: u32) {
        gpiote_regs().intenset.write(|w| unsafe { w.bits(mask) });
    }

    fn disable_interrupts(&mut self, mask: u32) {
        gpiote_regs().intenclr.write(|w| unsafe { w.bits(mask) });
    }

    fn interrupts_enabled(&self, mask: u32) -> bool {
        gpiote_regs().intenset.read().bits() & mask == mask
    }

    fn trigger_task(&mut self, task: TaskId) {
        let regs = gpiote_regs();
        match task {
            TaskId::Out(ch) => regs.tasks_out[usize::from(ch)].write(|w| unsafe { w.bits(1) }),
            TaskId::Set(ch) => regs.tasks_set[usize::from(ch)].write(|w| unsafe { w.bits(1) }),
            TaskId::Clr(ch) => regs.tasks_clr[usize::from(ch)].write(|w| unsafe { w.bits(1) }),
        }
    }

    fn force_task(&mut self, channel: u8, level: Level) {
        // Rewriting OUTINIT in task mode drives the pin immediately
        gpiote_regs().config[usize::from(channel)].modify(|r, w| unsafe {
            let config = r.bits() & !bits::OUTINIT_HIGH;
            match level {
                Level::High => w.bits(config | bits::OUTINIT_HIGH),
                Level::Low => w.bits(config),
            }
        });
    }

    fn task_address(&self, task: TaskId) -> u32 {
        let regs = gpiote_regs();
        let reg = match task {
            TaskId::Out(ch) => &regs.tasks_out[usize::from(ch)] as *const _ as *const u32,
            TaskId::Set(ch) => &regs.tasks_set[usize::from(ch)] as *const _ as *const u32,
            TaskId::Clr(ch) => &regs.tasks_clr[usize::from(ch)] as *const _ as *const u32,
        };
        reg as u32
    }

    fn event_address(&self, event: EventId) -> u32 {
        let regs = gpiote_regs();
        let reg = match event {
            EventId::In(ch) => &regs.events_in[usize::from(ch)] as *const _ as *const u32,
            EventId::Port => &regs.events_port as *const _ as *const u32,
        };
        reg as u32
    }

    fn enable_irq(&mut self, priority: u8) {
        NVIC::unpend(Interrupt::GPIOTE);
        // SAFETY: only the GPIOTE line is touched, and its handler is the
        // driver's `on_interrupt`
        unsafe {
            let mut core = cortex_m::Peripherals::steal();
            let level = priority.min(MAX_IRQ_PRIORITY);
            core.NVIC
                .set_priority(Interrupt::GPIOTE, level << (8 - NVIC_PRIO_BITS));
            NVIC::unmask(Interrupt::GPIOTE);
        }
        #[cfg(feature = "defmt")]
        defmt::debug!("GPIOTE IRQ enabled at priority {}", priority);
    }

    fn disable_irq(&mut self) {
        NVIC::mask(Interrupt::GPIOTE);
        NVIC::unpend(Interrupt::GPIOTE);
    }
}
