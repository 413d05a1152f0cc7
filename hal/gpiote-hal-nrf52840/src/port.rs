//! GPIO port registers

use gpiote_hal::{Drive, InputBuffer, PinPort, Pull, Sense};

use crate::bits;
use crate::{port_regs, Nrf52840Gpiote};

impl PinPort for Nrf52840Gpiote {
    fn configure_input(&mut self, pin: u8, pull: Pull) {
        let (port, i) = port_regs(pin);
        // SAFETY: every bit pattern from `bits` is a valid PIN_CNF value
        port.pin_cnf[i].modify(|r, w| unsafe { w.bits(bits::input_cnf(r.bits(), pull)) });
    }

    fn configure_output(&mut self, pin: u8, drive: Drive, pull: Pull, input: InputBuffer) {
        let (port, i) = port_regs(pin);
        port.pin_cnf[i].modify(|r, w| unsafe {
            w.bits(bits::output_cnf(r.bits(), drive, pull, input))
        });
    }

    fn configure_default(&mut self, pin: u8) {
        let (port, i) = port_regs(pin);
        port.pin_cnf[i].write(|w| unsafe { w.bits(bits::PIN_CNF_RESET) });
    }

    fn set_sense(&mut self, pin: u8, sense: Sense) {
        let (port, i) = port_regs(pin);
        port.pin_cnf[i].modify(|r, w| unsafe {
            w.bits((r.bits() & !bits::SENSE_MASK) | bits::sense(sense))
        });
    }

    fn sense(&self, pin: u8) -> Sense {
        let (port, i) = port_regs(pin);
        bits::sense_from(port.pin_cnf[i].read().bits())
    }

    fn is_high(&self, pin: u8) -> bool {
        let (port, i) = port_regs(pin);
        port.in_.read().bits() & (1 << i) != 0
    }

    fn is_set_high(&self, pin: u8) -> bool {
        let (port, i) = port_regs(pin);
        port.out.read().bits() & (1 << i) != 0
    }

    fn set_high(&mut self, pin: u8) {
        let (port, i) = port_regs(pin);
        port.outset.write(|w| unsafe { w.bits(1 << i) });
    }

    fn set_low(&mut self, pin: u8) {
        let (port, i) = port_regs(pin);
        port.outclr.write(|w| unsafe { w.bits(1 << i) });
    }

    fn toggle(&mut self, pin: u8) {
        if self.is_set_high(pin) {
            self.set_low(pin);
        } else {
            self.set_high(pin);
        }
    }
}
