//! nRF52840 backend for the GPIOTE channel driver
//!
//! Implements the `gpiote-hal` traits on top of the P0/P1 GPIO ports and
//! the GPIOTE peripheral (8 Task/Event channels, one PORT event).
//!
//! # Usage
//!
//! ```ignore
//! static GPIOTE: Gpiote<Nrf52840Gpiote> =
//!     Gpiote::new(unsafe { Nrf52840Gpiote::steal() }, GpioteConfig::NRF52840);
//!
//! #[interrupt]
//! fn GPIOTE() {
//!     GPIOTE.on_interrupt();
//! }
//! ```

#![no_std]

mod bits;
pub mod gpiote;
pub mod port;

use nrf52840_pac as pac;

/// Number of GPIOTE channels on the nRF52840
pub const CHANNEL_COUNT: u8 = 8;

/// Addressable pins: P0.00-P0.31 and P1.00-P1.15
pub const PIN_COUNT: u8 = 48;

/// Priority bits implemented by the NVIC
pub const NVIC_PRIO_BITS: u8 = 3;

/// GPIO ports and GPIOTE peripheral of the nRF52840
///
/// Holds no state; every access goes through the fixed register addresses.
pub struct Nrf52840Gpiote {
    _private: (),
}

impl Nrf52840Gpiote {
    /// Take over the peripherals
    ///
    /// Consuming the PAC singletons guarantees nothing else drives these
    /// registers through the PAC.
    pub fn new(_gpiote: pac::GPIOTE, _p0: pac::P0, _p1: pac::P1) -> Self {
        Self { _private: () }
    }

    /// Create a backend without taking the PAC singletons
    ///
    /// Usable in a `static` initializer.
    ///
    /// # Safety
    ///
    /// Nothing else may access GPIOTE, P0 or P1 for as long as the backend
    /// is in use.
    pub const unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

fn gpiote_regs() -> &'static pac::gpiote::RegisterBlock {
    // SAFETY: fixed MMIO address, access is serialized by the driver mutex
    unsafe { &*pac::GPIOTE::ptr() }
}

/// Port registers and bit index of an absolute pin
fn port_regs(pin: u8) -> (&'static pac::p0::RegisterBlock, usize) {
    let index = usize::from(pin % 32);
    // SAFETY: fixed MMIO addresses, access is serialized by the driver mutex
    let regs = unsafe {
        if pin < 32 {
            &*pac::P0::ptr()
        } else {
            &*pac::P1::ptr()
        }
    };
    (regs, index)
}
