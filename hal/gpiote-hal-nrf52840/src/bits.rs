//! Register field encodings
//!
//! Raw bit layouts of `PIN_CNF[n]` and `GPIOTE.CONFIG[n]`, kept free of
//! register access so they can be checked on the host.

use gpiote_hal::{Drive, InputBuffer, Level, Polarity, Pull, Sense};

// PIN_CNF
const DIR_OUTPUT: u32 = 1 << 0;
const INPUT_DISCONNECT: u32 = 1 << 1;
const PULL_SHIFT: u32 = 2;
const DRIVE_SHIFT: u32 = 8;
const SENSE_SHIFT: u32 = 16;
pub const SENSE_MASK: u32 = 0b11 << SENSE_SHIFT;

/// `PIN_CNF` reset value: input, buffer disconnected, no pull, no sense
pub const PIN_CNF_RESET: u32 = INPUT_DISCONNECT;

// CONFIG
const MODE_EVENT: u32 = 1;
const MODE_TASK: u32 = 3;
pub const MODE_MASK: u32 = 0b11;
const PSEL_SHIFT: u32 = 8;
const PORT_SHIFT: u32 = 13;
const POLARITY_SHIFT: u32 = 16;
pub const OUTINIT_HIGH: u32 = 1 << 20;

fn pull(pull: Pull) -> u32 {
    let bits = match pull {
        Pull::None => 0,
        Pull::Down => 1,
        Pull::Up => 3,
    };
    bits << PULL_SHIFT
}

fn drive(drive: Drive) -> u32 {
    let bits = match drive {
        Drive::S0S1 => 0,
        Drive::H0S1 => 1,
        Drive::S0H1 => 2,
        Drive::H0H1 => 3,
        Drive::D0S1 => 4,
        Drive::D0H1 => 5,
        Drive::S0D1 => 6,
        Drive::H0D1 => 7,
    };
    bits << DRIVE_SHIFT
}

pub fn sense(sense: Sense) -> u32 {
    let bits = match sense {
        Sense::None => 0,
        Sense::High => 2,
        Sense::Low => 3,
    };
    bits << SENSE_SHIFT
}

pub fn sense_from(pin_cnf: u32) -> Sense {
    match (pin_cnf & SENSE_MASK) >> SENSE_SHIFT {
        2 => Sense::High,
        3 => Sense::Low,
        _ => Sense::None,
    }
}

/// `PIN_CNF` for an input, keeping the sense field of `current`
pub fn input_cnf(current: u32, p: Pull) -> u32 {
    (current & SENSE_MASK) | pull(p)
}

/// `PIN_CNF` for an output, keeping the sense field of `current`
pub fn output_cnf(current: u32, d: Drive, p: Pull, input: InputBuffer) -> u32 {
    let buffer = match input {
        InputBuffer::Connect => 0,
        InputBuffer::Disconnect => INPUT_DISCONNECT,
    };
    (current & SENSE_MASK) | DIR_OUTPUT | buffer | pull(p) | drive(d)
}

fn polarity(polarity: Polarity) -> u32 {
    let bits = match polarity {
        Polarity::None => 0,
        Polarity::LoToHi => 1,
        Polarity::HiToLo => 2,
        Polarity::Toggle => 3,
    };
    bits << POLARITY_SHIFT
}

fn psel(pin: u8) -> u32 {
    (u32::from(pin % 32) << PSEL_SHIFT) | (u32::from(pin / 32) << PORT_SHIFT)
}

/// `CONFIG` for an IN event, mode left disabled
pub fn event_config(pin: u8, p: Polarity) -> u32 {
    psel(pin) | polarity(p)
}

/// `CONFIG` for a task, mode left disabled
pub fn task_config(pin: u8, p: Polarity, init: Level) -> u32 {
    let outinit = if init.is_high() { OUTINIT_HIGH } else { 0 };
    psel(pin) | polarity(p) | outinit
}

pub fn with_mode_event(config: u32) -> u32 {
    (config & !MODE_MASK) | MODE_EVENT
}

pub fn with_mode_task(config: u32) -> u32 {
    (config & !MODE_MASK) | MODE_TASK
}

pub fn with_mode_disabled(config: u32) -> u32 {
    config & !MODE_MASK
}
