//! Transition planning
//!
//! Every request is checked against the pin's current record and either
//! rejected with [`Error::InvalidParam`] or turned into a [`Transition`]:
//! the record to commit plus the electrical configuration to write.
//!
//! ```text
//!                configure_input                configure_output
//!   Unconfigured ───────────────► Input ◄──────────────────────► Output
//!        ▲                          │  (no event channel)  (no task)  │
//!        └────────── pin_uninit ────┴─────────────────────────────────┘
//! ```

use gpiote_hal::{InputBuffer, Polarity};

use crate::channel::Channel;
use crate::dispatch::HandlerConfig;
use crate::error::Error;
use crate::pin::{
    Detection, InputConfig, OutputConfig, Pin, PinRecord, PinState, TaskBinding, TaskConfig,
    Trigger, TriggerConfig,
};

/// Electrical configuration to write as part of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Electrical {
    /// Configure the pin as an input
    Input(InputConfig),
    /// Configure the pin as an output
    Output(OutputConfig),
}

/// Accepted transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Record to commit
    pub record: PinRecord,
    /// Pin configuration to write, if it changes
    pub electrical: Option<Electrical>,
}

impl Transition {
    fn unchanged(record: &PinRecord) -> Self {
        Self {
            record: *record,
            electrical: None,
        }
    }
}

fn reject<T>(pin: Pin, reason: &'static str) -> Result<T, Error> {
    debug!("pin {} rejected: {}", pin.number(), reason);
    Err(Error::InvalidParam)
}

/// Plan `configure_input`
///
/// `channel_usable` reports whether a caller-supplied channel is allocated
/// and not wired to another pin.
pub fn plan_input(
    pin: Pin,
    current: &PinRecord,
    input: Option<InputConfig>,
    trigger: Option<TriggerConfig>,
    handler: Option<HandlerConfig>,
    channel_usable: impl Fn(Channel) -> bool,
) -> Result<Transition, Error> {
    if input.is_none() && trigger.is_none() && handler.is_none() {
        return Ok(Transition::unchanged(current));
    }

    let mut next = *current;
    let mut electrical = None;

    // An untouched input aspect on a fresh pin still makes it an input
    let input = match (input, current.state) {
        (None, PinState::Unconfigured) => Some(InputConfig::default()),
        (input, _) => input,
    };

    if let Some(config) = input {
        next.state = match current.state {
            PinState::Output { task: Some(_), .. } => {
                return reject(pin, "task still bound to output");
            }
            PinState::Unconfigured => PinState::Input {
                config,
                detection: Detection::Off,
            },
            PinState::Input { detection, .. } | PinState::Output { detection, .. } => {
                PinState::Input { config, detection }
            }
        };
        electrical = Some(Electrical::Input(config));
    }

    if let Some(requested) = trigger {
        let detection = match (requested.trigger, requested.channel) {
            (Trigger::None, None) => Detection::Off,
            (Trigger::None, Some(_)) => return reject(pin, "channel without trigger"),
            (trigger, None) => Detection::Sense(trigger),
            (trigger, Some(channel)) => {
                let Some(edge) = trigger.edge() else {
                    return reject(pin, "level trigger on a channel");
                };
                if !channel_usable(channel) {
                    return reject(pin, "channel not allocated or in use");
                }
                Detection::Event { channel, edge }
            }
        };

        match &mut next.state {
            PinState::Input { detection: d, .. } => *d = detection,
            PinState::Output {
                config,
                detection: d,
                ..
            } => {
                if detection.channel().is_some() {
                    return reject(pin, "channel event on output");
                }
                if detection.is_sensing() && config.input != InputBuffer::Connect {
                    return reject(pin, "sensing output with input disconnected");
                }
                *d = detection;
            }
            PinState::Unconfigured => return reject(pin, "unconfigured"),
        }

        if next.detection() != current.detection() {
            next.enabled = false;
        }
    }

    if let Some(requested) = handler {
        next.handler = requested.handler;
    }

    Ok(Transition {
        record: next,
        electrical,
    })
}

/// Plan `configure_output`
pub fn plan_output(
    pin: Pin,
    current: &PinRecord,
    output: Option<OutputConfig>,
    task: Option<TaskConfig>,
    channel_usable: impl Fn(Channel) -> bool,
) -> Result<Transition, Error> {
    let mut next = *current;
    let mut electrical = None;

    if let Some(config) = output {
        let (task, detection) = match current.state {
            PinState::Input {
                detection: Detection::Event { .. },
                ..
            } => return reject(pin, "input channel event still configured"),
            PinState::Unconfigured => (None, Detection::Off),
            PinState::Input { detection, .. } => (None, detection),
            PinState::Output {
                task, detection, ..
            } => (task, detection),
        };
        if detection.is_sensing() && config.input != InputBuffer::Connect {
            return reject(pin, "sensing output with input disconnected");
        }

        next.state = PinState::Output {
            config,
            task,
            detection,
        };
        electrical = Some(Electrical::Output(config));
    }

    if let Some(requested) = task {
        let PinState::Output { task: bound, .. } = &mut next.state else {
            return reject(pin, "task on a pin that is not an output");
        };

        *bound = match requested.polarity {
            Polarity::None => None,
            polarity => {
                if !channel_usable(requested.channel) {
                    return reject(pin, "channel not allocated or in use");
                }
                Some(TaskBinding {
                    channel: requested.channel,
                    polarity,
                    init: requested.init,
                })
            }
        };
    }

    Ok(Transition {
        record: next,
        electrical,
    })
}

/// Plan `pin_uninit`
pub fn plan_uninit(pin: Pin, current: &PinRecord) -> Result<Transition, Error> {
    if !current.is_configured() {
        return reject(pin, "uninit of unconfigured pin");
    }
    Ok(Transition::unchanged(&PinRecord::UNCONFIGURED))
}

/// Plan `trigger_enable`
///
/// Sensing only works through the interrupt path, which re-arms the sense
/// level, so it can't be enabled without interrupt delivery.
pub fn plan_trigger_enable(
    pin: Pin,
    current: &PinRecord,
    interrupt: bool,
) -> Result<PinRecord, Error> {
    match current.detection() {
        Detection::Off => reject(pin, "no trigger configured"),
        Detection::Sense(_) if !interrupt => reject(pin, "sensing needs the interrupt"),
        Detection::Sense(_) | Detection::Event { .. } => Ok(PinRecord {
            enabled: true,
            ..*current
        }),
    }
}
