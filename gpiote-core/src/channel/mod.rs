//! GPIOTE channel allocation
//!
//! Channels are a finite hardware resource shared by every pin that needs
//! an IN event or an OUT task. The pool is independent of the driver
//! lifecycle: it can be used before `init` and after `uninit`.

pub mod pool;

pub use pool::{Channel, ChannelPool};
