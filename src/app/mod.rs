//! Application core: the relay pipeline, zero direct I/O.
//!
//! The receive and dispatch stages, the command set and the diagnostic
//! reports.  All interaction with hardware happens through the **port
//! traits** in [`ports`], keeping this layer testable without a UART.

pub mod commands;
pub mod dispatch;
pub mod events;
pub mod ports;
pub mod receive;
