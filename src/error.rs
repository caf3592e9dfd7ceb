//! Unified error types for the UART relay firmware.
//!
//! `Error` covers stage startup; `SerialError` and `ActuatorError` are the
//! port-level faults carried inside diagnostic reports.  All are `Copy` so
//! they can be handed to the sink without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Stage construction failures.  Runtime faults never surface here; the
/// stages report them through the sink and carry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A startup precondition failed (allocation, driver install).
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Serial errors
// ---------------------------------------------------------------------------

/// Failures reported by a [`SerialPort`](crate::app::ports::SerialPort).
/// The payload is the driver's raw return code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialError {
    ReadFailed(i32),
    WriteFailed(i32),
    FlushFailed(i32),
}

impl fmt::Display for SerialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed(rc) => write!(f, "read failed (rc={rc})"),
            Self::WriteFailed(rc) => write!(f, "write failed (rc={rc})"),
            Self::FlushFailed(rc) => write!(f, "flush failed (rc={rc})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed.
    GpioWriteFailed,
    /// The adapter does not drive the requested pin.
    UnknownPin(i32),
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::UnknownPin(pin) => write!(f, "GPIO {pin} not owned by this output"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
