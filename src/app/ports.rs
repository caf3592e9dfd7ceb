//! Port traits: the hexagonal boundary between the pipeline and the
//! outside world.
//!
//! ```text
//!   EventSource ──▶ ┌───────────────┐ ──▶ HandoffQueue ──▶ ┌────────────────┐ ──▶ OutputPort
//!   SerialPort  ◀─▶ │ ReceiveStage  │                      │ DispatchStage  │
//!                   └───────────────┘                      └────────────────┘
//!                          └──────────────▶ EventSink ◀───────────┘
//! ```
//!
//! Driven adapters (UART driver, GPIO, logger) implement these traits.
//! The stages consume them via generics, so the pipeline never touches
//! hardware directly and runs unchanged against mocks on the host.

use core::time::Duration;

use crate::error::{ActuatorError, SerialError};
use crate::events::UartEvent;

// ───────────────────────────────────────────────────────────────
// Event source (driven adapter: UART ISR → receive stage)
// ───────────────────────────────────────────────────────────────

/// Ordered, non-restartable stream of UART events.
pub trait EventSource {
    /// Wait for the next event.  `None` timeout waits forever.
    ///
    /// Returns `None` only when the timeout elapsed with nothing pending.
    fn recv(&mut self, timeout: Option<Duration>) -> Option<UartEvent>;

    /// Discard every pending event.
    fn reset(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Serial byte stream (driven adapter: receive stage ↔ UART)
// ───────────────────────────────────────────────────────────────

pub trait SerialPort {
    /// Read up to `buf.len()` bytes, waiting at most `timeout`.
    /// May return fewer bytes than requested, including zero.
    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, SerialError>;

    /// Queue `data` for transmission.  Returns the number of bytes accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize, SerialError>;

    /// Drop every unread byte in the driver's RX buffer.
    fn flush_input(&mut self) -> Result<(), SerialError>;
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: dispatch stage → GPIO)
// ───────────────────────────────────────────────────────────────

/// Binary level of the control line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLevel {
    On,
    Off,
}

impl core::fmt::Display for OutputLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::On => write!(f, "ON"),
            Self::Off => write!(f, "OFF"),
        }
    }
}

/// Write-side port for digital outputs.  No read-back.
pub trait OutputPort {
    fn set_level(&mut self, pin: i32, level: OutputLevel) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: pipeline → logging)
// ───────────────────────────────────────────────────────────────

/// The stages emit structured [`PipelineEvent`](super::events::PipelineEvent)s
/// through this port.  Implementations must not block the caller.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::PipelineEvent);
}
