//! Outbound diagnostic reports.
//!
//! Both stages emit these through the [`EventSink`](super::ports::EventSink)
//! port.  Each carries its own [`Severity`]; the adapter on the other side
//! decides where it ends up (serial log in production, a `Vec` in tests).

use core::fmt::{self, Write};

use crate::diagnostics::StatsSnapshot;
use crate::error::{ActuatorError, SerialError};
use crate::events::UartEvent;

use super::ports::OutputLevel;

/// Maximum characters kept when quoting received data in a report.
pub const PREVIEW_LEN: usize = 32;

/// Printable, bounded quotation of received bytes.
pub type Preview = heapless::String<PREVIEW_LEN>;

/// Report level, mapped onto `log` levels by the log adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Structured reports emitted by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    // ── Receive stage ─────────────────────────────────────────
    /// The RX work buffer could not be allocated; the stage halts.
    RxBufferAllocFailed { size: usize },
    /// Bytes were read from the UART for one data-ready event.
    DataReceived { len: usize, preview: Preview },
    /// The UART read returned an error.
    ReadFailed(SerialError),
    /// The echo write returned an error.
    EchoFailed(SerialError),
    /// The driver accepted fewer echo bytes than were read.
    EchoIncomplete { expected: usize, written: usize },
    /// No memory for the command copy; the command is lost.
    CommandAllocFailed { len: usize },
    /// The handoff queue stayed full for the whole wait; the command is lost.
    CommandDropped { len: usize },
    /// FIFO overflow or ring-buffer full; RX path flushed.
    Resynced(UartEvent),
    /// Flushing the RX buffer during a resync failed.
    FlushFailed(SerialError),
    /// Frame or parity error on the line.
    LineError(UartEvent),
    /// Driver event the pipeline does not act on.
    UnhandledEvent(UartEvent),

    // ── Dispatch stage ────────────────────────────────────────
    /// A trimmed token is about to be matched.
    Processing(Preview),
    /// The control output was switched.
    OutputSwitched(OutputLevel),
    /// The token matched no command.
    UnknownCommand(Preview),
    /// The output port rejected the level change.
    ActuatorFailed { level: OutputLevel, error: ActuatorError },

    // ── Supervisor ────────────────────────────────────────────
    /// Periodic counter snapshot.
    Stats(StatsSnapshot),
}

impl PipelineEvent {
    pub fn severity(&self) -> Severity {
        match self {
            Self::RxBufferAllocFailed { .. }
            | Self::CommandAllocFailed { .. }
            | Self::CommandDropped { .. }
            | Self::ActuatorFailed { .. } => Severity::Error,

            Self::ReadFailed(_)
            | Self::EchoFailed(_)
            | Self::EchoIncomplete { .. }
            | Self::Resynced(_)
            | Self::FlushFailed(_)
            | Self::LineError(_) => Severity::Warning,

            Self::DataReceived { .. }
            | Self::UnhandledEvent(_)
            | Self::Processing(_)
            | Self::OutputSwitched(_)
            | Self::UnknownCommand(_)
            | Self::Stats(_) => Severity::Info,
        }
    }
}

impl fmt::Display for PipelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RxBufferAllocFailed { size } => {
                write!(f, "Failed to allocate {size} B UART buffer, receive task halted")
            }
            Self::DataReceived { len, preview } => write!(f, "Received {len} B: {preview}"),
            Self::ReadFailed(e) => write!(f, "UART read: {e}"),
            Self::EchoFailed(e) => write!(f, "Echo: {e}"),
            Self::EchoIncomplete { expected, written } => {
                write!(f, "Echo truncated: {written}/{expected} B")
            }
            Self::CommandAllocFailed { len } => {
                write!(f, "Failed to duplicate {len} B command")
            }
            Self::CommandDropped { len } => {
                write!(f, "Failed to send command to queue ({len} B dropped)")
            }
            Self::Resynced(ev) => write!(f, "UART {ev}, RX flushed"),
            Self::FlushFailed(e) => write!(f, "RX flush: {e}"),
            Self::LineError(ev) => write!(f, "UART error event: {ev}"),
            Self::UnhandledEvent(ev) => write!(f, "Unhandled UART event: {ev}"),
            Self::Processing(token) => write!(f, "Processing command: {token}"),
            Self::OutputSwitched(level) => write!(f, "GPIO turned {level}"),
            Self::UnknownCommand(token) => write!(f, "Unknown command: {token}"),
            Self::ActuatorFailed { level, error } => {
                write!(f, "GPIO {level} failed: {error}")
            }
            Self::Stats(s) => write!(
                f,
                "STATS | events={} rx={}B fwd={} drop={} resync={} line_err={} | \
                 dispatched={} unknown={} gpio_err={}",
                s.events,
                s.bytes_echoed,
                s.commands_forwarded,
                s.commands_dropped,
                s.resyncs,
                s.line_errors,
                s.commands_dispatched,
                s.commands_unknown,
                s.actuator_failures,
            ),
        }
    }
}

/// Quote `bytes` for a log line: printable ASCII verbatim, CR/LF escaped,
/// anything else as `.`.  Truncated to [`PREVIEW_LEN`].
pub fn preview(bytes: &[u8]) -> Preview {
    let mut out = Preview::new();
    for &b in bytes {
        let pushed = match b {
            b'\r' => out.write_str("\\r"),
            b'\n' => out.write_str("\\n"),
            0x20..=0x7E => out.write_char(b as char),
            _ => out.write_char('.'),
        };
        if pushed.is_err() {
            break;
        }
    }
    out
}
