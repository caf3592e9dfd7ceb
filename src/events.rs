//! Interrupt-driven UART event model.
//!
//! Events are produced by the UART driver's ISR and delivered through its
//! FreeRTOS event queue.  The receive stage consumes them one at a time,
//! in delivery order.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ UART ISR    │────▶│  Event Queue │────▶│ Receive Stage │
//! │ (driver)    │     │  (depth 20)  │     │  (consumer)   │
//! └─────────────┘     └──────────────┘     └───────────────┘
//! ```

use core::fmt;

/// Events raised by the UART driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartEvent {
    /// `n` bytes are waiting in the driver's RX ring buffer.
    DataReady(usize),
    /// The hardware RX FIFO overflowed before the ISR drained it.
    FifoOverflow,
    /// The driver's RX ring buffer is full.
    BufferFull,
    /// A byte arrived with a bad stop bit.
    FrameError,
    /// A byte failed its parity check.
    ParityError,
    /// Any other driver event (break, pattern detect, ...), by raw code.
    Other(u32),
}

impl UartEvent {
    /// Overflow-class events that require flushing the RX path.
    pub fn needs_resync(self) -> bool {
        matches!(self, Self::FifoOverflow | Self::BufferFull)
    }

    /// Line-level errors: reported, no buffer action.
    pub fn is_line_error(self) -> bool {
        matches!(self, Self::FrameError | Self::ParityError)
    }
}

impl fmt::Display for UartEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataReady(n) => write!(f, "data ready ({n} B)"),
            Self::FifoOverflow => write!(f, "FIFO overflow"),
            Self::BufferFull => write!(f, "ring buffer full"),
            Self::FrameError => write!(f, "frame error"),
            Self::ParityError => write!(f, "parity error"),
            Self::Other(code) => write!(f, "event {code}"),
        }
    }
}

#[cfg(target_os = "espidf")]
impl From<&esp_idf_svc::sys::uart_event_t> for UartEvent {
    fn from(raw: &esp_idf_svc::sys::uart_event_t) -> Self {
        use esp_idf_svc::sys::*;

        #[allow(non_upper_case_globals)]
        match raw.type_ {
            uart_event_type_t_UART_DATA => Self::DataReady(raw.size),
            uart_event_type_t_UART_FIFO_OVF => Self::FifoOverflow,
            uart_event_type_t_UART_BUFFER_FULL => Self::BufferFull,
            uart_event_type_t_UART_FRAME_ERR => Self::FrameError,
            uart_event_type_t_UART_PARITY_ERR => Self::ParityError,
            other => Self::Other(other),
        }
    }
}
