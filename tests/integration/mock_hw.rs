//! Mock peripherals for integration tests.
//!
//! Records every UART write, flush and event-queue reset, and every GPIO
//! call, so tests can assert on the full history without a real UART.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use uart_relay::app::events::PipelineEvent;
use uart_relay::app::ports::{EventSink, EventSource, OutputLevel, OutputPort, SerialPort};
use uart_relay::error::{ActuatorError, SerialError};
use uart_relay::events::UartEvent;

// ── MockEvents ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockEvents {
    pub pending: VecDeque<UartEvent>,
    pub resets: usize,
}

impl EventSource for MockEvents {
    fn recv(&mut self, _timeout: Option<Duration>) -> Option<UartEvent> {
        self.pending.pop_front()
    }

    fn reset(&mut self) {
        self.pending.clear();
        self.resets += 1;
    }
}

// ── MockSerial ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockSerial {
    /// Bytes waiting in the "driver ring buffer".
    pub rx: VecDeque<u8>,
    /// Everything written back (the echo).
    pub tx: Vec<u8>,
    pub flushes: usize,
    /// Cap on bytes returned per read, to simulate short reads.
    pub max_read: Option<usize>,
    /// Cap on bytes accepted per write.
    pub max_write: Option<usize>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl SerialPort for MockSerial {
    fn read(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize, SerialError> {
        if self.fail_reads {
            return Err(SerialError::ReadFailed(-1));
        }
        let n = buf
            .len()
            .min(self.rx.len())
            .min(self.max_read.unwrap_or(usize::MAX));
        for slot in &mut buf[..n] {
            *slot = self.rx.pop_front().unwrap();
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, SerialError> {
        if self.fail_writes {
            return Err(SerialError::WriteFailed(-1));
        }
        let n = data.len().min(self.max_write.unwrap_or(usize::MAX));
        self.tx.extend_from_slice(&data[..n]);
        Ok(n)
    }

    fn flush_input(&mut self) -> Result<(), SerialError> {
        self.rx.clear();
        self.flushes += 1;
        Ok(())
    }
}

// ── MockOutput ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockOutput {
    pub calls: Vec<(i32, OutputLevel)>,
    pub fail: bool,
}

#[allow(dead_code)]
impl MockOutput {
    pub fn count(&self, level: OutputLevel) -> usize {
        self.calls.iter().filter(|(_, l)| *l == level).count()
    }
}

impl OutputPort for MockOutput {
    fn set_level(&mut self, pin: i32, level: OutputLevel) -> Result<(), ActuatorError> {
        if self.fail {
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.calls.push((pin, level));
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Event sink whose clones share one history, so reports stay visible
/// after the sink has been moved into a stage or a thread.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<PipelineEvent>>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&PipelineEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &PipelineEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
