//! Receive stage: the UART side of the pipeline.
//!
//! Sole reader of the UART event source and sole owner of the RX work
//! buffer.  For every data-ready event it reads the pending bytes, echoes
//! them back unchanged and forwards an owned copy to the dispatch stage.
//! It never blocks on the dispatch stage for longer than the enqueue
//! timeout: when the handoff queue stays full the command is dropped.
//!
//! ```text
//!  EventSource ──▶ ┌──────────────┐ ──▶ HandoffQueue
//!  SerialPort  ◀─▶ │ ReceiveStage │
//!                  └──────────────┘ ──▶ EventSink
//! ```

use core::time::Duration;
use std::sync::Arc;

use crate::channels::{CommandBuffer, HANDOFF_DEPTH, HandoffQueue};
use crate::config::PipelineConfig;
use crate::diagnostics::PipelineStats;
use crate::error::{Error, Result};
use crate::events::UartEvent;

use super::events::{PipelineEvent, preview};
use super::ports::{EventSink, EventSource, SerialPort};

/// What one event amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxOutcome {
    /// Zero-length data event or zero-byte read.
    Skipped,
    /// `n` bytes echoed and queued for dispatch.
    Forwarded(usize),
    /// `n` bytes echoed but the command was discarded.
    Dropped(usize),
    /// RX buffer flushed and event source reset.
    Resynced,
    /// Reported only; no buffer action.
    Reported,
}

pub struct ReceiveStage<E, S, K, const N: usize = HANDOFF_DEPTH> {
    events: E,
    serial: S,
    sink: K,
    queue: Arc<HandoffQueue<N>>,
    stats: Arc<PipelineStats>,
    rx_buf: Vec<u8>,
    read_timeout: Duration,
    enqueue_timeout: Duration,
}

impl<E, S, K, const N: usize> ReceiveStage<E, S, K, N>
where
    E: EventSource,
    S: SerialPort,
    K: EventSink,
{
    /// Build the stage and allocate its RX work buffer.
    ///
    /// Allocation failure is fatal for this stage: it is reported through
    /// `sink` and returned as [`Error::Init`] so the caller never enters
    /// the loop.
    pub fn new(
        events: E,
        serial: S,
        mut sink: K,
        queue: Arc<HandoffQueue<N>>,
        stats: Arc<PipelineStats>,
        config: &PipelineConfig,
    ) -> Result<Self> {
        let size = config.rx_buffer_size;
        let mut rx_buf = Vec::new();
        if size < 2 || rx_buf.try_reserve_exact(size).is_err() {
            sink.emit(&PipelineEvent::RxBufferAllocFailed { size });
            return Err(Error::Init("rx buffer allocation failed"));
        }
        rx_buf.resize(size, 0);

        Ok(Self {
            events,
            serial,
            sink,
            queue,
            stats,
            rx_buf,
            read_timeout: config.read_timeout(),
            enqueue_timeout: config.enqueue_timeout(),
        })
    }

    /// Process events forever.
    pub fn run(mut self) -> ! {
        loop {
            self.poll(None);
        }
    }

    /// Wait for one event (at most `timeout`, or forever) and handle it.
    /// Returns `None` if nothing arrived in time.
    pub fn poll(&mut self, timeout: Option<Duration>) -> Option<RxOutcome> {
        let event = self.events.recv(timeout)?;
        Some(self.handle_event(event))
    }

    pub fn handle_event(&mut self, event: UartEvent) -> RxOutcome {
        self.stats.record_event();
        match event {
            UartEvent::DataReady(size) => self.on_data(size),
            ev if ev.needs_resync() => self.resync(ev),
            ev if ev.is_line_error() => {
                self.stats.record_line_error();
                self.sink.emit(&PipelineEvent::LineError(ev));
                RxOutcome::Reported
            }
            _ => {
                self.sink.emit(&PipelineEvent::UnhandledEvent(event));
                RxOutcome::Reported
            }
        }
    }

    // ── Data path ─────────────────────────────────────────────

    fn on_data(&mut self, size: usize) -> RxOutcome {
        if size == 0 {
            return RxOutcome::Skipped;
        }
        let want = size.min(self.rx_buf.len() - 1);

        let len = match self.serial.read(&mut self.rx_buf[..want], self.read_timeout) {
            Ok(0) => return RxOutcome::Skipped,
            Ok(n) => n.min(want),
            Err(e) => {
                self.sink.emit(&PipelineEvent::ReadFailed(e));
                return RxOutcome::Skipped;
            }
        };
        let data = &self.rx_buf[..len];

        self.sink.emit(&PipelineEvent::DataReceived {
            len,
            preview: preview(data),
        });

        match self.serial.write(data) {
            Ok(written) => {
                self.stats.record_echo(written);
                if written < len {
                    self.sink.emit(&PipelineEvent::EchoIncomplete {
                        expected: len,
                        written,
                    });
                }
            }
            Err(e) => self.sink.emit(&PipelineEvent::EchoFailed(e)),
        }

        let Some(cmd) = CommandBuffer::try_copy_from(data) else {
            self.stats.record_dropped();
            self.sink.emit(&PipelineEvent::CommandAllocFailed { len });
            return RxOutcome::Dropped(len);
        };

        match self.queue.send_timeout(cmd, self.enqueue_timeout) {
            Ok(()) => {
                self.stats.record_forwarded();
                RxOutcome::Forwarded(len)
            }
            Err(_) => {
                self.stats.record_dropped();
                self.sink.emit(&PipelineEvent::CommandDropped { len });
                RxOutcome::Dropped(len)
            }
        }
    }

    // ── Overflow recovery ─────────────────────────────────────

    fn resync(&mut self, cause: UartEvent) -> RxOutcome {
        if let Err(e) = self.serial.flush_input() {
            self.sink.emit(&PipelineEvent::FlushFailed(e));
        }
        self.events.reset();
        self.stats.record_resync();
        self.sink.emit(&PipelineEvent::Resynced(cause));
        RxOutcome::Resynced
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn rx_capacity(&self) -> usize {
        self.rx_buf.len()
    }

    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    pub fn serial(&self) -> &S {
        &self.serial
    }

    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }
}
