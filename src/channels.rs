//! Inter-task handoff of command buffers.
//!
//! Uses an `embassy-sync` bounded MPMC channel to move owned
//! [`CommandBuffer`]s from the receive stage to the dispatch stage.  The
//! queue is created once at startup and shared through an `Arc`; it is the
//! only synchronised boundary between the two tasks.
//!
//! ```text
//! ┌───────────────┐  CommandBuffer  ┌────────────────┐
//! │ Receive Stage │───────────────▶│ Dispatch Stage │
//! │ (pri 10)      │  depth 5, FIFO  │ (pri 9)        │
//! └───────────────┘                 └────────────────┘
//! ```

use core::fmt;
use core::time::Duration;

use async_io_mini::Timer;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use futures_lite::future;

/// Default handoff depth (commands in flight between the two stages).
pub const HANDOFF_DEPTH: usize = 5;

/// The queue stayed full for the whole enqueue wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnqueueTimeout;

impl fmt::Display for EnqueueTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handoff queue full")
    }
}

// ── Command buffer ───────────────────────────────────────────

/// Owned copy of the bytes from one data-ready event.
///
/// Move-only: the receive stage gives it to the queue, the queue gives it
/// to the dispatch stage.  Dropping it is the only way to release it.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandBuffer {
    bytes: Vec<u8>,
}

impl CommandBuffer {
    /// Copy `data` into a buffer sized exactly to it.
    ///
    /// Returns `None` if the allocation cannot be satisfied.
    pub fn try_copy_from(data: &[u8]) -> Option<Self> {
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(data.len()).ok()?;
        bytes.extend_from_slice(data);
        Some(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Strip trailing `\r` / `\n` in place and return the remaining token.
    pub fn trim_line_ending(&mut self) -> &[u8] {
        let keep = crate::app::commands::trim_line_ending(&self.bytes).len();
        self.bytes.truncate(keep);
        &self.bytes
    }
}

// ── Handoff queue ────────────────────────────────────────────

/// Bounded FIFO carrying command buffers between tasks.
///
/// Safe for any number of producers; capacity accounting is done under the
/// channel's critical section.
pub struct HandoffQueue<const N: usize = HANDOFF_DEPTH> {
    channel: Channel<CriticalSectionRawMutex, CommandBuffer, N>,
}

impl<const N: usize> HandoffQueue<N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Enqueue `cmd`, suspending for at most `timeout` while the queue is
    /// full.
    ///
    /// The calling task is suspended on the channel waker and a reactor
    /// timer, never spinning.  On timeout `cmd` is destroyed here.
    pub fn send_timeout(&self, cmd: CommandBuffer, timeout: Duration) -> Result<(), EnqueueTimeout> {
        let cmd = match self.channel.try_send(cmd) {
            Ok(()) => return Ok(()),
            Err(TrySendError::Full(cmd)) => cmd,
        };
        if timeout.is_zero() {
            return Err(EnqueueTimeout);
        }

        let sent = future::block_on(future::or(
            async {
                self.channel.send(cmd).await;
                true
            },
            async {
                Timer::after(timeout).await;
                false
            },
        ));
        if sent { Ok(()) } else { Err(EnqueueTimeout) }
    }

    /// Block until a buffer is available and take ownership of it.
    pub fn receive(&self) -> CommandBuffer {
        future::block_on(self.channel.receive())
    }

    /// Take the next buffer without waiting.
    pub fn try_receive(&self) -> Option<CommandBuffer> {
        self.channel.try_receive().ok()
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.channel.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for HandoffQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────
