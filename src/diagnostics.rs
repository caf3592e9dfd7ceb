//! Runtime counters for the relay pipeline.
//!
//! Both stages bump lock-free counters in a shared [`PipelineStats`];
//! the main task logs a [`StatsSnapshot`] on a fixed interval.  Counters
//! wrap on overflow and are never reset.

use core::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// Shared counters, one writer stage per field.
#[derive(Debug, Default)]
pub struct PipelineStats {
    events: AtomicU32,
    bytes_echoed: AtomicU32,
    commands_forwarded: AtomicU32,
    commands_dropped: AtomicU32,
    resyncs: AtomicU32,
    line_errors: AtomicU32,
    commands_dispatched: AtomicU32,
    commands_unknown: AtomicU32,
    actuator_failures: AtomicU32,
}

/// Point-in-time copy of [`PipelineStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub events: u32,
    pub bytes_echoed: u32,
    pub commands_forwarded: u32,
    pub commands_dropped: u32,
    pub resyncs: u32,
    pub line_errors: u32,
    pub commands_dispatched: u32,
    pub commands_unknown: u32,
    pub actuator_failures: u32,
}

fn bump(counter: &AtomicU32, by: u32) {
    counter.fetch_add(by, Ordering::Relaxed);
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Receive stage ────────────────────────────────────────

    pub fn record_event(&self) {
        bump(&self.events, 1);
    }

    pub fn record_echo(&self, bytes: usize) {
        bump(&self.bytes_echoed, bytes as u32);
    }

    pub fn record_forwarded(&self) {
        bump(&self.commands_forwarded, 1);
    }

    pub fn record_dropped(&self) {
        bump(&self.commands_dropped, 1);
    }

    pub fn record_resync(&self) {
        bump(&self.resyncs, 1);
    }

    pub fn record_line_error(&self) {
        bump(&self.line_errors, 1);
    }

    // ── Dispatch stage ───────────────────────────────────────

    pub fn record_dispatched(&self) {
        bump(&self.commands_dispatched, 1);
    }

    pub fn record_unknown(&self) {
        bump(&self.commands_unknown, 1);
    }

    pub fn record_actuator_failure(&self) {
        bump(&self.actuator_failures, 1);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let get = |c: &AtomicU32| c.load(Ordering::Relaxed);
        StatsSnapshot {
            events: get(&self.events),
            bytes_echoed: get(&self.bytes_echoed),
            commands_forwarded: get(&self.commands_forwarded),
            commands_dropped: get(&self.commands_dropped),
            resyncs: get(&self.resyncs),
            line_errors: get(&self.line_errors),
            commands_dispatched: get(&self.commands_dispatched),
            commands_unknown: get(&self.commands_unknown),
            actuator_failures: get(&self.actuator_failures),
        }
    }
}

impl StatsSnapshot {
    /// Commands handed to the queue but not yet dispatched.
    pub fn in_flight(&self) -> u32 {
        self.commands_forwarded.wrapping_sub(self.commands_dispatched)
    }
}
