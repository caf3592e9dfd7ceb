//! Dispatch stage: turns queued command buffers into output changes.
//!
//! Sole reader of the handoff queue.  Each buffer is trimmed of trailing
//! line endings, matched exactly against the command set and released.
//! Nothing carries over from one command to the next.

use std::sync::Arc;

use crate::channels::{CommandBuffer, HANDOFF_DEPTH, HandoffQueue};
use crate::diagnostics::PipelineStats;

use super::commands::Command;
use super::events::{PipelineEvent, preview};
use super::ports::{EventSink, OutputLevel, OutputPort};

/// Result of dispatching one buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The output was switched to the level.
    Applied(OutputLevel),
    /// The command matched but the output port refused it.
    Failed(OutputLevel),
    /// The token matched no command.
    Unknown,
}

pub struct DispatchStage<O, K, const N: usize = HANDOFF_DEPTH> {
    output: O,
    sink: K,
    queue: Arc<HandoffQueue<N>>,
    stats: Arc<PipelineStats>,
    pin: i32,
}

impl<O, K, const N: usize> DispatchStage<O, K, N>
where
    O: OutputPort,
    K: EventSink,
{
    pub fn new(
        output: O,
        sink: K,
        queue: Arc<HandoffQueue<N>>,
        stats: Arc<PipelineStats>,
        pin: i32,
    ) -> Self {
        Self {
            output,
            sink,
            queue,
            stats,
            pin,
        }
    }

    /// Dispatch commands forever.
    pub fn run(mut self) -> ! {
        loop {
            self.dispatch_next();
        }
    }

    /// Block until a command is queued, then dispatch it.
    pub fn dispatch_next(&mut self) -> DispatchOutcome {
        let cmd = self.queue.receive();
        self.dispatch(cmd)
    }

    /// Dispatch one buffer.  The buffer is released when this returns,
    /// whatever the outcome.
    pub fn dispatch(&mut self, mut cmd: CommandBuffer) -> DispatchOutcome {
        let token = cmd.trim_line_ending();
        self.sink.emit(&PipelineEvent::Processing(preview(token)));
        self.stats.record_dispatched();

        let Some(command) = Command::parse(token) else {
            self.stats.record_unknown();
            self.sink.emit(&PipelineEvent::UnknownCommand(preview(token)));
            return DispatchOutcome::Unknown;
        };

        let level = command.level();
        match self.output.set_level(self.pin, level) {
            Ok(()) => {
                self.sink.emit(&PipelineEvent::OutputSwitched(level));
                DispatchOutcome::Applied(level)
            }
            Err(error) => {
                self.stats.record_actuator_failure();
                self.sink.emit(&PipelineEvent::ActuatorFailed { level, error });
                DispatchOutcome::Failed(level)
            }
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }
}
