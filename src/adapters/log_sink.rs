//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every [`PipelineEvent`] to the
//! `log` facade under one fixed target, at the level the event carries.
//! On the device `esp_idf_logger` routes this to the console UART.

use log::Level;

use crate::app::events::{PipelineEvent, Severity};
use crate::app::ports::EventSink;

/// Source label attached to every report.
pub const LOG_TAG: &str = "UART_ECHO";

/// Adapter that logs every [`PipelineEvent`] to the serial console.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn level_for(severity: Severity) -> Level {
    match severity {
        Severity::Info => Level::Info,
        Severity::Warning => Level::Warn,
        Severity::Error => Level::Error,
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &PipelineEvent) {
        log::log!(target: LOG_TAG, level_for(event.severity()), "{}", event);
    }
}
