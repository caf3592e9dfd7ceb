//! Pipeline configuration parameters
//!
//! Everything tunable about the relay, fixed at startup.  Line parameters
//! are passed through to the UART driver untouched; the pipeline itself
//! only interprets buffer sizes, timeouts and task settings.

use core::fmt;
use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::pins;

// ---------------------------------------------------------------------------
// Serial line parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parity {
    None,
    Even,
    Odd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopBits {
    One,
    OneAndHalf,
    Two,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowControl {
    None,
    Rts,
    Cts,
    RtsCts,
}

/// UART controller and line settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UartConfig {
    /// UART controller number.
    pub port: i32,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
    /// TX/RX/RTS/CTS GPIOs; `UART_PIN_NO_CHANGE` (-1) keeps the default routing.
    pub tx_pin: i32,
    pub rx_pin: i32,
    pub rts_pin: i32,
    pub cts_pin: i32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            port: pins::UART_PORT,
            baud_rate: 115_200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            tx_pin: pins::UART_PIN_NO_CHANGE,
            rx_pin: pins::UART_PIN_NO_CHANGE,
            rts_pin: pins::UART_PIN_NO_CHANGE,
            cts_pin: pins::UART_PIN_NO_CHANGE,
        }
    }
}

/// Priority and stack for one pipeline task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// FreeRTOS priority (higher preempts lower).
    pub priority: u8,
    pub stack_kb: usize,
}

// ---------------------------------------------------------------------------
// Pipeline configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    // --- UART ---
    pub uart: UartConfig,
    /// RX work buffer size (bytes); at most `rx_buffer_size - 1` are read per event.
    pub rx_buffer_size: usize,
    /// Depth of the driver's event queue.
    pub event_queue_depth: usize,

    // --- Output ---
    /// GPIO driven by `ON` / `OFF`.
    pub control_gpio: i32,

    // --- Timing ---
    /// Bounded wait for a UART read after a data event (milliseconds).
    pub read_timeout_ms: u32,
    /// Bounded wait for a free handoff slot (milliseconds).
    pub enqueue_timeout_ms: u32,
    /// Statistics log interval (seconds).
    pub stats_interval_secs: u32,

    // --- Tasks ---
    pub receive_task: TaskConfig,
    pub dispatch_task: TaskConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            // UART
            uart: UartConfig::default(),
            rx_buffer_size: 1024,
            event_queue_depth: 20,

            // Output
            control_gpio: pins::CONTROL_GPIO,

            // Timing
            read_timeout_ms: 20,
            enqueue_timeout_ms: 10,
            stats_interval_secs: 60,

            // Tasks
            receive_task: TaskConfig {
                priority: 10,
                stack_kb: 4,
            },
            dispatch_task: TaskConfig {
                priority: 9,
                stack_kb: 4,
            },
        }
    }
}

impl PipelineConfig {
    /// Parse an override document.  Missing fields are an error; the
    /// result is validated before it is returned.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rx_buffer_size < 2 {
            return Err(ConfigError::ValidationFailed(
                "rx_buffer_size must leave room for at least one byte",
            ));
        }
        if self.event_queue_depth == 0 {
            return Err(ConfigError::ValidationFailed("event_queue_depth must be > 0"));
        }
        if self.uart.baud_rate == 0 {
            return Err(ConfigError::ValidationFailed("baud_rate must be > 0"));
        }
        if self.read_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("read_timeout_ms must be > 0"));
        }
        if self.stats_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed("stats_interval_secs must be > 0"));
        }
        if self.control_gpio < 0 {
            return Err(ConfigError::ValidationFailed("control_gpio must be a real pin"));
        }
        if self.receive_task.priority < self.dispatch_task.priority {
            return Err(ConfigError::ValidationFailed(
                "receive task must not run below the dispatch task",
            ));
        }
        if self.receive_task.stack_kb == 0 || self.dispatch_task.stack_kb == 0 {
            return Err(ConfigError::ValidationFailed("task stacks must be > 0"));
        }
        Ok(())
    }

    /// Driver-side RX/TX ring size: twice the work buffer.
    pub fn driver_ring_size(&self) -> usize {
        self.rx_buffer_size * 2
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.read_timeout_ms))
    }

    pub fn enqueue_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.enqueue_timeout_ms))
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.stats_interval_secs))
    }
}

/// Errors from loading or validating a [`PipelineConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The override document could not be parsed.
    Corrupted,
    /// A field failed range validation.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
