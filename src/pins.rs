//! GPIO / peripheral assignments for the relay board.
//!
//! Single source of truth for the defaults in
//! [`PipelineConfig`](crate::config::PipelineConfig).  Change a pin here and
//! it propagates everywhere.

// ---------------------------------------------------------------------------
// Control output
// ---------------------------------------------------------------------------

/// Digital output switched by the `ON` / `OFF` commands.
pub const CONTROL_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// UART
// ---------------------------------------------------------------------------

/// UART controller used for echo and commands (UART0, the console port).
pub const UART_PORT: i32 = 0;

/// Leave the controller's default TX/RX/RTS/CTS routing untouched.
pub const UART_PIN_NO_CHANGE: i32 = -1;
