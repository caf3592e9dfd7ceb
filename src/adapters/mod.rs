//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements          | Connects to                 |
//! |-------------|---------------------|-----------------------------|
//! | `log_sink`  | EventSink           | `log` facade / serial log   |
//! | `output`    | OutputPort          | any `embedded-hal` OutputPin|
//! | `uart`      | EventSource         | ESP-IDF UART event queue    |
//! |             | SerialPort          | ESP-IDF UART ring buffers   |

pub mod log_sink;
pub mod output;
#[cfg(target_os = "espidf")]
pub mod uart;
