//! ESP-IDF UART adapter.
//!
//! Splits one installed UART driver into the two ports the receive stage
//! consumes: [`UartEventQueue`] (the driver's FreeRTOS event queue, fed by
//! the UART ISR) and [`UartPort`] (the driver's RX/TX ring buffers).
//! Both are handed to the receive task, which is their only user.

use core::time::Duration;

use esp_idf_svc::sys::*;

use crate::app::ports::{EventSource, SerialPort};
use crate::config::PipelineConfig;
use crate::drivers::hw_init::{self, HwInitError};
use crate::error::SerialError;
use crate::events::UartEvent;

fn to_ticks(timeout: Duration) -> TickType_t {
    let ms = timeout.as_millis() as u64;
    let ticks = ms * u64::from(configTICK_RATE_HZ) / 1000;
    // Never round a non-zero wait down to a poll.
    if ms > 0 && ticks == 0 { 1 } else { ticks as TickType_t }
}

// ── Event queue ──────────────────────────────────────────────

pub struct UartEventQueue {
    queue: QueueHandle_t,
}

// SAFETY: FreeRTOS queue handles may be used from any task; this wrapper
// is moved into the receive task and used only there.
unsafe impl Send for UartEventQueue {}

impl EventSource for UartEventQueue {
    fn recv(&mut self, timeout: Option<Duration>) -> Option<UartEvent> {
        let ticks = timeout.map_or(TickType_t::MAX, to_ticks);
        let mut raw = uart_event_t::default();
        // SAFETY: `raw` is a valid `uart_event_t`, the item type the
        // driver created this queue with.
        let ok = unsafe { xQueueReceive(self.queue, (&raw mut raw).cast(), ticks) };
        (ok == 1).then(|| UartEvent::from(&raw))
    }

    fn reset(&mut self) {
        // SAFETY: valid queue handle for the lifetime of the driver.
        unsafe {
            xQueueGenericReset(self.queue, 0);
        }
    }
}

// ── Byte stream ──────────────────────────────────────────────

pub struct UartPort {
    port: uart_port_t,
}

impl SerialPort for UartPort {
    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, SerialError> {
        // SAFETY: `buf` is valid for `buf.len()` bytes of writes.
        let n = unsafe {
            uart_read_bytes(
                self.port,
                buf.as_mut_ptr().cast(),
                buf.len() as u32,
                to_ticks(timeout),
            )
        };
        usize::try_from(n).map_err(|_| SerialError::ReadFailed(n))
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, SerialError> {
        // SAFETY: `data` is valid for `data.len()` bytes of reads.
        let n = unsafe { uart_write_bytes(self.port, data.as_ptr().cast(), data.len()) };
        usize::try_from(n).map_err(|_| SerialError::WriteFailed(n))
    }

    fn flush_input(&mut self) -> Result<(), SerialError> {
        let ret = unsafe { uart_flush_input(self.port) };
        if ret == ESP_OK as i32 {
            Ok(())
        } else {
            Err(SerialError::FlushFailed(ret))
        }
    }
}

/// Install the UART driver described by `config` and return its event
/// queue and byte stream.
pub fn install(config: &PipelineConfig) -> Result<(UartEventQueue, UartPort), HwInitError> {
    let queue = hw_init::init_uart(config)?;
    Ok((
        UartEventQueue { queue },
        UartPort {
            port: config.uart.port as uart_port_t,
        },
    ))
}
