//! One-shot UART driver installation.
//!
//! Applies the line parameters, keeps or remaps the pins and installs the
//! ESP-IDF UART driver with its ISR-fed event queue, using raw ESP-IDF sys
//! calls.  Called once from `main()` before the pipeline tasks start.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use crate::config::{DataBits, FlowControl, Parity, PipelineConfig, StopBits};

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    UartParamFailed(i32),
    UartPinFailed(i32),
    UartInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UartParamFailed(rc) => write!(f, "UART param config failed (rc={})", rc),
            Self::UartPinFailed(rc) => write!(f, "UART pin config failed (rc={})", rc),
            Self::UartInstallFailed(rc) => write!(f, "UART driver install failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

// ── UART ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn word_length(bits: DataBits) -> uart_word_length_t {
    match bits {
        DataBits::Five => uart_word_length_t_UART_DATA_5_BITS,
        DataBits::Six => uart_word_length_t_UART_DATA_6_BITS,
        DataBits::Seven => uart_word_length_t_UART_DATA_7_BITS,
        DataBits::Eight => uart_word_length_t_UART_DATA_8_BITS,
    }
}

#[cfg(target_os = "espidf")]
fn parity(p: Parity) -> uart_parity_t {
    match p {
        Parity::None => uart_parity_t_UART_PARITY_DISABLE,
        Parity::Even => uart_parity_t_UART_PARITY_EVEN,
        Parity::Odd => uart_parity_t_UART_PARITY_ODD,
    }
}

#[cfg(target_os = "espidf")]
fn stop_bits(s: StopBits) -> uart_stop_bits_t {
    match s {
        StopBits::One => uart_stop_bits_t_UART_STOP_BITS_1,
        StopBits::OneAndHalf => uart_stop_bits_t_UART_STOP_BITS_1_5,
        StopBits::Two => uart_stop_bits_t_UART_STOP_BITS_2,
    }
}

#[cfg(target_os = "espidf")]
fn flow_control(fc: FlowControl) -> uart_hw_flowcontrol_t {
    match fc {
        FlowControl::None => uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        FlowControl::Rts => uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_RTS,
        FlowControl::Cts => uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_CTS,
        FlowControl::RtsCts => uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_CTS_RTS,
    }
}

/// Configure and install the UART driver.  Returns the driver's event
/// queue handle.
#[cfg(target_os = "espidf")]
pub fn init_uart(config: &PipelineConfig) -> Result<QueueHandle_t, HwInitError> {
    let uart = &config.uart;
    let port = uart.port as uart_port_t;

    let params = uart_config_t {
        baud_rate: uart.baud_rate as i32,
        data_bits: word_length(uart.data_bits),
        parity: parity(uart.parity),
        stop_bits: stop_bits(uart.stop_bits),
        flow_ctrl: flow_control(uart.flow_control),
        __bindgen_anon_1: uart_config_t__bindgen_ty_1 {
            source_clk: soc_periph_uart_clk_src_legacy_t_UART_SCLK_DEFAULT,
        },
        ..Default::default()
    };

    // SAFETY: Called once from main() before the pipeline tasks exist;
    // no other code touches this UART controller yet.
    let ret = unsafe { uart_param_config(port, &params) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::UartParamFailed(ret));
    }

    let ret = unsafe { uart_set_pin(port, uart.tx_pin, uart.rx_pin, uart.rts_pin, uart.cts_pin) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::UartPinFailed(ret));
    }

    let ring = config.driver_ring_size() as i32;
    let mut queue: QueueHandle_t = core::ptr::null_mut();
    let ret = unsafe {
        uart_driver_install(
            port,
            ring,
            ring,
            config.event_queue_depth as i32,
            &mut queue,
            0,
        )
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::UartInstallFailed(ret));
    }

    log::info!(
        "hw_init: UART{} {} baud, rings {}B, event queue {}",
        uart.port,
        uart.baud_rate,
        ring,
        config.event_queue_depth
    );
    Ok(queue)
}
