//! UART Relay Firmware: Main Entry Point
//!
//! Two tasks joined by one bounded handoff queue:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  UART ISR ──▶ event queue (20)                                   │
//! │                   │                                              │
//! │                   ▼                                              │
//! │  ┌──────────────────────┐  CommandBuffer  ┌────────────────────┐ │
//! │  │ ReceiveStage (pri 10)│───────────────▶│ DispatchStage (9)  │ │
//! │  │ read · echo · copy   │  HandoffQueue(5)│ trim · match · GPIO│ │
//! │  └──────────────────────┘                 └────────────────────┘ │
//! │          ▲ │ echo                                   │            │
//! │          │ ▼                                        ▼            │
//! │       UART RX/TX rings                        control GPIO       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The main task stays alive after startup and logs pipeline statistics.
#![deny(unused_must_use)]

use std::sync::Arc;

use anyhow::{Context, Result};
use esp_idf_hal::gpio::{AnyOutputPin, PinDriver};
use log::{info, warn};

use uart_relay::adapters::log_sink::LogEventSink;
use uart_relay::adapters::output::PinOutput;
use uart_relay::adapters::uart;
use uart_relay::app::dispatch::DispatchStage;
use uart_relay::app::events::PipelineEvent;
use uart_relay::app::ports::{EventSink, OutputLevel, OutputPort};
use uart_relay::app::receive::ReceiveStage;
use uart_relay::channels::HandoffQueue;
use uart_relay::config::PipelineConfig;
use uart_relay::diagnostics::PipelineStats;
use uart_relay::drivers::task_pin::{Core, spawn_task};

/// Compile-time JSON override for the default configuration.
fn load_config() -> PipelineConfig {
    let Some(json) = option_env!("UART_RELAY_CONFIG") else {
        return PipelineConfig::default();
    };
    match PipelineConfig::from_json(json) {
        Ok(cfg) => {
            info!("Config: using UART_RELAY_CONFIG override");
            cfg
        }
        Err(e) => {
            warn!("Config override rejected ({}), using defaults", e);
            PipelineConfig::default()
        }
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Starting UART relay v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config();

    // ── 2. Control output, driven OFF before anything can switch it ──
    // SAFETY: the configured GPIO is owned by nothing else in this firmware.
    let pin = unsafe { AnyOutputPin::new(config.control_gpio) };
    let driver = PinDriver::output(pin).context("control GPIO config")?;
    let mut output = PinOutput::new(driver, config.control_gpio);
    output
        .set_level(config.control_gpio, OutputLevel::Off)
        .map_err(|e| anyhow::anyhow!("control GPIO initial level: {e}"))?;

    // ── 3. UART driver ────────────────────────────────────────
    let (uart_events, uart_port) = uart::install(&config).context("UART driver")?;

    // ── 4. Shared handles ─────────────────────────────────────
    let queue: Arc<HandoffQueue> = Arc::new(HandoffQueue::new());
    let stats = Arc::new(PipelineStats::new());

    // ── 5. Tasks ──────────────────────────────────────────────
    {
        let queue = queue.clone();
        let stats = stats.clone();
        let config = config.clone();
        spawn_task("uart_rx\0", Core::App, config.receive_task, move || {
            // On failure the stage has already reported through the sink.
            if let Ok(stage) =
                ReceiveStage::new(uart_events, uart_port, LogEventSink, queue, stats, &config)
            {
                stage.run()
            }
        })
        .context("spawn receive task")?;
    }

    {
        let pin = config.control_gpio;
        let dispatch = DispatchStage::new(output, LogEventSink, queue, stats.clone(), pin);
        spawn_task("cmd_proc\0", Core::App, config.dispatch_task, move || {
            dispatch.run()
        })
        .context("spawn dispatch task")?;
    }

    info!("UART relay started");

    // ── 6. Statistics ─────────────────────────────────────────
    let mut sink = LogEventSink;
    loop {
        std::thread::sleep(config.stats_interval());
        sink.emit(&PipelineEvent::Stats(stats.snapshot()));
    }
}
