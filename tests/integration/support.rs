//! Stage builders shared by the integration tests.

use std::sync::Arc;

use uart_relay::app::dispatch::DispatchStage;
use uart_relay::app::receive::ReceiveStage;
use uart_relay::channels::{CommandBuffer, HandoffQueue};
use uart_relay::config::PipelineConfig;
use uart_relay::diagnostics::PipelineStats;
use uart_relay::events::UartEvent;

use crate::mock_hw::{MockEvents, MockOutput, MockSerial, RecordingSink};

pub const PIN: i32 = 2;

pub type TestReceiver<const N: usize> = ReceiveStage<MockEvents, MockSerial, RecordingSink, N>;
pub type TestDispatcher<const N: usize> = DispatchStage<MockOutput, RecordingSink, N>;

pub fn test_config(rx_buffer_size: usize) -> PipelineConfig {
    PipelineConfig {
        rx_buffer_size,
        enqueue_timeout_ms: 5,
        ..PipelineConfig::default()
    }
}

pub fn receiver<const N: usize>(
    queue: &Arc<HandoffQueue<N>>,
    stats: &Arc<PipelineStats>,
    rx_buffer_size: usize,
) -> (TestReceiver<N>, RecordingSink) {
    let sink = RecordingSink::new();
    let stage = ReceiveStage::new(
        MockEvents::default(),
        MockSerial::default(),
        sink.clone(),
        queue.clone(),
        stats.clone(),
        &test_config(rx_buffer_size),
    )
    .expect("rx buffer allocation");
    (stage, sink)
}

pub fn dispatcher<const N: usize>(
    queue: &Arc<HandoffQueue<N>>,
    stats: &Arc<PipelineStats>,
) -> (TestDispatcher<N>, RecordingSink) {
    let sink = RecordingSink::new();
    let stage = DispatchStage::new(
        MockOutput::default(),
        sink.clone(),
        queue.clone(),
        stats.clone(),
        PIN,
    );
    (stage, sink)
}

/// Put `bytes` in the mock RX ring and raise the matching data event.
pub fn feed<const N: usize>(stage: &mut TestReceiver<N>, bytes: &[u8]) {
    stage.serial_mut().rx.extend(bytes.iter().copied());
    stage
        .events_mut()
        .pending
        .push_back(UartEvent::DataReady(bytes.len()));
}

pub fn cmd(s: &str) -> CommandBuffer {
    CommandBuffer::try_copy_from(s.as_bytes()).unwrap()
}
