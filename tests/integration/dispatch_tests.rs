//! Integration tests: handoff queue → DispatchStage → GPIO.

use std::sync::Arc;
use std::time::Duration;

use uart_relay::app::dispatch::DispatchOutcome;
use uart_relay::app::events::{PipelineEvent, preview};
use uart_relay::app::ports::OutputLevel;
use uart_relay::channels::HandoffQueue;
use uart_relay::diagnostics::PipelineStats;
use uart_relay::error::ActuatorError;

use crate::support::{PIN, TestDispatcher, cmd, dispatcher};

fn setup() -> (Arc<HandoffQueue<5>>, TestDispatcher<5>, crate::mock_hw::RecordingSink) {
    let queue = Arc::new(HandoffQueue::new());
    let stats = Arc::new(PipelineStats::new());
    let (stage, sink) = dispatcher(&queue, &stats);
    (queue, stage, sink)
}

#[test]
fn on_with_crlf_switches_output_on_once() {
    let (_queue, mut stage, sink) = setup();

    let outcome = stage.dispatch(cmd("ON\r\n"));

    assert_eq!(outcome, DispatchOutcome::Applied(OutputLevel::On));
    assert_eq!(stage.output().calls, vec![(PIN, OutputLevel::On)]);
    assert_eq!(stage.output().count(OutputLevel::Off), 0);
    assert_eq!(
        sink.count(|e| *e == PipelineEvent::OutputSwitched(OutputLevel::On)),
        1
    );
}

#[test]
fn off_with_lf_switches_output_off_once() {
    let (_queue, mut stage, _sink) = setup();

    assert_eq!(
        stage.dispatch(cmd("OFF\n")),
        DispatchOutcome::Applied(OutputLevel::Off)
    );
    assert_eq!(stage.output().calls, vec![(PIN, OutputLevel::Off)]);
}

#[test]
fn bare_keywords_match_without_line_ending() {
    let (_queue, mut stage, _sink) = setup();

    stage.dispatch(cmd("ON"));
    stage.dispatch(cmd("OFF"));
    assert_eq!(
        stage.output().calls,
        vec![(PIN, OutputLevel::On), (PIN, OutputLevel::Off)]
    );
}

#[test]
fn lowercase_and_unknown_tokens_are_reported_only() {
    for token in ["on", "START"] {
        let (_queue, mut stage, sink) = setup();

        assert_eq!(stage.dispatch(cmd(token)), DispatchOutcome::Unknown);
        assert!(stage.output().calls.is_empty());
        assert_eq!(
            sink.count(|e| matches!(e, PipelineEvent::UnknownCommand(_))),
            1,
            "token {token:?}"
        );
    }
}

#[test]
fn leading_whitespace_is_not_trimmed() {
    let (_queue, mut stage, sink) = setup();

    assert_eq!(stage.dispatch(cmd(" ON\n")), DispatchOutcome::Unknown);
    assert_eq!(stage.dispatch(cmd("\r\nOFF")), DispatchOutcome::Unknown);
    assert!(stage.output().calls.is_empty());
    assert_eq!(
        sink.count(|e| *e == PipelineEvent::UnknownCommand(preview(b" ON"))),
        1
    );
}

#[test]
fn trimmed_token_is_reported_before_matching() {
    let (_queue, mut stage, sink) = setup();

    stage.dispatch(cmd("OFF\r\n\r\n"));
    assert_eq!(
        sink.events()[0],
        PipelineEvent::Processing(preview(b"OFF"))
    );
}

#[test]
fn actuator_failure_is_reported_and_stage_continues() {
    let queue: Arc<HandoffQueue<5>> = Arc::new(HandoffQueue::new());
    let stats = Arc::new(PipelineStats::new());
    let (mut stage, sink) = dispatcher(&queue, &stats);

    let mut failing = uart_relay::app::dispatch::DispatchStage::new(
        crate::mock_hw::MockOutput {
            fail: true,
            ..Default::default()
        },
        sink.clone(),
        queue.clone(),
        stats.clone(),
        PIN,
    );

    assert_eq!(
        failing.dispatch(cmd("ON\n")),
        DispatchOutcome::Failed(OutputLevel::On)
    );
    assert_eq!(
        sink.count(|e| *e
            == PipelineEvent::ActuatorFailed {
                level: OutputLevel::On,
                error: ActuatorError::GpioWriteFailed,
            }),
        1
    );
    assert_eq!(stats.snapshot().actuator_failures, 1);

    assert_eq!(
        stage.dispatch(cmd("OFF\n")),
        DispatchOutcome::Applied(OutputLevel::Off)
    );
}

#[test]
fn dispatch_next_takes_commands_in_queue_order() {
    let (queue, mut stage, _sink) = setup();

    for line in ["OFF\n", "ON\n", "OFF\n"] {
        queue.send_timeout(cmd(line), Duration::ZERO).unwrap();
    }
    for _ in 0..3 {
        stage.dispatch_next();
    }

    assert!(queue.is_empty());
    assert_eq!(
        stage.output().calls,
        vec![
            (PIN, OutputLevel::Off),
            (PIN, OutputLevel::On),
            (PIN, OutputLevel::Off)
        ]
    );
}

#[test]
fn commands_are_independent() {
    let (_queue, mut stage, _sink) = setup();

    assert_eq!(stage.dispatch(cmd("O")), DispatchOutcome::Unknown);
    assert_eq!(
        stage.dispatch(cmd("N")),
        DispatchOutcome::Unknown,
        "fragments must not be joined across commands"
    );
    assert!(stage.output().calls.is_empty());
}
