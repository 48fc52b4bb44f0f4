//! Bad input is reported and skipped, never applied to the queue

use crate::common::{write_events, MALFORMED_EVENTS};
use printqueue::queue::{EventKind, QueueConfig};
use printqueue::simulator::{
    load_events, parse_events, EventOutcome, SimulationError, Simulator,
};
use std::time::Duration;

#[tokio::test]
async fn test_malformed_events_are_skipped() {
    let (_dir, path) = write_events(MALFORMED_EVENTS);
    let simulator = Simulator::new(QueueConfig::default()).unwrap();
    let report = simulator
        .run(load_events(&path).await.unwrap(), Duration::ZERO, |_, _| {})
        .await;

    assert!(report.completed);
    assert_eq!(report.outcomes.len(), 8);
    assert_eq!(report.ignored_count(), 5);
    assert!(matches!(&report.outcomes[0], EventOutcome::Enqueued { job_id, .. } if job_id == "ok"));
    assert_eq!(report.outcomes[6], EventOutcome::EmptyBatch);
    assert_eq!(report.outcomes[7].to_string(), "Printed job ok from u1");

    let kinds: Vec<_> = simulator
        .queue()
        .history()
        .iter()
        .map(|e| e.event)
        .collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::Enqueue,
            EventKind::Dequeue,
            EventKind::Complete,
            EventKind::Shutdown
        ]
    );
}

#[test]
fn test_malformed_entries_carry_their_index() {
    let parsed = parse_events(MALFORMED_EVENTS).unwrap();
    assert!(parsed[0].is_ok());

    let bad: Vec<usize> = parsed
        .iter()
        .filter_map(|event| match event {
            Err(SimulationError::InvalidEvent { index, .. }) => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(bad, vec![1, 2, 3, 5]);
}

#[tokio::test]
async fn test_bad_batch_entries_count_as_failures() {
    let (_dir, path) = write_events(
        r#"[
            {"type": "batch_submit", "jobs": [
                {"user_id": "u", "job_id": "b1", "priority": 1},
                {"user_id": "u", "job_id": "b2", "priority": -1},
                {"user_id": "", "job_id": "b3", "priority": 1},
                {"user_id": "u", "job_id": "b1", "priority": 0}
            ]}
        ]"#,
    );
    let simulator = Simulator::new(QueueConfig::default()).unwrap();
    let report = simulator
        .run(load_events(&path).await.unwrap(), Duration::ZERO, |_, _| {})
        .await;

    let EventOutcome::BatchSubmitted(result) = &report.outcomes[0] else {
        panic!("expected a batch outcome, got {:?}", report.outcomes[0]);
    };
    assert_eq!(result.success_count, 1);
    assert_eq!(result.failed_count, 3);
    assert_eq!(result.failed_jobs, vec!["b2", "b3", "b1"]);
    assert_eq!(simulator.queue().len(), 1);
}

#[tokio::test]
async fn test_non_array_file_is_rejected() {
    let (_dir, path) = write_events(r#"{"type": "print"}"#);
    let err = load_events(&path).await.unwrap_err();
    assert!(matches!(err, SimulationError::Parse { .. }));
}

#[tokio::test]
async fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = load_events(&path).await.unwrap_err();
    match err {
        SimulationError::Io { path: reported, .. } => {
            assert!(reported.ends_with("absent.json"))
        }
        other => panic!("expected an io error, got {:?}", other),
    }
}
