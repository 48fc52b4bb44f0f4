//! Scripted replays checked against final queue state and history

use crate::common::{write_events, SCRIPTED_EVENTS};
use printqueue::queue::{EventKind, QueueConfig};
use printqueue::simulator::{load_events, EventOutcome, Simulator};
use std::time::Duration;

#[tokio::test]
async fn test_scripted_replay_final_state() {
    let (_dir, path) = write_events(SCRIPTED_EVENTS);
    let events = load_events(&path).await.unwrap();
    let simulator = Simulator::new(QueueConfig::new(5, 3, 10)).unwrap();

    let report = simulator.run(events, Duration::ZERO, |_, _| {}).await;

    assert!(report.completed);
    assert_eq!(report.outcomes.len(), 8);
    assert_eq!(report.ignored_count(), 0);
    assert_eq!(report.outcomes[3].to_string(), "Printed job doc2 from user2");
    assert_eq!(report.outcomes[4].to_string(), "Batch submit: 2 succeeded, 0 failed");
    assert_eq!(report.outcomes[6].to_string(), "Printed job doc1 from user1");

    let EventOutcome::Status(status) = &report.outcomes[7] else {
        panic!("expected a status outcome, got {:?}", report.outcomes[7]);
    };
    assert_eq!(status.current_time, 7);
    assert_eq!(status.size, 2);
    assert_eq!(status.ticks_until_next_aging, 2);
    let jobs = status.jobs.as_ref().unwrap();
    assert_eq!(jobs[0].job_id(), "doc4");
    assert_eq!(jobs[0].priority(), 0);
    assert_eq!(jobs[1].job_id(), "doc3");
    assert_eq!(jobs[1].priority(), 2);
    assert_eq!(jobs[1].waiting_time(), 5);
}

#[tokio::test]
async fn test_scripted_replay_history() {
    let (_dir, path) = write_events(SCRIPTED_EVENTS);
    let simulator = Simulator::new(QueueConfig::new(5, 3, 10)).unwrap();
    simulator
        .run(load_events(&path).await.unwrap(), Duration::ZERO, |_, _| {})
        .await;

    let history = simulator.queue().history();
    let dequeued: Vec<_> = history
        .iter()
        .filter(|e| e.event == EventKind::Dequeue)
        .filter_map(|e| e.job_id.as_deref())
        .collect();
    assert_eq!(dequeued, vec!["doc2", "doc1"]);

    let ticks = history.iter().filter(|e| e.event == EventKind::Tick).count();
    assert_eq!(ticks, 7);
    assert_eq!(history.last().unwrap().event, EventKind::Shutdown);

    // Timestamps never go backwards
    assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[tokio::test]
async fn test_history_serialises_to_json() {
    let (_dir, path) = write_events(SCRIPTED_EVENTS);
    let simulator = Simulator::new(QueueConfig::new(5, 3, 10)).unwrap();
    simulator
        .run(load_events(&path).await.unwrap(), Duration::ZERO, |_, _| {})
        .await;

    let json = serde_json::to_value(simulator.queue().history()).unwrap();
    let batch = json
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["event"] == "batch_submit")
        .unwrap();
    assert_eq!(batch["payload"]["batch_submit"]["success"], 2);
    assert_eq!(batch["payload"]["batch_submit"]["failed"], 0);
    assert_eq!(batch["queue_size"], 3);
}

#[tokio::test]
async fn test_replay_expires_stale_jobs() {
    let (_dir, path) = write_events(
        r#"[
            {"type": "enqueue", "user_id": "u", "job_id": "stale", "priority": 4},
            {"type": "tick", "ticks": 4},
            {"type": "enqueue", "user_id": "u", "job_id": "fresh", "priority": 4},
            {"type": "tick"}
        ]"#,
    );
    let simulator = Simulator::new(QueueConfig::new(3, 100, 4)).unwrap();
    let report = simulator
        .run(load_events(&path).await.unwrap(), Duration::ZERO, |_, _| {})
        .await;

    assert_eq!(
        report.outcomes[1],
        EventOutcome::Ticked {
            ticks: 4,
            expired_jobs: vec![]
        }
    );
    assert_eq!(
        report.outcomes[3],
        EventOutcome::Ticked {
            ticks: 1,
            expired_jobs: vec!["stale".to_string()]
        }
    );
    let pending = simulator.queue().pending_jobs();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].job_id(), "fresh");
}

#[tokio::test]
async fn test_replay_honours_capacity() {
    let (_dir, path) = write_events(
        r#"[
            {"type": "enqueue", "user_id": "u", "job_id": "a", "priority": 1},
            {"type": "enqueue", "user_id": "u", "job_id": "b", "priority": 1},
            {"type": "enqueue", "user_id": "u", "job_id": "c", "priority": 0}
        ]"#,
    );
    let simulator = Simulator::new(QueueConfig::new(2, 5, 30)).unwrap();
    let report = simulator
        .run(load_events(&path).await.unwrap(), Duration::ZERO, |_, _| {})
        .await;

    assert_eq!(report.outcomes[2].to_string(), "Queue full! Could not add job c");
    assert_eq!(simulator.queue().len(), 2);
}
