//! A replay feeding a queue that live consumer threads drain

use printqueue::queue::{EventKind, PrintQueueManager};
use printqueue::simulator::{parse_events, Simulator};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn enqueue_script(count: usize) -> String {
    let events: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"type": "enqueue", "user_id": "user{}", "job_id": "job{}", "priority": {}}}"#,
                i % 3,
                i,
                i % 4
            )
        })
        .collect();
    format!("[{}]", events.join(","))
}

fn spawn_consumers(queue: &Arc<PrintQueueManager>, count: usize) -> Vec<thread::JoinHandle<usize>> {
    (0..count)
        .map(|_| {
            let queue = Arc::clone(queue);
            thread::spawn(move || {
                let mut printed = 0;
                while let Some(job) = queue.dequeue(true) {
                    queue.complete(job.job_id()).unwrap();
                    printed += 1;
                }
                printed
            })
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_consumers_drain_replay_and_exit_on_shutdown() {
    let queue = Arc::new(PrintQueueManager::new(50, 5, 100).unwrap());
    let consumers = spawn_consumers(&queue, 3);

    let simulator = Simulator::with_queue(Arc::clone(&queue));
    let events = parse_events(&enqueue_script(20)).unwrap();
    let report = simulator
        .run(events, Duration::from_millis(1), |_, _| {})
        .await;
    assert!(report.completed);

    // The run shuts the queue down, which releases every parked consumer
    let printed: usize = consumers.into_iter().map(|h| h.join().unwrap()).sum();

    assert!(queue.is_shutdown());
    assert!(queue.printing_jobs().is_empty());
    assert_eq!(printed + queue.len(), 20);

    let history = queue.history();
    let enqueued = history.iter().filter(|e| e.event == EventKind::Enqueue).count();
    let completed = history.iter().filter(|e| e.event == EventKind::Complete).count();
    assert_eq!(enqueued, 20);
    assert_eq!(completed, printed);
}

#[tokio::test]
async fn test_stopped_replay_releases_consumers() {
    let queue = Arc::new(PrintQueueManager::new(10, 5, 100).unwrap());
    let consumers = spawn_consumers(&queue, 2);

    let simulator = Simulator::with_queue(Arc::clone(&queue));
    let stopper = simulator.clone();
    let events = parse_events(&enqueue_script(5)).unwrap();

    let run = tokio::spawn(async move {
        simulator
            .run(events, Duration::from_secs(30), |_, _| {})
            .await
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    stopper.stop();

    let report = run.await.unwrap();
    assert!(!report.completed);

    let printed: usize = consumers.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(printed + queue.len(), report.outcomes.len());
}
