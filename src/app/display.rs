//! Terminal rendering for statuses, replay outcomes and the event log

use crate::core::styles::StyleRole;
use crate::queue::{EventKind, EventPayload, HistoryEntry, QueueStatus};
use crate::simulator::EventOutcome;
use prettytable::{format, Cell, Row, Table};

pub const SIMULATION_START_BANNER: &str = "=== Starting Simulation ===";
pub const SIMULATION_END_BANNER: &str = "=== Simulation Ended ===";

pub fn render_status(status: &QueueStatus, color: bool) -> String {
    let text = status.to_string();
    match text.split_once('\n') {
        Some((header, rest)) => format!("{}\n{}", StyleRole::Header.paint(header, color), rest),
        None => StyleRole::Header.paint(&text, color),
    }
}

pub fn render_outcome(outcome: &EventOutcome, color: bool) -> String {
    let role = match outcome {
        EventOutcome::Enqueued { .. } | EventOutcome::Printed { .. } => StyleRole::Success,
        EventOutcome::EnqueueFailed { .. } => StyleRole::Error,
        EventOutcome::EmptyBatch | EventOutcome::NothingToPrint | EventOutcome::Ignored { .. } => {
            StyleRole::Warning
        }
        EventOutcome::BatchSubmitted(result) if result.failed_count > 0 => StyleRole::Warning,
        EventOutcome::Status(status) => return render_status(status, color),
        _ => StyleRole::Value,
    };
    let mut text = role.paint(&outcome.to_string(), color);
    if let EventOutcome::Ticked { expired_jobs, .. } = outcome {
        if !expired_jobs.is_empty() {
            let expired = format!("Expired: {}", expired_jobs.join(", "));
            text = format!("{}\n{}", text, StyleRole::Warning.paint(&expired, color));
        }
    }
    text
}

/// One replay step: the outcome, then the queue as it stands afterwards
pub fn render_replay_step(outcome: &EventOutcome, status: &QueueStatus, color: bool) -> String {
    match outcome {
        EventOutcome::Status(_) => render_outcome(outcome, color),
        _ => format!(
            "{}\n\n{}",
            render_outcome(outcome, color),
            render_status(status, color)
        ),
    }
}

fn entry_details(entry: &HistoryEntry) -> String {
    match &entry.payload {
        Some(EventPayload::Tick { expired_jobs, .. }) if !expired_jobs.is_empty() => {
            format!("expired: {}", expired_jobs.join(", "))
        }
        Some(EventPayload::Aging { aged_jobs }) => format!("aged: {}", aged_jobs.join(", ")),
        Some(EventPayload::BatchSubmit { success, failed }) => {
            format!("{} succeeded, {} failed", success, failed)
        }
        _ => String::new(),
    }
}

/// Event log as a borderless table, one row per entry
pub fn render_history_table(entries: &[HistoryEntry], color: bool) -> String {
    if entries.is_empty() {
        return StyleRole::Dim.paint("No events recorded", color);
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table.set_titles(Row::new(
        ["Time", "Event", "Job", "Queued", "Details"]
            .iter()
            .map(|title| Cell::new(&StyleRole::Header.paint(title, color)))
            .collect(),
    ));

    for entry in entries {
        let event_role = match entry.event {
            EventKind::Expire | EventKind::Shutdown => StyleRole::Warning,
            EventKind::Tick | EventKind::Aging => StyleRole::Dim,
            _ => StyleRole::Key,
        };
        table.add_row(Row::new(vec![
            Cell::new(&entry.timestamp.to_string()),
            Cell::new(&event_role.paint(entry.event.as_ref(), color)),
            Cell::new(entry.job_id.as_deref().unwrap_or("")),
            Cell::new(&entry.queue_size.to_string()),
            Cell::new(&entry_details(entry)),
        ]));
    }
    table.to_string()
}
