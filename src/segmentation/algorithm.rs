use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{EventRecord, Process};
use crate::segmentation::boundary::is_boundary;
use crate::segmentation::config::SegmentationConfig;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

const UNKNOWN_CONTEXT: &str = "Unknown";

/// Main segmentation function: partitions an event batch into processes.
///
/// Events are sorted by timestamp first (stable, so ties keep their input
/// order). The returned processes are all closed and satisfy the configured
/// action-count bounds. The input is never mutated.
pub fn segment_events(events: &[EventRecord], config: &SegmentationConfig) -> Vec<Process> {
    // Edge case: empty batch
    if events.is_empty() {
        return Vec::new();
    }

    let ordered = sorted_by_timestamp(events);

    let mut processes: Vec<Process> = Vec::new();
    let mut current: Option<Process> = None;
    let mut previous: Option<&EventRecord> = None;

    for event in ordered {
        if is_boundary(event, previous, config) {
            if let Some(mut process) = current.take() {
                process.close(end_time_for(previous));
                log_debug!(
                    "closing process {} ({} actions) in {}",
                    process.id,
                    process.action_count(),
                    process.context()
                );
                processes.push(process);
            }

            let context = event.app().unwrap_or(UNKNOWN_CONTEXT);
            current = Some(Process::new(
                Uuid::new_v4().to_string(),
                event.parsed_timestamp().unwrap_or_else(Utc::now),
                context,
            ));
        }

        if let Some(process) = current.as_mut() {
            process.add_action(event.clone());
        }
        previous = Some(event);
    }

    // Close the final process
    if let Some(mut process) = current {
        process.close(end_time_for(previous));
        processes.push(process);
    }

    let segmented = processes.len();
    let kept: Vec<Process> = processes
        .into_iter()
        .filter(|p| config.accepts_action_count(p.action_count()))
        .collect();

    log_info!(
        "segmented {} events into {} processes ({} kept after action-count filter)",
        events.len(),
        segmented,
        kept.len()
    );

    kept
}

fn end_time_for(last: Option<&EventRecord>) -> DateTime<Utc> {
    last.and_then(EventRecord::parsed_timestamp)
        .unwrap_or_else(Utc::now)
}

/// Borrow the events in timestamp order. Unparseable timestamps sort first,
/// keeping their relative order.
fn sorted_by_timestamp(events: &[EventRecord]) -> Vec<&EventRecord> {
    let mut ordered: Vec<&EventRecord> = events.iter().collect();
    let already_sorted = events
        .windows(2)
        .all(|pair| pair[0].parsed_timestamp() <= pair[1].parsed_timestamp());
    if !already_sorted {
        ordered.sort_by_key(|event| event.parsed_timestamp());
    }
    ordered
}
