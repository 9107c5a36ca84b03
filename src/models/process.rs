use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::EventRecord;
use crate::patterns::PatternDetector;

/// One segmented span of user activity believed to be a single workflow.
///
/// `context` is fixed at creation. `actions` only grows while the process is
/// open (`end_time` is `None`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    context: String,
    pub actions: Vec<EventRecord>,
    pub frequency: usize,
}

impl Process {
    pub fn new(id: impl Into<String>, start_time: DateTime<Utc>, context: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start_time,
            end_time: None,
            context: context.into(),
            actions: Vec::new(),
            frequency: 1,
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn add_action(&mut self, action: EventRecord) {
        debug_assert!(self.is_open(), "cannot extend a closed process");
        self.actions.push(action);
    }

    /// Close the span. The end never precedes the start, even when the end
    /// had to fall back to the wall clock.
    pub fn close(&mut self, end_time: DateTime<Utc>) {
        self.end_time = Some(end_time.max(self.start_time));
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    pub fn duration_secs(&self) -> f64 {
        match self.end_time {
            Some(end) => (end - self.start_time).num_milliseconds() as f64 / 1000.0,
            None => 0.0,
        }
    }

    /// Pipe-joined `"<event_type>:<details>"` sequence used for exact-match
    /// frequency counting.
    pub fn signature(&self) -> String {
        self.actions
            .iter()
            .map(EventRecord::action_key)
            .collect::<Vec<_>>()
            .join("|")
    }

    pub fn summary(&self) -> String {
        PatternDetector::standard().summarize(self)
    }

    pub fn summary_with(&self, detector: &PatternDetector) -> String {
        detector.summarize(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventType;
    use chrono::Duration;

    fn process_with(actions: &[(&str, &str)]) -> Process {
        let mut process = Process::new("p", Utc::now(), "Hyper");
        for (event_type, details) in actions {
            process.add_action(EventRecord::new(
                "2024-01-01T10:00:00",
                EventType::from(*event_type),
                *details,
            ));
        }
        process
    }

    #[test]
    fn signature_joins_actions_in_order() {
        let process = process_with(&[("A", "1"), ("A", "2"), ("A", "3")]);
        assert_eq!(process.signature(), "A:1|A:2|A:3");
    }

    #[test]
    fn close_clamps_end_before_start() {
        let start = Utc::now();
        let mut process = Process::new("p", start, "Excel");
        process.close(start - Duration::seconds(5));
        assert_eq!(process.end_time, Some(start));
        assert_eq!(process.duration_secs(), 0.0);
    }

    #[test]
    fn duration_is_zero_while_open() {
        let process = process_with(&[("A", "1")]);
        assert!(process.is_open());
        assert_eq!(process.duration_secs(), 0.0);
    }

    #[test]
    fn duration_uses_span_boundaries() {
        let start = Utc::now();
        let mut process = Process::new("p", start, "Excel");
        process.close(start + Duration::milliseconds(2500));
        assert_eq!(process.duration_secs(), 2.5);
    }
}
