use std::collections::HashMap;

use crate::models::Process;

pub const DEFAULT_MIN_FREQUENCY: usize = 2;

/// Counts identical process signatures within one analyzed batch.
///
/// Counts are recomputed from scratch on every [`FrequencyTracker::annotate`]
/// call; nothing carries over between batches. Use one tracker per
/// concurrently analyzed batch.
#[derive(Debug, Clone)]
pub struct FrequencyTracker {
    counts: HashMap<String, usize>,
    min_frequency: usize,
}

impl Default for FrequencyTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_FREQUENCY)
    }
}

impl FrequencyTracker {
    pub fn new(min_frequency: usize) -> Self {
        Self {
            counts: HashMap::new(),
            min_frequency,
        }
    }

    pub fn min_frequency(&self) -> usize {
        self.min_frequency
    }

    /// Recount `processes` and set each one's `frequency` to the number of
    /// processes in the batch sharing its signature.
    pub fn annotate(&mut self, processes: &mut [Process]) {
        self.reset();

        let signatures: Vec<String> = processes.iter().map(Process::signature).collect();
        for signature in &signatures {
            *self.counts.entry(signature.clone()).or_insert(0) += 1;
        }

        for (process, signature) in processes.iter_mut().zip(&signatures) {
            process.frequency = self.counts.get(signature).copied().unwrap_or(1);
        }
    }

    pub fn count(&self, signature: &str) -> usize {
        self.counts.get(signature).copied().unwrap_or(0)
    }

    pub fn distinct_signatures(&self) -> usize {
        self.counts.len()
    }

    pub fn is_frequent(&self, process: &Process) -> bool {
        process.frequency >= self.min_frequency
    }

    pub fn frequent<'a>(&self, processes: &'a [Process]) -> Vec<&'a Process> {
        processes.iter().filter(|p| self.is_frequent(p)).collect()
    }

    pub fn reset(&mut self) {
        self.counts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventRecord, EventType};
    use chrono::Utc;

    fn process(details: &[&str]) -> Process {
        let mut process = Process::new("p", Utc::now(), "App");
        for d in details {
            process.add_action(EventRecord::new("t", EventType::from("A"), *d));
        }
        process
    }

    #[test]
    fn identical_signatures_share_their_count() {
        let mut processes = vec![
            process(&["1", "2", "3"]),
            process(&["9", "9"]),
            process(&["1", "2", "3"]),
        ];
        let mut tracker = FrequencyTracker::default();
        tracker.annotate(&mut processes);

        assert_eq!(processes[0].frequency, 2);
        assert_eq!(processes[1].frequency, 1);
        assert_eq!(processes[2].frequency, 2);
        assert_eq!(tracker.count("A:1|A:2|A:3"), 2);
        assert_eq!(tracker.distinct_signatures(), 2);
    }

    #[test]
    fn counts_reset_between_batches() {
        let mut tracker = FrequencyTracker::default();
        let mut first = vec![process(&["1", "2"]), process(&["1", "2"])];
        tracker.annotate(&mut first);

        let mut second = vec![process(&["1", "2"])];
        tracker.annotate(&mut second);
        assert_eq!(second[0].frequency, 1);
        assert_eq!(tracker.count("A:1|A:2"), 1);
    }

    #[test]
    fn frequent_filter_uses_minimum() {
        let mut processes = vec![
            process(&["1", "2"]),
            process(&["1", "2"]),
            process(&["1", "2"]),
            process(&["3", "4"]),
        ];
        let mut tracker = FrequencyTracker::new(3);
        tracker.annotate(&mut processes);
        assert_eq!(tracker.frequent(&processes).len(), 3);

        let mut tracker = FrequencyTracker::new(4);
        tracker.annotate(&mut processes);
        assert!(tracker.frequent(&processes).is_empty());
    }
}
