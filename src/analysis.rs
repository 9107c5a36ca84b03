//! Top-level batch analysis: segment, count, summarize.

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::frequency::FrequencyTracker;
use crate::models::{EventRecord, Process};
use crate::patterns::PatternDetector;
use crate::segmentation::{segment_events, SegmentationConfig};
use crate::settings::CoachSettings;

/// Serializable view of a process for callers and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReport {
    pub id: String,
    pub context: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_secs: f64,
    pub action_count: usize,
    pub frequency: usize,
    pub summary: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStatistics {
    pub total_processes: usize,
    pub frequent_processes: usize,
    pub avg_duration_secs: f64,
    pub most_common_context: String,
}

/// Runs the pure analysis pipeline over one batch at a time.
///
/// Each [`Analyzer::analyze`] call starts from fresh frequency counts; an
/// analyzer is not meant to be shared between concurrent batches.
pub struct Analyzer {
    config: SegmentationConfig,
    detector: PatternDetector,
    tracker: FrequencyTracker,
    last_processes: Vec<Process>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::from_settings(&CoachSettings::default())
    }
}

impl Analyzer {
    pub fn new(config: SegmentationConfig, detector: PatternDetector, tracker: FrequencyTracker) -> Self {
        Self {
            config,
            detector,
            tracker,
            last_processes: Vec::new(),
        }
    }

    pub fn from_settings(settings: &CoachSettings) -> Self {
        Self::new(
            settings.segmentation.clone(),
            PatternDetector::standard(),
            FrequencyTracker::new(settings.min_frequency),
        )
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    pub fn tracker(&self) -> &FrequencyTracker {
        &self.tracker
    }

    /// Segment `events` and annotate every process with its batch frequency.
    pub fn analyze(&mut self, events: &[EventRecord]) -> Vec<Process> {
        let mut processes = segment_events(events, &self.config);
        self.tracker.annotate(&mut processes);
        self.last_processes = processes.clone();
        processes
    }

    /// Processes of `events` whose frequency meets the configured minimum.
    pub fn frequent_processes(&mut self, events: &[EventRecord]) -> Vec<Process> {
        let processes = self.analyze(events);
        processes
            .into_iter()
            .filter(|p| self.tracker.is_frequent(p))
            .collect()
    }

    pub fn last_processes(&self) -> &[Process] {
        &self.last_processes
    }

    pub fn summarize(&self, process: &Process) -> String {
        self.detector.summarize(process)
    }

    pub fn report(&self, process: &Process) -> ProcessReport {
        ProcessReport {
            id: process.id.clone(),
            context: process.context().to_string(),
            start_time: process.start_time,
            end_time: process.end_time,
            duration_secs: process.duration_secs(),
            action_count: process.action_count(),
            frequency: process.frequency,
            summary: self.summarize(process),
            signature: process.signature(),
        }
    }

    pub fn statistics(&self, processes: &[Process]) -> ProcessStatistics {
        if processes.is_empty() {
            return ProcessStatistics {
                total_processes: 0,
                frequent_processes: 0,
                avg_duration_secs: 0.0,
                most_common_context: "None".to_string(),
            };
        }

        let total = processes.len();
        let frequent = processes.iter().filter(|p| self.tracker.is_frequent(p)).count();
        let avg = processes.iter().map(Process::duration_secs).sum::<f64>() / total as f64;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for process in processes {
            let context = match process.context() {
                "" => "Unknown",
                context => context,
            };
            let count = counts.entry(context).or_insert(0);
            if *count == 0 {
                order.push(context);
            }
            *count += 1;
        }

        // Ties go to the context seen first.
        let mut most_common = order[0];
        for context in &order {
            if counts[context] > counts[most_common] {
                most_common = context;
            }
        }

        ProcessStatistics {
            total_processes: total,
            frequent_processes: frequent,
            avg_duration_secs: (avg * 100.0).round() / 100.0,
            most_common_context: most_common.to_string(),
        }
    }

    /// Analyze the last `hours` hours of the event log.
    pub async fn recent_processes(&mut self, db: &Database, hours: u32) -> Result<Vec<Process>> {
        let events = db
            .recent_events(hours)
            .await
            .with_context(|| format!("failed to load events from the last {hours}h"))?;
        log::info!("analyzing {} events from the last {}h", events.len(), hours);
        Ok(self.analyze(&events))
    }

    /// Recent processes seen at least `min_frequency` times in the window.
    pub async fn frequent_recent_processes(
        &mut self,
        db: &Database,
        hours: u32,
        min_frequency: usize,
    ) -> Result<Vec<Process>> {
        let processes = self.recent_processes(db, hours).await?;
        Ok(processes
            .into_iter()
            .filter(|p| p.frequency >= min_frequency)
            .collect())
    }

    /// Forget the last results and frequency counts.
    pub fn clear(&mut self) {
        self.last_processes.clear();
        self.tracker.reset();
        log::info!("process history cleared");
    }
}
