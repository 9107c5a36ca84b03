//! Suppression of near-duplicate events within a short cooldown.
//!
//! Keys are `(event type, details)`. In click details the `X=..,Y=..` pair is
//! rewritten to one canonical form, so clicks at different positions are
//! never conflated while formatting differences (`X=10, Y=20` vs `X=10,Y=20`)
//! are. The rest of the details stays part of the key.

pub mod sweeper;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::{Duration, Instant};

use regex::Regex;

use crate::models::{EventRecord, EventType};
use crate::settings::CoachSettings;

pub use sweeper::DedupSweeper;

pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(1);
/// Entries older than this many cooldowns are dropped by [`EventDeduplicator::sweep`].
pub const DEFAULT_SWEEP_FACTOR: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    event_type: String,
    details: String,
}

fn coordinate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)X\s*=\s*(-?\d+)\s*,\s*Y\s*=\s*(-?\d+)").expect("valid coordinate pattern")
    })
}

fn is_click(event_type: &EventType) -> bool {
    match event_type {
        EventType::Other(label) => label.to_lowercase().contains("click"),
        other => other.is_click(),
    }
}

pub fn dedup_key(event_type: &EventType, details: &str) -> DedupKey {
    let details = details.trim();

    let details = if is_click(event_type) {
        coordinate_pattern()
            .replace_all(details, "X=${1},Y=${2}")
            .into_owned()
    } else {
        details.to_string()
    };

    DedupKey {
        event_type: event_type.to_string(),
        details,
    }
}

/// Remembers when each key was last let through.
///
/// All access goes through one mutex, so a single instance can be shared by
/// several event producers.
#[derive(Debug)]
pub struct EventDeduplicator {
    cooldown: Duration,
    sweep_factor: u32,
    last_seen: Mutex<HashMap<DedupKey, Instant>>,
}

impl Default for EventDeduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl EventDeduplicator {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            sweep_factor: DEFAULT_SWEEP_FACTOR,
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_settings(settings: &CoachSettings) -> Self {
        Self::new(settings.dedup_cooldown()).with_sweep_factor(settings.dedup_sweep_factor)
    }

    pub fn with_sweep_factor(mut self, sweep_factor: u32) -> Self {
        self.sweep_factor = sweep_factor.max(1);
        self
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn retention(&self) -> Duration {
        self.cooldown * self.sweep_factor
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<DedupKey, Instant>> {
        self.last_seen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True if the same key was let through less than one cooldown ago.
    /// Otherwise records the event and returns false.
    pub fn is_duplicate(&self, event_type: impl Into<EventType>, details: &str) -> bool {
        self.is_duplicate_at(event_type, details, Instant::now())
    }

    pub fn is_duplicate_at(
        &self,
        event_type: impl Into<EventType>,
        details: &str,
        now: Instant,
    ) -> bool {
        let key = dedup_key(&event_type.into(), details);
        let mut entries = self.entries();

        if let Some(last) = entries.get(&key) {
            if now.saturating_duration_since(*last) < self.cooldown {
                return true;
            }
        }

        entries.insert(key, now);
        false
    }

    /// Replay a stored batch through the cooldown, using each record's own
    /// timestamp offset from the first parseable one. Records without a
    /// parseable time are checked as if they happened at the start.
    pub fn filter_batch(&self, events: Vec<EventRecord>) -> Vec<EventRecord> {
        let base = Instant::now();
        let first = events.iter().find_map(EventRecord::parsed_timestamp);

        events
            .into_iter()
            .filter(|event| {
                let offset = match (first, event.parsed_timestamp()) {
                    (Some(first), Some(at)) => (at - first).to_std().unwrap_or_default(),
                    _ => Duration::ZERO,
                };
                !self.is_duplicate_at(event.event_type.clone(), &event.details, base + offset)
            })
            .collect()
    }

    /// Drop keys not seen within the retention window. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let retention = self.retention();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, last| now.saturating_duration_since(*last) <= retention);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn repeated_click_within_cooldown_is_suppressed() {
        let dedup = EventDeduplicator::default();
        let start = Instant::now();
        assert!(!dedup.is_duplicate_at(EventType::LeftClick, "X=10,Y=20", start));
        assert!(dedup.is_duplicate_at(
            EventType::LeftClick,
            "X=10,Y=20",
            start + Duration::from_millis(50)
        ));
        assert!(!dedup.is_duplicate_at(
            EventType::LeftClick,
            "X=10,Y=20",
            start + Duration::from_millis(1500)
        ));
    }

    #[test]
    fn clicks_at_different_coordinates_are_independent() {
        let dedup = EventDeduplicator::default();
        let start = Instant::now();
        assert!(!dedup.is_duplicate_at("LeftClick", "X=10,Y=20", start));
        assert!(!dedup.is_duplicate_at(
            "LeftClick",
            "X=99,Y=20",
            start + Duration::from_millis(10)
        ));
    }

    #[test]
    fn coordinate_formatting_is_normalized() {
        assert_eq!(
            dedup_key(&EventType::LeftClick, "X=10, Y=20"),
            dedup_key(&EventType::LeftClick, "X=10,Y=20")
        );
        assert_ne!(
            dedup_key(&EventType::LeftClick, "X=10,Y=20"),
            dedup_key(&EventType::RightClick, "X=10,Y=20")
        );
    }

    #[test]
    fn clicks_on_different_elements_at_same_point_are_independent() {
        let dedup = EventDeduplicator::default();
        let start = Instant::now();
        assert!(!dedup.is_duplicate_at(
            EventType::UiElementClick,
            "Clicked Save at X=10, Y=20",
            start
        ));
        assert!(!dedup.is_duplicate_at(
            EventType::UiElementClick,
            "Clicked Open at X=10, Y=20",
            start + Duration::from_millis(50)
        ));
        assert!(dedup.is_duplicate_at(
            EventType::UiElementClick,
            "Clicked Save at X=10,Y=20",
            start + Duration::from_millis(100)
        ));
    }

    #[test]
    fn click_text_around_coordinates_is_kept() {
        let key = dedup_key(&EventType::LeftClick, " Clicked Save at x = 10 , y=-3 ");
        assert_eq!(key.details, "Clicked Save at X=10,Y=-3");
    }

    #[test]
    fn non_click_events_use_plain_details() {
        let key = dedup_key(&EventType::KeyPress, " X=1,Y=2 ");
        assert_eq!(key.details, "X=1,Y=2");
        assert_ne!(
            dedup_key(&EventType::KeyPress, "X=1, Y=2"),
            dedup_key(&EventType::KeyPress, "X=1,Y=2")
        );
    }

    #[test]
    fn different_event_types_do_not_collide() {
        let dedup = EventDeduplicator::default();
        let now = Instant::now();
        assert!(!dedup.is_duplicate_at(EventType::KeyPress, "c", now));
        assert!(!dedup.is_duplicate_at(EventType::ClipboardChange, "c", now));
        assert!(dedup.is_duplicate_at(EventType::KeyPress, "c", now));
    }

    #[test]
    fn sweep_drops_stale_keys() {
        let dedup = EventDeduplicator::new(Duration::from_secs(1));
        let start = Instant::now();
        dedup.is_duplicate_at(EventType::KeyPress, "a", start);
        dedup.is_duplicate_at(EventType::KeyPress, "b", start + Duration::from_secs(8));

        assert_eq!(dedup.sweep_at(start + Duration::from_secs(11)), 1);
        assert_eq!(dedup.len(), 1);
        assert_eq!(dedup.retention(), Duration::from_secs(10));
    }

    #[test]
    fn batch_replay_uses_event_timestamps() {
        let click = |ts: &str, details: &str| {
            EventRecord::new(ts, EventType::LeftClick, details)
        };
        let events = vec![
            click("2024-01-01T10:00:00.000", "X=10,Y=20"),
            click("2024-01-01T10:00:00.050", "X=10, Y=20"),
            click("2024-01-01T10:00:00.060", "X=99,Y=20"),
            click("2024-01-01T10:00:01.500", "X=10,Y=20"),
        ];

        let kept = EventDeduplicator::default().filter_batch(events);
        let timestamps: Vec<_> = kept.iter().map(|e| e.timestamp.as_str()).collect();
        assert_eq!(
            timestamps,
            vec![
                "2024-01-01T10:00:00.000",
                "2024-01-01T10:00:00.060",
                "2024-01-01T10:00:01.500"
            ]
        );
    }

    #[test]
    fn built_from_settings() {
        let settings = CoachSettings {
            dedup_cooldown_secs: 0.5,
            dedup_sweep_factor: 4,
            ..CoachSettings::default()
        };
        let dedup = EventDeduplicator::from_settings(&settings);
        assert_eq!(dedup.cooldown(), Duration::from_millis(500));
        assert_eq!(dedup.retention(), Duration::from_secs(2));

        let start = Instant::now();
        assert!(!dedup.is_duplicate_at(EventType::KeyPress, "a", start));
        assert!(!dedup.is_duplicate_at(
            EventType::KeyPress,
            "a",
            start + Duration::from_millis(600)
        ));

        let defaults = EventDeduplicator::from_settings(&CoachSettings::default());
        assert_eq!(defaults.cooldown(), DEFAULT_COOLDOWN);
        assert_eq!(defaults.retention(), Duration::from_secs(10));
    }

    #[test]
    fn shared_between_threads() {
        let dedup = Arc::new(EventDeduplicator::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let dedup = Arc::clone(&dedup);
                thread::spawn(move || dedup.is_duplicate(EventType::ClipboardChange, "same"))
            })
            .collect();

        let suppressed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|duplicate| *duplicate)
            .count();
        // Exactly one producer gets through.
        assert_eq!(suppressed, 3);
    }
}
