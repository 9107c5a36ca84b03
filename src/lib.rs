//! Segments a stream of desktop input events into user workflows, spots the
//! ones that repeat, and suggests keyboard shortcuts for clicked UI actions.

pub mod analysis;
pub mod db;
pub mod dedup;
pub mod frequency;
pub mod models;
pub mod patterns;
pub mod segmentation;
pub mod settings;
pub mod shortcuts;
pub mod utils;

pub use analysis::{Analyzer, ProcessReport, ProcessStatistics};
pub use db::Database;
pub use dedup::{DedupSweeper, EventDeduplicator};
pub use frequency::FrequencyTracker;
pub use models::{ElementDescriptor, EventRecord, EventType, Process};
pub use patterns::{PatternDetector, Recognizer};
pub use segmentation::{segment_events, SegmentationConfig};
pub use settings::{CoachSettings, SettingsStore};
pub use shortcuts::{Shortcut, ShortcutCatalog, ShortcutResolver};
pub use utils::logging::init_logging;
