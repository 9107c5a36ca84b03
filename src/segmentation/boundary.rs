//! Boundary rules deciding where one process ends and the next begins.

use std::sync::OnceLock;

use regex::Regex;

use crate::log_debug;
use crate::models::EventRecord;
use crate::segmentation::config::SegmentationConfig;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = false;

/// Returns true when `current` should start a new process.
///
/// Rules, first match wins:
/// 1. no previous event;
/// 2. time gap (Enter grace period, typing cadence, generic inactivity);
/// 3. application change;
/// 4. significant window-title change.
///
/// Enter/Return on its own never starts a process; it only changes which gap
/// applies to the event after it.
pub fn is_boundary(
    current: &EventRecord,
    previous: Option<&EventRecord>,
    config: &SegmentationConfig,
) -> bool {
    let Some(previous) = previous else {
        return true;
    };

    if exceeds_time_gap(current, previous, config) {
        return true;
    }

    if let (Some(current_app), Some(previous_app)) = (current.app(), previous.app()) {
        if current_app != previous_app {
            return true;
        }
    }

    if let (Some(current_title), Some(previous_title)) = (current.title(), previous.title()) {
        if is_significant_title_change(current_title, previous_title) {
            return true;
        }
    }

    false
}

fn exceeds_time_gap(
    current: &EventRecord,
    previous: &EventRecord,
    config: &SegmentationConfig,
) -> bool {
    // Unparseable timestamps never trigger a time boundary.
    let Some(gap) = gap_secs(previous, current) else {
        log_debug!(
            "skipping time rule for unparseable timestamps {:?} -> {:?}",
            previous.timestamp,
            current.timestamp
        );
        return false;
    };

    if previous.is_enter_key() {
        gap > config.text_input_delay_secs
    } else if previous.typed_char().is_some() && current.typed_char().is_some() {
        gap > config.typing_threshold_secs
    } else {
        gap > config.inactivity_threshold_secs
    }
}

/// Seconds elapsed from `earlier` to `later`, if both timestamps parse.
pub fn gap_secs(earlier: &EventRecord, later: &EventRecord) -> Option<f64> {
    let earlier = earlier.parsed_timestamp()?;
    let later = later.parsed_timestamp()?;
    Some((later - earlier).num_milliseconds() as f64 / 1000.0)
}

fn app_suffix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r" - [^-]+$").expect("valid title suffix pattern"))
}

/// Reduce a window title to the part that identifies the document or folder:
/// drop the trailing `" - <App>"`, unsaved-change markers, and for path-like
/// titles everything but the last path component.
pub fn normalize_title(title: &str) -> String {
    let stripped = app_suffix_pattern().replace(title, "");
    let trimmed = stripped
        .trim()
        .trim_start_matches(['*', '●'])
        .trim_end_matches(['*', '●'])
        .trim();

    if trimmed.contains(['\\', '/']) {
        if let Some(last) = trimmed
            .split(['\\', '/'])
            .filter(|part| !part.trim().is_empty())
            .last()
        {
            return last.trim().to_string();
        }
    }

    trimmed.to_string()
}

pub fn is_significant_title_change(current: &str, previous: &str) -> bool {
    if current.is_empty() || previous.is_empty() {
        return false;
    }
    normalize_title(current) != normalize_title(previous)
}
