//! Workflow recognition for segmented processes.
//!
//! A [`PatternDetector`] runs an ordered list of [`Recognizer`] strategies over
//! a process's actions. The first recognizer to produce a description wins;
//! otherwise the summary falls back to grouped runs of identical actions.

pub mod file_operation;
pub mod navigation;
pub mod text_input;

use crate::models::{EventRecord, Process};

pub use file_operation::FileOperationRecognizer;
pub use navigation::NavigationRecognizer;
pub use text_input::TextInputRecognizer;

const RUN_SEPARATOR: &str = " → ";

/// A heuristic that may recognize a known workflow in a list of actions.
pub trait Recognizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fewer actions than this are never inspected.
    fn min_actions(&self) -> usize {
        2
    }

    /// Human-readable description of the workflow, if recognized.
    fn try_detect(&self, actions: &[EventRecord], context: &str) -> Option<String>;
}

pub struct PatternDetector {
    recognizers: Vec<Box<dyn Recognizer>>,
}

impl PatternDetector {
    pub fn new(recognizers: Vec<Box<dyn Recognizer>>) -> Self {
        Self { recognizers }
    }

    /// Text input, then navigation, then file operations.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(TextInputRecognizer),
            Box::new(NavigationRecognizer),
            Box::new(FileOperationRecognizer),
        ])
    }

    pub fn with_recognizer(mut self, recognizer: Box<dyn Recognizer>) -> Self {
        self.recognizers.push(recognizer);
        self
    }

    pub fn recognizer_names(&self) -> Vec<&'static str> {
        self.recognizers.iter().map(|r| r.name()).collect()
    }

    pub fn summarize(&self, process: &Process) -> String {
        let actions = process.actions.as_slice();
        if actions.is_empty() {
            return "No actions".to_string();
        }

        let context = match process.context() {
            "" => "Unknown",
            context => context,
        };

        self.detect_workflow(actions, context)
            .unwrap_or_else(|| grouped_runs(actions))
    }

    pub fn detect_workflow(&self, actions: &[EventRecord], context: &str) -> Option<String> {
        self.recognizers
            .iter()
            .filter(|recognizer| actions.len() >= recognizer.min_actions())
            .find_map(|recognizer| recognizer.try_detect(actions, context))
    }
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self::standard()
    }
}

/// Collapse consecutive identical actions into `"<key> (<n>x)"` runs.
fn grouped_runs(actions: &[EventRecord]) -> String {
    let mut runs: Vec<(String, usize)> = Vec::new();
    for action in actions {
        let key = action.action_key();
        match runs.last_mut() {
            Some((last, count)) if *last == key => *count += 1,
            _ => runs.push((key, 1)),
        }
    }

    runs.into_iter()
        .map(|(key, count)| {
            if count > 1 {
                format!("{key} ({count}x)")
            } else {
                key
            }
        })
        .collect::<Vec<_>>()
        .join(RUN_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventType;
    use chrono::Utc;

    fn process(context: &str, actions: &[(EventType, &str)]) -> Process {
        let mut process = Process::new("p", Utc::now(), context);
        for (event_type, details) in actions {
            process.add_action(EventRecord::new(
                "2024-01-01T10:00:00",
                event_type.clone(),
                *details,
            ));
        }
        process
    }

    fn keys(context: &str, keys: &[&str]) -> Process {
        let actions: Vec<(EventType, &str)> =
            keys.iter().map(|k| (EventType::KeyPress, *k)).collect();
        process(context, &actions)
    }

    #[test]
    fn empty_process_has_no_actions_summary() {
        assert_eq!(keys("Hyper", &[]).summary(), "No actions");
    }

    #[test]
    fn text_entry_is_summarized_as_sent_text() {
        let p = keys("Hyper", &["h", "e", "l", "p", "Key.enter"]);
        assert_eq!(p.summary(), "User sent 'help' to Hyper");
    }

    #[test]
    fn cd_command_is_summarized_as_navigation() {
        let p = keys("Hyper", &["c", "d", " ", "p", "r", "o", "j", "Key.enter"]);
        assert_eq!(p.summary(), "User navigated to cd proj in Hyper");
    }

    #[test]
    fn file_operation_is_detected_from_descriptors() {
        let p = process(
            "EXCEL.EXE",
            &[
                (EventType::UiElementClick, "Clicked Copy"),
                (EventType::LeftClick, "X=10, Y=20"),
            ],
        );
        assert_eq!(p.summary(), "User performed copy operation in EXCEL.EXE");
    }

    #[test]
    fn fallback_groups_repeated_actions() {
        let p = process(
            "Explorer",
            &[
                (EventType::LeftClick, "X=1, Y=1"),
                (EventType::LeftClick, "X=1, Y=1"),
                (EventType::LeftClick, "X=1, Y=1"),
                (EventType::RightClick, "X=5, Y=5"),
            ],
        );
        assert_eq!(
            p.summary(),
            "Left Click:X=1, Y=1 (3x) → Right Click:X=5, Y=5"
        );
    }

    #[test]
    fn single_action_renders_that_action() {
        let p = keys("Hyper", &["Key.enter"]);
        assert_eq!(p.summary(), "Key Press:Key.enter");
    }

    #[test]
    fn recognizers_need_two_actions() {
        let p = process("Excel", &[(EventType::UiElementClick, "Clicked Save")]);
        assert_eq!(p.summary(), "UI Element Click:Clicked Save");
    }

    #[test]
    fn blank_context_renders_as_unknown() {
        let p = keys("", &["o", "k", "Key.enter"]);
        assert_eq!(p.summary(), "User sent 'ok' to Unknown");
    }

    struct AlwaysRecognizer;

    impl Recognizer for AlwaysRecognizer {
        fn name(&self) -> &'static str {
            "always"
        }

        fn try_detect(&self, _actions: &[EventRecord], context: &str) -> Option<String> {
            Some(format!("custom in {context}"))
        }
    }

    #[test]
    fn custom_recognizers_run_after_builtin_ones() {
        let detector = PatternDetector::standard().with_recognizer(Box::new(AlwaysRecognizer));
        assert_eq!(
            detector.recognizer_names(),
            vec!["text_input", "navigation", "file_operation", "always"]
        );

        let typed = keys("Hyper", &["h", "i", "Key.enter"]);
        assert_eq!(typed.summary_with(&detector), "User sent 'hi' to Hyper");

        let clicks = process(
            "Paint",
            &[(EventType::LeftClick, "X=1, Y=1"), (EventType::LeftClick, "X=2, Y=2")],
        );
        assert_eq!(clicks.summary_with(&detector), "custom in Paint");
    }
}
