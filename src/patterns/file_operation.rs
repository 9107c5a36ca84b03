use crate::models::EventRecord;
use crate::patterns::Recognizer;

/// Checked in this order; the first keyword found wins.
const FILE_OPERATIONS: [&str; 4] = ["copy", "paste", "save", "open"];

/// Detects copy/paste/save/open by keyword anywhere in the action descriptors.
pub struct FileOperationRecognizer;

impl Recognizer for FileOperationRecognizer {
    fn name(&self) -> &'static str {
        "file_operation"
    }

    fn try_detect(&self, actions: &[EventRecord], context: &str) -> Option<String> {
        let text = actions
            .iter()
            .map(EventRecord::action_key)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        FILE_OPERATIONS
            .iter()
            .find(|op| text.contains(*op))
            .map(|op| format!("User performed {op} operation in {context}"))
    }
}
