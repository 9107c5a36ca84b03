use crate::models::EventRecord;
use crate::patterns::navigation::cd_target;
use crate::patterns::Recognizer;

/// Detects a line of typed text submitted with Enter/Return.
///
/// Every printable single-character key press in the span goes into the
/// buffer, including characters typed around modifier chords. A typed `cd`
/// command is left to the navigation recognizer.
pub struct TextInputRecognizer;

impl Recognizer for TextInputRecognizer {
    fn name(&self) -> &'static str {
        "text_input"
    }

    fn try_detect(&self, actions: &[EventRecord], context: &str) -> Option<String> {
        let mut buffer = String::new();
        let mut submitted = false;

        for action in actions.iter().filter(|a| a.is_key_press()) {
            if action.is_enter_key() {
                submitted = true;
            } else if let Some(c) = action.typed_char().filter(|c| !c.is_control()) {
                buffer.push(c);
            }
        }

        if buffer.is_empty() || !submitted || cd_target(actions).is_some() {
            return None;
        }

        Some(format!("User sent '{buffer}' to {context}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventType;

    fn key(details: &str) -> EventRecord {
        EventRecord::new("2024-01-01T10:00:00", EventType::KeyPress, details)
    }

    #[test]
    fn requires_enter() {
        let actions = vec![key("h"), key("i")];
        assert!(TextInputRecognizer.try_detect(&actions, "Slack").is_none());
    }

    #[test]
    fn requires_text() {
        let actions = vec![key("Key.shift"), key("Key.enter")];
        assert!(TextInputRecognizer.try_detect(&actions, "Slack").is_none());
    }

    #[test]
    fn enter_anywhere_counts() {
        let actions = vec![key("Key.enter"), key("h"), key("i")];
        assert_eq!(
            TextInputRecognizer.try_detect(&actions, "Slack").as_deref(),
            Some("User sent 'hi' to Slack")
        );
    }

    #[test]
    fn keeps_characters_typed_between_chords() {
        let actions = vec![
            key("a"),
            key("Key.ctrl_l"),
            key("c"),
            key("b"),
            key("Key.return"),
        ];
        assert_eq!(
            TextInputRecognizer.try_detect(&actions, "Notepad").as_deref(),
            Some("User sent 'acb' to Notepad")
        );
    }

    #[test]
    fn ignores_non_keyboard_events() {
        let actions = vec![
            EventRecord::new("t", EventType::ClipboardChange, "x"),
            key("o"),
            key("k"),
            key("Key.enter"),
        ];
        assert_eq!(
            TextInputRecognizer.try_detect(&actions, "Teams").as_deref(),
            Some("User sent 'ok' to Teams")
        );
    }

    #[test]
    fn defers_cd_commands() {
        let actions = vec![key("c"), key("d"), key(" "), key("x"), key("Key.enter")];
        assert!(TextInputRecognizer.try_detect(&actions, "Hyper").is_none());
    }
}
