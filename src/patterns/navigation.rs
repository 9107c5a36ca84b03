use crate::models::EventRecord;
use crate::patterns::Recognizer;

/// Detects a shell `cd <path>` typed as individual key presses.
///
/// Only the literal `c`,`d` prefix is recognized; other commands (and `cd`
/// preceded by anything else) are left to the other recognizers.
pub struct NavigationRecognizer;

impl Recognizer for NavigationRecognizer {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn try_detect(&self, actions: &[EventRecord], context: &str) -> Option<String> {
        let target = cd_target(actions)?;
        Some(format!("User navigated to cd {target} in {context}"))
    }
}

fn is_path_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, ' ' | '\\' | '/' | '.' | '-' | '_' | '~' | ':')
}

/// The path argument of a typed `cd` command, if the qualifying characters
/// start with `c`,`d` and carry a non-blank path after them.
pub(crate) fn cd_target(actions: &[EventRecord]) -> Option<String> {
    let sequence: Vec<char> = actions
        .iter()
        .filter_map(EventRecord::typed_char)
        .filter(|c| is_path_char(*c))
        .collect();

    if sequence.len() < 3 || sequence[0] != 'c' || sequence[1] != 'd' {
        return None;
    }

    let path: String = sequence[2..].iter().collect();
    let path = path.trim();
    if path.is_empty() {
        None
    } else {
        Some(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventType;

    fn typed(keys: &[&str]) -> Vec<EventRecord> {
        keys.iter()
            .map(|k| EventRecord::new("2024-01-01T10:00:00", EventType::KeyPress, *k))
            .collect()
    }

    #[test]
    fn extracts_cd_target() {
        let actions = typed(&["c", "d", " ", "p", "r", "o", "j", "Key.enter"]);
        assert_eq!(cd_target(&actions).as_deref(), Some("proj"));
    }

    #[test]
    fn keeps_path_separators() {
        let actions = typed(&["c", "d", " ", ".", ".", "\\", "s", "r", "c"]);
        assert_eq!(
            NavigationRecognizer.try_detect(&actions, "cmd.exe").as_deref(),
            Some("User navigated to cd ..\\src in cmd.exe")
        );
    }

    #[test]
    fn requires_literal_cd_prefix() {
        assert!(cd_target(&typed(&["l", "s", " ", "-", "a"])).is_none());
        assert!(cd_target(&typed(&["x", "c", "d", " ", "a"])).is_none());
    }

    #[test]
    fn bare_cd_is_not_navigation() {
        assert!(cd_target(&typed(&["c", "d", " ", "Key.enter"])).is_none());
        assert!(cd_target(&typed(&["c", "d"])).is_none());
    }

    #[test]
    fn special_keys_do_not_break_the_sequence() {
        let actions = typed(&["c", "Key.shift", "d", " ", "a"]);
        assert_eq!(cd_target(&actions).as_deref(), Some("a"));
    }
}
