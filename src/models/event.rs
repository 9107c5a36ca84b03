//! Event record data model.
//!
//! A single timestamped observation produced by the input/window monitors.
//! Records are immutable once created; the analysis core only reads them.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of observation carried by an [`EventRecord`].
///
/// Serialized as the display label (`"Key Press"`, `"Left Click"`, ...) so
/// stored logs stay human readable. Unknown labels round-trip through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    KeyPress,
    LeftClick,
    RightClick,
    ContextMenuClick,
    /// A left click that picked an item out of an open context menu.
    MenuSelectionClick,
    UiElementClick,
    WindowChange,
    ClipboardChange,
    Other(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::KeyPress => "Key Press",
            EventType::LeftClick => "Left Click",
            EventType::RightClick => "Right Click",
            EventType::ContextMenuClick => "Context Menu Click",
            EventType::MenuSelectionClick => "Left Click (Context Menu)",
            EventType::UiElementClick => "UI Element Click",
            EventType::WindowChange => "Window Change",
            EventType::ClipboardChange => "Clipboard Change",
            EventType::Other(label) => label.as_str(),
        }
    }

    pub fn is_click(&self) -> bool {
        matches!(
            self,
            EventType::LeftClick
                | EventType::RightClick
                | EventType::ContextMenuClick
                | EventType::MenuSelectionClick
                | EventType::UiElementClick
        )
    }
}

impl From<&str> for EventType {
    fn from(value: &str) -> Self {
        match value {
            "Key Press" | "KeyPress" => EventType::KeyPress,
            "Left Click" | "LeftClick" => EventType::LeftClick,
            "Right Click" | "RightClick" => EventType::RightClick,
            "Context Menu Click" | "ContextMenuClick" => EventType::ContextMenuClick,
            "Left Click (Context Menu)" | "MenuSelectionClick" => EventType::MenuSelectionClick,
            "UI Element Click" | "UIElementClick" => EventType::UiElementClick,
            "Window Change" | "WindowChange" => EventType::WindowChange,
            "Clipboard Change" | "ClipboardChange" => EventType::ClipboardChange,
            other => EventType::Other(other.to_string()),
        }
    }
}

impl From<String> for EventType {
    fn from(value: String) -> Self {
        EventType::from(value.as_str())
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single timestamped observation (key press, click, window change).
///
/// `timestamp` is kept as the raw ISO-8601 text handed over by the producer so
/// that a malformed value can still be carried through a batch; use
/// [`EventRecord::parsed_timestamp`] to interpret it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub timestamp: String,
    pub event_type: EventType,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub window_title: Option<String>,
    #[serde(default)]
    pub context_action: Option<String>,
}

impl EventRecord {
    pub fn new(
        timestamp: impl Into<String>,
        event_type: EventType,
        details: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            event_type,
            details: details.into(),
            app_name: None,
            window_title: None,
            context_action: None,
        }
    }

    pub fn at(timestamp: DateTime<Utc>, event_type: EventType, details: impl Into<String>) -> Self {
        Self::new(timestamp.to_rfc3339(), event_type, details)
    }

    pub fn with_app(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_window_title(mut self, window_title: impl Into<String>) -> Self {
        self.window_title = Some(window_title.into());
        self
    }

    pub fn with_context_action(mut self, context_action: impl Into<String>) -> Self {
        self.context_action = Some(context_action.into());
        self
    }

    /// Parse the raw timestamp. Accepts RFC 3339 (`Z` or offset) and naive
    /// ISO-8601 date-times, which are taken as UTC.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }

    /// Application name, or `None` when absent or blank.
    pub fn app(&self) -> Option<&str> {
        non_blank(self.app_name.as_deref())
    }

    pub fn title(&self) -> Option<&str> {
        non_blank(self.window_title.as_deref())
    }

    pub fn is_key_press(&self) -> bool {
        self.event_type == EventType::KeyPress
    }

    pub fn is_enter_key(&self) -> bool {
        self.is_key_press() && is_enter_detail(&self.details)
    }

    /// The typed character when this is a single-character key press.
    pub fn typed_char(&self) -> Option<char> {
        if !self.is_key_press() {
            return None;
        }
        let mut chars = self.details.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    /// `"<event_type>:<details>"`, the unit used by signatures and summaries.
    pub fn action_key(&self) -> String {
        format!("{}:{}", self.event_type, self.details)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn is_enter_detail(details: &str) -> bool {
    matches!(
        details.to_ascii_lowercase().as_str(),
        "key.enter" | "key.return" | "enter" | "return"
    )
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}
