//! Static keyboard-shortcut catalog, partitioned by application scope.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Catalog partition used to prioritize resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppScope {
    Spreadsheet,
    CodeEditor,
    Browser,
    Generic,
}

impl AppScope {
    pub const ALL: [AppScope; 4] = [
        AppScope::Spreadsheet,
        AppScope::CodeEditor,
        AppScope::Browser,
        AppScope::Generic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppScope::Spreadsheet => "spreadsheet",
            AppScope::CodeEditor => "code_editor",
            AppScope::Browser => "browser",
            AppScope::Generic => "generic",
        }
    }

    fn app_keywords(&self) -> &'static [&'static str] {
        match self {
            AppScope::Spreadsheet => &["excel", "scalc", "spreadsheet"],
            AppScope::CodeEditor => &["cursor", "code", "editor"],
            AppScope::Browser => &["chrome", "firefox", "msedge", "browser"],
            AppScope::Generic => &[],
        }
    }

    /// Classify an application name; spreadsheet beats editor beats browser.
    pub fn classify(app_name: &str) -> AppScope {
        let app_name = app_name.to_lowercase();
        [AppScope::Spreadsheet, AppScope::CodeEditor, AppScope::Browser]
            .into_iter()
            .find(|scope| {
                scope
                    .app_keywords()
                    .iter()
                    .any(|keyword| app_name.contains(keyword))
            })
            .unwrap_or(AppScope::Generic)
    }
}

impl fmt::Display for AppScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A suggested chord and its human label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortcut {
    pub chord: String,
    pub description: String,
    pub scope: AppScope,
}

impl Shortcut {
    pub fn new(chord: impl Into<String>, description: impl Into<String>, scope: AppScope) -> Self {
        Self {
            chord: chord.into(),
            description: description.into(),
            scope,
        }
    }

    /// Stable identifier used when logging a suggestion, e.g. `SHORTCUT_CTRL_C`.
    pub fn log_key(&self) -> String {
        chord_log_key(&self.chord)
    }
}

pub fn chord_log_key(chord: &str) -> String {
    let special = match chord {
        "Ctrl + Arrow Keys" => Some("SHORTCUT_CTRL_ARROW"),
        "Ctrl + ↑" | "Ctrl + Up" => Some("SHORTCUT_CTRL_ARROW_UP"),
        "Ctrl + ↓" | "Ctrl + Down" => Some("SHORTCUT_CTRL_ARROW_DOWN"),
        "Ctrl + ←" | "Ctrl + Left" => Some("SHORTCUT_CTRL_ARROW_LEFT"),
        "Ctrl + →" | "Ctrl + Right" => Some("SHORTCUT_CTRL_ARROW_RIGHT"),
        "Ctrl + Page Up/Page Down" => Some("SHORTCUT_CTRL_PAGE_UP_DOWN"),
        "Alt + ←" => Some("SHORTCUT_ALT_LEFT"),
        "Alt + →" => Some("SHORTCUT_ALT_RIGHT"),
        _ => None,
    };

    match special {
        Some(key) => key.to_string(),
        None => format!(
            "SHORTCUT_{}",
            chord.replace(" + ", "_").replace(' ', "_").to_uppercase()
        ),
    }
}

/// One catalog row: a keyword looked for in element names, and its shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub keyword: String,
    pub chord: String,
    pub description: String,
    pub scope: AppScope,
}

impl CatalogEntry {
    pub fn shortcut(&self) -> Shortcut {
        Shortcut::new(&self.chord, &self.description, self.scope)
    }
}

// (scope, keyword, chord, description). Order within a scope is match priority.
const STANDARD_ENTRIES: &[(AppScope, &str, &str, &str)] = &[
    (AppScope::Generic, "copy", "Ctrl + C", "Copy"),
    (AppScope::Generic, "paste", "Ctrl + V", "Paste"),
    (AppScope::Generic, "cut", "Ctrl + X", "Cut"),
    (AppScope::Generic, "save", "Ctrl + S", "Save"),
    (AppScope::Generic, "new", "Ctrl + N", "New"),
    (AppScope::Generic, "open", "Ctrl + O", "Open"),
    (AppScope::Generic, "undo", "Ctrl + Z", "Undo"),
    (AppScope::Generic, "redo", "Ctrl + Y", "Redo"),
    (AppScope::Generic, "find", "Ctrl + F", "Find"),
    (AppScope::Generic, "print", "Ctrl + P", "Print"),
    (AppScope::Generic, "select all", "Ctrl + A", "Select all"),
    (AppScope::Spreadsheet, "save", "Ctrl + S", "Save workbook"),
    (AppScope::Spreadsheet, "new", "Ctrl + N", "New workbook"),
    (AppScope::Spreadsheet, "open", "Ctrl + O", "Open workbook"),
    (AppScope::Spreadsheet, "bold", "Ctrl + B", "Bold"),
    (AppScope::Spreadsheet, "italic", "Ctrl + I", "Italic"),
    (AppScope::Spreadsheet, "underline", "Ctrl + U", "Underline"),
    (AppScope::Spreadsheet, "copy", "Ctrl + C", "Copy"),
    (AppScope::Spreadsheet, "paste", "Ctrl + V", "Paste"),
    (AppScope::Spreadsheet, "cut", "Ctrl + X", "Cut"),
    (AppScope::Spreadsheet, "undo", "Ctrl + Z", "Undo"),
    (AppScope::Spreadsheet, "redo", "Ctrl + Y", "Redo/Repeat action"),
    (AppScope::Spreadsheet, "find", "Ctrl + F", "Find"),
    (AppScope::Spreadsheet, "replace", "Ctrl + H", "Replace"),
    (AppScope::Spreadsheet, "print", "Ctrl + P", "Print"),
    (AppScope::Spreadsheet, "autosum", "Alt + =", "AutoSum"),
    (AppScope::Spreadsheet, "filter", "Ctrl + Shift + L", "Toggle filters"),
    (AppScope::Spreadsheet, "format cells", "Ctrl + 1", "Format cells"),
    (AppScope::Spreadsheet, "select entire column", "Ctrl + Space", "Select entire column"),
    (AppScope::Spreadsheet, "select entire row", "Shift + Space", "Select entire row"),
    (AppScope::Spreadsheet, "edit cell", "F2", "Edit selected cell"),
    (AppScope::CodeEditor, "save", "Ctrl + S", "Save"),
    (AppScope::CodeEditor, "new file", "Ctrl + N", "New File"),
    (AppScope::CodeEditor, "open file", "Ctrl + O", "Open File"),
    (AppScope::CodeEditor, "copy", "Ctrl + C", "Copy"),
    (AppScope::CodeEditor, "paste", "Ctrl + V", "Paste"),
    (AppScope::CodeEditor, "cut", "Ctrl + X", "Cut"),
    (AppScope::CodeEditor, "undo", "Ctrl + Z", "Undo"),
    (AppScope::CodeEditor, "redo", "Ctrl + Y", "Redo"),
    (AppScope::CodeEditor, "find", "Ctrl + F", "Find"),
    (AppScope::CodeEditor, "replace", "Ctrl + H", "Replace"),
    (AppScope::CodeEditor, "select all", "Ctrl + A", "Select All"),
    (AppScope::CodeEditor, "comment", "Ctrl + /", "Toggle line comment"),
    (AppScope::CodeEditor, "command palette", "Ctrl + Shift + P", "Command palette"),
    (AppScope::CodeEditor, "terminal", "Ctrl + `", "Toggle terminal"),
    (AppScope::CodeEditor, "sidebar", "Ctrl + B", "Toggle sidebar"),
    (AppScope::CodeEditor, "go to definition", "F12", "Go to definition"),
    (AppScope::Browser, "new tab", "Ctrl + T", "New Tab"),
    (AppScope::Browser, "close tab", "Ctrl + W", "Close Tab"),
    (AppScope::Browser, "refresh", "F5", "Refresh"),
    (AppScope::Browser, "reload", "Ctrl + R", "Reload page"),
    (AppScope::Browser, "back", "Alt + ←", "Go Back"),
    (AppScope::Browser, "forward", "Alt + →", "Go Forward"),
    (AppScope::Browser, "bookmark", "Ctrl + D", "Bookmark"),
    (AppScope::Browser, "downloads", "Ctrl + J", "Downloads"),
    (AppScope::Browser, "history", "Ctrl + H", "History"),
    (AppScope::Browser, "find", "Ctrl + F", "Find"),
    (AppScope::Browser, "select all", "Ctrl + A", "Select All"),
    (AppScope::Browser, "copy", "Ctrl + C", "Copy"),
    (AppScope::Browser, "paste", "Ctrl + V", "Paste"),
];

/// Immutable lookup table shared read-only by the resolver and analyzers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutCatalog {
    entries: Vec<CatalogEntry>,
}

impl ShortcutCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn standard() -> Self {
        Self::new(
            STANDARD_ENTRIES
                .iter()
                .map(|(scope, keyword, chord, description)| CatalogEntry {
                    keyword: keyword.to_string(),
                    chord: chord.to_string(),
                    description: description.to_string(),
                    scope: *scope,
                })
                .collect(),
        )
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn entries_for(&self, scope: AppScope) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(move |entry| entry.scope == scope)
    }

    /// First entry of `scope` whose keyword occurs in `element_name`
    /// (expected lowercase).
    pub fn match_keyword(&self, scope: AppScope, element_name: &str) -> Option<&CatalogEntry> {
        self.entries_for(scope)
            .find(|entry| element_name.contains(entry.keyword.as_str()))
    }

    /// First entry whose description or chord contains `action`, ignoring case.
    pub fn lookup_action(&self, action: &str) -> Option<Shortcut> {
        let action = action.trim().to_lowercase();
        if action.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|entry| {
                entry.description.to_lowercase().contains(&action)
                    || entry.chord.to_lowercase().contains(&action)
            })
            .map(CatalogEntry::shortcut)
    }

    /// Every entry whose chord, description or scope name contains `query`.
    pub fn search(&self, query: &str) -> Vec<Shortcut> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|entry| {
                entry.chord.to_lowercase().contains(&query)
                    || entry.description.to_lowercase().contains(&query)
                    || entry.scope.as_str().contains(&query)
            })
            .map(CatalogEntry::shortcut)
            .collect()
    }

    /// Distinct chords across all scopes, sorted.
    pub fn all_chords(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.chord.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl Default for ShortcutCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
