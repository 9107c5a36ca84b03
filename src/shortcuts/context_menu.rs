use std::sync::Arc;

use crate::shortcuts::catalog::{Shortcut, ShortcutCatalog};

/// Menu actions worth recognizing in context-menu item text.
const MENU_ACTIONS: &[&str] = &[
    "copy",
    "cut",
    "paste",
    "delete",
    "rename",
    "select all",
    "undo",
    "redo",
    "refresh",
    "new",
    "open",
    "save",
    "print",
    "properties",
    "send to",
    "create shortcut",
    "pin to start",
    "pin to taskbar",
    "run as administrator",
    "troubleshoot compatibility",
];

/// Interprets the text of a selected context-menu item.
#[derive(Debug, Clone)]
pub struct ContextMenuAnalyzer {
    catalog: Arc<ShortcutCatalog>,
}

impl ContextMenuAnalyzer {
    pub fn new(catalog: Arc<ShortcutCatalog>) -> Self {
        Self { catalog }
    }

    /// The known action that covers the largest share of `menu_text`.
    pub fn selected_action(&self, menu_text: &str) -> Option<&'static str> {
        let text = menu_text.trim().to_lowercase();
        if text.is_empty() {
            return None;
        }

        let mut best: Option<(&'static str, f64)> = None;
        for action in MENU_ACTIONS {
            if !text.contains(action) {
                continue;
            }
            let score = action.len() as f64 / text.len() as f64;
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((action, score));
            }
        }
        best.map(|(action, _)| action)
    }

    /// Catalog shortcut for an action: direct lookup first, then search.
    pub fn suggest(&self, action: &str) -> Option<Shortcut> {
        self.catalog
            .lookup_action(action)
            .or_else(|| self.catalog.search(action).into_iter().next())
    }

    pub fn analyze(&self, menu_text: &str) -> Option<Shortcut> {
        let action = self.selected_action(menu_text)?;
        log::debug!("context menu '{menu_text}' mapped to action '{action}'");
        self.suggest(action)
    }
}

impl Default for ContextMenuAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(ShortcutCatalog::standard()))
    }
}
