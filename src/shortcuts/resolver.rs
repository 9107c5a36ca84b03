use std::sync::Arc;

use crate::models::ElementDescriptor;
use crate::shortcuts::catalog::{AppScope, Shortcut, ShortcutCatalog};

/// Maps a clicked UI element to a catalog shortcut.
///
/// Only catalog entries are ever returned; nothing is synthesized.
#[derive(Debug, Clone)]
pub struct ShortcutResolver {
    catalog: Arc<ShortcutCatalog>,
}

impl ShortcutResolver {
    pub fn new(catalog: Arc<ShortcutCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ShortcutCatalog {
        &self.catalog
    }

    pub fn resolve(&self, element: &ElementDescriptor) -> Option<Shortcut> {
        if element.is_error() {
            return None;
        }

        let name = element.name.to_lowercase();
        if name.trim().is_empty() {
            return None;
        }
        // The element is the shortcut hint itself.
        if name.contains("shortcut") {
            return None;
        }

        let scope = AppScope::classify(&element.app_name);
        let scoped = match scope {
            AppScope::Generic => None,
            scope => self.catalog.match_keyword(scope, &name),
        };

        scoped
            .or_else(|| self.catalog.match_keyword(AppScope::Generic, &name))
            .map(|entry| entry.shortcut())
    }
}

impl Default for ShortcutResolver {
    fn default() -> Self {
        Self::new(Arc::new(ShortcutCatalog::standard()))
    }
}
