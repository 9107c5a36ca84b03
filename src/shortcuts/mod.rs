pub mod catalog;
pub mod cell_tracker;
pub mod context_menu;
pub mod resolver;

pub use catalog::{AppScope, CatalogEntry, Shortcut, ShortcutCatalog};
pub use cell_tracker::{CellAddress, CellTracker};
pub use context_menu::ContextMenuAnalyzer;
pub use resolver::ShortcutResolver;
