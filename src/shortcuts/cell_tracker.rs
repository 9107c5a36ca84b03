use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::shortcuts::catalog::{AppScope, Shortcut};

const CELL_CLICK_COOLDOWN: Duration = Duration::from_millis(100);

/// A spreadsheet cell address such as `B6`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellAddress {
    pub column: String,
    pub row: u32,
}

impl CellAddress {
    /// Parse element names of the form `<letters><digits>`, e.g. `A1`, `AA10`.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        let split = name.find(|c: char| c.is_ascii_digit())?;
        let (column, row) = name.split_at(split);

        if column.is_empty() || column.len() > 3 || !column.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        if !row.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let row: u32 = row.parse().ok()?;
        if row == 0 {
            return None;
        }

        Some(Self {
            column: column.to_ascii_uppercase(),
            row,
        })
    }

    pub fn label(&self) -> String {
        format!("{}{}", self.column, self.row)
    }
}

/// Watches cell selections in a spreadsheet and suggests `Ctrl + Up` when the
/// user clicks from inside a data region back up to the first row.
#[derive(Debug)]
pub struct CellTracker {
    current: Option<CellAddress>,
    last_selection: Option<Instant>,
    cooldown: Duration,
}

impl Default for CellTracker {
    fn default() -> Self {
        Self::new(CELL_CLICK_COOLDOWN)
    }
}

impl CellTracker {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            current: None,
            last_selection: None,
            cooldown,
        }
    }

    pub fn current_cell(&self) -> Option<&CellAddress> {
        self.current.as_ref()
    }

    pub fn observe(&mut self, element_name: &str, app_name: &str) -> Option<Shortcut> {
        self.observe_at(element_name, app_name, Instant::now())
    }

    pub fn observe_at(&mut self, element_name: &str, app_name: &str, now: Instant) -> Option<Shortcut> {
        if AppScope::classify(app_name) != AppScope::Spreadsheet {
            self.reset();
            return None;
        }

        if let Some(last) = self.last_selection {
            if now.saturating_duration_since(last) < self.cooldown {
                return None;
            }
        }

        let cell = CellAddress::parse(element_name)?;
        let previous = self.current.replace(cell.clone());
        self.last_selection = Some(now);

        match previous {
            Some(from) if from.row > 1 && cell.row == 1 => {
                log::info!("cell jump {} -> {} could use Ctrl + Up", from.label(), cell.label());
                Some(Shortcut::new(
                    "Ctrl + Up",
                    "Jump to beginning of data region",
                    AppScope::Spreadsheet,
                ))
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.current = None;
        self.last_selection = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cell_addresses() {
        assert_eq!(
            CellAddress::parse("B6"),
            Some(CellAddress { column: "B".into(), row: 6 })
        );
        assert_eq!(CellAddress::parse("aa10").unwrap().label(), "AA10");
        assert!(CellAddress::parse("Save").is_none());
        assert!(CellAddress::parse("6B").is_none());
        assert!(CellAddress::parse("A0").is_none());
        assert!(CellAddress::parse("B6x").is_none());
    }

    #[test]
    fn jump_to_first_row_suggests_ctrl_up() {
        let mut tracker = CellTracker::default();
        let start = Instant::now();
        assert!(tracker.observe_at("B6", "EXCEL.EXE", start).is_none());

        let shortcut = tracker
            .observe_at("B1", "EXCEL.EXE", start + Duration::from_secs(1))
            .unwrap();
        assert_eq!(shortcut.chord, "Ctrl + Up");
        assert_eq!(shortcut.log_key(), "SHORTCUT_CTRL_ARROW_UP");
        assert_eq!(tracker.current_cell().unwrap().label(), "B1");
    }

    #[test]
    fn clicks_inside_cooldown_are_ignored() {
        let mut tracker = CellTracker::default();
        let start = Instant::now();
        tracker.observe_at("B6", "EXCEL.EXE", start);
        assert!(tracker
            .observe_at("B1", "EXCEL.EXE", start + Duration::from_millis(50))
            .is_none());
        assert_eq!(tracker.current_cell().unwrap().label(), "B6");
    }

    #[test]
    fn leaving_spreadsheet_resets_state() {
        let mut tracker = CellTracker::default();
        let start = Instant::now();
        tracker.observe_at("B6", "EXCEL.EXE", start);
        tracker.observe_at("B1", "chrome.exe", start + Duration::from_secs(1));
        assert!(tracker.current_cell().is_none());
        assert!(tracker
            .observe_at("B1", "EXCEL.EXE", start + Duration::from_secs(2))
            .is_none());
    }
}
