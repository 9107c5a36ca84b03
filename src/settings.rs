use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dedup::{DEFAULT_COOLDOWN, DEFAULT_SWEEP_FACTOR};
use crate::frequency::DEFAULT_MIN_FREQUENCY;
use crate::segmentation::SegmentationConfig;

/// Every tunable parameter of the analysis pipeline.
///
/// All fields default, so a settings file only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoachSettings {
    pub segmentation: SegmentationConfig,
    pub min_frequency: usize,
    pub dedup_cooldown_secs: f64,
    pub dedup_sweep_factor: u32,
    pub recent_hours: u32,
}

impl Default for CoachSettings {
    fn default() -> Self {
        Self {
            segmentation: SegmentationConfig::default(),
            min_frequency: DEFAULT_MIN_FREQUENCY,
            dedup_cooldown_secs: DEFAULT_COOLDOWN.as_secs_f64(),
            dedup_sweep_factor: DEFAULT_SWEEP_FACTOR,
            recent_hours: 3,
        }
    }
}

impl CoachSettings {
    /// Cooldown as a `Duration`; negative or non-finite values fall back to the default.
    pub fn dedup_cooldown(&self) -> Duration {
        Duration::try_from_secs_f64(self.dedup_cooldown_secs).unwrap_or(DEFAULT_COOLDOWN)
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<CoachSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(err) => {
                    log::warn!(
                        "Ignoring unreadable settings file {}: {err}",
                        path.display()
                    );
                    CoachSettings::default()
                }
            }
        } else {
            CoachSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn settings(&self) -> CoachSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update(&self, settings: CoachSettings) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = settings;
        self.persist(&guard)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: CoachSettings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings from {}", self.path.display()))?;
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = data;
        Ok(())
    }

    fn persist(&self, data: &CoachSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
