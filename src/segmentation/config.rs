use serde::{Deserialize, Serialize};

/// Configuration for segmentation algorithm with tunable thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SegmentationConfig {
    /// Generic inactivity gap that starts a new process
    pub inactivity_threshold_secs: f64,

    /// Gap allowed between two typed characters before typing is considered interrupted
    pub typing_threshold_secs: f64,

    /// Grace period after Enter/Return for the user to keep typing
    pub text_input_delay_secs: f64,

    /// Processes outside [min, max] actions are dropped from results
    pub min_process_actions: usize,
    pub max_process_actions: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            inactivity_threshold_secs: 3.0,
            typing_threshold_secs: 2.0,
            text_input_delay_secs: 1.0,
            min_process_actions: 2,
            max_process_actions: 50,
        }
    }
}

impl SegmentationConfig {
    pub fn accepts_action_count(&self, count: usize) -> bool {
        count >= self.min_process_actions && count <= self.max_process_actions
    }
}
