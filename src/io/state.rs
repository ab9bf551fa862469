use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::task::TaskId;

const STATE_FILE: &str = ".state.json";

/// Persisted TUI state (written to .state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiState {
    /// Row under the cursor: `task:<id>` or `subtask:<id>`
    #[serde(default)]
    pub cursor: Option<String>,
    /// First visible row
    #[serde(default)]
    pub scroll_offset: usize,
    /// Tasks whose subtasks are hidden
    #[serde(default)]
    pub collapsed: HashSet<TaskId>,
}

/// Read .state.json from the data directory
pub fn read_ui_state(data_dir: &Path) -> Option<UiState> {
    let content = fs::read_to_string(data_dir.join(STATE_FILE)).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the data directory
pub fn write_ui_state(data_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    fs::write(data_dir.join(STATE_FILE), content)
}
