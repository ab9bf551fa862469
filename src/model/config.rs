use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Name of the optional config file inside the data directory
pub const CONFIG_FILE: &str = "tasklist.toml";

/// Configuration from tasklist.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TasklistConfig {
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where the two record files live. Relative paths resolve against the data directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Default: see src/cli/handlers/init.rs template
    #[serde(default = "default_tasks_file")]
    pub tasks: String,
    /// Default: see src/cli/handlers/init.rs template
    #[serde(default = "default_subtasks_file")]
    pub subtasks: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            tasks: default_tasks_file(),
            subtasks: default_subtasks_file(),
        }
    }
}

fn default_tasks_file() -> String {
    "tasks.csv".to_string()
}

fn default_subtasks_file() -> String {
    "subtasks.csv".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

/// Resolved locations a `TaskManager` works against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding the config, the recovery log and UI state
    pub data_dir: PathBuf,
    pub tasks_path: PathBuf,
    pub subtasks_path: PathBuf,
}

impl StoreConfig {
    /// Default file names inside `data_dir`
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self::resolve(data_dir, &FilesConfig::default())
    }

    /// Resolve configured file names against `data_dir`
    pub fn resolve(data_dir: impl Into<PathBuf>, files: &FilesConfig) -> Self {
        let data_dir = data_dir.into();
        let tasks_path = resolve_path(&data_dir, &files.tasks);
        let subtasks_path = resolve_path(&data_dir, &files.subtasks);
        StoreConfig {
            data_dir,
            tasks_path,
            subtasks_path,
        }
    }
}

fn resolve_path(data_dir: &Path, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        data_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config: TasklistConfig = toml::from_str("").unwrap();
        assert_eq!(config.files.tasks, "tasks.csv");
        assert_eq!(config.files.subtasks, "subtasks.csv");
        assert!(config.ui.show_key_hints);
        assert!(config.ui.colors.is_empty());
    }

    #[test]
    fn partial_files_table() {
        let config: TasklistConfig = toml::from_str(
            r##"
[files]
tasks = "todo.csv"

[ui]
show_key_hints = false

[ui.colors]
highlight = "#112233"
"##,
        )
        .unwrap();
        assert_eq!(config.files.tasks, "todo.csv");
        assert_eq!(config.files.subtasks, "subtasks.csv");
        assert!(!config.ui.show_key_hints);
        assert_eq!(config.ui.colors["highlight"], "#112233");
    }

    #[test]
    fn resolve_relative_and_absolute() {
        let files = FilesConfig {
            tasks: "data/tasks.csv".into(),
            subtasks: "/var/lib/subtasks.csv".into(),
        };
        let store = StoreConfig::resolve("/home/me/list", &files);
        assert_eq!(store.tasks_path, PathBuf::from("/home/me/list/data/tasks.csv"));
        assert_eq!(store.subtasks_path, PathBuf::from("/var/lib/subtasks.csv"));
        assert_eq!(store.data_dir, PathBuf::from("/home/me/list"));
    }
}
