use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io;
use crate::io::record_store::RecordStore;
use crate::model::config::CONFIG_FILE;
use crate::parse::{SUBTASK_HEADER, TASK_HEADER};

const CONFIG_TEMPLATE: &str = r##"# tasklist configuration

[files]
# Paths are relative to this directory unless absolute.
tasks = "tasks.csv"
subtasks = "subtasks.csv"

# --- UI Customization ---
# Uncomment and edit to override defaults.

[ui]
# show_key_hints = false
#
# [ui.colors]
# background = "#0C001B"
# text = "#B0AAFF"
# text_bright = "#FFFFFF"
# highlight = "#FB4196"
# dim = "#7D78BF"
# red = "#FF4444"
# green = "#44FF88"
# completed = "#5A5580"
"##;

/// Write the config template and header-only record files into `data_dir`.
///
/// Existing record files are left alone; an existing config is only
/// replaced with `--force`.
pub fn cmd_init(args: InitArgs, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !data_dir.is_dir() {
        fs::create_dir_all(data_dir)?;
    }

    let config_path = data_dir.join(CONFIG_FILE);
    if config_path.exists() && !args.force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        )
        .into());
    }
    fs::write(&config_path, CONFIG_TEMPLATE)?;

    let (_, store_config) = config_io::load_store_config(data_dir)?;
    let store = RecordStore::new(data_dir);
    let mut created = Vec::new();
    if store.ensure_initialized(&store_config.tasks_path, TASK_HEADER)? {
        created.push(store_config.tasks_path.display().to_string());
    }
    if store.ensure_initialized(&store_config.subtasks_path, SUBTASK_HEADER)? {
        created.push(store_config.subtasks_path.display().to_string());
    }

    println!("Initialized tasklist in {}", data_dir.display());
    for path in created {
        println!("  created {}", path);
    }
    Ok(())
}
