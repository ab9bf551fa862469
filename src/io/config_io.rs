use std::fs;
use std::path::Path;

use crate::io::record_store::StoreError;
use crate::model::config::{CONFIG_FILE, StoreConfig, TasklistConfig};

/// Read tasklist.toml from `data_dir`. A missing file means all defaults;
/// a file that exists but does not parse is an error.
pub fn read_config(data_dir: &Path) -> Result<TasklistConfig, StoreError> {
    let config_path = data_dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(TasklistConfig::default());
    }
    let config_text = fs::read_to_string(&config_path).map_err(|source| StoreError::Read {
        path: config_path.clone(),
        source,
    })?;
    Ok(toml::from_str(&config_text)?)
}

/// Read the config and resolve the record file locations it names.
pub fn load_store_config(data_dir: &Path) -> Result<(TasklistConfig, StoreConfig), StoreError> {
    let config = read_config(data_dir)?;
    let store = StoreConfig::resolve(data_dir, &config.files);
    Ok((config, store))
}
