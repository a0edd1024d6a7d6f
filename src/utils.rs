use log::{debug, warn};
use std::path::PathBuf;

const APP_DIR: &str = "classicsweeper";
const CONFIG_FILE: &str = "config.toml";

pub fn config_path() -> crate::error::Result<PathBuf> {
    let Some(dir) = dirs::config_dir() else {
        return Err(crate::error::Error::MissingDirectory("config".to_owned()));
    };
    let p = dir.join(APP_DIR).join(CONFIG_FILE);
    debug!("Config path: {}", p.to_string_lossy());
    Ok(p)
}

/// Where score files live when the config does not name a directory.
pub fn default_records_dir() -> PathBuf {
    if let Some(dir) = dirs::data_dir() {
        return dir.join(APP_DIR).join("records");
    }

    warn!("No data directory available, keeping records in the working directory");
    PathBuf::from(".")
}
