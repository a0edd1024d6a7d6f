use crate::{difficulty::Difficulty, error::Result, utils};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub difficulty: Difficulty,
    /// Last name entered for a record, offered again next time.
    pub player_name: String,
    pub records_dir: Option<PathBuf>,
}

impl GlobalConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&utils::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        debug!("Loaded config from {}: {:?}", path.to_string_lossy(), config);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&utils::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn records_dir(&self) -> PathBuf {
        self.records_dir.clone().unwrap_or_else(utils::default_records_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = GlobalConfig {
            difficulty: Difficulty::Advanced,
            player_name: "Ann".to_owned(),
            records_dir: Some(dir.path().join("records")),
        };

        config.save_to(&path).unwrap();
        assert_eq!(GlobalConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: GlobalConfig = toml::from_str("difficulty = \"Beginner\"").unwrap();
        assert_eq!(config.difficulty, Difficulty::Beginner);
        assert!(config.player_name.is_empty());
        assert!(config.records_dir.is_none());

        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config, GlobalConfig::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GlobalConfig::load_from(&dir.path().join("config.toml")).is_err());
    }
}
