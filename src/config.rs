//! Engine configuration, read from a JSON file. Every section is optional.

use crate::error::AssetSheetError;
use crate::error::ResultMessage;
use crate::registry::RegistryLayout;
use crate::template::TemplateLayout;
use serde::Deserialize;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub template: TemplateLayout,
    #[serde(default)]
    pub registry: RegistryLayout,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DatabaseConfig {
    #[serde(default = "DatabaseConfig::default_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
        }
    }
}

impl DatabaseConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("asset_database.json")
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, AssetSheetError> {
        let path = path.as_ref();
        let prefix = format!("Read config '{}'", path.display());
        let text = fs::read_to_string(path).map_err(AssetSheetError::from).with_prefix(&prefix)?;
        serde_json::from_str(&text).map_err(AssetSheetError::from).with_prefix(&prefix)
    }
}
